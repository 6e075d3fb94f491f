// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 Cisco Systems, Inc. and its affiliates
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Builds a [`crate::mutator::Mutator`] tree from a [`crate::type_ref::TypeRef`].
//!
//! A [`MutatorFactory`] chain is tried in priority order; the first factory
//! to return `Some` wins. Composite factories recurse into children through
//! the [`FactoryChain`] they're handed, which also detects direct
//! self-reference and substitutes a [`crate::combinators::DelayedMutator`]
//! placeholder rather than recursing forever.

mod primitives;
mod recursion;

pub use primitives::{CompositeFactory, PrimitiveFactory, DEFAULT_REPEATED_MAX};
pub use recursion::FactoryChain;

use crate::error::{Result, TypePath};
use crate::mutator::Mutator;
use crate::type_ref::TypeRef;

/// One stage in a [`FactoryChain`].
///
/// `try_create` returns `Ok(None)` when this factory doesn't recognize
/// `type_ref`'s shape, letting the chain fall through to the next factory.
/// Any other factory's `Err` aborts the whole build.
pub trait MutatorFactory {
    /// Attempt to build a mutator for `type_ref`, recursing into children
    /// (if any) via `chain`.
    fn try_create(
        &self,
        type_ref: &TypeRef,
        path: &TypePath,
        chain: &FactoryChain,
    ) -> Result<Option<Box<dyn Mutator>>>;
}

/// A [`FactoryChain`] preloaded with the engine's built-in primitive and
/// composite factories, covering every shape [`crate::type_ref::TypeKind`]
/// defines.
pub fn standard_chain() -> FactoryChain {
    FactoryChain::new(vec![
        Box::new(PrimitiveFactory) as Box<dyn MutatorFactory>,
        Box::new(CompositeFactory) as Box<dyn MutatorFactory>,
    ])
}
