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

//! The ordered factory chain, plus the construction-stack bookkeeping that
//! detects direct self-reference and resolves the `delayed` placeholders
//! it substitutes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::combinators::DelayedMutator;
use crate::error::{Error, Result, TypePath};
use crate::mutator::Mutator;
use crate::type_ref::{TypeKind, TypeRef};

use super::MutatorFactory;

/// An ordered sequence of [`MutatorFactory`] stages, plus the recursion
/// bookkeeping shared across the whole build.
pub struct FactoryChain {
    factories: Vec<Box<dyn MutatorFactory>>,
    stack: RefCell<Vec<String>>,
    pending: RefCell<HashMap<String, Vec<Rc<DelayedMutator>>>>,
}

impl FactoryChain {
    /// Build a chain trying `factories` in order.
    pub fn new(factories: Vec<Box<dyn MutatorFactory>>) -> Self {
        Self {
            factories,
            stack: RefCell::new(Vec::new()),
            pending: RefCell::new(HashMap::new()),
        }
    }

    /// Build the mutator tree rooted at `type_ref`.
    pub fn build_root(&self, type_ref: &TypeRef) -> Result<Box<dyn Mutator>> {
        self.build(type_ref, &TypePath::root())
    }

    /// Build a mutator for `type_ref`, recursing into children as needed.
    /// `path` names `type_ref`'s position for error reporting.
    pub fn build(&self, type_ref: &TypeRef, path: &TypePath) -> Result<Box<dyn Mutator>> {
        if let TypeKind::Recursive(name) = &type_ref.kind {
            if !self.stack.borrow().contains(name) {
                return Err(Error::UnmatchedType { path: path.clone() });
            }
            return Ok(Box::new(self.substitute_delayed(path, name)));
        }

        if let Some(name) = type_ref.recursion_key() {
            if self.stack.borrow().contains(&name.to_string()) {
                tracing::trace!(%path, %name, "substituting delayed placeholder for self-reference");
                return Ok(Box::new(self.substitute_delayed(path, name)));
            }
        }

        let is_named = matches!(type_ref.kind, TypeKind::Product { .. } | TypeKind::Sum { .. });
        let name = type_ref.recursion_key().map(str::to_string);

        if is_named {
            self.stack.borrow_mut().push(name.clone().unwrap());
        }
        let built = self.try_factories(type_ref, path);
        if is_named {
            self.stack.borrow_mut().pop();
        }
        let built = built?;

        if is_named {
            let name = name.unwrap();
            let rc: Rc<dyn Mutator> = Rc::from(built);
            if let Some(handles) = self.pending.borrow_mut().remove(&name) {
                tracing::debug!(%name, resolved = handles.len(), "resolving delayed placeholders");
                for handle in handles {
                    handle.resolve(Rc::clone(&rc))?;
                }
            }
            Ok(Box::new(rc))
        } else {
            Ok(built)
        }
    }

    /// Substitute a `delayed` placeholder for `name`, recording a fixup to
    /// run once the ancestor currently under construction finishes.
    fn substitute_delayed(&self, path: &TypePath, name: &str) -> Rc<DelayedMutator> {
        let placeholder = Rc::new(DelayedMutator::new(path.clone(), name.to_string()));
        self.pending
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(Rc::clone(&placeholder));
        placeholder
    }

    fn try_factories(&self, type_ref: &TypeRef, path: &TypePath) -> Result<Box<dyn Mutator>> {
        for factory in &self.factories {
            if let Some(mutator) = factory.try_create(type_ref, path, self)? {
                return Ok(mutator);
            }
        }
        Err(Error::UnmatchedType { path: path.clone() })
    }
}
