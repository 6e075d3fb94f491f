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

//! `delayed`: an uninitialized slot a parent factory fills in after
//! construction completes, breaking the cycle a directly recursive type
//! would otherwise create at construction time.

use std::cell::RefCell;
use std::rc::Rc;

use crate::codec::ByteReader;
use crate::error::{Error, Result, TypePath};
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::TypeRef;
use crate::value::Value;

/// A placeholder that resolves to its target mutator exactly once.
///
/// All operations delegate to the resolved target. The target (a named
/// `product`/`sum`) handles its own recursion-cycle bookkeeping in
/// `detach`/`to_debug_string` via its own name, so `delayed` itself needs
/// no special-casing there — it's a transparent forwarding layer.
///
/// The target is held as an `Rc` rather than a `Box` because a single
/// recursive ancestor commonly has more than one `delayed` placeholder
/// among its descendants (e.g. a tree node referencing itself from two
/// different child slots); all of them share one resolved target.
pub struct DelayedMutator {
    path: TypePath,
    type_ref: TypeRef,
    slot: RefCell<Option<Rc<dyn Mutator>>>,
}

impl DelayedMutator {
    /// Build an unresolved slot for the self-reference named `name`.
    pub fn new(path: TypePath, name: impl Into<String>) -> Self {
        Self {
            path,
            type_ref: TypeRef::recursive(name),
            slot: RefCell::new(None),
        }
    }

    /// Fill the slot with the ancestor mutator this placeholder stood in
    /// for. Fails if called twice.
    pub fn resolve(&self, target: Rc<dyn Mutator>) -> Result<()> {
        let mut slot = self.slot.borrow_mut();
        if slot.is_some() {
            return Err(Error::DelayedAlreadyResolved {
                path: self.path.clone(),
            });
        }
        *slot = Some(target);
        Ok(())
    }

    fn with_target<R>(&self, f: impl FnOnce(&dyn Mutator) -> R) -> R {
        let slot = self.slot.borrow();
        match slot.as_deref() {
            Some(target) => f(target),
            None => panic!("{}", Error::DelayedUnresolved { path: self.path.clone() }),
        }
    }
}

impl std::fmt::Debug for DelayedMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelayedMutator").field("path", &self.path).finish()
    }
}

impl Mutator for DelayedMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        false
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        self.with_target(|target| target.init(rng))
    }

    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value {
        self.with_target(|target| target.mutate(value, rng))
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        self.with_target(|target| target.read(reader))
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        self.with_target(|target| target.write(value, out))
    }

    fn detach(&self, value: &Value, in_cycle: &InCycle) -> Value {
        self.with_target(|target| target.detach(value, in_cycle))
    }

    fn to_debug_string(&self, in_cycle: &InCycle) -> String {
        self.with_target(|target| target.to_debug_string(in_cycle))
    }
}
