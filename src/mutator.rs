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

//! The capability set every mutator in the tree satisfies.

use std::collections::HashSet;
use std::rc::Rc;

use crate::codec::ByteReader;
use crate::random::Prng;
use crate::type_ref::TypeRef;
use crate::value::Value;

/// A read-only set of currently-visiting mutator identities, threaded by the
/// caller through [`Mutator::to_debug_string`] and [`Mutator::detach`] so
/// cyclic (recursive) mutators can recognize re-entry without global state.
///
/// A mutator's "identity" for this purpose is the name of the named
/// `Product`/`Sum` it was built from (see `TypeRef::recursion_key`).
#[derive(Debug, Clone, Default)]
pub struct InCycle {
    visiting: HashSet<String>,
}

impl InCycle {
    /// An empty visiting set, the starting point for a top-level call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `name` is already on the visiting stack.
    pub fn contains(&self, name: &str) -> bool {
        self.visiting.contains(name)
    }

    /// Returns a copy of this set with `name` added, for recursing into a
    /// named mutator's children.
    pub fn entering(&self, name: &str) -> Self {
        let mut visiting = self.visiting.clone();
        visiting.insert(name.to_string());
        Self { visiting }
    }
}

/// Every mutator in the engine satisfies this contract.
///
/// Implementations must be deterministic given a fixed `Prng` seed, must
/// not suspend or perform I/O beyond the in-memory byte buffers passed to
/// `read`/`write`, and must tolerate at most one call in flight at a time
/// (the engine never invokes a mutator concurrently with itself).
pub trait Mutator: std::fmt::Debug {
    /// The type this mutator was constructed for.
    fn type_ref(&self) -> &TypeRef;

    /// Whether every value this mutator produces has the same encoded
    /// size. `repeated` uses this to skip redundant length bookkeeping for
    /// fixed-size elements.
    fn has_fixed_size(&self) -> bool;

    /// Produce an initial, in-domain value.
    fn init(&self, rng: &mut dyn Prng) -> Value;

    /// Produce a neighbor of `value`. Must not return a value equal to
    /// `value` whenever the domain has cardinality greater than one.
    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value;

    /// Consume bytes from `reader`, producing some in-domain value. Total
    /// over all byte sequences: short reads zero-pad, excess bytes are left
    /// in `reader` for the parent combinator to consume.
    fn read(&self, reader: &mut ByteReader<'_>) -> Value;

    /// Write `value` to `out` in the same framing `read` expects.
    fn write(&self, value: &Value, out: &mut Vec<u8>);

    /// Return a value semantically equal to `value` that shares no mutable
    /// state with it. `in_cycle` lets recursive mutators stop at a cycle
    /// boundary instead of deep-cloning forever.
    fn detach(&self, value: &Value, in_cycle: &InCycle) -> Value;

    /// A human-readable description of this mutator's shape. Nodes that
    /// would recurse infinitely (per `in_cycle`) print as their declared
    /// name only.
    fn to_debug_string(&self, in_cycle: &InCycle) -> String;
}

/// An `Rc<dyn Mutator>` (or `Rc` of any concrete mutator) is itself a
/// `Mutator`, delegating every call to the pointee.
///
/// This is what lets a recursive ancestor's mutator be shared — via `Rc`
/// — between the "real" slot that holds it and every `delayed` placeholder
/// built for its self-referential descendants, while both sides still see
/// a plain `Box<dyn Mutator>`-compatible value (see [`crate::factory`]).
impl<T: Mutator + ?Sized> Mutator for Rc<T> {
    fn type_ref(&self) -> &TypeRef {
        (**self).type_ref()
    }

    fn has_fixed_size(&self) -> bool {
        (**self).has_fixed_size()
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        (**self).init(rng)
    }

    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value {
        (**self).mutate(value, rng)
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        (**self).read(reader)
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        (**self).write(value, out)
    }

    fn detach(&self, value: &Value, in_cycle: &InCycle) -> Value {
        (**self).detach(value, in_cycle)
    }

    fn to_debug_string(&self, in_cycle: &InCycle) -> String {
        (**self).to_debug_string(in_cycle)
    }
}
