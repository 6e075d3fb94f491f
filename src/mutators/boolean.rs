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

//! The boolean leaf mutator: a domain of exactly two values, encoded as a
//! single byte.

use crate::codec::ByteReader;
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::{TypeKind, TypeRef};
use crate::value::Value;

/// Mutates a boolean: `init` draws uniformly, `mutate` always flips (the
/// domain has exactly two members, so "a different neighbor" is the only
/// other value).
#[derive(Debug, Default)]
pub struct BooleanMutator {
    type_ref: TypeRef,
}

impl BooleanMutator {
    /// Construct a boolean mutator. Takes no annotations: a boolean's
    /// domain is fixed.
    pub fn new() -> Self {
        Self {
            type_ref: TypeRef::new(TypeKind::Bool),
        }
    }
}

impl Mutator for BooleanMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        true
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        Value::Bool(rng.choice())
    }

    fn mutate(&self, value: &Value, _rng: &mut dyn Prng) -> Value {
        Value::Bool(!value.as_bool())
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        Value::Bool(reader.read_u8() != 0)
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        out.push(if value.as_bool() { 1 } else { 0 });
    }

    fn detach(&self, value: &Value, _in_cycle: &InCycle) -> Value {
        value.clone()
    }

    fn to_debug_string(&self, _in_cycle: &InCycle) -> String {
        "Bool".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::StepPrng;

    #[test]
    fn mutate_always_flips() {
        let m = BooleanMutator::new();
        let mut rng = StepPrng::new();
        assert_eq!(m.mutate(&Value::Bool(true), &mut rng), Value::Bool(false));
        assert_eq!(m.mutate(&Value::Bool(false), &mut rng), Value::Bool(true));
    }

    #[test]
    fn write_true_is_one_byte_nonzero() {
        let m = BooleanMutator::new();
        let mut out = Vec::new();
        m.write(&Value::Bool(true), &mut out);
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn write_false_is_zero_byte() {
        let m = BooleanMutator::new();
        let mut out = Vec::new();
        m.write(&Value::Bool(false), &mut out);
        assert_eq!(out, vec![0]);
    }

    #[test]
    fn read_any_nonzero_byte_is_true() {
        let m = BooleanMutator::new();
        for b in [1u8, 2, 0xFF] {
            let bytes = [b];
            let mut reader = ByteReader::new(&bytes);
            assert_eq!(m.read(&mut reader), Value::Bool(true));
        }
    }

    #[test]
    fn read_zero_byte_is_false() {
        let m = BooleanMutator::new();
        let bytes = [0u8];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(m.read(&mut reader), Value::Bool(false));
    }

    #[test]
    fn read_on_empty_input_zero_pads_to_false() {
        let m = BooleanMutator::new();
        let mut reader = ByteReader::new(&[]);
        assert_eq!(m.read(&mut reader), Value::Bool(false));
    }

    #[test]
    fn round_trip() {
        let m = BooleanMutator::new();
        for v in [true, false] {
            let mut out = Vec::new();
            m.write(&Value::Bool(v), &mut out);
            let mut reader = ByteReader::new(&out);
            assert_eq!(m.read(&mut reader), Value::Bool(v));
        }
    }
}
