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

//! `fixedValue`: a constant. Its domain has exactly one member, so
//! `mutate` is not a valid operation on it — calling it indicates the
//! caller built a combinator around a singleton without guarding for it.

use crate::codec::ByteReader;
use crate::error::Error;
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::{TypeKind, TypeRef};
use crate::value::Value;

/// Always produces the same value, consumes no bytes on `read`, and
/// writes nothing.
#[derive(Debug)]
pub struct FixedValueMutator {
    type_ref: TypeRef,
    value: Value,
}

impl FixedValueMutator {
    /// Build a mutator whose sole value is `value`.
    pub fn new(value: Value) -> Self {
        Self {
            type_ref: TypeRef::new(TypeKind::Constant),
            value,
        }
    }
}

impl Mutator for FixedValueMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        true
    }

    fn init(&self, _rng: &mut dyn Prng) -> Value {
        self.value.clone()
    }

    fn mutate(&self, _value: &Value, _rng: &mut dyn Prng) -> Value {
        panic!("{}", Error::SingletonDomain);
    }

    fn read(&self, _reader: &mut ByteReader<'_>) -> Value {
        self.value.clone()
    }

    fn write(&self, _value: &Value, _out: &mut Vec<u8>) {}

    fn detach(&self, _value: &Value, _in_cycle: &InCycle) -> Value {
        self.value.clone()
    }

    fn to_debug_string(&self, _in_cycle: &InCycle) -> String {
        format!("Const({:?})", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ChaChaPrng;

    #[test]
    fn init_always_returns_the_constant() {
        let m = FixedValueMutator::new(Value::Int(42));
        let mut rng = ChaChaPrng::from_seed(0);
        assert_eq!(m.init(&mut rng), Value::Int(42));
    }

    #[test]
    fn write_emits_no_bytes() {
        let m = FixedValueMutator::new(Value::Bool(true));
        let mut out = Vec::new();
        m.write(&Value::Bool(true), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn read_ignores_input_and_returns_the_constant() {
        let m = FixedValueMutator::new(Value::Int(7));
        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert_eq!(m.read(&mut reader), Value::Int(7));
        assert_eq!(reader.remaining(), 3);
    }

    #[test]
    #[should_panic]
    fn mutate_panics() {
        let m = FixedValueMutator::new(Value::Int(7));
        let mut rng = ChaChaPrng::from_seed(0);
        m.mutate(&Value::Int(7), &mut rng);
    }
}
