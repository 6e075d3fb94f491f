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

//! `optional`: presence plus an inner value.

use crate::codec::ByteReader;
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::TypeRef;
use crate::value::Value;

/// Wraps `inner` with a presence bit. `NotNull` forces presence to `true`
/// at `init` time; `mutate` can still toggle it off unless `inner` is the
/// only field in a context that forbids absence (the driver's concern, not
/// this mutator's).
pub struct OptionalMutator {
    type_ref: TypeRef,
    inner: Box<dyn Mutator>,
    not_null: bool,
}

impl OptionalMutator {
    /// Build an optional mutator wrapping `inner`. `not_null` mirrors the
    /// `NotNull` annotation: presence is forced to `true` at `init`.
    pub fn new(inner: Box<dyn Mutator>, not_null: bool) -> Self {
        Self {
            type_ref: TypeRef::optional(inner.type_ref().clone()),
            inner,
            not_null,
        }
    }
}

impl std::fmt::Debug for OptionalMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionalMutator").finish()
    }
}

impl Mutator for OptionalMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        false
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        let present = self.not_null || rng.choice();
        if present {
            Value::Optional(Some(Box::new(self.inner.init(rng))))
        } else {
            Value::Optional(None)
        }
    }

    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value {
        match value {
            Value::Optional(Some(boxed)) => {
                if !self.not_null && rng.choice() {
                    Value::Optional(None)
                } else {
                    Value::Optional(Some(Box::new(self.inner.mutate(boxed, rng))))
                }
            }
            Value::Optional(None) => Value::Optional(Some(Box::new(self.inner.init(rng)))),
            other => panic!("expected Value::Optional, got {other:?}"),
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        let present = reader.read_u8() & 1 != 0;
        if present {
            Value::Optional(Some(Box::new(self.inner.read(reader))))
        } else {
            Value::Optional(None)
        }
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        match value {
            Value::Optional(Some(boxed)) => {
                out.push(1);
                self.inner.write(boxed, out);
            }
            Value::Optional(None) => out.push(0),
            other => panic!("expected Value::Optional, got {other:?}"),
        }
    }

    fn detach(&self, value: &Value, in_cycle: &InCycle) -> Value {
        match value {
            Value::Optional(Some(boxed)) => {
                Value::Optional(Some(Box::new(self.inner.detach(boxed, in_cycle))))
            }
            Value::Optional(None) => Value::Optional(None),
            other => panic!("expected Value::Optional, got {other:?}"),
        }
    }

    fn to_debug_string(&self, in_cycle: &InCycle) -> String {
        format!("Optional<{}>", self.inner.to_debug_string(in_cycle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutators::BooleanMutator;
    use crate::random::{ChaChaPrng, StepPrng};

    #[test]
    fn not_null_always_initializes_present() {
        let m = OptionalMutator::new(Box::new(BooleanMutator::new()), true);
        for seed in 0..50u64 {
            let mut rng = ChaChaPrng::from_seed(seed);
            let v = m.init(&mut rng);
            assert!(matches!(v, Value::Optional(Some(_))));
        }
    }

    #[test]
    fn mutate_absent_becomes_present() {
        let m = OptionalMutator::new(Box::new(BooleanMutator::new()), false);
        let mut rng = ChaChaPrng::from_seed(1);
        let after = m.mutate(&Value::Optional(None), &mut rng);
        assert!(matches!(after, Value::Optional(Some(_))));
    }

    #[test]
    fn mutate_present_can_clear_presence() {
        let m = OptionalMutator::new(Box::new(BooleanMutator::new()), false);
        let mut rng = StepPrng::new();
        rng.push_bool(true); // flip presence off
        let before = Value::Optional(Some(Box::new(Value::Bool(true))));
        let after = m.mutate(&before, &mut rng);
        assert_eq!(after, Value::Optional(None));
    }

    #[test]
    fn mutate_present_can_mutate_inner() {
        let m = OptionalMutator::new(Box::new(BooleanMutator::new()), false);
        let mut rng = StepPrng::new();
        rng.push_bool(false); // keep presence
        let before = Value::Optional(Some(Box::new(Value::Bool(true))));
        let after = m.mutate(&before, &mut rng);
        assert_eq!(after, Value::Optional(Some(Box::new(Value::Bool(false)))));
    }

    #[test]
    fn round_trip() {
        let m = OptionalMutator::new(Box::new(BooleanMutator::new()), false);
        let mut rng = ChaChaPrng::from_seed(77);
        for _ in 0..50 {
            let v = m.init(&mut rng);
            let mut out = Vec::new();
            m.write(&v, &mut out);
            let mut reader = ByteReader::new(&out);
            assert_eq!(m.read(&mut reader), v);
        }
    }

    #[test]
    fn read_on_empty_input_is_absent() {
        let m = OptionalMutator::new(Box::new(BooleanMutator::new()), false);
        let mut reader = ByteReader::new(&[]);
        assert_eq!(m.read(&mut reader), Value::Optional(None));
    }
}
