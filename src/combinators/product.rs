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

//! `product`: a fixed-arity record of heterogeneous, named fields.

use crate::codec::ByteReader;
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::TypeRef;
use crate::value::Value;

/// A record mutator: `init` builds every field, `mutate` perturbs exactly
/// one, `read`/`write` concatenate child framings in declaration order.
pub struct ProductMutator {
    type_ref: TypeRef,
    name: String,
    field_names: Vec<String>,
    fields: Vec<Box<dyn Mutator>>,
}

impl ProductMutator {
    /// Build a product mutator named `name` over `fields` (name, child
    /// mutator pairs, in declaration order).
    pub fn new(name: impl Into<String>, fields: Vec<(String, Box<dyn Mutator>)>) -> Self {
        let name = name.into();
        let type_fields = fields
            .iter()
            .map(|(n, m)| (n.clone(), m.type_ref().clone()))
            .collect();
        let (field_names, fields): (Vec<_>, Vec<_>) = fields.into_iter().unzip();
        Self {
            type_ref: TypeRef::product(name.clone(), type_fields),
            name,
            field_names,
            fields,
        }
    }
}

impl std::fmt::Debug for ProductMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductMutator").field("name", &self.name).finish()
    }
}

impl Mutator for ProductMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        self.fields.iter().all(|m| m.has_fixed_size())
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        Value::Product(self.fields.iter().map(|m| m.init(rng)).collect())
    }

    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value {
        let mut fields = value.as_product().to_vec();
        let idx = rng.index_in(fields.len());
        fields[idx] = self.fields[idx].mutate(&fields[idx], rng);
        Value::Product(fields)
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        Value::Product(self.fields.iter().map(|m| m.read(reader)).collect())
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        for (m, v) in self.fields.iter().zip(value.as_product()) {
            m.write(v, out);
        }
    }

    fn detach(&self, value: &Value, in_cycle: &InCycle) -> Value {
        if in_cycle.contains(&self.name) {
            return value.clone();
        }
        let nested = in_cycle.entering(&self.name);
        let fields = value
            .as_product()
            .iter()
            .zip(&self.fields)
            .map(|(v, m)| m.detach(v, &nested))
            .collect();
        Value::Product(fields)
    }

    fn to_debug_string(&self, in_cycle: &InCycle) -> String {
        if in_cycle.contains(&self.name) {
            return self.name.clone();
        }
        let nested = in_cycle.entering(&self.name);
        let parts: Vec<String> = self
            .field_names
            .iter()
            .zip(&self.fields)
            .map(|(n, m)| format!("{n}: {}", m.to_debug_string(&nested)))
            .collect();
        format!("{}{{{}}}", self.name, parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutators::{BooleanMutator, IntegralMutator};
    use crate::random::{ChaChaPrng, StepPrng};
    use crate::type_ref::{AnnotationSet, IntWidth};

    fn sample() -> ProductMutator {
        let annotations = AnnotationSet::none().with_range(Some(0), Some(10));
        let age = IntegralMutator::new(&crate::error::TypePath::root(), IntWidth::W32, true, &annotations)
            .unwrap();
        ProductMutator::new(
            "Person",
            vec![
                ("active".to_string(), Box::new(BooleanMutator::new()) as Box<dyn Mutator>),
                ("age".to_string(), Box::new(age) as Box<dyn Mutator>),
            ],
        )
    }

    #[test]
    fn init_produces_one_value_per_field() {
        let m = sample();
        let mut rng = ChaChaPrng::from_seed(1);
        let v = m.init(&mut rng);
        assert_eq!(v.as_product().len(), 2);
    }

    #[test]
    fn mutate_changes_exactly_one_field() {
        let m = sample();
        let mut rng = StepPrng::new();
        rng.push_index(1); // mutate the "age" field
        rng.push_bool(false); // integral mutate: not bit-flip
        rng.push_bool(false); // not random-walk
        rng.push_i128(7); // uniform draw
        let before = Value::Product(vec![Value::Bool(true), Value::Int(3)]);
        let after = m.mutate(&before, &mut rng);
        let fields = after.as_product();
        assert_eq!(fields[0], Value::Bool(true));
        assert_eq!(fields[1], Value::Int(7));
    }

    #[test]
    fn round_trip_on_init_value() {
        let m = sample();
        let mut rng = ChaChaPrng::from_seed(3);
        for _ in 0..50 {
            let v = m.init(&mut rng);
            let mut out = Vec::new();
            m.write(&v, &mut out);
            let mut reader = ByteReader::new(&out);
            assert_eq!(m.read(&mut reader), v);
        }
    }

    #[test]
    fn detach_produces_structurally_equal_value() {
        let m = sample();
        let mut rng = ChaChaPrng::from_seed(5);
        let v = m.init(&mut rng);
        let detached = m.detach(&v, &InCycle::new());
        assert_eq!(detached, v);
    }

    #[test]
    fn to_debug_string_names_fields() {
        let m = sample();
        let v = Value::Product(vec![Value::Bool(true), Value::Int(4)]);
        // to_debug_string doesn't use the value; it describes the shape.
        let _ = v;
        let s = m.to_debug_string(&InCycle::new());
        assert!(s.starts_with("Person{"));
        assert!(s.contains("active"));
        assert!(s.contains("age"));
    }
}
