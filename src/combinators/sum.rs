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

//! `sum`: a tagged variant over named members. The tag is the member's
//! index into the declaration-order variant list, taken `mod k` on read so
//! any byte decodes to a valid member.

use crate::codec::ByteReader;
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::TypeRef;
use crate::value::Value;

/// A variant mutator over `k` named members.
pub struct SumMutator {
    type_ref: TypeRef,
    name: String,
    variant_names: Vec<String>,
    variants: Vec<Box<dyn Mutator>>,
}

impl SumMutator {
    /// Build a sum mutator named `name` over `variants` (name, child
    /// mutator pairs, in declaration order). Requires at least one variant.
    pub fn new(name: impl Into<String>, variants: Vec<(String, Box<dyn Mutator>)>) -> Self {
        assert!(!variants.is_empty(), "sum requires at least one variant");
        let name = name.into();
        let type_variants = variants
            .iter()
            .map(|(n, m)| (n.clone(), m.type_ref().clone()))
            .collect();
        let (variant_names, variants): (Vec<_>, Vec<_>) = variants.into_iter().unzip();
        Self {
            type_ref: TypeRef::sum(name.clone(), type_variants),
            name,
            variant_names,
            variants,
        }
    }

    fn k(&self) -> usize {
        self.variants.len()
    }
}

impl std::fmt::Debug for SumMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SumMutator").field("name", &self.name).finish()
    }
}

impl Mutator for SumMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        false
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        let tag = rng.index_in(self.k());
        let inner = self.variants[tag].init(rng);
        Value::Sum {
            tag,
            inner: Box::new(inner),
        }
    }

    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value {
        let (tag, inner) = match value {
            Value::Sum { tag, inner } => (*tag, inner.as_ref()),
            other => panic!("expected Value::Sum, got {other:?}"),
        };
        let k = self.k();
        if rng.true_in_one_out_of(k as u32 + 1) && k > 1 {
            // switch tag: uniform among the k - 1 other members.
            let offset = rng.index_in(k - 1);
            let new_tag = if offset < tag { offset } else { offset + 1 };
            let new_inner = self.variants[new_tag].init(rng);
            Value::Sum {
                tag: new_tag,
                inner: Box::new(new_inner),
            }
        } else {
            let mutated = self.variants[tag].mutate(inner, rng);
            Value::Sum {
                tag,
                inner: Box::new(mutated),
            }
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        let raw_tag = reader.read_u8() as usize;
        let tag = raw_tag % self.k();
        let inner = self.variants[tag].read(reader);
        Value::Sum {
            tag,
            inner: Box::new(inner),
        }
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        let (tag, inner) = match value {
            Value::Sum { tag, inner } => (*tag, inner.as_ref()),
            other => panic!("expected Value::Sum, got {other:?}"),
        };
        out.push(tag as u8);
        self.variants[tag].write(inner, out);
    }

    fn detach(&self, value: &Value, in_cycle: &InCycle) -> Value {
        if in_cycle.contains(&self.name) {
            return value.clone();
        }
        let nested = in_cycle.entering(&self.name);
        let (tag, inner) = match value {
            Value::Sum { tag, inner } => (*tag, inner.as_ref()),
            other => panic!("expected Value::Sum, got {other:?}"),
        };
        Value::Sum {
            tag,
            inner: Box::new(self.variants[tag].detach(inner, &nested)),
        }
    }

    fn to_debug_string(&self, in_cycle: &InCycle) -> String {
        if in_cycle.contains(&self.name) {
            return self.name.clone();
        }
        let nested = in_cycle.entering(&self.name);
        let parts: Vec<String> = self
            .variant_names
            .iter()
            .zip(&self.variants)
            .map(|(n, m)| format!("{n}: {}", m.to_debug_string(&nested)))
            .collect();
        format!("{}<{}>", self.name, parts.join(" | "))
    }
}
