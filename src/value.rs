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

//! The single runtime value type every mutator in the tree produces and
//! consumes.
//!
//! See `SPEC_FULL.md` §3.E.1 for why this crate uses one non-generic
//! `Value` enum rather than a `Mutator<T>` generic per shape: combinators
//! need to hold heterogeneous children behind a single trait object, and a
//! unified value enum is how `serde_json` and protobuf dynamic messages
//! solve the identical problem in safe Rust.

use std::collections::HashMap;

/// A value produced by `init`/`mutate`/`read`, or consumed by `write`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean leaf.
    Bool(bool),
    /// A signed integral leaf, stored widened regardless of natural width.
    Int(i128),
    /// A floating-point leaf.
    Float(f64),
    /// A byte-string leaf.
    Bytes(Vec<u8>),
    /// A `product` value: one entry per field, in declaration order.
    Product(Vec<Value>),
    /// A `sum` value: the selected member's index and its inner value.
    Sum {
        /// Index into the variant list.
        tag: usize,
        /// The selected member's value.
        inner: Box<Value>,
    },
    /// An `optional` value.
    Optional(Option<Box<Value>>),
    /// A `repeated` value.
    Repeated(Vec<Value>),
    /// A protobuf `map<K, V>` value, represented as a repeated key/value
    /// product with deduplication by key applied on `read` (see
    /// [`crate::protobuf`]).
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Returns the inner `bool`, panicking if this isn't a `Value::Bool`.
    ///
    /// Intended for mutator implementations that know their own shape by
    /// construction; the `TypeRef` a mutator was built from guarantees the
    /// values it's handed back match that shape.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            other => panic!("expected Value::Bool, got {other:?}"),
        }
    }

    /// Returns the inner `i128`, panicking if this isn't a `Value::Int`.
    pub fn as_int(&self) -> i128 {
        match self {
            Value::Int(v) => *v,
            other => panic!("expected Value::Int, got {other:?}"),
        }
    }

    /// Returns the inner `f64`, panicking if this isn't a `Value::Float`.
    pub fn as_float(&self) -> f64 {
        match self {
            Value::Float(v) => *v,
            other => panic!("expected Value::Float, got {other:?}"),
        }
    }

    /// Returns the inner byte slice, panicking if this isn't a `Value::Bytes`.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Value::Bytes(b) => b,
            other => panic!("expected Value::Bytes, got {other:?}"),
        }
    }

    /// Returns the inner fields, panicking if this isn't a `Value::Product`.
    pub fn as_product(&self) -> &[Value] {
        match self {
            Value::Product(fields) => fields,
            other => panic!("expected Value::Product, got {other:?}"),
        }
    }

    /// Returns the inner elements, panicking if this isn't a `Value::Repeated`.
    pub fn as_repeated(&self) -> &[Value] {
        match self {
            Value::Repeated(elements) => elements,
            other => panic!("expected Value::Repeated, got {other:?}"),
        }
    }
}

/// Deduplicates a decoded `map<K, V>` entry list by key, keeping the last
/// value written for each key — matching protobuf map semantics, where a
/// repeated later entry for the same key overwrites an earlier one.
pub fn dedup_map_by_key(entries: Vec<(Value, Value)>) -> Vec<(Value, Value)> {
    let mut order: Vec<Value> = Vec::new();
    let mut by_key: HashMap<DebugKey, Value> = HashMap::new();
    for (k, v) in entries {
        let key = DebugKey(format!("{k:?}"));
        if !by_key.contains_key(&key) {
            order.push(k.clone());
        }
        by_key.insert(key, v);
    }
    order
        .into_iter()
        .map(|k| {
            let key = DebugKey(format!("{k:?}"));
            let v = by_key.remove(&key).expect("key was just inserted");
            (k, v)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DebugKey(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_map_by_key_keeps_last_value() {
        let entries = vec![
            (Value::Int(1), Value::Bool(true)),
            (Value::Int(2), Value::Bool(false)),
            (Value::Int(1), Value::Bool(false)),
        ];
        let deduped = dedup_map_by_key(entries);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0], (Value::Int(1), Value::Bool(false)));
        assert_eq!(deduped[1], (Value::Int(2), Value::Bool(false)));
    }
}
