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

//! `map<K, V>`: a `repeated(product(K, V))` with deduplication by key
//! applied on `read`, matching protobuf's own "last entry for a key wins"
//! map semantics.

use crate::codec::{write_varint_u64, ByteReader};
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::TypeRef;
use crate::value::{dedup_map_by_key, Value};

fn clamp_len(raw: u64, lo: usize, hi: usize) -> usize {
    (raw as usize).clamp(lo, hi)
}

/// A mutator over a protobuf `map<K, V>` field.
pub struct MapFieldMutator {
    type_ref: TypeRef,
    key: Box<dyn Mutator>,
    value: Box<dyn Mutator>,
    lo_len: usize,
    hi_len: usize,
}

impl MapFieldMutator {
    /// Build a map mutator over `key`/`value` child mutators, bounded to
    /// `[lo_len, hi_len]` entries.
    pub fn new(key: Box<dyn Mutator>, value: Box<dyn Mutator>, lo_len: usize, hi_len: usize) -> Self {
        Self {
            type_ref: TypeRef::repeated(TypeRef::product(
                "MapEntry",
                vec![
                    ("key".to_string(), key.type_ref().clone()),
                    ("value".to_string(), value.type_ref().clone()),
                ],
            )),
            key,
            value,
            lo_len,
            hi_len,
        }
    }

    fn entries(value: &Value) -> &[(Value, Value)] {
        match value {
            Value::Map(entries) => entries,
            other => panic!("expected Value::Map, got {other:?}"),
        }
    }
}

impl std::fmt::Debug for MapFieldMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapFieldMutator")
            .field("lo_len", &self.lo_len)
            .field("hi_len", &self.hi_len)
            .finish()
    }
}

impl Mutator for MapFieldMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        false
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        let len = rng.closed_range_i128(self.lo_len as i128, self.hi_len as i128) as usize;
        let entries = (0..len)
            .map(|_| (self.key.init(rng), self.value.init(rng)))
            .collect();
        Value::Map(dedup_map_by_key(entries))
    }

    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value {
        let entries = Self::entries(value).to_vec();
        if self.lo_len == self.hi_len && self.hi_len == 0 {
            return Value::Map(entries);
        }
        loop {
            let op = rng.index_in(3);
            let candidate = match op {
                0 if entries.len() < self.hi_len => {
                    let mut v = entries.clone();
                    v.push((self.key.init(rng), self.value.init(rng)));
                    Some(v)
                }
                1 if entries.len() > self.lo_len && !entries.is_empty() => {
                    let pos = rng.index_in(entries.len());
                    let mut v = entries.clone();
                    v.remove(pos);
                    Some(v)
                }
                2 if !entries.is_empty() => {
                    let pos = rng.index_in(entries.len());
                    let mut v = entries.clone();
                    v[pos].1 = self.value.mutate(&v[pos].1, rng);
                    Some(v)
                }
                _ => None,
            };
            if let Some(v) = candidate {
                let deduped = dedup_map_by_key(v);
                if deduped != entries {
                    return Value::Map(deduped);
                }
            }
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        let raw_len = reader.read_varint_u64();
        let len = clamp_len(raw_len, self.lo_len, self.hi_len);
        let entries = (0..len)
            .map(|_| (self.key.read(reader), self.value.read(reader)))
            .collect();
        Value::Map(dedup_map_by_key(entries))
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        let entries = Self::entries(value);
        write_varint_u64(entries.len() as u64, out);
        for (k, v) in entries {
            self.key.write(k, out);
            self.value.write(v, out);
        }
    }

    fn detach(&self, value: &Value, in_cycle: &InCycle) -> Value {
        let entries = Self::entries(value)
            .iter()
            .map(|(k, v)| (self.key.detach(k, in_cycle), self.value.detach(v, in_cycle)))
            .collect();
        Value::Map(entries)
    }

    fn to_debug_string(&self, in_cycle: &InCycle) -> String {
        format!(
            "Map[{}, {}]<{}, {}>",
            self.lo_len,
            self.hi_len,
            self.key.to_debug_string(in_cycle),
            self.value.to_debug_string(in_cycle)
        )
    }
}
