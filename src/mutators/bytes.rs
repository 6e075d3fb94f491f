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

//! Variable-length byte string mutation: insertion, deletion, byte
//! overwrite, and full replacement, all respecting a declared size range.

use crate::codec::{write_varint_u64, ByteReader};
use crate::error::{Error, Result, TypePath};
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::{AnnotationSet, TypeKind, TypeRef};
use crate::value::Value;

/// The length bound used when no `SizeRange` annotation narrows it.
///
/// Chosen to keep unannotated corpora small enough that `repeated` and
/// nested `product` trees stay tractable; annotate `SizeRange` explicitly
/// when a larger or smaller domain is required.
const DEFAULT_MAX_LEN: usize = 1024;

fn clamp_len(raw: u64, lo: usize, hi: usize) -> usize {
    (raw as usize).clamp(lo, hi)
}

/// A mutator over a length-bounded byte string.
#[derive(Debug)]
pub struct ByteStringMutator {
    type_ref: TypeRef,
    lo_len: usize,
    hi_len: usize,
}

impl ByteStringMutator {
    /// Construct a mutator whose length is bounded by `annotations`'
    /// `SizeRange`, or `[0, DEFAULT_MAX_LEN]` if absent.
    pub fn new(path: &TypePath, annotations: &AnnotationSet) -> Result<Self> {
        let (lo_len, hi_len) = annotations.size_range.unwrap_or((0, DEFAULT_MAX_LEN));
        if lo_len > hi_len {
            return Err(Error::AnnotationOutOfDomain {
                path: path.clone(),
                reason: format!("SizeRange[{lo_len}, {hi_len}] has min > max"),
            });
        }
        Ok(Self {
            type_ref: TypeRef::new(TypeKind::ByteString).annotated(annotations.clone()),
            lo_len,
            hi_len,
        })
    }

    fn draw(&self, len: usize, rng: &mut dyn Prng) -> Vec<u8> {
        rng.bytes(len)
    }
}

impl Mutator for ByteStringMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        self.lo_len == self.hi_len
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        let len = rng.closed_range_i128(self.lo_len as i128, self.hi_len as i128) as usize;
        Value::Bytes(self.draw(len, rng))
    }

    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value {
        let bytes = value.as_bytes().to_vec();
        if self.lo_len == self.hi_len && self.hi_len == 0 {
            return Value::Bytes(bytes);
        }
        loop {
            let op = rng.index_in(4);
            let candidate = match op {
                0 if bytes.len() < self.hi_len => {
                    let pos = rng.index_in(bytes.len() + 1);
                    let mut v = bytes.clone();
                    v.splice(pos..pos, self.draw(1, rng));
                    Some(v)
                }
                1 if bytes.len() > self.lo_len && !bytes.is_empty() => {
                    let pos = rng.index_in(bytes.len());
                    let mut v = bytes.clone();
                    v.remove(pos);
                    Some(v)
                }
                2 if !bytes.is_empty() => {
                    let pos = rng.index_in(bytes.len());
                    let mut v = bytes.clone();
                    v[pos] = self.draw(1, rng)[0];
                    Some(v)
                }
                3 => {
                    let len =
                        rng.closed_range_i128(self.lo_len as i128, self.hi_len as i128) as usize;
                    Some(self.draw(len, rng))
                }
                _ => None,
            };
            if let Some(v) = candidate {
                if v != bytes {
                    return Value::Bytes(v);
                }
            }
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        let raw_len = reader.read_varint_u64();
        let len = clamp_len(raw_len, self.lo_len, self.hi_len);
        Value::Bytes(reader.read_exact_padded(len))
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        let bytes = value.as_bytes();
        write_varint_u64(bytes.len() as u64, out);
        out.extend_from_slice(bytes);
    }

    fn detach(&self, value: &Value, _in_cycle: &InCycle) -> Value {
        value.clone()
    }

    fn to_debug_string(&self, _in_cycle: &InCycle) -> String {
        format!("Bytes[{}, {}]", self.lo_len, self.hi_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ChaChaPrng;

    fn mutator(lo: usize, hi: usize) -> ByteStringMutator {
        let annotations = AnnotationSet::none().with_size_range(lo, hi);
        ByteStringMutator::new(&TypePath::root(), &annotations).unwrap()
    }

    #[test]
    fn degenerate_size_range_is_a_construction_error() {
        let annotations = AnnotationSet::none().with_size_range(5, 2);
        let result = ByteStringMutator::new(&TypePath::root(), &annotations);
        assert!(matches!(result, Err(Error::AnnotationOutOfDomain { .. })));
    }

    #[test]
    fn init_length_always_within_bounds() {
        let m = mutator(2, 6);
        for seed in 0..200u64 {
            let mut rng = ChaChaPrng::from_seed(seed);
            let v = m.init(&mut rng);
            let len = v.as_bytes().len();
            assert!((2..=6).contains(&len));
        }
    }

    #[test]
    fn round_trip_on_values_produced_by_init() {
        let m = mutator(0, 32);
        let mut rng = ChaChaPrng::from_seed(9);
        for _ in 0..50 {
            let v = m.init(&mut rng);
            let mut out = Vec::new();
            m.write(&v, &mut out);
            let mut reader = ByteReader::new(&out);
            assert_eq!(m.read(&mut reader), v);
        }
    }

    #[test]
    fn mutate_respects_size_bounds_over_many_seeds() {
        let m = mutator(1, 4);
        let mut rng = ChaChaPrng::from_seed(42);
        let mut v = m.init(&mut rng);
        for _ in 0..500 {
            v = m.mutate(&v, &mut rng);
            let len = v.as_bytes().len();
            assert!((1..=4).contains(&len));
        }
    }

    #[test]
    fn mutate_never_returns_the_same_bytes() {
        let m = mutator(3, 10);
        let mut rng = ChaChaPrng::from_seed(13);
        let mut v = m.init(&mut rng);
        for _ in 0..200 {
            let mutated = m.mutate(&v, &mut rng);
            assert_ne!(mutated, v);
            v = mutated;
        }
    }

    #[test]
    fn read_on_short_input_zero_pads_tail() {
        let m = mutator(4, 4);
        let bytes = [4u8, 0xAB]; // varint(4), then only 1 data byte available
        let mut reader = ByteReader::new(&bytes);
        let v = m.read(&mut reader);
        assert_eq!(v.as_bytes(), &[0xAB, 0, 0, 0]);
    }

    #[test]
    fn clamp_len_stays_in_bounds_for_any_raw_value() {
        for raw in [0u64, 1, 1000, u64::MAX] {
            let len = clamp_len(raw, 2, 6);
            assert!((2..=6).contains(&len));
        }
    }
}
