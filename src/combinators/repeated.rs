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

//! `repeated`: a variable-length, size-bounded, homogeneous sequence.

use crate::codec::{write_varint_u64, ByteReader};
use crate::error::{Error, Result, TypePath};
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::TypeRef;
use crate::value::Value;

fn clamp_len(raw: u64, lo: usize, hi: usize) -> usize {
    (raw as usize).clamp(lo, hi)
}

/// A sequence mutator bounded to `[sizeMin, sizeMax]` elements.
pub struct RepeatedMutator {
    type_ref: TypeRef,
    inner: Box<dyn Mutator>,
    lo_len: usize,
    hi_len: usize,
}

impl RepeatedMutator {
    /// Build a repeated mutator over `inner`, bounded to `[lo_len, hi_len]`
    /// elements inclusive.
    pub fn new(path: &TypePath, inner: Box<dyn Mutator>, lo_len: usize, hi_len: usize) -> Result<Self> {
        if lo_len > hi_len {
            return Err(Error::AnnotationOutOfDomain {
                path: path.clone(),
                reason: format!("SizeRange[{lo_len}, {hi_len}] has min > max"),
            });
        }
        Ok(Self {
            type_ref: TypeRef::repeated(inner.type_ref().clone()),
            inner,
            lo_len,
            hi_len,
        })
    }
}

impl std::fmt::Debug for RepeatedMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepeatedMutator")
            .field("lo_len", &self.lo_len)
            .field("hi_len", &self.hi_len)
            .finish()
    }
}

impl Mutator for RepeatedMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        false
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        let len = rng.closed_range_i128(self.lo_len as i128, self.hi_len as i128) as usize;
        Value::Repeated((0..len).map(|_| self.inner.init(rng)).collect())
    }

    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value {
        let elements = value.as_repeated().to_vec();
        if self.lo_len == self.hi_len && self.hi_len == 0 {
            return Value::Repeated(elements);
        }
        loop {
            let op = rng.index_in(5);
            let candidate = match op {
                0 if elements.len() < self.hi_len => {
                    let mut v = elements.clone();
                    v.push(self.inner.init(rng));
                    Some(v)
                }
                1 if elements.len() > self.lo_len && !elements.is_empty() => {
                    let pos = rng.index_in(elements.len());
                    let mut v = elements.clone();
                    v.remove(pos);
                    Some(v)
                }
                2 if !elements.is_empty() && elements.len() < self.hi_len => {
                    let pos = rng.index_in(elements.len());
                    let mut v = elements.clone();
                    v.insert(pos, elements[pos].clone());
                    Some(v)
                }
                3 if elements.len() >= 2 => {
                    let pos = rng.index_in(elements.len() - 1);
                    let mut v = elements.clone();
                    v.swap(pos, pos + 1);
                    Some(v)
                }
                4 if !elements.is_empty() => {
                    let pos = rng.index_in(elements.len());
                    let mut v = elements.clone();
                    v[pos] = self.inner.mutate(&v[pos], rng);
                    Some(v)
                }
                _ => None,
            };
            if let Some(v) = candidate {
                if v != elements {
                    return Value::Repeated(v);
                }
            }
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        let raw_len = reader.read_varint_u64();
        let len = clamp_len(raw_len, self.lo_len, self.hi_len);
        Value::Repeated((0..len).map(|_| self.inner.read(reader)).collect())
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        let elements = value.as_repeated();
        write_varint_u64(elements.len() as u64, out);
        for e in elements {
            self.inner.write(e, out);
        }
    }

    fn detach(&self, value: &Value, in_cycle: &InCycle) -> Value {
        Value::Repeated(
            value
                .as_repeated()
                .iter()
                .map(|e| self.inner.detach(e, in_cycle))
                .collect(),
        )
    }

    fn to_debug_string(&self, in_cycle: &InCycle) -> String {
        format!(
            "Repeated[{}, {}]<{}>",
            self.lo_len,
            self.hi_len,
            self.inner.to_debug_string(in_cycle)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutators::IntegralMutator;
    use crate::random::ChaChaPrng;
    use crate::type_ref::{AnnotationSet, IntWidth};

    fn sample(lo: usize, hi: usize) -> RepeatedMutator {
        let annotations = AnnotationSet::none().with_range(Some(0), Some(100));
        let elem = IntegralMutator::new(&TypePath::root(), IntWidth::W32, true, &annotations).unwrap();
        RepeatedMutator::new(&TypePath::root(), Box::new(elem), lo, hi).unwrap()
    }

    #[test]
    fn degenerate_size_range_is_a_construction_error() {
        let annotations = AnnotationSet::none();
        let elem = IntegralMutator::new(&TypePath::root(), IntWidth::W32, true, &annotations).unwrap();
        let result = RepeatedMutator::new(&TypePath::root(), Box::new(elem), 5, 2);
        assert!(matches!(result, Err(Error::AnnotationOutOfDomain { .. })));
    }

    #[test]
    fn init_length_within_bounds() {
        let m = sample(1, 5);
        for seed in 0..100u64 {
            let mut rng = ChaChaPrng::from_seed(seed);
            let v = m.init(&mut rng);
            let len = v.as_repeated().len();
            assert!((1..=5).contains(&len));
        }
    }

    #[test]
    fn mutate_respects_bounds_over_many_seeds() {
        let m = sample(1, 4);
        let mut rng = ChaChaPrng::from_seed(21);
        let mut v = m.init(&mut rng);
        for _ in 0..500 {
            v = m.mutate(&v, &mut rng);
            let len = v.as_repeated().len();
            assert!((1..=4).contains(&len));
        }
    }

    #[test]
    fn round_trip() {
        let m = sample(0, 6);
        let mut rng = ChaChaPrng::from_seed(4);
        for _ in 0..50 {
            let v = m.init(&mut rng);
            let mut out = Vec::new();
            m.write(&v, &mut out);
            let mut reader = ByteReader::new(&out);
            assert_eq!(m.read(&mut reader), v);
        }
    }

    #[test]
    fn mutate_never_returns_the_same_sequence() {
        let m = sample(2, 8);
        let mut rng = ChaChaPrng::from_seed(64);
        let mut v = m.init(&mut rng);
        for _ in 0..200 {
            let mutated = m.mutate(&v, &mut rng);
            assert_ne!(mutated, v);
            v = mutated;
        }
    }

    #[test]
    fn clamp_len_stays_in_bounds() {
        for raw in [0u64, 7, u64::MAX] {
            assert!((1..=9).contains(&clamp_len(raw, 1, 9)));
        }
    }

    #[test]
    fn clamp_len_saturates_rather_than_wraps() {
        // sizeMax = 3: a raw length of 5 must clamp to 3, not wrap to 1.
        assert_eq!(clamp_len(5, 0, 3), 3);
    }

    #[test]
    fn read_with_size_range_clamps_an_oversized_varint_length() {
        let m = sample(0, 3);
        let mut bytes = Vec::new();
        write_varint_u64(5, &mut bytes);
        let mut reader = ByteReader::new(&bytes);
        let v = m.read(&mut reader);
        assert_eq!(v.as_repeated().len(), 3);
    }
}
