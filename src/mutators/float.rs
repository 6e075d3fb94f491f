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

//! IEEE-754 floating-point mutation: special-value injection, single-bit
//! flips across the exponent/mantissa, and uniform bit-pattern draws.

use crate::codec::ByteReader;
use crate::mutator::{InCycle, Mutator};
use crate::random::Prng;
use crate::type_ref::{FloatWidth, TypeKind, TypeRef};
use crate::value::Value;

fn canonical_bits(width: FloatWidth, v: f64) -> u64 {
    match width {
        FloatWidth::W32 => (v as f32).to_bits() as u64,
        FloatWidth::W64 => v.to_bits(),
    }
}

fn bits_to_value(width: FloatWidth, bits: u64) -> f64 {
    match width {
        FloatWidth::W32 => f32::from_bits(bits as u32) as f64,
        FloatWidth::W64 => f64::from_bits(bits),
    }
}

fn special_values(width: FloatWidth) -> Vec<f64> {
    match width {
        FloatWidth::W32 => vec![
            0.0,
            -0.0,
            1.0,
            -1.0,
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f32::MIN as f64,
            f32::MAX as f64,
        ],
        FloatWidth::W64 => vec![
            0.0,
            -0.0,
            1.0,
            -1.0,
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::MIN,
            f64::MAX,
        ],
    }
}

/// A mutator over IEEE-754 floats of a fixed width.
///
/// Unlike the integral mutator, this type takes no range annotation: the
/// spec's float domain is the full set of width-representable bit patterns,
/// including the non-finite ones.
#[derive(Debug)]
pub struct FloatMutator {
    type_ref: TypeRef,
    width: FloatWidth,
    special_values: Vec<f64>,
}

impl FloatMutator {
    /// Construct a mutator for the given IEEE-754 width.
    pub fn new(width: FloatWidth) -> Self {
        Self {
            type_ref: TypeRef::new(TypeKind::Float { width }),
            width,
            special_values: special_values(width),
        }
    }

    fn bits(&self, v: f64) -> u64 {
        canonical_bits(self.width, v)
    }

    fn from_bits(&self, bits: u64) -> f64 {
        bits_to_value(self.width, bits)
    }

    fn bit_count(&self) -> u32 {
        self.width.byte_len() as u32 * 8
    }

    fn uniform(&self, rng: &mut dyn Prng) -> f64 {
        let raw = rng.bytes(self.width.byte_len());
        let mut bits: u64 = 0;
        for b in &raw {
            bits = (bits << 8) | *b as u64;
        }
        self.from_bits(bits)
    }

    fn bit_flip(&self, v: f64, rng: &mut dyn Prng) -> f64 {
        let bits = self.bits(v);
        let pos = rng.index_in(self.bit_count() as usize) as u32;
        self.from_bits(bits ^ (1u64 << pos))
    }

    fn jump_to_special(&self, rng: &mut dyn Prng) -> f64 {
        *rng.pick_in(&self.special_values)
    }
}

impl Mutator for FloatMutator {
    fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    fn has_fixed_size(&self) -> bool {
        true
    }

    fn init(&self, rng: &mut dyn Prng) -> Value {
        let slot_count = self.special_values.len() + 1;
        let idx = rng.index_in(slot_count);
        let v = if idx < self.special_values.len() {
            self.special_values[idx]
        } else {
            self.uniform(rng)
        };
        Value::Float(v)
    }

    fn mutate(&self, value: &Value, rng: &mut dyn Prng) -> Value {
        let v = value.as_float();
        let before = self.bits(v);
        loop {
            let candidate = if rng.true_in_one_out_of(4) {
                self.jump_to_special(rng)
            } else if rng.choice() {
                self.bit_flip(v, rng)
            } else {
                self.uniform(rng)
            };
            if self.bits(candidate) != before {
                return Value::Float(candidate);
            }
        }
    }

    fn read(&self, reader: &mut ByteReader<'_>) -> Value {
        let bytes = reader.read_exact_padded(self.width.byte_len());
        let mut bits: u64 = 0;
        for b in &bytes {
            bits = (bits << 8) | *b as u64;
        }
        Value::Float(self.from_bits(bits))
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) {
        let bits = self.bits(value.as_float());
        let len = self.width.byte_len();
        for i in (0..len).rev() {
            out.push(((bits >> (i * 8)) & 0xff) as u8);
        }
    }

    fn detach(&self, value: &Value, _in_cycle: &InCycle) -> Value {
        value.clone()
    }

    fn to_debug_string(&self, _in_cycle: &InCycle) -> String {
        format!("Float{}", self.bit_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ChaChaPrng, StepPrng};

    #[test]
    fn init_special_value_zero() {
        let m = FloatMutator::new(FloatWidth::W64);
        let mut rng = StepPrng::new();
        rng.push_index(0);
        assert_eq!(m.init(&mut rng), Value::Float(0.0));
    }

    #[test]
    fn write_then_read_positive_one_round_trips() {
        let m = FloatMutator::new(FloatWidth::W64);
        let mut out = Vec::new();
        m.write(&Value::Float(1.0), &mut out);
        assert_eq!(out.len(), 8);
        let mut reader = ByteReader::new(&out);
        assert_eq!(m.read(&mut reader), Value::Float(1.0));
    }

    #[test]
    fn f32_width_writes_four_bytes() {
        let m = FloatMutator::new(FloatWidth::W32);
        let mut out = Vec::new();
        m.write(&Value::Float(2.5), &mut out);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn mutate_bit_flip_changes_bit_pattern() {
        let m = FloatMutator::new(FloatWidth::W64);
        let mut rng = StepPrng::new();
        rng.push_bool(false); // not the special-value jump
        rng.push_bool(true); // bit-flip branch
        rng.push_index(0); // flip the lowest mantissa bit
        let result = m.mutate(&Value::Float(1.0), &mut rng);
        assert_ne!(result.as_float().to_bits(), 1.0f64.to_bits());
    }

    #[test]
    fn mutate_never_returns_the_same_bit_pattern_over_many_seeds() {
        let m = FloatMutator::new(FloatWidth::W64);
        for seed in 0..200u64 {
            let mut rng = ChaChaPrng::from_seed(seed);
            let v = m.init(&mut rng);
            let mutated = m.mutate(&v, &mut rng);
            assert_ne!(v.as_float().to_bits(), mutated.as_float().to_bits());
        }
    }

    #[test]
    fn nan_round_trips_by_bit_pattern() {
        let m = FloatMutator::new(FloatWidth::W64);
        let mut out = Vec::new();
        m.write(&Value::Float(f64::NAN), &mut out);
        let mut reader = ByteReader::new(&out);
        let decoded = m.read(&mut reader);
        assert_eq!(decoded.as_float().to_bits(), f64::NAN.to_bits());
    }

    #[test]
    fn decode_is_total_for_arbitrary_bytes() {
        let m = FloatMutator::new(FloatWidth::W32);
        let bytes = [0xFFu8; 4];
        let mut reader = ByteReader::new(&bytes);
        let _ = m.read(&mut reader); // must not panic
    }
}
