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

//! Deterministic pseudo-random abstraction.
//!
//! Every sampling method is a pure function of the generator's internal
//! state and the arguments given to it; a fresh instance seeded with the
//! same seed produces the same sequence. Mutators are driven exclusively
//! through the [`Prng`] trait so tests can swap in a scripted source and
//! assert on exact decisions (bit positions, tag switches, special-value
//! selection) rather than statistical properties alone.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// High-level sampling primitives the mutation engine is built on.
///
/// No operation may suspend, allocate unboundedly, or touch state outside
/// `self`. Implementations must be deterministic: the same sequence of
/// calls against a generator constructed from the same seed always
/// produces the same sequence of results.
pub trait Prng {
    /// Returns `v` with `lo <= v <= hi`, uniformly, without overflow even
    /// when the range spans the full signed 64-bit domain.
    fn closed_range_i128(&mut self, lo: i128, hi: i128) -> i128;

    /// Returns `i` with `0 <= i < n`. Panics if `n == 0` — callers must not
    /// invoke this on an empty domain (see `Error::EmptyRange` at the
    /// mutator-contract boundary, which is where this is normally guarded).
    fn index_in(&mut self, n: usize) -> usize;

    /// Uniform boolean.
    fn choice(&mut self) -> bool;

    /// Returns `true` with probability `1/n`. Panics if `n == 0`.
    fn true_in_one_out_of(&mut self, n: u32) -> bool;

    /// Fills and returns `n` uniform random bytes.
    fn bytes(&mut self, n: usize) -> Vec<u8>;

    /// A uniform sample in `[0.0, 1.0)`, used for weight checks like the
    /// 1/4 bit-flip probability in the integral mutator.
    fn unit_interval(&mut self) -> f64;

    /// Uniform element of a finite, non-empty sequence.
    fn pick_in<'a, T>(&mut self, xs: &'a [T]) -> &'a T {
        &xs[self.index_in(xs.len())]
    }
}

/// Production [`Prng`] backed by a seeded [`ChaCha8Rng`].
///
/// Matches the teacher's entropy source choice (`rand` + `rand_chacha`):
/// ChaCha8 is fast, has no known statistical weaknesses for this use, and
/// seeding from a `u64` gives byte-for-byte reproducible mutation sequences
/// across runs and platforms.
#[derive(Debug, Clone)]
pub struct ChaChaPrng {
    rng: ChaCha8Rng,
}

impl ChaChaPrng {
    /// Construct a generator seeded deterministically from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Construct a generator seeded from OS entropy (non-reproducible).
    pub fn from_os_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }
}

impl Prng for ChaChaPrng {
    fn closed_range_i128(&mut self, lo: i128, hi: i128) -> i128 {
        assert!(lo <= hi, "closed_range_i128: lo > hi");
        if lo == hi {
            return lo;
        }
        // width may exceed u64::MAX (e.g. the full i128 domain is never
        // actually used by the integral mutator, which folds to i128
        // internally but never spans more than a u64-wide natural limit).
        let width = (hi - lo) as u128 + 1;
        if width == 0 {
            // the range covers the entire i128 domain; any draw is in range.
            return self.rng.random::<i128>();
        }
        let offset = self.rng.random_range(0..width);
        lo + offset as i128
    }

    fn index_in(&mut self, n: usize) -> usize {
        assert!(n > 0, "index_in: n must be > 0");
        self.rng.random_range(0..n)
    }

    fn choice(&mut self) -> bool {
        self.rng.random()
    }

    fn true_in_one_out_of(&mut self, n: u32) -> bool {
        assert!(n >= 1, "true_in_one_out_of: n must be >= 1");
        self.rng.random_range(0..n) == 0
    }

    fn bytes(&mut self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        self.rng.fill_bytes(&mut buf);
        buf
    }

    fn unit_interval(&mut self) -> f64 {
        self.rng.random()
    }
}

/// Test-only scripted [`Prng`] that replays a fixed sequence of decisions.
///
/// Grounded in the `rand` crate's own `rngs::mock::StepRng` test helper:
/// rather than asserting on statistical properties, a scripted source lets
/// a test force a specific branch (e.g. "the bit-flip path, bit 7") and
/// assert on the exact output the spec's concrete scenarios describe.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct StepPrng {
    i128_script: std::collections::VecDeque<i128>,
    index_script: std::collections::VecDeque<usize>,
    bool_script: std::collections::VecDeque<bool>,
    unit_script: std::collections::VecDeque<f64>,
    bytes_script: std::collections::VecDeque<Vec<u8>>,
}

#[cfg(any(test, feature = "testing"))]
impl StepPrng {
    /// A fresh scripted source with empty queues; push expectations with
    /// the `push_*` methods before handing it to a mutator under test.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next `closed_range_i128` result.
    pub fn push_i128(&mut self, v: i128) -> &mut Self {
        self.i128_script.push_back(v);
        self
    }

    /// Queue the next `index_in` result.
    pub fn push_index(&mut self, v: usize) -> &mut Self {
        self.index_script.push_back(v);
        self
    }

    /// Queue the next `choice`/`true_in_one_out_of` result.
    pub fn push_bool(&mut self, v: bool) -> &mut Self {
        self.bool_script.push_back(v);
        self
    }

    /// Queue the next `unit_interval` result.
    pub fn push_unit(&mut self, v: f64) -> &mut Self {
        self.unit_script.push_back(v);
        self
    }

    /// Queue the next `bytes` result.
    pub fn push_bytes(&mut self, v: Vec<u8>) -> &mut Self {
        self.bytes_script.push_back(v);
        self
    }
}

#[cfg(any(test, feature = "testing"))]
impl Prng for StepPrng {
    fn closed_range_i128(&mut self, lo: i128, hi: i128) -> i128 {
        let v = self
            .i128_script
            .pop_front()
            .expect("StepPrng: closed_range_i128 script exhausted");
        assert!(v >= lo && v <= hi, "scripted value {v} out of [{lo}, {hi}]");
        v
    }

    fn index_in(&mut self, n: usize) -> usize {
        assert!(n > 0, "index_in: n must be > 0");
        let v = self
            .index_script
            .pop_front()
            .expect("StepPrng: index_in script exhausted");
        assert!(v < n, "scripted index {v} out of range [0, {n})");
        v
    }

    fn choice(&mut self) -> bool {
        self.bool_script
            .pop_front()
            .expect("StepPrng: choice script exhausted")
    }

    fn true_in_one_out_of(&mut self, n: u32) -> bool {
        assert!(n >= 1);
        self.bool_script
            .pop_front()
            .expect("StepPrng: true_in_one_out_of script exhausted")
    }

    fn bytes(&mut self, n: usize) -> Vec<u8> {
        let v = self
            .bytes_script
            .pop_front()
            .expect("StepPrng: bytes script exhausted");
        assert_eq!(v.len(), n);
        v
    }

    fn unit_interval(&mut self) -> f64 {
        self.unit_script
            .pop_front()
            .expect("StepPrng: unit_interval script exhausted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chacha_prng_is_deterministic_for_same_seed() {
        let mut a = ChaChaPrng::from_seed(7);
        let mut b = ChaChaPrng::from_seed(7);
        for _ in 0..64 {
            assert_eq!(a.closed_range_i128(-1000, 1000), b.closed_range_i128(-1000, 1000));
        }
    }

    #[test]
    fn chacha_prng_closed_range_stays_in_bounds() {
        let mut rng = ChaChaPrng::from_seed(1234);
        for _ in 0..10_000 {
            let v = rng.closed_range_i128(-10, 10);
            assert!((-10..=10).contains(&v));
        }
        let v = rng.closed_range_i128(5, 5);
        assert_eq!(v, 5);
    }

    #[test]
    fn chacha_prng_full_u64_domain_does_not_overflow() {
        let mut rng = ChaChaPrng::from_seed(99);
        for _ in 0..1000 {
            let v = rng.closed_range_i128(i64::MIN as i128, i64::MAX as i128);
            assert!(v >= i64::MIN as i128 && v <= i64::MAX as i128);
        }
    }

    #[test]
    #[should_panic]
    fn index_in_zero_panics() {
        let mut rng = ChaChaPrng::from_seed(0);
        rng.index_in(0);
    }
}
