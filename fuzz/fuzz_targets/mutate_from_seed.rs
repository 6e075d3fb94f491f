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

//! `init` then repeated `mutate` over a tagged-union/record mix, driven by
//! a PRNG seeded straight from fuzzer-supplied bytes. Looks for panics
//! across the whole reachable combinator surface (product, sum, optional,
//! repeated) rather than any single leaf mutator.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mutagen_engine::factory::standard_chain;
use mutagen_engine::random::ChaChaPrng;
use mutagen_engine::type_ref::{AnnotationSet, IntWidth, TypeRef};

fn event() -> TypeRef {
    TypeRef::sum(
        "Event",
        vec![
            (
                "click".to_string(),
                TypeRef::product(
                    "Click",
                    vec![
                        ("x".to_string(), TypeRef::int(IntWidth::W16).annotated(AnnotationSet::none().with_range(Some(0), Some(4096)))),
                        ("y".to_string(), TypeRef::int(IntWidth::W16).annotated(AnnotationSet::none().with_range(Some(0), Some(4096)))),
                    ],
                ),
            ),
            (
                "key".to_string(),
                TypeRef::optional(TypeRef::byte_string()),
            ),
            (
                "batch".to_string(),
                TypeRef::repeated(TypeRef::bool()).annotated(AnnotationSet::none().with_size_range(0, 32)),
            ),
        ],
    )
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let seed = u64::from_le_bytes(data[..8].try_into().unwrap());
    let mutator = standard_chain().build_root(&event()).unwrap();
    let mut rng = ChaChaPrng::from_seed(seed);

    let mut value = mutator.init(&mut rng);
    let steps = (data.len() - 8).min(256);
    for _ in 0..steps {
        value = mutator.mutate(&value, &mut rng);
        let mut bytes = Vec::new();
        mutator.write(&value, &mut bytes);
    }
});
