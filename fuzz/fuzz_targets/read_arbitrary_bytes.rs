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

//! `read` must be total: any byte sequence, including truncated or empty
//! input, decodes to some in-domain value without panicking, and the
//! value it decodes to must itself `write`/`read` back unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mutagen_engine::codec::ByteReader;
use mutagen_engine::factory::standard_chain;
use mutagen_engine::type_ref::{AnnotationSet, IntWidth, TypeRef};

fn recursive_record() -> TypeRef {
    TypeRef::product(
        "Record",
        vec![
            (
                "id".to_string(),
                TypeRef::int(IntWidth::W32).annotated(AnnotationSet::none().with_range(Some(0), Some(1_000_000))),
            ),
            ("tags".to_string(), TypeRef::repeated(TypeRef::byte_string())),
            ("flag".to_string(), TypeRef::bool()),
            ("next".to_string(), TypeRef::optional(TypeRef::recursive("Record"))),
        ],
    )
}

fuzz_target!(|data: &[u8]| {
    let mutator = standard_chain().build_root(&recursive_record()).unwrap();

    let mut reader = ByteReader::new(data);
    let value = mutator.read(&mut reader);

    let mut bytes = Vec::new();
    mutator.write(&value, &mut bytes);
    let mut reread = ByteReader::new(&bytes);
    assert_eq!(mutator.read(&mut reread), value);
});
