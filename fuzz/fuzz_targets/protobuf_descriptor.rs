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

//! Feeds arbitrary bytes through `prost`'s own `FileDescriptorProto`
//! decoder, then hands whatever comes out to `ProtobufFactory`. A
//! malformed but structurally valid descriptor (self-referential map
//! entries, dangling `type_name`s, oneofs with no members) must fail
//! construction cleanly, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mutagen_engine::protobuf::ProtobufFactory;
use mutagen_engine::random::ChaChaPrng;
use prost::Message;
use prost_types::FileDescriptorProto;

fuzz_target!(|data: &[u8]| {
    let Ok(file) = FileDescriptorProto::decode(data) else {
        return;
    };
    let factory = ProtobufFactory::from_file(&file);
    for msg in &file.message_type {
        let Some(name) = &msg.name else { continue };
        let package = file.package.as_deref().map(|p| format!(".{p}")).unwrap_or_default();
        let full_name = format!("{package}.{name}");
        if let Ok(mutator) = factory.build(&full_name) {
            let mut rng = ChaChaPrng::from_seed(1);
            let value = mutator.init(&mut rng);
            let mut bytes = Vec::new();
            mutator.write(&value, &mut bytes);
        }
    }
});
