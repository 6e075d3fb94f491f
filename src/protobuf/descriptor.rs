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

//! Descriptor-walking helpers: registering a `FileDescriptorProto`'s
//! message types (including nested ones) by fully-qualified name, and
//! classifying individual fields.

use std::collections::HashMap;

use prost_types::{field_descriptor_proto, DescriptorProto, FileDescriptorProto};

/// Registers every message in `file`, including nested types, keyed by
/// fully-qualified name (`.package.Outer.Inner`), matching the `type_name`
/// protoc emits on fields that reference them.
pub fn register_file(messages: &mut HashMap<String, DescriptorProto>, file: &FileDescriptorProto) {
    let package = file
        .package
        .as_deref()
        .map(|p| format!(".{p}"))
        .unwrap_or_default();
    for msg in &file.message_type {
        register_message(messages, &package, msg);
    }
}

fn register_message(messages: &mut HashMap<String, DescriptorProto>, prefix: &str, msg: &DescriptorProto) {
    let name = msg.name.clone().unwrap_or_default();
    let full_name = format!("{prefix}.{name}");
    for nested in &msg.nested_type {
        register_message(messages, &full_name, nested);
    }
    messages.insert(full_name, msg.clone());
}

/// Whether `msg` is the compiler-synthesized entry type for a `map<K, V>`
/// field (a two-field `key`/`value` message marked `map_entry` in its
/// options).
pub fn is_map_entry(msg: &DescriptorProto) -> bool {
    msg.options.as_ref().and_then(|o| o.map_entry).unwrap_or(false)
}

/// Whether `field` is a real (explicit, user-written) `oneof` member, as
/// opposed to the synthetic one-field oneof proto3 generates for an
/// `optional` scalar field.
pub fn is_real_oneof_member(field: &prost_types::FieldDescriptorProto) -> bool {
    field.oneof_index.is_some() && !field.proto3_optional.unwrap_or(false)
}

/// Whether `field` is `repeated` (and not a map — callers should check
/// [`is_map_entry`] on the referenced message first for message-typed
/// fields).
pub fn is_repeated(field: &prost_types::FieldDescriptorProto) -> bool {
    field.label() == field_descriptor_proto::Label::Repeated
}

/// Whether `field` carries explicit presence tracking (proto3's
/// `optional` keyword, or any proto2 singular scalar).
pub fn has_explicit_presence(field: &prost_types::FieldDescriptorProto) -> bool {
    field.proto3_optional.unwrap_or(false)
}
