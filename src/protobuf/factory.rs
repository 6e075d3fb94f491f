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

//! The descriptor-driven composite factory: walks a `FileDescriptorProto`'s
//! message types and builds a mutator tree for any one of them by fully
//! qualified name.
//!
//! Recursive messages are handled the same way `FactoryChain` handles a
//! directly recursive `product`/`sum`: a construction stack of in-progress
//! message names, and a pending map of `delayed` placeholders resolved once
//! the ancestor message finishes building.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use prost_types::{field_descriptor_proto, DescriptorProto, FieldDescriptorProto, FileDescriptorProto};

use crate::combinators::{DelayedMutator, FixedValueMutator, OptionalMutator, ProductMutator, RepeatedMutator, SumMutator};
use crate::error::{Error, Result, TypePath};
use crate::factory::{standard_chain, FactoryChain, DEFAULT_REPEATED_MAX};
use crate::mutator::Mutator;
use crate::type_ref::{FloatWidth, IntWidth, TypeRef};
use crate::value::Value;

use super::descriptor::{has_explicit_presence, is_map_entry, is_real_oneof_member, is_repeated, register_file};
use super::value::DynamicMessage;

fn field_name(field: &FieldDescriptorProto) -> &str {
    field.name.as_deref().unwrap_or("")
}

fn field_type_name(field: &FieldDescriptorProto) -> &str {
    field.type_name.as_deref().unwrap_or("")
}

fn oneof_name(msg: &DescriptorProto, idx: i32) -> &str {
    msg.oneof_decl[idx as usize].name.as_deref().unwrap_or("")
}

/// Builds mutator trees for the messages declared in a compiled `.proto`
/// file.
pub struct ProtobufFactory {
    messages: HashMap<String, DescriptorProto>,
    scalars: FactoryChain,
    stack: RefCell<Vec<String>>,
    pending: RefCell<HashMap<String, Vec<Rc<DelayedMutator>>>>,
}

impl ProtobufFactory {
    /// Register every message (including nested ones) declared in `file`.
    pub fn from_file(file: &FileDescriptorProto) -> Self {
        let mut messages = HashMap::new();
        register_file(&mut messages, file);
        Self {
            messages,
            scalars: standard_chain(),
            stack: RefCell::new(Vec::new()),
            pending: RefCell::new(HashMap::new()),
        }
    }

    /// The field names of `full_name`, in declaration order, for wrapping a
    /// built value as a [`DynamicMessage`]. Oneof groups collapse to one
    /// name (the `oneof`'s own), map fields keep their single field name.
    pub fn field_names(&self, full_name: &str) -> Result<Vec<String>> {
        let msg = self.lookup(full_name, &TypePath::root())?;
        Ok(self.declaration_order(msg))
    }

    /// Build a mutator tree for the message `full_name` names.
    pub fn build(&self, full_name: &str) -> Result<Box<dyn Mutator>> {
        let rc = self.build_message(full_name, &TypePath::root().child(full_name))?;
        Ok(Box::new(rc))
    }

    /// Wrap a value this factory's mutator produced as a named view.
    pub fn to_dynamic_message(&self, full_name: &str, value: Value) -> Result<DynamicMessage> {
        Ok(DynamicMessage::new(full_name, self.field_names(full_name)?, value))
    }

    fn lookup<'a>(&'a self, full_name: &str, path: &TypePath) -> Result<&'a DescriptorProto> {
        self.messages.get(full_name).ok_or_else(|| Error::UnsupportedDescriptor {
            path: path.clone(),
            reason: format!("unknown message type {full_name}"),
        })
    }

    /// Field names in the order `build_message` emits `Product` fields:
    /// plain/repeated/message fields in declaration order, each real oneof
    /// collapsed to a single slot named after the oneof, map fields kept as
    /// a single slot.
    fn declaration_order(&self, msg: &DescriptorProto) -> Vec<String> {
        let mut seen_oneofs = Vec::new();
        let mut names = Vec::new();
        for field in &msg.field {
            if is_real_oneof_member(field) {
                let idx = field.oneof_index.unwrap();
                if seen_oneofs.contains(&idx) {
                    continue;
                }
                seen_oneofs.push(idx);
                names.push(oneof_name(msg, idx).to_string());
            } else {
                names.push(field_name(field).to_string());
            }
        }
        names
    }

    fn build_message(&self, full_name: &str, path: &TypePath) -> Result<Rc<dyn Mutator>> {
        if self.stack.borrow().contains(&full_name.to_string()) {
            tracing::trace!(%path, message = full_name, "substituting delayed placeholder for recursive message");
            return Ok(self.substitute_delayed(path, full_name));
        }

        tracing::trace!(message = full_name, "building protobuf message");
        let msg = self.lookup(full_name, path)?.clone();
        self.stack.borrow_mut().push(full_name.to_string());
        let built = self.build_message_fields(full_name, &msg, path);
        self.stack.borrow_mut().pop();
        let built = built?;

        let rc: Rc<dyn Mutator> = Rc::from(built);
        if let Some(handles) = self.pending.borrow_mut().remove(full_name) {
            tracing::debug!(message = full_name, resolved = handles.len(), "resolving delayed placeholders");
            for handle in handles {
                handle.resolve(Rc::clone(&rc))?;
            }
        }
        Ok(rc)
    }

    /// Substitute a `delayed` placeholder for `full_name`, recording a
    /// fixup to run once the ancestor message currently under construction
    /// finishes. The same `Rc` is both stashed in `pending` and handed back
    /// to the caller, so resolving it later updates every placeholder built
    /// for this ancestor at once.
    fn substitute_delayed(&self, path: &TypePath, full_name: &str) -> Rc<dyn Mutator> {
        let placeholder = Rc::new(DelayedMutator::new(path.clone(), full_name.to_string()));
        self.pending
            .borrow_mut()
            .entry(full_name.to_string())
            .or_default()
            .push(Rc::clone(&placeholder));
        placeholder
    }

    fn build_message_fields(&self, full_name: &str, msg: &DescriptorProto, path: &TypePath) -> Result<Box<dyn Mutator>> {
        let mut fields: Vec<(String, Box<dyn Mutator>)> = Vec::new();
        let mut built_oneofs = Vec::new();

        for field in &msg.field {
            let field_path = path.child(field_name(field));

            if is_real_oneof_member(field) {
                let idx = field.oneof_index.unwrap();
                if built_oneofs.contains(&idx) {
                    continue;
                }
                built_oneofs.push(idx);
                let oneof_field_name = oneof_name(msg, idx).to_string();
                let members: Vec<&FieldDescriptorProto> = msg
                    .field
                    .iter()
                    .filter(|f| f.oneof_index == Some(idx) && is_real_oneof_member(f))
                    .collect();
                let mut variants = Vec::with_capacity(members.len() + 1);
                for member in &members {
                    let member_path = path.variant(field_name(member));
                    let inner = self.build_field_type(member, &member_path)?;
                    variants.push((field_name(member).to_string(), inner));
                }
                variants.push((
                    "_unset".to_string(),
                    Box::new(FixedValueMutator::new(Value::Optional(None))) as Box<dyn Mutator>,
                ));
                fields.push((oneof_field_name.clone(), Box::new(SumMutator::new(oneof_field_name, variants))));
                continue;
            }

            if self.is_map_field(field) {
                let entry = self.map_entry(field, &field_path)?;
                let key_field = &entry.field[0];
                let value_field = &entry.field[1];
                let key = self.build_field_type(key_field, &field_path.child("key"))?;
                let value = self.build_field_type(value_field, &field_path.child("value"))?;
                let map = super::map_field::MapFieldMutator::new(key, value, 0, DEFAULT_REPEATED_MAX);
                fields.push((field_name(field).to_string(), Box::new(map)));
                continue;
            }

            if is_repeated(field) {
                let inner = self.build_field_type(field, &field_path.element())?;
                let repeated = RepeatedMutator::new(&field_path, inner, 0, DEFAULT_REPEATED_MAX)?;
                fields.push((field_name(field).to_string(), Box::new(repeated)));
                continue;
            }

            let inner = self.build_field_type(field, &field_path)?;
            let is_message = field.r#type() == field_descriptor_proto::Type::Message;
            if is_message || has_explicit_presence(field) {
                fields.push((field_name(field).to_string(), Box::new(OptionalMutator::new(inner, false))));
            } else {
                fields.push((field_name(field).to_string(), inner));
            }
        }

        Ok(Box::new(ProductMutator::new(full_name.to_string(), fields)))
    }

    fn is_map_field(&self, field: &FieldDescriptorProto) -> bool {
        if field.r#type() != field_descriptor_proto::Type::Message || !is_repeated(field) {
            return false;
        }
        self.messages
            .get(field_type_name(field))
            .map(is_map_entry)
            .unwrap_or(false)
    }

    fn map_entry(&self, field: &FieldDescriptorProto, path: &TypePath) -> Result<DescriptorProto> {
        self.messages
            .get(field_type_name(field))
            .cloned()
            .ok_or_else(|| Error::UnsupportedDescriptor {
                path: path.clone(),
                reason: format!("unresolved map entry type {}", field_type_name(field)),
            })
    }

    fn build_field_type(&self, field: &FieldDescriptorProto, path: &TypePath) -> Result<Box<dyn Mutator>> {
        use field_descriptor_proto::Type;
        match field.r#type() {
            Type::Bool => self.scalars.build(&TypeRef::bool(), path),
            Type::Int32 | Type::Sint32 | Type::Sfixed32 => self.scalars.build(&TypeRef::int(IntWidth::W32), path),
            Type::Int64 | Type::Sint64 | Type::Sfixed64 => self.scalars.build(&TypeRef::int(IntWidth::W64), path),
            Type::Uint32 | Type::Fixed32 => self.scalars.build(&TypeRef::uint(IntWidth::W32), path),
            Type::Uint64 | Type::Fixed64 => self.scalars.build(&TypeRef::uint(IntWidth::W64), path),
            Type::Float => self.scalars.build(&TypeRef::float(FloatWidth::W32), path),
            Type::Double => self.scalars.build(&TypeRef::float(FloatWidth::W64), path),
            // Enum value sets aren't modeled; treated as an unconstrained
            // 32-bit signed integer (see DESIGN.md).
            Type::Enum => self.scalars.build(&TypeRef::int(IntWidth::W32), path),
            Type::String | Type::Bytes => self.scalars.build(&TypeRef::byte_string(), path),
            Type::Message => {
                let rc = self.build_message(field_type_name(field), path)?;
                Ok(Box::new(rc))
            }
            Type::Group => Err(Error::UnsupportedDescriptor {
                path: path.clone(),
                reason: "group encoding is deprecated and unsupported".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ByteReader;
    use crate::random::ChaChaPrng;
    use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};

    fn scalar_field(name: &str, number: i32, ty: field_descriptor_proto::Type) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            label: Some(field_descriptor_proto::Label::Optional as i32),
            r#type: Some(ty as i32),
            ..Default::default()
        }
    }

    fn point_file() -> FileDescriptorProto {
        FileDescriptorProto {
            package: Some("pkg".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Point".to_string()),
                field: vec![
                    scalar_field("x", 1, field_descriptor_proto::Type::Int32),
                    scalar_field("y", 2, field_descriptor_proto::Type::Int32),
                ],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn builds_a_flat_message() {
        let factory = ProtobufFactory::from_file(&point_file());
        let m = factory.build(".pkg.Point").unwrap();
        let mut rng = ChaChaPrng::from_seed(1);
        let v = m.init(&mut rng);
        assert_eq!(v.as_product().len(), 2);
        let names = factory.field_names(".pkg.Point").unwrap();
        assert_eq!(names, vec!["x".to_string(), "y".to_string()]);
    }

    fn recursive_list_file() -> FileDescriptorProto {
        let mut next = scalar_field("next", 2, field_descriptor_proto::Type::Message);
        next.type_name = Some(".pkg.List".to_string());
        FileDescriptorProto {
            package: Some("pkg".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("List".to_string()),
                field: vec![scalar_field("value", 1, field_descriptor_proto::Type::Int32), next],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn builds_a_recursive_message() {
        let factory = ProtobufFactory::from_file(&recursive_list_file());
        let m = factory.build(".pkg.List").unwrap();
        let mut rng = ChaChaPrng::from_seed(4);
        let v = m.init(&mut rng);
        let mut out = Vec::new();
        m.write(&v, &mut out);
        let mut reader = ByteReader::new(&out);
        assert_eq!(m.read(&mut reader), v);
    }

    fn oneof_file() -> FileDescriptorProto {
        let mut x = scalar_field("x", 1, field_descriptor_proto::Type::Bool);
        x.oneof_index = Some(0);
        let mut y = scalar_field("y", 2, field_descriptor_proto::Type::Int32);
        y.oneof_index = Some(0);
        FileDescriptorProto {
            package: Some("pkg".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Choice".to_string()),
                field: vec![x, y],
                oneof_decl: vec![prost_types::OneofDescriptorProto {
                    name: Some("pick".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn oneof_collapses_to_one_named_field() {
        let factory = ProtobufFactory::from_file(&oneof_file());
        let names = factory.field_names(".pkg.Choice").unwrap();
        assert_eq!(names, vec!["pick".to_string()]);
        let m = factory.build(".pkg.Choice").unwrap();
        let mut rng = ChaChaPrng::from_seed(2);
        let v = m.init(&mut rng);
        assert_eq!(v.as_product().len(), 1);
    }

    fn map_file() -> FileDescriptorProto {
        let mut key = scalar_field("key", 1, field_descriptor_proto::Type::Int32);
        key.label = Some(field_descriptor_proto::Label::Optional as i32);
        let mut value = scalar_field("value", 2, field_descriptor_proto::Type::Bool);
        value.label = Some(field_descriptor_proto::Label::Optional as i32);
        let entry = DescriptorProto {
            name: Some("CountsEntry".to_string()),
            field: vec![key, value],
            options: Some(prost_types::MessageOptions {
                map_entry: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut counts = scalar_field("counts", 1, field_descriptor_proto::Type::Message);
        counts.label = Some(field_descriptor_proto::Label::Repeated as i32);
        counts.type_name = Some(".pkg.Counters.CountsEntry".to_string());
        FileDescriptorProto {
            package: Some("pkg".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Counters".to_string()),
                field: vec![counts],
                nested_type: vec![entry],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn map_field_builds_as_a_single_named_slot() {
        let factory = ProtobufFactory::from_file(&map_file());
        let names = factory.field_names(".pkg.Counters").unwrap();
        assert_eq!(names, vec!["counts".to_string()]);
        let m = factory.build(".pkg.Counters").unwrap();
        let mut rng = ChaChaPrng::from_seed(5);
        let v = m.init(&mut rng);
        let mut out = Vec::new();
        m.write(&v, &mut out);
        let mut reader = ByteReader::new(&out);
        assert_eq!(m.read(&mut reader), v);
    }
}
