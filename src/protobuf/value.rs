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

//! A thin, named-field view over a message's [`Value::Product`], handed
//! to harnesses instead of the bare positional [`Value`].

use crate::value::Value;

/// A decoded protobuf message: field names (declaration order) paired
/// with the positional [`Value::Product`] a [`crate::mutator::Mutator`]
/// produces.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    full_name: String,
    field_names: Vec<String>,
    value: Value,
}

impl DynamicMessage {
    /// Wrap `value` (must be a `Value::Product` with `field_names.len()`
    /// entries) as a named view.
    pub fn new(full_name: impl Into<String>, field_names: Vec<String>, value: Value) -> Self {
        debug_assert_eq!(value.as_product().len(), field_names.len());
        Self {
            full_name: full_name.into(),
            field_names,
            value,
        }
    }

    /// The message type's fully-qualified protobuf name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Look up a field's current value by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let idx = self.field_names.iter().position(|n| n == name)?;
        self.value.as_product().get(idx)
    }

    /// Replace a field's value by name. No-op if `name` isn't a field of
    /// this message.
    pub fn set_field(&mut self, name: &str, new_value: Value) {
        if let Some(idx) = self.field_names.iter().position(|n| n == name) {
            if let Value::Product(fields) = &mut self.value {
                fields[idx] = new_value;
            }
        }
    }

    /// The field names, in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// The underlying positional value, for `write`/`detach`.
    pub fn as_value(&self) -> &Value {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_by_name() {
        let msg = DynamicMessage::new(
            ".pkg.Point",
            vec!["x".to_string(), "y".to_string()],
            Value::Product(vec![Value::Int(1), Value::Int(2)]),
        );
        assert_eq!(msg.field("x"), Some(&Value::Int(1)));
        assert_eq!(msg.field("y"), Some(&Value::Int(2)));
        assert_eq!(msg.field("z"), None);
    }

    #[test]
    fn set_field_replaces_positionally() {
        let mut msg = DynamicMessage::new(
            ".pkg.Point",
            vec!["x".to_string(), "y".to_string()],
            Value::Product(vec![Value::Int(1), Value::Int(2)]),
        );
        msg.set_field("y", Value::Int(9));
        assert_eq!(msg.field("y"), Some(&Value::Int(9)));
    }
}
