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

//! The protobuf adapter: a composite factory that maps a compiled
//! `.proto` file's message descriptors onto the same mutator tree every
//! other `TypeRef` produces, plus a named-field view for harnesses.
//!
//! Built entirely on the public combinator/factory API — there is nothing
//! here a user-written factory couldn't also do against a hand-authored
//! `TypeRef`.

mod descriptor;
mod factory;
mod map_field;
mod value;

pub use factory::ProtobufFactory;
pub use map_field::MapFieldMutator;
pub use value::DynamicMessage;
