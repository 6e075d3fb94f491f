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

//! Leaf mutators: integral, boolean, floating-point, and byte string.
//!
//! These are the mutators a [`crate::factory::MutatorFactory`] chain
//! bottoms out at; every composite in [`crate::combinators`] is built from
//! some arrangement of these (or, recursively, of other composites).

mod boolean;
mod bytes;
mod float;
mod integral;

pub use boolean::BooleanMutator;
pub use bytes::ByteStringMutator;
pub use float::FloatMutator;
pub use integral::{force_in_range, IntegralMutator};
