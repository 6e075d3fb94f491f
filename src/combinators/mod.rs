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

//! Structural combinators: the mutators that compose other mutators into
//! records, variants, optionals, sequences, constants, and recursive
//! self-references.

mod delayed;
mod fixed;
mod optional;
mod product;
mod repeated;
mod sum;

pub use delayed::DelayedMutator;
pub use fixed::FixedValueMutator;
pub use optional::OptionalMutator;
pub use product::ProductMutator;
pub use repeated::RepeatedMutator;
pub use sum::SumMutator;
