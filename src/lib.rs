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

//! A structure-aware mutation engine for typed, corpus-driven fuzzing.
//!
//! `mutagen-engine` builds a tree of [`Mutator`]s from a declared
//! [`TypeRef`] (hand-written, macro-generated, or walked from a compiled
//! protobuf descriptor via [`protobuf`]) and exposes the five operations a
//! coverage-guided driver needs: `init` a seed value, `mutate` a neighbor,
//! `read`/`write` a stable binary encoding for corpus persistence, and
//! `detach`/`to_debug_string` for harnesses that hold onto a value across
//! calls.
//!
//! # Examples
//!
//! ```
//! use mutagen_engine::factory::standard_chain;
//! use mutagen_engine::random::ChaChaPrng;
//! use mutagen_engine::type_ref::{AnnotationSet, IntWidth, TypeRef};
//!
//! let ty = TypeRef::product(
//!     "Point",
//!     vec![
//!         ("x".to_string(), TypeRef::int(IntWidth::W32).annotated(AnnotationSet::none().with_range(Some(-100), Some(100)))),
//!         ("y".to_string(), TypeRef::int(IntWidth::W32).annotated(AnnotationSet::none().with_range(Some(-100), Some(100)))),
//!     ],
//! );
//! let mutator = standard_chain().build_root(&ty).unwrap();
//! let mut rng = ChaChaPrng::from_seed(42);
//! let seed = mutator.init(&mut rng);
//! let neighbor = mutator.mutate(&seed, &mut rng);
//! assert_ne!(seed, neighbor);
//! ```

pub mod codec;
pub mod combinators;
pub mod error;
pub mod factory;
pub mod mutator;
pub mod mutators;
pub mod protobuf;
pub mod random;
pub mod type_ref;
pub mod value;

pub use error::{Error, Result};
pub use mutator::{InCycle, Mutator};
pub use random::{ChaChaPrng, Prng};
pub use type_ref::{AnnotationSet, TypeKind, TypeRef};
pub use value::Value;
