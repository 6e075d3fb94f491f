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

//! Error types for mutator construction and operation.
//!
//! Construction errors carry a [`TypePath`] naming the offending child,
//! per the propagation rules in the engine's error handling design:
//! there is no retry, callers surface these verbatim.

use std::fmt;

/// A dotted path to a type being constructed, e.g. `Root.field_a.element[*].oneof:x`.
///
/// Built up incrementally as the factory chain recurses into children, so
/// that a construction failure deep in a tree can be reported with full
/// context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypePath(Vec<String>);

impl TypePath {
    /// An empty path, rooted at the type under construction.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Return a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Return a new path with a repeated-element marker appended.
    pub fn element(&self) -> Self {
        self.child("[*]")
    }

    /// Return a new path with a oneof/variant member appended.
    pub fn variant(&self, name: impl Into<String>) -> Self {
        self.child(format!("oneof:{}", name.into()))
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "Root");
        }
        write!(f, "Root")?;
        for segment in &self.0 {
            if segment.starts_with('[') || segment.starts_with("oneof:") {
                write!(f, ".{segment}")?;
            } else {
                write!(f, ".{segment}")?;
            }
        }
        Ok(())
    }
}

/// Errors the engine can report.
///
/// Construction errors are fail-fast and carry the full [`TypePath`] of the
/// offending node. Operational errors indicate an engine bug (invoking an
/// operation the contract forbids) and are not expected in correct use.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `lo > hi`, or `lo == hi` (a degenerate range; see `DESIGN.md` for why
    /// this is rejected rather than silently turned into `fixedValue`).
    #[error("{path}: invalid range [{lo}, {hi}]")]
    InvalidRange {
        /// Path to the offending type.
        path: TypePath,
        /// Lower bound as supplied.
        lo: i128,
        /// Upper bound as supplied.
        hi: i128,
    },

    /// An annotation's value falls outside what the underlying type can
    /// represent (e.g. a `Range` wider than the integral's natural limits,
    /// or a `SizeRange` with `min > max`).
    #[error("{path}: annotation out of domain: {reason}")]
    AnnotationOutOfDomain {
        /// Path to the offending type.
        path: TypePath,
        /// Human-readable explanation.
        reason: String,
    },

    /// No factory in the chain matched a `TypeRef`.
    #[error("{path}: no factory could build a mutator for this type")]
    UnmatchedType {
        /// Path to the offending type.
        path: TypePath,
    },

    /// A child factory failed while building a composite (product/sum/etc).
    #[error("{path}: failed to build child: {source}")]
    ChildFailed {
        /// Path to the parent type.
        path: TypePath,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// A `delayed` placeholder was resolved more than once.
    #[error("{path}: delayed mutator resolved twice")]
    DelayedAlreadyResolved {
        /// Path to the offending type.
        path: TypePath,
    },

    /// A `delayed` placeholder's `read`/`write`/`init`/`mutate`/`detach` was
    /// invoked before the enclosing recursive type finished construction.
    #[error("{path}: delayed mutator used before resolution")]
    DelayedUnresolved {
        /// Path to the offending type.
        path: TypePath,
    },

    /// `mutate` was invoked on a domain of cardinality 1 (a `fixedValue`, or
    /// a degenerate range that was rejected at construction but reached
    /// `mutate` anyway through misuse).
    #[error("cannot mutate a value with only one possible state")]
    SingletonDomain,

    /// `indexIn(0)` or similar: asked to pick among zero alternatives.
    #[error("cannot choose an index in an empty range")]
    EmptyRange,

    /// The protobuf adapter encountered a descriptor shape it does not
    /// support (e.g. a group-encoded field, which protobuf itself deprecated).
    #[error("{path}: unsupported protobuf descriptor shape: {reason}")]
    UnsupportedDescriptor {
        /// Path to the offending field/message.
        path: TypePath,
        /// Human-readable explanation.
        reason: String,
    },
}

/// Convenience alias for fallible construction paths.
pub type Result<T> = std::result::Result<T, Error>;
