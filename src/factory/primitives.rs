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

//! The two built-in factory stages: leaf primitives, and the structural
//! composites that recurse through a [`FactoryChain`].

use crate::combinators::{OptionalMutator, ProductMutator, RepeatedMutator, SumMutator};
use crate::error::{Error, Result, TypePath};
use crate::mutator::Mutator;
use crate::mutators::{BooleanMutator, ByteStringMutator, FloatMutator, IntegralMutator};
use crate::type_ref::{TypeKind, TypeRef};

use super::{FactoryChain, MutatorFactory};

/// Default upper bound on a `repeated` field with no `SizeRange`
/// annotation. Matches the protobuf adapter's own default (spec §4.9).
pub const DEFAULT_REPEATED_MAX: usize = 1000;

/// Builds `Bool`, `Int`, `Float`, and `ByteString` leaves.
#[derive(Debug, Default)]
pub struct PrimitiveFactory;

impl MutatorFactory for PrimitiveFactory {
    fn try_create(
        &self,
        type_ref: &TypeRef,
        path: &TypePath,
        _chain: &FactoryChain,
    ) -> Result<Option<Box<dyn Mutator>>> {
        let mutator: Box<dyn Mutator> = match &type_ref.kind {
            TypeKind::Bool => Box::new(BooleanMutator::new()),
            TypeKind::Int { width, signed } => Box::new(IntegralMutator::new(
                path,
                *width,
                *signed,
                &type_ref.annotations,
            )?),
            TypeKind::Float { width } => Box::new(FloatMutator::new(*width)),
            TypeKind::ByteString => {
                Box::new(ByteStringMutator::new(path, &type_ref.annotations)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(mutator))
    }
}

/// Builds `Optional`, `Repeated`, `Product`, and `Sum`, recursing into
/// children through `chain`.
#[derive(Debug, Default)]
pub struct CompositeFactory;

impl MutatorFactory for CompositeFactory {
    fn try_create(
        &self,
        type_ref: &TypeRef,
        path: &TypePath,
        chain: &FactoryChain,
    ) -> Result<Option<Box<dyn Mutator>>> {
        let mutator: Box<dyn Mutator> = match &type_ref.kind {
            TypeKind::Optional(inner) => {
                let child_path = path.child("?");
                let inner_mutator = chain.build(inner, &child_path).map_err(|source| {
                    Error::ChildFailed {
                        path: path.clone(),
                        source: Box::new(source),
                    }
                })?;
                Box::new(OptionalMutator::new(
                    inner_mutator,
                    type_ref.annotations.not_null,
                ))
            }
            TypeKind::Repeated(inner) => {
                let (lo, hi) = type_ref
                    .annotations
                    .size_range
                    .unwrap_or((0, DEFAULT_REPEATED_MAX));
                let child_path = path.element();
                let inner_mutator = chain.build(inner, &child_path).map_err(|source| {
                    Error::ChildFailed {
                        path: path.clone(),
                        source: Box::new(source),
                    }
                })?;
                Box::new(RepeatedMutator::new(path, inner_mutator, lo, hi)?)
            }
            TypeKind::Product { name, fields } => {
                let mut built_fields = Vec::with_capacity(fields.len());
                for (field_name, field_type) in fields {
                    let child_path = path.child(field_name.clone());
                    let built = chain.build(field_type, &child_path).map_err(|source| {
                        Error::ChildFailed {
                            path: path.clone(),
                            source: Box::new(source),
                        }
                    })?;
                    built_fields.push((field_name.clone(), built));
                }
                Box::new(ProductMutator::new(name.clone(), built_fields))
            }
            TypeKind::Sum { name, variants } => {
                let mut built_variants = Vec::with_capacity(variants.len());
                for (variant_name, variant_type) in variants {
                    let child_path = path.variant(variant_name.clone());
                    let built = chain.build(variant_type, &child_path).map_err(|source| {
                        Error::ChildFailed {
                            path: path.clone(),
                            source: Box::new(source),
                        }
                    })?;
                    built_variants.push((variant_name.clone(), built));
                }
                Box::new(SumMutator::new(name.clone(), built_variants))
            }
            _ => return Ok(None),
        };
        Ok(Some(mutator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::standard_chain;
    use crate::random::ChaChaPrng;
    use crate::type_ref::{AnnotationSet, IntWidth};

    #[test]
    fn product_builds_all_fields_in_order() {
        let chain = standard_chain();
        let annotations = AnnotationSet::none().with_range(Some(0), Some(5));
        let ty = TypeRef::product(
            "Pair",
            vec![
                ("a".to_string(), TypeRef::bool()),
                ("b".to_string(), TypeRef::int(IntWidth::W8).annotated(annotations)),
            ],
        );
        let m = chain.build_root(&ty).unwrap();
        let mut rng = ChaChaPrng::from_seed(2);
        let v = m.init(&mut rng);
        assert_eq!(v.as_product().len(), 2);
    }

    #[test]
    fn repeated_without_size_range_uses_default_max() {
        let chain = standard_chain();
        let ty = TypeRef::repeated(TypeRef::bool());
        let m = chain.build_root(&ty).unwrap();
        let mut rng = ChaChaPrng::from_seed(6);
        let v = m.init(&mut rng);
        assert!(v.as_repeated().len() <= DEFAULT_REPEATED_MAX);
    }

    #[test]
    fn unsupported_kind_reports_the_child_path() {
        let chain = standard_chain();
        let annotations = AnnotationSet::none().with_range(Some(5), Some(5));
        let ty = TypeRef::product(
            "Bad",
            vec![(
                "broken".to_string(),
                TypeRef::int(IntWidth::W8).annotated(annotations),
            )],
        );
        let result = chain.build_root(&ty);
        assert!(matches!(result, Err(Error::ChildFailed { .. })));
    }
}
