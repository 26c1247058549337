//! Baseline rules every native tree goes through.

use crate::{
    annotate::annotate_type,
    error::MappingError,
    mapping::Mapping,
    pipeline::Pipeline,
    role::Role,
};

/// Type loaders assign to native nodes they could not classify.
pub const INTERNAL_TYPE: &str = "internal-type";

/// Role annotations applied to native trees.
pub fn annotations() -> Vec<Result<Mapping, MappingError>> {
    vec![annotate_type(INTERNAL_TYPE, None, [Role::INCOMPLETE])]
}

/// The baseline native pipeline: one annotation stage, then roles dedup.
pub fn native() -> Result<Pipeline, MappingError> {
    Pipeline::builder().stage("annotations", annotations()).build()
}
