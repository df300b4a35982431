//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod backend_form;
mod field;
mod form_definition;
mod stats;
mod submission;
mod validation_rule;

pub use backend_form::{
    BackendFieldConfig, BackendFieldOption, BackendFieldProps, BackendFieldValidation,
    BackendFormResponse,
};
pub use field::{
    FieldDescription, FieldOption, FieldProps, GRID_COLUMNS, GRID_GROUP_CLASS, ValidationConfig,
    ValidationMessages,
};
pub use form_definition::{FormDefinition, FormDefinitionPayload, FormDefinitionResponse};
pub use stats::{FormStats, count_leaf_fields, leaf_fields};
pub use submission::{
    CreateSubmissionRequest, DeviceType, FieldValidationError, SubmissionMetadata,
    SubmissionResponse, SubmissionStatus,
};
pub use validation_rule::ValidationRule;
