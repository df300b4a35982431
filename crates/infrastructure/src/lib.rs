//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod form_api_config;
mod http_form_definition_source;
mod http_response;
mod http_submission_transport;
mod sample_forms;
mod static_form_definition_source;
mod system_device_metadata;

pub use form_api_config::{CLIENT_USER_AGENT, FormApiConfig};
pub use http_form_definition_source::HttpFormDefinitionSource;
pub use http_submission_transport::HttpSubmissionTransport;
pub use sample_forms::SampleForm;
pub use static_form_definition_source::StaticFormDefinitionSource;
pub use system_device_metadata::SystemDeviceMetadataProvider;
