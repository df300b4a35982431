//! Application services and ports.

#![forbid(unsafe_code)]

mod field_processor;
mod form_ports;
mod form_session;
mod form_store;
mod validation_messages;

pub use field_processor::{FieldTreeProcessor, ServerMessages};
pub use form_ports::{DeviceMetadataProvider, FormDefinitionSource, SubmissionTransport};
pub use form_session::{FormSession, MINIMUM_LOADING_DURATION, SubmitOutcome};
pub use form_store::{FormDefinitionStore, FormState, LoadStatus};
pub use validation_messages::{MessageLocale, ValidationMessageCatalog};
