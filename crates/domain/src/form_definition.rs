use formloom_core::FormDefinitionId;
use serde::{Deserialize, Serialize};

use crate::backend_form::BackendFormResponse;
use crate::field::{FieldDescription, null_as_empty};

/// Named, versioned form fetched from a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    id: FormDefinitionId,
    version: u32,
    name: String,
    description: Option<String>,
    fields: Vec<FieldDescription>,
}

impl FormDefinition {
    /// Version assumed when a backend does not report one.
    pub const DEFAULT_VERSION: u32 = 1;

    /// Creates a form definition.
    #[must_use]
    pub fn new(
        id: FormDefinitionId,
        version: u32,
        name: impl Into<String>,
        description: Option<String>,
        fields: Vec<FieldDescription>,
    ) -> Self {
        Self {
            id,
            version: version.max(Self::DEFAULT_VERSION),
            name: name.into(),
            description: description.filter(|value| !value.trim().is_empty()),
            fields,
        }
    }

    /// Returns the form identifier.
    #[must_use]
    pub fn id(&self) -> &FormDefinitionId {
        &self.id
    }

    /// Returns the form version.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the top-level field forest.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescription] {
        &self.fields
    }

    /// Consumes the definition and returns its fields.
    #[must_use]
    pub fn into_fields(self) -> Vec<FieldDescription> {
        self.fields
    }
}

/// Flat wire shape: `{formName, fields[]}` with optional id and version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinitionResponse {
    /// Display name of the form.
    pub form_name: String,
    /// Top-level field forest.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<FieldDescription>,
    /// Backend identifier, when the backend tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Definition version, when the backend tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Any of the form definition shapes a backend may answer with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormDefinitionPayload {
    /// Flat shape with canonical field descriptions.
    Flat(FormDefinitionResponse),
    /// Id-heavy shape produced by the persistence backend.
    Backend(BackendFormResponse),
}

impl FormDefinitionPayload {
    /// Returns the form name carried by the payload.
    #[must_use]
    pub fn form_name(&self) -> &str {
        match self {
            Self::Flat(response) => response.form_name.as_str(),
            Self::Backend(response) => response.name.as_str(),
        }
    }
}
