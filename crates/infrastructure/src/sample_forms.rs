use std::fmt;
use std::str::FromStr;

use formloom_core::{AppError, AppResult};
use formloom_domain::FormDefinitionPayload;

/// Bundled form definitions used by the mock backend and local development.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleForm {
    /// Registration form laid out on the grid.
    #[default]
    Registration,
    /// Form whose fields carry server-supplied messages.
    CustomMessages,
    /// Form split into keyed sections.
    Nested,
    /// Form in the id-heavy backend shape.
    Backend,
}

impl SampleForm {
    /// Every bundled sample.
    pub const ALL: [Self; 4] = [
        Self::Registration,
        Self::CustomMessages,
        Self::Nested,
        Self::Backend,
    ];

    /// Returns the variant name used in query strings.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::CustomMessages => "custom-messages",
            Self::Nested => "nested",
            Self::Backend => "backend",
        }
    }

    /// Returns the raw JSON document.
    #[must_use]
    pub fn json(&self) -> &'static str {
        match self {
            Self::Registration => include_str!("../fixtures/registration.json"),
            Self::CustomMessages => include_str!("../fixtures/custom-messages.json"),
            Self::Nested => include_str!("../fixtures/nested.json"),
            Self::Backend => include_str!("../fixtures/backend.json"),
        }
    }

    /// Parses the bundled document.
    pub fn payload(&self) -> AppResult<FormDefinitionPayload> {
        serde_json::from_str(self.json()).map_err(|error| {
            AppError::Decode(format!("sample form '{}' is invalid: {error}", self.as_str()))
        })
    }
}

impl fmt::Display for SampleForm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SampleForm {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sample| sample.as_str() == value)
            .ok_or_else(|| AppError::NotFound(format!("unknown sample form '{value}'")))
    }
}
