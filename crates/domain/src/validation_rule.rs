use std::fmt::{Display, Formatter};
use std::str::FromStr;

use formloom_core::AppError;
use serde::{Deserialize, Serialize};

/// Named constraint checked against user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationRule {
    /// A value must be present.
    Required,
    /// Text must have at least `minLength` characters.
    #[serde(rename = "minlength")]
    MinLength,
    /// Text must have at most `maxLength` characters.
    #[serde(rename = "maxlength")]
    MaxLength,
    /// Number must be greater than or equal to `min`.
    Min,
    /// Number must be less than or equal to `max`.
    Max,
    /// Text must match `pattern`.
    Pattern,
    /// Text must be an email address.
    Email,
}

impl ValidationRule {
    /// Every rule, in the order derived messages are detected.
    pub const ALL: [Self; 7] = [
        Self::Required,
        Self::MinLength,
        Self::MaxLength,
        Self::Min,
        Self::Max,
        Self::Pattern,
        Self::Email,
    ];

    /// Returns the rule name used as a message key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength => "minlength",
            Self::MaxLength => "maxlength",
            Self::Min => "min",
            Self::Max => "max",
            Self::Pattern => "pattern",
            Self::Email => "email",
        }
    }
}

impl Display for ValidationRule {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ValidationRule {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown validation rule '{value}'")))
    }
}
