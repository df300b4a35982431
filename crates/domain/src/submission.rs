use std::str::FromStr;

use chrono::{DateTime, Utc};
use formloom_core::{AppError, FormDefinitionId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle state of a stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Auto-saved, not yet sent by the user.
    Draft,
    /// Sent by the user.
    Submitted,
    /// Checked by the backend.
    Validated,
    /// Approved by an administrator.
    Approved,
    /// Rejected by an administrator.
    Rejected,
    /// Being processed.
    Processing,
    /// Fully processed.
    Completed,
}

impl SubmissionStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::Validated => "Validated",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
        }
    }
}

/// Coarse device class derived from a user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Phones.
    Mobile,
    /// Tablets.
    Tablet,
    /// Everything else.
    Desktop,
}

impl DeviceType {
    /// Classifies a user agent string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let user_agent = user_agent.to_ascii_lowercase();
        if user_agent.contains("mobile") {
            Self::Mobile
        } else if user_agent.contains("tablet") || user_agent.contains("ipad") {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

impl FromStr for DeviceType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "mobile" => Ok(Self::Mobile),
            "tablet" => Ok(Self::Tablet),
            "desktop" => Ok(Self::Desktop),
            _ => Err(AppError::Validation(format!("unknown device type '{value}'"))),
        }
    }
}

/// Device and client details attached to a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetadata {
    /// Client identification (user agent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_info: Option<String>,
    /// Screen size as `WIDTHxHEIGHT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_resolution: Option<String>,
    /// Preferred language tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Referring location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// Device class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
    /// Operating system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// IANA time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Additional client-specific entries.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload posted to the backend when a form is answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    /// Form answered.
    pub form_definition_id: FormDefinitionId,
    /// Version of the form answered.
    pub form_version: u32,
    /// `false` marks a draft.
    pub is_complete: bool,
    /// Entered values keyed by field key.
    pub data: Map<String, Value>,
    /// Seconds spent filling in the form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<u64>,
    /// Device details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SubmissionMetadata>,
}

/// Validation failure of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidationError {
    /// Key path of the failing field.
    pub field_key: String,
    /// Rule that failed.
    pub error_type: String,
    /// Message shown to the user.
    pub message: String,
}

/// Backend acknowledgement of a stored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    /// Submission identifier.
    pub id: String,
    /// Form answered.
    pub form_definition_id: FormDefinitionId,
    /// Storage timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Lifecycle state.
    pub status: SubmissionStatus,
    /// Message for the user.
    pub message: String,
}
