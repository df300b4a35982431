use chrono::{DateTime, Utc};
use formloom_core::FormDefinitionId;
use formloom_domain::{FieldDescription, FormStats, count_leaf_fields};

/// Coarse lifecycle of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing loaded and nothing in flight.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed.
    Error,
}

/// Snapshot of everything the store holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    /// Display name of the loaded form.
    pub form_name: Option<String>,
    /// Identifier of the loaded form.
    pub form_definition_id: Option<FormDefinitionId>,
    /// Version of the loaded form.
    pub version: Option<u32>,
    /// Description of the loaded form.
    pub description: Option<String>,
    /// Processed field tree.
    pub fields: Vec<FieldDescription>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Whether a submission is in flight.
    pub submitting: bool,
    /// User-facing message of the last failure.
    pub error: Option<String>,
    /// When the field tree was last replaced by a fetch.
    pub last_updated: Option<DateTime<Utc>>,
}

impl FormState {
    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        if self.loading {
            LoadStatus::Loading
        } else if self.error.is_some() {
            LoadStatus::Error
        } else if self.last_updated.is_some() {
            LoadStatus::Ready
        } else {
            LoadStatus::Idle
        }
    }

    /// Returns whether the field tree is non-empty.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Returns whether the field tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns whether the last operation failed.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns whether a non-empty form is loaded and settled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status() == LoadStatus::Ready && self.has_data()
    }

    /// Returns the number of input controls across the whole tree.
    #[must_use]
    pub fn field_count(&self) -> usize {
        count_leaf_fields(&self.fields)
    }

    /// Returns leaf statistics.
    #[must_use]
    pub fn form_stats(&self) -> FormStats {
        FormStats::from_fields(&self.fields)
    }

    /// Finds a top-level field by key.
    ///
    /// Nested groups are not searched.
    #[must_use]
    pub fn get_field_by_key(&self, key: &str) -> Option<&FieldDescription> {
        self.fields.iter().find(|field| field.key() == Some(key))
    }
}
