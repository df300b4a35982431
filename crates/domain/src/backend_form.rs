//! Id-heavy form shape served by the persistence backend.
//!
//! Every entity row comes back with its own id and foreign keys, and numeric
//! columns default to zero instead of being absent. These types only mirror
//! the wire shape; normalisation into [`crate::FieldDescription`] happens in
//! the field-tree processor. Row fields mirror the backend columns one to one.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend form row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendFormResponse {
    /// Form identifier.
    pub id: String,
    /// Form display name.
    pub name: String,
    /// Form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Definition version, when tracked.
    #[serde(default)]
    pub version: Option<u32>,
    /// Top-level field rows.
    #[serde(default)]
    pub fields: Vec<BackendFieldConfig>,
}

/// Backend field row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendFieldConfig {
    pub id: Option<String>,
    pub parent_id: Option<String>,
    pub formly_form_id: Option<String>,
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub default_value: Option<Value>,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub field_group_class_name: Option<String>,
    pub template: Option<String>,
    pub hide: Option<bool>,
    pub reset_on_hide: Option<bool>,
    pub focus: Option<bool>,
    pub validation: Option<BackendFieldValidation>,
    pub validator: Option<Value>,
    pub props: Option<BackendFieldProps>,
    pub field_group: Option<Vec<BackendFieldConfig>>,
    pub wrappers: Option<Vec<String>>,
}

/// Backend validation row attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendFieldValidation {
    pub id: Option<String>,
    pub formly_field_config_id: Option<String>,
    pub name: Option<String>,
    pub messages: Option<BTreeMap<String, String>>,
    pub show: Option<bool>,
}

/// Backend props row attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendFieldProps {
    pub id: Option<String>,
    pub formly_field_config_id: Option<String>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub disabled: Option<bool>,
    pub rows: Option<i64>,
    pub cols: Option<i64>,
    pub description: Option<String>,
    pub hidden: Option<bool>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    pub pattern: Option<String>,
    pub pattern_validation_message: Option<String>,
    pub required: Option<bool>,
    pub tabindex: Option<i64>,
    pub readonly: Option<bool>,
    pub step: Option<f64>,
    pub appearance: Option<String>,
    pub attributes: Option<Value>,
    pub additional_properties: Option<Value>,
    pub options: Option<Vec<BackendFieldOption>>,
}

/// Backend option row of a select-like control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendFieldOption {
    pub id: Option<String>,
    pub formly_field_prop_id: Option<String>,
    pub value: Option<Value>,
    pub label: Option<String>,
}
