use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Rule name to rendered message.
pub type ValidationMessages = BTreeMap<String, String>;

/// Number of columns in the layout grid used by `col-N` class hints.
pub const GRID_COLUMNS: u8 = 12;

/// Class name that turns a group's children into grid cells.
pub const GRID_GROUP_CLASS: &str = "display-grid";

/// One node of a server-described form tree.
///
/// A node with a `key` is a leaf bound to one input control. A node without a
/// key groups its `field_group` children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    /// Model key of the control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Control type tag such as `input`, `select` or `textarea`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Layout class of the node inside its parent grid (`col-6`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Layout class applied to the children container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_group_class_name: Option<String>,
    /// Ordered child nodes.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub field_group: Vec<FieldDescription>,
    /// Template repeated for each entry of an array-valued control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_array: Option<Box<FieldDescription>>,
    /// Display properties and declared constraints.
    #[serde(default, alias = "templateOptions", skip_serializing_if = "Option::is_none")]
    pub props: Option<FieldProps>,
    /// Validation message configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationConfig>,
    /// Custom validators keyed by validator name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validators: Option<Map<String, Value>>,
    /// Wrapper components around the control (`panel`).
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub wrappers: Vec<String>,
    /// Initial model value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Whether the node starts hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
}

/// Reads a JSON `null` list as an empty one.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl FieldDescription {
    /// Creates a leaf bound to `key` with the given control type.
    #[must_use]
    pub fn leaf(key: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            field_type: Some(field_type.into()),
            ..Self::default()
        }
    }

    /// Creates a grouping node around `children`.
    #[must_use]
    pub fn group(children: Vec<FieldDescription>) -> Self {
        Self {
            field_group: children,
            ..Self::default()
        }
    }

    /// Replaces the props of this node.
    #[must_use]
    pub fn with_props(mut self, props: FieldProps) -> Self {
        self.props = Some(props);
        self
    }

    /// Replaces the layout class of this node.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Replaces the validation messages of this node.
    #[must_use]
    pub fn with_messages(mut self, messages: ValidationMessages) -> Self {
        self.validation = Some(ValidationConfig {
            messages: Some(messages),
            show: None,
        });
        self
    }

    /// Returns the key when it is present and not blank.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Returns whether the node groups child nodes.
    #[must_use]
    pub fn is_group(&self) -> bool {
        !self.field_group.is_empty()
    }

    /// Returns whether the node is an input control.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.is_group() && self.key().is_some()
    }

    /// Returns whether the node declares `required`.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.props.as_ref().is_some_and(FieldProps::required)
    }

    /// Returns pre-supplied or derived validation messages.
    #[must_use]
    pub fn messages(&self) -> Option<&ValidationMessages> {
        self.validation
            .as_ref()
            .and_then(|validation| validation.messages.as_ref())
    }

    /// Returns the number of grid columns this node spans.
    ///
    /// Reads the first `col-N` class with `N` in `1..=12`.
    #[must_use]
    pub fn column_span(&self) -> Option<u8> {
        self.class_name.as_deref()?.split_whitespace().find_map(|class| {
            class
                .strip_prefix("col-")
                .and_then(|span| span.parse::<u8>().ok())
                .filter(|span| (1..=GRID_COLUMNS).contains(span))
        })
    }

    /// Returns whether this node lays out its children on the grid.
    #[must_use]
    pub fn is_grid_group(&self) -> bool {
        self.field_group_class_name
            .as_deref()
            .is_some_and(|class| class.split_whitespace().any(|item| item == GRID_GROUP_CLASS))
    }
}

/// Validation block of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Messages keyed by rule name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<ValidationMessages>,
    /// Forces messages to be shown before the control is touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
}

/// Selectable option of a `select`/`radio` control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Submitted value.
    pub value: Value,
    /// Displayed label.
    pub label: String,
}

/// Display properties of a field.
///
/// Props are kept as the JSON object the server sent so unknown keys survive
/// processing untouched. Typed accessors follow JavaScript truthiness, which
/// is how the renderers consuming these trees read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldProps(Map<String, Value>);

impl FieldProps {
    /// Creates empty props.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Sets `name` to `value` and returns the props.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_owned(), value.into());
        self
    }

    /// Sets `name` to `value`.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_owned(), value.into());
    }

    /// Returns the raw value of `name`, treating `null` as absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Overwrites keys with the entries of `partial`.
    pub fn merge(&mut self, partial: &Map<String, Value>) {
        for (name, value) in partial {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.get("label").and_then(Value::as_str)
    }

    /// Returns the placeholder.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.get("placeholder").and_then(Value::as_str)
    }

    /// Returns whether the control is required.
    #[must_use]
    pub fn required(&self) -> bool {
        self.get("required").is_some_and(is_truthy)
    }

    /// Returns the HTML input type (`email`, `number`, `password`).
    #[must_use]
    pub fn input_type(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    /// Returns the declared minimum length, accepting `minLength` or `minlength`.
    #[must_use]
    pub fn min_length_value(&self) -> Option<&Value> {
        self.truthy_alias("minLength", "minlength")
    }

    /// Returns the declared maximum length, accepting `maxLength` or `maxlength`.
    #[must_use]
    pub fn max_length_value(&self) -> Option<&Value> {
        self.truthy_alias("maxLength", "maxlength")
    }

    /// Returns the declared minimum value. Zero is a valid minimum.
    #[must_use]
    pub fn min_value(&self) -> Option<&Value> {
        self.get("min")
    }

    /// Returns the declared maximum value. Zero is a valid maximum.
    #[must_use]
    pub fn max_value(&self) -> Option<&Value> {
        self.get("max")
    }

    /// Returns the minimum length as a number.
    #[must_use]
    pub fn min_length(&self) -> Option<f64> {
        self.min_length_value().and_then(as_number)
    }

    /// Returns the maximum length as a number.
    #[must_use]
    pub fn max_length(&self) -> Option<f64> {
        self.max_length_value().and_then(as_number)
    }

    /// Returns the minimum value as a number.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min_value().and_then(as_number)
    }

    /// Returns the maximum value as a number.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max_value().and_then(as_number)
    }

    /// Returns the non-empty regex pattern.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.get("pattern")
            .and_then(Value::as_str)
            .filter(|pattern| !pattern.is_empty())
    }

    /// Returns the custom message shown when the pattern does not match.
    #[must_use]
    pub fn pattern_validation_message(&self) -> Option<&str> {
        self.get("patternValidationMessage")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
    }

    /// Returns the parsed option list, skipping malformed entries.
    #[must_use]
    pub fn options(&self) -> Vec<FieldOption> {
        self.get("options")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| serde_json::from_value(option.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn truthy_alias(&self, name: &str, alias: &str) -> Option<&Value> {
        self.get(name)
            .filter(|value| is_truthy(value))
            .or_else(|| self.get(alias).filter(|value| is_truthy(value)))
    }
}

impl From<Map<String, Value>> for FieldProps {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}
