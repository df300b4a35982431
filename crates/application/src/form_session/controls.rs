use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

use formloom_domain::{FieldDescription, FieldValidationError, ValidationRule};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::field_processor::detect::detect_rules;
use crate::validation_messages::ValidationMessageCatalog;

/// Input control bound to one leaf of the field tree.
#[derive(Debug, Clone)]
pub(super) struct BoundControl {
    pub(super) path: String,
    pub(super) field: FieldDescription,
}

/// Binds one control per keyed leaf. Keyed groups nest their children under
/// `group.child` paths; hidden subtrees bind nothing.
pub(super) fn bind_controls(fields: &[FieldDescription]) -> Vec<BoundControl> {
    let mut controls = Vec::new();
    collect(fields, None, &mut controls);
    controls
}

fn collect(fields: &[FieldDescription], prefix: Option<&str>, controls: &mut Vec<BoundControl>) {
    for field in fields {
        if field.hide == Some(true) {
            continue;
        }

        let path = field.key().map(|key| join_path(prefix, key));
        if field.is_group() {
            collect(&field.field_group, path.as_deref().or(prefix), controls);
        } else if let Some(path) = path {
            controls.push(BoundControl {
                path,
                field: field.clone(),
            });
        }
    }
}

fn join_path(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => key.to_owned(),
    }
}

/// Returns the value stored at a dotted path.
pub(super) fn value_at<'a>(model: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = model.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Stores `value` at a dotted path, creating intermediate objects.
pub(super) fn set_value_at(model: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            model.insert(path.to_owned(), value);
        }
        Some((head, rest)) => {
            let entry = model
                .entry(head.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                set_value_at(inner, rest, value);
            }
        }
    }
}

/// Field patterns compiled once per session, anchored to the whole value.
///
/// A pattern that does not compile is remembered as `None` and passes.
#[derive(Debug, Default)]
pub(super) struct PatternCache {
    compiled: Mutex<HashMap<String, Option<Regex>>>,
}

impl PatternCache {
    fn matches(&self, pattern: &str, text: &str) -> bool {
        let Ok(mut compiled) = self.compiled.lock() else {
            return compile_anchored(pattern).is_none_or(|regex| regex.is_match(text));
        };

        compiled
            .entry(pattern.to_owned())
            .or_insert_with(|| compile_anchored(pattern))
            .as_ref()
            .is_none_or(|regex| regex.is_match(text))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.compiled.lock().map_or(0, |compiled| compiled.len())
    }
}

/// Checks one control and returns its first failing rule.
///
/// Rules other than `required` only run against non-empty values.
pub(super) fn check_control(
    control: &BoundControl,
    value: Option<&Value>,
    catalog: &ValidationMessageCatalog,
    patterns: &PatternCache,
) -> Option<FieldValidationError> {
    let declared: Vec<ValidationRule> = detect_rules(&control.field)
        .iter()
        .filter_map(|name| ValidationRule::from_str(name).ok())
        .collect();

    let failed = ValidationRule::ALL
        .into_iter()
        .filter(|rule| declared.contains(rule))
        .find(|rule| !passes(*rule, &control.field, value, patterns))?;

    let message = control
        .field
        .messages()
        .and_then(|messages| messages.get(failed.as_str()))
        .cloned()
        .unwrap_or_else(|| catalog.message(failed, control.field.props.as_ref()));

    Some(FieldValidationError {
        field_key: control.path.clone(),
        error_type: failed.as_str().to_owned(),
        message,
    })
}

fn passes(
    rule: ValidationRule,
    field: &FieldDescription,
    value: Option<&Value>,
    patterns: &PatternCache,
) -> bool {
    let checkbox = field.field_type.as_deref() == Some("checkbox");
    let value = value.filter(|value| !is_empty_value(value, checkbox));

    let Some(value) = value else {
        return rule != ValidationRule::Required;
    };
    let Some(props) = field.props.as_ref() else {
        return true;
    };

    match rule {
        ValidationRule::Required => true,
        ValidationRule::MinLength => match (value_length(value), props.min_length()) {
            (Some(length), Some(min)) => length as f64 >= min,
            _ => true,
        },
        ValidationRule::MaxLength => match (value_length(value), props.max_length()) {
            (Some(length), Some(max)) => length as f64 <= max,
            _ => true,
        },
        ValidationRule::Min => match (numeric_value(value), props.min()) {
            (Some(number), Some(min)) => number >= min,
            _ => true,
        },
        ValidationRule::Max => match (numeric_value(value), props.max()) {
            (Some(number), Some(max)) => number <= max,
            _ => true,
        },
        ValidationRule::Pattern => match (value_text(value), props.pattern()) {
            (Some(text), Some(pattern)) => patterns.matches(pattern, &text),
            _ => true,
        },
        ValidationRule::Email => value.as_str().is_none_or(is_email_like),
    }
}

fn is_empty_value(value: &Value, checkbox: bool) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(flag) => checkbox && !flag,
        _ => false,
    }
}

fn value_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(text) => Some(text.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Compiles `pattern` so it must match the whole value.
fn compile_anchored(pattern: &str) -> Option<Regex> {
    let mut anchored = String::with_capacity(pattern.len() + 2);
    if !pattern.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(pattern);
    if !pattern.ends_with('$') {
        anchored.push('$');
    }

    match Regex::new(&anchored) {
        Ok(regex) => Some(regex),
        Err(error) => {
            debug!(pattern, error = %error, "ignoring field pattern that does not compile");
            None
        }
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain.
fn is_email_like(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.chars().any(char::is_whitespace) {
        return false;
    }

    match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
