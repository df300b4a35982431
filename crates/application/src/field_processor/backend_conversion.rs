//! Normalisation of backend field rows into canonical field descriptions.
//!
//! Backend rows store unset numeric columns as `0` and unset text columns as
//! empty strings. Zero is never a meaningful length, bound, step or tab index
//! for these forms, so both are dropped instead of becoming constraints.

use formloom_domain::{
    BackendFieldConfig, BackendFieldOption, BackendFieldProps, FieldDescription, FieldProps,
    ValidationConfig,
};
use serde_json::{Map, Number, Value, json};

/// Converts one backend row and its descendants.
pub(super) fn convert_field(field: BackendFieldConfig) -> FieldDescription {
    let validation = field.validation.and_then(|validation| {
        validation
            .messages
            .filter(|messages| !messages.is_empty())
            .map(|messages| ValidationConfig {
                messages: Some(messages),
                show: validation.show,
            })
    });

    let validators = match field.validator {
        Some(Value::Object(validators)) if !validators.is_empty() => Some(validators),
        _ => None,
    };

    FieldDescription {
        key: non_empty(field.key),
        field_type: non_empty(field.field_type),
        class_name: non_empty(field.class_name),
        field_group_class_name: non_empty(field.field_group_class_name),
        field_group: field
            .field_group
            .unwrap_or_default()
            .into_iter()
            .map(convert_field)
            .collect(),
        field_array: None,
        props: field.props.and_then(convert_props),
        validation,
        validators,
        wrappers: field
            .wrappers
            .unwrap_or_default()
            .into_iter()
            .filter(|wrapper| !wrapper.trim().is_empty())
            .collect(),
        default_value: field.default_value.filter(|value| !value.is_null()),
        hide: field.hide.filter(|hide| *hide),
    }
}

fn convert_props(props: BackendFieldProps) -> Option<FieldProps> {
    let mut map = Map::new();

    for (name, value) in [
        ("type", props.input_type),
        ("label", props.label),
        ("placeholder", props.placeholder),
        ("description", props.description),
        ("pattern", props.pattern),
        ("patternValidationMessage", props.pattern_validation_message),
        ("appearance", props.appearance),
    ] {
        if let Some(value) = non_empty(value) {
            map.insert(name.to_owned(), Value::String(value));
        }
    }

    for (name, flag) in [
        ("required", props.required),
        ("disabled", props.disabled),
        ("readonly", props.readonly),
        ("hidden", props.hidden),
    ] {
        if flag == Some(true) {
            map.insert(name.to_owned(), Value::Bool(true));
        }
    }

    for (name, count) in [
        ("minLength", props.min_length),
        ("maxLength", props.max_length),
        ("rows", props.rows),
        ("cols", props.cols),
        ("tabindex", props.tabindex),
    ] {
        if let Some(count) = count.filter(|count| *count > 0) {
            map.insert(name.to_owned(), Value::from(count));
        }
    }

    for (name, number) in [("min", props.min), ("max", props.max), ("step", props.step)] {
        if let Some(value) = number.filter(|number| *number != 0.0).and_then(number_value) {
            map.insert(name.to_owned(), value);
        }
    }

    let options: Vec<Value> = props
        .options
        .unwrap_or_default()
        .into_iter()
        .filter_map(convert_option)
        .collect();
    if !options.is_empty() {
        map.insert("options".to_owned(), Value::Array(options));
    }

    if let Some(Value::Object(attributes)) = props.attributes
        && !attributes.is_empty()
    {
        map.insert("attributes".to_owned(), Value::Object(attributes));
    }

    if let Some(Value::Object(additional)) = props.additional_properties {
        for (name, value) in additional {
            if !value.is_null() {
                map.entry(name).or_insert(value);
            }
        }
    }

    (!map.is_empty()).then(|| FieldProps::from(map))
}

fn convert_option(option: BackendFieldOption) -> Option<Value> {
    let label = non_empty(option.label);
    let value = option
        .value
        .filter(|value| !value.is_null())
        .or_else(|| label.clone().map(Value::String))?;

    Some(json!({
        "value": value,
        "label": label.unwrap_or_default(),
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn number_value(number: f64) -> Option<Value> {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        return Some(Value::from(number as i64));
    }

    Number::from_f64(number).map(Value::Number)
}
