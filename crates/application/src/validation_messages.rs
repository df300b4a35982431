use std::str::FromStr;

use formloom_domain::{FieldProps, ValidationMessages, ValidationRule};
use serde_json::Value;

/// Language of the built-in message templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageLocale {
    /// English (default).
    #[default]
    English,
    /// Spanish.
    Spanish,
}

impl MessageLocale {
    /// Parses a language tag such as `es-ES` or `en`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let language = value.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match language.as_str() {
            "en" => Some(Self::English),
            "es" => Some(Self::Spanish),
            _ => None,
        }
    }
}

/// Maps validation rule names to human-readable messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationMessageCatalog {
    locale: MessageLocale,
}

impl ValidationMessageCatalog {
    /// Creates a catalog for `locale`.
    #[must_use]
    pub fn new(locale: MessageLocale) -> Self {
        Self { locale }
    }

    /// Returns the catalog locale.
    #[must_use]
    pub fn locale(&self) -> MessageLocale {
        self.locale
    }

    /// Renders messages for every recognised rule name.
    ///
    /// Bounds are read from `constraints`; unknown rule names are skipped.
    #[must_use]
    pub fn messages_for<S: AsRef<str>>(
        &self,
        rule_names: &[S],
        constraints: Option<&FieldProps>,
    ) -> ValidationMessages {
        rule_names
            .iter()
            .filter_map(|name| ValidationRule::from_str(name.as_ref()).ok())
            .map(|rule| (rule.as_str().to_owned(), self.message(rule, constraints)))
            .collect()
    }

    /// Renders the message of a single rule.
    #[must_use]
    pub fn message(&self, rule: ValidationRule, constraints: Option<&FieldProps>) -> String {
        let bound = |value: Option<&Value>| value.map_or_else(|| "0".to_owned(), render_bound);

        match (self.locale, rule) {
            (MessageLocale::English, ValidationRule::Required) => {
                "This field is required".to_owned()
            }
            (MessageLocale::English, ValidationRule::Email) => "Invalid email format".to_owned(),
            (MessageLocale::English, ValidationRule::MinLength) => format!(
                "Must be at least {} characters",
                bound(constraints.and_then(FieldProps::min_length_value))
            ),
            (MessageLocale::English, ValidationRule::MaxLength) => format!(
                "Cannot be more than {} characters",
                bound(constraints.and_then(FieldProps::max_length_value))
            ),
            (MessageLocale::English, ValidationRule::Min) => format!(
                "The minimum value is {}",
                bound(constraints.and_then(FieldProps::min_value))
            ),
            (MessageLocale::English, ValidationRule::Max) => format!(
                "The maximum value is {}",
                bound(constraints.and_then(FieldProps::max_value))
            ),
            (MessageLocale::English, ValidationRule::Pattern) => constraints
                .and_then(FieldProps::pattern_validation_message)
                .unwrap_or("The format is not valid")
                .to_owned(),
            (MessageLocale::Spanish, ValidationRule::Required) => {
                "Este campo es obligatorio".to_owned()
            }
            (MessageLocale::Spanish, ValidationRule::Email) => {
                "Formato de correo inválido".to_owned()
            }
            (MessageLocale::Spanish, ValidationRule::MinLength) => format!(
                "Debe tener al menos {} caracteres",
                bound(constraints.and_then(FieldProps::min_length_value))
            ),
            (MessageLocale::Spanish, ValidationRule::MaxLength) => format!(
                "No puede tener más de {} caracteres",
                bound(constraints.and_then(FieldProps::max_length_value))
            ),
            (MessageLocale::Spanish, ValidationRule::Min) => format!(
                "El valor mínimo es {}",
                bound(constraints.and_then(FieldProps::min_value))
            ),
            (MessageLocale::Spanish, ValidationRule::Max) => format!(
                "El valor máximo es {}",
                bound(constraints.and_then(FieldProps::max_value))
            ),
            (MessageLocale::Spanish, ValidationRule::Pattern) => constraints
                .and_then(FieldProps::pattern_validation_message)
                .unwrap_or("El formato no es válido")
                .to_owned(),
        }
    }
}

fn render_bound(value: &Value) -> String {
    match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                integer.to_string()
            } else {
                match number.as_f64() {
                    Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => {
                        format!("{float:.0}")
                    }
                    Some(float) => float.to_string(),
                    None => number.to_string(),
                }
            }
        }
        Value::String(text) => text.clone(),
        _ => "0".to_owned(),
    }
}
