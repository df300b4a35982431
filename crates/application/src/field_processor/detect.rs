use formloom_domain::{FieldDescription, ValidationRule};

/// Lists the rule names a node declares through its props and validators.
pub(crate) fn detect_rules(field: &FieldDescription) -> Vec<String> {
    let mut rules: Vec<String> = Vec::new();

    if let Some(props) = field.props.as_ref() {
        let declared = [
            (ValidationRule::Required, props.required()),
            (ValidationRule::MinLength, props.min_length_value().is_some()),
            (ValidationRule::MaxLength, props.max_length_value().is_some()),
            (ValidationRule::Min, props.min_value().is_some()),
            (ValidationRule::Max, props.max_value().is_some()),
            (ValidationRule::Pattern, props.pattern().is_some()),
        ];
        rules.extend(
            declared
                .into_iter()
                .filter_map(|(rule, present)| present.then(|| rule.as_str().to_owned())),
        );
    }

    let email_input = field
        .props
        .as_ref()
        .and_then(|props| props.input_type())
        .is_some_and(|input_type| input_type == "email");
    if email_input || field.field_type.as_deref() == Some("email") {
        rules.push(ValidationRule::Email.as_str().to_owned());
    }

    if let Some(validators) = field.validators.as_ref() {
        for name in validators.keys() {
            if !rules.iter().any(|rule| rule == name) {
                rules.push(name.clone());
            }
        }
    }

    rules
}
