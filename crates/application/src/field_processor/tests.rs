use formloom_domain::{
    BackendFieldConfig, BackendFieldOption, BackendFieldProps, BackendFieldValidation,
    BackendFormResponse, FieldDescription, FieldProps, FormDefinitionPayload, ValidationMessages,
};
use serde_json::json;

use super::{FieldTreeProcessor, ServerMessages};

fn messages(entries: &[(&str, &str)]) -> ValidationMessages {
    entries
        .iter()
        .map(|(rule, message)| ((*rule).to_owned(), (*message).to_owned()))
        .collect()
}

fn rule_names(field: &FieldDescription) -> Vec<String> {
    field
        .messages()
        .map(|messages| messages.keys().cloned().collect())
        .unwrap_or_default()
}

#[test]
fn age_field_gets_required_min_and_max_messages() {
    let processor = FieldTreeProcessor::default();
    let payload: Option<FormDefinitionPayload> = serde_json::from_value(json!({
        "formName": "X",
        "fields": [{
            "key": "age",
            "type": "input",
            "props": { "required": true, "min": 18, "max": 100 }
        }]
    }))
    .ok();

    let definition = payload.map(|payload| processor.process_payload(payload));
    let age = definition
        .as_ref()
        .and_then(|definition| definition.fields().first());

    assert_eq!(definition.as_ref().map(|definition| definition.name()), Some("X"));
    assert_eq!(
        age.map(rule_names),
        Some(vec!["max".to_owned(), "min".to_owned(), "required".to_owned()])
    );
    let messages = age.and_then(FieldDescription::messages);
    assert!(messages.and_then(|m| m.get("min")).is_some_and(|m| m.contains("18")));
    assert!(messages.and_then(|m| m.get("max")).is_some_and(|m| m.contains("100")));
}

#[test]
fn required_leaves_inside_groups_get_messages() {
    let processor = FieldTreeProcessor::default();
    let tree = vec![FieldDescription::group(vec![
        FieldDescription::leaf("firstName", "input")
            .with_props(FieldProps::new().with("required", true).with("minLength", 2)),
        FieldDescription::leaf("nickname", "input"),
    ])];

    let processed = processor.process_fields(tree);
    let children = &processed[0].field_group;

    assert_eq!(children.len(), 2);
    assert_eq!(children[0].key(), Some("firstName"));
    assert!(
        children[0]
            .messages()
            .and_then(|messages| messages.get("required"))
            .is_some_and(|message| !message.is_empty())
    );
    assert_eq!(
        children[0]
            .messages()
            .and_then(|messages| messages.get("minlength"))
            .map(String::as_str),
        Some("Must be at least 2 characters")
    );
    assert!(children[1].validation.is_none());
}

#[test]
fn supplied_messages_are_kept_and_processing_is_idempotent() {
    let processor = FieldTreeProcessor::default();
    let custom = messages(&[("required", "VIP users must fill this in")]);
    let tree = vec![
        FieldDescription::leaf("username", "input")
            .with_props(FieldProps::new().with("required", true).with("minLength", 5))
            .with_messages(custom.clone()),
        FieldDescription::leaf("email", "input")
            .with_props(FieldProps::new().with("type", "email")),
    ];

    let once = processor.process_fields(tree);
    let twice = processor.process_fields(once.clone());

    assert_eq!(once[0].messages(), Some(&custom));
    assert_eq!(once, twice);
    assert_eq!(rule_names(&once[1]), vec!["email".to_owned()]);
}

#[test]
fn email_type_tag_and_custom_validators_are_detected() {
    let processor = FieldTreeProcessor::default();
    let field: Option<FieldDescription> = serde_json::from_value(json!({
        "key": "contact",
        "type": "email",
        "validators": { "pattern": {}, "corporateDomain": {} },
        "props": { "pattern": "^.+@acme\\.com$" }
    }))
    .ok();

    let processed = field.map(|field| processor.process_field(field));

    assert_eq!(
        processed.as_ref().map(rule_names),
        Some(vec!["email".to_owned(), "pattern".to_owned()])
    );
}

#[test]
fn field_array_templates_are_processed() {
    let processor = FieldTreeProcessor::default();
    let field: Option<FieldDescription> = serde_json::from_value(json!({
        "key": "phones",
        "type": "repeat",
        "fieldArray": {
            "fieldGroup": [{ "key": "number", "type": "input", "props": { "required": true } }]
        }
    }))
    .ok();

    let processed = field.map(|field| processor.process_field(field));
    let template_leaf = processed
        .as_ref()
        .and_then(|field| field.field_array.as_ref())
        .and_then(|template| template.field_group.first());

    assert_eq!(template_leaf.map(rule_names), Some(vec!["required".to_owned()]));
}

#[test]
fn malformed_props_pass_through_without_rules() {
    let processor = FieldTreeProcessor::default();
    let field: Option<FieldDescription> = serde_json::from_value(json!({
        "key": "notes",
        "type": "textarea",
        "props": { "required": "", "minLength": null, "pattern": 42 }
    }))
    .ok();

    let processed = field.clone().map(|field| processor.process_field(field));

    assert_eq!(processed, field);
}

#[test]
fn server_messages_override_manual_and_derived_messages() {
    let processor = FieldTreeProcessor::default();
    let tree = vec![
        FieldDescription::leaf("username", "input")
            .with_props(FieldProps::new().with("required", true).with("maxLength", 15)),
        FieldDescription::leaf("email", "input")
            .with_props(FieldProps::new().with("required", true))
            .with_messages(messages(&[("required", "manual")])),
    ];
    let server: ServerMessages = [
        ("username".to_owned(), messages(&[("required", "from server")])),
        ("email".to_owned(), messages(&[("required", "server wins")])),
    ]
    .into_iter()
    .collect();

    let processed = processor.process_fields_with_server_messages(tree, &server);

    let username = processed[0].messages();
    assert_eq!(
        username.and_then(|m| m.get("required")).map(String::as_str),
        Some("from server")
    );
    assert_eq!(
        username.and_then(|m| m.get("maxlength")).map(String::as_str),
        Some("Cannot be more than 15 characters")
    );
    assert_eq!(
        processed[1]
            .messages()
            .and_then(|m| m.get("required"))
            .map(String::as_str),
        Some("server wins")
    );
}

fn backend_props(min_length: i64) -> BackendFieldProps {
    BackendFieldProps {
        id: Some("p1".to_owned()),
        formly_field_config_id: Some("f1".to_owned()),
        input_type: Some(String::new()),
        label: Some("Country".to_owned()),
        placeholder: Some(String::new()),
        max: Some(0.0),
        min: Some(0.0),
        min_length: Some(min_length),
        max_length: Some(0),
        pattern: Some(String::new()),
        required: Some(true),
        disabled: Some(false),
        rows: Some(0),
        options: Some(vec![
            BackendFieldOption {
                id: Some("o1".to_owned()),
                formly_field_prop_id: Some("p1".to_owned()),
                value: Some(json!("co")),
                label: Some("Colombia".to_owned()),
            },
            BackendFieldOption {
                label: Some("Spain".to_owned()),
                ..BackendFieldOption::default()
            },
        ]),
        ..BackendFieldProps::default()
    }
}

fn backend_form(min_length: i64) -> BackendFormResponse {
    BackendFormResponse {
        id: "9b2e".to_owned(),
        name: "Backend form".to_owned(),
        description: Some(String::new()),
        version: Some(3),
        fields: vec![BackendFieldConfig {
            id: Some("g1".to_owned()),
            field_group_class_name: Some("display-grid".to_owned()),
            key: Some(String::new()),
            field_group: Some(vec![BackendFieldConfig {
                id: Some("f1".to_owned()),
                parent_id: Some("g1".to_owned()),
                key: Some("country".to_owned()),
                field_type: Some("select".to_owned()),
                class_name: Some("col-6".to_owned()),
                props: Some(backend_props(min_length)),
                validation: Some(BackendFieldValidation {
                    messages: Some(Default::default()),
                    ..BackendFieldValidation::default()
                }),
                hide: Some(false),
                ..BackendFieldConfig::default()
            }]),
            ..BackendFieldConfig::default()
        }],
    }
}

#[test]
fn backend_zero_min_length_does_not_become_a_rule() {
    let processor = FieldTreeProcessor::default();

    let definition = processor.process_backend_form(backend_form(0));
    let country = &definition.fields()[0].field_group[0];

    assert_eq!(definition.id().as_str(), "9b2e");
    assert_eq!(definition.version(), 3);
    assert_eq!(definition.description(), None);
    assert_eq!(rule_names(country), vec!["required".to_owned()]);
    let props = country.props.as_ref().map(FieldProps::as_map);
    for stripped in ["minLength", "maxLength", "min", "max", "rows", "pattern", "type", "disabled"] {
        assert!(props.is_some_and(|props| !props.contains_key(stripped)), "{stripped}");
    }
    assert_eq!(country.hide, None);
}

#[test]
fn backend_positive_min_length_becomes_a_rule() {
    let processor = FieldTreeProcessor::default();

    let definition = processor.process_backend_form(backend_form(4));
    let country = &definition.fields()[0].field_group[0];

    assert_eq!(
        rule_names(country),
        vec!["minlength".to_owned(), "required".to_owned()]
    );
}

#[test]
fn backend_options_map_to_value_label_pairs() {
    let processor = FieldTreeProcessor::default();

    let definition = processor.process_backend_form(backend_form(0));
    let group = &definition.fields()[0];
    let country = &group.field_group[0];

    assert_eq!(group.key(), None);
    assert!(group.is_grid_group());
    assert_eq!(country.column_span(), Some(6));
    assert_eq!(
        country.props.as_ref().and_then(|props| props.get("options")),
        Some(&json!([
            { "value": "co", "label": "Colombia" },
            { "value": "Spain", "label": "Spain" }
        ]))
    );
}

#[test]
fn backend_messages_are_kept_as_supplied() {
    let processor = FieldTreeProcessor::default();
    let mut form = backend_form(3);
    if let Some(child) = form.fields[0]
        .field_group
        .as_mut()
        .and_then(|children| children.first_mut())
    {
        child.validation = Some(BackendFieldValidation {
            messages: Some(messages(&[("required", "Pick a country")])),
            show: Some(true),
            ..BackendFieldValidation::default()
        });
    }

    let definition = processor.process_backend_form(form);
    let country = &definition.fields()[0].field_group[0];

    assert_eq!(rule_names(country), vec!["required".to_owned()]);
    assert_eq!(
        country.validation.as_ref().and_then(|validation| validation.show),
        Some(true)
    );
}
