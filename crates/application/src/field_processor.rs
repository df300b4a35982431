use std::collections::BTreeMap;

use formloom_core::FormDefinitionId;
use formloom_domain::{
    BackendFormResponse, FieldDescription, FormDefinition, FormDefinitionPayload,
    FormDefinitionResponse, ValidationConfig, ValidationMessages,
};
use tracing::debug;

use crate::validation_messages::ValidationMessageCatalog;

mod backend_conversion;
pub(crate) mod detect;

/// Per-field message overrides keyed by field key.
pub type ServerMessages = BTreeMap<String, ValidationMessages>;

/// Turns server-described field trees into renderable field trees.
///
/// Processing never fails: nodes it cannot interpret pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldTreeProcessor {
    catalog: ValidationMessageCatalog,
}

impl FieldTreeProcessor {
    /// Creates a processor rendering messages with `catalog`.
    #[must_use]
    pub fn new(catalog: ValidationMessageCatalog) -> Self {
        Self { catalog }
    }

    /// Returns the message catalog.
    #[must_use]
    pub fn catalog(&self) -> &ValidationMessageCatalog {
        &self.catalog
    }

    /// Attaches derived validation messages to every node of the forest.
    #[must_use]
    pub fn process_fields(&self, fields: Vec<FieldDescription>) -> Vec<FieldDescription> {
        fields
            .into_iter()
            .map(|field| self.process_field(field))
            .collect()
    }

    /// Attaches derived validation messages to one node and its descendants.
    ///
    /// A node that already carries messages is returned as is.
    #[must_use]
    pub fn process_field(&self, mut field: FieldDescription) -> FieldDescription {
        if field.messages().is_some() {
            return field;
        }

        let rules = detect::detect_rules(&field);
        if !rules.is_empty() {
            let messages = self.catalog.messages_for(&rules, field.props.as_ref());
            let show = field.validation.as_ref().and_then(|validation| validation.show);
            field.validation = Some(ValidationConfig {
                messages: Some(messages),
                show,
            });
        }

        if field.is_group() {
            field.field_group = self.process_fields(std::mem::take(&mut field.field_group));
        }

        if let Some(template) = field.field_array.as_mut()
            && template.is_group()
        {
            template.field_group = self.process_fields(std::mem::take(&mut template.field_group));
        }

        field
    }

    /// Processes the forest, then lets server-supplied messages win per rule.
    ///
    /// Overrides apply to top-level nodes matched by key.
    #[must_use]
    pub fn process_fields_with_server_messages(
        &self,
        fields: Vec<FieldDescription>,
        server_messages: &ServerMessages,
    ) -> Vec<FieldDescription> {
        fields
            .into_iter()
            .map(|field| {
                let mut processed = self.process_field(field);
                let overrides = processed
                    .key()
                    .and_then(|key| server_messages.get(key))
                    .cloned();

                if let Some(overrides) = overrides {
                    let validation = processed.validation.get_or_insert_with(ValidationConfig::default);
                    validation
                        .messages
                        .get_or_insert_with(ValidationMessages::new)
                        .extend(overrides);
                }

                processed
            })
            .collect()
    }

    /// Converts any supported payload shape into a processed form definition.
    #[must_use]
    pub fn process_payload(&self, payload: FormDefinitionPayload) -> FormDefinition {
        match payload {
            FormDefinitionPayload::Flat(response) => self.process_flat_form(response),
            FormDefinitionPayload::Backend(response) => self.process_backend_form(response),
        }
    }

    /// Processes a flat `{formName, fields}` response.
    #[must_use]
    pub fn process_flat_form(&self, response: FormDefinitionResponse) -> FormDefinition {
        let id = response
            .id
            .and_then(|id| FormDefinitionId::new(id).ok())
            .unwrap_or_else(FormDefinitionId::local);

        FormDefinition::new(
            id,
            response.version.unwrap_or(FormDefinition::DEFAULT_VERSION),
            response.form_name,
            response.description,
            self.process_fields(response.fields),
        )
    }

    /// Rewrites a backend form into canonical field descriptions and processes them.
    #[must_use]
    pub fn process_backend_form(&self, response: BackendFormResponse) -> FormDefinition {
        let id = FormDefinitionId::new(response.id).unwrap_or_else(|_| FormDefinitionId::local());
        let fields: Vec<FieldDescription> = response
            .fields
            .into_iter()
            .map(backend_conversion::convert_field)
            .collect();

        debug!(
            form_definition_id = %id,
            top_level_fields = fields.len(),
            "converted backend form definition"
        );

        FormDefinition::new(
            id,
            response.version.unwrap_or(FormDefinition::DEFAULT_VERSION),
            response.name,
            response.description,
            self.process_fields(fields),
        )
    }
}

#[cfg(test)]
mod tests;
