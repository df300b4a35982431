use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use formloom_core::{AppError, AppResult, FormDefinitionId};
use formloom_domain::{CreateSubmissionRequest, FieldDescription, FieldValidationError};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::form_ports::DeviceMetadataProvider;
use crate::form_store::{FormDefinitionStore, FormState};

mod controls;

use controls::{
    BoundControl, PatternCache, bind_controls, check_control, set_value_at, value_at,
};

/// Shortest time the loading indicator stays visible after a session starts.
pub const MINIMUM_LOADING_DURATION: Duration = Duration::from_millis(800);

const DEFAULT_FORM_VERSION: u32 = 1;

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent.
    Invalid(Vec<FieldValidationError>),
    /// The submission was accepted by the transport.
    Submitted {
        /// Request that was sent.
        request: CreateSubmissionRequest,
        /// Backend answer.
        response: Value,
    },
}

/// One user answering one form.
///
/// Binds an input control to every keyed leaf of the store's field tree and
/// falls back to a local tree while the store has none.
pub struct FormSession {
    store: FormDefinitionStore,
    device: Arc<dyn DeviceMetadataProvider>,
    fallback_fields: Vec<FieldDescription>,
    started_at: Option<Instant>,
    model: Map<String, Value>,
    touched: BTreeSet<String>,
    patterns: PatternCache,
    updates: watch::Receiver<FormState>,
}

impl FormSession {
    /// Creates a session over `store`.
    #[must_use]
    pub fn new(store: FormDefinitionStore, device: Arc<dyn DeviceMetadataProvider>) -> Self {
        let updates = store.subscribe();
        Self {
            store,
            device,
            fallback_fields: Vec::new(),
            started_at: None,
            model: Map::new(),
            touched: BTreeSet::new(),
            patterns: PatternCache::default(),
            updates,
        }
    }

    /// Sets the tree rendered while the store has no fields.
    ///
    /// The tree goes through the store's processor so it carries messages.
    #[must_use]
    pub fn with_fallback_fields(mut self, fields: Vec<FieldDescription>) -> Self {
        self.fallback_fields = self.store.processor().process_fields(fields);
        self.seed_defaults();
        self
    }

    /// Returns the store backing this session.
    #[must_use]
    pub fn store(&self) -> &FormDefinitionStore {
        &self.store
    }

    /// Records the start instant and loads the form definition.
    pub async fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.store.load().await;
        self.updates.mark_unchanged();
        self.seed_defaults();
    }

    /// Waits for the next store change and returns the new state.
    pub async fn next_update(&mut self) -> AppResult<FormState> {
        self.updates
            .changed()
            .await
            .map_err(|error| AppError::Internal(format!("form store closed: {error}")))?;
        let state = self.updates.borrow_and_update().clone();
        self.seed_defaults();
        Ok(state)
    }

    /// Returns the tree currently rendered.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDescription> {
        let fields = self.store.snapshot().fields;
        if fields.is_empty() {
            self.fallback_fields.clone()
        } else {
            fields
        }
    }

    /// Returns the key path of every bound control in render order.
    #[must_use]
    pub fn control_paths(&self) -> Vec<String> {
        self.controls()
            .into_iter()
            .map(|control| control.path)
            .collect()
    }

    /// Stores a control value.
    pub fn set_value(&mut self, path: &str, value: Value) -> AppResult<()> {
        self.require_control(path)?;
        set_value_at(&mut self.model, path, value);
        Ok(())
    }

    /// Returns a control value.
    #[must_use]
    pub fn value(&self, path: &str) -> Option<&Value> {
        value_at(&self.model, path)
    }

    /// Returns the entered values, nested by keyed groups.
    #[must_use]
    pub fn value_map(&self) -> &Map<String, Value> {
        &self.model
    }

    /// Marks a control as touched so its errors are shown.
    pub fn touch(&mut self, path: &str) -> AppResult<()> {
        self.require_control(path)?;
        self.touched.insert(path.to_owned());
        Ok(())
    }

    /// Returns whether a control was touched.
    #[must_use]
    pub fn is_touched(&self, path: &str) -> bool {
        self.touched.contains(path)
    }

    /// Validates every bound control.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldValidationError> {
        let catalog = self.store.processor().catalog();
        self.controls()
            .iter()
            .filter_map(|control| {
                check_control(control, self.value(&control.path), catalog, &self.patterns)
            })
            .collect()
    }

    /// Returns the errors a renderer should display right now.
    ///
    /// A control shows its error once touched, or immediately when its
    /// validation block sets `show`.
    #[must_use]
    pub fn visible_errors(&self) -> Vec<FieldValidationError> {
        let catalog = self.store.processor().catalog();
        self.controls()
            .iter()
            .filter(|control| {
                self.is_touched(&control.path)
                    || control
                        .field
                        .validation
                        .as_ref()
                        .and_then(|validation| validation.show)
                        .unwrap_or(false)
            })
            .filter_map(|control| {
                check_control(control, self.value(&control.path), catalog, &self.patterns)
            })
            .collect()
    }

    /// Submits the answered form.
    ///
    /// An invalid form marks every control touched and is not sent.
    pub async fn submit(&mut self) -> AppResult<SubmitOutcome> {
        let errors = self.validate();
        if !errors.is_empty() {
            let paths = self.control_paths();
            self.touched.extend(paths);
            warn!(
                invalid_fields = errors.len(),
                "form is invalid, submission skipped"
            );
            return Ok(SubmitOutcome::Invalid(errors));
        }

        let request = self.build_request(true);
        let response = self.store.submit(&request).await?;
        info!(
            form_definition_id = %request.form_definition_id,
            completion_time = request.completion_time,
            field_count = self.store.snapshot().field_count(),
            "form submission accepted"
        );

        Ok(SubmitOutcome::Submitted { request, response })
    }

    /// Sends the current values as a draft without validating them.
    pub async fn save_draft(&self) -> AppResult<Value> {
        let request = self.build_request(false);
        self.store.submit(&request).await
    }

    /// Returns whether the loading indicator should be shown at `now`.
    #[must_use]
    pub fn is_loading_visible(&self, now: Instant) -> bool {
        let within_minimum = self
            .started_at
            .is_some_and(|started_at| now.saturating_duration_since(started_at) < MINIMUM_LOADING_DURATION);

        self.store.is_loading() || within_minimum
    }

    fn controls(&self) -> Vec<BoundControl> {
        bind_controls(&self.fields())
    }

    fn require_control(&self, path: &str) -> AppResult<()> {
        if self.controls().iter().any(|control| control.path == path) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("no control bound to '{path}'")))
        }
    }

    fn seed_defaults(&mut self) {
        for control in self.controls() {
            if let Some(default_value) = control.field.default_value
                && value_at(&self.model, &control.path).is_none()
            {
                set_value_at(&mut self.model, &control.path, default_value);
            }
        }
    }

    fn build_request(&self, is_complete: bool) -> CreateSubmissionRequest {
        let state = self.store.snapshot();
        let completion_time = self
            .started_at
            .map(|started_at| started_at.elapsed().as_secs());

        CreateSubmissionRequest {
            form_definition_id: state
                .form_definition_id
                .unwrap_or_else(FormDefinitionId::local),
            form_version: state.version.unwrap_or(DEFAULT_FORM_VERSION),
            is_complete,
            data: self.model.clone(),
            completion_time,
            metadata: Some(self.device.metadata()),
        }
    }
}
