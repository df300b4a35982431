use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use formloom_core::{AppError, AppResult, FormDefinitionId};
use formloom_domain::{CreateSubmissionRequest, FormDefinitionPayload};
use serde_json::{Map, Value, json};
use tokio::sync::Notify;

use super::{FormDefinitionStore, LoadStatus};
use crate::field_processor::FieldTreeProcessor;
use crate::form_ports::{FormDefinitionSource, SubmissionTransport};

struct ScriptedFetch {
    gate: Option<Arc<Notify>>,
    response: AppResult<FormDefinitionPayload>,
}

#[derive(Default)]
struct ScriptedSource {
    calls: AtomicUsize,
    script: Mutex<VecDeque<ScriptedFetch>>,
}

impl ScriptedSource {
    fn push(&self, gate: Option<Arc<Notify>>, response: AppResult<FormDefinitionPayload>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(ScriptedFetch { gate, response });
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormDefinitionSource for ScriptedSource {
    async fn fetch_form_definition(&self) -> AppResult<FormDefinitionPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock script: {error}")))?
            .pop_front()
            .ok_or_else(|| AppError::Internal("no scripted response left".to_owned()))?;

        if let Some(gate) = step.gate {
            gate.notified().await;
        }

        step.response
    }
}

#[derive(Default)]
struct RecordingTransport {
    fail: bool,
    sent: Mutex<Vec<CreateSubmissionRequest>>,
}

#[async_trait]
impl SubmissionTransport for RecordingTransport {
    async fn submit(&self, request: &CreateSubmissionRequest) -> AppResult<Value> {
        self.sent
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock transport: {error}")))?
            .push(request.clone());

        if self.fail {
            return Err(AppError::UpstreamStatus {
                status: 502,
                message: "bad gateway".to_owned(),
            });
        }

        Ok(json!({ "id": "sub-1", "status": "Submitted" }))
    }
}

fn payload(value: Value) -> FormDefinitionPayload {
    serde_json::from_value(value).unwrap_or_else(|error| panic!("invalid test payload: {error}"))
}

fn registration_payload() -> FormDefinitionPayload {
    payload(json!({
        "formName": "Registration",
        "id": "reg-1",
        "version": 2,
        "fields": [
            {
                "fieldGroupClassName": "display-grid",
                "fieldGroup": [
                    { "key": "firstName", "type": "input", "props": { "required": true } },
                    { "key": "age", "type": "input", "props": { "type": "number", "min": 18 } }
                ]
            },
            {
                "key": "email",
                "type": "input",
                "props": { "label": "Email", "required": true, "type": "email" }
            }
        ]
    }))
}

fn named_payload(name: &str) -> FormDefinitionPayload {
    payload(json!({
        "formName": name,
        "fields": [{ "key": "answer", "type": "input" }]
    }))
}

fn store_with(
    source: Arc<ScriptedSource>,
    transport: Arc<RecordingTransport>,
) -> FormDefinitionStore {
    FormDefinitionStore::new(source, transport, FieldTreeProcessor::default())
}

#[tokio::test]
async fn load_stores_processed_tree_and_derived_views() {
    let source = Arc::new(ScriptedSource::default());
    source.push(None, Ok(registration_payload()));
    let store = store_with(source.clone(), Arc::new(RecordingTransport::default()));

    store.load().await;
    let state = store.snapshot();

    assert_eq!(state.status(), LoadStatus::Ready);
    assert!(state.is_ready());
    assert!(!state.loading);
    assert_eq!(state.form_name.as_deref(), Some("Registration"));
    assert_eq!(
        state.form_definition_id.as_ref().map(FormDefinitionId::as_str),
        Some("reg-1")
    );
    assert_eq!(state.version, Some(2));
    assert!(state.last_updated.is_some());
    assert_eq!(state.field_count(), 3);

    let stats = state.form_stats();
    assert_eq!((stats.total, stats.required, stats.optional), (3, 2, 1));
    assert_eq!(stats.types, vec!["input".to_owned()]);

    let email = store.get_field_by_key("email");
    assert!(
        email
            .as_ref()
            .and_then(|field| field.messages())
            .is_some_and(|messages| messages.contains_key("email"))
    );
}

#[tokio::test]
async fn network_failure_ends_in_error_state() {
    let source = Arc::new(ScriptedSource::default());
    source.push(
        None,
        Err(AppError::Unavailable("connection refused".to_owned())),
    );
    let store = store_with(source, Arc::new(RecordingTransport::default()));

    store.load().await;
    let state = store.snapshot();

    assert_eq!(state.status(), LoadStatus::Error);
    assert!(!state.loading);
    assert!(!state.has_data());
    assert_eq!(
        state.error.as_deref(),
        Some("Could not connect to the server. Check your connection.")
    );
}

#[tokio::test]
async fn http_failure_reports_status_code() {
    let source = Arc::new(ScriptedSource::default());
    source.push(
        None,
        Err(AppError::UpstreamStatus {
            status: 500,
            message: "boom".to_owned(),
        }),
    );
    let store = store_with(source, Arc::new(RecordingTransport::default()));

    store.load().await;

    assert_eq!(
        store.snapshot().error.as_deref(),
        Some("Error loading the form (500)")
    );
}

#[tokio::test]
async fn retry_while_loading_does_not_fetch_again() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(ScriptedSource::default());
    source.push(Some(gate.clone()), Ok(registration_payload()));
    let store = store_with(source.clone(), Arc::new(RecordingTransport::default()));
    let mut updates = store.subscribe();

    let in_flight = tokio::spawn({
        let store = store.clone();
        async move { store.load().await }
    });
    assert!(updates.wait_for(|state| state.loading).await.is_ok());

    store.retry().await;
    assert_eq!(source.calls(), 1);

    gate.notify_one();
    assert!(in_flight.await.is_ok());

    assert_eq!(source.calls(), 1);
    assert!(store.snapshot().is_ready());
}

#[tokio::test]
async fn retry_after_error_loads_again() {
    let source = Arc::new(ScriptedSource::default());
    source.push(
        None,
        Err(AppError::Unavailable("connection refused".to_owned())),
    );
    source.push(None, Ok(registration_payload()));
    let store = store_with(source.clone(), Arc::new(RecordingTransport::default()));

    store.load().await;
    store.retry().await;

    assert_eq!(source.calls(), 2);
    let state = store.snapshot();
    assert!(state.error.is_none());
    assert!(state.is_ready());
}

#[tokio::test]
async fn dropped_load_clears_loading_so_retry_fetches_again() {
    let source = Arc::new(ScriptedSource::default());
    source.push(Some(Arc::new(Notify::new())), Ok(named_payload("Stuck")));
    source.push(None, Ok(registration_payload()));
    let store = store_with(source.clone(), Arc::new(RecordingTransport::default()));

    let timed_out = tokio::time::timeout(Duration::from_millis(20), store.load()).await;
    assert!(timed_out.is_err());
    assert!(!store.is_loading());

    store.retry().await;

    assert_eq!(source.calls(), 2);
    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.form_name.as_deref(), Some("Registration"));
}

#[tokio::test]
async fn aborted_superseded_load_leaves_the_newer_load_running() {
    let first_gate = Arc::new(Notify::new());
    let second_gate = Arc::new(Notify::new());
    let source = Arc::new(ScriptedSource::default());
    source.push(Some(first_gate), Ok(named_payload("First")));
    source.push(Some(second_gate.clone()), Ok(named_payload("Second")));
    let store = store_with(source.clone(), Arc::new(RecordingTransport::default()));
    let mut updates = store.subscribe();

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.load().await }
    });
    assert!(updates.wait_for(|state| state.loading).await.is_ok());
    let second = tokio::spawn({
        let store = store.clone();
        async move { store.load().await }
    });
    while source.calls() < 2 {
        tokio::task::yield_now().await;
    }

    first.abort();
    assert!(first.await.is_err());
    assert!(store.is_loading());

    second_gate.notify_one();
    assert!(second.await.is_ok());
    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.form_name.as_deref(), Some("Second"));
}

#[tokio::test]
async fn null_collections_in_a_payload_still_load() {
    let source = Arc::new(ScriptedSource::default());
    source.push(
        None,
        Ok(payload(json!({
            "formName": "X",
            "fields": [{
                "key": "age",
                "type": "input",
                "fieldGroup": null,
                "wrappers": null,
                "props": { "required": true }
            }]
        }))),
    );
    let store = store_with(source, Arc::new(RecordingTransport::default()));

    store.load().await;
    let state = store.snapshot();

    assert!(state.is_ready());
    assert_eq!(state.field_count(), 1);
    assert!(
        state
            .get_field_by_key("age")
            .and_then(|field| field.messages())
            .is_some_and(|messages| messages.contains_key("required"))
    );
}

#[tokio::test]
async fn reset_discards_a_load_still_in_flight() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(ScriptedSource::default());
    source.push(Some(gate.clone()), Ok(registration_payload()));
    let store = store_with(source, Arc::new(RecordingTransport::default()));
    let mut updates = store.subscribe();

    let in_flight = tokio::spawn({
        let store = store.clone();
        async move { store.load().await }
    });
    assert!(updates.wait_for(|state| state.loading).await.is_ok());

    store.reset();
    gate.notify_one();
    assert!(in_flight.await.is_ok());

    let state = store.snapshot();
    assert_eq!(state.status(), LoadStatus::Idle);
    assert!(state.fields.is_empty());
    assert!(state.form_name.is_none());
}

#[tokio::test]
async fn newer_load_replaces_an_older_one() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(ScriptedSource::default());
    source.push(Some(gate.clone()), Ok(named_payload("older")));
    source.push(None, Ok(named_payload("newer")));
    let store = store_with(source, Arc::new(RecordingTransport::default()));
    let mut updates = store.subscribe();

    let older = tokio::spawn({
        let store = store.clone();
        async move { store.load().await }
    });
    assert!(updates.wait_for(|state| state.loading).await.is_ok());

    store.load().await;
    gate.notify_one();
    assert!(older.await.is_ok());

    let state = store.snapshot();
    assert_eq!(state.form_name.as_deref(), Some("newer"));
    assert!(!state.loading);
}

#[tokio::test]
async fn reset_returns_to_initial_state() {
    let source = Arc::new(ScriptedSource::default());
    source.push(None, Ok(registration_payload()));
    let store = store_with(source, Arc::new(RecordingTransport::default()));

    store.load().await;
    store.reset();

    assert_eq!(store.snapshot(), super::FormState::default());
}

#[tokio::test]
async fn update_field_merges_props_and_keeps_the_rest() {
    let source = Arc::new(ScriptedSource::default());
    source.push(None, Ok(registration_payload()));
    let store = store_with(source, Arc::new(RecordingTransport::default()));
    store.load().await;
    let before = store.get_field_by_key("email");

    let mut partial = Map::new();
    partial.insert("props".to_owned(), json!({ "required": false }));
    let fields = store.update_field("email", &partial);

    let email = fields
        .ok()
        .and_then(|fields| fields.into_iter().find(|field| field.key() == Some("email")));
    let props = email.as_ref().and_then(|field| field.props.as_ref());
    assert_eq!(props.map(|props| props.required()), Some(false));
    assert_eq!(props.and_then(|props| props.label()), Some("Email"));
    assert_eq!(props.and_then(|props| props.input_type()), Some("email"));
    assert_eq!(
        email.as_ref().and_then(|field| field.field_type.as_deref()),
        Some("input")
    );
    assert_eq!(
        email.as_ref().and_then(|field| field.messages()),
        before.as_ref().and_then(|field| field.messages())
    );
    assert_eq!(store.snapshot().form_stats().required, 1);
}

#[tokio::test]
async fn update_field_without_match_is_a_no_op() {
    let source = Arc::new(ScriptedSource::default());
    source.push(None, Ok(registration_payload()));
    let store = store_with(source, Arc::new(RecordingTransport::default()));
    store.load().await;
    let before = store.snapshot().fields;

    let mut partial = Map::new();
    partial.insert("className".to_owned(), json!("col-12"));

    assert_eq!(store.update_field("firstName", &partial).ok(), Some(before.clone()));
    assert_eq!(store.snapshot().fields, before);
}

#[tokio::test]
async fn get_field_by_key_only_searches_top_level() {
    let source = Arc::new(ScriptedSource::default());
    source.push(None, Ok(registration_payload()));
    let store = store_with(source, Arc::new(RecordingTransport::default()));
    store.load().await;

    assert!(store.get_field_by_key("email").is_some());
    assert!(store.get_field_by_key("firstName").is_none());
}

fn submission() -> CreateSubmissionRequest {
    CreateSubmissionRequest {
        form_definition_id: FormDefinitionId::local(),
        form_version: 1,
        is_complete: true,
        data: Map::new(),
        completion_time: Some(12),
        metadata: None,
    }
}

#[tokio::test]
async fn submit_forwards_to_transport() {
    let transport = Arc::new(RecordingTransport::default());
    let store = store_with(Arc::new(ScriptedSource::default()), transport.clone());

    let response = store.submit(&submission()).await;

    assert_eq!(
        response.ok().and_then(|value| value.get("id").cloned()),
        Some(json!("sub-1"))
    );
    assert_eq!(transport.sent.lock().map(|sent| sent.len()).unwrap_or(0), 1);
    let state = store.snapshot();
    assert!(!state.submitting);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn failed_submit_is_returned_and_recorded() {
    let transport = Arc::new(RecordingTransport {
        fail: true,
        ..RecordingTransport::default()
    });
    let store = store_with(Arc::new(ScriptedSource::default()), transport);

    let response = store.submit(&submission()).await;

    assert!(matches!(
        response,
        Err(AppError::UpstreamStatus { status: 502, .. })
    ));
    assert_eq!(
        store.snapshot().error.as_deref(),
        Some("Error sending the form")
    );
}
