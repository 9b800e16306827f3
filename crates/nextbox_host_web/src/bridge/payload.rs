//! Conversions between SDK payloads and contract types.
//!
//! Kept free of `wasm-bindgen` so the mapping is testable on every target.

use nextbox_contract::{
    FileSelectOptions, HostError, HostEvent, HostEventKind, RawResponse, SelectedFile, ViewMode,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Rejection {
    Response(RawResponse),
    Failure { message: String },
}

/// Maps a value thrown by the JS glue to a [`HostError`].
pub fn host_error_from_rejection(value: Value) -> HostError {
    match serde_json::from_value::<Rejection>(value.clone()) {
        Ok(Rejection::Response(response)) => HostError::Response(response),
        Ok(Rejection::Failure { message }) => HostError::Failure(message),
        Err(_) => match value {
            Value::String(message) => HostError::Failure(message),
            other => HostError::Failure(other.to_string()),
        },
    }
}

#[derive(Deserialize)]
struct ModePayload {
    view: ViewMode,
}

#[derive(Deserialize)]
struct FilesPayload {
    #[serde(default)]
    paths: Vec<String>,
}

fn selected(path: String) -> SelectedFile {
    let name = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    SelectedFile {
        path,
        name,
        kind: None,
    }
}

/// Decodes the payload the SDK passes to an event handler.
///
/// # Errors
///
/// Returns a description of the payload when it does not match the channel.
pub fn decode_event(kind: HostEventKind, payload: Value) -> Result<HostEvent, String> {
    match kind {
        HostEventKind::SaveAndClose => Ok(HostEvent::SaveAndClose),
        HostEventKind::ModeChange => serde_json::from_value::<ModePayload>(payload.clone())
            .map(|p| p.view)
            .or_else(|_| serde_json::from_value::<ViewMode>(payload.clone()))
            .map(HostEvent::ModeChanged)
            .map_err(|_| format!("unrecognized {} payload: {payload}", kind.event_name())),
        HostEventKind::FilesSelected => {
            if let Ok(files) = serde_json::from_value::<Vec<SelectedFile>>(payload.clone()) {
                return Ok(HostEvent::FilesSelected(files));
            }
            serde_json::from_value::<FilesPayload>(payload.clone())
                .map(|p| HostEvent::FilesSelected(p.paths.into_iter().map(selected).collect()))
                .map_err(|_| format!("unrecognized {} payload: {payload}", kind.event_name()))
        }
    }
}

/// Builds the options object for `Transport.openModalFilesSelect`.
pub fn file_select_payload(options: &FileSelectOptions) -> Value {
    let mut payload = Map::new();
    payload.insert("multy".to_string(), json!(options.multiple));
    if let Some(title) = &options.title {
        payload.insert("title".to_string(), json!(title));
    }
    if let Some(filter) = options.filter {
        payload.insert("filter".to_string(), json!(filter));
    }
    if !options.file_name_ext.is_empty() {
        payload.insert("file_name_ext".to_string(), json!(options.file_name_ext));
    }
    Value::Object(payload)
}
