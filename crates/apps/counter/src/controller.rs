//! Counter document logic shared by the component and its tests.

use std::rc::Rc;

use nextbox_contract::{
    Connection, HostEvent, HostEventKind, HostServices, HostStateCell, HostTransport,
    Subscription, ViewMode,
};
use nextbox_service::{
    notification_with_message, NextboxError, NextboxService, NodeContent, NotificationKey,
    ReadNodeOptions, UpdateNode, UpdateNodeOptions,
};
use serde_json::Value;

use crate::autosave::AutosaveThrottle;
use crate::config::CounterConfig;

/// Converts stored content to a count; anything non-numeric reads as zero.
pub fn parse_count(content: &NodeContent) -> i64 {
    let value = match content {
        NodeContent::Json(value) => value.clone(),
        NodeContent::Text(text) => match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) => value,
            Err(_) => return 0,
        },
    };
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of an increment.
pub struct Increment {
    /// New counter value.
    pub count: i64,
    /// An autosave is due for the new value.
    pub autosave: bool,
}

/// Reads, increments and saves the counter document.
#[derive(Clone)]
pub struct CounterController {
    service: NextboxService,
    state: HostStateCell,
    transport: Rc<dyn HostTransport>,
    throttle: AutosaveThrottle,
    config: CounterConfig,
}

impl CounterController {
    /// Creates a controller over `services`.
    pub fn new(services: &HostServices, config: CounterConfig) -> Self {
        Self {
            service: NextboxService::from_host(services),
            state: services.state.clone(),
            transport: services.transport.clone(),
            throttle: AutosaveThrottle::new(
                services.prefs.clone(),
                config.last_save_key.clone(),
                config.autosave_interval_ms,
            ),
            config,
        }
    }

    /// Full path of the counter node.
    ///
    /// # Errors
    ///
    /// Returns [`NextboxError::Uninitialized`] before host init.
    pub fn target_path(&self) -> Result<String, NextboxError> {
        self.state.with(|state| {
            state
                .map(|state| self.config.resolve_target(&state.storage.path))
                .ok_or(NextboxError::Uninitialized)
        })
    }

    /// Mode the host opened the document in; view mode when unknown.
    pub fn initial_mode(&self) -> ViewMode {
        self.state
            .with(|state| state.and_then(|state| state.view))
            .unwrap_or(ViewMode::View)
    }

    /// Returns `true` once the adapter refuses writes.
    pub fn is_save_blocked(&self) -> bool {
        self.service.is_save_blocked()
    }

    /// Reads the stored count. A missing or empty node reads as zero.
    ///
    /// # Errors
    ///
    /// Returns any other read failure.
    pub async fn load_count(&self) -> Result<i64, NextboxError> {
        let path = self.target_path()?;
        let options = ReadNodeOptions {
            read_as_json: true,
            normalize_path: true,
        };
        match self.service.read_node(&path, options).await {
            Ok(content) => Ok(parse_count(&content)),
            Err(NextboxError::EmptyJson) => Ok(0),
            Err(err) if err.is_expected() => Ok(0),
            Err(err) => Err(err),
        }
    }

    /// Marks the document dirty and bumps the count.
    pub fn increment(&self, count: i64, now_ms: u64) -> Increment {
        self.transport.change_content(true);
        Increment {
            count: count.saturating_add(1),
            autosave: self.throttle.try_begin(now_ms),
        }
    }

    /// Writes `count` and clears the dirty flag.
    ///
    /// # Errors
    ///
    /// Returns the update failure, including [`NextboxError::SaveBlocked`].
    pub async fn save(&self, count: i64, now_ms: u64) -> Result<(), NextboxError> {
        let update = UpdateNode {
            full_path: self.target_path()?,
            data: Value::from(count),
        };
        let options = UpdateNodeOptions {
            write_as_json: true,
            normalize_path: true,
        };
        self.service.update_node(update, options).await?;
        self.transport.change_content(false);
        self.throttle.record(now_ms);
        Ok(())
    }

    /// Lists connections; failures are toasted under the connections entry.
    ///
    /// # Errors
    ///
    /// Returns the adapter failure.
    pub async fn load_connections(&self) -> Result<Vec<Connection>, NextboxError> {
        match self.service.get_connections().await {
            Ok(connections) => Ok(connections.unwrap_or_default()),
            Err(err) => {
                self.transport.toast(&notification_with_message(
                    NotificationKey::ApiGetConnectionsError,
                    err.to_string(),
                ));
                Err(err)
            }
        }
    }

    /// Opens the host file picker.
    pub fn pick_files(&self) {
        self.transport
            .open_modal_files_select(&self.config.file_select_options());
    }

    /// Subscribes `on_event` to every host event channel.
    pub fn subscribe_events(&self, on_event: impl Fn(HostEvent) + 'static) -> Vec<Subscription> {
        let handler: Rc<dyn Fn(HostEvent)> = Rc::new(on_event);
        HostEventKind::ALL
            .into_iter()
            .map(|kind| self.transport.subscribe(kind, handler.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;
    use nextbox_contract::{
        ApiState, ExtensionState, ExtensionType, HostError, HostState, HttpMethod, MemoryHost,
        RawResponse, StorageOp, StorageRoot, StorageState,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn host_state() -> HostState {
        HostState {
            api: ApiState {
                host: "https://cloud.test".to_string(),
                prefix: "/api".to_string(),
                headers: Default::default(),
            },
            storage: StorageState {
                root: StorageRoot::My,
                root_id: None,
                path: "/work".to_string(),
            },
            extension: ExtensionState {
                kind: ExtensionType::WorkDir,
            },
            view: None,
        }
    }

    fn fixture() -> (CounterController, MemoryHost) {
        let (services, host) = HostServices::memory(HostStateCell::initialized(host_state()));
        (CounterController::new(&services, CounterConfig::default()), host)
    }

    #[test]
    fn parse_count_accepts_numbers_and_numeric_text() {
        assert_eq!(parse_count(&NodeContent::Json(json!(7))), 7);
        assert_eq!(parse_count(&NodeContent::Json(json!(2.9))), 2);
        assert_eq!(parse_count(&NodeContent::Json(json!("12"))), 12);
        assert_eq!(parse_count(&NodeContent::Text(" 5 ".to_string())), 5);
        assert_eq!(parse_count(&NodeContent::Json(json!({ "n": 1 }))), 0);
        assert_eq!(parse_count(&NodeContent::Text("abc".to_string())), 0);
    }

    #[test]
    fn load_reads_normalized_target_and_defaults_to_zero() {
        let (controller, host) = fixture();
        assert_eq!(block_on(controller.load_count()), Ok(0));
        assert_eq!(
            host.storage.call_log(),
            vec![(StorageOp::Download, "/counter.json".to_string())]
        );

        host.storage.insert_file("/counter.json", "41");
        assert_eq!(block_on(controller.load_count()), Ok(41));
        assert!(!controller.is_save_blocked());
    }

    #[test]
    fn load_failure_is_returned_and_blocks_saving() {
        let (controller, host) = fixture();
        host.storage
            .fail_next(StorageOp::Download, HostError::status(500, "boom"));
        assert!(block_on(controller.load_count()).is_err());
        assert!(controller.is_save_blocked());

        let err = block_on(controller.save(1, 0)).expect_err("blocked");
        assert!(err.is_save_blocked());
    }

    #[test]
    fn increment_marks_dirty_and_throttles_autosave() {
        let (controller, host) = fixture();
        let first = controller.increment(0, 10_000);
        let second = controller.increment(first.count, 12_000);
        let third = controller.increment(second.count, 15_000);

        assert_eq!(
            (first, second.autosave, third.autosave),
            (
                Increment {
                    count: 1,
                    autosave: true
                },
                false,
                true
            )
        );
        assert_eq!(third.count, 3);
        assert_eq!(host.transport.content_flags(), vec![true, true, true]);
    }

    #[test]
    fn save_writes_json_and_clears_dirty_flag() {
        let (controller, host) = fixture();
        block_on(controller.save(3, 99)).expect("save");

        assert_eq!(host.storage.content("/counter.json").as_deref(), Some("3"));
        assert_eq!(host.transport.content_flags(), vec![false]);
        assert!(!controller.increment(3, 100).autosave);
    }

    #[test]
    fn connection_failure_toasts_both_entries() {
        let (controller, host) = fixture();
        let err = block_on(controller.load_connections()).expect_err("404");
        assert!(err.is_expected());

        let titles: Vec<_> = host.transport.toasts().into_iter().map(|t| t.title).collect();
        assert_eq!(
            titles,
            vec![
                "Ошибка загрузки данных".to_string(),
                "Ошибка загрузки подключений".to_string(),
            ]
        );
    }

    #[test]
    fn empty_connection_pages_yield_empty_list() {
        let (controller, host) = fixture();
        let url = "https://cloud.test/api/connections?limit=100&offset=0&type=http_proxy_connection";
        host.http
            .route(HttpMethod::Get, url, RawResponse::ok(r#"{"rows":[]}"#));
        host.http.route(
            HttpMethod::Get,
            format!("{url}&is_divided=true"),
            RawResponse::ok(r#"{"rows":[]}"#),
        );
        assert_eq!(block_on(controller.load_connections()), Ok(Vec::new()));
    }

    #[test]
    fn event_subscriptions_cover_every_channel_and_release_on_drop() {
        let (controller, host) = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let subscriptions = controller.subscribe_events(move |event| sink.borrow_mut().push(event));

        for kind in HostEventKind::ALL {
            assert_eq!(host.transport.subscriber_count(kind), 1);
        }
        host.transport.emit(HostEvent::ModeChanged(ViewMode::Edit));
        host.transport.emit(HostEvent::SaveAndClose);
        assert_eq!(
            *seen.borrow(),
            vec![HostEvent::ModeChanged(ViewMode::Edit), HostEvent::SaveAndClose]
        );

        drop(subscriptions);
        for kind in HostEventKind::ALL {
            assert_eq!(host.transport.subscriber_count(kind), 0);
        }
    }

    #[test]
    fn initial_mode_follows_host_state() {
        let (controller, _) = fixture();
        assert_eq!(controller.initial_mode(), ViewMode::View);

        let state = HostState {
            view: Some(ViewMode::Edit),
            ..host_state()
        };
        let (services, _) = HostServices::memory(HostStateCell::initialized(state));
        let editing = CounterController::new(&services, CounterConfig::default());
        assert_eq!(editing.initial_mode(), ViewMode::Edit);

        let (services, _) = HostServices::memory(HostStateCell::new());
        let waiting = CounterController::new(&services, CounterConfig::default());
        assert_eq!(waiting.initial_mode(), ViewMode::View);
    }

    #[test]
    fn pick_files_uses_configured_options() {
        let (controller, host) = fixture();
        controller.pick_files();
        let requests = host.transport.picker_requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].multiple);
    }
}
