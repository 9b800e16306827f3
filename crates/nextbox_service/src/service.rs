//! The storage adapter.

use std::{cell::Cell, rc::Rc};

use futures::future::try_join;
use leptos::logging;
use nextbox_contract::{
    join_storage_path, Connection, HostServices, HostState, HostStateCell, HostTransport,
    HttpRequest, HttpTransport, ListPage, ListParams, ResponseItem, StorageApi, StorageElement,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::NextboxError;
use crate::normalize::normalize_path;
use crate::notifications::{notification, notification_with_message, NotificationKey};
use crate::options::{
    CreateNode, CreateNodeOptions, GetListOptions, NodeContent, ReadNodeOptions, UpdateNode,
    UpdateNodeOptions,
};

const CONNECTIONS_QUERY: &str = "/connections?limit=100&offset=0&type=http_proxy_connection";

/// Save latch shared by every clone of one adapter.
///
/// Closed by the first unexpected read, list, or create-probe failure; there is no way to open
/// it again.
#[derive(Debug, Clone, Default)]
pub struct SaveGate {
    blocked: Rc<Cell<bool>>,
}

impl SaveGate {
    /// Returns `true` once mutating calls are disabled.
    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }

    fn block(&self) {
        if !self.blocked.replace(true) {
            logging::warn!("NEXTBOX: saving is blocked for the rest of the session");
        }
    }
}

#[derive(Deserialize)]
struct CopyResponse {
    #[serde(default)]
    rows: Option<Vec<StorageElement>>,
}

/// Adapter over the platform storage SDK and raw storage endpoints.
#[derive(Clone)]
pub struct NextboxService {
    state: HostStateCell,
    api: Rc<dyn StorageApi>,
    http: Rc<dyn HttpTransport>,
    transport: Rc<dyn HostTransport>,
    gate: SaveGate,
}

impl NextboxService {
    /// Creates an adapter with an open save gate.
    pub fn new(
        state: HostStateCell,
        api: Rc<dyn StorageApi>,
        http: Rc<dyn HttpTransport>,
        transport: Rc<dyn HostTransport>,
    ) -> Self {
        Self {
            state,
            api,
            http,
            transport,
            gate: SaveGate::default(),
        }
    }

    /// Creates an adapter over a host service bundle.
    pub fn from_host(services: &HostServices) -> Self {
        Self::new(
            services.state.clone(),
            services.storage.clone(),
            services.http.clone(),
            services.transport.clone(),
        )
    }

    /// The save latch.
    pub fn save_gate(&self) -> &SaveGate {
        &self.gate
    }

    /// Returns `true` once mutating calls are disabled.
    pub fn is_save_blocked(&self) -> bool {
        self.gate.is_blocked()
    }

    /// Normalizes `path` against the current host state.
    ///
    /// # Errors
    ///
    /// Returns [`NextboxError::Uninitialized`] before host init.
    pub fn normalize(&self, path: &str) -> Result<String, NextboxError> {
        self.state.with(|state| normalize_path(path, state))
    }

    fn host_state(&self) -> Result<HostState, NextboxError> {
        self.state.get().ok_or(NextboxError::Uninitialized)
    }

    fn toast(&self, key: NotificationKey, error: &NextboxError) {
        self.transport
            .toast(&notification_with_message(key, error.toast_message()));
    }

    fn ensure_writable(&self, op: &str) -> Result<(), NextboxError> {
        if self.gate.is_blocked() {
            logging::warn!("NEXTBOX.{op}: rejected, saving is blocked");
            self.transport
                .toast(&notification(NotificationKey::SaveIsBlockedError));
            return Err(NextboxError::SaveBlocked);
        }
        Ok(())
    }

    /// Creates a file or directory.
    ///
    /// Unless `options.force` is set, an existing element at the target path is returned as is.
    /// A surfaced probe failure closes the save gate, after which creation is refused.
    ///
    /// # Errors
    ///
    /// Returns [`NextboxError::SaveBlocked`] when the gate is closed, otherwise the create
    /// failure.
    pub async fn create_node(
        &self,
        node: CreateNode,
        options: CreateNodeOptions,
    ) -> Result<StorageElement, NextboxError> {
        let full_path = join_storage_path(&node.path, &node.name);

        if !options.force {
            match self.api.info(&full_path).await {
                Ok(existing) => return Ok(existing),
                Err(err) => {
                    let err = NextboxError::from(err);
                    logging::error!("NEXTBOX.createNode.info: {err}");
                    if err.should_surface() {
                        self.gate.block();
                        self.toast(NotificationKey::ApiDownloadError, &err);
                    }
                }
            }
        }

        self.ensure_writable("createNode")?;

        let result: Result<StorageElement, NextboxError> = async {
            let normalized = self.normalize(&node.path)?;
            let created = self.api.create(&node.name, &normalized, node.kind).await?;
            Ok(created.row)
        }
        .await;

        result.map_err(|err| {
            logging::error!("NEXTBOX.createNode.create: {err}");
            if err.should_surface() {
                self.toast(NotificationKey::ApiReplaceError, &err);
            }
            err
        })
    }

    /// Reads file content as JSON or text.
    ///
    /// A 403/404 answer fails with [`NextboxError::Expected`] carrying the response body and
    /// leaves the gate open. Any other failure, except empty JSON content, closes the gate.
    ///
    /// # Errors
    ///
    /// Returns the download, status, or parse failure.
    pub async fn read_node(
        &self,
        full_path: &str,
        options: ReadNodeOptions,
    ) -> Result<NodeContent, NextboxError> {
        let result: Result<NodeContent, NextboxError> = async {
            let path = if options.normalize_path {
                self.normalize(full_path)?
            } else {
                full_path.to_string()
            };
            let response = self.api.download(&path).await?;
            if !response.ok {
                return Err(NextboxError::from_body(&response));
            }
            if !options.read_as_json {
                return Ok(NodeContent::Text(response.body));
            }
            serde_json::from_str(&response.body)
                .map(NodeContent::Json)
                .map_err(|err| {
                    if err.is_eof() {
                        NextboxError::EmptyJson
                    } else {
                        NextboxError::Decode(err.to_string())
                    }
                })
        }
        .await;

        result.map_err(|err| {
            logging::error!("NEXTBOX.readNode: {err}");
            if err != NextboxError::EmptyJson && err.should_surface() {
                self.gate.block();
                self.toast(NotificationKey::ApiDownloadError, &err);
            }
            err
        })
    }

    /// Replaces file content.
    ///
    /// # Errors
    ///
    /// Returns [`NextboxError::SaveBlocked`] when the gate is closed, otherwise the serialize or
    /// replace failure.
    pub async fn update_node(
        &self,
        update: UpdateNode,
        options: UpdateNodeOptions,
    ) -> Result<ResponseItem<StorageElement>, NextboxError> {
        self.ensure_writable("updateNode")?;

        let result: Result<ResponseItem<StorageElement>, NextboxError> = async {
            let content = if options.write_as_json {
                serde_json::to_string(&update.data)
                    .map_err(|err| NextboxError::Encode(err.to_string()))?
            } else {
                match update.data {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                }
            };
            let path = if options.normalize_path {
                self.normalize(&update.full_path)?
            } else {
                update.full_path.clone()
            };
            Ok(self.api.replace(&content, &path).await?)
        }
        .await;

        result.map_err(|err| {
            logging::error!("NEXTBOX.updateNode: {err}");
            if err.should_surface() {
                self.toast(NotificationKey::ApiReplaceError, &err);
            }
            err
        })
    }

    /// Deletes an element through `DELETE /storage/element`.
    ///
    /// # Errors
    ///
    /// Returns [`NextboxError::SaveBlocked`] when the gate is closed, otherwise the request
    /// failure or non-ok status.
    pub async fn delete_node(&self, full_path: &str) -> Result<(), NextboxError> {
        self.ensure_writable("deleteNode")?;

        let result: Result<(), NextboxError> = async {
            let state = self.host_state()?;
            let mut query = format!("path={}", urlencoding::encode(full_path));
            if let Some(divide_id) = state.divide_id() {
                query.push_str(&format!("&divide_id={divide_id}"));
            }
            let url = state.api.endpoint(&format!("/storage/element?{query}"));
            let request = HttpRequest::delete(url).with_headers(&state.api.headers);
            let response = self.http.send(request).await?;
            if !response.ok {
                return Err(NextboxError::from_response(response));
            }
            Ok(())
        }
        .await;

        result.map_err(|err| {
            logging::error!("NEXTBOX.deleteNode: {err}");
            if err.should_surface() {
                self.toast(NotificationKey::ApiDeleteError, &err);
            }
            err
        })
    }

    /// Copies an element through `POST /storage/element/copy` without overwriting.
    ///
    /// # Errors
    ///
    /// Returns [`NextboxError::SaveBlocked`] when the gate is closed,
    /// [`NextboxError::Rejected`] with the response body when no row comes back, or the request
    /// failure.
    pub async fn copy_node(
        &self,
        from_full_path: &str,
        to_full_path: &str,
    ) -> Result<StorageElement, NextboxError> {
        self.ensure_writable("copyNode")?;

        let result: Result<StorageElement, NextboxError> = async {
            let state = self.host_state()?;
            let mut body = json!({
                "overwrite": false,
                "paths": [{ "from_path": from_full_path, "to_path": to_full_path }],
            });
            if let Some(divide_id) = state.divide_id() {
                body["from_divide_id"] = json!(divide_id);
                body["to_divide_id"] = json!(divide_id);
            }
            let request =
                HttpRequest::post(state.api.endpoint("/storage/element/copy"), body.to_string())
                    .with_headers(&state.api.headers)
                    .with_header("Content-Type", "application/json");
            let response = self.http.send(request).await?;

            serde_json::from_str::<CopyResponse>(&response.body)
                .ok()
                .and_then(|parsed| parsed.rows)
                .and_then(|rows| rows.into_iter().next())
                .ok_or_else(|| NextboxError::from_body(&response))
        }
        .await;

        result.map_err(|err| {
            logging::error!("NEXTBOX.copyNode: {err}");
            if err.should_surface() {
                self.toast(NotificationKey::ApiDeleteError, &err);
            }
            err
        })
    }

    /// Lists a directory.
    ///
    /// When `filter` or `exclude` is set, only rows of kind `filter` whose names are not in
    /// `exclude` are kept; otherwise every row is returned.
    ///
    /// # Errors
    ///
    /// Returns the normalization or list failure; surfaced failures close the gate.
    pub async fn get_list(
        &self,
        path: &str,
        options: GetListOptions,
    ) -> Result<Vec<StorageElement>, NextboxError> {
        let result: Result<Vec<StorageElement>, NextboxError> = async {
            let params = ListParams {
                path: self.normalize(path)?,
                with_meta: options.with_meta,
                limit: options.limit,
                order_by: options.order_by,
                order_direction: options.order_direction,
                search: options.search,
                file_name_ext: options.file_name_ext,
            };
            let mut rows = self.api.list(&params).await?.rows;
            if options.filter.is_some() || options.exclude.is_some() {
                let excluded = options.exclude.unwrap_or_default();
                rows.retain(|row| Some(row.kind) == options.filter && !excluded.contains(&row.name));
            }
            Ok(rows)
        }
        .await;

        result.map_err(|err| {
            logging::error!("NEXTBOX.getList: {err}");
            if err.should_surface() {
                self.gate.block();
                self.toast(NotificationKey::ApiDeleteError, &err);
            }
            err
        })
    }

    /// Lists owned and shared HTTP proxy connections.
    ///
    /// Both pages are requested concurrently and concatenated owned first. Returns `None` when
    /// neither page has rows. Every failure is toasted, including 403/404.
    ///
    /// # Errors
    ///
    /// Returns the first request, status, or parse failure.
    pub async fn get_connections(&self) -> Result<Option<Vec<Connection>>, NextboxError> {
        let result: Result<Option<Vec<Connection>>, NextboxError> = async {
            let state = self.host_state()?;
            let owned_url = state.api.endpoint(CONNECTIONS_QUERY);
            let shared_url = format!("{owned_url}&is_divided=true");

            let (mut owned, shared) = try_join(
                self.fetch_connections(owned_url, &state),
                self.fetch_connections(shared_url, &state),
            )
            .await?;

            owned.extend(shared);
            Ok(if owned.is_empty() { None } else { Some(owned) })
        }
        .await;

        result.map_err(|err| {
            logging::error!("NEXTBOX.getConnections: {err}");
            self.transport.toast(&notification_with_message(
                NotificationKey::ApiDownloadError,
                err.to_string(),
            ));
            err
        })
    }

    async fn fetch_connections(
        &self,
        url: String,
        state: &HostState,
    ) -> Result<Vec<Connection>, NextboxError> {
        let request = HttpRequest::get(url).with_headers(&state.api.headers);
        let response = self.http.send(request).await?;
        if !response.ok {
            return Err(NextboxError::from_response(response));
        }
        let page: ListPage<Connection> = response
            .json()
            .map_err(|err| NextboxError::Decode(err.to_string()))?;
        Ok(page.rows)
    }
}
