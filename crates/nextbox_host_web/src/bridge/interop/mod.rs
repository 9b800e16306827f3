//! Target routing for the SDK bridge.
//!
//! `wasm32` builds call the platform SDK through inline JS; other targets get a shim that fails
//! every call, so native builds and tests link without a browser.

use nextbox_contract::{
    FileSelectOptions, HostError, HostEventHandler, HostEventKind, HostState, HttpRequest,
    ListPage, ListParams, RawResponse, ResponseItem, StorageElement, StorageElementType,
    Subscription, ToastPayload,
};

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub async fn host_init() -> Result<HostState, HostError> {
    imp::host_init().await
}

pub fn host_state() -> Option<HostState> {
    imp::host_state()
}

pub async fn storage_info(path: &str) -> Result<StorageElement, HostError> {
    imp::storage_info(path).await
}

pub async fn storage_create(
    name: &str,
    path: &str,
    kind: StorageElementType,
) -> Result<ResponseItem<StorageElement>, HostError> {
    imp::storage_create(name, path, kind).await
}

pub async fn storage_download(path: &str) -> Result<RawResponse, HostError> {
    imp::storage_download(path).await
}

pub async fn storage_replace(
    content: &str,
    path: &str,
) -> Result<ResponseItem<StorageElement>, HostError> {
    imp::storage_replace(content, path).await
}

pub async fn storage_list(params: &ListParams) -> Result<ListPage<StorageElement>, HostError> {
    imp::storage_list(params).await
}

pub async fn http_send(request: &HttpRequest) -> Result<RawResponse, HostError> {
    imp::http_send(request).await
}

pub fn toast(payload: &ToastPayload) -> Result<(), HostError> {
    imp::toast(payload)
}

pub fn change_content(changed: bool) -> Result<(), HostError> {
    imp::change_content(changed)
}

pub fn open_modal_files_select(options: &FileSelectOptions) -> Result<(), HostError> {
    imp::open_modal_files_select(options)
}

pub fn subscribe(
    kind: HostEventKind,
    handler: HostEventHandler,
) -> Result<Subscription, HostError> {
    imp::subscribe(kind, handler)
}

pub fn warn(message: &str) {
    imp::warn(message)
}
