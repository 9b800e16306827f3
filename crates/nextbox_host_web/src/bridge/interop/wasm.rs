use super::*;
use js_sys::{Function, Promise};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::bridge::payload::{decode_event, file_select_payload, host_error_from_rejection};

#[wasm_bindgen(inline_js = r#"
const EVENT_KEYS = {
  changeMode: 'AppChangeState',
  saveAndClose: 'AppSaveAndClose',
  modalFilesSelect: 'AppFilesSelected',
};

let app = null;
let api = null;

function sdk() {
  const root = globalThis.NextBoxSDK;
  if (!root) {
    throw { kind: 'failure', message: 'NextBoxSDK global is not available' };
  }
  return root;
}

function appInstance() {
  if (!app) {
    app = new (sdk().NextBox)();
  }
  return app;
}

function apiInstance() {
  if (!api) {
    api = new (sdk().StorageApi)();
  }
  return api;
}

function transport() {
  return sdk().Transport;
}

function eventId(name) {
  const events = sdk().TransportEvent;
  const key = EVENT_KEYS[name];
  return events && key in events ? events[key] : name;
}

async function toRejection(error) {
  if (error && typeof error === 'object' && typeof error.kind === 'string') {
    return error;
  }
  if (error && typeof error === 'object' && typeof error.status === 'number') {
    let body = '';
    try {
      if (typeof error.text === 'function') {
        body = await error.text();
      }
    } catch (_) {
      body = '';
    }
    return {
      kind: 'response',
      ok: !!error.ok,
      status: error.status,
      status_text: error.statusText || '',
      body,
    };
  }
  const message = error && error.message ? error.message : String(error);
  return { kind: 'failure', message };
}

async function guard(fn) {
  try {
    return await fn();
  } catch (error) {
    throw await toRejection(error);
  }
}

async function toRaw(res) {
  return {
    ok: !!res.ok,
    status: res.status,
    status_text: res.statusText || '',
    body: await res.text(),
  };
}

export function jsHostInit() {
  return new Promise((resolve, reject) => {
    try {
      appInstance().init((state) => {
        apiInstance().changeState(state);
        resolve(state);
      });
    } catch (error) {
      toRejection(error).then(reject);
    }
  });
}

export function jsHostState() {
  try {
    return appInstance().state ?? null;
  } catch (_) {
    return null;
  }
}

export async function jsStorageInfo(path) { return await guard(() => apiInstance().info(path)); }
export async function jsStorageCreate(name, path, type) { return await guard(() => apiInstance().create(name, path, type)); }
export async function jsStorageDownload(path) { return await guard(async () => toRaw(await apiInstance().download(path))); }
export async function jsStorageReplace(content, path) { return await guard(() => apiInstance().replace(content, path)); }
export async function jsStorageList(params) { return await guard(() => apiInstance().list(params)); }

export async function jsHttpSend(method, url, headers, body) {
  return await guard(async () => {
    const init = { method, headers };
    if (body !== undefined && body !== null) {
      init.body = body;
    }
    return toRaw(await fetch(url, init));
  });
}

export function jsToast(payload) { transport().toast(payload); }
export function jsChangeContent(changed) { transport().changeContent(changed); }
export function jsOpenModalFilesSelect(options) { transport().openModalFilesSelect(options); }
export function jsTransportOn(name, handler) { transport().on(eventId(name), handler); }
export function jsTransportOff(name, handler) { transport().off(eventId(name), handler); }
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsHostInit)]
    fn js_host_init() -> Promise;
    #[wasm_bindgen(js_name = jsHostState)]
    fn js_host_state() -> JsValue;

    #[wasm_bindgen(js_name = jsStorageInfo)]
    fn js_storage_info(path: &str) -> Promise;
    #[wasm_bindgen(js_name = jsStorageCreate)]
    fn js_storage_create(name: &str, path: &str, kind: &str) -> Promise;
    #[wasm_bindgen(js_name = jsStorageDownload)]
    fn js_storage_download(path: &str) -> Promise;
    #[wasm_bindgen(js_name = jsStorageReplace)]
    fn js_storage_replace(content: &str, path: &str) -> Promise;
    #[wasm_bindgen(js_name = jsStorageList)]
    fn js_storage_list(params: JsValue) -> Promise;

    #[wasm_bindgen(js_name = jsHttpSend)]
    fn js_http_send(method: &str, url: &str, headers: JsValue, body: Option<String>) -> Promise;

    #[wasm_bindgen(js_name = jsToast, catch)]
    fn js_toast(payload: JsValue) -> Result<(), JsValue>;
    #[wasm_bindgen(js_name = jsChangeContent, catch)]
    fn js_change_content(changed: bool) -> Result<(), JsValue>;
    #[wasm_bindgen(js_name = jsOpenModalFilesSelect, catch)]
    fn js_open_modal_files_select(options: JsValue) -> Result<(), JsValue>;
    #[wasm_bindgen(js_name = jsTransportOn, catch)]
    fn js_transport_on(name: &str, handler: &Function) -> Result<(), JsValue>;
    #[wasm_bindgen(js_name = jsTransportOff, catch)]
    fn js_transport_off(name: &str, handler: &Function) -> Result<(), JsValue>;
}

fn js_error(err: JsValue) -> HostError {
    match from_value::<Value>(err.clone()) {
        Ok(value) => host_error_from_rejection(value),
        Err(_) => HostError::failure(format!("{err:?}")),
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, HostError> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| HostError::failure(e.to_string()))
}

fn kind_token(kind: StorageElementType) -> &'static str {
    match kind {
        StorageElementType::File => "file",
        StorageElementType::Dir => "dir",
    }
}

async fn promise_to_json<T: DeserializeOwned>(promise: Promise) -> Result<T, HostError> {
    let value = JsFuture::from(promise).await.map_err(js_error)?;
    from_value(value).map_err(|e| HostError::failure(e.to_string()))
}

pub async fn host_init() -> Result<HostState, HostError> {
    promise_to_json(js_host_init()).await
}

pub fn host_state() -> Option<HostState> {
    let value = js_host_state();
    if value.is_null() || value.is_undefined() {
        return None;
    }
    from_value(value).ok()
}

pub async fn storage_info(path: &str) -> Result<StorageElement, HostError> {
    promise_to_json(js_storage_info(path)).await
}

pub async fn storage_create(
    name: &str,
    path: &str,
    kind: StorageElementType,
) -> Result<ResponseItem<StorageElement>, HostError> {
    promise_to_json(js_storage_create(name, path, kind_token(kind))).await
}

pub async fn storage_download(path: &str) -> Result<RawResponse, HostError> {
    promise_to_json(js_storage_download(path)).await
}

pub async fn storage_replace(
    content: &str,
    path: &str,
) -> Result<ResponseItem<StorageElement>, HostError> {
    promise_to_json(js_storage_replace(content, path)).await
}

pub async fn storage_list(params: &ListParams) -> Result<ListPage<StorageElement>, HostError> {
    promise_to_json(js_storage_list(to_js(params)?)).await
}

pub async fn http_send(request: &HttpRequest) -> Result<RawResponse, HostError> {
    let headers = to_js(&request.headers)?;
    promise_to_json(js_http_send(
        request.method.as_str(),
        &request.url,
        headers,
        request.body.clone(),
    ))
    .await
}

pub fn toast(payload: &ToastPayload) -> Result<(), HostError> {
    js_toast(to_js(payload)?).map_err(js_error)
}

pub fn change_content(changed: bool) -> Result<(), HostError> {
    js_change_content(changed).map_err(js_error)
}

pub fn open_modal_files_select(options: &FileSelectOptions) -> Result<(), HostError> {
    js_open_modal_files_select(to_js(&file_select_payload(options))?).map_err(js_error)
}

pub fn subscribe(
    kind: HostEventKind,
    handler: HostEventHandler,
) -> Result<Subscription, HostError> {
    let name = kind.event_name();
    let callback = Closure::<dyn Fn(JsValue)>::new(move |payload: JsValue| {
        let value = from_value::<Value>(payload).unwrap_or(Value::Null);
        match decode_event(kind, value) {
            Ok(event) => handler(event),
            Err(err) => warn(&err),
        }
    });
    js_transport_on(name, callback.as_ref().unchecked_ref()).map_err(js_error)?;

    Ok(Subscription::new(move || {
        if let Err(err) = js_transport_off(name, callback.as_ref().unchecked_ref()) {
            warn(&js_error(err).to_string());
        }
    }))
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
