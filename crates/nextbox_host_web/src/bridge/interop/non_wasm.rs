use super::*;

fn unsupported() -> HostError {
    HostError::failure("Nextbox SDK is only available when compiled for wasm32")
}

pub async fn host_init() -> Result<HostState, HostError> {
    Err(unsupported())
}

pub fn host_state() -> Option<HostState> {
    None
}

pub async fn storage_info(_path: &str) -> Result<StorageElement, HostError> {
    Err(unsupported())
}

pub async fn storage_create(
    _name: &str,
    _path: &str,
    _kind: StorageElementType,
) -> Result<ResponseItem<StorageElement>, HostError> {
    Err(unsupported())
}

pub async fn storage_download(_path: &str) -> Result<RawResponse, HostError> {
    Err(unsupported())
}

pub async fn storage_replace(
    _content: &str,
    _path: &str,
) -> Result<ResponseItem<StorageElement>, HostError> {
    Err(unsupported())
}

pub async fn storage_list(_params: &ListParams) -> Result<ListPage<StorageElement>, HostError> {
    Err(unsupported())
}

pub async fn http_send(_request: &HttpRequest) -> Result<RawResponse, HostError> {
    Err(unsupported())
}

pub fn toast(_payload: &ToastPayload) -> Result<(), HostError> {
    Err(unsupported())
}

pub fn change_content(_changed: bool) -> Result<(), HostError> {
    Err(unsupported())
}

pub fn open_modal_files_select(_options: &FileSelectOptions) -> Result<(), HostError> {
    Err(unsupported())
}

pub fn subscribe(
    _kind: HostEventKind,
    _handler: HostEventHandler,
) -> Result<Subscription, HostError> {
    Err(unsupported())
}

pub fn warn(_message: &str) {}
