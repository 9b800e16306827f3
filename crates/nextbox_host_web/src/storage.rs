//! Storage SDK and raw HTTP adapters.

use nextbox_contract::{
    HostError, HttpFuture, HttpRequest, HttpTransport, ListPage, ListParams, RawResponse,
    ResponseItem, StorageApi, StorageElement, StorageElementType, StorageFuture,
};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Storage adapter backed by the SDK `StorageApi` object.
pub struct WebStorageApi;

impl StorageApi for WebStorageApi {
    fn info<'a>(&'a self, path: &'a str) -> StorageFuture<'a, Result<StorageElement, HostError>> {
        Box::pin(bridge::storage_info(path))
    }

    fn create<'a>(
        &'a self,
        name: &'a str,
        path: &'a str,
        kind: StorageElementType,
    ) -> StorageFuture<'a, Result<ResponseItem<StorageElement>, HostError>> {
        Box::pin(bridge::storage_create(name, path, kind))
    }

    fn download<'a>(&'a self, path: &'a str) -> StorageFuture<'a, Result<RawResponse, HostError>> {
        Box::pin(bridge::storage_download(path))
    }

    fn replace<'a>(
        &'a self,
        content: &'a str,
        path: &'a str,
    ) -> StorageFuture<'a, Result<ResponseItem<StorageElement>, HostError>> {
        Box::pin(bridge::storage_replace(content, path))
    }

    fn list<'a>(
        &'a self,
        params: &'a ListParams,
    ) -> StorageFuture<'a, Result<ListPage<StorageElement>, HostError>> {
        Box::pin(bridge::storage_list(params))
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Raw request adapter backed by `fetch`.
pub struct WebHttpTransport;

impl HttpTransport for WebHttpTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a, Result<RawResponse, HostError>> {
        Box::pin(async move { bridge::http_send(&request).await })
    }
}
