//! Storage API contract implemented by the platform SDK bindings.

use std::{future::Future, pin::Pin};

use super::types::{ListPage, ListParams, ResponseItem, StorageElement, StorageElementType};
use crate::http::{HostError, RawResponse};

/// Object-safe boxed future used by [`StorageApi`] methods.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Platform storage API as exposed by the host SDK.
pub trait StorageApi {
    /// Fetches element metadata for `path`.
    fn info<'a>(&'a self, path: &'a str) -> StorageFuture<'a, Result<StorageElement, HostError>>;

    /// Creates an element named `name` inside directory `path`.
    fn create<'a>(
        &'a self,
        name: &'a str,
        path: &'a str,
        kind: StorageElementType,
    ) -> StorageFuture<'a, Result<ResponseItem<StorageElement>, HostError>>;

    /// Downloads raw file content.
    ///
    /// Resolves with the response for any status; callers classify it.
    fn download<'a>(&'a self, path: &'a str) -> StorageFuture<'a, Result<RawResponse, HostError>>;

    /// Replaces file content at `path`.
    fn replace<'a>(
        &'a self,
        content: &'a str,
        path: &'a str,
    ) -> StorageFuture<'a, Result<ResponseItem<StorageElement>, HostError>>;

    /// Lists a directory.
    fn list<'a>(
        &'a self,
        params: &'a ListParams,
    ) -> StorageFuture<'a, Result<ListPage<StorageElement>, HostError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Storage API for targets without a host SDK; every call fails.
pub struct NoopStorageApi;

impl NoopStorageApi {
    fn unavailable(op: &str) -> HostError {
        HostError::failure(format!("storage api unavailable: {op}"))
    }
}

impl StorageApi for NoopStorageApi {
    fn info<'a>(&'a self, _path: &'a str) -> StorageFuture<'a, Result<StorageElement, HostError>> {
        Box::pin(async { Err(Self::unavailable("info")) })
    }

    fn create<'a>(
        &'a self,
        _name: &'a str,
        _path: &'a str,
        _kind: StorageElementType,
    ) -> StorageFuture<'a, Result<ResponseItem<StorageElement>, HostError>> {
        Box::pin(async { Err(Self::unavailable("create")) })
    }

    fn download<'a>(&'a self, _path: &'a str) -> StorageFuture<'a, Result<RawResponse, HostError>> {
        Box::pin(async { Err(Self::unavailable("download")) })
    }

    fn replace<'a>(
        &'a self,
        _content: &'a str,
        _path: &'a str,
    ) -> StorageFuture<'a, Result<ResponseItem<StorageElement>, HostError>> {
        Box::pin(async { Err(Self::unavailable("replace")) })
    }

    fn list<'a>(
        &'a self,
        _params: &'a ListParams,
    ) -> StorageFuture<'a, Result<ListPage<StorageElement>, HostError>> {
        Box::pin(async { Err(Self::unavailable("list")) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn noop_storage_api_names_the_failed_operation() {
        let api: &dyn StorageApi = &NoopStorageApi;
        let err = block_on(api.info("/a")).expect_err("info fails");
        assert_eq!(err, HostError::failure("storage api unavailable: info"));
        let err = block_on(api.download("/a")).expect_err("download fails");
        assert!(err.to_string().contains("download"));
    }
}
