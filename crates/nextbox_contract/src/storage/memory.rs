//! In-memory storage backend with per-operation failure injection.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use super::service::{StorageApi, StorageFuture};
use super::types::{
    ListPage, ListParams, OrderDirection, ResponseItem, StorageElement, StorageElementType,
};
use crate::http::{HostError, RawResponse};
use crate::path::{collapse_separators, join_storage_path, parent_storage_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Storage API operation, used for call logs and failure injection.
pub enum StorageOp {
    /// [`StorageApi::info`]
    Info,
    /// [`StorageApi::create`]
    Create,
    /// [`StorageApi::download`]
    Download,
    /// [`StorageApi::replace`]
    Replace,
    /// [`StorageApi::list`]
    List,
}

#[derive(Debug, Clone)]
struct Node {
    kind: StorageElementType,
    content: String,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<String, Node>,
    failures: HashMap<StorageOp, HostError>,
    calls: Vec<(StorageOp, String)>,
}

/// Storage tree kept in memory; clones share the same tree.
#[derive(Debug, Clone)]
pub struct MemoryStorageApi {
    inner: Rc<RefCell<Inner>>,
}

impl Default for MemoryStorageApi {
    fn default() -> Self {
        let mut inner = Inner::default();
        inner.nodes.insert(
            "/".to_string(),
            Node {
                kind: StorageElementType::Dir,
                content: String::new(),
            },
        );
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }
}

fn node_key(path: &str) -> String {
    let collapsed = collapse_separators(&format!("/{path}"));
    if collapsed.len() > 1 {
        collapsed.trim_end_matches('/').to_string()
    } else {
        collapsed
    }
}

fn base_name(key: &str) -> String {
    key.rsplit('/').next().unwrap_or_default().to_string()
}

fn element(key: &str, node: &Node) -> StorageElement {
    let mut element = StorageElement::new(key, base_name(key), node.kind);
    if node.kind == StorageElementType::File {
        element.size = Some(node.content.len() as u64);
    }
    element
}

impl Inner {
    fn ensure_dirs(&mut self, dir: &str) {
        let mut current = String::new();
        for segment in dir.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            self.nodes.entry(current.clone()).or_insert(Node {
                kind: StorageElementType::Dir,
                content: String::new(),
            });
        }
    }

    fn put_file(&mut self, key: &str, content: &str) -> StorageElement {
        self.ensure_dirs(&parent_storage_path(key));
        let node = Node {
            kind: StorageElementType::File,
            content: content.to_string(),
        };
        let row = element(key, &node);
        self.nodes.insert(key.to_string(), node);
        row
    }

    fn begin(&mut self, op: StorageOp, path: &str) -> Result<(), HostError> {
        self.calls.push((op, path.to_string()));
        match self.failures.remove(&op) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl MemoryStorageApi {
    /// Creates a tree holding only the root directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file (and missing parent directories).
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.insert_file(path, content);
        self
    }

    /// Adds a directory (and missing parents).
    pub fn with_dir(self, path: &str) -> Self {
        self.inner.borrow_mut().ensure_dirs(&node_key(path));
        self
    }

    /// Writes a file without recording a call.
    pub fn insert_file(&self, path: &str, content: &str) {
        self.inner.borrow_mut().put_file(&node_key(path), content);
    }

    /// Makes the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: StorageOp, error: HostError) {
        self.inner.borrow_mut().failures.insert(op, error);
    }

    /// Returns file content at `path`.
    pub fn content(&self, path: &str) -> Option<String> {
        let inner = self.inner.borrow();
        inner
            .nodes
            .get(&node_key(path))
            .filter(|node| node.kind == StorageElementType::File)
            .map(|node| node.content.clone())
    }

    /// Returns whether an element exists at `path`.
    pub fn exists(&self, path: &str) -> bool {
        self.inner.borrow().nodes.contains_key(&node_key(path))
    }

    /// Operations called so far, in order.
    pub fn calls(&self) -> Vec<StorageOp> {
        self.inner.borrow().calls.iter().map(|(op, _)| *op).collect()
    }

    /// Operations called so far with the path argument each received.
    pub fn call_log(&self) -> Vec<(StorageOp, String)> {
        self.inner.borrow().calls.clone()
    }
}

impl StorageApi for MemoryStorageApi {
    fn info<'a>(&'a self, path: &'a str) -> StorageFuture<'a, Result<StorageElement, HostError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin(StorageOp::Info, path)?;
            let key = node_key(path);
            inner
                .nodes
                .get(&key)
                .map(|node| element(&key, node))
                .ok_or_else(|| HostError::status(404, "Not Found"))
        })
    }

    fn create<'a>(
        &'a self,
        name: &'a str,
        path: &'a str,
        kind: StorageElementType,
    ) -> StorageFuture<'a, Result<ResponseItem<StorageElement>, HostError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin(StorageOp::Create, path)?;
            let key = node_key(&join_storage_path(path, name));
            if inner.nodes.contains_key(&key) {
                return Err(HostError::status(409, format!("{key} already exists")));
            }
            let row = match kind {
                StorageElementType::File => inner.put_file(&key, ""),
                StorageElementType::Dir => {
                    inner.ensure_dirs(&key);
                    let node = inner.nodes.get(&key).cloned().ok_or_else(|| {
                        HostError::failure(format!("failed to create directory {key}"))
                    })?;
                    element(&key, &node)
                }
            };
            Ok(ResponseItem { row })
        })
    }

    fn download<'a>(&'a self, path: &'a str) -> StorageFuture<'a, Result<RawResponse, HostError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin(StorageOp::Download, path)?;
            Ok(match inner.nodes.get(&node_key(path)) {
                Some(node) if node.kind == StorageElementType::File => {
                    RawResponse::ok(node.content.clone())
                }
                Some(_) => RawResponse::new(400, "element is a directory"),
                None => RawResponse::new(404, "Not Found"),
            })
        })
    }

    fn replace<'a>(
        &'a self,
        content: &'a str,
        path: &'a str,
    ) -> StorageFuture<'a, Result<ResponseItem<StorageElement>, HostError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin(StorageOp::Replace, path)?;
            let key = node_key(path);
            if matches!(inner.nodes.get(&key), Some(node) if node.kind == StorageElementType::Dir) {
                return Err(HostError::status(409, format!("{key} is a directory")));
            }
            Ok(ResponseItem {
                row: inner.put_file(&key, content),
            })
        })
    }

    fn list<'a>(
        &'a self,
        params: &'a ListParams,
    ) -> StorageFuture<'a, Result<ListPage<StorageElement>, HostError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin(StorageOp::List, &params.path)?;
            let dir = node_key(&params.path);
            if !matches!(inner.nodes.get(&dir), Some(node) if node.kind == StorageElementType::Dir)
            {
                return Err(HostError::status(404, "Not Found"));
            }

            let mut rows: Vec<StorageElement> = inner
                .nodes
                .iter()
                .filter(|(key, _)| key.as_str() != "/" && parent_storage_path(key) == dir)
                .map(|(key, node)| element(key, node))
                .filter(|row| params.search.is_empty() || row.name.contains(&params.search))
                .filter(|row| {
                    row.kind == StorageElementType::Dir
                        || params.file_name_ext.is_empty()
                        || params
                            .file_name_ext
                            .iter()
                            .any(|ext| row.name.ends_with(&format!(".{ext}")))
                })
                .collect();

            rows.sort_by(|a, b| a.name.cmp(&b.name));
            if params.order_direction == OrderDirection::Desc {
                rows.reverse();
            }
            rows.truncate(params.limit as usize);
            Ok(ListPage::from_rows(rows))
        })
    }
}
