//! Storage element models exchanged with the platform storage API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Storage element kind.
pub enum StorageElementType {
    /// Regular file.
    File,
    /// Directory.
    Dir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A file or directory in platform storage.
pub struct StorageElement {
    /// Full path of the element.
    pub path: String,
    /// Base name.
    pub name: String,
    /// Element kind.
    #[serde(rename = "type")]
    pub kind: StorageElementType,
    /// Size in bytes for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Creation timestamp as reported by the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    /// Last update timestamp as reported by the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
    /// Extended metadata, present when listed with `with_meta`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl StorageElement {
    /// Creates an element without metadata.
    pub fn new(path: impl Into<String>, name: impl Into<String>, kind: StorageElementType) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind,
            size: None,
            create_date: None,
            update_date: None,
            meta: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Single-row response envelope.
pub struct ResponseItem<T> {
    /// The affected row.
    pub row: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Multi-row response envelope.
pub struct ListPage<T> {
    /// Returned rows.
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
    /// Total count when the platform reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl<T> ListPage<T> {
    /// Wraps `rows` without a total count.
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self { rows, count: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
/// Sort direction for listings.
pub enum OrderDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Parameters of a directory listing call.
pub struct ListParams {
    /// Directory to list.
    pub path: String,
    /// Whether rows carry extended metadata.
    pub with_meta: bool,
    /// Maximum number of rows.
    pub limit: u32,
    /// Sort field.
    pub order_by: String,
    /// Sort direction.
    pub order_direction: OrderDirection,
    /// Name substring filter; empty matches everything.
    pub search: String,
    /// File extensions to keep; empty keeps everything.
    pub file_name_ext: Vec<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn element_kind_uses_platform_tokens() {
        let element: StorageElement =
            serde_json::from_value(json!({ "path": "/a", "name": "a", "type": "dir" }))
                .expect("parse element");
        assert_eq!(element.kind, StorageElementType::Dir);
        assert_eq!(
            serde_json::to_value(OrderDirection::Desc).expect("serialize"),
            json!("DESC")
        );
    }

    #[test]
    fn list_page_without_rows_is_empty() {
        let page: ListPage<StorageElement> =
            serde_json::from_value(json!({})).expect("parse page");
        assert!(page.rows.is_empty());
    }
}
