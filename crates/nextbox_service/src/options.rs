//! Request and option types for [`NextboxService`](crate::NextboxService) operations.

use nextbox_contract::{OrderDirection, StorageElementType};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::NextboxError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Element to create.
pub struct CreateNode {
    /// Parent directory.
    pub path: String,
    /// Element name.
    pub name: String,
    /// File or directory.
    pub kind: StorageElementType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Options for [`create_node`](crate::NextboxService::create_node).
pub struct CreateNodeOptions {
    /// Skip the existence probe and always call create.
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Options for [`read_node`](crate::NextboxService::read_node).
pub struct ReadNodeOptions {
    /// Parse the content as JSON.
    pub read_as_json: bool,
    /// Normalize the path for work-directory mode first.
    pub normalize_path: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// Content to write.
pub struct UpdateNode {
    /// Target file.
    pub full_path: String,
    /// Data; strings are written verbatim unless JSON output is requested.
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Options for [`update_node`](crate::NextboxService::update_node).
pub struct UpdateNodeOptions {
    /// Serialize `data` as JSON.
    pub write_as_json: bool,
    /// Normalize the path for work-directory mode first.
    pub normalize_path: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Options for [`get_list`](crate::NextboxService::get_list).
pub struct GetListOptions {
    /// Maximum number of rows requested.
    pub limit: u32,
    /// Request extended metadata.
    pub with_meta: bool,
    /// Keep only rows of this kind.
    pub filter: Option<StorageElementType>,
    /// Sort field.
    pub order_by: String,
    /// Sort direction.
    pub order_direction: OrderDirection,
    /// Name search passed to the platform.
    pub search: String,
    /// Names to drop from the result.
    pub exclude: Option<Vec<String>>,
    /// Extensions passed to the platform.
    pub file_name_ext: Vec<String>,
}

impl Default for GetListOptions {
    fn default() -> Self {
        Self {
            limit: 10_000,
            with_meta: false,
            filter: None,
            order_by: "name".to_string(),
            order_direction: OrderDirection::Asc,
            search: String::new(),
            exclude: None,
            file_name_ext: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Content returned by [`read_node`](crate::NextboxService::read_node).
pub enum NodeContent {
    /// Parsed JSON.
    Json(Value),
    /// Raw text.
    Text(String),
}

impl NodeContent {
    /// Returns the content as JSON; text becomes a JSON string.
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// Deserializes JSON content into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`NextboxError::Decode`] when the content does not match `T`.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, NextboxError> {
        serde_json::from_value(self.into_json()).map_err(|err| NextboxError::Decode(err.to_string()))
    }

    /// Returns the text when the content was read as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn list_defaults_request_everything_by_name() {
        let options = GetListOptions::default();
        assert_eq!(options.limit, 10_000);
        assert_eq!(options.order_by, "name");
        assert_eq!(options.order_direction, OrderDirection::Asc);
        assert!(options.filter.is_none() && options.exclude.is_none());
    }

    #[test]
    fn node_content_parses_typed_json() {
        let count: u64 = NodeContent::Json(json!(12)).parse().expect("parse");
        assert_eq!(count, 12);
        assert!(NodeContent::Text("x".to_string()).parse::<u64>().is_err());
    }
}
