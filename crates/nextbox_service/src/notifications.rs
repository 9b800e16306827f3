//! Toast catalog for storage adapter failures.

use nextbox_contract::{ToastPayload, ToastSeverity};

/// Title of the toast shown when the save latch rejects a call.
pub const SAVE_IS_BLOCKED_TITLE: &str = "Сохранение заблокировано";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Catalog entries.
pub enum NotificationKey {
    /// Host SDK did not initialize.
    InitializationError,
    /// Reading data failed.
    ApiDownloadError,
    /// Writing data failed.
    ApiReplaceError,
    /// Deleting, copying, or listing data failed.
    ApiDeleteError,
    /// Listing connections failed.
    ApiGetConnectionsError,
    /// Save latch is set.
    SaveIsBlockedError,
}

impl NotificationKey {
    /// Every catalog entry.
    pub const ALL: [Self; 6] = [
        Self::InitializationError,
        Self::ApiDownloadError,
        Self::ApiReplaceError,
        Self::ApiDeleteError,
        Self::ApiGetConnectionsError,
        Self::SaveIsBlockedError,
    ];

    /// Stable catalog key.
    pub const fn token(self) -> &'static str {
        match self {
            Self::InitializationError => "INITIALIZATION_ERROR",
            Self::ApiDownloadError => "API_DOWNLOAD_ERROR",
            Self::ApiReplaceError => "API_REPLACE_ERROR",
            Self::ApiDeleteError => "API_DELETE_ERROR",
            Self::ApiGetConnectionsError => "API_GET_CONNECTIONS_ERROR",
            Self::SaveIsBlockedError => "SAVE_IS_BLOCKED_ERROR",
        }
    }

    /// Toast title shown to the user.
    pub const fn title(self) -> &'static str {
        match self {
            Self::InitializationError => "Ошибка инициализации Nextbox",
            Self::ApiDownloadError => "Ошибка загрузки данных",
            Self::ApiReplaceError => "Ошибка сохранения данных",
            Self::ApiDeleteError => "Ошибка удаления данных",
            Self::ApiGetConnectionsError => "Ошибка загрузки подключений",
            Self::SaveIsBlockedError => SAVE_IS_BLOCKED_TITLE,
        }
    }

    const fn message(self) -> Option<&'static str> {
        match self {
            Self::InitializationError => Some(
                "Попробуйте загрузить страницу, проверьте доступность платформы Nextbox.",
            ),
            Self::SaveIsBlockedError => Some(
                "Данные не были загружены корректно. Перезагрузите страницу, чтобы не потерять изменения.",
            ),
            _ => None,
        }
    }
}

/// Returns the catalog payload for `key`.
pub fn notification(key: NotificationKey) -> ToastPayload {
    ToastPayload {
        severity: ToastSeverity::Error,
        title: key.title().to_string(),
        message: key.message().map(str::to_string),
    }
}

/// Returns the catalog payload for `key` with `message` as its detail line.
pub fn notification_with_message(key: NotificationKey, message: impl Into<String>) -> ToastPayload {
    ToastPayload {
        message: Some(message.into()),
        ..notification(key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_entry_is_an_error_with_a_distinct_title() {
        let titles: HashSet<_> = NotificationKey::ALL
            .iter()
            .map(|key| {
                let payload = notification(*key);
                assert_eq!(payload.severity, ToastSeverity::Error);
                payload.title
            })
            .collect();
        assert_eq!(titles.len(), NotificationKey::ALL.len());
    }

    #[test]
    fn message_override_keeps_title() {
        let payload = notification_with_message(NotificationKey::ApiDownloadError, "timeout");
        assert_eq!(payload.title, "Ошибка загрузки данных");
        assert_eq!(payload.message.as_deref(), Some("timeout"));
        assert_eq!(notification(NotificationKey::ApiDeleteError).message, None);
    }
}
