//! Host transport contract: toasts, dirty-state reporting, file picker, and lifecycle events.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use serde::{Deserialize, Serialize};

use crate::storage::types::StorageElementType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Toast severity understood by the host.
pub enum ToastSeverity {
    /// Error toast.
    Error,
    /// Warning toast.
    Warning,
    /// Informational toast.
    Info,
    /// Success toast.
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Toast payload forwarded to the host notification area.
pub struct ToastPayload {
    /// Toast severity.
    pub severity: ToastSeverity,
    /// Toast title.
    pub title: String,
    /// Optional detail line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Document mode toggled by the host.
pub enum ViewMode {
    /// Read-only viewing.
    View,
    /// Editing.
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One element picked in the host file-selection modal.
pub struct SelectedFile {
    /// Full storage path.
    pub path: String,
    /// Base name.
    #[serde(default)]
    pub name: String,
    /// Element kind when the host reports it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<StorageElementType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
/// Options for the host file-selection modal.
pub struct FileSelectOptions {
    /// Modal title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Allow picking more than one element.
    #[serde(default)]
    pub multiple: bool,
    /// Restrict picking to one element kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<StorageElementType>,
    /// File extensions the modal offers; empty offers everything.
    #[serde(default)]
    pub file_name_ext: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Host lifecycle event channels the plugin can subscribe to.
pub enum HostEventKind {
    /// View/edit mode switched.
    ModeChange,
    /// Host asks the plugin to save before closing.
    SaveAndClose,
    /// File-selection modal returned a result.
    FilesSelected,
}

impl HostEventKind {
    /// Event name used on the host transport bus.
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::ModeChange => "changeMode",
            Self::SaveAndClose => "saveAndClose",
            Self::FilesSelected => "modalFilesSelect",
        }
    }

    /// Every channel, in subscription order.
    pub const ALL: [Self; 3] = [Self::ModeChange, Self::SaveAndClose, Self::FilesSelected];
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Event delivered by the host.
pub enum HostEvent {
    /// New document mode.
    ModeChanged(ViewMode),
    /// Save-and-close request.
    SaveAndClose,
    /// Elements picked in the file-selection modal.
    FilesSelected(Vec<SelectedFile>),
}

impl HostEvent {
    /// Channel the event travels on.
    pub fn kind(&self) -> HostEventKind {
        match self {
            Self::ModeChanged(_) => HostEventKind::ModeChange,
            Self::SaveAndClose => HostEventKind::SaveAndClose,
            Self::FilesSelected(_) => HostEventKind::FilesSelected,
        }
    }
}

/// Callback invoked for each delivered event.
pub type HostEventHandler = Rc<dyn Fn(HostEvent)>;

/// Drop-based handle for a host event subscription.
pub struct Subscription {
    unsubscribe: Box<dyn Fn()>,
    active: Cell<bool>,
}

impl Subscription {
    /// Wraps the host `off` call.
    pub fn new(unsubscribe: impl Fn() + 'static) -> Self {
        Self {
            unsubscribe: Box::new(unsubscribe),
            active: Cell::new(true),
        }
    }

    /// Handle that does nothing on drop.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Unsubscribes now; later calls and the drop are no-ops.
    pub fn unsubscribe(&self) {
        if self.active.replace(false) {
            (self.unsubscribe)();
        }
    }

    /// Returns whether the subscription is still live.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.active.get())
            .finish()
    }
}

/// Host transport services available to the plugin.
pub trait HostTransport {
    /// Shows a toast in the host UI.
    fn toast(&self, payload: &ToastPayload);

    /// Tells the host whether the document has unsaved changes.
    fn change_content(&self, changed: bool);

    /// Opens the host file-selection modal; the result arrives as [`HostEvent::FilesSelected`].
    fn open_modal_files_select(&self, options: &FileSelectOptions);

    /// Registers `handler` for events of `kind`.
    fn subscribe(&self, kind: HostEventKind, handler: HostEventHandler) -> Subscription;
}

#[derive(Debug, Clone, Copy, Default)]
/// Transport that drops every call.
pub struct NoopHostTransport;

impl HostTransport for NoopHostTransport {
    fn toast(&self, _payload: &ToastPayload) {}

    fn change_content(&self, _changed: bool) {}

    fn open_modal_files_select(&self, _options: &FileSelectOptions) {}

    fn subscribe(&self, _kind: HostEventKind, _handler: HostEventHandler) -> Subscription {
        Subscription::noop()
    }
}

#[derive(Default)]
struct MemoryTransportInner {
    toasts: Vec<ToastPayload>,
    content_flags: Vec<bool>,
    picker_requests: Vec<FileSelectOptions>,
    next_id: u64,
    handlers: BTreeMap<u64, (HostEventKind, HostEventHandler)>,
}

/// Transport that records calls and lets tests emit host events.
#[derive(Clone, Default)]
pub struct MemoryHostTransport {
    inner: Rc<RefCell<MemoryTransportInner>>,
}

impl MemoryHostTransport {
    /// Toasts shown so far.
    pub fn toasts(&self) -> Vec<ToastPayload> {
        self.inner.borrow().toasts.clone()
    }

    /// Values passed to `change_content`, in order.
    pub fn content_flags(&self) -> Vec<bool> {
        self.inner.borrow().content_flags.clone()
    }

    /// File picker requests, in order.
    pub fn picker_requests(&self) -> Vec<FileSelectOptions> {
        self.inner.borrow().picker_requests.clone()
    }

    /// Number of live handlers for `kind`.
    pub fn subscriber_count(&self, kind: HostEventKind) -> usize {
        self.inner
            .borrow()
            .handlers
            .values()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Delivers `event` to every handler registered for its kind.
    pub fn emit(&self, event: HostEvent) {
        let kind = event.kind();
        let handlers: Vec<HostEventHandler> = self
            .inner
            .borrow()
            .handlers
            .values()
            .filter(|(k, _)| *k == kind)
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(event.clone());
        }
    }
}

impl HostTransport for MemoryHostTransport {
    fn toast(&self, payload: &ToastPayload) {
        self.inner.borrow_mut().toasts.push(payload.clone());
    }

    fn change_content(&self, changed: bool) {
        self.inner.borrow_mut().content_flags.push(changed);
    }

    fn open_modal_files_select(&self, options: &FileSelectOptions) {
        self.inner.borrow_mut().picker_requests.push(options.clone());
    }

    fn subscribe(&self, kind: HostEventKind, handler: HostEventHandler) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.handlers.insert(id, (kind, handler));
            id
        };
        let inner = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.borrow_mut().handlers.remove(&id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_subscription_unregisters_handler() {
        let transport = MemoryHostTransport::default();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let subscription = transport.subscribe(
            HostEventKind::SaveAndClose,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );

        transport.emit(HostEvent::SaveAndClose);
        transport.emit(HostEvent::ModeChanged(ViewMode::Edit));
        assert_eq!(hits.get(), 1);

        drop(subscription);
        transport.emit(HostEvent::SaveAndClose);
        assert_eq!(hits.get(), 1);
        assert_eq!(transport.subscriber_count(HostEventKind::SaveAndClose), 0);
    }

    #[test]
    fn explicit_unsubscribe_is_idempotent() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let subscription = Subscription::new(move || counter.set(counter.get() + 1));
        subscription.unsubscribe();
        subscription.unsubscribe();
        assert!(!subscription.is_active());
        drop(subscription);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn toast_payload_omits_missing_message() {
        let payload = ToastPayload {
            severity: ToastSeverity::Error,
            title: "t".to_string(),
            message: None,
        };
        assert_eq!(
            serde_json::to_string(&payload).expect("serialize"),
            r#"{"severity":"error","title":"t"}"#
        );
    }
}
