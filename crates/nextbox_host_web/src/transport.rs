//! Host transport adapter backed by the SDK `Transport` object.

use nextbox_contract::{
    FileSelectOptions, HostEventHandler, HostEventKind, HostTransport, Subscription, ToastPayload,
};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Toasts, dirty flag, file picker and lifecycle events through the SDK.
///
/// Transport calls have no result channel; failures are written to the browser console.
pub struct WebHostTransport;

impl HostTransport for WebHostTransport {
    fn toast(&self, payload: &ToastPayload) {
        if let Err(err) = bridge::toast(payload) {
            bridge::warn(&format!("NEXTBOX.toast: {err}"));
        }
    }

    fn change_content(&self, changed: bool) {
        if let Err(err) = bridge::change_content(changed) {
            bridge::warn(&format!("NEXTBOX.changeContent: {err}"));
        }
    }

    fn open_modal_files_select(&self, options: &FileSelectOptions) {
        if let Err(err) = bridge::open_modal_files_select(options) {
            bridge::warn(&format!("NEXTBOX.openModalFilesSelect: {err}"));
        }
    }

    fn subscribe(&self, kind: HostEventKind, handler: HostEventHandler) -> Subscription {
        bridge::subscribe(kind, handler).unwrap_or_else(|err| {
            bridge::warn(&format!("NEXTBOX.on({}): {err}", kind.event_name()));
            Subscription::noop()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn failed_subscription_yields_inert_handle() {
        let subscription = WebHostTransport.subscribe(HostEventKind::SaveAndClose, Rc::new(|_| {}));
        assert!(subscription.is_active());
        subscription.unsubscribe();
        assert!(!subscription.is_active());
    }
}
