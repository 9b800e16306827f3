use leptos::*;
use leptos_meta::*;
use nextbox_app_counter::{CounterApp, CounterConfig};
use nextbox_contract::{HostError, HostServices, HostTransport, ToastPayload};
use nextbox_host_web::{connect_host_services, WebHostTransport};
use nextbox_service::{notification_with_message, NotificationKey};

#[derive(Clone)]
enum Boot {
    Waiting,
    Ready(HostServices),
    Failed(String),
}

/// Toast raised when the host never delivers a usable state.
pub fn boot_failure_toast(err: &HostError) -> ToastPayload {
    notification_with_message(NotificationKey::InitializationError, err.to_string())
}

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    let boot = create_rw_signal(Boot::Waiting);
    spawn_local(async move {
        match connect_host_services().await {
            Ok(services) => boot.set(Boot::Ready(services)),
            Err(err) => {
                logging::error!("nextbox init failed: {err}");
                WebHostTransport.toast(&boot_failure_toast(&err));
                boot.set(Boot::Failed(err.to_string()));
            }
        }
    });

    view! {
        <Title text="Nextbox counter" />
        <main class="plugin-root">
            {move || match boot.get() {
                Boot::Waiting => view! { <p class="plugin-loading">"Connecting to Nextbox..."</p> }.into_view(),
                Boot::Ready(services) => {
                    let config = CounterConfig::load(services.prefs.as_ref());
                    view! { <CounterApp services=services config=config /> }.into_view()
                }
                Boot::Failed(message) => view! {
                    <section class="plugin-error" role="alert">
                        <h1>{NotificationKey::InitializationError.title()}</h1>
                        <p>{message}</p>
                    </section>
                }
                .into_view(),
            }}
        </main>
    }
}

#[cfg(test)]
mod tests {
    use nextbox_contract::ToastSeverity;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn boot_failure_toast_carries_the_host_message() {
        let toast = boot_failure_toast(&HostError::failure("NextBoxSDK global is not available"));
        assert_eq!(toast.severity, ToastSeverity::Error);
        assert_eq!(toast.title, NotificationKey::InitializationError.title());
        assert_eq!(
            toast.message.as_deref(),
            Some("NextBoxSDK global is not available")
        );
    }
}
