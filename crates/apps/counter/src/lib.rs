//! Counter plugin UI: a persisted counter driven by host lifecycle events.
//!
//! The component reads its count from a storage node on mount, follows the host view/edit mode,
//! saves on the host save-and-close request and autosaves on increments through a persisted
//! throttle.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod autosave;
pub mod config;
pub mod controller;

use leptos::*;
use nextbox_contract::{unix_time_ms_now, Connection, HostEvent, HostServices, SelectedFile, ViewMode};

pub use autosave::{should_save, AutosaveThrottle};
pub use config::{CounterConfig, CONFIG_PREF_KEY};
pub use controller::{parse_count, CounterController, Increment};

#[component]
/// Counter plugin panel.
pub fn CounterApp(
    /// Host services delivered after the lifecycle `init` callback.
    services: HostServices,
    /// Plugin settings.
    #[prop(optional)]
    config: Option<CounterConfig>,
) -> impl IntoView {
    let controller = CounterController::new(&services, config.unwrap_or_default());

    let count = create_rw_signal(0_i64);
    let mode = create_rw_signal(controller.initial_mode());
    let connections = create_rw_signal::<Vec<Connection>>(Vec::new());
    let show_connections = create_rw_signal(false);
    let selected = create_rw_signal::<Vec<SelectedFile>>(Vec::new());
    let last_error = create_rw_signal::<Option<String>>(None);
    let save_blocked = create_rw_signal(false);

    let save = {
        let controller = controller.clone();
        move || {
            let controller = controller.clone();
            spawn_local(async move {
                let result = controller
                    .save(count.get_untracked(), unix_time_ms_now())
                    .await;
                match result {
                    Ok(()) => last_error.set(None),
                    Err(err) => {
                        logging::warn!("counter save failed: {err}");
                        last_error.set(Some(err.to_string()));
                    }
                }
                save_blocked.set(controller.is_save_blocked());
            });
        }
    };

    {
        let controller = controller.clone();
        spawn_local(async move {
            match controller.load_count().await {
                Ok(value) => count.set(value),
                Err(err) => {
                    logging::warn!("counter load failed: {err}");
                    count.set(0);
                    last_error.set(Some(err.to_string()));
                }
            }
            save_blocked.set(controller.is_save_blocked());
            if let Ok(list) = controller.load_connections().await {
                connections.set(list);
            }
        });
    }

    let subscriptions = {
        let save = save.clone();
        controller.subscribe_events(move |event| match event {
            HostEvent::ModeChanged(next) => mode.set(next),
            HostEvent::SaveAndClose => save(),
            HostEvent::FilesSelected(files) => selected.set(files),
        })
    };
    on_cleanup(move || drop(subscriptions));

    let on_increment = {
        let controller = controller.clone();
        let save = save.clone();
        move |_| {
            let step = controller.increment(count.get_untracked(), unix_time_ms_now());
            count.set(step.count);
            if step.autosave {
                save();
            }
        }
    };

    let on_pick = {
        let controller = controller.clone();
        move |_| controller.pick_files()
    };

    view! {
        <div class="counter-app">
            <h1>"Nextbox counter"</h1>
            <div class="card">
                <p>
                    {move || match mode.get() {
                        ViewMode::View => "Mode: view",
                        ViewMode::Edit => "Mode: edit",
                    }}
                </p>
                <span class="button-group">
                    <button
                        type="button"
                        disabled=move || mode.get() == ViewMode::View
                        on:click=on_increment
                    >
                        {move || format!("count is {}", count.get())}
                    </button>
                    <button
                        type="button"
                        on:click=move |_| show_connections.update(|shown| *shown = !*shown)
                    >
                        "show connections list"
                    </button>
                    <button
                        type="button"
                        class=move || if selected.get().is_empty() { "" } else { "element-selected" }
                        on:click=on_pick
                    >
                        {move || {
                            let files = selected.get();
                            if files.is_empty() {
                                "show nextbox modal".to_string()
                            } else {
                                let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
                                format!("selected: {}", paths.join(", "))
                            }
                        }}
                    </button>
                </span>
                <Show when=move || show_connections.get()>
                    <ul class="connections-list">
                        <For
                            each=move || connections.get()
                            key=|connection| connection.id
                            let:connection
                        >
                            <li>{connection.name}</li>
                        </For>
                    </ul>
                </Show>
                <p class="counter-status" role="status">
                    {move || {
                        let mut parts = Vec::new();
                        if save_blocked.get() {
                            parts.push(nextbox_service::notifications::SAVE_IS_BLOCKED_TITLE.to_string());
                        }
                        if let Some(err) = last_error.get() {
                            parts.push(err);
                        }
                        parts.join(" | ")
                    }}
                </p>
            </div>
        </div>
    }
}
