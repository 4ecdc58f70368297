/// Popup UI: the environment link list

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::env_config::{ConfigSet, STORAGE_KEY};
use crate::transform::{build_links, transform, EnvLink};

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getActiveTabUrl() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openOptionsPage() -> Result<(), JsValue>;
}

#[derive(Clone, PartialEq)]
enum AppState {
    Loading,
    Idle,
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading);
    let config = use_state(ConfigSet::new);
    let current_url = use_state(String::new);
    let links = use_state(Vec::<EnvLink>::new);

    // Load config and the active tab URL, then build the link list
    let refresh = {
        let state = state.clone();
        let config = config.clone();
        let current_url = current_url.clone();
        let links = links.clone();

        Callback::from(move |_: ()| {
            let state = state.clone();
            let config = config.clone();
            let current_url = current_url.clone();
            let links = links.clone();

            state.set(AppState::Loading);

            spawn_local(async move {
                let loaded = match load_config().await {
                    Ok(c) => c,
                    Err(e) => {
                        state.set(AppState::Error(format!("Failed to load settings: {}", e)));
                        return;
                    }
                };

                let url = match active_tab_url().await {
                    Ok(u) => u,
                    Err(e) => {
                        log::warn!("active tab query failed: {}", e);
                        String::new()
                    }
                };

                let built = build_links(&url, &loaded);
                log::debug!("rendered {} links for {}", built.len(), url);

                config.set(loaded);
                current_url.set(url);
                links.set(built);
                state.set(AppState::Idle);
            });
        })
    };

    // Initial render on mount
    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    // Link click: re-query the tab, recompute the destination, open it
    let on_link_click = {
        let config = config.clone();
        let state = state.clone();

        Callback::from(move |link: EnvLink| {
            let config = config.clone();
            let state = state.clone();

            spawn_local(async move {
                let url = match active_tab_url().await {
                    Ok(u) => u,
                    Err(e) => {
                        state.set(AppState::Error(format!("Failed to read tab: {}", e)));
                        return;
                    }
                };

                let Some(base) = config.get(&link.env) else {
                    return;
                };
                let Some(destination) = transform(&url, base, link.link_type) else {
                    return;
                };

                if let Err(e) = openTab(&destination).await {
                    state.set(AppState::Error(format!("Failed to open tab: {:?}", e)));
                }
            });
        })
    };

    let on_refresh = refresh.reform(|_: MouseEvent| ());

    let on_open_options = Callback::from(move |_| {
        spawn_local(async move {
            if let Err(e) = openOptionsPage().await {
                log::warn!("failed to open options page: {:?}", e);
            }
        });
    });

    // Environments in the order they appear in the link list
    let env_order: Vec<String> = {
        let mut seen = Vec::new();
        for link in links.iter() {
            if !seen.contains(&link.env) {
                seen.push(link.env.clone());
            }
        }
        seen
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"AEM Environment Switcher"}</h1>

            <p class="current-url">
                {format!("Current: {}", if current_url.is_empty() { "-" } else { current_url.as_str() })}
            </p>

            {match &*state {
                AppState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading environments..."}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                AppState::Idle => html! {}
            }}

            if matches!(*state, AppState::Idle) && links.is_empty() {
                <div class="empty-state">
                    <p>{"Not an AEM content page."}</p>
                    <p class="empty-state-hint">{"Open a /content/... page to see environment links."}</p>
                </div>
            }

            <div class="env-links">
                {for env_order.iter().map(|env| {
                    let env_links: Vec<EnvLink> = links
                        .iter()
                        .filter(|l| &l.env == env)
                        .cloned()
                        .collect();

                    html! {
                        <p key={env.clone()} class="env-row">
                            <strong>{env.to_uppercase()}</strong>
                            {": "}
                            {for env_links.iter().map(|link| {
                                let class = if link.active { "env-link active" } else { "env-link" };
                                html! {
                                    <a
                                        href="#"
                                        class={class}
                                        title={link.url.clone()}
                                        onclick={on_link_click.reform({
                                            let link = link.clone();
                                            move |e: MouseEvent| {
                                                e.prevent_default();
                                                link.clone()
                                            }
                                        })}
                                    >
                                        {link.link_type.label()}
                                    </a>
                                }
                            })}
                        </p>
                    }
                })}
            </div>

            <div class="popup-actions">
                <Button onclick={on_refresh} variant={ButtonVariant::Secondary} block={true}>
                    {"Refresh"}
                </Button>
                <Button onclick={on_open_options} variant={ButtonVariant::Secondary} block={true}>
                    {"Settings"}
                </Button>
            </div>
        </div>
    }
}

// Helper functions

async fn load_config() -> Result<ConfigSet, String> {
    let stored = getStorage(STORAGE_KEY)
        .await
        .map_err(|e| format!("Failed to get storage: {:?}", e))?;

    if stored.is_null() || stored.is_undefined() {
        Ok(ConfigSet::new())
    } else {
        serde_wasm_bindgen::from_value(stored)
            .map_err(|e| format!("Failed to parse settings: {:?}", e))
    }
}

async fn active_tab_url() -> Result<String, String> {
    let url = getActiveTabUrl()
        .await
        .map_err(|e| format!("Failed to query active tab: {:?}", e))?;

    Ok(url.as_string().unwrap_or_default())
}
