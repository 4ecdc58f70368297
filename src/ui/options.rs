/// Options page: the environment settings form

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::env_config::{export_filename, ConfigSet, EnvBase, STORAGE_KEY};

// Import JS bridge functions
#[wasm_bindgen(module = "/options.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    fn exportToFile(data: &str, filename: &str);
}

#[derive(Clone, PartialEq)]
enum Notice {
    Saved(String),
    Rejected(String),
}

#[derive(Clone, Copy, PartialEq)]
enum UrlField {
    Author,
    Publish,
}

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let config = use_state(ConfigSet::new);
    let loading = use_state(|| true);
    let notice = use_state(|| None::<Notice>);
    let new_env_name = use_state(String::new);

    // Load settings on mount
    {
        let config = config.clone();
        let loading = loading.clone();
        let notice = notice.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_config().await {
                    Ok(loaded) => config.set(loaded),
                    Err(e) => notice.set(Some(Notice::Rejected(format!("Failed to load: {}", e)))),
                }
                loading.set(false);
            });
            || ()
        });
    }

    // One of the base-URL inputs changed: rebuild the config value and re-set
    let on_url_input = {
        let config = config.clone();

        Callback::from(move |(env, field, value): (String, UrlField, String)| {
            let mut updated = (*config).clone();
            let mut base = updated.get(&env).cloned().unwrap_or_default();
            match field {
                UrlField::Author => base.author = value,
                UrlField::Publish => base.publish = value,
            }
            updated.set(&env, base);
            config.set(updated);
        })
    };

    // Save: normalize URLs and persist the whole set
    let on_save = {
        let config = config.clone();
        let notice = notice.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let normalized = config.normalized();
            config.set(normalized.clone());

            let notice = notice.clone();
            spawn_local(async move {
                match save_config(&normalized).await {
                    Ok(()) => notice.set(Some(Notice::Saved("Saved!".to_string()))),
                    Err(e) => notice.set(Some(Notice::Rejected(format!("Save failed: {}", e)))),
                }
            });
        })
    };

    let on_new_env_input = {
        let new_env_name = new_env_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                new_env_name.set(input.value());
            }
        })
    };

    // Add a custom environment; duplicates and empty names silently no-op
    let on_add_env = {
        let config = config.clone();
        let new_env_name = new_env_name.clone();
        let notice = notice.clone();

        Callback::from(move |_| {
            let mut updated = (*config).clone();
            if !updated.add_env(new_env_name.as_str()) {
                return;
            }
            config.set(updated.clone());
            new_env_name.set(String::new());

            let notice = notice.clone();
            spawn_local(async move {
                if let Err(e) = save_config(&updated).await {
                    notice.set(Some(Notice::Rejected(format!("Save failed: {}", e))));
                }
            });
        })
    };

    let on_remove_env = {
        let config = config.clone();
        let notice = notice.clone();

        Callback::from(move |env: String| {
            let mut updated = (*config).clone();
            if !updated.remove_env(&env) {
                return;
            }
            config.set(updated.clone());

            let notice = notice.clone();
            spawn_local(async move {
                if let Err(e) = save_config(&updated).await {
                    notice.set(Some(Notice::Rejected(format!("Save failed: {}", e))));
                }
            });
        })
    };

    // Export the full configuration as a downloadable JSON document
    let on_export = {
        let config = config.clone();
        let notice = notice.clone();

        Callback::from(move |_| match config.export_json() {
            Ok(json) => {
                exportToFile(&json, &export_filename(&today_iso_date()));
            }
            Err(e) => {
                log::warn!("export failed: {}", e);
                notice.set(Some(Notice::Rejected(e)));
            }
        })
    };

    // Import: parse and validate the selected file; on any structural error
    // the stored configuration stays untouched
    let on_import_file = {
        let config = config.clone();
        let notice = notice.clone();

        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");

            let config = config.clone();
            let notice = notice.clone();

            spawn_local(async move {
                let text = match read_file_text(&file).await {
                    Ok(t) => t,
                    Err(e) => {
                        notice.set(Some(Notice::Rejected(format!("Import failed: {}", e))));
                        return;
                    }
                };

                match ConfigSet::parse_import(&text) {
                    Ok(imported) => {
                        config.set(imported.clone());
                        match save_config(&imported).await {
                            Ok(()) => notice.set(Some(Notice::Saved("Imported!".to_string()))),
                            Err(e) => {
                                notice.set(Some(Notice::Rejected(format!("Save failed: {}", e))))
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("import rejected: {}", e);
                        notice.set(Some(Notice::Rejected(e)));
                    }
                }
            });
        })
    };

    if *loading {
        return html! {
            <div class="loading-text-center">
                <Spinner />
                <p class="loading-text">{"Loading settings..."}</p>
            </div>
        };
    }

    html! {
        <div class="container">
            <div class="header">
                <h1 class="main-title">{"Environment Settings"}</h1>
                <div class="header-actions">
                    <Button onclick={on_export} variant={ButtonVariant::Secondary}>
                        {"Export"}
                    </Button>
                    <label class="import-label">
                        {"Import"}
                        <input
                            type="file"
                            accept="application/json"
                            class="import-input"
                            onchange={on_import_file}
                        />
                    </label>
                </div>
            </div>

            {match &*notice {
                Some(Notice::Saved(msg)) => html! {
                    <Alert r#type={AlertType::Success} title={msg.clone()} inline={true} />
                },
                Some(Notice::Rejected(msg)) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {msg.clone()}
                    </Alert>
                },
                None => html! {},
            }}

            <form onsubmit={on_save}>
                {for config.display_order().iter().map(|env| {
                    let base = config.get(env).cloned().unwrap_or_default();
                    html! {
                        <EnvBlock
                            key={env.clone()}
                            env={env.clone()}
                            base={base}
                            removable={!ConfigSet::is_builtin(env)}
                            on_url_input={on_url_input.clone()}
                            on_remove={on_remove_env.clone()}
                        />
                    }
                })}

                <Button r#type={ButtonType::Submit} variant={ButtonVariant::Primary}>
                    {"Save"}
                </Button>
            </form>

            <div class="add-env">
                <input
                    type="text"
                    placeholder="New environment name"
                    value={(*new_env_name).clone()}
                    oninput={on_new_env_input}
                    class="add-env-input"
                />
                <Button onclick={on_add_env} variant={ButtonVariant::Secondary}>
                    {"Add environment"}
                </Button>
            </div>
        </div>
    }
}

// One environment's pair of URL inputs
#[derive(Properties, PartialEq)]
struct EnvBlockProps {
    env: String,
    base: EnvBase,
    removable: bool,
    on_url_input: Callback<(String, UrlField, String)>,
    on_remove: Callback<String>,
}

#[function_component(EnvBlock)]
fn env_block(props: &EnvBlockProps) -> Html {
    let env = &props.env;

    let url_input = |field: UrlField| {
        props.on_url_input.reform({
            let env = env.clone();
            move |e: InputEvent| {
                let value = e
                    .target_dyn_into::<HtmlInputElement>()
                    .map(|input| input.value())
                    .unwrap_or_default();
                (env.clone(), field, value)
            }
        })
    };

    html! {
        <div class="env-block">
            <div class="env-block-header">
                <h3>{env.to_uppercase()}</h3>
                if props.removable {
                    <Button
                        onclick={props.on_remove.reform({
                            let env = env.clone();
                            move |_| env.clone()
                        })}
                        variant={ButtonVariant::Danger}
                    >
                        {"Remove"}
                    </Button>
                }
            </div>
            <label>{"Author"}</label>
            <input
                type="url"
                value={props.base.author.clone()}
                placeholder={format!("https://author-{}.example.com", env)}
                oninput={url_input(UrlField::Author)}
            />
            <label>{"Publish"}</label>
            <input
                type="url"
                value={props.base.publish.clone()}
                placeholder={format!("https://{}.example.com", env)}
                oninput={url_input(UrlField::Publish)}
            />
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

async fn save_config(config: &ConfigSet) -> Result<(), String> {
    let value = serde_wasm_bindgen::to_value(config)
        .map_err(|e| format!("Failed to serialize settings: {:?}", e))?;

    setStorage(STORAGE_KEY, value)
        .await
        .map_err(|e| format!("Failed to save storage: {:?}", e))
}

async fn read_file_text(file: &web_sys::File) -> Result<String, String> {
    let text = JsFuture::from(file.text())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?;

    text.as_string()
        .ok_or_else(|| "File is not readable as text".to_string())
}

fn today_iso_date() -> String {
    let iso = String::from(js_sys::Date::new_0().to_iso_string());
    iso.chars().take(10).collect()
}
