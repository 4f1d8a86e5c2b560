//! Startup settings: where the catalog document lives and the page context
//! that enables the interaction layer. Defaults, then an optional
//! `gallery.toml`, then environment overrides; the last one wins.

use std::fs;

use client_core::PageContext;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "gallery.toml";
pub const DEFAULT_CATALOG_PATH: &str = "catalog.json";
const DEFAULT_LOGIN_URL: &str = "/accounts/login/";

#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog_path: String,
    /// `None` leaves the whole interaction layer unwired: no worker, no
    /// modals, no carousel timers.
    pub context: Option<PageContext>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileSettings {
    pub catalog: Option<String>,
    pub context: Option<FileContext>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileContext {
    pub generate_endpoint: Option<String>,
    pub login_url: Option<String>,
    pub csrf_token: Option<String>,
    pub authenticated: Option<bool>,
}

#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub catalog: Option<String>,
    pub generate_endpoint: Option<String>,
    pub login_url: Option<String>,
    pub csrf_token: Option<String>,
    pub authenticated: Option<bool>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            catalog: env_var("GALLERY_CATALOG"),
            generate_endpoint: env_var("GALLERY_GENERATE_ENDPOINT"),
            login_url: env_var("GALLERY_LOGIN_URL"),
            csrf_token: env_var("GALLERY_CSRF_TOKEN"),
            authenticated: env_var("GALLERY_AUTHENTICATED")
                .map(|value| matches!(value.as_str(), "1" | "true" | "yes")),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

pub fn load_settings(config_path: &str) -> Settings {
    let file = match fs::read_to_string(config_path) {
        Ok(raw) => match toml::from_str::<FileSettings>(&raw) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!("ignoring malformed settings file '{config_path}': {err}");
                FileSettings::default()
            }
        },
        Err(_) => FileSettings::default(),
    };
    merge(file, EnvOverrides::from_env())
}

pub fn merge(file: FileSettings, env: EnvOverrides) -> Settings {
    let catalog_path = env
        .catalog
        .or(file.catalog)
        .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());

    let file_context = file.context.unwrap_or_default();
    let generate_endpoint = env.generate_endpoint.or(file_context.generate_endpoint);

    // The endpoint is the context's anchor: without it there is nothing to
    // wire, whatever else was configured.
    let context = generate_endpoint.map(|generate_endpoint| PageContext {
        authenticated: env
            .authenticated
            .or(file_context.authenticated)
            .unwrap_or(false),
        login_url: env
            .login_url
            .or(file_context.login_url)
            .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string()),
        generate_endpoint,
        csrf_token: env.csrf_token.or(file_context.csrf_token).unwrap_or_default(),
    });

    Settings {
        catalog_path,
        context,
    }
}
