// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./zaman.toml` > `~/.config/zaman/zaman.toml` > `/etc/zaman/zaman.toml`,
//! with environment variable overrides via the `ZAMAN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ZamanConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/zaman/zaman.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "zaman.toml";

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("zaman").join("zaman.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/zaman/zaman.toml`
/// 3. `~/.config/zaman/zaman.toml`
/// 4. `./zaman.toml`
/// 5. `ZAMAN_*` environment variables
pub fn load_config() -> Result<ZamanConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ZamanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZamanConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ZamanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZamanConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used by [`load_config`] before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(ZamanConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user_path) = user_config_path() {
        figment = figment.merge(Toml::file(user_path));
    }
    figment.merge(Toml::file(LOCAL_CONFIG_FILE)).merge(env_provider())
}

/// Sections that accept environment overrides.
const ENV_SECTIONS: [&str; 3] = ["client", "session", "agent"];

/// Environment provider mapping `ZAMAN_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after the section name is a separator, so
/// `ZAMAN_CLIENT_BASE_URL` maps to `client.base_url`. Variables outside the
/// known sections (such as `ZAMAN_PASSWORD`) are ignored.
fn env_provider() -> Env {
    Env::prefixed("ZAMAN_").filter_map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        ENV_SECTIONS.iter().find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|rest| !rest.is_empty())
                .map(|rest| format!("{section}.{rest}").into())
        })
    })
}
