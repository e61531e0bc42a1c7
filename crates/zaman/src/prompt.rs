// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential prompts via TTY or the `ZAMAN_PASSWORD` environment variable.

use std::io::{BufRead, IsTerminal, Write};

use secrecy::SecretString;
use zaman_agent::{AuthMode, Credentials};
use zaman_core::ZamanError;

/// Environment variable supplying the password for non-interactive use.
pub const PASSWORD_ENV_VAR: &str = "ZAMAN_PASSWORD";

/// Collects the auth form for `mode`, prompting for whatever is missing.
///
/// In register mode the password is asked twice; the env var counts as both.
pub fn read_credentials(
    mode: AuthMode,
    username: Option<String>,
) -> Result<Credentials, ZamanError> {
    let username = match username {
        Some(name) => name,
        None => read_line("Username: ")?,
    };

    if let Some(password) = password_from_env() {
        return Ok(match mode {
            AuthMode::Login => Credentials::login(username, SecretString::from(password)),
            AuthMode::Register => Credentials::register(
                username,
                SecretString::from(password.clone()),
                SecretString::from(password),
            ),
        });
    }

    if !std::io::stdin().is_terminal() {
        return Err(ZamanError::Config(format!(
            "no password provided. Set {PASSWORD_ENV_VAR} or run interactively."
        )));
    }

    let password = read_secret("Password: ")?;
    Ok(match mode {
        AuthMode::Login => Credentials::login(username, password),
        AuthMode::Register => {
            let confirmation = read_secret("Confirm password: ")?;
            Credentials::register(username, password, confirmation)
        }
    })
}

fn password_from_env() -> Option<String> {
    std::env::var(PASSWORD_ENV_VAR).ok().filter(|p| !p.is_empty())
}

fn read_secret(label: &str) -> Result<SecretString, ZamanError> {
    eprint!("{label}");
    rpassword::read_password()
        .map(SecretString::from)
        .map_err(|e| ZamanError::Internal(format!("failed to read password: {e}")))
}

fn read_line(label: &str) -> Result<String, ZamanError> {
    eprint!("{label}");
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| ZamanError::Internal(format!("failed to read input: {e}")))?;
    let line = line.trim().to_string();
    if line.is_empty() {
        return Err(ZamanError::Validation("username must not be empty".into()));
    }
    Ok(line)
}
