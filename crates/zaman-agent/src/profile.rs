// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User profile loading.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use zaman_client::ZamanApi;
use zaman_core::{UserId, ZamanError};

use crate::messages;

/// Profile object as returned by `/user`. The shape is backend-defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: UserId,
    pub data: Value,
}

impl Profile {
    /// Best-effort display name: `username`, then `name`.
    pub fn display_name(&self) -> Option<&str> {
        ["username", "name"]
            .iter()
            .find_map(|key| self.data.get(key).and_then(Value::as_str))
    }
}

/// The profile could not be fetched. `Display` is the banner text.
#[derive(Debug, Error)]
#[error("{}", messages::PROFILE_UNAVAILABLE)]
pub struct ProfileUnavailable {
    #[source]
    pub source: ZamanError,
}

pub async fn load_profile(api: &ZamanApi, user_id: &UserId) -> Result<Profile, ProfileUnavailable> {
    match api.fetch_user_data(user_id).await {
        Ok(data) => Ok(Profile {
            user_id: user_id.clone(),
            data,
        }),
        Err(source) => {
            warn!(user_id = %user_id, error = %source, "failed to load user data");
            Err(ProfileUnavailable { source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_name_prefers_username() {
        let profile = Profile {
            user_id: UserId::Numeric(1),
            data: json!({"name": "Алия", "username": "aliya"}),
        };
        assert_eq!(profile.display_name(), Some("aliya"));

        let unnamed = Profile {
            user_id: UserId::Numeric(1),
            data: json!({"balance": 10}),
        };
        assert_eq!(unnamed.display_name(), None);
    }

    #[test]
    fn unavailable_displays_banner_text() {
        let err = ProfileUnavailable {
            source: ZamanError::Timeout,
        };
        assert_eq!(err.to_string(), messages::PROFILE_UNAVAILABLE);
    }
}
