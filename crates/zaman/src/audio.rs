// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading recorded voice messages from disk.

use std::path::Path;

use zaman_core::{AudioClip, AudioFormat, ZamanError};

/// Reads a recording, inferring its container from the file extension.
pub async fn load_clip(path: &Path) -> Result<AudioClip, ZamanError> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(AudioFormat::from_extension)
        .ok_or_else(|| {
            ZamanError::Validation(format!(
                "unsupported audio file '{}': expected .webm, .ogg, .opus, .m4a or .mp4",
                path.display()
            ))
        })?;

    let data = tokio::fs::read(path).await.map_err(|e| ZamanError::Storage {
        source: Box::new(e),
    })?;
    if data.is_empty() {
        return Err(ZamanError::Validation(format!(
            "audio file '{}' is empty",
            path.display()
        )));
    }
    Ok(AudioClip { data, format })
}
