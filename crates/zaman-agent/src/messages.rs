// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing texts.

/// First assistant message of every conversation.
pub const GREETING: &str = "Привет! Я — помощник Zaman. Чем могу помочь сегодня?";

/// Synthetic assistant message appended when a reply could not be obtained.
pub const APOLOGY: &str = "Извините, произошла ошибка. Попробуйте ещё раз.";

pub const CHAT_ERROR_PREFIX: &str = "Ошибка при отправке сообщения: ";
pub const VOICE_ERROR_PREFIX: &str = "Ошибка при распознавании речи: ";

pub const PROFILE_UNAVAILABLE: &str =
    "Не удалось загрузить данные пользователя. Попробуйте позже.";

pub const PASSWORD_TOO_SHORT: &str = "Пароль должен содержать минимум 5 символов";
pub const CONFIRMATION_TOO_SHORT: &str =
    "Подтверждение пароля должно содержать минимум 5 символов";
pub const PASSWORDS_MISMATCH: &str = "Пароли не совпадают";
