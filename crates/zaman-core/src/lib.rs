// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Zaman client.
//!
//! This crate provides the error type, the domain and wire-level types shared
//! by every other crate, and the seam traits ([`Transport`], [`Delay`],
//! [`SessionStore`]) that keep the request pipeline testable.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ZamanError;
pub use traits::{Delay, SessionStore, TokioDelay, Transport};
pub use types::{
    ApiRequest, ApiResponse, AudioClip, AudioFormat, ChatMessage, MessageId, Method,
    RequestBody, Role, Route, Session, UserId,
};
