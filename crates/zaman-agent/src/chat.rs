// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation model and the chat session driving it.
//!
//! A session moves through `Idle -> Sending|Transcribing -> Idle`. While a
//! request is in flight the conversation holds exactly one pending assistant
//! placeholder. Failures never escape as errors: they become an apology
//! message in the transcript plus a banner text.

use strum::Display;
use tracing::{debug, warn};
use zaman_client::{ChatTurn, ZamanApi};
use zaman_core::{AudioClip, ChatMessage, MessageId, Role, UserId, ZamanError};

use crate::messages;

/// Ordered list of turns with monotonically increasing ids.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// A fresh conversation opened by the assistant greeting.
    pub fn new() -> Self {
        let mut conversation = Self::empty();
        conversation.push(Role::Assistant, messages::GREETING);
        conversation
    }

    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn push(&mut self, role: Role, text: impl Into<String>) -> MessageId {
        self.push_message(role, text.into(), false)
    }

    /// Appends the reply placeholder, or returns the existing one.
    pub fn push_pending(&mut self) -> MessageId {
        if let Some(pending) = self.messages.iter().find(|m| m.pending) {
            return pending.id;
        }
        self.push_message(Role::Assistant, String::new(), true)
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(|m| m.pending)
    }

    /// Removes the placeholder, if any.
    pub fn remove_pending(&mut self) {
        self.messages.retain(|m| !m.pending);
    }

    /// Non-pending turns in insertion order, as sent to `/chat`.
    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .filter(|m| !m.pending)
            .map(|m| ChatTurn {
                role: m.role,
                content: m.text.clone(),
            })
            .collect()
    }

    fn push_message(&mut self, role: Role, text: String, pending: bool) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            pending,
        });
        id
    }
}

/// States of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ChatState {
    /// Waiting for input.
    Idle,
    /// A text message is awaiting its reply.
    Sending,
    /// A voice message is being transcribed and answered.
    Transcribing,
}

/// What happened to one user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    /// The assistant answered with this text.
    Replied(String),
    /// No reply; carries the normalized error message.
    Failed(String),
}

/// One user's chat screen: conversation, in-flight state, and error banner.
pub struct ChatSession {
    api: ZamanApi,
    conversation: Conversation,
    user_id: Option<UserId>,
    fallback_user_id: UserId,
    banner: Option<String>,
    state: ChatState,
}

impl ChatSession {
    pub fn new(api: ZamanApi, fallback_user_id: i64) -> Self {
        Self {
            api,
            conversation: Conversation::new(),
            user_id: None,
            fallback_user_id: UserId::Numeric(fallback_user_id),
            banner: None,
            state: ChatState::Idle,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Shows a notice until the next send.
    pub fn show_banner(&mut self, text: impl Into<String>) {
        self.banner = Some(text.into());
    }

    pub fn set_user(&mut self, user_id: Option<UserId>) {
        self.user_id = user_id;
    }

    /// Id sent to `/chat`: the signed-in user, else the configured fallback.
    pub fn effective_user_id(&self) -> &UserId {
        self.user_id.as_ref().unwrap_or(&self.fallback_user_id)
    }

    /// Starts over with only the greeting.
    pub fn reset(&mut self) {
        self.conversation = Conversation::new();
        self.banner = None;
        self.state = ChatState::Idle;
    }

    /// Sends a text message with the whole conversation as context.
    pub async fn send_text(&mut self, input: &str) -> TurnOutcome {
        let text = input.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }

        self.banner = None;
        self.conversation.push(Role::User, text);
        let history = self.conversation.history();
        self.conversation.push_pending();
        self.state = ChatState::Sending;

        let user_id = self.effective_user_id().clone();
        debug!(user_id = %user_id, turns = history.len(), "sending chat message");
        let result = self.api.send_chat(&history, &user_id).await;

        let outcome = match result {
            Ok(reply) => self.resolve(Ok(reply.response_text)),
            Err(e) => self.resolve(Err((messages::CHAT_ERROR_PREFIX, e))),
        };
        self.state = ChatState::Idle;
        outcome
    }

    /// Uploads a voice message; the transcription becomes the user turn.
    pub async fn send_audio(&mut self, clip: AudioClip) -> TurnOutcome {
        self.banner = None;
        self.conversation.push_pending();
        self.state = ChatState::Transcribing;

        debug!(bytes = clip.data.len(), format = clip.format.mime_type(), "sending voice message");
        let result = self.api.transcribe_audio(clip).await;

        let outcome = match result {
            Ok(t) => {
                self.conversation.remove_pending();
                self.conversation.push(Role::User, t.transcribed_text);
                self.conversation.push_pending();
                self.resolve(Ok(t.response_text))
            }
            Err(e) => self.resolve(Err((messages::VOICE_ERROR_PREFIX, e))),
        };
        self.state = ChatState::Idle;
        outcome
    }

    /// Replaces the placeholder with the reply or the apology.
    fn resolve(&mut self, result: Result<String, (&str, ZamanError)>) -> TurnOutcome {
        self.conversation.remove_pending();
        match result {
            Ok(text) => {
                self.conversation.push(Role::Assistant, text.clone());
                TurnOutcome::Replied(text)
            }
            Err((prefix, e)) => {
                warn!(error = %e, "no reply from assistant");
                let message = e.user_message();
                self.conversation.push(Role::Assistant, messages::APOLOGY);
                self.banner = Some(format!("{prefix}{message}"));
                TurnOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_conversation_starts_with_greeting() {
        let conversation = Conversation::new();
        let first = &conversation.messages()[0];
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(first.role, Role::Assistant);
        assert_eq!(first.text, messages::GREETING);
        assert_eq!(first.id, MessageId(1));
    }

    #[test]
    fn ids_stay_monotonic_after_placeholder_removal() {
        let mut conversation = Conversation::new();
        let user = conversation.push(Role::User, "hi");
        let pending = conversation.push_pending();
        conversation.remove_pending();
        let reply = conversation.push(Role::Assistant, "hello");

        assert!(user < pending && pending < reply);
        let ids: Vec<_> = conversation.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn at_most_one_placeholder() {
        let mut conversation = Conversation::empty();
        let a = conversation.push_pending();
        let b = conversation.push_pending();
        assert_eq!(a, b);
        assert_eq!(conversation.messages().iter().filter(|m| m.pending).count(), 1);
    }

    #[test]
    fn history_skips_placeholder_and_keeps_order() {
        let mut conversation = Conversation::new();
        conversation.push(Role::User, "hi");
        conversation.push_pending();

        let history = conversation.history();
        assert_eq!(
            history,
            vec![ChatTurn::assistant(messages::GREETING), ChatTurn::user("hi")]
        );
    }

    #[test]
    fn chat_state_display() {
        assert_eq!(ChatState::Idle.to_string(), "idle");
        assert_eq!(ChatState::Sending.to_string(), "sending");
        assert_eq!(ChatState::Transcribing.to_string(), "transcribing");
    }
}
