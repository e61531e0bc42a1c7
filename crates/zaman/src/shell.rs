// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `zaman chat` command implementation.
//!
//! Interactive REPL with colored prompt and readline history. Plain lines are
//! sent as chat messages; `/voice <path>` uploads a recording.

use std::path::Path;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use zaman_agent::{TurnOutcome, ZamanAgent};
use zaman_core::{Role, ZamanError};

use crate::audio;

/// A parsed REPL line.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Quit,
    Logout,
    Voice(&'a str),
    Message(&'a str),
}

fn parse_line(line: &str) -> ShellCommand<'_> {
    let trimmed = line.trim();
    match trimmed {
        "/quit" | "/exit" => ShellCommand::Quit,
        "/logout" => ShellCommand::Logout,
        _ => match trimmed.strip_prefix("/voice") {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                ShellCommand::Voice(rest.trim())
            }
            _ => ShellCommand::Message(trimmed),
        },
    }
}

/// Runs the `zaman chat` REPL until `/quit`, Ctrl+C, or Ctrl+D.
///
/// Expects [`ZamanAgent::start`] to have run already.
pub async fn run_chat(mut agent: ZamanAgent) -> Result<(), ZamanError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| ZamanError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "zaman chat".bold().green());
    match agent.user_id() {
        Some(id) => println!("signed in as user {}", id.to_string().cyan()),
        None => println!("{}", "not signed in, chatting anonymously".dimmed()),
    }
    println!(
        "Type {} to send a recording, {} to exit.\n",
        "/voice <path>".yellow(),
        "/quit".yellow()
    );
    if let Some(greeting) = agent.chat().conversation().last() {
        print_assistant(&greeting.text);
    }
    if let Some(banner) = agent.chat().banner() {
        eprintln!("{}", banner.yellow());
    }

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let command = parse_line(&line);
                if command == ShellCommand::Message("") {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match command {
                    ShellCommand::Quit => break,
                    ShellCommand::Logout => {
                        agent.logout().await?;
                        println!("{}", "signed out".dimmed());
                    }
                    ShellCommand::Voice("") => {
                        eprintln!("{}: usage: /voice <path>", "error".red());
                    }
                    ShellCommand::Voice(path) => match audio::load_clip(Path::new(path)).await {
                        Ok(clip) => {
                            let outcome = agent.send_audio(clip).await;
                            if matches!(outcome, TurnOutcome::Replied(_)) {
                                print_transcription(&agent);
                            }
                            report(&agent, &outcome);
                        }
                        Err(e) => eprintln!("{}: {}", "error".red(), e.user_message()),
                    },
                    ShellCommand::Message(text) => {
                        let outcome = agent.send_text(text).await;
                        report(&agent, &outcome);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }
    Ok(())
}

fn report(agent: &ZamanAgent, outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::Ignored => {}
        TurnOutcome::Replied(text) => print_assistant(text),
        TurnOutcome::Failed(_) => {
            if let Some(last) = agent.chat().conversation().last() {
                print_assistant(&last.text);
            }
            if let Some(banner) = agent.chat().banner() {
                eprintln!("{}", banner.red());
            }
        }
    }
}

/// Echoes what the backend heard, which is the user turn before the reply.
fn print_transcription(agent: &ZamanAgent) {
    let heard = agent
        .chat()
        .conversation()
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::User);
    if let Some(message) = heard {
        println!("{} {}", "(heard)".dimmed(), message.text.italic());
    }
}

fn print_assistant(text: &str) {
    println!("{} {}", "zaman:".bold().cyan(), text);
}
