// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zaman - terminal client for the Zaman banking assistant.

mod audio;
mod prompt;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;
use zaman_agent::{AuthMode, TurnOutcome, ZamanAgent};
use zaman_config::ZamanConfig;
use zaman_core::ZamanError;

/// Zaman - terminal client for the Zaman banking assistant.
#[derive(Parser, Debug)]
#[command(name = "zaman", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and remember the session.
    Login {
        /// Prompted for when omitted.
        username: Option<String>,
    },
    /// Create an account and remember the session.
    Register {
        /// Prompted for when omitted.
        username: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user id.
    Whoami,
    /// Fetch and print the signed-in user's profile.
    Profile,
    /// Launch the interactive chat (default).
    Chat,
    /// Send a recorded voice message and print the reply.
    Transcribe {
        /// Recording (.webm, .ogg, .opus, .m4a, .mp4).
        file: PathBuf,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => zaman_config::load_and_validate_path(path),
        None => zaman_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            zaman_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli.command.unwrap_or(Commands::Chat), &config).await {
        eprintln!("{}: {}", "error".red(), e.user_message());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &ZamanConfig) -> Result<(), ZamanError> {
    debug!(?command, base_url = %config.client.base_url, "dispatching command");

    if let Commands::Config = command {
        let rendered = config
            .to_toml_string()
            .map_err(|e| ZamanError::Internal(format!("failed to render config: {e}")))?;
        print!("{rendered}");
        return Ok(());
    }

    let mut agent = ZamanAgent::from_config(config)?;

    match command {
        Commands::Login { username } => sign_in(&mut agent, AuthMode::Login, username).await,
        Commands::Register { username } => {
            sign_in(&mut agent, AuthMode::Register, username).await
        }
        Commands::Logout => {
            agent.restore().await?;
            agent.logout().await?;
            println!("signed out");
            Ok(())
        }
        Commands::Whoami => {
            match agent.restore().await? {
                Some(session) => println!("user {}", session.user_id()),
                None => println!("not signed in"),
            }
            Ok(())
        }
        Commands::Profile => {
            if agent.start().await?.is_none() {
                return Err(ZamanError::Validation(
                    "not signed in; run `zaman login` first".into(),
                ));
            }
            match agent.profile() {
                Some(profile) => {
                    let pretty = serde_json::to_string_pretty(&profile.data).map_err(|e| {
                        ZamanError::Internal(format!("failed to format profile: {e}"))
                    })?;
                    println!("{pretty}");
                }
                None => print_banner(&agent),
            }
            Ok(())
        }
        Commands::Chat => {
            agent.start().await?;
            shell::run_chat(agent).await
        }
        Commands::Transcribe { file } => {
            let clip = audio::load_clip(&file).await?;
            agent.start().await?;
            match agent.send_audio(clip).await {
                TurnOutcome::Replied(reply) => {
                    if let Some(heard) = agent.chat().conversation().history().iter().rev().nth(1) {
                        println!("{} {}", "heard:".dimmed(), heard.content);
                    }
                    println!("{} {reply}", "zaman:".bold().cyan());
                    Ok(())
                }
                TurnOutcome::Failed(message) => Err(ZamanError::Validation(
                    agent.chat().banner().map(str::to_string).unwrap_or(message),
                )),
                TurnOutcome::Ignored => Ok(()),
            }
        }
        Commands::Config => Ok(()),
    }
}

async fn sign_in(
    agent: &mut ZamanAgent,
    mode: AuthMode,
    username: Option<String>,
) -> Result<(), ZamanError> {
    let creds = prompt::read_credentials(mode, username)?;
    let user_id = agent.sign_in(mode, &creds).await?.user_id().clone();
    println!("signed in as user {}", user_id.to_string().green());

    // A missing profile is not fatal; it only produces a notice.
    match agent.profile().and_then(|p| p.display_name()) {
        Some(name) => println!("welcome, {name}"),
        None => print_banner(agent),
    }
    Ok(())
}

fn print_banner(agent: &ZamanAgent) {
    if let Some(banner) = agent.chat().banner() {
        eprintln!("{}", banner.yellow());
    }
}

/// Initialize the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence. Output goes to stderr so chat output on
/// stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zaman={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_transcribe_with_global_config() {
        let cli = Cli::parse_from(["zaman", "transcribe", "voice.webm", "--config", "z.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("z.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Transcribe { ref file }) if *file == PathBuf::from("voice.webm")
        ));
    }

    #[test]
    fn no_subcommand_defaults_to_chat() {
        let cli = Cli::parse_from(["zaman"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = zaman_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.client.base_url, "https://zaman-ai.onrender.com");
        assert_eq!(config.client.max_retries, 3);
    }

    #[tokio::test]
    async fn whoami_without_session_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            "[session]\ntoken_path = \"{}\"\n",
            dir.path().join("token").display()
        );
        let config = zaman_config::load_and_validate_str(&toml).unwrap();

        run(Commands::Whoami, &config).await.unwrap();
    }
}
