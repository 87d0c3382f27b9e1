//! Register or manage the webhook with the Telegram Bot API.
//!
//! ```text
//! set-webhook set  [config.toml]    # register webhook_url with the secret token
//! set-webhook info [config.toml]    # show the current webhook registration
//! set-webhook delete [config.toml]  # remove the webhook
//! ```
//!
//! Runs out-of-band; the ingestion server never talks to the Bot API itself.

use std::path::PathBuf;

use anyhow::{Context, Result};
use teloxide::payloads::setters::*;
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;

use telegram_ingest::config::{Config, TelegramConfig};

// ── Command line ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Set,
    Info,
    Delete,
}

impl Command {
    fn parse(arg: &str) -> Result<Self> {
        match arg {
            "set" => Ok(Self::Set),
            "info" => Ok(Self::Info),
            "delete" => Ok(Self::Delete),
            other => anyhow::bail!(
                "Unknown command: {other}\nAvailable commands: set, info, delete"
            ),
        }
    }
}

/// `[command] [config path]`, defaulting to `info` and `config.toml`.
fn parse_args(args: &[String]) -> Result<(Command, PathBuf)> {
    let command = match args.first() {
        Some(arg) => Command::parse(arg)?,
        None => Command::Info,
    };
    let config_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));
    Ok((command, config_path))
}

// ── Bot API calls ──────────────────────────────────────────────────────────────

async fn set_webhook(bot: &Bot, telegram: &TelegramConfig) -> Result<()> {
    if telegram.webhook_url.is_empty() {
        anyhow::bail!("telegram.webhook_url is not set in the config file");
    }
    let url = reqwest::Url::parse(&telegram.webhook_url)
        .with_context(|| format!("Invalid webhook_url: {}", telegram.webhook_url))?;

    println!("Setting webhook to: {url}");

    bot.set_webhook(url)
        .secret_token(telegram.webhook_secret.clone())
        .allowed_updates(vec![AllowedUpdate::ChannelPost])
        .drop_pending_updates(telegram.drop_pending_updates)
        .max_connections(telegram.max_connections)
        .await
        .context("Failed to set webhook")?;

    println!("✅ Webhook set successfully!");
    Ok(())
}

async fn webhook_info(bot: &Bot) -> Result<()> {
    println!("Getting webhook info...");

    let info = bot
        .get_webhook_info()
        .await
        .context("Failed to get webhook info")?;

    let url = info.url.as_ref().map(|u| u.as_str()).unwrap_or("(not set)");
    println!("\n📌 Webhook URL: {url}");
    println!("   Pending updates: {}", info.pending_update_count);
    println!(
        "   Last error: {}",
        info.last_error_message.as_deref().unwrap_or("(none)")
    );
    match &info.allowed_updates {
        Some(allowed) => println!("   Allowed updates: {allowed:?}"),
        None => println!("   Allowed updates: (all)"),
    }
    Ok(())
}

async fn delete_webhook(bot: &Bot, telegram: &TelegramConfig) -> Result<()> {
    println!("Deleting webhook...");

    bot.delete_webhook()
        .drop_pending_updates(telegram.drop_pending_updates)
        .await
        .context("Failed to delete webhook")?;

    println!("✅ Webhook deleted successfully!");
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, config_path) = parse_args(&args)?;

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let bot = Bot::new(&config.telegram.bot_token);

    match command {
        Command::Set => set_webhook(&bot, &config.telegram).await,
        Command::Info => webhook_info(&bot).await,
        Command::Delete => delete_webhook(&bot, &config.telegram).await,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_to_info_and_config_toml() {
        let (command, path) = parse_args(&[]).unwrap();
        assert_eq!(command, Command::Info);
        assert_eq!(path, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_command_and_path() {
        let (command, path) = parse_args(&args(&["set", "/etc/ingest.toml"])).unwrap();
        assert_eq!(command, Command::Set);
        assert_eq!(path, PathBuf::from("/etc/ingest.toml"));

        let (command, _) = parse_args(&args(&["delete"])).unwrap();
        assert_eq!(command, Command::Delete);
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_args(&args(&["register"])).unwrap_err();
        assert!(err.to_string().contains("Unknown command: register"));
    }
}
