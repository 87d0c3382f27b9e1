//! Telegram channel ingestion service.
//!
//! Receives channel updates through Telegram's webhook, checks the shared
//! secret, normalizes each update into a [`platform::CanonicalMessage`] and
//! hands it to the configured output handler.

pub mod config;
pub mod error;
pub mod handlers;
pub mod platform;
pub mod secret;
pub mod webhook;
