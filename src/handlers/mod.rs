pub mod http;
pub mod noop;
pub mod stdout;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::config::{HandlerConfig, HandlerKind};
use crate::error::HandlerError;
use crate::platform::CanonicalMessage;

pub use http::HttpHandler;
pub use noop::NoopHandler;
pub use stdout::StdoutHandler;

/// A delivery target for canonical messages.
///
/// Handlers are shared across concurrent requests and must not block
/// indefinitely; the endpoint wraps every call in a timeout.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn deliver(&self, message: &CanonicalMessage) -> Result<(), HandlerError>;
}

/// Resolve the configured handler once at startup.
pub fn build(config: &HandlerConfig) -> Result<Arc<dyn Handler>> {
    let handler: Arc<dyn Handler> = match config.kind {
        HandlerKind::Stdout => Arc::new(StdoutHandler::new()),
        HandlerKind::Noop => Arc::new(NoopHandler),
        HandlerKind::Http => {
            let http = config
                .http
                .as_ref()
                .context("handler type \"http\" requires a [handler.http] section with a url")?;
            Arc::new(HttpHandler::new(&http.url, config.timeout())?)
        }
    };

    info!("Output handler: {}", handler.name());
    Ok(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpHandlerConfig;

    fn handler_config(kind: HandlerKind, http: Option<HttpHandlerConfig>) -> HandlerConfig {
        HandlerConfig {
            kind,
            timeout_secs: 5,
            http,
        }
    }

    #[test]
    fn test_build_resolves_each_kind() {
        let stdout = build(&handler_config(HandlerKind::Stdout, None)).unwrap();
        assert_eq!(stdout.name(), "stdout");

        let noop = build(&handler_config(HandlerKind::Noop, None)).unwrap();
        assert_eq!(noop.name(), "noop");

        let http = build(&handler_config(
            HandlerKind::Http,
            Some(HttpHandlerConfig {
                url: "http://127.0.0.1:9/ingest".to_string(),
            }),
        ))
        .unwrap();
        assert_eq!(http.name(), "http");
    }

    #[test]
    fn test_http_without_url_fails_at_startup() {
        assert!(build(&handler_config(HandlerKind::Http, None)).is_err());
    }

    #[test]
    fn test_http_with_invalid_url_fails_at_startup() {
        let result = build(&handler_config(
            HandlerKind::Http,
            Some(HttpHandlerConfig {
                url: "not a url".to_string(),
            }),
        ));
        assert!(result.is_err());
    }
}
