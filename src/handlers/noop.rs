use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handlers::Handler;
use crate::platform::CanonicalMessage;

/// Accepts every message and does nothing with it.
pub struct NoopHandler;

#[async_trait]
impl Handler for NoopHandler {
    fn name(&self) -> &str {
        "noop"
    }

    async fn deliver(&self, _message: &CanonicalMessage) -> Result<(), HandlerError> {
        Ok(())
    }
}
