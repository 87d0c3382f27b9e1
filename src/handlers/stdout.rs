use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handlers::Handler;
use crate::platform::CanonicalMessage;

/// Longest text preview written per line, in characters.
const PREVIEW_CHARS: usize = 100;

/// Writes one human-readable line per message to stdout (or any writer).
pub struct StdoutHandler {
    /// Held for the whole line so concurrent deliveries never interleave.
    out: Mutex<Box<dyn Write + Send>>,
}

impl StdoutHandler {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for StdoutHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a message as a single line, without the trailing newline.
pub fn format_line(message: &CanonicalMessage) -> String {
    let time = chrono::DateTime::from_timestamp(message.timestamp, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| message.timestamp.to_string());

    let text = match message.text.as_deref() {
        Some(t) if !t.is_empty() => t
            .chars()
            .take(PREVIEW_CHARS)
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect(),
        _ => "(no text)".to_string(),
    };

    format!(
        "📨 New message | kind={} | chat={} | id={} | time={} | text={}",
        message.kind,
        message.chat_label(),
        message.source_id,
        time,
        text
    )
}

#[async_trait]
impl Handler for StdoutHandler {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn deliver(&self, message: &CanonicalMessage) -> Result<(), HandlerError> {
        let mut line = format_line(message);
        line.push('\n');

        let mut out = self
            .out
            .lock()
            .map_err(|_| HandlerError::Other("stdout writer lock poisoned".to_string()))?;
        out.write_all(line.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// In-memory writer whose contents can be read back after being moved into a
/// handler or a log subscriber.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CapturedOutput(std::sync::Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedOutput {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

#[cfg(test)]
impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
