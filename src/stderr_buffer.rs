//! Log output that can be held back while the TUI owns the terminal.

use std::io;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Activate buffering. While active, log lines are stored
/// instead of printed to stderr.
pub fn activate() {
    if let Ok(mut guard) = BUFFER.lock() {
        *guard = Some(Vec::new());
    }
}

/// Deactivate buffering and return all collected lines.
pub fn drain() -> Vec<String> {
    BUFFER
        .lock()
        .ok()
        .and_then(|mut guard| guard.take())
        .unwrap_or_default()
}

/// Write a message. If buffering is active the message is stored;
/// otherwise it is printed to stderr immediately.
pub fn write_message(msg: String) {
    let mut guard = match BUFFER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprint!("{}", msg);
    }
}

/// `MakeWriter` for the tracing subscriber that routes through the buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedStderr;

/// Collects one formatted log event and hands it over on drop.
pub struct EventWriter {
    bytes: Vec<u8>,
}

impl io::Write for EventWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        if !self.bytes.is_empty() {
            let msg = String::from_utf8_lossy(&self.bytes).into_owned();
            write_message(msg);
        }
    }
}

impl<'a> MakeWriter<'a> for BufferedStderr {
    type Writer = EventWriter;

    fn make_writer(&'a self) -> Self::Writer {
        EventWriter { bytes: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Single test: the buffer is process-wide state.
    #[test]
    fn test_buffering_lifecycle() {
        activate();

        write_message("first\n".to_string());
        {
            let mut writer = BufferedStderr.make_writer();
            writer.write_all(b"second ").unwrap();
            writer.write_all(b"line\n").unwrap();
        }

        let lines = drain();
        assert_eq!(lines, vec!["first\n".to_string(), "second line\n".to_string()]);
        // Draining switches buffering off
        assert!(drain().is_empty());
    }
}
