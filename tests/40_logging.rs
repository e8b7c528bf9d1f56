// Warnings emitted by the normalization layer, captured from a scoped subscriber
use std::io;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use campus_cms_api::normalize::{localized_from_text, parse_json_value};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a WARN-level subscriber and return everything it logged.
fn capture<F: FnOnce()>(f: F) -> String {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_max_level(Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = sink.0.lock().expect("lock output").clone();
    String::from_utf8(bytes).expect("utf8 log output")
}

#[test]
fn decode_failure_logs_a_warning() {
    let mut decoded = json!(null);
    let logs = capture(|| {
        decoded = parse_json_value(Some(&json!("{not valid")), json!([]));
    });

    assert_eq!(decoded, json!([]));
    let line = logs
        .lines()
        .find(|l| l.contains("failed to decode JSON column"))
        .expect("decode warning");
    assert!(line.contains("WARN"));
    assert!(line.contains("campus_cms_api::normalize::coerce"));
    assert!(line.contains("input={not valid"));
}

#[test]
fn malformed_locale_mapping_logs_a_warning() {
    let logs = capture(|| {
        assert_eq!(localized_from_text(Some("{\"en\":")), json!("{\"en\":"));
    });
    assert!(logs.contains("WARN"));
    assert!(logs.contains("not a valid locale mapping"));
}

#[test]
fn clean_values_log_nothing() {
    let logs = capture(|| {
        assert_eq!(parse_json_value(Some(&json!("[1,2]")), json!([])), json!([1, 2]));
        assert_eq!(parse_json_value(None, json!([])), json!([]));
        assert_eq!(localized_from_text(Some("Plain text")), json!("Plain text"));
    });
    assert!(logs.trim().is_empty(), "unexpected logs: {logs}");
}
