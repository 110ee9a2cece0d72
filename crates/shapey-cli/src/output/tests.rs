// Tests for document formatting and the output writer
//
// The writer is pointed at a shared in-memory buffer so each test can read
// back exactly what a command would have printed.

use super::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let output = OutputWriter::with_writer(format, false, quiet, 0, Box::new(buffer.clone()));
    (output, buffer)
}

#[test]
fn test_human_document_aligns_fields() {
    let document = json!({"name": "JIM", "visits": 3, "tags": ["a", "b"]});
    let formatted = OutputFormat::Human.format_document(&document).unwrap();
    assert_eq!(formatted, "name    JIM\nvisits  3\ntags    [\"a\",\"b\"]");
}

#[test]
fn test_human_document_scalars_and_arrays() {
    assert_eq!(OutputFormat::Human.format_document(&json!("plain")).unwrap(), "plain");
    assert_eq!(OutputFormat::Human.format_document(&json!(150.0)).unwrap(), "150.0");
    assert_eq!(OutputFormat::Human.format_document(&json!({})).unwrap(), "{}");
    assert_eq!(
        OutputFormat::Human.format_document(&json!([1, 2])).unwrap(),
        "[\n  1,\n  2\n]"
    );
}

#[test]
fn test_machine_formats_keep_key_order() {
    let document = json!({"zeta": 1, "alpha": 2});
    assert_eq!(
        OutputFormat::Json.format_document(&document).unwrap(),
        r#"{"zeta":1,"alpha":2}"#
    );
    assert_eq!(
        OutputFormat::Yaml.format_document(&document).unwrap(),
        "zeta: 1\nalpha: 2\n"
    );
}

#[test]
fn test_document_written_in_quiet_mode() {
    let (mut output, buffer) = writer(OutputFormat::Json, true);
    output.document(&json!({"a": 1})).unwrap();
    assert_eq!(buffer.contents(), "{\"a\":1}\n");
}

#[test]
fn test_yaml_output_has_single_trailing_newline() {
    let (mut output, buffer) = writer(OutputFormat::Yaml, false);
    output.document(&json!({"a": 1})).unwrap();
    assert_eq!(buffer.contents(), "a: 1\n");
}

#[test]
fn test_status_messages_only_in_human_mode() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.section("Result").unwrap();
    assert_eq!(buffer.contents(), "");

    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output.info("loading").unwrap();
    output.warning("careful").unwrap();
    output.section("Result").unwrap();
    assert_eq!(buffer.contents(), "INFO: loading\nWARNING: careful\n=== Result ===\n");
}

#[test]
fn test_quiet_suppresses_status_but_not_warnings() {
    let (mut output, buffer) = writer(OutputFormat::Human, true);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "WARNING: careful\n");
}

#[test]
fn test_debug_requires_verbosity() {
    let buffer = SharedBuffer::default();
    let mut quiet = OutputWriter::with_writer(OutputFormat::Human, false, false, 0, Box::new(buffer.clone()));
    quiet.debug("hidden").unwrap();
    let mut verbose = OutputWriter::with_writer(OutputFormat::Human, false, false, 1, Box::new(buffer.clone()));
    verbose.debug("shown").unwrap();
    assert_eq!(buffer.contents(), "DEBUG: shown\n");
}

#[test]
fn test_table_layout() {
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output
        .table(
            &["setting", "value"],
            vec![
                vec!["mode".to_string(), "strict".to_string()],
                vec!["debug".to_string(), "log".to_string()],
            ],
        )
        .unwrap();
    assert_eq!(
        buffer.contents(),
        "setting │ value\n────────┼───────\nmode    │ strict\ndebug   │ log\n"
    );
}
