//! Combine command handler

use super::utils::load_document;
use crate::cli::CombineArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use shapey_core::combine;
use shapey_core::value::type_name;
use tracing::instrument;

/// Handle the combine command
#[instrument(skip(output), fields(left = %args.left.display(), right = %args.right.display()))]
pub fn handle_combine(args: CombineArgs, output: &mut OutputWriter) -> Result<()> {
    let left = load_document(&args.left)?;
    let right = load_document(&args.right)?;

    if type_name(&left) != type_name(&right) {
        output.warning(&format!(
            "Cannot combine {} with {}; keeping the left document",
            type_name(&left),
            type_name(&right)
        ))?;
    }

    output.document(&combine(&left, &right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use serde_json::{json, Value};
    use std::fs;
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    fn combine_files(left: &Value, right: &Value, format: OutputFormat) -> String {
        let dir = TempDir::new().unwrap();
        let args = CombineArgs {
            left: write_json(dir.path(), "left.json", left),
            right: write_json(dir.path(), "right.json", right),
        };
        let captured = Captured::default();
        let mut output = OutputWriter::with_writer(format, false, false, 0, Box::new(captured.clone()));
        handle_combine(args, &mut output).unwrap();
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_combine_documents() {
        assert_eq!(combine_files(&json!([1, 2]), &json!([3]), OutputFormat::Json), "[1,2,3]\n");
        assert_eq!(
            combine_files(&json!({"lorem": "ipsum"}), &json!({"dolor": "sit"}), OutputFormat::Json),
            "{\"lorem\":\"ipsum\",\"dolor\":\"sit\"}\n"
        );
        assert_eq!(combine_files(&json!(40), &json!(2), OutputFormat::Json), "42\n");
    }

    #[test]
    fn test_mismatch_warns_in_human_mode() {
        let printed = combine_files(&json!("two"), &json!(2), OutputFormat::Human);
        assert_eq!(
            printed,
            "WARNING: Cannot combine string with number; keeping the left document\ntwo\n"
        );
    }
}
