//! Pipeline command handler

use super::utils::{emit_document, load_document, read_input};
use crate::cli::PipelineArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use shapey_core::{Shape, Shapeline, SpecLoader};
use tracing::{info, instrument};

/// Handle the pipeline command
#[instrument(skip(config, output), fields(stages = %args.stages.display()))]
pub fn handle_pipeline(args: PipelineArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("pipeline_command", &format!("stages: {}", args.stages.display()));

    let document = load_document(&args.stages)?;
    let mut stages = SpecLoader::default().load_pipeline(&document)?;

    // Spec stages get the configured defaults, judged against their own document
    if let Some(raw_stages) = document.as_array() {
        for (stage, raw) in stages.iter_mut().zip(raw_stages) {
            if let Shape::Spec(spec) = stage {
                config.defaults.apply(spec, raw)?;
            }
        }
    }

    let pipeline = Shapeline::from_shapes(stages);
    info!(stages = pipeline.len(), "Loaded pipeline");
    output.debug(&format!("Running {} stage(s)", pipeline.len()))?;

    let input = read_input(args.input.as_deref())?;
    let result = pipeline.run(&input);

    emit_document(output, &result, args.save_to.as_deref(), "Pipeline result")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::config::ConfigBuilder;
    use crate::error::Error;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn sink() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, false, 1, Box::new(std::io::sink()))
    }

    fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    fn run(dir: &Path, stages: &Value, input: &Value, config: &Config) -> Result<Value> {
        let out = dir.join("out.json");
        let args = PipelineArgs {
            stages: write_json(dir, "stages.json", stages),
            input: Some(write_json(dir, "input.json", input)),
            save_to: Some(out.clone()),
        };
        handle_pipeline(args, config, &mut sink())?;
        load_document(&out)
    }

    #[test]
    fn test_stats_pipeline() {
        let dir = TempDir::new().unwrap();
        let stages = json!([
            {"sum": {"$transform": "sum"}, "count": {"$transform": "length"}},
            {"shapeyMode": "strict", "total": {"$transform": "get", "args": ["sum"]}, "type": "STATS"}
        ]);
        let result = run(dir.path(), &stages, &json!([3, 4, 9, -3, 82]), &Config::default()).unwrap();
        assert_eq!(result, json!({"total": 95, "type": "STATS"}));
    }

    #[test]
    fn test_constant_and_transform_stages() {
        let dir = TempDir::new().unwrap();
        let stages = json!([{"$transform": "keys"}, {"$transform": "join", "args": [","]}]);
        let result = run(dir.path(), &stages, &json!({"a": 1, "b": 2}), &Config::default()).unwrap();
        assert_eq!(result, json!("a,b"));

        let result = run(dir.path(), &json!([{"a": 1}, "done"]), &json!({}), &Config::default()).unwrap();
        assert_eq!(result, json!("done"));
    }

    #[test]
    fn test_defaults_apply_per_stage() {
        let dir = TempDir::new().unwrap();
        let config = ConfigBuilder::new().default_mode(shapey_core::Mode::Strict).build();
        let stages = json!([
            {"name": {"$transform": "upper"}},
            {"shapeyMode": "loose", "seen": true}
        ]);
        let result = run(dir.path(), &stages, &json!({"name": "jim", "junk": 1}), &config).unwrap();
        assert_eq!(result, json!({"name": "JIM", "seen": true}));
    }

    #[test]
    fn test_stages_must_be_an_array() {
        let dir = TempDir::new().unwrap();
        let err = run(dir.path(), &json!({"not": "stages"}), &json!({}), &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Core(shapey_core::Error::InvalidSpec { .. })));
    }
}
