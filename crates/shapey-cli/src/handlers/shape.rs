//! Shape command handler

use super::utils::{emit_document, load_document, read_input};
use crate::cli::ShapeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use shapey_core::{ErrorPolicy, Shaper, Spec, SpecLoader};
use tracing::{debug, info, instrument};

/// Handle the shape command
#[instrument(skip(config, output), fields(spec = %args.spec.display()))]
pub fn handle_shape(args: ShapeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("shape_command", &format!("spec: {}", args.spec.display()));

    let document = load_document(&args.spec)?;
    let mut spec = SpecLoader::default().load(&document)?;
    config.defaults.apply(&mut spec, &document)?;
    apply_overrides(&args, &mut spec);

    info!(
        mode = %spec.mode(),
        transforms = %spec.transforms_mode(),
        fields = spec.len(),
        "Loaded spec"
    );
    output.info(&format!("Loaded spec with {} field(s)", spec.len()))?;
    output.debug(&format!(
        "Shaping with mode '{}' and transforms '{}'",
        spec.mode(),
        spec.transforms_mode()
    ))?;

    let input = read_input(args.input.as_deref())?;
    let shaped = Shaper::new(spec).apply(&input);
    debug!(elapsed_ms = timer.elapsed().as_millis() as u64, "Shaped input");

    emit_document(output, &shaped, args.save_to.as_deref(), "Shaped document")
}

/// Command-line flags win over the spec document and the config file
fn apply_overrides(args: &ShapeArgs, spec: &mut Spec) {
    if let Some(mode) = args.mode {
        spec.set_mode(mode.into());
    }
    if let Some(transforms) = args.transforms {
        spec.set_transforms_mode(transforms.into());
    }
    if args.debug {
        spec.set_error_policy(ErrorPolicy::log());
    } else if args.skip_errors {
        spec.set_error_policy(ErrorPolicy::Skip);
    }
}
