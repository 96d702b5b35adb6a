//! CLI logic for the Typeforge model compiler.
//!
//! Loads a model and configuration, runs the library pipeline, writes the
//! generated files with the overwrite-or-skip policy and, when asked,
//! compiles a binary descriptor set with an external `protoc`.

pub mod error_adapter;

mod args;
mod config;
mod model;
mod protoc;
mod report;

pub use args::Args;
pub use config::ConfigError;
pub use model::ModelError;
pub use report::RunReport;

use std::path::{Path, PathBuf};

use log::{debug, info};

use typeforge::{
    Compiler, TypeforgeError,
    output::{DirectorySink, GeneratedFiles, OutputSink, WriteOutcome},
    stats::ModelStatistics,
};

/// Run the Typeforge CLI application
///
/// This function compiles the input model and writes the generated C++ and
/// Protobuf files below the output directories.
///
/// # Errors
///
/// Returns `TypeforgeError` for:
/// - File I/O errors
/// - Configuration or model loading errors
/// - Analysis errors (every diagnostic is carried)
/// - Generation defects
/// - A failed `protoc` invocation
pub fn run(args: &Args) -> Result<RunReport, TypeforgeError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing model"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let options = args.apply(*app_config.generation());
    let app_config = app_config.with_generation(options);
    debug!(options:? = options; "Generation options");

    let mut model = model::load_model(&args.input)?;

    let compiler = Compiler::new(app_config);
    let diagnostics = compiler.analyze(&mut model)?;
    report::log_diagnostics(&diagnostics);

    let output = compiler.generate(&model)?;

    let mut files = Vec::new();
    let cpp_dir = match output.cpp() {
        Some(generated) => {
            let dir = PathBuf::from(&args.output);
            files.extend(write_files(&dir, generated, options.force_overwrite())?);
            info!(path = dir.display().to_string(); "C++ code generated");
            Some(dir)
        }
        None => None,
    };

    let proto_dir = match output.proto() {
        Some(generated) => {
            let dir = args.proto_output_dir();
            files.extend(write_files(&dir, generated, options.force_overwrite())?);
            info!(path = dir.display().to_string(); "Protobuf schema generated");
            Some(dir)
        }
        None => None,
    };

    if let (Some(request), Some(dir)) = (output.descriptor(), &proto_dir) {
        let request = request.within(dir);
        protoc::compile_descriptor(&args.protoc, &request)?;
        files.push((request.output_desc_path().to_path_buf(), WriteOutcome::Written));
    }

    Ok(RunReport {
        diagnostics,
        statistics: ModelStatistics::collect(&model),
        cpp_dir,
        proto_dir,
        files,
    })
}

fn write_files(
    dir: &Path,
    generated: &GeneratedFiles,
    force_overwrite: bool,
) -> Result<Vec<(PathBuf, WriteOutcome)>, TypeforgeError> {
    let mut sink = DirectorySink::new(dir, force_overwrite);
    let outcomes = sink.write_all(generated)?;
    Ok(outcomes
        .into_iter()
        .map(|(path, outcome)| (dir.join(path), outcome))
        .collect())
}
