//! Typeforge - compiles a domain model into a C++ class library and a
//! Protocol Buffers schema.
//!
//! The pipeline has three stages. Scope resolution and validation run over a
//! parsed [`Model`](model::Model) and collect diagnostics. The C++ and
//! Protobuf generators then read the resolved model and return generated
//! text keyed by logical path. Writing that text is left to an
//! [`OutputSink`](output::OutputSink).

pub mod config;
pub mod cpp;
pub mod output;
pub mod proto;
pub mod stats;
pub mod text;
pub mod type_map;

mod error;

pub use typeforge_core::{identifier, model};
pub use typeforge_sema::error::{Diagnostic, Diagnostics, ErrorCode, Location, Severity};

pub use error::{GenerationError, TypeforgeError};

use std::{panic, thread};

use log::{debug, info, warn};

use config::AppConfig;
use cpp::CppGenerator;
use model::Model;
use output::GeneratedFiles;
use proto::{DescriptorRequest, ProtoGenerator};

/// Runs analysis and generation with one configuration.
///
/// # Examples
///
/// ```
/// use typeforge::{
///     Compiler,
///     config::AppConfig,
///     model::{BasicTypeId, Field, Model, PrimitiveTypeDef, StructType},
/// };
///
/// let mut model = Model::new()
///     .with_primitives(PrimitiveTypeDef::new("Builtins").with(BasicTypeId::string("string")))
///     .with_type(StructType::new("Person").with_field(Field::new("name", "string")));
///
/// let compiler = Compiler::new(AppConfig::default());
/// let compilation = compiler.compile(&mut model).expect("model compiles");
///
/// let cpp = compilation.output.cpp().expect("C++ is enabled by default");
/// assert!(cpp.get("include/Person.h").is_some());
/// ```
#[derive(Debug, Default)]
pub struct Compiler {
    config: AppConfig,
}

impl Compiler {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolves every type reference of `model` and validates it.
    ///
    /// Returns the warnings and notes on success. With `skip_validation`
    /// set, only resolution runs and its diagnostics are returned even when
    /// they contain errors.
    ///
    /// # Errors
    ///
    /// Returns [`TypeforgeError::Analysis`] carrying every diagnostic when
    /// any of them is an error.
    pub fn analyze(&self, model: &mut Model) -> Result<Diagnostics, TypeforgeError> {
        if self.config.generation().skip_validation() {
            info!("Resolving type references, validation skipped");
            let diagnostics = typeforge_sema::resolve(model);
            if diagnostics.has_errors() {
                warn!(
                    errors = diagnostics.error_count();
                    "Continuing with unresolved references",
                );
            }
            return Ok(diagnostics);
        }

        let diagnostics = typeforge_sema::analyze(model)?;
        debug!(
            warnings = diagnostics.warning_count(),
            total = diagnostics.len();
            "Model analysis passed",
        );
        Ok(diagnostics)
    }

    /// Runs the enabled generators over an analyzed model.
    ///
    /// The generators share nothing but the model; when both are enabled
    /// they run on separate threads.
    ///
    /// # Errors
    ///
    /// Returns [`TypeforgeError::Generation`] if the model still contains an
    /// unresolved reference.
    pub fn generate(&self, model: &Model) -> Result<GeneratedOutput, TypeforgeError> {
        let options = self.config.generation();
        let cpp_generator = CppGenerator::new(model, self.config.cpp());
        let proto_generator = ProtoGenerator::new(model, self.config.proto());

        let run_cpp = || {
            options
                .generate_cpp()
                .then(|| cpp_generator.generate())
                .transpose()
        };
        let run_proto = || {
            options
                .generate_protobuf()
                .then(|| proto_generator.generate())
                .transpose()
        };

        let (cpp, proto) = if options.generate_cpp() && options.generate_protobuf() {
            debug!("Running both generators in parallel");
            thread::scope(|scope| {
                let cpp = scope.spawn(run_cpp);
                let proto = run_proto();
                let cpp = cpp
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload));
                (cpp, proto)
            })
        } else {
            (run_cpp(), run_proto())
        };
        let (cpp, proto) = (cpp?, proto?);

        let descriptor = (options.generate_protobuf() && options.generate_binary_descriptor())
            .then(|| DescriptorRequest::for_proto(proto_generator.file_name()));

        info!(
            cpp_files = cpp.as_ref().map_or(0, GeneratedFiles::len),
            proto_files = proto.as_ref().map_or(0, GeneratedFiles::len),
            descriptor = descriptor.is_some();
            "Generation finished",
        );
        Ok(GeneratedOutput {
            cpp,
            proto,
            descriptor,
        })
    }

    /// Analyzes then generates.
    ///
    /// # Errors
    ///
    /// See [`analyze`](Self::analyze) and [`generate`](Self::generate).
    pub fn compile(&self, model: &mut Model) -> Result<Compilation, TypeforgeError> {
        let diagnostics = self.analyze(model)?;
        let output = self.generate(model)?;
        Ok(Compilation {
            diagnostics,
            output,
        })
    }
}

/// Files produced by one [`Compiler::generate`] run.
#[derive(Debug, Clone, Default)]
pub struct GeneratedOutput {
    cpp: Option<GeneratedFiles>,
    proto: Option<GeneratedFiles>,
    descriptor: Option<DescriptorRequest>,
}

impl GeneratedOutput {
    /// C++ files, when C++ generation was enabled.
    pub fn cpp(&self) -> Option<&GeneratedFiles> {
        self.cpp.as_ref()
    }

    /// The `.proto` file, when Protobuf generation was enabled.
    pub fn proto(&self) -> Option<&GeneratedFiles> {
        self.proto.as_ref()
    }

    /// The descriptor compilation to run, relative to the proto output
    /// directory.
    pub fn descriptor(&self) -> Option<&DescriptorRequest> {
        self.descriptor.as_ref()
    }
}

/// Result of [`Compiler::compile`].
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Warnings and notes of a successful analysis.
    pub diagnostics: Diagnostics,
    pub output: GeneratedOutput,
}
