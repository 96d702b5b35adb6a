//! Configuration types for Typeforge code generation.
//!
//! This module provides configuration structures that control which
//! generators run and how their output is shaped. All types implement
//! [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining generation, C++ and Protobuf settings.
//! - [`GenerationOptions`] - Flags gating the pipeline stages.
//! - [`CppConfig`] - C++ project settings used by the build descriptor and test stubs.
//! - [`ProtoConfig`] - Protobuf file naming and package settings.
//!
//! # Example
//!
//! ```
//! # use typeforge::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.generation().generate_cpp());
//! assert!(!config.generation().generate_protobuf());
//! assert_eq!(config.cpp().standard(), 17);
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Pipeline stage flags.
    #[serde(default)]
    generation: GenerationOptions,

    /// C++ generator section.
    #[serde(default)]
    cpp: CppConfig,

    /// Protobuf generator section.
    #[serde(default)]
    proto: ProtoConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `generation` - Flags gating the pipeline stages.
    /// * `cpp` - C++ project settings.
    /// * `proto` - Protobuf file settings.
    pub fn new(generation: GenerationOptions, cpp: CppConfig, proto: ProtoConfig) -> Self {
        Self {
            generation,
            cpp,
            proto,
        }
    }

    /// Returns the generation options.
    pub fn generation(&self) -> &GenerationOptions {
        &self.generation
    }

    /// Returns the C++ configuration.
    pub fn cpp(&self) -> &CppConfig {
        &self.cpp
    }

    /// Returns the Protobuf configuration.
    pub fn proto(&self) -> &ProtoConfig {
        &self.proto
    }

    /// Replaces the generation options.
    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }
}

/// Flags gating which pipeline stages run.
///
/// Each flag only selects stages; none of them changes how a stage works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationOptions {
    generate_cpp: bool,
    generate_protobuf: bool,
    generate_binary_descriptor: bool,
    force_overwrite: bool,
    skip_validation: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            generate_cpp: true,
            generate_protobuf: false,
            generate_binary_descriptor: false,
            force_overwrite: false,
            skip_validation: false,
        }
    }
}

impl GenerationOptions {
    /// Returns `true` if the C++ generator runs.
    pub fn generate_cpp(&self) -> bool {
        self.generate_cpp
    }

    /// Returns `true` if the Protobuf generator runs.
    pub fn generate_protobuf(&self) -> bool {
        self.generate_protobuf
    }

    /// Returns `true` if a descriptor set should be compiled from the `.proto` file.
    ///
    /// Only meaningful together with [`generate_protobuf`](Self::generate_protobuf).
    pub fn generate_binary_descriptor(&self) -> bool {
        self.generate_binary_descriptor
    }

    /// Returns `true` if existing files are overwritten.
    pub fn force_overwrite(&self) -> bool {
        self.force_overwrite
    }

    /// Returns `true` if error diagnostics do not block generation.
    pub fn skip_validation(&self) -> bool {
        self.skip_validation
    }

    pub fn with_generate_cpp(mut self, enabled: bool) -> Self {
        self.generate_cpp = enabled;
        self
    }

    pub fn with_generate_protobuf(mut self, enabled: bool) -> Self {
        self.generate_protobuf = enabled;
        self
    }

    pub fn with_generate_binary_descriptor(mut self, enabled: bool) -> Self {
        self.generate_binary_descriptor = enabled;
        self
    }

    pub fn with_force_overwrite(mut self, enabled: bool) -> Self {
        self.force_overwrite = enabled;
        self
    }

    pub fn with_skip_validation(mut self, enabled: bool) -> Self {
        self.skip_validation = enabled;
        self
    }
}

/// C++ project settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CppConfig {
    /// CMake project name; the model name is used when unset.
    project_name: Option<String>,

    /// C++ language standard (`CMAKE_CXX_STANDARD`).
    standard: u32,

    /// Emit `test/<Type>Test.cpp` stubs and their CMake targets.
    generate_tests: bool,
}

impl Default for CppConfig {
    fn default() -> Self {
        Self {
            project_name: None,
            standard: 17,
            generate_tests: true,
        }
    }
}

impl CppConfig {
    /// Returns the configured project name, if any.
    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    /// Returns the C++ language standard.
    pub fn standard(&self) -> u32 {
        self.standard
    }

    /// Returns `true` if test stubs are generated.
    pub fn generate_tests(&self) -> bool {
        self.generate_tests
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn with_generate_tests(mut self, enabled: bool) -> Self {
        self.generate_tests = enabled;
        self
    }
}

/// Protobuf file settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtoConfig {
    /// Stem of the generated `.proto` file; the model name is used when unset.
    file_stem: Option<String>,

    /// File-level `package` used when the model does not have exactly one package.
    default_package: Option<String>,
}

impl ProtoConfig {
    /// Returns the configured file stem, if any.
    pub fn file_stem(&self) -> Option<&str> {
        self.file_stem.as_deref()
    }

    /// Returns the configured default package, if any.
    pub fn default_package(&self) -> Option<&str> {
        self.default_package.as_deref()
    }

    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = Some(stem.into());
        self
    }

    pub fn with_default_package(mut self, package: impl Into<String>) -> Self {
        self.default_package = Some(package.into());
        self
    }
}
