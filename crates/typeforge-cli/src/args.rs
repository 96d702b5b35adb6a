//! Command-line argument definitions for the Typeforge CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input model, the output directories,
//! which generators run, and logging verbosity. Generation flags override
//! the configuration file when set.

use std::path::PathBuf;

use clap::Parser;

use typeforge::config::GenerationOptions;

/// Command-line arguments for the Typeforge model compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input model (TOML)
    #[arg(help = "Path to the input model")]
    pub input: String,

    /// Output directory for generated C++ code
    #[arg(short, long, default_value = "generated")]
    pub output: String,

    /// Generate a Protobuf schema
    #[arg(short = 'm', long)]
    pub protobuf: bool,

    /// Output directory for Protobuf files [default: <OUTPUT>/proto]
    #[arg(short = 'p', long)]
    pub proto_output: Option<String>,

    /// Compile the schema into a binary descriptor set (requires protoc)
    #[arg(short, long)]
    pub binary: bool,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,

    /// Skip model validation
    #[arg(short, long)]
    pub skip_validation: bool,

    /// Skip C++ generation
    #[arg(short, long)]
    pub no_cpp: bool,

    /// Print a generation summary
    #[arg(short = 'd', long)]
    pub summary: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Protobuf compiler used for binary descriptors
    #[arg(long, default_value = "protoc")]
    pub protoc: String,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Creates arguments for `input` with every other option at its default.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: "generated".to_string(),
            protobuf: false,
            proto_output: None,
            binary: false,
            force: false,
            skip_validation: false,
            no_cpp: false,
            summary: false,
            config: None,
            protoc: "protoc".to_string(),
            log_level: "info".to_string(),
        }
    }

    /// Directory receiving the `.proto` and `.desc` files.
    pub fn proto_output_dir(&self) -> PathBuf {
        match &self.proto_output {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(&self.output).join("proto"),
        }
    }

    /// Applies the flags that were given on top of configured options.
    pub fn apply(&self, mut options: GenerationOptions) -> GenerationOptions {
        if self.protobuf {
            options = options.with_generate_protobuf(true);
        }
        if self.binary {
            options = options
                .with_generate_protobuf(true)
                .with_generate_binary_descriptor(true);
        }
        if self.force {
            options = options.with_force_overwrite(true);
        }
        if self.skip_validation {
            options = options.with_skip_validation(true);
        }
        if self.no_cpp {
            options = options.with_generate_cpp(false);
        }
        options
    }
}
