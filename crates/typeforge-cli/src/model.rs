//! Model loading for the CLI
//!
//! The model arrives already parsed, serialized as a TOML document that
//! deserializes straight into [`Model`].

use std::{fs, io, path::Path};

use log::{debug, info};
use thiserror::Error;

use typeforge::{TypeforgeError, model::Model};

/// Model-input errors for CLI
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to parse model {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Model {0} declares no primitive types, types or packages")]
    Empty(String),
}

impl From<ModelError> for TypeforgeError {
    fn from(err: ModelError) -> Self {
        TypeforgeError::Io(io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

/// Read and deserialize a model file
///
/// # Errors
///
/// Returns error if:
/// - File cannot be read
/// - TOML parsing fails
/// - The model declares nothing
pub fn load_model(path: impl AsRef<Path>) -> Result<Model, TypeforgeError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading model");

    let content = fs::read_to_string(path)?;
    let model: Model = toml::from_str(&content).map_err(|e| ModelError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    if model.primitive_definitions.is_empty() && model.types.is_empty() && model.packages.is_empty()
    {
        return Err(ModelError::Empty(path.display().to_string()).into());
    }

    debug!(
        name = model.name_or("(unnamed)"),
        types = model.types.len(),
        packages = model.packages.len();
        "Model loaded",
    );
    Ok(model)
}
