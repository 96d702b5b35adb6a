//! Binary descriptor compilation through an external `protoc`.

use std::{path::Path, process::Command};

use log::{debug, info};

use typeforge::{TypeforgeError, proto::DescriptorRequest};

/// Runs `protoc --include_imports --descriptor_set_out=<desc> -I <dir> <proto>`.
///
/// # Errors
///
/// Returns [`TypeforgeError::Command`] when the compiler cannot be started
/// or exits unsuccessfully.
pub fn compile_descriptor(protoc: &str, request: &DescriptorRequest) -> Result<(), TypeforgeError> {
    let proto = request.input_proto_path();
    let include_dir = proto
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut command = Command::new(protoc);
    command
        .arg("--include_imports")
        .arg(format!(
            "--descriptor_set_out={}",
            request.output_desc_path().display()
        ))
        .arg("-I")
        .arg(include_dir)
        .arg(proto);
    debug!(command:? = command; "Running protobuf compiler");

    let output = command
        .output()
        .map_err(|err| TypeforgeError::Command(format!("failed to run `{protoc}`: {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TypeforgeError::Command(format!(
            "`{protoc}` exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    info!(path = request.output_desc_path().display().to_string(); "Descriptor set generated");
    Ok(())
}
