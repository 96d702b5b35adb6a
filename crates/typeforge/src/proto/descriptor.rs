use std::path::{Path, PathBuf};

/// Input and output of an external descriptor-set compilation.
///
/// The library never compiles descriptors itself. It hands this request to
/// the caller, which runs a protobuf compiler and reports its failure as a
/// command error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRequest {
    input_proto_path: PathBuf,
    output_desc_path: PathBuf,
}

impl DescriptorRequest {
    /// Creates a request compiling `proto` into a sibling `.desc` file.
    pub fn for_proto(proto: impl Into<PathBuf>) -> Self {
        let input_proto_path = proto.into();
        let output_desc_path = input_proto_path.with_extension("desc");
        Self {
            input_proto_path,
            output_desc_path,
        }
    }

    pub fn input_proto_path(&self) -> &Path {
        &self.input_proto_path
    }

    pub fn output_desc_path(&self) -> &Path {
        &self.output_desc_path
    }

    /// Places both paths under `dir`.
    pub fn within(&self, dir: &Path) -> Self {
        Self {
            input_proto_path: dir.join(&self.input_proto_path),
            output_desc_path: dir.join(&self.output_desc_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_path_replaces_extension() {
        let request = DescriptorRequest::for_proto("people.proto");
        assert_eq!(request.input_proto_path(), Path::new("people.proto"));
        assert_eq!(request.output_desc_path(), Path::new("people.desc"));

        let placed = request.within(Path::new("out/proto"));
        assert_eq!(placed.input_proto_path(), Path::new("out/proto/people.proto"));
        assert_eq!(placed.output_desc_path(), Path::new("out/proto/people.desc"));
    }
}
