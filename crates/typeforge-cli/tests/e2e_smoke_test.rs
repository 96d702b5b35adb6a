use std::{fs, path::PathBuf};

use tempfile::tempdir;

use typeforge::{ErrorCode, TypeforgeError};
use typeforge_cli::{Args, run};

/// Demo models live at the workspace root.
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all .toml files from a directory
fn collect_models(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn quiet_args(input: &PathBuf, output: &PathBuf) -> Args {
    let mut args = Args::new(input.to_string_lossy());
    args.output = output.to_string_lossy().to_string();
    args.log_level = "off".to_string();
    args
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_models = collect_models(demos_dir());
    assert!(!valid_models.is_empty(), "No valid models found in demos/");

    let mut failed_models = Vec::new();

    for model_path in &valid_models {
        let output = temp_dir
            .path()
            .join(model_path.file_stem().unwrap().to_string_lossy().as_ref());
        let mut args = quiet_args(model_path, &output);
        args.protobuf = true;

        if let Err(e) = run(&args) {
            failed_models.push((model_path.clone(), e));
        }
    }

    if !failed_models.is_empty() {
        eprintln!("\nValid models that failed:");
        for (path, err) in &failed_models {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid model(s) failed unexpectedly", failed_models.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_models = collect_models(demos_dir().join("errors"));
    assert!(!error_models.is_empty(), "No error models found in demos/errors/");

    let mut unexpectedly_passed = Vec::new();

    for model_path in &error_models {
        let output = temp_dir.path().join("out");
        let args = quiet_args(model_path, &output);

        match run(&args) {
            Err(TypeforgeError::Analysis { diagnostics }) => {
                assert!(diagnostics.has_errors(), "{}", model_path.display());
            }
            Err(other) => panic!("{}: unexpected error {other}", model_path.display()),
            Ok(_) => unexpectedly_passed.push(model_path.clone()),
        }
    }

    assert!(
        unexpectedly_passed.is_empty(),
        "error models passed: {unexpectedly_passed:?}"
    );
    assert!(
        !temp_dir.path().join("out").exists(),
        "nothing is written when analysis fails"
    );
}

#[test]
fn e2e_people_writes_cpp_and_proto() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("generated");
    let mut args = quiet_args(&demos_dir().join("people.toml"), &output);
    args.protobuf = true;

    let report = run(&args).expect("people model compiles");

    let header = fs::read_to_string(output.join("include/Person.h")).expect("header written");
    assert!(header.contains("class Person {"));
    for path in ["src/Person.cpp", "test/PersonTest.cpp", "CMakeLists.txt", "src/main.cpp"] {
        assert!(output.join(path).is_file(), "missing {path}");
    }

    let proto = fs::read_to_string(output.join("proto/people.proto")).expect("schema written");
    assert!(proto.contains("syntax = \"proto3\";"));
    assert!(proto.contains("message Person {\n  string name = 1;\n  int32 age = 2;\n}"));

    assert_eq!(report.cpp_dir.as_deref(), Some(output.as_path()));
    assert_eq!(report.proto_dir, Some(output.join("proto")));
    assert_eq!(report.skipped().count(), 0);
    assert!(report.to_string().contains("Model: people"));
}

#[test]
fn e2e_existing_files_are_skipped_unless_forced() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("generated");
    let mut args = quiet_args(&demos_dir().join("people.toml"), &output);

    let first = run(&args).expect("first run");
    assert_eq!(first.skipped().count(), 0);

    let header_path = output.join("include/Person.h");
    fs::write(&header_path, "// edited by hand\n").expect("edit header");

    let second = run(&args).expect("second run");
    assert_eq!(second.skipped().count(), second.files.len());
    assert_eq!(
        fs::read_to_string(&header_path).unwrap(),
        "// edited by hand\n"
    );

    args.force = true;
    let forced = run(&args).expect("forced run");
    assert_eq!(forced.skipped().count(), 0);
    assert!(
        fs::read_to_string(&header_path)
            .unwrap()
            .contains("class Person {")
    );
}

#[test]
fn e2e_no_cpp_writes_only_the_schema() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("generated");
    let proto_output = temp_dir.path().join("schemas");
    let mut args = quiet_args(&demos_dir().join("shop.toml"), &output);
    args.no_cpp = true;
    args.protobuf = true;
    args.proto_output = Some(proto_output.to_string_lossy().to_string());

    let report = run(&args).expect("shop model compiles");

    assert!(report.cpp_dir.is_none());
    assert!(!output.exists());
    let proto = fs::read_to_string(proto_output.join("shop.proto")).expect("schema written");
    assert!(proto.contains("message ShopCatalog {"));
    assert!(proto.contains("message ShopOrders {"));
    assert_eq!(report.diagnostics.error_count(), 0);
}

#[test]
fn e2e_duplicate_type_reports_every_diagnostic() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("generated");
    let args = quiet_args(&demos_dir().join("errors/duplicate.toml"), &output);

    let err = run(&args).expect_err("duplicate type is rejected");
    let diagnostics = err.diagnostics().expect("analysis error");
    assert!(
        diagnostics
            .iter()
            .any(|diagnostic| diagnostic.code() == Some(ErrorCode::E200))
    );
}

#[test]
fn e2e_missing_protoc_is_a_command_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("generated");
    let mut args = quiet_args(&demos_dir().join("people.toml"), &output);
    args.binary = true;
    args.no_cpp = true;
    args.protoc = "typeforge-no-such-protoc".to_string();

    let err = run(&args).expect_err("protoc cannot start");
    assert!(matches!(err, TypeforgeError::Command(_)));
    assert!(output.join("proto/people.proto").is_file());
}

#[test]
fn e2e_missing_input_is_an_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("missing.toml");
    let args = quiet_args(&missing, &temp_dir.path().join("generated"));

    let err = run(&args).expect_err("missing model");
    assert!(matches!(err, TypeforgeError::Io(_)));
}
