//! Pipeline properties checked through the `Compiler` facade.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use typeforge::{
    Compiler, ErrorCode, GenerationError, TypeforgeError,
    config::{AppConfig, CppConfig, GenerationOptions, ProtoConfig},
    model::{
        BasicTypeId, EnumerationType, Enumerator, Field, Model, Package, PrimitiveTypeDef,
        StructType, TypeAlias,
    },
    output::{MemorySink, OutputSink},
};

fn builtins() -> PrimitiveTypeDef {
    PrimitiveTypeDef::new("Builtins")
        .with(BasicTypeId::value("uint32", 32))
        .with(BasicTypeId::value("int64", 64))
        .with(BasicTypeId::value("bool", 1))
        .with(BasicTypeId::string("string"))
}

fn person() -> Model {
    Model::new().with_name("people").with_primitives(builtins()).with_type(
        StructType::new("Person")
            .with_field(Field::new("name", "string"))
            .with_field(Field::new("age", "uint32")),
    )
}

fn both_generators() -> AppConfig {
    AppConfig::default().with_generation(
        GenerationOptions::default()
            .with_generate_cpp(true)
            .with_generate_protobuf(true),
    )
}

fn proto_only() -> AppConfig {
    AppConfig::default().with_generation(
        GenerationOptions::default()
            .with_generate_cpp(false)
            .with_generate_protobuf(true),
    )
}

/// The text between `open` and the next `close`, starting at `open`.
fn block<'a>(text: &'a str, open: &str, close: &str) -> &'a str {
    let start = text.find(open).unwrap_or_else(|| panic!("missing `{open}` in:\n{text}"));
    let rest = &text[start..];
    let end = rest.find(close).unwrap_or(rest.len());
    &rest[..end]
}

#[test]
fn end_to_end_person() {
    let mut model = person();
    let compilation = Compiler::new(both_generators())
        .compile(&mut model)
        .expect("Person compiles");
    assert_eq!(compilation.diagnostics.error_count(), 0);

    let cpp = compilation.output.cpp().expect("C++ output");
    let header = cpp.get("include/Person.h").expect("header");
    assert!(header.contains("class Person {"));
    let private = block(header, "private:", "public:");
    assert!(private.contains("std::string name;"));
    assert!(private.contains("uint32_t age;"));
    assert!(header.contains("Person(const std::string& name, uint32_t age);"));

    for path in [
        "src/Person.cpp",
        "test/PersonTest.cpp",
        "CMakeLists.txt",
        "src/main.cpp",
    ] {
        assert!(cpp.get(path).is_some(), "missing {path}");
    }
    let cmake = cpp.get("CMakeLists.txt").expect("build file");
    assert!(cmake.contains("src/Person.cpp"));

    let proto = compilation.output.proto().expect("proto output");
    let schema = proto.get("people.proto").expect("schema");
    assert!(schema.contains("syntax = \"proto3\";"));
    assert!(schema.contains("message Person {\n  string name = 1;\n  int32 age = 2;\n}"));
    assert!(compilation.output.descriptor().is_none());
}

#[test]
fn duplicate_names_block_generation() {
    let mut model = Model::new()
        .with_type(StructType::new("Data"))
        .with_type(StructType::new("Data"));
    let err = Compiler::default().compile(&mut model).unwrap_err();

    let diagnostics = err.diagnostics().expect("analysis error");
    let duplicates = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.code() == Some(ErrorCode::E200))
        .count();
    assert_eq!(duplicates, 1);

    let mut packaged = Model::new()
        .with_package(Package::new("first").with_type(StructType::new("Data")))
        .with_package(Package::new("second").with_type(StructType::new("Data")));
    Compiler::default()
        .compile(&mut packaged)
        .expect("separate packages are separate scopes");
}

#[test]
fn alias_cycle_blocks_generation() {
    let mut model = Model::new()
        .with_type(TypeAlias::new("Ping", "Pong"))
        .with_type(TypeAlias::new("Pong", "Ping"))
        .with_type(StructType::new("Holder").with_field(Field::new("value", "Ping")));
    let err = Compiler::new(both_generators())
        .compile(&mut model)
        .expect_err("cyclic aliases are rejected");

    let diagnostics = err.diagnostics().expect("analysis error");
    assert!(
        diagnostics
            .iter()
            .any(|diagnostic| diagnostic.code() == Some(ErrorCode::E218))
    );
}

#[test]
fn top_level_and_packaged_namesakes_get_distinct_schema_names() {
    let model = Model::new()
        .with_name("clash")
        .with_primitives(builtins())
        .with_type(StructType::new("Data").with_field(Field::new("id", "int64")))
        .with_package(
            Package::new("pkg")
                .with_type(StructType::new("Data").with_field(Field::new("flag", "bool"))),
        );
    let schema = proto_schema(model).expect("namesakes in different scopes compile");

    assert!(!schema.contains("package pkg;"));
    assert!(schema.contains("\nmessage Data {\n  int64 id = 1;\n}\n"));
    assert!(schema.contains("message Pkg {\n  message Data {\n    bool flag = 1;\n  }\n}"));
}

#[test]
fn skip_validation_returns_errors_and_generation_fails() {
    let mut model = Model::new()
        .with_primitives(builtins())
        .with_type(StructType::new("Person").with_field(Field::new("home", "Address")));

    let compiler = Compiler::new(AppConfig::default().with_generation(
        GenerationOptions::default().with_skip_validation(true),
    ));
    let diagnostics = compiler.analyze(&mut model).expect("gate skipped");
    assert!(diagnostics.has_errors());

    let err = compiler.generate(&model).unwrap_err();
    assert!(matches!(
        err,
        TypeforgeError::Generation(GenerationError::UnresolvedReference { .. })
    ));
}

#[test]
fn generate_on_unanalyzed_model_is_an_internal_error() {
    let model = person();
    let err = Compiler::default().generate(&model).unwrap_err();
    assert!(matches!(
        err,
        TypeforgeError::Generation(GenerationError::UnresolvedReference { .. })
    ));
}

#[test]
fn parallel_and_sequential_generation_agree() {
    let mut model = person();
    let compiler = Compiler::new(both_generators());
    compiler.analyze(&mut model).expect("valid");
    let parallel = compiler.generate(&model).expect("parallel");

    let cpp_only = Compiler::default().generate(&model).expect("C++ only");
    let proto = Compiler::new(proto_only()).generate(&model).expect("proto only");

    assert_eq!(parallel.cpp(), cpp_only.cpp());
    assert_eq!(parallel.proto(), proto.proto());
}

#[test]
fn binary_descriptor_request_follows_proto_name() {
    let mut model = person();
    let config = AppConfig::new(
        GenerationOptions::default()
            .with_generate_protobuf(true)
            .with_generate_binary_descriptor(true),
        CppConfig::default(),
        ProtoConfig::default().with_file_stem("directory"),
    );
    let compilation = Compiler::new(config).compile(&mut model).expect("compiles");

    let request = compilation.output.descriptor().expect("descriptor request");
    assert_eq!(request.input_proto_path().to_str(), Some("directory.proto"));
    assert_eq!(request.output_desc_path().to_str(), Some("directory.desc"));
}

#[test]
fn generated_files_reach_a_sink() {
    let mut model = person();
    let compilation = Compiler::default().compile(&mut model).expect("compiles");
    let cpp = compilation.output.cpp().expect("C++ output");

    let mut sink = MemorySink::new(false);
    let outcomes = sink.write_all(cpp).expect("write");
    assert_eq!(outcomes.len(), cpp.len());
    assert_eq!(sink.files(), cpp);
}

fn enumeration_model(values: &[Option<i64>]) -> Model {
    let enumeration = values.iter().enumerate().fold(
        EnumerationType::new("Signal"),
        |enumeration, (index, value)| {
            let name = format!("S{index}");
            enumeration.with_enumerator(match value {
                Some(value) => Enumerator::with_value(name.as_str(), *value),
                None => Enumerator::new(name.as_str()),
            })
        },
    );
    Model::new().with_name("signals").with_type(enumeration)
}

fn proto_schema(mut model: Model) -> Result<String, TypeforgeError> {
    let compiler = Compiler::new(proto_only());
    compiler.analyze(&mut model)?;
    let output = compiler.generate(&model)?;
    Ok(output
        .proto()
        .and_then(|files| files.iter().next())
        .map(|(_, content)| content.to_string())
        .unwrap_or_default())
}

#[test]
fn explicit_zero_is_never_doubled() {
    let schema = proto_schema(enumeration_model(&[Some(3), Some(0), None])).expect("schema");
    assert!(!schema.contains("_UNSPECIFIED"));
    assert!(schema.contains("enum Signal {\n  SIGNAL_S1 = 0;\n  SIGNAL_S0 = 3;\n  SIGNAL_S2 = 1;\n}"));

    let schema = proto_schema(enumeration_model(&[Some(1), Some(2)])).expect("schema");
    assert!(schema.contains("enum Signal {\n  SIGNAL_UNSPECIFIED = 0;\n  SIGNAL_S0 = 1;\n  SIGNAL_S1 = 2;\n}"));
}

mod proptest_tests {
    use super::*;

    fn field_names_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::sample::subsequence(
            vec!["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"],
            2..=6,
        )
        .prop_shuffle()
        .prop_map(|names| names.into_iter().map(str::to_string).collect())
    }

    fn enumerator_values_strategy() -> impl Strategy<Value = Vec<Option<i64>>> {
        prop::collection::vec(prop::option::of(1i64..50), 1..6)
    }

    fn record(names: &[String]) -> Model {
        let record = names.iter().fold(StructType::new("Record"), |record, name| {
            record.with_field(Field::new(name.as_str(), "int64"))
        });
        Model::new()
            .with_name("records")
            .with_primitives(builtins())
            .with_type(record)
    }

    fn check_field_order_stability(names: &[String]) -> Result<(), TestCaseError> {
        let mut model = record(names);
        let compiler = Compiler::new(both_generators());
        let compilation = compiler
            .compile(&mut model)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let header = compilation
            .output
            .cpp()
            .and_then(|files| files.get("include/Record.h"))
            .ok_or_else(|| TestCaseError::fail("missing header"))?;
        let parameters: Vec<String> = names.iter().map(|name| format!("int64_t {name}")).collect();
        let constructor = format!("Record({});", parameters.join(", "));
        prop_assert!(header.contains(&constructor), "missing `{}`", constructor);

        let schema = compilation
            .output
            .proto()
            .and_then(|files| files.get("records.proto"))
            .ok_or_else(|| TestCaseError::fail("missing schema"))?;
        for (index, name) in names.iter().enumerate() {
            let line = format!("  int64 {name} = {};", index + 1);
            prop_assert!(schema.contains(&line), "missing `{}`", line);
        }
        Ok(())
    }

    fn check_zero_value_synthesis(values: &[Option<i64>]) -> Result<(), TestCaseError> {
        let model = enumeration_model(values);
        let schema = proto_schema(model).map_err(|err| TestCaseError::fail(err.to_string()))?;

        // Explicit values are all positive, so only an implicit first
        // enumerator can be zero.
        let has_zero = values.first() == Some(&None);
        prop_assert_eq!(schema.contains("SIGNAL_UNSPECIFIED = 0;"), !has_zero);
        prop_assert_eq!(schema.matches(" = 0;").count(), 1);

        let regenerated = proto_schema(enumeration_model(values))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(schema, regenerated);
        Ok(())
    }

    proptest! {
        #[test]
        fn field_order_stability(names in field_names_strategy()) {
            check_field_order_stability(&names)?;
        }

        #[test]
        fn zero_value_synthesis(values in enumerator_values_strategy()) {
            check_zero_value_synthesis(&values)?;
        }
    }
}
