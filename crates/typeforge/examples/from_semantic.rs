//! Example: Compiling a model built from the semantic types
//!
//! This example builds a small model in code, without loading a TOML
//! document, and prints every generated file.

use typeforge::{
    Compiler,
    config::{AppConfig, GenerationOptions},
    model::{
        BasicTypeId, EnumerationType, Enumerator, Field, Model, Package, PrimitiveTypeDef,
        StructType,
    },
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building model from semantic types...\n");

    let builtins = PrimitiveTypeDef::new("Builtins")
        .with(BasicTypeId::value("uint32", 32))
        .with(BasicTypeId::value("bool", 1))
        .with(BasicTypeId::string("string"));

    let status = EnumerationType::new("Status")
        .with_enumerator(Enumerator::new("ACTIVE"))
        .with_enumerator(Enumerator::with_value("RETIRED", 4));

    let employee = StructType::new("Employee")
        .with_field(Field::new("name", "string"))
        .with_field(Field::new("badge", "uint32"))
        .with_field(Field::new("status", "Status"))
        .with_field(Field::new("remote", "bool"));

    let mut model = Model::new()
        .with_name("staff")
        .with_primitives(builtins)
        .with_package(
            Package::new("acme.staff")
                .with_type(status)
                .with_type(employee),
        );

    let options = GenerationOptions::default()
        .with_generate_cpp(true)
        .with_generate_protobuf(true);
    let compiler = Compiler::new(AppConfig::default().with_generation(options));

    let compilation = compiler.compile(&mut model)?;
    println!("Diagnostics: {}\n", compilation.diagnostics.summary());

    let generated = [compilation.output.cpp(), compilation.output.proto()];
    for (path, content) in generated.into_iter().flatten().flat_map(|files| files.iter()) {
        println!("--- {path} ---\n{content}");
    }

    Ok(())
}
