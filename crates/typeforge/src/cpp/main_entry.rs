//! Application entry (`src/main.cpp`) generation.

use typeforge_core::model::TypeDef;

use crate::text::{BANNER, CodeWriter};

use super::{CppGenerator, INDENT, qualified_name};

/// Includes every generated header and lists the model's types.
pub(super) fn main_source(generator: &CppGenerator<'_>) -> String {
    let model = generator.model();
    let project = generator.project_name();

    let mut out = CodeWriter::new(INDENT);
    out.line(format!("// {BANNER}"));
    out.blank();
    out.line("#include <iostream>");
    out.blank();
    for entry in model.declared_types() {
        out.line(format!("#include \"{}.h\"", entry.type_def.name()));
    }
    out.blank();
    out.line("int main() {");
    out.indented(|out| {
        out.line(format!("std::cout << \"{project}\" << std::endl;"));
        for entry in model.declared_types() {
            let kind = match entry.type_def {
                TypeDef::Struct(_) => "class",
                TypeDef::Enumeration(_) => "enum",
                TypeDef::Array(_) => "array",
                TypeDef::Alias(_) => "alias",
            };
            out.line(format!(
                "std::cout << \"  {kind} {}\" << std::endl;",
                qualified_name(entry, None)
            ));
        }
        out.line("return 0;");
    });
    out.line("}");
    out.finish()
}
