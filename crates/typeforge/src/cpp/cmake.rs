//! Build descriptor (`CMakeLists.txt`) generation.

use typeforge_core::model::{TypeDef, TypeEntry};

use crate::text::{BANNER, CodeWriter};

use super::{CppGenerator, INDENT, source_path, test_path};

const CMAKE_MINIMUM_VERSION: &str = "3.16";

/// One executable built from `src/main.cpp` and every struct implementation,
/// plus one test executable per struct when tests are enabled.
pub(super) fn build_file(generator: &CppGenerator<'_>, structs: &[TypeEntry<'_>]) -> String {
    let project = generator.project_name();
    let threading = structs.iter().any(|entry| match entry.type_def {
        TypeDef::Struct(struct_type) => struct_type.options.threading,
        _ => false,
    });

    let mut out = CodeWriter::new(INDENT);
    out.line(format!("# {BANNER}"));
    out.blank();
    out.line(format!("cmake_minimum_required(VERSION {CMAKE_MINIMUM_VERSION})"));
    out.line(format!("project({project} LANGUAGES CXX)"));
    out.blank();
    out.line(format!(
        "set(CMAKE_CXX_STANDARD {})",
        generator.config.standard()
    ));
    out.line("set(CMAKE_CXX_STANDARD_REQUIRED ON)");
    out.blank();
    out.line("include_directories(${CMAKE_CURRENT_SOURCE_DIR}/include)");
    out.blank();

    out.line("set(MODEL_SOURCES");
    out.indented(|out| {
        for entry in structs {
            out.line(source_path(*entry));
        }
    });
    out.line(")");
    out.blank();

    if threading {
        out.line("find_package(Threads REQUIRED)");
        out.blank();
    }

    out.line(format!("add_executable({project} src/main.cpp ${{MODEL_SOURCES}})"));
    if threading {
        out.line(format!(
            "target_link_libraries({project} PRIVATE Threads::Threads)"
        ));
    }

    if generator.config.generate_tests() && !structs.is_empty() {
        out.blank();
        out.line("enable_testing()");
        for entry in structs {
            let target = format!("{}Test", entry.type_def.name());
            out.blank();
            out.line(format!(
                "add_executable({target} {} ${{MODEL_SOURCES}})",
                test_path(*entry)
            ));
            if threading {
                out.line(format!(
                    "target_link_libraries({target} PRIVATE Threads::Threads)"
                ));
            }
            out.line(format!("add_test(NAME {target} COMMAND {target})"));
        }
    }

    out.finish()
}
