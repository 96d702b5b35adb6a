//! What a CLI run produced, printed by `--summary`.

use std::{fmt, path::PathBuf};

use log::{error, info, warn};

use typeforge::{Diagnostics, Severity, output::WriteOutcome, stats::ModelStatistics};

const RULE_WIDTH: usize = 40;

/// Outcome of a successful [`run`](crate::run).
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Warnings and notes of the analysis.
    pub diagnostics: Diagnostics,
    pub statistics: ModelStatistics,
    /// C++ output directory, when C++ generation ran.
    pub cpp_dir: Option<PathBuf>,
    /// Protobuf output directory, when Protobuf generation ran.
    pub proto_dir: Option<PathBuf>,
    /// Every file handed to a sink, in generation order.
    pub files: Vec<(PathBuf, WriteOutcome)>,
}

impl RunReport {
    /// Files left untouched because they existed and overwriting was off.
    pub fn skipped(&self) -> impl Iterator<Item = &PathBuf> {
        self.files
            .iter()
            .filter(|(_, outcome)| *outcome == WriteOutcome::Skipped)
            .map(|(path, _)| path)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:=^RULE_WIDTH$}", " Generation Summary ")?;
        write!(f, "{}", self.statistics)?;
        writeln!(f)?;
        if let Some(dir) = &self.cpp_dir {
            writeln!(f, "C++ output: {}", dir.display())?;
        }
        if let Some(dir) = &self.proto_dir {
            writeln!(f, "Protobuf output: {}", dir.display())?;
        }
        writeln!(f, "Diagnostics: {}", self.diagnostics.summary())?;

        writeln!(f)?;
        writeln!(f, "Generated files:")?;
        for (path, outcome) in &self.files {
            match outcome {
                WriteOutcome::Written => writeln!(f, "  - {}", path.display())?,
                WriteOutcome::Skipped => writeln!(f, "  - {} (skipped, exists)", path.display())?,
            }
        }
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))
    }
}

/// Logs every diagnostic at its own level, errors first.
pub fn log_diagnostics(diagnostics: &Diagnostics) {
    for (severity, group) in diagnostics.by_severity() {
        for diagnostic in group {
            let line = diagnostic.report_line();
            match severity {
                Severity::Error => error!("{line}"),
                Severity::Warning => warn!("{line}"),
                Severity::Info => info!("{line}"),
            }
        }
    }
}
