// src/detect.rs

use anyhow::{bail, Context, Result};
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Stdio},
};
use tracing::{debug, instrument};

use crate::declaration::RawTable;

/// Anything that can turn a PDF into its tables, in page reading order.
pub trait TableDetector: Send + Sync {
    fn detect(&self, pdf: &Path) -> Result<Vec<RawTable>>;
}

/// Runs an external table-detection program as `<program> <args...> <pdf>`.
///
/// The program must print a JSON array to stdout, one element per table:
/// `{"rows": [["1. Text", "X", ...], ...], "top": 749.0}`.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandDetector {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl TableDetector for CommandDetector {
    #[instrument(level = "debug", skip_all, fields(pdf = %pdf.display()))]
    fn detect(&self, pdf: &Path) -> Result<Vec<RawTable>> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(pdf)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("spawning detector {:?}", self.program))?;

        if !output.status.success() {
            bail!(
                "detector {:?} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let tables: Vec<RawTable> = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("decoding detector output for {}", pdf.display()))?;
        debug!(tables = tables.len(), "tables detected");
        Ok(tables)
    }
}
