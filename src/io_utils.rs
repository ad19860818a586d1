use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::ParzstError;

/// Suffix appended to the input path to name the output file.
pub const OUTPUT_SUFFIX: &str = ".zst";

#[derive(Debug)]
pub struct CliError {
    pub msg: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// `input` with [`OUTPUT_SUFFIX`] appended to the whole file name.
pub fn output_path(input: &Path) -> PathBuf {
    let mut name: OsString = input.as_os_str().to_owned();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

/// Format a user friendly I/O error message with suggestions.
pub fn format_io_error(operation: &str, path: &Path, err: &io::Error) -> String {
    use io::ErrorKind::*;
    let suggestion = match err.kind() {
        NotFound => "Check that the file exists and the path is correct.",
        PermissionDenied => "Check permissions or run as a different user.",
        WriteZero => "Disk may be full. Free up space and try again.",
        Other if err.raw_os_error() == Some(28) => "Disk may be full. Free up space and try again.",
        _ => "Check permissions or free up disk space.",
    };
    format!(
        "Error {} '{}': {}. {}",
        operation,
        path.display(),
        err,
        suggestion
    )
}

/// Convert a library error into a CLI error with a hint.
pub fn parzst_cli_error(context: &str, err: ParzstError) -> CliError {
    CliError {
        msg: format!("{}: {}", context, cli_hint(&err)),
        source: Some(Box::new(err)),
    }
}

/// Return an actionable hint for an error variant.
pub fn cli_hint(err: &ParzstError) -> String {
    use ParzstError::*;
    match err {
        Config(msg) => format!("{msg}. Check LEVEL and THREADS."),
        Io(io) => format!("{io}. The output file is incomplete."),
        File {
            operation,
            path,
            source,
        } => format_io_error(operation, path, source),
        Codec { index, source } => format!("chunk {index}: {source}. This is a bug."),
        WorkerPanicked { index } => format!("worker for chunk {index} panicked. This is a bug."),
        Internal(msg) => format!("{msg}. This is a bug."),
    }
}
