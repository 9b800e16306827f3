//! Structured xtask error types.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// Stable error categories for xtask workflows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum XtaskErrorCategory {
    /// Invalid or unreadable plugin manifest.
    Manifest,
    /// Missing local prerequisites such as `trunk` or a built bundle.
    Environment,
    /// Failure to spawn a child process.
    ProcessLaunch,
    /// Child process exited unsuccessfully.
    ProcessExit,
    /// Invalid user input.
    Validation,
    /// Filesystem or archive I/O failure.
    Io,
}

/// Structured xtask error with contextual metadata.
///
/// Optional `operation`, `target` and `hint` fields are attached as the error propagates and are
/// rendered after the message when the failure is shown.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct XtaskError {
    /// High-level error category.
    pub category: XtaskErrorCategory,
    /// Human-readable message.
    pub message: String,
    /// Optional operation name.
    pub operation: Option<String>,
    /// Optional path target.
    pub target: Option<String>,
    /// Optional remediation hint.
    pub hint: Option<String>,
}

/// Convenience result type for xtask internals.
pub type XtaskResult<T> = Result<T, XtaskError>;

impl XtaskError {
    /// Create an error with the given category and message.
    pub fn new(category: XtaskErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            operation: None,
            target: None,
            hint: None,
        }
    }

    /// Create a manifest error.
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Manifest, message)
    }

    /// Create an environment error.
    pub fn environment(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Environment, message)
    }

    /// Create a process launch error.
    pub fn process_launch(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::ProcessLaunch, message)
    }

    /// Create a process exit error.
    pub fn process_exit(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::ProcessExit, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Validation, message)
    }

    /// Create an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Io, message)
    }

    /// Attach an operation label.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Attach a target path.
    pub fn with_path(mut self, path: &Path) -> Self {
        self.target = Some(path.display().to_string());
        self
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for XtaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(operation) = &self.operation {
            write!(f, " [operation: {operation}]")?;
        }
        if let Some(target) = &self.target {
            write!(f, " [target: {target}]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " [hint: {hint}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for XtaskError {}

impl From<std::io::Error> for XtaskError {
    fn from(value: std::io::Error) -> Self {
        XtaskError::io(value.to_string())
    }
}

impl From<zip::result::ZipError> for XtaskError {
    fn from(value: zip::result::ZipError) -> Self {
        XtaskError::io(format!("archive error: {value}"))
    }
}

impl From<walkdir::Error> for XtaskError {
    fn from(value: walkdir::Error) -> Self {
        let path = value.path().map(Path::to_path_buf);
        let err = XtaskError::io(format!("failed to walk bundle: {value}"));
        match path {
            Some(path) => err.with_path(&path),
            None => err,
        }
    }
}
