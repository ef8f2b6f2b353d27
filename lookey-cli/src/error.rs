//! CLI-specific error types and exit code mapping

use lookey_core::error::LookeyError;
use lookey_locator::LocatorError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from lookey-core.
    #[error("{0}")]
    Core(#[from] LookeyError),

    /// Locator engine error (detector, cache lookup, decision).
    #[error("{0}")]
    Locator(#[from] LocatorError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command / invalid request error |
    /// | 2    | Configuration or catalog error            |
    /// | 3    | Detector unreachable                      |
    /// | 4    | Product could not be found or located     |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(LookeyError::Config(_)) => 2,
            Self::Locator(e) => match e {
                LocatorError::Config { .. } | LocatorError::Catalog(_) => 2,
                LocatorError::DetectorUnavailable(_) => 3,
                LocatorError::EmptyDetection
                | LocatorError::NoScanOnFile { .. }
                | LocatorError::TargetNotOnShelf { .. }
                | LocatorError::ViewNotRecognized => 4,
                LocatorError::InvalidRequest(_) => 1,
            },
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}
