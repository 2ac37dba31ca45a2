use thiserror::Error;

pub type WharfResult<T> = Result<T, WharfError>;

#[derive(Error, Debug)]
pub enum WharfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Package error: {0}")]
    Package(String),

    /// The invocation named nothing to operate on. Raised before any
    /// manifest, lockfile or environment mutation.
    #[error("Usage error: {0}")]
    Usage(String),

    /// The external resolver could not produce a resolved set for the
    /// current declarations. Fatal to the lockfile update of the category
    /// being processed.
    #[error("Resolution failed: {message}")]
    Resolution {
        message: String,
        no_version_found: bool,
    },

    /// A bulk environment removal exited with a non-zero status. Carries
    /// the literal command line and captured output so a complete
    /// diagnostic can be rendered without re-running the command.
    #[error("Error running command: $ {command}")]
    Uninstall {
        command: String,
        output: String,
        code: i32,
    },

    /// A subprocess exited with a non-zero status code.
    /// The exit code should be propagated to the shell.
    #[error("Command exited with code {0}")]
    SubprocessExit(i32),
}
