use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while materializing a job workspace from the template.
///
/// Materialization failures are fatal for the job and never retried.
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    /// The configured template root does not exist or is not a directory.
    #[error("Template root not found: {0}")]
    TemplateMissing(PathBuf),

    /// A filesystem operation failed while creating or copying the workspace.
    #[error("Failed to copy template into workspace at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while injecting configuration into a workspace.
///
/// Missing *optional* inputs (icon, Firebase config) are not errors; they
/// are logged and skipped. These variants cover genuine failures: files
/// the template is expected to contain, or unparseable content.
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    /// A file operation inside the workspace failed.
    #[error("Injection I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The string-resource file could not be parsed or rewritten.
    #[error("Failed to rewrite string resources: {0}")]
    Xml(String),
}
