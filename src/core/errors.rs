use thiserror::Error;
use zip::result::ZipError;

#[derive(Error, Debug)]
pub enum LexyError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Zip error: {0}")]
    Zip(Box<ZipError>),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid .lexy file: {0}")]
    Format(String),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("A course with ID \"{0}\" already exists")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("No record with id: {0}")]
    NotFound(String),

    #[error("LexyError: {0}")]
    Custom(String),
}

impl LexyError {
    pub fn parse(path: impl Into<String>, source: serde_json::Error) -> Self {
        LexyError::Parse { path: path.into(), source }
    }

    /// Soft errors are resolved by the user (fix the form, confirm the overwrite)
    /// rather than reported as failures.
    pub fn is_soft(&self) -> bool {
        matches!(self, LexyError::Conflict(_) | LexyError::Validation(_))
    }
}

impl From<std::io::Error> for LexyError {
    fn from(error: std::io::Error) -> Self {
        LexyError::Io(Box::new(error))
    }
}

impl From<ZipError> for LexyError {
    fn from(error: ZipError) -> Self {
        LexyError::Zip(Box::new(error))
    }
}
