use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Unknown extension: {0}")]
    UnknownExtension(String),

    #[error("Configuration not found: {0}")]
    ConfigNotFound(String),

    #[error("Version already exists: {0}")]
    VersionAlreadyExists(String),

    #[error("Version required: {0}")]
    VersionRequired(String),

    #[error("Key not found in store: {0}")]
    KeyNotFound(String),

    #[error("Key already exists in store: {0}")]
    KeyExists(String),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
