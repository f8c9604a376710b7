use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Invalid generator configuration. Raised before any file is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config {path}: {message}")]
    Syntax { path: String, message: String },

    #[error("no flavors selected")]
    NoFlavors,

    #[error("flavor `{0}` selected more than once")]
    DuplicateFlavor(String),

    #[error("unknown flavor `{0}`")]
    UnknownFlavor(String),

    #[error("output directory must not be empty")]
    EmptyOutput,

    #[error("{field} must be a relative `.ts` file name, got `{value}`")]
    InvalidFileName { field: &'static str, value: String },

    #[error("routes_file and client_file are both `{0}`")]
    SameOutputFile(String),

    #[error("naming prefix `{0}` is not a valid identifier fragment")]
    InvalidPrefix(String),

    #[error("alias `{key}` → `{value}` is not a valid identifier")]
    InvalidAlias { key: String, value: String },
}

/// Two operations derive the same name inside one generated file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("name `{name}` in {file} is derived by both {first} and {second}")]
pub struct NameCollisionError {
    pub file: String,
    pub name: String,
    pub first: String,
    pub second: String,
}
