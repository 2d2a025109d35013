use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationInvalidArgument,
    ValidationInvalidJson,

    RewriteInvalidRoot,
    RewriteInvalidModuleName,
    RewriteFileRead,
    RewriteFileWrite,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",

            ErrorCode::RewriteInvalidRoot => "rewrite.invalid_root",
            ErrorCode::RewriteInvalidModuleName => "rewrite.invalid_module_name",
            ErrorCode::RewriteFileRead => "rewrite.file_read",
            ErrorCode::RewriteFileWrite => "rewrite.file_write",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidRootDetails {
    pub path: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidModuleNameDetails {
    pub field: String,
    pub name: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIoDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn validation_invalid_json(err: serde_json::Error, context: Option<String>) -> Self {
        let details = serde_json::json!({
            "error": err.to_string(),
            "context": context,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    /// Root directory is missing, not a directory, or unreadable.
    pub fn invalid_root(path: impl Into<String>, problem: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(InvalidRootDetails {
            path: path.clone(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::RewriteInvalidRoot,
            format!("Invalid root directory '{}'", path),
            details,
        )
        .with_hint("Pass an existing, readable directory as the root path")
    }

    pub fn invalid_module_name(
        field: impl Into<String>,
        name: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let details = to_details(InvalidModuleNameDetails {
            field: field.into(),
            name: name.clone(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::RewriteInvalidModuleName,
            format!("Invalid module name '{}'", name),
            details,
        )
        .with_hint("Module names are dot-separated identifiers, e.g. 'pkg' or 'pkg.sub'")
    }

    pub fn file_read(path: impl Into<String>, error: impl Into<String>) -> Self {
        let details = to_details(FileIoDetails {
            path: path.into(),
            error: error.into(),
        });
        Self::new(ErrorCode::RewriteFileRead, "Failed to read file", details)
    }

    pub fn file_write(path: impl Into<String>, error: impl Into<String>) -> Self {
        let details = to_details(FileIoDetails {
            path: path.into(),
            error: error.into(),
        });
        Self::new(ErrorCode::RewriteFileWrite, "Failed to write file", details)
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// The `error` string carried in the details payload, when present.
    pub fn detail_error(&self) -> Option<&str> {
        self.details.get("error").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dotted_strings() {
        assert_eq!(ErrorCode::RewriteInvalidRoot.as_str(), "rewrite.invalid_root");
        assert_eq!(
            ErrorCode::RewriteInvalidModuleName.as_str(),
            "rewrite.invalid_module_name"
        );
        assert_eq!(ErrorCode::RewriteFileWrite.as_str(), "rewrite.file_write");
    }

    #[test]
    fn invalid_root_carries_path_and_hint() {
        let err = Error::invalid_root("/nope", "does not exist");
        assert_eq!(err.code, ErrorCode::RewriteInvalidRoot);
        assert_eq!(err.details["path"], "/nope");
        assert_eq!(err.details["problem"], "does not exist");
        assert_eq!(err.hints.len(), 1);
        assert!(err.to_string().contains("/nope"));
    }

    #[test]
    fn file_write_exposes_detail_error() {
        let err = Error::file_write("a.py", "permission denied");
        assert_eq!(err.detail_error(), Some("permission denied"));
        assert_eq!(err.details["path"], "a.py");
    }
}
