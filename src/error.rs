use std::fmt;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A document that failed validation, with every reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Name of the document ("all" or the project name)
    pub document: String,
    /// Messages reported by the validator
    pub errors: Vec<String>,
}

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    /// Missing or unusable configuration (package metadata, docs folder, ...)
    Configuration(String),
    /// Two route keys normalize to the same path template and verb
    DuplicateRoute { path: String, verb: String },
    /// One or more assembled documents failed validation
    Validation { failures: Vec<ValidationFailure> },
    /// A configuration or route table file could not be parsed
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "configuration error: {}", msg),
            Error::DuplicateRoute { path, verb } => {
                write!(f, "duplicate route: {} {}", verb.to_uppercase(), path)
            }
            Error::Validation { failures } => {
                write!(f, "{} document(s) failed validation", failures.len())?;
                for failure in failures {
                    write!(f, "\n  {}: {}", failure.document, failure.errors.join("; "))?;
                }
                Ok(())
            }
            Error::Serialization(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_route_message_names_path_and_verb() {
        let err = Error::DuplicateRoute {
            path: "/users/{id}".to_string(),
            verb: "get".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate route: GET /users/{id}");
    }

    #[test]
    fn test_validation_message_lists_documents() {
        let err = Error::Validation {
            failures: vec![
                ValidationFailure {
                    document: "all".to_string(),
                    errors: vec!["info.version is required".to_string()],
                },
                ValidationFailure {
                    document: "Billing".to_string(),
                    errors: vec!["a".to_string(), "b".to_string()],
                },
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("2 document(s) failed validation"));
        assert!(message.contains("all: info.version is required"));
        assert!(message.contains("Billing: a; b"));
    }

    #[test]
    fn test_parse_errors_become_serialization_errors() {
        let json: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(json, Error::Serialization(ref msg) if msg.starts_with("JSON: ")));

        let yaml: Error = serde_yaml::from_str::<serde_json::Value>("a: [").unwrap_err().into();
        assert!(matches!(yaml, Error::Serialization(ref msg) if msg.starts_with("YAML: ")));
    }
}
