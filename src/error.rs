//! Error types for the editor
use thiserror::Error;

/// Editor errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// The rendering surface could not be created
    #[error("could not start the editor: {0}")]
    Environment(String),

    /// A picked file is not a readable image
    #[error("could not read image: {0}")]
    Decode(String),

    /// Flattening or encoding the scene failed
    #[error("could not export image: {0}")]
    Export(String),

    /// The session has no surface yet
    #[error("editor is not ready yet")]
    NotReady,

    /// A load finished after the scene it was meant for was cleared
    #[error("load result arrived after the canvas was cleared")]
    Stale,

    /// The session was torn down
    #[error("editor has been closed")]
    Closed,

    /// Configuration could not be parsed
    #[error("invalid editor configuration: {0}")]
    Config(String),
}

impl EditorError {
    /// Environment errors end the session; everything else is local to one operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EditorError::Environment(_))
    }
}

impl From<image::ImageError> for EditorError {
    fn from(err: image::ImageError) -> Self {
        EditorError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Config(err.to_string())
    }
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_environment_is_fatal() {
        assert!(EditorError::Environment("no 2d context".into()).is_fatal());
        assert!(!EditorError::Decode("bad".into()).is_fatal());
        assert!(!EditorError::Export("bad".into()).is_fatal());
        assert!(!EditorError::Stale.is_fatal());
    }

    #[test]
    fn test_environment_message() {
        let err = EditorError::Environment("canvas missing".into());
        assert_eq!(err.to_string(), "could not start the editor: canvas missing");
    }
}
