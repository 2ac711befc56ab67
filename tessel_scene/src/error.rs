use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("{line}:{column}: {message}")]
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("field `{0}` given more than once")]
    DuplicateField(String),

    #[error("invalid field `{path}`: {reason}")]
    InvalidField { path: String, reason: String },

    #[error("unknown embedded component type `{ty}` at `{path}`")]
    UnknownEmbeddedType { path: String, ty: String },

    #[error("duplicate id `{id}` at `{path}`")]
    DuplicateId { path: String, id: String },

    /// Failure inside the nested record held by an embedded component's `data` string.
    #[error("in `{path}`: {source}")]
    Data {
        path: String,
        source: Box<SceneError>,
    },
}

impl SceneError {
    pub(crate) fn syntax(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
