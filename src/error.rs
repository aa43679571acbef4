use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Magic number mismatch: expected 'ply', found '{found}'")]
    BadMagic { found: String },

    #[error("Invalid PLY header: {0}")]
    InvalidHeader(String),

    #[error("Property type does not match its name: '{line}'")]
    PropertyTypeMismatch { line: String },

    #[error("Unsupported property type: {type_name}")]
    UnsupportedPropertyType { type_name: String },

    #[error("Invalid PLY body: {0}")]
    InvalidBody(String),

    #[error("Stream ended inside {element} record {index}")]
    TruncatedStream { element: &'static str, index: usize },
}

impl PlyError {
    /// True for the errors caused by the file contents rather than the underlying stream.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, PlyError::Io(_))
    }
}
