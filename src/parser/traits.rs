//! Parser trait definition

/// Trait for parsing decoded dependency files
pub trait Parser {
    /// What the parser extracts from a file
    type Output;

    /// Parse the decoded content of a file
    fn parse(&self, content: &str) -> Result<Self::Output, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// File content is not valid base64
    #[error("Failed to decode file content: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 text
    #[error("File content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid TOML document
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
