/// Errors that can occur while interpreting frame payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Payload byte 0 names a message type we do not know.
    #[error("unknown message type: {0}")]
    UnknownMessageType(u8),

    /// A field parser ran past the declared payload length.
    #[error("message payload too short")]
    MessageTooShort,

    /// A log record carries a type tag we do not know.
    #[error("unknown log item type: {0}")]
    UnknownLogItemType(u8),
}

/// Errors that can occur while parsing the text config form.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFormatError {
    /// A line is neither a section header, a key=value pair, a comment,
    /// nor blank.
    #[error("config syntax error on line {line}")]
    Syntax { line: usize },

    /// The expected `[Section]` block is absent.
    #[error("missing config section [{0}]")]
    MissingSection(String),

    /// A required key is absent from its section.
    #[error("missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    /// A value failed to parse as an integer.
    #[error("value of '{key}' in section [{section}] is not an integer")]
    InvalidValue { section: String, key: String },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
