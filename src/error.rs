use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovgateError {
    /// Contradictory coverage data: non-positive or duplicate line numbers,
    /// or the same path listed twice in one report.
    #[error("Malformed coverage input: {0}")]
    MalformedInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error at position {position}: {source}")]
    Xml {
        source: quick_xml::Error,
        position: usize,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown output format: '{0}'")]
    UnknownFormat(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, CovgateError>;
