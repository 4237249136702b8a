use romval_core::HashKind;

/// Errors that can occur while fetching or reading DAT files.
#[derive(Debug, thiserror::Error)]
pub enum DatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("No DAT source configured for platform '{0}'")]
    NoSource(String),
}

impl DatError {
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }
}

/// A recoverable problem found while parsing one DAT. The affected game
/// or hash is skipped; the rest of the file still loads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("DAT is empty")]
    Empty,

    #[error("game opened on line {line} is never closed")]
    UnterminatedGame { line: usize },

    #[error("ROM '{rom}' has malformed {kind} '{value}'")]
    MalformedHash {
        rom: String,
        kind: HashKind,
        value: String,
    },

    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },
}
