use std::path::PathBuf;

/// Result type used throughout readsim
pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The reference file could not be opened or read
    #[error("cannot read reference {}: {source}", .path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing but whitespace in the reference
    #[error("reference sequence is empty")]
    EmptyReference,

    /// A window of `read_length` would wrap the circular reference more than once
    #[error("read length ({read_length}) exceeds reference length ({reference_length})")]
    ReadTooLong {
        read_length: usize,
        reference_length: usize,
    },

    /// Only raised when the reference is validated against the alphabet
    #[error("invalid symbol {symbol:?} at reference offset {offset}")]
    InvalidSymbol { offset: usize, symbol: char },

    /// The read file could not be created or written
    #[error("cannot write {}: {source}", .path.display())]
    OutputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Substitution needs at least two distinct symbols to choose from
    #[error("alphabet must contain at least two distinct symbols")]
    DegenerateAlphabet,

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}
