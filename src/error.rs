//! Errors raised by the sequence data model.
//!
//! Format parsers have their own error types (see [`crate::formats`]); the
//! errors here cover alphabet construction, symbol membership and the
//! aggregate operations on [`crate::SeqList`].

use thiserror::Error;

/// Errors that can occur while building or querying sequences.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    #[error("Alphabet contains repeated symbol '{0}'")]
    DuplicateSymbol(char),

    #[error("Alphabet cannot contain the null character")]
    NullSymbol,

    #[error("Alphabet symbols must be ASCII, got '{0}'")]
    NonAsciiSymbol(char),

    #[error("Synonym list has an unpaired character '{0}'")]
    UnpairedSynonym(char),

    #[error("Synonym '{synonym}' maps to '{target}', which is not an alphabet symbol")]
    DanglingSynonym { synonym: char, target: char },

    #[error("Character '{symbol}' at position {position} is not in alphabet: {alphabet}")]
    NotInAlphabet {
        symbol: char,
        position: usize,
        alphabet: String,
    },

    #[error("Ordinal {index} is out of range for an alphabet of {size} symbols")]
    OrdinalOutOfRange { index: usize, size: usize },

    #[error("No alphabet available: pass one explicitly or give the list a shared alphabet")]
    NoAlphabet,

    #[error("Sequences are not aligned (lengths range from {min} to {max})")]
    NotAligned { min: usize, max: usize },

    #[error("Alphabet has no complement mapping: {0}")]
    NoComplement(String),
}

/// Result type for data model operations.
pub type SeqResult<T> = Result<T, SeqError>;
