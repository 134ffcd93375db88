//! FASTA (Pearson) format.
//!
//! Supports both single-line and multi-line sequences.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```
//!
//! The identifier is the first whitespace-delimited token after `>`; the
//! rest of the header line is the description. A header with no sequence
//! lines yields an empty record.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::error::SeqError;
use crate::formats::{
    bind_record, bind_records, record_names, FileFormat, ParseError, ParseResult, RawRecord,
    SeqFormat, SeqIter,
};
use crate::seq::Seq;
use crate::seq_list::SeqList;

/// Sequence columns per line when writing.
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// Errors that can occur during FASTA parsing and writing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),

    #[error("Record '{name}': {source}")]
    Alphabet { name: String, source: SeqError },

    #[error("Cannot write FASTA output: {0}")]
    Unwritable(String),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// FASTA reader and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastaFormat {
    line_width: usize,
}

impl FastaFormat {
    pub const fn new() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    /// Sets the number of sequence columns per written line.
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }
}

impl Default for FastaFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl SeqFormat for FastaFormat {
    fn format(&self) -> FileFormat {
        FileFormat::Fasta
    }

    fn read(&self, reader: &mut dyn BufRead, alphabet: Option<&Alphabet>) -> ParseResult<SeqList> {
        Ok(parse_fasta(reader, alphabet)?)
    }

    fn write(&self, writer: &mut dyn Write, seqs: &SeqList) -> ParseResult<()> {
        Ok(write_fasta(writer, seqs, self.line_width)?)
    }

    fn iterseq<'a>(
        &self,
        reader: Box<dyn BufRead + 'a>,
        alphabet: Option<&Alphabet>,
    ) -> SeqIter<'a> {
        let alphabet = alphabet.cloned();
        Box::new(FastaRecords::new(reader).map(move |record| -> ParseResult<Seq> {
            let record = record?;
            let bound = match &alphabet {
                Some(alphabet) => bind_record_named(record, alphabet),
                None => {
                    let inferred = Alphabet::which(&record.symbols);
                    bind_record_named(record, &inferred)
                }
            };
            bound.map_err(ParseError::from)
        }))
    }
}

fn bind_record_named(record: RawRecord, alphabet: &Alphabet) -> FastaResult<Seq> {
    let name = record.label(0);
    bind_record(record, alphabet).map_err(|source| FastaError::Alphabet { name, source })
}

/// Streams raw records from FASTA input, one per header.
struct FastaRecords<R> {
    lines: io::Lines<R>,
    line_number: usize,
    header: Option<String>,
    /// Error found while closing the previous record, reported next.
    pending_error: Option<FastaError>,
    finished: bool,
}

impl<R: BufRead> FastaRecords<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            header: None,
            pending_error: None,
            finished: false,
        }
    }

    fn fail(&mut self, error: FastaError) -> Option<FastaResult<RawRecord>> {
        self.finished = true;
        Some(Err(error))
    }
}

impl<R: BufRead> Iterator for FastaRecords<R> {
    type Item = FastaResult<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(error) = self.pending_error.take() {
            return self.fail(error);
        }

        let mut symbols = String::new();
        loop {
            let text = match self.lines.next() {
                Some(Ok(text)) => text,
                Some(Err(e)) => return self.fail(e.into()),
                None => {
                    // Don't forget the last sequence
                    self.finished = true;
                    return self.header.take().map(|header| Ok(record(header, symbols)));
                }
            };
            self.line_number += 1;
            let line = text.trim();

            // Skip empty lines
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('>') {
                let header = header.trim();
                if header.is_empty() {
                    let message = format!("Empty sequence identifier at line {}", self.line_number);
                    let error = FastaError::InvalidFormat(message);
                    return match self.header.take() {
                        Some(previous) => {
                            self.pending_error = Some(error);
                            Some(Ok(record(previous, symbols)))
                        }
                        None => self.fail(error),
                    };
                }
                if let Some(previous) = self.header.replace(header.to_string()) {
                    return Some(Ok(record(previous, symbols)));
                }
            } else {
                if self.header.is_none() {
                    return self.fail(FastaError::SequenceWithoutHeader(self.line_number));
                }
                symbols.extend(line.chars().filter(|c| !c.is_whitespace()));
            }
        }
    }
}

/// Splits a header into identifier and description.
fn record(header: String, symbols: String) -> RawRecord {
    let (name, description) = match header.split_once(char::is_whitespace) {
        Some((id, rest)) => {
            let rest = rest.trim();
            (id.to_string(), (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (header, None),
    };
    RawRecord {
        name: Some(name),
        description,
        symbols,
    }
}

/// Parses FASTA content from a reader.
///
/// With an explicit `alphabet` every record must be expressible in it.
/// Otherwise one alphabet is inferred from all records.
pub fn parse_fasta<R: BufRead>(reader: R, alphabet: Option<&Alphabet>) -> FastaResult<SeqList> {
    let records = FastaRecords::new(reader).collect::<FastaResult<Vec<_>>>()?;
    if records.is_empty() {
        return Err(FastaError::EmptyFile);
    }
    bind_records(records, alphabet).map_err(|(name, source)| FastaError::Alphabet { name, source })
}

/// Parses FASTA content from a string.
///
/// Useful for testing or processing in-memory data.
pub fn parse_fasta_str(content: &str, alphabet: Option<&Alphabet>) -> FastaResult<SeqList> {
    parse_fasta(content.as_bytes(), alphabet)
}

/// Writes `seqs` as FASTA, wrapping sequences at `line_width` columns.
///
/// Every record needs a name free of whitespace.
pub fn write_fasta<W: Write + ?Sized>(
    writer: &mut W,
    seqs: &SeqList,
    line_width: usize,
) -> FastaResult<()> {
    if line_width == 0 {
        return Err(FastaError::Unwritable("line width must be positive".to_string()));
    }
    let names = record_names(seqs, false).map_err(FastaError::Unwritable)?;

    for (name, seq) in names.into_iter().zip(seqs) {
        match seq.description() {
            Some(description) => writeln!(writer, ">{name} {description}")?,
            None => writeln!(writer, ">{name}")?,
        }
        for line in seq.as_str().as_bytes().chunks(line_width) {
            writer.write_all(line)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
