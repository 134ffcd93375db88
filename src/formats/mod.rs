//! Sequence file formats and the format dispatcher.
//!
//! Every format implements [`SeqFormat`]: a reader producing a [`SeqList`],
//! a writer, and a lazy per-record iterator. Supported formats:
//! - Clustal (.aln, .clustal, .clw)
//! - FASTA (.fasta, .fa, .fna, .faa, .fas)
//! - PHYLIP (.phy, .phylip), sequential and interleaved
//! - Plain, one unnamed sequence (content detection only)
//! - Null, which reads nothing and discards writes
//!
//! Format resolution when reading a file:
//! 1. Explicit format (-f option)
//! 2. File extension
//! 3. Trial parse with every registered format, in [`DETECTION_ORDER`]

pub mod clustal;
pub mod fasta;
pub mod null;
pub mod phylip;
pub mod plain;

use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::iter;
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};
use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::error::SeqError;
use crate::seq::Seq;
use crate::seq_list::SeqList;

use clustal::ClustalFormat;
use fasta::FastaFormat;
use null::NullFormat;
use phylip::PhylipFormat;
use plain::PlainFormat;

/// Known file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Clustal,
    Fasta,
    Phylip,
    Plain,
    Null,
}

impl FileFormat {
    /// Every format, registered or not.
    pub const ALL: [FileFormat; 5] = [
        FileFormat::Clustal,
        FileFormat::Fasta,
        FileFormat::Phylip,
        FileFormat::Plain,
        FileFormat::Null,
    ];

    /// Lower case name accepted by [`FromStr`] and the command line.
    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Clustal => "clustal",
            FileFormat::Fasta => "fasta",
            FileFormat::Phylip => "phylip",
            FileFormat::Plain => "plain",
            FileFormat::Null => "null",
        }
    }

    /// Default handler for this format.
    pub fn handler(self) -> &'static dyn SeqFormat {
        match self {
            FileFormat::Clustal => &CLUSTAL,
            FileFormat::Fasta => &FASTA,
            FileFormat::Phylip => &PHYLIP,
            FileFormat::Plain => &PLAIN,
            FileFormat::Null => &NULL,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Clustal => write!(f, "Clustal"),
            FileFormat::Fasta => write!(f, "FASTA"),
            FileFormat::Phylip => write!(f, "PHYLIP"),
            FileFormat::Plain => write!(f, "plain"),
            FileFormat::Null => write!(f, "null"),
        }
    }
}

impl FromStr for FileFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clustal" | "clustalw" | "aln" => Ok(FileFormat::Clustal),
            "fasta" | "fa" | "pearson" => Ok(FileFormat::Fasta),
            "phylip" | "phy" => Ok(FileFormat::Phylip),
            "plain" | "raw" | "txt" => Ok(FileFormat::Plain),
            "null" => Ok(FileFormat::Null),
            other => Err(ParseError::UnknownFormatName(other.to_string())),
        }
    }
}

/// Errors that can occur while reading or writing sequence files.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read input: {0}")]
    IoError(#[from] io::Error),

    #[error("Empty input")]
    EmptyFile,

    #[error("Could not determine the input format (tried {tried}).\n\
             Hint: Use -f/--format to specify the format explicitly")]
    NoFormatMatched { tried: String },

    #[error("Unknown format name '{0}'")]
    UnknownFormatName(String),

    #[error("Clustal error: {0}")]
    ClustalError(#[from] clustal::ClustalError),

    #[error("FASTA error: {0}")]
    FastaError(#[from] fasta::FastaError),

    #[error("PHYLIP error: {0}")]
    PhylipError(#[from] phylip::PhylipError),

    #[error("Plain format error: {0}")]
    PlainError(#[from] plain::PlainError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Lazily parsed records; a failure is reported as an `Err` item.
pub type SeqIter<'a> = Box<dyn Iterator<Item = ParseResult<Seq>> + 'a>;

/// Reader, writer and record iterator for one file format.
pub trait SeqFormat: Send + Sync {
    /// The format this handler implements.
    fn format(&self) -> FileFormat;

    /// Parses the whole input.
    ///
    /// With an explicit `alphabet`, every record must be expressible in it.
    /// Otherwise the alphabet is inferred from all records with
    /// [`Alphabet::which_all`]. Either way the returned list carries it as
    /// its shared alphabet.
    fn read(&self, reader: &mut dyn BufRead, alphabet: Option<&Alphabet>) -> ParseResult<SeqList>;

    /// Serializes `seqs`. The output parses back to the same records.
    fn write(&self, writer: &mut dyn Write, seqs: &SeqList) -> ParseResult<()>;

    /// Yields records one at a time. Formats whose records are only complete
    /// at the end of the input parse everything before the first item.
    fn iterseq<'a>(&self, reader: Box<dyn BufRead + 'a>, alphabet: Option<&Alphabet>)
        -> SeqIter<'a>;
}

static CLUSTAL: ClustalFormat = ClustalFormat::new();
static FASTA: FastaFormat = FastaFormat::new();
static PHYLIP: PhylipFormat = PhylipFormat;
static PLAIN: PlainFormat = PlainFormat;
static NULL: NullFormat = NullFormat;

/// Registered formats in the order auto-detection tries them. Formats with
/// distinctive markers come first; plain accepts almost anything and goes
/// last. Null is not registered since it accepts every input.
pub static DETECTION_ORDER: [&dyn SeqFormat; 4] = [&FASTA, &PHYLIP, &CLUSTAL, &PLAIN];

/// Detects format from file extension.
pub fn detect_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FileFormat> {
    let ext = path.as_ref().extension().and_then(OsStr::to_str)?;
    match ext.to_lowercase().as_str() {
        // FASTA extensions
        "fa" | "fas" | "fasta" | "fna" | "faa" | "ffn" | "frn" | "mfa" => Some(FileFormat::Fasta),
        // Clustal extensions
        "aln" | "clustal" | "clw" => Some(FileFormat::Clustal),
        // PHYLIP extensions
        "phy" | "phylip" | "ph" => Some(FileFormat::Phylip),
        // Plain is never hinted; .txt and .seq go through the full trial
        _ => None,
    }
}

/// Parses `content` with every registered format, returning the first
/// success and the format that produced it.
pub fn detect_and_parse(
    content: &str,
    alphabet: Option<&Alphabet>,
) -> ParseResult<(SeqList, FileFormat)> {
    if content.trim().is_empty() {
        return Err(ParseError::EmptyFile);
    }

    for handler in DETECTION_ORDER.iter() {
        let mut reader = content.as_bytes();
        match handler.read(&mut reader, alphabet) {
            Ok(seqs) => {
                info!("Input parsed as {} ({} records)", handler.format(), seqs.len());
                return Ok((seqs, handler.format()));
            }
            Err(e) => debug!("Input rejected as {}: {}", handler.format(), e),
        }
    }

    let tried = DETECTION_ORDER
        .iter()
        .map(|handler| handler.format().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ParseError::NoFormatMatched { tried })
}

/// Reads a whole input stream whose format is unknown.
///
/// The input is buffered and offered to each registered format in turn.
/// The first format that parses it without error wins.
pub fn read<R: Read>(mut reader: R, alphabet: Option<&Alphabet>) -> ParseResult<SeqList> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    read_str(&content, alphabet)
}

/// Like [`read`], for input already in memory.
pub fn read_str(content: &str, alphabet: Option<&Alphabet>) -> ParseResult<SeqList> {
    detect_and_parse(content, alphabet).map(|(seqs, _)| seqs)
}

/// Reads a whole input stream in a known format.
pub fn read_as<R: Read>(
    reader: R,
    format: FileFormat,
    alphabet: Option<&Alphabet>,
) -> ParseResult<SeqList> {
    let mut reader = BufReader::new(reader);
    format.handler().read(&mut reader, alphabet)
}

/// Writes `seqs` in `format`.
pub fn write<W: Write>(writer: &mut W, seqs: &SeqList, format: FileFormat) -> ParseResult<()> {
    format.handler().write(writer, seqs)
}

/// Parses a sequence file with optional format specification.
///
/// Detection priority:
/// 1. Explicit format (if provided)
/// 2. File extension
/// 3. Trial parse with every registered format
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    forced_format: Option<FileFormat>,
    alphabet: Option<&Alphabet>,
) -> ParseResult<(SeqList, FileFormat)> {
    let file = File::open(&path)?;
    let metadata = file.metadata()?;
    let file_size = metadata.len() as usize;

    if file_size == 0 {
        return Err(ParseError::EmptyFile);
    }

    let mut reader = BufReader::with_capacity(1024 * 1024, file);
    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content)?;

    // 1. Use explicit format if provided
    if let Some(format) = forced_format {
        let seqs = format.handler().read(&mut content.as_bytes(), alphabet)?;
        return Ok((seqs, format));
    }

    // 2. Try the format the extension suggests
    if let Some(format) = detect_format_from_extension(&path) {
        match format.handler().read(&mut content.as_bytes(), alphabet) {
            Ok(seqs) => return Ok((seqs, format)),
            Err(e) => debug!(
                "{} does not parse as {} despite its extension: {}",
                path.as_ref().display(),
                format,
                e
            ),
        }
    }

    // 3. Try all formats
    detect_and_parse(&content, alphabet)
}

/// Parses a sequence file, automatically detecting the format.
/// Convenience wrapper around parse_file_with_options.
pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<SeqList> {
    parse_file_with_options(path, None, None).map(|(seqs, _)| seqs)
}

/// Parses a sequence file whose records must all belong to `alphabet`
/// (inferred when `None`).
pub fn read_path<P: AsRef<Path>>(path: P, alphabet: Option<&Alphabet>) -> ParseResult<SeqList> {
    parse_file_with_options(path, None, alphabet).map(|(seqs, _)| seqs)
}

/// Parses a sequence file with explicit format specification.
pub fn parse_file_as<P: AsRef<Path>>(path: P, format: FileFormat) -> ParseResult<SeqList> {
    parse_file_with_options(path, Some(format), None).map(|(seqs, _)| seqs)
}

/// Input lines numbered from 1, with `\n` or `\r\n` endings removed.
pub(crate) fn numbered_lines<R: BufRead + ?Sized>(
    reader: &mut R,
) -> impl Iterator<Item = io::Result<(usize, String)>> + '_ {
    reader.lines().enumerate().map(|(index, line)| {
        line.map(|mut line| {
            if line.ends_with('\r') {
                line.pop();
            }
            (index + 1, line)
        })
    })
}

/// A record as read from a file, before alphabet checking.
#[derive(Debug, Default)]
pub(crate) struct RawRecord {
    pub name: Option<String>,
    pub description: Option<String>,
    pub symbols: String,
}

impl RawRecord {
    /// Label used in error messages.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", index + 1),
        }
    }
}

/// Builds a list whose shared alphabet is `alphabet`, or the one inferred
/// from all records. A rejected record is returned with its label.
pub(crate) fn bind_records(
    records: Vec<RawRecord>,
    alphabet: Option<&Alphabet>,
) -> Result<SeqList, (String, SeqError)> {
    let alphabet = match alphabet {
        Some(alphabet) => alphabet.clone(),
        None => Alphabet::which_all(records.iter().map(|r| r.symbols.as_str())),
    };

    let mut seqs = SeqList::shared(&alphabet);
    for (index, record) in records.into_iter().enumerate() {
        let label = record.label(index);
        let seq = bind_record(record, &alphabet).map_err(|e| (label.clone(), e))?;
        seqs.push(seq).map_err(|e| (label, e))?;
    }
    Ok(seqs)
}

/// Builds one sequence over `alphabet`.
pub(crate) fn bind_record(record: RawRecord, alphabet: &Alphabet) -> Result<Seq, SeqError> {
    let mut seq = Seq::new(record.symbols, Some(alphabet))?;
    seq.name = record.name;
    seq.description = record.description;
    Ok(seq)
}

/// Names of every record, for formats that key records by name.
pub(crate) fn record_names(seqs: &SeqList, unique: bool) -> Result<Vec<&str>, String> {
    let mut names: Vec<&str> = Vec::with_capacity(seqs.len());
    for (index, seq) in seqs.iter().enumerate() {
        let name = match seq.name() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(format!("record #{} has no name", index + 1)),
        };
        if name.chars().any(char::is_whitespace) {
            return Err(format!("record name '{}' contains whitespace", name));
        }
        if unique && names.contains(&name) {
            return Err(format!("duplicate record name '{}'", name));
        }
        names.push(name);
    }
    Ok(names)
}

/// Iterator over a list parsed in one go on the first call to `next`.
pub(crate) fn deferred<'a, F>(parse: F) -> SeqIter<'a>
where
    F: FnOnce() -> ParseResult<SeqList> + 'a,
{
    Box::new(iter::once_with(parse).flat_map(|result| match result {
        Ok(seqs) => seqs.into_iter().map(Ok).collect::<Vec<_>>(),
        Err(e) => vec![Err(e)],
    }))
}
