//! PHYLIP format parser and writer.
//!
//! Supports both sequential and interleaved PHYLIP formats.
//!
//! ## PHYLIP Format
//!
//! The first line contains the number of sequences and the sequence length:
//! ```text
//!  3 10
//! ```
//!
//! ### Sequential Format
//! Each sequence name (10 chars, padded) followed by all its data, which may
//! continue on the following lines:
//! ```text
//!  3 10
//! Seq1      ACGTACGTAC
//! Seq2      TGCATGCATG
//! Seq3      AAAACCCCGG
//! ```
//!
//! ### Interleaved Format
//! Names on first block, then data continues in subsequent blocks:
//! ```text
//!  3 20
//! Seq1      ACGTACGTAC
//! Seq2      TGCATGCATG
//! Seq3      AAAACCCCGG
//!
//! GTGTGTGTGT
//! CACACACACA
//! TTTTTTTTTT
//! ```
//!
//! ## Strictness
//!
//! The file must hold exactly `ntax` records of exactly `nchar` symbols.
//! Names may be shorter than 10 characters when followed by whitespace.

use std::io::{BufRead, Write};

use log::trace;
use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::error::SeqError;
use crate::formats::{
    bind_records, deferred, numbered_lines, record_names, FileFormat, ParseResult, RawRecord,
    SeqFormat, SeqIter,
};
use crate::seq_list::SeqList;

/// Width of the name field in strict PHYLIP.
pub const NAME_WIDTH: usize = 10;

/// Errors that can occur during PHYLIP parsing and writing.
#[derive(Error, Debug)]
pub enum PhylipError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty PHYLIP file")]
    EmptyFile,

    #[error("Invalid header: expected 'ntax nchar' (two integers), got '{0}'")]
    InvalidHeader(String),

    #[error("Invalid sequence count in header: '{0}' is not a valid number")]
    InvalidSequenceCount(String),

    #[error("Invalid sequence length in header: '{0}' is not a valid number")]
    InvalidSequenceLength(String),

    #[error("Expected {expected} sequences but found {found}")]
    SequenceCountMismatch { expected: usize, found: usize },

    #[error("Sequence '{name}' has length {found}, expected {expected}")]
    SequenceLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("No sequence data found after header")]
    NoSequenceData,

    #[error("Line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Record '{name}': {source}")]
    Alphabet { name: String, source: SeqError },

    #[error("Cannot write PHYLIP output: {0}")]
    Unwritable(String),
}

/// Result type for PHYLIP operations.
pub type PhylipResult<T> = Result<T, PhylipError>;

/// PHYLIP reader and writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhylipFormat;

impl SeqFormat for PhylipFormat {
    fn format(&self) -> FileFormat {
        FileFormat::Phylip
    }

    fn read(&self, reader: &mut dyn BufRead, alphabet: Option<&Alphabet>) -> ParseResult<SeqList> {
        Ok(parse_phylip(reader, alphabet)?)
    }

    fn write(&self, writer: &mut dyn Write, seqs: &SeqList) -> ParseResult<()> {
        Ok(write_phylip(writer, seqs)?)
    }

    fn iterseq<'a>(
        &self,
        mut reader: Box<dyn BufRead + 'a>,
        alphabet: Option<&Alphabet>,
    ) -> SeqIter<'a> {
        // Interleaved records are complete only at the end of the input
        let alphabet = alphabet.cloned();
        deferred(move || Ok(parse_phylip(&mut *reader, alphabet.as_ref())?))
    }
}

type Line = (usize, String);

/// Parses PHYLIP content from a reader.
pub fn parse_phylip<R: BufRead + ?Sized>(
    reader: &mut R,
    alphabet: Option<&Alphabet>,
) -> PhylipResult<SeqList> {
    let lines = numbered_lines(reader).collect::<Result<Vec<Line>, _>>()?;

    // Find the header line (first non-empty line)
    let header_idx = lines
        .iter()
        .position(|(_, line)| !line.trim().is_empty())
        .ok_or(PhylipError::EmptyFile)?;
    let (ntax, nchar) = parse_header(&lines[header_idx].1)?;

    let data_lines = &lines[header_idx + 1..];
    if data_lines.iter().all(|(_, l)| l.trim().is_empty()) {
        return Err(PhylipError::NoSequenceData);
    }

    let records = parse_phylip_data(data_lines, ntax, nchar)?;
    bind_records(records, alphabet).map_err(|(name, source)| PhylipError::Alphabet { name, source })
}

/// Parses PHYLIP content from a string.
pub fn parse_phylip_str(content: &str, alphabet: Option<&Alphabet>) -> PhylipResult<SeqList> {
    parse_phylip(&mut content.as_bytes(), alphabet)
}

/// Parses the "ntax nchar" header.
fn parse_header(header: &str) -> PhylipResult<(usize, usize)> {
    let header = header.trim();
    let parts: Vec<&str> = header.split_whitespace().collect();

    if parts.len() < 2 {
        return Err(PhylipError::InvalidHeader(header.to_string()));
    }

    let ntax: usize = parts[0]
        .parse()
        .map_err(|_| PhylipError::InvalidSequenceCount(parts[0].to_string()))?;

    let nchar: usize = parts[1]
        .parse()
        .map_err(|_| PhylipError::InvalidSequenceLength(parts[1].to_string()))?;

    if ntax == 0 {
        return Err(PhylipError::InvalidSequenceCount("0".to_string()));
    }
    if nchar == 0 {
        return Err(PhylipError::InvalidSequenceLength("0".to_string()));
    }
    Ok((ntax, nchar))
}

/// Splits the first line of a record into name and sequence parts.
///
/// A whitespace-separated name may be of any length. A single token longer
/// than [`NAME_WIDTH`] is a strict PHYLIP line whose name fills the first
/// 10 columns.
fn split_name_and_sequence(line: &str) -> (String, String) {
    let line = line.trim();
    let mut tokens = line.split_whitespace();
    let first = tokens.next().unwrap_or_default();

    if first.len() > NAME_WIDTH && first.len() == line.len() {
        if let (Some(name), Some(seq)) = (line.get(..NAME_WIDTH), line.get(NAME_WIDTH..)) {
            return (name.to_string(), seq.to_string());
        }
    }

    (first.to_string(), tokens.collect())
}

/// Checks if a character is a valid sequence character.
fn is_sequence_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '-' | '.' | '*' | '?' | '~')
}

fn sequence_chars(line: &str) -> impl Iterator<Item = char> + '_ {
    line.chars().filter(|c| !c.is_whitespace())
}

/// Parses PHYLIP data lines. Handles both sequential and interleaved formats.
///
/// The sequential layout is tried first; when it does not account for every
/// line, the interleaved one is tried.
fn parse_phylip_data(lines: &[Line], ntax: usize, nchar: usize) -> PhylipResult<Vec<RawRecord>> {
    match parse_sequential(lines, ntax, nchar) {
        Ok(records) => Ok(records),
        Err(sequential) => {
            trace!("PHYLIP data is not sequential ({sequential}), trying interleaved");
            parse_interleaved(lines, ntax, nchar).map_err(|interleaved| {
                if has_block_break(lines, ntax) {
                    interleaved
                } else {
                    sequential
                }
            })
        }
    }
}

fn data_lines(lines: &[Line]) -> impl Iterator<Item = &Line> {
    lines.iter().filter(|(_, line)| !line.trim().is_empty())
}

/// True if a blank line follows the first `ntax` data lines, the mark of an
/// interleaved file.
fn has_block_break(lines: &[Line], ntax: usize) -> bool {
    let mut seen = 0;
    for (index, (_, line)) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        seen += 1;
        if seen == ntax {
            return lines
                .get(index + 1)
                .map_or(false, |(_, next)| next.trim().is_empty());
        }
    }
    false
}

/// Reads the named first line of a record.
fn start_record((line_no, line): &Line, records: &[RawRecord]) -> PhylipResult<RawRecord> {
    let (name, symbols) = split_name_and_sequence(line);
    if !symbols.chars().all(is_sequence_char) {
        return Err(PhylipError::ParseError {
            line: *line_no,
            message: format!("'{}' is not sequence data", symbols),
        });
    }
    if records.iter().any(|r| r.name.as_deref() == Some(name.as_str())) {
        return Err(PhylipError::ParseError {
            line: *line_no,
            message: format!("duplicate sequence name '{}'", name),
        });
    }
    Ok(RawRecord {
        name: Some(name),
        description: None,
        symbols,
    })
}

/// Appends a continuation line to `record`.
fn extend_record(record: &mut RawRecord, (line_no, line): &Line) -> PhylipResult<()> {
    let start = record.symbols.len();
    record.symbols.extend(sequence_chars(line));
    if !record.symbols[start..].chars().all(is_sequence_char) {
        return Err(PhylipError::ParseError {
            line: *line_no,
            message: format!("'{}' is not sequence data", line.trim()),
        });
    }
    Ok(())
}

fn check_lengths(records: &[RawRecord], nchar: usize) -> PhylipResult<()> {
    match records.iter().find(|r| r.symbols.len() != nchar) {
        Some(record) => Err(PhylipError::SequenceLengthMismatch {
            name: record.name.clone().unwrap_or_default(),
            expected: nchar,
            found: record.symbols.len(),
        }),
        None => Ok(()),
    }
}

fn parse_sequential(lines: &[Line], ntax: usize, nchar: usize) -> PhylipResult<Vec<RawRecord>> {
    let mut data = data_lines(lines);
    let mut records: Vec<RawRecord> = Vec::with_capacity(ntax);

    while records.len() < ntax {
        let Some(first) = data.next() else {
            return Err(PhylipError::SequenceCountMismatch {
                expected: ntax,
                found: records.len(),
            });
        };
        let mut record = start_record(first, &records)?;
        while record.symbols.len() < nchar {
            match data.next() {
                Some(line) => extend_record(&mut record, line)?,
                None => break,
            }
        }
        records.push(record);
    }

    if let Some((line_no, _)) = data.next() {
        return Err(PhylipError::ParseError {
            line: *line_no,
            message: format!("data after the last of {} sequences", ntax),
        });
    }
    check_lengths(&records, nchar)?;
    Ok(records)
}

fn parse_interleaved(lines: &[Line], ntax: usize, nchar: usize) -> PhylipResult<Vec<RawRecord>> {
    let mut data = data_lines(lines);
    let mut records: Vec<RawRecord> = Vec::with_capacity(ntax);

    for line in data.by_ref().take(ntax) {
        let record = start_record(line, &records)?;
        records.push(record);
    }
    if records.len() < ntax {
        return Err(PhylipError::SequenceCountMismatch {
            expected: ntax,
            found: records.len(),
        });
    }

    for (index, line) in data.enumerate() {
        extend_record(&mut records[index % ntax], line)?;
    }
    check_lengths(&records, nchar)?;
    Ok(records)
}

/// Writes `seqs` as sequential PHYLIP.
///
/// Names shorter than 10 characters are padded to the strict name width;
/// longer ones are followed by a single space.
pub fn write_phylip<W: Write + ?Sized>(writer: &mut W, seqs: &SeqList) -> PhylipResult<()> {
    if seqs.is_empty() {
        return Err(PhylipError::Unwritable("no sequences".to_string()));
    }
    let names = record_names(seqs, true).map_err(PhylipError::Unwritable)?;
    let nchar = match seqs.alignment_length() {
        Some(0) => return Err(PhylipError::Unwritable("sequences are empty".to_string())),
        Some(nchar) => nchar,
        None => {
            return Err(PhylipError::Unwritable(
                "sequences differ in length".to_string(),
            ))
        }
    };

    writeln!(writer, " {} {}", seqs.len(), nchar)?;
    for (name, seq) in names.into_iter().zip(seqs) {
        if name.len() < NAME_WIDTH {
            writeln!(writer, "{name:<NAME_WIDTH$}{}", seq.as_str())?;
        } else {
            writeln!(writer, "{name} {}", seq.as_str())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{DNA_ALPHABET, PROTEIN_ALPHABET, UNAMBIGUOUS_DNA_ALPHABET};
    use crate::seq::Seq;
    use std::path::Path;

    #[test]
    fn test_parse_sequential_simple() {
        let content = " 3 10
Seq1      ACGTACGTAC
Seq2      TGCATGCATG
Seq3      AAAACCCCGG
";
        let seqs = parse_phylip_str(content, None).unwrap();
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs[0].name(), Some("Seq1"));
        assert_eq!(seqs[0].as_str(), "ACGTACGTAC");
        assert_eq!(seqs[1].name(), Some("Seq2"));
        assert_eq!(seqs[2].name(), Some("Seq3"));
        assert_eq!(seqs.alphabet(), Some(&*UNAMBIGUOUS_DNA_ALPHABET));
    }

    #[test]
    fn test_parse_sequential_multiline() {
        let content = " 2 20
Seq1      ACGTACGTAC
GGGGG GGGGG
Seq2      TGCATGCATG
CCCCCCCCCC
";
        let seqs = parse_phylip_str(content, None).unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].as_str(), "ACGTACGTACGGGGGGGGGG");
        assert_eq!(seqs[1].as_str(), "TGCATGCATGCCCCCCCCCC");
    }

    #[test]
    fn test_parse_interleaved() {
        let content = " 3 20
Seq1      ACGTACGTAC
Seq2      TGCATGCATG
Seq3      AAAACCCCGG

GGGGGGGGGG
CCCCCCCCCC
TTTTTTTTTT
";
        let seqs = parse_phylip_str(content, None).unwrap();
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs[0].as_str(), "ACGTACGTACGGGGGGGGGG");
        assert_eq!(seqs[1].as_str(), "TGCATGCATGCCCCCCCCCC");
        assert_eq!(seqs[2].as_str(), "AAAACCCCGGTTTTTTTTTT");
    }

    #[test]
    fn test_parse_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data/primates.phy");
        let content = std::fs::read_to_string(path).unwrap();
        let seqs = parse_phylip_str(&content, None).unwrap();
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs[1].name(), Some("Chimp"));
        assert_eq!(seqs.alignment_length(), Some(100));
        assert_eq!(seqs.alphabet(), Some(&*DNA_ALPHABET));
    }

    #[test]
    fn test_parse_relaxed_names() {
        // Names shorter than 10 chars, using whitespace as delimiter
        let content = "3 10
seq1 ACGTACGTAC
a_longer_name TGCATGCATG
seq3 AAAACCCCGG
";
        let seqs = parse_phylip_str(content, None).unwrap();
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs[0].name(), Some("seq1"));
        assert_eq!(seqs[1].name(), Some("a_longer_name"));
    }

    #[test]
    fn test_parse_strict_full_width_names() {
        let content = "2 4\nSequence_1ACGT\nSequence_2ACGA\n";
        let seqs = parse_phylip_str(content, None).unwrap();
        assert_eq!(seqs[0].name(), Some("Sequence_1"));
        assert_eq!(seqs[1].as_str(), "ACGA");
    }

    #[test]
    fn test_parse_with_gaps() {
        let content = " 2 10
Seq1      ACGT--GTAC
Seq2      TG--TGCATG
";
        let seqs = parse_phylip_str(content, None).unwrap();
        assert_eq!(seqs[0].as_str(), "ACGT--GTAC");
        assert_eq!(seqs[1].as_str(), "TG--TGCATG");
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = " 2 4\nSeq1      ACGT\nSeq2      ACGA\n";
        assert_eq!(
            parse_phylip_str(content, None).unwrap(),
            parse_phylip_str(&content.replace('\n', "\r\n"), None).unwrap()
        );
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_phylip_str("", None), Err(PhylipError::EmptyFile)));
        assert!(matches!(parse_phylip_str(" 2 4\n\n", None), Err(PhylipError::NoSequenceData)));
    }

    #[test]
    fn test_invalid_header() {
        let content = "not a valid header
Seq1 ACGT
";
        // "not" can't be parsed as a number, so we get InvalidSequenceCount
        assert!(matches!(
            parse_phylip_str(content, None),
            Err(PhylipError::InvalidSequenceCount(_))
        ));

        // Test with single token header (truly invalid format)
        let content2 = "invalid
Seq1 ACGT
";
        assert!(matches!(
            parse_phylip_str(content2, None),
            Err(PhylipError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_too_few_sequences() {
        let content = " 3 10
Seq1      ACGTACGTAC
Seq2      TGCATGCATG
";
        assert!(matches!(
            parse_phylip_str(content, None),
            Err(PhylipError::SequenceCountMismatch { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_wrong_length() {
        let content = " 2 10
Seq1      ACGTACGTAC
Seq2      TGCATGCA
";
        assert!(matches!(
            parse_phylip_str(content, None),
            Err(PhylipError::SequenceLengthMismatch { expected: 10, found: 8, .. })
        ));
    }

    #[test]
    fn test_trailing_data() {
        let content = " 1 4\nSeq1 ACGT\nSeq2 ACGT\n";
        assert!(parse_phylip_str(content, None).is_err());
    }

    #[test]
    fn test_rejects_clustal() {
        let content = "CLUSTAL W (1.83) multiple sequence alignment\n\nseq_a ACGT\n";
        assert!(parse_phylip_str(content, None).is_err());
    }

    #[test]
    fn test_explicit_alphabet() {
        let content = " 1 4\nSeq1 MKVL\n";
        assert!(parse_phylip_str(content, Some(&*PROTEIN_ALPHABET)).is_ok());
        assert!(matches!(
            parse_phylip_str(content, Some(&*DNA_ALPHABET)),
            Err(PhylipError::Alphabet { ref name, .. }) if name == "Seq1"
        ));
    }

    #[test]
    fn test_write_and_round_trip() {
        let seqs = SeqList::from_seqs(vec![
            Seq::new("ACGT-A", None).unwrap().with_name("short"),
            Seq::new("ACGTTA", None).unwrap().with_name("a_long_name_1"),
        ]);
        let mut out = Vec::new();
        write_phylip(&mut out, &seqs).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, " 2 6\nshort     ACGT-A\na_long_name_1 ACGTTA\n");

        let again = parse_phylip_str(&text, None).unwrap();
        assert_eq!(again[0].name(), Some("short"));
        assert_eq!(again[1].name(), Some("a_long_name_1"));
        assert_eq!(again[1].as_str(), "ACGTTA");
    }

    #[test]
    fn test_write_rejects() {
        assert!(write_phylip(&mut Vec::new(), &SeqList::new()).is_err());
        let ragged = SeqList::from_seqs(vec![
            Seq::new("ACGT", None).unwrap().with_name("a"),
            Seq::new("AC", None).unwrap().with_name("b"),
        ]);
        assert!(matches!(
            write_phylip(&mut Vec::new(), &ragged),
            Err(PhylipError::Unwritable(_))
        ));
    }

    #[test]
    fn test_iterseq() {
        let content = " 2 4\nSeq1 ACGT\nSeq2 ACGA\n";
        let names: Vec<_> = PhylipFormat
            .iterseq(Box::new(content.as_bytes()), None)
            .map(|seq| seq.unwrap().name().map(str::to_string))
            .collect();
        assert_eq!(names, vec![Some("Seq1".to_string()), Some("Seq2".to_string())]);
    }
}
