//! Plain sequence format: bare symbols, no names.
//!
//! All non-blank lines form one unnamed sequence. Whitespace anywhere in a
//! line is ignored. A line starting with `>` marks FASTA input and is
//! rejected.

use std::io::{BufRead, Write};

use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::error::SeqError;
use crate::formats::{
    bind_records, deferred, numbered_lines, FileFormat, ParseResult, RawRecord, SeqFormat, SeqIter,
};
use crate::seq_list::SeqList;

#[derive(Error, Debug)]
pub enum PlainError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No sequence data")]
    EmptyFile,

    #[error("Line {0}: FASTA header in plain sequence input")]
    FastaHeader(usize),

    #[error("{0}")]
    Alphabet(#[source] SeqError),
}

pub type PlainResult<T> = Result<T, PlainError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainFormat;

impl SeqFormat for PlainFormat {
    fn format(&self) -> FileFormat {
        FileFormat::Plain
    }

    fn read(&self, reader: &mut dyn BufRead, alphabet: Option<&Alphabet>) -> ParseResult<SeqList> {
        Ok(read_plain(reader, alphabet)?)
    }

    fn write(&self, writer: &mut dyn Write, seqs: &SeqList) -> ParseResult<()> {
        Ok(write_plain(writer, seqs)?)
    }

    fn iterseq<'a>(
        &self,
        mut reader: Box<dyn BufRead + 'a>,
        alphabet: Option<&Alphabet>,
    ) -> SeqIter<'a> {
        let alphabet = alphabet.cloned();
        deferred(move || Ok(read_plain(&mut *reader, alphabet.as_ref())?))
    }
}

/// Reads all lines as a single unnamed sequence.
pub fn read_plain<R: BufRead + ?Sized>(
    reader: &mut R,
    alphabet: Option<&Alphabet>,
) -> PlainResult<SeqList> {
    let mut symbols = String::new();
    for line in numbered_lines(reader) {
        let (line_no, line) = line?;
        let line = line.trim();
        if line.starts_with('>') {
            return Err(PlainError::FastaHeader(line_no));
        }
        symbols.extend(line.chars().filter(|c| !c.is_whitespace()));
    }

    if symbols.is_empty() {
        return Err(PlainError::EmptyFile);
    }

    let record = RawRecord {
        symbols,
        ..RawRecord::default()
    };
    bind_records(vec![record], alphabet).map_err(|(_, source)| PlainError::Alphabet(source))
}

/// Writes each sequence's symbols on a line of its own.
///
/// Reading the output back yields one sequence, the concatenation.
pub fn write_plain<W: Write + ?Sized>(writer: &mut W, seqs: &SeqList) -> PlainResult<()> {
    for seq in seqs {
        writeln!(writer, "{}", seq.as_str())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{DNA_ALPHABET, PROTEIN_ALPHABET, UNAMBIGUOUS_DNA_ALPHABET};
    use crate::seq::Seq;

    const EXAMPLE: &str = "
// Lines containing non-sequence characters are not rejected as such
ACGTACGTAC GTACGTACGT
  ACGT

TTTT
";

    #[test]
    fn test_read() {
        let seqs = read_plain(&mut "ACGT ACGT\n\nGG\r\n".as_bytes(), None).unwrap();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].as_str(), "ACGTACGTGG");
        assert_eq!(seqs[0].name(), None);
        assert_eq!(seqs.alphabet(), Some(&*UNAMBIGUOUS_DNA_ALPHABET));
    }

    #[test]
    fn test_read_generic_text() {
        let seqs = read_plain(&mut EXAMPLE.as_bytes(), None).unwrap();
        assert!(seqs[0].as_str().starts_with("//Lines"));
        assert!(seqs[0].as_str().ends_with("ACGTTTTT"));
    }

    #[test]
    fn test_read_rejects_fasta() {
        let result = read_plain(&mut "ACGT\n>seq\nACGT\n".as_bytes(), None);
        assert!(matches!(result, Err(PlainError::FastaHeader(2))));
    }

    #[test]
    fn test_read_empty() {
        assert!(matches!(read_plain(&mut "".as_bytes(), None), Err(PlainError::EmptyFile)));
        assert!(matches!(read_plain(&mut "\n \n".as_bytes(), None), Err(PlainError::EmptyFile)));
    }

    #[test]
    fn test_explicit_alphabet() {
        let mut input = "MKVL\n".as_bytes();
        assert!(read_plain(&mut input, Some(&*PROTEIN_ALPHABET)).is_ok());
        let mut input = "MKVL\n".as_bytes();
        assert!(matches!(
            read_plain(&mut input, Some(&*DNA_ALPHABET)),
            Err(PlainError::Alphabet(SeqError::NotInAlphabet { position: 3, .. }))
        ));
    }

    #[test]
    fn test_write() {
        let seqs = SeqList::from_seqs(vec![
            Seq::new("ACGT", None).unwrap(),
            Seq::new("GG", None).unwrap(),
        ]);
        let mut out = Vec::new();
        PlainFormat.write(&mut out, &seqs).unwrap();
        assert_eq!(out, b"ACGT\nGG\n");

        let again = read_plain(&mut out.as_slice(), None).unwrap();
        assert_eq!(again[0].as_str(), "ACGTGG");
    }
}
