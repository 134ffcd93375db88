//! Clustal multiple alignment format.
//!
//! ## Layout
//!
//! ```text
//! CLUSTAL W (1.83) multiple sequence alignment
//!
//!
//! CYS1_DICDI      -----MKVILLFVLAVFTVFVSS---------------RGIPPEEQ----
//! ALEU_HORVU      MAHARVLLLALAVLATAAVAVASSSSFADSNPIRPVTDRAASTLESAVLG 50
//!                           .: .:.:.*   .
//!
//! CYS1_DICDI      ---------------------SQFYLVLGGLI
//! ALEU_HORVU      ALGRTRHALRFARFAVRYGKSYESAAEVRRRF
//! ```
//!
//! - The header line is optional. When present it is the first non-blank
//!   line and starts with `CLUSTAL` or `MUSCLE`.
//! - Blocks are separated by blank lines. Each record line holds a name,
//!   whitespace, a chunk of the alignment and an optional residue count.
//! - Every chunk of a block has the same length.
//! - Conservation lines are indented and contain only `*`, `:` and `.`.
//!   They close the record lines of their block. The first block must hold
//!   at least one record line.
//! - The first block fixes the record names and their order. Later blocks
//!   must list the same names, in any order, and chunks are appended by
//!   name.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use log::{debug, trace};
use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::error::SeqError;
use crate::formats::{
    bind_records, deferred, numbered_lines, record_names, FileFormat, ParseResult, RawRecord,
    SeqFormat, SeqIter,
};
use crate::seq_list::SeqList;

/// Prefixes that identify a Clustal header line.
pub const HEADER_SIGNATURES: [&str; 2] = ["CLUSTAL", "MUSCLE"];

/// Header written by [`write_clustal`].
pub const DEFAULT_HEADER: &str = "CLUSTAL W (1.83) multiple sequence alignment";

/// Alignment columns per block when writing.
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// The name column is at least this wide, separator included.
const MIN_NAME_COLUMN: usize = 16;

/// Symbols of a conservation line.
const CONSERVATION_MARKS: [char; 3] = ['*', ':', '.'];

/// Errors that can occur during Clustal parsing and writing.
#[derive(Error, Debug)]
pub enum ClustalError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty Clustal input")]
    EmptyFile,

    #[error("No sequences found")]
    NoSequences,

    #[error("Line {line}: not Clustal ({reason})")]
    ForeignFormat { line: usize, reason: &'static str },

    #[error("Line {line}: cannot parse '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("Line {line}: '{content}' looks like a conservation line but is not indented")]
    AmbiguousLine { line: usize, content: String },

    #[error("Line {line}: sequence line after the conservation line of its block")]
    LineAfterAnnotation { line: usize },

    #[error("Line {line}: record '{name}' has {found} columns in this block, expected {expected}")]
    RaggedBlock {
        line: usize,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("First block, ending at line {line}, holds only conservation lines")]
    EmptyFirstBlock { line: usize },

    #[error("Line {line}: duplicate record '{name}' in block")]
    DuplicateRecord { line: usize, name: String },

    #[error("Line {line}: record '{name}' not present in the first block")]
    UnknownRecord { line: usize, name: String },

    #[error("Block ending at line {line} is missing record '{name}'")]
    MissingRecord { line: usize, name: String },

    #[error("Record '{name}': {source}")]
    Alphabet { name: String, source: SeqError },

    #[error("Cannot write Clustal output: {0}")]
    Unwritable(String),
}

/// Result type for Clustal operations.
pub type ClustalResult<T> = Result<T, ClustalError>;

/// Clustal reader and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClustalFormat {
    line_width: usize,
}

impl ClustalFormat {
    pub const fn new() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    /// Sets the number of alignment columns per written block.
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }
}

impl Default for ClustalFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl SeqFormat for ClustalFormat {
    fn format(&self) -> FileFormat {
        FileFormat::Clustal
    }

    fn read(&self, reader: &mut dyn BufRead, alphabet: Option<&Alphabet>) -> ParseResult<SeqList> {
        Ok(read_clustal(reader, alphabet)?)
    }

    fn write(&self, writer: &mut dyn Write, seqs: &SeqList) -> ParseResult<()> {
        Ok(write_clustal(writer, seqs, self.line_width)?)
    }

    fn iterseq<'a>(
        &self,
        mut reader: Box<dyn BufRead + 'a>,
        alphabet: Option<&Alphabet>,
    ) -> SeqIter<'a> {
        // Records are complete only after the last block
        let alphabet = alphabet.cloned();
        deferred(move || Ok(read_clustal(&mut *reader, alphabet.as_ref())?))
    }
}

/// Where the parser stands between two input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing but blank lines seen so far.
    Start,
    /// Past the header or a block, waiting for the next block.
    BetweenBlocks,
    /// Inside a block.
    InBlock,
}

/// Bookkeeping for the block being read.
#[derive(Debug, Default)]
struct Block {
    /// Records seen in this block, by index into the first block's names.
    seen: Vec<bool>,
    /// Sequence lines read.
    lines: usize,
    /// Chunk length of the first sequence line; every line must match it.
    width: Option<usize>,
    /// A conservation line has been read.
    annotated: bool,
}

/// Line-driven Clustal parser.
#[derive(Debug)]
struct ClustalParser {
    state: State,
    header: Option<String>,
    names: Vec<String>,
    index: HashMap<String, usize>,
    chunks: Vec<String>,
    block: Block,
    blocks: usize,
    last_line: usize,
}

impl ClustalParser {
    fn new() -> Self {
        Self {
            state: State::Start,
            header: None,
            names: Vec::new(),
            index: HashMap::new(),
            chunks: Vec::new(),
            block: Block::default(),
            blocks: 0,
            last_line: 0,
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) -> ClustalResult<()> {
        self.last_line = line_no;
        let blank = line.trim().is_empty();

        if self.state == State::Start {
            if blank {
                return Ok(());
            }
            self.state = State::BetweenBlocks;
            if is_header(line) {
                self.header = Some(line.trim().to_string());
                return Ok(());
            }
        }

        if blank {
            if self.state == State::InBlock {
                self.end_block(line_no)?;
                self.state = State::BetweenBlocks;
            }
            return Ok(());
        }

        if self.state == State::BetweenBlocks {
            self.block = Block {
                seen: vec![false; self.names.len()],
                ..Block::default()
            };
            self.state = State::InBlock;
        }
        self.block_line(line_no, line)
    }

    fn block_line(&mut self, line_no: usize, line: &str) -> ClustalResult<()> {
        let trimmed = line.trim();

        if trimmed.starts_with('>') {
            return Err(ClustalError::ForeignFormat {
                line: line_no,
                reason: "FASTA record marker '>'",
            });
        }

        if trimmed.chars().all(|c| c.is_whitespace() || CONSERVATION_MARKS.contains(&c)) {
            if !line.starts_with(char::is_whitespace) {
                return Err(ClustalError::AmbiguousLine {
                    line: line_no,
                    content: trimmed.to_string(),
                });
            }
            self.block.annotated = true;
            return Ok(());
        }

        if self.block.annotated {
            return Err(ClustalError::LineAfterAnnotation { line: line_no });
        }

        let (name, chunk) = split_record_line(trimmed).ok_or_else(|| ClustalError::MalformedLine {
            line: line_no,
            content: trimmed.to_string(),
        })?;

        let found = chunk.len();
        match self.block.width {
            Some(expected) if expected != found => {
                return Err(ClustalError::RaggedBlock {
                    line: line_no,
                    name: name.to_string(),
                    expected,
                    found,
                });
            }
            Some(_) => {}
            None => self.block.width = Some(found),
        }

        if self.blocks == 0 {
            if self.index.contains_key(name) {
                return Err(ClustalError::DuplicateRecord {
                    line: line_no,
                    name: name.to_string(),
                });
            }
            self.index.insert(name.to_string(), self.names.len());
            self.names.push(name.to_string());
            self.chunks.push(chunk.to_string());
        } else {
            let index = *self.index.get(name).ok_or_else(|| ClustalError::UnknownRecord {
                line: line_no,
                name: name.to_string(),
            })?;
            if self.block.seen[index] {
                return Err(ClustalError::DuplicateRecord {
                    line: line_no,
                    name: name.to_string(),
                });
            }
            self.block.seen[index] = true;
            self.chunks[index].push_str(chunk);
        }

        self.block.lines += 1;
        Ok(())
    }

    fn end_block(&mut self, line_no: usize) -> ClustalResult<()> {
        // A later block of conservation lines only carries no records
        if self.block.lines == 0 {
            if self.blocks == 0 {
                return Err(ClustalError::EmptyFirstBlock { line: line_no });
            }
            return Ok(());
        }

        if self.blocks > 0 {
            if let Some(missing) = self.block.seen.iter().position(|seen| !seen) {
                return Err(ClustalError::MissingRecord {
                    line: line_no,
                    name: self.names[missing].clone(),
                });
            }
        }

        self.blocks += 1;
        trace!(
            "Clustal block {} ends at line {} ({} records)",
            self.blocks,
            line_no,
            self.block.lines
        );
        Ok(())
    }

    fn finish(mut self) -> ClustalResult<Vec<RawRecord>> {
        match self.state {
            State::Start => return Err(ClustalError::EmptyFile),
            State::InBlock => self.end_block(self.last_line)?,
            State::BetweenBlocks => {}
        }

        if self.names.is_empty() {
            return Err(ClustalError::NoSequences);
        }

        debug!(
            "Clustal input: {} records in {} blocks, header {:?}",
            self.names.len(),
            self.blocks,
            self.header
        );

        Ok(self
            .names
            .into_iter()
            .zip(self.chunks)
            .map(|(name, symbols)| RawRecord {
                name: Some(name),
                description: None,
                symbols,
            })
            .collect())
    }
}

/// False for names the reader takes for a FASTA marker or a conservation
/// line.
fn is_readable_name(name: &str) -> bool {
    !name.starts_with('>') && !name.chars().all(|c| CONSERVATION_MARKS.contains(&c))
}

fn is_header(line: &str) -> bool {
    HEADER_SIGNATURES.iter().any(|sig| line.starts_with(sig))
}

/// Splits a sequence line into name and chunk, dropping a trailing residue
/// count.
fn split_record_line(line: &str) -> Option<(&str, &str)> {
    let mut fields = line.split_whitespace();
    let name = fields.next()?;
    let chunk = fields.next()?;
    match fields.next() {
        None => Some((name, chunk)),
        Some(count) if count.bytes().all(|b| b.is_ascii_digit()) && fields.next().is_none() => {
            Some((name, chunk))
        }
        Some(_) => None,
    }
}

/// Parses a Clustal alignment.
///
/// With an explicit `alphabet` every record must be expressible in it and
/// the error names the first record that is not. Otherwise the alphabet is
/// inferred from all records.
pub fn read_clustal<R: BufRead + ?Sized>(
    reader: &mut R,
    alphabet: Option<&Alphabet>,
) -> ClustalResult<SeqList> {
    let mut parser = ClustalParser::new();
    for line in numbered_lines(reader) {
        let (line_no, line) = line?;
        parser.feed(line_no, &line)?;
    }

    let records = parser.finish()?;
    bind_records(records, alphabet).map_err(|(name, source)| ClustalError::Alphabet { name, source })
}

/// Parses a Clustal alignment held in memory.
pub fn parse_clustal_str(content: &str, alphabet: Option<&Alphabet>) -> ClustalResult<SeqList> {
    read_clustal(&mut content.as_bytes(), alphabet)
}

/// Writes `seqs` as a Clustal alignment with `line_width` columns per block.
///
/// Records must be named, with unique names free of whitespace that do not
/// start with `>` or consist of conservation marks only, and must form a
/// non-empty alignment.
pub fn write_clustal<W: Write + ?Sized>(
    writer: &mut W,
    seqs: &SeqList,
    line_width: usize,
) -> ClustalResult<()> {
    if line_width == 0 {
        return Err(ClustalError::Unwritable("line width must be positive".to_string()));
    }
    if seqs.is_empty() {
        return Err(ClustalError::Unwritable("no sequences".to_string()));
    }
    let names = record_names(seqs, true).map_err(ClustalError::Unwritable)?;
    if let Some(name) = names.iter().find(|name| !is_readable_name(name)) {
        return Err(ClustalError::Unwritable(format!(
            "record name '{name}' would read back as a marker line"
        )));
    }
    let length = match seqs.alignment_length() {
        Some(0) => return Err(ClustalError::Unwritable("sequences are empty".to_string())),
        Some(length) => length,
        None => {
            return Err(ClustalError::Unwritable(
                "sequences differ in length".to_string(),
            ))
        }
    };

    let name_width = names
        .iter()
        .map(|name| name.len() + 1)
        .max()
        .unwrap_or(0)
        .max(MIN_NAME_COLUMN);

    writeln!(writer, "{DEFAULT_HEADER}")?;
    writeln!(writer)?;
    for start in (0..length).step_by(line_width) {
        let end = (start + line_width).min(length);
        writeln!(writer)?;
        for (name, seq) in names.iter().zip(seqs) {
            writeln!(writer, "{name:<name_width$}{}", &seq.as_str()[start..end])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{DNA_ALPHABET, NUCLEIC_ALPHABET, PROTEIN_ALPHABET};
    use crate::seq::Seq;
    use std::fs;
    use std::path::Path;

    fn fixture(name: &str) -> String {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data").join(name);
        fs::read_to_string(path).unwrap()
    }

    const SMALL: &str = "CLUSTAL W (1.83) multiple sequence alignment

seq_a           ACGTAC
seq_b           AC-TAC
                ** ***

seq_a           GG
seq_b           GA
                *.
";

    #[test]
    fn test_parse_small() {
        let seqs = parse_clustal_str(SMALL, None).unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].name(), Some("seq_a"));
        assert_eq!(seqs[0].as_str(), "ACGTACGG");
        assert_eq!(seqs[1].as_str(), "AC-TACGA");
        assert_eq!(seqs.alphabet(), Some(&*DNA_ALPHABET));
    }

    #[test]
    fn test_parse_fixture() {
        let seqs = parse_clustal_str(&fixture("clustal.aln"), None).unwrap();
        assert_eq!(seqs.len(), 7);
        assert_eq!(seqs[1].name(), Some("CATH_HUMAN"));
        assert_eq!(seqs[1].len(), 395);
        assert!(seqs.is_aligned());
        assert_eq!(seqs.alphabet(), Some(&*PROTEIN_ALPHABET));
    }

    #[test]
    fn test_parse_headerless() {
        let seqs = parse_clustal_str(&fixture("clustal_headerless.aln"), None).unwrap();
        assert_eq!(seqs.len(), 5);
        assert_eq!(seqs[2].name(), Some("O16386_CAEEL"));
        assert_eq!(seqs.alignment_length(), Some(137));
    }

    #[test]
    fn test_header_is_optional() {
        let content = fixture("clustal.aln");
        let without_header: String = content.lines().skip(1).map(|l| format!("{l}\n")).collect();
        assert_eq!(
            parse_clustal_str(&content, None).unwrap(),
            parse_clustal_str(&without_header, None).unwrap()
        );
    }

    #[test]
    fn test_muscle_header() {
        let content = SMALL.replace("CLUSTAL W (1.83)", "MUSCLE (3.8)");
        assert_eq!(parse_clustal_str(&content, None).unwrap().len(), 2);
    }

    #[test]
    fn test_residue_counts_ignored() {
        let seqs = parse_clustal_str(&fixture("clustal_counts.aln"), None).unwrap();
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs.alignment_length(), Some(100));
        assert_eq!(seqs[1].name(), Some("chr1_b"));
        assert_eq!(&seqs[1].as_str()[40..43], "---");
        assert_eq!(seqs.alphabet(), Some(&*DNA_ALPHABET));
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = fixture("clustal.aln");
        let crlf = content.replace('\n', "\r\n");
        assert_eq!(
            parse_clustal_str(&content, None).unwrap(),
            parse_clustal_str(&crlf, None).unwrap()
        );
    }

    #[test]
    fn test_explicit_alphabet() {
        let content = fixture("clustal.aln");
        let seqs = parse_clustal_str(&content, Some(&*PROTEIN_ALPHABET)).unwrap();
        assert_eq!(seqs.alphabet(), Some(&*PROTEIN_ALPHABET));

        match parse_clustal_str(&content, Some(&*NUCLEIC_ALPHABET)) {
            Err(ClustalError::Alphabet { name, source }) => {
                assert_eq!(name, "CYS1_DICDI");
                assert!(matches!(source, SeqError::NotInAlphabet { .. }));
            }
            other => panic!("expected alphabet error, got {other:?}"),
        }
    }

    #[test]
    fn test_later_blocks_any_order() {
        let content = "seq_a ACGT\nseq_b TTTT\n\nseq_b GG\nseq_a CC\n";
        let seqs = parse_clustal_str(content, None).unwrap();
        assert_eq!(seqs[0].as_str(), "ACGTCC");
        assert_eq!(seqs[1].as_str(), "TTTTGG");
    }

    #[test]
    fn test_annotation_only_blocks_skipped() {
        let content = "seq_a ACGT\nseq_b TTTT\n\n   ***\n\nseq_a CC\nseq_b GG\n";
        let seqs = parse_clustal_str(content, None).unwrap();
        assert_eq!(seqs[0].as_str(), "ACGTCC");
    }

    #[test]
    fn test_reject_fasta() {
        let err = parse_clustal_str(">seq_a\nACGT\n", None).unwrap_err();
        assert!(matches!(err, ClustalError::ForeignFormat { line: 1, .. }));
    }

    #[test]
    fn test_reject_plain() {
        let err = parse_clustal_str("ACGTACGT\nACGT\n", None).unwrap_err();
        assert!(matches!(err, ClustalError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_reject_extra_fields() {
        let err = parse_clustal_str("seq_a ACGT more\n", None).unwrap_err();
        assert!(matches!(err, ClustalError::MalformedLine { .. }));
    }

    #[test]
    fn test_unindented_conservation_line() {
        let err = parse_clustal_str("seq_a ACGT\nseq_b ACGT\n****\n", None).unwrap_err();
        assert!(matches!(err, ClustalError::AmbiguousLine { line: 3, .. }));
    }

    #[test]
    fn test_line_after_annotation() {
        let err = parse_clustal_str("seq_a ACGT\n    ****\nseq_b ACGT\n", None).unwrap_err();
        assert!(matches!(err, ClustalError::LineAfterAnnotation { line: 3 }));
    }

    #[test]
    fn test_unknown_record() {
        let content = "seq_a ACGT\nseq_b TTTT\n\nseq_a CC\nseq_c GG\n";
        let err = parse_clustal_str(content, None).unwrap_err();
        assert!(matches!(err, ClustalError::UnknownRecord { line: 5, ref name } if name == "seq_c"));
    }

    #[test]
    fn test_missing_record() {
        let content = "seq_a ACGT\nseq_b TTTT\n\nseq_a CC\n\nseq_a GG\nseq_b GG\n";
        let err = parse_clustal_str(content, None).unwrap_err();
        assert!(matches!(err, ClustalError::MissingRecord { line: 5, ref name } if name == "seq_b"));

        // At end of input
        let err = parse_clustal_str("seq_a AC\nseq_b AC\n\nseq_b GG", None).unwrap_err();
        assert!(matches!(err, ClustalError::MissingRecord { ref name, .. } if name == "seq_a"));
    }

    #[test]
    fn test_duplicate_record() {
        let err = parse_clustal_str("seq_a ACGT\nseq_a TTTT\n", None).unwrap_err();
        assert!(matches!(err, ClustalError::DuplicateRecord { line: 2, .. }));

        let content = "seq_a ACGT\nseq_b TTTT\n\nseq_a CC\nseq_a GG\n";
        let err = parse_clustal_str(content, None).unwrap_err();
        assert!(matches!(err, ClustalError::DuplicateRecord { line: 5, .. }));
    }

    const TABLE: &str = "
EC0001\tMKRISTTITTTITITTGNGAG
EC0002\tMRVLKFGGTSVANAERFLRVADILESNARQGQ
EC0003\tMVKVYAPASSANMSVGFDVLGAAVTP
";

    #[test]
    fn test_reject_table() {
        let err = parse_clustal_str(TABLE, None).unwrap_err();
        assert!(matches!(
            err,
            ClustalError::RaggedBlock { line: 3, ref name, expected: 21, found: 32 } if name == "EC0002"
        ));
    }

    #[test]
    fn test_ragged_later_block() {
        let content = "seq_a ACGT\nseq_b TTTT\n\nseq_a CC\nseq_b GGG\n";
        let err = parse_clustal_str(content, None).unwrap_err();
        assert!(matches!(err, ClustalError::RaggedBlock { line: 5, expected: 2, found: 3, .. }));
    }

    #[test]
    fn test_reject_fasta_file() {
        let err = parse_clustal_str(&fixture("globin.fa"), None).unwrap_err();
        assert!(matches!(err, ClustalError::ForeignFormat { line: 1, .. }));
    }

    #[test]
    fn test_first_block_needs_records() {
        let content = "CLUSTAL W\n\n    ***\n\nseq_a AC\nseq_b AC\n";
        let err = parse_clustal_str(content, None).unwrap_err();
        assert!(matches!(err, ClustalError::EmptyFirstBlock { line: 4 }));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_clustal_str("", None), Err(ClustalError::EmptyFile)));
        assert!(matches!(parse_clustal_str("\n  \n", None), Err(ClustalError::EmptyFile)));
        assert!(matches!(
            parse_clustal_str("CLUSTAL W (1.83) multiple sequence alignment\n\n\n", None),
            Err(ClustalError::NoSequences)
        ));
    }

    #[test]
    fn test_write_layout() {
        let seqs = SeqList::from_seqs(vec![
            Seq::new("ACGTAC", None).unwrap().with_name("a"),
            Seq::new("AC-TAC", None).unwrap().with_name("b"),
        ]);
        let mut out = Vec::new();
        write_clustal(&mut out, &seqs, 4).unwrap();
        let expected = "CLUSTAL W (1.83) multiple sequence alignment\n\n\n\
                        a               ACGT\n\
                        b               AC-T\n\
                        \n\
                        a               AC\n\
                        b               AC\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_write_long_names() {
        let seqs = SeqList::from_seqs(vec![
            Seq::new("ACGT", None).unwrap().with_name("a_rather_long_name"),
            Seq::new("ACGT", None).unwrap().with_name("b"),
        ]);
        let mut out = Vec::new();
        write_clustal(&mut out, &seqs, DEFAULT_LINE_WIDTH).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("a_rather_long_name ACGT\n"));
        assert!(text.contains("b                  ACGT\n"));
    }

    #[test]
    fn test_round_trip() {
        let seqs = parse_clustal_str(&fixture("clustal.aln"), None).unwrap();
        let mut out = Vec::new();
        ClustalFormat::new()
            .with_line_width(50)
            .write(&mut out, &seqs)
            .unwrap();

        let again = read_clustal(&mut out.as_slice(), None).unwrap();
        assert_eq!(again, seqs);
        let names: Vec<_> = again.iter().map(|s| s.name()).collect();
        let expected: Vec<_> = seqs.iter().map(|s| s.name()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_write_rejects() {
        let unnamed = SeqList::from_seqs(vec![Seq::new("ACGT", None).unwrap()]);
        assert!(matches!(
            write_clustal(&mut Vec::new(), &unnamed, 60),
            Err(ClustalError::Unwritable(_))
        ));

        let ragged = SeqList::from_seqs(vec![
            Seq::new("ACGT", None).unwrap().with_name("a"),
            Seq::new("AC", None).unwrap().with_name("b"),
        ]);
        assert!(matches!(
            write_clustal(&mut Vec::new(), &ragged, 60),
            Err(ClustalError::Unwritable(_))
        ));

        let spaced = SeqList::from_seqs(vec![Seq::new("ACGT", None).unwrap().with_name("a b")]);
        assert!(write_clustal(&mut Vec::new(), &spaced, 60).is_err());
        assert!(write_clustal(&mut Vec::new(), &SeqList::new(), 60).is_err());

        let fine = SeqList::from_seqs(vec![Seq::new("ACGT", None).unwrap().with_name("a")]);
        assert!(write_clustal(&mut Vec::new(), &fine, 0).is_err());
    }

    #[test]
    fn test_write_rejects_marker_names() {
        for name in [">seq_a", "**", ":.*"] {
            let seqs = SeqList::from_seqs(vec![
                Seq::new("ACGT", None).unwrap().with_name(name),
                Seq::new("ACGT", None).unwrap().with_name("seq_b"),
            ]);
            assert!(matches!(
                write_clustal(&mut Vec::new(), &seqs, 60),
                Err(ClustalError::Unwritable(_))
            ));
        }

        let seqs = SeqList::from_seqs(vec![
            Seq::new("ACGT", None).unwrap().with_name("a>b"),
            Seq::new("ACGT", None).unwrap().with_name("*x"),
        ]);
        let mut out = Vec::new();
        write_clustal(&mut out, &seqs, 60).unwrap();
        assert_eq!(read_clustal(&mut out.as_slice(), None).unwrap().len(), 2);
    }

    #[test]
    fn test_iterseq() {
        let reader = Box::new(SMALL.as_bytes());
        let names: Vec<_> = ClustalFormat::new()
            .iterseq(reader, None)
            .map(|seq| seq.unwrap().name().map(str::to_string))
            .collect();
        assert_eq!(names, vec![Some("seq_a".to_string()), Some("seq_b".to_string())]);

        let mut items = ClustalFormat::new().iterseq(Box::new(">x\nACGT\n".as_bytes()), None);
        assert!(items.next().unwrap().is_err());
        assert!(items.next().is_none());
    }
}
