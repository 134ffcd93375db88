//! A format that reads nothing and writes nothing.

use std::io::{BufRead, Write};

use crate::alphabet::Alphabet;
use crate::formats::{FileFormat, ParseResult, SeqFormat, SeqIter};
use crate::seq_list::SeqList;

/// Ignores its input and discards output. Never offered to auto-detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullFormat;

impl SeqFormat for NullFormat {
    fn format(&self) -> FileFormat {
        FileFormat::Null
    }

    fn read(&self, _reader: &mut dyn BufRead, _alphabet: Option<&Alphabet>) -> ParseResult<SeqList> {
        Ok(SeqList::new())
    }

    fn write(&self, _writer: &mut dyn Write, _seqs: &SeqList) -> ParseResult<()> {
        Ok(())
    }

    fn iterseq<'a>(
        &self,
        _reader: Box<dyn BufRead + 'a>,
        _alphabet: Option<&Alphabet>,
    ) -> SeqIter<'a> {
        Box::new(std::iter::empty())
    }
}
