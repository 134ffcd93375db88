//! Ordered collections of sequences.
//!
//! A [`SeqList`] keeps records in the order they were added (for parsed
//! files, the order of the records in the file) and can carry an alphabet
//! shared by all members. Aggregate queries ([`SeqList::ords`],
//! [`SeqList::tally`], [`SeqList::profile`]) resolve their alphabet as:
//! explicit argument, then the shared alphabet, then fail.

use std::ops::Index;
use std::slice;

use crate::alphabet::Alphabet;
use crate::error::{SeqError, SeqResult};
use crate::seq::Seq;

/// An ordered collection of sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeqList {
    seqs: Vec<Seq>,
    alphabet: Option<Alphabet>,
    /// Collection name
    pub name: Option<String>,
    /// Collection description
    pub description: Option<String>,
}

impl SeqList {
    /// Creates an empty list without a shared alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list without a shared alphabet.
    pub fn from_seqs(seqs: Vec<Seq>) -> Self {
        Self {
            seqs,
            ..Self::default()
        }
    }

    /// Creates an empty list with a shared alphabet.
    pub fn shared(alphabet: &Alphabet) -> Self {
        Self {
            alphabet: Some(alphabet.clone()),
            ..Self::default()
        }
    }

    /// Creates a list whose members must all be expressible in `alphabet`.
    pub fn with_alphabet(seqs: Vec<Seq>, alphabet: &Alphabet) -> SeqResult<Self> {
        let mut list = Self::shared(alphabet);
        list.extend(seqs)?;
        Ok(list)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The shared alphabet, if one was declared.
    pub fn alphabet(&self) -> Option<&Alphabet> {
        self.alphabet.as_ref()
    }

    /// Appends `seq`, checking it against the shared alphabet.
    pub fn push(&mut self, seq: Seq) -> SeqResult<()> {
        if let Some(alphabet) = &self.alphabet {
            check_members(alphabet, seq.as_str())?;
        }
        self.seqs.push(seq);
        Ok(())
    }

    /// Appends every sequence of `seqs`; stops at the first rejected one.
    pub fn extend<I: IntoIterator<Item = Seq>>(&mut self, seqs: I) -> SeqResult<()> {
        for seq in seqs {
            self.push(seq)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Seq> {
        self.seqs.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Seq> {
        self.seqs.iter()
    }

    pub fn as_slice(&self) -> &[Seq] {
        &self.seqs
    }

    pub fn into_vec(self) -> Vec<Seq> {
        self.seqs
    }

    /// True if all members have the same length. Empty and single-member
    /// lists are aligned.
    pub fn is_aligned(&self) -> bool {
        match self.seqs.split_first() {
            Some((first, rest)) => rest.iter().all(|s| s.len() == first.len()),
            None => true,
        }
    }

    /// The common length of an aligned, non-empty list.
    pub fn alignment_length(&self) -> Option<usize> {
        match self.seqs.first() {
            Some(first) if self.is_aligned() => Some(first.len()),
            _ => None,
        }
    }

    fn resolve<'a>(&'a self, alphabet: Option<&'a Alphabet>) -> SeqResult<&'a Alphabet> {
        alphabet
            .or(self.alphabet.as_ref())
            .ok_or(SeqError::NoAlphabet)
    }

    /// Ordinal encoding of every member.
    pub fn ords(&self, alphabet: Option<&Alphabet>) -> SeqResult<Vec<Vec<usize>>> {
        let alphabet = self.resolve(alphabet)?;
        self.seqs.iter().map(|s| alphabet.ords(s.as_str())).collect()
    }

    /// Total count of each symbol across all members.
    ///
    /// Unlike [`Seq::tally`], every symbol must belong to the resolved
    /// alphabet. Alignment is not required.
    pub fn tally(&self, alphabet: Option<&Alphabet>) -> SeqResult<Vec<usize>> {
        let alphabet = self.resolve(alphabet)?;
        let mut counts = vec![0; alphabet.len()];
        for seq in &self.seqs {
            for ord in alphabet.ords(seq.as_str())? {
                counts[ord] += 1;
            }
        }
        Ok(counts)
    }

    /// Per-column symbol counts of an aligned list.
    pub fn profile(&self, alphabet: Option<&Alphabet>) -> SeqResult<Profile> {
        let alphabet = self.resolve(alphabet)?;
        if !self.is_aligned() {
            let lengths = self.seqs.iter().map(Seq::len);
            return Err(SeqError::NotAligned {
                min: lengths.clone().min().unwrap_or(0),
                max: lengths.max().unwrap_or(0),
            });
        }

        let columns = self.alignment_length().unwrap_or(0);
        let mut counts = vec![vec![0; alphabet.len()]; columns];
        for seq in &self.seqs {
            for (column, ord) in alphabet.ords(seq.as_str())?.into_iter().enumerate() {
                counts[column][ord] += 1;
            }
        }

        Ok(Profile {
            alphabet: alphabet.clone(),
            counts,
        })
    }
}

fn check_members(alphabet: &Alphabet, symbols: &str) -> SeqResult<()> {
    match symbols.chars().enumerate().find(|&(_, c)| !alphabet.contains(c)) {
        Some((position, symbol)) => Err(alphabet.not_in_alphabet(symbol, position)),
        None => Ok(()),
    }
}

impl Index<usize> for SeqList {
    type Output = Seq;

    fn index(&self, index: usize) -> &Seq {
        &self.seqs[index]
    }
}

impl<'a> IntoIterator for &'a SeqList {
    type Item = &'a Seq;
    type IntoIter = slice::Iter<'a, Seq>;

    fn into_iter(self) -> Self::IntoIter {
        self.seqs.iter()
    }
}

impl IntoIterator for SeqList {
    type Item = Seq;
    type IntoIter = std::vec::IntoIter<Seq>;

    fn into_iter(self) -> Self::IntoIter {
        self.seqs.into_iter()
    }
}

impl FromIterator<Seq> for SeqList {
    fn from_iter<I: IntoIterator<Item = Seq>>(iter: I) -> Self {
        Self::from_seqs(iter.into_iter().collect())
    }
}

/// Column-by-column symbol counts, see [`SeqList::profile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    alphabet: Alphabet,
    counts: Vec<Vec<usize>>,
}

impl Profile {
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Counts for `column`, one per alphabet symbol in ordinal order.
    pub fn column(&self, column: usize) -> Option<&[usize]> {
        self.counts.get(column).map(Vec::as_slice)
    }

    /// Count of `symbol` (after synonym folding) in `column`.
    pub fn count(&self, column: usize, symbol: char) -> Option<usize> {
        let ord = self.alphabet.ord(symbol)?;
        self.counts.get(column).map(|counts| counts[ord])
    }

    pub fn columns(&self) -> impl Iterator<Item = &[usize]> {
        self.counts.iter().map(Vec::as_slice)
    }
}
