//! Alphabet-bound sequences.
//!
//! A [`Seq`] is an immutable string of symbols that all belong to one
//! [`Alphabet`], plus an optional name and description. Every transformation
//! (slicing, reversing, complementing, translating, masking, gap removal,
//! case folding) returns a new `Seq`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use crate::alphabet::{Alphabet, DNA_ALPHABET, NUCLEIC_ALPHABET, PROTEIN_ALPHABET, RNA_ALPHABET};
use crate::error::{SeqError, SeqResult};
use crate::genetic_code::{GeneticCode, GENETIC_CODES};

/// Gap characters removed by [`Seq::ungap`].
pub const DEFAULT_GAPS: &str = "-.~";

/// Characters replaced by [`Seq::mask`]: lower case marks low-information
/// regions in masked sequence files.
pub const DEFAULT_MASKED: &str = "abcdefghijklmnopqrstuvwxyz";

/// Character written over masked positions by [`Seq::mask`].
pub const DEFAULT_MASK: char = 'X';

const COMPLEMENT_FROM: &str = "ACGTRYSWKMBDHVN-acgtUuryswkmbdhvnXx?.~";
const COMPLEMENT_TO: &str = "TGCAYRSWMKVHDBN-tgcaAayrswmkvhdbnXx?.~";

/// A sequence of symbols bound to an alphabet.
///
/// Equality compares symbols and alphabet; names and descriptions are
/// annotations and do not take part.
#[derive(Debug, Clone)]
pub struct Seq {
    symbols: String,
    alphabet: Alphabet,
    /// Record identifier (e.g. the Clustal name column or FASTA id)
    pub name: Option<String>,
    /// Free text description
    pub description: Option<String>,
}

/// Creates a sequence over [`DNA_ALPHABET`].
pub fn dna(symbols: &str) -> SeqResult<Seq> {
    Seq::new(symbols, Some(&*DNA_ALPHABET))
}

/// Creates a sequence over [`RNA_ALPHABET`].
pub fn rna(symbols: &str) -> SeqResult<Seq> {
    Seq::new(symbols, Some(&*RNA_ALPHABET))
}

/// Creates a sequence over [`PROTEIN_ALPHABET`].
pub fn protein(symbols: &str) -> SeqResult<Seq> {
    Seq::new(symbols, Some(&*PROTEIN_ALPHABET))
}

impl Seq {
    /// Creates a sequence, checking every symbol against `alphabet`
    /// (the generic alphabet when `None`).
    pub fn new(symbols: impl Into<String>, alphabet: Option<&Alphabet>) -> SeqResult<Self> {
        let alphabet = Alphabet::resolve(alphabet);
        let symbols = symbols.into();
        if let Some((position, symbol)) = symbols
            .chars()
            .enumerate()
            .find(|&(_, c)| !alphabet.contains(c))
        {
            return Err(alphabet.not_in_alphabet(symbol, position));
        }
        Ok(Self {
            symbols,
            alphabet,
            name: None,
            description: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds a sibling sequence from symbols already known to be valid,
    /// keeping the alphabet and annotations.
    fn derive(&self, symbols: String) -> Self {
        Self {
            symbols,
            alphabet: self.alphabet.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    /// Like [`Seq::derive`] but validates `symbols` against `alphabet`.
    fn derive_checked(&self, symbols: String, alphabet: &Alphabet) -> SeqResult<Self> {
        let mut seq = Seq::new(symbols, Some(alphabet))?;
        seq.name = self.name.clone();
        seq.description = self.description.clone();
        Ok(seq)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn as_str(&self) -> &str {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at `pos`.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.symbols.as_bytes().get(pos).map(|&b| char::from(b))
    }

    /// Ordinals of the symbols under the bound alphabet.
    pub fn ords(&self) -> Vec<usize> {
        self.symbols
            .chars()
            .filter_map(|c| self.alphabet.ord(c))
            .collect()
    }

    /// Counts each symbol of `alphabet` (the bound alphabet when `None`).
    ///
    /// Symbols outside a narrower alphabet are simply not counted.
    pub fn tally(&self, alphabet: Option<&Alphabet>) -> Vec<usize> {
        let alphabet = alphabet.unwrap_or(&self.alphabet);
        let mut counts = vec![0; alphabet.len()];
        for ord in self.symbols.chars().filter_map(|c| alphabet.ord(c)) {
            counts[ord] += 1;
        }
        counts
    }

    /// All length-`k` windows that are fully alphabetic under `alphabet`
    /// (the bound alphabet when `None`), in canonical form.
    ///
    /// The iterator is lazy; clone it or call `words` again to restart.
    pub fn words(&self, k: usize, alphabet: Option<&Alphabet>) -> Words<'_> {
        Words {
            symbols: self.symbols.as_bytes(),
            alphabet: alphabet.unwrap_or(&self.alphabet).clone(),
            k,
            pos: 0,
        }
    }

    /// Occurrences of each length-`k` word, sorted by word.
    pub fn word_count(&self, k: usize, alphabet: Option<&Alphabet>) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for word in self.words(k, alphabet) {
            *counts.entry(word).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Sub-sequence over `range`, clamped to the sequence bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.derive(self.symbols[start..end].to_string())
    }

    /// Appends `other` to this sequence; the result keeps this sequence's
    /// alphabet, so every symbol of `other` must belong to it.
    pub fn concat(&self, other: &Seq) -> SeqResult<Self> {
        let mut symbols = String::with_capacity(self.len() + other.len());
        symbols.push_str(&self.symbols);
        symbols.push_str(&other.symbols);
        self.derive_checked(symbols, &self.alphabet)
    }

    /// Joins `seqs` using this sequence as the separator, in this sequence's
    /// alphabet.
    pub fn join(&self, seqs: &[Seq]) -> SeqResult<Self> {
        let symbols = seqs
            .iter()
            .map(Seq::as_str)
            .collect::<Vec<_>>()
            .join(&self.symbols);
        Seq::new(symbols, Some(&self.alphabet))
    }

    pub fn reverse(&self) -> Self {
        self.derive(self.symbols.chars().rev().collect())
    }

    /// Complements each nucleotide, preserving case.
    ///
    /// Fails unless every letter of the bound alphabet is a nucleic symbol.
    pub fn complement(&self) -> SeqResult<Self> {
        if !NUCLEIC_ALPHABET.alphabetic(self.alphabet.letters()) {
            return Err(SeqError::NoComplement(self.alphabet.letters().to_string()));
        }
        // RNA alphabets have U in place of T
        let rna = !self.alphabet.contains('T') && self.alphabet.contains('U');
        let symbols = self
            .symbols
            .chars()
            .map(|c| match complement_symbol(c) {
                'T' if rna => 'U',
                't' if rna => 'u',
                other => other,
            })
            .collect();
        self.derive_checked(symbols, &self.alphabet)
    }

    pub fn reverse_complement(&self) -> SeqResult<Self> {
        Ok(self.complement()?.reverse())
    }

    /// Removes the [`DEFAULT_GAPS`] characters.
    pub fn ungap(&self) -> Self {
        self.ungap_with(DEFAULT_GAPS)
    }

    /// Removes every character found in `gaps`.
    pub fn ungap_with(&self, gaps: &str) -> Self {
        self.derive(self.symbols.chars().filter(|c| !gaps.contains(*c)).collect())
    }

    /// Replaces lower case (soft-masked) symbols with [`DEFAULT_MASK`].
    pub fn mask(&self) -> SeqResult<Self> {
        self.mask_with(DEFAULT_MASKED, DEFAULT_MASK)
    }

    /// Replaces every character found in `letters` with `mask`, which must
    /// belong to the bound alphabet.
    pub fn mask_with(&self, letters: &str, mask: char) -> SeqResult<Self> {
        if !self.alphabet.contains(mask) {
            return Err(self.alphabet.not_in_alphabet(mask, 0));
        }
        let symbols = self
            .symbols
            .chars()
            .map(|c| if letters.contains(c) { mask } else { c })
            .collect();
        Ok(self.derive(symbols))
    }

    pub fn lower(&self) -> SeqResult<Self> {
        self.derive_checked(self.symbols.to_ascii_lowercase(), &self.alphabet)
    }

    pub fn upper(&self) -> SeqResult<Self> {
        self.derive_checked(self.symbols.to_ascii_uppercase(), &self.alphabet)
    }

    /// Translates with the standard genetic code in the first frame.
    pub fn translate(&self) -> SeqResult<Self> {
        self.translate_with(GENETIC_CODES.standard(), 0)
    }

    /// Translates into [`PROTEIN_ALPHABET`] with `code`, starting at `frame`
    /// (0, 1 or 2).
    pub fn translate_with(&self, code: &GeneticCode, frame: usize) -> SeqResult<Self> {
        self.derive_checked(code.translate(&self.symbols, frame), &*PROTEIN_ALPHABET)
    }

    /// Back translates with the standard genetic code.
    pub fn back_translate(&self) -> SeqResult<Self> {
        self.back_translate_with(GENETIC_CODES.standard())
    }

    /// Back translates into [`DNA_ALPHABET`], one representative codon per
    /// residue.
    pub fn back_translate_with(&self, code: &GeneticCode) -> SeqResult<Self> {
        self.derive_checked(code.back_translate(&self.symbols), &*DNA_ALPHABET)
    }
}

fn complement_symbol(c: char) -> char {
    COMPLEMENT_FROM
        .chars()
        .zip(COMPLEMENT_TO.chars())
        .find_map(|(from, to)| (from == c).then_some(to))
        .unwrap_or(c)
}

impl PartialEq for Seq {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols && self.alphabet == other.alphabet
    }
}

impl Eq for Seq {}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbols)
    }
}

impl AsRef<str> for Seq {
    fn as_ref(&self) -> &str {
        &self.symbols
    }
}

/// Iterator over the alphabetic words of a sequence, see [`Seq::words`].
#[derive(Debug, Clone)]
pub struct Words<'a> {
    symbols: &'a [u8],
    alphabet: Alphabet,
    k: usize,
    pos: usize,
}

impl Iterator for Words<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.k == 0 {
            return None;
        }
        while self.pos + self.k <= self.symbols.len() {
            let window = &self.symbols[self.pos..self.pos + self.k];
            self.pos += 1;
            let word: Option<String> = window
                .iter()
                .map(|&b| self.alphabet.canonical(char::from(b)))
                .collect();
            if word.is_some() {
                return word;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{GENERIC_ALPHABET, UNAMBIGUOUS_DNA_ALPHABET};

    #[test]
    fn test_create_seq() {
        let a = Alphabet::new("alphbet").unwrap();
        assert!(Seq::new("alphabet", Some(&a)).is_ok());
        assert!(matches!(
            Seq::new("not alphabetic", Some(&a)),
            Err(SeqError::NotInAlphabet { symbol: 'n', position: 0, .. })
        ));

        let printable = "Any printable Ascii character `1234567890-=~!@#$%^&*()_+{}|[]\\:;'<>?,./QWERTYUIOPASD\
                         FGHJKLZXCVBNMqwertyuiopasdfghjklzxcvbnm ";
        assert!(printable.chars().all(|c| GENERIC_ALPHABET.contains(c)));
        assert!(Seq::new(printable, None).is_ok());
        assert!(Seq::new("Not zero. \0", None).is_err());
    }

    #[test]
    fn test_std_alphabets() {
        assert!(Seq::new("dskjjfskdjbfKJJSJKSKJDjk123u768erbm", None).is_ok());
        assert!(protein("ARNDCQEGHILKMFPSTWYVX").is_ok());
        assert!(protein("1234").is_err());
        let s = dna("AGTCAGCTACGACGCGC").unwrap();
        assert_eq!(s.char_at(1), Some('G'));
    }

    #[test]
    fn test_ords() {
        let a = Alphabet::new("ABC").unwrap();
        let s = Seq::new("ABCCBA", Some(&a)).unwrap();
        assert_eq!(s.ords(), vec![0, 1, 2, 2, 1, 0]);
    }

    #[test]
    fn test_tally() {
        let s = Seq::new("AGTCAGCTACGACGCGC", Some(&*UNAMBIGUOUS_DNA_ALPHABET)).unwrap();
        assert_eq!(s.tally(None), vec![4, 6, 5, 2]);
    }

    #[test]
    fn test_tally_narrower_alphabet() {
        let s = dna("AGTCAGCTACGACGCGC").unwrap();
        let ac = Alphabet::new("AC").unwrap();
        assert_eq!(s.tally(Some(&ac)), vec![4, 6]);
    }

    #[test]
    fn test_words() {
        let s = dna("AGTCAGCTACGACGcgcx").unwrap();
        let unambiguous = &*UNAMBIGUOUS_DNA_ALPHABET;
        let words: Vec<String> = s.words(2, Some(unambiguous)).collect();
        assert_eq!(words.len(), s.len() - 2);
        assert_eq!(
            words,
            vec![
                "AG", "GT", "TC", "CA", "AG", "GC", "CT", "TA", "AC", "CG", "GA", "AC", "CG",
                "GC", "CG", "GC"
            ]
        );

        assert_eq!(s.words(s.len(), Some(unambiguous)).count(), 0);
        assert_eq!(
            s.words(s.len() - 1, Some(unambiguous)).collect::<Vec<_>>(),
            vec!["AGTCAGCTACGACGCGC"]
        );
        assert_eq!(s.words(200, Some(unambiguous)).count(), 0);
        assert_eq!(s.words(0, None).count(), 0);
    }

    #[test]
    fn test_words_restartable() {
        let s = dna("ACGT").unwrap();
        let words = s.words(2, None);
        let first: Vec<String> = words.clone().collect();
        let second: Vec<String> = words.collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["AC", "CG", "GT"]);
    }

    #[test]
    fn test_word_count() {
        let s = Seq::new("AGTCAGCTACGACGCGC", Some(&*UNAMBIGUOUS_DNA_ALPHABET)).unwrap();
        let counts: Vec<usize> = s.word_count(2, None).into_iter().map(|(_, n)| n).collect();
        assert_eq!(counts, vec![2, 2, 1, 3, 1, 1, 3, 1, 1, 1]);
        assert_eq!(s.word_count(2, None)[0], ("AC".to_string(), 2));
    }

    #[test]
    fn test_slice() {
        let s = dna("ACGTRYSWKMBDHVN").unwrap();
        let sub = s.slice(4..6);
        assert_eq!(sub, dna("RY").unwrap());
        assert_eq!(sub.alphabet(), s.alphabet());
        assert_eq!(s.slice(10..100).as_str(), "BDHVN");
        assert!(s.slice(20..30).is_empty());
    }

    #[test]
    fn test_create_annotated() {
        let symbols = "ACGTURYSWKMBDHVNACGTURYSWKMBDHVNAAAAA";
        let s = Seq::new(symbols, Some(&*NUCLEIC_ALPHABET))
            .unwrap()
            .with_name("ID")
            .with_description("DESCRIPTION");
        assert_eq!(s.name(), Some("ID"));
        assert_eq!(s.description(), Some("DESCRIPTION"));
        assert_eq!(s.to_string(), symbols);
    }

    #[test]
    fn test_concat() {
        let s1 = dna("AAAA").unwrap();
        let s2 = dna("TTTT").unwrap();
        let s3 = s1.concat(&s2).unwrap();
        assert_eq!(s3.alphabet(), &*DNA_ALPHABET);
        assert_eq!(s3, dna("AAAATTTT").unwrap());
        assert_ne!(s3, protein("AAAATTTT").unwrap());

        let generic = Seq::new("AA!", None).unwrap();
        assert!(s1.concat(&generic).is_err());
    }

    #[test]
    fn test_join() {
        let s0 = dna("").unwrap();
        let parts = vec![
            dna("AAAA").unwrap(),
            dna("TTTT").unwrap(),
            Seq::new("GGGG", None).unwrap(),
        ];
        assert_eq!(s0.join(&parts).unwrap(), dna("AAAATTTTGGGG").unwrap());
        assert_eq!(dna("-").unwrap().join(&parts[..2]).unwrap().as_str(), "AAAA-TTTT");
    }

    #[test]
    fn test_display_preserves_case() {
        assert_eq!(dna("AGCTA").unwrap().to_string(), "AGCTA");
        assert_eq!(dna("AgcTA").unwrap().to_string(), "AgcTA");
    }

    #[test]
    fn test_reverse() {
        let s = dna("ACGT").unwrap();
        assert_eq!(s, s.reverse().reverse());
        assert_eq!(s.reverse(), dna("TGCA").unwrap());
    }

    #[test]
    fn test_translate() {
        let s = dna("GCCATTGTAATGGGCCGCTGAAAGGGTGCCCGA").unwrap();
        let p = s.translate().unwrap();
        assert_eq!(p.as_str(), "AIVMGR*KGAR");
        assert_eq!(p.alphabet(), &*PROTEIN_ALPHABET);

        let back = p.back_translate().unwrap();
        assert_eq!(back.alphabet(), &*DNA_ALPHABET);
        assert_eq!(back.len(), 33);
        assert_eq!(back.translate().unwrap(), p);
    }

    #[test]
    fn test_reverse_complement() {
        let s = dna("GGGGaaaaaaaatttatatat").unwrap();
        assert_eq!(
            s.reverse_complement().unwrap(),
            dna("atatataaattttttttCCCC").unwrap()
        );
        assert_eq!(
            dna("ACGTRYSWKMBDHVN").unwrap().reverse_complement().unwrap(),
            dna("NBDHVKMWSRYACGT").unwrap()
        );
        assert_eq!(
            rna("ACGU").unwrap().reverse_complement().unwrap(),
            rna("ACGU").unwrap()
        );
        assert!(matches!(
            protein("G").unwrap().reverse_complement(),
            Err(SeqError::NoComplement(_))
        ));
    }

    #[test]
    fn test_ungap() {
        assert_eq!(dna("T-T").unwrap().ungap().as_str(), "TT");
        assert_eq!(dna("T-~---T...~~~--").unwrap().ungap().as_str(), "TT");
        assert_eq!(dna("T-T.T").unwrap().ungap_with("-").as_str(), "TT.T");
    }

    #[test]
    fn test_mask() {
        let s = dna("AAaaaaAAA").unwrap();
        assert_eq!(s.mask().unwrap().as_str(), "AAXXXXAAA");
        assert_eq!(s.mask_with("A", 'N').unwrap().as_str(), "NNaaaaNNN");
        assert!(s.mask_with(DEFAULT_MASKED, '!').is_err());
    }

    #[test]
    fn test_shortcuts() {
        assert!(protein("gGGGGG-PPPPP").is_ok());
        assert!(dna("ACGTRYSWKMBDHVN").is_ok());
        assert!(dna("t").is_ok());
        assert!(dna("acgtrysw-kmb-dhvn").is_ok());
        assert!(rna("ACUUUUU").is_ok());
        assert!(dna("ACUUUUU").is_err());
    }

    #[test]
    fn test_case_change() {
        let s1 = dna("ACGTRYSWKMBDHVN").unwrap();
        let s2 = s1.lower().unwrap().upper().unwrap();
        assert_eq!(s1, s2);

        let strict = Alphabet::new("ACGT").unwrap();
        assert!(Seq::new("ACGT", Some(&strict)).unwrap().lower().is_err());
    }
}
