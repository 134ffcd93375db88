//! Alphabets of sequence symbols.
//!
//! An [`Alphabet`] is an ordered set of canonical ASCII symbols. Each symbol
//! has an ordinal (its position in the set), and an optional synonym table
//! folds alternate input characters (lower case, ambiguity spellings, gap
//! variants) onto a canonical symbol.
//!
//! The well-known alphabets are process-wide statics built on first use:
//!
//! | Static                        | Letters                          |
//! |-------------------------------|----------------------------------|
//! | [`GENERIC_ALPHABET`]          | printable ASCII (`' '..='~'`)    |
//! | [`PROTEIN_ALPHABET`]          | `ACDEFGHIKLMNOPQRSTUVWYBJZX*-`   |
//! | [`NUCLEIC_ALPHABET`]          | `ACGTURYSWKMBDHVN-`              |
//! | [`DNA_ALPHABET`]              | `GATCRYWSMKHBVDN-`               |
//! | [`RNA_ALPHABET`]              | `GAUCRYWSMKHBVDN-`               |
//! | [`UNAMBIGUOUS_DNA_ALPHABET`]  | `ACGT`                           |
//! | [`UNAMBIGUOUS_RNA_ALPHABET`]  | `ACGU`                           |
//! | [`UNAMBIGUOUS_PROTEIN_ALPHABET`] | `ACDEFGHIKLMNOPQRSTUVWY`      |

use std::fmt::{self, Write as _};
use std::sync::{Arc, LazyLock};

use crate::error::{SeqError, SeqResult};
use crate::seq::Seq;

/// Number of entries in the ordinal lookup table (the ASCII range).
const TABLE_SIZE: usize = 128;

/// Separates letters from synonym pairs in the string form.
const SYNONYM_SEPARATOR: char = '\0';

pub static GENERIC_ALPHABET: LazyLock<Alphabet> = LazyLock::new(|| {
    let letters: String = (b' '..=b'~').map(char::from).collect();
    standard(&letters, "", "")
});

pub static PROTEIN_ALPHABET: LazyLock<Alphabet> = LazyLock::new(|| {
    standard(
        "ACDEFGHIKLMNOPQRSTUVWYBJZX*-",
        "acdefghiklmnopqrstuvwybjzx?.~",
        "ACDEFGHIKLMNOPQRSTUVWYBJZXX--",
    )
});

pub static NUCLEIC_ALPHABET: LazyLock<Alphabet> = LazyLock::new(|| {
    standard(
        "ACGTURYSWKMBDHVN-",
        "acgturyswkmbdhvnXx?.~",
        "ACGTURYSWKMBDHVNNNN--",
    )
});

pub static DNA_ALPHABET: LazyLock<Alphabet> = LazyLock::new(|| {
    standard(
        "GATCRYWSMKHBVDN-",
        "gatcrywsmkhbvdnxX.~",
        "GATCRYWSMKHBVDNNN--",
    )
});

pub static RNA_ALPHABET: LazyLock<Alphabet> = LazyLock::new(|| {
    standard(
        "GAUCRYWSMKHBVDN-",
        "gaucrywsmkhbvdnxX.~",
        "GAUCRYWSMKHBVDNNN--",
    )
});

pub static UNAMBIGUOUS_DNA_ALPHABET: LazyLock<Alphabet> =
    LazyLock::new(|| standard("ACGT", "acgt", "ACGT"));

pub static UNAMBIGUOUS_RNA_ALPHABET: LazyLock<Alphabet> =
    LazyLock::new(|| standard("ACGU", "acgu", "ACGU"));

pub static UNAMBIGUOUS_PROTEIN_ALPHABET: LazyLock<Alphabet> = LazyLock::new(|| {
    standard(
        "ACDEFGHIKLMNOPQRSTUVWY",
        "acdefghiklmnopqrstuvwy",
        "ACDEFGHIKLMNOPQRSTUVWY",
    )
});

fn standard(letters: &str, alternates: &str, canonical: &str) -> Alphabet {
    let synonyms: Vec<(char, char)> = alternates.chars().zip(canonical.chars()).collect();
    Alphabet::with_synonyms(letters, &synonyms).expect("standard alphabet definitions are valid")
}

/// The standard alphabets in the order [`Alphabet::which`] tries them:
/// nucleic alphabets before protein ones, unambiguous before ambiguous.
pub fn standard_alphabets() -> [&'static Alphabet; 8] {
    [
        &*UNAMBIGUOUS_DNA_ALPHABET,
        &*UNAMBIGUOUS_RNA_ALPHABET,
        &*DNA_ALPHABET,
        &*RNA_ALPHABET,
        &*NUCLEIC_ALPHABET,
        &*UNAMBIGUOUS_PROTEIN_ALPHABET,
        &*PROTEIN_ALPHABET,
        &*GENERIC_ALPHABET,
    ]
}

struct AlphabetInner {
    letters: String,
    synonyms: Vec<(char, char)>,
    /// Maps an ASCII code to the ordinal of its canonical symbol.
    ord_table: [Option<u8>; TABLE_SIZE],
}

/// An immutable, cheaply clonable set of sequence symbols.
///
/// Clones share the same underlying table, so binding many sequences to one
/// alphabet costs a reference count, not a copy.
#[derive(Clone)]
pub struct Alphabet {
    inner: Arc<AlphabetInner>,
}

impl Alphabet {
    /// Creates an alphabet from its canonical letters.
    ///
    /// Fails if a letter is repeated, is the null character, or is not ASCII.
    pub fn new(letters: &str) -> SeqResult<Self> {
        Self::with_synonyms(letters, &[])
    }

    /// Creates an alphabet with synonyms, given as `(alternate, canonical)`
    /// pairs. Every canonical target must be one of `letters`.
    pub fn with_synonyms(letters: &str, synonyms: &[(char, char)]) -> SeqResult<Self> {
        let mut ord_table = [None; TABLE_SIZE];

        for (i, c) in letters.chars().enumerate() {
            let slot = table_index(c)?;
            if ord_table[slot].is_some() {
                return Err(SeqError::DuplicateSymbol(c));
            }
            ord_table[slot] = Some(i as u8);
        }

        for &(synonym, target) in synonyms {
            let target_ord = ord_table[table_index(target)?].ok_or(SeqError::DanglingSynonym {
                synonym,
                target,
            })?;
            let slot = table_index(synonym)?;
            if letters.contains(synonym) {
                return Err(SeqError::DuplicateSymbol(synonym));
            }
            ord_table[slot] = Some(target_ord);
        }

        Ok(Self {
            inner: Arc::new(AlphabetInner {
                letters: letters.to_string(),
                synonyms: synonyms.to_vec(),
                ord_table,
            }),
        })
    }

    /// Resolves an optional alphabet argument; `None` means the generic
    /// alphabet.
    pub fn resolve(alphabet: Option<&Alphabet>) -> Alphabet {
        alphabet.cloned().unwrap_or_else(|| GENERIC_ALPHABET.clone())
    }

    /// Picks the narrowest standard alphabet that accepts every symbol of
    /// `seq`, trying them in the order of [`standard_alphabets`].
    ///
    /// Falls back to the generic alphabet when nothing fits; the caller's
    /// validation then reports the offending symbol.
    pub fn which(seq: impl AsRef<str>) -> Alphabet {
        Self::which_all(std::iter::once(seq))
    }

    /// Like [`Alphabet::which`], but the chosen alphabet must accept every
    /// sequence in `seqs`.
    pub fn which_all<I>(seqs: I) -> Alphabet
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let seqs: Vec<I::Item> = seqs.into_iter().collect();
        standard_alphabets()
            .into_iter()
            .find(|alphabet| seqs.iter().all(|s| alphabet.alphabetic(s.as_ref())))
            .unwrap_or(&*GENERIC_ALPHABET)
            .clone()
    }

    /// The canonical letters, in ordinal order.
    pub fn letters(&self) -> &str {
        &self.inner.letters
    }

    /// The `(alternate, canonical)` synonym pairs this alphabet was built with.
    pub fn synonyms(&self) -> &[(char, char)] {
        &self.inner.synonyms
    }

    /// Number of canonical symbols.
    pub fn len(&self) -> usize {
        self.inner.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.letters.is_empty()
    }

    /// Ordinal of `symbol`, after synonym folding.
    pub fn ord(&self, symbol: char) -> Option<usize> {
        let code = symbol as usize;
        if code >= TABLE_SIZE {
            return None;
        }
        self.inner.ord_table[code].map(usize::from)
    }

    /// Canonical symbol at `index`.
    pub fn chr(&self, index: usize) -> Option<char> {
        self.inner.letters.as_bytes().get(index).map(|&b| char::from(b))
    }

    /// Canonical form of `symbol`, if it belongs to the alphabet.
    pub fn canonical(&self, symbol: char) -> Option<char> {
        self.ord(symbol).and_then(|i| self.chr(i))
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.ord(symbol).is_some()
    }

    /// Ordinals of every character in `symbols`.
    pub fn ords(&self, symbols: &str) -> SeqResult<Vec<usize>> {
        symbols
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                self.ord(symbol)
                    .ok_or_else(|| self.not_in_alphabet(symbol, position))
            })
            .collect()
    }

    /// Builds a sequence from ordinals.
    pub fn chrs(&self, indices: &[usize]) -> SeqResult<Seq> {
        let symbols = indices
            .iter()
            .map(|&index| {
                self.chr(index).ok_or(SeqError::OrdinalOutOfRange {
                    index,
                    size: self.len(),
                })
            })
            .collect::<SeqResult<String>>()?;
        Seq::new(symbols, Some(self))
    }

    /// True if every character of `symbols` belongs to the alphabet.
    pub fn alphabetic(&self, symbols: &str) -> bool {
        symbols.chars().all(|c| self.contains(c))
    }

    /// Folds every character of `symbols` to its canonical form.
    pub fn normalize(&self, symbols: &str) -> SeqResult<Seq> {
        let canonical = symbols
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                self.canonical(symbol)
                    .ok_or_else(|| self.not_in_alphabet(symbol, position))
            })
            .collect::<SeqResult<String>>()?;
        Seq::new(canonical, Some(self))
    }

    /// Returns the membership error for `symbol` at `position`.
    pub(crate) fn not_in_alphabet(&self, symbol: char, position: usize) -> SeqError {
        SeqError::NotInAlphabet {
            symbol,
            position,
            alphabet: self.inner.letters.clone(),
        }
    }
}

fn table_index(c: char) -> SeqResult<usize> {
    if c == '\0' {
        return Err(SeqError::NullSymbol);
    }
    let code = c as usize;
    if code >= TABLE_SIZE {
        return Err(SeqError::NonAsciiSymbol(c));
    }
    Ok(code)
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.letters == other.inner.letters
                && self.inner.ord_table == other.inner.ord_table)
    }
}

impl Eq for Alphabet {}

impl Default for Alphabet {
    fn default() -> Self {
        GENERIC_ALPHABET.clone()
    }
}

/// The string form: the letters, then, if there are synonyms, a NUL and the
/// `(alternate, canonical)` pairs run together. NUL is never a symbol, so
/// [`FromStr`](std::str::FromStr) rebuilds an equal alphabet.
impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.letters)?;
        if !self.inner.synonyms.is_empty() {
            f.write_char(SYNONYM_SEPARATOR)?;
            for &(alternate, canonical) in &self.inner.synonyms {
                f.write_char(alternate)?;
                f.write_char(canonical)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("letters", &self.inner.letters)
            .field("synonyms", &self.inner.synonyms.len())
            .finish()
    }
}

impl std::str::FromStr for Alphabet {
    type Err = SeqError;

    fn from_str(s: &str) -> SeqResult<Self> {
        let Some((letters, pairs)) = s.split_once(SYNONYM_SEPARATOR) else {
            return Alphabet::new(s);
        };
        let mut chars = pairs.chars();
        let mut synonyms = Vec::new();
        while let Some(alternate) = chars.next() {
            let canonical = chars.next().ok_or(SeqError::UnpairedSynonym(alternate))?;
            synonyms.push((alternate, canonical));
        }
        Alphabet::with_synonyms(letters, &synonyms)
    }
}
