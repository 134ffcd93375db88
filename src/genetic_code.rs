//! Genetic code definitions and translation logic.
//!
//! This module provides:
//! - NCBI genetic code tables (1-33)
//! - Codon to amino acid translation in any of the three forward frames
//! - Back translation from amino acids to a representative codon

use std::collections::HashMap;
use std::sync::LazyLock;

/// Nucleotide order used by the NCBI `ncbieaa` strings.
const BASES: [u8; 4] = *b"TCAG";

/// Characters treated as alignment gaps inside a codon.
const GAP_CHARS: &[u8] = b"-.~";

/// All NCBI genetic codes, built on first use.
pub static GENETIC_CODES: LazyLock<GeneticCodes> = LazyLock::new(GeneticCodes::new);

/// A genetic code table for translating codons to amino acids.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    /// NCBI genetic code ID
    pub id: u8,
    /// Name of the genetic code
    pub name: &'static str,
    forward: HashMap<[u8; 3], char>,
    /// First codon (in NCBI order) for each amino acid
    back: HashMap<char, [u8; 3]>,
}

impl GeneticCode {
    /// Creates a genetic code from its NCBI `ncbieaa` string: 64 amino acids
    /// for the codons TTT, TTC, TTA, TTG, TCT, ... in that order.
    fn new(id: u8, name: &'static str, ncbieaa: &str) -> Self {
        let codons = BASES.iter().flat_map(|&b1| {
            BASES
                .iter()
                .flat_map(move |&b2| BASES.iter().map(move |&b3| [b1, b2, b3]))
        });

        let mut forward = HashMap::with_capacity(64);
        let mut back = HashMap::new();
        for (codon, aa) in codons.zip(ncbieaa.chars()) {
            forward.insert(codon, aa);
            back.entry(aa).or_insert(codon);
        }

        Self {
            id,
            name,
            forward,
            back,
        }
    }

    /// Translates a single codon to an amino acid.
    ///
    /// # Rules:
    /// - Standard codons are translated using the genetic code (U reads as T,
    ///   case is ignored)
    /// - Fully gapped codons (e.g. `---`) translate to `-`
    /// - Partially gapped codons, codons with ambiguous nucleotides, and
    ///   anything not three characters long translate to `X`
    pub fn translate_codon(&self, codon: &[u8]) -> char {
        let Ok(codon) = <[u8; 3]>::try_from(codon) else {
            return 'X';
        };

        let gaps = codon.iter().filter(|b| GAP_CHARS.contains(b)).count();
        if gaps == 3 {
            return '-';
        }
        if gaps > 0 {
            return 'X';
        }

        let dna = codon.map(|b| match b.to_ascii_uppercase() {
            b'U' => b'T',
            other => other,
        });
        self.forward.get(&dna).copied().unwrap_or('X')
    }

    /// Translates a nucleotide sequence to amino acids.
    ///
    /// `frame` is 0, 1 or 2 for the +1, +2, +3 reading frames; larger values
    /// are clamped to 2. A trailing partial codon is not translated.
    pub fn translate(&self, nucleotides: &str, frame: usize) -> String {
        let bytes = nucleotides.as_bytes();
        let start = frame.min(2).min(bytes.len());
        bytes[start..]
            .chunks_exact(3)
            .map(|codon| self.translate_codon(codon))
            .collect()
    }

    /// Codon used to back translate `residue`.
    ///
    /// Gaps become `---`; residues the code cannot produce become `NNN`.
    pub fn back_translate_residue(&self, residue: char) -> [u8; 3] {
        if residue.is_ascii() && GAP_CHARS.contains(&(residue as u8)) {
            return *b"---";
        }
        self.back
            .get(&residue.to_ascii_uppercase())
            .copied()
            .unwrap_or(*b"NNN")
    }

    /// Back translates a protein sequence into DNA, one codon per residue.
    pub fn back_translate(&self, protein: &str) -> String {
        protein
            .chars()
            .flat_map(|residue| self.back_translate_residue(residue))
            .map(char::from)
            .collect()
    }
}

/// All available genetic codes from NCBI.
#[derive(Debug)]
pub struct GeneticCodes {
    codes: Vec<GeneticCode>,
}

impl GeneticCodes {
    /// Creates the complete set of NCBI genetic codes.
    fn new() -> Self {
        let codes = vec![
            GeneticCode::new(1, "Standard",
                "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(2, "Vertebrate Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG"),
            GeneticCode::new(3, "Yeast Mitochondrial",
                "FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(4, "Mold/Protozoan/Coelenterate Mito...",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(5, "Invertebrate Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(6, "Ciliate/Dasycladacean/Hexamita Nuclear",
                "FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(9, "Echinoderm/Flatworm Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(10, "Euplotid Nuclear",
                "FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(11, "Bacterial/Archaeal/Plant Plastid",
                "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(12, "Alternative Yeast Nuclear",
                "FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(13, "Ascidian Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG"),
            GeneticCode::new(14, "Alternative Flatworm Mitochondrial",
                "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(15, "Blepharisma Macronuclear",
                "FFLLSSSSYY*QCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(16, "Chlorophycean Mitochondrial",
                "FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(21, "Trematode Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(22, "Scenedesmus obliquus Mitochondrial",
                "FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(23, "Thraustochytrium Mitochondrial",
                "FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(24, "Rhabdopleuridae Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG"),
            GeneticCode::new(25, "Candidate Division SR1/Gracilibacteria",
                "FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(26, "Pachysolen tannophilus Nuclear",
                "FFLLSSSSYY**CC*WLLLAPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(27, "Karyorelict Nuclear",
                "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(28, "Condylostoma Nuclear",
                "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(29, "Mesodinium Nuclear",
                "FFLLSSSSYYYYCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(30, "Peritrich Nuclear",
                "FFLLSSSSYYEECC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(31, "Blastocrithidia Nuclear",
                "FFLLSSSSYYEECCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(32, "Balanophoraceae Plastid",
                "FFLLSSSSYY*WCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(33, "Cephalodiscidae Mitochondrial",
                "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG"),
        ];

        Self { codes }
    }

    /// Returns all genetic codes.
    pub fn all(&self) -> &[GeneticCode] {
        &self.codes
    }

    /// Gets a genetic code by ID.
    pub fn get(&self, id: u8) -> Option<&GeneticCode> {
        self.codes.iter().find(|c| c.id == id)
    }

    /// Gets the Standard genetic code (NCBI table 1).
    pub fn standard(&self) -> &GeneticCode {
        &self.codes[0]
    }
}
