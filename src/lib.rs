//! # seqlist - biological sequences, alignments and their file formats
//!
//! ## Architecture
//!
//! - `alphabet`: symbol sets with ordinals and synonyms, plus the standard
//!   protein and nucleic acid alphabets and alphabet inference
//! - `seq`: alphabet-bound sequences and their transformations
//! - `seq_list`: ordered collections of sequences, tallies and profiles
//! - `genetic_code`: NCBI translation tables
//! - `formats`: Clustal, FASTA, PHYLIP and plain readers/writers, and the
//!   format dispatcher that identifies an unknown input
//! - `error`: model-level errors
//!
//! ## Example
//!
//! ```no_run
//! use seqlist::formats::parse_file;
//!
//! let seqs = parse_file("alignment.aln").unwrap();
//! for seq in &seqs {
//!     println!("{}: {} residues", seq.name().unwrap_or("?"), seq.ungap().len());
//! }
//! ```

pub mod alphabet;
pub mod error;
pub mod formats;
pub mod genetic_code;
pub mod seq;
pub mod seq_list;

pub use alphabet::Alphabet;
pub use error::{SeqError, SeqResult};
pub use seq::Seq;
pub use seq_list::{Profile, SeqList};
