//! seqlist - read, convert and translate sequence files.
//!
//! ## Usage
//!
//! ```bash
//! seqlist <sequence_file>                      # FASTA to stdout
//! seqlist -O clustal -o out.aln <sequence_file>
//! seqlist -f clustal -a protein <sequence_file> # Force format and alphabet
//! seqlist -t -g 2 <sequence_file>              # Translate with code 2
//! ```
//!
//! ## Supported Formats
//!
//! - Clustal (.aln, .clustal, .clw)
//! - FASTA (.fasta, .fa, .fna, .faa, .fas)
//! - PHYLIP (.phy, .phylip)
//! - Plain (detected from content only)
//!
//! Set `RUST_LOG=debug` to see which formats were tried.

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use seqlist::alphabet::{
    Alphabet, DNA_ALPHABET, GENERIC_ALPHABET, NUCLEIC_ALPHABET, PROTEIN_ALPHABET, RNA_ALPHABET,
    UNAMBIGUOUS_DNA_ALPHABET, UNAMBIGUOUS_PROTEIN_ALPHABET, UNAMBIGUOUS_RNA_ALPHABET,
};
use seqlist::formats::clustal::ClustalFormat;
use seqlist::formats::fasta::FastaFormat;
use seqlist::formats::{parse_file_with_options, FileFormat, ParseResult, SeqFormat};
use seqlist::genetic_code::GENETIC_CODES;
use seqlist::{Seq, SeqList};

/// Input file format for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Clustal alignment
    Clustal,
    /// FASTA format
    Fasta,
    /// PHYLIP format
    Phylip,
    /// Bare sequence, no names
    Plain,
    /// Auto-detect from extension and content
    Auto,
}

impl From<FormatArg> for Option<FileFormat> {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Clustal => Some(FileFormat::Clustal),
            FormatArg::Fasta => Some(FileFormat::Fasta),
            FormatArg::Phylip => Some(FileFormat::Phylip),
            FormatArg::Plain => Some(FileFormat::Plain),
            FormatArg::Auto => None,
        }
    }
}

/// Output file format for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Clustal,
    Fasta,
    Phylip,
    Plain,
    /// Parse and validate only
    Null,
}

impl From<OutputFormatArg> for FileFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Clustal => FileFormat::Clustal,
            OutputFormatArg::Fasta => FileFormat::Fasta,
            OutputFormatArg::Phylip => FileFormat::Phylip,
            OutputFormatArg::Plain => FileFormat::Plain,
            OutputFormatArg::Null => FileFormat::Null,
        }
    }
}

/// Alphabet names for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlphabetArg {
    Generic,
    Protein,
    Nucleic,
    Dna,
    Rna,
    UnambiguousDna,
    UnambiguousRna,
    UnambiguousProtein,
}

impl AlphabetArg {
    fn alphabet(self) -> &'static Alphabet {
        match self {
            AlphabetArg::Generic => &*GENERIC_ALPHABET,
            AlphabetArg::Protein => &*PROTEIN_ALPHABET,
            AlphabetArg::Nucleic => &*NUCLEIC_ALPHABET,
            AlphabetArg::Dna => &*DNA_ALPHABET,
            AlphabetArg::Rna => &*RNA_ALPHABET,
            AlphabetArg::UnambiguousDna => &*UNAMBIGUOUS_DNA_ALPHABET,
            AlphabetArg::UnambiguousRna => &*UNAMBIGUOUS_RNA_ALPHABET,
            AlphabetArg::UnambiguousProtein => &*UNAMBIGUOUS_PROTEIN_ALPHABET,
        }
    }
}

/// seqlist - read, convert and translate sequence files
///
/// Reads a Clustal, FASTA, PHYLIP or plain sequence file and writes it in
/// another format, to a file or to stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sequence file to read (Clustal, FASTA, PHYLIP or plain)
    file: PathBuf,

    /// Force a specific input format (overrides auto-detection)
    #[arg(short = 'f', long = "format", value_enum, default_value = "auto")]
    format: FormatArg,

    /// Output format
    #[arg(short = 'O', long = "output-format", value_enum, default_value = "fasta")]
    output_format: OutputFormatArg,

    /// Output file. Use "-" for stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,

    /// Alphabet every sequence must belong to (inferred when omitted)
    #[arg(short = 'a', long = "alphabet", value_enum)]
    alphabet: Option<AlphabetArg>,

    /// Translate nucleotide sequences to amino acids
    #[arg(short = 't', long = "translate")]
    translate: bool,

    /// Genetic code for translation (1-33, default: 1 = Standard)
    #[arg(short = 'g', long = "genetic-code", default_value = "1")]
    genetic_code: u8,

    /// Reading frame for translation (1-3, default: 1)
    #[arg(short = 'r', long = "reading-frame", default_value = "1")]
    reading_frame: u8,

    /// Remove gap characters before writing
    #[arg(long = "ungap")]
    ungap: bool,

    /// Residues per line for Clustal and FASTA output
    #[arg(long = "line-width")]
    line_width: Option<usize>,
}

/// Applies `transform` to every member, keeping names and descriptions.
fn map_seqs<F>(seqs: &SeqList, alphabet: &Alphabet, transform: F) -> Result<SeqList>
where
    F: Fn(&Seq) -> seqlist::SeqResult<Seq>,
{
    let mapped = seqs
        .iter()
        .map(|seq| {
            transform(seq).with_context(|| {
                format!("Cannot transform '{}'", seq.name().unwrap_or("unnamed"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SeqList::with_alphabet(mapped, alphabet)?)
}

fn write_output(
    writer: &mut dyn Write,
    seqs: &SeqList,
    format: FileFormat,
    line_width: Option<usize>,
) -> ParseResult<()> {
    match (format, line_width) {
        (FileFormat::Clustal, Some(width)) => {
            ClustalFormat::new().with_line_width(width).write(writer, seqs)
        }
        (FileFormat::Fasta, Some(width)) => {
            FastaFormat::new().with_line_width(width).write(writer, seqs)
        }
        _ => format.handler().write(writer, seqs),
    }
}

/// Parses the file, applies the requested transformations and writes the
/// result.
fn run(args: Args) -> Result<()> {
    let alphabet = args.alphabet.map(AlphabetArg::alphabet);
    let (mut seqs, format) = parse_file_with_options(&args.file, args.format.into(), alphabet)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;
    info!(
        "Read {} sequences from {} as {}",
        seqs.len(),
        args.file.display(),
        format
    );

    if args.translate {
        let shared = seqs.alphabet().cloned().unwrap_or_default();
        if !NUCLEIC_ALPHABET.alphabetic(shared.letters()) {
            anyhow::bail!("Cannot translate: input is not a nucleotide sequence");
        }

        let code = GENETIC_CODES
            .get(args.genetic_code)
            .ok_or_else(|| anyhow::anyhow!("Unknown genetic code: {}", args.genetic_code))?;
        let frame = (args.reading_frame - 1) as usize;
        seqs = map_seqs(&seqs, &*PROTEIN_ALPHABET, |seq| seq.translate_with(code, frame))?;
    }

    if args.ungap {
        let shared = seqs.alphabet().cloned().unwrap_or_default();
        seqs = map_seqs(&seqs, &shared, |seq| Ok(seq.ungap()))?;
    }

    let output_format = FileFormat::from(args.output_format);
    if output_format == FileFormat::Fasta && !seqs.is_aligned() {
        warn!("Sequences differ in length; writing unaligned FASTA");
    }

    if args.output == "-" {
        // Write to stdout
        let stdout = io::stdout();
        let mut handle = BufWriter::new(stdout.lock());
        write_output(&mut handle, &seqs, output_format, args.line_width)?;
        handle.flush()?;
    } else {
        // Write to file
        let file = File::create(&args.output)
            .with_context(|| format!("Cannot create {}", args.output))?;
        let mut writer = BufWriter::new(file);
        write_output(&mut writer, &seqs, output_format, args.line_width)?;
        writer.flush()?;
        eprintln!("Wrote {} sequences to {}", seqs.len(), args.output);
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Validate reading frame (1-3)
    if args.reading_frame < 1 || args.reading_frame > 3 {
        anyhow::bail!("Reading frame must be 1-3 (got {})", args.reading_frame);
    }

    // Validate genetic code (1-33, with some gaps)
    if args.genetic_code < 1 || args.genetic_code > 33 {
        anyhow::bail!("Genetic code must be 1-33 (got {})", args.genetic_code);
    }

    if args.line_width == Some(0) {
        anyhow::bail!("Line width must be positive");
    }

    run(args)
}
