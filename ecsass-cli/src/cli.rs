use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, PossibleValue, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use ecsass::evaluator::EvaluatorParams;
use ecsass::fasta::FASTA_DEFAULT_LINE_WIDTH;
use ecsass::overlap::{MismatchMode, WindowPreference};
use lazy_static::lazy_static;

use crate::opts::{directory, input_stream, Directory, InputStream};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Don't display a progress bar/spinner
    #[clap(long, global = true, value_parser)]
    pub no_progress: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug)]
pub struct MismatchModeCli {
    pub inner: MismatchMode,
}

impl MismatchModeCli {
    #[must_use]
    pub fn new(inner: MismatchMode) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn variants() -> Vec<Self> {
        MismatchMode::VALUES
            .iter()
            .map(|&inner| MismatchModeCli::new(inner))
            .collect()
    }
}

lazy_static! {
    static ref MISMATCH_MODE_CLI_VARIANTS: Vec<MismatchModeCli> = MismatchModeCli::variants();
}

impl ValueEnum for MismatchModeCli {
    fn value_variants<'a>() -> &'a [Self] {
        &MISMATCH_MODE_CLI_VARIANTS
    }

    fn to_possible_value<'a>(&self) -> Option<PossibleValue<'a>> {
        let help = match self.inner {
            MismatchMode::UseN => "Use `N`",
            MismatchMode::UseFirstSeq => "Use the nucleotide of the 5' sequence",
            MismatchMode::UseSecondSeq => "Use the nucleotide of the 3' sequence",
        };
        let value = PossibleValue::new(self.inner.name()).help(help);
        Some(value)
    }
}

impl From<&MismatchModeCli> for MismatchMode {
    fn from(mode: &MismatchModeCli) -> Self {
        mode.inner
    }
}

/// Options of the `~+` and `~*` operators
#[derive(Args, Debug, Clone)]
pub struct OverlapArgs {
    /// Smallest overlap window size to try
    #[clap(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    pub window_min: u32,

    /// Largest overlap window size to try
    #[clap(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub window_max: u32,

    /// Try the smallest window sizes first instead of the largest ones
    #[clap(long, value_parser)]
    pub smallest_window: bool,

    /// Maximum number of mismatches within an overlap window
    #[clap(long, default_value_t = 0, value_parser)]
    pub errors: usize,

    /// Nucleotide to use where the overlapping windows disagree
    #[clap(long, arg_enum, default_value = "n", value_parser)]
    pub mismatch: MismatchModeCli,

    /// Do not fail when an excision ends before it starts; the flanks are
    /// joined anyway, repeating the bases in between
    #[clap(long, value_parser)]
    pub ignore_bad_slicing: bool,
}

impl OverlapArgs {
    pub fn evaluator_params(&self) -> anyhow::Result<EvaluatorParams> {
        if self.window_min > self.window_max {
            bail!(
                "--window-min ({}) cannot be greater than --window-max ({})",
                self.window_min,
                self.window_max
            );
        }

        let (min, max) = (self.window_min as usize, self.window_max as usize);
        let windows = if self.smallest_window {
            WindowPreference::smallest_first(min, max)
        } else {
            WindowPreference::largest_first(min, max)
        };

        let params = EvaluatorParams::builder()
            .window_preference(windows)
            .error_max(self.errors)
            .mismatch_mode((&self.mismatch).into())
            .ignore_bad_slicing(self.ignore_bad_slicing)
            .build();
        Ok(params)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assemble a single sequence and write it as a FASTA record
    Assemble {
        /// Assembly recipe, e.g. `FILE(LTR) + SEQ(ACGT) * 3`
        #[clap(value_parser)]
        recipe: String,

        /// Folder to look up `FILE(...)` references in; can be repeated, the
        /// folders given first take priority
        #[clap(short, long = "folder", value_parser = directory)]
        folders: Vec<Directory>,

        /// Output FASTA file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,

        /// Title of the output FASTA record
        #[clap(long, default_value = "assembled", value_parser)]
        name: String,

        /// Maximum line length of the output; 0 disables wrapping
        #[clap(long, default_value_t = FASTA_DEFAULT_LINE_WIDTH, value_parser)]
        width: usize,

        #[clap(flatten)]
        overlap: OverlapArgs,
    },

    /// Assemble a sequence for every row of a tab-separated table
    Batch {
        /// Input table to read; `-` is the standard input
        #[clap(default_value_t, value_parser = input_stream)]
        input: InputStream,

        /// Folder to look up `FILE(...)` references in; can be repeated, the
        /// folders given first take priority
        #[clap(short, long = "folder", value_parser = directory)]
        folders: Vec<Directory>,

        /// Output FASTA file path; `-` is the standard output
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,

        /// Number of the column (starting from 1) holding the record names
        #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        name_column: u32,

        /// Number of the column (starting from 1) holding the recipes
        #[clap(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
        recipe_column: u32,

        /// Skip the first row of the table
        #[clap(long, value_parser)]
        has_header: bool,

        /// Log and skip the rows that could not be assembled instead of
        /// aborting
        #[clap(long, value_parser)]
        skip_errors: bool,

        /// Replace every assembled sequence with `N`s of the same length
        #[clap(long, value_parser)]
        mask: bool,

        /// Write a CSV summary (name, length, status) to given path
        #[clap(long, value_parser)]
        report: Option<PathBuf>,

        /// Number of threads to use
        #[clap(long, value_parser)]
        threads: Option<usize>,

        /// Maximum line length of the output; 0 disables wrapping
        #[clap(long, default_value_t = FASTA_DEFAULT_LINE_WIDTH, value_parser)]
        width: usize,

        #[clap(flatten)]
        overlap: OverlapArgs,
    },

    /// Check a recipe for errors and print it in the canonical form
    Check {
        /// Assembly recipe
        #[clap(value_parser)]
        recipe: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use ecsass::overlap::{MismatchMode, WindowPreference};

    use crate::cli::{Cli, Commands};

    fn overlap_args(args: &[&str]) -> crate::cli::OverlapArgs {
        let mut argv = vec!["ecsass", "assemble", "SEQ(A)"];
        argv.extend_from_slice(args);

        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Assemble { overlap, .. } => overlap,
            _ => unreachable!(),
        }
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_overlap_args() {
        let params = overlap_args(&[]).evaluator_params().unwrap();

        assert_eq!(
            params.overlap().windows(),
            &WindowPreference::largest_first(4, 100)
        );
        assert_eq!(params.overlap().error_max(), 0);
        assert_eq!(params.overlap().mismatch_mode(), MismatchMode::UseN);
        assert!(!params.ignore_bad_slicing());
    }

    #[test]
    fn test_overlap_args() {
        let params = overlap_args(&[
            "--window-min",
            "2",
            "--window-max",
            "5",
            "--smallest-window",
            "--errors",
            "1",
            "--mismatch",
            "second",
            "--ignore-bad-slicing",
        ])
        .evaluator_params()
        .unwrap();

        assert_eq!(params.overlap().windows().sizes(), &[2, 3, 4, 5]);
        assert_eq!(params.overlap().error_max(), 1);
        assert_eq!(params.overlap().mismatch_mode(), MismatchMode::UseSecondSeq);
        assert!(params.ignore_bad_slicing());
    }

    #[test]
    fn should_reject_inverted_window_range() {
        let args = overlap_args(&["--window-min", "10", "--window-max", "5"]);

        assert!(args.evaluator_params().is_err());
    }

    #[test]
    fn should_reject_unknown_mismatch_mode() {
        let result = Cli::try_parse_from(["ecsass", "assemble", "SEQ(A)", "--mismatch", "x"]);

        assert!(result.is_err());
    }

    #[test]
    fn should_keep_folder_order() {
        let cli = Cli::try_parse_from([
            "ecsass", "batch", "table.tsv", "-f", "custom", "--folder", "library",
        ])
        .unwrap();

        match cli.command {
            Commands::Batch { folders, .. } => {
                let folders: Vec<_> = folders.iter().map(ToString::to_string).collect();
                assert_eq!(folders, ["custom", "library"]);
            }
            _ => unreachable!(),
        }
    }
}
