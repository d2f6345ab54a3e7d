use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use ecsass::error::EcsassResult;
use ecsass::evaluator::{Evaluator, EvaluatorParams};
use ecsass::fasta::writer::{FastaWriter, FastaWriterParams};
use ecsass::resolver::FolderResolver;
use ecsass::sequence::Sequence;
use log::{info, warn};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

use crate::report::BatchReport;
use crate::PROGRESS_BAR;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 0-based
    pub name_column: usize,
    /// 0-based
    pub recipe_column: usize,
    pub has_header: bool,
    pub skip_errors: bool,
    pub mask: bool,
    pub threads: Option<usize>,
    pub width: usize,
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct BatchRow {
    /// Line number in the input table
    line: u64,
    name: String,
    recipe: String,
}

pub fn batch<R: Read, W: Write>(
    reader: R,
    writer: W,
    folders: Vec<PathBuf>,
    params: EvaluatorParams,
    options: &BatchOptions,
    report_path: Option<&Path>,
) -> anyhow::Result<()> {
    let rows = read_rows(reader, options)?;
    info!("Read {} rows", rows.len());
    PROGRESS_BAR.set_length(rows.len() as u64);

    let evaluator = Evaluator::with_params(FolderResolver::new(folders), params);
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads.unwrap_or(0))
        .build()
        .context("Could not create the thread pool")?;
    let results: Vec<EcsassResult<Sequence>> = thread_pool.install(|| {
        rows.par_iter()
            .map(|row| {
                let result = evaluator.evaluate(&row.recipe);
                PROGRESS_BAR.inc(1);
                result
            })
            .collect()
    });

    let mut report = BatchReport::create(report_path)?;
    let writer_params = FastaWriterParams::builder()
        .line_width(options.width)
        .build();
    let mut fasta_writer = FastaWriter::with_params(BufWriter::new(writer), writer_params);

    let mut skipped = 0;
    for (row, result) in rows.iter().zip(results) {
        let sequence = match result {
            Ok(sequence) => sequence,
            Err(e) if options.skip_errors => {
                warn!(
                    "Skipping `{}` (line {}): {}",
                    row.name, row.line, e
                );
                report.add_failed(&row.name, &e.to_string())?;
                skipped += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Could not assemble `{}` (line {})", row.name, row.line)
                });
            }
        };

        let sequence = if options.mask {
            sequence.masked()
        } else {
            sequence
        };
        fasta_writer
            .write_sequence(&row.name, &sequence)
            .context("Could not write an assembled sequence")?;
        report.add_assembled(&row.name, sequence.len())?;
    }

    fasta_writer.flush()?;
    report.flush()?;
    info!(
        "Assembled {} sequences, skipped {}",
        rows.len() - skipped,
        skipped
    );

    Ok(())
}

fn read_rows<R: Read>(reader: R, options: &BatchOptions) -> anyhow::Result<Vec<BatchRow>> {
    let mut table_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(options.has_header)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in table_reader.records() {
        let record = record.context("Could not read the input table")?;
        let line = record.position().map_or(0, |position| position.line());
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let column = |index: usize, what: &str| {
            record
                .get(index)
                .map(|field| field.trim().to_owned())
                .ok_or_else(|| anyhow!("Line {} has no {} column ({})", line, what, index + 1))
        };
        rows.push(BatchRow {
            line,
            name: column(options.name_column, "name")?,
            recipe: column(options.recipe_column, "recipe")?,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use ecsass::error::EcsassError;
    use ecsass::evaluator::EvaluatorParams;
    use tempfile::TempDir;

    use crate::cmd::batch::{batch, BatchOptions};

    const TABLE: &str = "name\trecipe\n\
                         first\tFILE(LTR) + SEQ(AC)\n\
                         # not a construct\n\
                         \n\
                         second\tINV(SEQ(AAACCC))\n\
                         broken\tSEQ(AAA))\n\
                         third\tSEQ(GT) * 3\n";

    fn options() -> BatchOptions {
        BatchOptions {
            name_column: 0,
            recipe_column: 1,
            has_header: true,
            skip_errors: true,
            mask: false,
            threads: Some(2),
            width: 80,
        }
    }

    fn sequence_folder() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LTR.fasta"), ">LTR\nTTAGGG\n").unwrap();
        dir
    }

    fn run(table: &str, options: &BatchOptions, report: Option<&Path>) -> anyhow::Result<String> {
        let dir = sequence_folder();
        let mut output = Vec::new();
        batch(
            table.as_bytes(),
            &mut output,
            vec![dir.path().to_path_buf()],
            EvaluatorParams::default(),
            options,
            report,
        )?;

        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn should_skip_failing_rows() {
        let output = run(TABLE, &options(), None).unwrap();

        assert_eq!(
            output,
            ">first\nTTAGGGAC\n>second\nGGGTTT\n>third\nGTGTGT\n"
        );
    }

    #[test]
    fn should_abort_on_first_error() {
        let options = BatchOptions {
            skip_errors: false,
            ..options()
        };

        let error = run(TABLE, &options, None).unwrap_err();

        assert!(error
            .to_string()
            .starts_with("Could not assemble `broken` (line "));
        assert!(matches!(
            error.downcast_ref::<EcsassError>(),
            Some(EcsassError::UnmatchedClosingBracket(8))
        ));
    }

    #[test]
    fn should_skip_sequences_too_long_to_assemble() {
        let table = format!(
            "huge\tSEQ(ACGT) * 9999999999999999999\nlong\tSEQ(A){}\n",
            " + SEQ(C)".repeat(100_000)
        );

        let output = run(&table, &options_without_header(), None).unwrap();

        assert_eq!(output.lines().next(), Some(">long"));
        assert_eq!(output.matches('C').count(), 100_000);
    }

    #[test]
    fn should_mask_sequences() {
        let options = BatchOptions {
            mask: true,
            ..options()
        };

        let output = run("x\tSEQ(ACGT)+FILE(LTR)\n", &options, None).unwrap();

        assert_eq!(output, ">x\nNNNNNNNNNN\n");
    }

    #[test]
    fn should_use_selected_columns() {
        let options = BatchOptions {
            name_column: 2,
            recipe_column: 0,
            has_header: false,
            ..options()
        };

        let output = run("SEQ(AC)\tignored\tx\nSEQ(GG)\tignored\ty\n", &options, None).unwrap();

        assert_eq!(output, ">x\nAC\n>y\nGG\n");
    }

    #[test]
    fn should_fail_on_missing_column() {
        let error = run("x\n", &options_without_header(), None).unwrap_err();

        assert_eq!(error.to_string(), "Line 1 has no recipe column (2)");
    }

    fn options_without_header() -> BatchOptions {
        BatchOptions {
            has_header: false,
            ..options()
        }
    }

    #[test]
    fn should_write_report() {
        let dir = TempDir::new().unwrap();
        let report_path = dir.path().join("report.csv");

        run(TABLE, &options(), Some(&report_path)).unwrap();

        assert_eq!(
            fs::read_to_string(&report_path).unwrap(),
            "name,length,status\n\
             first,8,ok\n\
             second,6,ok\n\
             broken,,Syntax error: Unmatched closing bracket at 8\n\
             third,6,ok\n"
        );
    }
}
