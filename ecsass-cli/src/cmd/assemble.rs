use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use ecsass::evaluator::{Evaluator, EvaluatorParams};
use ecsass::fasta::writer::{FastaWriter, FastaWriterParams};
use ecsass::resolver::FolderResolver;
use log::info;

pub fn assemble<W: Write>(
    recipe: &str,
    folders: Vec<PathBuf>,
    params: EvaluatorParams,
    writer: W,
    name: &str,
    width: usize,
) -> anyhow::Result<()> {
    let evaluator = Evaluator::with_params(FolderResolver::new(folders), params);

    let sequence = evaluator
        .evaluate(recipe)
        .context("Could not assemble the recipe")?;
    info!("Assembled `{}`: {} nt", name, sequence.len());

    let writer_params = FastaWriterParams::builder().line_width(width).build();
    let mut fasta_writer = FastaWriter::with_params(BufWriter::new(writer), writer_params);
    fasta_writer
        .write_sequence(name, &sequence)
        .context("Could not write the assembled sequence")?;
    fasta_writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ecsass::error::EcsassError;
    use ecsass::evaluator::EvaluatorParams;
    use tempfile::TempDir;

    use crate::cmd::assemble::assemble;

    #[test]
    fn should_write_fasta_record() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LTR.fa"), ">LTR\nTTAGGG\n").unwrap();

        let mut output = Vec::new();
        assemble(
            "FILE(LTR) + SEQ(ACGT) * 2",
            vec![dir.path().to_path_buf()],
            EvaluatorParams::default(),
            &mut output,
            "construct",
            8,
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            ">construct\nTTAGGGAC\nGTTTAGGG\nACGT\n"
        );
    }

    #[test]
    fn should_report_recipe_errors() {
        let mut output = Vec::new();
        let error = assemble(
            "SEQ(AAA))",
            Vec::new(),
            EvaluatorParams::default(),
            &mut output,
            "construct",
            80,
        )
        .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<EcsassError>(),
            Some(EcsassError::UnmatchedClosingBracket(8))
        ));
        assert!(output.is_empty());
    }
}
