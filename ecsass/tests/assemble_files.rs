use std::fs;
use std::path::Path;

use ecsass::error::{EcsassError, EcsassErrorKind};
use ecsass::evaluator::{Evaluator, EvaluatorParams};
use ecsass::overlap::{MismatchMode, WindowPreference};
use ecsass::resolver::FolderResolver;
use tempfile::TempDir;

fn write_fasta(dir: &Path, file_name: &str, title: &str, lines: &[&str]) {
    let mut contents = format!(">{}\n", title);
    for line in lines {
        contents.push_str(line);
        contents.push('\n');
    }
    fs::write(dir.join(file_name), contents).unwrap();
}

fn sequence_folders() -> (TempDir, TempDir) {
    let custom = TempDir::new().unwrap();
    let library = TempDir::new().unwrap();

    write_fasta(
        library.path(),
        "LTR.fa",
        "LTR",
        &["TGTGGAAAAT", "CTCTAGCA"],
    );
    write_fasta(library.path(), "GFP.fasta", "GFP", &["ATGGTGAGCAAGGGCGAG"]);
    write_fasta(custom.path(), "GFP.FA", "GFP variant", &["ATGGCCAGCAAG"]);
    write_fasta(
        custom.path(),
        "repeat.fa",
        "repeat",
        &["AACCNNNNN", "AACC"],
    );

    (custom, library)
}

#[test_log::test]
fn test_evaluate_with_files() {
    let (custom, library) = sequence_folders();

    let seq = ecsass::evaluate(
        "FILE(LTR) + INV(FILE(GFP)) + FILE(LTR)[:4]",
        &[library.path(), custom.path()],
        &[4],
        0,
        false,
        MismatchMode::UseN,
    )
    .unwrap();

    assert_eq!(seq, "TGTGGAAAATCTCTAGCACTCGCCCTTGCTCACCATTGTG");
}

#[test_log::test]
fn test_folder_priority() {
    let (custom, library) = sequence_folders();

    let preferring_custom = ecsass::evaluate(
        "FILE(GFP)",
        &[custom.path(), library.path()],
        &[4],
        0,
        false,
        MismatchMode::UseN,
    )
    .unwrap();
    let preferring_library = ecsass::evaluate(
        "FILE(GFP)",
        &[library.path(), custom.path()],
        &[4],
        0,
        false,
        MismatchMode::UseN,
    )
    .unwrap();

    assert_eq!(preferring_custom, "ATGGCCAGCAAG");
    assert_eq!(preferring_library, "ATGGTGAGCAAGGGCGAG");
}

#[test_log::test]
fn test_tandem_repeat_from_file() {
    let (custom, library) = sequence_folders();
    let params = EvaluatorParams::builder()
        .window_preference(WindowPreference::largest_first(4, 10))
        .build();
    let evaluator = Evaluator::with_params(
        FolderResolver::new([custom.path(), library.path()]),
        params,
    );

    let seq = evaluator.evaluate("FILE(repeat) ~* 3").unwrap();

    assert_eq!(seq.to_string(), "AACCNNNNNAACCNNNNNAACCNNNNNAACC");
}

#[test_log::test]
fn test_overlap_mismatch_modes() {
    let recipe = "SEQ(GGGGACGT) ~+ SEQ(AGGTCCCC)";
    let folders: [&Path; 0] = [];

    let results: Vec<_> = MismatchMode::VALUES
        .iter()
        .map(|&mode| ecsass::evaluate(recipe, &folders, &[4], 1, false, mode).unwrap())
        .collect();

    assert_eq!(
        results,
        ["GGGGANGTCCCC", "GGGGACGTCCCC", "GGGGAGGTCCCC"]
    );
}

#[test_log::test]
fn test_same_file_referenced_twice() {
    let (custom, library) = sequence_folders();
    let evaluator = Evaluator::new(FolderResolver::new([custom.path(), library.path()]));

    let seq = evaluator.evaluate("FILE(LTR) + SEQ(ACGT) + FILE(LTR)").unwrap();

    assert_eq!(seq.to_string(), "TGTGGAAAATCTCTAGCAACGTTGTGGAAAATCTCTAGCA");
}

#[test_log::test]
fn test_missing_file() {
    let (custom, library) = sequence_folders();

    let error = ecsass::evaluate(
        "FILE(LTR) + FILE(LINE1)",
        &[custom.path(), library.path()],
        &[4],
        0,
        false,
        MismatchMode::UseN,
    )
    .unwrap_err();

    assert_eq!(error.kind(), EcsassErrorKind::Resolution);
    assert_eq!(
        error.to_string(),
        "Resolution error: No file named `LINE1` found"
    );
}

#[test_log::test]
fn test_syntax_error_skips_file_access() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    let error = ecsass::evaluate(
        "FILE(LTR) + ",
        &[missing],
        &[4],
        0,
        false,
        MismatchMode::UseN,
    )
    .unwrap_err();

    assert_eq!(error.kind(), EcsassErrorKind::Syntax);
    assert!(matches!(error, EcsassError::MissingOperand("+", _)));
}
