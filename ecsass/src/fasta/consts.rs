pub(super) const FASTA_TITLE_PREFIX: u8 = b'>';

/// Default number of nucleotides per line in written FASTA files.
pub const FASTA_DEFAULT_LINE_WIDTH: usize = 80;

/// File extensions recognized as FASTA files.
pub const FASTA_EXTENSIONS: [&str; 6] = ["fa", "FA", "Fa", "fasta", "FASTA", "Fasta"];

/// Returns `true` if `extension` is one of [`FASTA_EXTENSIONS`].
#[must_use]
pub fn is_fasta_extension(extension: &str) -> bool {
    FASTA_EXTENSIONS.contains(&extension)
}
