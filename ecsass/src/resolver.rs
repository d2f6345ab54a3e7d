use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::{EcsassError, EcsassResult};
use crate::fasta::is_fasta_extension;
use crate::fasta::reader::FastaReader;
use crate::sequence::Sequence;

/// Source of the sequences referenced with `FILE(name)`.
pub trait SequenceResolver {
    fn resolve(&self, name: &str) -> EcsassResult<Sequence>;
}

impl<T: SequenceResolver + ?Sized> SequenceResolver for &T {
    fn resolve(&self, name: &str) -> EcsassResult<Sequence> {
        (**self).resolve(name)
    }
}

/// Resolves names to single-sequence FASTA files in a list of folders.
///
/// The folders are searched in the order given; within a folder the entries
/// are visited in the order of their file names. The first file whose name,
/// without the extension, equals the requested name and whose extension is
/// one of [`FASTA_EXTENSIONS`](crate::fasta::FASTA_EXTENSIONS) wins.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FolderResolver {
    folders: Vec<PathBuf>,
}

impl FolderResolver {
    #[must_use]
    pub fn new<T: Into<PathBuf>>(folders: impl IntoIterator<Item = T>) -> Self {
        Self {
            folders: folders.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the path of the file that `FILE(name)` refers to.
    pub fn locate(&self, name: &str) -> EcsassResult<PathBuf> {
        for folder in &self.folders {
            if let Some(path) = Self::locate_in(folder, name)? {
                return Ok(path);
            }
        }

        Err(EcsassError::FileNotFound(name.to_owned()))
    }

    fn locate_in(folder: &Path, name: &str) -> EcsassResult<Option<PathBuf>> {
        let to_error = |e| EcsassError::DirectoryError(folder.to_owned(), e);

        let mut paths = fs::read_dir(folder)
            .map_err(to_error)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_error)?;
        paths.sort();

        let found = paths.into_iter().find(|path| Self::matches(path, name));
        trace!(
            "Looked for `{}` in `{}`: {:?}",
            name,
            folder.display(),
            found
        );

        Ok(found)
    }

    fn matches(path: &Path, name: &str) -> bool {
        let stem_matches = path.file_stem().map_or(false, |stem| stem == name);
        let extension_matches = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map_or(false, is_fasta_extension);

        stem_matches && extension_matches && path.is_file()
    }
}

impl SequenceResolver for FolderResolver {
    fn resolve(&self, name: &str) -> EcsassResult<Sequence> {
        let path = self.locate(name)?;
        debug!("Reading `{}` from `{}`", name, path.display());

        let file = File::open(&path).map_err(|e| EcsassError::ReadError(path.clone(), e.into()))?;
        let fasta = FastaReader::new(BufReader::new(file))
            .read_sequence()
            .map_err(|e| EcsassError::ReadError(path.clone(), e))?;

        Ok(fasta.sequence)
    }
}

/// Resolves names from an in-memory table.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MemoryResolver {
    sequences: HashMap<String, Sequence>,
}

impl MemoryResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<N: Into<String>, S: Into<Sequence>>(&mut self, name: N, sequence: S) {
        self.sequences.insert(name.into(), sequence.into());
    }

    #[must_use]
    pub fn with<N: Into<String>, S: Into<Sequence>>(mut self, name: N, sequence: S) -> Self {
        self.insert(name, sequence);
        self
    }
}

impl SequenceResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> EcsassResult<Sequence> {
        self.sequences
            .get(name)
            .cloned()
            .ok_or_else(|| EcsassError::FileNotFound(name.to_owned()))
    }
}
