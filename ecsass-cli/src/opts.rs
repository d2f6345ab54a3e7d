use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::info;

#[derive(Debug, Clone)]
pub struct Directory {
    path: PathBuf,
}

impl Display for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

pub fn directory(path: &str) -> Result<Directory, String> {
    let result = Directory {
        path: PathBuf::from(path),
    };

    Ok(result)
}

impl Directory {
    pub fn as_path_buf(&self) -> Result<PathBuf, anyhow::Error> {
        let path = Path::new(&self.path);
        if !path.is_dir() {
            bail!(
                "Provided path: {} does not point to a directory",
                path.display()
            );
        }

        Ok(path.to_path_buf())
    }
}

/// Checks that every sequence folder exists, keeping the priority order.
pub fn sequence_folders(directories: &[Directory]) -> anyhow::Result<Vec<PathBuf>> {
    directories.iter().map(Directory::as_path_buf).collect()
}

pub fn input_stream(path: &str) -> Result<InputStream, String> {
    let input_path = Path::new(path);
    let result = InputStream {
        path: input_path.to_path_buf(),
    };

    Ok(result)
}

#[derive(Debug, Clone)]
pub struct InputStream {
    path: PathBuf,
}

impl Display for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Default for InputStream {
    fn default() -> Self {
        Self {
            path: PathBuf::from("-"),
        }
    }
}

impl InputStream {
    pub fn as_reader(&self) -> Result<InputReader, anyhow::Error> {
        InputReader::from_path(&self.path)
    }
}

#[derive(Debug)]
pub enum InputReader {
    Stdin(io::Stdin),
    File(File),
}

impl InputReader {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        let is_stdin = path.to_string_lossy() == "-";

        let val = if is_stdin {
            info!("Input file: standard input");
            Self::Stdin(io::stdin())
        } else {
            info!("Input file: {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Could not open `{}`", path.display()))?;
            Self::File(file)
        };
        Ok(val)
    }

    #[must_use]
    pub fn into_read(self) -> Box<dyn Read + Send> {
        match self {
            InputReader::Stdin(stdin) => Box::new(stdin),
            InputReader::File(file) => Box::new(file),
        }
    }
}

#[derive(Debug)]
pub enum OutputWriter {
    Stdout(io::Stdout),
    File(File),
}

impl OutputWriter {
    /// Opens the output file; no path or `-` is the standard output.
    pub fn from_path(output: &Option<PathBuf>) -> anyhow::Result<Self> {
        let path = output
            .as_deref()
            .filter(|path| path.to_string_lossy() != "-");

        let writer = match path {
            Some(path) => {
                info!("Output file: {}", path.display());
                let file = File::create(path)
                    .with_context(|| format!("Could not create `{}`", path.display()))?;
                Self::File(file)
            }
            None => Self::Stdout(io::stdout()),
        };

        Ok(writer)
    }

    pub fn into_write(self) -> Box<dyn Write + Send> {
        match self {
            OutputWriter::Stdout(stdout) => Box::new(stdout),
            OutputWriter::File(file) => Box::new(file),
        }
    }
}
