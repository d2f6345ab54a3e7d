use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io::BufRead;

use crate::fasta::consts::FASTA_TITLE_PREFIX;
use crate::sequence::Sequence;

/// Error occurring during reading a FASTA file.
#[derive(Debug)]
pub enum FastaReaderError {
    /// I/O error occurred when reading the FASTA file.
    IoError(std::io::Error),
}

impl From<std::io::Error> for FastaReaderError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl Display for FastaReaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FastaReaderError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl Error for FastaReaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FastaReaderError::IoError(e) => Some(e),
        }
    }
}

/// The result of a FASTA reading operation.
pub type FastaResult<T> = Result<T, FastaReaderError>;

/// A titled sequence read from a FASTA file.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FastaSequence {
    pub title: String,
    pub sequence: Sequence,
}

/// Reader for single-sequence FASTA files.
///
/// The title line is optional. All the lines following it are joined into a
/// single sequence, with line terminators stripped.
#[derive(Debug)]
pub struct FastaReader<R> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> FastaReader<R> {
    /// Creates new `FastaReader` instance.
    ///
    /// # Examples
    /// ```
    /// use ecsass::fasta::reader::FastaReader;
    ///
    /// let buf = Vec::new();
    /// let _reader = FastaReader::new(buf.as_slice());
    /// ```
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Reads the whole input as one FASTA sequence.
    ///
    /// # Examples
    /// ```
    /// use ecsass::fasta::reader::FastaReader;
    ///
    /// let data = ">chr1\nACGT\nTTGG\n";
    /// let seq = FastaReader::new(data.as_bytes()).read_sequence().unwrap();
    /// assert_eq!(seq.title, "chr1");
    /// assert_eq!(seq.sequence.as_bytes(), b"ACGTTTGG");
    /// ```
    pub fn read_sequence(&mut self) -> FastaResult<FastaSequence> {
        let mut title = String::new();
        let mut data = Vec::new();

        let mut first_line = true;
        while let Some(line) = Self::read_line(&mut self.reader, &mut self.buffer)? {
            if first_line {
                if line.is_empty() {
                    continue;
                }
                first_line = false;

                if line[0] == FASTA_TITLE_PREFIX {
                    title = String::from_utf8_lossy(&line[1..]).trim().to_owned();
                    continue;
                }
            }

            data.extend_from_slice(line);
        }

        Ok(FastaSequence {
            title,
            sequence: Sequence::new(data),
        })
    }

    fn read_line<'a, T: BufRead>(
        mut buf_reader: T,
        buffer: &'a mut Vec<u8>,
    ) -> FastaResult<Option<&'a [u8]>> {
        buffer.clear();
        let bytes_read = buf_reader.read_until(b'\n', buffer)?;
        if bytes_read == 0 {
            return Ok(None);
        }

        let mut buffer = buffer.as_slice();
        while let Some(b'\n' | b'\r') = buffer.last() {
            buffer = &buffer[..buffer.len() - 1];
        }

        Ok(Some(buffer))
    }
}
