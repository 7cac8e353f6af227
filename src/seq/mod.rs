use rand::Rng;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_ALPHABET: &[u8] = b"ACGT";

/// A reference sequence treated as circular.
///
/// The sequence is stored doubled so that any window of at most `len()` bases
/// starting in `[0, len())` is a contiguous slice, wrap-around included.
#[derive(Clone, Debug)]
pub struct Reference {
    doubled: Vec<u8>,
    len: usize,
}

impl Reference {
    /// Trims surrounding whitespace; the content itself is taken as is.
    pub fn from_bytes(sequence: &[u8]) -> Result<Self> {
        let sequence = sequence.trim_ascii();
        if sequence.is_empty() {
            return Err(Error::EmptyReference);
        }

        let len = sequence.len();
        let mut doubled = Vec::with_capacity(2 * len);
        doubled.extend_from_slice(sequence);
        doubled.extend_from_slice(sequence);
        Ok(Reference { doubled, len })
    }

    /// Reads the whole file as text. No FASTA parsing is done.
    pub fn from_path<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::InputUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(text.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The reference as loaded.
    pub fn sequence(&self) -> &[u8] {
        &self.doubled[..self.len]
    }

    /// The reference concatenated with itself.
    pub fn circular(&self) -> &[u8] {
        &self.doubled
    }

    /// `length` bases starting at `start` (taken modulo the reference length).
    pub fn window(&self, start: usize, length: usize) -> Result<&[u8]> {
        if length > self.len {
            return Err(Error::ReadTooLong {
                read_length: length,
                reference_length: self.len,
            });
        }
        let start = start % self.len;
        Ok(&self.doubled[start..start + length])
    }

    /// Rejects the first byte that is not in `alphabet`.
    pub fn validate(&self, alphabet: &[u8]) -> Result<()> {
        match self.sequence().iter().position(|b| !alphabet.contains(b)) {
            Some(offset) => Err(Error::InvalidSymbol {
                offset,
                symbol: char::from(self.doubled[offset]),
            }),
            None => Ok(()),
        }
    }
}

/// Writes one read per line, nothing else.
pub fn write_reads_to<W, I, R>(writer: &mut W, reads: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: AsRef<[u8]>,
{
    for read in reads {
        writer.write_all(read.as_ref())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

pub fn write_reads<P, I, R>(file_path: P, reads: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = R>,
    R: AsRef<[u8]>,
{
    let path = file_path.as_ref();
    let to_error = |source| Error::OutputUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(to_error)?);
    write_reads_to(&mut writer, reads).map_err(to_error)
}

/// Uniform random sequence over `alphabet`.
pub fn random_genome<R: Rng + ?Sized>(rng: &mut R, length: usize, alphabet: &[u8]) -> Result<Vec<u8>> {
    if alphabet.is_empty() {
        return Err(Error::InvalidParameter("alphabet is empty"));
    }
    Ok((0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect())
}

/// Single line, so the file loads back with [`Reference::from_path`].
pub fn write_genome<P: AsRef<Path>>(file_path: P, sequence: &[u8]) -> Result<()> {
    write_reads(file_path, std::iter::once(sequence))
}
