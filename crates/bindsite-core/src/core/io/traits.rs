use crate::core::models::structure::Structure;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Returns true when the path carries a `.gz` extension (case-insensitive).
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Defines the interface for reading and writing structure file formats.
///
/// Implementors handle format-specific parsing and serialization; this trait
/// supplies the path-based helpers, including transparent gzip handling for
/// files ending in `.gz`.
pub trait StructureFile {
    /// The type of metadata associated with the file format.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Return
    ///
    /// Returns the parsed structure and associated metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error>;

    /// Writes a structure to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a structure from a file path, decompressing `.gz` files on the fly.
    ///
    /// Every member of a multi-member gzip stream is read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(Structure, Self::Metadata), Self::Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        if is_gzip_path(path) {
            let mut reader = BufReader::new(MultiGzDecoder::new(file));
            Self::read_from(&mut reader)
        } else {
            let mut reader = BufReader::new(file);
            Self::read_from(&mut reader)
        }
    }

    /// Writes a structure to a file path, compressing when the path ends in `.gz`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(structure: &Structure, path: P) -> Result<(), Self::Error> {
        let path = path.as_ref();
        let file = File::create(path)?;
        if is_gzip_path(path) {
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            Self::write_to(structure, &mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            let mut writer = BufWriter::new(file);
            Self::write_to(structure, &mut writer)?;
            writer.flush()?;
        }
        Ok(())
    }
}
