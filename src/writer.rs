//! BibTeX writer for serializing references

use crate::model::FieldName;
use crate::{Bibliography, Error, Reference, Result};
use std::io::{self, Write};

/// Configuration for writing BibTeX
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Indentation string (default: "  ")
    pub indent: String,
    /// Text placed after every block when writing a bibliography (default: "\n\n")
    pub block_terminator: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            block_terminator: "\n\n".to_string(),
        }
    }
}

/// BibTeX writer
#[derive(Debug)]
pub struct Writer<W: Write> {
    writer: W,
    config: WriterConfig,
}

impl<W: Write> Writer<W> {
    /// Create a new writer with default configuration
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            config: WriterConfig::default(),
        }
    }

    /// Create a new writer with custom configuration
    pub const fn with_config(writer: W, config: WriterConfig) -> Self {
        Self { writer, config }
    }

    /// Write every complete reference of a bibliography, skipping incomplete ones
    pub fn write_bibliography(&mut self, bibliography: &Bibliography) -> Result<usize> {
        let mut written = 0;
        for reference in bibliography.references() {
            if !reference.is_complete() {
                continue;
            }
            self.write_reference(reference)?;
            self.writer.write_all(self.config.block_terminator.as_bytes())?;
            written += 1;
        }
        Ok(written)
    }

    /// Write a single reference block, without a trailing newline.
    ///
    /// Nothing is written when a required field is empty.
    pub fn write_reference(&mut self, reference: &Reference) -> Result<()> {
        let kind = reference.kind();
        if let Some(field) = reference.missing_required_field() {
            return Err(Error::MissingRequiredField { kind, field });
        }

        let fields: Vec<(FieldName, &str)> = kind
            .required_fields()
            .iter()
            .chain(kind.optional_fields())
            .filter_map(|&field| {
                reference
                    .get(field)
                    .filter(|value| !value.is_empty())
                    .map(|value| (field, value))
            })
            .collect();

        writeln!(self.writer, "@{}{{{},", kind, reference.key())?;

        // last field line carries no comma
        for (i, (name, value)) in fields.iter().enumerate() {
            write!(self.writer, "{}{} = {{{}}}", self.config.indent, name, value)?;
            if i < fields.len() - 1 {
                writeln!(self.writer, ",")?;
            } else {
                writeln!(self.writer)?;
            }
        }

        write!(self.writer, "}}")?;
        Ok(())
    }

    /// Consume the writer and return the inner sink
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl Reference {
    /// Serialize to a BibTeX block, or fail naming the first missing required field
    pub fn try_to_bibtex(&self) -> Result<String> {
        to_string(self)
    }

    /// Serialize to a BibTeX block.
    ///
    /// Returns an empty string when a required field is empty; callers must
    /// check for it before persisting.
    #[must_use]
    pub fn to_bibtex(&self) -> String {
        self.try_to_bibtex().unwrap_or_default()
    }
}

/// Convenience function to write a reference to a string
pub fn to_string(reference: &Reference) -> Result<String> {
    let mut buf = Vec::new();
    Writer::new(&mut buf).write_reference(reference)?;
    String::from_utf8(buf).map_err(|e| Error::IoError(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Convenience function to write a bibliography to a file, replacing its contents
pub fn to_file(bibliography: &Bibliography, path: impl AsRef<std::path::Path>) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    let mut writer = Writer::new(io::BufWriter::new(file));
    let written = writer.write_bibliography(bibliography)?;
    writer.into_inner().flush()?;
    Ok(written)
}
