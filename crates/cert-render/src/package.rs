//! Reading and writing `.docx` packages.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::document::WordDocument;
use crate::error::{RenderError, Result};

/// Archive path of the main document part.
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    is_dir: bool,
    stored: bool,
    data: Vec<u8>,
}

/// A template package held in memory.
///
/// Every part other than the main document is written back byte for byte.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    entries: Vec<PackageEntry>,
    document: WordDocument,
}

impl Template {
    /// Load and parse the package at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| RenderError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|err| RenderError::malformed(path, err))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|err| RenderError::malformed(path, err))?;
            let name = file.name().to_string();
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .map_err(|err| RenderError::malformed(path, format!("{name}: {err}")))?;
            entries.push(PackageEntry {
                name,
                is_dir: file.is_dir(),
                stored: file.compression() == CompressionMethod::Stored,
                data,
            });
        }

        let main = entries
            .iter()
            .find(|entry| entry.name == MAIN_DOCUMENT_PART)
            .ok_or_else(|| RenderError::MissingDocumentPart {
                path: path.to_path_buf(),
                part: MAIN_DOCUMENT_PART,
            })?;
        let xml = std::str::from_utf8(&main.data)
            .map_err(|err| RenderError::malformed(path, format!("{MAIN_DOCUMENT_PART}: {err}")))?;
        let document = WordDocument::parse(xml)
            .map_err(|err| RenderError::malformed(path, format!("{MAIN_DOCUMENT_PART}: {err}")))?;

        debug!(path = %path.display(), parts = entries.len(), "loaded template");
        Ok(Self {
            path: path.to_path_buf(),
            entries,
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &WordDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut WordDocument {
        &mut self.document
    }

    /// Write the package to `path`, replacing any existing file.
    ///
    /// A partially written file is removed on failure.
    pub fn save(&self, path: &Path) -> Result<()> {
        let result = self.write_package(path);
        if result.is_err() {
            let _ = fs::remove_file(path);
        }
        result
    }

    fn write_package(&self, path: &Path) -> Result<()> {
        let document = self
            .document
            .to_bytes()
            .map_err(|err| RenderError::write(path, err))?;
        let file = File::create(path).map_err(|err| RenderError::write(path, err))?;
        let mut writer = zip::ZipWriter::new(file);

        for entry in &self.entries {
            let method = if entry.stored {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let options = SimpleFileOptions::default().compression_method(method);
            if entry.is_dir {
                writer
                    .add_directory(entry.name.as_str(), options)
                    .map_err(|err| RenderError::write(path, err))?;
                continue;
            }
            writer
                .start_file(entry.name.as_str(), options)
                .map_err(|err| RenderError::write(path, err))?;
            let data = if entry.name == MAIN_DOCUMENT_PART {
                document.as_slice()
            } else {
                entry.data.as_slice()
            };
            writer
                .write_all(data)
                .map_err(|err| RenderError::write(path, err))?;
        }

        writer.finish().map_err(|err| RenderError::write(path, err))?;
        Ok(())
    }
}
