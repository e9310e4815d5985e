//! Domain DTOs for the ChemVision API.
//!
//! # Design
//! These types mirror the backend's schema but are defined independently of
//! the mock-server crate; integration tests catch schema drift between the
//! two. Success payloads are trusted for shape once the status is 2xx, so they
//! carry no validation of their own.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which backend facility produced a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Demo,
    Ml,
    Tool,
}

impl Source {
    /// Human-readable label shown next to a result.
    pub fn label(self) -> &'static str {
        match self {
            Source::Demo => "Demo",
            Source::Ml => "ML Model",
            Source::Tool => "Chemical Tool",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Success payload of image→structure and name→structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureResult {
    pub smiles: String,
    pub source: Source,
}

/// Success payload of structure→name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameResult {
    pub name: String,
    pub source: Source,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Wire body of name→structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameToStructureBody {
    pub name: String,
}

/// Wire body of structure→name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureToNameBody {
    pub smiles: String,
}

/// A file picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Build a file whose content type is sniffed from its magic bytes.
    ///
    /// Unrecognised content gets `application/octet-stream`, which the image
    /// form then rejects.
    pub fn sniffed(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let content_type = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or("application/octet-stream");
        Self::new(file_name, content_type, bytes)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// Keep the payload out of debug output; images can be megabytes.
impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// One conversion the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionRequest {
    Image(ImageFile),
    Name(String),
    Structure(String),
}

impl ConversionRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionRequest::Image(_) => "image",
            ConversionRequest::Name(_) => "name",
            ConversionRequest::Structure(_) => "structure",
        }
    }
}
