//! Metadata records attached to artifacts.

use crate::error::Result;
use crate::render::{to_json, JsonFormat};
use serde::{Deserialize, Serialize};

/// Metadata record written next to every artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Artifact filename
    #[serde(rename = "DocumentId")]
    pub document_id: String,

    /// Attributes of the artifact
    #[serde(rename = "Attributes")]
    pub attributes: ArtifactAttributes,
}

/// Attributes of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactAttributes {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Source document name
    pub source_pdf: String,
}

impl ArtifactMetadata {
    /// Create a metadata record.
    pub fn new(
        document_id: impl Into<String>,
        page_number: u32,
        source_pdf: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            attributes: ArtifactAttributes {
                page_number,
                source_pdf: source_pdf.into(),
            },
        }
    }

    /// Serialize as 4-space indented JSON.
    pub fn to_json(&self) -> Result<String> {
        to_json(self, JsonFormat::Pretty)
    }

    /// Parse a metadata record.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_layout() {
        let metadata = ArtifactMetadata::new("doc.pdf__page__1__tableidx__0.html", 1, "doc.pdf");
        let json = metadata.to_json().unwrap();

        assert_eq!(
            json,
            "{\n    \"DocumentId\": \"doc.pdf__page__1__tableidx__0.html\",\n    \"Attributes\": {\n        \"page_number\": 1,\n        \"source_pdf\": \"doc.pdf\"\n    }\n}"
        );
    }

    #[test]
    fn test_metadata_round_trip() {
        let metadata = ArtifactMetadata::new("x.txt", 42, "folder/ünïcode \"quoted\".pdf");
        let parsed = ArtifactMetadata::from_json(&metadata.to_json().unwrap()).unwrap();
        assert_eq!(parsed, metadata);
    }
}
