//! Artifact path construction.
//!
//! Every output path string is built here.

use std::path::{Path, PathBuf};

/// Default output root, relative to the working directory.
pub const DEFAULT_OUTPUT_ROOT: &str = "outputs";

const METADATA_DIR: &str = "metadata";
const RESPONSES_DIR: &str = "responses";
const METADATA_SUFFIX: &str = ".metadata.json";

/// Kind of artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Rendered HTML table
    Table,
    /// Figure caption text
    Figure,
}

impl ArtifactKind {
    /// Directory name for this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactKind::Table => "tables",
            ArtifactKind::Figure => "image",
        }
    }

    /// Index marker used in filenames.
    pub fn index_marker(self) -> &'static str {
        match self {
            ArtifactKind::Table => "tableidx",
            ArtifactKind::Figure => "imgidx",
        }
    }

    /// File extension (without dot).
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Table => "html",
            ArtifactKind::Figure => "txt",
        }
    }

    /// All kinds.
    pub fn all() -> [ArtifactKind; 2] {
        [ArtifactKind::Table, ArtifactKind::Figure]
    }
}

/// Where one artifact and its metadata live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    /// Artifact kind
    pub kind: ArtifactKind,

    /// Bare filename (also the metadata `DocumentId`)
    pub filename: String,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Content file path
    pub content_path: PathBuf,

    /// Metadata file path
    pub metadata_path: PathBuf,
}

/// A local directory and the object key prefix it is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Local directory
    pub local_dir: PathBuf,

    /// Object key prefix
    pub key_prefix: String,
}

/// Path layout for the artifacts of one source document.
///
/// ```text
/// {root}/{stem}/{tables|image}/{filename}
/// {root}/metadata/{stem}/{tables|image}/{filename}.metadata.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    root: PathBuf,
    document: String,
}

impl ArtifactPaths {
    /// Create a layout for a document under an output root.
    pub fn new(root: impl Into<PathBuf>, document: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            document: document.into(),
        }
    }

    /// Create a layout under the default `outputs` root.
    pub fn with_default_root(document: impl Into<String>) -> Self {
        Self::new(DEFAULT_OUTPUT_ROOT, document)
    }

    /// Output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Source document name, as used in filenames and metadata.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Document name without a trailing `.pdf`, used for directories.
    pub fn document_stem(&self) -> &str {
        self.document
            .strip_suffix(".pdf")
            .unwrap_or(&self.document)
    }

    /// Directory holding all content artifacts of the document.
    pub fn content_root(&self) -> PathBuf {
        self.root.join(self.document_stem())
    }

    /// Directory holding all metadata records of the document.
    pub fn metadata_root(&self) -> PathBuf {
        self.root.join(METADATA_DIR).join(self.document_stem())
    }

    /// Content directory for one kind.
    pub fn content_dir(&self, kind: ArtifactKind) -> PathBuf {
        self.content_root().join(kind.dir_name())
    }

    /// Metadata directory for one kind.
    pub fn metadata_dir(&self, kind: ArtifactKind) -> PathBuf {
        self.metadata_root().join(kind.dir_name())
    }

    /// Directory for raw result pages.
    pub fn responses_dir(&self) -> PathBuf {
        self.root.join(RESPONSES_DIR).join(self.document_stem())
    }

    /// Path of one saved raw result page (1-indexed).
    pub fn response_path(&self, page: usize) -> PathBuf {
        self.responses_dir().join(format!("page_{}.json", page))
    }

    /// Artifact filename: `{doc}__page__{page}__{marker}__{index}.{ext}`.
    pub fn filename(&self, kind: ArtifactKind, page_number: u32, index: usize) -> String {
        format!(
            "{}__page__{}__{}__{}.{}",
            self.document,
            page_number,
            kind.index_marker(),
            index,
            kind.extension()
        )
    }

    /// Full location of one artifact.
    pub fn locate(&self, kind: ArtifactKind, page_number: u32, index: usize) -> ArtifactLocation {
        let filename = self.filename(kind, page_number, index);
        let content_path = self.content_dir(kind).join(&filename);
        let metadata_path = self
            .metadata_dir(kind)
            .join(format!("{}{}", filename, METADATA_SUFFIX));
        ArtifactLocation {
            kind,
            filename,
            page_number,
            content_path,
            metadata_path,
        }
    }

    /// Location of a table artifact.
    pub fn table(&self, page_number: u32, table_index: usize) -> ArtifactLocation {
        self.locate(ArtifactKind::Table, page_number, table_index)
    }

    /// Location of a figure caption artifact.
    pub fn figure(&self, page_number: u32, scan_index: usize) -> ArtifactLocation {
        self.locate(ArtifactKind::Figure, page_number, scan_index)
    }

    /// Directories to publish, content first, keyed under the root's name.
    pub fn upload_targets(&self) -> [UploadTarget; 2] {
        let root_name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_OUTPUT_ROOT.to_string());
        let stem = self.document_stem().replace('\\', "/");
        [
            UploadTarget {
                local_dir: self.content_root(),
                key_prefix: format!("{}/{}", root_name, stem),
            },
            UploadTarget {
                local_dir: self.metadata_root(),
                key_prefix: format!("{}/{}/{}", root_name, METADATA_DIR, stem),
            },
        ]
    }
}
