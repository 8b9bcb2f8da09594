//! Listing source documents and publishing output directories.

use super::ObjectStore;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix of source documents picked up by [`list_documents`].
pub const DEFAULT_DOCUMENT_SUFFIX: &str = ".pdf";

/// List object keys under `prefix` that end with `suffix`, in listing order.
pub fn list_documents<O: ObjectStore + ?Sized>(
    store: &O,
    bucket: &str,
    prefix: &str,
    suffix: &str,
) -> Result<Vec<String>> {
    let keys: Vec<String> = store
        .list_keys(bucket, prefix)?
        .into_iter()
        .filter(|key| key.ends_with(suffix))
        .collect();
    log::debug!(
        "Found {} documents in {}/{} ending with {}",
        keys.len(),
        bucket,
        prefix,
        suffix
    );
    Ok(keys)
}

/// Upload every file below `local_dir` to `{destination}/{relative path}`.
///
/// Files are uploaded in sorted path order. Keys always use `/` separators.
/// Returns the uploaded keys.
pub fn upload_folder<O: ObjectStore + ?Sized>(
    store: &O,
    bucket: &str,
    local_dir: &Path,
    destination: &str,
) -> Result<Vec<String>> {
    if !local_dir.is_dir() {
        log::error!("{} doesn't exist", local_dir.display());
        return Err(Error::MissingLocalPath(local_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    collect_files(local_dir, &mut files)?;
    files.sort();

    let mut uploaded = Vec::with_capacity(files.len());
    for path in files {
        let key = object_key(destination, local_dir, &path)?;
        log::info!("Uploading {}", key);
        store.upload_file(&path, bucket, &key)?;
        uploaded.push(key);
    }

    Ok(uploaded)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

fn object_key(destination: &str, base: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(base)
        .map_err(|_| Error::Other(format!("{} is outside {}", path.display(), base.display())))?;

    let mut parts: Vec<String> = Vec::new();
    let destination = destination.trim_matches('/');
    if !destination.is_empty() {
        parts.push(destination.to_string());
    }
    parts.extend(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingStore {
        keys: Vec<String>,
        uploads: RefCell<Vec<(String, String)>>,
    }

    impl ObjectStore for RecordingStore {
        fn list_keys(&self, _bucket: &str, prefix: &str) -> Result<Vec<String>> {
            Ok(self
                .keys
                .iter()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }

        fn upload_file(&self, _local_path: &Path, bucket: &str, key: &str) -> Result<()> {
            self.uploads
                .borrow_mut()
                .push((bucket.to_string(), key.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_list_documents_filters_suffix() {
        let store = RecordingStore {
            keys: vec![
                "a.pdf".to_string(),
                "notes.txt".to_string(),
                "reports/b.pdf".to_string(),
            ],
            ..Default::default()
        };

        let all = list_documents(&store, "bucket", "", DEFAULT_DOCUMENT_SUFFIX).unwrap();
        assert_eq!(all, vec!["a.pdf", "reports/b.pdf"]);

        let reports = list_documents(&store, "bucket", "reports/", ".pdf").unwrap();
        assert_eq!(reports, vec!["reports/b.pdf"]);
    }

    #[test]
    fn test_upload_folder_missing_dir() {
        let store = RecordingStore::default();
        let result = upload_folder(&store, "bucket", Path::new("/does/not/exist"), "x");
        assert!(matches!(result, Err(Error::MissingLocalPath(_))));
        assert!(store.uploads.borrow().is_empty());
    }

    #[test]
    fn test_upload_folder_preserves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tables")).unwrap();
        fs::write(dir.path().join("tables/t.html"), "x").unwrap();
        fs::write(dir.path().join("top.txt"), "y").unwrap();

        let store = RecordingStore::default();
        let keys = upload_folder(&store, "out", dir.path(), "outputs/doc/").unwrap();

        assert_eq!(keys, vec!["outputs/doc/tables/t.html", "outputs/doc/top.txt"]);
        assert_eq!(store.uploads.borrow()[0].0, "out");
    }

    #[test]
    fn test_upload_folder_empty_destination() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "y").unwrap();

        let store = RecordingStore::default();
        let keys = upload_folder(&store, "out", dir.path(), "").unwrap();
        assert_eq!(keys, vec!["a.txt"]);
    }
}
