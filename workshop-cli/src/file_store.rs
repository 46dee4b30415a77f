use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;
use workshop_game::BlobStore;

#[derive(Debug, Error)]
#[error("cannot {op} {}: {source}", .path.display())]
pub struct FileStoreError {
    op: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

/// Blob store keeping one JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9._-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

fn failed(op: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> FileStoreError {
    let path = path.to_path_buf();
    move |source| FileStoreError { op, path, source }
}

impl BlobStore for FileStore {
    type Error = FileStoreError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(failed("read", &path)(err)),
        }
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.root).map_err(failed("create", &self.root))?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, blob).map_err(failed("write", &staging))?;
        fs::rename(&staging, &path).map_err(failed("replace", &path))?;
        debug!("saved {} bytes to {}", blob.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(failed("remove", &path)(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "workshop-store-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn write_read_remove_roundtrip() {
        let store = FileStore::new(temp_root("roundtrip"));
        assert_eq!(store.read("workshop.save").unwrap(), None);

        store.write("workshop.save", "{\"day\":1}").unwrap();
        assert_eq!(
            store.read("workshop.save").unwrap().as_deref(),
            Some("{\"day\":1}")
        );
        store.write("workshop.save", "{\"day\":2}").unwrap();
        assert_eq!(
            store.read("workshop.save").unwrap().as_deref(),
            Some("{\"day\":2}")
        );

        store.remove("workshop.save").unwrap();
        store.remove("workshop.save").unwrap();
        assert_eq!(store.read("workshop.save").unwrap(), None);
        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn keys_cannot_escape_the_root() {
        let store = FileStore::new("/tmp/saves");
        let path = store.path_for("../../etc/passwd");
        assert_eq!(path.parent(), Some(Path::new("/tmp/saves")));
        assert_eq!(path.file_name().unwrap(), ".._.._etc_passwd.json");
    }

    #[test]
    fn unreadable_paths_report_the_file() {
        let root = temp_root("blocked");
        fs::create_dir_all(&root).unwrap();
        let store = FileStore::new(&root);
        fs::create_dir_all(store.path_for("slot")).unwrap();
        let err = store.read("slot").unwrap_err();
        assert!(err.to_string().contains("slot.json"));
        let _ = fs::remove_dir_all(root);
    }
}
