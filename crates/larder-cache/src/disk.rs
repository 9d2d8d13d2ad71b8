use crate::error::CacheError;
use crate::key::CacheKey;
use crate::record::CacheRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Largest record file the store will read back.
pub const MAX_RECORD_BYTES: u64 = i32::MAX as u64;

/// Reads and writes encoded records under a single directory, one file per
/// cache key.
///
/// Writes stage into a uniquely-named temp file and rename over the
/// destination, so a concurrent reader sees either the old record or the
/// new one, never a partial file.
#[derive(Debug)]
pub struct DiskStore {
    dir: PathBuf,
    tmp_counter: AtomicU64,
}

impl DiskStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            tmp_counter: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filesystem-safe name for a key: `<method>_<uri>` lowercased, with a
    /// leading `http://` or `https://` stripped, each of `. : / , % ? & =`
    /// replaced by `_`, and runs of `+` collapsed to a single `_`.
    ///
    /// Not a bijection: distinct URIs can collapse to the same name after
    /// sanitization, in which case they share a file.
    pub fn file_name_for(key: &CacheKey) -> String {
        let uri = key.uri().to_lowercase();
        let uri = uri
            .strip_prefix("http://")
            .or_else(|| uri.strip_prefix("https://"))
            .unwrap_or(&uri);
        let raw = format!("{}_{}", key.method().to_lowercase(), uri);

        let mut name = String::with_capacity(raw.len());
        let mut in_plus_run = false;
        for c in raw.chars() {
            if c == '+' {
                if !in_plus_run {
                    name.push('_');
                }
                in_plus_run = true;
                continue;
            }
            in_plus_run = false;
            match c {
                '.' | ':' | '/' | ',' | '%' | '?' | '&' | '=' => name.push('_'),
                other => name.push(other),
            }
        }
        name
    }

    pub fn read(&self, name: &str) -> Result<CacheRecord, CacheError> {
        let path = self.dir.join(name);
        let size = fs::metadata(&path)?.len();
        if size > MAX_RECORD_BYTES {
            return Err(CacheError::FileTooLarge {
                size,
                max: MAX_RECORD_BYTES,
            });
        }
        let bytes = fs::read(&path)?;
        CacheRecord::decode(&bytes)
    }

    pub fn write(&self, name: &str, record: &CacheRecord) -> Result<(), CacheError> {
        let encoded = record.encode()?;
        let tmp = self.dir.join(format!(
            "{name}.{}.{}.tmp",
            std::process::id(),
            self.tmp_counter.fetch_add(1, Ordering::Relaxed)
        ));
        if let Err(e) = fs::write(&tmp, &encoded) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, self.dir.join(name)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Best-effort removal; a file that is already gone is not an error.
    pub fn remove(&self, name: &str) {
        if let Err(e) = fs::remove_file(self.dir.join(name)) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(error = %e, file = name, "failed to remove cache file");
            }
        }
    }

    /// Remove every file in the store directory, including leftover temp
    /// files from interrupted writes.
    pub fn clear(&self) -> Result<(), CacheError> {
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Err(e) = fs::remove_file(entry.path()) {
                    tracing::warn!(error = %e, path = %entry.path().display(), "failed to remove cache file");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Protocol;
    use bytes::Bytes;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn store() -> (DiskStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let store = DiskStore::open(dir.path()).expect("open store");
        (store, dir)
    }

    fn get_key(uri: &str) -> CacheKey {
        CacheKey::new("GET", uri, Protocol::http_1_1(), vec![])
    }

    fn record(body: &'static [u8]) -> CacheRecord {
        CacheRecord::new(
            200,
            HashMap::from([("content-type".to_string(), "text/plain".to_string())]),
            Bytes::from_static(body),
        )
    }

    #[test]
    fn file_name_strips_scheme_and_replaces_specials() {
        let key = get_key("http://api.example.com/v1/items?x=1");
        assert_eq!(
            DiskStore::file_name_for(&key),
            "get_api_example_com_v1_items_x_1"
        );
    }

    #[test]
    fn file_name_strips_https_scheme() {
        let key = get_key("https://api.example.com/v1/items");
        assert_eq!(DiskStore::file_name_for(&key), "get_api_example_com_v1_items");
    }

    #[test]
    fn file_name_lowercases_method_and_uri() {
        let key = CacheKey::new(
            "DELETE",
            "http://API.example.com/Items/42",
            Protocol::http_1_1(),
            vec![],
        );
        assert_eq!(DiskStore::file_name_for(&key), "delete_api_example_com_items_42");
    }

    #[test]
    fn file_name_collapses_plus_runs() {
        let key = get_key("http://host/search?q=a+++b+c");
        assert_eq!(DiskStore::file_name_for(&key), "get_host_search_q_a_b_c");
    }

    #[test]
    fn write_then_read_round_trips() {
        let (store, _dir) = store();
        let rec = record(b"hello");
        store.write("entry", &rec).unwrap();
        assert_eq!(store.read("entry").unwrap(), rec);
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let (store, dir) = store();
        store.write("entry", &record(b"hello")).unwrap();
        store.write("entry", &record(b"world")).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["entry".to_string()]);
        assert_eq!(&store.read("entry").unwrap().body[..], b"world");
    }

    #[test]
    fn read_missing_file_is_an_error() {
        let (store, _dir) = store();
        assert!(matches!(store.read("absent"), Err(CacheError::Io(_))));
    }

    #[test]
    fn read_corrupt_file_is_an_error() {
        let (store, dir) = store();
        fs::write(dir.path().join("mangled"), [200u8]).unwrap();
        assert!(matches!(
            store.read("mangled"),
            Err(CacheError::Truncated { .. })
        ));
    }

    #[test]
    fn remove_is_idempotent() {
        let (store, dir) = store();
        store.write("entry", &record(b"x")).unwrap();
        store.remove("entry");
        store.remove("entry");
        assert!(!dir.path().join("entry").exists());
    }

    #[test]
    fn clear_empties_the_directory() {
        let (store, dir) = store();
        store.write("a", &record(b"1")).unwrap();
        store.write("b", &record(b"2")).unwrap();
        store.clear().unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
