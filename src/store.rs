// src/store.rs

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// File stem of the member list written at the end of a run.
pub const INDEX_ID: &str = "_index";

/// One pretty-printed JSON file per id under a single directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open a store at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("creating store directory {:?}", &dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Write `value` to `<dir>/<id>.json`, replacing any previous file.
    pub fn write<T: Serialize + ?Sized>(&self, id: &str, value: &T) -> Result<PathBuf> {
        let path = self.path_for(id);
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("serializing record {}", id))?;
        fs::write(&path, json).with_context(|| format!("writing {:?}", &path))?;
        debug!(path = %path.display(), "record written");
        Ok(path)
    }

    pub fn read<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        let path = self.path_for(id);
        let text = fs::read_to_string(&path).with_context(|| format!("reading {:?}", &path))?;
        serde_json::from_str(&text).with_context(|| format!("decoding {:?}", &path))
    }

    /// Ids that already have a record, excluding the index file.
    pub fn written_ids(&self) -> Result<HashSet<String>> {
        let ids = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let fname = entry.file_name().to_string_lossy().to_string();
                fname
                    .strip_suffix(".json")
                    .filter(|stem| !stem.is_empty() && *stem != INDEX_ID)
                    .map(|stem| stem.to_string())
            })
            .collect();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Legislator;
    use tempfile::tempdir;

    fn member(id: &str) -> Legislator {
        Legislator {
            id: id.into(),
            full_name: "Jane Doe".into(),
            group: "Group X".into(),
            country: "Malta".into(),
            party: "Party Y".into(),
            declaration: None,
        }
    }

    #[test]
    fn write_and_read_back() -> Result<()> {
        let tmp = tempdir()?;
        let store = Store::new(tmp.path().join("data"))?;
        let path = store.write("42", &member("42"))?;
        assert_eq!(path, tmp.path().join("data").join("42.json"));

        let back: Legislator = store.read("42")?;
        assert_eq!(back, member("42"));

        let raw = fs::read_to_string(&path)?;
        assert!(raw.contains("\"fullName\": \"Jane Doe\""));
        assert!(raw.contains("\"declaration\": null"));
        Ok(())
    }

    #[test]
    fn written_ids_skip_index_and_other_files() -> Result<()> {
        let tmp = tempdir()?;
        let store = Store::new(tmp.path())?;
        store.write("1", &member("1"))?;
        store.write("2", &member("2"))?;
        store.write(INDEX_ID, &vec![member("1"), member("2")])?;
        fs::write(tmp.path().join("3.pdf"), b"")?;

        let ids = store.written_ids()?;
        assert_eq!(ids, HashSet::from(["1".to_string(), "2".to_string()]));
        Ok(())
    }
}
