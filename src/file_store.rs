use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_file: bool,
}

// 書き換え対象のツリーへの読み書き
pub trait FileStore {
    fn list_entries(&self, dir: &Path) -> Result<Vec<Entry>>;

    fn read_text(&self, path: &Path) -> Result<String>;

    // ファイル全体を置き換える
    fn write_text(&self, path: &Path, contents: &str) -> Result<()>;
}

pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn list_entries(&self, dir: &Path) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for entry in
            fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
        {
            let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
            let path = entry.path();
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: path.is_dir(),
                is_file: path.is_file(),
                path,
            });
        }
        Ok(entries)
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn write_text(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }
}
