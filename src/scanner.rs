use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::{
    file_store::{Entry, FileStore},
    struct_tag::merger::{mirror_tags, Rewrite},
};

pub static DEFAULT_SKIP_MARKERS: [&str; 1] = [".git"];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    // 名前にこれらを含むディレクトリには入らない
    pub skip_markers: Vec<String>,
    pub dry_run: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            skip_markers: DEFAULT_SKIP_MARKERS.iter().map(|s| s.to_string()).collect(),
            dry_run: false,
        }
    }
}

impl ScanOptions {
    fn is_skipped(&self, dir_name: &str) -> bool {
        self.skip_markers.iter().any(|m| dir_name.contains(m.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlistableDirectory {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Traversal {
    pub files: Vec<PathBuf>,
    pub unlistable: Vec<UnlistableDirectory>,
}

// 深さ優先，同じディレクトリ内は名前順
// root が読めないときだけエラーにする
pub fn collect_files<S: FileStore>(
    store: &S,
    root: &Path,
    options: &ScanOptions,
) -> Result<Traversal> {
    let mut traversal = Traversal::default();
    let entries = store.list_entries(root)?;
    visit_entries(store, entries, options, &mut traversal);
    Ok(traversal)
}

fn visit_entries<S: FileStore>(
    store: &S,
    mut entries: Vec<Entry>,
    options: &ScanOptions,
    traversal: &mut Traversal,
) {
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    for entry in entries {
        if entry.is_dir {
            if options.is_skipped(&entry.name) {
                continue;
            }
            match store.list_entries(&entry.path) {
                Ok(children) => visit_entries(store, children, options, traversal),
                Err(e) => traversal.unlistable.push(UnlistableDirectory {
                    path: entry.path,
                    message: format!("{:#}", e),
                }),
            }
        } else if entry.is_file {
            traversal.files.push(entry.path);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    Unchanged,
    Rewritten,
    Malformed,
    Unreadable,
    Unwritable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub rewrites: Vec<Rewrite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FileReport {
    fn new(path: &Path, status: FileStatus) -> Self {
        Self {
            path: path.to_path_buf(),
            status,
            rewrites: Vec::new(),
            message: None,
        }
    }

    fn failed(path: &Path, status: FileStatus, error: anyhow::Error) -> Self {
        Self {
            message: Some(format!("{:#}", error)),
            ..Self::new(path, status)
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(
            self.status,
            FileStatus::Malformed | FileStatus::Unreadable | FileStatus::Unwritable
        )
    }
}

// read => mirror => write
// どの段階で失敗してもファイルは書き換えない
pub fn process_file<S: FileStore>(store: &S, path: &Path, options: &ScanOptions) -> FileReport {
    let text = match store.read_text(path) {
        Ok(text) => text,
        Err(e) => return FileReport::failed(path, FileStatus::Unreadable, e),
    };

    let mirrored = match mirror_tags(&text) {
        Ok(mirrored) => mirrored,
        Err(e) => return FileReport::failed(path, FileStatus::Malformed, e),
    };

    if !mirrored.is_changed() {
        return FileReport::new(path, FileStatus::Unchanged);
    }

    if !options.dry_run {
        if let Err(e) = store.write_text(path, &mirrored.text) {
            return FileReport::failed(path, FileStatus::Unwritable, e);
        }
    }

    FileReport {
        rewrites: mirrored.rewrites,
        ..FileReport::new(path, FileStatus::Rewritten)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub root: PathBuf,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub unlistable_directories: Vec<UnlistableDirectory>,
}

impl ScanReport {
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    pub fn rewrite_count(&self) -> usize {
        self.files.iter().map(|f| f.rewrites.len()).sum()
    }
}

// 進捗表示などのためのフック
pub trait ScanObserver {
    fn collected(&mut self, _traversal: &Traversal) {}

    fn processed(&mut self, _report: &FileReport) {}
}

impl ScanObserver for () {}

// 全ファイルを集めてから 1 つずつ処理する
pub fn scan<S: FileStore, O: ScanObserver>(
    store: &S,
    root: &Path,
    options: &ScanOptions,
    observer: &mut O,
) -> Result<ScanReport> {
    let traversal = collect_files(store, root, options)?;
    observer.collected(&traversal);

    let mut files = Vec::with_capacity(traversal.files.len());
    for path in &traversal.files {
        let report = process_file(store, path, options);
        observer.processed(&report);
        files.push(report);
    }

    Ok(ScanReport {
        root: root.to_path_buf(),
        dry_run: options.dry_run,
        files,
        unlistable_directories: traversal.unlistable,
    })
}
