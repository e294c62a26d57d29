//! Recursive directory upload.
//!
//! The directory is walked first, then files are uploaded one at a time in
//! name order. The returned tree mirrors the directory: files map to their
//! public URL, subdirectories to nested maps.
use crate::error::StorageError;
use crate::object_store::ObjectStore;
use bon::Builder;
use log::{error, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Uploaded URLs arranged like the source directory.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArtifactTree {
    File(String),
    Directory(BTreeMap<String, ArtifactTree>),
}

impl ArtifactTree {
    pub fn as_url(&self) -> Option<&str> {
        match self {
            ArtifactTree::File(url) => Some(url),
            ArtifactTree::Directory(_) => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactTree> {
        match self {
            ArtifactTree::Directory(children) => children.get(name),
            ArtifactTree::File(_) => None,
        }
    }

    fn children_mut(&mut self) -> &mut BTreeMap<String, ArtifactTree> {
        if let ArtifactTree::File(_) = self {
            *self = ArtifactTree::Directory(BTreeMap::new());
        }
        match self {
            ArtifactTree::Directory(children) => children,
            ArtifactTree::File(_) => unreachable!("replaced by a directory above"),
        }
    }
}

#[derive(Builder, Clone, Debug, Default)]
pub struct UploadOptions {
    /// Only files with one of these extensions (dot included, e.g. `.csv`) are
    /// uploaded. Empty means everything.
    #[builder(default)]
    extensions: Vec<String>,
    /// Prepended verbatim to every storage key.
    #[builder(into)]
    key_prefix: Option<String>,
}

impl UploadOptions {
    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        self.extensions.iter().any(|allowed| *allowed == extension)
    }

    fn key_for(&self, relative_key: String) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{prefix}{relative_key}"),
            None => relative_key,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadFailure {
    pub key: String,
    pub path: PathBuf,
    pub reason: String,
}

/// Result of [`upload_directory`].
///
/// Files that failed to upload are absent from `tree` and listed in `failures`.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub tree: BTreeMap<String, ArtifactTree>,
    pub failures: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_keys(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.key.as_str()).collect()
    }

    fn directory(&mut self, segments: &[String]) -> &mut BTreeMap<String, ArtifactTree> {
        let mut current = &mut self.tree;
        for segment in segments {
            current = current
                .entry(segment.clone())
                .or_insert_with(|| ArtifactTree::Directory(BTreeMap::new()))
                .children_mut();
        }
        current
    }
}

enum WalkEntry {
    Directory(Vec<String>),
    File { segments: Vec<String>, path: PathBuf },
}

fn walk(dir: &Path, segments: &[String], entries: &mut Vec<WalkEntry>) -> io::Result<()> {
    let mut children = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    children.sort_by_key(|child| child.file_name());
    for child in children {
        let path = child.path();
        let mut child_segments = segments.to_vec();
        child_segments.push(child.file_name().to_string_lossy().into_owned());
        if path.is_file() {
            entries.push(WalkEntry::File {
                segments: child_segments,
                path,
            });
        } else if path.is_dir() {
            entries.push(WalkEntry::Directory(child_segments.clone()));
            walk(&path, &child_segments, entries)?;
        }
    }
    Ok(())
}

/// Storage key of `path`: its location relative to the parent of `root`,
/// `/`-separated, so keys start with the root directory's own name.
fn relative_key(root: &Path, path: &Path) -> String {
    let base = root.parent().unwrap_or(Path::new(""));
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .filter(|part| part != "/")
        .collect::<Vec<_>>()
        .join("/")
}

/// Uploads every file below `root` and returns the URL tree.
///
/// A file that fails to upload is logged and reported in
/// [`UploadReport::failures`]; the remaining files are still uploaded.
pub async fn upload_directory<S: ObjectStore>(
    store: &S,
    root: &Path,
    options: &UploadOptions,
) -> Result<UploadReport, StorageError> {
    info!("uploading directory {}", root.display());
    let mut entries = Vec::new();
    walk(root, &[], &mut entries)?;

    let mut report = UploadReport::default();
    for entry in entries {
        match entry {
            WalkEntry::Directory(segments) => {
                report.directory(&segments);
            }
            WalkEntry::File { segments, path } => {
                if !options.accepts(&path) {
                    continue;
                }
                let key = options.key_for(relative_key(root, &path));
                match store.put_file(&path, &key).await {
                    Ok(url) => {
                        info!("uploaded {} to {url}", path.display());
                        if let Some((name, parents)) = segments.split_last() {
                            report
                                .directory(parents)
                                .insert(name.clone(), ArtifactTree::File(url));
                        }
                    }
                    Err(e) => {
                        error!("upload of {} failed: {e}", path.display());
                        report.failures.push(UploadFailure {
                            key,
                            path,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_key_starts_at_root_name() {
        let root = Path::new("/srv/output/1234");
        let file = Path::new("/srv/output/1234/top10/a.fasta");
        assert_eq!(relative_key(root, file), "1234/top10/a.fasta");
    }

    #[test]
    fn test_relative_key_for_relative_root() {
        let root = Path::new("run");
        assert_eq!(relative_key(root, Path::new("run/raw_output.csv")), "run/raw_output.csv");
    }

    #[test]
    fn test_extension_filter() {
        let options = UploadOptions::builder()
            .extensions(vec![".csv".into(), ".html".into()])
            .build();
        assert!(options.accepts(Path::new("x/raw_output.csv")));
        assert!(options.accepts(Path::new("plots/fig.html")));
        assert!(!options.accepts(Path::new("top10/preds.fasta")));
        assert!(!options.accepts(Path::new("README")));
        assert!(UploadOptions::default().accepts(Path::new("README")));
    }

    #[test]
    fn test_key_prefix_is_verbatim() {
        let options = UploadOptions::builder().key_prefix("tenant-a/").build();
        assert_eq!(options.key_for("run/x.csv".into()), "tenant-a/run/x.csv");
    }

    #[test]
    fn test_tree_serializes_as_plain_json() {
        let mut report = UploadReport::default();
        report
            .directory(&["top10".to_string()])
            .insert("a.fasta".into(), ArtifactTree::File("http://x/a.fasta".into()));
        report
            .tree
            .insert("raw_output.csv".into(), ArtifactTree::File("http://x/raw.csv".into()));
        let json = serde_json::to_value(&report.tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "raw_output.csv": "http://x/raw.csv",
                "top10": {"a.fasta": "http://x/a.fasta"}
            })
        );
    }
}
