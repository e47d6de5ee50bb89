//! Source discovery under an index root.

use std::path::PathBuf;
use tracing::debug;

use super::filter::FileFilter;

/// Files found under the filter's root
#[derive(Debug, Default)]
pub struct Discovery {
    /// Java sources to index, sorted
    pub files: Vec<PathBuf>,
    /// Regular files passed over by the filter
    pub skipped: usize,
}

/// Walk the root and collect indexable sources in sorted order
///
/// Unreadable directory entries are passed over. Ignored directories are
/// not descended into.
pub fn discover(filter: &FileFilter) -> Discovery {
    let mut discovery = Discovery::default();

    for entry in walkdir::WalkDir::new(filter.root())
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !e.file_type().is_dir() || !filter.skip_dir(e.path()))
        .filter_map(std::result::Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        match filter.should_skip(path) {
            None => discovery.files.push(path.to_path_buf()),
            Some(reason) => {
                debug!(path = %path.display(), reason = reason.description(), "skipped");
                discovery.skipped += 1;
            }
        }
    }

    // Deterministic order
    discovery.files.sort();
    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_sorted_java_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/b")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("src/b/Z.java"), "class Z {}").unwrap();
        fs::write(root.join("src/A.java"), "class A {}").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();
        fs::write(root.join(".git/Hidden.java"), "class Hidden {}").unwrap();

        let filter = FileFilter::new(root, &[], &[]).unwrap();
        let discovery = discover(&filter);
        let names: Vec<String> = discovery
            .files
            .iter()
            .map(|p| crate::common::relative_path(filter.root(), p))
            .collect();
        assert_eq!(names, vec!["src/A.java", "src/b/Z.java"]);
        assert_eq!(discovery.skipped, 1);
    }
}
