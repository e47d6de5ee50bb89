//! File filtering for gitignore-style rules and include/exclude globs.
//!
//! Precedence:
//! 1. Hard internal ignores (index databases, VCS and build directories)
//! 2. Gitignore-style rules (.gitignore, .ignore)
//! 3. Non-Java files
//! 4. Include patterns (if any)
//! 5. Exclude patterns

use anyhow::Result;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::common::relative_path;

/// Directories never descended into
const INTERNAL_IGNORE_DIRS: &[&str] = &[
    ".git",
    ".jxref",
    ".gradle",
    ".idea",
    "target",
    "build",
    "out",
    "node_modules",
];

/// Database files never indexed
const INTERNAL_IGNORE_EXTS: &[&str] = &[".db", ".db-journal", ".db-wal", ".db-shm", ".sqlite"];

/// Why a path was left out of an index run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotAFile,
    NotJava,
    IgnoredInternal,
    IgnoredByGitignore,
    ExcludedByGlob,
}

impl SkipReason {
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::NotAFile => "not a regular file",
            SkipReason::NotJava => "not a .java source",
            SkipReason::IgnoredInternal => "internal ignore rule",
            SkipReason::IgnoredByGitignore => "ignored by .gitignore/.ignore",
            SkipReason::ExcludedByGlob => "excluded by glob",
        }
    }
}

/// Which files under a root get indexed
pub struct FileFilter {
    root: PathBuf,
    gitignore: Gitignore,
    include: Vec<globset::GlobMatcher>,
    exclude: Vec<globset::GlobMatcher>,
}

impl FileFilter {
    /// Build a filter; include globs default to everything
    pub fn new(root: &Path, include: &[String], exclude: &[String]) -> Result<Self> {
        let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        let gitignore = Self::load_gitignore(&root)?;
        Ok(Self {
            include: compile_globs(include)?,
            exclude: compile_globs(exclude)?,
            gitignore,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_gitignore(root: &Path) -> Result<Gitignore> {
        let mut builder = GitignoreBuilder::new(root);
        for name in [".gitignore", ".ignore"] {
            let path = root.join(name);
            if path.exists() {
                // A malformed ignore file must not stop indexing
                if let Some(err) = builder.add(&path) {
                    warn!("Failed to load {}: {}", path.display(), err);
                }
            }
        }
        Ok(builder.build()?)
    }

    /// Reason to skip `path`, or `None` to index it
    pub fn should_skip(&self, path: &Path) -> Option<SkipReason> {
        if !path.is_file() {
            return Some(SkipReason::NotAFile);
        }
        if self.is_internal_ignore(path) {
            return Some(SkipReason::IgnoredInternal);
        }
        if self.is_gitignored(path) {
            return Some(SkipReason::IgnoredByGitignore);
        }
        if path.extension().and_then(|e| e.to_str()) != Some("java") {
            return Some(SkipReason::NotJava);
        }
        let relative = relative_path(&self.root, path);
        if !self.include.is_empty() && !self.include.iter().any(|m| m.is_match(&relative)) {
            return Some(SkipReason::ExcludedByGlob);
        }
        if self.exclude.iter().any(|m| m.is_match(&relative)) {
            return Some(SkipReason::ExcludedByGlob);
        }
        None
    }

    /// Whether a directory should not be descended into
    pub fn skip_dir(&self, path: &Path) -> bool {
        if path == self.root {
            return false;
        }
        let internal = path
            .file_name()
            .map(|n| INTERNAL_IGNORE_DIRS.contains(&n.to_string_lossy().as_ref()))
            .unwrap_or(false);
        internal || self.is_gitignored(path)
    }

    fn is_internal_ignore(&self, path: &Path) -> bool {
        if let Some(file_name) = path.file_name() {
            let file_name = file_name.to_string_lossy();
            if INTERNAL_IGNORE_EXTS.iter().any(|ext| file_name.ends_with(ext)) {
                return true;
            }
        }
        path.strip_prefix(&self.root)
            .map(|rel| {
                rel.components().any(|c| match c {
                    std::path::Component::Normal(dir) => {
                        INTERNAL_IGNORE_DIRS.contains(&dir.to_string_lossy().as_ref())
                    }
                    _ => false,
                })
            })
            .unwrap_or(false)
    }

    fn is_gitignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        // Ancestors too, so `build/` matches files below it
        self.gitignore
            .matched_path_or_any_parents(relative, path.is_dir())
            .is_ignore()
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<globset::GlobMatcher>> {
    patterns
        .iter()
        .map(|pattern| {
            globset::Glob::new(pattern)
                .map(|g| g.compile_matcher())
                .map_err(|e| anyhow::anyhow!("Invalid glob pattern '{}': {}", pattern, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_internal_ignores() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("target/Gen.java"), "class Gen {}").unwrap();
        fs::write(root.join("index.db"), "data").unwrap();
        let filter = FileFilter::new(root, &[], &[]).unwrap();

        assert_eq!(
            filter.should_skip(&filter.root().join("target/Gen.java")),
            Some(SkipReason::IgnoredInternal)
        );
        assert_eq!(
            filter.should_skip(&filter.root().join("index.db")),
            Some(SkipReason::IgnoredInternal)
        );
        assert!(filter.skip_dir(&filter.root().join("target")));
    }

    #[test]
    fn test_only_java_sources() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("A.java"), "class A {}").unwrap();
        fs::write(root.join("notes.txt"), "text").unwrap();
        let filter = FileFilter::new(root, &[], &[]).unwrap();

        assert_eq!(filter.should_skip(&filter.root().join("A.java")), None);
        assert_eq!(
            filter.should_skip(&filter.root().join("notes.txt")),
            Some(SkipReason::NotJava)
        );
    }

    #[test]
    fn test_gitignore_and_globs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "Skipped.java\ngen/\n").unwrap();
        fs::create_dir_all(root.join("gen")).unwrap();
        fs::create_dir_all(root.join("src/test")).unwrap();
        fs::write(root.join("Skipped.java"), "class Skipped {}").unwrap();
        fs::write(root.join("gen/Out.java"), "class Out {}").unwrap();
        fs::write(root.join("src/Main.java"), "class Main {}").unwrap();
        fs::write(root.join("src/test/MainTest.java"), "class MainTest {}").unwrap();

        let filter = FileFilter::new(root, &[], &["src/test/**".to_string()]).unwrap();
        let root = filter.root().to_path_buf();
        assert_eq!(
            filter.should_skip(&root.join("Skipped.java")),
            Some(SkipReason::IgnoredByGitignore)
        );
        assert_eq!(
            filter.should_skip(&root.join("gen/Out.java")),
            Some(SkipReason::IgnoredByGitignore)
        );
        assert_eq!(filter.should_skip(&root.join("src/Main.java")), None);
        assert_eq!(
            filter.should_skip(&root.join("src/test/MainTest.java")),
            Some(SkipReason::ExcludedByGlob)
        );

        let include_only = FileFilter::new(&root, &["src/test/**".to_string()], &[]).unwrap();
        assert_eq!(
            include_only.should_skip(&root.join("src/Main.java")),
            Some(SkipReason::ExcludedByGlob)
        );
    }

    #[test]
    fn test_invalid_glob_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(FileFilter::new(temp_dir.path(), &["[".to_string()], &[]).is_err());
    }
}
