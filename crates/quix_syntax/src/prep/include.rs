//! Import target resolution and the include stack entries.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::lexer::Lexer;

/// File extension of module-path imports: `import a::b;` reads `a/b.qh`.
pub const HEADER_EXTENSION: &str = "qh";

/// Relative path named by a module path such as `std::io`.
pub fn module_path(target: &str) -> PathBuf {
    let mut path: PathBuf = target.split("::").collect();
    path.set_extension(HEADER_EXTENSION);
    path
}

/// Directories searched for imports, after the importing file's own directory.
#[derive(Debug, Clone, Default)]
pub struct HeaderSearch {
    dirs: Vec<PathBuf>,
}

impl HeaderSearch {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolve `relative` against `current_dir` and then each search directory.
    ///
    /// Returns the canonical path of the first existing file, or every candidate that was tried.
    pub fn resolve(&self, relative: &Path, current_dir: Option<&Path>) -> Result<PathBuf, Vec<PathBuf>> {
        if relative.is_absolute() {
            return if relative.is_file() {
                Ok(canonical(relative))
            } else {
                Err(vec![relative.to_path_buf()])
            };
        }

        let mut searched = Vec::new();
        for dir in current_dir.into_iter().chain(self.dirs.iter().map(PathBuf::as_path)) {
            let candidate = dir.join(relative);
            if candidate.is_file() {
                return Ok(canonical(&candidate));
            }
            searched.push(candidate);
        }
        Err(searched)
    }
}

/// Canonical form of `path`, or `path` itself when it does not exist on disk.
pub fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// One file being read by the preprocessor.
pub(crate) struct IncludeEntry {
    pub(crate) lexer: Lexer,
    pub(crate) path: PathBuf,
    /// Files on the chain from the root to this entry, this one included.
    pub(crate) visited: HashSet<PathBuf>,
    /// Files this entry has already imported directly.
    pub(crate) imported: HashSet<PathBuf>,
}

impl IncludeEntry {
    pub(crate) fn root(lexer: Lexer, path: PathBuf) -> Self {
        Self {
            lexer,
            visited: HashSet::from([path.clone()]),
            path,
            imported: HashSet::new(),
        }
    }

    pub(crate) fn child(&self, lexer: Lexer, path: PathBuf) -> Self {
        let mut visited = self.visited.clone();
        visited.insert(path.clone());
        Self {
            lexer,
            path,
            visited,
            imported: HashSet::new(),
        }
    }

    pub(crate) fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }
}
