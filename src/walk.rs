use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

/// Directories pruned from traversal regardless of caller-supplied ignores.
const DEFAULT_IGNORES: &[&str] = &["__pycache__", "node_modules", "build", "dist", "venv", ".venv", ".git"];

/// Walks `root` and yields every `.py` file beneath it, applying the default
/// ignore set, any leading-dot directory, caller-supplied ignore prefixes,
/// and the test-file name skip. Enumeration order is filesystem-dependent
/// and intentionally not sorted: the ranker's streaming-best contract
/// depends on being able to stop early without the walker first collecting
/// and sorting the whole tree.
pub struct Walker<'a> {
    root: &'a Path,
    ignore: &'a [String],
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Path, ignore: &'a [String]) -> Self {
        Walker { root, ignore }
    }

    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                if !entry.file_type().is_dir() {
                    return true;
                }
                let keep = !self.should_skip_directory(entry.path());
                if !keep {
                    trace!(dir = %entry.path().display(), "pruning directory");
                }
                keep
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_python_file(path))
            .filter(|path| !self.should_skip_file(path))
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.root).map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
    }

    fn should_skip_directory(&self, path: &Path) -> bool {
        let rel = self.relative(path);
        let name = match rel.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => return false,
        };
        if name.starts_with('.') {
            return true;
        }
        if DEFAULT_IGNORES.contains(&name) {
            return true;
        }
        let rel_str = rel.to_string_lossy().replace('\\', "/");
        self.ignore.iter().any(|pattern| rel_str.starts_with(pattern.as_str()))
    }

    fn should_skip_file(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with("test_") || name.ends_with("_test.py") {
                return true;
            }
        }
        let rel = self.relative(path);
        let rel_str = rel.to_string_lossy().replace('\\', "/");
        self.ignore.iter().any(|pattern| rel_str.starts_with(pattern.as_str()))
    }
}

fn is_python_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}
