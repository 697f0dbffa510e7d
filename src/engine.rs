use std::path::{Path, PathBuf};

use tracing::debug;

use crate::candidate::{DiscoveryResult, LoadedSymbol};
use crate::error::{DiscoveryError, Result};
use crate::extractor::extract_candidates;
use crate::loader;
use crate::scorer;
use crate::signature::Signature;
use crate::walk::Walker;

/// Walks a project tree and locates symbols by static structure rather than
/// import path. Holds no mutable state between calls other than its root
/// and ignore list, so it is safe to share across threads and to call
/// concurrently (each `discover`/`discover_all` rebuilds candidates afresh).
pub struct DiscoveryEngine {
    root: PathBuf,
    ignore: Vec<String>,
}

impl DiscoveryEngine {
    /// Build an engine rooted at `root` (defaulting to the current
    /// directory), pruning any path under `root` whose relative,
    /// forward-slash form starts with one of `ignore`.
    pub fn new(root: Option<impl AsRef<Path>>, ignore: impl IntoIterator<Item = impl Into<String>>) -> std::io::Result<Self> {
        let root = match root {
            Some(root) => root.as_ref().canonicalize()?,
            None => std::env::current_dir()?,
        };
        Ok(DiscoveryEngine { root, ignore: ignore.into_iter().map(Into::into).collect() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the best match for `signature`, loaded into a [`LoadedSymbol`].
    pub fn discover(&self, signature: &Signature) -> Result<LoadedSymbol> {
        let result = self.best_match(signature)?;
        loader::load(&result)
    }

    /// Return the best match for `signature` without loading it.
    pub fn discover_no_load(&self, signature: &Signature) -> Result<DiscoveryResult> {
        self.best_match(signature)
    }

    /// Return every candidate that matched `signature`, sorted by score
    /// descending (stable: ties keep walker-encounter order).
    pub fn discover_all(&self, signature: &Signature) -> Result<Vec<DiscoveryResult>> {
        let mut results: Vec<DiscoveryResult> = self.match_candidates(signature)?;
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        if results.is_empty() {
            return Err(DiscoveryError::NotFound(signature.to_string()));
        }
        Ok(results)
    }

    fn best_match(&self, signature: &Signature) -> Result<DiscoveryResult> {
        let mut best: Option<DiscoveryResult> = None;
        for candidate in self.stream_candidates(signature)? {
            match &best {
                Some(current) if candidate.score <= current.score => {}
                _ => best = Some(candidate),
            }
        }
        best.ok_or_else(|| DiscoveryError::NotFound(signature.to_string()))
    }

    fn match_candidates(&self, signature: &Signature) -> Result<Vec<DiscoveryResult>> {
        self.stream_candidates(signature)
    }

    /// Walk the tree, extract candidates, and score them against
    /// `signature`, keeping only those that score above zero.
    fn stream_candidates(&self, signature: &Signature) -> Result<Vec<DiscoveryResult>> {
        let walker = Walker::new(&self.root, &self.ignore);
        let mut results = Vec::new();
        for file_path in walker.iter() {
            for candidate in extract_candidates(&file_path, &self.root) {
                let score = scorer::score(&candidate, signature)?;
                if score <= 0.0 {
                    continue;
                }
                debug!(name = %candidate.name, file = %candidate.file_path.display(), score, "candidate matched");
                results.push(DiscoveryResult::from_candidate(candidate, score, self.root.clone()));
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn engine(root: &Path) -> DiscoveryEngine {
        DiscoveryEngine::new(Some(root), Vec::<String>::new()).unwrap()
    }

    /// Spec §8 scenario 3: ranking among near-misses. `TodoServiceMixin`
    /// shares under half the required methods and is disqualified;
    /// `TodoServiceLegacy` and `TodoService` both qualify with strictly
    /// decreasing scores, `TodoService` winning on full method coverage.
    #[test]
    fn discover_all_ranks_near_misses_and_drops_disqualified() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "services.py",
            r#"
class TodoServiceMixin:
    def add(self):
        pass

class TodoServiceLegacy:
    def add(self):
        pass
    def complete(self):
        pass

class TodoService:
    def add(self):
        pass
    def complete(self):
        pass
    def list(self):
        pass
"#,
        );

        let signature = Signature::new("TodoService").methods(["add", "complete", "list"]);
        let results = engine(dir.path()).discover_all(&signature).unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["TodoService", "TodoServiceLegacy"]);
        assert!(results[0].score > results[1].score);
    }

    /// Spec §8 scenarios 4-5: an exact module constraint selects the
    /// candidate living in that module and rejects every other module.
    #[test]
    fn module_constraint_hit_and_miss() {
        let dir = tempdir().unwrap();
        write(dir.path(), "services/todo.py", "class TodoService:\n    pass\n");

        let hit = Signature::new("TodoService").module("services.todo");
        let result = engine(dir.path()).discover_no_load(&hit).unwrap();
        assert_eq!(result.module, "services.todo");

        let miss = Signature::new("TodoService").module("services.unknown");
        let err = engine(dir.path()).discover_no_load(&miss).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotFound(_)));
    }

    /// Spec §8 scenario 6: a regex name matches `UserRepo`/`AdminRepo` but
    /// excludes `RepoHelper`, which doesn't end with `Repo`.
    #[test]
    fn discover_all_regex_name_excludes_non_matching_suffix() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "repos.py",
            "class UserRepo:\n    pass\n\nclass AdminRepo:\n    pass\n\nclass RepoHelper:\n    pass\n",
        );

        let signature = Signature::new("Repo$").regex(true);
        let results = engine(dir.path()).discover_all(&signature).unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"UserRepo"));
        assert!(names.contains(&"AdminRepo"));
        assert!(!names.contains(&"RepoHelper"));
        assert!(results.iter().all(|r| r.score > 0.0));
    }

    /// `discover_no_load`'s result must match `discover_all`'s first element
    /// on every field (spec §8 invariant 4).
    #[test]
    fn discover_no_load_matches_discover_all_first_element() {
        let dir = tempdir().unwrap();
        write(dir.path(), "widgets.py", "class Widget:\n    def spin(self):\n        pass\n");

        let signature = Signature::new("Widget");
        let eng = engine(dir.path());
        let best = eng.discover_no_load(&signature).unwrap();
        let all = eng.discover_all(&signature).unwrap();

        assert_eq!(best.name, all[0].name);
        assert_eq!(best.module, all[0].module);
        assert_eq!(best.file_path, all[0].file_path);
        assert_eq!(best.score, all[0].score);
    }
}
