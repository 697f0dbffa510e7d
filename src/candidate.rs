use std::path::PathBuf;

use serde::Serialize;

/// The kind of a concrete symbol found by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Class,
    Function,
    AsyncFunction,
}

impl CandidateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateKind::Class => "class",
            CandidateKind::Function => "function",
            CandidateKind::AsyncFunction => "async_function",
        }
    }
}

/// One top-level symbol extracted from one file, before scoring.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub kind: CandidateKind,
    pub module: String,
    pub file_path: PathBuf,
    pub lineno: usize,
    /// Names of direct function/async-function members. Empty for
    /// function/async_function candidates.
    pub methods: Vec<String>,
    pub decorators: Vec<String>,
    pub bases: Vec<String>,
    pub docstring: Option<String>,
}

/// A [`Candidate`] that scored above zero against some signature, plus the
/// project root it was found under (needed by the loader).
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResult {
    pub name: String,
    pub kind: CandidateKind,
    pub module: String,
    pub file_path: PathBuf,
    pub lineno: usize,
    pub methods: Vec<String>,
    pub decorators: Vec<String>,
    pub bases: Vec<String>,
    pub docstring: Option<String>,
    pub score: f64,
    #[serde(skip)]
    pub root: PathBuf,
}

impl DiscoveryResult {
    pub(crate) fn from_candidate(candidate: Candidate, score: f64, root: PathBuf) -> Self {
        DiscoveryResult {
            name: candidate.name,
            kind: candidate.kind,
            module: candidate.module,
            file_path: candidate.file_path,
            lineno: candidate.lineno,
            methods: candidate.methods,
            decorators: candidate.decorators,
            bases: candidate.bases,
            docstring: candidate.docstring,
            score,
            root,
        }
    }

    /// Module name to import if `self.module` turns out not to be importable
    /// as-is: the file path relative to root, dotted, `__init__` dropped.
    pub(crate) fn fallback_module_name(&self) -> String {
        let rel = self.file_path.strip_prefix(&self.root).unwrap_or(&self.file_path);
        let mut parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if let Some(last) = parts.last_mut() {
            if last == "__init__.py" {
                parts.pop();
            } else if let Some(stem) = last.strip_suffix(".py") {
                *last = stem.to_string();
            }
        }
        let dotted = parts.join(".");
        if dotted.is_empty() {
            self.file_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            dotted
        }
    }
}

/// Description of a live Python object as reported by the loader's
/// `python3` subprocess driver (see `loader`).
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct LoadedSymbol {
    pub name: String,
    pub qualname: String,
    pub module: String,
    pub repr: String,
    pub doc: Option<String>,
}
