use std::path::Path;

use rustpython_parser::ast::{self, Stmt};
use tracing::{trace, warn};

use crate::candidate::{Candidate, CandidateKind};
use crate::parser::{docstring, expr_to_name, parse_file};

/// Extract every top-level class/function/async-function candidate from one
/// file. Nested symbols (methods, inner functions) are not emitted as
/// candidates of their own; a class's direct methods are recorded in its
/// `methods` field instead. Unreadable or unparseable files silently yield
/// nothing — this stage never panics or propagates an error.
pub fn extract_candidates(file_path: &Path, root: &Path) -> Vec<Candidate> {
    let Some(parsed) = parse_file(file_path) else {
        warn!(file = %file_path.display(), "skipping unreadable or unparseable file");
        return Vec::new();
    };

    let module = module_name_for(file_path, root);
    let mut candidates = Vec::new();

    for stmt in &parsed.module.body {
        match stmt {
            Stmt::ClassDef(class) => {
                let methods = class
                    .body
                    .iter()
                    .filter_map(|member| match member {
                        Stmt::FunctionDef(f) => Some(f.name.to_string()),
                        Stmt::AsyncFunctionDef(f) => Some(f.name.to_string()),
                        _ => None,
                    })
                    .collect();
                let decorators = class.decorator_list.iter().map(expr_to_name).collect();
                let bases = class.bases.iter().map(expr_to_name).collect();

                candidates.push(Candidate {
                    name: class.name.to_string(),
                    kind: CandidateKind::Class,
                    module: module.clone(),
                    file_path: file_path.to_path_buf(),
                    lineno: parsed.offset_to_line(class.range.start().into()),
                    methods,
                    decorators,
                    bases,
                    docstring: docstring(&class.body),
                });
            }
            Stmt::FunctionDef(func) => {
                candidates.push(Candidate {
                    name: func.name.to_string(),
                    kind: CandidateKind::Function,
                    module: module.clone(),
                    file_path: file_path.to_path_buf(),
                    lineno: parsed.offset_to_line(func.range.start().into()),
                    methods: Vec::new(),
                    decorators: func.decorator_list.iter().map(expr_to_name).collect(),
                    bases: Vec::new(),
                    docstring: docstring(&func.body),
                });
            }
            Stmt::AsyncFunctionDef(func) => {
                candidates.push(Candidate {
                    name: func.name.to_string(),
                    kind: CandidateKind::AsyncFunction,
                    module: module.clone(),
                    file_path: file_path.to_path_buf(),
                    lineno: parsed.offset_to_line(func.range.start().into()),
                    methods: Vec::new(),
                    decorators: func.decorator_list.iter().map(expr_to_name).collect(),
                    bases: Vec::new(),
                    docstring: docstring(&func.body),
                });
            }
            _ => {}
        }
    }

    trace!(file = %file_path.display(), count = candidates.len(), "extracted candidates");
    candidates
}

/// Derive a dotted module path from a file's location relative to root.
/// `__init__.py` contributes its parent package name only; any other file
/// contributes its stem.
fn module_name_for(file_path: &Path, root: &Path) -> String {
    let rel = file_path.strip_prefix(root).unwrap_or(file_path);
    let mut parts: Vec<String> = rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();

    if let Some(last) = parts.last().cloned() {
        if last == "__init__.py" {
            parts.pop();
        } else if let Some(stem) = last.strip_suffix(".py") {
            let stem = stem.to_string();
            *parts.last_mut().unwrap() = stem;
        }
    }

    let dotted = parts.join(".");
    if dotted.is_empty() {
        file_stem(file_path)
    } else {
        dotted
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}
