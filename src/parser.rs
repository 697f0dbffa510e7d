use std::fs;
use std::path::Path;

use rustpython_parser::{Parse, ast};

/// A parsed Python file together with its source, for line-number lookups.
pub struct ParsedFile {
    pub module: ast::ModModule,
    pub source: String,
}

impl ParsedFile {
    /// Convert a byte offset to a 1-based line number.
    pub fn offset_to_line(&self, offset: u32) -> usize {
        let offset = offset as usize;
        self.source[..offset.min(self.source.len())].matches('\n').count() + 1
    }
}

/// Parse a Python file's source into an AST. Returns `None` on I/O or syntax
/// error rather than propagating: discovery must tolerate unreadable or
/// malformed files by contributing zero candidates, not by failing.
pub fn parse_file(path: &Path) -> Option<ParsedFile> {
    let source = fs::read_to_string(path).ok()?;
    let module = ast::ModModule::parse(&source, path.to_string_lossy().as_ref()).ok()?;
    Some(ParsedFile { module, source })
}

/// The leading string-literal statement of a body, if present.
pub fn docstring(body: &[ast::Stmt]) -> Option<String> {
    let first = body.first()?;
    let ast::Stmt::Expr(expr_stmt) = first else {
        return None;
    };
    match expr_stmt.value.as_ref() {
        ast::Expr::Constant(c) => match &c.value {
            ast::Constant::Str(s) => Some(s.to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// Render an expression to the name used for decorator/base comparisons.
///
/// A call normalizes to its callee's name (so `@dataclass` and
/// `@repeat(3)` both compare as `dataclass`/`repeat`); attribute access
/// renders as a dotted chain. Anything else falls back to a stable debug
/// rendering, which is never empty.
pub fn expr_to_name(expr: &ast::Expr) -> String {
    match expr {
        ast::Expr::Name(name) => name.id.to_string(),
        ast::Expr::Attribute(attr) => format!("{}.{}", expr_to_name(&attr.value), attr.attr),
        ast::Expr::Call(call) => expr_to_name(&call.func),
        other => format!("{other:?}"),
    }
}
