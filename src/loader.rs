use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use sha1::{Digest, Sha1};

use crate::candidate::{DiscoveryResult, LoadedSymbol};
use crate::error::{DiscoveryError, Result};

/// Reserved namespace for modules the driver has to load directly from a
/// file path rather than by dotted import (mirrors the fallback import
/// machinery this crate's discovery model is built on).
const MODULE_NAMESPACE: &str = "_adaptive_discovery";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Materialize the winning [`DiscoveryResult`] by spawning a `python3`
/// subprocess that performs the actual import.
///
/// Discovery itself never executes user code; `load` is the one documented
/// exception, and it does so entirely inside a child process this crate
/// does not share memory or module state with. The subprocess mirrors the
/// reference import procedure: prefer a normal dotted import, fall back to
/// loading straight from the file under a hash-suffixed synthetic module
/// name, and restore `sys.path` on every exit path.
pub fn load(result: &DiscoveryResult) -> Result<LoadedSymbol> {
    let interpreter = std::env::var("PYSIG_PYTHON").unwrap_or_else(|_| "python3".to_string());
    let driver = build_driver_script(result);

    let mut child = Command::new(&interpreter)
        .arg("-c")
        .arg(&driver)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| load_error(result, Box::new(e)))?;

    // Nothing to send; the script is fully parameterized via its embedded
    // literals, but close stdin so a driver that accidentally blocks on
    // input fails fast instead of hanging.
    drop(child.stdin.take());

    let output = wait_with_timeout(&mut child, DEFAULT_TIMEOUT).map_err(|e| load_error(result, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        return Err(DiscoveryError::LoadError {
            symbol: result.name.clone(),
            module: result.module.clone(),
            source: Box::<dyn std::error::Error + Send + Sync>::from(stderr),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().next_back().unwrap_or_default();
    serde_json::from_str::<LoadedSymbol>(line).map_err(|e| load_error(result, Box::new(e)))
}

fn load_error(result: &DiscoveryResult, source: Box<dyn std::error::Error + Send + Sync>) -> DiscoveryError {
    DiscoveryError::LoadError { symbol: result.name.clone(), module: result.module.clone(), source }
}

fn wait_with_timeout(
    child: &mut std::process::Child,
    timeout: Duration,
) -> std::result::Result<std::process::Output, Box<dyn std::error::Error + Send + Sync>> {
    use std::time::Instant;

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            if let Some(mut out) = child.stdout.take() {
                std::io::Read::read_to_end(&mut out, &mut stdout)?;
            }
            if let Some(mut err) = child.stderr.take() {
                std::io::Read::read_to_end(&mut err, &mut stderr)?;
            }
            return Ok(std::process::Output { status, stdout, stderr });
        }
        if start.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err("timed out waiting for loader subprocess".into());
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

/// Build the embedded Python driver that performs the load, in a shape
/// that mirrors the reference `DiscoveryResult.load` procedure exactly:
/// prepend root to `sys.path` only if absent, try a dotted import, fall
/// back to `spec_from_file_location` under a hash-suffixed synthetic name
/// registered in `sys.modules` before execution, and always clean up the
/// path on the way out.
fn build_driver_script(result: &DiscoveryResult) -> String {
    let root = result.root.display().to_string();
    let file_path = result.file_path.display().to_string();
    let module_name = result.module.clone();
    let fallback_name = result.fallback_module_name();
    let symbol = result.name.clone();
    let unique_suffix = &hex_sha1(&file_path)[..8];

    format!(
        r#"
import importlib, importlib.util, json, sys

root = {root:?}
module_name = {module_name:?} or {fallback_name:?}
file_path = {file_path:?}
symbol = {symbol:?}
unique_suffix = {unique_suffix:?}

cleanup_path = False
if root not in sys.path:
    sys.path.insert(0, root)
    cleanup_path = True

try:
    try:
        module = importlib.import_module(module_name)
    except ImportError:
        fallback = "_adaptive_discovery." + (module_name or unique_suffix)
        spec = importlib.util.spec_from_file_location(fallback, file_path)
        if spec is None or spec.loader is None:
            raise ImportError(f"unable to load spec for {{file_path}}")
        module = importlib.util.module_from_spec(spec)
        sys.modules[fallback] = module
        spec.loader.exec_module(module)
finally:
    if cleanup_path:
        try:
            sys.path.remove(root)
        except ValueError:
            pass

try:
    obj = getattr(module, symbol)
except AttributeError as exc:
    print(json.dumps({{"error": f"symbol '{{symbol}}' not found in module '{{module.__name__}}'"}}), file=sys.stderr)
    sys.exit(1)

print(json.dumps({{
    "name": symbol,
    "qualname": getattr(obj, "__qualname__", symbol),
    "module": getattr(module, "__name__", module_name),
    "repr": repr(obj),
    "doc": getattr(obj, "__doc__", None),
}}))
"#,
    )
}

fn hex_sha1(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateKind;
    use std::path::PathBuf;

    #[test]
    fn driver_script_embeds_target_symbol_and_module() {
        let result = DiscoveryResult {
            name: "Widget".to_string(),
            kind: CandidateKind::Class,
            module: "pkg.widgets".to_string(),
            file_path: PathBuf::from("/proj/pkg/widgets.py"),
            lineno: 3,
            methods: vec![],
            decorators: vec![],
            bases: vec![],
            docstring: None,
            score: 0.7,
            root: PathBuf::from("/proj"),
        };
        let script = build_driver_script(&result);
        assert!(script.contains("\"Widget\""));
        assert!(script.contains("\"pkg.widgets\""));
        assert!(script.contains(MODULE_NAMESPACE));
    }
}
