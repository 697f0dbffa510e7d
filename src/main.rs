mod cli;

use clap::Parser;
use eyre::{Result, WrapErr};

use cli::{Cli, Command};
use pysig::config::Config;
use pysig::engine::DiscoveryEngine;
use pysig::loader;
use pysig::output::{output as write_output, should_use_json, DiscoverAllOutput, DiscoverOutput, LoadedOutput};

fn main() -> Result<()> {
    pysig::logging::init();
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let root = cli.root.clone();
    let config = Config::load(root.as_deref().unwrap_or(std::path::Path::new("."))).unwrap_or_default();

    let mut ignore = config.ignore;
    ignore.extend(cli.ignore.clone());

    let engine = DiscoveryEngine::new(root, ignore).wrap_err("failed to resolve project root")?;
    let use_json = should_use_json(cli.json);

    match cli.command {
        Command::Discover(args) => run_discover(&engine, args, use_json, &config),
        Command::DiscoverAll(args) => run_discover_all(&engine, args, use_json, &config),
    }
}

fn run_discover(engine: &DiscoveryEngine, args: cli::DiscoverArgs, use_json: bool, config: &Config) -> Result<()> {
    let load = args.load;
    let ignore_case = args.signature.ignore_case;
    let signature = apply_config_defaults(args.signature.into_signature(), ignore_case, config);
    let result = engine.discover_no_load(&signature).wrap_err("discovery failed")?;

    if load {
        let loaded = loader::load(&result).wrap_err("load failed")?;
        write_output(&LoadedOutput { result, loaded }, use_json)?;
    } else {
        write_output(&DiscoverOutput { result }, use_json)?;
    }
    Ok(())
}

fn run_discover_all(engine: &DiscoveryEngine, args: cli::SignatureArgs, use_json: bool, config: &Config) -> Result<()> {
    let ignore_case = args.ignore_case;
    let signature = apply_config_defaults(args.into_signature(), ignore_case, config);
    let matches = engine.discover_all(&signature).wrap_err("discovery failed")?;
    write_output(&DiscoverAllOutput { matches }, use_json)?;
    Ok(())
}

/// `--ignore-case` always wins; absent that, `pysig.toml`'s `case_sensitive`
/// overrides the hardcoded case-sensitive default.
fn apply_config_defaults(signature: pysig::signature::Signature, ignore_case: bool, config: &Config) -> pysig::signature::Signature {
    if ignore_case {
        return signature;
    }
    match config.case_sensitive {
        Some(case_sensitive) => signature.case_sensitive(case_sensitive),
        None => signature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &std::path::Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn run_discover_all_finds_matches() {
        let dir = tempdir().unwrap();
        write(dir.path(), "widgets.py", "class Widget:\n    def spin(self):\n        pass\n");

        let cli = Cli::try_parse_from(["pysig", "--root", dir.path().to_str().unwrap(), "discover-all", "Widget"]).unwrap();
        run(cli).unwrap();
    }

    #[test]
    fn run_discover_reports_not_found() {
        let dir = tempdir().unwrap();
        write(dir.path(), "widgets.py", "class Widget:\n    pass\n");

        let cli = Cli::try_parse_from(["pysig", "--root", dir.path().to_str().unwrap(), "discover", "NoSuchThing"]).unwrap();
        assert!(run(cli).is_err());
    }
}
