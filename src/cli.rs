use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pysig", about = "Locate a Python symbol by structural signature, not import path", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project root to search (default: current directory)
    #[arg(short = 'r', long = "root", global = true)]
    pub root: Option<PathBuf>,

    /// Additional path prefixes (relative to root) to prune from the walk
    #[arg(long = "ignore", global = true)]
    pub ignore: Vec<String>,

    /// Force JSON output (default: YAML, or JSON when not a TTY)
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Find the single best-matching symbol
    Discover(DiscoverArgs),

    /// Find every symbol that matches, ranked by score
    DiscoverAll(SignatureArgs),
}

#[derive(clap::Args)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub signature: SignatureArgs,

    /// Import the winning symbol and print the live object's description
    #[arg(long)]
    pub load: bool,
}

#[derive(clap::Args)]
pub struct SignatureArgs {
    /// Symbol name, or pattern when --regex is set
    pub name: String,

    /// Kind of symbol to look for
    #[arg(long, value_enum, default_value_t = KindArg::Class)]
    pub kind: KindArg,

    /// Method name the candidate class must define (repeatable)
    #[arg(long = "method")]
    pub methods: Vec<String>,

    /// Decorator name the candidate must carry (repeatable)
    #[arg(long = "decorator")]
    pub decorators: Vec<String>,

    /// Base class name the candidate must inherit from (repeatable)
    #[arg(long = "base")]
    pub bases: Vec<String>,

    /// Exact dotted module path the candidate must live in
    #[arg(long)]
    pub module: Option<String>,

    /// Regex the candidate's dotted module path must match (ignored if --module is set)
    #[arg(long = "module-pattern")]
    pub module_pattern: Option<String>,

    /// Docstring fragment that should appear in the candidate (repeatable, case-insensitive)
    #[arg(long = "docstring-contains")]
    pub docstring_contains: Vec<String>,

    /// Treat `name` as a regular expression
    #[arg(long)]
    pub regex: bool,

    /// Match `name` case-sensitively (default: case-sensitive unless --ignore-case)
    #[arg(long = "ignore-case")]
    pub ignore_case: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum KindArg {
    Class,
    Function,
    Any,
}

impl From<KindArg> for pysig::signature::Kind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Class => pysig::signature::Kind::Class,
            KindArg::Function => pysig::signature::Kind::Function,
            KindArg::Any => pysig::signature::Kind::Any,
        }
    }
}

impl SignatureArgs {
    pub fn into_signature(self) -> pysig::signature::Signature {
        let mut sig = pysig::signature::Signature::new(self.name)
            .kind(self.kind.into())
            .methods(self.methods)
            .decorators(self.decorators)
            .bases(self.bases)
            .docstring_contains(self.docstring_contains)
            .regex(self.regex)
            .case_sensitive(!self.ignore_case);
        if let Some(module) = self.module {
            sig = sig.module(module);
        }
        if let Some(pattern) = self.module_pattern {
            sig = sig.module_pattern(pattern);
        }
        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_ok() {
        Cli::command().debug_assert();
    }

    #[test]
    fn discover_all_requires_name() {
        let result = Cli::try_parse_from(["pysig", "discover-all"]);
        assert!(result.is_err());
    }

    #[test]
    fn discover_parses_flags() {
        let cli = Cli::try_parse_from([
            "pysig",
            "discover",
            "Widget",
            "--method",
            "spin",
            "--method",
            "stop",
            "--load",
        ])
        .unwrap();
        match cli.command {
            Command::Discover(args) => {
                assert_eq!(args.signature.name, "Widget");
                assert_eq!(args.signature.methods, vec!["spin".to_string(), "stop".to_string()]);
                assert!(args.load);
            }
            _ => panic!("expected Discover"),
        }
    }
}
