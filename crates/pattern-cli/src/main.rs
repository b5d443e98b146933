//! Scans a component collection and prints its patterns as JSON.
//!
//! Usage:
//!   pattern-cli scan <root> [--collection <id>] [--config <options.json>] [--pretty] [-v]

use clap::{ArgAction, Args, Parser, Subcommand};
use pattern_analyzer::{AnalyzerOptions, Collection, SyntheticAnalyzer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "pattern-cli", version, about = "Discover UI component patterns in a compiled library")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a collection root and print the pattern list
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Collection root directory
    root: PathBuf,

    /// Collection id; defaults to the root directory name
    #[arg(long)]
    collection: Option<String>,

    /// Analyzer options as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan(args) => match scan(&args) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(error = %err, "scan failed");
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}

/// Run one analysis pass and render the patterns as JSON.
fn scan(args: &ScanArgs) -> Result<String, Box<dyn std::error::Error>> {
    let options = match &args.config {
        Some(path) => AnalyzerOptions::from_json_file(path)?,
        None => AnalyzerOptions::default(),
    };
    let id = args
        .collection
        .clone()
        .unwrap_or_else(|| collection_id(&args.root));

    let mut collection = Collection::with_options(id, &args.root, options);
    collection.add_analyzer(Box::new(SyntheticAnalyzer));
    let patterns = collection.load()?;

    let json = if args.pretty {
        serde_json::to_string_pretty(patterns)?
    } else {
        serde_json::to_string(patterns)?
    };
    Ok(json)
}

fn collection_id(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "collection".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    fn args(root: &Path) -> ScanArgs {
        ScanArgs {
            root: root.to_path_buf(),
            collection: Some("lsg".to_string()),
            config: None,
            pretty: false,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        let cli = Cli::try_parse_from(["pattern-cli", "-vv", "scan", "lib", "--pretty"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Scan(scan) = cli.command;
        assert_eq!(scan.root, PathBuf::from("lib"));
        assert!(scan.pretty);
    }

    #[test]
    fn test_scan_outputs_synthetic_pattern() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let json = scan(&args(temp.path()))?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value[0]["id"], "lsg@synthetic:text");
        assert_eq!(value[0]["properties"]["text"]["type"], "string");
        Ok(())
    }

    #[test]
    fn test_scan_missing_root_fails() {
        assert!(scan(&args(Path::new("/no/such/root"))).is_err());
    }

    #[test]
    fn test_scan_with_config() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let config = temp.path().join("options.json");
        fs::write(&config, r#"{ "excludeDirs": ["node_modules"] }"#)?;
        let mut scan_args = args(temp.path());
        scan_args.config = Some(config);
        assert!(scan(&scan_args).is_ok());

        fs::write(temp.path().join("bad.json"), "[")?;
        scan_args.config = Some(temp.path().join("bad.json"));
        assert!(scan(&scan_args).is_err());
        Ok(())
    }
}
