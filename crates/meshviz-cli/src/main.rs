use std::time::Instant;

use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use meshviz_cli::{FileConfig, run_main, write_output};

#[derive(Parser, Debug)]
#[command(
    name = "meshviz",
    about = "meshviz: render a service dependency topology as a Vizceral graph",
    version
)]
pub struct Cli {
    /// Topology JSON file (reads stdin when omitted)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<String>,

    /// Output file path (writes to stdout when omitted)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,

    /// Name of the region holding the observed services
    #[arg(short = 'n', long = "namespace", value_name = "NAME")]
    namespace: Option<String>,

    /// TOML file with defaults for namespace, pretty and max_depth
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<String>,

    /// Fixed unix timestamp for the region's `updated` field
    #[arg(long = "updated", value_name = "SECONDS")]
    updated: Option<i64>,

    /// Maximum traversal depth before the topology is rejected
    #[arg(long = "max-depth")]
    max_depth: Option<usize>,

    /// Pretty-print the JSON document
    #[arg(long, overrides_with = "no_pretty")]
    pretty: bool,

    /// Write compact JSON even if the config file sets `pretty = true`
    #[arg(long = "no-pretty", overrides_with = "pretty")]
    no_pretty: bool,
}

impl Cli {
    fn pretty(&self) -> Option<bool> {
        match (self.pretty, self.no_pretty) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

pub fn run(args: Cli) -> anyhow::Result<()> {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let file_config = match &args.config {
        Some(path) => FileConfig::from_path(path)?,
        None => FileConfig::default(),
    };
    let pretty = args.pretty();
    let mut opts = file_config.resolve(args.namespace, pretty, args.max_depth)?;
    opts.input = args.input;
    opts.output = args.output;
    opts.updated = args.updated;

    match run_main(&opts) {
        Ok(document) => write_output(opts.output.as_deref(), &document)?,
        Err(e) => {
            tracing::error!(error = %e, "execution failed");
            return Err(e.into());
        }
    }

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("meshviz").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_pretty_flags() {
        assert_eq!(parse(&[]).pretty(), None);
        assert_eq!(parse(&["--pretty"]).pretty(), Some(true));
        assert_eq!(parse(&["--no-pretty"]).pretty(), Some(false));
        assert_eq!(parse(&["--pretty", "--no-pretty"]).pretty(), Some(false));
        assert_eq!(parse(&["--no-pretty", "--pretty"]).pretty(), Some(true));
    }

    #[test]
    fn test_config_path_and_overrides() {
        let cli = parse(&["-c", "meshviz.toml", "-n", "bookinfo", "--max-depth", "12"]);
        assert_eq!(cli.config.as_deref(), Some("meshviz.toml"));
        assert_eq!(cli.namespace.as_deref(), Some("bookinfo"));
        assert_eq!(cli.max_depth, Some(12));
    }
}
