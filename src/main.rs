use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use feedgate::config::CONFIG_FILE_NAME;
use feedgate::{validate, Config};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "feedgate",
    about = "Build a static site and validate the RSS feed it generates"
)]
struct Args {
    /// Project root: the build runs here and relative paths resolve against it
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to <root>/feedgate.toml; a missing file means defaults)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Feed file to validate, overriding `feed_path` from the config (relative to --root)
    #[arg(long, value_name = "PATH")]
    feed: Option<PathBuf>,

    /// Validate the existing feed without running the site build
    #[arg(long)]
    no_build: bool,

    /// Output format for the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn load_config(args: &Args) -> Result<Config> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.root.join(CONFIG_FILE_NAME));
    let mut config = Config::load(&config_path, &args.root)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(feed) = &args.feed {
        config.feed_path = feed.clone();
    }
    if args.no_build {
        config.build.enabled = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Logs go to stderr so a JSON report on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    tracing::debug!(?config, "Resolved configuration");

    let report = validate(&config);

    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => {
            let json = report.to_json().context("Failed to serialize report")?;
            println!("{}", json);
        }
    }

    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}
