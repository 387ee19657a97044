//! Service Availability Checker Binary

use availability_checker::{
    CheckConfig, CheckEngine, OutputSink, Renderer, Result, SourceLoader,
};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Report whether every site of each configured service is reachable
#[derive(Debug, Parser)]
#[command(name = "availability", version)]
struct Cli {
    /// HTTP request timeout (in seconds)
    #[arg(
        short = 't',
        long = "timeout",
        env = "AVAILABILITY_TIMEOUT_SECONDS",
        default_value_t = 60
    )]
    timeout_seconds: u64,

    /// Number of HTTP request retries
    #[arg(short = 'r', long, env = "AVAILABILITY_MAX_RETRIES", default_value_t = 0)]
    retries: u32,

    /// Only display status for failed requests
    #[arg(short, long, env = "AVAILABILITY_QUIET")]
    quiet: bool,

    /// Disable color output
    #[arg(short = 'c', long, env = "AVAILABILITY_NO_COLOR")]
    no_color: bool,

    /// Maximum number of probes in flight at once
    #[arg(long, env = "AVAILABILITY_MAX_CONCURRENCY", default_value_t = 32)]
    max_concurrency: usize,

    /// YAML file locations (local paths or http(s) URLs)
    #[arg(required = true, value_name = "YAML_FILE_LOCATION")]
    sources: Vec<String>,
}

impl Cli {
    fn check_config(&self) -> CheckConfig {
        CheckConfig::default()
            .with_timeout(Duration::from_secs(self.timeout_seconds))
            .with_max_retries(self.retries)
            .with_quiet(self.quiet)
            .with_max_concurrent_probes(self.max_concurrency)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    initialize_tracing();

    let cli = Cli::parse();
    info!("Starting availability checker v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.check_config();
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let loader = SourceLoader::new(reqwest::Client::new());
    let mut services = match loader.load_all(&cli.sources).await {
        Ok(services) => services,
        Err(e) => {
            error!("Failed to load services: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let renderer = Renderer::new(!cli.no_color);
    let engine = CheckEngine::new(config)?;

    let sink = OutputSink::spawn(std::io::stdout(), renderer);
    let report = engine.run(&mut services, sink.sender()).await;
    let mut stdout = sink.finish().await?;

    if !cli.quiet {
        stdout.write_all(renderer.render_summary(&report).as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

/// Diagnostics go to stderr so they never mix with the report on stdout
fn initialize_tracing() {
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let json = std::env::var("AVAILABILITY_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter_layer);

    if json {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }
}
