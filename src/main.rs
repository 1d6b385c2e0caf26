use anyhow::{Context, Result};
use clap::Parser;
use mepscraper::{
    config::Config,
    detect::CommandDetector,
    fetch::{Retry, DEFAULT_BASE_URL},
    pipeline,
};
use reqwest::Client;
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

/// Scrape MEP financial declarations into one JSON record per member.
#[derive(Parser, Debug)]
struct Args {
    /// Site the member index and declarations are fetched from
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: Url,

    /// Output directory for `<id>.json` and `_index.json`
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Scratch directory for downloaded PDFs
    #[arg(long, default_value = "raw")]
    raw_dir: PathBuf,

    /// Table detector; called as `<detector> <detector-args...> <pdf>` and must print JSON tables
    #[arg(long, default_value = "camelot-json")]
    detector: String,

    /// Extra argument passed to the detector (repeatable)
    #[arg(long = "detector-arg", allow_hyphen_values = true)]
    detector_args: Vec<String>,

    /// Members processed concurrently
    #[arg(long, default_value_t = 3)]
    concurrency: usize,

    /// Leave out the first N members of the index
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Keep records already present in the data directory
    #[arg(long)]
    resume: bool,

    /// Do not delete PDFs after parsing
    #[arg(long)]
    keep_pdfs: bool,

    /// Retries per page fetch
    #[arg(long, default_value_t = 3)]
    retries: u32,
}

impl Args {
    fn into_config(self) -> (Config, CommandDetector) {
        let detector = CommandDetector::new(self.detector).args(self.detector_args);
        let mut config = Config::new(self.base_url, self.data_dir, self.raw_dir);
        config.concurrency = self.concurrency;
        config.skip = self.skip;
        config.resume = self.resume;
        config.keep_pdfs = self.keep_pdfs;
        config.retry = Retry {
            max_retries: self.retries,
            ..Retry::default()
        };
        (config, detector)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let (config, detector) = Args::parse().into_config();
    info!(
        base = %config.base_url,
        data = %config.data_dir.display(),
        raw = %config.raw_dir.display(),
        concurrency = config.concurrency,
        "configuration"
    );

    // ─── 3) scrape ───────────────────────────────────────────────────
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .context("building HTTP client")?;
    let summary = pipeline::run(&client, Arc::new(detector), &config).await?;

    info!(
        members = summary.members,
        declarations = summary.declarations,
        failed = summary.failed,
        "finished"
    );
    Ok(())
}
