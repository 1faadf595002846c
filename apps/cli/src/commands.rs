//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use sitetriage_core::{ScanRequest, Scanner};
use sitetriage_crawler::CrawlObserver;
use sitetriage_server::TriageServer;
use sitetriage_shared::{AppConfig, Resource, TriageRecord, init_config, load_config};
use sitetriage_triage::{TriageReport, TriageSummary, TriageView};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SiteTriage — decide what to fix first.
#[derive(Parser)]
#[command(
    name = "sitetriage",
    version,
    about = "Crawl a website and triage its pages and PDFs for accessibility work.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl a site and print its triage report.
    Scan {
        /// Seed URL; bare domains get `https://`.
        url: String,

        /// Link depth to follow from the seed (0-7).
        #[arg(short = 'd', long)]
        max_depth: Option<u32>,

        /// Subset to show: all, archive, convert, or remediate.
        #[arg(long, default_value = "all")]
        view: TriageView,

        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API.
    Serve {
        /// Address to bind (defaults to the config value).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to the config value).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sitetriage=info",
        1 => "sitetriage=debug,tower_http=debug",
        _ => "sitetriage=trace,tower_http=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scan {
            url,
            max_depth,
            view,
            json,
        } => cmd_scan(url, max_depth, view, json).await,
        Command::Serve { host, port } => cmd_serve(host, port).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scan(url: String, max_depth: Option<u32>, view: TriageView, json: bool) -> Result<()> {
    let config = load_config()?;
    let scanner = Scanner::from_config(&config)?;

    info!(%url, ?max_depth, "starting scan");

    let progress = CliProgress::new();
    let result = scanner
        .scan(&ScanRequest::new(url, max_depth), &progress)
        .await;
    progress.finish();
    let report = result?;

    if json {
        print_json(&report, view)?;
    } else {
        print_table(&report, view);
    }

    Ok(())
}

async fn cmd_serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let scanner = Scanner::from_config(&config)?;
    let server = TriageServer::bind(&format!("{host}:{port}"), scanner).await?;
    server.run().await?;

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Report output
// ---------------------------------------------------------------------------

fn print_json(report: &TriageReport, view: TriageView) -> Result<()> {
    let results = view.filter(report);
    let body = json!({
        "success": true,
        "count": results.len(),
        "summary": TriageSummary::from_records(&report.results),
        "results": results,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn print_table(report: &TriageReport, view: TriageView) {
    let rows = view.filter(report);
    let summary = TriageSummary::from_records(&report.results);

    println!();
    println!(
        "  {:<5} {:>5} {:>7} {:>5}  {:<7} {:<7} {:<8}  URL",
        "TYPE", "DEPTH", "VIEWS", "A11Y", "ARCHIVE", "CONVERT", "PRIORITY"
    );
    for record in &rows {
        print_row(record);
    }
    println!();
    println!(
        "  {} shown of {} resources: {} to archive, {} to convert, {} high priority",
        rows.len(),
        summary.total,
        summary.archive,
        summary.convert,
        summary.high_priority,
    );
    println!();
}

fn print_row(record: &TriageRecord) {
    let rec = &record.recommendation;
    let flag = |on: bool| if on { "yes" } else { "-" };

    println!(
        "  {:<5} {:>5} {:>7} {:>5}  {:<7} {:<7} {:<8}  {}",
        record.kind.as_str(),
        record.depth,
        record.view_count,
        record.accessibility_score,
        flag(rec.archive),
        flag(rec.convert_to_html),
        rec.remediation_priority.as_str(),
        record.url,
    );
    if !rec.reason.is_empty() {
        println!("        {}", rec.reason);
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI crawl observer using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        spinner.set_message("Crawling");
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl CrawlObserver for CliProgress {
    fn resource_discovered(&self, resource: &Resource, total: usize) {
        self.spinner
            .set_message(format!("Discovered [{total}] {}", resource.url));
    }

    fn page_fetched(&self, url: &str, ok: bool) {
        if !ok {
            self.spinner.set_message(format!("Unreachable {url}"));
        }
    }
}
