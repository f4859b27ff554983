//! Catalog enrichment CLI
//!
//! Fills missing product copy and media links in a catalog CSV.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Confirm, Input, Password};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_enricher::adapters::{
    search_client, GeminiGenerator, GoogleImageSearcher, HttpLinkChecker, YouTubeSearcher,
};
use catalog_enricher::fields::LINE_COLUMN;
use catalog_enricher::pipeline::{
    apply_report_file, default_report_path, import_file, read_product_list, validate_links,
    ApplyReportOptions, ValidationReport,
};
use catalog_enricher::{
    analyze, CatalogOptions, Config, Credentials, Enricher, LinkChecker, MediaFinder,
    ProductTable, RegenerateOptions, RowSelection, RunSummary, SecretString,
};

const DEFAULT_CATALOG_REPORT: &str = "gemini_beauty_products_results_with_working_links.txt";

#[derive(Parser)]
#[command(name = "enricher")]
#[command(about = "Fill missing marketing copy and media links in a product catalog")]
#[command(version)]
struct Cli {
    /// Seconds to wait between products (overrides ENRICH_DELAY_SECS)
    #[arg(short, long, global = true)]
    delay: Option<f64>,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which content fields are missing, per field and per row
    Analyze {
        input: PathBuf,

        /// Incomplete rows to list
        #[arg(long, default_value_t = 10)]
        show: usize,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Describe every product of the catalog into a resumable report
    Catalog {
        input: PathBuf,

        /// Report file
        #[arg(short, long, default_value = DEFAULT_CATALOG_REPORT)]
        output: PathBuf,

        /// Ignore an existing report and start over
        #[arg(long)]
        fresh: bool,

        /// 1-based product number to start from (appends to the report)
        #[arg(long)]
        start_from: Option<usize>,
    },

    /// Generate only the missing fields of incomplete rows
    Regenerate {
        input: PathBuf,

        /// Updated CSV (default: updated_products_<timestamp>.csv)
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Write back into the input file
        #[arg(long)]
        in_place: bool,

        /// 1-based rows to process, e.g. 108-118,120-245,745
        #[arg(long)]
        rows: Option<RowSelection>,
    },

    /// Describe a fixed list of products (one name per line)
    List {
        products: PathBuf,

        /// Report file (default: regenerated_products_results_<timestamp>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Copy content from another catalog into blank cells, matching by ID
    Import { source: PathBuf, target: PathBuf },

    /// Merge a results report back into the catalog, matching by Line
    ApplyReport {
        report: PathBuf,
        input: PathBuf,

        /// Write here instead of updating the input in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Check every link of the updated catalog afterwards
        #[arg(long)]
        validate: bool,
    },

    /// Check every image and video link of a catalog
    Validate {
        input: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog_enricher=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(secs) = cli.delay {
        config = config.with_delay_secs(secs)?;
    }

    let cancel = CancellationToken::new();
    listen_for_interrupt(cancel.clone());

    match cli.command {
        Commands::Analyze { input, show, json } => cmd_analyze(&input, show, json),
        Commands::Catalog {
            input,
            output,
            fresh,
            start_from,
        } => {
            let table = load_table(&input)?;
            table.require_column(LINE_COLUMN)?;
            let enricher = build_enricher(&mut config, cancel)?;
            let options = CatalogOptions {
                resume: !fresh,
                start_from,
            };
            let summary = enricher.catalog(&table, &output, options).await?;
            print_run_summary("Catalog run", &summary, &output);
            Ok(())
        }
        Commands::Regenerate {
            input,
            output,
            in_place,
            rows,
        } => {
            require_file(&input)?;
            let output = if in_place { Some(input.clone()) } else { output };
            if output.as_deref() == Some(input.as_path())
                && !confirm(cli.yes, &format!("Update {} in place?", input.display()))?
            {
                println!("Aborted.");
                return Ok(());
            }
            let enricher = build_enricher(&mut config, cancel)?;
            cmd_regenerate(&enricher, &input, RegenerateOptions { output, rows }).await
        }
        Commands::List { products, output } => {
            require_file(&products)?;
            let products = read_product_list(&products)?;
            if products.is_empty() {
                bail!("No products listed");
            }
            let report = output.unwrap_or_else(default_report_path);
            let enricher = build_enricher(&mut config, cancel)?;
            let summary = enricher.product_list(&products, &report).await?;
            print_run_summary("Product list run", &summary, &report);
            Ok(())
        }
        Commands::Import { source, target } => {
            require_file(&source)?;
            require_file(&target)?;
            if !confirm(cli.yes, &format!("Import into {} in place?", target.display()))? {
                println!("Aborted.");
                return Ok(());
            }
            let summary = import_file(&source, &target)?;
            println!();
            println!("{}", style("Import summary").bold());
            println!("  Records matched by ID: {}", summary.matched);
            println!("  Records updated:       {}", summary.records_updated);
            println!("  Fields updated:        {}", style(summary.fields_updated).green());
            if let Some(backup) = &summary.backup {
                println!("  Backup:                {}", backup.display());
            }
            Ok(())
        }
        Commands::ApplyReport {
            report,
            input,
            output,
            validate,
        } => {
            require_file(&report)?;
            require_file(&input)?;
            if output.is_none()
                && !confirm(cli.yes, &format!("Update {} in place?", input.display()))?
            {
                println!("Aborted.");
                return Ok(());
            }
            let summary = apply_report_file(&report, &input, ApplyReportOptions { output })?;
            println!();
            println!("{}", style("Report applied").bold());
            println!("  Blocks in report:  {}", summary.blocks);
            println!("  Unmatched blocks:  {}", summary.unmatched);
            println!("  Records updated:   {}", summary.records_updated);
            println!("  Fields updated:    {}", style(summary.fields_updated).green());
            println!("  Saved to:          {}", summary.output.display());

            if validate {
                let table = load_table(&summary.output)?;
                let report = validate_links(&table, &HttpLinkChecker::new()?, &cancel).await;
                print_validation(&report);
            }
            Ok(())
        }
        Commands::Validate { input, json } => {
            let table = load_table(&input)?;
            let report = validate_links(&table, &HttpLinkChecker::new()?, &cancel).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_validation(&report);
            }
            Ok(())
        }
    }
}

fn listen_for_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current step");
            cancel.cancel();
        }
    });
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("Input file not found: {}", path.display());
    }
    Ok(())
}

fn load_table(path: &Path) -> Result<ProductTable> {
    require_file(path)?;
    ProductTable::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn confirm(yes: bool, prompt: &str) -> Result<bool> {
    if yes || !console::user_attended() {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
}

/// Fill missing credentials interactively when attached to a terminal.
fn resolve_credentials(config: &mut Config) -> Result<Credentials> {
    if console::user_attended() {
        if config.gemini_api_key.is_none() {
            config.gemini_api_key = Some(prompt_secret("Gemini API key (GEMINI_API_KEY)")?);
        }
        if config.google_api_key.is_none() {
            config.google_api_key = Some(prompt_secret("Google API key (GOOGLE_API_KEY)")?);
        }
        if config.search_engine_id.is_none() {
            let id: String = Input::<String>::new()
                .with_prompt("Custom Search engine ID (SEARCH_ENGINE_ID)")
                .allow_empty(true)
                .interact_text()?;
            if id.trim().is_empty() {
                bail!("Search engine ID is required");
            }
            config.search_engine_id = Some(id.trim().to_string());
        }
    }
    config.credentials()
}

fn prompt_secret(prompt: &str) -> Result<SecretString> {
    let value = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;
    let secret = SecretString::new(value.trim());
    if secret.is_empty() {
        bail!("{prompt} is required");
    }
    Ok(secret)
}

fn build_enricher(config: &mut Config, cancel: CancellationToken) -> Result<Enricher> {
    let credentials = resolve_credentials(config)?;
    let links: Arc<dyn LinkChecker> = Arc::new(HttpLinkChecker::new()?);
    let search = search_client(&credentials, config.request_timeout)?;
    let media = MediaFinder::new(
        Arc::new(GoogleImageSearcher::from_client(search.clone())),
        Arc::new(YouTubeSearcher::from_client(search)),
        links.clone(),
    );
    let generator = GeminiGenerator::new(
        &credentials.gemini_api_key,
        &config.gemini_model,
        config.request_timeout,
    )?;
    tracing::info!(
        model = generator.model(),
        language = %config.language,
        timeout_secs = config.request_timeout.as_secs_f64(),
        "Enricher ready"
    );

    Ok(Enricher::new(Arc::new(generator), media, links)
        .with_language(config.language.clone())
        .with_delay(config.delay)
        .with_request_timeout(config.request_timeout)
        .with_cancellation(cancel))
}

fn cmd_analyze(input: &Path, show: usize, json: bool) -> Result<()> {
    let table = load_table(input)?;
    let report = analyze(&table);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", style("Missing content analysis").bold());
    println!("Total records: {}", report.total_records);
    println!();
    for stat in &report.fields {
        let count = if stat.missing == 0 {
            style(stat.missing.to_string()).green()
        } else {
            style(stat.missing.to_string()).yellow()
        };
        println!("  {:<58} {:>6} missing ({:.1}%)", stat.field.column(), count, stat.percentage);
    }
    println!();
    println!(
        "Records needing regeneration: {} ({:.1}%)",
        style(report.incomplete.len()).bold(),
        report.incomplete_percentage()
    );
    println!("Total missing cells: {}", report.total_missing_cells());

    for record in report.incomplete.iter().take(show) {
        let missing: Vec<&str> = record.missing.iter().map(|f| f.column()).collect();
        println!(
            "  Row {} (ID {}): {} - {}",
            record.index + 1,
            record.id.as_deref().unwrap_or("?"),
            record.display_name(),
            missing.join(", ")
        );
    }
    if report.incomplete.len() > show {
        println!("  ... and {} more", report.incomplete.len() - show);
    }
    Ok(())
}

async fn cmd_regenerate(enricher: &Enricher, input: &Path, options: RegenerateOptions) -> Result<()> {
    let summary = enricher.regenerate(input, options).await?;

    println!();
    println!("{}", style("Regeneration summary").bold());
    println!("  Incomplete records: {}", summary.incomplete);
    println!("  Selected:           {}", summary.selected);
    println!("  Processed:          {}", summary.processed);
    println!("  Records updated:    {}", style(summary.records_updated).green());
    println!("  Fields updated:     {}", style(summary.fields_updated).green());
    if summary.generation_failures > 0 {
        println!("  Generation errors:  {}", style(summary.generation_failures).red());
    }
    if summary.failed > 0 {
        println!("  Failed records:     {}", style(summary.failed).red());
    }
    if summary.records_updated > 0 {
        println!("  Output:             {}", summary.output.display());
    }
    if let Some(backup) = &summary.backup {
        println!("  Backup:             {}", backup.display());
    }
    if summary.interrupted {
        print_interrupted(&summary.output);
    }
    Ok(())
}

fn print_run_summary(title: &str, summary: &RunSummary, report: &Path) {
    println!();
    println!("{}", style(title).bold());
    println!("  Products processed: {}", summary.processed);
    println!("  Successful:         {}", style(summary.successful).green());
    if summary.failed > 0 {
        println!("  Failed:             {}", style(summary.failed).red());
    }
    println!("  Images found:       {}", summary.images);
    println!("  Videos found:       {}", summary.videos);
    println!(
        "  Progress:           {}/{}",
        summary.last_processed, summary.total
    );
    println!("  Report:             {}", report.display());
    if summary.interrupted {
        print_interrupted(report);
    } else if summary.is_complete() {
        println!("{}", style("All products processed.").green());
    }
}

fn print_interrupted(path: &Path) {
    println!(
        "{} Interrupted. Partial results are saved in {}",
        style("!").yellow().bold(),
        path.display()
    );
}

fn print_validation(report: &ValidationReport) {
    println!();
    println!("{}", style("Link validation").bold());
    println!(
        "  Image links - Total: {}, Working: {}, Broken: {}",
        report.images.total,
        style(report.images.working).green(),
        style(report.images.broken).red()
    );
    println!(
        "  Video links - Total: {}, Working: {}, Broken: {}",
        report.videos.total,
        style(report.videos.working).green(),
        style(report.videos.broken).red()
    );
    if report.interrupted {
        println!("{} Interrupted before every link was checked", style("!").yellow().bold());
    }
}
