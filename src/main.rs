//! Fastfood Atlas - statistics for fast-food restaurant locations
//!
//! A CLI tool that loads a CSV of restaurant locations, filters it by state
//! and brand, and writes rankings, market share, regional comparisons and
//! key insights as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success (including a skipped run with a data-unavailable notice)
//!   1 - Runtime error (invalid arguments, config, fail-fast load failure, etc.)

use anyhow::{Context, Result};
use fastfood_atlas::analysis::filter_options;
use fastfood_atlas::cli::{Args, OutputFormat};
use fastfood_atlas::config::{Config, CONFIG_FILE};
use fastfood_atlas::models::{Dataset, Field, FilterSelection};
use fastfood_atlas::report;
use fastfood_atlas::session::{Session, SKIPPED_NOTICE};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Fastfood Atlas v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .fastfood-atlas.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the data source, fallback policy, and dashboard sizes.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the data, build the dashboard, and write the report. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let output_path = PathBuf::from(&config.general.output);

    // Step 1: Load the dataset
    if !args.quiet {
        println!("📥 Loading dataset: {}", config.source.location);
        println!("   On unavailable: {}", config.source.on_unavailable);
    }

    let session = match Session::initialize(&config.source, !args.quiet).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("\n❌ {}", e.notice());
            return Ok(1);
        }
    };

    if let Some(notice) = session.notice() {
        eprintln!("\n⚠️  {}", notice);
    }

    let source = session.source().to_string();

    // Fail-soft: nothing to compute, write the notice only
    let Some(dataset) = session.dataset() else {
        let notice = session.notice().unwrap_or(SKIPPED_NOTICE);
        let output = match args.format {
            OutputFormat::Json => report::generate_unavailable_json(&source, notice)?,
            OutputFormat::Markdown => report::generate_unavailable_report(&source, notice),
        };
        write_output(&output_path, &output)?;
        println!("\n📝 Notice written to: {}", output_path.display());
        return Ok(0);
    };

    info!("Dataset ready: {} records ({})", dataset.len(), session.origin());

    // Handle --list-options: print filter choices and exit
    if args.list_options {
        return handle_list_options(dataset);
    }

    // Step 2: Apply filters and build the dashboard
    let selection = FilterSelection::from_choices(args.state.as_deref(), args.brand.as_deref());
    check_selection(dataset, &selection);

    if !args.quiet {
        println!("\n🔬 Computing statistics...");
        println!("   Filters: {}", selection);
    }

    let dashboard = session
        .dashboard(&selection, &config.dashboard)
        .context("No dataset available for the dashboard")?;

    // Step 3: Generate and save the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
    };
    write_output(&output_path, &output)?;

    let duration = start_time.elapsed().as_secs_f64();

    // Print summary
    println!("\n📊 Dataset Overview:");
    println!("   Total restaurants: {}", dashboard.overview.count);
    println!("   Unique brands: {}", dashboard.overview.unique_brands);
    println!("   States covered: {}", dashboard.overview.unique_regions);
    println!("   Missing values: {}", dashboard.overview.missing_values);
    if let Some(top) = dashboard.brands.ranking.entries.first() {
        println!("   Top brand: {} ({} locations)", top.category, top.count);
    }
    println!("   Duration: {:.1}s", duration);
    println!("\n✅ Report saved to: {}", output_path.display());

    Ok(0)
}

/// Handle --list-options: print the state and brand filter choices.
fn handle_list_options(dataset: &Dataset) -> Result<i32> {
    let states = filter_options(dataset, Field::Province);
    let brands = filter_options(dataset, Field::Name);

    println!("\nStates ({}):", states.len() - 1);
    println!("   {}", states.join(", "));
    println!("\nBrands ({}):", brands.len() - 1);
    for brand in &brands {
        println!("   {}", brand);
    }

    Ok(0)
}

/// Warn when a filter names a value the dataset does not contain.
fn check_selection(dataset: &Dataset, selection: &FilterSelection) {
    let checks = [
        (selection.region.as_deref(), Field::Province),
        (selection.brand.as_deref(), Field::Name),
    ];

    for (value, field) in checks {
        if let Some(value) = value {
            if !dataset.iter().any(|r| r.category(field) == Some(value)) {
                warn!("{} '{}' does not appear in the dataset", field, value);
            }
        }
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
