//! FundLab CLI — recommend, rank, and inspect mutual fund schemes.
//!
//! Commands:
//! - `recommend` — rank eligible schemes and allocate across them
//! - `rank` — show the ranked eligible schemes without allocating
//! - `show` — print every field of one scheme
//! - `config default` — print the default configuration as TOML

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fundlab_core::{Catalog, InstrumentRecord};
use fundlab_runner::{
    export_allocations_csv, export_json, load_catalog, rank_only, recommend_with_fingerprint,
    save_report, synthetic_catalog, FailureKind, FundlabConfig, LoadedCatalog, Ranking,
    RecommendRequest, Recommendation, RecommendationReport, SchemeLookup, ValidationPolicy,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fundlab",
    about = "FundLab CLI — mutual fund ranking and allocation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the catalog comes from, plus configuration.
#[derive(Args)]
struct SourceArgs {
    /// CSV catalog to load.
    #[arg(long, required_unless_present = "synthetic", conflicts_with = "synthetic")]
    catalog: Option<PathBuf>,

    /// Generate a synthetic catalog with this many schemes instead.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for the synthetic catalog.
    #[arg(long, default_value = "fundlab")]
    seed: String,

    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail on the first invalid catalog row instead of dropping it.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank eligible schemes and allocate the investment across them.
    Recommend {
        #[command(flatten)]
        source: SourceArgs,

        /// Investment horizon in years.
        #[arg(long)]
        tenure: f64,

        /// Capital available for investment.
        #[arg(long)]
        amount: f64,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Show the percentages after each allocation pass.
        #[arg(long, default_value_t = false)]
        explain: bool,

        /// Also write recommendation.json and allocations.csv here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Show the ranked eligible schemes without allocating.
    Rank {
        #[command(flatten)]
        source: SourceArgs,

        /// Investment horizon in years.
        #[arg(long)]
        tenure: f64,

        /// Capital available for investment.
        #[arg(long)]
        amount: f64,

        /// Only show the best N schemes.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Print every field of one scheme.
    Show {
        /// CSV catalog to load.
        #[arg(long)]
        catalog: PathBuf,

        /// Exact scheme name.
        #[arg(long)]
        scheme: String,
    },
    /// Configuration helpers.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the default configuration as TOML.
    Default,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend {
            source,
            tenure,
            amount,
            format,
            explain,
            output_dir,
        } => run_recommend(&source, tenure, amount, format, explain, output_dir.as_deref()),
        Commands::Rank {
            source,
            tenure,
            amount,
            top,
        } => run_rank(&source, tenure, amount, top),
        Commands::Show { catalog, scheme } => run_show(&catalog, &scheme),
        Commands::Config {
            action: ConfigAction::Default,
        } => {
            let rendered = FundlabConfig::default()
                .to_toml()
                .context("failed to render default config")?;
            print!("{rendered}");
            Ok(())
        }
    }
}

/// Log to stderr so stdout stays clean for JSON/CSV output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(source: &SourceArgs) -> Result<FundlabConfig> {
    let mut config = match &source.config {
        Some(path) => FundlabConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FundlabConfig::default(),
    };
    if source.strict {
        config.validation.policy = ValidationPolicy::Strict;
    }
    Ok(config)
}

fn load_source(source: &SourceArgs, config: &FundlabConfig) -> Result<(Catalog, String)> {
    match (&source.catalog, source.synthetic) {
        (Some(path), _) => {
            let LoadedCatalog {
                catalog,
                rejected,
                fingerprint,
            } = load_catalog(path, &config.load_options())
                .with_context(|| format!("failed to load catalog {}", path.display()))?;
            if !rejected.is_empty() {
                warn!(rejected = rejected.len(), "some catalog rows were dropped");
            }
            Ok((catalog, fingerprint))
        }
        (None, Some(size)) => {
            warn!(size, seed = %source.seed, "using a SYNTHETIC catalog");
            let catalog = synthetic_catalog(size, &source.seed);
            let fingerprint = catalog.fingerprint();
            Ok((catalog, fingerprint))
        }
        (None, None) => bail!("either --catalog or --synthetic is required"),
    }
}

fn run_recommend(
    source: &SourceArgs,
    tenure: f64,
    amount: f64,
    format: OutputFormat,
    explain: bool,
    output_dir: Option<&Path>,
) -> Result<()> {
    let config = load_config(source)?;
    let (catalog, fingerprint) = load_source(source, &config)?;
    info!(records = catalog.len(), fingerprint = %fingerprint, "catalog ready");

    let request = RecommendRequest::new(tenure, amount);
    let result = recommend_with_fingerprint(
        &catalog,
        &fingerprint,
        &request,
        &config.engine,
        &config.recommend,
    );
    let rec = match result {
        Ok(rec) => rec,
        Err(e) => match e.kind() {
            FailureKind::NoEligibleFunds => bail!(
                "no eligible funds for tenure {tenure} and amount {amount}: {e}"
            ),
            FailureKind::DataIntegrity => bail!("catalog data integrity error: {e}"),
            FailureKind::InvalidInput => bail!("invalid request: {e}"),
        },
    };

    let report = RecommendationReport::new(rec);
    match format {
        OutputFormat::Table => print_recommendation(&report.recommendation, explain),
        OutputFormat::Json => println!("{}", export_json(&report)?),
        OutputFormat::Csv => print!(
            "{}",
            export_allocations_csv(&report.recommendation.allocations)?
        ),
    }

    if let Some(dir) = output_dir {
        let written = save_report(&report, dir)?;
        eprintln!("Report saved to: {}", written.display());
    }
    Ok(())
}

fn run_rank(source: &SourceArgs, tenure: f64, amount: f64, top: Option<usize>) -> Result<()> {
    let config = load_config(source)?;
    let (catalog, _) = load_source(source, &config)?;

    let request = RecommendRequest::new(tenure, amount);
    let ranking = rank_only(&catalog, &request, &config.engine).context("ranking failed")?;
    print_ranking(&ranking, top);
    Ok(())
}

fn run_show(path: &Path, scheme: &str) -> Result<()> {
    let loaded = load_catalog(path, &FundlabConfig::default().load_options())
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    match loaded.find_scheme(scheme) {
        SchemeLookup::Found(record) => {
            print_record(record);
            Ok(())
        }
        SchemeLookup::Rejected(row) => bail!(
            "scheme '{scheme}' was rejected at line {}: {}",
            row.line,
            row.reason
        ),
        SchemeLookup::Missing => bail!("scheme not found: '{scheme}'"),
    }
}

fn print_recommendation(rec: &Recommendation, explain: bool) {
    println!();
    println!("=== Recommendation ===");
    println!("Tenure:           {} years", rec.tenure);
    println!("Amount:           {:.2}", rec.amount);
    println!("Eligible schemes: {}", rec.eligible_count);
    println!("Total investment: {:.2}", rec.total_investment);
    println!("Horizon tilt:     {}", rec.tilt_factor);
    let short = rec
        .catalog_fingerprint
        .get(..16)
        .unwrap_or(&rec.catalog_fingerprint);
    println!("Catalog:          {short}");
    println!();
    println!("{:>4}  {:<52} {:>10}", "#", "Scheme", "Allocation");
    for (i, a) in rec.allocations.iter().enumerate() {
        println!(
            "{:>4}  {:<52} {:>9.2}%",
            i + 1,
            truncate_name(&a.identifier, 52),
            a.allocation_percentage
        );
    }
    if !rec.dropped.is_empty() {
        println!();
        println!(
            "{} scheme(s) at or below the truncation threshold were omitted.",
            rec.dropped.len()
        );
    }

    if explain {
        let t = &rec.trace;
        println!();
        println!("--- Allocation passes ---");
        println!(
            "{:<52} {:>9} {:>9} {:>9} {:>9}",
            "Scheme", "Sized", "Tilted", "Floored", "Final"
        );
        for i in 0..t.identifiers.len() {
            println!(
                "{:<52} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
                truncate_name(&t.identifiers[i], 52),
                t.sized[i],
                t.tilted[i],
                t.floored[i],
                t.reweighted[i]
            );
        }
    }
}

fn print_ranking(ranking: &Ranking, top: Option<usize>) {
    println!();
    println!(
        "=== Ranking (tenure {} years, amount {:.2}) ===",
        ranking.tenure, ranking.amount
    );
    println!(
        "{:>4}  {:<52} {:>10} {:>8} {:>10}",
        "#", "Scheme", "Risk-adj", "Rating", "Score"
    );
    let limit = top.unwrap_or(ranking.ranked.len());
    for (i, s) in ranking.ranked.iter().take(limit).enumerate() {
        let rating = s
            .record
            .rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {:<52} {:>10.3} {:>8} {:>10.4}",
            i + 1,
            truncate_name(s.identifier(), 52),
            s.risk_adjusted_return,
            rating,
            s.composite_score
        );
    }
    if ranking.ranked.is_empty() {
        println!("No eligible schemes.");
    }
}

fn print_record(r: &InstrumentRecord) {
    fn opt<T: std::fmt::Display>(v: &Option<T>) -> String {
        v.as_ref().map(|x| x.to_string()).unwrap_or_else(|| "-".into())
    }
    let d = &r.details;
    println!();
    println!("=== {} ===", r.identifier);
    println!("AMC:            {}", opt(&d.amc_name));
    println!("Fund manager:   {}", opt(&d.fund_manager));
    println!("Category:       {} / {}", opt(&d.category), opt(&d.sub_category));
    println!("Min SIP:        {}", r.min_entry_contribution);
    println!("Min lump sum:   {}", r.min_lump_sum);
    println!("Risk level:     {}", r.risk_level);
    println!("Rating:         {}", opt(&r.rating));
    println!(
        "Returns:        1y {}  3y {}  5y {}",
        opt(&d.returns_1yr),
        opt(&d.returns_3yr),
        r.historical_return_5yr
    );
    println!("Expense ratio:  {}", opt(&d.expense_ratio));
    println!("Fund size (cr): {}", opt(&d.fund_size_cr));
    println!("Fund age (yr):  {}", opt(&d.fund_age_yr));
    println!(
        "Sharpe {}  Sortino {}  Alpha {}  Beta {}  SD {}",
        opt(&d.sharpe),
        opt(&d.sortino),
        opt(&d.alpha),
        opt(&d.beta),
        opt(&d.sd)
    );
}

fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let cut: String = name.chars().take(width - 1).collect();
        format!("{cut}…")
    }
}
