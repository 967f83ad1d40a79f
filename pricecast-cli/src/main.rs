//! PriceCast CLI - fetch a symbol's daily history and print its forecast.
//!
//! Commands:
//! - `predict` - run the full pipeline for a symbol (or an uploaded CSV)
//!   and print the forecast summary
//! - `symbols` - list the symbol catalog, filtered for a source

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pricecast_core::data::{
    compatibility, write_csv, AlphaVantageProvider, CsvProvider, FmpProvider, SourceProvider,
    SymbolCatalog,
};
use pricecast_core::domain::{
    Horizon, RequestContext, SourceId, Trend, MONTH_CHOICES, YEAR_CHOICES,
};
use pricecast_core::pipeline::{run_prediction, PredictionOutcome};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pricecast", about = "PriceCast CLI - daily price forecasting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    /// Alpha Vantage (US listings and ADRs only).
    AlphaVantage,
    /// Financial Modeling Prep (includes international exchanges).
    Fmp,
}

impl From<SourceArg> for SourceId {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::AlphaVantage => SourceId::AlphaVantage,
            SourceArg::Fmp => SourceId::Fmp,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch history and forecast future price for one symbol.
    Predict {
        /// Data source (ignored with --csv).
        #[arg(long, value_enum)]
        source: Option<SourceArg>,

        /// Symbol to fetch (e.g. AAPL).
        #[arg(long)]
        symbol: Option<String>,

        /// API key for the chosen source.
        #[arg(long)]
        api_key: Option<String>,

        /// Forecast from a local CSV file instead of an API.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Horizon in months: 1, 2, 3, 6, 9, 12, 18, or 24.
        #[arg(long, conflicts_with = "years")]
        months: Option<u32>,

        /// Horizon in years: 1 through 5.
        #[arg(long)]
        years: Option<u32>,

        /// Print the summary as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write the fetched series to this path in the canonical
        /// six-column CSV format.
        #[arg(long)]
        save_csv: Option<PathBuf>,
    },
    /// List the symbol catalog, filtered for a source.
    Symbols {
        /// Data source to filter for.
        #[arg(long, value_enum)]
        source: Option<SourceArg>,

        /// Catalog TOML file. Defaults to the built-in listing.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            source,
            symbol,
            api_key,
            csv,
            months,
            years,
            json,
            save_csv,
        } => run_predict(source, symbol, api_key, csv, months, years, json, save_csv),
        Commands::Symbols { source, catalog } => run_symbols(source, catalog),
    }
}

fn parse_horizon(months: Option<u32>, years: Option<u32>) -> Result<Horizon> {
    match (months, years) {
        (Some(m), None) => {
            if !MONTH_CHOICES.contains(&m) {
                bail!("--months must be one of {MONTH_CHOICES:?}, got {m}");
            }
            Ok(Horizon::Months(m))
        }
        (None, Some(y)) => {
            if !YEAR_CHOICES.contains(&y) {
                bail!("--years must be one of {YEAR_CHOICES:?}, got {y}");
            }
            Ok(Horizon::Years(y))
        }
        (None, None) => Ok(Horizon::Years(1)),
        (Some(_), Some(_)) => bail!("--months and --years are mutually exclusive"),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_predict(
    source: Option<SourceArg>,
    symbol: Option<String>,
    api_key: Option<String>,
    csv: Option<PathBuf>,
    months: Option<u32>,
    years: Option<u32>,
    json: bool,
    save_csv: Option<PathBuf>,
) -> Result<()> {
    let horizon = parse_horizon(months, years)?;

    let (ctx, provider): (RequestContext, Box<dyn SourceProvider>) = if let Some(path) = csv {
        let bytes = std::fs::read(&path)
            .with_context(|| format!("failed to read CSV file: {}", path.display()))?;
        let symbol = symbol.unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "UPLOAD".into())
        });
        (
            RequestContext::new(SourceId::CsvUpload, symbol, horizon),
            Box::new(CsvProvider::new(bytes)),
        )
    } else {
        let source = source.map(SourceId::from).unwrap_or(SourceId::AlphaVantage);
        let Some(symbol) = symbol else {
            bail!("--symbol is required unless --csv is given");
        };
        let Some(key) = api_key else {
            bail!("--api-key is required for {}", source.name());
        };

        // Advisory pre-flight check; the adapter still has the last word.
        if !compatibility::is_compatible(source, &symbol) {
            println!(
                "WARNING: {symbol} looks like a listing {} does not cover; \
                 consider a different source",
                source.name()
            );
        }

        let provider: Box<dyn SourceProvider> = match source {
            SourceId::AlphaVantage => Box::new(AlphaVantageProvider::new(key)),
            SourceId::Fmp => Box::new(FmpProvider::new(key)),
            SourceId::CsvUpload => unreachable!("handled by the --csv branch"),
        };
        (RequestContext::new(source, symbol, horizon), provider)
    };

    let outcome = match run_prediction(&ctx, provider.as_ref()) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("Error: {err}");
            if let Some(hint) = err.hint() {
                eprintln!("Hint: {hint}");
            }
            std::process::exit(1);
        }
    };

    if let Some(path) = save_csv {
        let text = write_csv(&outcome.series).context("failed to serialize series as CSV")?;
        std::fs::write(&path, text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Series saved to: {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    } else {
        print_summary(&ctx, &outcome);
    }

    Ok(())
}

fn print_summary(ctx: &RequestContext, outcome: &PredictionOutcome) {
    let s = &outcome.summary;
    let trend = match s.trend() {
        Trend::Bullish => "bullish",
        Trend::Bearish => "bearish",
        Trend::Flat => "flat",
    };

    println!();
    println!("=== Forecast ===");
    println!("Symbol:          {}", ctx.symbol);
    println!("Source:          {}", ctx.source);
    println!(
        "History:         {} records ({} to {})",
        outcome.series.len(),
        outcome
            .series
            .first()
            .map(|r| r.date.to_string())
            .unwrap_or_default(),
        outcome
            .series
            .last()
            .map(|r| r.date.to_string())
            .unwrap_or_default(),
    );
    println!(
        "Horizon:         {} ({} days)",
        ctx.horizon,
        ctx.horizon.days()
    );
    println!();
    println!("Current Price:   {:.2}", s.current_price);
    println!("Predicted Price: {:.2}", s.predicted_price);
    println!(
        "Change:          {:+.2} ({:+.2}%)",
        s.price_change, s.predicted_change_pct
    );
    println!(
        "95% Interval:    {:.2} to {:.2}",
        s.confidence_lower, s.confidence_upper
    );
    println!("Trend:           {trend}");
    println!();
}

fn run_symbols(source: Option<SourceArg>, catalog_path: Option<PathBuf>) -> Result<()> {
    let catalog = match catalog_path {
        Some(path) => SymbolCatalog::from_file(&path)
            .map_err(|e| anyhow::anyhow!("failed to load catalog: {e}"))?,
        None => SymbolCatalog::default_listing(),
    };

    let (catalog, label) = match source {
        Some(arg) => {
            let id = SourceId::from(arg);
            (catalog.filter_compatible(id), id.name())
        }
        None => (catalog.clone(), "all sources"),
    };

    println!("{} compatible symbols ({label}):", catalog.len());
    for (symbol, name) in catalog.iter() {
        println!("{symbol:<14} {name}");
    }

    Ok(())
}
