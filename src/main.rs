use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use orderdash::config::DashboardConfig;
use orderdash::export::{export_all, ExportOptions};
use orderdash::logging::init_logging;
use orderdash::{
    category_drilldown, category_over_time, distinct_categories, fetch_daily_orders,
    fetch_order_lines, fetch_product_frequency, resample, Granularity, Store,
};

/// Order analytics for the Legal Desk dashboard
#[derive(Parser)]
#[command(name = "orderdash")]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database to read (overrides the configuration file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Orders and revenue per calendar date
    Daily,
    /// Orders per week or month
    Resample {
        #[arg(short, long, value_enum)]
        granularity: Option<Granularity>,
    },
    /// Most frequently purchased products
    Frequency,
    /// Total price over time by category
    Trend,
    /// Product categories present in the order lines
    Categories,
    /// Product totals within one category
    Drilldown {
        #[arg(long)]
        category: Option<String>,
    },
    /// Write every view as a Parquet file
    Export {
        #[arg(short, long)]
        out: PathBuf,
        #[arg(short, long, value_enum)]
        granularity: Option<Granularity>,
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    }
    .with_database(cli.db);

    let store = Store::file(&config.database)
        .with_context(|| format!("Failed to open database {}", config.database.display()))?;
    info!(database = %config.database.display(), "connected");

    match cli.command {
        Commands::Daily => {
            let daily = fetch_daily_orders(&store)?;
            println!("{:<12} {:>16} {:>14}", "order_date", "number_of_orders", "total_amount");
            println!("{:-<44}", "");
            for row in &daily {
                let date = row.date.as_deref().unwrap_or("(no date)");
                println!("{:<12} {:>16} {:>14.2}", date, row.order_count, row.total_amount);
            }
        }
        Commands::Resample { granularity } => {
            let granularity = config.with_granularity(granularity).granularity;
            let periods = resample(&fetch_daily_orders(&store)?, granularity)?;
            println!("{} Orders", granularity.label());
            println!("{:-<44}", "");
            for row in &periods {
                println!(
                    "{:<12} {:>16} {:>14.2}",
                    row.period_end.to_string(),
                    row.order_count,
                    row.total_amount
                );
            }
        }
        Commands::Frequency => {
            let frequency = fetch_product_frequency(&store)?;
            println!("{:<32} {:<20} {:>10}", "product_name", "category", "frequency");
            println!("{:-<64}", "");
            for row in &frequency {
                println!("{:<32} {:<20} {:>10}", row.product_name, row.category, row.frequency);
            }
        }
        Commands::Trend => {
            let trend = category_over_time(&fetch_order_lines(&store)?)?;
            println!("{:<12} {:<20} {:>14}", "year_month", "category", "price");
            println!("{:-<48}", "");
            for row in &trend {
                println!(
                    "{:<12} {:<20} {:>14.2}",
                    row.month.format("%Y-%m").to_string(),
                    row.category,
                    row.total_price
                );
            }
        }
        Commands::Categories => {
            for category in distinct_categories(&fetch_order_lines(&store)?) {
                println!("{}", category);
            }
        }
        Commands::Drilldown { category } => {
            let lines = fetch_order_lines(&store)?;
            let Some(category) = config
                .with_category(category)
                .category
                .or_else(|| distinct_categories(&lines).into_iter().next())
            else {
                bail!("No order lines found; nothing to drill into");
            };

            println!("Product Prices in {} Category", category);
            println!("{:-<48}", "");
            for row in category_drilldown(&lines, &category) {
                println!("{:<32} {:>14.2}", row.product_name, row.total_price);
            }
        }
        Commands::Export { out, granularity, category } => {
            let config = config.with_granularity(granularity).with_category(category);
            let options = ExportOptions {
                granularity: config.granularity,
                category: config.category,
            };
            let written = export_all(&store, &out, &options)?;
            for path in written {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
