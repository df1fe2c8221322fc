//! archive: command-line client for the personal archive API.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use archive_client::{format_amount, ArchiveClient, ArchiveController, ClientConfig};
use archive_core::{
    defaults, CreateItemRequest, Item, SpendingReport, SpendingSummary, UpdateItemRequest,
    UNKNOWN_YEAR,
};

#[derive(Parser)]
#[command(name = "archive")]
#[command(author, version, about = "Personal archive of items and what they cost")]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the archive API
    #[arg(long, env = "ARCHIVE_API_URL", default_value = defaults::API_URL, global = true)]
    api_url: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List items, newest first
    List {
        /// Only items whose name or note contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only items with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Add an item
    Add {
        /// Item name
        name: String,

        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long)]
        price: Option<f64>,

        #[arg(short, long)]
        tag: Option<String>,

        #[arg(short, long)]
        note: Option<String>,

        /// Image URL
        #[arg(short, long)]
        image: Option<String>,
    },

    /// Change fields of an item; unspecified fields are kept
    Edit {
        id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long)]
        price: Option<f64>,

        #[arg(short, long)]
        tag: Option<String>,

        #[arg(short, long)]
        note: Option<String>,

        #[arg(short, long)]
        image: Option<String>,

        /// Remove a field (can specify multiple)
        #[arg(long, value_enum)]
        clear: Vec<ClearField>,
    },

    /// Delete an item
    Delete { id: Uuid },

    /// Spending totals, optionally narrowed by search and tag
    Summary {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        tag: Option<String>,

        /// Also print spend for this tag
        #[arg(long)]
        for_tag: Option<String>,

        /// Also print spend for this year
        #[arg(long)]
        for_year: Option<i32>,

        /// Number of top tags and years to show
        #[arg(long, default_value_t = defaults::TOP_CATEGORIES)]
        top: usize,
    },

    /// List distinct tags
    Tags,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClearField {
    Year,
    Price,
    Tag,
    Note,
    Image,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = ArchiveClient::with_config(ClientConfig {
        base_url: cli.api_url.clone(),
        ..ClientConfig::from_env()
    })?;
    let mut controller = ArchiveController::new(client);

    match cli.command {
        Commands::List { search, tag } => {
            controller.refresh().await?;
            controller.set_search_term(search.unwrap_or_default());
            controller.set_tag_filter(tag.unwrap_or_default());
            let visible = controller.state().visible_items();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                visible.iter().for_each(|item| print_item(item));
            }
        }
        Commands::Add {
            name,
            year,
            price,
            tag,
            note,
            image,
        } => {
            let req = CreateItemRequest {
                name,
                year,
                price,
                tag,
                note,
                image,
            };
            let item = controller.add_item(req).await?;
            print_result(&item, cli.json)?;
        }
        Commands::Edit {
            id,
            name,
            year,
            price,
            tag,
            note,
            image,
            clear,
        } => {
            let mut req = UpdateItemRequest {
                name,
                year: year.map(Some),
                price: price.map(Some),
                tag: tag.map(Some),
                note: note.map(Some),
                image: image.map(Some),
            };
            for field in clear {
                match field {
                    ClearField::Year => req.year = Some(None),
                    ClearField::Price => req.price = Some(None),
                    ClearField::Tag => req.tag = Some(None),
                    ClearField::Note => req.note = Some(None),
                    ClearField::Image => req.image = Some(None),
                }
            }
            if req.is_empty() {
                anyhow::bail!("nothing to change; pass at least one field or --clear");
            }
            let item = controller.update_item(id, req).await?;
            print_result(&item, cli.json)?;
        }
        Commands::Delete { id } => {
            controller.delete_item(id).await?;
            println!("Deleted {}", id);
        }
        Commands::Summary {
            search,
            tag,
            for_tag,
            for_year,
            top,
        } => {
            controller.refresh().await?;
            controller.set_search_term(search.unwrap_or_default());
            controller.set_tag_filter(tag.unwrap_or_default());

            let state = controller.state();
            let output = SummaryOutput::new(
                SpendingReport::build(state.visible_items(), top),
                &state.visible_summary(),
                for_tag,
                for_year,
            );
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_summary(&output);
            }
        }
        Commands::Tags => {
            controller.refresh().await?;
            for tag in controller.state().tags() {
                println!("{}", tag);
            }
        }
    }

    Ok(())
}

/// `summary` output: the report plus any requested point queries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryOutput {
    #[serde(flatten)]
    report: SpendingReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag_spend: Option<TagQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_spend: Option<YearQuery>,
}

#[derive(Debug, Serialize)]
struct TagQuery {
    tag: String,
    amount: f64,
}

#[derive(Debug, Serialize)]
struct YearQuery {
    year: i32,
    amount: f64,
}

impl SummaryOutput {
    fn new(
        report: SpendingReport,
        summary: &SpendingSummary,
        for_tag: Option<String>,
        for_year: Option<i32>,
    ) -> Self {
        Self {
            report,
            tag_spend: for_tag.map(|tag| TagQuery {
                amount: summary.spend_for_tag(&tag),
                tag,
            }),
            year_spend: for_year.map(|year| YearQuery {
                year,
                amount: summary.spend_for_year(year),
            }),
        }
    }
}

fn print_result(item: &Item, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        print_item(item);
    }
    Ok(())
}

fn print_item(item: &Item) {
    let price = match item.price.as_ref().and_then(|p| p.as_number()) {
        Some(v) if v.is_finite() => format_amount(v),
        _ => "-".to_string(),
    };
    let year = item
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string());

    println!(
        "{}  {:<24} {:>10}  {:<7} {}",
        item.id,
        item.name,
        price,
        year,
        item.tag.as_deref().unwrap_or("")
    );
    if let Some(note) = &item.note {
        println!("    {}", note);
    }
}

fn print_summary(output: &SummaryOutput) {
    print_report(&output.report);

    if let Some(q) = &output.tag_spend {
        println!("\nSpent on {}: {}", q.tag, format_amount(q.amount));
    }
    if let Some(q) = &output.year_spend {
        println!("\nSpent in {}: {}", q.year, format_amount(q.amount));
    }
}

fn print_report(report: &SpendingReport) {
    println!("Total spent: {}", format_amount(report.total_spent));
    println!(
        "Items with prices: {}, without: {}",
        report.priced_count, report.unpriced_count
    );

    if !report.top_tags.is_empty() {
        println!("\nTop tags:");
        for t in &report.top_tags {
            println!("  {:<20} {:>12}", t.tag, format_amount(t.amount));
        }
    }

    if !report.by_year.is_empty() {
        println!("\nBy year:");
        for y in &report.by_year {
            println!("  {:<20} {:>12}", y.year.to_string(), format_amount(y.amount));
        }
    }

    if !report.tag_shares.is_empty() {
        println!("\nShare of spending:");
        for s in &report.tag_shares {
            println!("  {:<20} {:>5.1}%", s.tag, s.percentage);
        }
    }
}
