//! synth-runner: headless dataset generator for streamsynth.
//!
//! Usage:
//!   synth-runner --seed 51 --users 10000 --days 30 --out-dir ./out
//!   synth-runner --config run.json --billing flat-cost

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use streamsynth_core::{
    config::{BillingModel, SimConfig},
    engine::{RunSummary, SimEngine},
    writer::TabularWriter,
};

#[derive(Parser, Debug)]
#[command(name = "synth-runner", version, about = "Generate synthetic streaming ad datasets")]
struct Args {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the CSV files and run manifest.
    #[arg(long, default_value = "./out")]
    out_dir: PathBuf,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    users: Option<usize>,

    #[arg(long)]
    days: Option<u32>,

    /// First day of the horizon, YYYY-MM-DD.
    #[arg(long)]
    start_date: Option<NaiveDate>,

    #[arg(long)]
    click_rate: Option<f64>,

    #[arg(long)]
    click_to_conversion: Option<f64>,

    #[arg(long)]
    view_to_conversion: Option<f64>,

    #[arg(long)]
    sessions_per_day: Option<f64>,

    #[arg(long)]
    events_per_session: Option<f64>,

    #[arg(long, value_enum)]
    billing: Option<BillingArg>,

    /// Skip the playback sessions table.
    #[arg(long)]
    no_playback: bool,

    /// Generate and print the summary without writing files.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BillingArg {
    Cpm,
    FlatCost,
}

impl From<BillingArg> for BillingModel {
    fn from(arg: BillingArg) -> Self {
        match arg {
            BillingArg::Cpm => BillingModel::Cpm,
            BillingArg::FlatCost => BillingModel::FlatCost,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args)?;

    println!("streamsynth synth-runner");
    println!("  seed:       {}", config.seed);
    println!("  users:      {}", config.n_users);
    println!("  days:       {}", config.days);
    println!("  start_date: {}", config.start_date);
    println!("  out_dir:    {}", args.out_dir.display());
    println!();

    let engine = SimEngine::with_standard_reference(config)?;
    let dataset = engine.run()?;

    if args.dry_run {
        log::info!("dry run: nothing written");
    } else {
        let writer = TabularWriter::new(args.out_dir.clone());
        let files = writer.write_dataset(&dataset, engine.config())?;
        for path in &files {
            println!("  wrote {}", path.display());
        }
        println!();
    }

    print_summary(&dataset.summary);
    Ok(())
}

fn build_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(&path.to_string_lossy())?,
        None => SimConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(users) = args.users {
        config.n_users = users;
    }
    if let Some(days) = args.days {
        config.days = days;
    }
    if let Some(start_date) = args.start_date {
        config.start_date = start_date;
    }
    if let Some(rate) = args.click_rate {
        config.base_impression_to_click = rate;
    }
    if let Some(rate) = args.click_to_conversion {
        config.base_click_to_conversion = rate;
    }
    if let Some(rate) = args.view_to_conversion {
        config.base_view_to_conversion = rate;
    }
    if let Some(mean) = args.sessions_per_day {
        config.avg_sessions_per_day = mean;
    }
    if let Some(mean) = args.events_per_session {
        config.avg_events_per_session = mean;
    }
    if let Some(billing) = args.billing {
        config.billing_model = billing.into();
    }
    if args.no_playback {
        config.playback.enabled = false;
    }
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:            {}", summary.run_id);
    println!("  users:             {}", summary.users);
    println!("  content rows:      {}", summary.content_rows);
    println!("  campaigns:         {}", summary.campaigns);
    println!("  playback sessions: {}", summary.playback_sessions);
    println!("  ad sessions:       {}", summary.ad_sessions);
    println!("  impressions:       {}", summary.impressions);
    println!("  clicks:            {} (ctr {:.4})", summary.clicks, summary.click_through_rate());
    println!(
        "  conversions:       {} (click-through {}, view-through {})",
        summary.conversions, summary.click_through_conversions, summary.view_through_conversions
    );
    println!("  revenue:           ${:.2}", summary.total_revenue_usd);
    println!("  cost:              ${:.2}", summary.total_cost_usd);

    println!();
    println!("=== RETENTION (users by active days) ===");
    for (i, count) in summary.active_days_histogram.iter().enumerate() {
        if *count > 0 {
            println!("  {:>3} days: {count}", i + 1);
        }
    }
}
