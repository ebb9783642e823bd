use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use trailsim::prelude::*;

#[derive(Parser)]
#[command(name = "trailsim")]
#[command(about = "Simulates stop/target trade outcomes over futures candle data", long_about = None)]
struct Cli {
    //enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //simulate trades on every bar or on indicator crossovers
    Simulate(SimulateArgs),

    //compute one indicator over a price column
    Indicator(IndicatorArgs),
}

#[derive(Args)]
struct SimulateArgs {
    //json run configuration (flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    //path to a sierrachart csv export
    #[arg(long)]
    data: Option<PathBuf>,

    //tick size
    #[arg(long)]
    tick_size: Option<f64>,

    //stop offset in ticks
    #[arg(long)]
    stop: Option<u32>,

    //target offset in ticks
    #[arg(long)]
    target: Option<u32>,

    //slippage in ticks
    #[arg(long)]
    slippage: Option<u32>,

    //trailing stop offset in ticks
    #[arg(long)]
    trailing: Option<u32>,

    //disable the trailing stop
    #[arg(long, conflicts_with = "trailing")]
    no_trailing: bool,

    //fill at the next bar's open instead of the entry bar's close
    #[arg(long)]
    next_open: bool,

    //direction to simulate (long, short, both)
    #[arg(long)]
    direction: Option<String>,

    //output path for per-bar results csv
    #[arg(long)]
    output_csv: Option<PathBuf>,

    //write the effective configuration to this path
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Args)]
struct IndicatorArgs {
    //path to a sierrachart csv export
    #[arg(long)]
    data: PathBuf,

    //indicator name (ma, ema, "study angle", cci, t3)
    #[arg(long)]
    name: String,

    //indicator parameter as key=value (eg length=14), repeatable
    #[arg(long = "param")]
    params: Vec<String>,

    //price column (open, high, low, last)
    #[arg(long, default_value = "last")]
    field: String,

    //output path for indicator csv
    #[arg(long)]
    output_csv: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug,trailsim=debug")
    } else {
        EnvFilter::new("warn,trailsim=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate(args) => run_simulation(args)?,
        Commands::Indicator(args) => run_indicator(args)?,
    }

    Ok(())
}

fn build_config(args: &SimulateArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => SimulationConfig::default(),
    };

    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    if let Some(tick_size) = args.tick_size {
        config.tick_size = tick_size;
    }
    if let Some(stop) = args.stop {
        config.stop_offset_ticks = stop;
    }
    if let Some(target) = args.target {
        config.target_offset_ticks = target;
    }
    if let Some(slippage) = args.slippage {
        config.slippage_ticks = slippage;
    }
    if let Some(trailing) = args.trailing {
        config.trailing_offset_ticks = Some(trailing);
    }
    if args.no_trailing {
        config.trailing_offset_ticks = None;
    }
    if args.next_open {
        config.enter_on_close = false;
    }
    if let Some(direction) = &args.direction {
        config.directions = match direction.to_lowercase().as_str() {
            "both" => vec![Direction::Long, Direction::Short],
            other => vec![Direction::parse(other)
                .ok_or_else(|| anyhow::anyhow!("Unknown direction: {}", other))?],
        };
    }
    if let Some(output) = &args.output_csv {
        config.output_csv = Some(output.clone());
    }

    Ok(config)
}

fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    info!(path = ?path, "loading data");
    let bars = load_sierra_csv(path).with_context(|| format!("Failed to load data from {:?}", path))?;
    if bars.is_empty() {
        anyhow::bail!("No bars found in {:?}", path);
    }

    println!("Loaded {} bars", bars.len());
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        println!("Date range: {} to {}\n", first.datetime(), last.datetime());
    }
    Ok(bars)
}

fn run_simulation(args: SimulateArgs) -> Result<()> {
    let config = build_config(&args)?;

    if let Some(path) = &args.save_config {
        config
            .to_json_file(path)
            .with_context(|| format!("Failed to save config to {:?}", path))?;
        println!("Configuration saved to {:?}", path);
    }

    println!("Trailsim Trade Outcome Simulator");
    println!("================================\n");

    let bars = load_bars(&config.data_path)?;
    let candles = candles(&bars);

    println!("Tick size: {}", config.tick_size);
    println!(
        "Stop: {} ticks, Target: {} ticks, Slippage: {} ticks",
        config.stop_offset_ticks, config.target_offset_ticks, config.slippage_ticks
    );
    match config.trailing_offset_ticks {
        Some(offset) => println!("Trailing stop: {} ticks", offset),
        None => println!("Trailing stop: off"),
    }
    println!(
        "Entry fill: {}\n",
        if config.enter_on_close {
            "entry bar close"
        } else {
            "next bar open"
        }
    );

    let simulator = Simulator::new(config.trading_hours);
    let mut columns: Vec<(Direction, Vec<f64>)> = Vec::with_capacity(config.directions.len());

    for &direction in &config.directions {
        let entries = config.entry_rule.select(&candles, direction)?;
        debug!(?direction, entries = entries.len(), "selected entries");

        let requests = config.requests(&entries, direction);
        let outcomes = simulator.simulate_parallel(&candles, &requests)?;

        let summary = SummaryMetrics::from_outcomes(&outcomes);
        summary.pretty_print_table(direction_label(direction));
        println!();

        columns.push((direction, outcomes_by_bar(candles.len(), &entries, &outcomes)));
    }

    if let Some(path) = &config.output_csv {
        save_results_csv(&bars, &columns, path)?;
        println!("Results saved to {:?}", path);
    }

    Ok(())
}

fn run_indicator(args: IndicatorArgs) -> Result<()> {
    let field = PriceField::parse(&args.field)
        .ok_or_else(|| anyhow::anyhow!("Unknown price field: {}", args.field))?;
    let params = parse_params(&args.params)?;
    let spec = IndicatorSpec::from_params(&args.name, &params)?;

    let bars = load_bars(&args.data)?;
    let prices = column(&candles(&bars), field);
    let values = spec.apply(&prices)?;

    match &args.output_csv {
        Some(path) => {
            save_indicator_csv(&bars, &prices, &values, path)?;
            println!("Indicator saved to {:?}", path);
        }
        None => print_indicator_tail(&bars, &prices, &values, spec.name()),
    }

    Ok(())
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Long => "Long",
        Direction::Short => "Short",
    }
}

#[derive(Serialize)]
struct ResultRow {
    date: NaiveDate,
    time: NaiveTime,
    open: f64,
    high: f64,
    low: f64,
    last: f64,
    long: Option<f64>,
    short: Option<f64>,
}

fn save_results_csv(bars: &[Bar], columns: &[(Direction, Vec<f64>)], path: &Path) -> Result<()> {
    let outcome_at = |direction: Direction, index: usize| {
        columns
            .iter()
            .find(|(d, _)| *d == direction)
            .and_then(|(_, values)| values.get(index).copied())
    };

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    for (index, bar) in bars.iter().enumerate() {
        writer.serialize(ResultRow {
            date: bar.date,
            time: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            last: bar.last,
            long: outcome_at(Direction::Long, index),
            short: outcome_at(Direction::Short, index),
        })?;
    }

    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct IndicatorRow {
    date: NaiveDate,
    time: NaiveTime,
    price: f64,
    value: f64,
}

fn save_indicator_csv(bars: &[Bar], prices: &[f64], values: &[f64], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    for ((bar, &price), &value) in bars.iter().zip(prices).zip(values) {
        writer.serialize(IndicatorRow {
            date: bar.date,
            time: bar.time,
            price,
            value,
        })?;
    }

    writer.flush()?;
    Ok(())
}

//prints the most recent values
fn print_indicator_tail(bars: &[Bar], prices: &[f64], values: &[f64], name: &str) {
    const TAIL: usize = 20;

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Time"),
        Cell::new("Price"),
        Cell::new(name),
    ]));

    let start = bars.len().saturating_sub(TAIL);
    for ((bar, price), value) in bars.iter().zip(prices).zip(values).skip(start) {
        table.add_row(Row::new(vec![
            Cell::new(&bar.datetime().to_string()),
            Cell::new(&format!("{:.2}", price)),
            Cell::new(&format!("{:.4}", value)),
        ]));
    }

    table.printstd();
}
