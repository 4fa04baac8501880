//! CLI definition and dispatch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::adapters::csv_feed_adapter::CsvFeedAdapter;
use crate::adapters::file_config_adapter::{
    FileConfigAdapter, PARAM_KEY_PREFIX, STRATEGY_SECTION_PREFIX,
};
use crate::domain::bot::BotController;
use crate::domain::error::TickbotError;
use crate::domain::expr_parser;
use crate::domain::presets;
use crate::domain::strategy::Strategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::tick_port::TickSource;

#[derive(Parser, Debug)]
#[command(name = "tickbot", about = "Streaming market-signal paper-trading bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a CSV tick feed against configured strategies
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        feed: PathBuf,
        /// Show at most this many recent trades per strategy
        #[arg(long, default_value_t = 10)]
        trades: usize,
    },
    /// Validate a strategy configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the built-in strategy presets
    Presets,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            feed,
            trades,
        } => run_replay(&config, &feed, trades),
        Command::Validate { config } => run_validate(&config),
        Command::Presets => run_presets(),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TickbotError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build every `[strategy:<id>]` section into a strategy. Parse errors
/// name the section and side.
pub fn build_strategies(config: &dyn ConfigPort) -> Result<Vec<Strategy>, TickbotError> {
    let mut strategies = Vec::new();

    for section in config.sections() {
        let Some(id) = section.strip_prefix(STRATEGY_SECTION_PREFIX) else {
            continue;
        };

        let name = config
            .get_string(&section, "name")
            .unwrap_or_else(|| id.to_string());
        let buy = config
            .get_string(&section, "buy")
            .ok_or_else(|| TickbotError::ConfigMissing {
                section: section.clone(),
                key: "buy".into(),
            })?;
        let sell = config
            .get_string(&section, "sell")
            .ok_or_else(|| TickbotError::ConfigMissing {
                section: section.clone(),
                key: "sell".into(),
            })?;

        let mut params = HashMap::new();
        for key in config.keys(&section) {
            if let Some(param) = key.strip_prefix(PARAM_KEY_PREFIX) {
                params.insert(param.to_string(), config.get_double(&section, &key, 0.0));
            }
        }

        strategies.push(Strategy::from_conditions(id, name, &buy, &sell, params)?);
    }

    Ok(strategies)
}

fn run_replay(config_path: &PathBuf, feed_path: &PathBuf, max_trades: usize) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let strategies = match build_strategies(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if strategies.is_empty() {
        eprintln!("error: no [strategy:<id>] sections configured");
        return ExitCode::from(2);
    }

    let mut bot = BotController::new();
    for strategy in strategies {
        eprintln!("Activating strategy: {}", strategy.name);
        if let Err(e) = bot.activate(strategy) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("Replaying feed from {}", feed_path.display());
    let mut feed = match CsvFeedAdapter::from_path(feed_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut batches = 0usize;
    let mut ticks = 0usize;
    loop {
        match feed.next_batch() {
            Ok(Some(batch)) => {
                ticks += batch.len();
                bot.apply_batch(&batch);
                batches += 1;
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    eprintln!("Processed {} ticks in {} batches", ticks, batches);

    let ids: Vec<String> = bot.strategy_ids().map(str::to_string).collect();
    for id in &ids {
        let Some(snapshot) = bot.snapshot(id) else {
            continue;
        };
        let name = bot.strategy_name(id).unwrap_or(id);

        eprintln!("\n=== {} ===", name);
        eprintln!("Total Profit:     ${:.2}", snapshot.total_profit);
        eprintln!("Win Rate:         {:.1}%", snapshot.win_rate * 100.0);
        eprintln!("Closed Trades:    {}", snapshot.total_trades);
        eprintln!("Active Trades:    {}", snapshot.active_trades);

        let open = bot.open_symbols(id);
        if !open.is_empty() {
            eprintln!("Open Symbols:     {}", open.join(", "));
        }

        if !snapshot.recent_trades.is_empty() {
            eprintln!("Recent Trades:");
            for trade in snapshot.recent_trades.iter().take(max_trades) {
                let time = trade.closed_at.unwrap_or(trade.opened_at);
                eprintln!(
                    "  {}  {:<12} {:<4} ${:<12.2} {:+.2}",
                    time.format("%H:%M:%S"),
                    trade.pair,
                    trade.side.to_string(),
                    trade.price,
                    trade.profit,
                );
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating strategies: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let sections = adapter.strategy_sections();
    if sections.is_empty() {
        eprintln!("error: no [strategy:<id>] sections found");
        return ExitCode::from(2);
    }

    for section in &sections {
        eprintln!("\n[{}]", section);

        for side in ["buy", "sell"] {
            let Some(condition) = adapter.get_string(section, side) else {
                let err = TickbotError::ConfigMissing {
                    section: section.clone(),
                    key: side.into(),
                };
                eprintln!("error: {err}");
                return (&err).into();
            };
            match expr_parser::parse(&condition) {
                Ok(expr) => {
                    eprintln!("  {:<5} raw:    {}", side, condition);
                    eprintln!("  {:<5} parsed: {}", side, expr);
                }
                Err(e) => {
                    eprintln!(
                        "error: failed to parse {side}:\n{}",
                        e.display_with_context(&condition)
                    );
                    return (&TickbotError::from(e)).into();
                }
            }
        }
    }

    eprintln!("\n{} strategies are valid.", sections.len());
    ExitCode::SUCCESS
}

fn run_presets() -> ExitCode {
    for preset in presets::CATALOG {
        println!("{} / {}", preset.family, preset.name);
        println!("  {}", preset.description);
        println!("  buy:  {}", preset.buy);
        println!("  sell: {}", preset.sell);
        if !preset.params.is_empty() {
            let params: Vec<String> = preset
                .params
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            println!("  params: {}", params.join(", "));
        }
        println!();
    }
    ExitCode::SUCCESS
}
