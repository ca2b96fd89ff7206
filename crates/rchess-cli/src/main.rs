// Command line front end: search, perft and divide

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;

use rchess_core::movegen::{divide, perft};
use rchess_core::{Engine, EngineOptions, Move, Position, SearchInfo, SearchLimits, SearchListener};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Engine options as TOML (hash_mb, threads, ponder, under_promotions, [pruning])
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a position and print the best move
    Search(SearchArgs),
    /// Count leaf nodes of the move tree
    Perft(PerftArgs),
    /// Perft split by root move
    Divide(PerftArgs),
}

#[derive(ClapArgs, Debug)]
struct PositionArgs {
    /// Position in FEN (start position if omitted)
    #[arg(long)]
    fen: Option<String>,

    /// Moves to play from the position, in long algebraic notation
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    moves: Vec<String>,
}

#[derive(ClapArgs, Debug)]
struct SearchArgs {
    #[command(flatten)]
    position: PositionArgs,

    #[arg(long)]
    depth: Option<i32>,
    /// Think for exactly this many milliseconds
    #[arg(long)]
    movetime: Option<u64>,
    #[arg(long)]
    nodes: Option<u64>,
    #[arg(long)]
    wtime: Option<u64>,
    #[arg(long)]
    btime: Option<u64>,
    #[arg(long)]
    winc: Option<u64>,
    #[arg(long)]
    binc: Option<u64>,
    #[arg(long)]
    movestogo: Option<u32>,

    /// Overrides the configured thread count
    #[arg(long)]
    threads: Option<usize>,
    /// Overrides the configured hash size (MB)
    #[arg(long)]
    hash: Option<usize>,

    /// Print the result as JSON instead of a `bestmove` line
    #[arg(long)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct PerftArgs {
    #[command(flatten)]
    position: PositionArgs,

    depth: u32,
}

/// Prints UCI-style `info` lines
struct InfoPrinter {
    quiet: bool,
}

impl SearchListener for InfoPrinter {
    fn on_info(&self, info: &SearchInfo) {
        if !self.quiet {
            println!("{info}");
        }
    }
}

#[derive(Serialize)]
struct SearchReport {
    best_move: String,
    ponder_move: Option<String>,
    score: String,
    depth: i32,
    nodes: u64,
    elapsed_ms: u64,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level))
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(args) {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let options = match &args.config {
        Some(path) => load_options(path)?,
        None => EngineOptions::default(),
    };
    debug!("options: {options:?}");

    match args.command {
        Command::Search(search) => run_search(options, search),
        Command::Perft(p) => {
            let mut pos = load_position(&p.position)?;
            let start = Instant::now();
            let nodes = perft(&mut pos, p.depth);
            let elapsed = start.elapsed();
            println!("{nodes}");
            info!("perft {} = {nodes} in {} ms", p.depth, elapsed.as_millis());
            Ok(())
        }
        Command::Divide(p) => {
            let mut pos = load_position(&p.position)?;
            let split = divide(&mut pos, p.depth);
            for (mv, nodes) in &split {
                println!("{mv}: {nodes}");
            }
            println!();
            println!("Moves: {}", split.len());
            println!("Nodes: {}", split.iter().map(|(_, n)| n).sum::<u64>());
            Ok(())
        }
    }
}

fn load_options(path: &Path) -> Result<EngineOptions> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let options: EngineOptions = toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    options.validate().with_context(|| format!("invalid options in {}", path.display()))?;
    info!("loaded options from {}", path.display());
    Ok(options)
}

fn load_position(args: &PositionArgs) -> Result<Position> {
    let mut pos = match &args.fen {
        Some(fen) => Position::from_fen(fen).with_context(|| format!("bad FEN '{fen}'"))?,
        None => Position::startpos(),
    };
    for text in &args.moves {
        let mv = pos.parse_move(text).with_context(|| format!("in move list at '{text}'"))?;
        pos.do_move(mv);
    }
    Ok(pos)
}

fn run_search(mut options: EngineOptions, args: SearchArgs) -> Result<()> {
    if let Some(threads) = args.threads {
        options.threads = threads;
    }
    if let Some(hash) = args.hash {
        options.hash_mb = hash;
    }
    let pos = load_position(&args.position)?;

    let limits = SearchLimits {
        depth: args.depth,
        move_time: args.movetime,
        wtime: args.wtime,
        btime: args.btime,
        winc: args.winc,
        binc: args.binc,
        moves_to_go: args.movestogo,
        nodes: args.nodes,
        ..Default::default()
    };
    if limits.is_unbounded() {
        bail!("no search limit given (use --depth, --movetime, --nodes or a clock)");
    }

    let mut engine = Engine::new(options).context("creating engine")?;
    let start = Instant::now();
    let handle = engine.start_search(&pos, limits, Arc::new(InfoPrinter { quiet: args.json }))?;
    let outcome = handle.wait();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if args.json {
        let report = SearchReport {
            best_move: move_text(outcome.best_move),
            ponder_move: outcome.ponder_move.map(move_text),
            score: outcome.score.to_string(),
            depth: outcome.depth,
            nodes: outcome.nodes,
            elapsed_ms,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match outcome.ponder_move {
            Some(ponder) => println!("bestmove {} ponder {}", move_text(outcome.best_move), ponder),
            None => println!("bestmove {}", move_text(outcome.best_move)),
        }
    }
    Ok(())
}

/// UCI spelling, `0000` for no move
fn move_text(mv: Move) -> String {
    if mv.is_some() { mv.to_string() } else { "0000".into() }
}
