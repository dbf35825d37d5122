use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use freecellar::solver::SolveStats;
use freecellar::{
    capture_auto_moves, deal, display, format_deck, parse_deck, persist, solve, AutoPlayed,
    Challenge, ParsedDeck, SolverConfig,
};

#[derive(Debug, Parser)]
#[command(name = "solve", about = "Freecell beam-search / A* solver")]
struct Args {
    /// Encoded deck configuration: reserve, foundations (H C D S),
    /// tableau columns behind Roman-numeral markers, with an optional
    /// `$<challenge>$<move_limit>` suffix
    deck: Option<String>,

    /// Deal a pseudo-random deck from this seed when no deck is given
    #[arg(long, default_value_t = 2)]
    seed: u64,

    /// Max nodes retained per level per worker
    #[arg(long, default_value_t = 2048)]
    beam_size: usize,

    /// Beam worker threads
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// Directory holding sol_<n> files
    #[arg(long, default_value = "solutions")]
    solutions: PathBuf,

    /// Skip the solutions-directory cache lookup
    #[arg(long)]
    no_cache: bool,

    /// Skip safe auto-play before the search
    #[arg(long)]
    no_auto_play: bool,

    /// Suppress progress output
    #[arg(long)]
    quiet: bool,

    /// Emit a machine-readable JSON report instead of the readable listing
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SolveReport<'a> {
    deck: &'a str,
    challenge: String,
    move_limit: u32,
    solved: bool,
    cached: bool,
    solution: Option<&'a str>,
    auto_moves: u32,
    stats: SolveStats,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let ParsedDeck {
        layout: initial,
        challenge,
        move_limit,
    } = match &args.deck {
        Some(deck) => parse_deck(deck)?,
        None => ParsedDeck {
            layout: deal(args.seed),
            challenge: Challenge::FullSolve,
            move_limit: 0,
        },
    };
    let deck_code = format_deck(&initial);

    // A move-limited challenge counts every foundation move, so auto-play
    // must not spend the budget behind the player's back.
    let auto_play = !args.no_auto_play && !(move_limit > 0 && !challenge.is_full_solve());
    if !auto_play && !args.no_auto_play && !args.quiet {
        println!("[solve] auto-play disabled: challenge carries a move limit");
    }
    let auto = if auto_play {
        capture_auto_moves(&initial, &challenge)
    } else {
        AutoPlayed {
            layout: initial.clone(),
            encoded: String::new(),
            count: 0,
        }
    };

    if !args.no_cache {
        if let Some(cached) = persist::find_cached_solution(&args.solutions, &deck_code)? {
            // Older files may predate auto-move capture; patch the prefix in.
            let full = if cached.solution.starts_with(&auto.encoded) {
                cached.solution
            } else {
                format!("{}{}", auto.encoded, cached.solution)
            };
            if args.json {
                emit_report(&deck_code, &challenge, move_limit, Some(&full), &auto, true, SolveStats::default());
            } else {
                println!("Found existing solution in {}\n", cached.path.display());
                print_outcome(&initial, &deck_code, &full)?;
            }
            return Ok(());
        }
    }

    // Challenge met by auto-play alone (or already met at the start).
    if challenge.is_met(&auto.layout) {
        let path = persist::save_solution(&args.solutions, &deck_code, &auto.encoded)?;
        if args.json {
            emit_report(&deck_code, &challenge, move_limit, Some(&auto.encoded), &auto, false, SolveStats::default());
        } else {
            print_outcome(&initial, &deck_code, &auto.encoded)?;
            println!("Saved encoded solution to {}\n", path.display());
        }
        return Ok(());
    }

    let remaining_limit = if move_limit > 0 {
        move_limit.saturating_sub(auto.count)
    } else {
        0
    };
    let config = SolverConfig {
        beam_size: args.beam_size,
        workers: args.workers,
        seed: args.seed,
        challenge,
        move_limit: remaining_limit,
        quiet: args.quiet || args.json,
    };

    let (solution, stats) = solve(&auto.layout, &config)?;

    match solution {
        None => {
            if args.json {
                emit_report(&deck_code, &challenge, move_limit, None, &auto, false, stats);
            } else {
                println!("no solution");
            }
            Ok(())
        }
        Some(sol) => {
            let full = format!("{}{}", auto.encoded, sol.encoded);
            let path = persist::save_solution(&args.solutions, &deck_code, &full)?;
            if args.json {
                emit_report(&deck_code, &challenge, move_limit, Some(&full), &auto, false, stats);
            } else {
                print_outcome(&initial, &deck_code, &full)?;
                println!("Saved encoded solution to {}\n", path.display());
            }
            Ok(())
        }
    }
}

fn print_outcome(
    initial: &freecellar::Layout,
    deck_code: &str,
    solution: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Encoded deck configuration\n{deck_code}\n");
    println!("Readable deck configuration\n{}", display::render_deck(initial));
    println!("Encoded solution\n{solution}\n");
    println!("Readable solution\n{}", display::render_solution(initial, solution)?);
    Ok(())
}

fn emit_report(
    deck: &str,
    challenge: &Challenge,
    move_limit: u32,
    solution: Option<&str>,
    auto: &AutoPlayed,
    cached: bool,
    stats: SolveStats,
) {
    let report = SolveReport {
        deck,
        challenge: challenge.code(),
        move_limit,
        solved: solution.is_some(),
        cached,
        solution,
        auto_moves: auto.count,
        stats,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("[solve] report serialization failed: {e}"),
    }
}
