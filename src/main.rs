//! Blackbox entry point
//!
//! Terminal host around the game core: renders the board as text, maps
//! typed commands onto core calls, and shows slot paints as ANSI color
//! swatches. No game rules live here.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write as _};

use glam::IVec2;

use blackbox::scores::BestScores;
use blackbox::sim::{
    BorderSlot, Outcome, REFLECT_TOKEN, Round, RoundConfig, Side, SlotPaint, Token,
};

/// One parsed player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Fire(BorderSlot),
    Mark(IVec2),
    Evaluate,
    New(Option<usize>),
    Scores,
    Dump,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = words.next()?;
    match head {
        "fire" | "f" => parse_slot(words.next()?).map(Command::Fire),
        "mark" | "m" => {
            let x = words.next()?.parse().ok()?;
            let y = words.next()?.parse().ok()?;
            Some(Command::Mark(IVec2::new(x, y)))
        }
        "eval" | "e" => Some(Command::Evaluate),
        "new" | "n" => match words.next() {
            Some(count) => count.parse().ok().map(|c| Command::New(Some(c))),
            None => Some(Command::New(None)),
        },
        "scores" => Some(Command::Scores),
        "dump" => Some(Command::Dump),
        "help" | "h" | "?" => Some(Command::Help),
        "quit" | "q" => Some(Command::Quit),
        _ => None,
    }
}

/// Slot syntax: side letter + lane, e.g. "L3", "t0".
fn parse_slot(word: &str) -> Option<BorderSlot> {
    let mut chars = word.chars();
    let side = match chars.next()?.to_ascii_uppercase() {
        'L' => Side::Left,
        'R' => Side::Right,
        'B' => Side::Bottom,
        'T' => Side::Top,
        _ => return None,
    };
    let lane: u8 = chars.as_str().parse().ok()?;
    Some(BorderSlot::new(side, lane))
}

fn ansi_block(token: Token) -> String {
    let (r, g, b) = token.rgb();
    format!("\x1b[38;2;{r};{g};{b}m██\x1b[0m")
}

fn swatch(paint: Option<SlotPaint>) -> String {
    match paint {
        None => "▒▒".to_string(),
        Some(SlotPaint::Reflected) => ansi_block(REFLECT_TOKEN),
        Some(SlotPaint::Token(token)) => ansi_block(token),
    }
}

/// Text board: rows top-down (y = N-1 first), border swatches on all four
/// sides, lane indices in the margins.
fn render_board(round: &Round, revealed: bool) -> String {
    let n = round.grid_size();
    let mut out = String::new();

    out.push_str("    ");
    for x in 0..n {
        let _ = write!(out, "{:<2}", x % 10);
    }
    out.push('\n');

    out.push_str("    ");
    for lane in 0..n {
        out.push_str(&swatch(
            round.slot_paint(BorderSlot::new(Side::Top, lane as u8)),
        ));
    }
    out.push('\n');

    for y in (0..n).rev() {
        let _ = write!(out, "{y:>2} ");
        out.push_str(&swatch(
            round.slot_paint(BorderSlot::new(Side::Left, y as u8)),
        ));
        for x in 0..n {
            let pos = IVec2::new(x, y);
            let marker = revealed && round.hidden_markers().any(|m| m == pos);
            let glyph = match (marker, round.has_guess_at(pos)) {
                (true, true) => "◉ ",
                (true, false) => "● ",
                (false, true) => "◎ ",
                (false, false) => "· ",
            };
            out.push_str(glyph);
        }
        out.push_str(&swatch(
            round.slot_paint(BorderSlot::new(Side::Right, y as u8)),
        ));
        let _ = write!(out, " {y}");
        out.push('\n');
    }

    out.push_str("    ");
    for lane in 0..n {
        out.push_str(&swatch(
            round.slot_paint(BorderSlot::new(Side::Bottom, lane as u8)),
        ));
    }
    out.push('\n');

    let _ = write!(
        out,
        "penalty {}  guesses {}/{}  tokens left {}",
        round.penalty(),
        round.guess_count(),
        round.marker_count(),
        round.tokens_remaining()
    );
    out
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Absorbed { .. } => "the ray was absorbed".to_string(),
        // Both reflection kinds look identical to the player.
        Outcome::ReflectedAtEntry | Outcome::ReflectedToOrigin => {
            "the ray reflected straight back".to_string()
        }
        Outcome::Exited { slot } => format!("the ray exited at {slot}"),
    }
}

const HELP: &str = "\
commands:
  fire <slot>   fire a ray, e.g. `fire L3` (sides L/R/B/T, lane 0..N-1)
  mark <x> <y>  toggle a deduction marker on a cell
  eval          score your guesses (+5 per missed atom) and reveal the board
  new [count]   deal a new round, optionally with a different atom count
  scores        show the session's best rounds
  dump          print the full round state as JSON (spoils the atoms!)
  help          this text
  quit          leave";

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
    log::info!("Blackbox starting with seed {seed}");

    let config = RoundConfig {
        seed,
        ..RoundConfig::default()
    };
    let mut round = match Round::new(config) {
        Ok(round) => round,
        Err(err) => {
            eprintln!("cannot start round: {err}");
            return;
        }
    };
    let mut scores = BestScores::new();
    let mut revealed = false;

    println!("Blackbox — deduce the hidden atoms. Type 'help' for commands.");
    println!("{}", render_board(&round, revealed));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        let Some(Ok(line)) = lines.next() else { break };
        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                println!("unrecognized command (try 'help')");
            }
            continue;
        };

        match command {
            Command::Fire(slot) => match round.fire_ray(slot) {
                Ok(path) => {
                    println!("{}", describe(path.outcome));
                    println!("{}", render_board(&round, revealed));
                }
                Err(err) => println!("{err}"),
            },
            Command::Mark(cell) => match round.toggle_guess(cell) {
                Ok(placed) => {
                    println!(
                        "marker {} at ({}, {})",
                        if placed { "placed" } else { "removed" },
                        cell.x,
                        cell.y
                    );
                    println!("{}", render_board(&round, revealed));
                }
                Err(err) => println!("{err}"),
            },
            Command::Evaluate => {
                let found = round
                    .hidden_markers()
                    .filter(|&m| round.has_guess_at(m))
                    .count();
                let delta = round.evaluate();
                revealed = true;
                println!(
                    "found {found}/{} atoms, +{delta} penalty, {} total",
                    round.marker_count(),
                    round.penalty()
                );
                if let Some(rank) = scores.add_score(round.penalty(), found, round.marker_count()) {
                    println!("best rounds: rank #{rank}");
                }
                println!("{}", render_board(&round, revealed));
            }
            Command::New(count) => {
                let count = count.unwrap_or(round.marker_count());
                match round.reset(count) {
                    Ok(()) => {
                        revealed = false;
                        println!("new round with {count} atoms");
                        println!("{}", render_board(&round, revealed));
                    }
                    Err(err) => println!("{err}"),
                }
            }
            Command::Scores => {
                if scores.is_empty() {
                    println!("no finished rounds yet");
                } else {
                    for (i, entry) in scores.entries.iter().enumerate() {
                        println!(
                            "{:>2}. penalty {:>3}  atoms {}/{}",
                            i + 1,
                            entry.penalty,
                            entry.found,
                            entry.marker_count
                        );
                    }
                }
            }
            Command::Dump => match serde_json::to_string_pretty(&round) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("serialize failed: {err}"),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }
}
