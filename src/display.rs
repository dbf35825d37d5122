//! Human-readable rendering of decks and solutions, with the traditional
//! terminal palette: red for hearts/diamonds, green for clubs/spades,
//! blue for moves the safe-autoplay rule would have made anyway.

use crate::cards::{Card, Color};
use crate::deck::FOUNDATION_ORDER;
use crate::layout::{Layout, RESERVE_SLOTS, TABLEAU_COUNT};
use crate::moves::{apply_step, decode_solution, Place, Target};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

fn paint(card: Card) -> String {
    let tint = match card.color() {
        Color::Red => RED,
        Color::Black => GREEN,
    };
    format!("{tint}{card}{RESET}")
}

/// Multi-line readable deck configuration.
pub fn render_deck(layout: &Layout) -> String {
    let mut out = String::new();

    out.push_str("Reserve    :");
    for slot in 0..RESERVE_SLOTS {
        match layout.reserve().get(slot) {
            Some(&card) => out.push_str(&format!(" {}", paint(card))),
            None => out.push_str(" .."),
        }
    }
    out.push('\n');

    out.push_str("Foundation :");
    for suit in FOUNDATION_ORDER {
        match layout.foundation_top(suit) {
            Some(card) => out.push_str(&format!(" {}", paint(card))),
            None => out.push_str(" .."),
        }
    }
    out.push('\n');

    for col in 0..TABLEAU_COUNT {
        out.push_str(&format!("  {}:", col + 1));
        for &card in layout.tableau(col) {
            out.push_str(&format!(" {}", paint(card)));
        }
        out.push('\n');
    }
    out
}

/// Decode an encoded solution and narrate it step by step against the
/// given starting layout. Fails if the solution does not replay cleanly.
pub fn render_solution(start: &Layout, encoded: &str) -> Result<String, String> {
    let steps = decode_solution(encoded)?;
    let mut layout = start.clone();
    let mut out = String::new();

    for (i, step) in steps.iter().enumerate() {
        let what = if step.count > 1 {
            format!("stack of {} cards ({})", step.count, paint(step.card))
        } else {
            paint(step.card)
        };
        let from = match step.src {
            Place::Reserve => "Reserve".to_string(),
            Place::Tableau(col) => format!("Tableau {}", col + 1),
        };
        let (to, onto) = match step.dst {
            Target::Foundation => ("Foundation".to_string(), String::new()),
            Target::Reserve => ("Reserve".to_string(), String::new()),
            Target::Tableau(col) => {
                let onto = match layout.tableau(col as usize).last() {
                    Some(&top) => format!(" (on {})", paint(top)),
                    None => " (empty column)".to_string(),
                };
                (format!("Tableau {}", col + 1), onto)
            }
        };
        let auto = step.dst == Target::Foundation && layout.can_auto_play(step.card);

        let line = format!("Step {}: Move {what} from {from} to {to}{onto}", i + 1);
        if auto {
            out.push_str(&format!("{BLUE}{line}{RESET}\n"));
        } else {
            out.push_str(&line);
            out.push('\n');
        }

        layout = apply_step(&layout, step)?;
    }
    Ok(out)
}
