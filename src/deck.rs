//! Deck-configuration strings: the single-argument external format.
//!
//! Layout section, no delimiters except role markers:
//! - bytes 0..8: four reserve slots, two chars each, `00` = empty
//! - bytes 8..16: four foundation tops in suit order H, C, D, S
//! - then per tableau column a Roman-numeral marker (`i`..`viii`)
//!   followed by that column's cards bottom to top
//!
//! Optional suffix `$<challenge>$<move_limit>`. The foundation order is an
//! I/O-boundary contract only; internally suits are indexed C, D, H, S.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::cards::{Card, Suit, RANK_COUNT};
use crate::layout::{Layout, RESERVE_SLOTS, TABLEAU_COUNT};
use crate::solver::Challenge;

/// External foundation slot order (H, C, D, S).
pub const FOUNDATION_ORDER: [Suit; 4] = [Suit::Hearts, Suit::Clubs, Suit::Diamonds, Suit::Spades];

const ROMAN: [&str; TABLEAU_COUNT] = ["i", "ii", "iii", "iv", "v", "vi", "vii", "viii"];

#[derive(Debug, Clone)]
pub struct ParsedDeck {
    pub layout: Layout,
    pub challenge: Challenge,
    pub move_limit: u32,
}

/// Parse a full deck-configuration argument, including the optional
/// challenge suffix. Validation is complete before any search starts:
/// malformed codes and conservation violations are rejected here.
pub fn parse_deck(input: &str) -> Result<ParsedDeck, String> {
    let (deck_part, challenge, move_limit) = match input.find('$') {
        None => (input, Challenge::FullSolve, 0),
        Some(first) => {
            let rest = &input[first + 1..];
            let second = rest
                .find('$')
                .ok_or_else(|| "challenge suffix needs two '$' separators".to_string())?;
            let challenge = Challenge::parse(&rest[..second])?;
            let limit_str = &rest[second + 1..];
            let move_limit = limit_str
                .parse::<u32>()
                .map_err(|e| format!("invalid move limit '{limit_str}': {e}"))?;
            (&input[..first], challenge, move_limit)
        }
    };

    if !deck_part.is_ascii() {
        return Err("deck configuration must be ASCII".to_string());
    }
    if deck_part.len() < 16 {
        return Err(format!(
            "deck configuration too short ({} chars, need at least 16)",
            deck_part.len()
        ));
    }

    let mut reserve = Vec::new();
    for slot in 0..RESERVE_SLOTS {
        let code = &deck_part[slot * 2..slot * 2 + 2];
        if code != "00" {
            reserve.push(Card::from_code(code)?);
        }
    }

    let mut foundations = [0u8; 4];
    for (slot, &suit) in FOUNDATION_ORDER.iter().enumerate() {
        let code = &deck_part[8 + slot * 2..10 + slot * 2];
        if code != "00" {
            let top = Card::from_code(code)?;
            if top.suit() != suit {
                return Err(format!(
                    "foundation slot {} expects suit '{}', got {top}",
                    slot + 1,
                    suit.code_char()
                ));
            }
            foundations[suit.index()] = top.rank() + 1;
        }
    }

    let tableaus = parse_tableaus(&deck_part[16..])?;
    let layout = Layout::from_parts(tableaus, reserve, foundations)?;

    Ok(ParsedDeck {
        layout,
        challenge,
        move_limit,
    })
}

/// Card codes never contain `i` or `v`, so those characters always open a
/// column marker. Markers are matched against the expected sequence
/// directly: empty columns put markers back to back (`...ivvvi...`) and a
/// greedy character-class scan would glue them together.
fn parse_tableaus(section: &str) -> Result<[Vec<Card>; TABLEAU_COUNT], String> {
    let mut columns: [Vec<Card>; TABLEAU_COUNT] = std::array::from_fn(|_| Vec::new());
    let bytes = section.as_bytes();
    let mut pos = 0;
    let mut expected = 0usize;
    let mut current: Option<usize> = None;

    while pos < bytes.len() {
        if bytes[pos] == b'i' || bytes[pos] == b'v' {
            let Some(marker) = ROMAN.get(expected) else {
                return Err(format!(
                    "unexpected marker text after column {TABLEAU_COUNT}: '{}'",
                    &section[pos..]
                ));
            };
            if !section[pos..].starts_with(marker) {
                return Err(format!(
                    "malformed tableau marker at '{}' (expected '{marker}')",
                    &section[pos..section.len().min(pos + 4)]
                ));
            }
            pos += marker.len();
            current = Some(expected);
            expected += 1;
        } else {
            let col = current.ok_or_else(|| "tableau cards before first column marker".to_string())?;
            if pos + 2 > bytes.len() {
                return Err("truncated card code in tableau section".to_string());
            }
            columns[col].push(Card::from_code(&section[pos..pos + 2])?);
            pos += 2;
        }
    }

    if expected != TABLEAU_COUNT {
        return Err(format!(
            "deck configuration has {expected} tableau columns, need {TABLEAU_COUNT}"
        ));
    }
    Ok(columns)
}

/// Canonical encoded form of a layout, the inverse of `parse_deck` for the
/// deck section. Used as the identity line of solution files.
pub fn format_deck(layout: &Layout) -> String {
    let mut out = String::with_capacity(128);
    for slot in 0..RESERVE_SLOTS {
        match layout.reserve().get(slot) {
            Some(card) => out.push_str(&card.code_string()),
            None => out.push_str("00"),
        }
    }
    for suit in FOUNDATION_ORDER {
        match layout.foundation_top(suit) {
            Some(card) => out.push_str(&card.code_string()),
            None => out.push_str("00"),
        }
    }
    for (col, marker) in ROMAN.iter().enumerate() {
        out.push_str(marker);
        for card in layout.tableau(col) {
            out.push_str(&card.code_string());
        }
    }
    out
}

/// Deal a reproducible pseudo-random deck: the full pack shuffled by a
/// seeded PCG generator and dealt round-robin into the eight columns.
pub fn deal(seed: u64) -> Layout {
    let mut pack: Vec<Card> = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in 0..RANK_COUNT {
            pack.push(Card::new(suit, rank));
        }
    }
    let mut rng = Pcg64::seed_from_u64(seed);
    pack.shuffle(&mut rng);

    let mut columns: [Vec<Card>; TABLEAU_COUNT] = std::array::from_fn(|_| Vec::new());
    for (i, card) in pack.into_iter().enumerate() {
        columns[i % TABLEAU_COUNT].push(card);
    }
    Layout::from_parts(columns, Vec::new(), [0; 4]).expect("a full dealt pack is conserved")
}
