use crate::cards::Card;
use crate::layout::{Layout, TABLEAU_COUNT};

/// A legal Freecell move. Tableau columns are 0..=7, reserve slots index the
/// current reserve vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    TableauToFoundation { from: u8 },
    ReserveToFoundation { slot: u8 },
    TableauToTableau { from: u8, to: u8, count: u8 },
    TableauToReserve { from: u8 },
    ReserveToTableau { slot: u8, to: u8 },
}

impl Move {
    /// Canonical textual form, evaluated against the layout the move is
    /// applied to: `<card>[#k]_<src>_<dst>` where src is a column digit or
    /// `R`, dst is `F`, `R` or `~n~`, and `card` is the bottom card of a
    /// moved run (`5h#3_2_~4~` moves three cards bottomed on the 5 of
    /// hearts from column 2 to column 4).
    pub fn encode(&self, before: &Layout) -> String {
        match *self {
            Move::TableauToFoundation { from } => {
                let t = before.tableau(from as usize);
                format!("{}_{}_F", t[t.len() - 1].code_string(), from)
            }
            Move::ReserveToFoundation { slot } => {
                format!("{}_R_F", before.reserve()[slot as usize].code_string())
            }
            Move::TableauToReserve { from } => {
                let t = before.tableau(from as usize);
                format!("{}_{}_R", t[t.len() - 1].code_string(), from)
            }
            Move::ReserveToTableau { slot, to } => {
                format!("{}_R_~{}~", before.reserve()[slot as usize].code_string(), to)
            }
            Move::TableauToTableau { from, to, count } => {
                let t = before.tableau(from as usize);
                let bottom = t[t.len() - count as usize];
                if count > 1 {
                    format!("{}#{}_{}_~{}~", bottom.code_string(), count, from, to)
                } else {
                    format!("{}_{}_~{}~", bottom.code_string(), from, to)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    Tableau(u8),
    Reserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Foundation,
    Reserve,
    Tableau(u8),
}

/// One decoded step of an encoded solution string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedStep {
    pub card: Card,
    pub count: u8,
    pub src: Place,
    pub dst: Target,
}

/// Decode a concatenated solution string into steps. Tolerates the `#k`
/// stack-count insert and carriage returns from files written on Windows.
pub fn decode_solution(encoded: &str) -> Result<Vec<DecodedStep>, String> {
    let s: Vec<char> = encoded.trim_end_matches(['\r', '\n']).chars().collect();
    let mut steps = Vec::new();
    let mut pos = 0;

    while pos < s.len() {
        if pos + 2 > s.len() {
            return Err(format!("truncated card code at offset {pos}"));
        }
        let card = Card::from_code(&s[pos..pos + 2].iter().collect::<String>())?;
        pos += 2;

        let mut count: u8 = 1;
        if pos < s.len() && s[pos] == '#' {
            pos += 1;
            let start = pos;
            while pos < s.len() && s[pos].is_ascii_digit() {
                pos += 1;
            }
            let digits: String = s[start..pos].iter().collect();
            count = digits
                .parse::<u8>()
                .map_err(|e| format!("invalid stack count '{digits}': {e}"))?;
            if count == 0 {
                return Err("stack count must be positive".to_string());
            }
        }

        if pos < s.len() && s[pos] == '_' {
            pos += 1;
        }
        let src = match s.get(pos).copied() {
            Some('R') => Place::Reserve,
            Some(c @ '0'..='7') => Place::Tableau(c as u8 - b'0'),
            other => return Err(format!("invalid move source {other:?} at offset {pos}")),
        };
        pos += 1;

        if pos < s.len() && s[pos] == '_' {
            pos += 1;
        }
        let dst = match s.get(pos).copied() {
            Some('F') => {
                pos += 1;
                Target::Foundation
            }
            Some('R') => {
                pos += 1;
                Target::Reserve
            }
            Some('~') => {
                let close = s[pos + 1..]
                    .iter()
                    .position(|&c| c == '~')
                    .ok_or_else(|| format!("unterminated tableau destination at offset {pos}"))?;
                let digits: String = s[pos + 1..pos + 1 + close].iter().collect();
                let col = digits
                    .parse::<u8>()
                    .map_err(|e| format!("invalid destination column '{digits}': {e}"))?;
                pos += close + 2;
                Target::Tableau(col)
            }
            other => return Err(format!("invalid move destination {other:?} at offset {pos}")),
        };

        steps.push(DecodedStep { card, count, src, dst });
    }

    Ok(steps)
}

/// Resolve a decoded step against a layout and apply it. Validates that the
/// named card really sits where the step claims; external solution strings
/// are untrusted input.
pub fn apply_step(layout: &Layout, step: &DecodedStep) -> Result<Layout, String> {
    let mv = resolve_step(layout, step)?;
    Ok(layout.apply(mv))
}

fn resolve_step(layout: &Layout, step: &DecodedStep) -> Result<Move, String> {
    if step.count > 1 && !matches!(step.dst, Target::Tableau(_)) {
        return Err("stack moves can only target a tableau column".to_string());
    }
    let mv = match (step.src, step.dst) {
        (Place::Reserve, dst) => {
            let slot = layout
                .reserve()
                .iter()
                .position(|&c| c == step.card)
                .ok_or_else(|| format!("card {} is not in the reserve", step.card))?
                as u8;
            match dst {
                Target::Foundation => Move::ReserveToFoundation { slot },
                Target::Tableau(to) => Move::ReserveToTableau { slot, to },
                Target::Reserve => return Err("reserve-to-reserve move is meaningless".to_string()),
            }
        }
        (Place::Tableau(from), dst) => {
            if from as usize >= TABLEAU_COUNT {
                return Err(format!("tableau column {from} out of range"));
            }
            let column = layout.tableau(from as usize);
            let count = step.count as usize;
            if column.len() < count {
                return Err(format!(
                    "column {from} holds {} cards, step moves {count}",
                    column.len()
                ));
            }
            if column[column.len() - count] != step.card {
                return Err(format!(
                    "card {} is not at depth {count} of column {from}",
                    step.card
                ));
            }
            match dst {
                Target::Foundation => Move::TableauToFoundation { from },
                Target::Reserve => Move::TableauToReserve { from },
                Target::Tableau(to) => Move::TableauToTableau {
                    from,
                    to,
                    count: step.count,
                },
            }
        }
    };
    if !layout.is_legal(mv) {
        return Err(format!("decoded step {step:?} is not legal in this position"));
    }
    Ok(mv)
}
