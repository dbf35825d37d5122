use crate::cards::{Card, Suit, RANK_COUNT};
use crate::moves::Move;

pub const TABLEAU_COUNT: usize = 8;
pub const RESERVE_SLOTS: usize = 4;
pub const DECK_SIZE: usize = 52;

/// A Freecell position: eight tableau columns (bottom to top), up to four
/// reserve cards, and one foundation height per suit (height h means cards
/// ace..h-1 of that suit have been placed).
///
/// All operations either read the layout or return a fresh one; shared
/// state is never mutated in place.
#[derive(Debug, Clone)]
pub struct Layout {
    tableaus: [Vec<Card>; TABLEAU_COUNT],
    reserve: Vec<Card>,
    foundations: [u8; 4],
}

#[inline]
fn stacks_on(card: Card, onto: Card) -> bool {
    onto.rank() == card.rank() + 1 && onto.color() != card.color()
}

impl Layout {
    /// Build a layout from its parts, validating full 52-card conservation.
    pub fn from_parts(
        tableaus: [Vec<Card>; TABLEAU_COUNT],
        reserve: Vec<Card>,
        foundations: [u8; 4],
    ) -> Result<Layout, String> {
        if reserve.len() > RESERVE_SLOTS {
            return Err(format!(
                "reserve holds {} cards (capacity {RESERVE_SLOTS})",
                reserve.len()
            ));
        }
        for (i, &h) in foundations.iter().enumerate() {
            if h > RANK_COUNT {
                return Err(format!(
                    "foundation {} height {h} exceeds {RANK_COUNT}",
                    Suit::ALL[i].code_char()
                ));
            }
        }

        let mut seen = [false; DECK_SIZE];
        let mut mark = |card: Card| -> Result<(), String> {
            let idx = card.deck_index();
            if seen[idx] {
                return Err(format!("duplicate card {card}"));
            }
            seen[idx] = true;
            Ok(())
        };
        for suit in Suit::ALL {
            for rank in 0..foundations[suit.index()] {
                mark(Card::new(suit, rank))?;
            }
        }
        for &card in &reserve {
            mark(card)?;
        }
        for column in &tableaus {
            for &card in column {
                mark(card)?;
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            let suit = Suit::ALL[missing / RANK_COUNT as usize];
            let card = Card::new(suit, (missing % RANK_COUNT as usize) as u8);
            return Err(format!("missing card {card}"));
        }

        Ok(Layout {
            tableaus,
            reserve,
            foundations,
        })
    }

    #[inline]
    pub fn tableau(&self, col: usize) -> &[Card] {
        &self.tableaus[col]
    }

    #[inline]
    pub fn reserve(&self) -> &[Card] {
        &self.reserve
    }

    #[inline]
    pub fn foundations(&self) -> [u8; 4] {
        self.foundations
    }

    #[inline]
    pub fn foundation_height(&self, suit: Suit) -> u8 {
        self.foundations[suit.index()]
    }

    #[inline]
    pub fn foundation_top(&self, suit: Suit) -> Option<Card> {
        let h = self.foundations[suit.index()];
        (h > 0).then(|| Card::new(suit, h - 1))
    }

    #[inline]
    pub fn cards_unsorted(&self) -> u32 {
        DECK_SIZE as u32 - self.foundations.iter().map(|&h| u32::from(h)).sum::<u32>()
    }

    #[inline]
    pub fn free_reserves(&self) -> usize {
        RESERVE_SLOTS - self.reserve.len()
    }

    #[inline]
    pub fn empty_tableaus(&self) -> usize {
        self.tableaus.iter().filter(|t| t.is_empty()).count()
    }

    /// Length of the maximal descending alternating-color run on top of a
    /// column. Zero for an empty column.
    pub fn run_length(&self, col: usize) -> usize {
        let t = &self.tableaus[col];
        let n = t.len();
        if n == 0 {
            return 0;
        }
        let mut k = 1;
        while k < n && stacks_on(t[n - k], t[n - k - 1]) {
            k += 1;
        }
        k
    }

    /// Supermove capacity toward `dest`:
    /// `(1 + free_reserves) * 2^(empty columns excluding the destination)`.
    pub fn max_run(&self, dest: Option<usize>) -> usize {
        let mut empties = self.empty_tableaus();
        if let Some(d) = dest {
            if self.tableaus[d].is_empty() {
                empties -= 1;
            }
        }
        (1 + self.free_reserves()) << empties
    }

    /// Safe auto-play rule: the card is next for its foundation and both
    /// opposite-color foundations are at height >= card.rank.
    pub fn can_auto_play(&self, card: Card) -> bool {
        if self.foundations[card.suit().index()] != card.rank() {
            return false;
        }
        let rank = card.rank();
        let (a, b) = match card.color() {
            crate::cards::Color::Black => (Suit::Diamonds, Suit::Hearts),
            crate::cards::Color::Red => (Suit::Clubs, Suit::Spades),
        };
        self.foundations[a.index()] >= rank && self.foundations[b.index()] >= rank
    }

    /// All legal moves in canonical order. The order is load-bearing: the
    /// compressed move trail stores indices into this list, so two equal
    /// layouts must always enumerate identically.
    ///
    /// Kinds in fixed order: tableau->foundation (col 0..7),
    /// reserve->foundation (slot 0..3), tableau->tableau ((from, to) pairs,
    /// longest legal run first), tableau->reserve (col 0..7),
    /// reserve->tableau (slot 0..3 x dest 0..7).
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(16);

        for from in 0..TABLEAU_COUNT {
            if let Some(&card) = self.tableaus[from].last() {
                if self.foundations[card.suit().index()] == card.rank() {
                    moves.push(Move::TableauToFoundation { from: from as u8 });
                }
            }
        }

        for (slot, &card) in self.reserve.iter().enumerate() {
            if self.foundations[card.suit().index()] == card.rank() {
                moves.push(Move::ReserveToFoundation { slot: slot as u8 });
            }
        }

        for from in 0..TABLEAU_COUNT {
            let run = self.run_length(from);
            if run == 0 {
                continue;
            }
            let src = &self.tableaus[from];
            for to in 0..TABLEAU_COUNT {
                if to == from {
                    continue;
                }
                let cap = run.min(self.max_run(Some(to)));
                let dest_top = self.tableaus[to].last().copied();
                for count in (1..=cap).rev() {
                    let bottom = src[src.len() - count];
                    let fits = match dest_top {
                        None => true,
                        Some(top) => stacks_on(bottom, top),
                    };
                    if fits {
                        moves.push(Move::TableauToTableau {
                            from: from as u8,
                            to: to as u8,
                            count: count as u8,
                        });
                    }
                }
            }
        }

        if self.free_reserves() > 0 {
            for from in 0..TABLEAU_COUNT {
                if !self.tableaus[from].is_empty() {
                    moves.push(Move::TableauToReserve { from: from as u8 });
                }
            }
        }

        for (slot, &card) in self.reserve.iter().enumerate() {
            for to in 0..TABLEAU_COUNT {
                let fits = match self.tableaus[to].last() {
                    None => true,
                    Some(&top) => stacks_on(card, top),
                };
                if fits {
                    moves.push(Move::ReserveToTableau {
                        slot: slot as u8,
                        to: to as u8,
                    });
                }
            }
        }

        moves
    }

    /// Legality predicate for a single move, matching `legal_moves()`.
    pub fn is_legal(&self, mv: Move) -> bool {
        match mv {
            Move::TableauToFoundation { from } => {
                let from = from as usize;
                from < TABLEAU_COUNT
                    && self.tableaus[from]
                        .last()
                        .is_some_and(|c| self.foundations[c.suit().index()] == c.rank())
            }
            Move::ReserveToFoundation { slot } => self
                .reserve
                .get(slot as usize)
                .is_some_and(|c| self.foundations[c.suit().index()] == c.rank()),
            Move::TableauToReserve { from } => {
                let from = from as usize;
                from < TABLEAU_COUNT
                    && !self.tableaus[from].is_empty()
                    && self.free_reserves() > 0
            }
            Move::ReserveToTableau { slot, to } => {
                let to = to as usize;
                if to >= TABLEAU_COUNT {
                    return false;
                }
                self.reserve.get(slot as usize).is_some_and(|&card| {
                    match self.tableaus[to].last() {
                        None => true,
                        Some(&top) => stacks_on(card, top),
                    }
                })
            }
            Move::TableauToTableau { from, to, count } => {
                let (from, to, count) = (from as usize, to as usize, count as usize);
                if from >= TABLEAU_COUNT || to >= TABLEAU_COUNT || from == to || count == 0 {
                    return false;
                }
                if count > self.run_length(from) || count > self.max_run(Some(to)) {
                    return false;
                }
                let src = &self.tableaus[from];
                let bottom = src[src.len() - count];
                match self.tableaus[to].last() {
                    None => true,
                    Some(&top) => stacks_on(bottom, top),
                }
            }
        }
    }

    /// Apply a move drawn from `legal_moves()`, returning the successor.
    ///
    /// Infallible by contract: children must stay 1:1 with the legal-move
    /// list for trail replay, so illegal input is a programming error.
    pub fn apply(&self, mv: Move) -> Layout {
        debug_assert!(self.is_legal(mv), "illegal move {mv:?}");
        let mut next = self.clone();
        match mv {
            Move::TableauToFoundation { from } => {
                if let Some(card) = next.tableaus[from as usize].pop() {
                    next.foundations[card.suit().index()] += 1;
                }
            }
            Move::ReserveToFoundation { slot } => {
                let card = next.reserve.remove(slot as usize);
                next.foundations[card.suit().index()] += 1;
            }
            Move::TableauToReserve { from } => {
                if let Some(card) = next.tableaus[from as usize].pop() {
                    next.reserve.push(card);
                }
            }
            Move::ReserveToTableau { slot, to } => {
                let card = next.reserve.remove(slot as usize);
                next.tableaus[to as usize].push(card);
            }
            Move::TableauToTableau { from, to, count } => {
                let split = next.tableaus[from as usize].len() - count as usize;
                let run = next.tableaus[from as usize].split_off(split);
                next.tableaus[to as usize].extend(run);
            }
        }
        next
    }

    /// Canonical byte serialization. Two layouts are equivalent iff their
    /// fingerprints match: foundation tops in suit order (`00` when empty),
    /// reserve codes sorted, then each tableau prefixed with `|`.
    pub fn fingerprint(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 * DECK_SIZE + TABLEAU_COUNT + 8);
        for suit in Suit::ALL {
            match self.foundation_top(suit) {
                Some(card) => out.extend_from_slice(&card.code()),
                None => out.extend_from_slice(b"00"),
            }
        }
        let mut reserve_codes: Vec<[u8; 2]> = self.reserve.iter().map(|c| c.code()).collect();
        reserve_codes.sort_unstable();
        for code in reserve_codes {
            out.extend_from_slice(&code);
        }
        for column in &self.tableaus {
            out.push(b'|');
            for card in column {
                out.extend_from_slice(&card.code());
            }
        }
        out
    }
}
