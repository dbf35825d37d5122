use freecellar::solver::Challenge;
use freecellar::{deal, format_deck, parse_deck, Card, Layout};

fn card(code: &str) -> Card {
    Card::from_code(code).expect("card code")
}

#[test]
fn format_then_parse_round_trips() {
    for seed in [1, 2, 42, 1000] {
        let layout = deal(seed);
        let encoded = format_deck(&layout);
        let parsed = parse_deck(&encoded).expect("round trip parse");
        assert_eq!(format_deck(&parsed.layout), encoded, "seed {seed}");
        assert_eq!(parsed.layout.fingerprint(), layout.fingerprint());
        assert_eq!(parsed.challenge, Challenge::FullSolve);
        assert_eq!(parsed.move_limit, 0);
    }
}

#[test]
fn deal_is_deterministic_and_conserved() {
    let a = deal(7);
    let b = deal(7);
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), deal(8).fingerprint());

    // Round-robin deal: four columns of seven, four of six.
    for col in 0..4 {
        assert_eq!(a.tableau(col).len(), 7);
    }
    for col in 4..8 {
        assert_eq!(a.tableau(col).len(), 6);
    }
    assert!(a.reserve().is_empty());
    assert_eq!(a.cards_unsorted(), 52);
}

#[test]
fn parses_reserve_foundations_and_empty_columns() {
    // KS on the reserve, everything else sorted: columns are all empty,
    // markers sit back to back.
    let columns: [Vec<Card>; 8] = std::array::from_fn(|_| Vec::new());
    let layout =
        Layout::from_parts(columns, vec![card("ks")], [13, 13, 13, 12]).expect("layout");
    let encoded = format_deck(&layout);
    assert_eq!(encoded, "ks000000khkckdqsiiiiiiivvviviiviii");

    let parsed = parse_deck(&encoded).expect("parse");
    assert_eq!(parsed.layout.fingerprint(), layout.fingerprint());
}

#[test]
fn parses_challenge_suffixes() {
    let deck = format_deck(&deal(5));

    let parsed = parse_deck(&format!("{deck}$kd$40")).expect("card challenge");
    assert_eq!(parsed.challenge, Challenge::Card(card("kd")));
    assert_eq!(parsed.move_limit, 40);

    let parsed = parse_deck(&format!("{deck}$k4$0")).expect("count challenge");
    assert_eq!(parsed.challenge, Challenge::Count { rank: 12, need: 4 });
    assert_eq!(parsed.move_limit, 0);

    let parsed = parse_deck(&format!("{deck}$00$0")).expect("full solve");
    assert_eq!(parsed.challenge, Challenge::FullSolve);
}

#[test]
fn rejects_malformed_input() {
    assert!(parse_deck("garbage").is_err());
    assert!(parse_deck("").is_err());

    let deck = format_deck(&deal(5));
    // Missing second separator.
    assert!(parse_deck(&format!("{deck}$kd")).is_err());
    // Bad challenge code.
    assert!(parse_deck(&format!("{deck}$zz$5")).is_err());
    // Bad move limit.
    assert!(parse_deck(&format!("{deck}$kd$many")).is_err());
    // Truncated card code in a tableau column.
    assert!(parse_deck(&deck[..deck.len() - 1]).is_err());
}

#[test]
fn rejects_conservation_violations() {
    let deck = format_deck(&deal(5));
    // Overwrite the last card code with a copy of the first tableau card
    // (byte 16 is the `i` marker): one card duplicated, one missing.
    let duplicate = format!("{}{}", &deck[..deck.len() - 2], &deck[17..19]);
    let err = parse_deck(&duplicate).unwrap_err();
    assert!(
        err.contains("duplicate") || err.contains("missing"),
        "unexpected error: {err}"
    );
}

#[test]
fn rejects_wrong_foundation_suit() {
    // Foundation slot one is hearts; hand it a club.
    let columns: [Vec<Card>; 8] = std::array::from_fn(|_| Vec::new());
    let layout =
        Layout::from_parts(columns, vec![card("ks")], [13, 13, 13, 12]).expect("layout");
    let encoded = format_deck(&layout).replace("khkckdqs", "kckhkdqs");
    let err = parse_deck(&encoded).unwrap_err();
    assert!(err.contains("suit"), "unexpected error: {err}");
}
