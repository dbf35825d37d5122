use freecellar::{deal, fingerprint_hash, replay_trail, Card, Layout, MoveTrail, Node};

#[test]
fn trail_round_trips_mixed_widths() {
    // (index, branching): branching 1 costs zero bits.
    let steps = [
        (0usize, 1usize),
        (1, 2),
        (2, 3),
        (0, 1),
        (4, 5),
        (31, 32),
        (63, 100),
        (7, 9),
        (0, 2),
    ];
    let mut trail = MoveTrail::default();
    for &(index, branching) in &steps {
        trail.push(index, branching);
    }
    let mut reader = trail.reader();
    for &(index, branching) in &steps {
        assert_eq!(reader.read(branching), index);
    }
}

#[test]
fn trail_width_is_ceil_log2() {
    let widths = [(1usize, 0u32), (2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (100, 7)];
    for &(branching, width) in &widths {
        let mut trail = MoveTrail::default();
        trail.push(branching - 1, branching);
        assert_eq!(trail.bit_len(), width, "branching {branching}");
    }
}

#[test]
fn replay_reconstructs_walked_state() {
    let origin = deal(3);
    let mut node = Node::root(origin.clone());

    for step in 0..12usize {
        let mut children = node.expand();
        if children.is_empty() {
            break;
        }
        let pick = (step * 7 + 3) % children.len();
        node = children.swap_remove(pick);
    }
    // A fresh deal always offers tableau-to-reserve while slots are free,
    // so the walk cannot stall before depth four.
    assert!(node.g() >= 4);

    let replay = replay_trail(&origin, node.trail(), node.g()).expect("replay");
    assert_eq!(replay.moves.len(), node.g() as usize);
    assert_eq!(replay.layout.fingerprint(), node.layout().fingerprint());
    assert_eq!(
        fingerprint_hash(&replay.layout.fingerprint()),
        node.hash(),
        "hash must follow the fingerprint"
    );
}

#[test]
fn replay_rejects_out_of_range_index() {
    // One king loose: nine legal moves at the root, so a stored index of
    // fifteen can never resolve.
    let mut columns: [Vec<Card>; 8] = std::array::from_fn(|_| Vec::new());
    columns[0].push(Card::from_code("kh").expect("card"));
    let layout = Layout::from_parts(columns, Vec::new(), [13, 13, 12, 13]).expect("layout");
    assert_eq!(layout.legal_moves().len(), 9);

    let mut trail = MoveTrail::default();
    trail.push(15, 16);
    let err = replay_trail(&layout, &trail, 1).unwrap_err();
    assert!(err.contains("replay mismatch"), "unexpected error: {err}");
}

#[test]
fn equal_fingerprints_hash_equally() {
    let a = deal(9);
    let b = deal(9);
    assert_eq!(
        fingerprint_hash(&a.fingerprint()),
        fingerprint_hash(&b.fingerprint())
    );
    let c = deal(10);
    assert_ne!(
        fingerprint_hash(&a.fingerprint()),
        fingerprint_hash(&c.fingerprint())
    );
}
