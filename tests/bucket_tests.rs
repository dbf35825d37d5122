use freecellar::deal;
use freecellar::solver::{Bucket, Pool, TransTable};
use freecellar::Node;

fn sample_nodes(count: usize) -> Vec<Node> {
    (0..count).map(|i| Node::root(deal(100 + i as u64))).collect()
}

#[test]
fn pool_recycles_released_slots() {
    let mut pool = Pool::new();
    let nodes = sample_nodes(3);
    let fingerprints: Vec<Vec<u8>> = nodes.iter().map(|n| n.fingerprint().to_vec()).collect();

    let ids: Vec<_> = nodes.into_iter().map(|n| pool.insert(n)).collect();
    assert_eq!(pool.len(), 3);
    assert_eq!(pool.get(ids[1]).fingerprint(), &fingerprints[1][..]);

    let removed = pool.remove(ids[1]);
    assert_eq!(removed.fingerprint(), &fingerprints[1][..]);
    assert_eq!(pool.len(), 2);

    // Freed slot is reused for the next insert.
    let replacement = Node::root(deal(999));
    let new_id = pool.insert(replacement);
    assert_eq!(new_id, ids[1]);
    assert_eq!(pool.len(), 3);
}

#[test]
fn bucket_orders_by_bin_and_tracks_floor() {
    let mut pool = Pool::new();
    let ids: Vec<_> = sample_nodes(4).into_iter().map(|n| pool.insert(n)).collect();

    let mut bucket = Bucket::new(16);
    assert_eq!(bucket.lowerbound(), 0);

    bucket.add(ids[0], 5);
    bucket.add(ids[1], 3);
    bucket.add(ids[2], 9);
    bucket.add(ids[3], 9);

    assert_eq!(bucket.len(), 4);
    assert_eq!(bucket.max(), 9);
    assert_eq!(bucket.lowerbound(), 3);

    // Worst bin first; same-bin entries come back LIFO.
    assert_eq!(bucket.remove_max(), Some(ids[3]));
    assert_eq!(bucket.max(), 9);
    assert_eq!(bucket.remove_max(), Some(ids[2]));
    assert_eq!(bucket.max(), 5);

    // Iteration is bin-ascending, insertion-ordered.
    let mut seen = Vec::new();
    bucket.iterate(|id| seen.push(id));
    assert_eq!(seen, vec![ids[1], ids[0]]);

    // The floor survives a sweep; it is a property of the level.
    let drained = bucket.take_all();
    assert_eq!(drained.len(), 2);
    assert!(bucket.is_empty());
    assert_eq!(bucket.lowerbound(), 3);
}

#[test]
fn table_confirms_fingerprint_not_just_hash() {
    let mut pool = Pool::new();
    let node = Node::root(deal(5));
    let (hash, fingerprint) = (node.hash(), node.fingerprint().to_vec());
    let id = pool.insert(node);

    let mut table = TransTable::with_capacity(64);
    assert!(table.find(&pool, hash, &fingerprint).is_none());

    table.insert(hash, id);
    assert_eq!(table.len(), 1);
    assert_eq!(table.find(&pool, hash, &fingerprint), Some(id));

    // Same slot probe, different state: no match.
    let other = Node::root(deal(6));
    assert!(table.find(&pool, other.hash(), other.fingerprint()).is_none());

    table.remove(hash, id);
    assert!(table.find(&pool, hash, &fingerprint).is_none());
    assert!(table.is_empty());
}

#[test]
fn table_survives_tombstone_churn() {
    let mut pool = Pool::new();
    let mut table = TransTable::with_capacity(8);

    let nodes = sample_nodes(6);
    let mut ids = Vec::new();
    for node in nodes {
        let (hash, fp) = (node.hash(), node.fingerprint().to_vec());
        let id = pool.insert(node);
        table.insert(hash, id);
        ids.push((hash, fp, id));
    }
    for (hash, _, id) in &ids[..3] {
        table.remove(*hash, *id);
    }
    for (hash, fp, id) in &ids[3..] {
        assert_eq!(table.find(&pool, *hash, fp), Some(*id));
    }
    for (hash, fp, _) in &ids[..3] {
        assert!(table.find(&pool, *hash, fp).is_none());
    }
}

#[test]
fn bucket_members_stay_findable_in_table() {
    // The search invariant: every node sitting in a bucket is also in the
    // transposition table.
    let mut pool = Pool::new();
    let mut table = TransTable::with_capacity(32);
    let mut bucket = Bucket::new(64);

    for node in sample_nodes(5) {
        let (hash, bin) = (node.hash(), node.bin());
        let id = pool.insert(node);
        bucket.add(id, bin);
        table.insert(hash, id);
    }

    bucket.iterate(|id| {
        let node = pool.get(id);
        assert_eq!(
            table.find(&pool, node.hash(), node.fingerprint()),
            Some(id)
        );
    });
}
