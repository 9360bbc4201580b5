use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::{seq::SliceRandom, thread_rng, Rng};
use vis_btree::{BTree, BTreeError, BTreeParams, DefaultKeyComparator, FnComparator, Node};

fn verified_tree(order: usize) -> BTree<i32> {
    let params = BTreeParams::new(order).unwrap().with_self_verify(true);
    BTree::with_params(params, DefaultKeyComparator::new())
}

/// Every non-root node within [min_keys, max_keys].
fn assert_occupancy(tree: &BTree<i32>) {
    fn walk(node: &Node<i32>, params: &BTreeParams, is_root: bool) {
        if !is_root {
            assert!(node.slotuse() >= params.min_keys(), "{:?}", node.keys());
        }
        assert!(node.slotuse() <= params.max_keys(), "{:?}", node.keys());
        for child in node.children() {
            walk(child, params, false);
        }
    }
    walk(tree.root(), tree.params(), true);
}

#[test]
fn insert_sequence_splits_root() {
    let mut tree = verified_tree(3);
    for k in [5, 3, 8, 1, 4, 7, 9] {
        assert!(tree.insert(k));
    }
    assert_eq!(tree.traverse(), vec![1, 3, 4, 5, 7, 8, 9]);
    assert!(tree.root().slotuse() <= 2);
    assert!(tree.height() > 1);
    tree.verify().unwrap();
}

#[test]
fn remove_keeps_occupancy() {
    let mut tree = verified_tree(3);
    for k in [5, 3, 8, 1, 4, 7, 9] {
        tree.insert(k);
    }
    assert!(tree.remove(&1).unwrap());
    assert_eq!(tree.traverse(), vec![3, 4, 5, 7, 8, 9]);
    assert_occupancy(&tree);
    tree.verify().unwrap();
}

#[test]
fn empty_tree_is_inert() {
    let mut tree = verified_tree(3);
    assert!(!tree.search(&10));
    assert!(!tree.remove(&10).unwrap());
    assert!(tree.traverse().is_empty());
    assert!(tree.is_empty());
}

#[test]
fn extremes_follow_comparator() {
    let mut tree = verified_tree(4);
    for k in [40, -3, 17, 99, 0] {
        tree.insert(k);
    }
    assert_eq!(tree.minimum().unwrap(), &-3);
    assert_eq!(tree.maximum().unwrap(), &99);

    let empty = verified_tree(4);
    assert!(matches!(empty.minimum(), Err(BTreeError::EmptyTree)));
}

#[test]
fn removing_everything_empties_the_tree() {
    for order in 3..=8 {
        let mut tree = verified_tree(order);
        for k in 0..200 {
            tree.insert(k);
        }
        for k in 0..200 {
            assert!(tree.remove(&k).unwrap(), "order {} key {}", order, k);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert!(matches!(tree.maximum(), Err(BTreeError::EmptyTree)));
    }
}

#[test]
fn descending_removal_across_orders() {
    for order in 3..=7 {
        let mut tree = verified_tree(order);
        for k in 0..150 {
            tree.insert(k);
        }
        for k in (0..150).rev() {
            tree.remove(&k).unwrap();
            assert_occupancy(&tree);
        }
        assert!(tree.is_empty());
    }
}

#[test]
fn iter_matches_traverse() {
    let mut tree = verified_tree(5);
    for k in (0..300).rev() {
        tree.insert(k * 11 % 301);
    }
    let borrowed: Vec<i32> = tree.iter().copied().collect();
    assert_eq!(borrowed, tree.traverse());
    assert_eq!((&tree).into_iter().count(), tree.len());
}

#[test]
fn stats_track_shape() {
    let mut tree = verified_tree(3);
    for k in 0..64 {
        tree.insert(k);
    }
    let stats = tree.stats();
    assert_eq!(stats.size, 64);
    assert_eq!(stats.nodes(), stats.leaves + stats.inner_nodes);
    let fill = stats.avgfill(tree.params());
    assert!(fill > 0.0 && fill <= 1.0);
    assert_eq!(stats.height, tree.height());
}

#[test]
fn string_keys_with_closure_comparator() {
    let by_len = FnComparator::new(|a: &String, b: &String| {
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    });
    let mut tree = BTree::with_comparator(4, by_len).unwrap();
    for word in ["pear", "fig", "banana", "kiwi", "apple", "date"] {
        tree.insert(word.to_string());
    }
    assert_eq!(
        tree.traverse(),
        vec!["fig", "date", "kiwi", "pear", "apple", "banana"]
    );
    assert!(tree.remove(&"kiwi".to_string()).unwrap());
    assert!(!tree.search(&"kiwi".to_string()));
    tree.verify().unwrap();
}

#[test]
fn random_op_test() {
    let mut rng = thread_rng();

    for order in [3, 4, 5, 6, 9, 16] {
        let mut tree = verified_tree(order);
        let n = 2000;

        let mut keys = BTreeSet::new();
        while keys.len() < n {
            keys.insert(rng.gen_range(0..50_000));
        }
        let mut keys: Vec<_> = keys.into_iter().collect();
        keys.shuffle(&mut rng);

        for &key in keys.iter() {
            assert!(tree.insert(key));
        }
        for &key in keys.iter() {
            assert!(tree.search(&key));
        }

        keys.shuffle(&mut rng);
        let removed_keys = keys.split_off(n / 2);
        for &key in removed_keys.iter() {
            assert!(tree.remove(&key).unwrap());
        }

        for &key in removed_keys.iter() {
            assert!(!tree.search(&key));
        }
        for &key in keys.iter() {
            assert!(tree.search(&key));
        }

        let mut expected = keys.clone();
        expected.sort();
        assert_eq!(tree.traverse(), expected);
        assert_occupancy(&tree);
        tree.verify().unwrap();
    }
}

#[test]
fn interleaved_random_ops_match_model() {
    let mut rng = thread_rng();
    let mut tree = verified_tree(3);
    let mut model = BTreeSet::new();

    for _ in 0..5000 {
        let key = rng.gen_range(0..300);
        if rng.gen_bool(0.55) {
            assert_eq!(tree.insert(key), model.insert(key));
        } else {
            assert_eq!(tree.remove(&key).unwrap(), model.remove(&key));
        }
    }
    assert_eq!(tree.traverse(), model.into_iter().collect::<Vec<_>>());
    assert_occupancy(&tree);
}

proptest! {
    #[test]
    fn insertion_order_does_not_change_contents(
        keys in proptest::collection::hash_set(-1000i32..1000, 0..200),
        order in 3usize..10,
        seed in any::<u64>(),
    ) {
        use rand::{rngs::StdRng, SeedableRng};

        let mut sorted: Vec<i32> = keys.into_iter().collect();
        sorted.sort();
        let mut shuffled = sorted.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut a = verified_tree(order);
        let mut b = verified_tree(order);
        for &k in &sorted {
            a.insert(k);
        }
        for &k in &shuffled {
            b.insert(k);
        }
        prop_assert_eq!(a.traverse(), sorted.clone());
        prop_assert_eq!(b.traverse(), sorted);
    }

    #[test]
    fn removing_absent_keys_is_idempotent(
        keys in proptest::collection::vec(0i32..500, 0..150),
        absent in 500i32..1000,
        order in 3usize..8,
    ) {
        let mut tree = verified_tree(order);
        for &k in &keys {
            tree.insert(k);
        }
        let before = tree.traverse();
        let shape = tree.snapshot();
        prop_assert!(!tree.remove(&absent).unwrap());
        prop_assert_eq!(tree.traverse(), before);
        prop_assert_eq!(tree.snapshot(), shape);
    }

    #[test]
    fn search_agrees_with_model(
        ops in proptest::collection::vec((any::<bool>(), 0i32..64), 0..300),
        order in 3usize..7,
    ) {
        let mut tree = verified_tree(order);
        let mut model = BTreeSet::new();
        for (insert, key) in ops {
            if insert {
                tree.insert(key);
                model.insert(key);
            } else {
                tree.remove(&key).unwrap();
                model.remove(&key);
            }
        }
        for key in 0..64 {
            prop_assert_eq!(tree.search(&key), model.contains(&key));
        }
        prop_assert!(tree.verify().is_ok());
    }

    #[test]
    fn snapshot_of_random_tree_reloads(
        ops in proptest::collection::vec((any::<bool>(), -100i32..100), 0..300),
        order in 3usize..9,
    ) {
        let mut tree = verified_tree(order);
        for (insert, key) in ops {
            if insert {
                tree.insert(key);
            } else {
                tree.remove(&key).unwrap();
            }
        }

        let json = tree.to_json().unwrap();
        let params = BTreeParams::new(order).unwrap();
        let reloaded: BTree<i32> =
            BTree::from_json(params, DefaultKeyComparator::new(), &json).unwrap();
        prop_assert!(reloaded.verify().is_ok());
        prop_assert_eq!(reloaded.len(), tree.len());
        prop_assert_eq!(reloaded.snapshot(), tree.snapshot());
        prop_assert_eq!(reloaded.to_json().unwrap(), json);
    }
}
