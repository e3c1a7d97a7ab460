use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::bst::Bst;
use crate::error::Error;
use crate::index::{RbIndex, Stats};
use crate::rb::Color::{self, Black, Red};
use crate::rb::RedBlack;

fn make_rng() -> SmallRng {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    println!("seed {}", seed);
    SmallRng::from_seed(seed.to_le_bytes())
}

fn build(keys: &[i64]) -> RbIndex<i64, i64> {
    let mut index: RbIndex<i64, i64> = RbIndex::new("test-rb");
    for key in keys.iter() {
        assert!(index.insert(*key, *key));
        assert!(index.validate().is_ok());
    }
    index
}

fn colors(index: &RbIndex<i64, i64>, keys: &[i64]) -> Vec<Color> {
    let bst = index.as_bst();
    keys.iter().map(|k| bst.meta_of(k).unwrap()).collect()
}

fn bound(n: usize) -> f64 {
    2.0 * ((n + 1) as f64).log2()
}

#[test]
fn test_insert_chain() {
    let index = build(&[10, 20, 30]);
    let bst = index.as_bst();
    assert_eq!(bst.root_key(), Some(&20));
    assert_eq!(bst.children_of(&20), Some((Some(&10), Some(&30))));
    assert_eq!(colors(&index, &[20, 10, 30]), vec![Black, Red, Red]);
    assert_eq!(index.stats().rotations(), 1);
    assert_eq!(index.validate().unwrap().blacks(), Some(1));
}

#[test]
fn test_insert_inner_child() {
    let index = build(&[30, 10, 20]);
    let bst = index.as_bst();
    assert_eq!(bst.root_key(), Some(&20));
    assert_eq!(bst.children_of(&20), Some((Some(&10), Some(&30))));
    assert_eq!(colors(&index, &[20, 10, 30]), vec![Black, Red, Red]);
    assert_eq!(index.stats().rotations(), 2);
}

#[test]
fn test_insert_inner_child_right() {
    let index = build(&[10, 30, 20]);
    let bst = index.as_bst();
    assert_eq!(bst.root_key(), Some(&20));
    assert_eq!(bst.children_of(&20), Some((Some(&10), Some(&30))));
    assert_eq!(colors(&index, &[20, 10, 30]), vec![Black, Red, Red]);
    assert_eq!(index.stats().rotations(), 2);
}

#[test]
fn test_insert_recolor() {
    let index = build(&[10, 5, 15, 1]);
    assert_eq!(colors(&index, &[10, 5, 15, 1]), vec![Black, Black, Black, Red]);
    assert_eq!(index.stats().rotations(), 0);
    assert_eq!(index.validate().unwrap().blacks(), Some(2));
}

#[test]
fn test_delete_red_leaf() {
    let mut index = build(&[10, 20, 30]);
    let rotations = index.stats().rotations();
    assert_eq!(index.delete(&10), Some(10));
    assert_eq!(colors(&index, &[20, 30]), vec![Black, Red]);
    assert_eq!(index.stats().rotations(), rotations);
    assert!(index.validate().is_ok());
}

#[test]
fn test_delete_red_sibling() {
    // 2B(1B, 4R(3B, 5B(_, 6R)))
    let mut index = build(&[1, 2, 3, 4, 5, 6]);
    assert_eq!(
        colors(&index, &[1, 2, 3, 4, 5, 6]),
        vec![Black, Black, Black, Red, Black, Red]
    );
    let rotations = index.stats().rotations();

    assert_eq!(index.delete(&1), Some(1));
    // 4B(2B(_, 3R), 5B(_, 6R))
    let bst = index.as_bst();
    assert_eq!(bst.root_key(), Some(&4));
    assert_eq!(bst.children_of(&4), Some((Some(&2), Some(&5))));
    assert_eq!(bst.children_of(&2), Some((None, Some(&3))));
    assert_eq!(colors(&index, &[2, 3, 4, 5, 6]), vec![Black, Red, Black, Black, Red]);
    assert_eq!(index.stats().rotations(), rotations + 1);
    assert!(index.validate().is_ok());
}

#[test]
fn test_delete_far_red() {
    let mut index = build(&[1, 2, 3, 4, 5, 6]);
    let rotations = index.stats().rotations();

    assert_eq!(index.delete(&3), Some(3));
    // 2B(1B, 5R(4B, 6B))
    let bst = index.as_bst();
    assert_eq!(bst.root_key(), Some(&2));
    assert_eq!(bst.children_of(&5), Some((Some(&4), Some(&6))));
    assert_eq!(colors(&index, &[1, 2, 4, 5, 6]), vec![Black, Black, Black, Red, Black]);
    assert_eq!(index.stats().rotations(), rotations + 1);
    assert!(index.validate().is_ok());
}

#[test]
fn test_delete_near_red() {
    // 10B(5B, 15B(12R, _))
    let mut index = build(&[10, 5, 15, 12]);
    assert_eq!(colors(&index, &[10, 5, 15, 12]), vec![Black, Black, Black, Red]);
    let rotations = index.stats().rotations();

    assert_eq!(index.delete(&5), Some(5));
    // 12B(10B, 15B)
    let bst = index.as_bst();
    assert_eq!(bst.root_key(), Some(&12));
    assert_eq!(bst.children_of(&12), Some((Some(&10), Some(&15))));
    assert_eq!(colors(&index, &[10, 12, 15]), vec![Black, Black, Black]);
    assert_eq!(index.stats().rotations(), rotations + 2);
    assert!(index.validate().is_ok());
}

#[test]
fn test_delete_black_sibling() {
    // 10B(5B, 15B), deficit climbs to the root.
    let mut index = build(&[10, 5, 15, 1]);
    assert_eq!(index.delete(&1), Some(1));
    assert_eq!(index.delete(&5), Some(5));
    assert_eq!(colors(&index, &[10, 15]), vec![Black, Red]);
    assert_eq!(index.validate().unwrap().blacks(), Some(1));
}

#[test]
fn test_delete_root() {
    let mut index = build(&[10]);
    assert_eq!(index.delete(&10), Some(10));
    assert!(index.is_empty());
    assert!(index.validate().is_ok());

    let mut index = build(&[10, 5]);
    assert_eq!(index.delete(&10), Some(10));
    assert_eq!(colors(&index, &[5]), vec![Black]);
    assert!(index.validate().is_ok());
}

#[test]
fn test_rotation_bounds() {
    let mut rng = make_rng();
    let mut index: RbIndex<i64, i64> = RbIndex::new("test-rb");
    for _ in 0..10_000 {
        let key = rng.gen::<i64>() % 20_000;
        let before = index.stats().rotations();
        index.insert(key, key);
        assert!(index.stats().rotations() - before <= 2);
    }
    assert!(index.validate().is_ok());

    for _ in 0..10_000 {
        let key = rng.gen::<i64>() % 20_000;
        let before = index.stats().rotations();
        index.delete(&key);
        assert!(index.stats().rotations() - before <= 3);
    }
    assert!(index.validate().is_ok());
}

#[test]
fn test_height_bound() {
    let mut index: RbIndex<i64, i64> = RbIndex::new("test-rb");
    for key in 0..10_000 {
        index.insert(key, key);
        if key % 1000 == 0 {
            assert!((index.height() as f64) <= bound(index.len()));
        }
    }
    let stats = index.validate().unwrap();
    assert_eq!(stats.height(), Some(index.height()));
    assert!(stats.blacks().is_some());
    assert!((index.height() as f64) <= bound(index.len()));

    let depths = stats.depths().unwrap();
    assert_eq!(depths.samples(), index.len() + 1);
    assert_eq!(depths.max(), index.height());

    let mut rng = make_rng();
    for _ in 0..5_000 {
        let key = rng.gen::<i64>() % 10_000;
        index.delete(&key);
    }
    assert!(index.validate().is_ok());
    assert!((index.height() as f64) <= bound(index.len()));
}

#[test]
fn test_validate_errors() {
    let mut bst: Bst<i64, i64, RedBlack> = Bst::new();
    for key in [20, 10, 30, 5].iter() {
        bst.insert(*key, *key);
    }
    let mut stats = Stats::new(bst.len(), 0);
    assert!(bst.validate(&mut stats).is_ok());

    // 20B(10B(5R), 30B)
    let root = bst.root().unwrap();
    bst.set_meta(root, Red);
    assert_eq!(bst.validate(&mut stats).err(), Some(Error::RedRoot));
    bst.set_meta(root, Black);

    let ten = bst.find(&10).unwrap();
    bst.set_meta(ten, Red);
    assert_eq!(bst.validate(&mut stats).err(), Some(Error::ConsecutiveReds));

    let five = bst.find(&5).unwrap();
    bst.set_meta(five, Black);
    match bst.validate(&mut stats) {
        Err(Error::UnbalancedBlacks(_)) => (),
        res => panic!("expected UnbalancedBlacks {:?}", res.err()),
    }
}
