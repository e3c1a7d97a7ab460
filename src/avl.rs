//! Height balanced policy, [AVL][avl] tree.
//!
//! [avl]: https://en.wikipedia.org/wiki/AVL_tree

use std::cmp;

use log::trace;

use crate::arena::Handle;
use crate::bst::{sealed, Balance, Bst, Spliced};
use crate::error::Error;
use crate::index::Stats;

/// AVL balancing, every node keeps the height of its subtree and the
/// heights of sibling subtrees differ by at most one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Avl;

impl sealed::Sealed for Avl {}

impl Balance for Avl {
    type Meta = u32;

    const NAME: &'static str = "avl";

    #[inline]
    fn leaf() -> u32 {
        1
    }

    fn after_insert<K, V>(bst: &mut Bst<K, V, Avl>, node: Handle) {
        // heights can change all the way up, even after a rotation.
        let mut cursor = bst.parent(node);
        while let Some(h) = cursor {
            let top = rebalance(bst, h);
            cursor = bst.parent(top);
        }
    }

    fn after_delete<K, V>(bst: &mut Bst<K, V, Avl>, spliced: Spliced<u32>) {
        // unlike insert, delete may rotate at every level.
        let mut cursor = spliced.parent;
        while let Some(h) = cursor {
            let top = rebalance(bst, h);
            cursor = bst.parent(top);
        }
    }

    fn validate<K, V>(bst: &Bst<K, V, Avl>, _stats: &mut Stats) -> Result<(), Error<K>> {
        validate_tree(bst, bst.root())?;
        Ok(())
    }
}

#[inline]
fn height<K, V>(bst: &Bst<K, V, Avl>, node: Option<Handle>) -> u32 {
    node.map_or(0, |h| bst.meta(h))
}

#[inline]
fn balance_factor<K, V>(bst: &Bst<K, V, Avl>, h: Handle) -> i64 {
    let (left, right) = (bst.left(h), bst.right(h));
    i64::from(height(bst, left)) - i64::from(height(bst, right))
}

fn update_height<K, V>(bst: &mut Bst<K, V, Avl>, h: Handle) {
    let (left, right) = (bst.left(h), bst.right(h));
    let ht = 1 + cmp::max(height(bst, left), height(bst, right));
    bst.set_meta(h, ht);
}

fn rotate_left<K, V>(bst: &mut Bst<K, V, Avl>, h: Handle) -> Handle {
    let top = bst.rotate_left(h);
    update_height(bst, h);
    update_height(bst, top);
    top
}

fn rotate_right<K, V>(bst: &mut Bst<K, V, Avl>, h: Handle) -> Handle {
    let top = bst.rotate_right(h);
    update_height(bst, h);
    update_height(bst, top);
    top
}

// Restore balance at `h` and return the root of its subtree, which
// is `h` itself unless a rotation was applied.
fn rebalance<K, V>(bst: &mut Bst<K, V, Avl>, h: Handle) -> Handle {
    update_height(bst, h);
    let bf = balance_factor(bst, h);
    if bf > 1 {
        let left = match bst.left(h) {
            Some(left) => left,
            None => panic!("rebalance(): left heavy without left child, call the programmer"),
        };
        if balance_factor(bst, left) < 0 {
            trace!("avl: left-right at {:?}", h);
            rotate_left(bst, left);
        } else {
            trace!("avl: left-left at {:?}", h);
        }
        rotate_right(bst, h)
    } else if bf < -1 {
        let right = match bst.right(h) {
            Some(right) => right,
            None => panic!("rebalance(): right heavy without right child, call the programmer"),
        };
        if balance_factor(bst, right) > 0 {
            trace!("avl: right-left at {:?}", h);
            rotate_right(bst, right);
        } else {
            trace!("avl: right-right at {:?}", h);
        }
        rotate_left(bst, h)
    } else {
        h
    }
}

// Return the computed height of the subtree.
fn validate_tree<K, V>(bst: &Bst<K, V, Avl>, node: Option<Handle>) -> Result<u32, Error<K>> {
    let h = match node {
        Some(h) => h,
        None => return Ok(0),
    };
    let lh = validate_tree(bst, bst.left(h))?;
    let rh = validate_tree(bst, bst.right(h))?;
    let ht = 1 + cmp::max(lh, rh);
    if bst.meta(h) != ht {
        let err = format!("{:?} stored: {} computed: {}", h, bst.meta(h), ht);
        return Err(Error::BadHeight(err));
    }
    if (i64::from(lh) - i64::from(rh)).abs() > 1 {
        let err = format!("{:?} left: {} right: {}", h, lh, rh);
        return Err(Error::UnbalancedHeight(err));
    }
    Ok(ht)
}
