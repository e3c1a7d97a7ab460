//! Color balanced policy, [Red-Black][rb] tree.
//!
//! Absent children, `None` handles, play the role of the shared black
//! nil sentinel: they are always black and never carry a key.
//!
//! [rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use log::trace;

use crate::arena::Handle;
use crate::bst::{sealed, Balance, Bst, Side, Spliced};
use crate::error::Error;
use crate::index::Stats;

/// Node color for [`RedBlack`] policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Red-Black balancing, no red node has a red child and every path to
/// an absent leaf crosses the same number of black nodes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedBlack;

impl sealed::Sealed for RedBlack {}

impl Balance for RedBlack {
    type Meta = Color;

    const NAME: &'static str = "rb";

    #[inline]
    fn leaf() -> Color {
        Color::Red
    }

    fn after_insert<K, V>(bst: &mut Bst<K, V, RedBlack>, node: Handle) {
        let mut node = node;
        while let Some(mut parent) = red(bst, bst.parent(node)) {
            let grand = match bst.parent(parent) {
                Some(grand) => grand,
                None => panic!("after_insert(): red root, call the programmer"),
            };
            if bst.left(grand) == Some(parent) {
                if let Some(uncle) = red(bst, bst.right(grand)) {
                    trace!("rb: insert recolor at {:?}", grand);
                    bst.set_meta(parent, Color::Black);
                    bst.set_meta(uncle, Color::Black);
                    bst.set_meta(grand, Color::Red);
                    node = grand;
                    continue;
                }
                if bst.right(parent) == Some(node) {
                    trace!("rb: insert inner child at {:?}", parent);
                    parent = bst.rotate_left(parent);
                }
                trace!("rb: insert outer child at {:?}", grand);
                bst.set_meta(parent, Color::Black);
                bst.set_meta(grand, Color::Red);
                bst.rotate_right(grand);
            } else {
                if let Some(uncle) = red(bst, bst.left(grand)) {
                    trace!("rb: insert recolor at {:?}", grand);
                    bst.set_meta(parent, Color::Black);
                    bst.set_meta(uncle, Color::Black);
                    bst.set_meta(grand, Color::Red);
                    node = grand;
                    continue;
                }
                if bst.left(parent) == Some(node) {
                    trace!("rb: insert inner child at {:?}", parent);
                    parent = bst.rotate_right(parent);
                }
                trace!("rb: insert outer child at {:?}", grand);
                bst.set_meta(parent, Color::Black);
                bst.set_meta(grand, Color::Red);
                bst.rotate_left(grand);
            }
            break;
        }

        if let Some(root) = bst.root() {
            bst.set_meta(root, Color::Black);
        }
    }

    fn after_delete<K, V>(bst: &mut Bst<K, V, RedBlack>, spliced: Spliced<Color>) {
        if spliced.meta == Color::Red {
            return;
        }

        // `node` carries one black less than its sibling subtree.
        let Spliced {
            mut parent,
            child: mut node,
            mut side,
            ..
        } = spliced;

        while let Some(p) = parent {
            if is_red(bst, node) {
                break;
            }
            let done = match side {
                Side::Left => fix_left_deficit(bst, p),
                Side::Right => fix_right_deficit(bst, p),
            };
            if done {
                break;
            }
            node = Some(p);
            side = bst.side_of(p);
            parent = bst.parent(p);
        }

        if let Some(node) = node {
            bst.set_meta(node, Color::Black);
        }
    }

    fn validate<K, V>(bst: &Bst<K, V, RedBlack>, stats: &mut Stats) -> Result<(), Error<K>> {
        let root = bst.root();
        if is_red(bst, root) {
            return Err(Error::RedRoot);
        }
        let blacks = validate_tree(bst, root, false, 0)?;
        stats.set_blacks(blacks);
        Ok(())
    }
}

#[inline]
fn is_red<K, V>(bst: &Bst<K, V, RedBlack>, node: Option<Handle>) -> bool {
    node.map_or(false, |h| bst.meta(h) == Color::Red)
}

// `node` if it is red.
#[inline]
fn red<K, V>(bst: &Bst<K, V, RedBlack>, node: Option<Handle>) -> Option<Handle> {
    node.filter(|h| bst.meta(*h) == Color::Red)
}

fn sibling(node: Option<Handle>) -> Handle {
    match node {
        Some(h) => h,
        None => panic!("after_delete(): black deficit without sibling, call the programmer"),
    }
}

// Deficit is on the left of `p`. Return true once resolved, false when
// the deficit moved up to `p`.
fn fix_left_deficit<K, V>(bst: &mut Bst<K, V, RedBlack>, p: Handle) -> bool {
    let mut s = sibling(bst.right(p));
    if is_red(bst, Some(s)) {
        trace!("rb: delete red sibling at {:?}", p);
        bst.set_meta(s, Color::Black);
        bst.set_meta(p, Color::Red);
        bst.rotate_left(p);
        s = sibling(bst.right(p));
    }

    let (near, far) = (bst.left(s), bst.right(s));
    if !is_red(bst, near) && !is_red(bst, far) {
        trace!("rb: delete black sibling at {:?}", p);
        bst.set_meta(s, Color::Red);
        return false;
    }

    if !is_red(bst, far) {
        trace!("rb: delete near red at {:?}", s);
        if let Some(near) = near {
            bst.set_meta(near, Color::Black);
        }
        bst.set_meta(s, Color::Red);
        s = bst.rotate_right(s);
    }

    trace!("rb: delete far red at {:?}", p);
    bst.set_meta(s, bst.meta(p));
    bst.set_meta(p, Color::Black);
    if let Some(far) = bst.right(s) {
        bst.set_meta(far, Color::Black);
    }
    bst.rotate_left(p);
    true
}

fn fix_right_deficit<K, V>(bst: &mut Bst<K, V, RedBlack>, p: Handle) -> bool {
    let mut s = sibling(bst.left(p));
    if is_red(bst, Some(s)) {
        trace!("rb: delete red sibling at {:?}", p);
        bst.set_meta(s, Color::Black);
        bst.set_meta(p, Color::Red);
        bst.rotate_right(p);
        s = sibling(bst.left(p));
    }

    let (near, far) = (bst.right(s), bst.left(s));
    if !is_red(bst, near) && !is_red(bst, far) {
        trace!("rb: delete black sibling at {:?}", p);
        bst.set_meta(s, Color::Red);
        return false;
    }

    if !is_red(bst, far) {
        trace!("rb: delete near red at {:?}", s);
        if let Some(near) = near {
            bst.set_meta(near, Color::Black);
        }
        bst.set_meta(s, Color::Red);
        s = bst.rotate_left(s);
    }

    trace!("rb: delete far red at {:?}", p);
    bst.set_meta(s, bst.meta(p));
    bst.set_meta(p, Color::Black);
    if let Some(far) = bst.left(s) {
        bst.set_meta(far, Color::Black);
    }
    bst.rotate_right(p);
    true
}

// Return the number of black nodes on any path from `node` down to an
// absent leaf, counting `node` itself.
fn validate_tree<K, V>(
    bst: &Bst<K, V, RedBlack>,
    node: Option<Handle>,
    fromred: bool,
    depth: usize,
) -> Result<usize, Error<K>> {
    let h = match node {
        Some(h) => h,
        None => return Ok(0),
    };

    let red = is_red(bst, node);
    if fromred && red {
        return Err(Error::ConsecutiveReds);
    }
    let lblacks = validate_tree(bst, bst.left(h), red, depth + 1)?;
    let rblacks = validate_tree(bst, bst.right(h), red, depth + 1)?;
    if lblacks != rblacks {
        let err = format!("depth: {} left: {} right: {}", depth, lblacks, rblacks);
        return Err(Error::UnbalancedBlacks(err));
    }
    Ok(if red { lblacks } else { lblacks + 1 })
}
