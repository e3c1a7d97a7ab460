//! In-order iterators. Each iterator keeps an explicit stack of pending
//! ancestors, so auxiliary space is bounded by tree height.

use std::{cmp::Ordering, ops::Bound};

use crate::arena::Handle;
use crate::bst::{Balance, Bst};

/// Ascending iterator over all entries, refer to [`Index::iter`].
///
/// [`Index::iter`]: crate::Index::iter
pub struct Iter<'a, K, V, P>
where
    P: Balance,
{
    bst: &'a Bst<K, V, P>,
    stack: Vec<Handle>,
}

impl<'a, K, V, P> Iter<'a, K, V, P>
where
    P: Balance,
{
    pub(crate) fn new(bst: &'a Bst<K, V, P>) -> Iter<'a, K, V, P> {
        let mut iter = Iter { bst, stack: vec![] };
        iter.push_left(bst.root());
        iter
    }

    fn push_left(&mut self, mut node: Option<Handle>) {
        while let Some(h) = node {
            self.stack.push(h);
            node = self.bst.left(h);
        }
    }
}

impl<'a, K, V, P> Iterator for Iter<'a, K, V, P>
where
    P: Balance,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.stack.pop()?;
        self.push_left(self.bst.right(h));
        Some(self.bst.entry(h))
    }
}

/// Ascending iterator over a key range, refer to [`Index::range`].
///
/// [`Index::range`]: crate::Index::range
pub struct Range<'a, K, V, P>
where
    P: Balance,
{
    bst: &'a Bst<K, V, P>,
    stack: Vec<Handle>,
    low: Bound<K>,
    high: Bound<K>,
}

impl<'a, K, V, P> Range<'a, K, V, P>
where
    K: Ord,
    P: Balance,
{
    pub(crate) fn new(bst: &'a Bst<K, V, P>, low: Bound<K>, high: Bound<K>) -> Self {
        let mut range = Range {
            bst,
            stack: vec![],
            low,
            high,
        };
        // seed the stack with the path to the first key within low.
        let mut node = bst.root();
        while let Some(h) = node {
            node = if above_low(&bst.node(h).key, &range.low) {
                range.stack.push(h);
                bst.left(h)
            } else {
                bst.right(h)
            };
        }
        range
    }

    /// Iterate the same range in descending order.
    pub fn rev(self) -> Reverse<'a, K, V, P> {
        Reverse::new(self.bst, self.low, self.high)
    }
}

impl<'a, K, V, P> Iterator for Range<'a, K, V, P>
where
    K: Ord,
    P: Balance,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.stack.pop()?;
        let (key, value) = self.bst.entry(h);
        if !below_high(key, &self.high) {
            self.stack.clear();
            return None;
        }
        let mut node = self.bst.right(h);
        while let Some(h) = node {
            self.stack.push(h);
            node = self.bst.left(h);
        }
        Some((key, value))
    }
}

/// Descending iterator over a key range, refer to [`Range::rev`].
pub struct Reverse<'a, K, V, P>
where
    P: Balance,
{
    bst: &'a Bst<K, V, P>,
    stack: Vec<Handle>,
    low: Bound<K>,
}

impl<'a, K, V, P> Reverse<'a, K, V, P>
where
    K: Ord,
    P: Balance,
{
    fn new(bst: &'a Bst<K, V, P>, low: Bound<K>, high: Bound<K>) -> Self {
        let mut stack = vec![];
        let mut node = bst.root();
        while let Some(h) = node {
            node = if below_high(&bst.node(h).key, &high) {
                stack.push(h);
                bst.right(h)
            } else {
                bst.left(h)
            };
        }
        Reverse { bst, stack, low }
    }
}

impl<'a, K, V, P> Iterator for Reverse<'a, K, V, P>
where
    K: Ord,
    P: Balance,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.stack.pop()?;
        let (key, value) = self.bst.entry(h);
        if !above_low(key, &self.low) {
            self.stack.clear();
            return None;
        }
        let mut node = self.bst.left(h);
        while let Some(h) = node {
            self.stack.push(h);
            node = self.bst.right(h);
        }
        Some((key, value))
    }
}

fn above_low<K: Ord>(key: &K, low: &Bound<K>) -> bool {
    match low {
        Bound::Included(low) => key.cmp(low) != Ordering::Less,
        Bound::Excluded(low) => key.cmp(low) == Ordering::Greater,
        Bound::Unbounded => true,
    }
}

fn below_high<K: Ord>(key: &K, high: &Bound<K>) -> bool {
    match high {
        Bound::Included(high) => key.cmp(high) != Ordering::Greater,
        Bound::Excluded(high) => key.cmp(high) == Ordering::Less,
        Bound::Unbounded => true,
    }
}
