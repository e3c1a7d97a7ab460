use std::{
    borrow::Borrow,
    mem,
    ops::{Bound, RangeBounds},
};

use log::debug;
use rand::Rng;

use crate::avl::Avl;
use crate::bst::{Balance, Bst, Node};
use crate::depth::Depth;
use crate::error::Error;
use crate::iter::{Iter, Range};
use crate::rb::RedBlack;

/// Index manage a single instance of in-memory ordered index, kept
/// balanced by policy `P`, either [`Avl`] or [`RedBlack`].
pub struct Index<K, V, P = Avl>
where
    P: Balance,
{
    name: String,
    bst: Bst<K, V, P>,
}

/// Index balanced as an [AVL][avl] tree.
///
/// [avl]: https://en.wikipedia.org/wiki/AVL_tree
pub type AvlIndex<K, V> = Index<K, V, Avl>;

/// Index balanced as a [Red-Black][rb] tree.
///
/// [rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub type RbIndex<K, V> = Index<K, V, RedBlack>;

impl<K, V, P> Clone for Index<K, V, P>
where
    K: Clone,
    V: Clone,
    P: Balance,
{
    fn clone(&self) -> Self {
        Index {
            name: self.name.clone(),
            bst: self.bst.clone(),
        }
    }
}

/// Different ways to construct a new Index instance.
impl<K, V, P> Index<K, V, P>
where
    K: Ord,
    P: Balance,
{
    /// Create an empty instance of Index, identified by `name`.
    /// Applications can choose unique names.
    pub fn new<S>(name: S) -> Index<K, V, P>
    where
        S: AsRef<str>,
    {
        let name = name.as_ref().to_string();
        debug!("{}: new {} index", name, P::NAME);
        Index {
            name,
            bst: Bst::new(),
        }
    }

    /// Create a new instance of Index and load it with entries from
    /// `iter`. For duplicate keys the first entry wins.
    pub fn load_from<S, I>(name: S, iter: I) -> Index<K, V, P>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut index = Index::new(name);
        for (key, value) in iter {
            index.insert(key, value);
        }
        index
    }
}

/// Maintenance API.
impl<K, V, P> Index<K, V, P>
where
    P: Balance,
{
    /// Identify this instance. Applications can choose unique names while
    /// creating Index instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.bst.len()
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the number of nodes on the longest path from root to leaf.
    pub fn height(&self) -> usize {
        self.bst.height()
    }

    /// Return quickly with basic statisics, only entries(), node_size()
    /// and rotations() are valid with this statisics.
    pub fn stats(&self) -> Stats {
        let mut stats = Stats::new(self.len(), mem::size_of::<Node<K, V, P::Meta>>());
        stats.rotations = self.bst.rotations();
        stats
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        debug!("{}: clear {} entries", self.name, self.len());
        self.bst.clear()
    }
}

/// Write operations on Index instance.
impl<K, V, P> Index<K, V, P>
where
    K: Ord,
    P: Balance,
{
    /// Insert a new {key, value} entry in the index. If key is already
    /// present the index is left untouched and false is returned.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.bst.insert(key, value)
    }

    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        self.bst.upsert(key, value)
    }

    /// Delete key from this instance and return its value. If key is
    /// not present, then delete is effectively a no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bst.delete(key)
    }

    /// Validate the tree with following rules:
    ///
    /// * Every child points back to its parent.
    /// * Keys are in sort order.
    /// * AVL: balance factor is within {-1, 0, 1} and stored heights
    ///   match the subtree.
    /// * Red-Black: root is black, no consecutive reds on any path and
    ///   the number of blacks is same under left child and right child.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>>
    where
        K: Clone,
    {
        let mut stats = self.stats();
        self.bst.validate(&mut stats)?;
        debug!(
            "{}: validated {} entries, height {:?}",
            self.name, stats.entries, stats.height
        );
        Ok(stats)
    }
}

/// Read operations on Index instance.
impl<K, V, P> Index<K, V, P>
where
    K: Ord,
    P: Balance,
{
    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bst.search(key)
    }

    /// Check whether key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bst.find(key).is_some()
    }

    /// Return the entry with smallest key.
    pub fn min(&self) -> Result<(&K, &V), Error<K>> {
        self.bst.minimum().ok_or(Error::EmptyTree)
    }

    /// Return the entry with largest key.
    pub fn max(&self) -> Result<(&K, &V), Error<K>> {
        self.bst.maximum().ok_or(Error::EmptyTree)
    }

    /// Return a random entry from this index.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<(&K, &V)> {
        let mut h = self.bst.root()?;

        let mut at_depth = rng.gen::<u8>() % 40;
        loop {
            let next = match rng.gen::<u8>() % 2 {
                0 => self.bst.left(h),
                _ => self.bst.right(h),
            };
            match next {
                Some(next) if at_depth > 0 => {
                    at_depth -= 1;
                    h = next;
                }
                _ => break Some(self.bst.entry(h)),
            }
        }
    }

    /// Return an iterator over all entries in ascending key order. Every
    /// call starts a fresh traversal.
    pub fn iter(&self) -> Iter<K, V, P> {
        Iter::new(&self.bst)
    }

    /// Range over all entries from low to high.
    pub fn range<Q, R>(&self, range: R) -> Range<K, V, P>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ToOwned<Owned = K> + ?Sized,
    {
        let low: Bound<K> = match range.start_bound() {
            Bound::Included(key) => Bound::Included(key.to_owned()),
            Bound::Excluded(key) => Bound::Excluded(key.to_owned()),
            Bound::Unbounded => Bound::Unbounded,
        };
        let high: Bound<K> = match range.end_bound() {
            Bound::Included(key) => Bound::Included(key.to_owned()),
            Bound::Excluded(key) => Bound::Excluded(key.to_owned()),
            Bound::Unbounded => Bound::Unbounded,
        };
        Range::new(&self.bst, low, high)
    }
}

#[cfg(test)]
impl<K, V, P> Index<K, V, P>
where
    P: Balance,
{
    pub(crate) fn as_bst(&self) -> &Bst<K, V, P> {
        &self.bst
    }
}

impl<'a, K, V, P> IntoIterator for &'a Index<K, V, P>
where
    K: Ord,
    P: Balance,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Statistics on [`Index`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`Index::stats`] method.
/// * To get full statisics via [`Index::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    rotations: usize,
    height: Option<usize>,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    pub(crate) fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            rotations: Default::default(),
            height: Default::default(),
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: usize) {
        self.height = Some(height)
    }

    #[inline]
    pub(crate) fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    pub(crate) fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`Index`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Index<K, V, P>`.
    /// Although the node overhead is constant, the node size varies
    /// based on key and value types. EG:
    ///
    /// ```
    /// use balanced_index::AvlIndex;
    /// let index: AvlIndex<u64, u64> = AvlIndex::new("myinstance");
    ///
    /// // size of key: 8 bytes
    /// // size of value: 8 bytes
    /// // overhead, height and three links, is 16 bytes
    /// assert_eq!(index.stats().node_size(), 32);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of single rotations applied since the index was
    /// created, a double rotation counts as two.
    #[inline]
    pub fn rotations(&self) -> usize {
        self.rotations
    }

    /// Return number of nodes on the longest path from root to leaf.
    #[inline]
    pub fn height(&self) -> Option<usize> {
        self.height
    }

    /// Return number of black nodes from root to leaf, on both left
    /// and right child. Only for [`RedBlack`] index.
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics.
    pub fn depths(&self) -> Option<Depth> {
        match &self.depths {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }
}
