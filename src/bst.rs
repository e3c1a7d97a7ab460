use std::{
    borrow::Borrow,
    cmp::{Ord, Ordering},
    fmt,
    marker::PhantomData,
    mem,
};

use crate::arena::{Arena, Handle};
use crate::depth::Depth;
use crate::error::Error;
use crate::index::Stats;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Balancing policy for [`Index`](crate::Index). The skeleton does plain
/// binary-search-tree insert and delete, and calls into the policy after
/// every structural mutation so that it can restore its own invariants.
///
/// This trait is sealed, [`Avl`](crate::Avl) and
/// [`RedBlack`](crate::RedBlack) are the only implementations. Use it
/// as a bound to write code generic over both:
///
/// ```
/// use balanced_index::{Balance, Index};
///
/// fn fill<P: Balance>(index: &mut Index<u32, u32, P>) {
///     for key in 0..100 {
///         index.insert(key, key);
///     }
/// }
///
/// let mut index: Index<u32, u32, balanced_index::RedBlack> = Index::new("rb");
/// fill(&mut index);
/// assert_eq!(index.len(), 100);
/// ```
///
/// ```compile_fail
/// use balanced_index::Balance;
///
/// #[derive(Debug)]
/// struct Splay;
///
/// impl Balance for Splay {}
/// ```
pub trait Balance: sealed::Sealed + Sized {
    /// Per-node bookkeeping, height for AVL and color for Red-Black.
    type Meta: Copy + fmt::Debug;

    /// Short name for logging.
    const NAME: &'static str;

    /// Metadata for a freshly created leaf.
    fn leaf() -> Self::Meta;

    /// Called after `node` is linked as a new leaf.
    fn after_insert<K, V>(bst: &mut Bst<K, V, Self>, node: Handle);

    /// Called after a node with at most one child is unlinked.
    fn after_delete<K, V>(bst: &mut Bst<K, V, Self>, spliced: Spliced<Self::Meta>);

    /// Check policy invariants, fill in policy specific statistics.
    fn validate<K, V>(bst: &Bst<K, V, Self>, stats: &mut Stats) -> Result<(), Error<K>>;
}

/// Which child slot of the parent a node hangs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Hand-off from delete to [`Balance::after_delete`]. Describes the
/// position left behind by the unlinked node.
#[derive(Clone, Copy, Debug)]
pub struct Spliced<M> {
    /// Parent of the vacated position, None if the root was unlinked.
    pub parent: Option<Handle>,
    /// Node that took over the position, None for an absent leaf.
    pub child: Option<Handle>,
    /// Side of `parent` on which the position lies.
    pub side: Side,
    /// Metadata of the node that was unlinked.
    pub meta: M,
}

/// Node corresponds to a single entry in the index.
#[derive(Clone)]
pub struct Node<K, V, M> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) meta: M,
    pub(crate) parent: Option<Handle>, // lookup only
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<K, V, M> Node<K, V, M> {
    fn new(key: K, value: V, meta: M, parent: Option<Handle>) -> Node<K, V, M> {
        Node {
            key,
            value,
            meta,
            parent,
            left: None,
            right: None,
        }
    }
}

/// Binary search tree skeleton, nodes live in an arena and address
/// each other by [`Handle`].
pub struct Bst<K, V, P>
where
    P: Balance,
{
    arena: Arena<Node<K, V, P::Meta>>,
    root: Option<Handle>,
    rotations: usize,
    _policy: PhantomData<P>,
}

impl<K, V, P> Clone for Bst<K, V, P>
where
    K: Clone,
    V: Clone,
    P: Balance,
{
    fn clone(&self) -> Self {
        Bst {
            arena: self.arena.clone(),
            root: self.root,
            rotations: self.rotations,
            _policy: PhantomData,
        }
    }
}

// Node access, used by rotations and balancing policies.
impl<K, V, P> Bst<K, V, P>
where
    P: Balance,
{
    pub(crate) fn new() -> Bst<K, V, P> {
        Bst {
            arena: Arena::new(),
            root: None,
            rotations: 0,
            _policy: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Number of single rotations applied since this tree was created.
    #[inline]
    pub(crate) fn rotations(&self) -> usize {
        self.rotations
    }

    #[inline]
    pub(crate) fn count_rotation(&mut self) {
        self.rotations += 1;
    }

    #[inline]
    pub(crate) fn node(&self, h: Handle) -> &Node<K, V, P::Meta> {
        self.arena.get(h)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, h: Handle) -> &mut Node<K, V, P::Meta> {
        self.arena.get_mut(h)
    }

    #[inline]
    pub(crate) fn left(&self, h: Handle) -> Option<Handle> {
        self.node(h).left
    }

    #[inline]
    pub(crate) fn right(&self, h: Handle) -> Option<Handle> {
        self.node(h).right
    }

    #[inline]
    pub(crate) fn parent(&self, h: Handle) -> Option<Handle> {
        self.node(h).parent
    }

    #[inline]
    pub(crate) fn meta(&self, h: Handle) -> P::Meta {
        self.node(h).meta
    }

    #[inline]
    pub(crate) fn set_meta(&mut self, h: Handle, meta: P::Meta) {
        self.node_mut(h).meta = meta
    }

    /// Side of its parent on which `h` hangs. The root reports Left.
    pub(crate) fn side_of(&self, h: Handle) -> Side {
        match self.parent(h) {
            Some(p) if self.left(p) == Some(h) => Side::Left,
            Some(_) => Side::Right,
            None => Side::Left,
        }
    }

    /// Point the `side` slot of `parent`, or the root slot when parent
    /// is None, at `child`. Does not touch child's parent link.
    pub(crate) fn set_child(&mut self, parent: Option<Handle>, side: Side, child: Option<Handle>) {
        match (parent, side) {
            (None, _) => self.root = child,
            (Some(p), Side::Left) => self.node_mut(p).left = child,
            (Some(p), Side::Right) => self.node_mut(p).right = child,
        }
    }

    pub(crate) fn leftmost(&self, mut h: Handle) -> Handle {
        while let Some(left) = self.left(h) {
            h = left;
        }
        h
    }

    pub(crate) fn rightmost(&self, mut h: Handle) -> Handle {
        while let Some(right) = self.right(h) {
            h = right;
        }
        h
    }

    pub(crate) fn entry(&self, h: Handle) -> (&K, &V) {
        let node = self.node(h);
        (&node.key, &node.value)
    }

    pub(crate) fn minimum(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.entry(self.leftmost(root)))
    }

    pub(crate) fn maximum(&self) -> Option<(&K, &V)> {
        self.root.map(|root| self.entry(self.rightmost(root)))
    }

    /// Number of nodes on the longest root to leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut stack: Vec<(Handle, usize)> = self.root.iter().map(|h| (*h, 1)).collect();
        let mut height = 0;
        while let Some((h, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node(h);
            for child in [node.left, node.right].iter().flatten() {
                stack.push((*child, depth + 1));
            }
        }
        height
    }

    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }
}

// Mutation skeleton.
impl<K, V, P> Bst<K, V, P>
where
    K: Ord,
    P: Balance,
{
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root;
        while let Some(h) = node {
            let nref = self.node(h);
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.right,
                Ordering::Greater => nref.left,
                Ordering::Equal => return Some(h),
            };
        }
        None
    }

    pub(crate) fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|h| &self.node(h).value)
    }

    // Ok(existing node) or Err(insertion point).
    fn locate(&self, key: &K) -> Result<Handle, (Option<Handle>, Side)> {
        let (mut parent, mut side) = (None, Side::Left);
        let mut node = self.root;
        while let Some(h) = node {
            let nref = self.node(h);
            node = match nref.key.cmp(key) {
                Ordering::Greater => {
                    side = Side::Left;
                    nref.left
                }
                Ordering::Less => {
                    side = Side::Right;
                    nref.right
                }
                Ordering::Equal => return Ok(h),
            };
            parent = Some(h);
        }
        Err((parent, side))
    }

    fn link_leaf(&mut self, parent: Option<Handle>, side: Side, key: K, value: V) {
        let h = self.arena.alloc(Node::new(key, value, P::leaf(), parent));
        self.set_child(parent, side, Some(h));
        P::after_insert(self, h);
    }

    /// Insert a new entry, if key is already present this is a no-op
    /// and return false.
    pub(crate) fn insert(&mut self, key: K, value: V) -> bool {
        match self.locate(&key) {
            Ok(_) => false,
            Err((parent, side)) => {
                self.link_leaf(parent, side, key, value);
                true
            }
        }
    }

    /// Insert or overwrite, return the old value if key was present.
    pub(crate) fn upsert(&mut self, key: K, value: V) -> Option<V> {
        match self.locate(&key) {
            Ok(h) => Some(mem::replace(&mut self.node_mut(h).value, value)),
            Err((parent, side)) => {
                self.link_leaf(parent, side, key, value);
                None
            }
        }
    }

    /// Remove key and return its value. Nodes with two children swap
    /// in their in-order successor, which is unlinked instead.
    pub(crate) fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let h = self.find(key)?;
        let target = match (self.left(h), self.right(h)) {
            (Some(_), Some(right)) => self.leftmost(right),
            _ => h,
        };

        let (node, spliced) = self.splice(target);
        let value = if target == h {
            node.value
        } else {
            let dst = self.node_mut(h);
            dst.key = node.key;
            mem::replace(&mut dst.value, node.value)
        };

        P::after_delete(self, spliced);
        Some(value)
    }

    // unlink a node that has at most one child.
    fn splice(&mut self, target: Handle) -> (Node<K, V, P::Meta>, Spliced<P::Meta>) {
        let (parent, child) = {
            let node = self.node(target);
            if node.left.is_some() && node.right.is_some() {
                panic!("splice(): node has two children, call the programmer");
            }
            (node.parent, node.left.or(node.right))
        };
        let side = self.side_of(target);

        self.set_child(parent, side, child);
        if let Some(child) = child {
            self.node_mut(child).parent = parent;
        }

        let node = self.arena.take(target);
        let spliced = Spliced {
            parent,
            child,
            side,
            meta: node.meta,
        };
        (node, spliced)
    }

    /// Validate structure that is common to all policies:
    ///
    /// * Parent links point back to the owning node.
    /// * Keys are in sort order.
    ///
    /// Leaf depths are sampled into `stats`.
    pub(crate) fn validate(&self, stats: &mut Stats) -> Result<(), Error<K>>
    where
        K: Clone,
    {
        if let Some(root) = self.root {
            if self.parent(root).is_some() {
                return Err(Error::BrokenLink("root has a parent".to_string()));
            }
        }

        let mut depths = Depth::new();
        let mut count = 0;
        let mut stack: Vec<(Option<Handle>, usize)> = vec![(self.root, 0)];
        while let Some((node, depth)) = stack.pop() {
            let h = match node {
                Some(h) => h,
                None => {
                    depths.sample(depth);
                    continue;
                }
            };
            count += 1;
            for child in [self.left(h), self.right(h)].iter().flatten() {
                if self.parent(*child) != Some(h) {
                    let err = format!("{:?} -> {:?}", child, h);
                    return Err(Error::BrokenLink(err));
                }
            }
            stack.push((self.right(h), depth + 1));
            stack.push((self.left(h), depth + 1));
        }
        if count != self.len() {
            let err = format!("reachable: {} allocated: {}", count, self.len());
            return Err(Error::BrokenLink(err));
        }

        let mut prev: Option<&K> = None;
        for (key, _) in crate::iter::Iter::new(self) {
            if let Some(prev) = prev {
                if prev >= key {
                    return Err(Error::SortError(prev.clone(), key.clone()));
                }
            }
            prev = Some(key);
        }

        stats.set_depths(depths);
        stats.set_height(self.height());
        P::validate(self, stats)
    }
}

#[cfg(test)]
impl<K, V, P> Bst<K, V, P>
where
    K: Ord,
    P: Balance,
{
    pub(crate) fn root_key(&self) -> Option<&K> {
        self.root.map(|h| &self.node(h).key)
    }

    // (left-child-key, right-child-key) of the node holding `key`.
    pub(crate) fn children_of(&self, key: &K) -> Option<(Option<&K>, Option<&K>)> {
        let h = self.find(key)?;
        let key_of = |c: Option<Handle>| c.map(|c| &self.node(c).key);
        Some((key_of(self.left(h)), key_of(self.right(h))))
    }

    pub(crate) fn meta_of(&self, key: &K) -> Option<P::Meta> {
        self.find(key).map(|h| self.meta(h))
    }
}
