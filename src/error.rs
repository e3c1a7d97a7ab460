/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error<K> {
    /// Returned by min() and max() APIs when the index has no entries.
    #[error("index is empty")]
    EmptyTree,
    /// Fatal case, a red node has a red child.
    #[error("consecutive red nodes")]
    ConsecutiveReds,
    /// Fatal case, root of a red-black tree is red.
    #[error("root node is red")]
    RedRoot,
    /// Fatal case, left and right subtrees carry different black-heights.
    /// The String component of this variant can be used for debugging.
    #[error("unbalanced blacks: {0}")]
    UnbalancedBlacks(String),
    /// Fatal case, AVL balance-factor is outside {-1, 0, 1}.
    #[error("unbalanced height: {0}")]
    UnbalancedHeight(String),
    /// Fatal case, stored AVL height does not match the subtree.
    #[error("bad height: {0}")]
    BadHeight(String),
    /// Fatal case, parent link does not point back to the owning node.
    #[error("broken link: {0}")]
    BrokenLink(String),
    /// Fatal case, index entries are not in sort-order.
    #[error("sort error {0:?} {1:?}")]
    SortError(K, K),
}
