/// Can be used while indexing keys without values, like ``Index<K, Empty>``.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub struct Empty {}
