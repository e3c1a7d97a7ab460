//! Single rotations shared by all balancing policies. Rotations are
//! purely structural, callers fix up height or color afterwards.

use log::trace;

use crate::arena::Handle;
use crate::bst::{Balance, Bst};

impl<K, V, P> Bst<K, V, P>
where
    P: Balance,
{
    //              (i)                       (i)
    //               |                         |
    //             pivot                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left      x             pivot      xr
    //                   / \            /  \
    //                 xl   xr       left   xl
    //
    /// Rotate left at `pivot` and return the new subtree root. Pivot
    /// must have a right child.
    pub(crate) fn rotate_left(&mut self, pivot: Handle) -> Handle {
        let x = match self.right(pivot) {
            Some(x) => x,
            None => panic!("rotate_left(): {:?} has no right child, call the programmer", pivot),
        };
        let (parent, side) = (self.parent(pivot), self.side_of(pivot));

        let xl = self.left(x);
        self.node_mut(pivot).right = xl;
        if let Some(xl) = xl {
            self.node_mut(xl).parent = Some(pivot);
        }

        self.node_mut(x).left = Some(pivot);
        self.node_mut(pivot).parent = Some(x);
        self.node_mut(x).parent = parent;
        self.set_child(parent, side, Some(x));

        self.count_rotation();
        trace!("{}: rotate_left {:?} -> {:?}", P::NAME, pivot, x);
        x
    }

    //              (i)                       (i)
    //               |                         |
    //             pivot                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //           x      right             xl     pivot
    //          / \                              /  \
    //        xl   xr                          xr   right
    //
    /// Rotate right at `pivot` and return the new subtree root. Pivot
    /// must have a left child.
    pub(crate) fn rotate_right(&mut self, pivot: Handle) -> Handle {
        let x = match self.left(pivot) {
            Some(x) => x,
            None => panic!("rotate_right(): {:?} has no left child, call the programmer", pivot),
        };
        let (parent, side) = (self.parent(pivot), self.side_of(pivot));

        let xr = self.right(x);
        self.node_mut(pivot).left = xr;
        if let Some(xr) = xr {
            self.node_mut(xr).parent = Some(pivot);
        }

        self.node_mut(x).right = Some(pivot);
        self.node_mut(pivot).parent = Some(x);
        self.node_mut(x).parent = parent;
        self.set_child(parent, side, Some(x));

        self.count_rotation();
        trace!("{}: rotate_right {:?} -> {:?}", P::NAME, pivot, x);
        x
    }
}
