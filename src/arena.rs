use std::num::NonZeroU32;

/// Stable address of a node inside the [`Arena`]. Handles are plain
/// indices, they never keep a node alive. Stored off-by-one so that
/// `Option<Handle>` is as small as `Handle`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Handle(NonZeroU32);

impl Handle {
    pub(crate) const MAX: usize = (u32::MAX - 1) as usize;

    #[inline]
    pub(crate) fn from_index(index: usize) -> Handle {
        match NonZeroU32::new(index.wrapping_add(1) as u32) {
            Some(n) if index <= Self::MAX => Handle(n),
            _ => panic!("Handle::from_index(): index > Handle::MAX"),
        }
    }

    #[inline]
    pub(crate) fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

// Slot vector with a free-list, deleted slots are recycled by alloc().
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Arena<T> {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, item: T) -> Handle {
        match self.free.pop() {
            Some(h) => {
                self.slots[h.to_index()] = Some(item);
                h
            }
            None => {
                let h = Handle::from_index(self.slots.len());
                self.slots.push(Some(item));
                h
            }
        }
    }

    #[inline]
    pub(crate) fn get(&self, h: Handle) -> &T {
        match &self.slots[h.to_index()] {
            Some(item) => item,
            None => panic!("Arena::get(): stale handle {:?}, call the programmer", h),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, h: Handle) -> &mut T {
        match &mut self.slots[h.to_index()] {
            Some(item) => item,
            None => panic!("Arena::get_mut(): stale handle {:?}, call the programmer", h),
        }
    }

    pub(crate) fn take(&mut self, h: Handle) -> T {
        match self.slots[h.to_index()].take() {
            Some(item) => {
                self.free.push(h);
                item
            }
            None => panic!("Arena::take(): stale handle {:?}, call the programmer", h),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
