use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;

/// Number of element slots in every storage block.
pub const BLOCK_SIZE: usize = 32;

/// Block table growth factor; each expansion triples the table so that
/// repeated growth is geometric.
pub const GROWTH_FACTOR: usize = 3;

/// One fixed-size storage block: `BLOCK_SIZE` raw element slots.
///
/// A block owns its allocation but never the lifetimes of the elements
/// stored in it. Slots are raw, uninitialized memory; the deque decides
/// which of them hold live values and placement-writes/reads them through
/// [`as_ptr`](Block::as_ptr).
#[derive(Debug)]
pub struct Block<T> {
    ptr: NonNull<T>,
}

unsafe impl<T: Send> Send for Block<T> {}
unsafe impl<T: Sync> Sync for Block<T> {}

impl<T> Block<T> {
    pub fn alloc() -> Self {
        if mem::size_of::<T>() == 0 {
            return Block {
                ptr: NonNull::dangling(),
            };
        }

        let layout = Layout::array::<T>(BLOCK_SIZE).unwrap();
        let ptr = unsafe { alloc::alloc(layout) };

        match NonNull::new(ptr as *mut T) {
            Some(ptr) => Block { ptr },
            None => alloc::handle_alloc_error(layout),
        }
    }

    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> Drop for Block<T> {
    fn drop(&mut self) {
        // Frees the raw storage only; live elements must have been
        // dropped by the deque beforehand.
        if mem::size_of::<T>() != 0 {
            unsafe {
                alloc::dealloc(
                    self.ptr.as_ptr() as *mut u8,
                    Layout::array::<T>(BLOCK_SIZE).unwrap(),
                );
            }
        }
    }
}
