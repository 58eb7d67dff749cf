#![warn(missing_docs)]
#![doc(test(attr(deny(warnings))))]

//! A double-ended queue backed by fixed-size storage blocks.
//!
//! # [`BlockDeque`] vs [`VecDeque`]
//!
//! ## Storage
//!
//! The standard [`VecDeque`] uses a ring buffer: one contiguous allocation
//! that is reallocated on growth, moving every element.
//!
//! The [`BlockDeque`] provided by this lib stores its elements in
//! fixed-size blocks reached through a table of block handles. A logical
//! index is translated to a (block, offset) pair with one division and one
//! modulo, so random access stays O(1).
//!
//! ## Growth
//!
//! When a push runs out of room, only the block table is reallocated: the
//! existing blocks are moved by handle into the middle of a larger table
//! and fresh blocks fill the rest. No element is ever moved in memory, so
//! growth costs O(blocks) rather than O(elements), and references taken
//! before a growth keep pointing at the same addresses.
//!
//! The price is that the content is never contiguous, so a `BlockDeque`
//! cannot be coerced into a slice.
//!
//! [`VecDeque`]: std::collections::VecDeque

use std::fmt;
use std::hash::Hash;
use std::mem;
use std::ops::{Index, IndexMut};
use std::ptr;

use block::{Block, BLOCK_SIZE, GROWTH_FACTOR};

mod block;
mod iter;

#[cfg(test)]
mod drop_tracker;

pub use iter::{IntoIter, Iter, IterMut};

/// A double-ended queue implemented with a table of fixed-size storage
/// blocks.
///
/// A `BlockDeque` with a known list of items can be initialized from an
/// array:
///
/// ```
/// use block_deque::BlockDeque;
///
/// # #[allow(unused)]
/// let deq = BlockDeque::from([-1, 0, 1]);
/// ```
///
/// Pushing at either end is amortized O(1) and indexing is O(1). Elements
/// never move in memory once pushed: growth relocates block handles, not
/// elements.
pub struct BlockDeque<T> {
    table: Vec<Block<T>>,
    first: usize,
    len: usize,
}

impl<T> BlockDeque<T> {
    /// Creates an empty deque with a single storage block.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    /// # #[allow(unused)]
    /// let deque: BlockDeque<u32> = BlockDeque::new();
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty deque with room for at least `capacity` elements
    /// pushed at the back before the first table growth.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let deque: BlockDeque<u32> = BlockDeque::with_capacity(100);
    /// assert_eq!(deque.len(), 0);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let blocks = capacity / BLOCK_SIZE + 1;
        BlockDeque {
            table: (0..blocks).map(|_| Block::alloc()).collect(),
            first: 0,
            len: 0,
        }
    }

    /// Creates a deque holding `n` default values.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let deque: BlockDeque<i32> = BlockDeque::from_default(3);
    /// assert_eq!(deque, [0, 0, 0]);
    /// ```
    pub fn from_default(n: usize) -> Self
    where
        T: Default,
    {
        let mut deque = Self::with_capacity(n);
        for _ in 0..n {
            deque.push_back(T::default());
        }
        deque
    }

    /// Creates a deque holding `n` clones of `value`.
    ///
    /// If a clone panics mid-fill, the elements already constructed are
    /// dropped before the panic propagates.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let deque = BlockDeque::from_elem('x', 4);
    /// assert_eq!(deque, ['x', 'x', 'x', 'x']);
    /// ```
    pub fn from_elem(value: T, n: usize) -> Self
    where
        T: Clone,
    {
        let mut deque = Self::with_capacity(n);
        for _ in 0..n {
            deque.push_back(value.clone());
        }
        deque
    }

    /// Returns the number of elements in the deque.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let deque = BlockDeque::from([1, 2, 3]);
    /// assert_eq!(deque.len(), 3);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the deque holds no elements.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut deque = BlockDeque::new();
    /// assert!(deque.is_empty());
    /// deque.push_back(1);
    /// assert!(!deque.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Provides a reference to the element at `index`, or `None` if the
    /// index is out of bounds.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let deque = BlockDeque::from([1, 2, 3]);
    /// assert_eq!(deque.get(1), Some(&2));
    /// assert_eq!(deque.get(3), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(unsafe { &*self.slot(self.first + index) })
        } else {
            None
        }
    }

    /// Provides a mutable reference to the element at `index`, or `None`
    /// if the index is out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut deque = BlockDeque::from([1, 2, 3]);
    /// if let Some(elem) = deque.get_mut(1) {
    ///     *elem = 9;
    /// }
    /// assert_eq!(deque, [1, 9, 3]);
    /// ```
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            Some(unsafe { &mut *self.slot(self.first + index) })
        } else {
            None
        }
    }

    /// Provides a reference to the front element, or `None` if the deque
    /// is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut d = BlockDeque::new();
    /// assert_eq!(d.front(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// assert_eq!(d.front(), Some(&1));
    /// ```
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Provides a mutable reference to the front element, or `None` if the
    /// deque is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut d = BlockDeque::from([1, 2]);
    /// if let Some(x) = d.front_mut() {
    ///     *x = 9;
    /// }
    /// assert_eq!(d.front(), Some(&9));
    /// ```
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Provides a reference to the back element, or `None` if the deque is
    /// empty.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut d = BlockDeque::new();
    /// assert_eq!(d.back(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// assert_eq!(d.back(), Some(&2));
    /// ```
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Provides a mutable reference to the back element, or `None` if the
    /// deque is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut d = BlockDeque::from([1, 2]);
    /// if let Some(x) = d.back_mut() {
    ///     *x = 9;
    /// }
    /// assert_eq!(d.back(), Some(&9));
    /// ```
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.len
            .checked_sub(1)
            .and_then(move |index| self.get_mut(index))
    }

    /// Appends an element to the back of the deque.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// buf.push_back(1);
    /// buf.push_back(3);
    /// assert_eq!(3, *buf.back().unwrap());
    /// ```
    pub fn push_back(&mut self, elem: T) {
        if self.first + self.len == self.capacity_slots() {
            self.expand();
        }
        unsafe {
            ptr::write(self.slot(self.first + self.len), elem);
        }
        self.len += 1;
    }

    /// Prepends an element to the deque.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut d = BlockDeque::new();
    /// d.push_front(1);
    /// d.push_front(2);
    /// assert_eq!(d.front(), Some(&2));
    /// ```
    pub fn push_front(&mut self, elem: T) {
        if self.first == 0 {
            self.expand();
        }
        self.first -= 1;
        unsafe {
            ptr::write(self.slot(self.first), elem);
        }
        self.len += 1;
    }

    /// Removes the last element from the deque and returns it, or `None`
    /// if it is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::new();
    /// assert_eq!(buf.pop_back(), None);
    /// buf.push_back(1);
    /// buf.push_back(3);
    /// assert_eq!(buf.pop_back(), Some(3));
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(unsafe { ptr::read(self.slot(self.first + self.len)) })
        }
    }

    /// Removes the first element and returns it, or `None` if the deque is
    /// empty.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut d = BlockDeque::new();
    /// d.push_back(1);
    /// d.push_back(2);
    ///
    /// assert_eq!(d.pop_front(), Some(1));
    /// assert_eq!(d.pop_front(), Some(2));
    /// assert_eq!(d.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            self.first += 1;
            Some(unsafe { ptr::read(self.slot(self.first - 1)) })
        }
    }

    /// Inserts an element at `index` within the deque, shifting the
    /// elements with indices `index..len` one position toward the back.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than deque's length.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut deque = BlockDeque::from(['a', 'b', 'c']);
    ///
    /// deque.insert(1, 'd');
    /// assert_eq!(deque, ['a', 'd', 'b', 'c']);
    /// ```
    pub fn insert(&mut self, index: usize, elem: T) {
        assert!(index <= self.len, "index out of bounds");

        if self.first + self.len == self.capacity_slots() {
            self.expand();
        }
        let target = self.first + index;
        let mut slot = self.first + self.len;
        while slot > target {
            unsafe {
                ptr::copy_nonoverlapping(self.slot(slot - 1), self.slot(slot), 1);
            }
            slot -= 1;
        }
        unsafe {
            ptr::write(self.slot(target), elem);
        }
        self.len += 1;
    }

    /// Removes and returns the element at `index` from the deque, shifting
    /// the elements after it one position toward the front. Returns `None`
    /// if `index` is out of bounds.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut buf = BlockDeque::from([1, 2, 3]);
    ///
    /// assert_eq!(buf.remove(1), Some(2));
    /// assert_eq!(buf, [1, 3]);
    /// ```
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }

        let target = self.first + index;
        let removed = unsafe { ptr::read(self.slot(target)) };
        for slot in target..self.first + self.len - 1 {
            unsafe {
                ptr::copy_nonoverlapping(self.slot(slot + 1), self.slot(slot), 1);
            }
        }
        self.len -= 1;
        Some(removed)
    }

    /// Clears the deque, removing all values.
    ///
    /// The allocated blocks are kept, and the window is recentered in the
    /// table.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut deque = BlockDeque::new();
    /// deque.push_back(1);
    /// deque.clear();
    /// assert!(deque.is_empty());
    /// ```
    pub fn clear(&mut self) {
        while self.pop_back().is_some() {}
        self.first = self.capacity_slots() / 2;
    }

    /// Returns a cursor over the elements, front to back.
    ///
    /// The cursor supports random-access arithmetic; see [`Iter`].
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let deque = BlockDeque::from([1, 2, 3]);
    /// let mut iter = deque.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!((iter + 1).next(), Some(&3));
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.table.as_ptr(), self.first, self.first + self.len)
    }

    /// Returns a cursor over the elements, front to back, yielding mutable
    /// references.
    ///
    /// # Example
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let mut deque = BlockDeque::from([1, 2, 3]);
    /// for elem in deque.iter_mut() {
    ///     *elem *= 10;
    /// }
    /// assert_eq!(deque, [10, 20, 30]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.table.as_mut_ptr(), self.first, self.first + self.len)
    }

    /// Element address for a global slot index.
    ///
    /// The index must be within the table's capacity; the slot it names
    /// may hold uninitialized storage.
    fn slot(&self, index: usize) -> *mut T {
        let block = &self.table[index / BLOCK_SIZE];
        unsafe { block.as_ptr().add(index % BLOCK_SIZE) }
    }

    fn capacity_slots(&self) -> usize {
        BLOCK_SIZE * self.table.len()
    }

    /// Replaces the block table with one `GROWTH_FACTOR` times larger.
    ///
    /// The old blocks move by handle into the middle of the new table and
    /// `first` shifts by the slot count of the old table, so every element
    /// keeps its block and offset. Elements are not touched.
    fn expand(&mut self) {
        let old_blocks = self.table.len();
        let new_blocks = GROWTH_FACTOR * old_blocks;

        let mut table = Vec::with_capacity(new_blocks);
        table.extend((0..old_blocks).map(|_| Block::alloc()));
        table.append(&mut self.table);
        table.extend((0..new_blocks - 2 * old_blocks).map(|_| Block::alloc()));

        self.table = table;
        self.first += BLOCK_SIZE * old_blocks;
    }
}

impl<T> Default for BlockDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for BlockDeque<T> {
    fn drop(&mut self) {
        while self.pop_back().is_some() {}
    }
}

impl<T: Clone> Clone for BlockDeque<T> {
    fn clone(&self) -> Self {
        let mut clone = BlockDeque {
            table: (0..self.table.len()).map(|_| Block::alloc()).collect(),
            first: self.first,
            len: 0,
        };
        for index in 0..self.len {
            unsafe {
                ptr::write(clone.slot(clone.first + index), self[index].clone());
            }
            clone.len += 1;
        }
        clone
    }

    /// Copy-and-swap: the full copy is built first, so a panicking element
    /// clone leaves `self` untouched.
    fn clone_from(&mut self, source: &Self) {
        let mut clone = source.clone();
        mem::swap(self, &mut clone);
    }
}

impl<T> Index<usize> for BlockDeque<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(elem) => elem,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len, index
            ),
        }
    }
}

impl<T> IndexMut<usize> for BlockDeque<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(elem) => elem,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                len, index
            ),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BlockDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a BlockDeque<T> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut BlockDeque<T> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for BlockDeque<T> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

macro_rules! impl_partial_eq {
    ([$($n:tt)*] $rhs:ty) => {
        impl<T, U, $($n)*> PartialEq<$rhs> for BlockDeque<T>
        where
            T: PartialEq<U>,
        {
            fn eq(&self, other: & $rhs) -> bool {
                self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
            }
        }
    };
}

impl_partial_eq!([const N: usize] [U; N]);
impl_partial_eq!([const N: usize] &[U; N]);
impl_partial_eq!([const N: usize] &mut [U; N]);
impl_partial_eq!([] & [U]);
impl_partial_eq!([] &mut [U]);
impl_partial_eq!([] Vec<U>);
impl_partial_eq!([] BlockDeque<U>);

impl<T: Eq> Eq for BlockDeque<T> {}

impl<T: PartialOrd> PartialOrd for BlockDeque<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for BlockDeque<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for BlockDeque<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for elem in self {
            elem.hash(state);
        }
    }
}

impl<T, const N: usize> From<[T; N]> for BlockDeque<T> {
    /// Converts a `[T; N]` into a `BlockDeque<T>`.
    ///
    /// ```
    /// use block_deque::BlockDeque;
    ///
    /// let deq = BlockDeque::from([1, 2, 3, 4]);
    /// assert_eq!(deq, [1, 2, 3, 4]);
    /// ```
    fn from(value: [T; N]) -> Self {
        Self::from_iter(value)
    }
}

impl<T> From<Vec<T>> for BlockDeque<T> {
    /// Turn a [`Vec<T>`] into a [`BlockDeque<T>`].
    fn from(value: Vec<T>) -> Self {
        Self::from_iter(value)
    }
}

impl<T> FromIterator<T> for BlockDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, upper) = iter.size_hint();
        let mut deque = Self::with_capacity(upper.unwrap_or(lower));
        for elem in iter {
            deque.push_back(elem);
        }
        deque
    }
}

impl<T> Extend<T> for BlockDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.push_back(elem);
        }
    }
}
