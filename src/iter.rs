use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::ptr;

use crate::block::{Block, BLOCK_SIZE};
use crate::BlockDeque;

/// Resolves a global slot index to an element address through the block
/// table: block `index / BLOCK_SIZE`, offset `index % BLOCK_SIZE`.
///
/// # Safety
///
/// `table` must point to a live block table whose capacity covers `index`.
unsafe fn slot<T>(table: *const Block<T>, index: usize) -> *mut T {
    (*table.add(index / BLOCK_SIZE))
        .as_ptr()
        .add(index % BLOCK_SIZE)
}

/// An immutable random-access cursor over a [`BlockDeque`].
///
/// This `struct` is created by [`BlockDeque::iter`]. Besides the usual
/// [`Iterator`] contract (with reverse iteration via [`rev`]), it supports
/// random-access arithmetic: `+`/`-` and `+=`/`-=` with a `usize` offset
/// advance the cursor in O(1), and subtracting two cursors yields their
/// signed distance.
///
/// A cursor is a (block table, global slot index) pair. It borrows the
/// deque, so any mutation of the deque (including growth, which moves the
/// block table) statically ends every outstanding cursor's lifetime.
/// Comparing or subtracting cursors obtained from different deques is
/// meaningless.
///
/// [`rev`]: Iterator::rev
pub struct Iter<'a, T> {
    table: *const Block<T>,
    head: usize,
    tail: usize,
    marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(table: *const Block<T>, head: usize, tail: usize) -> Self {
        Iter {
            table,
            head,
            tail,
            marker: PhantomData,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.head == self.tail {
            None
        } else {
            let item = unsafe { &*slot(self.table, self.head) };
            self.head += 1;
            Some(item)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.tail - self.head;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        if n >= self.tail - self.head {
            self.head = self.tail;
            None
        } else {
            self.head += n;
            self.next()
        }
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.head == self.tail {
            None
        } else {
            self.tail -= 1;
            Some(unsafe { &*slot(self.table, self.tail) })
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> Add<usize> for Iter<'a, T> {
    type Output = Iter<'a, T>;

    fn add(mut self, offset: usize) -> Iter<'a, T> {
        self += offset;
        self
    }
}

impl<T> AddAssign<usize> for Iter<'_, T> {
    fn add_assign(&mut self, offset: usize) {
        debug_assert!(offset <= self.tail - self.head);
        self.head += offset;
    }
}

impl<'a, T> Sub<usize> for Iter<'a, T> {
    type Output = Iter<'a, T>;

    fn sub(mut self, offset: usize) -> Iter<'a, T> {
        self -= offset;
        self
    }
}

impl<T> SubAssign<usize> for Iter<'_, T> {
    fn sub_assign(&mut self, offset: usize) {
        self.head -= offset;
    }
}

impl<'a, T> Sub<Iter<'a, T>> for Iter<'a, T> {
    type Output = isize;

    /// Signed distance between two cursors over the same deque.
    fn sub(self, other: Iter<'a, T>) -> isize {
        debug_assert!(ptr::eq(self.table, other.table));
        self.head as isize - other.head as isize
    }
}

impl<T> PartialEq for Iter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head
    }
}

impl<T> Eq for Iter<'_, T> {}

impl<T> PartialOrd for Iter<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Iter<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.head.cmp(&other.head)
    }
}

/// A mutable random-access cursor over a [`BlockDeque`].
///
/// This `struct` is created by [`BlockDeque::iter_mut`]. It supports the
/// same iteration and arithmetic contract as [`Iter`], yielding mutable
/// references.
pub struct IterMut<'a, T> {
    table: *mut Block<T>,
    head: usize,
    tail: usize,
    marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(table: *mut Block<T>, head: usize, tail: usize) -> Self {
        IterMut {
            table,
            head,
            tail,
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.head == self.tail {
            None
        } else {
            let item = unsafe { &mut *slot(self.table, self.head) };
            self.head += 1;
            Some(item)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.tail - self.head;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<&'a mut T> {
        if n >= self.tail - self.head {
            self.head = self.tail;
            None
        } else {
            self.head += n;
            self.next()
        }
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.head == self.tail {
            None
        } else {
            self.tail -= 1;
            Some(unsafe { &mut *slot(self.table, self.tail) })
        }
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

impl<'a, T> Add<usize> for IterMut<'a, T> {
    type Output = IterMut<'a, T>;

    fn add(mut self, offset: usize) -> IterMut<'a, T> {
        self += offset;
        self
    }
}

impl<T> AddAssign<usize> for IterMut<'_, T> {
    fn add_assign(&mut self, offset: usize) {
        debug_assert!(offset <= self.tail - self.head);
        self.head += offset;
    }
}

impl<'a, T> Sub<usize> for IterMut<'a, T> {
    type Output = IterMut<'a, T>;

    fn sub(mut self, offset: usize) -> IterMut<'a, T> {
        self -= offset;
        self
    }
}

impl<T> SubAssign<usize> for IterMut<'_, T> {
    fn sub_assign(&mut self, offset: usize) {
        self.head -= offset;
    }
}

impl<'a, T> Sub<IterMut<'a, T>> for IterMut<'a, T> {
    type Output = isize;

    /// Signed distance between two cursors over the same deque.
    fn sub(self, other: IterMut<'a, T>) -> isize {
        debug_assert!(ptr::eq(self.table, other.table));
        self.head as isize - other.head as isize
    }
}

impl<T> PartialEq for IterMut<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head
    }
}

impl<T> Eq for IterMut<'_, T> {}

impl<T> PartialOrd for IterMut<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for IterMut<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.head.cmp(&other.head)
    }
}

/// An owning iterator over the elements of a `BlockDeque`.
///
/// This `struct` is created by the [`into_iter`] method on [`BlockDeque`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: BlockDeque::into_iter
/// [`IntoIterator`]: core::iter::IntoIterator
pub struct IntoIter<T> {
    deque: BlockDeque<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(deque: BlockDeque<T>) -> Self {
        IntoIter { deque }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.deque.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.deque.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
