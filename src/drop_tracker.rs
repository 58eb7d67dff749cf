use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

/// Records the order in which wrapped values are dropped.
pub struct DropTracker<T> {
    log: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone> DropTracker<T> {
    pub fn new() -> Self {
        DropTracker {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn wrap(&self, value: T) -> Tracked<T> {
        Tracked {
            value,
            log: Rc::clone(&self.log),
        }
    }

    pub fn wrap_iter<'a, I>(&'a self, values: I) -> impl Iterator<Item = Tracked<T>> + 'a
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        values.into_iter().map(move |value| self.wrap(value))
    }

    /// Returns the values dropped since the previous call, in drop order.
    pub fn take_dropped(&self) -> Vec<T> {
        mem::take(&mut *self.log.borrow_mut())
    }
}

#[derive(Debug)]
pub struct Tracked<T: Clone> {
    value: T,
    log: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        Tracked {
            value: self.value.clone(),
            log: Rc::clone(&self.log),
        }
    }
}

impl<T: Clone> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.log.borrow_mut().push(self.value.clone());
    }
}

impl<T: Clone + PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Clone + Eq> Eq for Tracked<T> {}

impl<T: Clone + PartialEq> PartialEq<T> for Tracked<T> {
    fn eq(&self, other: &T) -> bool {
        self.value == *other
    }
}
