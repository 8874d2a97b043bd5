use crate::queue::{Link, Queue};
use crate::Element;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// An iterator over the values of a `Queue`, front to back.
///
/// This `struct` is created by [`Queue::iter()`]. See its
/// documentation for more.
#[derive(Clone)]
pub struct Iter<'a> {
    start: NonNull<Link>,
    end: NonNull<Link>,
    _marker: PhantomData<&'a Queue>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(queue: &'a Queue) -> Self {
        Self {
            start: queue.front_node(),
            end: queue.ghost_node(),
            _marker: PhantomData,
        }
    }
}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a queue,
        // and it is not empty here, so `start` is an element.
        let current = self.start;
        unsafe {
            self.start = current.as_ref().next;
            Some(Element::value_of(current))
        }
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a queue,
        // and it is not empty here, so `end.prev` is an element.
        unsafe {
            self.end = self.end.as_ref().prev;
            Some(Element::value_of(self.end))
        }
    }
}

impl FusedIterator for Iter<'_> {}

/// An owning iterator that removes the elements of a `Queue` front to back.
///
/// This `struct` is created by the [`into_iter`] method on [`Queue`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: Queue::into_iter
pub struct IntoIter {
    queue: Queue,
}

impl fmt::Debug for IntoIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("queue", &self.queue)
            .finish()
    }
}

impl Iterator for IntoIter {
    type Item = Box<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.remove_head(None)
    }

    #[cfg(feature = "length")]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.queue.remove_tail(None)
    }
}

#[cfg(feature = "length")]
impl ExactSizeIterator for IntoIter {}

impl FusedIterator for IntoIter {}

impl IntoIterator for Queue {
    type Item = Box<Element>;
    type IntoIter = IntoIter;

    /// Consumes the queue into an iterator yielding its elements by value.
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

unsafe impl Send for Iter<'_> {}

unsafe impl Sync for Iter<'_> {}
