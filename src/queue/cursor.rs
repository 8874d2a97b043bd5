use std::fmt;
use std::fmt::Formatter;
use std::ptr::NonNull;

use crate::queue::{Link, Queue};
use crate::Element;

/// A cursor over a `Queue`.
///
/// A `Cursor` is like an iterator, except that it can freely seek back-and-forth.
///
/// In a queue with length *n*, there are *n* + 1 valid locations for the cursor,
/// indexed by 0, 1, ..., *n*, where *n* is the ghost node of the queue.
///
/// # Examples
///
/// Here is a simple example showing how the cursors work. (The ghost node of the
/// queue is denoted by `#`).
/// ```
/// use cyclic_queue::Queue;
///
/// // Create a queue: [ A B C #]
/// let queue = Queue::from_iter(["A", "B", "C"]);
///
/// // Create a cursor at start: [|A B C #]
/// let mut cursor = queue.cursor_start();
/// assert_eq!(cursor.current(), Some("A"));
///
/// // Move cursor forward: [ A|B C #]
/// assert!(cursor.move_next().is_ok());
/// assert_eq!(cursor.current(), Some("B"));
/// assert_eq!(cursor.peek_next(), Some("C"));
///
/// // Create a cursor in the end: [ A B C|#]
/// let mut cursor = queue.cursor_end();
/// assert_eq!(cursor.current(), None);
/// assert!(cursor.move_next().is_err());
///
/// // Move cursor backward: [ A B|C #]
/// assert!(cursor.move_prev().is_ok());
/// assert_eq!(cursor.current(), Some("C"));
/// ```
#[derive(Clone)]
pub struct Cursor<'a> {
    pub(crate) current: NonNull<Link>,
    pub(crate) queue: &'a Queue,
}

/// A cursor over a `Queue` with editing operations.
///
/// A `CursorMut` is like an iterator, except that it can freely seek back-and-forth,
/// and can safely remove elements during iteration. Removing the element at the
/// cursor moves the cursor to the following node, so stepping back afterwards
/// reaches the former predecessor of the removed element.
pub struct CursorMut<'a> {
    pub(crate) current: NonNull<Link>,
    pub(crate) queue: &'a mut Queue,
}

macro_rules! impl_cursor {
    ($CURSOR:ident) => {
        // Private methods
        impl<'a> $CURSOR<'a> {
            pub(crate) fn is_ghost_node(&self) -> bool {
                self.current == self.queue.ghost_node()
            }
            pub(crate) fn is_front_node(&self) -> bool {
                self.prev_node() == self.queue.ghost_node()
            }
            pub(crate) fn next_node(&self) -> NonNull<Link> {
                // SAFETY: `current.next` is always valid since it is a cyclic list.
                unsafe { self.current.as_ref().next }
            }
            pub(crate) fn prev_node(&self) -> NonNull<Link> {
                // SAFETY: `current.prev` is always valid since it is a cyclic list.
                unsafe { self.current.as_ref().prev }
            }
        }

        impl<'a> $CURSOR<'a> {
            /// Returns `true` if the `Queue` is empty. See [`Queue::is_empty`].
            pub fn is_empty(&self) -> bool {
                self.queue.is_empty()
            }

            /// Move the cursor to the next position, where passing
            /// through the ghost node is allowed.
            ///
            /// This operation should compute in *O*(*1*) time.
            pub fn move_next_cyclic(&mut self) {
                self.current = self.next_node();
            }

            /// Move the cursor to the previous position, where passing
            /// through the ghost node is allowed.
            ///
            /// This operation should compute in *O*(*1*) time.
            pub fn move_prev_cyclic(&mut self) {
                self.current = self.prev_node();
            }

            /// Move the cursor to the next position, or return an error
            /// when passing through the ghost node is happened.
            ///
            /// This operation should compute in *O*(*1*) time.
            pub fn move_next(&mut self) -> Result<(), &'static str> {
                if !self.is_ghost_node() {
                    self.move_next_cyclic();
                    return Ok(());
                }
                Err("`move_next` across ghost boundary")
            }

            /// Move the cursor to the previous position, or return an error
            /// when passing through the ghost node is happened.
            ///
            /// This operation should compute in *O*(*1*) time.
            pub fn move_prev(&mut self) -> Result<(), &'static str> {
                if !self.is_empty() && !self.is_front_node() {
                    self.move_prev_cyclic();
                    return Ok(());
                }
                Err("`move_prev` across ghost boundary")
            }

            #[inline]
            pub fn move_to_start(&mut self) {
                self.current = self.queue.front_node();
            }

            #[inline]
            pub fn move_to_end(&mut self) {
                self.current = self.queue.ghost_node();
            }

            /// The value at the cursor, or `None` at the ghost node.
            pub fn current(&self) -> Option<&str> {
                if self.is_ghost_node() {
                    return None;
                }
                // SAFETY: it is safe because non-ghost nodes are always
                // links embedded in live elements.
                Some(unsafe { Element::value_of(self.current) })
            }

            /// The value before the cursor, or `None` at the first node.
            pub fn previous(&self) -> Option<&str> {
                if self.is_front_node() {
                    return None;
                }
                // SAFETY: it is safe because the previous node of a non-first node
                // is never a ghost node.
                Some(unsafe { Element::value_of(self.prev_node()) })
            }

            /// The value after the cursor, or `None` if the next node is the
            /// ghost node.
            pub fn peek_next(&self) -> Option<&str> {
                let next = self.next_node();
                if next == self.queue.ghost_node() {
                    return None;
                }
                // SAFETY: `next` is not the ghost node, so it is an element.
                Some(unsafe { Element::value_of(next) })
            }
        }

        impl<'a> fmt::Debug for $CURSOR<'a> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($CURSOR))
                    .field("queue", &self.queue)
                    .field("current", &self.current())
                    .finish()
            }
        }
    };
}

impl_cursor!(CursorMut);
impl_cursor!(Cursor);

impl<'a> Cursor<'a> {
    pub(crate) fn new(queue: &'a Queue, current: NonNull<Link>) -> Self {
        Self { current, queue }
    }
}

impl<'a> CursorMut<'a> {
    pub(crate) fn new(queue: &'a mut Queue, current: NonNull<Link>) -> Self {
        Self { current, queue }
    }

    pub fn as_cursor(&self) -> Cursor<'_> {
        Cursor::new(self.queue, self.current)
    }

    pub fn view(&self) -> &Queue {
        self.queue
    }

    /// Removes the element at the cursor and hands it to the caller, or
    /// returns `None` at the ghost node.
    ///
    /// The cursor moves to the node that followed the removed element.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c"]);
    /// let mut cursor = queue.cursor_start_mut();
    /// cursor.move_next().unwrap();
    ///
    /// assert_eq!(cursor.remove().unwrap().value(), "b");
    /// assert_eq!(cursor.current(), Some("c"));
    ///
    /// // stepping back reaches the former predecessor
    /// cursor.move_prev().unwrap();
    /// assert_eq!(cursor.current(), Some("a"));
    /// ```
    pub fn remove(&mut self) -> Option<Box<Element>> {
        if self.is_ghost_node() {
            return None;
        }
        let next = self.next_node();
        // SAFETY: `self.current` is a valid non-ghost node in the queue, so it is safe.
        let node = unsafe { self.queue.detach_node(self.current) };
        self.current = next;
        // SAFETY: `node` has just been unlinked and nothing refers to it anymore.
        Some(unsafe { Element::into_box(node) })
    }

    /// Removes the element before the cursor and hands it to the caller, or
    /// returns `None` at the first node. The cursor stays where it is.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c"]);
    /// let mut cursor = queue.cursor_end_mut();
    /// assert_eq!(cursor.backspace().unwrap().value(), "c");
    /// assert_eq!(cursor.backspace().unwrap().value(), "b");
    /// assert_eq!(cursor.previous(), Some("a"));
    /// ```
    pub fn backspace(&mut self) -> Option<Box<Element>> {
        self.move_prev().ok().and_then(|_| self.remove())
    }
}

unsafe impl Send for Cursor<'_> {}

unsafe impl Sync for Cursor<'_> {}

unsafe impl Send for CursorMut<'_> {}

unsafe impl Sync for CursorMut<'_> {}

#[cfg(test)]
mod tests {
    use crate::Queue;

    #[test]
    fn cursor_walk() {
        let queue = Queue::from_iter(["a", "b", "c"]);
        let mut cursor = queue.cursor_start();
        assert_eq!(cursor.previous(), None);
        assert!(cursor.move_prev().is_err());
        assert_eq!(cursor.current(), Some("a"));

        let mut seen = Vec::new();
        while let Some(value) = cursor.current() {
            seen.push(value.to_owned());
            cursor.move_next().unwrap();
        }
        assert_eq!(seen, ["a", "b", "c"]);
        assert_eq!(cursor.previous(), Some("c"));
        assert_eq!(cursor.peek_next(), Some("a"));
        assert!(cursor.move_next().is_err());

        cursor.move_next_cyclic();
        assert_eq!(cursor.current(), Some("a"));
        cursor.move_prev_cyclic();
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn cursor_empty_queue() {
        let mut queue = Queue::new();
        let mut cursor = queue.cursor_start_mut();
        assert!(cursor.is_empty());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.previous(), None);
        assert_eq!(cursor.peek_next(), None);
        assert!(cursor.move_next().is_err());
        assert!(cursor.move_prev().is_err());
        assert!(cursor.remove().is_none());
        assert!(cursor.backspace().is_none());
        queue.assert_well_formed();
    }

    #[test]
    fn cursor_remove_all() {
        let mut queue = Queue::from_iter(["a", "b", "c", "d"]);
        let mut cursor = queue.cursor_start_mut();
        cursor.move_next().unwrap();
        assert_eq!(cursor.remove().unwrap().value(), "b");
        assert_eq!(cursor.backspace().unwrap().value(), "a");
        assert_eq!(cursor.current(), Some("c"));
        assert_eq!(cursor.previous(), None);
        cursor.move_to_end();
        assert_eq!(cursor.backspace().unwrap().value(), "d");
        cursor.move_to_start();
        assert_eq!(cursor.remove().unwrap().value(), "c");
        assert!(cursor.is_empty());
        assert_eq!(format!("{:?}", cursor.as_cursor()), "Cursor { queue: [], current: None }");
        queue.assert_well_formed();
    }
}
