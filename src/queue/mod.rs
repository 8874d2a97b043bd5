use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::QueueError;
use crate::queue::cursor::{Cursor, CursorMut};
use crate::queue::element::try_alloc;
use crate::{Element, Iter};

pub mod cursor;
pub mod element;
pub mod iterator;

mod algorithms;

/// The `Queue` is a queue of owned strings, stored in an intrusive cyclic
/// doubly-linked list with a sentinel node.
///
/// Inserting or removing at either end takes constant time, and the list
/// algorithms ([`sort`], [`reverse_k_groups`], [`delete_duplicates`], ...)
/// rearrange the existing elements in place by relinking them, without
/// copying or reallocating their values.
///
/// The `Queue` contains:
/// - a pointer `ghost` to the sentinel node, which carries no value;
/// - a length field `len` caching the number of elements. It can be disabled
///   by disabling the `length` feature in your `Cargo.toml`:
/// ```text
/// [dependencies]
/// cyclic_queue = { default-features = false }
/// ```
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of list nodes, both inclusive;
/// - `start..end`: a half-open range of list nodes, left inclusive and right
///   exclusive (probably the ghost node).
///
/// [`sort`]: Queue::sort
/// [`reverse_k_groups`]: Queue::reverse_k_groups
/// [`delete_duplicates`]: Queue::delete_duplicates
pub struct Queue {
    ghost: NonNull<Link>,
    #[cfg(feature = "length")]
    /// the number of elements in the queue
    pub(crate) len: usize,
    _marker: PhantomData<Box<Element>>,
}

/// The link embedded in every element, and the whole of a sentinel.
///
/// Links never own what they point to. While a link is in a queue, both
/// `next` and `prev` point to nodes of that same queue.
#[repr(C)]
pub(crate) struct Link {
    pub(crate) next: NonNull<Link>,
    pub(crate) prev: NonNull<Link>,
}

/// Nodes fragment detached from a queue, used when splicing or when
/// moving nodes between queues.
///
/// When detached from a queue, reading of `front.prev` and `back.next`
/// is invalid.
pub(crate) struct DetachedNodes {
    pub(crate) front: NonNull<Link>,
    pub(crate) back: NonNull<Link>,
    pub(crate) len: usize,
}

pub(crate) unsafe fn connect(mut prev: NonNull<Link>, mut next: NonNull<Link>) {
    prev.as_mut().next = next;
    next.as_mut().prev = prev;
}

impl Link {
    pub(crate) fn dangling() -> Self {
        Self {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
        }
    }
}

// private methods
impl Queue {
    fn from_ghost(ghost: NonNull<Link>) -> Self {
        // SAFETY: `ghost` is a freshly allocated link that nothing else refers to.
        unsafe { connect(ghost, ghost) };
        Self {
            ghost,
            #[cfg(feature = "length")]
            len: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) fn ghost_node(&self) -> NonNull<Link> {
        self.ghost
    }
    pub(crate) fn front_node(&self) -> NonNull<Link> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the queue).
        unsafe { self.ghost.as_ref().next }
    }
    pub(crate) fn back_node(&self) -> NonNull<Link> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the queue).
        unsafe { self.ghost.as_ref().prev }
    }

    /// Detach a single node `node` from the queue.
    ///
    /// It is unsafe because it does not check whether `node` belongs to the queue,
    /// or whether it is the ghost node.
    ///
    /// The links of the returned node are stale and must not be followed.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Link>) -> NonNull<Link> {
        #[cfg(feature = "length")]
        {
            self.len -= 1;
        }
        connect(node.as_ref().prev, node.as_ref().next);
        node
    }

    /// Attach a single detached node `node` to the queue, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belongs
    /// to the queue, or whether the `prev` and `next` is adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Link>,
        next: NonNull<Link>,
        node: NonNull<Link>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, node);
        connect(node, next);
        #[cfg(feature = "length")]
        {
            self.len += 1;
        }
    }

    /// Detach a range of nodes `front..=back` holding `len` elements from the
    /// queue, and return the detached nodes.
    ///
    /// It is unsafe because it does not check whether `front..=back` is a valid
    /// range of the queue, or whether `len` is its real length.
    pub(crate) unsafe fn detach_nodes(
        &mut self,
        front: NonNull<Link>,
        back: NonNull<Link>,
        len: usize,
    ) -> DetachedNodes {
        #[cfg(feature = "length")]
        {
            self.len -= len;
        }
        connect(front.as_ref().prev, back.as_ref().next);
        DetachedNodes::new(front, back, len)
    }

    /// Attach a range of detached nodes to the queue, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belongs
    /// to the queue, or whether the `prev` and `next` is adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach_nodes(
        &mut self,
        prev: NonNull<Link>,
        next: NonNull<Link>,
        detached: DetachedNodes,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, detached.front);
        connect(detached.back, next);
        #[cfg(feature = "length")]
        {
            self.len += detached.len;
        }
    }

    /// Detach all nodes from the queue, and return the detached nodes, or return
    /// `None` if the queue is empty.
    ///
    /// It is safe because `self.front_node()..=self.back_node()` is a valid range.
    pub(crate) fn detach_all_nodes(&mut self) -> Option<DetachedNodes> {
        if self.is_empty() {
            return None;
        }
        let len = self.len();
        unsafe { Some(self.detach_nodes(self.front_node(), self.back_node(), len)) }
    }

    fn remove_node(&mut self, node: NonNull<Link>, buffer: Option<&mut [u8]>) -> Box<Element> {
        // SAFETY: callers only pass the front or back node of a non-empty queue.
        let element = unsafe { Element::into_box(self.detach_node(node)) };
        if let Some(buffer) = buffer {
            element.copy_into(buffer);
        }
        element
    }
}

impl Queue {
    /// Create an empty `Queue`
    ///
    /// Aborts if the sentinel cannot be allocated, like the std collections do.
    /// Use [`Queue::try_new`] to handle allocation failure.
    ///
    /// # Examples
    /// ```
    /// use cyclic_queue::Queue;
    /// let queue = Queue::new();
    /// assert!(queue.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        let ghost = NonNull::from(Box::leak(Box::new(Link::dangling())));
        Self::from_ghost(ghost)
    }

    /// Create an empty `Queue`, or report that the sentinel cannot be allocated.
    ///
    /// # Examples
    /// ```
    /// use cyclic_queue::Queue;
    /// let queue = Queue::try_new().expect("out of memory");
    /// assert_eq!(queue.size(), 0);
    /// ```
    pub fn try_new() -> Result<Self, QueueError> {
        let ghost = try_alloc(Link::dangling())?;
        Ok(Self::from_ghost(ghost))
    }

    /// Returns `true` if the `Queue` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// Returns `true` if the `Queue` holds exactly one element.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// assert!(!queue.is_singular());
    /// queue.push_back("one");
    /// assert!(queue.is_singular());
    /// queue.push_back("two");
    /// assert!(!queue.is_singular());
    /// ```
    #[inline]
    pub fn is_singular(&self) -> bool {
        !self.is_empty() && self.front_node() == self.back_node()
    }

    /// Returns the cached number of elements. Enabled by `feature = "length"`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[cfg(feature = "length")]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of elements, by walking the queue.
    #[cfg(not(feature = "length"))]
    #[inline]
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Counts the elements by walking from the sentinel back to the sentinel.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let queue = Queue::from_iter(["a", "b", "c"]);
    /// assert_eq!(queue.size(), 3);
    /// ```
    pub fn size(&self) -> usize {
        let count = self.iter().count();
        #[cfg(feature = "length")]
        debug_assert_eq!(count, self.len, "cached length out of sync");
        count
    }

    /// Removes and releases all elements of the `Queue`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    #[inline]
    pub fn clear(&mut self) {
        while self.remove_head(None).is_some() {}
    }

    /// Provides the value of the front element, or `None` if the queue is empty.
    #[inline]
    pub fn front(&self) -> Option<&str> {
        self.iter().next()
    }

    /// Provides the value of the back element, or `None` if the queue is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// assert_eq!(queue.back(), None);
    ///
    /// queue.push_back("cat");
    /// queue.push_back("dog");
    /// assert_eq!(queue.front(), Some("cat"));
    /// assert_eq!(queue.back(), Some("dog"));
    /// ```
    #[inline]
    pub fn back(&self) -> Option<&str> {
        self.iter().next_back()
    }

    /// Inserts a copy of `value` at the head of the queue.
    ///
    /// Both the element and its value are allocated fallibly. On failure the
    /// queue is left unchanged and nothing is leaked.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("b").unwrap();
    /// queue.insert_head("a").unwrap();
    /// assert_eq!(queue.front(), Some("a"));
    /// ```
    pub fn insert_head(&mut self, value: &str) -> Result<(), QueueError> {
        let node = Element::try_new_detached(value)?;
        // SAFETY: the ghost node and the front node are adjacent nodes of the queue.
        unsafe { self.attach_node(self.ghost_node(), self.front_node(), node) };
        Ok(())
    }

    /// Inserts a copy of `value` at the tail of the queue.
    ///
    /// Both the element and its value are allocated fallibly. On failure the
    /// queue is left unchanged and nothing is leaked.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("a").unwrap();
    /// queue.insert_tail("b").unwrap();
    /// assert_eq!(queue.back(), Some("b"));
    /// ```
    pub fn insert_tail(&mut self, value: &str) -> Result<(), QueueError> {
        let node = Element::try_new_detached(value)?;
        // SAFETY: the back node and the ghost node are adjacent nodes of the queue.
        unsafe { self.attach_node(self.back_node(), self.ghost_node(), node) };
        Ok(())
    }

    /// Adds an element first in the queue, aborting on allocation failure.
    pub fn push_front(&mut self, value: impl Into<String>) {
        let node = Element::new_detached(value.into());
        // SAFETY: the ghost node and the front node are adjacent nodes of the queue.
        unsafe { self.attach_node(self.ghost_node(), self.front_node(), node) };
    }

    /// Appends an element to the back of the queue, aborting on allocation failure.
    pub fn push_back(&mut self, value: impl Into<String>) {
        let node = Element::new_detached(value.into());
        // SAFETY: the back node and the ghost node are adjacent nodes of the queue.
        unsafe { self.attach_node(self.back_node(), self.ghost_node(), node) };
    }

    /// Unlinks the first element and hands it to the caller, or returns `None`
    /// if the queue is empty.
    ///
    /// If `buffer` is given, the value is also copied into it with
    /// [`Element::copy_into`], truncated to `buffer.len() - 1` bytes and
    /// null-terminated.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["hello", "world"]);
    /// let mut buffer = [0u8; 4];
    ///
    /// let element = queue.remove_head(Some(&mut buffer[..])).unwrap();
    /// assert_eq!(element.value(), "hello");
    /// assert_eq!(&buffer, b"hel\0");
    ///
    /// assert_eq!(queue.remove_head(None).unwrap().value(), "world");
    /// assert!(queue.remove_head(None).is_none());
    /// ```
    pub fn remove_head(&mut self, buffer: Option<&mut [u8]>) -> Option<Box<Element>> {
        if self.is_empty() {
            return None;
        }
        Some(self.remove_node(self.front_node(), buffer))
    }

    /// Unlinks the last element and hands it to the caller, or returns `None`
    /// if the queue is empty.
    ///
    /// The optional `buffer` is filled like in [`Queue::remove_head`].
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["hello", "world"]);
    /// let element = queue.remove_tail(None).unwrap();
    /// assert_eq!(element.into_value(), "world");
    /// assert_eq!(queue.size(), 1);
    /// ```
    pub fn remove_tail(&mut self, buffer: Option<&mut [u8]>) -> Option<Box<Element>> {
        if self.is_empty() {
            return None;
        }
        Some(self.remove_node(self.back_node(), buffer))
    }

    /// Moves all elements from `other` to the end of the queue.
    ///
    /// This reuses all the nodes from `other` and moves them into `self`. After
    /// this operation, `other` becomes empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time with the `length` feature,
    /// and in *O*(*n*) time without it.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut first = Queue::from_iter(["a"]);
    /// let mut second = Queue::from_iter(["b", "c"]);
    /// first.append(&mut second);
    ///
    /// assert!(second.is_empty());
    /// assert_eq!(first.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
    /// ```
    pub fn append(&mut self, other: &mut Self) {
        if let Some(detached) = other.detach_all_nodes() {
            // `self.back_node()` and `self.ghost_node()` are valid
            // nodes in the queue and they are adjacent, so it is safe.
            unsafe { self.attach_nodes(self.back_node(), self.ghost_node(), detached) }
        }
    }

    /// Provides a cursor at the first node.
    ///
    /// The cursor is pointing to the "ghost" node if the queue is empty.
    pub fn cursor_start(&self) -> Cursor<'_> {
        Cursor::new(self, self.front_node())
    }

    /// Provides a cursor at the ghost node.
    pub fn cursor_end(&self) -> Cursor<'_> {
        Cursor::new(self, self.ghost_node())
    }

    /// Provides a cursor with editing operations at the first node.
    ///
    /// The cursor is pointing to the "ghost" node if the queue is empty.
    pub fn cursor_start_mut(&mut self) -> CursorMut<'_> {
        let front = self.front_node();
        CursorMut::new(self, front)
    }

    /// Provides a cursor with editing operations at the ghost node.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_> {
        let ghost = self.ghost_node();
        CursorMut::new(self, ghost)
    }

    /// Provides a forward iterator over the values.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let queue = Queue::from_iter(["x", "y"]);
    /// let mut iter = queue.iter();
    /// assert_eq!(iter.next(), Some("x"));
    /// assert_eq!(iter.next(), Some("y"));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }
}

impl Debug for Queue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl DetachedNodes {
    /// It is unsafe because it must be guaranteed that `front..=back` is
    /// a valid range and its length is equal to `len`.
    pub(crate) unsafe fn new(front: NonNull<Link>, back: NonNull<Link>, len: usize) -> Self {
        debug_assert!(len > 0, "Cannot detach nodes of length 0");
        Self { front, back, len }
    }

    /// Take the front node out of the fragment, or `None` once it is exhausted.
    pub(crate) fn pop_front(&mut self) -> Option<NonNull<Link>> {
        if self.len == 0 {
            return None;
        }
        let node = self.front;
        self.len -= 1;
        if self.len > 0 {
            // SAFETY: `node` is not the back of the fragment, so its `next` is
            // still a node of the fragment.
            self.front = unsafe { node.as_ref().next };
        }
        Some(node)
    }

    /// The value held by the front node, or `None` once it is exhausted.
    pub(crate) fn front_value(&self) -> Option<&str> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: a non-empty fragment only holds element nodes.
        Some(unsafe { Element::value_of(self.front) })
    }
}

#[cfg(debug_assertions)]
fn assert_adjacent(prev: NonNull<Link>, next: NonNull<Link>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost was allocated for a single `Link` with the global
        // allocator, and no element refers to it after `clear`.
        unsafe { drop(Box::from_raw(self.ghost.as_ptr())) };
    }
}

// SAFETY: a queue exclusively owns its sentinel and every element reachable from it.
unsafe impl Send for Queue {}

// SAFETY: `&Queue` only reads links and values, every mutation needs `&mut Queue`.
unsafe impl Sync for Queue {}

#[cfg(test)]
impl Queue {
    /// Check the circularity invariant on every node and that the cached and
    /// walked sizes agree.
    pub(crate) fn assert_well_formed(&self) {
        let ghost = self.ghost_node();
        let mut node = ghost;
        let mut count = 0;
        loop {
            unsafe {
                let next = node.as_ref().next;
                assert_eq!(next.as_ref().prev, node, "next.prev must point back");
                assert_eq!(node.as_ref().prev.as_ref().next, node, "prev.next must point back");
                node = next;
            }
            if node == ghost {
                break;
            }
            count += 1;
        }
        assert_eq!(count, self.size());
        #[cfg(feature = "length")]
        assert_eq!(count, self.len);
    }
}

#[cfg(test)]
mod tests {
    use crate::Queue;

    fn values(queue: &Queue) -> Vec<&str> {
        queue.iter().collect()
    }

    #[test]
    fn queue_create() {
        let mut queue = Queue::new();
        assert!(queue.is_empty());
        assert!(!queue.is_singular());
        queue.assert_well_formed();

        queue.insert_tail("x").unwrap();
        assert!(!queue.is_empty());
        assert!(queue.is_singular());
        queue.assert_well_formed();

        let element = queue.remove_head(None).unwrap();
        assert_eq!(element.value(), "x");
        assert!(queue.is_empty());
        queue.assert_well_formed();

        let queue = Queue::try_new().unwrap();
        assert!(queue.is_empty());
        queue.assert_well_formed();
    }

    #[test]
    fn queue_insert_and_remove() {
        let mut queue = Queue::new();
        assert!(queue.remove_head(None).is_none());
        assert!(queue.remove_tail(None).is_none());

        queue.insert_head("b").unwrap();
        queue.insert_head("a").unwrap();
        queue.insert_tail("c").unwrap();
        queue.insert_tail("d").unwrap();
        queue.assert_well_formed();
        assert_eq!(values(&queue), ["a", "b", "c", "d"]);
        assert_eq!(queue.size(), 4);

        assert_eq!(queue.remove_tail(None).unwrap().value(), "d");
        assert_eq!(queue.remove_head(None).unwrap().value(), "a");
        queue.assert_well_formed();
        assert_eq!(values(&queue), ["b", "c"]);

        assert_eq!(queue.remove_tail(None).unwrap().value(), "c");
        assert_eq!(queue.remove_tail(None).unwrap().value(), "b");
        assert!(queue.remove_tail(None).is_none());
        assert!(queue.is_empty());
        queue.assert_well_formed();
    }

    #[test]
    fn queue_remove_into_buffer() {
        let mut queue = Queue::from_iter(["penguin", "ox"]);
        let mut buffer = [0xffu8; 5];

        let element = queue.remove_head(Some(&mut buffer[..])).unwrap();
        assert_eq!(element.value(), "penguin");
        assert_eq!(&buffer, b"peng\0");

        let element = queue.remove_tail(Some(&mut buffer[..])).unwrap();
        assert_eq!(element.value(), "ox");
        assert_eq!(&buffer[..3], b"ox\0");

        // an empty queue leaves the buffer alone
        let mut untouched = [7u8; 3];
        assert!(queue.remove_head(Some(&mut untouched[..])).is_none());
        assert_eq!(untouched, [7, 7, 7]);
    }

    #[test]
    fn queue_size_and_clear() {
        let mut queue = Queue::from_iter(["a", "b", "c", "d", "e"]);
        assert_eq!(queue.size(), 5);
        assert_eq!(queue.len(), 5);
        queue.clear();
        assert_eq!(queue.size(), 0);
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.front(), None);
        assert_eq!(queue.back(), None);
        queue.assert_well_formed();
    }

    #[test]
    fn queue_append() {
        let mut first = Queue::from_iter(["a", "b"]);
        let mut second = Queue::from_iter(["c"]);
        first.append(&mut second);
        first.assert_well_formed();
        second.assert_well_formed();
        assert_eq!(values(&first), ["a", "b", "c"]);
        assert!(second.is_empty());

        let mut empty = Queue::new();
        first.append(&mut empty);
        assert_eq!(first.size(), 3);
        empty.append(&mut first);
        assert_eq!(values(&empty), ["a", "b", "c"]);
        assert!(first.is_empty());
    }

    #[test]
    fn queue_debug() {
        let queue = Queue::from_iter(["a", "b"]);
        assert_eq!(format!("{:?}", queue), r#"["a", "b"]"#);
    }
}
