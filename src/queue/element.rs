use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

use crate::error::QueueError;
use crate::queue::Link;

/// A queue element: an owned string value with an embedded link.
///
/// The link is the first field of a `#[repr(C)]` record, so a pointer to the
/// link of an element is also a pointer to the element itself. A queue only
/// ever stores link pointers and casts them back to elements.
///
/// Elements removed from a queue are handed to the caller as `Box<Element>`.
/// The links of a removed element are stale and are never read again.
#[repr(C)]
pub struct Element {
    pub(crate) link: Link,
    value: String,
}

impl Element {
    fn with_value(value: String) -> Self {
        Self {
            link: Link::dangling(),
            value,
        }
    }

    /// Allocate a detached element holding a copy of `value`.
    ///
    /// Both the value buffer and the element record are allocated fallibly.
    /// If the record cannot be allocated, the value buffer is released before
    /// returning the error.
    pub(crate) fn try_new_detached(value: &str) -> Result<NonNull<Link>, QueueError> {
        let mut owned = String::new();
        owned.try_reserve_exact(value.len())?;
        owned.push_str(value);
        let element = try_alloc(Element::with_value(owned))?;
        Ok(element.cast())
    }

    /// Allocate a detached element, aborting on allocation failure.
    pub(crate) fn new_detached(value: String) -> NonNull<Link> {
        let element = Box::new(Element::with_value(value));
        NonNull::from(Box::leak(element)).cast()
    }

    /// Recover the element that embeds `link`.
    ///
    /// It is unsafe because `link` must be the link of a live element, not
    /// the sentinel of a queue.
    pub(crate) unsafe fn from_link(link: NonNull<Link>) -> NonNull<Element> {
        link.cast()
    }

    /// Borrow the value of the element that embeds `link`.
    ///
    /// It is unsafe for the same reason as [`Element::from_link`], and the
    /// returned reference must not outlive the element.
    pub(crate) unsafe fn value_of<'a>(link: NonNull<Link>) -> &'a str {
        &(*Self::from_link(link).as_ptr()).value
    }

    /// Take back ownership of an element that was unlinked from its queue.
    ///
    /// It is unsafe because `link` must belong to an element that is no longer
    /// reachable from any queue.
    pub(crate) unsafe fn into_box(link: NonNull<Link>) -> Box<Element> {
        Box::from_raw(Self::from_link(link).as_ptr())
    }

    /// Returns the value of the element.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("apple").unwrap();
    /// let element = queue.remove_head(None).unwrap();
    /// assert_eq!(element.value(), "apple");
    /// ```
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the element and returns its value.
    #[inline]
    pub fn into_value(self: Box<Self>) -> String {
        let Element { value, .. } = *self;
        value
    }

    /// Copies the value into `buffer` as a null-terminated byte string.
    ///
    /// At most `buffer.len() - 1` bytes of the value are copied, followed by
    /// a `0` byte. Longer values are truncated silently. An empty buffer is
    /// left untouched. Returns the number of value bytes copied.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("gerbil").unwrap();
    /// let element = queue.remove_head(None).unwrap();
    ///
    /// let mut buffer = [0xffu8; 4];
    /// assert_eq!(element.copy_into(&mut buffer), 3);
    /// assert_eq!(&buffer, b"ger\0");
    /// ```
    pub fn copy_into(&self, buffer: &mut [u8]) -> usize {
        let capacity = match buffer.len().checked_sub(1) {
            Some(capacity) => capacity,
            None => return 0,
        };
        let copied = self.value.len().min(capacity);
        buffer[..copied].copy_from_slice(&self.value.as_bytes()[..copied]);
        buffer[copied] = 0;
        copied
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.value).finish()
    }
}

// SAFETY: the links of an element are only followed by the queue that owns
// it. Once handed out, an element is a plain owned string.
unsafe impl Send for Element {}

// SAFETY: `&Element` only exposes the value as `&str`, and never follows the links.
unsafe impl Sync for Element {}

/// Move `value` into a freshly allocated heap slot, or report exhaustion.
///
/// The slot is allocated with `Layout::new::<T>()` from the global allocator,
/// so it can be released with `Box::from_raw`.
pub(crate) fn try_alloc<T>(value: T) -> Result<NonNull<T>, QueueError> {
    let layout = Layout::new::<T>();
    debug_assert!(layout.size() > 0, "zero-sized slots are never allocated");
    // SAFETY: `layout` has a non-zero size, both `Link` and `Element` contain
    // pointers.
    let ptr = unsafe { alloc::alloc(layout) }.cast::<T>();
    let ptr = NonNull::new(ptr).ok_or_else(QueueError::allocation::<T>)?;
    // SAFETY: `ptr` is freshly allocated, properly aligned for `T` and not
    // yet initialized.
    unsafe { ptr.as_ptr().write(value) };
    Ok(ptr)
}

#[cfg(test)]
mod tests {
    use super::Element;

    #[test]
    fn element_owns_a_copy() {
        let source = String::from("bear");
        let link = Element::try_new_detached(&source).unwrap();
        drop(source);
        let element = unsafe { Element::into_box(link) };
        assert_eq!(element.value(), "bear");
        assert_eq!(element.into_value(), "bear");
    }

    #[test]
    fn copy_into_truncates_and_terminates() {
        let element = unsafe { Element::into_box(Element::new_detached("dolphin".into())) };

        let mut exact = [0xffu8; 8];
        assert_eq!(element.copy_into(&mut exact), 7);
        assert_eq!(&exact, b"dolphin\0");

        let mut roomy = [0xffu8; 10];
        assert_eq!(element.copy_into(&mut roomy), 7);
        assert_eq!(&roomy[..8], b"dolphin\0");
        assert_eq!(&roomy[8..], &[0xff, 0xff]);

        let mut short = [0xffu8; 3];
        assert_eq!(element.copy_into(&mut short), 2);
        assert_eq!(&short, b"do\0");

        let mut single = [0xffu8; 1];
        assert_eq!(element.copy_into(&mut single), 0);
        assert_eq!(&single, b"\0");

        let mut empty: [u8; 0] = [];
        assert_eq!(element.copy_into(&mut empty), 0);
    }

    #[test]
    fn empty_value() {
        let element = unsafe { Element::into_box(Element::try_new_detached("").unwrap()) };
        assert_eq!(element.value(), "");
        let mut buffer = [0xffu8; 2];
        assert_eq!(element.copy_into(&mut buffer), 0);
        assert_eq!(buffer[0], 0);
    }
}
