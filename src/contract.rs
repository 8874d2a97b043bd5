//! The procedural operation contract consumed by drivers such as test
//! harnesses, fuzzers or command interpreters.
//!
//! Drivers may hand in absent queues, absent values or out-of-range group
//! sizes. Every function here treats those as a no-op and reports failure
//! through its return value (`false`, `None` or `0`), never by panicking. The
//! queue is left exactly as it was whenever an operation fails.
//!
//! # Examples
//!
//! ```
//! use cyclic_queue::contract;
//!
//! let mut queue = contract::new();
//! assert!(contract::insert_tail(queue.as_mut(), Some("x")));
//!
//! let mut buffer = [0u8; 8];
//! let element = contract::remove_head(queue.as_mut(), Some(&mut buffer[..]));
//! assert_eq!(element.map(|e| e.into_value()), Some("x".to_owned()));
//! assert_eq!(&buffer[..2], b"x\0");
//! assert_eq!(contract::size(queue.as_ref()), 0);
//!
//! // absent queues are rejected without side effects
//! assert!(!contract::insert_head(None, Some("y")));
//! assert_eq!(contract::size(None), 0);
//!
//! contract::teardown(queue);
//! ```

use crate::{Element, Queue, QueueContext, QueueError};
use tracing::{debug, warn};

fn report(operation: &'static str, err: QueueError) -> bool {
    warn!(operation, error = %err, "queue operation failed");
    false
}

/// Create an empty queue, or `None` if the sentinel cannot be allocated.
pub fn new() -> Option<Queue> {
    Queue::try_new()
        .map_err(|err| report("new", err))
        .ok()
}

/// Release a queue, its elements and their values. No-op on `None`.
pub fn teardown(queue: Option<Queue>) {
    drop(queue);
}

/// Insert a copy of `value` at the head of `queue`.
///
/// Returns `false` if the queue or the value is absent, or if allocation fails.
pub fn insert_head(queue: Option<&mut Queue>, value: Option<&str>) -> bool {
    match (queue, value) {
        (Some(queue), Some(value)) => match queue.insert_head(value) {
            Ok(()) => true,
            Err(err) => report("insert_head", err),
        },
        _ => {
            debug!("insert_head without a queue or a value");
            false
        }
    }
}

/// Insert a copy of `value` at the tail of `queue`.
///
/// Returns `false` if the queue or the value is absent, or if allocation fails.
pub fn insert_tail(queue: Option<&mut Queue>, value: Option<&str>) -> bool {
    match (queue, value) {
        (Some(queue), Some(value)) => match queue.insert_tail(value) {
            Ok(()) => true,
            Err(err) => report("insert_tail", err),
        },
        _ => {
            debug!("insert_tail without a queue or a value");
            false
        }
    }
}

/// Remove the head element and hand it to the caller; see [`Queue::remove_head`].
///
/// Returns `None` if the queue is absent or empty.
pub fn remove_head(queue: Option<&mut Queue>, buffer: Option<&mut [u8]>) -> Option<Box<Element>> {
    match queue {
        Some(queue) => queue.remove_head(buffer),
        None => {
            debug!("remove_head without a queue");
            None
        }
    }
}

/// Remove the tail element and hand it to the caller; see [`Queue::remove_tail`].
///
/// Returns `None` if the queue is absent or empty.
pub fn remove_tail(queue: Option<&mut Queue>, buffer: Option<&mut [u8]>) -> Option<Box<Element>> {
    match queue {
        Some(queue) => queue.remove_tail(buffer),
        None => {
            debug!("remove_tail without a queue");
            None
        }
    }
}

/// Count the elements of `queue`, `0` if it is absent.
pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::size)
}

/// Delete the middle element; see [`Queue::delete_middle`].
pub fn delete_middle(queue: Option<&mut Queue>) -> bool {
    queue.map_or(false, Queue::delete_middle)
}

/// Delete every value that has an adjacent copy; see [`Queue::delete_duplicates`].
pub fn delete_duplicates(queue: Option<&mut Queue>) -> bool {
    queue.map_or(false, Queue::delete_duplicates)
}

/// Swap every two adjacent elements; see [`Queue::swap_pairs`].
pub fn swap_pairs(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.swap_pairs();
    }
}

/// Reverse the queue in place; see [`Queue::reverse`].
pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

/// Reverse the queue `k` elements at a time; see [`Queue::reverse_k_groups`].
///
/// A non-positive `k` is ignored.
pub fn reverse_k_groups(queue: Option<&mut Queue>, k: i64) {
    let queue = match queue {
        Some(queue) => queue,
        None => return,
    };
    match usize::try_from(k) {
        Ok(k) if k > 0 => queue.reverse_k_groups(k),
        _ => debug!(k, "ignoring reverse_k_groups with a non-positive group size"),
    }
}

/// Sort the queue ascending; see [`Queue::sort`].
pub fn sort(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.sort();
    }
}

/// Keep the non-increasing suffix maxima and return the number of elements
/// left; see [`Queue::filter_descending`]. Returns `0` for an absent queue.
pub fn filter_descending(queue: Option<&mut Queue>) -> usize {
    queue.map_or(0, Queue::filter_descending)
}

/// Merge a chain of sorted queues into its first queue; see [`merge_k`].
///
/// Returns `0` for an absent chain.
///
/// [`merge_k`]: crate::merge_k
pub fn merge_k(chain: Option<&mut [QueueContext<'_>]>) -> usize {
    chain.map_or(0, crate::merge_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(queue: &Queue) -> Vec<&str> {
        queue.iter().collect()
    }

    #[test]
    fn absent_arguments_are_rejected() {
        assert!(!insert_head(None, Some("a")));
        assert!(!insert_tail(None, Some("a")));
        assert!(remove_head(None, None).is_none());
        let mut buffer = [7u8; 4];
        assert!(remove_tail(None, Some(&mut buffer[..])).is_none());
        assert!(remove_head(None, Some(&mut buffer[..])).is_none());
        assert_eq!(buffer, [7; 4]);
        assert_eq!(size(None), 0);
        assert!(!delete_middle(None));
        assert!(!delete_duplicates(None));
        assert_eq!(filter_descending(None), 0);
        assert_eq!(merge_k(None), 0);
        swap_pairs(None);
        reverse(None);
        reverse_k_groups(None, 3);
        sort(None);
        teardown(None);

        let mut queue = new().unwrap();
        assert!(!insert_head(Some(&mut queue), None));
        assert!(!insert_tail(Some(&mut queue), None));
        assert!(queue.is_empty());
        queue.assert_well_formed();
    }

    #[test]
    fn round_trip() {
        let mut queue = new();
        assert!(insert_tail(queue.as_mut(), Some("x")));
        let element = remove_head(queue.as_mut(), None).unwrap();
        assert_eq!(element.value(), "x");
        assert_eq!(size(queue.as_ref()), 0);
        assert!(remove_tail(queue.as_mut(), None).is_none());
        teardown(queue);
    }

    #[test]
    fn operations_on_empty_queue() {
        let mut queue = new().unwrap();
        assert!(!delete_middle(Some(&mut queue)));
        assert!(delete_duplicates(Some(&mut queue)));
        assert_eq!(filter_descending(Some(&mut queue)), 0);
        swap_pairs(Some(&mut queue));
        reverse(Some(&mut queue));
        reverse_k_groups(Some(&mut queue), 2);
        sort(Some(&mut queue));
        queue.assert_well_formed();
        assert!(queue.is_empty());
    }

    #[test]
    fn group_size_must_be_positive() {
        let mut queue = Queue::from_iter(["1", "2", "3"]);
        reverse_k_groups(Some(&mut queue), 0);
        reverse_k_groups(Some(&mut queue), -2);
        assert_eq!(values(&queue), ["1", "2", "3"]);
        reverse_k_groups(Some(&mut queue), 2);
        assert_eq!(values(&queue), ["2", "1", "3"]);
    }

    #[test]
    fn driver_session() {
        let mut queue = new();
        for value in ["dog", "cat", "bee", "cat", "ant"] {
            assert!(insert_head(queue.as_mut(), Some(value)));
        }
        assert_eq!(size(queue.as_ref()), 5);

        sort(queue.as_mut());
        assert_eq!(values(queue.as_ref().unwrap()), ["ant", "bee", "cat", "cat", "dog"]);

        assert!(delete_duplicates(queue.as_mut()));
        assert_eq!(values(queue.as_ref().unwrap()), ["ant", "bee", "dog"]);

        reverse(queue.as_mut());
        swap_pairs(queue.as_mut());
        assert_eq!(values(queue.as_ref().unwrap()), ["bee", "dog", "ant"]);

        assert!(delete_middle(queue.as_mut()));
        assert_eq!(values(queue.as_ref().unwrap()), ["bee", "ant"]);
        assert_eq!(filter_descending(queue.as_mut()), 2);

        assert!(insert_tail(queue.as_mut(), Some("cow")));
        assert_eq!(filter_descending(queue.as_mut()), 1);
        assert_eq!(values(queue.as_ref().unwrap()), ["cow"]);

        let mut other = Queue::from_iter(["ant", "bee", "cow"]);
        let mut first = queue.unwrap();
        let mut chain = [QueueContext::new(&mut first), QueueContext::new(&mut other)];
        assert_eq!(merge_k(Some(&mut chain[..])), 4);
        assert_eq!(values(&first), ["ant", "bee", "cow", "cow"]);
        assert!(other.is_empty());
        teardown(Some(first));
    }
}
