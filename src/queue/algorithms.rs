use crate::queue::Queue;
use crate::Element;
use std::hash::{Hash, Hasher};
use tracing::trace;

mod reverse;
mod sort;

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl Eq for Queue {}

impl Clone for Queue {
    fn clone(&self) -> Self {
        self.iter().collect()
    }
}

impl Hash for Queue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for value in self {
            value.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl<S: Into<String>> FromIterator<S> for Queue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut queue = Queue::new();
        queue.extend(iter);
        queue
    }
}

impl<S: Into<String>> Extend<S> for Queue {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| self.push_back(value));
    }
}

impl Queue {
    /// Returns `true` if the `Queue` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let queue = Queue::from_iter(["a", "b"]);
    /// assert!(queue.contains("b"));
    /// assert!(!queue.contains("z"));
    /// ```
    pub fn contains(&self, value: &str) -> bool {
        self.iter().any(|e| e == value)
    }

    /// Deletes and releases the middle element of the queue.
    ///
    /// For a queue of *n* elements the element at index *n* / 2 is removed,
    /// so in an even-length queue it is the second of the two middle elements.
    /// Returns `false`, and does nothing, if the queue is empty.
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
    /// let mut queue = Queue::from_iter(["a", "b", "c", "d"]);
    /// assert!(queue.delete_middle());
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["a", "b", "d"]);
    /// ```
    pub fn delete_middle(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        let ghost = self.ghost_node();
        let (mut slow, mut fast) = (self.front_node(), self.front_node());
        let mut step = false;
        // `slow` advances on every other step of `fast`, so when `fast` gets
        // back to the ghost node `slow` has moved `len / 2` times.
        while fast != ghost {
            // SAFETY: both cursors only walk through nodes of this queue, and
            // `slow` never passes `fast`.
            unsafe {
                if step {
                    slow = slow.as_ref().next;
                }
                fast = fast.as_ref().next;
            }
            step = !step;
        }
        // SAFETY: the queue is not empty, so `slow` is an element node.
        unsafe { drop(Element::into_box(self.detach_node(slow))) };
        true
    }

    /// Deletes every element whose value occurs more than once in a run of
    /// adjacent equal values, keeping none of the copies.
    ///
    /// The queue is expected to be sorted, so that equal values are adjacent.
    /// Values that occur exactly once are untouched.
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
    /// let mut queue = Queue::from_iter(["1", "1", "2", "3", "3", "3"]);
    /// assert!(queue.delete_duplicates());
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["2"]);
    /// ```
    pub fn delete_duplicates(&mut self) -> bool {
        let mut cursor = self.cursor_start_mut();
        // The element before the cursor is the head of the current run.
        if cursor.move_next().is_err() {
            return true;
        }
        loop {
            let mut duplicated = false;
            while matches!(
                (cursor.previous(), cursor.current()),
                (Some(previous), Some(current)) if previous == current
            ) {
                drop(cursor.remove());
                duplicated = true;
            }
            if duplicated {
                drop(cursor.backspace());
            }
            if cursor.move_next().is_err() {
                break;
            }
        }
        true
    }

    /// Keeps only the elements whose value is greater than or equal to every
    /// value after them, and returns the number of elements left.
    ///
    /// The surviving values read non-increasing from front to back.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Current Implementation
    ///
    /// A single forward pass compares each element with its right neighbour.
    /// A smaller element is released, and the comparison is retried from its
    /// former predecessor, which plays the role of a decreasing stack without
    /// any extra storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["05", "02", "13", "03", "08"]);
    /// assert_eq!(queue.filter_descending(), 2);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["13", "08"]);
    /// ```
    pub fn filter_descending(&mut self) -> usize {
        let mut cursor = self.cursor_start_mut();
        let mut removed = 0_usize;
        loop {
            let keep = match (cursor.current(), cursor.peek_next()) {
                (Some(current), Some(next)) => current >= next,
                _ => break,
            };
            if keep {
                if cursor.move_next().is_err() {
                    break;
                }
            } else {
                drop(cursor.remove());
                removed += 1;
                // Retry from the predecessor. A removed front element has
                // none, and the cursor stays on the right neighbour.
                if cursor.move_prev().is_err() {
                    debug_assert!(cursor.previous().is_none());
                }
            }
        }
        trace!(removed, "filtered queue to a descending suffix");
        self.size()
    }
}

#[cfg(test)]
mod tests {
    use crate::Queue;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn values(queue: &Queue) -> Vec<&str> {
        queue.iter().collect()
    }

    #[test]
    fn queue_eq_clone_hash() {
        let queue = Queue::from_iter(["a", "b"]);
        let cloned = queue.clone();
        assert_eq!(queue, cloned);
        assert_ne!(queue, Queue::from_iter(["a"]));
        cloned.assert_well_formed();

        let hash = |queue: &Queue| {
            let mut hasher = DefaultHasher::new();
            queue.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&queue), hash(&cloned));
    }

    #[test]
    fn delete_middle() {
        fn test_delete_middle(input: &[&str], expected: &[&str]) {
            let mut queue = Queue::from_iter(input.iter().copied());
            assert_eq!(queue.delete_middle(), !input.is_empty());
            queue.assert_well_formed();
            assert_eq!(values(&queue), expected);
        }
        test_delete_middle(&[], &[]);
        test_delete_middle(&["a"], &[]);
        test_delete_middle(&["a", "b"], &["a"]);
        test_delete_middle(&["a", "b", "c"], &["a", "c"]);
        test_delete_middle(&["a", "b", "c", "d"], &["a", "b", "d"]);
        test_delete_middle(&["a", "b", "c", "d", "e"], &["a", "b", "d", "e"]);
        test_delete_middle(
            &["a", "b", "c", "d", "e", "f"],
            &["a", "b", "c", "e", "f"],
        );
    }

    #[test]
    fn delete_duplicates() {
        fn test_delete_duplicates(input: &[&str], expected: &[&str]) {
            let mut queue = Queue::from_iter(input.iter().copied());
            assert!(queue.delete_duplicates());
            queue.assert_well_formed();
            assert_eq!(values(&queue), expected);
        }
        test_delete_duplicates(&[], &[]);
        test_delete_duplicates(&["a"], &["a"]);
        test_delete_duplicates(&["a", "a"], &[]);
        test_delete_duplicates(&["1", "1", "2", "3", "3", "3"], &["2"]);
        test_delete_duplicates(&["a", "b", "c"], &["a", "b", "c"]);
        test_delete_duplicates(&["a", "b", "b", "c"], &["a", "c"]);
        test_delete_duplicates(&["a", "a", "b", "b"], &[]);
        test_delete_duplicates(&["a", "b", "b", "b", "c", "d", "d"], &["a", "c"]);
        // only adjacent copies are recognised
        test_delete_duplicates(&["a", "b", "a"], &["a", "b", "a"]);
    }

    #[test]
    fn filter_descending() {
        fn test_filter_descending(input: &[&str], expected: &[&str]) {
            let mut queue = Queue::from_iter(input.iter().copied());
            assert_eq!(queue.filter_descending(), expected.len());
            queue.assert_well_formed();
            assert_eq!(values(&queue), expected);
        }
        test_filter_descending(&[], &[]);
        test_filter_descending(&["a"], &["a"]);
        test_filter_descending(&["a", "b"], &["b"]);
        test_filter_descending(&["b", "a"], &["b", "a"]);
        test_filter_descending(&["b", "b", "a", "a"], &["b", "b", "a", "a"]);
        test_filter_descending(&["a", "b", "c", "d"], &["d"]);
        test_filter_descending(&["e", "b", "m", "c", "h"], &["m", "h"]);
        test_filter_descending(&["05", "02", "13", "03", "08"], &["13", "08"]);
        // values compare byte-wise, so "13" sorts before "8"
        test_filter_descending(&["5", "2", "13", "3", "8"], &["8"]);
        test_filter_descending(&["d", "a", "c", "b", "a"], &["d", "c", "b", "a"]);
        // the front element is removed on every step
        test_filter_descending(&["a", "a", "b", "c"], &["c"]);
        test_filter_descending(&["c", "a", "b", "d"], &["d"]);
    }
}
