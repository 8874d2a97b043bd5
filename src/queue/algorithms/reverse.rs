use crate::queue::{connect, Link, Queue};
use std::mem;
use std::ptr::NonNull;
use tracing::trace;

impl Queue {
    /// Reverses the order of the elements in place.
    ///
    /// No element is moved or reallocated: the `next` and `prev` links of every
    /// node, the ghost node included, are swapped.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c"]);
    /// queue.reverse();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["c", "b", "a"]);
    /// ```
    pub fn reverse(&mut self) {
        let ghost = self.ghost_node();
        let mut node = self.front_node();
        // SAFETY: every node between the ghost node and itself is visited exactly
        // once, and its old `next` is read before the links are swapped.
        unsafe {
            while node != ghost {
                let next = node.as_ref().next;
                swap_links(node);
                node = next;
            }
            swap_links(ghost);
        }
    }

    /// Reverses the elements of the queue `k` at a time.
    ///
    /// The queue is cut into consecutive groups of `k` elements, and the order
    /// inside every group is reversed while the groups keep their order. The
    /// trailing group of fewer than `k` elements is reversed as well.
    ///
    /// Does nothing if `k` is `0` or the queue holds fewer than two elements.
    /// If `k` is at least the length of the queue, the whole queue is reversed.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["1", "2", "3", "4", "5"]);
    /// queue.reverse_k_groups(3);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["3", "2", "1", "5", "4"]);
    /// ```
    pub fn reverse_k_groups(&mut self, k: usize) {
        let len = self.size();
        if len < 2 || k < 1 {
            return;
        }
        if k >= len {
            self.reverse();
            return;
        }
        trace!(len, k, "reversing queue in groups");
        let mut before = self.ghost_node();
        let mut remaining = len;
        while remaining > 0 {
            let group = k.min(remaining);
            // SAFETY: `before` is the ghost node or the last node of the previous
            // group, and the `group` nodes after it are elements of this queue.
            unsafe { before = reverse_group(before, group) };
            remaining -= group;
        }
    }

    /// Swaps every two adjacent elements. A trailing odd element stays in place.
    ///
    /// This is [`Queue::reverse_k_groups`] with `k = 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["1", "2", "3", "4", "5"]);
    /// queue.swap_pairs();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["2", "1", "4", "3", "5"]);
    /// ```
    #[inline]
    pub fn swap_pairs(&mut self) {
        self.reverse_k_groups(2);
    }
}

unsafe fn swap_links(mut node: NonNull<Link>) {
    let link = node.as_mut();
    mem::swap(&mut link.next, &mut link.prev);
}

/// Reverse the `len` nodes following `before` in place, and return the node
/// that now ends the reversed group.
unsafe fn reverse_group(before: NonNull<Link>, len: usize) -> NonNull<Link> {
    let first = before.as_ref().next;
    let mut node = first;
    for _ in 0..len {
        let next = node.as_ref().next;
        swap_links(node);
        node = next;
    }
    // `node` is the first node after the group; its `prev` still points to the
    // old last node of the group, which becomes the new first one.
    let (after, last) = (node, node.as_ref().prev);
    connect(before, last);
    connect(first, after);
    first
}

#[cfg(test)]
mod tests {
    use crate::Queue;

    fn values(queue: &Queue) -> Vec<&str> {
        queue.iter().collect()
    }

    #[test]
    fn reverse() {
        let mut queue = Queue::new();
        queue.reverse();
        queue.assert_well_formed();
        assert!(queue.is_empty());

        queue.push_back("a");
        queue.reverse();
        queue.assert_well_formed();
        assert_eq!(values(&queue), ["a"]);

        let mut queue = Queue::from_iter(["a", "b", "c", "d"]);
        queue.reverse();
        queue.assert_well_formed();
        assert_eq!(values(&queue), ["d", "c", "b", "a"]);
        assert_eq!(queue.front(), Some("d"));
        assert_eq!(queue.back(), Some("a"));

        queue.reverse();
        queue.assert_well_formed();
        assert_eq!(values(&queue), ["a", "b", "c", "d"]);
    }

    #[test]
    fn reverse_k_groups() {
        fn test_reverse_k_groups(input: &[&str], k: usize, expected: &[&str]) {
            let mut queue = Queue::from_iter(input.iter().copied());
            queue.reverse_k_groups(k);
            queue.assert_well_formed();
            assert_eq!(values(&queue), expected, "k = {}", k);
        }
        let digits = ["1", "2", "3", "4", "5"];
        test_reverse_k_groups(&digits, 0, &digits);
        test_reverse_k_groups(&digits, 1, &digits);
        test_reverse_k_groups(&digits, 2, &["2", "1", "4", "3", "5"]);
        test_reverse_k_groups(&digits, 3, &["3", "2", "1", "5", "4"]);
        test_reverse_k_groups(&digits, 4, &["4", "3", "2", "1", "5"]);
        test_reverse_k_groups(&digits, 5, &["5", "4", "3", "2", "1"]);
        test_reverse_k_groups(&digits, 9, &["5", "4", "3", "2", "1"]);
        test_reverse_k_groups(
            &["1", "2", "3", "4", "5", "6", "7", "8"],
            3,
            &["3", "2", "1", "6", "5", "4", "8", "7"],
        );
        test_reverse_k_groups(&[], 2, &[]);
        test_reverse_k_groups(&["1"], 2, &["1"]);
    }

    #[test]
    fn swap_pairs() {
        let mut queue = Queue::from_iter(["a", "b", "c", "d"]);
        queue.swap_pairs();
        queue.assert_well_formed();
        assert_eq!(values(&queue), ["b", "a", "d", "c"]);

        let mut queue = Queue::from_iter(["a", "b"]);
        queue.swap_pairs();
        assert_eq!(values(&queue), ["b", "a"]);

        let mut queue = Queue::from_iter(["a"]);
        queue.swap_pairs();
        assert_eq!(values(&queue), ["a"]);
    }
}
