use crate::queue::{connect, DetachedNodes, Link, Queue};
use crate::Element;
use std::cmp::Ordering;
use std::ptr::NonNull;
use tracing::trace;

impl Queue {
    /// Sort the queue in ascending byte-wise order of the values.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(1) memory
    /// besides the recursion.
    ///
    /// # Current Implementation
    ///
    /// The current algorithm is a top-down merge sort on the links themselves.
    /// Every level walks half of its range to find the midpoint, sorts both
    /// halves into cyclic runs, and merges the runs by repeatedly taking the
    /// smaller head. No value is copied and nothing is allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["pear", "apple", "fig", "banana"]);
    /// queue.sort();
    /// assert_eq!(
    ///     queue.iter().collect::<Vec<_>>(),
    ///     ["apple", "banana", "fig", "pear"]
    /// );
    /// ```
    pub fn sort(&mut self) {
        self.sort_by(|a, b| a.cmp(b));
    }

    /// Sort the queue with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// The comparator function must define a total ordering for the values
    /// in the queue. If the ordering is not total, the order of the elements
    /// is unspecified.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(1) memory
    /// besides the recursion.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["bb", "a", "ccc"]);
    ///
    /// // longest first
    /// queue.sort_by(|a, b| b.len().cmp(&a.len()));
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["ccc", "bb", "a"]);
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        let len = self.size();
        if len < 2 {
            return;
        }
        trace!(len, "sorting queue");
        if let Some(detached) = self.detach_all_nodes() {
            let mut less = |a: NonNull<Link>, b: NonNull<Link>| unsafe {
                compare(Element::value_of(a), Element::value_of(b)) == Ordering::Less
            };
            // SAFETY: the detached nodes form a valid chain of `len` elements
            // that no queue refers to while it is being sorted.
            unsafe {
                let front = merge_sort_run(detached.front, detached.len, &mut less);
                let back = front.as_ref().prev;
                let sorted = DetachedNodes::new(front, back, len);
                let ghost = self.ghost_node();
                self.attach_nodes(ghost, ghost, sorted);
            }
        }
    }
}

/// Sort the `len` nodes starting at `front` and return the front of the
/// result, which is a self-contained cyclic run: the `prev` of the returned
/// node is the back of the run.
///
/// Only the `next` links of the input nodes are read, so the chain may be
/// open, or end in nodes that belong to another run.
unsafe fn merge_sort_run<F>(front: NonNull<Link>, len: usize, less: &mut F) -> NonNull<Link>
where
    F: FnMut(NonNull<Link>, NonNull<Link>) -> bool,
{
    if len == 1 {
        connect(front, front);
        return front;
    }
    let half = len / 2;
    let mut mid = front;
    for _ in 0..half {
        mid = mid.as_ref().next;
    }
    // Sorting the first half relinks only its own nodes, so `mid` and the
    // rest of the chain stay intact for the second half.
    let first = merge_sort_run(front, half, less);
    let second = merge_sort_run(mid, len - half, less);
    merge_runs(first, half, second, len - half, less)
}

/// Merge two sorted cyclic runs of known lengths into one sorted cyclic run.
///
/// On equal values the node of the `first` run is taken first. Once one run is
/// exhausted, the rest of the other one is spliced in as a whole.
unsafe fn merge_runs<F>(
    mut first: NonNull<Link>,
    mut first_len: usize,
    mut second: NonNull<Link>,
    mut second_len: usize,
    less: &mut F,
) -> NonNull<Link>
where
    F: FnMut(NonNull<Link>, NonNull<Link>) -> bool,
{
    debug_assert!(first_len > 0 && second_len > 0);
    let (first_back, second_back) = (first.as_ref().prev, second.as_ref().prev);
    let mut head: Option<NonNull<Link>> = None;
    while first_len > 0 && second_len > 0 {
        let node = if less(second, first) {
            let node = second;
            second = node.as_ref().next;
            second_len -= 1;
            node
        } else {
            let node = first;
            first = node.as_ref().next;
            first_len -= 1;
            node
        };
        match head {
            None => {
                connect(node, node);
                head = Some(node);
            }
            Some(head) => {
                connect(head.as_ref().prev, node);
                connect(node, head);
            }
        }
    }
    let (rest, rest_back) = if first_len > 0 {
        (first, first_back)
    } else {
        (second, second_back)
    };
    // At least one node has been taken, since both runs started non-empty.
    let head = match head {
        Some(head) => head,
        None => return rest,
    };
    connect(head.as_ref().prev, rest);
    connect(rest_back, head);
    head
}
