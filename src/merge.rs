//! Merging several individually sorted queues into one.
//!
//! A merge works on an ordered chain of [`QueueContext`]s. Each context borrows
//! one queue and carries the number of elements the caller believes it holds.
//! After [`merge_k`], the queue of the first context holds every element of
//! the chain in ascending order and the other queues are empty.

use crate::queue::{DetachedNodes, Queue};
use tracing::{trace, warn};

/// A queue taking part in a k-way merge, together with its cached size.
///
/// The context does not own the queue: it borrows it for the duration of
/// the merge.
#[derive(Debug)]
pub struct QueueContext<'q> {
    queue: &'q mut Queue,
    size: usize,
}

impl<'q> QueueContext<'q> {
    /// Pair `queue` with its current number of elements.
    pub fn new(queue: &'q mut Queue) -> Self {
        let size = queue.size();
        Self { queue, size }
    }

    /// Pair `queue` with a size supplied by the caller.
    pub fn with_size(queue: &'q mut Queue, size: usize) -> Self {
        Self { queue, size }
    }

    /// The cached number of elements of this context.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The queue of this context.
    #[inline]
    pub fn queue(&self) -> &Queue {
        self.queue
    }
}

/// Merge all sorted queues of the chain into the queue of its first context,
/// and return the number of merged elements.
///
/// Every queue is expected to be sorted ascending. The merge repeatedly picks
/// the smallest head value across the non-exhausted queues, preferring the
/// earliest context on ties, and appends it to the result.
///
/// - An empty chain merges nothing and returns `0`.
/// - A chain of one context is left as it is and returns its cached size.
/// - Otherwise, the first context ends up with the whole merged queue and its
///   size, and every other context ends up empty with size `0`.
///
/// # Complexity
///
/// This operation should compute in *O*(*n* * *k*) time for *n* elements in
/// *k* queues. Elements are relinked, never copied.
///
/// # Examples
///
/// ```
/// use cyclic_queue::{merge_k, Queue, QueueContext};
///
/// let mut a = Queue::from_iter(["1", "4", "7"]);
/// let mut b = Queue::from_iter(["2", "3"]);
/// let mut c = Queue::from_iter(["5", "6"]);
///
/// let mut chain = [
///     QueueContext::new(&mut a),
///     QueueContext::new(&mut b),
///     QueueContext::new(&mut c),
/// ];
/// assert_eq!(merge_k(&mut chain), 7);
/// assert_eq!(chain[0].size(), 7);
/// assert_eq!(chain[1].size(), 0);
///
/// assert_eq!(a.iter().collect::<Vec<_>>(), ["1", "2", "3", "4", "5", "6", "7"]);
/// assert!(b.is_empty() && c.is_empty());
/// ```
pub fn merge_k(chain: &mut [QueueContext<'_>]) -> usize {
    match chain {
        [] => return 0,
        [single] => return single.size,
        _ => {}
    }

    let mut runs: Vec<Option<DetachedNodes>> = chain
        .iter_mut()
        .map(|context| {
            let run = context.queue.detach_all_nodes();
            let actual = run.as_ref().map_or(0, |run| run.len);
            if actual != context.size {
                warn!(
                    cached = context.size,
                    actual, "queue context size out of sync, merging actual elements"
                );
            }
            context.size = actual;
            run
        })
        .collect();

    let (first, rest) = match chain.split_first_mut() {
        Some(split) => split,
        None => return 0,
    };
    loop {
        let mut smallest: Option<(usize, &str)> = None;
        for (index, run) in runs.iter().enumerate() {
            let value = match run.as_ref().and_then(DetachedNodes::front_value) {
                Some(value) => value,
                None => continue,
            };
            match smallest {
                Some((_, min)) if min <= value => {}
                _ => smallest = Some((index, value)),
            }
        }
        let index = match smallest {
            Some((index, _)) => index,
            None => break,
        };
        let node = match runs[index].as_mut().and_then(DetachedNodes::pop_front) {
            Some(node) => node,
            None => break,
        };
        // SAFETY: `node` was detached from one of the queues of the chain and
        // is linked nowhere else; the back node and the ghost node of the
        // result queue are adjacent.
        unsafe {
            let queue = &mut *first.queue;
            queue.attach_node(queue.back_node(), queue.ghost_node(), node);
        }
        if index > 0 {
            rest[index - 1].size -= 1;
        }
    }

    let total = first.queue.size();
    first.size = total;
    rest.iter_mut().for_each(|context| context.size = 0);
    trace!(queues = rest.len() + 1, total, "merged sorted queues");
    total
}
