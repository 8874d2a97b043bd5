//! This crate provides a queue of owned strings built on an intrusive,
//! sentinel-based cyclic doubly-linked list, together with the classic
//! linked-list algorithms that rearrange it in place.
//!
//! The [`Queue`] allows inserting and removing elements at both ends in
//! constant time. The algorithms (sorting, reversing in groups, deleting the
//! middle element or adjacent duplicates, keeping the descending suffix and
//! merging several sorted queues) relink the existing elements instead of
//! copying their values.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use cyclic_queue::Queue;
//!
//! let mut queue = Queue::new();
//! queue.insert_tail("pear").unwrap();
//! queue.insert_tail("apple").unwrap();
//! queue.insert_head("fig").unwrap();
//! assert_eq!(queue.iter().collect::<Vec<_>>(), ["fig", "pear", "apple"]);
//!
//! queue.sort();
//! assert_eq!(queue.iter().collect::<Vec<_>>(), ["apple", "fig", "pear"]);
//!
//! // removed elements are handed back to the caller
//! let element = queue.remove_head(None).unwrap();
//! assert_eq!(element.value(), "apple");
//! assert_eq!(queue.size(), 2);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the queue is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Node N  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        └───────────┘
//! │  ║   value   ║ ──→ heap  ║   value   ║ ──→ heap                   ↑   ↑
//! │  ╚═══════════╝           ╚═══════════╝                            │   │
//! │     Element 0               Element 1                             │   │
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╟───────────╢
//! ║   (len)   ║
//! ╚═══════════╝
//!     Queue
//! ```
//! The `Queue` contains:
//! - a pointer `ghost` that points to the ghost (sentinel) node;
//! - a length field `len` caching the number of elements. It can be disabled by
//!   disabling the `length` feature in your `Cargo.toml`:
//! ```text
//! [dependencies]
//! cyclic_queue = { default-features = false }
//! ```
//!
//! Each [`Element`] is allocated on heap and embeds its link as the first
//! field:
//! - the `next` pointer that points to the next element (or the ghost node if it
//!   is the last element in the queue);
//! - the `prev` pointer that points to the previous element (or the ghost node if
//!   it is the first element in the queue);
//! - the owned `value` string.
//!
//! The ghost node is a bare link with *NO* value. Initially the `next` and
//! `prev` pointers of the ghost node point to itself. As elements are inserted,
//! `ghost.next` points to the first element and `ghost.prev` to the last one.
//!
//! # Ownership
//!
//! A queue owns every element reachable from it. Removing an element hands it
//! to the caller as a `Box<Element>`, and dropping the queue releases all the
//! remaining elements, their values and the ghost node.
//!
//! Insertion comes in two flavours: [`Queue::insert_head`] and
//! [`Queue::insert_tail`] allocate fallibly and report [`QueueError`], while
//! [`Queue::push_front`] and [`Queue::push_back`] abort on allocation failure
//! like the std collections.
//!
//! # Drivers
//!
//! The [`contract`] module exposes every operation as a free function that
//! accepts absent queues and values and reports failure through its return
//! value, for test harnesses and other drivers.
//!
//! # Merging
//!
//! [`merge_k`] merges an ordered chain of [`QueueContext`]s, each borrowing
//! one sorted queue, into the queue of the first context.

#[doc(inline)]
pub use error::QueueError;
#[doc(inline)]
pub use merge::{merge_k, QueueContext};
#[doc(inline)]
pub use queue::element::Element;
#[doc(inline)]
pub use queue::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use queue::Queue;

pub mod contract;
pub mod queue;

mod error;
mod merge;
