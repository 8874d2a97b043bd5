use std::alloc::Layout;
use std::collections::TryReserveError;

/// Errors reported by the fallible queue operations.
///
/// Every failing operation leaves the queue exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The allocator could not provide memory for a node or a sentinel.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocationFailed { layout: Layout },
    /// The owned copy of an element value could not be reserved.
    #[error("cannot reserve storage for the element value")]
    ValueAllocation(#[from] TryReserveError),
}

impl QueueError {
    pub(crate) fn allocation<T>() -> Self {
        QueueError::AllocationFailed {
            layout: Layout::new::<T>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::QueueError;
    use crate::queue::Link;

    #[test]
    fn error_display() {
        let err = QueueError::allocation::<Link>();
        assert_eq!(
            err.to_string(),
            format!(
                "memory allocation of {} bytes failed",
                std::mem::size_of::<Link>()
            )
        );

        let reserve_err = String::new().try_reserve_exact(usize::MAX).unwrap_err();
        let err = QueueError::from(reserve_err);
        assert!(matches!(err, QueueError::ValueAllocation(_)));
        assert_eq!(err.to_string(), "cannot reserve storage for the element value");
    }
}
