use core::fmt;

/// Heap-backed stack used for both the frame stack and the value stack.
///
/// Growth is unbounded unless a limit is given. The limit is only consulted
/// by [`Stack::try_push`]; [`Stack::push`] is for stacks whose size is
/// already bounded by another stack.
///
/// # Examples
///
/// ```ignore
/// let mut stack = Stack::with_limit(Some(2));
/// stack.try_push(1).unwrap();
/// stack.try_push(2).unwrap();
/// assert!(stack.try_push(3).is_err());
/// assert_eq!(stack.pop(), Some(2));
/// ```
pub(crate) struct Stack<T> {
    items: Vec<T>,
    limit: Option<usize>,
}

/// Returned by [`Stack::try_push`] when the stack is at its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StackFull {
    pub limit: usize,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        // Small programs never need more than this; avoid early reallocations.
        let initial_capacity = limit.unwrap_or(64).min(64);
        Self {
            items: Vec::with_capacity(initial_capacity),
            limit,
        }
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Pushes unless the stack already holds `limit` elements.
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), StackFull> {
        if let Some(limit) = self.limit {
            if self.items.len() >= limit {
                return Err(StackFull { limit });
            }
        }
        self.items.push(value);
        Ok(())
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    #[inline]
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drops everything above the first `len` elements.
    ///
    /// Has no effect if the stack is already that short.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("items", &self.items)
            .field("len", &self.items.len())
            .field("limit", &self.limit)
            .finish()
    }
}
