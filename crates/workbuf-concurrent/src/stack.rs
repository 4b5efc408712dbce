use parking_lot::Mutex;
use tracing::trace;
use workbuf_core::{Node, WorkBuffer};

/// Mutex-protected LIFO stack.
///
/// The vector's length is the logical length; popped slots fall into spare
/// capacity and are overwritten by the next push, never read back. Growth
/// follows `Vec`'s own reallocation policy.
pub struct Stack<T> {
    nodes: Mutex<Vec<Node<T>>>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        trace!(capacity, "Creating stack");
        Self {
            nodes: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn push(&self, value: T) {
        self.nodes.lock().push(Node::new(value));
    }

    /// Removes the most recently pushed value, or `None` when empty.
    pub fn pop(&self) -> Option<T> {
        self.nodes.lock().pop().map(Node::into_inner)
    }

    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T: Send> WorkBuffer<T> for Stack<T> {
    fn push(&self, value: T) {
        Stack::push(self, value)
    }

    fn pop(&self) -> Option<T> {
        Stack::pop(self)
    }

    fn len(&self) -> usize {
        Stack::len(self)
    }
}
