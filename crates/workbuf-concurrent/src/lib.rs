//! Lock-protected in-process work buffers
//!
//! - `queue`: FIFO over a circular buffer that grows when full
//! - `stack`: LIFO over a growable vector
//!
//! Both take one exclusive lock per operation and never block on empty;
//! consumers poll.

pub mod queue;
pub mod stack;

pub use queue::Queue;
pub use stack::Stack;
pub use workbuf_core::{GrowthPolicy, Node, QueueConfig, WorkBuffer, WorkbufError};
