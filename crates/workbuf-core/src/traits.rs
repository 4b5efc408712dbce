/// Push/pop contract shared by every workbuf container.
///
/// Implementations are internally synchronized, so all methods take `&self`
/// and a buffer can be shared behind an `Arc` between producer and consumer
/// threads. `pop` never blocks: an empty buffer yields `None` and callers
/// are expected to poll.
pub trait WorkBuffer<T>: Send + Sync {
    fn push(&self, value: T);

    fn pop(&self) -> Option<T>;

    /// Number of live elements. May be an advisory snapshot.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pops until the buffer reports empty, appending values in pop order.
    /// Returns how many values were moved.
    fn drain_into(&self, out: &mut Vec<T>) -> usize {
        let mut drained = 0;
        while let Some(value) = self.pop() {
            out.push(value);
            drained += 1;
        }
        drained
    }
}
