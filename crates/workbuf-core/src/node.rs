/// Holder for a single caller-supplied value stored in a container slot.
///
/// Containers never inspect or compare the payload; they only move the
/// holder in on push and hand it back on pop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node<T> {
    value: T,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> From<T> for Node<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
