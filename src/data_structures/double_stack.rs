/// Work queue made of a write stack and a read stack. Items pushed while draining the read stack
/// wait on the write stack until the next call to [DoubleStack::swap].
///
/// The propagation engine uses it to evaluate a batch of components per iteration while
/// collecting the batch for the next one.
///
/// # Example
/// ```
/// # use breadboard::data_structures::DoubleStack;
/// let mut stacks = DoubleStack::new();
///
/// stacks.push(1);
/// stacks.push(2);
///
/// assert_eq!(stacks.pop(), None);
///
/// stacks.swap();
/// stacks.push(3);
///
/// assert_eq!(stacks.pop(), Some(2));
/// assert_eq!(stacks.pop(), Some(1));
/// assert_eq!(stacks.pop(), None);
/// assert_eq!(stacks.len(), 1);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DoubleStack<T> {
    read_stack: Vec<T>,
    write_stack: Vec<T>,
}

impl<T> DoubleStack<T> {
    /// Returns an empty [DoubleStack].
    pub fn new() -> Self {
        Self {
            read_stack: Default::default(),
            write_stack: Default::default(),
        }
    }

    /// Pops an item from the end of the read stack and returns it.
    /// If the read stack is empty, returns None.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        self.read_stack.pop()
    }

    /// Pushes an item to the end of the write stack.
    #[inline(always)]
    pub fn push(&mut self, v: T) {
        self.write_stack.push(v);
    }

    /// Swaps the write and read stacks, after calling this method you can [pop](DoubleStack::pop)
    /// items that you had previously [pushed](DoubleStack::push).
    pub fn swap(&mut self) {
        debug_assert!(
            self.read_stack.is_empty(),
            "Tried to swap stacks while the read stack is not empty"
        );
        std::mem::swap(&mut self.read_stack, &mut self.write_stack);
    }

    /// Drops every item in both stacks.
    pub fn clear(&mut self) {
        self.read_stack.clear();
        self.write_stack.clear();
    }

    /// Returns the sum of the items in the read and write stacks.
    pub fn len(&self) -> usize {
        self.read_stack.len() + self.write_stack.len()
    }

    /// Returns true if both the read and write stacks are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for DoubleStack<T> {
    fn default() -> Self {
        Self::new()
    }
}
