use std::collections::VecDeque;
use std::future::ready;

/// A source of user input lines.
pub trait UserInput {
    /// Reads the next line.
    ///
    /// Returns `None` when the input has ended, e.g. the stream is closed.
    fn read_line(&mut self) -> impl Future<Output = Option<String>>;
}

/// Lines queued up front, mostly useful for scripting and tests.
impl UserInput for VecDeque<String> {
    #[inline]
    fn read_line(&mut self) -> impl Future<Output = Option<String>> {
        ready(self.pop_front())
    }
}
