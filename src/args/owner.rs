//! Shared builder surface for anything holding an argument list.

use crate::args::composite::Arguments;

/// A component that owns a mutable, ordered list of argument nodes.
///
/// Implemented by [`ProfileSet`](crate::args::ProfileSet) and the
/// [`Runner`](crate::runner::Runner).
pub trait ArgumentOwner {
    fn arguments(&self) -> &Arguments;

    fn arguments_mut(&mut self) -> &mut Arguments;

    /// Replace every held argument with `args`.
    fn set(&mut self, args: Arguments) -> &mut Self {
        *self.arguments_mut() = args;
        self
    }

    /// Append `args` after the ones already held.
    fn add(&mut self, args: Arguments) -> &mut Self {
        self.arguments_mut().extend(args);
        self
    }

    /// Held arguments rendered in order.
    fn flattened(&self) -> Vec<String> {
        self.arguments().flattened()
    }
}
