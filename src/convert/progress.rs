/// Injected progress and cancellation capability.
///
/// Long-running consumers (conversion, export pipelines) report completed
/// work as `completed` of `total` units, monotonically non-decreasing, and
/// poll `is_cancelled` at each clip-processing step. The sink is threaded
/// as a parameter; the core holds no ambient progress state.
pub trait ProgressSink {
    /// Report completed units out of a fixed total.
    fn report(&self, completed: u64, total: u64);

    /// Cooperative cancellation flag. Observed between clip-processing
    /// steps; a `true` answer surfaces as [`crate::CutlineError::Cancelled`].
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A sink that discards progress and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _completed: u64, _total: u64) {}
}
