//! Aggregate trait: pure decision logic separated from state mutation.

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` validates a command against the
///   current state and returns the event describing what would happen.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Keeping the two apart lets callers decide an event, try to persist the
/// resulting state, and only then commit it in memory.
pub trait Aggregate {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event.
    ///
    /// Events returned by `handle` on the same state must always apply cleanly.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which event a command produces given the current state.
    ///
    /// This must not mutate state.
    fn handle(&self, command: &Self::Command) -> Result<Self::Event, Self::Error>;
}
