//! Host event loop events
//!
//! Input never travels through these types: hosts push keyboard and pointer
//! events into an [`InputSource`](crate::InputSource). What remains for the
//! application handler is lifecycle and frame pacing.

/// Control flow after handling an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    /// Continue running the event loop
    #[default]
    Continue,
    /// Exit the event loop
    Exit,
}

/// Events handed to the application by a host event loop
#[derive(Clone, Debug, PartialEq)]
pub enum LoopEvent {
    /// Application resumed (came to foreground, window created)
    Resumed,
    /// Application suspended (went to background)
    Suspended,
    /// Window close was requested (e.g., close button clicked)
    CloseRequested,
    /// Frame tick - time to render
    Frame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_flow_default() {
        assert_eq!(ControlFlow::default(), ControlFlow::Continue);
    }
}
