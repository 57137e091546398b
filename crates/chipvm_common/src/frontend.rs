use crate::event::Event;
use anyhow::Result;

/// The outside world as seen by the interpreter: a source of input events and
/// a place to put finished frames.
pub trait Frontend {
    /// Drain every event that arrived since the previous poll.
    fn poll_events(&mut self) -> Vec<Event>;

    /// Show a frame. `pixels` is row-major, one entry per logical pixel.
    fn present(&mut self, pixels: &[bool]) -> Result<()>;

    fn exit(&mut self) {
        log::info!("Frontend exit");
    }
}
