use crate::key::Key;

/// Input events drained from a frontend once per interpreter iteration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}
