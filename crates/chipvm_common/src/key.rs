/// A physical key, independent of the windowing backend that reported it.
///
/// Frontends map their native keycodes onto this set; anything outside of it
/// becomes [`Key::Unknown`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    Num1,
    Num2,
    Num3,
    Num4,
    Q,
    W,
    E,
    R,
    A,
    S,
    D,
    F,
    Z,
    X,
    C,
    V,
    /// Toggles pause in the interpreter.
    P,
    /// Runs a single cycle while paused.
    N,
    Escape,
    Unknown,
}
