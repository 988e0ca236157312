#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Run a fresh fetch cycle for the current track.
    Refetch,
    Resize,
}
