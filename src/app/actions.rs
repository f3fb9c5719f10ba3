#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Press the button: play the next video.
    Click,
    ToggleAnimation,
    /// Re-issue whatever part of startup failed.
    Retry,
    Resize,
}
