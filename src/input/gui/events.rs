/// Custom user events for the GUI event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiEvent {
    /// The engine has queued render events for the presenter.
    ///
    /// The handler decides whether anything needs redrawing.
    Wake,
}
