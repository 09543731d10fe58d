// Every user interaction and internal event is represented as an Action
// variant. The App event loop applies these to the engine and components.

/// All events flowing through the app. The [`App`](crate::app::App) event
/// loop dispatches each variant to the appropriate handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,

    /// Select a mode in the active family (wrapped modulo 8).
    SelectMode(usize),
    NextMode,
    PrevMode,
    CycleFamily,
    ToggleEnabled,
    /// Change lightning intensity by this delta.
    AdjustIntensity(f32),
    ToggleTheme,

    /// Terminal resized to (columns, rows).
    Resize(u16, u16),

    ShowHelp,
    HideHelp,
    Tick,
}
