//! What the control surface currently shows.

/// Page readiness indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indicator {
    #[default]
    Pending,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopupView {
    pub indicator: Indicator,
    pub page_status: String,
    pub reload_visible: bool,
    pub result_text: String,
    pub next_enabled: bool,
    /// Query input contents, untrimmed.
    pub query: String,
    pub color: String,
    pub auto_scroll: bool,
    pub advanced: bool,
    /// Blocking prompt shown to the user, if any.
    pub prompt: Option<String>,
}

impl PopupView {
    /// Take the pending prompt, dismissing it.
    pub fn take_prompt(&mut self) -> Option<String> {
        self.prompt.take()
    }
}
