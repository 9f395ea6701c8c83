use crate::gemini::SuggestionKind;

// Queue of UI-triggered actions so panel functions don't need mutable
// access to the whole app while they draw.
#[derive(Debug, Clone)]
pub enum AppAction {
    PickFile,
    PasteClipboard,
    OpenCamera,
    Analyze { correction: Option<String> },
    RequestSuggestion(SuggestionKind),
    SaveMeal,
    ClearHistory,
}

#[derive(Default)]
pub struct ActionQueue {
    actions: Vec<AppAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    pub fn push(&mut self, action: AppAction) {
        self.actions.push(action);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, AppAction> {
        self.actions.drain(..)
    }
}
