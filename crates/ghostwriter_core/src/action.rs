use std::fmt;

use crate::ListKind;

pub type ActionId = u64;

/// A user-triggered mutation against one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Stop,
    ToggleEnabled(bool),
    Reprocess,
}

impl Action {
    /// The list whose contents the action changes and which is refetched
    /// once the backend acknowledges it.
    pub fn owning_list(self) -> ListKind {
        match self {
            Action::Start | Action::Stop | Action::ToggleEnabled(_) => ListKind::Crawlers,
            Action::Reprocess => ListKind::Content,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Start => f.write_str("start"),
            Action::Stop => f.write_str("stop"),
            Action::ToggleEnabled(true) => f.write_str("enable"),
            Action::ToggleEnabled(false) => f.write_str("disable"),
            Action::Reprocess => f.write_str("reprocess"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Pending,
    Acknowledged,
    Failed(String),
}

/// One dispatched action and what became of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub action: Action,
    pub target_id: String,
    pub outcome: ActionOutcome,
}
