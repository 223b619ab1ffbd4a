mod state;

use crossterm::event::KeyCode;

pub use state::{App, ConfirmPopup, DeleteFlow, NewCategoryPopup, NewTaskField, NewTaskPopup};

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppView {
    Tracker,
    Today,
    Weeks,
    Window,
    Log,
    Categories,
    Help,
}

/// Views reachable from the tab bar, in display order.
pub const TABS: [(&str, AppView); 5] = [
    ("Tracker", AppView::Tracker),
    ("Today", AppView::Today),
    ("Weeks", AppView::Weeks),
    ("Log", AppView::Log),
    ("Categories", AppView::Categories),
];
