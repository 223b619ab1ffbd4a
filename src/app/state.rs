use chrono::NaiveDate;
use crossterm::event::KeyCode;

use crate::clock::Clock;
use crate::service::{StartError, Storage, TaskService};
use crate::summary::{deletion_days, entries_on};
use crate::types::{CategoryId, TaskId, TaskRecord};
use crate::ui::format_duration;

use super::{AppEvent, AppView, TABS};

/// The top-level application state.
pub struct App<S, C> {
    pub running: bool,
    pub service: TaskService<S, C>,
    pub view: AppView,
    view_history: Vec<AppView>,
    pub status: Option<String>,
    pub selected_week_index: usize,
    pub window_start_index: usize,
    /// Rows scrolled off the top of the four-week summary.
    pub window_scroll: usize,
    pub selected_log_index: usize,
    pub selected_category_index: usize,
    pub new_task_popup: Option<NewTaskPopup>,
    pub new_category_popup: Option<NewCategoryPopup>,
    pub delete_flow: Option<DeleteFlow>,
    pub confirm_popup: Option<ConfirmPopup>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewTaskField {
    Name,
    Category,
    NewCategory,
}

#[derive(Clone, Debug)]
pub struct NewTaskPopup {
    pub name: String,
    pub category_index: usize,
    /// Typing a name here creates that category and starts the task in it.
    pub new_category: String,
    pub field: NewTaskField,
}

#[derive(Clone, Debug, Default)]
pub struct NewCategoryPopup {
    pub name: String,
}

/// Two-step pick of an entry to delete: first the day, then the entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteFlow {
    Day {
        days: Vec<NaiveDate>,
        index: usize,
    },
    Entry {
        day: NaiveDate,
        entries: Vec<TaskId>,
        index: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteLog(TaskId),
    QuitDiscarding,
}

#[derive(Clone, Debug)]
pub struct ConfirmPopup {
    pub message: String,
    pub action: ConfirmAction,
}

fn select_prev(index: &mut usize, len: usize) {
    if len == 0 {
        return;
    }
    if *index == 0 {
        *index = len - 1;
    } else {
        *index -= 1;
    }
}

fn select_next(index: &mut usize, len: usize) {
    if len == 0 {
        return;
    }
    *index = (*index + 1) % len;
}

impl<S: Storage, C: Clock> App<S, C> {
    pub fn new(service: TaskService<S, C>) -> Self {
        Self {
            running: true,
            service,
            view: AppView::Tracker,
            view_history: Vec::new(),
            status: None,
            selected_week_index: 0,
            window_start_index: 0,
            window_scroll: 0,
            selected_log_index: 0,
            selected_category_index: 0,
            new_task_popup: None,
            new_category_popup: None,
            delete_flow: None,
            confirm_popup: None,
        }
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            // Durations are recomputed on every draw, so a tick only needs a redraw.
            AppEvent::Tick => {}
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    /// Completed entries, latest start first.
    pub fn log_entries(&self) -> Vec<&TaskRecord> {
        let mut logs: Vec<_> = self.service.logs().iter().collect();
        logs.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        logs
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.confirm_popup.is_some() {
            self.handle_confirm_key(key);
            return;
        }
        if self.new_task_popup.is_some() {
            self.handle_new_task_key(key);
            return;
        }
        if self.new_category_popup.is_some() {
            self.handle_new_category_key(key);
            return;
        }
        if self.delete_flow.is_some() {
            self.handle_delete_flow_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.request_quit(),
            KeyCode::Char('h') => self.navigate_to(AppView::Tracker),
            KeyCode::Char('t') => self.navigate_to(AppView::Today),
            KeyCode::Char('w') => self.navigate_to(AppView::Weeks),
            KeyCode::Char('l') => self.navigate_to(AppView::Log),
            KeyCode::Char('c') => self.navigate_to(AppView::Categories),
            KeyCode::Char('?') => {
                if self.view == AppView::Help {
                    self.go_back();
                } else {
                    self.navigate_to(AppView::Help);
                }
            }
            KeyCode::Left => self.navigate_tab(-1),
            KeyCode::Right => self.navigate_tab(1),
            KeyCode::Esc => self.go_back(),
            KeyCode::Up => self.move_selection_up(),
            KeyCode::Down => self.move_selection_down(),
            KeyCode::Enter => {
                if self.view == AppView::Weeks {
                    self.open_selected_week();
                }
            }
            KeyCode::Char('n') => match self.view {
                AppView::Tracker => self.open_new_task_popup(),
                AppView::Categories => self.new_category_popup = Some(NewCategoryPopup::default()),
                _ => {}
            },
            KeyCode::Char(' ') => {
                if self.view == AppView::Tracker {
                    self.toggle_pause();
                }
            }
            KeyCode::Char('f') => {
                if self.view == AppView::Tracker {
                    self.complete_task();
                }
            }
            KeyCode::Char('x') => {
                if self.view == AppView::Tracker {
                    self.discard_task();
                }
            }
            KeyCode::Char('d') => match self.view {
                AppView::Window => self.start_delete_flow(),
                AppView::Log => self.confirm_delete_selected_log(),
                _ => {}
            },
            _ => {}
        }
    }

    fn navigate_to(&mut self, view: AppView) {
        if self.view != view {
            self.view_history.push(self.view.clone());
            self.view = view;
            self.clear_status();
            self.clamp_selections();
        }
    }

    fn navigate_tab(&mut self, step: isize) {
        let current = TABS
            .iter()
            .position(|(_, view)| *view == self.view)
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(TABS.len() as isize) as usize;
        self.navigate_to(TABS[next].1.clone());
    }

    fn go_back(&mut self) {
        if let Some(previous) = self.view_history.pop() {
            self.view = previous;
            self.clamp_selections();
        }
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Keeps list selections in range after entries were added or removed.
    fn clamp_selections(&mut self) {
        let weeks = self.service.weekly_groups().len();
        if self.selected_week_index >= weeks {
            self.selected_week_index = weeks.saturating_sub(1);
        }
        if self.window_start_index >= weeks {
            self.window_start_index = weeks.saturating_sub(1);
        }
        let logs = self.service.logs().len();
        if self.selected_log_index >= logs {
            self.selected_log_index = logs.saturating_sub(1);
        }
        let categories = self.service.categories().len();
        if self.selected_category_index >= categories {
            self.selected_category_index = categories.saturating_sub(1);
        }
    }

    fn move_selection_up(&mut self) {
        match self.view {
            AppView::Window => self.window_scroll = self.window_scroll.saturating_sub(1),
            AppView::Weeks => {
                let len = self.service.weekly_groups().len();
                select_prev(&mut self.selected_week_index, len);
            }
            AppView::Log => {
                let len = self.service.logs().len();
                select_prev(&mut self.selected_log_index, len);
            }
            AppView::Categories => {
                let len = self.service.categories().len();
                select_prev(&mut self.selected_category_index, len);
            }
            _ => {}
        }
    }

    fn move_selection_down(&mut self) {
        match self.view {
            AppView::Window => {
                let last = crate::ui::window_line_count(self).saturating_sub(1);
                self.window_scroll = (self.window_scroll + 1).min(last);
            }
            AppView::Weeks => {
                let len = self.service.weekly_groups().len();
                select_next(&mut self.selected_week_index, len);
            }
            AppView::Log => {
                let len = self.service.logs().len();
                select_next(&mut self.selected_log_index, len);
            }
            AppView::Categories => {
                let len = self.service.categories().len();
                select_next(&mut self.selected_category_index, len);
            }
            _ => {}
        }
    }

    fn open_selected_week(&mut self) {
        if self.service.weekly_groups().is_empty() {
            self.status = Some("No weekly data available.".into());
            return;
        }
        self.window_start_index = self.selected_week_index;
        self.window_scroll = 0;
        self.navigate_to(AppView::Window);
    }

    fn request_quit(&mut self) {
        if self.service.current_task().is_some() {
            self.confirm_popup = Some(ConfirmPopup {
                message: "A task is still in progress. Quit and discard it?".into(),
                action: ConfirmAction::QuitDiscarding,
            });
        } else {
            self.running = false;
        }
    }

    fn open_new_task_popup(&mut self) {
        if self.service.current_task().is_some() {
            self.status = Some("Finish or discard the current task first.".into());
            return;
        }
        self.new_task_popup = Some(NewTaskPopup {
            name: String::new(),
            category_index: 0,
            new_category: String::new(),
            field: NewTaskField::Name,
        });
    }

    fn toggle_pause(&mut self) {
        if self.service.pause() {
            self.status = Some("Task paused.".into());
        } else if self.service.resume() {
            self.status = Some("Task resumed.".into());
        }
    }

    fn complete_task(&mut self) {
        match self.service.complete() {
            Ok(Some(task)) => {
                let final_time = format_duration(task.duration(self.service.now()));
                self.status = Some(format!("Task completed. Final time: {final_time}"));
                self.clamp_selections();
            }
            Ok(None) => {}
            Err(err) => self.status = Some(format!("Failed to save task: {err}")),
        }
    }

    fn discard_task(&mut self) {
        if self.service.discard().is_some() {
            self.status = Some("Task discarded.".into());
        }
    }

    fn handle_new_task_key(&mut self, key: KeyCode) {
        let categories = self.service.categories().len();
        let Some(popup) = self.new_task_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.new_task_popup = None;
                self.clear_status();
            }
            KeyCode::Enter => self.apply_new_task_popup(),
            KeyCode::Tab => {
                popup.field = match popup.field {
                    NewTaskField::Name => NewTaskField::Category,
                    NewTaskField::Category => NewTaskField::NewCategory,
                    NewTaskField::NewCategory => NewTaskField::Name,
                };
            }
            KeyCode::Up => {
                if popup.field == NewTaskField::Category {
                    select_prev(&mut popup.category_index, categories);
                }
            }
            KeyCode::Down => {
                if popup.field == NewTaskField::Category {
                    select_next(&mut popup.category_index, categories);
                }
            }
            KeyCode::Backspace | KeyCode::Delete => match popup.field {
                NewTaskField::Name => {
                    popup.name.pop();
                }
                NewTaskField::NewCategory => {
                    popup.new_category.pop();
                }
                NewTaskField::Category => {}
            },
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                match popup.field {
                    NewTaskField::Name => popup.name.push(ch),
                    NewTaskField::NewCategory => popup.new_category.push(ch),
                    NewTaskField::Category => {}
                }
            }
            _ => {}
        }
    }

    fn apply_new_task_popup(&mut self) {
        let Some(popup) = self.new_task_popup.clone() else {
            return;
        };
        let name = popup.name.trim();
        if name.is_empty() {
            self.status = Some("Task name cannot be empty.".into());
            return;
        }

        let category_id: CategoryId = if popup.new_category.trim().is_empty() {
            match self.service.categories().get(popup.category_index) {
                Some(category) => category.id,
                None => {
                    self.status = Some("Select a category.".into());
                    return;
                }
            }
        } else {
            match self.service.add_category(popup.new_category.trim()) {
                Ok(category) => category.id,
                Err(err) => {
                    self.status = Some(format!("Failed to create category: {err}"));
                    return;
                }
            }
        };

        match self.service.start(name, category_id) {
            Ok(_) => {
                self.new_task_popup = None;
                self.status = Some(format!("Started '{name}'."));
            }
            Err(StartError::AlreadyRunning) => {
                self.new_task_popup = None;
                self.status = Some("Invalid category or task already running.".into());
            }
            Err(err @ StartError::UnknownCategory(_)) => {
                self.status = Some(format!("Cannot start task: {err}"));
            }
        }
    }

    fn handle_new_category_key(&mut self, key: KeyCode) {
        let Some(popup) = self.new_category_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.new_category_popup = None;
                self.clear_status();
            }
            KeyCode::Enter => {
                let name = popup.name.trim().to_string();
                if name.is_empty() {
                    self.status = Some("Category name cannot be empty.".into());
                    return;
                }
                match self.service.add_category(&name) {
                    Ok(category) => {
                        self.new_category_popup = None;
                        self.selected_category_index = self.service.categories().len() - 1;
                        self.status = Some(format!("Added category '{}'.", category.name));
                    }
                    Err(err) => self.status = Some(format!("Failed to create category: {err}")),
                }
            }
            KeyCode::Backspace | KeyCode::Delete => {
                popup.name.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    popup.name.push(ch);
                }
            }
            _ => {}
        }
    }

    fn start_delete_flow(&mut self) {
        let days = deletion_days(&self.service.weekly_groups());
        if days.is_empty() {
            self.status = Some("No entries to delete.".into());
            return;
        }
        self.delete_flow = Some(DeleteFlow::Day { days, index: 0 });
    }

    fn handle_delete_flow_key(&mut self, key: KeyCode) {
        let Some(flow) = self.delete_flow.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => match flow {
                DeleteFlow::Day { .. } => self.delete_flow = None,
                DeleteFlow::Entry { .. } => self.start_delete_flow(),
            },
            KeyCode::Up => match flow {
                DeleteFlow::Day { days, index } => select_prev(index, days.len()),
                DeleteFlow::Entry { entries, index, .. } => select_prev(index, entries.len()),
            },
            KeyCode::Down => match flow {
                DeleteFlow::Day { days, index } => select_next(index, days.len()),
                DeleteFlow::Entry { entries, index, .. } => select_next(index, entries.len()),
            },
            KeyCode::Enter => match flow {
                DeleteFlow::Day { days, index } => {
                    let day = days[*index];
                    let entries = entries_on(&self.service.weekly_groups(), day)
                        .iter()
                        .map(|record| record.id)
                        .collect();
                    self.delete_flow = Some(DeleteFlow::Entry {
                        day,
                        entries,
                        index: 0,
                    });
                }
                DeleteFlow::Entry { entries, index, .. } => {
                    if let Some(&id) = entries.get(*index) {
                        self.ask_delete(id);
                    }
                }
            },
            _ => {}
        }
    }

    fn confirm_delete_selected_log(&mut self) {
        let id = self.log_entries().get(self.selected_log_index).map(|log| log.id);
        if let Some(id) = id {
            self.ask_delete(id);
        }
    }

    fn ask_delete(&mut self, id: TaskId) {
        let label = self
            .service
            .logs()
            .iter()
            .find(|log| log.id == id)
            .map(|log| format!("{} | {} | {}", log.id, log.start_time.format("%H:%M"), log.name))
            .unwrap_or_else(|| id.to_string());
        self.confirm_popup = Some(ConfirmPopup {
            message: format!("Delete entry {label}?"),
            action: ConfirmAction::DeleteLog(id),
        });
    }

    fn handle_confirm_key(&mut self, key: KeyCode) {
        let Some(popup) = self.confirm_popup.take() else {
            return;
        };
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => match popup.action {
                ConfirmAction::DeleteLog(id) => {
                    self.delete_flow = None;
                    match self.service.delete_log(id) {
                        Ok(true) => self.status = Some("Entry deleted successfully.".into()),
                        Ok(false) => self.status = Some(format!("Entry {id} no longer exists.")),
                        Err(err) => self.status = Some(format!("Failed to delete entry: {err}")),
                    }
                    self.clamp_selections();
                }
                ConfirmAction::QuitDiscarding => {
                    self.service.discard();
                    self.running = false;
                }
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.clear_status(),
            _ => self.confirm_popup = Some(popup),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Local, TimeZone};

    use super::*;
    use crate::clock::FakeClock;
    use crate::service::MemoryStorage;
    use crate::types::TaskStatus;

    type TestApp = App<MemoryStorage, FakeClock>;

    fn at(day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn app_with(logs: Vec<TaskRecord>) -> (TestApp, FakeClock) {
        let clock = FakeClock::at(at(13, 12));
        let storage = MemoryStorage {
            logs,
            ..MemoryStorage::default()
        };
        (App::new(TaskService::new(storage, clock.clone()).unwrap()), clock)
    }

    fn log(id: TaskId, name: &str, start: DateTime<Local>) -> TaskRecord {
        let mut task = TaskRecord::started(id, name.into(), 1, start);
        task.complete_at(start + Duration::minutes(30));
        task
    }

    fn press(app: &mut TestApp, keys: &[KeyCode]) {
        for key in keys {
            app.update(AppEvent::KeyPress(*key));
        }
    }

    fn type_text(app: &mut TestApp, text: &str) {
        for ch in text.chars() {
            app.update(AppEvent::KeyPress(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn starts_task_from_popup() {
        let (mut app, _) = app_with(Vec::new());
        press(&mut app, &[KeyCode::Char('n')]);
        type_text(&mut app, "Write docs");
        press(&mut app, &[KeyCode::Tab, KeyCode::Down, KeyCode::Enter]);

        let task = app.service.current_task().unwrap();
        assert_eq!(task.name, "Write docs");
        assert_eq!(task.category_id, 2);
        assert!(app.new_task_popup.is_none());
    }

    #[test]
    fn typed_category_is_created_before_start() {
        let (mut app, _) = app_with(Vec::new());
        press(&mut app, &[KeyCode::Char('n')]);
        type_text(&mut app, "Gym");
        press(&mut app, &[KeyCode::Tab, KeyCode::Tab]);
        type_text(&mut app, "Health");
        press(&mut app, &[KeyCode::Enter]);

        let task = app.service.current_task().unwrap();
        let category = app.service.category(task.category_id).unwrap();
        assert_eq!(category.name, "Health");
        assert_eq!(category.id, 4);
    }

    #[test]
    fn empty_name_keeps_popup_open() {
        let (mut app, _) = app_with(Vec::new());
        press(&mut app, &[KeyCode::Char('n'), KeyCode::Enter]);
        assert!(app.new_task_popup.is_some());
        assert!(app.service.current_task().is_none());
    }

    #[test]
    fn space_toggles_and_f_completes() {
        let (mut app, clock) = app_with(Vec::new());
        app.service.start("Focus", 1).unwrap();
        clock.advance(Duration::minutes(10));
        press(&mut app, &[KeyCode::Char(' ')]);
        assert_eq!(app.service.current_task().unwrap().status(), TaskStatus::Paused);

        clock.advance(Duration::minutes(10));
        press(&mut app, &[KeyCode::Char(' ')]);
        assert_eq!(app.service.current_task().unwrap().status(), TaskStatus::Running);

        clock.advance(Duration::minutes(5));
        press(&mut app, &[KeyCode::Char('f')]);
        assert!(app.service.current_task().is_none());
        assert_eq!(app.status.as_deref(), Some("Task completed. Final time: 00:15:00"));
    }

    #[test]
    fn quitting_with_task_asks_first() {
        let (mut app, _) = app_with(Vec::new());
        app.service.start("Focus", 1).unwrap();
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(app.running);
        assert!(app.confirm_popup.is_some());

        press(&mut app, &[KeyCode::Char('n')]);
        assert!(app.running);
        assert!(app.service.current_task().is_some());

        press(&mut app, &[KeyCode::Char('q'), KeyCode::Char('y')]);
        assert!(!app.running);
        assert!(app.service.logs().is_empty());
    }

    #[test]
    fn delete_flow_removes_chosen_entry() {
        let (mut app, _) = app_with(vec![
            log(1, "A", at(4, 9)),
            log(2, "B", at(12, 9)),
            log(3, "C", at(12, 15)),
        ]);
        press(&mut app, &[KeyCode::Char('w'), KeyCode::Enter]);
        assert_eq!(app.view, AppView::Window);

        press(&mut app, &[KeyCode::Char('d')]);
        assert!(matches!(app.delete_flow, Some(DeleteFlow::Day { ref days, .. }) if days.len() == 2));

        // Newest day first, newest entry first: 2024-03-12, then entry 3.
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.delete_flow, Some(DeleteFlow::Entry { ref entries, .. }) if entries == &vec![3, 2]));
        press(&mut app, &[KeyCode::Down, KeyCode::Enter, KeyCode::Char('y')]);

        let remaining: Vec<_> = app.service.logs().iter().map(|l| l.id).collect();
        assert_eq!(remaining, vec![1, 3]);
        assert!(app.delete_flow.is_none());
        assert_eq!(app.service.storage().logs.len(), 2);
    }

    #[test]
    fn escape_steps_back_through_delete_flow() {
        let (mut app, _) = app_with(vec![log(1, "A", at(4, 9))]);
        press(&mut app, &[KeyCode::Char('w'), KeyCode::Enter, KeyCode::Char('d'), KeyCode::Enter]);
        assert!(matches!(app.delete_flow, Some(DeleteFlow::Entry { .. })));

        press(&mut app, &[KeyCode::Esc]);
        assert!(matches!(app.delete_flow, Some(DeleteFlow::Day { .. })));
        press(&mut app, &[KeyCode::Esc]);
        assert!(app.delete_flow.is_none());
        assert_eq!(app.service.logs().len(), 1);
    }

    #[test]
    fn log_view_deletes_selected_entry() {
        let (mut app, _) = app_with(vec![log(1, "A", at(4, 9)), log(2, "B", at(12, 9))]);
        press(&mut app, &[KeyCode::Char('l'), KeyCode::Char('d'), KeyCode::Char('y')]);
        let remaining: Vec<_> = app.service.logs().iter().map(|l| l.id).collect();
        assert_eq!(remaining, vec![1]);
    }

    #[test]
    fn window_scrolls_within_its_rows() {
        let (mut app, _) = app_with(vec![log(1, "A", at(4, 9)), log(2, "B", at(12, 9))]);
        press(&mut app, &[KeyCode::Char('w'), KeyCode::Enter, KeyCode::Up]);
        assert_eq!(app.window_scroll, 0);

        press(&mut app, &[KeyCode::Down, KeyCode::Down]);
        assert_eq!(app.window_scroll, 2);
        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.window_scroll, 1);

        let last = crate::ui::window_line_count(&app) - 1;
        for _ in 0..last + 5 {
            press(&mut app, &[KeyCode::Down]);
        }
        assert_eq!(app.window_scroll, last);

        press(&mut app, &[KeyCode::Esc, KeyCode::Enter]);
        assert_eq!(app.view, AppView::Window);
        assert_eq!(app.window_scroll, 0);
    }

    #[test]
    fn tabs_wrap_around() {
        let (mut app, _) = app_with(Vec::new());
        press(&mut app, &[KeyCode::Left]);
        assert_eq!(app.view, AppView::Categories);
        press(&mut app, &[KeyCode::Right]);
        assert_eq!(app.view, AppView::Tracker);
    }
}
