/// CLI argument parsing and command handling.
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::clock::Clock;
use crate::export;
use crate::service::{Storage, TaskService, WeekGroup};
use crate::summary::{DailySummary, RollingWindow, Total, UNCATEGORIZED};
use crate::types::TaskId;
use crate::ui::{NAME_WIDTH, clamp_name, format_duration};
use crate::week::WeekWindow;

#[derive(Parser)]
#[command(
    name = "taskman",
    version,
    about = "Taskman - A terminal task timer with daily and weekly summaries"
)]
pub struct Cli {
    /// Database file. Defaults to the user's local data directory.
    #[arg(long, env = "TASKMAN_DB", global = true)]
    pub db: Option<PathBuf>,
    /// Write trace-level logs.
    #[arg(long, global = true)]
    pub log: bool,
    /// Keep categories and entries in memory only; nothing is saved.
    #[arg(long, global = true)]
    pub in_memory: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// Time spent per task today
    Today,
    /// Rolling four-week summary
    Week {
        /// Start from the week containing this date (YYYY-MM-DD)
        #[arg(short = 'f', long = "from")]
        from: Option<NaiveDate>,
    },
    /// List every completed entry, newest first
    Log,
    /// Delete a completed entry by id
    Delete { id: TaskId },
    /// Write all entries and categories to a JSON file
    Export { path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    Add { name: String },
    List,
}

/// Execute a non-interactive command.
pub fn run<S: Storage, C: Clock>(command: Command, service: &mut TaskService<S, C>) -> Result<()> {
    match command {
        Command::Category {
            command: CategoryCommand::Add { name },
        } => handle_category_add(name, service)?,
        Command::Category {
            command: CategoryCommand::List,
        } => handle_category_list(service),
        Command::Today => handle_today(service),
        Command::Week { from } => handle_week(from, service),
        Command::Log => handle_log(service),
        Command::Delete { id } => handle_delete(id, service)?,
        Command::Export { path } => {
            export::write_json(&path, service.categories(), service.logs(), service.now())?;
            println!("Exported {} entries to {}", service.logs().len(), path.display());
        }
    }
    Ok(())
}

fn handle_category_add<S: Storage, C: Clock>(name: String, service: &mut TaskService<S, C>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        println!("Category name cannot be empty.");
        return Ok(());
    }
    let category = service.add_category(name)?;
    println!("Added category {}. {}", category.id, category.name);
    Ok(())
}

fn handle_category_list<S: Storage, C: Clock>(service: &TaskService<S, C>) {
    for category in service.categories() {
        println!("{}. {}", category.id, category.name);
    }
}

fn handle_today<S: Storage, C: Clock>(service: &TaskService<S, C>) {
    let now = service.now();
    let summary = DailySummary::for_day_of(now, service.today_tasks());
    println!("Daily Summary - {}", summary.date().format("%Y-%m-%d"));
    if !summary.has_data() {
        println!("No tasks recorded today.");
        return;
    }
    println!("{} {:>10}  Category", clamp_name("Task", NAME_WIDTH), "Time");
    for total in summary.task_totals(now) {
        let category = summary
            .category_of(&total.label)
            .and_then(|id| service.category(id))
            .map(|category| category.name.as_str())
            .unwrap_or(UNCATEGORIZED);
        println!(
            "{} {:>10}  {category}",
            clamp_name(&total.label, NAME_WIDTH),
            format_duration(total.duration)
        );
    }
    println!("{} {:>10}", clamp_name("Total", NAME_WIDTH), format_duration(summary.total(now)));
}

fn handle_week<S: Storage, C: Clock>(from: Option<NaiveDate>, service: &TaskService<S, C>) {
    let groups = service.weekly_groups();
    let index = window_index(&groups, from);
    let Some(window) = index.and_then(|index| RollingWindow::select(&groups, index)) else {
        println!("No weekly data available.");
        return;
    };

    let now = service.now();
    let (oldest, newest) = window.range();
    println!(
        "TOTAL AGGREGATES ({} to {})",
        oldest.format("%Y-%m-%d"),
        newest.format("%Y-%m-%d")
    );
    print_totals("Category", &window.category_totals(service.categories(), now));
    print_totals("Task", &window.task_totals(now));

    println!();
    println!("WEEKLY BREAKDOWN");
    for week in window.weeks() {
        print_week(week, service);
    }
}

/// Position of the newest group no later than the week containing `from`.
/// Without a date the window starts at the newest group.
fn window_index(groups: &[WeekGroup<'_>], from: Option<NaiveDate>) -> Option<usize> {
    match from {
        Some(date) => {
            let target = WeekWindow::containing(date);
            groups.iter().position(|group| group.window <= target)
        }
        None => (!groups.is_empty()).then_some(0),
    }
}

fn print_week<S: Storage, C: Clock>(week: &WeekGroup<'_>, service: &TaskService<S, C>) {
    let now = service.now();
    println!();
    println!("Week {}", week.window.label());
    print_totals("Category", &week.category_totals(service.categories(), now));
    print_totals("Task", &week.task_totals(now));
}

fn print_totals(heading: &str, totals: &[Total]) {
    println!();
    println!("{} {:>10}", clamp_name(heading, NAME_WIDTH), "Time");
    for total in totals {
        println!(
            "{} {:>10}",
            clamp_name(&total.label, NAME_WIDTH),
            format_duration(total.duration)
        );
    }
}

fn handle_log<S: Storage, C: Clock>(service: &TaskService<S, C>) {
    let mut logs: Vec<_> = service.logs().iter().collect();
    if logs.is_empty() {
        println!("No entries recorded.");
        return;
    }
    logs.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    let now = service.now();
    for log in logs {
        let category = service
            .category(log.category_id)
            .map(|category| category.name.as_str())
            .unwrap_or(UNCATEGORIZED);
        println!(
            "{:>4} | {} | {} | {} | {category}",
            log.id,
            log.start_time.format("%Y-%m-%d %H:%M"),
            clamp_name(&log.name, NAME_WIDTH),
            format_duration(log.duration(now))
        );
    }
}

fn handle_delete<S: Storage, C: Clock>(id: TaskId, service: &mut TaskService<S, C>) -> Result<()> {
    if service.delete_log(id)? {
        println!("Entry {id} deleted.");
    } else {
        println!("Entry {id} not found.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Local, TimeZone};

    use super::*;
    use crate::clock::FakeClock;
    use crate::service::MemoryStorage;
    use crate::types::TaskRecord;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn at(month: u32, day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap()
    }

    /// Entries in the weeks of Feb 5, Feb 12, Feb 26, Mar 4 and Mar 11; the
    /// week of Feb 19 is empty.
    fn service() -> TaskService<MemoryStorage, FakeClock> {
        let logs = [(2, 6), (2, 14), (2, 27), (3, 5), (3, 12)]
            .into_iter()
            .zip(1..)
            .map(|((month, day), id)| {
                let mut task = TaskRecord::started(id, format!("Task {id}"), 1, at(month, day));
                task.complete_at(at(month, day) + Duration::minutes(30));
                task
            })
            .collect();
        let storage = MemoryStorage {
            logs,
            ..MemoryStorage::default()
        };
        TaskService::new(storage, FakeClock::at(at(3, 13))).unwrap()
    }

    fn starts(groups: &[WeekGroup<'_>], index: Option<usize>) -> Option<Vec<NaiveDate>> {
        let window = RollingWindow::select(groups, index?)?;
        Some(window.weeks().iter().map(|week| week.window.start()).collect())
    }

    #[test]
    fn week_from_middle_date_starts_at_its_week() {
        let service = service();
        let groups = service.weekly_groups();

        let index = window_index(&groups, Some(date(2, 28)));
        assert_eq!(index, Some(2));
        assert_eq!(
            starts(&groups, index),
            Some(vec![date(2, 26), date(2, 12), date(2, 5)])
        );
    }

    #[test]
    fn week_from_empty_week_falls_back_to_older_week() {
        let service = service();
        let groups = service.weekly_groups();
        assert_eq!(window_index(&groups, Some(date(2, 21))), Some(3));
    }

    #[test]
    fn week_from_future_date_starts_at_newest_week() {
        let service = service();
        let groups = service.weekly_groups();

        let index = window_index(&groups, Some(date(6, 1)));
        assert_eq!(index, Some(0));
        assert_eq!(
            starts(&groups, index),
            Some(vec![date(3, 11), date(3, 4), date(2, 26), date(2, 12)])
        );
        assert_eq!(window_index(&groups, None), Some(0));
    }

    #[test]
    fn week_from_date_before_all_data_finds_nothing() {
        let service = service();
        let groups = service.weekly_groups();
        assert_eq!(window_index(&groups, Some(date(1, 1))), None);
        assert_eq!(window_index(&[], None), None);
    }

    #[test]
    fn commands_run_over_stored_entries() {
        let mut service = service();
        for from in [Some(date(2, 28)), Some(date(6, 1)), Some(date(1, 1)), None] {
            run(Command::Week { from }, &mut service).unwrap();
        }
        run(Command::Today, &mut service).unwrap();
        run(Command::Log, &mut service).unwrap();
        run(Command::Delete { id: 5 }, &mut service).unwrap();
        assert_eq!(service.logs().len(), 4);
    }
}
