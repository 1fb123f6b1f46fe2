use smart_todo::config::AppConfig;
use smart_todo::core::task::Task;
use smart_todo::sync::{HttpApi, Store};

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn install_logger(config: &AppConfig) {
    // Journal logging (`journalctl --user -t smart-todo -f`).
    // smart_todo targets at info/debug (per config), everything else at warn.
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("smart_todo") {
                let max = if smart_todo::debug_logging() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    smart_todo::set_debug_logging(config.debug_logging);

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(j) => j.with_syslog_identifier("smart-todo".to_string()),
        Err(e) => {
            eprintln!("Journal unavailable, logging disabled: {}", e);
            return;
        }
    };
    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        // Global max must be Debug so debug logs can pass through when enabled
        log::set_max_level(log::LevelFilter::Debug);
    }
}

fn print_task(task: &Task) {
    let mark = if task.completed() { "x" } else { " " };
    let due = task
        .due_date()
        .map(|d| format!(" due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    println!(
        "  [{}] #{:<4} {:<6} {}{}",
        mark,
        task.id,
        task.priority().as_str(),
        task.title,
        due
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let config = AppConfig::load();
    install_logger(&config);
    config.ensure_dirs()?;

    let api = HttpApi::new(&config.api_base_url)?;
    let store = Store::with_persistence(api, config.ui_state_path());

    if let Some(v) = flag_value(&args, "--status") {
        store.set_status_filter(v);
    }
    if let Some(v) = flag_value(&args, "--category") {
        store.set_category_filter(v);
    }
    if let Some(v) = flag_value(&args, "--priority") {
        store.set_priority_filter(v);
    }

    if let Err(e) = store.fetch_all().await {
        eprintln!("Could not reach {}: {}", config.api_base_url, e);
    }

    if let Some(id) = flag_value(&args, "--toggle").and_then(|v| v.parse().ok()) {
        store.toggle_task(id).await;
        if let Some(task) = store.task(id) {
            println!("#{} is now {}", id, task.status.as_str());
        }
    }

    if args.iter().any(|a| a == "--stats") {
        let s = store.server_stats().await?;
        println!("Server: {} tasks ({} pending, {} in progress, {} done), {} overdue, {} high priority",
            s.total_tasks, s.pending_tasks, s.in_progress_tasks, s.completed_tasks, s.overdue_tasks, s.high_priority_tasks);
        println!("        {} categories, {} context entries", s.categories_count, s.context_entries_count);
        return Ok(());
    }

    if args.iter().any(|a| a == "--tasks") {
        let search = flag_value(&args, "--search").unwrap_or_default();
        let ui = store.ui_state();
        let tasks = store.visible_tasks(&search);
        println!(
            "Tasks (status: {}, category: {}, priority: {}), {} shown",
            ui.status_filter, ui.category_filter, ui.priority_filter, tasks.len()
        );
        for task in &tasks {
            print_task(task);
        }
        return Ok(());
    }

    let stats = store.stats();
    println!(
        "{} tasks, {} completed, {} pending, {} high priority",
        stats.total, stats.completed, stats.pending, stats.high_priority
    );
    println!("\nRecent:");
    for task in store.recent_tasks(5) {
        print_task(&task);
    }
    let urgent = store.urgent_tasks(3);
    if !urgent.is_empty() {
        println!("\nUrgent:");
        for task in &urgent {
            print_task(task);
        }
    }
    println!(
        "\n{} categories, {} context entries",
        store.categories().len(),
        store.context_entries().len()
    );

    Ok(())
}
