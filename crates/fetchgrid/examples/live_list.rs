//! A live list over an in-memory store.
//!
//! Run with:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example live_list
//! ```

use std::sync::Arc;

use fetchgrid::prelude::*;

#[derive(Clone, PartialEq, Debug)]
struct Task {
    title: String,
    priority: i64,
    done: bool,
}

fn task(title: &str, priority: i64) -> Task {
    Task { title: title.to_string(), priority, done: false }
}

struct PrintingObserver;

impl ListChangeObserver<Task> for PrintingObserver {
    fn row_inserted(&self, item: &Task, at: IndexPath) {
        println!("  + {at} {}", item.title);
    }

    fn row_deleted(&self, item: &Task, at: IndexPath) {
        println!("  - {at} {}", item.title);
    }

    fn row_moved(&self, item: &Task, from: IndexPath, to: IndexPath) {
        println!("  ~ {from} -> {to} {}", item.title);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let store = Arc::new(MemoryStore::with_items(
        "Task",
        vec![task("Write report", 2), task("Review patches", 1)],
    ));

    let mut controller = ListController::new(store.clone(), RecordingView::new())
        .with_observer(Arc::new(PrintingObserver));
    controller.configure(
        QueryDescriptor::for_entity_named("Task")
            .filter(|t: &Task| !t.done)
            .sort(SortDescriptor::ascending_by_key("priority", |t: &Task| t.priority)),
    );
    controller.add_context_menu(vec![
        MenuAction::new("complete", "Mark done"),
        MenuAction::new("delete", "Delete"),
    ]);
    let refresh = controller.attach_refresh_control(|| println!("refresh requested"));
    refresh.set_title("Syncing tasks");

    println!("initial rows: {}", controller.row_count(0));

    println!("insert:");
    store.insert(task("Fix flaky test", 0));

    println!("bump priority:");
    store.update_at(0, |t| t.priority = 5); // "Write report" moves to the tail

    println!("complete a task:");
    store.update_at(1, |t| t.done = true); // falls out of the filter

    println!("final rows: {}", controller.row_count(0));
    for row in 0..controller.row_count(0) {
        let path = IndexPath::new(0, row);
        if let Some(task) = controller.item(&path) {
            println!("  {path} {} (priority {})", task.title, task.priority);
        }
    }

    refresh.trigger();
    refresh.end_refreshing();
}
