//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `todolist_core` linkage.
//! - Exercise one write/list round trip on a throwaway in-memory store.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;
use todolist_core::{AppConfig, Task, TodoApp};

fn main() -> ExitCode {
    println!("todolist_core ping={}", todolist_core::ping());
    println!("todolist_core version={}", todolist_core::core_version());

    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("todolist_core runtime error={err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(probe_store()) {
        Ok(count) => {
            println!("todolist_core store=ok tasks={count}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("todolist_core store=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn probe_store() -> Result<usize, Box<dyn std::error::Error>> {
    let app = TodoApp::open(&AppConfig::default())?;
    let use_cases = app.use_cases();
    use_cases
        .upsert_task
        .invoke(&Task::new("smoke", None, false, todolist_core::now_epoch_ms()))
        .await?;
    let mut tasks = use_cases.get_tasks.invoke().await?;
    Ok(tasks.next().await.map_or(0, |snapshot| snapshot.len()))
}
