//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `reflecto_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use reflecto_core::db::open_db_in_memory;
use reflecto_core::{Journal, SessionHub, SqliteEntryStore};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    println!("reflecto_core version={}", reflecto_core::core_version());

    // Guest-mode round trip against an in-memory store, to confirm the
    // journal wiring end to end without touching any real database file.
    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("reflecto_cli: failed to open in-memory store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let hub = SessionHub::new();
    let journal = Arc::new(Journal::new(SqliteEntryStore::new(conn)));
    let subscription = journal.attach(&hub);

    if let Err(err) = journal.create("smoke entry") {
        eprintln!("reflecto_cli: guest create failed: {err}");
        return ExitCode::FAILURE;
    }

    println!("guest_mode entries={}", journal.list().len());
    subscription.cancel();
    ExitCode::SUCCESS
}
