mod cli;

use schema_recovery::log;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Exit status used when a second Ctrl+C forces the process down.
const FORCED_EXIT: i32 = 130;

/// First Ctrl+C cancels the running operation and leaves the menu; the second one exits at once.
fn install_interrupt_handler(interrupts: Arc<AtomicUsize>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if interrupts.fetch_add(1, Ordering::SeqCst) > 0 {
            eprintln!("\nInterrupted twice, exiting.");
            std::process::exit(FORCED_EXIT);
        }
        eprintln!("\nInterrupt received, stopping the current operation (Ctrl+C again to exit now)...");
    })
}

#[tokio::main]
async fn main() {
    log::init();

    let interrupts = Arc::new(AtomicUsize::new(0));
    if let Err(e) = install_interrupt_handler(interrupts.clone()) {
        error!("Could not install Ctrl+C handler: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = cli::run_menu(interrupts).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    info!("Schema recovery finished");
}
