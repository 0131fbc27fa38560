//! Error reporting for the `contact` binary.
//!
//! `eyre` reports go through color-eyre. A panic first hands the terminal back
//! (only the modes the running `Tui` actually enabled), then writes the report
//! to the log file and prints it to stderr.

use std::{
    panic::PanicHookInfo,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use color_eyre::{config::PanicHook, Result};
use tracing::error;

use crate::{config, logging, tui};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the eyre and panic hooks. Later calls do nothing.
pub fn init() -> Result<()> {
    if INSTALLED.load(Ordering::SeqCst) {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(panic_section())
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;
    std::panic::set_hook(Box::new(move |info| on_panic(&panic_hook, info)));

    INSTALLED.store(true, Ordering::SeqCst);
    Ok(())
}

fn log_path() -> PathBuf {
    config::get_data_dir().join(logging::LOG_FILE.as_str())
}

fn panic_section() -> String {
    format!(
        "The contact form crashed. Details were written to {}",
        log_path().display()
    )
}

fn on_panic(panic_hook: &PanicHook, info: &PanicHookInfo<'_>) {
    if let Err(err) = tui::restore() {
        error!(%err, "terminal left in raw mode after panic");
    }

    let report = panic_hook.panic_report(info).to_string();
    error!(report = %strip_ansi_escapes::strip_str(&report), "contact panicked");

    #[cfg(debug_assertions)]
    better_panic::Settings::auto()
        .most_recent_first(false)
        .lineno_suffix(true)
        .create_panic_handler()(info);

    #[cfg(not(debug_assertions))]
    {
        use human_panic::{handle_dump, metadata, print_msg};
        let metadata = metadata!();
        if print_msg(handle_dump(&metadata, info), &metadata).is_err() {
            eprintln!("{report}");
        }
    }

    std::process::exit(libc::EXIT_FAILURE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_section_names_the_log_file() {
        let section = panic_section();
        assert!(section.contains(logging::LOG_FILE.as_str()));
        assert!(section.contains(&log_path().display().to_string()));
        assert!(!section.contains("reporting it at"));
    }
}
