use crate::component::{ArchiveOrganizer, DuplicateAudit};
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_archive_organizer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let organizer = ArchiveOrganizer::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = organizer.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_duplicate_audit(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let audit = DuplicateAudit::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = audit.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
