//! Audit log CLI command

use crate::audit::AuditLogger;
use crate::config::paths::LivrariaPaths;
use crate::error::LivrariaResult;

/// Handle `livraria log`
pub fn handle_log_command(paths: &LivrariaPaths, limit: usize) -> LivrariaResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(limit)?;

    if entries.is_empty() {
        println!("No changes recorded in {}", logger.path().display());
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!("Showing {} most recent change(s)", entries.len());

    Ok(())
}
