//! CSV transfer CLI commands

use std::path::PathBuf;

use crate::error::LivrariaResult;
use crate::services::TransferService;
use crate::storage::Storage;

/// Handle `livraria export`
pub fn handle_export_command(storage: &Storage, output: Option<PathBuf>) -> LivrariaResult<()> {
    let service = TransferService::new(storage);

    let (path, count) = match output {
        Some(path) => {
            let count = service.export_to_file(&path)?;
            (path, count)
        }
        None => service.export_default()?,
    };

    println!("Exported {} book(s) to {}", count, path.display());
    Ok(())
}

/// Handle `livraria import <file>`
pub fn handle_import_command(storage: &Storage, file: &str) -> LivrariaResult<()> {
    let result = TransferService::new(storage).import_file(file)?;

    if result.imported.is_empty() {
        println!("No books found in {}", result.source.display());
        return Ok(());
    }

    println!(
        "Imported {} book(s) from {}",
        result.imported.len(),
        result.source.display()
    );
    if let Some(snapshot) = &result.snapshot {
        println!("Snapshot: {}", snapshot.display());
    }
    if !result.pruned.is_empty() {
        println!("Pruned {} old snapshot(s)", result.pruned.len());
    }

    Ok(())
}
