//! Snapshot display formatting

use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::backup::{parse_snapshot_timestamp, SnapshotInfo, ValidationResult};

/// Format the snapshot list, newest first
pub fn format_snapshot_list(snapshots: &[SnapshotInfo], verbose: bool) -> String {
    if snapshots.is_empty() {
        return "No snapshots found.\nCreate one with: livraria backup create".to_string();
    }

    let now = SystemTime::now();
    let mut output = String::new();
    output.push_str("Available Snapshots\n");
    output.push_str("===================\n\n");

    for (i, snapshot) in snapshots.iter().enumerate() {
        let age = format_age(now, snapshot.modified);

        if verbose {
            let created = snapshot
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            output.push_str(&format!(
                "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n\n",
                i + 1,
                snapshot.filename,
                created,
                format_size(snapshot.size_bytes),
                age,
            ));
        } else {
            output.push_str(&format!(
                "  {}. {} ({} ago, {})\n",
                i + 1,
                snapshot.filename,
                age,
                format_size(snapshot.size_bytes),
            ));
        }
    }

    output.push_str(&format!("\nTotal: {} snapshot(s)", snapshots.len()));
    output
}

/// Format the details of one validated snapshot
pub fn format_snapshot_details(path: &Path, validation: &ValidationResult) -> String {
    let created = path
        .file_name()
        .and_then(|name| parse_snapshot_timestamp(&name.to_string_lossy()))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "Snapshot Details\n================\nFile: {}\nSize: {}\nCreated: {}\nModified: {} ago\nBooks: {}",
        path.display(),
        format_size(validation.size_bytes),
        created,
        format_age(SystemTime::now(), validation.modified),
        validation.book_count,
    )
}

/// Format the time elapsed between `then` and `now` in short form
pub fn format_age(now: SystemTime, then: SystemTime) -> String {
    let total_seconds = now
        .duration_since(then)
        .unwrap_or(Duration::ZERO)
        .as_secs();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
