//! `diffvibe recent`: inspect and edit the recent-comparisons list.

use chrono::{DateTime, Local};
use diffvibe_core::{AppSession, CompareMode, NewRecentComparison, RecentComparison};

use crate::error::CliError;

pub fn list(session: &AppSession, json: bool) -> Result<(), CliError> {
    let items = session.tabs.recent().items();
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No recent comparisons");
    }
    for (index, item) in items.iter().enumerate() {
        println!("{}", format_entry(index, item));
    }
    Ok(())
}

pub fn add(
    session: &mut AppSession,
    left: String,
    right: String,
    mode: CompareMode,
    base: Option<String>,
) -> Result<(), CliError> {
    session
        .tabs
        .recent_mut()
        .add(NewRecentComparison::new(left, right, mode).with_base(base))?;
    tracing::info!(count = session.tabs.recent().len(), "Recorded recent comparison");
    Ok(())
}

pub fn remove(session: &mut AppSession, index: usize) -> Result<(), CliError> {
    let len = session.tabs.recent().len();
    if index >= len {
        return Err(CliError::NoSuchRecent { index, len });
    }
    session.tabs.recent_mut().remove(index)?;
    Ok(())
}

pub fn clear(session: &mut AppSession) -> Result<(), CliError> {
    session.tabs.recent_mut().clear()?;
    Ok(())
}

fn format_entry(index: usize, item: &RecentComparison) -> String {
    let when = DateTime::from_timestamp_millis(item.timestamp)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match &item.base {
        Some(base) => format!(
            "[{}] {:<9} {} ↔ {} (base {})  {}",
            index, item.mode, item.left, item.right, base, when
        ),
        None => format!(
            "[{}] {:<9} {} ↔ {}  {}",
            index, item.mode, item.left, item.right, when
        ),
    }
}
