//! `diffvibe highlight`: highlights stdin, one markup line per input line.
//!
//! ```bash
//! cat src/main.rs | diffvibe highlight --path src/main.rs
//! ```

use std::io::{self, BufRead, Write};

use diffvibe_core::AppSession;

use crate::error::CliError;

pub fn run(session: &AppSession, path: &str, theme: Option<&str>) -> Result<(), CliError> {
    if let Some(theme) = theme {
        session.highlighter.set_theme(theme);
    }

    let lines = io::stdin().lock().lines().collect::<io::Result<Vec<_>>>()?;
    let markup = session.highlighter.highlight_lines(&lines, path);

    let mut out = io::stdout().lock();
    for line in markup {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}
