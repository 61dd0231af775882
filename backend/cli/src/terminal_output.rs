//! Terminal output utilities: diagnostics, ANSI styling, table rendering.

use std::io::IsTerminal;

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Check if stdout supports color output.
pub fn supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal()
        && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false)
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm'
            for next in chars.by_ref() {
                if next == 'm' { break; }
            }
        } else {
            result.push(c);
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

/// Print a single-line fatal diagnostic to stderr.
pub fn note_error(msg: &str) {
    let msg = msg.replace('\n', " ");
    if std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
        eprintln!("{RED}{BOLD}devcon:{RESET} {msg}");
    } else {
        eprintln!("devcon: {msg}");
    }
}

/// Print a status line with a pass/fail marker.
pub fn note_status(ok: bool, msg: &str) {
    match (ok, supports_color()) {
        (true, true) => println!("  {GREEN}{BOLD}✓{RESET} {msg}"),
        (false, true) => println!("  {RED}{BOLD}✗{RESET} {msg}"),
        (true, false) => println!("  OK: {msg}"),
        (false, false) => println!("  FAIL: {msg}"),
    }
}

/// Print an indented informational line.
pub fn note_detail(label: &str, value: &str) {
    if supports_color() {
        println!("  {YELLOW}{label}{RESET} {value}");
    } else {
        println!("  {label} {value}");
    }
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// Render a left-aligned table with a bold header and a dashed separator.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], color: bool) -> String {
    let num_cols = headers.len();
    // Compute column widths.
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(num_cols) {
            widths[i] = widths[i].max(strip_ansi(cell).chars().count());
        }
    }

    let mut out = String::new();

    let header_cells: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad_cell(h, widths[i]))
        .collect();
    let header = header_cells.join("  ");
    if color {
        out.push_str(&format!("{BOLD}{}{RESET}\n", header.trim_end()));
    } else {
        out.push_str(&format!("{}\n", header.trim_end()));
    }

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", sep.join("  ")));

    for row in rows {
        let cells: Vec<String> = (0..num_cols)
            .map(|i| pad_cell(row.get(i).map(String::as_str).unwrap_or(""), widths[i]))
            .collect();
        out.push_str(&format!("{}\n", cells.join("  ").trim_end()));
    }

    out
}

fn pad_cell(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(strip_ansi(s).chars().count());
    format!("{s}{}", " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn renders_aligned_table() {
        let rows = vec![
            vec!["codex".to_string(), "img/codex".to_string()],
            vec!["aider".to_string(), "img/aider:latest".to_string()],
        ];
        let table = render_table(&["NAME", "IMAGE"], &rows, false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "NAME   IMAGE");
        assert_eq!(lines[1], "-----  ----------------");
        assert_eq!(lines[2], "codex  img/codex");
        assert_eq!(lines[3], "aider  img/aider:latest");
    }
}
