//! Dry-run rendering: the assembled command as one shell-quoted line.

use std::borrow::Cow;

use shell_escape::unix::escape;

/// Quote `program` and every argument for a POSIX shell and join them.
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(|part| escape(Cow::Borrowed(part)))
        .collect::<Vec<_>>()
        .join(" ")
}
