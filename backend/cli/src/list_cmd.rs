//! `devcon --list`: show the merged tool registry.

use devcon_config::{ToolDefinition, ToolRegistry};

use crate::terminal_output::{render_table, supports_color};

pub fn run(registry: &ToolRegistry) {
    print!("{}", render(registry, supports_color()));
}

fn render(registry: &ToolRegistry, color: bool) -> String {
    let rows: Vec<Vec<String>> = registry
        .iter()
        .map(|(name, tool)| {
            vec![
                name.clone(),
                tool.image.clone(),
                command_column(tool),
                tool.writable_paths.join(", "),
            ]
        })
        .collect();
    render_table(&["NAME", "IMAGE", "COMMAND", "WRITABLE PATHS"], &rows, color)
}

fn command_column(tool: &ToolDefinition) -> String {
    if tool.command.is_empty() {
        "(entrypoint)".to_string()
    } else {
        tool.command.join(" ")
    }
}
