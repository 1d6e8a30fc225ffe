//! Line-oriented output with optional ASCII art column

use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use unicode_width::UnicodeWidthStr;

use crate::config::{Config, ConfigEntry};
use crate::modules::FactLine;

/// Translate a color name or `#rrggbb` value into an ANSI escape
pub fn hex_to_ansi(color: &str) -> String {
    if let Some(code) = ansi_color_code(color) {
        return code;
    }
    if color.starts_with('#') && color.len() == 7 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&color[1..3], 16),
            u8::from_str_radix(&color[3..5], 16),
            u8::from_str_radix(&color[5..7], 16),
        ) {
            return format!("\x1b[38;2;{};{};{}m", r, g, b);
        }
    }
    "\x1b[0m".to_string()
}

fn ansi_color_code(name: &str) -> Option<String> {
    let code = match name.to_lowercase().as_str() {
        "black" => "\x1b[30m",
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",
        "bright_black" | "gray" | "grey" => "\x1b[90m",
        "bright_red" => "\x1b[91m",
        "bright_green" => "\x1b[92m",
        "bright_yellow" => "\x1b[93m",
        "bright_blue" => "\x1b[94m",
        "bright_magenta" => "\x1b[95m",
        "bright_cyan" => "\x1b[96m",
        "bright_white" => "\x1b[97m",
        "reset" | "default" => "\x1b[0m",
        _ => return None,
    };
    Some(code.to_string())
}

fn entry_color(config: &Config, name: &str) -> String {
    if name.is_empty() {
        return "\x1b[0m".to_string();
    }
    config
        .colors
        .get(name)
        .map(|color| hex_to_ansi(color))
        .unwrap_or_else(|| hex_to_ansi(name))
}

/// Lines of the configured ASCII art file, tilde-expanded; empty when unset
pub fn load_ascii_lines(config: &Config) -> Vec<String> {
    let path = config.display.ascii_path.trim();
    if path.is_empty() {
        return Vec::new();
    }
    let expanded = shellexpand::tilde(path).to_string();
    if !Path::new(&expanded).exists() {
        return Vec::new();
    }
    match fs::File::open(&expanded) {
        Ok(file) => io::BufReader::new(file)
            .lines()
            .filter_map(|line| line.ok())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Print every fact line beside the ASCII column
pub fn render(config: &Config, items: &[(ConfigEntry, FactLine)]) {
    let separator = &config.display.separator;
    let ascii_lines = load_ascii_lines(config);
    let max_width = ascii_lines
        .iter()
        .map(|line| UnicodeWidthStr::width(line.as_str()))
        .max()
        .unwrap_or(0);
    let ascii_color = entry_color(config, &config.display.ascii_color);

    for (i, (entry, line)) in items.iter().enumerate() {
        let ascii = ascii_lines.get(i).map(String::as_str).unwrap_or("");
        let padding = " ".repeat(max_width.saturating_sub(UnicodeWidthStr::width(ascii)));
        let gutter = if max_width == 0 { "" } else { "  " };
        let key_color = entry_color(config, &entry.color);

        if line.key.is_empty() {
            println!(
                "{}{}{}\x1b[0m{}\x1b[1m{}\x1b[0m",
                ascii_color, ascii, padding, gutter, line.value
            );
        } else {
            println!(
                "{}{}{}\x1b[0m{}{}{}{}\x1b[0m{}",
                ascii_color, ascii, padding, gutter, key_color, line.key, separator, line.value
            );
        }
    }

    // Art taller than the item list still prints in full
    for line in ascii_lines.iter().skip(items.len()) {
        println!("{}{}\x1b[0m", ascii_color, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_become_truecolor_escapes() {
        assert_eq!(hex_to_ansi("#ff0000"), "\x1b[38;2;255;0;0m");
        assert_eq!(hex_to_ansi("#7aa2f7"), "\x1b[38;2;122;162;247m");
    }

    #[test]
    fn named_colors_resolve_case_insensitively() {
        assert_eq!(hex_to_ansi("blue"), "\x1b[34m");
        assert_eq!(hex_to_ansi("Bright_Cyan"), "\x1b[96m");
    }

    #[test]
    fn unknown_colors_fall_back_to_reset() {
        assert_eq!(hex_to_ansi("not-a-color"), "\x1b[0m");
        assert_eq!(hex_to_ansi("#zzz"), "\x1b[0m");
    }
}
