//! Text rendering for match lists, selection menus and metadata reports.

use crossterm::style::{Color, Stylize};

use crate::auto::DirInfo;

const NUMBER_COLOR: Color = Color::Yellow;
const DIR_COLOR: Color = Color::Blue;
const TAG_COLOR: Color = Color::Cyan;

/// Sanitize control characters to avoid terminal control-sequence injection.
pub fn sanitize_terminal_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFF {
                    out.push_str(&format!("\\x{:02X}", code));
                } else {
                    out.push_str(&format!("\\u{{{:X}}}", code));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// One sanitized line per match.
pub fn format_match_list(matches: &[String]) -> Vec<String> {
    matches.iter().map(|m| sanitize_terminal_text(m)).collect()
}

/// Enumerated menu, numbers right-aligned to the widest index.
pub fn format_menu(matches: &[String], use_color: bool) -> Vec<String> {
    let width = matches.len().to_string().len();
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let number = format!("{:>width$}", i + 1);
            let number = if use_color {
                number.with(NUMBER_COLOR).to_string()
            } else {
                number
            };
            format!("{number}) {}", sanitize_terminal_text(m))
        })
        .collect()
}

/// Directory lines followed by indented tags and description.
pub fn format_report(infos: &[DirInfo], use_color: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for info in infos {
        let dir = sanitize_terminal_text(&info.dir.to_string_lossy());
        lines.push(if use_color {
            dir.with(DIR_COLOR).bold().to_string()
        } else {
            dir
        });

        let Some(meta) = &info.meta else { continue };
        if !meta.tags.is_empty() {
            let tags = sanitize_terminal_text(&meta.tags.join(" "));
            let tags = if use_color {
                tags.with(TAG_COLOR).to_string()
            } else {
                tags
            };
            lines.push(format!("    tags: {tags}"));
        }
        if let Some(desc) = &meta.description {
            lines.push(format!("    {}", sanitize_terminal_text(desc)));
        }
    }
    lines
}
