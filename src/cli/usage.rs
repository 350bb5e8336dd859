//! Flag usage lines.
//!
//! Each visible flag renders as `  -s, --name type` followed by its usage, with all usage text
//! starting in one column two past the longest flag. Usage wraps at word boundaries to the
//! width; continuation lines are indented to the usage column.

use super::flags::FlagSet;
use super::terminal::TerminalWidth;

/// Narrowest usage column worth wrapping into.
const MIN_WRAP: usize = 24;
/// Indent for usage moved below its flag when the usage column is too narrow.
const BLOCK_INDENT: usize = 16;
/// A line may run this far past the wrap point to avoid a short orphan word.
const SLOP: usize = 5;

/// Render the usage lines of every visible flag, one per line.
pub fn flag_usages(flags: &FlagSet, width: TerminalWidth) -> String {
    let rows: Vec<(String, String)> = flags
        .iter()
        .filter(|f| !f.hidden)
        .map(|flag| {
            let mut head = match flag.shorthand {
                Some(short) => format!("  -{}, --{}", short, flag.name),
                None => format!("      --{}", flag.name),
            };
            if let Some(value_type) = &flag.value_type {
                head.push(' ');
                head.push_str(value_type);
            }
            let mut usage = flag.usage.clone();
            if let Some(default) = &flag.default {
                usage.push_str(&format!(" (default {})", default));
            }
            (head, usage)
        })
        .collect();

    let max = rows.iter().map(|(head, _)| head.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (head, usage) in rows {
        let pad = max - head.chars().count();
        out.push_str(&head);
        out.push_str(&" ".repeat(pad + 2));
        out.push_str(&wrap(max + 2, width.columns(), &usage));
        out.push('\n');
    }
    out
}

/// Wrap `text` that starts at column `indent` to `width` columns.
pub fn wrap(indent: usize, width: Option<usize>, text: &str) -> String {
    let Some(width) = width else {
        return text.replace('\n', &format!("\n{}", " ".repeat(indent)));
    };

    let mut indent = indent;
    let mut out = String::new();
    let mut room = width.saturating_sub(indent);
    if room < MIN_WRAP {
        indent = BLOCK_INDENT;
        room = width.saturating_sub(indent);
        out.push('\n');
        out.push_str(&" ".repeat(indent));
    }
    let newline = format!("\n{}", " ".repeat(indent));
    if room < MIN_WRAP {
        out.push_str(&text.replace('\n', &newline));
        return out;
    }

    let limit = room - SLOP;
    let (line, mut rest) = split_line(limit, text);
    out.push_str(&line.replace('\n', &newline));
    while !rest.is_empty() {
        let (line, remaining) = split_line(limit, rest);
        out.push_str(&newline);
        out.push_str(&line.replace('\n', &newline));
        rest = remaining;
    }
    out
}

/// Split off the first line of at most `limit` columns (plus slop), breaking at whitespace.
fn split_line(limit: usize, text: &str) -> (&str, &str) {
    if limit + SLOP > text.chars().count() {
        return (text, "");
    }
    let cut = text
        .char_indices()
        .nth(limit)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let head = &text[..cut];

    let Some(space) = head.rfind(|c: char| c == ' ' || c == '\t' || c == '\n') else {
        return (text, "");
    };
    if space == 0 {
        return (text, "");
    }
    if let Some(newline) = head.rfind('\n') {
        if newline > 0 && newline < space {
            return (&text[..newline], &text[newline + 1..]);
        }
    }
    (&text[..space], &text[space + 1..])
}
