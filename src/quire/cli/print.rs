use chrono::{DateTime, Utc};
use colored::Colorize;
use quire::api::{CmdMessage, MessageLevel};
use quire::model::ArchiveEntry;
use quire::render::Rendered;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const TIME_WIDTH: usize = 16;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

/// The flash goes to stdout after a success and to stderr after a failure.
pub(super) fn print_flash(flash: &str, failed: bool) {
    if failed {
        eprintln!("{}", flash.red());
    } else {
        println!("{}", flash.green());
    }
}

pub(super) fn print_names(names: &[String]) {
    if names.is_empty() {
        println!("{}", "No documents yet.".dimmed());
        return;
    }
    for name in names {
        println!("  {}", name);
    }
}

pub(super) fn print_rendered(rendered: &Rendered, raw_content: Option<&str>) {
    match raw_content {
        Some(content) => print!("{}", content),
        None => {
            println!("{}", format!("Content-Type: {}", rendered.content_type).dimmed());
            println!("{}", rendered.body);
        }
    }
}

pub(super) fn print_history(entries: &[ArchiveEntry]) {
    for entry in entries {
        let file_name = entry.file_name();
        let seq = format!("#{:<4}", entry.sequence);
        let available = LINE_WIDTH.saturating_sub(seq.width() + TIME_WIDTH + 2);
        let name_display = truncate_to_width(&file_name, available);
        let padding = available.saturating_sub(name_display.width());
        let time = entry
            .modified
            .map(format_time_ago)
            .unwrap_or_else(|| format!("{:>width$}", "-", width = TIME_WIDTH));

        println!(
            "  {}{}{}{}",
            seq.yellow(),
            name_display,
            " ".repeat(padding),
            time.dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
