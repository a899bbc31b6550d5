use chrono::{DateTime, Utc};
use colored::Colorize;
use notely::config::{ConfigKey, NotelyConfig};
use notely::controllers::{Notice, NoticeLevel};
use notely::model::{Note, UserProfile};
use notely::validation::PasswordStrength;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

pub(super) fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => println!("{}", notice.content.dimmed()),
        NoticeLevel::Success => println!("{}", notice.content.green()),
        NoticeLevel::Warning => println!("{}", notice.content.yellow()),
        NoticeLevel::Error => println!("{}", notice.content.red()),
    }
}

pub(super) fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes yet.");
        return;
    }

    for (i, note) in notes.iter().enumerate() {
        let idx_str = format!("{:>3}. ", i + 1);
        let time_ago = note
            .created_at
            .map(format_time_ago)
            .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

        let description: String = note
            .description
            .chars()
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();

        let fixed_width = idx_str.width() + TIME_WIDTH + 2;
        let available = LINE_WIDTH.saturating_sub(fixed_width);

        let title_display = truncate_to_width(&note.title, available);
        let rest = available.saturating_sub(title_display.width() + 1);
        let description_display = truncate_to_width(&description, rest);
        let padding =
            available.saturating_sub(title_display.width() + 1 + description_display.width());

        println!(
            "{}{} {}{}  {}",
            idx_str.yellow(),
            title_display.bold(),
            description_display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_profile(user: &UserProfile) {
    println!("{} <{}>", user.name.bold(), user.email);
}

pub(super) fn print_strength(strength: PasswordStrength) {
    let Some(label) = strength.label() else {
        return;
    };
    let label = match strength.score() {
        0..=2 => label.red(),
        3 => label.yellow(),
        _ => label.green(),
    };
    println!("Password strength: {}", label);
}

pub(super) fn print_config(config: &NotelyConfig) {
    for key in ConfigKey::all() {
        println!("{} = {}", key.name(), config.get(*key));
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    if max_width > 0 {
        result.push('…');
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
