use chrono::{DateTime, Utc};
use cms::api::{CmdMessage, MessageLevel};
use cms::config::CmsConfig;
use cms::error::Result;
use cms::model::Post;
use colored::Colorize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 6;
const SLUG_WIDTH: usize = 24;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn print_post(post: &Post) {
    println!("{} {}", format!("#{}", post.id).yellow(), post.title.bold());
    println!("--------------------------------");
    print_field("slug", post.slug.as_deref());
    print_field("author", post.author.as_deref());
    println!(
        "{} {} ({})",
        "created ".dimmed(),
        post.created_at.to_rfc3339(),
        format_time_ago(post.created_at).trim()
    );
    println!(
        "{} {} ({})",
        "updated ".dimmed(),
        post.updated_at.to_rfc3339(),
        format_time_ago(post.updated_at).trim()
    );
    println!("--------------------------------");
    match post.content.as_deref() {
        Some(content) => println!("{}", content),
        None => println!("{}", "(no content)".dimmed()),
    }
}

fn print_field(label: &str, value: Option<&str>) {
    let label = format!("{:<8}", label);
    match value {
        Some(value) => println!("{} {}", label.dimmed(), value),
        None => println!("{} {}", label.dimmed(), "-".dimmed()),
    }
}

pub(super) fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts found.");
        return;
    }

    for post in posts {
        println!("{}", format_post_line(post));
    }
}

fn format_post_line(post: &Post) -> String {
    let id_str = format!("{:>width$}. ", post.id, width = ID_WIDTH - 2);
    let slug = truncate_to_width(post.slug.as_deref().unwrap_or("-"), SLUG_WIDTH - 1);
    let slug_padding = SLUG_WIDTH.saturating_sub(slug.width());

    let title_author = match post.author.as_deref() {
        Some(author) => format!("{} by {}", post.title, author),
        None => post.title.clone(),
    };

    let fixed_width = ID_WIDTH + SLUG_WIDTH + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed_width);
    let title_display = truncate_to_width(&title_author, available);
    let padding = available.saturating_sub(title_display.width());

    format!(
        "{}{}{}{}{}{}",
        id_str.yellow(),
        title_display,
        " ".repeat(padding),
        slug.cyan(),
        " ".repeat(slug_padding),
        format_time_ago(post.created_at).dimmed()
    )
}

pub(super) fn print_config(config: &CmsConfig) {
    for key in cms::config::KEYS {
        let value = config.get(key).unwrap_or_default();
        println!("{} = {}", key, value);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c = if c == '\n' { ' ' } else { c };
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
