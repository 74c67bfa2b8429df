/*
 * Template rendering
 *
 * A template is literal text with `{keyword}` placeholders. Recognized
 * keywords are level, thread, category, message, timestamp and location.
 * Anything else, including a `{` with no closing `}`, is copied through
 * byte for byte. Rendering cannot fail.
 */

use chrono::Local;
use std::fmt::Write;

use crate::config::{FormatSnapshot, LocationMode, TimestampMode};
use crate::context::Context;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Level,
    Thread,
    Category,
    Message,
    Timestamp,
    Location,
}

impl Keyword {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "level" => Some(Keyword::Level),
            "thread" => Some(Keyword::Thread),
            "category" => Some(Keyword::Category),
            "message" => Some(Keyword::Message),
            "timestamp" => Some(Keyword::Timestamp),
            "location" => Some(Keyword::Location),
            _ => None,
        }
    }
}

/// Render one log line, newline included.
pub fn render(message: &str, context: &Context<'_>, snapshot: &FormatSnapshot) -> String {
    let template = snapshot.format.as_str();
    let mut out = String::with_capacity(template.len() + message.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let keyword = after
            .find('}')
            .and_then(|close| Keyword::parse(&after[..close]).map(|k| (k, close)));

        match keyword {
            Some((keyword, close)) => {
                write_keyword(&mut out, keyword, message, context, snapshot);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out.push('\n');
    out
}

fn write_keyword(
    out: &mut String,
    keyword: Keyword,
    message: &str,
    context: &Context<'_>,
    snapshot: &FormatSnapshot,
) {
    // Writing into a String cannot fail
    let _ = match keyword {
        Keyword::Level => {
            out.push(context.level().as_char());
            Ok(())
        }
        Keyword::Thread => write!(out, "{}", context.thread_id()),
        Keyword::Category => {
            out.push_str(context.category());
            Ok(())
        }
        Keyword::Message => {
            out.push_str(message);
            Ok(())
        }
        Keyword::Timestamp => match snapshot.timestamp_mode {
            TimestampMode::Utc => write!(out, "{}", context.timestamp().format(TIMESTAMP_FORMAT)),
            TimestampMode::Local => write!(
                out,
                "{}",
                context.timestamp().with_timezone(&Local).format(TIMESTAMP_FORMAT)
            ),
        },
        Keyword::Location => match context.location() {
            Some(location) => {
                let file = match snapshot.location_mode {
                    LocationMode::FullPath => location.file,
                    LocationMode::FileName => location.file_name(),
                };
                write!(out, "{}:{}", file, location.line)
            }
            None => Ok(()),
        },
    };
}
