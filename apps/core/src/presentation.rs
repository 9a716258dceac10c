use crate::action_registry::find_action;
use crate::directory::Directory;
use crate::model::{Entry, StatusPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Presence(StatusPrimitive),
    Stock(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Pango-style markup for message rows, plain text for every other kind.
    pub text: String,
    pub icon: Option<Icon>,
}

impl Row {
    /// Placeholder for an entry whose handle no longer resolves.
    pub fn unavailable(entry: &Entry) -> Self {
        Self {
            text: format!("({} unavailable)", entry.kind().replace('_', " ")),
            icon: None,
        }
    }
}

/// Display row for `entry`, or `None` when its object has gone away.
pub fn row<D: Directory + ?Sized>(directory: &D, entry: &Entry) -> Option<Row> {
    match entry {
        Entry::Contact(id) => directory.contact(*id).map(|contact| Row {
            text: contact.alias,
            icon: Some(Icon::Presence(contact.presence)),
        }),
        Entry::Chat(id) => directory.chat(*id).map(|chat| Row {
            text: chat.name,
            icon: Some(Icon::Presence(StatusPrimitive::Available)),
        }),
        Entry::Status(id) => directory.account_status(*id).map(|status| Row {
            text: format!("{} ({}, {})", status.name, status.protocol, status.username),
            icon: Some(Icon::Presence(status.primitive)),
        }),
        Entry::StatusKind(primitive) => {
            let record = directory.primitive(*primitive);
            Some(Row {
                text: format!("{} ({})", record.name, record.id),
                icon: Some(Icon::Presence(*primitive)),
            })
        }
        Entry::SavedStatus(id) => directory.saved_status(*id).map(|saved| Row {
            text: saved.title,
            icon: Some(Icon::Presence(saved.primitive)),
        }),
        Entry::Message(id) => directory.unread_message(*id).map(|message| Row {
            text: format!(
                "<b>{}</b>: {}",
                escape_markup(&message.sender),
                escape_markup(&strip_html(&message.body))
            ),
            icon: None,
        }),
        Entry::Action(id) => find_action(*id).map(|action| Row {
            text: action.label.to_string(),
            icon: Some(Icon::Stock(action.icon)),
        }),
    }
}

/// Drops markup tags from an IM message body, turning line-break tags into
/// newlines and decoding the common character entities.
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => match rest.find('>') {
                Some(end) => {
                    if is_line_break_tag(&rest[1..end]) {
                        out.push('\n');
                    }
                    rest = &rest[end + 1..];
                }
                None => {
                    out.push_str(rest);
                    break;
                }
            },
            '&' => match decode_entity(rest) {
                Some((decoded, consumed)) => {
                    out.push(decoded);
                    rest = &rest[consumed..];
                }
                None => {
                    out.push('&');
                    rest = &rest[1..];
                }
            },
            _ => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    out
}

/// Escapes the characters that markup would interpret.
pub fn escape_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn is_line_break_tag(tag: &str) -> bool {
    let name = tag
        .trim()
        .trim_end_matches('/')
        .split_whitespace()
        .next()
        .unwrap_or_default();
    name.eq_ignore_ascii_case("br") || name.eq_ignore_ascii_case("/p")
}

fn decode_entity(input: &str) -> Option<(char, usize)> {
    let end = input.find(';')?;
    if end > 10 {
        return None;
    }
    let name = &input[1..end];
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some((decoded, end + 1))
}
