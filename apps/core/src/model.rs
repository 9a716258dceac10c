use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Separators between the tokens of a display name: space, tab, vertical
/// tab, newline, carriage return and form feed.
const TOKEN_SEPARATORS: [char; 6] = [' ', '\t', '\u{0B}', '\n', '\r', '\u{0C}'];

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

handle!(
    /// Buddy-list contact.
    ContactId,
    "contact"
);
handle!(
    /// Buddy-list chat.
    ChatId,
    "chat"
);
handle!(
    /// One status of one active account.
    StatusId,
    "status"
);
handle!(SavedStatusId, "saved-status");
handle!(
    /// Oldest unseen message of an unread conversation.
    MessageId,
    "message"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPrimitive {
    Unset,
    Offline,
    Available,
    Unavailable,
    Invisible,
    Away,
    ExtendedAway,
    Mobile,
    Tune,
    Mood,
}

impl StatusPrimitive {
    pub const ALL: [StatusPrimitive; 10] = [
        Self::Unset,
        Self::Offline,
        Self::Available,
        Self::Unavailable,
        Self::Invisible,
        Self::Away,
        Self::ExtendedAway,
        Self::Mobile,
        Self::Tune,
        Self::Mood,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Offline => "offline",
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Invisible => "invisible",
            Self::Away => "away",
            Self::ExtendedAway => "extended_away",
            Self::Mobile => "mobile",
            Self::Tune => "tune",
            Self::Mood => "mood",
        }
    }

    /// English display name. Localized names come from the directory.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unset => "Unset",
            Self::Offline => "Offline",
            Self::Available => "Available",
            Self::Unavailable => "Do not disturb",
            Self::Invisible => "Invisible",
            Self::Away => "Away",
            Self::ExtendedAway => "Extended away",
            Self::Mobile => "Mobile",
            Self::Tune => "Listening to music",
            Self::Mood => "Feeling",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|primitive| primitive.id() == id)
    }

    /// Every primitive a user can switch to, i.e. all but `Unset`.
    pub fn selectable() -> impl Iterator<Item = StatusPrimitive> {
        Self::ALL
            .into_iter()
            .filter(|primitive| *primitive != Self::Unset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Quit,
    AddBuddy,
    Accounts,
    Preferences,
    Plugins,
}

/// One launchable thing. Index associations share entries through `Rc`, so
/// an entry lives exactly as long as the last association pointing at it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entry {
    Contact(ContactId),
    Chat(ChatId),
    Status(StatusId),
    StatusKind(StatusPrimitive),
    SavedStatus(SavedStatusId),
    Action(ActionId),
    Message(MessageId),
}

impl Entry {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Contact(_) => "contact",
            Self::Chat(_) => "chat",
            Self::Status(_) => "status",
            Self::StatusKind(_) => "status_kind",
            Self::SavedStatus(_) => "saved_status",
            Self::Action(_) => "action",
            Self::Message(_) => "message",
        }
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contact(id) => write!(f, "{id}"),
            Self::Chat(id) => write!(f, "{id}"),
            Self::Status(id) => write!(f, "{id}"),
            Self::StatusKind(primitive) => write!(f, "status-kind#{}", primitive.id()),
            Self::SavedStatus(id) => write!(f, "{id}"),
            Self::Action(action) => write!(f, "action#{action:?}"),
            Self::Message(id) => write!(f, "{id}"),
        }
    }
}

pub fn is_token_separator(c: char) -> bool {
    TOKEN_SEPARATORS.contains(&c)
}

/// Non-empty whitespace-separated tokens of a display name.
pub fn tokenize(name: &str) -> impl Iterator<Item = &str> {
    name.split(is_token_separator)
        .filter(|token| !token.is_empty())
}

/// Full Unicode case folding, so `Straße` and `STRASSE` compare equal.
pub fn casefold(input: &str) -> String {
    caseless::default_case_fold_str(input)
}

#[cfg(test)]
mod tests {
    use super::{casefold, tokenize, StatusPrimitive};

    #[test]
    fn tokenize_skips_runs_of_separators() {
        let tokens: Vec<&str> = tokenize("  John\t\tSmith\u{0B}\r\nJr\u{0C}").collect();
        assert_eq!(tokens, vec!["John", "Smith", "Jr"]);
    }

    #[test]
    fn tokenize_keeps_non_ascii_spaces_inside_tokens() {
        let tokens: Vec<&str> = tokenize("Jean\u{00A0}Luc Picard").collect();
        assert_eq!(tokens, vec!["Jean\u{00A0}Luc", "Picard"]);
    }

    #[test]
    fn casefold_is_full_folding_not_lowercasing() {
        assert_eq!(casefold("Straße"), "strasse");
        assert_eq!(casefold("ΣΊΣΥΦΟΣ"), casefold("σίσυφος"));
    }

    #[test]
    fn selectable_primitives_skip_unset() {
        let ids: Vec<&str> = StatusPrimitive::selectable().map(|p| p.id()).collect();
        assert_eq!(ids.len(), StatusPrimitive::ALL.len() - 1);
        assert!(!ids.contains(&"unset"));
        assert_eq!(StatusPrimitive::from_id("extended_away"), Some(StatusPrimitive::ExtendedAway));
    }
}
