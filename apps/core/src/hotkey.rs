use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
    #[error("hotkey is empty")]
    Empty,
    #[error("hotkey must include at least one modifier and one key")]
    MissingModifier,
    #[error("unsupported modifier '{0}'; use Ctrl, Alt, Shift or Super")]
    UnsupportedModifier(String),
    #[error("unsupported key '{0}'; use A-Z, 0-9, Space or F1-F24")]
    UnsupportedKey(String),
    #[error("malformed accelerator '{0}'")]
    Malformed(String),
    #[error("hotkey registration failed: {0}")]
    RegistrationFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Super,
}

impl Modifier {
    fn parse(input: &str) -> Result<Self, HotkeyError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "primary" => Ok(Self::Ctrl),
            "alt" | "mod1" => Ok(Self::Alt),
            "shift" => Ok(Self::Shift),
            "super" | "win" | "meta" | "mod4" => Ok(Self::Super),
            _ => Err(HotkeyError::UnsupportedModifier(input.trim().to_string())),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Ctrl => "Ctrl",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Super => "Super",
        }
    }

    fn accelerator(self) -> &'static str {
        match self {
            Self::Ctrl => "<Control>",
            Self::Alt => "<Alt>",
            Self::Shift => "<Shift>",
            Self::Super => "<Super>",
        }
    }
}

/// Modifiers are kept deduplicated and in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl Hotkey {
    /// GTK accelerator form, e.g. `<Control><Alt>I`.
    pub fn accelerator(&self) -> String {
        let mut out: String = self.modifiers.iter().map(|m| m.accelerator()).collect();
        out.push_str(&self.key);
        out
    }
}

impl Display for Hotkey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.label())?;
        }
        f.write_str(&self.key)
    }
}

/// Parses `Ctrl+Alt+I` or `<Control><Alt>I`.
pub fn parse_hotkey(input: &str) -> Result<Hotkey, HotkeyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(HotkeyError::Empty);
    }

    let (modifier_parts, key_raw) = if trimmed.starts_with('<') {
        split_accelerator(trimmed)?
    } else {
        let parts: Vec<&str> = trimmed
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        match parts.split_last() {
            Some((key, modifiers)) => (modifiers.to_vec(), *key),
            None => return Err(HotkeyError::Empty),
        }
    };

    let mut modifiers = BTreeSet::new();
    for part in modifier_parts {
        modifiers.insert(Modifier::parse(part)?);
    }
    if modifiers.is_empty() {
        return Err(HotkeyError::MissingModifier);
    }

    Ok(Hotkey {
        modifiers: modifiers.into_iter().collect(),
        key: normalize_key(key_raw)?,
    })
}

/// Canonical `Ctrl+Alt+Shift+Super+Key` spelling of a valid hotkey.
pub fn validate_hotkey(input: &str) -> Result<String, HotkeyError> {
    parse_hotkey(input).map(|hotkey| hotkey.to_string())
}

fn split_accelerator(input: &str) -> Result<(Vec<&str>, &str), HotkeyError> {
    let mut modifiers = Vec::new();
    let mut rest = input;
    while let Some(after_open) = rest.strip_prefix('<') {
        let close = after_open
            .find('>')
            .ok_or_else(|| HotkeyError::Malformed(input.to_string()))?;
        modifiers.push(&after_open[..close]);
        rest = &after_open[close + 1..];
    }
    if rest.trim().is_empty() {
        return Err(HotkeyError::MissingModifier);
    }
    Ok((modifiers, rest))
}

fn normalize_key(input: &str) -> Result<String, HotkeyError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(HotkeyError::UnsupportedKey(String::new()));
    }

    let upper = raw.to_ascii_uppercase();
    if upper == "SPACE" {
        return Ok("Space".to_string());
    }

    if let Some(number) = upper.strip_prefix('F') {
        if let Ok(parsed) = number.parse::<u8>() {
            if (1..=24).contains(&parsed) {
                return Ok(format!("F{parsed}"));
            }
        }
        if !number.is_empty() {
            return Err(HotkeyError::UnsupportedKey(raw.to_string()));
        }
    }

    let mut chars = upper.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Ok(upper);
        }
    }

    Err(HotkeyError::UnsupportedKey(raw.to_string()))
}
