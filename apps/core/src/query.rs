use crate::model::is_token_separator;

/// Query field contents split into the search prefix and the activation
/// parameter.
///
/// Only the text before the first whitespace character is searched. The
/// rest is handed verbatim to activation, e.g. as a status message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub raw: String,
    pub search: String,
    pub parameter: Option<String>,
}

impl ParsedQuery {
    pub fn parse(input: &str) -> Self {
        let (search, parameter) = match input.split_once(is_token_separator) {
            Some((search, rest)) if !rest.is_empty() => (search, Some(rest.to_string())),
            Some((search, _)) => (search, None),
            None => (input, None),
        };

        Self {
            raw: input.to_string(),
            search: search.to_string(),
            parameter,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.search.is_empty()
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }
}
