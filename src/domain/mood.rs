use std::fmt;

pub const UNKNOWN_MOOD: &str = "Unknown";

/// Single-word mood or topic shown to the user and fed to song recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodLabel(String);

impl MoodLabel {
    pub fn unknown() -> Self {
        Self(UNKNOWN_MOOD.to_string())
    }

    /// Trims and capitalizes raw input. Blank input yields `None`.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(capitalize(trimmed)))
    }

    /// Normalizes a model reply, falling back to the sentinel when it is blank.
    pub fn from_reply(reply: &str) -> Self {
        Self::normalize(reply).unwrap_or_else(Self::unknown)
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_MOOD
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_lowercase_key_when_normalizing_then_first_letter_is_upper() {
        assert_eq!(MoodLabel::normalize("joy").unwrap().as_str(), "Joy");
    }

    #[test]
    fn given_padded_uppercase_key_when_normalizing_then_trims_before_capitalizing() {
        assert_eq!(MoodLabel::normalize(" SAD ").unwrap().as_str(), "Sad");
    }

    #[test]
    fn given_blank_key_when_normalizing_then_returns_none() {
        assert!(MoodLabel::normalize("   ").is_none());
    }

    #[test]
    fn given_reply_with_trailing_newline_when_parsing_then_label_is_clean() {
        assert_eq!(MoodLabel::from_reply("excitement\n").as_str(), "Excitement");
    }

    #[test]
    fn given_blank_reply_when_parsing_then_returns_unknown() {
        assert!(MoodLabel::from_reply("").is_unknown());
    }

    #[test]
    fn given_non_ascii_word_when_capitalizing_then_handles_multibyte_chars() {
        assert_eq!(capitalize("éTÉ"), "Été");
    }
}
