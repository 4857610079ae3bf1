const HEADER_PREFIX: &str = "songs:";

/// Ordered song lines, each nominally "Title - Artist", in the order the model produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongList(Vec<String>);

impl SongList {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Turns a free-text recommendation block into clean song lines.
    ///
    /// Blank lines and `Songs:` headers are dropped, then one list marker is
    /// stripped per line: `12.`/`12)`, `3.`/`3)`, leading hyphens or leading
    /// asterisks. When nothing survives the first pass a looser pass that only
    /// strips asterisks is tried.
    pub fn parse(text: &str) -> Self {
        let songs: Vec<String> = text.split('\n').filter_map(clean_line).collect();
        if !songs.is_empty() || text.is_empty() {
            return Self(songs);
        }

        let fallback = text
            .split('\n')
            .filter(|line| !line.trim().is_empty() && !is_header(line))
            .map(|line| line.trim().trim_start_matches('*').trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self(fallback)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for SongList {
    fn from(songs: Vec<String>) -> Self {
        Self(songs)
    }
}

fn is_header(line: &str) -> bool {
    line.to_lowercase().starts_with(HEADER_PREFIX)
}

fn clean_line(raw: &str) -> Option<String> {
    let line = raw.trim();
    if line.is_empty() || is_header(line) {
        return None;
    }

    let cleaned = strip_list_marker(line);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

fn strip_list_marker(line: &str) -> &str {
    let bytes = line.as_bytes();
    let is_separator = |b: u8| b == b'.' || b == b')';

    if bytes.len() > 2
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && is_separator(bytes[2])
    {
        return line[3..].trim();
    }
    if bytes.len() > 1 && bytes[0].is_ascii_digit() && is_separator(bytes[1]) {
        return line[2..].trim();
    }
    if line.starts_with('-') {
        return line.trim_start_matches('-').trim();
    }
    if line.starts_with('*') {
        return line.trim_start_matches('*').trim();
    }
    line
}
