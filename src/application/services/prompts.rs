/// Which single-word label the model is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodPrompt {
    /// Spoken transcripts: prefer an emotion, else the dominant word.
    Emotion,
    /// Typed descriptions: the main subject or topic noun.
    Topic,
}

impl MoodPrompt {
    pub fn render(&self, text: &str) -> String {
        match self {
            Self::Emotion => format!(
                "Extract the dominant emotion or word from this text. Check for emotion first \
                 but if no convincing emotion found then use the dominant word. \
                 Reply with ONE WORD only. Text: {}",
                text
            ),
            Self::Topic => format!(
                "Identify the main subject or topic noun of this text. \
                 Reply with ONE WORD only. Text: {}",
                text
            ),
        }
    }
}

pub fn song_prompt(mood: &str) -> String {
    format!(
        "Recommend 5 popular songs that match the mood: {}. Make sure to give a different set \
         of songs every time, do not repeat songs from previous responses. List only the song \
         title and artist. Format your response as a list.",
        mood
    )
}
