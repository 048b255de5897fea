//! # Playlist Suggestion Generator
//!
//! Turns a free-text prompt into a [`PlaylistSuggestion`] by asking a text
//! generation provider for strict JSON and parsing the answer.
//!
//! The provider is behind [`TextGenerator`]; [`gemini`] and [`deepseek`]
//! implement it over HTTP. One request per prompt, no retry: the caller asks
//! again if the user wants another attempt.

pub mod deepseek;
pub mod gemini;

use crate::{
    config::{self, GeneratorBackend},
    error::GenerationError,
    types::PlaylistSuggestion,
    utils::{self, SONG_SEPARATOR},
};

pub use deepseek::DeepSeekGenerator;
pub use gemini::GeminiGenerator;

pub const MIN_SONGS: usize = 10;
pub const MAX_SONGS: usize = 20;

/// A provider that answers one instruction with free text.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError>;
}

/// Embeds the user's prompt in the fixed curator instruction.
pub fn build_instruction(prompt: &str) -> String {
    format!(
        r#"As a professional music curator, create a family-friendly playlist based on this request: "{prompt}".

Guidelines for song selection:
- Focus on the specified genre, mood, or artist
- Include popular and well-known tracks
- Ensure songs are appropriate for all audiences
- Select songs available on Spotify
- Maintain consistent theme and energy

Return your response in this exact JSON format:
{{
    "name": "A descriptive playlist name that reflects the theme",
    "songs": [
        "Song Title - Artist Name",
        "Song Title - Artist Name"
    ]
}}

Requirements:
- Return at least {min} songs and no more than {max}
- Use accurate song titles and artist names
- Format must be "Song - Artist" for Spotify searching
- Return only the JSON object, no additional text
- If user requests top songs, include most popular tracks
- Consider the specified era/time period if mentioned
- Start playlist name with artist name if artist-specific
- Include only songs available on Spotify"#,
        prompt = prompt.trim(),
        min = MIN_SONGS,
        max = MAX_SONGS,
    )
}

/// Parses a raw provider answer into a suggestion.
///
/// Strips a surrounding code fence, parses JSON and checks the shape: a name
/// and 10 to 20 songs, each in "Title - Artist" form.
pub fn parse_suggestion(raw: &str) -> Result<PlaylistSuggestion, GenerationError> {
    let text = utils::strip_code_fences(raw);
    let suggestion: PlaylistSuggestion =
        serde_json::from_str(&text).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    if suggestion.name.trim().is_empty() {
        return Err(GenerationError::InvalidSuggestion(
            "playlist name is empty".to_string(),
        ));
    }

    let count = suggestion.songs.len();
    if !(MIN_SONGS..=MAX_SONGS).contains(&count) {
        return Err(GenerationError::InvalidSuggestion(format!(
            "expected {} to {} songs, got {}",
            MIN_SONGS, MAX_SONGS, count
        )));
    }

    if let Some(song) = suggestion
        .songs
        .iter()
        .find(|s| !s.contains(SONG_SEPARATOR))
    {
        return Err(GenerationError::InvalidSuggestion(format!(
            "song \"{}\" is not in \"Title - Artist\" form",
            song
        )));
    }

    Ok(suggestion)
}

/// Asks the provider for a playlist matching `prompt`.
///
/// An empty or whitespace-only prompt is rejected before any request is made.
pub async fn generate_suggestion<G: TextGenerator>(
    generator: &G,
    prompt: &str,
) -> Result<PlaylistSuggestion, GenerationError> {
    if prompt.trim().is_empty() {
        return Err(GenerationError::EmptyPrompt);
    }

    let raw = generator.generate(&build_instruction(prompt)).await?;
    parse_suggestion(&raw)
}

/// The provider selected by `PLAYLIST_GENERATOR`.
pub enum Generator {
    Gemini(GeminiGenerator),
    DeepSeek(DeepSeekGenerator),
}

impl Generator {
    pub fn from_env() -> Result<Self, crate::error::ConfigError> {
        match config::generator_backend()? {
            GeneratorBackend::Gemini => Ok(Generator::Gemini(GeminiGenerator::new(
                config::gemini_api_url(),
                config::gemini_api_key()?,
                config::gemini_model(),
            ))),
            GeneratorBackend::DeepSeek => Ok(Generator::DeepSeek(DeepSeekGenerator::new(
                config::deepseek_api_url(),
                config::deepseek_api_key()?,
            ))),
        }
    }
}

impl TextGenerator for Generator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        match self {
            Generator::Gemini(g) => g.generate(instruction).await,
            Generator::DeepSeek(g) => g.generate(instruction).await,
        }
    }
}
