use crate::{
    error::{AuthError, GenerationError, SessionError},
    generator::{self, TextGenerator},
    management::SessionStore,
    spotify::{auth, client::SpotifyApi, playlist, search},
    types::{CreatedPlaylist, PlaylistSuggestion, ResolvedSong},
};

/// Where one prompt-to-playlist cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Idle,
    Generating,
    Reviewing,
    Creating,
    Created,
}

/// A generated playlist under review, already matched against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub name: String,
    pub songs: Vec<ResolvedSong>,
    /// Suggested songs the catalog search could not match.
    pub unmatched: Vec<String>,
}

/// The interactive prompt-to-playlist workflow for one user.
///
/// Holds the token, the prompt, the suggestion under review and the created
/// playlist, and sequences the generator, resolver and materializer. Failures
/// come back as [`SessionError`]s whose `user_message` is the notification to
/// show; the session itself always stays usable.
pub struct Session<S, A, G> {
    store: S,
    api: A,
    generator: G,
    state: SessionState,
    token: Option<String>,
    prompt: String,
    review: Option<Review>,
    created: Option<CreatedPlaylist>,
    resolve_concurrency: usize,
}

impl<S: SessionStore, A: SpotifyApi, G: TextGenerator> Session<S, A, G> {
    /// Starts a session, authenticated when the store already holds a token.
    pub async fn restore(store: S, api: A, generator: G) -> Result<Self, SessionError> {
        let token = store.get().await.map_err(AuthError::from)?;
        let state = if token.is_some() {
            SessionState::Idle
        } else {
            SessionState::Unauthenticated
        };

        Ok(Self {
            store,
            api,
            generator,
            state,
            token,
            prompt: String::new(),
            review: None,
            created: None,
            resolve_concurrency: 1,
        })
    }

    /// Number of catalog searches run at once while enriching a suggestion.
    pub fn with_resolve_concurrency(mut self, concurrency: usize) -> Self {
        self.resolve_concurrency = concurrency.max(1);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }

    pub fn created(&self) -> Option<&CreatedPlaylist> {
        self.created.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Consumes a login redirect fragment. Returns whether a token was stored.
    pub async fn complete_login(&mut self, fragment: &str) -> Result<bool, SessionError> {
        match auth::complete_login(&self.store, fragment)
            .await
            .map_err(AuthError::from)?
        {
            Some(token) => {
                self.token = Some(token);
                if self.state == SessionState::Unauthenticated {
                    self.state = SessionState::Idle;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clears the stored token and discards any work in progress.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        auth::logout(&self.store).await.map_err(AuthError::from)?;
        self.token = None;
        self.prompt.clear();
        self.review = None;
        self.created = None;
        self.state = SessionState::Unauthenticated;
        Ok(())
    }

    /// Generates a suggestion for `prompt` and resolves its songs for review.
    ///
    /// On failure the session goes back to idle and keeps the prompt text.
    pub async fn submit_prompt(&mut self, prompt: &str) -> Result<&Review, SessionError> {
        match self.state {
            SessionState::Generating | SessionState::Creating => return Err(SessionError::Busy),
            SessionState::Created => {
                return Err(SessionError::InvalidState(
                    "Start a new playlist before submitting another prompt.",
                ));
            }
            _ => {}
        }
        let token = self.token.clone().ok_or(AuthError::MissingToken)?;
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt.into());
        }

        self.prompt = prompt.to_string();
        self.review = None;
        self.state = SessionState::Generating;

        let suggestion = match generator::generate_suggestion(&self.generator, prompt).await {
            Ok(suggestion) => suggestion,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e.into());
            }
        };

        let enrichment = match search::resolve_all(
            &self.api,
            &token,
            &suggestion.songs,
            self.resolve_concurrency,
        )
        .await
        {
            Ok(enrichment) => enrichment,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e.into());
            }
        };

        self.state = SessionState::Reviewing;
        Ok(self.review.insert(Review {
            name: suggestion.name,
            songs: enrichment.songs,
            unmatched: enrichment.unmatched,
        }))
    }

    /// Drops every reviewed song with the given track id.
    pub fn remove_song(&mut self, id: &str) -> Result<(), SessionError> {
        let review = match (self.state, self.review.as_mut()) {
            (SessionState::Reviewing, Some(review)) => review,
            _ => return Err(SessionError::InvalidState("There is no playlist under review.")),
        };

        review.songs.retain(|song| song.id != id);
        Ok(())
    }

    /// Creates the reviewed playlist in the user's Spotify account.
    ///
    /// On success the review and prompt are cleared. On failure the session
    /// returns to reviewing the same list; a playlist Spotify already created
    /// is left in place.
    pub async fn confirm(&mut self) -> Result<&CreatedPlaylist, SessionError> {
        match self.state {
            SessionState::Reviewing => {}
            SessionState::Generating | SessionState::Creating => return Err(SessionError::Busy),
            _ => return Err(SessionError::InvalidState("There is no playlist under review.")),
        }
        let token = self.token.clone().ok_or(AuthError::MissingToken)?;
        let suggestion = match self.review.as_ref() {
            Some(review) => PlaylistSuggestion {
                name: review.name.clone(),
                songs: review.songs.iter().map(|s| s.query.clone()).collect(),
            },
            None => return Err(SessionError::InvalidState("There is no playlist under review.")),
        };

        self.state = SessionState::Creating;
        match playlist::create_playlist(&self.api, &token, &suggestion).await {
            Ok(created) => {
                self.review = None;
                self.prompt.clear();
                self.state = SessionState::Created;
                Ok(self.created.insert(created))
            }
            Err(e) => {
                self.state = SessionState::Reviewing;
                Err(e.into())
            }
        }
    }

    /// Leaves the created state to start a new cycle.
    pub fn create_another(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Created {
            return Err(SessionError::InvalidState("No playlist has been created yet."));
        }

        self.created = None;
        self.state = SessionState::Idle;
        Ok(())
    }
}
