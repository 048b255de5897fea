use crate::{
    error::{CreationStep, PlaylistCreationError},
    spotify::{client::SpotifyApi, search},
    types::{CreatePlaylistRequest, CreatedPlaylist, CreatedTrack, PlaylistSuggestion},
    utils,
};

/// Materializes a suggestion as a private playlist in the user's account.
///
/// Steps run strictly in order and the first failure aborts the rest:
/// 1. fetch the current user id
/// 2. create an empty private playlist named after the suggestion
/// 3. search every song, skipping those without a hit
/// 4. append all resolved URIs in one call (skipped when nothing resolved)
///
/// A playlist created in step 2 stays in place when a later step fails.
/// Returned tracks carry the title and artist parsed from the song string that
/// matched, not the catalog's metadata.
pub async fn create_playlist<A: SpotifyApi>(
    api: &A,
    token: &str,
    suggestion: &PlaylistSuggestion,
) -> Result<CreatedPlaylist, PlaylistCreationError> {
    let user = api
        .current_user(token)
        .await
        .map_err(PlaylistCreationError::at(CreationStep::FetchUser))?;

    let request = CreatePlaylistRequest {
        name: suggestion.name.clone(),
        description: format!("AI-generated playlist based on: {}", suggestion.name),
        public: false,
    };
    let playlist = api
        .create_playlist(token, &user.id, &request)
        .await
        .map_err(PlaylistCreationError::at(CreationStep::CreatePlaylist))?;

    let mut uris: Vec<String> = Vec::new();
    let mut matched: Vec<&String> = Vec::new();
    for song in &suggestion.songs {
        if let Some(uri) = search::resolve_uri(api, token, song)
            .await
            .map_err(PlaylistCreationError::at(CreationStep::SearchTracks))?
        {
            uris.push(uri);
            matched.push(song);
        }
    }

    if !uris.is_empty() {
        api.add_tracks(token, &playlist.id, &uris)
            .await
            .map_err(PlaylistCreationError::at(CreationStep::AddTracks))?;
    }

    let tracks = matched
        .into_iter()
        .enumerate()
        .map(|(index, song)| {
            let (name, artist) = utils::split_song_query(song);
            CreatedTrack {
                id: index.to_string(),
                name,
                artist,
            }
        })
        .collect();

    Ok(CreatedPlaylist {
        name: playlist.name,
        playlist_url: playlist.external_urls.spotify,
        tracks,
    })
}
