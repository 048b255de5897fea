use futures::{StreamExt, stream};

use crate::{
    error::{AuthError, SpotifyError},
    spotify::client::SpotifyApi,
    types::{Enrichment, ResolvedSong, SearchTrack},
    warning,
};

/// Looks up the catalog's top hit for a "Title - Artist" string.
///
/// The whole string is the search query and the first result wins
/// unconditionally. Zero results is `Ok(None)`, never an error.
pub async fn resolve_track<A: SpotifyApi>(
    api: &A,
    token: &str,
    query: &str,
) -> Result<Option<ResolvedSong>, SpotifyError> {
    let tracks = api.search_tracks(token, query, 1).await?;
    Ok(tracks
        .into_iter()
        .next()
        .map(|track| to_resolved_song(track, query)))
}

/// Resolves the track URI of the top hit, used while materializing a playlist.
pub async fn resolve_uri<A: SpotifyApi>(
    api: &A,
    token: &str,
    query: &str,
) -> Result<Option<String>, SpotifyError> {
    let tracks = api.search_tracks(token, query, 1).await?;
    Ok(tracks.into_iter().next().map(|t| t.uri))
}

/// Enriches every suggested song with catalog metadata.
///
/// Searches run `concurrency` at a time (1 keeps them sequential) and results
/// keep the input order. Songs without a hit, or whose search failed, are left
/// out of `songs` and listed in `unmatched`. A rejected token aborts the whole
/// enrichment since no later search could succeed either.
pub async fn resolve_all<A: SpotifyApi>(
    api: &A,
    token: &str,
    queries: &[String],
    concurrency: usize,
) -> Result<Enrichment, AuthError> {
    let results: Vec<(&String, Result<Option<ResolvedSong>, SpotifyError>)> =
        stream::iter(queries)
            .map(|query| async move { (query, resolve_track(api, token, query).await) })
            .buffered(concurrency.max(1))
            .collect()
            .await;

    let mut enrichment = Enrichment::default();
    for (query, result) in results {
        match result {
            Ok(Some(song)) => enrichment.songs.push(song),
            Ok(None) => enrichment.unmatched.push(query.clone()),
            Err(SpotifyError::Unauthorized) => return Err(AuthError::Unauthorized),
            Err(e) => {
                warning!("Search for \"{}\" failed: {}", query, e);
                enrichment.unmatched.push(query.clone());
            }
        }
    }

    Ok(enrichment)
}

fn to_resolved_song(track: SearchTrack, query: &str) -> ResolvedSong {
    let image_url = track
        .album
        .images
        .get(1)
        .or_else(|| track.album.images.first())
        .map(|image| image.url.clone());

    ResolvedSong {
        artist: track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default(),
        id: track.id,
        name: track.name,
        preview_url: track.preview_url,
        image_url,
        uri: track.uri,
        query: query.to_string(),
    }
}
