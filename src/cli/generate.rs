use tabled::Table;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::{
    config, error,
    generator::Generator,
    info,
    management::{
        FileSessionStore, PreviewPlayer, PreviewState, ProcessAudio, Review, Session,
        SessionState,
    },
    spotify::client::SpotifyClient,
    success, utils, warning,
};

type CliSession = Session<FileSessionStore, SpotifyClient, Generator>;

pub async fn generate(prompt: String, yes: bool, open: bool) {
    let generator = match Generator::from_env() {
        Ok(generator) => generator,
        Err(e) => error!("{}", e),
    };
    let concurrency = config::resolve_concurrency().unwrap_or_else(|e| {
        warning!("{}, searching sequentially", e);
        1
    });

    let session = Session::restore(
        FileSessionStore::default(),
        SpotifyClient::from_env(),
        generator,
    )
    .await;
    let mut session = match session {
        Ok(session) => session.with_resolve_concurrency(concurrency),
        Err(e) => error!("{}", e.user_message()),
    };

    if session.state() == SessionState::Unauthenticated {
        error!("Not logged in. Run `promptlist auth` first.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !run_prompt(&mut session, &prompt, &mut lines).await {
        return;
    }

    if yes {
        create(&mut session, open).await;
        return;
    }

    review_loop(&mut session, &mut lines, open).await;
}

/// Submits the prompt until it yields a review or the user gives up.
async fn run_prompt(
    session: &mut CliSession,
    prompt: &str,
    lines: &mut Lines<BufReader<Stdin>>,
) -> bool {
    loop {
        let pb = utils::spinner(&format!("Generating playlist for \"{}\"...", prompt));
        let result = session.submit_prompt(prompt).await;
        pb.finish_and_clear();

        match result {
            Ok(review) => {
                print_review(review);
                return true;
            }
            Err(e) if e.is_auth() => error!("{}", e.user_message()),
            Err(e) => {
                warning!("{}", e.user_message());
                info!("Retry \"{}\"? [Y/n]", session.prompt());
                match lines.next_line().await {
                    Ok(Some(answer)) if !answer.trim().eq_ignore_ascii_case("n") => continue,
                    _ => return false,
                }
            }
        }
    }
}

async fn review_loop(session: &mut CliSession, lines: &mut Lines<BufReader<Stdin>>, open: bool) {
    let mut previews = match ProcessAudio::new(&config::preview_player()) {
        Ok(audio) => Some(PreviewPlayer::new(audio)),
        Err(e) => {
            warning!("Previews disabled: {}", e);
            None
        }
    };

    loop {
        info!(
            "[r <n>] remove  [p <n>] preview  [s <n>] play on Spotify  [l] list  [c] create playlist  [q] quit"
        );
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            _ => return,
        };

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let index = parts.next().and_then(|n| n.parse::<usize>().ok());

        match (command, index) {
            ("r", Some(n)) => {
                let Some(song) = song_at(session, n) else {
                    warning!("No song number {}", n);
                    continue;
                };
                if let Some(player) = previews.as_mut() {
                    if player.current() == Some(song.id.as_str()) {
                        player.stop();
                    }
                }
                if let Err(e) = session.remove_song(&song.id) {
                    warning!("{}", e.user_message());
                    continue;
                }
                success!("Removed {} - {}", song.name, song.artist);
            }
            ("p", Some(n)) => {
                let Some(song) = song_at(session, n) else {
                    warning!("No song number {}", n);
                    continue;
                };
                let Some(player) = previews.as_mut() else {
                    warning!("Previews are disabled");
                    continue;
                };
                match player.toggle(&song) {
                    Ok(PreviewState::Playing(_)) => {
                        info!("Playing preview of {} - {}", song.name, song.artist)
                    }
                    Ok(PreviewState::Stopped) => info!("Preview stopped"),
                    Err(e) => warning!("{}", e),
                }
            }
            ("s", Some(n)) => {
                let Some(song) = song_at(session, n) else {
                    warning!("No song number {}", n);
                    continue;
                };
                let Some(token) = session.token().map(str::to_string) else {
                    warning!("Not logged in. Run `promptlist auth` first.");
                    continue;
                };
                if let Some(player) = previews.as_mut() {
                    player.stop();
                }
                super::play::play_on_device(session.api(), &token, &song).await;
            }
            ("l", _) => {
                if let Some(review) = session.review() {
                    print_review(review);
                }
            }
            ("c", _) => {
                if let Some(player) = previews.as_mut() {
                    player.stop();
                }
                if create(session, open).await {
                    return;
                }
            }
            ("q", _) => return,
            _ => warning!("Unknown command: {}", line.trim()),
        }
    }
}

/// Creates the reviewed playlist. Returns true once the playlist exists.
async fn create(session: &mut CliSession, open: bool) -> bool {
    let pb = utils::spinner("Creating playlist on Spotify...");
    let result = session.confirm().await;
    pb.finish_and_clear();

    let created = match result {
        Ok(created) => created.clone(),
        Err(e) if e.is_auth() => error!("{}", e.user_message()),
        Err(e) => {
            warning!("{}", e.user_message());
            return false;
        }
    };

    success!(
        "Playlist \"{}\" created with {} tracks: {}",
        created.name,
        created.tracks.len(),
        created.playlist_url
    );

    if open && webbrowser::open(&created.playlist_url).is_err() {
        warning!("Failed to open browser. Open {} manually.", created.playlist_url);
    }

    if let Err(e) = session.create_another() {
        warning!("{}", e.user_message());
    }
    true
}

fn song_at(session: &CliSession, n: usize) -> Option<crate::types::ResolvedSong> {
    let review = session.review()?;
    n.checked_sub(1).and_then(|i| review.songs.get(i)).cloned()
}

fn print_review(review: &Review) {
    let table = Table::new(utils::song_table_rows(&review.songs));
    println!("{}\n{}\n", review.name, table);

    if !review.unmatched.is_empty() {
        warning!(
            "{} suggested songs were not found on Spotify: {}",
            review.unmatched.len(),
            review.unmatched.join(", ")
        );
    }
}
