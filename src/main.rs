use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use promptlist::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in with Spotify
    Auth,

    /// Forget the stored Spotify token
    Logout,

    /// Show whether you are logged in
    Status,

    /// Generate a playlist from a free-text prompt
    Generate(GenerateOptions),

    /// Play the preview clip of a song ("Title - Artist")
    Preview(SongOptions),

    /// Play a song on your active Spotify device ("Title - Artist")
    Play(SongOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// What the playlist should be about, e.g. "top hits of 2020"
    #[clap(required = true, num_args = 1..)]
    prompt: Vec<String>,

    /// Create the playlist without reviewing the songs
    #[clap(long, short)]
    yes: bool,

    /// Do not open the created playlist in the browser
    #[clap(long)]
    no_open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SongOptions {
    #[clap(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Logout => cli::logout().await,
        Command::Status => cli::status().await,
        Command::Generate(opt) => cli::generate(opt.prompt.join(" "), opt.yes, !opt.no_open).await,
        Command::Preview(opt) => cli::preview(opt.query.join(" ")).await,
        Command::Play(opt) => cli::play(opt.query.join(" ")).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
