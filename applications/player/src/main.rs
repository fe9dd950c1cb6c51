/// Melody Player - headless playback sessions over a library file
use anyhow::Context;
use clap::{Parser, Subcommand};
use melody_core::{TrackContext, TrackId, TrackStore};
use melody_player::{render_ranking, PlayerConfig, Session};
use melody_storage::MemoryTrackStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "melody-player")]
#[command(about = "Melody Player playback sessions and relevance ranking", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "MELODY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a context interactively (type `help` once running)
    Play {
        /// Library file
        #[arg(short, long)]
        library: Option<PathBuf>,
        /// library, liked, search:<title>, author:<name> or playlist:<id>
        #[arg(long, default_value = "library")]
        context: TrackContext,
        /// Track to start with (default: first of the context)
        #[arg(short, long)]
        start: Option<String>,
        /// Start with shuffle on
        #[arg(long)]
        shuffle: bool,
        /// Start with loop on
        #[arg(long = "loop")]
        loop_enabled: bool,
        /// Fixed shuffle seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Rank the library by relevance to a reference track
    Rank {
        /// Library file
        #[arg(short, long)]
        library: Option<PathBuf>,
        /// Reference track (default: one of the most played)
        #[arg(short, long)]
        reference: Option<String>,
        /// Number of tracks to list
        #[arg(short, long, default_value_t = 20)]
        top: usize,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "melody_player=info,melody_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = PlayerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Play {
            library,
            context,
            start,
            shuffle,
            loop_enabled,
            seed,
        } => {
            config.playback.shuffle |= shuffle;
            config.playback.loop_enabled |= loop_enabled;
            if seed.is_some() {
                config.playback.shuffle_seed = seed;
            }
            play(&config, library, context, start.map(TrackId::new)).await?;
        }
        Commands::Rank {
            library,
            reference,
            top,
        } => {
            rank(&config, library, reference.map(TrackId::new), top).await?;
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn play(
    config: &PlayerConfig,
    library: Option<PathBuf>,
    context: TrackContext,
    start: Option<TrackId>,
) -> anyhow::Result<()> {
    let path = config.library_path(library.as_deref())?;
    let store = Arc::new(
        MemoryTrackStore::open(&path)
            .await
            .with_context(|| format!("Failed to open library {}", path.display()))?,
    );

    let mut session = Session::open(
        Arc::clone(&store),
        context,
        start.as_ref(),
        config.playback.clone(),
    )
    .await?;

    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    session.run(input, &mut out).await?;

    if config.library.save_play_counts {
        store.save(&path).await?;
        tracing::info!("Play counts saved to {}", path.display());
    }

    Ok(())
}

async fn rank(
    config: &PlayerConfig,
    library: Option<PathBuf>,
    reference: Option<TrackId>,
    top: usize,
) -> anyhow::Result<()> {
    let path = config.library_path(library.as_deref())?;
    let store = MemoryTrackStore::open(&path)
        .await
        .with_context(|| format!("Failed to open library {}", path.display()))?;
    let tracks = store.fetch_tracks_by_context(&TrackContext::Library).await?;

    let report = render_ranking(
        &tracks,
        reference.as_ref(),
        &config.discovery,
        top,
        &mut rand::thread_rng(),
    )?;
    print!("{}", report);

    Ok(())
}
