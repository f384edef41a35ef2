/*!
 * Gallery CLI
 *
 * Loads random characters from the character API, prints them as cards and
 * keeps a persistent favorites list. `browse` runs an interactive session;
 * the other subcommands print one gallery and exit.
 */

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use gallery_core::presenter::Presenter;
use gallery_core::render::{self, Frame};
use gallery_core::{
    FavoritesStore, FileStore, GalleryConfig, GalleryController, HttpSource, KeyValueStore,
    MemoryStore, TerminalPresenter, DEFAULT_BATCH_SIZE,
};

#[derive(Parser)]
#[command(name = "gallery_cli")]
#[command(about = "Random character gallery with persistent favorites", long_about = None)]
struct Cli {
    /// Character endpoint returning one random record per GET
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Storage file for favorites (default: ~/.gallery/storage.json)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Keep favorites in memory only
    #[arg(long, global = true, conflicts_with = "storage")]
    ephemeral: bool,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: load, filter, favorites, fav <id>, open <id>, quit
    Browse {
        /// Emit JSON events instead of human-readable cards
        #[arg(short, long)]
        json: bool,
    },

    /// Load one batch and print it
    Load {
        /// Number of characters to fetch
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        count: usize,

        /// Only show names containing this text
        #[arg(short, long)]
        filter: Option<String>,

        #[arg(short, long)]
        json: bool,
    },

    /// Print stored favorites
    Favorites {
        #[arg(short, long)]
        filter: Option<String>,

        #[arg(short, long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Presenter for one-shot commands: only the final state gets printed
struct Silent;

impl Presenter for Silent {
    fn show_loader(&mut self, _visible: bool) {}
    fn show_error(&mut self, _message: Option<&str>) {}
    fn render(&mut self, _frame: &Frame) {}
    fn mark_favorite(&mut self, _id: &str, _favorite: bool) {}
    fn open_image(&mut self, _url: &str) {}
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Browse { json } => browse(&cli, *json).await,
        Commands::Load { count, filter, json } => load(&cli, *count, filter.as_deref(), *json).await,
        Commands::Favorites { filter, json } => favorites(&cli, filter.as_deref(), *json),
        Commands::Version => {
            println!("gallery_cli v{}", env!("CARGO_PKG_VERSION"));
            println!("Random character gallery with persistent favorites");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn config(cli: &Cli) -> GalleryConfig {
    let mut config = GalleryConfig::default()
        .with_request_timeout(cli.timeout_secs.map(Duration::from_secs));
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(path) = &cli.storage {
        config = config.with_storage_path(path.clone());
    }
    config
}

fn controller<P: Presenter>(
    cli: &Cli,
    config: &GalleryConfig,
    presenter: P,
) -> Result<GalleryController<HttpSource, Box<dyn KeyValueStore>, P>> {
    let store: Box<dyn KeyValueStore> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::new(&config.storage_path))
    };

    Ok(GalleryController::new(
        HttpSource::new(config)?,
        FavoritesStore::new(store),
        presenter,
        config.batch_size,
    ))
}

fn print_frame(frame: &Frame, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        render::write_json(&mut out, frame)?;
    } else {
        render::write_text(&mut out, frame)?;
    }
    out.flush()?;
    Ok(())
}

async fn load(cli: &Cli, count: usize, filter: Option<&str>, json: bool) -> Result<()> {
    let config = config(cli).with_batch_size(count);
    let mut gallery = controller(cli, &config, Silent)?;

    if let Err(e) = gallery.load_batch().await {
        if json {
            println!("{}", serde_json::json!({ "type": "error", "message": gallery.error() }));
        }
        return Err(anyhow::Error::new(e).context(gallery_core::LOAD_ERROR));
    }

    if let Some(query) = filter {
        gallery.apply_filter(query);
    }
    print_frame(gallery.frame(), json)
}

fn favorites(cli: &Cli, filter: Option<&str>, json: bool) -> Result<()> {
    let config = config(cli);
    let mut gallery = controller(cli, &config, Silent)?;

    gallery.show_favorites();
    if let Some(query) = filter {
        gallery.apply_filter(query);
    }
    print_frame(gallery.frame(), json)
}

async fn browse(cli: &Cli, json: bool) -> Result<()> {
    let config = config(cli);
    let presenter = TerminalPresenter::new(io::stdout(), json);
    let mut gallery = controller(cli, &config, presenter)?;

    // Initial load; a failure is already on screen
    let _ = gallery.load_batch().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        match command {
            "" => {}
            "load" | "l" => {
                let _ = gallery.load_batch().await;
            }
            "filter" | "f" => {
                gallery.apply_filter(arg);
            }
            "favorites" | "favs" => {
                gallery.show_favorites();
            }
            "fav" => {
                if let Err(e) = gallery.toggle_favorite(arg) {
                    eprintln!("{}", e);
                }
            }
            "open" => match gallery.open_image(arg) {
                Ok(Some(_)) => {}
                Ok(None) => eprintln!("{} has no image", arg),
                Err(e) => eprintln!("{}", e),
            },
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            other => eprintln!("Unknown command: {} (try 'help')", other),
        }
    }

    Ok(())
}

fn print_help() {
    eprintln!("Commands:");
    eprintln!("  load              fetch a new batch");
    eprintln!("  filter <text>     show names containing <text> (empty clears)");
    eprintln!("  favorites         show stored favorites");
    eprintln!("  fav <id>          add/remove a displayed character");
    eprintln!("  open <id>         open a character's image");
    eprintln!("  quit              leave");
}
