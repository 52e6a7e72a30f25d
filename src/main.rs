//! txtreader command-line entry point.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use txtreader::{
    AppError, BookStore, Library,
    config::{Cli, Command, Config, DebugCommand},
    library::files::LocalFiles,
    render::{self, PageTurn},
    store::SqliteStorage,
    theme::Theme,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "txtreader=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Find or load config
    let config_path = cli.config.clone().or_else(Config::find_config_file);

    let config = if let Some(ref path) = config_path {
        Config::load(path)?
    } else {
        Config::default()
    };

    match cli.command {
        Some(Command::Init { force }) => cmd_init(force),
        Some(Command::Debug { action }) => cmd_debug(action, &config).await,
        Some(Command::Import { path }) => {
            let mut library = open_library(&config).await?;
            cmd_import(&mut library, path).await
        }
        Some(Command::Open {
            name,
            page,
            next,
            prev,
            theme,
        }) => {
            let mut library = open_library(&config).await?;
            let target = match (page, next, prev) {
                (Some(p), _, _) => PageTurn::Page(p),
                (None, true, _) => PageTurn::Next,
                (None, false, true) => PageTurn::Prev,
                _ => PageTurn::Saved,
            };
            cmd_open(&mut library, &config, &name, target, theme).await
        }
        Some(Command::Remove { name }) => {
            let mut library = open_library(&config).await?;
            if library.remove(&name).await? {
                println!("Removed: {}", name);
            } else {
                println!("Book not found: {}", name);
            }
            Ok(())
        }
        Some(Command::List) | None => {
            let library = open_library(&config).await?;
            cmd_list(&library);
            Ok(())
        }
    }
}

/// Open storage and load the reading list, dropping books whose files are gone.
async fn open_library(config: &Config) -> anyhow::Result<Library> {
    let storage = SqliteStorage::open(&config.storage.path)?;
    let store = BookStore::new(Arc::new(storage));
    let mut library = Library::new(
        store,
        Arc::new(LocalFiles),
        config.reader.library_options(),
    );

    for book in library.start().await? {
        eprintln!("Book file not found, removed: {}", book.name);
    }
    Ok(library)
}

/// Write a default config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let config_path = PathBuf::from("config.toml");

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, Config::generate_default())?;
    println!("Created config file: {}", config_path.display());
    println!("\nAdd a book with: txtreader import /path/to/book.txt");

    Ok(())
}

/// Print the reading list.
fn cmd_list(library: &Library) {
    let books = library.books();
    if books.is_empty() {
        println!("No books yet. Add one with: txtreader import /path/to/book.txt");
        return;
    }

    for book in books {
        println!("{}", render::book_row(book, 20));
    }
}

/// Import a file.
async fn cmd_import(library: &mut Library, path: PathBuf) -> anyhow::Result<()> {
    let path = std::fs::canonicalize(&path).unwrap_or(path);

    match library.import(&path.to_string_lossy()).await {
        Ok(book) => {
            println!("Added: {} ({})", book.display_title(), book.encoding);
            Ok(())
        }
        Err(AppError::DuplicateImport(name)) => {
            println!("This book is already added: {}", name);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Show one page of a book and save the position.
async fn cmd_open(
    library: &mut Library,
    config: &Config,
    name: &str,
    target: PageTurn,
    theme: Option<Theme>,
) -> anyhow::Result<()> {
    let mut session = match library.open(name).await {
        Ok(session) => session,
        Err(AppError::FileMissing(name)) => {
            println!("Book file not found on this device, removed: {}", name);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(theme) = theme {
        while session.theme() != theme {
            session.cycle_theme();
        }
    }

    let lines = render::wrap_lines(session.content(), config.reader.wrap_width);
    let viewport = config.reader.lines_per_page as f64;
    let content_height = lines.len() as f64;

    library
        .on_content_size_change(&mut session, content_height, viewport)
        .await?;

    // Wrapping is synchronous, so layout is complete here.
    let saved = session.layout_complete(viewport).unwrap_or(0.0);
    let offset = render::scroll_target(saved, target, viewport, content_height);

    library
        .on_scroll(&mut session, offset, viewport, content_height)
        .await?;

    let width = config.reader.wrap_width;
    let palette = session.theme().palette();
    let position = session.tracker().position();
    let title = format!(
        "{}  [{} / {}]  ({})",
        session.book().display_title(),
        position.page,
        position.total_pages,
        session.theme()
    );
    println!(
        "{}",
        palette.title().apply_to(render::pad_to_width(&title, width))
    );
    println!("{}", palette.muted().apply_to("-".repeat(width)));
    for line in render::visible_lines(&lines, offset, config.reader.lines_per_page) {
        println!("{}", palette.body().apply_to(render::pad_to_width(line, width)));
    }

    library.close(session).await?;
    Ok(())
}

/// Inspect or reset stored data.
async fn cmd_debug(action: DebugCommand, config: &Config) -> anyhow::Result<()> {
    let storage = SqliteStorage::open(&config.storage.path)?;
    let store = BookStore::new(Arc::new(storage));

    match action {
        DebugCommand::Dump => {
            println!("{}", store.dump().await?);
        }
        DebugCommand::Clear => {
            store.clear().await?;
            println!("Database cleared");
        }
    }

    Ok(())
}
