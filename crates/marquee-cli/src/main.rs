//! `marquee`: browse the movie catalog and manage offline favorites.
//!
//! # Usage
//!
//! ```text
//! marquee catalog --sort top-rated --page 2
//! marquee favorites
//! marquee show 42
//! marquee toggle 42
//! marquee --json trailer 42
//! ```
//!
//! Settings come from `marquee.toml` (or `--config FILE`) and `MARQUEE_*`
//! environment variables, e.g. `MARQUEE_API_KEY`.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, bail};
use clap::{Args, Parser, Subcommand};
use marquee_core::{
  Movie, MovieId, Review,
  catalog::{CatalogPage, CatalogQuery, SortOrder},
};
use marquee_remote::{HttpTransport, RemoteFetcher, TcpProbe};
use marquee_store_sqlite::SqliteStore;
use marquee_sync::{Coordinator, DetailSession, DetailState, ReviewSource};
use serde::Serialize;
use settings::Settings;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

type App = Coordinator<SqliteStore, HttpTransport, TcpProbe>;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "marquee", version, about = "Movie catalog with offline favorites")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "marquee.toml")]
  config: PathBuf,

  /// Print results as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// List one page of the remote catalog.
  Catalog(PageArgs),
  /// List favorited movies from the local store.
  Favorites,
  /// Show a movie with its reviews.
  Show(MovieArgs),
  /// Add a movie to favorites, or remove it if already there.
  Toggle(MovieArgs),
  /// Print the address of a movie's first trailer.
  Trailer(MovieArgs),
}

#[derive(Args, Clone, Copy)]
struct PageArgs {
  /// `popular` or `top-rated`.
  #[arg(long, default_value_t = SortOrder::Popular)]
  sort: SortOrder,

  #[arg(long, default_value_t = 1)]
  page: u32,
}

impl PageArgs {
  fn query(self) -> CatalogQuery { CatalogQuery::new(self.sort, self.page) }
}

#[derive(Args)]
struct MovieArgs {
  id: MovieId,

  // Catalog page to look the movie up on when it is not a favorite.
  #[command(flatten)]
  page: PageArgs,
}

// ─── Output ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DetailView<'a> {
  movie:         &'a Movie,
  favorite:      bool,
  review_source: &'static str,
  reviews:       &'a [Review],
}

impl<'a> DetailView<'a> {
  fn of(session: &'a DetailSession) -> Self {
    Self {
      movie:         session.movie(),
      favorite:      session.state().is_favorite(),
      review_source: match session.review_source() {
        ReviewSource::None => "none",
        ReviewSource::Store => "store",
        ReviewSource::Network => "network",
      },
      reviews:       session.reviews(),
    }
  }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value).context("failed to encode output")?);
  Ok(())
}

fn movie_line(movie: &Movie) -> String {
  let year = movie.release_year().map(|y| format!(" ({y})")).unwrap_or_default();
  format!("{:>8}  {}{}  {}", movie.id, movie.title, year, movie.rating_label())
}

fn print_movies(movies: &[Movie]) {
  for movie in movies {
    println!("{}", movie_line(movie));
  }
}

fn print_detail(session: &DetailSession) {
  let movie = session.movie();
  println!("{}", movie_line(movie));
  if let Some(poster) = &movie.poster_url {
    println!("poster: {poster}");
  }
  if !movie.synopsis.is_empty() {
    println!("\n{}", movie.synopsis);
  }
  println!("\n[{}]", session.state().action_label());

  let text = session.reviews_text();
  if !text.is_empty() {
    println!("\n{text}");
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings: Settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("MARQUEE"))
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise Settings")?;

  let app = build(&settings).await?;

  let cancel = CancellationToken::new();
  tokio::spawn({
    let cancel = cancel.clone();
    async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        cancel.cancel();
      }
    }
  });

  match cli.command {
    Command::Catalog(args) => catalog(&app, args.query(), &cancel, cli.json).await,
    Command::Favorites => favorites(&app, cli.json).await,
    Command::Show(args) => show(&app, args, &cancel, cli.json).await,
    Command::Toggle(args) => toggle(&app, args, &cancel, cli.json).await,
    Command::Trailer(args) => trailer(&app, args, &cancel, cli.json).await,
  }
}

async fn build(settings: &Settings) -> anyhow::Result<App> {
  if settings.api_key.is_empty() {
    tracing::warn!("no api_key configured; remote requests will be rejected");
  }

  let store_path = settings.store_path();
  if let Some(dir) = store_path.parent()
    && !dir.as_os_str().is_empty()
  {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create store directory {dir:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let transport =
    HttpTransport::new(settings.request_timeout()).context("failed to build HTTP client")?;
  let probe = TcpProbe::new(settings.probe_addr.clone(), settings.probe_timeout());
  let remote = RemoteFetcher::new(transport, probe)
    .with_wait_policy(settings.wait_policy())
    .with_retry_policy(settings.retry_policy());

  Ok(Coordinator::new(Arc::new(store), remote, settings.addresses()))
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn catalog(
  app: &App,
  query: CatalogQuery,
  cancel: &CancellationToken,
  json: bool,
) -> anyhow::Result<()> {
  let Some(page) = app.load_catalog(query, cancel).await else {
    bail!("catalog unavailable");
  };

  if json {
    return print_json(&page);
  }
  print_movies(&page.movies);
  print_page_footer(&page);
  Ok(())
}

fn print_page_footer(page: &CatalogPage) {
  if page.has_next() {
    println!("\npage {} of {} (--page {} for more)", page.page, page.total_pages, page.page + 1);
  } else {
    println!("\npage {} of {}", page.page, page.total_pages);
  }
}

async fn favorites(app: &App, json: bool) -> anyhow::Result<()> {
  let movies = app.favorites().await.context("failed to read favorites")?;

  if json {
    return print_json(&movies);
  }
  if movies.is_empty() {
    println!("no favorites yet");
  }
  print_movies(&movies);
  Ok(())
}

fn ensure_running(cancel: &CancellationToken) -> anyhow::Result<()> {
  if cancel.is_cancelled() {
    bail!("interrupted");
  }
  Ok(())
}

/// Locate the movie and open a detail session with its favorite state.
///
/// The session's fetches stop when `cancel` fires.
async fn open_session(
  app: &App,
  args: &MovieArgs,
  cancel: &CancellationToken,
) -> anyhow::Result<DetailSession> {
  let Some(movie) = app
    .locate(args.id, args.page.query(), cancel)
    .await
    .context("failed to look up movie")?
  else {
    bail!("movie {} is neither a favorite nor on {} page {}", args.id, args.page.sort, args.page.page);
  };

  let mut session = DetailSession::with_parent(movie, cancel);
  app.open(&mut session).await.context("failed to read favorite state")?;
  Ok(session)
}

async fn show(
  app: &App,
  args: MovieArgs,
  cancel: &CancellationToken,
  json: bool,
) -> anyhow::Result<()> {
  let mut session = open_session(app, &args, cancel).await?;

  if session.review_source() == ReviewSource::Store {
    tracing::debug!(reviews = session.reviews().len(), "stored reviews loaded");
  }
  if !app.refresh_reviews(&mut session).await.context("failed to refresh reviews")? {
    tracing::warn!(movie_id = %args.id, "reviews could not be refreshed");
  }
  ensure_running(cancel)?;

  if json {
    return print_json(&DetailView::of(&session));
  }
  print_detail(&session);
  Ok(())
}

async fn toggle(
  app: &App,
  args: MovieArgs,
  cancel: &CancellationToken,
  json: bool,
) -> anyhow::Result<()> {
  let mut session = open_session(app, &args, cancel).await?;

  // Favoriting persists whatever reviews the session holds.
  if session.state() == DetailState::NotFavorited
    && !app.refresh_reviews(&mut session).await.context("failed to refresh reviews")?
  {
    tracing::warn!(movie_id = %args.id, "saving favorite without fresh reviews");
  }
  ensure_running(cancel)?;

  let state = app
    .toggle_favorite(&mut session)
    .await
    .context("failed to update favorites")?;

  if json {
    return print_json(&DetailView::of(&session));
  }
  match state {
    DetailState::Favorited => println!("added {} to favorites", session.movie().title),
    _ => println!("removed {} from favorites", session.movie().title),
  }
  Ok(())
}

async fn trailer(
  app: &App,
  args: MovieArgs,
  cancel: &CancellationToken,
  json: bool,
) -> anyhow::Result<()> {
  let session = open_session(app, &args, cancel).await?;

  let address = app
    .trailer_address(&session)
    .await
    .context("no trailer available")?;
  ensure_running(cancel)?;
  let Some(address) = address else {
    bail!("trailers could not be fetched");
  };

  if json {
    return print_json(&serde_json::json!({ "id": args.id, "trailer": address }));
  }
  println!("{address}");
  Ok(())
}
