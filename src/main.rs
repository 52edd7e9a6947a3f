mod logging;
mod output;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::process::ExitCode;

use storefront::cache::CacheResult;
use storefront::config::Config;
use storefront::listing::{self, Facet, FilterCriteria, PriceRange, SortKey};
use storefront::session::Session;

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Browse a book store catalog from the command line")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/storefront/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Browse books with filters, sorting and paging
  Books(BooksArgs),
  /// List categories
  Categories {
    /// Skip the cache and fetch from the store
    #[arg(long)]
    refresh: bool,
  },
  /// Search the store
  Search {
    text: String,
    #[arg(long, default_value_t = SortKey::Newest)]
    sort: SortKey,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long)]
    page_size: Option<usize>,
  },
  /// Show the filter choices available in the catalog
  Facets,
}

#[derive(clap::Args, Debug)]
struct BooksArgs {
  /// Category id (repeatable; matches any)
  #[arg(long = "category")]
  categories: Vec<String>,
  /// Language (repeatable; matches any)
  #[arg(long = "language")]
  languages: Vec<String>,
  /// Supplier (repeatable; matches any)
  #[arg(long = "supplier")]
  suppliers: Vec<String>,
  /// Price preset label; overrides --min-price/--max-price
  #[arg(long)]
  preset: Option<String>,
  #[arg(long)]
  min_price: Option<f64>,
  #[arg(long)]
  max_price: Option<f64>,
  /// Match against title and author
  #[arg(long)]
  search: Option<String>,
  #[arg(long, default_value_t = SortKey::Newest)]
  sort: SortKey,
  #[arg(long, default_value_t = 1)]
  page: usize,
  #[arg(long)]
  page_size: Option<usize>,
  /// Skip the cache and fetch from the store
  #[arg(long)]
  refresh: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;
  let _log_guard = logging::init(&config.log)?;

  let session = Session::start(&config)?;

  match args.command {
    Command::Books(books) => run_books(&session, books).await,
    Command::Categories { refresh } => run_categories(&session, refresh).await,
    Command::Search {
      text,
      sort,
      page,
      page_size,
    } => run_search(&session, &text, sort, page, page_size).await,
    Command::Facets => run_facets(&session).await,
  }
}

async fn run_books(session: &Session, args: BooksArgs) -> Result<ExitCode> {
  let result = if args.refresh {
    match session.client().refresh_books().await {
      Ok(result) => result,
      Err(e) => {
        eprintln!("Refresh failed: {}", e);
        return Ok(ExitCode::FAILURE);
      }
    }
  } else {
    session.client().books().await
  };
  report(&result);

  let criteria = books_criteria(session, &args)?;
  let page = listing::apply(&result.data, &criteria)?;
  output::print_page(&page, &criteria);

  Ok(exit_code(&result))
}

fn books_criteria(session: &Session, args: &BooksArgs) -> Result<FilterCriteria> {
  let mut criteria = session.default_criteria();
  if let Some(size) = args.page_size {
    criteria.set_page_size(size);
  }

  criteria.set_selected(Facet::Category, args.categories.iter().cloned());
  criteria.set_selected(Facet::Language, args.languages.iter().cloned());
  criteria.set_selected(Facet::Supplier, args.suppliers.iter().cloned());
  criteria.set_price_range(PriceRange::new(args.min_price, args.max_price));

  if let Some(label) = &args.preset {
    let preset = session.preset(label).cloned().ok_or_else(|| {
      let known: Vec<&str> = session.presets().iter().map(|p| p.label.as_str()).collect();
      eyre!("Unknown price preset '{}' (available: {})", label, known.join(", "))
    })?;
    criteria.set_preset(Some(preset));
  }

  if let Some(text) = &args.search {
    criteria.set_search(text.as_str());
  }
  criteria.set_sort(args.sort);

  // Last: every other setter resets the page
  criteria.set_page(args.page);
  Ok(criteria)
}

async fn run_categories(session: &Session, refresh: bool) -> Result<ExitCode> {
  let result = if refresh {
    match session.client().refresh_categories().await {
      Ok(result) => result,
      Err(e) => {
        eprintln!("Refresh failed: {}", e);
        return Ok(ExitCode::FAILURE);
      }
    }
  } else {
    session.client().categories().await
  };
  report(&result);

  output::print_categories(&result.data);
  Ok(exit_code(&result))
}

async fn run_search(
  session: &Session,
  text: &str,
  sort: SortKey,
  page: usize,
  page_size: Option<usize>,
) -> Result<ExitCode> {
  let result = session.client().search(text).await;
  report(&result);

  // The store already matched the text; only order and page locally
  let mut criteria = session.default_criteria();
  if let Some(size) = page_size {
    criteria.set_page_size(size);
  }
  criteria.set_sort(sort);
  criteria.set_page(page);

  let listing_page = listing::apply(&result.data, &criteria)?;
  output::print_page(&listing_page, &criteria);

  Ok(exit_code(&result))
}

async fn run_facets(session: &Session) -> Result<ExitCode> {
  let catalog = session.client().catalog().await;
  report(&catalog.books);
  report(&catalog.categories);

  for facet in Facet::ALL {
    let values = facet.unique_values(&catalog.books.data);
    let shown: Vec<String> = match facet {
      Facet::Category => values
        .into_iter()
        .map(|id| {
          match catalog.categories.data.iter().find(|c| c.id == id) {
            Some(c) => format!("{} ({})", c.name, id),
            None => id,
          }
        })
        .collect(),
      _ => values,
    };
    println!("{}: {}", facet.label(), shown.join(", "));
  }

  let presets: Vec<&str> = session.presets().iter().map(|p| p.label.as_str()).collect();
  println!("Price presets: {}", presets.join(", "));

  Ok(exit_code(&catalog.books))
}

fn report<T>(result: &CacheResult<T>) {
  if let Some(notice) = output::source_notice(result) {
    eprintln!("{}", notice);
  }
}

fn exit_code<T>(result: &CacheResult<T>) -> ExitCode {
  if result.is_failed() {
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  }
}
