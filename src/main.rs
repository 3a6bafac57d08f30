use clap::{Parser, Subcommand};
use detailgen::compose::{self, ComposeFlags};
use detailgen::config::{self, PageConfig};
use detailgen::import;
use detailgen::output;
use detailgen::session::PageState;
use detailgen::types::{Asset, GalleryType};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "detailgen")]
#[command(about = "Product detail page composer")]
#[command(long_about = "\
Product detail page composer

A page is a hero block (brand line, product name, copy, spec grid, size
guide) followed by image sections in a user-chosen order. The page lives
in a session file; commands build it, validate it and export standalone
HTML.

Session layout (JSON):

  heroTextContent   product copy (blank fields fall back to stock text)
  imageUrls         products / modelShots / closeupShots galleries and
                    one image per custom-* or spacer-* section
  sectionOrder      render order, always containing \"hero\" once
  sections          per-section height, zoom/pan and hold flags
  textElements      free text boxes positioned inside sections

Run 'detailgen gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Which optional affordances to render into an export.
#[derive(clap::Args, Clone, Copy)]
struct RenderArgs {
    /// Include editing affordances (resize handles, hold badges, drop hints)
    #[arg(long)]
    editable: bool,
    /// Show banners for empty galleries
    #[arg(long)]
    banners: bool,
    /// Show gallery section labels
    #[arg(long)]
    labels: bool,
}

impl From<RenderArgs> for ComposeFlags {
    fn from(args: RenderArgs) -> Self {
        ComposeFlags {
            editable: args.editable,
            empty_gallery_banners: args.banners,
            section_labels: args.labels,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Build a session from product (and model) photo directories
    Init {
        /// Product photos: a directory or a single image
        #[arg(long)]
        products: PathBuf,
        /// Model photos for the model gallery
        #[arg(long)]
        models: Option<PathBuf>,
        /// Session file to write
        #[arg(long, default_value = "session.json")]
        out: PathBuf,
    },
    /// Export the page as standalone HTML
    Compose {
        session: PathBuf,
        #[arg(long, default_value = "page.html")]
        out: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Export the hero block as its own HTML document
    Hero {
        session: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Validate a session and print the section inventory
    Check { session: PathBuf },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Init {
            products,
            models,
            out,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            init_thread_pool(&config);
            let mut state = PageState::with_default_layout();
            state.set_gallery(GalleryType::Products, load_gallery(&products)?);
            if let Some(models) = models {
                state.set_gallery(GalleryType::ModelShots, load_gallery(&models)?);
            }
            state.save(&out)?;
            output::print_init_output(&state, &out);
        }
        Command::Compose {
            session,
            out,
            render,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let state = PageState::load(&session)?;
            let html = compose::compose_page(&config, &state.inputs(), render.into());
            write_output(&out, &html)?;
            output::print_compose_output(&state, &out, html.len());
        }
        Command::Hero { session, out_dir } => {
            let config = config::load_config(&cli.config_dir)?;
            let state = PageState::load(&session)?;
            let html = compose::compose_hero_document(&config, state.hero());
            let path = out_dir.join(compose::export_file_name(state.hero()));
            write_output(&path, &html)?;
            output::print_hero_output(&state, &path);
        }
        Command::Check { session } => {
            println!("==> Checking {}", session.display());
            config::load_config(&cli.config_dir)?;
            let state = PageState::load(&session)?;
            output::print_check_output(&state);
            println!("==> Session is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on generation config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(config: &PageConfig) {
    let threads = config::effective_threads(&config.generation);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn load_gallery(path: &Path) -> Result<Vec<Asset>, import::ImportError> {
    let paths = import::scan_images(path)?;
    if paths.is_empty() {
        tracing::warn!(path = %path.display(), "no images found");
    }
    let images = import::load_images(&paths)?;
    Ok(images.into_iter().map(|i| Asset::Url(i.data_url)).collect())
}

fn write_output(path: &Path, html: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, html)
}
