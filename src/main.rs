use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use lens_ribbon::api;
use lens_ribbon::assets::{AssetCategory, AssetLoader};
use lens_ribbon::models::{AppConfig, ExportFormat, LensDocument};
use lens_ribbon::server;
use lens_ribbon::services::{RenderService, RibbonService};

#[derive(Parser)]
#[command(name = "lens-ribbon")]
#[command(about = "Lens Ribbon - focal-length and aperture coverage of a lens collection")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render a lens document directly to an image file
    Render {
        /// Lens document (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path (default: ribbon.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image format: jpg, png or webp (default: from output extension, else png)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Override the document's crop factor
        #[arg(short, long)]
        crop_factor: Option<f64>,
    },
    /// Print the focal band table and aperture legend
    Tables,
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract the SVG templates
        #[arg(long)]
        templates: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lens Ribbon API",
        description = "Focal-length and aperture coverage ribbons for camera lens collections",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::get_tables,
        api::create_session,
        api::get_session,
        api::delete_session,
        api::set_crop_factor,
        api::add_lens,
        api::trigger_focus,
        api::update_lens,
        api::remove_lens,
        api::submit,
        api::export_session,
        api::session_svg,
        api::compute_ribbon,
        api::export_ribbon,
    ),
    components(schemas(
        api::TablesResponse,
        api::SessionResponse,
        api::CropFactorRequest,
        api::AddLensRequest,
        api::AddedLensResponse,
        lens_ribbon::models::LensDocument,
        lens_ribbon::services::SubmitOutcome,
        lens_ribbon::services::SubmitStatus,
    )),
    tags(
        (name = "Sessions", description = "Lens form sessions"),
        (name = "Lenses", description = "Lens rows within a session"),
        (name = "Ribbon", description = "Ribbon computation and export")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            format,
            crop_factor,
        }) => run_render_command(&input, output, format, crop_factor),
        Some(Commands::Tables) => {
            run_tables_command();
            Ok(())
        }
        Some(Commands::Init {
            templates,
            config,
            all,
            force,
            list,
        }) => run_init_command(templates, config, all, force, list),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Render a lens document to an image file (no server needed)
fn run_render_command(
    input: &Path,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    crop_factor: Option<f64>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lens_ribbon=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let format = format
        .or_else(|| output.as_deref().and_then(ExportFormat::from_path))
        .unwrap_or(ExportFormat::Png);
    let output = output.unwrap_or_else(|| PathBuf::from(format.file_name()));

    let asset_loader = Arc::new(AssetLoader::from_env());
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    let ribbons = RibbonService::new(config.clone());
    let renderer = RenderService::new(asset_loader, config);

    let mut document = LensDocument::from_path(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;
    if crop_factor.is_some() {
        document.crop_factor = crop_factor;
    }

    let form = document.into_form(ribbons.config().default_crop_factor);
    let ribbon = match ribbons.compute(&form) {
        Ok(ribbon) => ribbon,
        Err(errors) => {
            eprintln!("{} is not a valid lens document:", input.display());
            for issue in errors.issues() {
                eprintln!("  - {issue}");
            }
            std::process::exit(1);
        }
    };

    let bytes = renderer
        .render_image(&ribbon, ribbons.tables(), format)
        .map_err(|e| anyhow::anyhow!("Render error: {e}"))?;

    std::fs::write(&output, &bytes)?;
    println!(
        "Rendered {} ({} lenses, {} bytes)",
        output.display(),
        form.len(),
        bytes.len()
    );

    Ok(())
}

/// Print the band table and aperture legend
fn run_tables_command() {
    let asset_loader = AssetLoader::from_env();
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    let ribbons = RibbonService::new(config);
    let tables = ribbons.tables();

    println!("Focal bands (mm):");
    for (column, (value, label)) in tables
        .bands
        .breakpoints()
        .iter()
        .zip(tables.bands.labels())
        .enumerate()
    {
        println!("  {column:>2}  {value:>5}  {label}");
    }

    println!("\nAperture legend:");
    for entry in tables.scale.legend() {
        println!("  {}  {}", entry.color, entry.label);
    }

    println!("\nQuality tiers:");
    for tier in 1..=ribbons.tiers() {
        println!("  {tier}  {}", ribbons.config().tier_label(tier));
    }
}

/// Extract embedded assets to filesystem
fn run_init_command(
    templates: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Templates:");
        for f in AssetLoader::list_embedded(AssetCategory::Templates) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    let mut categories = Vec::new();
    if all || templates {
        categories.push(AssetCategory::Templates);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --templates, or --config");
        eprintln!("\nRun 'lens-ribbon init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let loader = AssetLoader::from_env();
    let report = loader.init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let templates_dir = std::env::var("TEMPLATES_DIR").ok();
    let fonts_dir = std::env::var("FONTS_DIR").ok();

    println!("Lens Ribbon v{VERSION}");
    println!("Focal-length and aperture coverage of a lens collection\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR     = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE   = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  TEMPLATES_DIR = {}",
        templates_dir.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  FONTS_DIR     = {}",
        fonts_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");
    let loader = AssetLoader::from_env();

    let config_source = match loader.config_file() {
        Some(path) if path.exists() => path.display().to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:    {config_source}");

    fn plural(n: usize) -> &'static str {
        if n == 1 {
            "file"
        } else {
            "files"
        }
    }

    let template_count = loader.list_templates().len();
    let embedded_count = AssetLoader::list_embedded(AssetCategory::Templates).len();
    match loader.templates_dir() {
        Some(path) if path.exists() => println!(
            "  Templates: {} ({template_count} {}, {embedded_count} embedded)",
            path.display(),
            plural(template_count)
        ),
        _ => println!(
            "  Templates: embedded ({embedded_count} {})",
            plural(embedded_count)
        ),
    }

    let font_count = loader.get_fonts().len();
    match loader.fonts_dir() {
        Some(path) => println!(
            "  Fonts:     {} ({font_count} {}) + system fonts",
            path.display(),
            plural(font_count)
        ),
        None => println!("  Fonts:     system fonts"),
    }

    println!("\nCommands:");
    println!("  lens-ribbon serve    Start the HTTP server");
    println!("  lens-ribbon render   Render a lens document to an image file");
    println!("  lens-ribbon tables   Print the band table and aperture legend");
    println!("  lens-ribbon init     Extract embedded assets");
    println!("\nRun 'lens-ribbon --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lens_ribbon=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let asset_loader = Arc::new(AssetLoader::from_env());

    let describe = |path: Option<&Path>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string())
    };
    tracing::info!(
        templates = %describe(asset_loader.templates_dir()),
        fonts = %describe(asset_loader.fonts_dir()),
        config = %describe(asset_loader.config_file()),
        "Asset sources configured"
    );

    // Seed if configured paths are empty
    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                templates = report.templates_seeded.len(),
                config = report.config_seeded,
                "Seeded empty directories with embedded assets"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }

    let state = server::create_app_state(asset_loader)?;

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Lens ribbon server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
