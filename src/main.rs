use clap::{Parser, Subcommand};
use folio::contact::{ContactFields, ContactForm};
use folio::relay::{DryRunRelay, EmailJsRelay};
use folio::{config, generate, output, process, scan};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

/// Shared flags for commands that process images.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the processing cache and re-encode every image
    #[arg(long)]
    no_cache: bool,
}

#[derive(clap::Args, Clone)]
struct ContactArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    message: String,
    /// Log the relay request instead of sending it
    #[arg(long)]
    dry_run: bool,
}

fn version_string() -> &'static str {
    if env!("FOLIO_RELEASE") == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FOLIO_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup.
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for single-page portfolios")]
#[command(long_about = "\
Static site generator for single-page portfolios

One content directory in, one self-contained page out: hero, about,
filterable projects with image galleries, case studies, skills, and a
contact form wired to a mail relay.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── about.md                     # Biography, markdown
  ├── skills.toml                  # [[group]] panels and a tools strip
  ├── assets/                      # Copied to the site root (favicon, …)
  ├── projects/
  │   ├── 010-Sales-Dashboard/     # Numbered = published, in number order
  │   │   ├── project.toml         # category, description, tools, link
  │   │   ├── 001-Overview.jpg     # Gallery images
  │   │   └── 002-Filters.jpg
  │   └── wip-Notes/               # No number prefix = skipped
  └── case-studies/
      └── 010-Checkout-Friction/
          ├── study.toml           # context, problem, solution
          └── 001-cover.jpg

Run 'folio gen-config' to print a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest, processed images)
    #[arg(long, default_value = ".folio-temp", global = true)]
    temp_dir: PathBuf,

    /// Debug-level diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Generate thumbnails and display sizes
    Process(CacheArgs),
    /// Produce the final page from processed images
    Generate,
    /// Run the full pipeline: scan → process → generate
    Build(CacheArgs),
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Send one message through the configured mail relay
    Contact(ContactArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_scan_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Process(cache_args) => {
            let scan_manifest_path = cli.temp_dir.join("manifest.json");
            let manifest_content = std::fs::read_to_string(&scan_manifest_path)?;
            let manifest: folio::types::Manifest = serde_json::from_str(&manifest_content)?;
            init_thread_pool(&manifest.config.processing);
            run_process(&cli, &cli.source, cache_args)?;
        }
        Command::Generate => {
            run_generate(&cli, &cli.source)?;
        }
        Command::Build(cache_args) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_scan_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Processing images");
            init_thread_pool(&manifest.config.processing);
            run_process(&cli, &cli.source, cache_args)?;

            println!("==> Stage 3: Generating HTML \u{2192} {}", cli.output.display());
            run_generate(&cli, &cli.source)?;

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Contact(args) => send_contact(&cli.source, args)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "folio=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Size the global rayon pool from `[processing]`.
///
/// Caps at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn write_scan_manifest(
    manifest: &folio::types::Manifest,
    temp_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)?;
    Ok(())
}

fn run_process(
    cli: &Cli,
    source: &Path,
    cache_args: &CacheArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let scan_manifest_path = cli.temp_dir.join("manifest.json");
    let processed_dir = cli.temp_dir.join("processed");

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = process::process(
        &scan_manifest_path,
        source,
        &processed_dir,
        !cache_args.no_cache,
        Some(tx),
    );
    if printer.join().is_err() {
        tracing::warn!("progress printer panicked");
    }
    let result = result?;

    let json = serde_json::to_string_pretty(&result.manifest)?;
    std::fs::write(processed_dir.join("manifest.json"), json)?;
    println!("Cache: {}", result.cache_stats);
    Ok(())
}

fn run_generate(cli: &Cli, source: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let processed_dir = cli.temp_dir.join("processed");
    let manifest_path = processed_dir.join("manifest.json");
    generate::generate(&manifest_path, &processed_dir, &cli.output, source)?;

    let manifest_content = std::fs::read_to_string(&manifest_path)?;
    let manifest: folio::types::Manifest = serde_json::from_str(&manifest_content)?;
    output::print_generate_output(&manifest);
    Ok(())
}

/// Submit one message with the same validation and status rules as the
/// page's form. Exits non-zero on failure.
fn send_contact(source: &Path, args: &ContactArgs) -> Result<(), Box<dyn std::error::Error>> {
    let site = config::load_config(source)?;
    let mut form = ContactForm::new(
        site.contact.payload,
        Duration::from_millis(site.contact.reset_delay_ms),
    )
    .with_fields(ContactFields::new(
        args.name.as_str(),
        args.email.as_str(),
        args.subject.as_str(),
        args.message.as_str(),
    ));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(async {
        if args.dry_run {
            form.submit(&DryRunRelay, &site.relay).await
        } else {
            let relay = EmailJsRelay::from_config(&site.relay)?;
            form.submit(&relay, &site.relay).await
        }
    });

    output::print_contact_outcome(form.status(), &result);
    Ok(result?)
}
