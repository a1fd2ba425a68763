//! AOD Explorer
//!
//! Web UI and command line for browsing AERONET aerosol optical depth data.

use std::fs::File;
use std::io::BufWriter;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use aeronet_client::{AodDataset, CacheMode};
use aeronet_common::{parse_date, AveragingType, QualityLevel, Query, Wavelength};
use aod_explorer::config::{ExplorerConfig, DEFAULT_CONFIG_PATH};
use aod_explorer::state::AppState;

/// AERONET AOD Explorer
#[derive(Parser, Debug)]
#[command(name = "aod-explorer")]
#[command(about = "Explore AERONET aerosol optical depth measurements", version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH, env = "AOD_CONFIG")]
    config: PathBuf,

    /// Cache directory (overrides the config file)
    #[arg(long, global = true, env = "AOD_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web UI
    Serve {
        /// Listen address (overrides the config file)
        #[arg(short, long, env = "AOD_LISTEN_ADDR")]
        listen: Option<String>,
    },

    /// Fetch AOD data for one site and print a summary
    Fetch {
        /// AERONET site name, e.g. GSFC
        #[arg(short, long)]
        site: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Quality level: 1.0, 1.5 or 2.0
        #[arg(long, default_value = "1.5")]
        level: String,

        /// Averaging: all or daily
        #[arg(long, default_value = "all")]
        averaging: String,

        /// Comma separated wavelengths in nm
        #[arg(short, long, default_value = "440,500,675")]
        wavelengths: String,

        /// Bypass the cache and refetch
        #[arg(long)]
        refresh: bool,

        /// Write the rows as CSV
        #[arg(long)]
        export: Option<PathBuf>,

        /// Write the time-series chart (SVG)
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Write the statistics box plot (SVG)
        #[arg(long)]
        stats_plot: Option<PathBuf>,

        /// Write the site map (PNG)
        #[arg(long)]
        map: Option<PathBuf>,
    },

    /// List AERONET sites
    Sites {
        /// Refetch the site list
        #[arg(long)]
        refresh: bool,
    },

    /// Inspect or clear the response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// List cached responses
    List,
    /// Delete every cached response
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let mut config = ExplorerConfig::load(&cli.config)?;
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = dir;
    }

    match cli.command {
        Commands::Serve { listen } => {
            if let Some(listen) = listen {
                config.listen = listen;
            }
            serve(config).await
        }
        Commands::Fetch {
            site,
            start,
            end,
            level,
            averaging,
            wavelengths,
            refresh,
            export,
            plot,
            stats_plot,
            map,
        } => {
            let query = Query::new(site, parse_date(&start)?, parse_date(&end)?)
                .with_level(level.parse::<QualityLevel>()?)
                .with_averaging(averaging.parse::<AveragingType>()?)
                .with_wavelengths(Wavelength::parse_list(&wavelengths)?);

            let outputs = Outputs {
                export,
                plot,
                stats_plot,
                map,
            };
            fetch(config, query, CacheMode::from_refresh(refresh), outputs).await
        }
        Commands::Sites { refresh } => list_sites(config, CacheMode::from_refresh(refresh)).await,
        Commands::Cache { action } => cache(config, action).await,
    }
}

async fn serve(config: ExplorerConfig) -> Result<()> {
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen))?;

    let state = Arc::new(AppState::new(config, Some(prometheus_handle)).await?);
    info!(cache_dir = %state.service.cache().dir().display(), "Starting AOD explorer");

    let app = aod_explorer::app(state);

    info!("AOD explorer listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}

/// Files requested by `fetch`.
#[derive(Debug)]
struct Outputs {
    export: Option<PathBuf>,
    plot: Option<PathBuf>,
    stats_plot: Option<PathBuf>,
    map: Option<PathBuf>,
}

async fn fetch(config: ExplorerConfig, query: Query, mode: CacheMode, outputs: Outputs) -> Result<()> {
    let plot_size = config.plot_size();
    let (map_width, map_height) = config.map_size();
    let state = AppState::new(config, None).await?;

    let dataset = state.service.load(&query, mode).await?;
    print_summary(&dataset);

    if let Some(path) = &outputs.export {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let lines = renderer::export_csv(&dataset.rows, &query.wavelengths, BufWriter::new(file))?;
        println!("Wrote {} rows to {}", lines, path.display());
    }

    if let Some(path) = &outputs.plot {
        let title = format!("AOD Time Series - {}", query.site);
        let svg = renderer::render_timeseries_svg(&dataset.rows, &query.wavelengths, &title, plot_size)?;
        write_output(path, svg.as_bytes())?;
    }

    if let Some(path) = &outputs.stats_plot {
        let svg = renderer::render_statistics_svg(&dataset.rows, &query.wavelengths, plot_size)?;
        write_output(path, svg.as_bytes())?;
    }

    if let Some(path) = &outputs.map {
        let sites = state.service.sites(CacheMode::Use).await?;
        let png = renderer::render_site_map(&sites, Some(&query.site), map_width, map_height)?;
        write_output(path, &png)?;
    }

    Ok(())
}

fn print_summary(dataset: &AodDataset) {
    let query = &dataset.query;
    println!("Site:         {}", query.site);
    println!("Period:       {} to {}", query.start, query.end);
    println!("Level:        {}", query.level.label());
    println!("Averaging:    {}", query.averaging.label());
    println!(
        "Rows:         {} ({})",
        dataset.rows.len(),
        if dataset.from_cache { "cached" } else { "fetched" }
    );

    if dataset.is_empty() {
        println!("No data available for the selected parameters.");
        return;
    }

    if let Some(coverage) = dataset.coverage() {
        println!(
            "Coverage:     {} to {} ({} days, {} timestamps)",
            coverage.first.format("%Y-%m-%d %H:%M"),
            coverage.last.format("%Y-%m-%d %H:%M"),
            coverage.span_days,
            coverage.timestamps
        );
    }

    println!();
    println!(
        "{:>10} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>9}",
        "Wavelength", "Count", "Mean", "Median", "Std", "Min", "Max", "Complete"
    );
    let completeness = dataset.completeness();
    for stats in dataset.statistics() {
        let percent = completeness
            .iter()
            .find(|c| c.wavelength == stats.wavelength)
            .map(|c| c.percent)
            .unwrap_or(0.0);
        println!(
            "{:>10} {:>6} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.1}%",
            stats.wavelength.to_string(),
            stats.count,
            stats.mean,
            stats.median,
            stats.std,
            stats.min,
            stats.max,
            percent
        );
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

async fn list_sites(config: ExplorerConfig, mode: CacheMode) -> Result<()> {
    let state = AppState::new(config, None).await?;
    let sites = state.service.sites(mode).await?;

    println!("{:<32} {:>9} {:>10} {:>8}", "Site", "Latitude", "Longitude", "Elev(m)");
    for site in sites.iter() {
        println!(
            "{:<32} {:>9.4} {:>10.4} {:>8.0}",
            site.name, site.latitude, site.longitude, site.elevation
        );
    }
    println!("{} sites", sites.len());
    Ok(())
}

async fn cache(config: ExplorerConfig, action: CacheAction) -> Result<()> {
    let cache = storage::DiskCache::open(&config.cache_dir).await?;

    match action {
        CacheAction::List => {
            let entries = cache.entries()?;
            for entry in &entries {
                let modified = entry
                    .modified
                    .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default();
                println!("{:<60} {:>10} {}", entry.key, entry.size_bytes, modified);
            }
            let total: u64 = entries.iter().map(|e| e.size_bytes).sum();
            println!("{} entries, {} bytes in {}", entries.len(), total, cache.dir().display());
        }
        CacheAction::Clear => {
            let removed = cache.clear().await?;
            println!("Removed {} cached responses from {}", removed, cache.dir().display());
        }
    }

    Ok(())
}
