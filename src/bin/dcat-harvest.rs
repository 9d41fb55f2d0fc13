use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dcat_harvester::{
    DcatExportSource, HarvestConfig, HarvestError, HttpCatalogClient, Ledger, PublicationSettings,
    RdfFormat, RdfGraph, SourceCatalog, StudyCatalogSource, StudyProfile, Synchronizer, WatermarkPolicy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// One DCAT export (file or URL) holding every dataset
    Dcat,
    /// JSON study catalogue with a search endpoint
    Study,
}

#[derive(Parser, Debug)]
#[command(
    name = "dcat-harvest",
    version,
    about = "Harvest a publisher catalogue and synchronize it into the central catalogue",
    after_help = "Example:\n  dcat-harvest --api-url https://api.example.org/partner/v1 \\\n    --source https://data.bl.ch/api/explore/v2.1/catalog/exports/dcat --ledger state/ledger.json"
)]
struct Args {
    /// Base URL of the remote catalogue API.
    #[arg(long, env = "HARVEST_API_URL")]
    api_url: String,

    /// Access token for the remote catalogue.
    #[arg(long, env = "HARVEST_ACCESS_TOKEN", hide_env_values = true)]
    token: String,

    /// Source: DCAT export URL or file, or study catalogue base URL.
    #[arg(long, env = "HARVEST_SOURCE")]
    source: String,

    /// Kind of source catalogue.
    #[arg(long, value_enum, default_value = "dcat", env = "HARVEST_SOURCE_KIND")]
    kind: SourceKind,

    /// RDF format of a DCAT export (xml, ttl, nt, jsonld); guessed from the file extension if omitted.
    #[arg(long)]
    format: Option<String>,

    /// Study profile (JSON) with the values shared by all studies.
    #[arg(long, env = "HARVEST_STUDY_PROFILE")]
    profile: Option<PathBuf>,

    /// Ledger file.
    #[arg(long, default_value = "ledger.json", env = "HARVEST_LEDGER")]
    ledger: PathBuf,

    /// Ledger used when the ledger file is missing or unreadable.
    #[arg(long)]
    seed_ledger: Option<PathBuf>,

    /// Where to write the run summary.
    #[arg(long, default_value = "harvest_log.txt", env = "HARVEST_SUMMARY")]
    summary: PathBuf,

    /// Organization id used for rewritten identifiers and as publisher.
    #[arg(long, default_value = "CH_KT_BL", env = "HARVEST_ORGANIZATION_ID")]
    organization: String,

    /// Maximum number of concurrent jobs.
    #[arg(long, default_value_t = dcat_harvester::config::DEFAULT_MAX_WORKERS)]
    workers: usize,

    /// Treat records changed within this many hours as changed instead of
    /// using the watermark of the last successful run.
    #[arg(long)]
    lookback_hours: Option<i64>,

    /// Publication level set after each create.
    #[arg(long)]
    publication_level: Option<String>,

    /// Registration status set after each create.
    #[arg(long)]
    registration_status: Option<String>,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let mut config = HarvestConfig::new(args.organization.as_str())
        .with_max_workers(args.workers)
        .with_publication(PublicationSettings {
            level: args.publication_level.clone(),
            registration_status: args.registration_status.clone(),
        });
    if let Some(hours) = args.lookback_hours {
        config = config.with_watermark(WatermarkPolicy::Lookback { hours });
    }

    let source = open_source(args)?;
    let client = HttpCatalogClient::new(args.api_url.as_str(), args.token.as_str())
        .context("failed to build catalogue client")?;
    let seed = match &args.seed_ledger {
        Some(path) => Ledger::try_load(path)
            .with_context(|| format!("failed to read seed ledger {}", path.display()))?
            .unwrap_or_default(),
        None => Ledger::new(),
    };

    let summary = Synchronizer::new(&config, source.as_ref(), &client)
        .run_with_store(&args.ledger, seed)
        .context("synchronization failed")?;

    summary
        .write_to(&args.summary)
        .with_context(|| format!("failed to write {}", args.summary.display()))?;
    log::info!("Summary written to {}", args.summary.display());

    summary.into_result()?;
    Ok(())
}

fn open_source(args: &Args) -> Result<Box<dyn SourceCatalog>> {
    match args.kind {
        SourceKind::Dcat => {
            let format = args
                .format
                .as_deref()
                .map(str::parse::<RdfFormat>)
                .transpose()?;
            let source = match format {
                _ if is_url(&args.source) => DcatExportSource::download(
                    &args.source,
                    format.unwrap_or_else(|| guess_format(&args.source)),
                ),
                Some(format) => File::open(&args.source)
                    .map_err(HarvestError::from)
                    .and_then(|file| RdfGraph::parse_from_reader(BufReader::new(file), format))
                    .map(DcatExportSource::from_graph),
                None => DcatExportSource::from_path(Path::new(&args.source)),
            }
            .with_context(|| format!("failed to read DCAT export {}", args.source))?;
            Ok(Box::new(source))
        },
        SourceKind::Study => {
            let profile = match &args.profile {
                Some(path) => {
                    let file = File::open(path)
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    serde_json::from_reader(file).context("failed to parse study profile")?
                },
                None => StudyProfile::default(),
            };
            Ok(Box::new(StudyCatalogSource::new(args.source.as_str(), profile)?))
        },
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn guess_format(source: &str) -> RdfFormat {
    Path::new(source.split(['?', '#']).next().unwrap_or(source))
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(RdfFormat::from_extension)
        .unwrap_or_default()
}
