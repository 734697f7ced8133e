//! Verdant View command line.
//!
//! Stands in for the analyst panel: pick a region, a year and a category,
//! then compute the indicator and schedule its exports on the platform.

mod config;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::{ExportBackend, VerdantConfig};
use indicators::IndicatorRegistry;
use pipeline::{Inspection, PipelineError, RunRequest, Services, Session, Workflow};
use platform::{ExportDestination, ExportQueue, HttpPlatform};
use verdant_common::region::DEFAULT_REGION;
use verdant_common::{Coordinate, GaulRegistry, RegionRegistry, Season};

#[derive(Parser, Debug)]
#[command(name = "verdant")]
#[command(about = "Land-condition indicators for Bangladesh regions")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "VERDANT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute an indicator and schedule its exports
    Run(Selection),
    /// Print the expressions and export jobs a run would submit
    Plan(Selection),
    /// List the selectable regions
    Regions,
    /// List the implemented categories
    Categories,
}

#[derive(ClapArgs, Debug)]
struct Selection {
    /// Region name
    #[arg(short, long, default_value = DEFAULT_REGION)]
    region: String,

    #[arg(short, long)]
    year: i32,

    /// Category id, label or label prefix
    #[arg(short = 'k', long)]
    category: String,

    /// Full Year, Kharif, Rabi or Pre-monsoon
    #[arg(long)]
    season: Option<String>,

    /// Export scale in meters, as typed
    #[arg(long)]
    scale: Option<String>,

    /// Destination folder
    #[arg(long)]
    folder: Option<String>,

    /// Sample the computed product at lon,lat (repeatable)
    #[arg(long = "inspect")]
    inspect: Vec<String>,
}

impl Selection {
    fn request(&self) -> RunRequest {
        RunRequest {
            category: self.category.clone(),
            year: self.year,
            season: self
                .season
                .as_deref()
                .map(Season::from_name)
                .unwrap_or_default(),
            scale: self.scale.clone(),
            folder: self.folder.clone(),
        }
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json)?;

    let config = VerdantConfig::load(args.config.as_deref())?;
    info!(
        endpoint = %config.platform.endpoint,
        backend = ?config.export.backend,
        years = ?config.years,
        "Loaded configuration"
    );

    match args.command {
        Command::Regions => {
            for name in GaulRegistry.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Categories => {
            for category in IndicatorRegistry::new().categories() {
                let spec = category.spec();
                println!("{:<20} {}\n{:<20} {}", spec.id, spec.label, "", spec.description);
            }
            Ok(())
        }
        Command::Run(selection) => run(&config, &selection).await,
        Command::Plan(selection) => plan(&config, &selection),
    }
}

/// Print a notice for errors the analyst can fix from the panel, and
/// propagate the rest.
fn report(err: PipelineError) -> Result<()> {
    if err.is_notice() {
        warn!(error = %err, "Request not computed");
        println!("{}", err);
        Ok(())
    } else {
        Err(err.into())
    }
}

async fn run(config: &VerdantConfig, selection: &Selection) -> Result<()> {
    let mut session = Session::new(GaulRegistry.resolve(&selection.region)?);

    let http = HttpPlatform::new(config.platform.clone())?;
    let queue = match config.export.backend {
        ExportBackend::Queue => Some(
            ExportQueue::connect(&config.export.redis_url)
                .await
                .context("Failed to connect to export queue")?,
        ),
        ExportBackend::Platform => None,
    };
    let destination: &dyn ExportDestination = match &queue {
        Some(queue) => queue as &dyn ExportDestination,
        None => &http as &dyn ExportDestination,
    };

    let services = Services {
        provider: &http,
        compute: &http,
        destination,
    };
    let workflow = Workflow::new(services, config.workflow_settings());

    let summary = match workflow.run(&mut session, &selection.request()).await {
        Ok(summary) => summary,
        Err(e) => return report(e),
    };

    info!(
        base_name = %summary.export.base_name,
        submitted = summary.export.submitted(),
        skipped = summary.export.skipped(),
        failed = summary.export.failed(),
        "Export tasks started"
    );
    if summary.export.failed() > 0 {
        error!(base_name = %summary.export.base_name, "Some exports could not be started");
    }
    if let Some(queue) = &queue {
        match queue.queue_depth().await {
            Ok(depth) => info!(depth, "Export queue depth"),
            Err(e) => warn!(error = %e, "Could not read export queue depth"),
        }
    }
    print_json(&summary)?;

    for text in &selection.inspect {
        let coordinate = Coordinate::parse(text)?;
        match workflow
            .inspect(&session, coordinate, selection.scale.as_deref())
            .await?
        {
            Inspection::NothingComputed => println!("Compute first."),
            sampled => print_json(&sampled)?,
        }
    }

    Ok(())
}

fn plan(config: &VerdantConfig, selection: &Selection) -> Result<()> {
    let session = Session::new(GaulRegistry.resolve(&selection.region)?);
    let http = HttpPlatform::new(config.platform.clone())?;
    let workflow = Workflow::new(Services::uniform(&http), config.workflow_settings());

    match workflow.plan(&session, &selection.request()) {
        Ok(plan) => print_json(&plan),
        Err(e) => report(e),
    }
}
