mod cli;

use tubevault::{catalog, config, metadata::MetadataPipeline, reconcile, scanner::Scanner, sync};
use tubevault_av::ToolRegistry;
use tubevault_common::Video;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tubevault=trace,tubevault_av=trace,tubevault_common=debug".to_string()
        } else {
            "tubevault=info,tubevault_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan { dir, json } => scan_dir(&dir, json),
        Commands::Diff { dir, catalog, json } => diff_dir(&dir, &catalog, json),
        Commands::Plan { json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(plan(cli.config.as_deref(), json))
        }
        Commands::Metadata { file, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(show_metadata(&file, cli.config.as_deref(), json))
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("tubevault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn scan_dir(dir: &Path, json: bool) -> Result<()> {
    let report = Scanner::new().scan_directory_blocking(dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for video in &report.videos {
        println!("{}  {}", video.id(), video.path().display());
    }
    println!();
    println!("Videos: {}", report.videos.len());
    if report.skipped_unidentified > 0 {
        println!("Unidentified: {}", report.skipped_unidentified);
    }
    if report.skipped_unsupported > 0 {
        println!("Other files: {}", report.skipped_unsupported);
    }

    Ok(())
}

fn diff_dir(dir: &Path, catalog_path: &Path, json: bool) -> Result<()> {
    let report = Scanner::new().scan_directory_blocking(dir)?;
    let entries = catalog::load_entries(catalog_path)?;
    let remote = entries.len();
    let to_fetch = reconcile::entries_to_fetch(entries, &report.videos);

    if json {
        println!("{}", serde_json::to_string_pretty(&to_fetch)?);
        return Ok(());
    }

    for entry in &to_fetch {
        println!("{}  {}", entry.id, entry.title);
    }
    println!();
    println!(
        "{} of {} catalog entries missing ({} held locally)",
        to_fetch.len(),
        remote,
        report.videos.len()
    );

    Ok(())
}

async fn plan(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    if config.channels.is_empty() {
        anyhow::bail!("No channels configured");
    }

    let outcomes = sync::plan_channels(Arc::new(config)).await;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    if json {
        let value: Vec<serde_json::Value> = outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(plan) => serde_json::json!({ "channel": o.channel, "plan": plan }),
                Err(e) => serde_json::json!({ "channel": o.channel, "error": format!("{e:#}") }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(plan) => {
                    println!(
                        "✓ {}: {} to fetch ({} local, {} in catalog)",
                        plan.channel,
                        plan.to_fetch.len(),
                        plan.local,
                        plan.remote
                    );
                    for entry in &plan.to_fetch {
                        println!("    {}  {}", entry.id, entry.title);
                    }
                }
                Err(e) => println!("✗ {}: {:#}", outcome.channel, e),
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} channels failed", failed, outcomes.len());
    }

    Ok(())
}

async fn show_metadata(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let pipeline = MetadataPipeline::from_config(&config);
    pipeline.backends().select(file)?;
    let video = Video::from_path(file)?;
    let extraction = pipeline.extract(&video).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&extraction.report())?);
        return Ok(());
    }

    let metadata = &extraction.metadata;
    println!("File: {}", video.path().display());
    println!("Id: {}", video.id());
    println!("Format: {}", video.file_type());
    println!("Title: {}", metadata.title);
    println!("Creator: {}", metadata.creator);
    if let Some(date) = metadata.published_at {
        println!("Published: {}", date);
    }
    if let Some(duration) = metadata.duration {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let hours = mins / 60;
        println!("Duration: {:02}:{:02}:{:02}", hours, mins % 60, secs % 60);
    }
    if !metadata.description.is_empty() {
        println!("Description:\n{}", metadata.description);
    }

    if let Some(ref err) = extraction.parse_error {
        eprintln!("\n{}", err);
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all features.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Archive root: {}", config.archive.root.display());
            println!("  Tool timeout: {}s", config.tools.timeout_secs);
            println!(
                "  Concurrency: {} channels, {} extractions",
                config.concurrency.channels, config.concurrency.extractions
            );
            println!("  Channels: {}", config.channels.len());
            for channel in &config.channels {
                println!("    {} -> {}", channel.name, config.channel_dir(channel).display());
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Archive root: {}", config.archive.root.display());
            println!("  Tool timeout: {}s", config.tools.timeout_secs);
        }
    }

    Ok(())
}
