mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use hubload::component::Resolution;
use hubload::config::Config;
use hubload::configuration::Configuration;
use hubload::hub::SnapshotDownloader;
use hubload::loader::{
    effective_task, resolve_model_config, resolve_preprocessor_config, LoadOptions, Loader,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Pull {
            identifier,
            revision,
        } => {
            let mut downloader = SnapshotDownloader::new(config)?;
            let path = downloader.fetch(&identifier, &revision)?;

            println!("✓ Successfully pulled snapshot: {}", identifier);
            println!("  Revision: {}", revision);
            println!("  Path: {:?}", path);
        }

        Commands::Resolve {
            identifier,
            task,
            mode,
            revision,
            prefetched,
        } => {
            let mut loader = Loader::new(config)?;
            let options = LoadOptions {
                task,
                mode: mode.parse()?,
                revision: Some(revision),
                prefetched_only: prefetched,
                ..Default::default()
            };

            let model_dir = loader.resolve_snapshot(&identifier, &options)?;
            let cfg = Configuration::read_dir(&model_dir)?;

            let task = effective_task(&cfg, &options);
            let (model_type, _) = resolve_model_config(&identifier, &cfg, &model_dir, &options)?;

            println!("Snapshot: {:?}", model_dir);
            println!("  Task: {}", task.as_deref().unwrap_or("-"));
            println!("  Model type: {}", model_type);
            match resolve_preprocessor_config(&cfg, &model_dir, &options)? {
                Resolution::Resolved((preprocessor_type, _)) => {
                    println!("  Preprocessor type: {}", preprocessor_type);
                }
                Resolution::NotApplicable(reason) => {
                    println!("  Preprocessor type: none ({})", reason);
                }
            }
        }

        Commands::List => {
            let downloader = SnapshotDownloader::new(config)?;
            let entries = downloader.index().entries();

            if entries.is_empty() {
                println!("No snapshots downloaded.");
                println!("Use 'hubload pull <identifier>' to download one.");
            } else {
                println!("Downloaded snapshots:\n");
                for entry in entries {
                    println!("  {}", entry.identifier);
                    println!("    Revision: {}", entry.revision);
                    println!("    Path: {:?}", entry.path);
                    println!("    Downloaded: {}", entry.downloaded_at);
                    println!();
                }
            }
        }
    }

    Ok(())
}
