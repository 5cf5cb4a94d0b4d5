use clap::Parser;
use page_testgen::cli::commands::{cmd_analyze, cmd_cache_purge};
use page_testgen::cli::config::{CacheAction, Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so generated artifacts on stdout stay clean
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Analyze {
            input,
            url,
            no_cache,
            format,
            output_dir,
        } => {
            cmd_analyze(
                &config,
                cli.cache_dir.as_deref(),
                &input,
                &url,
                no_cache,
                &format,
                output_dir.as_deref(),
                cli.verbose,
            )?;
        }
        Commands::Cache { action } => match action {
            CacheAction::Purge => {
                cmd_cache_purge(&config, cli.cache_dir.as_deref())?;
            }
        },
    }

    Ok(())
}
