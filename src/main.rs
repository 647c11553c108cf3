use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use cosmic_connect_sync::analyze;
use cosmic_connect_sync::config::{SyncConfig, CONFIG_FILE_NAME};
use cosmic_connect_sync::git::GitInspector;
use cosmic_connect_sync::logger;
use cosmic_connect_sync::report;
use cosmic_connect_sync::state;

#[derive(Parser)]
#[command(name = "sync-tool")]
#[command(about = "Analyze desktop-app changes and recommend syncs to core and android", long_about = None)]
#[command(version)]
struct Cli {
    /// Analyze changes since this commit (default: last sync or HEAD~10)
    #[arg(long)]
    since: Option<String>,

    /// Show detailed analysis
    #[arg(short, long)]
    verbose: bool,

    /// Report only, without updating the last-sync checkpoint
    #[arg(long)]
    dry_run: bool,

    /// Output file for the report (default: sync-report-<timestamp>.md in the desktop repo)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::init(cli.verbose);

    let config_path = std::env::current_dir()
        .context("Failed to determine current directory")?
        .join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        eprintln!(
            "{} {}",
            "❌ Config not found:".red().bold(),
            config_path.display()
        );
        eprintln!("   Please run from cosmic-connect-desktop-app root directory");
        std::process::exit(1);
    }

    let mut config = SyncConfig::load(&config_path)?;

    let report = analyze::analyze(&config, cli.since.as_deref());
    let rendered = report.render(config.desktop_path());

    // Full report on stdout, then to disk
    println!("\n{rendered}");

    let output_path = cli
        .output
        .unwrap_or_else(|| report::default_report_path(config.desktop_path()));
    report::save_report(&rendered, &output_path)?;

    if !cli.dry_run {
        let inspector = GitInspector::new(config.desktop_path());
        state::record_sync(&inspector, &mut config);
        config.save(&config_path)?;
        println!("\n{}", "✅ Last sync timestamp updated".green());
    }

    println!("\n{}", "🎉 Sync analysis complete!".bold());
    println!("\n💡 Next steps:");
    println!("   1. Review the generated report");
    println!("   2. Apply recommended changes to cosmic-connect-core");
    println!("   3. Apply recommended changes to cosmic-connect-android");
    println!("   4. Test all repositories");
    println!("   5. Commit and push changes");

    Ok(())
}
