use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use layerwatch_core::check::{CheckOptions, execute_check};
use layerwatch_core::config::WatchConfig;
use layerwatch_core::report::{
    ReportFormat, generate_json_report, generate_text_report, save_report,
};
use layerwatch_core::sink::{BufferSink, ConsoleSink, ReportSink};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

pub const STARTER_CONFIG: &str = include_str!("../config/starter.json");

/// Load the watch configuration, expanding `~` in the path.
pub fn load_config(path: &str) -> anyhow::Result<WatchConfig> {
    let expanded = shellexpand::tilde(path);
    let path = Path::new(expanded.as_ref());
    WatchConfig::load(path)
        .with_context(|| format!("cannot load configuration from {}", path.display()))
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush().unwrap();
    let mut response = String::new();
    io::stdin().read_line(&mut response).unwrap();
    response.trim().to_lowercase()
}

pub fn handle_init(args: &ArgMatches) {
    print_divider();
    println!("{}", "  LAYERWATCH INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let config_dir_arg = args.get_one::<String>("PATH").unwrap();
    let force = args.get_flag("force");
    let expanded = shellexpand::tilde(config_dir_arg);
    let config_dir = Path::new(expanded.as_ref());
    let config_path = config_dir.join("layerwatch.json");

    if config_path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("Configuration file already exists:");
        println!(
            "  {} {}",
            "•".yellow(),
            config_path.display().to_string().bright_white()
        );
        println!();

        let response = print_prompt("Do you want to overwrite it? [y/N]:");
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return;
        }
        println!("{} Proceeding with overwrite", "→".yellow().bold());
        println!();
    }

    println!("{} Creating directory structure...", "→".blue());
    fs::create_dir_all(config_dir).expect("Failed to create config directory");
    println!(
        "  {} {}",
        "✓".green(),
        config_dir.display().to_string().bright_white()
    );

    println!("{} Writing starter configuration...", "→".blue());
    fs::write(&config_path, STARTER_CONFIG).expect("Failed to write starter configuration");
    println!(
        "  {} {}",
        "✓".green(),
        config_path.display().to_string().bright_white()
    );
    println!();

    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "Edit {} and add your map item ids.",
        config_path.display().to_string().bright_white()
    );
    println!(
        "Portal credentials can be supplied via {} / {}.",
        "LAYERWATCH_PORTAL_USER".cyan(),
        "LAYERWATCH_PORTAL_PASSWORD".cyan()
    );
    println!();
}

pub async fn handle_check(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let config_path = sub_matches.get_one::<String>("config").unwrap();
    let only_map = sub_matches.get_one::<String>("map").cloned();
    let timeout = sub_matches.get_one::<u64>("timeout");
    let format_arg = sub_matches.get_one::<String>("format").unwrap();
    let output = sub_matches.get_one::<std::path::PathBuf>("output");

    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    };
    if let Some(timeout) = timeout {
        config.timeout_secs = *timeout;
    }

    // clap restricts the value set; from_str only normalizes it.
    let format = ReportFormat::from_str(format_arg).expect("clap validated the format");

    let render_to_console = matches!(format, ReportFormat::Text) && output.is_none();
    if render_to_console {
        println!("\n🗺  Checking {} map(s)", config.maps.len());
        println!("Timeout: {}s per request\n", config.timeout_secs);
    }

    let options = CheckOptions {
        config,
        only_map,
        show_progress_bars: render_to_console,
    };

    // Progress lines go to the console for the default text output; for
    // JSON or file output they are buffered so stdout stays clean.
    let mut console = ConsoleSink;
    let mut buffer = BufferSink::new();
    let sink: &mut dyn ReportSink = if render_to_console {
        &mut console
    } else {
        &mut buffer
    };

    let summary = match execute_check(options, None, sink).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("✗ Check failed: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Run complete: {}/{} maps fully accessible",
        summary.reports.iter().filter(|r| r.all_layers_ok).count(),
        summary.reports.len()
    );

    let rendered = match format {
        ReportFormat::Text => generate_text_report(&summary),
        ReportFormat::Json => match generate_json_report(&summary) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("✗ Failed to render JSON report: {}", e);
                std::process::exit(1);
            }
        },
    };

    match output {
        Some(path) => {
            if let Err(e) = save_report(&rendered, path) {
                eprintln!("✗ Failed to save report to {}: {}", path.display(), e);
                std::process::exit(1);
            }
            println!("✓ Report saved to {}", path.display());
        }
        None => {
            print!("{}", rendered);
        }
    }

    if !summary.all_maps_ok {
        std::process::exit(1);
    }
}
