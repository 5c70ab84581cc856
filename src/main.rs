//! hwenc-probe - hardware encoding diagnostic tool
//!
//! Entry point for the probe binary.

use anyhow::Result;
use clap::Parser;
use hwenc_bridge::config::{self, Config};
use hwenc_bridge::encoders::{self, EncoderInfo};
use hwenc_bridge::probe::{self, ApiReport, HardwareReport};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for hwenc-probe
#[derive(Parser, Debug)]
#[command(name = "hwenc-probe")]
#[command(version, about = "Hardware encoding capability probe", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "pretty", env = "HWENC_LOG_FORMAT")]
    pub log_format: String,

    /// Write logs to file (in addition to stdout)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Report output format (text|json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// List registered encoder handlers and exit
    #[arg(long)]
    pub list_handlers: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (needed for logging settings); fall back to
    // defaults if no file exists yet
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    init_logging(&args, &config.logging)?;
    config.apply_overrides();

    info!("════════════════════════════════════════════════════════");
    info!("  hwenc-probe v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "  Built: {} {}",
        option_env!("BUILD_DATE").unwrap_or("unknown"),
        option_env!("BUILD_TIME").unwrap_or("")
    );
    info!(
        "  Commit: {}",
        option_env!("GIT_HASH").unwrap_or("vendored")
    );
    info!("════════════════════════════════════════════════════════");

    if args.list_handlers {
        list_handlers();
        return Ok(());
    }

    let report = probe::probe();
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_report_text(&report),
    }

    Ok(())
}

/// Dump the registered encoder handlers and their capability flags
fn list_handlers() {
    for (codec, handler) in encoders::registered_handlers() {
        let mut info = EncoderInfo::new(codec);
        handler.adjust_info(&mut info);

        println!("{codec}");
        println!("  name:      {}", info.name);
        println!("  id:        {}", info.id);
        println!("  hardware:  {}", yes_no(handler.is_hardware_encoder()));
        println!("  keyframes: {}", yes_no(handler.has_keyframe_support()));
        println!("  threading: {}", yes_no(handler.has_threading_support()));
        println!(
            "  pixel-format negotiation: {}",
            yes_no(handler.has_pixel_format_support())
        );
        if info.deprecated {
            println!("  deprecated: vendor runtime not present");
        }
        println!();
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Output the probe report in human-readable text format
fn print_report_text(report: &HardwareReport) {
    println!("╔════════════════════════════════════════════════════════╗");
    println!("║         Hardware Encoding Report                       ║");
    println!("╚════════════════════════════════════════════════════════╝");
    println!();

    print_api_line("AMD AMF runtime", &report.amf);
    print_api_line("NVIDIA CUDA driver", &report.cuda);
    println!();
    println!("Service level: {}", report.service_level);
}

fn print_api_line(label: &str, api: &ApiReport) {
    if api.available {
        println!(
            "{label}: ✅ version {} ({}ms)",
            api.version.as_deref().unwrap_or("unknown"),
            api.probe_ms
        );
    } else {
        println!(
            "{label}: ❌ {} ({}ms)",
            api.error.as_deref().unwrap_or("unavailable"),
            api.probe_ms
        );
    }
}

/// Initialize the tracing subscriber from CLI args and config
fn init_logging(args: &Args, logging_config: &config::LoggingConfig) -> Result<()> {
    use std::fs::{self, File};

    // CLI -v flag overrides config
    let log_level = if args.verbose > 0 {
        match args.verbose {
            1 => "debug",
            _ => "trace",
        }
    } else {
        match logging_config.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => logging_config.level.as_str(),
            _ => "info", // Invalid value, fallback to info
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "hwenc_bridge={log_level},hwenc_probe={log_level},warn"
        ))
    });

    // CLI --log-file overrides config.log_dir
    let log_file_path: Option<String> = if let Some(cli_path) = &args.log_file {
        Some(cli_path.clone())
    } else if logging_config.log_dir.is_some() {
        let log_dir = config::resolve_log_dir(&logging_config.log_dir);
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!(
                "Warning: Cannot create log directory {}: {e}",
                log_dir.display()
            );
            None
        } else {
            let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            Some(
                log_dir
                    .join(format!("hwenc-probe-{timestamp}.log"))
                    .display()
                    .to_string(),
            )
        }
    } else {
        None
    };

    // Gracefully fall back to stdout-only if file creation fails
    let log_file = log_file_path
        .as_ref()
        .and_then(|path| match File::create(path) {
            Ok(f) => Some((f, path.clone())),
            Err(e) => {
                eprintln!(
                    "Warning: Cannot create log file {path:?}: {e} — logging to console only"
                );
                None
            }
        });

    if let Some((file, ref log_file_path)) = log_file {
        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
        info!("Logging to file: {}", log_file_path);
    } else {
        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json())
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().compact())
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().pretty())
                    .init();
            }
        }
    }

    Ok(())
}
