use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use parley::core::config;
use parley::tui;
use parley::tui::theme::Theme;

#[derive(Parser)]
#[command(name = "parley", about = "Terminal chat screen")]
struct Args {
    /// Directory the photos picker browses
    #[arg(long)]
    library_dir: Option<PathBuf>,

    /// External command for camera capture ({out} = output path)
    #[arg(long)]
    capture_command: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to parley.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let loaded = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("parley: {e}");
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(
        &loaded,
        args.library_dir.as_deref(),
        args.capture_command.as_deref(),
    );
    let theme = match Theme::from_config(&resolved.theme) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("parley: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Parley starting up (library: {})",
        resolved.library_dir.display()
    );

    tui::run(resolved, theme)
}
