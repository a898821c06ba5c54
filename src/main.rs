use std::path::{Path, PathBuf};
use std::process::ExitCode;

use burndown_chart::{save_chart, show_chart, ChartData, RenderSettings, TickTimezone};
use clap::{ArgGroup, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a sprint burndown chart", long_about = None)]
#[command(group(ArgGroup::new("sink").required(true).args(["output", "show"])))]
struct Cli {
    /// JSON file with the chart data
    input: PathBuf,

    /// Write the chart to this path (png, jpg, bmp or svg)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Open the chart in a window instead of saving it
    #[arg(long)]
    show: bool,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Timezone for Monday ticks: local, utc or +HH:MM
    #[arg(long)]
    tick_timezone: Option<TickTimezone>,
}

fn load_chart_data(path: &Path) -> Result<ChartData, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid chart data in {}: {}", path.display(), e))
}

fn run(cli: Cli) -> Result<(), String> {
    let mut settings = RenderSettings::from_env().map_err(|e| e.to_string())?;
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(height) = cli.height {
        settings.height = height;
    }
    if let Some(tz) = cli.tick_timezone {
        settings.tick_timezone = tz;
    }

    let data = load_chart_data(&cli.input)?;
    info!(
        "Loaded '{}' with {} series from {}",
        data.sprint_name,
        data.series.len(),
        cli.input.display()
    );

    match cli.output {
        Some(path) => save_chart(&data, &path, &settings),
        None => show_chart(&data, &settings),
    }
    .map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "burndown_chart=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    info!("📉 Rendering burndown chart from {}", cli.input.display());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
