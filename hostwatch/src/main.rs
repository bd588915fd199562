use std::sync::Arc;

use clap::Parser;
use hostwatch::{
    init_telemetry, stop_flag, ResourceMonitor, Settings, StopFlag, TracingContext,
};
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(name = "hostwatch")]
#[command(about = "Samples disk, memory and CPU usage of a build agent host")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Take a single sample and print it
    Sample {
        /// Print the sample as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the diagnostic and warning loops until interrupted (default)
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values from .env.local win over .env, the environment wins over both
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::new()?;

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Config => {
            println!("{:#?}", &settings);
            Ok(())
        }
        Commands::Sample { json } => {
            init_telemetry::init_tracing()?;
            sample(settings, *json)
        }
        Commands::Run => {
            init_telemetry::init_tracing()?;
            run(settings).await
        }
    }
}

fn sample(settings: Settings, as_json: bool) -> anyhow::Result<()> {
    let context = Arc::new(TracingContext::default());
    let mut monitor = ResourceMonitor::setup(context, settings);

    if as_json {
        let disk = match monitor.sample_disk() {
            Ok(disk) => serde_json::to_value(disk)?,
            Err(e) => json!({ "error": e.to_string() }),
        };
        let memory = match monitor.sample_memory() {
            Ok(memory) => serde_json::to_value(memory)?,
            Err(e) => json!({ "error": e.to_string() }),
        };
        let report = json!({
            "disk": disk,
            "memory": memory,
            "cpu": monitor.cpu_info_string(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Disk:   {}", monitor.disk_info_string());
        println!("Memory: {}", monitor.memory_info_string());
        println!("CPU:    {}", monitor.cpu_info_string());
    }

    monitor.dispose();
    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let stop_flag = StopFlag::new();
    stop_flag::register_signal_handler(&stop_flag);

    let context = Arc::new(TracingContext::new(stop_flag));
    let mut monitor = ResourceMonitor::setup(context, settings);

    tokio::join!(monitor.run(), monitor.run_resource_utilization_monitor());

    monitor.dispose();
    info!("Resource monitor stopped");
    Ok(())
}
