use std::process::ExitCode;

use tfnsw_gtfs_alerts::{TransportMode, fetch_alerts, project_alerts};

#[tokio::main]
async fn main() -> ExitCode {
    let mode = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<TransportMode>() {
            Ok(mode) => mode,
            Err(e) => {
                eprintln!("{e}");
                eprintln!(
                    "expected one of: {}",
                    TransportMode::ALL.map(|m| m.path_segment()).join(", ")
                );
                return ExitCode::FAILURE;
            }
        },
        None => TransportMode::SydneyTrains,
    };

    match fetch_alerts(mode).await {
        Ok(feed) => match project_alerts(&feed) {
            Ok(summaries) => {
                for summary in summaries {
                    println!("{summary}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error projecting alerts: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Error fetching alerts: {e}");
            ExitCode::FAILURE
        }
    }
}
