mod config;
mod logging;

use clap::{Parser, Subcommand};
use config::Config;
use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use trafo_mirror::sheets::{GoogleSheetsSink, SheetTarget};
use trafo_mirror::SheetSink;

#[derive(Parser)]
#[command(name = "trafo", about = "Field prospecting productivity dashboard API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        db: Option<String>,
    },
    /// Print the OpenAPI document.
    Openapi,
    /// Write the header row to the configured spreadsheet.
    InitSheet,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_filter, config.log_format);

    let result = match cli.command {
        Command::Serve { port, db } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(db) = db {
                config.db_path = db;
            }
            serve(config).await
        }
        Command::Openapi => trafo_serve::openapi::document()
            .map(|doc| println!("{doc}"))
            .map_err(|err| err.to_string()),
        Command::InitSheet => init_sheet(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn sheets_sink(config: &Config) -> Result<Option<Arc<dyn SheetSink>>, String> {
    let Some(sheets) = &config.sheets else {
        return Ok(None);
    };
    let target = SheetTarget::new(&sheets.spreadsheet_id, &sheets.sheet_name);
    let sink = GoogleSheetsSink::from_credentials_file(&sheets.credentials_path, target)
        .map_err(|err| err.to_string())?;
    Ok(Some(Arc::new(sink)))
}

async fn serve(config: Config) -> Result<(), String> {
    if let Some(parent) = Path::new(&config.db_path).parent() {
        std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    trafo_db::schema::open_and_migrate(&config.db_path).map_err(|err| err.to_string())?;

    let mut state = trafo_serve::AppState::new(config.db_path.clone());
    match sheets_sink(&config) {
        Ok(Some(sink)) => state = state.with_sheets(sink, config.mirror_capacity),
        Ok(None) => tracing::info!("GOOGLE_SPREADSHEET_ID not set, spreadsheet mirror disabled"),
        Err(err) => tracing::warn!(error = %err, "spreadsheet mirror disabled"),
    }

    let addr = SocketAddr::new(config.host, config.port);
    trafo_serve::serve(state, addr)
        .await
        .map_err(|err| err.to_string())
}

async fn init_sheet(config: &Config) -> Result<(), String> {
    config.require_sheets().map_err(|err| err.to_string())?;
    let Some(sink) = sheets_sink(config)? else {
        return Err("spreadsheet mirror not configured".to_string());
    };
    sink.write_headers().await.map_err(|err| err.to_string())?;
    tracing::info!("spreadsheet header row written");
    Ok(())
}
