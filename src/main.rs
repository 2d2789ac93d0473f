use std::process;

use clap::{Parser, Subcommand};

use crate::config::{GeocoderArgs, HotelsCsv, Outputs, PdfInput};

mod commands;
mod config;
mod geocoding;
mod gpx;
mod model;
mod resolve;
mod tables;
mod utils;

/// Turns a PDF hotel list into a GPX file of waypoints.
///
/// Every option can also be set through the environment or a `.env` file.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Extract the hotel table from the PDF into a CSV file
    Extract {
        #[command(flatten)]
        pdf: PdfInput,
        #[command(flatten)]
        csv: HotelsCsv,
    },
    /// Geocode the extracted hotels and write the enriched CSV and GPX files
    Geocode {
        #[command(flatten)]
        csv: HotelsCsv,
        #[command(flatten)]
        outputs: Outputs,
        #[command(flatten)]
        geocoder: GeocoderArgs,
    },
    /// Write the GPX file from an already enriched CSV file
    Gpx {
        #[command(flatten)]
        outputs: Outputs,
    },
    /// Geocode a single address
    Lookup {
        #[arg(default_value = "Eiffel Tower, Paris, France")]
        address: String,
        #[command(flatten)]
        geocoder: GeocoderArgs,
    },
    /// Extract, geocode and write everything
    Run {
        #[command(flatten)]
        pdf: PdfInput,
        #[command(flatten)]
        csv: HotelsCsv,
        #[command(flatten)]
        outputs: Outputs,
        #[command(flatten)]
        geocoder: GeocoderArgs,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Extract { pdf, csv } => commands::extract(pdf, csv),
        Command::Geocode {
            csv,
            outputs,
            geocoder,
        } => commands::geocode(csv, outputs, geocoder),
        Command::Gpx { outputs } => commands::waypoints(outputs),
        Command::Lookup { address, geocoder } => commands::lookup(address, geocoder),
        Command::Run {
            pdf,
            csv,
            outputs,
            geocoder,
        } => commands::run(pdf, csv, outputs, geocoder),
    };

    if let Err(e) = result {
        log::error!("{e:#}");
        process::exit(1);
    }
}
