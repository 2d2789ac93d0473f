use std::{path::PathBuf, time::Duration};

use clap::Args;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("NOMINATIM_USER_AGENT must not be empty")]
    EmptyUserAgent,
    #[error("NOMINATIM_DELAY_SECONDS must be a non-negative number of seconds, got {0}")]
    InvalidDelay(f64),
}

#[derive(Clone, Debug, Args)]
pub struct PdfInput {
    /// PDF containing the hotel table
    #[arg(long, env = "PDF_FILE")]
    pub pdf_file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct HotelsCsv {
    /// Hotel table as extracted from the PDF
    #[arg(long, env = "CSV_FILE")]
    pub csv_file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct Outputs {
    /// Hotel table with coordinates
    #[arg(long, env = "CSV_W_COOR_FILE")]
    pub csv_w_coor_file: PathBuf,
    /// Waypoint file
    #[arg(long, env = "GPX_FILE")]
    pub gpx_file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct GeocoderArgs {
    /// Identifies this application to the geocoding service
    #[arg(long, env = "NOMINATIM_USER_AGENT")]
    pub user_agent: String,
    /// Pause before every geocoding request
    #[arg(long, env = "NOMINATIM_DELAY_SECONDS")]
    pub delay_seconds: f64,
    #[arg(long, env = "NOMINATIM_URL", default_value = DEFAULT_ENDPOINT)]
    pub nominatim_url: String,
    /// Keeps successful lookups between runs
    #[arg(long, env = "GEOCODE_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeocoderConfig {
    pub user_agent: String,
    pub delay: Duration,
    pub endpoint: String,
}

impl GeocoderArgs {
    pub fn config(&self) -> Result<GeocoderConfig, ConfigError> {
        let user_agent = self.user_agent.trim();
        if user_agent.is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }

        let delay = Duration::try_from_secs_f64(self.delay_seconds)
            .map_err(|_| ConfigError::InvalidDelay(self.delay_seconds))?;

        Ok(GeocoderConfig {
            user_agent: user_agent.to_string(),
            delay,
            endpoint: self.nominatim_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(user_agent: &str, delay_seconds: f64) -> GeocoderArgs {
        GeocoderArgs {
            user_agent: user_agent.to_string(),
            delay_seconds,
            nominatim_url: DEFAULT_ENDPOINT.to_string(),
            cache_file: None,
        }
    }

    #[test]
    fn valid() {
        assert_eq!(
            args(" hotel-gpx ", 1.5).config(),
            Ok(GeocoderConfig {
                user_agent: "hotel-gpx".to_string(),
                delay: Duration::from_millis(1500),
                endpoint: DEFAULT_ENDPOINT.to_string(),
            })
        );
        assert_eq!(args("hotel-gpx", 0.0).config().unwrap().delay, Duration::ZERO);
    }

    #[test]
    fn invalid() {
        assert_eq!(args("  ", 3.0).config(), Err(ConfigError::EmptyUserAgent));
        assert_eq!(
            args("hotel-gpx", -1.0).config(),
            Err(ConfigError::InvalidDelay(-1.0))
        );
        assert!(matches!(
            args("hotel-gpx", f64::NAN).config(),
            Err(ConfigError::InvalidDelay(_))
        ));
    }
}
