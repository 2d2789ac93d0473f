use std::{thread::sleep, time::Duration};

use geo::Point;
use serde::Deserialize;
use ureq::{Agent, AgentBuilder};

use crate::{config::GeocoderConfig, model};

use super::{AddressGeocoder, GeocodeError, Geocoded};

/// Free-form search against a Nominatim instance.
///
/// Every lookup waits for the configured delay first, as required by the
/// public instance's usage policy.
pub struct Nominatim {
    agent: Agent,
    endpoint: String,
    delay: Duration,
}

impl Nominatim {
    pub fn new(config: &GeocoderConfig) -> Self {
        let agent = AgentBuilder::new()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(30))
            .build();

        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            delay: config.delay,
        }
    }

    fn search(&self, address: &str) -> Result<Option<Point>, GeocodeError> {
        let places: Vec<Place> = self
            .agent
            .get(&format!("{}/search", self.endpoint))
            .query("q", address)
            .query("format", "json")
            .query("limit", "1")
            .call()
            .map_err(Box::new)?
            .into_json()?;

        first_point(places)
    }
}

impl AddressGeocoder for Nominatim {
    fn geocode(&mut self, address: &str) -> Geocoded {
        sleep(self.delay);
        let result = self.search(address);
        if let Err(e) = &result {
            log::warn!("Error geocoding {address}: {e}");
        }
        result.into()
    }
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

fn first_point(places: Vec<Place>) -> Result<Option<Point>, GeocodeError> {
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let lat: f64 = place
        .lat
        .parse()
        .map_err(|_| GeocodeError::Coordinate(place.lat.clone()))?;
    let lon: f64 = place
        .lon
        .parse()
        .map_err(|_| GeocodeError::Coordinate(place.lon.clone()))?;
    if let Some(x) = &place.display_name {
        log::debug!("matched {x}");
    }

    Ok(Some(model::point(lat, lon)))
}
