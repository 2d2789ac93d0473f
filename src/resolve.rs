use std::fmt;

use geo::Point;
use indicatif::ProgressBar;

use crate::{
    geocoding::{AddressGeocoder, Geocoded},
    model::HotelRecord,
};

pub const COUNTRY: &str = "Germany";

/// The address variants tried for a hotel, most specific first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressTier {
    BusinessStreetCity,
    StreetCity,
    BusinessCity,
}

impl AddressTier {
    /// Order in which the tiers are tried.
    pub const ALL: [Self; 3] = [Self::BusinessStreetCity, Self::StreetCity, Self::BusinessCity];

    pub fn address(&self, hotel: &HotelRecord) -> String {
        let HotelRecord {
            business_name,
            street,
            city,
            ..
        } = hotel;

        match self {
            Self::BusinessStreetCity => format!("{business_name}, {street}, {city}, {COUNTRY}"),
            Self::StreetCity => format!("{street}, {city}, {COUNTRY}"),
            Self::BusinessCity => format!("{business_name}, {city}, {COUNTRY}"),
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::BusinessStreetCity => 0,
            Self::StreetCity => 1,
            Self::BusinessCity => 2,
        }
    }
}

impl fmt::Display for AddressTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusinessStreetCity => write!(f, "Betrieb, Straße, Stadt"),
            Self::StreetCity => write!(f, "Straße, Stadt"),
            Self::BusinessCity => write!(f, "Betrieb, Stadt"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Resolved { tier: AddressTier, point: Point },
    /// Carries the address of the last tier tried.
    Unresolved { address: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    resolved: [usize; AddressTier::ALL.len()],
    pub unresolved: usize,
    /// Last-tier address of every unresolved hotel, one per line.
    pub not_found: String,
}

impl RunSummary {
    pub fn resolved(&self, tier: AddressTier) -> usize {
        self.resolved[tier.index()]
    }

    pub fn total_resolved(&self) -> usize {
        self.resolved.iter().sum()
    }

    pub fn total(&self) -> usize {
        self.total_resolved() + self.unresolved
    }

    fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Resolved { tier, .. } => self.resolved[tier.index()] += 1,
            Resolution::Unresolved { address } => {
                self.unresolved += 1;
                self.not_found.push_str(address);
                self.not_found.push('\n');
            }
        }
    }
}

/// Tries each tier in order until one resolves. Every failed attempt is
/// reported through `say`.
pub fn resolve_one<G, F>(hotel: &HotelRecord, geocoder: &mut G, say: &mut F) -> Resolution
where
    G: AddressGeocoder + ?Sized,
    F: FnMut(String),
{
    let mut address = String::new();
    for tier in AddressTier::ALL {
        address = tier.address(hotel);
        match geocoder.geocode(&address) {
            Geocoded::Found(point) => return Resolution::Resolved { tier, point },
            Geocoded::Absent(reason) => {
                if let Some(e) = reason {
                    log::debug!("{tier} lookup failed: {e}");
                }
                say(format!("Could not geocode: {address}"));
            }
        }
    }

    Resolution::Unresolved { address }
}

/// Geocodes every hotel in place and returns what happened.
///
/// Hotels are processed one at a time; the geocoder is never called
/// concurrently. Progress lines go to `say`, `pb` only counts hotels.
pub fn resolve<G, F>(
    hotels: &mut [HotelRecord],
    geocoder: &mut G,
    pb: &ProgressBar,
    mut say: F,
) -> RunSummary
where
    G: AddressGeocoder + ?Sized,
    F: FnMut(String),
{
    let mut summary = RunSummary::default();

    for hotel in hotels.iter_mut() {
        let resolution = resolve_one(hotel, geocoder, &mut say);
        summary.record(&resolution);

        match &resolution {
            Resolution::Resolved { tier, point } => {
                hotel.coordinates = Some(*point);
                say(format!(
                    "{}) Geocoded: {} ({}, {})",
                    summary.total_resolved(),
                    tier.address(hotel),
                    point.y(),
                    point.x()
                ));
            }
            Resolution::Unresolved { .. } => {
                say(format!(
                    "{}) Could absolutely not geocode: {}",
                    summary.unresolved,
                    AddressTier::BusinessStreetCity.address(hotel)
                ));
            }
        }
        pb.inc(1);
    }

    summary
}
