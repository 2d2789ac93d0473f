use std::io;

use geo::Point;
use thiserror::Error;

mod cache;
mod nominatim;

pub use cache::GeocodeCache;
pub use nominatim::Nominatim;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Request(#[from] Box<ureq::Error>),
    #[error("unreadable response: {0}")]
    Response(#[from] io::Error),
    #[error("invalid coordinate {0:?}")]
    Coordinate(String),
}

/// Outcome of a single lookup. A failed lookup carries its cause so it can
/// be logged, but callers treat every `Absent` the same way.
#[derive(Debug)]
pub enum Geocoded {
    Found(Point),
    Absent(Option<GeocodeError>),
}

impl Geocoded {
    pub fn point(&self) -> Option<Point> {
        match self {
            Self::Found(x) => Some(*x),
            Self::Absent(_) => None,
        }
    }
}

impl From<Result<Option<Point>, GeocodeError>> for Geocoded {
    fn from(result: Result<Option<Point>, GeocodeError>) -> Self {
        match result {
            Ok(Some(x)) => Self::Found(x),
            Ok(None) => Self::Absent(None),
            Err(e) => Self::Absent(Some(e)),
        }
    }
}

pub trait AddressGeocoder {
    fn geocode(&mut self, address: &str) -> Geocoded;
}

impl<G: AddressGeocoder + ?Sized> AddressGeocoder for &mut G {
    fn geocode(&mut self, address: &str) -> Geocoded {
        (**self).geocode(address)
    }
}

#[cfg(test)]
pub mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::model::point;

    /// Answers lookups from a script, in order, and records every address.
    #[derive(Default)]
    pub struct Scripted {
        pub answers: VecDeque<Option<(f64, f64)>>,
        pub calls: Vec<String>,
    }

    impl Scripted {
        pub fn new(answers: &[Option<(f64, f64)>]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                calls: Vec::new(),
            }
        }
    }

    impl AddressGeocoder for Scripted {
        fn geocode(&mut self, address: &str) -> Geocoded {
            self.calls.push(address.to_string());
            match self.answers.pop_front().flatten() {
                Some((lat, lon)) => Geocoded::Found(point(lat, lon)),
                None => Geocoded::Absent(None),
            }
        }
    }

    #[test]
    fn from_result() {
        let found: Geocoded = Ok(Some(point(1.0, 2.0))).into();
        assert_eq!(found.point(), Some(point(1.0, 2.0)));

        let empty: Geocoded = Ok(None).into();
        assert!(matches!(empty, Geocoded::Absent(None)));

        let failed: Geocoded = Err(GeocodeError::Coordinate("x".to_string())).into();
        assert!(matches!(failed, Geocoded::Absent(Some(_))));
        assert_eq!(failed.point(), None);
    }
}
