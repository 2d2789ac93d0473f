use geo::Point;

pub const BUSINESS: &str = "Betrieb";
pub const STREET: &str = "Straße";
pub const CITY: &str = "Stadt";
pub const PHONE: &str = "Telefon";
pub const WEBSITE: &str = "Website";
pub const DISTANCE: &str = "Entfernung";
pub const ELEVATION: &str = "Hm";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";

/// Builds a point from a latitude/longitude pair. Points use x for longitude
/// and y for latitude.
pub fn point(latitude: f64, longitude: f64) -> Point {
    Point::new(longitude, latitude)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HotelRecord {
    pub business_name: String,
    pub street: String,
    pub city: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub distance: Option<String>,
    pub elevation: Option<String>,
    /// `None` until geocoded.
    pub coordinates: Option<Point>,
    /// Input columns outside the model, kept so they can be written back.
    pub extra: Vec<(String, String)>,
}

impl HotelRecord {
    #[cfg(test)]
    pub fn new(business_name: &str, street: &str, city: &str) -> Self {
        Self {
            business_name: business_name.to_string(),
            street: street.to_string(),
            city: city.to_string(),
            ..Default::default()
        }
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|x| x.y())
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|x| x.x())
    }

    /// Value of a column by its header name.
    pub fn column(&self, name: &str) -> Option<&str> {
        let value = match name {
            BUSINESS => Some(self.business_name.as_str()),
            STREET => Some(self.street.as_str()),
            CITY => Some(self.city.as_str()),
            PHONE => self.phone.as_deref(),
            WEBSITE => self.website.as_deref(),
            DISTANCE => self.distance.as_deref(),
            ELEVATION => self.elevation.as_deref(),
            _ => self
                .extra
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
        };
        value.filter(|x| !x.is_empty())
    }
}

/// Hotels loaded from a CSV, along with the header order they came with.
#[derive(Clone, Debug, PartialEq)]
pub struct HotelTable {
    pub headers: Vec<String>,
    pub hotels: Vec<HotelRecord>,
}
