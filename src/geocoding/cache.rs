use std::{
    collections::BTreeMap,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use geo::Point;

use crate::utils::write_atomically;

use super::{AddressGeocoder, Geocoded};

/// Remembers successful lookups on disk so re-runs skip the provider (and
/// its delay) for addresses that already resolved. Absences are not kept.
pub struct GeocodeCache<G> {
    inner: G,
    path: PathBuf,
    known: BTreeMap<String, Point>,
    dirty: bool,
}

impl<G: AddressGeocoder> GeocodeCache<G> {
    pub fn open(inner: G, path: &Path) -> Result<Self> {
        let known = if path.exists() {
            serde_json::from_str(&read_to_string(path)?)
                .with_context(|| format!("Unreadable geocode cache {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            inner,
            path: path.to_path_buf(),
            known,
            dirty: false,
        })
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let mut contents = serde_json::to_string_pretty(&self.known)?;
        contents.push('\n');
        write_atomically(&self.path, |w| Ok(w.write_all(contents.as_bytes())?))?;
        self.dirty = false;

        Ok(())
    }
}

impl<G: AddressGeocoder> AddressGeocoder for GeocodeCache<G> {
    fn geocode(&mut self, address: &str) -> Geocoded {
        if let Some(x) = self.known.get(address) {
            log::debug!("cached: {address}");
            return Geocoded::Found(*x);
        }

        let result = self.inner.geocode(address);
        if let Geocoded::Found(x) = &result {
            self.known.insert(address.to_string(), *x);
            self.dirty = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::{
        config::GeocoderConfig,
        geocoding::{tests::Scripted, Nominatim},
        model::point,
    };

    #[test]
    fn hits_skip_the_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut scripted = Scripted::new(&[Some((1.0, 2.0)), None]);
        let mut cache = GeocodeCache::open(&mut scripted, &path).unwrap();

        assert_eq!(cache.geocode("A").point(), Some(point(1.0, 2.0)));
        assert_eq!(cache.geocode("A").point(), Some(point(1.0, 2.0)));
        assert_eq!(cache.geocode("B").point(), None);
        assert_eq!(cache.len(), 1);
        cache.save().unwrap();
        drop(cache);

        assert_eq!(scripted.calls, vec!["A", "B"]);

        let mut reopened = GeocodeCache::open(Scripted::default(), &path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.geocode("A").point(), Some(point(1.0, 2.0)));
        assert!(reopened.inner.calls.is_empty());
    }

    #[test]
    fn nothing_new_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = GeocodeCache::open(Scripted::new(&[None]), &path).unwrap();
        cache.geocode("A");
        cache.save().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{").unwrap();

        assert!(GeocodeCache::open(Scripted::default(), &path).is_err());
    }

    #[test]
    fn hits_skip_the_delay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut warm = GeocodeCache::open(Scripted::new(&[Some((10.0, 20.0))]), &path).unwrap();
        warm.geocode("Hotel A, City A, Germany");
        warm.save().unwrap();

        let slow = Nominatim::new(&GeocoderConfig {
            user_agent: "hotel-gpx-tests".to_string(),
            delay: Duration::from_secs(5),
            endpoint: "http://127.0.0.1:9".to_string(),
        });
        let mut cache = GeocodeCache::open(slow, &path).unwrap();

        let start = Instant::now();
        let result = cache.geocode("Hotel A, City A, Germany");

        assert_eq!(result.point(), Some(point(10.0, 20.0)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
