use std::{io::Write, path::Path};

use anyhow::Result;
use itertools::Itertools;
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::{model::HotelRecord, utils::write_atomically};

pub const SYMBOL: &str = "friends-home";

const CREATOR: &str = concat!("hotel-gpx ", env!("CARGO_PKG_VERSION"));

/// Comma separated summary of the optional fields. The labels are German
/// because GPS devices show them verbatim.
pub fn description(hotel: &HotelRecord) -> String {
    [
        ("Straße", Some(hotel.street.as_str())),
        ("Telefon", hotel.phone.as_deref()),
        ("Website", hotel.website.as_deref()),
        ("Entfernung", hotel.distance.as_deref()),
        ("Hm", hotel.elevation.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value
            .filter(|x| !x.is_empty())
            .map(|x| format!("{label}: {x}"))
    })
    .join(", ")
}

/// Serializes one waypoint per geocoded hotel and returns how many were
/// written. Hotels without coordinates are skipped.
pub fn to_writer<W: Write>(hotels: &[HotelRecord], out: W) -> Result<usize> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("gpx").with_attributes([
        ("xmlns", "http://www.topografix.com/GPX/1/1"),
        ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        (
            "xsi:schemaLocation",
            "http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd",
        ),
        ("version", "1.1"),
        ("creator", CREATOR),
    ])))?;

    let mut count = 0;
    for hotel in hotels {
        let Some(point) = hotel.coordinates else {
            log::warn!(
                "Skipping hotel {} due to missing coordinates.",
                hotel.business_name
            );
            continue;
        };

        let lat = point.y().to_string();
        let lon = point.x().to_string();
        writer.write_event(Event::Start(
            BytesStart::new("wpt").with_attributes([("lat", lat.as_str()), ("lon", lon.as_str())]),
        ))?;
        for (tag, text) in [
            ("name", hotel.business_name.clone()),
            ("desc", description(hotel)),
            ("sym", SYMBOL.to_string()),
        ] {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        writer.write_event(Event::End(BytesEnd::new("wpt")))?;
        count += 1;
    }

    writer.write_event(Event::End(BytesEnd::new("gpx")))?;
    writer.get_mut().write_all(b"\n")?;

    Ok(count)
}

pub fn write(hotels: &[HotelRecord], path: &Path) -> Result<usize> {
    let mut count = 0;
    write_atomically(path, |w| {
        count = to_writer(hotels, w)?;
        Ok(())
    })?;
    log::info!("Wrote {count} waypoints to {}", path.display());

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::point;

    fn hotel(name: &str, coordinates: Option<(f64, f64)>) -> HotelRecord {
        let mut hotel = HotelRecord::new(name, "Hauptstraße 1", "München");
        hotel.coordinates = coordinates.map(|(lat, lon)| point(lat, lon));
        hotel
    }

    fn render(hotels: &[HotelRecord]) -> (usize, String) {
        let mut out = Vec::new();
        let count = to_writer(hotels, &mut out).unwrap();
        (count, String::from_utf8(out).unwrap())
    }

    #[test]
    fn description_skips_missing_fields() {
        let mut hotel = hotel("Hotel A", None);
        assert_eq!(description(&hotel), "Straße: Hauptstraße 1");

        hotel.phone = Some("089 123".to_string());
        hotel.distance = Some("12 km".to_string());
        hotel.elevation = Some("".to_string());
        assert_eq!(
            description(&hotel),
            "Straße: Hauptstraße 1, Telefon: 089 123, Entfernung: 12 km"
        );

        hotel.street.clear();
        hotel.website = Some("https://example.com".to_string());
        assert_eq!(
            description(&hotel),
            "Telefon: 089 123, Website: https://example.com, Entfernung: 12 km"
        );
    }

    #[test]
    fn one_waypoint_per_geocoded_hotel() {
        let hotels = [
            hotel("Hotel A", Some((48.1, 11.5))),
            hotel("Hotel B", None),
            hotel("Hotel C", Some((47.5, 10.25))),
        ];

        let (count, xml) = render(&hotels);

        assert_eq!(count, 2);
        assert_eq!(xml.matches("<wpt ").count(), 2);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<wpt lat="48.1" lon="11.5">"#));
        assert!(xml.contains(r#"<wpt lat="47.5" lon="10.25">"#));
        assert!(xml.contains("<name>Hotel A</name>"));
        assert!(!xml.contains("Hotel B"));
        assert!(xml.contains("<desc>Straße: Hauptstraße 1</desc>"));
        assert_eq!(xml.matches("<sym>friends-home</sym>").count(), 2);
        assert!(xml.trim_end().ends_with("</gpx>"));
    }

    #[test]
    fn text_is_escaped() {
        let (_, xml) = render(&[hotel("Bed & Breakfast <Alpen>", Some((1.0, 2.0)))]);
        assert!(xml.contains("<name>Bed &amp; Breakfast &lt;Alpen&gt;</name>"));
    }

    #[test]
    fn nothing_geocoded() {
        let (count, xml) = render(&[hotel("Hotel B", None)]);
        assert_eq!(count, 0);
        assert!(!xml.contains("<wpt"));
        assert!(xml.contains("<gpx "));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotels.gpx");

        let count = write(&[hotel("Hotel A", Some((48.1, 11.5)))], &path).unwrap();

        assert_eq!(count, 1);
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("<name>Hotel A</name>"));
    }
}
