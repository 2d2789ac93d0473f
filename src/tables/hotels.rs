use std::path::Path;

use anyhow::Result;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::{
    model::{self, HotelRecord, HotelTable, LATITUDE, LONGITUDE},
    utils::write_atomically,
};

use super::{TableError, DELIMITER};

pub fn load(path: &Path) -> Result<HotelTable, TableError> {
    if !path.exists() {
        return Err(TableError::NotFound(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_path(path)?;
    let header = reader.headers()?.clone();

    let required = |column: &'static str| {
        header
            .iter()
            .position(|x| x == column)
            .ok_or_else(|| TableError::MissingColumn {
                path: path.to_path_buf(),
                column,
            })
    };
    let business = required(model::BUSINESS)?;
    let street = required(model::STREET)?;
    let city = required(model::CITY)?;

    let optional = |column: &str| header.iter().position(|x| x == column);
    let phone = optional(model::PHONE);
    let website = optional(model::WEBSITE);
    let distance = optional(model::DISTANCE);
    let elevation = optional(model::ELEVATION);
    let latitude = optional(LATITUDE);
    let longitude = optional(LONGITUDE);

    let known = [
        Some(business),
        Some(street),
        Some(city),
        phone,
        website,
        distance,
        elevation,
        latitude,
        longitude,
    ];

    let mut hotels = Vec::new();
    for row in reader.records() {
        let row = row?;
        let text = |i: usize| row.get(i).unwrap_or_default().trim().to_string();
        let maybe = |i: Option<usize>| i.map(text).filter(|x| !x.is_empty());

        let coordinates = match (
            maybe(latitude).and_then(|x| x.parse::<f64>().ok()),
            maybe(longitude).and_then(|x| x.parse::<f64>().ok()),
        ) {
            (Some(lat), Some(lon)) => Some(model::point(lat, lon)),
            _ => None,
        };

        let extra = header
            .iter()
            .enumerate()
            .filter(|(i, _)| !known.contains(&Some(*i)))
            .map(|(i, name)| (name.to_string(), text(i)))
            .collect();

        hotels.push(HotelRecord {
            business_name: text(business),
            street: text(street),
            city: text(city),
            phone: maybe(phone),
            website: maybe(website),
            distance: maybe(distance),
            elevation: maybe(elevation),
            coordinates,
            extra,
        });
    }

    let headers = header
        .iter()
        .filter(|x| *x != LATITUDE && *x != LONGITUDE)
        .map(|x| x.to_string())
        .collect();

    Ok(HotelTable { headers, hotels })
}

/// Writes the table with its original columns followed by the coordinates.
pub fn save(table: &HotelTable, path: &Path) -> Result<()> {
    write_atomically(path, |w| {
        let mut out = WriterBuilder::new().delimiter(DELIMITER).from_writer(w);

        let mut header = StringRecord::from(table.headers.clone());
        header.push_field(LATITUDE);
        header.push_field(LONGITUDE);
        out.write_record(&header)?;

        for hotel in &table.hotels {
            let mut row: StringRecord = table
                .headers
                .iter()
                .map(|x| hotel.column(x).unwrap_or_default())
                .collect();
            row.push_field(&hotel.latitude().map(|x| x.to_string()).unwrap_or_default());
            row.push_field(&hotel.longitude().map(|x| x.to_string()).unwrap_or_default());
            out.write_record(&row)?;
        }

        out.flush()?;
        Ok(())
    })
}
