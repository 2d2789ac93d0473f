use anyhow::{Context, Result};

use crate::{
    config::{GeocoderArgs, HotelsCsv, Outputs, PdfInput},
    geocoding::{AddressGeocoder, GeocodeCache, Nominatim},
    gpx,
    resolve::{resolve, AddressTier, RunSummary},
    tables::{self, hotels, pdf::PdfTables, TableExtractor},
    utils::{print_line, progress_bar},
};

pub fn extract(pdf: &PdfInput, csv: &HotelsCsv) -> Result<()> {
    let tables = PdfTables.extract(&pdf.pdf_file)?;
    let rows = tables::write_csv(&tables, &csv.csv_file)
        .with_context(|| format!("Failed to write {}", csv.csv_file.display()))?;

    println!(
        "Successfully converted '{}' to '{}' ({} tables, {rows} rows).",
        pdf.pdf_file.display(),
        csv.csv_file.display(),
        tables.len()
    );

    Ok(())
}

pub fn geocode(csv: &HotelsCsv, outputs: &Outputs, geocoder: &GeocoderArgs) -> Result<()> {
    let config = geocoder.config()?;
    let mut nominatim = Nominatim::new(&config);

    match &geocoder.cache_file {
        Some(path) => {
            let mut cached = GeocodeCache::open(nominatim, path)?;
            log::info!("{} cached addresses in {}", cached.len(), path.display());
            enrich_cached(csv, outputs, &mut cached).map(|_| ())
        }
        None => enrich(csv, outputs, &mut nominatim).map(|_| ()),
    }
}

/// Saves whatever was looked up even when writing the outputs fails.
fn enrich_cached<G: AddressGeocoder>(
    csv: &HotelsCsv,
    outputs: &Outputs,
    cache: &mut GeocodeCache<G>,
) -> Result<RunSummary> {
    let result = enrich(csv, outputs, cache);
    let saved = cache.save();
    let summary = result?;
    saved?;
    Ok(summary)
}

/// Loads the hotels, geocodes all of them and only then writes both outputs.
fn enrich<G: AddressGeocoder>(
    csv: &HotelsCsv,
    outputs: &Outputs,
    geocoder: &mut G,
) -> Result<RunSummary> {
    let mut table = hotels::load(&csv.csv_file)?;
    println!("Hotels loaded from CSV: {}", table.hotels.len());
    for (i, hotel) in table.hotels.iter().enumerate() {
        println!(
            "{i:>4}  {}; {}; {}",
            hotel.business_name, hotel.street, hotel.city
        );
    }

    let pb = progress_bar(table.hotels.len() as u64);
    let summary = resolve(&mut table.hotels, geocoder, &pb, |x| print_line(&pb, &x));
    pb.finish_and_clear();

    report(&summary);

    hotels::save(&table, &outputs.csv_w_coor_file)
        .with_context(|| format!("Failed to write {}", outputs.csv_w_coor_file.display()))?;
    println!("Hotels not found:\n{}", summary.not_found);

    gpx::write(&table.hotels, &outputs.gpx_file)?;
    println!("GPX file '{}' created successfully.", outputs.gpx_file.display());

    Ok(summary)
}

fn report(summary: &RunSummary) {
    for tier in AddressTier::ALL {
        println!("Geocoded by {tier}: {}", summary.resolved(tier));
    }
    println!("Not geocoded: {}", summary.unresolved);
    println!(
        "Hotels with GPS coordinates: {} out of {}",
        summary.total_resolved(),
        summary.total()
    );
}

pub fn waypoints(outputs: &Outputs) -> Result<()> {
    let table = hotels::load(&outputs.csv_w_coor_file)?;
    gpx::write(&table.hotels, &outputs.gpx_file)?;
    println!("GPX file '{}' created successfully.", outputs.gpx_file.display());

    Ok(())
}

pub fn lookup(address: &str, geocoder: &GeocoderArgs) -> Result<()> {
    let config = geocoder.config()?;
    let mut nominatim = Nominatim::new(&config);

    println!("Attempting to geocode address: '{address}'");
    match nominatim.geocode(address).point() {
        Some(x) => println!("Successfully found coordinates: ({}, {})", x.y(), x.x()),
        None => println!("Failed to find coordinates for '{address}'."),
    }

    Ok(())
}

pub fn run(
    pdf: &PdfInput,
    csv: &HotelsCsv,
    outputs: &Outputs,
    geocoder: &GeocoderArgs,
) -> Result<()> {
    // fail on bad settings before touching any file
    geocoder.config()?;

    extract(pdf, csv)?;
    geocode(csv, outputs, geocoder)
}
