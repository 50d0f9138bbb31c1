use crate::models::ListingRecord;
use std::io::{self, Write};

const NOT_FOUND: &str = "Not found";
const LABEL_WIDTH: usize = 25;

/// Human-readable property summaries, one block per record
pub fn write_text_report<W: Write>(out: &mut W, records: &[ListingRecord]) -> io::Result<()> {
    for record in records {
        if let Some(error) = &record.error {
            writeln!(out, "SCRAPE FAILED FOR {}", record.source_url)?;
            writeln!(out, "  {error}")?;
            writeln!(out)?;
            continue;
        }
        write_summary(out, record)?;
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, record: &ListingRecord) -> io::Result<()> {
    let details = &record.details;
    let name = details.title.as_deref().unwrap_or(&record.source_url);

    let header = format!("PROPERTY SUMMARY FOR \"{name}\"");
    writeln!(out, "{}", "* ".repeat(header.chars().count() / 2 + 1))?;
    writeln!(out)?;
    writeln!(out, "{header}")?;
    writeln!(out, "{}", record.source_url)?;
    writeln!(out)?;

    let bedrooms = details.bedrooms.map(|n| n.to_string());
    let bathrooms = details.bathrooms.map(|n| n.to_string());
    row(out, "Property Type:", details.property_type.as_deref())?;
    row(out, "Number of Bedrooms:", bedrooms.as_deref())?;
    row(out, "Number of Bathrooms:", bathrooms.as_deref())?;

    writeln!(out, "\nAMENITIES:")?;
    for amenity in &details.general_amenities {
        writeln!(out, " *  {amenity}")?;
    }

    bullet_list(out, "FAMILY AMENITIES:", &details.family_amenities)?;
    bullet_list(out, "SAFETY FEATURES:", &details.safety_features)?;
    writeln!(out)?;
    Ok(())
}

fn row<W: Write>(out: &mut W, label: &str, value: Option<&str>) -> io::Result<()> {
    writeln!(out, "{label:<LABEL_WIDTH$} {}", value.unwrap_or(NOT_FOUND))
}

fn bullet_list<W: Write>(out: &mut W, heading: &str, items: &[String]) -> io::Result<()> {
    writeln!(out, "\n{heading}")?;
    if items.is_empty() {
        writeln!(out, " *  n/a")?;
    }
    for item in items {
        writeln!(out, " *  {item}")?;
    }
    Ok(())
}

/// All records as a pretty-printed JSON array
pub fn write_json_report<W: Write>(out: &mut W, records: &[ListingRecord]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)?;
    writeln!(out)
}
