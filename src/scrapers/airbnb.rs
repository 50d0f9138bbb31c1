use crate::models::ListingDetails;
use crate::scrapers::counts::{parse_bathrooms, parse_bedrooms};
use crate::scrapers::error::ScrapeError;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static BOOTSTRAP_SCRIPT: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"script[type="application/json"][data-hypernova-key="p3indexbundlejs"]"#)
});
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-section-id="TITLE_DEFAULT"] h1"#));
static OVERVIEW: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-section-id="OVERVIEW_DEFAULT"]"#));
static AMENITIES: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-section-id="AMENITIES_DEFAULT"]"#));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li"));

/// Parse raw page HTML into a tree. Malformed markup is recovered the way a
/// browser would; only non-text input is rejected.
pub fn parse_document(html: &str) -> Result<Html, ScrapeError> {
    if html.contains('\0') {
        return Err(ScrapeError::Parse(
            "body contains NUL bytes, not an HTML document".to_string(),
        ));
    }

    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        debug!(recoveries = document.errors.len(), "Recovered from malformed markup");
    }
    Ok(document)
}

/// Fetched HTML to listing details in one step
pub fn extract_listing(html: &str) -> Result<ListingDetails, ScrapeError> {
    let document = parse_document(html)?;
    Ok(extract(&document))
}

/// Pull the listing fields out of a parsed page.
///
/// The bootstrap JSON embedded by server rendering is read first; each field
/// it leaves empty is then looked up by its own selector rule on the rendered
/// markup. A field no rule can find stays at its default.
pub fn extract(document: &Html) -> ListingDetails {
    let mut details = ListingDetails::default();

    if let Some(listing) = bootstrap_listing(document) {
        apply_bootstrap(&mut details, listing);
    }

    let overview = document.select(&OVERVIEW).next();

    if details.title.is_none() {
        details.title = title_rule(document);
    }
    if details.property_type.is_none() {
        details.property_type = overview.and_then(property_type_rule);
    }
    if details.bedrooms.is_none() {
        details.bedrooms = overview.and_then(bedrooms_rule);
    }
    if details.bathrooms.is_none() {
        details.bathrooms = overview.and_then(bathrooms_rule);
    }
    if details.amenities.is_empty() {
        details.amenities = amenities_rule(document);
        details.general_amenities = details.amenities.clone();
    }

    for field in details.missing_fields() {
        debug!(field = %field, "Field not found on page");
    }

    details
}

// Bootstrap JSON

#[derive(Debug, Deserialize)]
struct HypernovaPayload {
    #[serde(rename = "bootstrapData")]
    bootstrap_data: BootstrapData,
}

#[derive(Debug, Deserialize)]
struct BootstrapData {
    listing: BootstrapListing,
}

#[derive(Debug, Deserialize)]
struct BootstrapListing {
    name: Option<String>,
    #[serde(default)]
    space_interface: Vec<SpaceDetail>,
    #[serde(default)]
    listing_amenities: Vec<ListingAmenity>,
}

/// One "The space" row, e.g. `{"label": "Bedrooms:", "value": "2"}`
#[derive(Debug, Deserialize)]
struct SpaceDetail {
    label: Option<String>,
    #[serde(default)]
    value: Value,
}

impl SpaceDetail {
    fn value_text(&self) -> Option<String> {
        match &self.value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListingAmenity {
    name: String,
    #[serde(default)]
    is_present: bool,
    category: Option<String>,
    #[serde(default)]
    is_safety_feature: bool,
}

fn bootstrap_listing(document: &Html) -> Option<BootstrapListing> {
    let Some(script) = document.select(&BOOTSTRAP_SCRIPT).next() else {
        debug!("No bootstrap data on page");
        return None;
    };

    // The payload is usually wrapped in an HTML comment
    let raw: String = script.text().collect();
    let raw = raw.trim();
    let raw = raw.strip_prefix("<!--").unwrap_or(raw);
    let raw = raw.strip_suffix("-->").unwrap_or(raw);

    match serde_json::from_str::<HypernovaPayload>(raw.trim()) {
        Ok(payload) => Some(payload.bootstrap_data.listing),
        Err(e) => {
            warn!(error = %e, "Bootstrap data did not deserialize, using page markup");
            None
        }
    }
}

fn apply_bootstrap(details: &mut ListingDetails, listing: BootstrapListing) {
    details.title = listing
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    for detail in &listing.space_interface {
        let Some(value) = detail.value_text() else {
            continue;
        };
        match detail.label.as_deref() {
            Some("Property type:") => details.property_type = Some(value),
            Some("Bedrooms:") => details.bedrooms = parse_bedrooms(&value),
            Some("Bathrooms:") => details.bathrooms = parse_bathrooms(&value),
            _ => {}
        }
    }

    for amenity in listing.listing_amenities.into_iter().filter(|a| a.is_present) {
        let group = match amenity.category.as_deref() {
            Some("family") => &mut details.family_amenities,
            Some("general") if amenity.is_safety_feature => &mut details.safety_features,
            _ => &mut details.general_amenities,
        };
        group.push(amenity.name.clone());
        details.amenities.push(amenity.name);
    }
}

// Page markup rules

/// Text content with runs of whitespace collapsed
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn title_rule(document: &Html) -> Option<String> {
    document.select(&TITLE).next().map(element_text).and_then(non_empty)
}

/// "Entire rental unit hosted by Anna" -> "Entire rental unit"
fn property_type_rule(overview: ElementRef) -> Option<String> {
    let heading = element_text(overview.select(&HEADING).next()?);
    let kind = match heading.find("hosted by") {
        Some(idx) => &heading[..idx],
        None => heading.as_str(),
    };
    non_empty(kind.trim().to_string())
}

fn overview_item(overview: ElementRef, keywords: &[&str]) -> Option<String> {
    overview.select(&ITEM).map(element_text).find(|text| {
        let lower = text.to_lowercase();
        keywords.iter().any(|keyword| lower.contains(keyword))
    })
}

fn bedrooms_rule(overview: ElementRef) -> Option<u32> {
    parse_bedrooms(&overview_item(overview, &["bedroom", "studio"])?)
}

fn bathrooms_rule(overview: ElementRef) -> Option<f32> {
    parse_bathrooms(&overview_item(overview, &["bath"])?)
}

fn amenities_rule(document: &Html) -> Vec<String> {
    let Some(container) = document.select(&AMENITIES).next() else {
        return Vec::new();
    };
    container
        .select(&ITEM)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}
