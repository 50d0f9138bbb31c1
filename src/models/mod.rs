use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five core fields pulled from a listing page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    PropertyType,
    Bedrooms,
    Bathrooms,
    Amenities,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::PropertyType => "property_type",
            Field::Bedrooms => "bedrooms",
            Field::Bathrooms => "bathrooms",
            Field::Amenities => "amenities",
        };
        f.write_str(name)
    }
}

/// Everything the extractor pulls out of a single listing page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListingDetails {
    pub title: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    /// Every present amenity, in page order
    pub amenities: Vec<String>,
    /// Each amenity also lands in exactly one of the three category lists
    pub general_amenities: Vec<String>,
    pub family_amenities: Vec<String>,
    pub safety_features: Vec<String>,
}

impl ListingDetails {
    /// Core fields that came back empty
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push(Field::Title);
        }
        if self.property_type.is_none() {
            missing.push(Field::PropertyType);
        }
        if self.bedrooms.is_none() {
            missing.push(Field::Bedrooms);
        }
        if self.bathrooms.is_none() {
            missing.push(Field::Bathrooms);
        }
        if self.amenities.is_empty() {
            missing.push(Field::Amenities);
        }
        missing
    }
}

/// Scrape result for one input URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub source_url: String,
    #[serde(flatten)]
    pub details: ListingDetails,
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListingRecord {
    pub fn scraped(url: &str, details: ListingDetails) -> Self {
        Self {
            source_url: url.to_string(),
            details,
            scraped_at: Some(Utc::now()),
            error: None,
        }
    }

    /// Empty record standing in for a URL that could not be scraped
    pub fn failed(url: &str, error: impl fmt::Display) -> Self {
        Self {
            source_url: url.to_string(),
            details: ListingDetails::default(),
            scraped_at: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_record_has_empty_details() {
        let record = ListingRecord::failed("https://example.com/rooms/1", "HTTP 404");

        assert!(record.is_failed());
        assert_eq!(record.details, ListingDetails::default());
        assert!(record.scraped_at.is_none());
        assert_eq!(record.error.as_deref(), Some("HTTP 404"));
    }

    #[test]
    fn missing_fields_lists_every_empty_core_field() {
        let details = ListingDetails {
            title: Some("Cosy flat".to_string()),
            bathrooms: Some(1.0),
            ..Default::default()
        };

        assert_eq!(
            details.missing_fields(),
            vec![Field::PropertyType, Field::Bedrooms, Field::Amenities]
        );
    }

    #[test]
    fn json_flattens_details_and_omits_absent_error() {
        let record = ListingRecord::scraped(
            "https://example.com/rooms/1",
            ListingDetails {
                title: Some("Loft".to_string()),
                ..Default::default()
            },
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["title"], "Loft");
        assert_eq!(value["source_url"], "https://example.com/rooms/1");
        assert!(value.get("error").is_none());
        assert!(value["amenities"].as_array().unwrap().is_empty());
    }
}
