use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::domain::{Availability, CandidateRecord, GeoPoint, ScoreBreakdown};

/// Grade assumed for listings that carry none
const DEFAULT_LISTING_GRADE: f64 = 5.0;

/// Listing row as stored by the marketplace, with its vendor joined in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub vendor_id: Option<String>,
    #[serde(default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub quality_grade: Option<f64>,
    #[serde(default)]
    pub price_per_kg: Option<f64>,
    #[serde(default)]
    pub quantity_kg: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendors: Option<VendorSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Vendor columns joined onto a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorSummary {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub location_lat: Option<f64>,
    #[serde(default)]
    pub location_lng: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Listing with the ranking results attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub vendor_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub distance_km: Option<f64>,
}

impl CandidateRecord {
    /// Build the ranking view of a listing.
    ///
    /// Zero or missing grades fall back to 5, a missing vendor rating counts
    /// as 0, and only listings in `available` status count as available.
    pub fn from_listing(listing: &Listing) -> Self {
        let vendor = listing.vendors.as_ref();

        let grading = listing
            .quality_grade
            .filter(|g| *g != 0.0 && !g.is_nan())
            .unwrap_or(DEFAULT_LISTING_GRADE);

        let review_rating = vendor
            .and_then(|v| v.rating)
            .filter(|r| !r.is_nan())
            .unwrap_or(0.0);

        let location = vendor.and_then(|v| match (v.location_lat, v.location_lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        });

        Self {
            id: listing.vendor_id.clone(),
            grading: Some(grading),
            pricing: listing.price_per_kg,
            availability: Some(Availability::Flag(
                listing.status.as_deref() == Some("available"),
            )),
            review_rating: Some(review_rating),
            location,
            material_type: listing.material_type.clone(),
            ..Default::default()
        }
    }
}
