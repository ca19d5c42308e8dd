//! Row types of the three persisted datasets

use crate::store::traits::CsvRecord;
use serde::Serialize;

/// Column of the page-URL progress file
pub const PAGE_URL_COLUMN: &str = "property_page_url";

/// Column of the harvest store naming the search page a row came from
pub const HARVESTED_PAGE_COLUMN: &str = "page_url";

/// Key column of both the harvest store and the listing dataset
pub const LISTING_URL_COLUMN: &str = "listing_url";

/// One generated search result page waiting to be harvested
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageUrlRecord {
    pub property_page_url: String,
}

impl CsvRecord for PageUrlRecord {
    const HEADERS: &'static [&'static str] = &[PAGE_URL_COLUMN];
}

/// A listing detail link found on a search result page
///
/// `listing_url` is empty for result slots that carried no detail link and
/// for the marker row of a page that had no result slots at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingUrlRecord {
    pub page_url: String,
    pub property_type: String,
    pub listing_url: Option<String>,
}

impl CsvRecord for ListingUrlRecord {
    const HEADERS: &'static [&'static str] =
        &[HARVESTED_PAGE_COLUMN, "property_type", LISTING_URL_COLUMN];
}

/// A fully scraped listing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingRecord {
    pub website_name: String,
    pub listing_title: Option<String>,
    pub listing_description: Option<String>,
    pub property_type: String,
    pub country_code: u16,
    pub location_description: Option<String>,
    pub location_long: Option<String>,
    pub location_city: Option<String>,
    pub location_region: Option<String>,
    pub location_street: Option<String>,
    pub area_unit: &'static str,
    pub total_area: Option<u32>,
    pub usable_area: Option<u32>,
    pub built_up_area: Option<u32>,
    pub amenities_list: Option<String>,
    pub energy_intensity: Option<String>,
    pub ownership: Option<String>,
    pub infrastructure: Option<String>,
    pub construction: Option<String>,
    pub construction_type: Option<String>,
    pub construction_status: Option<String>,
    pub floor_location: Option<String>,
    pub listing_date: Option<String>,
    pub listing_date_updated: Option<String>,
    pub currency_code: String,
    pub price: Option<String>,
    pub note_on_price: Option<String>,
    pub agent_name: Option<String>,
    pub agent_url: Option<String>,
    pub agent_website: Option<String>,
    pub agent_email: Option<String>,
    pub agent_phone1: Option<String>,
    pub agent_phone2: Option<String>,
    pub image_url: Option<String>,
    pub listing_url: String,
    pub scraped_at: String,
}

impl CsvRecord for ListingRecord {
    const HEADERS: &'static [&'static str] = &[
        "website_name",
        "listing_title",
        "listing_description",
        "property_type",
        "country_code",
        "location_description",
        "location_long",
        "location_city",
        "location_region",
        "location_street",
        "area_unit",
        "total_area",
        "usable_area",
        "built_up_area",
        "amenities_list",
        "energy_intensity",
        "ownership",
        "infrastructure",
        "construction",
        "construction_type",
        "construction_status",
        "floor_location",
        "listing_date",
        "listing_date_updated",
        "currency_code",
        "price",
        "note_on_price",
        "agent_name",
        "agent_url",
        "agent_website",
        "agent_email",
        "agent_phone1",
        "agent_phone2",
        "image_url",
        LISTING_URL_COLUMN,
        "scraped_at",
    ];
}
