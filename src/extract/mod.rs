//! Field extraction for search result and listing pages
//!
//! This module is split in two layers:
//! - `markup`: one [`FieldExtractor`] per field, each owning the selectors for
//!   its part of the page
//! - `fields`: pure text parsers turning the extracted fragments into typed
//!   values (location, areas, construction, price, dates, contacts)

mod fields;
mod links;
mod markup;

pub use fields::{
    classify_contacts, footer_dates, format_price, parse_area, parse_construction,
    parse_location, reformat_date, AgentContacts, AreaBreakdown, Construction, FooterDates,
    Location, INSERTED_LABEL, UPDATED_LABEL,
};
pub use links::resolve_link;
pub use markup::{
    AgentBlock, AgentExtractor, DescriptionExtractor, FieldExtractor, FooterExtractor, Heading,
    HeadingExtractor, ImageExtractor, ListingParameters, PaginationExtractor, ParameterExtractor,
    ResultListExtractor, SiteMarkup,
};
