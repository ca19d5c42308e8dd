//! Search result page addressing
//!
//! The site uses three URL layouts for paginated search results, depending
//! on the category.

use crate::site::Category;
use url::{ParseError, Url};

/// Placement of the sub-type token in a search URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// `/hledani/{slug}?strana={page}&velikost={sub_type}`
    SizeQuery,
    /// `/hledani/{slug}/{sub_type}?strana={page}`
    SizeSegment,
    /// `/hledani/{slug}?strana={page}`, sub-type not part of the URL
    PageOnly,
}

/// One page of search results for a category sub-type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub category: Category,
    pub sub_type: &'static str,
    pub page: u32,
}

impl SearchPage {
    pub fn new(category: Category, sub_type: &'static str, page: u32) -> Self {
        Self {
            category,
            sub_type,
            page,
        }
    }

    /// Same sub-type, different page number
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// Builds the absolute URL of a search result page
///
/// # Example
///
/// ```
/// use sreality_scraper::site::{search_page_url, SearchPage};
/// use sreality_scraper::Category;
/// use url::Url;
///
/// let base = Url::parse("https://www.sreality.cz").unwrap();
/// let page = SearchPage::new(Category::Apartment, "1+1", 2);
/// assert_eq!(
///     search_page_url(&base, &page).unwrap(),
///     "https://www.sreality.cz/hledani/byty?strana=2&velikost=1%2B1"
/// );
/// ```
pub fn search_page_url(base: &Url, page: &SearchPage) -> Result<String, ParseError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?;
        segments.pop_if_empty().push("hledani").push(page.category.slug());
        if page.category.pagination_style() == PaginationStyle::SizeSegment {
            segments.push(page.sub_type);
        }
    }

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("strana", &page.page.to_string());
        if page.category.pagination_style() == PaginationStyle::SizeQuery {
            query.append_pair("velikost", page.sub_type);
        }
    }

    Ok(url.to_string())
}
