//! Per-field document extractors
//!
//! Each extractor owns the compiled selectors for exactly one piece of the
//! site's markup. When the site changes a class name, only the extractor for
//! that field needs touching.

use crate::extract::fields::{classify_contacts, footer_dates, AgentContacts, FooterDates};
use crate::ScraperError;
use scraper::{ElementRef, Html, Selector};

/// Pulls one typed field out of a parsed page
pub trait FieldExtractor {
    type Output;

    fn extract(&self, document: &Html) -> Self::Output;
}

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Last page number from a search result page's pagination control
pub struct PaginationExtractor {
    page_links: Selector,
}

impl PaginationExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            page_links: selector("ul.css-1mkpgp4 a.MuiPaginationItem-page")?,
        })
    }
}

impl FieldExtractor for PaginationExtractor {
    /// `None` when the control is absent or its last entry is not a number
    type Output = Option<u32>;

    fn extract(&self, document: &Html) -> Option<u32> {
        document
            .select(&self.page_links)
            .last()
            .and_then(|link| element_text(link).parse().ok())
    }
}

/// Detail-link hrefs of every result slot on a search result page
pub struct ResultListExtractor {
    list: Selector,
    item: Selector,
    link: Selector,
}

impl ResultListExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            list: selector("ul")?,
            item: selector("li.MuiGrid-root")?,
            link: selector("a.MuiTypography-root")?,
        })
    }
}

impl FieldExtractor for ResultListExtractor {
    /// One entry per result slot of the first list holding results; a slot
    /// without a detail link is `None`
    type Output = Vec<Option<String>>;

    fn extract(&self, document: &Html) -> Vec<Option<String>> {
        let Some(list) = document
            .select(&self.list)
            .find(|list| list.select(&self.item).next().is_some())
        else {
            return Vec::new();
        };

        list.select(&self.item)
            .map(|item| {
                item.select(&self.link)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .map(str::to_string)
            })
            .collect()
    }
}

/// Title and location line of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heading {
    pub title: Option<String>,
    pub location: Option<String>,
}

/// The listing's `h1`, whose first line is the title and second the location
pub struct HeadingExtractor {
    heading: Selector,
}

impl HeadingExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            heading: selector("h1")?,
        })
    }
}

impl FieldExtractor for HeadingExtractor {
    /// `None` when the page has no `h1` at all
    type Output = Option<Heading>;

    fn extract(&self, document: &Html) -> Option<Heading> {
        let h1 = document.select(&self.heading).next()?;
        let mut lines = h1
            .text()
            .flat_map(|text| text.split('\n'))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string);

        Some(Heading {
            title: lines.next(),
            location: lines.next(),
        })
    }
}

/// Main photo source
pub struct ImageExtractor {
    image: Selector,
}

impl ImageExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            image: selector("img.css-emihra")?,
        })
    }
}

impl FieldExtractor for ImageExtractor {
    type Output = Option<String>;

    fn extract(&self, document: &Html) -> Option<String> {
        document
            .select(&self.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|src| src.trim().to_string())
            .filter(|src| !src.is_empty())
    }
}

/// Free-text listing description
pub struct DescriptionExtractor {
    description: Selector,
}

impl DescriptionExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            description: selector("div.css-zbebq3")?,
        })
    }
}

impl FieldExtractor for DescriptionExtractor {
    type Output = Option<String>;

    fn extract(&self, document: &Html) -> Option<String> {
        document
            .select(&self.description)
            .next()
            .map(element_text)
            .and_then(non_empty)
    }
}

/// Label/value pairs of the listing's parameter table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingParameters {
    pairs: Vec<(String, String)>,
}

impl ListingParameters {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Value of the first pair labelled `label`, if non-empty
    pub fn get(&self, label: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| value.clone())
            .filter(|value| !value.is_empty())
    }

    /// First non-empty value among `labels`, in order
    pub fn first_of(&self, labels: &[&str]) -> Option<String> {
        labels.iter().find_map(|label| self.get(label))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

pub struct ParameterExtractor {
    label: Selector,
    value: Selector,
}

impl ParameterExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            label: selector("dt.css-tm1g54")?,
            value: selector("dd.css-urnwfg")?,
        })
    }
}

impl FieldExtractor for ParameterExtractor {
    type Output = ListingParameters;

    fn extract(&self, document: &Html) -> ListingParameters {
        let labels = document.select(&self.label).map(element_text);
        let values = document.select(&self.value).map(element_text);
        ListingParameters::new(labels.zip(values).collect())
    }
}

/// Publication dates from the listing footer
pub struct FooterExtractor {
    footer: Selector,
    label: Selector,
    value: Selector,
}

impl FooterExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            footer: selector("div.css-11wv1wc")?,
            label: selector("dt")?,
            value: selector("dd")?,
        })
    }
}

impl FieldExtractor for FooterExtractor {
    type Output = FooterDates;

    fn extract(&self, document: &Html) -> FooterDates {
        let Some(footer) = document.select(&self.footer).next() else {
            return FooterDates::default();
        };

        let labels = footer.select(&self.label).map(element_text);
        let values = footer.select(&self.value).map(element_text);
        let pairs: Vec<(String, String)> = labels.zip(values).collect();
        footer_dates(&pairs)
    }
}

/// Listing agent as found on the page, links still relative
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentBlock {
    pub name: Option<String>,
    pub profile_href: Option<String>,
    pub website_href: Option<String>,
    pub contacts: AgentContacts,
}

pub struct AgentExtractor {
    contact_lines: Selector,
    profile: Selector,
    website: Selector,
}

impl AgentExtractor {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            contact_lines: selector("li.css-yu7uzj")?,
            profile: selector("a.css-ny03lw")?,
            website: selector("a.css-1vgywwe")?,
        })
    }
}

impl FieldExtractor for AgentExtractor {
    type Output = AgentBlock;

    fn extract(&self, document: &Html) -> AgentBlock {
        let lines: Vec<String> = document
            .select(&self.contact_lines)
            .map(element_text)
            .collect();
        let profile = document.select(&self.profile).next();

        AgentBlock {
            name: profile.map(element_text).and_then(non_empty),
            profile_href: profile
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
            website_href: document
                .select(&self.website)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
            contacts: classify_contacts(lines.iter().map(String::as_str)),
        }
    }
}

/// Every extractor the pipeline uses, compiled once and shared by all workers
pub struct SiteMarkup {
    pub pagination: PaginationExtractor,
    pub results: ResultListExtractor,
    pub heading: HeadingExtractor,
    pub image: ImageExtractor,
    pub description: DescriptionExtractor,
    pub parameters: ParameterExtractor,
    pub footer: FooterExtractor,
    pub agent: AgentExtractor,
}

impl SiteMarkup {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            pagination: PaginationExtractor::new()?,
            results: ResultListExtractor::new()?,
            heading: HeadingExtractor::new()?,
            image: ImageExtractor::new()?,
            description: DescriptionExtractor::new()?,
            parameters: ParameterExtractor::new()?,
            footer: FooterExtractor::new()?,
            agent: AgentExtractor::new()?,
        })
    }
}
