//! Site model for sreality.cz
//!
//! This module knows the listing categories the site offers, the sub-type
//! tokens each category's search space is partitioned by, and how a search
//! result page URL is laid out for each of them.

mod search;

pub use search::{search_page_url, PaginationStyle, SearchPage};

use crate::ScraperError;
use std::fmt;
use std::str::FromStr;

/// Listing category offered by the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Apartment,
    House,
    Land,
    Commercial,
    Other,
}

impl Category {
    /// All categories in menu order
    pub const ALL: [Category; 5] = [
        Category::Apartment,
        Category::House,
        Category::Land,
        Category::Commercial,
        Category::Other,
    ];

    /// The site's path token for this category, also used in file names
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Apartment => "byty",
            Self::House => "domy",
            Self::Land => "pozemky",
            Self::Commercial => "komercni",
            Self::Other => "ostatni",
        }
    }

    /// Human readable name shown in the category menu
    pub fn label(&self) -> &'static str {
        match self {
            Self::Apartment => "Apartment (Byty)",
            Self::House => "Houses (Domy)",
            Self::Land => "Land (Pozemky)",
            Self::Commercial => "Commercial (Komercni)",
            Self::Other => "Others (Ostatni)",
        }
    }

    /// Resolves a 1-based menu number
    pub fn from_menu_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Sub-type tokens partitioning this category's search results
    pub fn sub_types(&self) -> &'static [&'static str] {
        match self {
            Self::Apartment => &[
                "1+1", "1+kk", "2+kk", "3+1", "3+kk", "2+1", "4+1", "4+kk", "5+1", "5+kk",
                "6-a-vice", "atypicky", "pokoj",
            ],
            Self::House => &[
                "1-pokoj", "2-pokoje", "3-pokoje", "4-pokoje", "5-a-vice", "atypicky",
            ],
            Self::Land => &[
                "komercni-pozemky",
                "lesy",
                "louky",
                "ostatni-pozemky",
                "pole",
                "rybniky",
                "sady-vinice",
                "stavebni-parcely",
                "zahrady",
            ],
            Self::Commercial => &[
                "apartmany",
                "cinzovni-domy",
                "kancelare",
                "obchodni-prostory",
                "ordinace",
                "ostatni-komercni-prostory",
                "restaurace",
                "sklady",
                "ubytovani",
                "virtualni-kancelare",
                "vyrobni-prostory",
                "zemedelske-objekty",
            ],
            Self::Other => &["ostatni"],
        }
    }

    /// How the sub-type and page number are placed in a search URL
    pub fn pagination_style(&self) -> PaginationStyle {
        match self {
            Self::Apartment | Self::House => PaginationStyle::SizeQuery,
            Self::Land | Self::Commercial => PaginationStyle::SizeSegment,
            Self::Other => PaginationStyle::PageOnly,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = ScraperError;

    /// Accepts a menu number (`1`-`5`), the site slug (`byty`) or the
    /// English name (`apartment`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();

        if let Ok(index) = value.parse::<usize>() {
            return Self::from_menu_index(index)
                .ok_or_else(|| ScraperError::InvalidCategory(s.to_string()));
        }

        let category = match value.as_str() {
            "byty" | "apartment" | "apartments" => Self::Apartment,
            "domy" | "house" | "houses" => Self::House,
            "pozemky" | "land" => Self::Land,
            "komercni" | "commercial" => Self::Commercial,
            "ostatni" | "other" | "others" => Self::Other,
            _ => return Err(ScraperError::InvalidCategory(s.to_string())),
        };
        Ok(category)
    }
}
