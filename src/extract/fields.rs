//! Pure text parsers for listing fields
//!
//! Every function here takes a text fragment already pulled out of a page and
//! degrades to `None` for the parts it cannot recognize, so one odd field
//! never costs the rest of the record.

use once_cell::sync::Lazy;
use regex::Regex;

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)(?:,\s*(.*?))?(?:\s*-\s*(.*))?$").expect("hardcoded regex pattern is valid")
});

static USABLE_AREA_RE: Lazy<Regex> = Lazy::new(|| area_regex("Užitná plocha"));
static BUILT_UP_AREA_RE: Lazy<Regex> = Lazy::new(|| area_regex("Zastavěná plocha"));
static TOTAL_AREA_RE: Lazy<Regex> = Lazy::new(|| area_regex("Celková plocha"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
        .expect("hardcoded regex pattern is valid")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9\s\-]{7,15}$").expect("hardcoded regex pattern is valid")
});

/// Footer label of the date a listing was published
pub const INSERTED_LABEL: &str = "Vloženo:";

/// Footer label of the date a listing was last edited
pub const UPDATED_LABEL: &str = "Upraveno:";

fn area_regex(label: &str) -> Regex {
    // Digits may be grouped by (non-breaking) spaces: "1 200 m²".
    Regex::new(&format!(r"{}\s+(\d+(?:[ \x{{a0}}]\d{{3}})*)\s*m²", regex::escape(label)))
        .expect("hardcoded regex pattern is valid")
}

/// Street / city / district split of a listing location line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub street: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
}

/// Named sub-areas in square meters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AreaBreakdown {
    pub usable: Option<u32>,
    pub built_up: Option<u32>,
    pub total: Option<u32>,
}

/// Construction type, condition and floor of a building
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Construction {
    pub kind: Option<String>,
    pub status: Option<String>,
    pub floor: Option<String>,
}

/// Listing publication dates, reformatted to `dd-mm-yyyy`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FooterDates {
    pub inserted: Option<String>,
    pub updated: Option<String>,
}

/// Agent e-mail and phone numbers recovered from loose contact lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentContacts {
    pub email: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Splits "Street, City - District", "City - District" or "City"
///
/// Without a comma there is no street; without a dash there is no district.
///
/// # Example
///
/// ```
/// use sreality_scraper::extract::parse_location;
///
/// let location = parse_location("Vinohradská 10, Praha 3 - Vinohrady");
/// assert_eq!(location.street.as_deref(), Some("Vinohradská 10"));
/// assert_eq!(location.city.as_deref(), Some("Praha 3"));
/// assert_eq!(location.district.as_deref(), Some("Vinohrady"));
/// ```
pub fn parse_location(text: &str) -> Location {
    let Some(caps) = LOCATION_RE.captures(text.trim()) else {
        return Location::default();
    };

    let first = caps.get(1).and_then(|m| non_empty(m.as_str()));
    let second = caps.get(2).and_then(|m| non_empty(m.as_str()));
    let district = caps.get(3).and_then(|m| non_empty(m.as_str()));

    match second {
        Some(city) => Location {
            street: first,
            city: Some(city),
            district,
        },
        None => Location {
            street: None,
            city: first,
            district,
        },
    }
}

/// Extracts the usable, built-up and total areas from an area description
pub fn parse_area(text: &str) -> AreaBreakdown {
    let capture = |re: &Regex| -> Option<u32> {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| {
                m.as_str()
                    .chars()
                    .filter(char::is_ascii_digit)
                    .collect::<String>()
                    .parse()
                    .ok()
            })
    };

    AreaBreakdown {
        usable: capture(&USABLE_AREA_RE),
        built_up: capture(&BUILT_UP_AREA_RE),
        total: capture(&TOTAL_AREA_RE),
    }
}

/// Splits "type, status, floor"; anything but exactly three parts yields
/// nothing at all
pub fn parse_construction(text: &str) -> Construction {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [kind, status, floor] => Construction {
            kind: non_empty(kind),
            status: non_empty(status),
            floor: non_empty(floor),
        },
        _ => Construction::default(),
    }
}

/// Strips the currency symbol, zero-width, non-breaking and grouping spaces
///
/// # Example
///
/// ```
/// use sreality_scraper::extract::format_price;
///
/// assert_eq!(format_price("2 500 000\u{a0}Kč"), "2500000");
/// ```
pub fn format_price(text: &str) -> String {
    text.replace("Kč", "")
        .chars()
        .filter(|c| !matches!(c, '\u{200b}' | '\u{a0}' | '\u{202f}') && !c.is_whitespace())
        .collect()
}

/// Turns a dot separated date ("12. 3. 2024") into "12-3-2024"
pub fn reformat_date(text: &str) -> Option<String> {
    let parts: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join("-"))
}

/// Picks the publication and update dates out of the footer's label/value
/// pairs
pub fn footer_dates(pairs: &[(String, String)]) -> FooterDates {
    let lookup = |label: &str| {
        pairs
            .iter()
            .find(|(key, _)| key.trim() == label)
            .and_then(|(_, value)| reformat_date(value))
    };

    FooterDates {
        inserted: lookup(INSERTED_LABEL),
        updated: lookup(UPDATED_LABEL),
    }
}

/// Sorts contact lines into an e-mail and up to two phone numbers
///
/// The first e-mail wins; phones fill the two slots in order of appearance.
/// Lines matching neither pattern are dropped.
pub fn classify_contacts<'a, I>(lines: I) -> AgentContacts
where
    I: IntoIterator<Item = &'a str>,
{
    let mut contacts = AgentContacts::default();

    for line in lines.into_iter().map(str::trim) {
        if EMAIL_RE.is_match(line) {
            contacts.email.get_or_insert_with(|| line.to_string());
        } else if PHONE_RE.is_match(line) {
            if contacts.phone1.is_none() {
                contacts.phone1 = Some(line.to_string());
            } else if contacts.phone2.is_none() {
                contacts.phone2 = Some(line.to_string());
            }
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(street: Option<&str>, city: Option<&str>, district: Option<&str>) -> Location {
        Location {
            street: street.map(str::to_string),
            city: city.map(str::to_string),
            district: district.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_location_full() {
        assert_eq!(
            parse_location("Vinohradská 10, Praha 3 - Vinohrady"),
            location(Some("Vinohradská 10"), Some("Praha 3"), Some("Vinohrady"))
        );
    }

    #[test]
    fn test_parse_location_without_street() {
        assert_eq!(
            parse_location("Praha 3 - Vinohrady"),
            location(None, Some("Praha 3"), Some("Vinohrady"))
        );
    }

    #[test]
    fn test_parse_location_city_only() {
        assert_eq!(
            parse_location("Praha 3"),
            location(None, Some("Praha 3"), None)
        );
    }

    #[test]
    fn test_parse_location_street_and_city() {
        assert_eq!(
            parse_location("Masarykova 5, Brno"),
            location(Some("Masarykova 5"), Some("Brno"), None)
        );
    }

    #[test]
    fn test_parse_location_blank() {
        assert_eq!(parse_location("   "), Location::default());
    }

    #[test]
    fn test_parse_area() {
        assert_eq!(
            parse_area("Užitná plocha 45 m², Celková plocha 50 m²"),
            AreaBreakdown {
                usable: Some(45),
                built_up: None,
                total: Some(50),
            }
        );
    }

    #[test]
    fn test_parse_area_all_parts_and_grouping() {
        assert_eq!(
            parse_area("Zastavěná plocha 120 m², Užitná plocha 98 m², Celková plocha 1 200 m²"),
            AreaBreakdown {
                usable: Some(98),
                built_up: Some(120),
                total: Some(1200),
            }
        );
    }

    #[test]
    fn test_parse_area_unlabelled() {
        assert_eq!(parse_area("85 m²"), AreaBreakdown::default());
    }

    #[test]
    fn test_parse_construction() {
        assert_eq!(
            parse_construction("Cihlová, Velmi dobrý, 2. podlaží"),
            Construction {
                kind: Some("Cihlová".to_string()),
                status: Some("Velmi dobrý".to_string()),
                floor: Some("2. podlaží".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_construction_requires_three_parts() {
        assert_eq!(parse_construction("incomplete, text"), Construction::default());
        assert_eq!(parse_construction("a, b, c, d"), Construction::default());
        assert_eq!(parse_construction(""), Construction::default());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("2 500 000\u{a0}Kč"), "2500000");
        assert_eq!(format_price("\u{200b}15\u{a0}000 Kč"), "15000");
        assert_eq!(format_price("1\u{202f}999\u{202f}000 Kč"), "1999000");
    }

    #[test]
    fn test_reformat_date() {
        assert_eq!(reformat_date("12.03.2024").as_deref(), Some("12-03-2024"));
        assert_eq!(reformat_date("12. 3. 2024").as_deref(), Some("12-3-2024"));
        assert_eq!(reformat_date("Dnes").as_deref(), Some("Dnes"));
        assert_eq!(reformat_date(" "), None);
    }

    #[test]
    fn test_footer_dates() {
        let pairs = vec![
            ("Vloženo:".to_string(), "01.02.2024".to_string()),
            ("Zobrazeno:".to_string(), "123x".to_string()),
            ("Upraveno: ".to_string(), "05.02.2024".to_string()),
        ];
        assert_eq!(
            footer_dates(&pairs),
            FooterDates {
                inserted: Some("01-02-2024".to_string()),
                updated: Some("05-02-2024".to_string()),
            }
        );
        assert_eq!(footer_dates(&[]), FooterDates::default());
    }

    #[test]
    fn test_classify_contacts() {
        let contacts = classify_contacts([
            "Jana Nováková",
            "+420 777 123 456",
            "jana@realitka.cz",
            "602 111 222",
            "603 333 444",
            "other@realitka.cz",
        ]);

        assert_eq!(contacts.email.as_deref(), Some("jana@realitka.cz"));
        assert_eq!(contacts.phone1.as_deref(), Some("+420 777 123 456"));
        assert_eq!(contacts.phone2.as_deref(), Some("602 111 222"));
    }

    #[test]
    fn test_classify_contacts_drops_unmatched() {
        let contacts = classify_contacts(["Otevřít web", "12"]);
        assert_eq!(contacts, AgentContacts::default());
    }
}
