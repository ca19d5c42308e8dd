//! Shared fixtures: a mock sreality site and scripted operators

use sreality_scraper::config::{
    AccessConfig, Config, HarvestConfig, HttpConfig, ScrapeConfig, SiteConfig, StorageConfig,
};
use sreality_scraper::prompt::Operator;
use sreality_scraper::store::{CsvStore, StorePaths};
use sreality_scraper::Category;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PASSCODE: &str = "letmein";

/// Test configuration pointing at the mock server and a temp directory
pub fn test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            ..SiteConfig::default()
        },
        http: HttpConfig {
            user_agent: "sreality-scraper-test/1.0".to_string(),
            timeout_secs: 5,
        },
        harvest: HarvestConfig { workers: 4 },
        scrape: ScrapeConfig { workers: 2 },
        storage: StorageConfig {
            input_dir: dir.path().join("listings url"),
            output_dir: dir.path().join("data"),
        },
        access: AccessConfig {
            free_page_limit: 5,
            passcode: Some(PASSCODE.to_string()),
        },
    }
}

pub fn paths(config: &Config) -> StorePaths {
    StorePaths::new(&config.storage)
}

/// Values of one column of a CSV file
pub fn column(file: &Path, name: &str) -> Vec<String> {
    CsvStore::new().read_column(file, name).unwrap()
}

/// A search result page of the "ostatni" category
///
/// `last_page` fills the pagination control (omitted when `None`); every
/// entry of `hrefs` becomes one result slot, `None` being a slot without a
/// detail link.
pub fn search_page(last_page: Option<u32>, hrefs: &[Option<&str>]) -> String {
    let pagination = last_page
        .map(|last| {
            (1..=last)
                .map(|n| {
                    format!(
                        r#"<li><a class="MuiPaginationItem-root MuiPaginationItem-page">{}</a></li>"#,
                        n
                    )
                })
                .collect::<String>()
        })
        .map(|items| format!(r#"<ul class="MuiPagination-ul css-1mkpgp4">{}</ul>"#, items))
        .unwrap_or_default();

    let slots: String = hrefs
        .iter()
        .map(|href| match href {
            Some(href) => format!(
                r#"<li class="MuiGrid-root MuiGrid-item"><a class="MuiTypography-root" href="{}">Inzerát</a></li>"#,
                href
            ),
            None => r#"<li class="MuiGrid-root MuiGrid-item"><div>Reklama</div></li>"#.to_string(),
        })
        .collect();

    format!(
        r#"<html><body><nav><ul><li>Menu</li></ul></nav><ul class="results">{}</ul>{}</body></html>"#,
        slots, pagination
    )
}

/// A listing detail page
pub fn listing_page(title: &str) -> String {
    format!(
        r#"<html><body>
        <h1>{}<br><span>Dlouhá 5, Praha 1 - Staré Město</span></h1>
        <img class="MuiBox-root css-emihra" src="//d18-a.sdn.cz/img.jpg">
        <dl>
          <dt class="css-tm1g54">Cena:</dt><dd class="css-urnwfg">450 000 Kč</dd>
          <dt class="css-tm1g54">Stavba:</dt><dd class="css-urnwfg">Betonová, Dobrý, přízemí</dd>
        </dl>
        <div class="css-11wv1wc"><dl><dt>Vloženo:</dt><dd>01.02.2025</dd></dl></div>
        </body></html>"#,
        title
    )
}

/// Mounts search page `page` of the "ostatni" category
pub async fn mount_search_page(
    server: &MockServer,
    page: u32,
    body: String,
    expected: Option<u64>,
) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/hledani/{}", Category::Other.slug())))
        .and(query_param("strana", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body));
    match expected {
        Some(times) => mock.expect(times).mount(server).await,
        None => mock.mount(server).await,
    }
}

/// Mounts a listing detail page
pub async fn mount_listing(server: &MockServer, detail_path: &str, status: u16, expected: u64) {
    let response = if status == 200 {
        ResponseTemplate::new(200).set_body_string(listing_page(detail_path))
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("GET"))
        .and(path(detail_path))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

/// Replays fixed answers and records which questions were asked
pub struct ScriptedOperator {
    pages: String,
    passcode: Option<String>,
    pub pages_asked: bool,
    pub passcode_asked: bool,
}

impl ScriptedOperator {
    pub fn new(pages: &str, passcode: Option<&str>) -> Self {
        Self {
            pages: pages.to_string(),
            passcode: passcode.map(str::to_string),
            pages_asked: false,
            passcode_asked: false,
        }
    }
}

impl Operator for ScriptedOperator {
    fn page_count(&mut self, _available: u32) -> String {
        self.pages_asked = true;
        self.pages.clone()
    }

    fn passcode(&mut self, _limit: u32) -> String {
        self.passcode_asked = true;
        self.passcode.clone().unwrap_or_default()
    }
}
