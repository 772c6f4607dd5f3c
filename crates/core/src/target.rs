use serde::{Deserialize, Serialize};
use validator::Validate;

pub const BUILTIN_TARGETS: &[&str] = &["akleg-senate", "akleg-house"];

const AKLEG_BASE: &str = "https://akleg.gov";

/// A legislature page and the markup needed to read it.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ScrapeTarget {
    #[validate(length(min = 1))]
    pub key: String,
    #[validate(url)]
    pub url: String,
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub role: String,
    #[validate(length(min = 1))]
    pub country: String,
    #[validate(nested)]
    pub selectors: TargetSelectors,
}

/// Ordered CSS selector candidates; earlier entries win.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct TargetSelectors {
    #[validate(length(min = 1))]
    pub cards: Vec<String>,
    pub name: Vec<String>,
    pub party: Vec<String>,
    pub details: Vec<String>,
    pub image: Vec<String>,
    #[validate(length(min = 1))]
    pub image_attrs: Vec<String>,
    pub link: Vec<String>,
}

impl ScrapeTarget {
    pub fn builtin(key: &str) -> Option<Self> {
        match key {
            "akleg-senate" => Some(akleg_chamber(key, "senate.php", "Senator")),
            "akleg-house" => Some(akleg_chamber(key, "house.php", "Representative")),
            _ => None,
        }
    }

    /// Same target, different page. Used for the `targetUrl` override.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl TargetSelectors {
    /// Card markup used by the Alaska Legislature roster pages across redesigns.
    pub fn akleg() -> Self {
        Self {
            cards: strings(&[
                "div.member",
                "div.col-md-3.member",
                "div.member-card",
                "ul.people-holder > li",
            ]),
            name: strings(&[".member-name", ".name", "strong", "h3", "h4"]),
            party: strings(&[".member-party", ".party"]),
            details: strings(&[".member-details", ".details", "dl"]),
            image: strings(&["img"]),
            image_attrs: strings(&["src", "data-src"]),
            link: strings(&["a[href]"]),
        }
    }
}

fn akleg_chamber(key: &str, page: &str, role: &str) -> ScrapeTarget {
    ScrapeTarget {
        key: key.to_string(),
        url: format!("{}/{}", AKLEG_BASE, page),
        base_url: AKLEG_BASE.to_string(),
        role: role.to_string(),
        country: "USA".to_string(),
        selectors: TargetSelectors::akleg(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
