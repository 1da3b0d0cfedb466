//! One module per content source. Every scraper is a thin configuration of
//! one of the extraction engines (feed-XML, pattern, rendered-DOM,
//! multi-page) plus the quirks of its source.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use sp_core::{RawItem, RenderEngine, Result};

pub mod chinatechnews;
pub mod coindesk;
pub mod cointelegraph;
pub mod crunchbase;
pub mod fastcompany;
pub mod github_trending;
pub mod hackernews;
pub mod pitchbook;
pub mod strictlyvc;
pub mod techcrunch;
pub mod techreview;
pub mod venturebeat;
pub mod ycombinator;

/// Shared collaborators handed to every scraper invocation.
pub struct FetchContext {
    pub http: Client,
    pub render: Arc<dyn RenderEngine>,
}

/// A single content source.
///
/// Implementations fetch their feed or pages and emit raw items; they never
/// normalize or persist. Item-level extraction failures are handled inside
/// `fetch` (skip and continue); only a source-level failure (feed
/// unreachable, navigation error) is returned as `Err`.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Fixed source identifier stored on every article, e.g. "techcrunch".
    fn source(&self) -> &'static str;

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<RawItem>>;
}

pub type ScraperFactory = fn() -> Box<dyn Scraper>;

/// Registry of every known source.
pub fn scraper_factories() -> Vec<ScraperFactory> {
    vec![
        || Box::new(techcrunch::TechCrunchScraper::new()),
        || Box::new(fastcompany::FastCompanyScraper::new()),
        || Box::new(hackernews::HackerNewsScraper::new()),
        || Box::new(chinatechnews::ChinaTechNewsScraper::new()),
        || Box::new(coindesk::CoindeskScraper::new()),
        || Box::new(cointelegraph::CointelegraphScraper::new()),
        || Box::new(crunchbase::CrunchbaseScraper::new()),
        || Box::new(strictlyvc::StrictlyVcScraper::new()),
        || Box::new(venturebeat::VentureBeatScraper::new()),
        || Box::new(techreview::TechReviewScraper::new()),
        || Box::new(github_trending::GithubTrendingScraper::new()),
        || Box::new(ycombinator::YCombinatorScraper::new()),
        || Box::new(pitchbook::PitchBookScraper::new()),
    ]
}

/// Keywords marking an item as startup-relevant; used by the sources that
/// carry general news mixed with startup coverage.
pub const STARTUP_KEYWORDS: &[&str] = &[
    "startup", "fund", "raise", "raised", "series", "venture", "acquisition", "acquired",
    "seed", "angel", "investment", "launch", "founder", "valuation", "ipo", "merger",
    "saas", "tech", "ai", "ml", "funding", "round", "million", "billion",
];

pub fn is_startup_related(text: &str) -> bool {
    let text = text.to_lowercase();
    STARTUP_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}
