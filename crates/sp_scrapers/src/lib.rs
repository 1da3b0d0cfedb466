pub mod clean;
pub mod dom;
pub mod feed;
pub mod fetch;
pub mod manager;
pub mod normalize;
pub mod pattern;
pub mod sources;

pub use fetch::HttpRenderer;
pub use manager::Pipeline;
pub use sources::{scraper_factories, FetchContext, Scraper, ScraperFactory};

pub mod prelude {
    pub use super::sources::{FetchContext, Scraper};
    pub use sp_core::{Article, Error, RawItem, Result};
}
