pub mod error;
pub mod models;
pub mod render;
pub mod report;
pub mod storage;

pub use error::Error;
pub use models::{Article, ArticleDigest, RawItem, Report, RunSummary, SourceStats};
pub use render::{RenderEngine, RenderOptions, RenderedPage, WaitUntil};
pub use report::ReportModel;
pub use storage::ArticleStore;

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{Article, ArticleStore, Error, RawItem, Result};
}
