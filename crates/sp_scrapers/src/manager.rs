//! Pipeline orchestration: fetch → extract → normalize → persist per
//! source, with every failure caught at the source boundary so one broken
//! feed never takes down the run.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use sp_core::{
    Article, ArticleDigest, ArticleStore, Error, RenderEngine, Report, Result, RunSummary,
    SourceStats,
};
use sp_storage::persist;

use crate::normalize;
use crate::sources::{scraper_factories, FetchContext, Scraper, ScraperFactory};
use crate::{fetch, HttpRenderer};

pub struct Pipeline {
    store: Arc<dyn ArticleStore>,
    model: Arc<dyn sp_core::ReportModel>,
    ctx: FetchContext,
    factories: Vec<ScraperFactory>,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        render: Arc<dyn RenderEngine>,
        model: Arc<dyn sp_core::ReportModel>,
    ) -> Result<Self> {
        Ok(Self {
            store,
            model,
            ctx: FetchContext {
                http: fetch::http_client(fetch::DEFAULT_TIMEOUT)?,
                render,
            },
            factories: scraper_factories(),
        })
    }

    /// Pipeline with the default plain-HTTP renderer.
    pub fn with_http_renderer(
        store: Arc<dyn ArticleStore>,
        model: Arc<dyn sp_core::ReportModel>,
    ) -> Result<Self> {
        let render: Arc<dyn RenderEngine> = Arc::new(HttpRenderer::new()?);
        Self::new(store, render, model)
    }

    /// Replace the scraper registry; used by tests and single-source runs.
    pub fn set_factories(&mut self, factories: Vec<ScraperFactory>) {
        self.factories = factories;
    }

    pub fn store(&self) -> &Arc<dyn ArticleStore> {
        &self.store
    }

    pub fn sources(&self) -> Vec<&'static str> {
        self.factories.iter().map(|factory| factory().source()).collect()
    }

    /// Run every registered source and aggregate the per-source counters.
    ///
    /// Sources are independent (persistence keys on url, not position), so
    /// they run concurrently to overlap their network waits.
    pub async fn run_all(&self) -> RunSummary {
        info!("🎬 starting pipeline run over {} sources", self.factories.len());

        let source_runs: Vec<_> = self
            .factories
            .iter()
            .map(|factory| {
                let scraper = factory();
                async move { self.run_scraper(scraper.as_ref()).await }
            })
            .collect();

        let mut summary = RunSummary::default();
        for stats in futures::future::join_all(source_runs).await {
            summary.push(stats);
        }

        info!(
            fetched = summary.total_fetched(),
            saved = summary.total_saved(),
            failed = ?summary.failed_sources(),
            "🏁 pipeline run complete"
        );
        summary
    }

    /// Run one source by name.
    pub async fn run_source(&self, name: &str) -> Result<SourceStats> {
        let scraper = self
            .factories
            .iter()
            .map(|factory| factory())
            .find(|scraper| scraper.source() == name)
            .ok_or_else(|| Error::Config(format!("no scraper registered for source: {name}")))?;
        Ok(self.run_scraper(scraper.as_ref()).await)
    }

    /// One source's state machine. Fetch/extract errors are caught here and
    /// reported as a failed source with zero articles.
    async fn run_scraper(&self, scraper: &dyn Scraper) -> SourceStats {
        let source = scraper.source();
        info!(source, "🚀 fetching source");

        let raw_items = match scraper.fetch(&self.ctx).await {
            Ok(items) => items,
            Err(e) => {
                error!(source, error = %e, "source failed, continuing run");
                return SourceStats::failed(source);
            }
        };

        let fetched = raw_items.len();
        let fetched_at = Utc::now();
        let mut articles: Vec<Article> = Vec::with_capacity(fetched);
        for raw in raw_items {
            match normalize::normalize(raw, source, fetched_at) {
                Ok(article) => articles.push(article),
                Err(rejection) => {
                    warn!(source, %rejection, "dropping item");
                }
            }
        }
        let parsed = articles.len();

        let saved = match persist::save_articles(self.store.as_ref(), &articles).await {
            Ok(saved) => saved,
            Err(e) => {
                error!(source, error = %e, "persistence failed for source");
                0
            }
        };

        let stats = SourceStats {
            source: source.to_string(),
            fetched,
            parsed,
            saved,
            skipped: fetched.saturating_sub(saved),
            failed: false,
        };
        info!(
            source,
            fetched, parsed, saved, skipped = stats.skipped, "✅ source complete"
        );
        stats
    }

    /// Snapshot the stored articles as a new export batch.
    pub async fn export_latest(&self) -> Result<usize> {
        let articles = self.store.latest(None).await?;
        let digests: Vec<ArticleDigest> = articles.iter().map(ArticleDigest::from).collect();
        self.store.save_export(&digests).await?;
        info!(count = digests.len(), "📦 exported article batch");
        Ok(digests.len())
    }

    /// Generate a report from the most recent export and store it.
    pub async fn generate_report(&self) -> Result<Report> {
        let digests = self.store.latest_export().await?;
        let report = sp_report::build_report(self.model.as_ref(), &digests).await?;
        self.store.save_report(&report).await?;
        info!(name = %report.name, "📊 report saved");
        Ok(report)
    }

    /// The full automation: clear the store, ingest every source, export,
    /// and generate the report.
    pub async fn run_full_report(&self) -> Result<(RunSummary, Report)> {
        info!("[1/4] deleting previous articles");
        self.store.delete_all().await?;

        info!("[2/4] fetching sources");
        let summary = self.run_all().await;

        info!("[3/4] exporting articles");
        self.export_latest().await?;

        info!("[4/4] generating report");
        let report = self.generate_report().await?;

        Ok((summary, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sp_core::{RawItem, RenderOptions, RenderedPage};
    use sp_storage::MemoryStore;

    struct StaticScraper;

    #[async_trait]
    impl Scraper for StaticScraper {
        fn source(&self) -> &'static str {
            "static"
        }

        async fn fetch(&self, _ctx: &FetchContext) -> Result<Vec<RawItem>> {
            Ok(vec![
                RawItem {
                    title: Some("Good item".to_string()),
                    link: Some("https://example.com/good".to_string()),
                    description: Some("body".to_string()),
                    ..Default::default()
                },
                // Missing url: rejected by the normalizer, not fatal.
                RawItem {
                    title: Some("No link".to_string()),
                    description: Some("body".to_string()),
                    ..Default::default()
                },
            ])
        }
    }

    struct BrokenScraper;

    #[async_trait]
    impl Scraper for BrokenScraper {
        fn source(&self) -> &'static str {
            "broken"
        }

        async fn fetch(&self, _ctx: &FetchContext) -> Result<Vec<RawItem>> {
            Err(Error::Fetch("connection reset".to_string()))
        }
    }

    struct NoopRenderer;

    #[async_trait]
    impl sp_core::RenderEngine for NoopRenderer {
        async fn render(&self, _url: &str, _options: &RenderOptions) -> Result<RenderedPage> {
            Ok(RenderedPage {
                html: String::new(),
                text: String::new(),
            })
        }
    }

    fn pipeline_with(factories: Vec<ScraperFactory>) -> Pipeline {
        let store = Arc::new(MemoryStore::new());
        let model: Arc<dyn sp_core::ReportModel> = Arc::new(sp_report::DummyModel);
        let render: Arc<dyn sp_core::RenderEngine> = Arc::new(NoopRenderer);
        let mut pipeline = Pipeline::new(store, render, model).unwrap();
        pipeline.set_factories(factories);
        pipeline
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_others() {
        let pipeline = pipeline_with(vec![
            || Box::new(BrokenScraper),
            || Box::new(StaticScraper),
        ]);

        let summary = pipeline.run_all().await;

        assert_eq!(summary.sources.len(), 2);
        assert_eq!(summary.failed_sources(), vec!["broken"]);
        let good = summary.sources.iter().find(|s| s.source == "static").unwrap();
        assert_eq!(good.fetched, 2);
        assert_eq!(good.parsed, 1);
        assert_eq!(good.saved, 1);
        assert_eq!(good.skipped, 1);
    }

    #[tokio::test]
    async fn test_rerun_saves_nothing_new() {
        let pipeline = pipeline_with(vec![|| Box::new(StaticScraper)]);

        let first = pipeline.run_all().await;
        let second = pipeline.run_all().await;

        assert_eq!(first.total_saved(), 1);
        assert_eq!(second.total_saved(), 0);
    }

    #[tokio::test]
    async fn test_run_source_by_name() {
        let pipeline = pipeline_with(vec![|| Box::new(StaticScraper)]);
        let stats = pipeline.run_source("static").await.unwrap();
        assert_eq!(stats.saved, 1);
        assert!(pipeline.run_source("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_full_report_flow() {
        let pipeline = pipeline_with(vec![|| Box::new(StaticScraper)]);

        let (summary, report) = pipeline.run_full_report().await.unwrap();

        assert_eq!(summary.total_saved(), 1);
        assert!(!report.html.is_empty());

        let reports = pipeline.store.list_reports().await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, report.name);
    }
}
