pub mod burndown;
pub mod generate;
pub mod load_sqlite;
pub mod publish;
pub mod report;

use crate::config::ReportConfig;
use crate::process::{ProcessContentRepository, RepoCorpusResolver};
use burndown_core::errors::ExResult;
use burndown_core::sources::TrafficRanking;
use burndown_engine::PipelinePorts;
use burndown_store::JsonFileCache;

const CONTENT_CACHE_FILE: &str = "mdn-content-inventory.json";

/// Owns the process-backed ports one pipeline command lends out.
pub(crate) struct PipelineWiring {
    resolver: RepoCorpusResolver,
    content: ProcessContentRepository,
    content_cache: JsonFileCache,
    traffic: Option<TrafficRanking>,
}

impl PipelineWiring {
    pub(crate) fn new(config: &ReportConfig, historic: bool) -> ExResult<Self> {
        let resolver = RepoCorpusResolver::new(config.corpora.clone());
        Ok(Self {
            resolver: if historic { resolver.historic() } else { resolver },
            content: ProcessContentRepository::new(
                &config.corpora.mdn_content_repo_path,
                &config.corpora.mdn_content_inventory_cmd,
            ),
            content_cache: JsonFileCache::open(config.cache_file(CONTENT_CACHE_FILE))?,
            traffic: config.traffic_ranking()?,
        })
    }

    pub(crate) fn ports(&mut self) -> PipelinePorts<'_> {
        PipelinePorts {
            corpora: &mut self.resolver,
            content: &self.content,
            content_cache: &mut self.content_cache,
            traffic: self.traffic.as_ref(),
        }
    }
}
