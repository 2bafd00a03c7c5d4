use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::UserProfile;
use crate::planner::{recommend_local, Recommendation};
use crate::source::RecommendationSource;
use crate::state::Catalog;

/// Recommendations computed from the local catalog.
pub struct LocalSource<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
}

impl<'a> LocalSource<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Never fails; an empty catalog yields an empty recommendation.
    pub fn build(&self, profile: &UserProfile) -> Recommendation {
        recommend_local(self.catalog, profile, self.config)
    }
}

impl RecommendationSource for LocalSource<'_> {
    fn name(&self) -> &str {
        "local"
    }

    fn recommend(&self, profile: &UserProfile) -> Result<Recommendation> {
        Ok(self.build(profile))
    }
}
