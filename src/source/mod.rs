//! Recommendation sources: the local filter and a remote service.
//!
//! A remote source gets exactly one attempt per request. Any failure falls
//! back to the local catalog synchronously, without retry.

mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalSource;

use tracing::warn;

use crate::error::Result;
use crate::models::UserProfile;
use crate::planner::Recommendation;

/// Something that can turn a profile into slot-ordered recommendations.
pub trait RecommendationSource {
    fn name(&self) -> &str;

    fn recommend(&self, profile: &UserProfile) -> Result<Recommendation>;
}

/// Ask `remote` once, falling back to `local` on any error.
pub fn recommend_with_fallback(
    remote: Option<&dyn RecommendationSource>,
    local: &LocalSource<'_>,
    profile: &UserProfile,
) -> Recommendation {
    if let Some(remote) = remote {
        match remote.recommend(profile) {
            Ok(recommendation) => return recommendation,
            Err(e) => warn!(source = remote.name(), error = %e, "remote recommendation failed; using local catalog"),
        }
    }
    local.build(profile)
}
