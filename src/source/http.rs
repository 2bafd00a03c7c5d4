use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{PlannerError, Result};
use crate::models::{FoodItem, FoodRecord, MealSlot, NutritionSummary, UserProfile};
use crate::planner::{sample_selection, summarize, Recommendation, SourceKind};
use crate::source::RecommendationSource;

/// Wire shape of the remote service's answer.
#[derive(Debug, Deserialize)]
struct RecommendResponse {
    meals: Vec<Vec<FoodRecord>>,
    summary: Option<NutritionSummary>,
    #[serde(default)]
    fallback: bool,
}

/// Remote recommendation service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
    timeout: Duration,
    config: EngineConfig,
}

impl HttpSource {
    pub fn new(base_url: &str, config: &EngineConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.remote_timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            config: config.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/recommend", self.base_url)
    }

    /// Validate a decoded response against the profile's slot layout.
    fn into_recommendation(
        &self,
        response: RecommendResponse,
        profile: &UserProfile,
    ) -> Result<Recommendation> {
        let slots = profile.slots();
        if response.meals.len() != slots.len() {
            return Err(PlannerError::UpstreamUnavailable(format!(
                "expected {} meal slots, got {}",
                slots.len(),
                response.meals.len()
            )));
        }

        let meals = response
            .meals
            .into_iter()
            .map(|bucket| bucket.into_iter().map(FoodItem::from_record).collect())
            .collect::<Result<Vec<Vec<FoodItem>>>>()?;

        let summary = match response.summary {
            Some(summary) => summary,
            None => {
                let borrowed: Vec<Vec<&FoodItem>> =
                    meals.iter().map(|bucket| bucket.iter().collect()).collect();
                let sample = sample_selection(slots, &borrowed);
                summarize(&sample, profile, &self.config).summary
            }
        };

        let empty_slots: Vec<MealSlot> = slots
            .iter()
            .zip(&meals)
            .filter(|(_, bucket)| bucket.is_empty())
            .map(|(slot, _)| *slot)
            .collect();

        Ok(Recommendation {
            slots: slots.to_vec(),
            meals,
            summary,
            fallback: response.fallback,
            budget_relaxed: false,
            empty_slots,
            source: SourceKind::Remote,
        })
    }
}

impl RecommendationSource for HttpSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn recommend(&self, profile: &UserProfile) -> Result<Recommendation> {
        let url = self.endpoint();
        debug!(%url, timeout = ?self.timeout, "requesting remote recommendation");

        let resp = self.client.post(&url).json(profile).send()?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(PlannerError::UpstreamUnavailable(format!(
                "{} returned {}: {}",
                url, status, text
            )));
        }

        let response: RecommendResponse = resp.json()?;
        let recommendation = self.into_recommendation(response, profile)?;
        info!(%url, fallback = recommendation.fallback, "remote recommendation ready");
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{normalize_profile, RawProfile};

    fn profile() -> UserProfile {
        normalize_profile(
            &RawProfile {
                gender: Some("male".to_string()),
                age: Some(28.0),
                height: Some(178.0),
                weight: Some(75.0),
                meal_count: Some(2),
                allergies: vec!["milk".to_string()],
                ..Default::default()
            },
            &EngineConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_response_without_summary() {
        let source = HttpSource::new("http://localhost:9/", &EngineConfig::default()).unwrap();
        assert_eq!(source.endpoint(), "http://localhost:9/api/recommend");

        let json = r#"{
            "meals": [
                [{"foodId": 1, "name": "Latte", "kcal": 300, "price": 4500, "tags": ["milk"]}],
                []
            ],
            "fallback": true
        }"#;
        let response: RecommendResponse = serde_json::from_str(json).unwrap();
        let rec = source.into_recommendation(response, &profile()).unwrap();

        assert_eq!(rec.source, SourceKind::Remote);
        assert!(rec.fallback);
        assert!(rec.summary.allergy);
        assert_eq!(rec.empty_slots, vec![MealSlot::Dinner]);
    }

    #[test]
    fn test_timeout_from_config() {
        let source = HttpSource::new("http://localhost:9", &EngineConfig::default()).unwrap();
        assert_eq!(source.timeout, Duration::from_secs(10));

        let config = EngineConfig {
            remote_timeout_secs: 2,
            ..Default::default()
        };
        let source = HttpSource::new("http://localhost:9", &config).unwrap();
        assert_eq!(source.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_slot_count_mismatch_is_upstream_error() {
        let source = HttpSource::new("http://localhost:9", &EngineConfig::default()).unwrap();
        let response: RecommendResponse = serde_json::from_str(r#"{"meals": [[]]}"#).unwrap();
        assert!(matches!(
            source.into_recommendation(response, &profile()),
            Err(PlannerError::UpstreamUnavailable(_))
        ));
    }
}
