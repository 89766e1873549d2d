//! Place-search seam.
//!
//! The planner does not search for places itself. A [`PlaceSearch`]
//! provider returns ranked candidates; a [`PlacePicker`] owns the results of
//! one search and hands back the chosen candidate by its id.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::plan_item::PlaceRef;

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl PlaceCandidate {
    /// The fields a plan item keeps.
    pub fn to_place_ref(&self) -> PlaceRef {
        PlaceRef {
            name: self.name.clone(),
            address: self.formatted_address.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// External place-search provider.
#[cfg_attr(test, mockall::automock)]
pub trait PlaceSearch {
    fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>>;
}

/// Id of a candidate within one picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateId(pub usize);

/// Results of a single search, keyed by stable candidate ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacePicker {
    query: String,
    candidates: Vec<(CandidateId, PlaceCandidate)>,
}

impl PlacePicker {
    /// Run `query` against `provider`. Blank queries skip the provider.
    pub fn search(provider: &dyn PlaceSearch, query: &str) -> Result<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Self::default());
        }
        let results = provider.search(query)?;
        log::debug!("Place search {:?} returned {} candidates", query, results.len());
        Ok(Self {
            query: query.to_string(),
            candidates: results
                .into_iter()
                .enumerate()
                .map(|(rank, candidate)| (CandidateId(rank), candidate))
                .collect(),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[(CandidateId, PlaceCandidate)] {
        &self.candidates
    }

    pub fn select(&self, id: CandidateId) -> Option<PlaceRef> {
        self.candidates
            .iter()
            .find(|(candidate_id, _)| *candidate_id == id)
            .map(|(_, candidate)| candidate.to_place_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str) -> PlaceCandidate {
        PlaceCandidate {
            name: name.to_string(),
            formatted_address: format!("{} street 1", name),
            latitude: 38.7,
            longitude: -9.1,
            phone: None,
            category: Some("museum".to_string()),
        }
    }

    #[test]
    fn test_search_keys_candidates_by_rank() {
        let mut provider = MockPlaceSearch::new();
        provider
            .expect_search()
            .withf(|query: &str| query == "tile museum")
            .times(1)
            .returning(|_| Ok(vec![candidate("Azulejo"), candidate("Design")]));

        let picker = PlacePicker::search(&provider, "  tile museum ").unwrap();
        assert_eq!(picker.query(), "tile museum");
        assert_eq!(picker.candidates().len(), 2);

        let place = picker.select(CandidateId(1)).unwrap();
        assert_eq!(place.name, "Design");
        assert_eq!(place.address, "Design street 1");
        assert!(picker.select(CandidateId(5)).is_none());
    }

    #[test]
    fn test_blank_query_skips_provider() {
        let mut provider = MockPlaceSearch::new();
        provider.expect_search().times(0);

        let picker = PlacePicker::search(&provider, "   ").unwrap();
        assert!(picker.candidates().is_empty());
    }

    #[test]
    fn test_provider_error_propagates() {
        let mut provider = MockPlaceSearch::new();
        provider
            .expect_search()
            .returning(|_| Err(anyhow::anyhow!("quota exceeded")));

        let err = PlacePicker::search(&provider, "cafe").unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
