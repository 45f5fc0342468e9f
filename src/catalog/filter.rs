use super::PointCatalog;
use crate::point::PointId;

/// Which points a filter starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterMode {
    /// Points indicated for one symptom. Unknown or missing symptom ids fall
    /// back to the first symptom.
    Basic { symptom: Option<String> },
    /// Every point in the catalog.
    All,
}

/// Narrows the catalog to the list the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointFilter {
    pub mode: FilterMode,
    /// Keep only points on this meridian.
    pub meridian: Option<String>,
    /// Case-insensitive substring matched against id, names and region.
    pub search: String,
}

impl Default for PointFilter {
    fn default() -> Self {
        Self {
            mode: FilterMode::Basic { symptom: None },
            meridian: None,
            search: String::new(),
        }
    }
}

impl PointFilter {
    #[must_use]
    pub fn all() -> Self {
        Self {
            mode: FilterMode::All,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn symptom(id: impl Into<String>) -> Self {
        Self {
            mode: FilterMode::Basic {
                symptom: Some(id.into()),
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_meridian(mut self, meridian: impl Into<String>) -> Self {
        let meridian = meridian.into();
        self.meridian = (!meridian.is_empty()).then_some(meridian);
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

impl PointCatalog {
    /// Point ids matching `filter`, in the order the mode produces them.
    #[must_use]
    pub fn filter(&self, filter: &PointFilter) -> Vec<PointId> {
        let mut ids: Vec<PointId> = match &filter.mode {
            FilterMode::Basic { symptom } => symptom
                .as_deref()
                .and_then(|id| self.symptom(id))
                .or_else(|| self.symptoms().first())
                .map(|s| s.point_ids.clone())
                .unwrap_or_default(),
            FilterMode::All => self.point_ids().cloned().collect(),
        };

        if let Some(meridian) = filter.meridian.as_deref() {
            ids.retain(|id| {
                self.point(id)
                    .and_then(|p| p.meridian.as_deref())
                    .unwrap_or_default()
                    == meridian
            });
        }

        let query = filter.search.trim().to_lowercase();
        if !query.is_empty() {
            ids.retain(|id| self.matches_search(id, &query));
        }
        ids
    }

    fn matches_search(&self, id: &PointId, query: &str) -> bool {
        if id.as_str().to_lowercase().contains(query) {
            return true;
        }
        let Some(p) = self.point(id) else {
            return false;
        };
        let lower_contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(query))
        };
        p.name_ja.as_deref().is_some_and(|v| v.contains(query))
            || lower_contains(&p.name_en)
            || lower_contains(&p.region)
    }
}
