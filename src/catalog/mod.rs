//! Point, symptom and coordinate records supplied by the data provider.

mod filter;

pub use filter::{FilterMode, PointFilter};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

use crate::error::CatalogError;
use crate::marker::HighlightRequest;
use crate::point::{Coordinate, CoordinateSource, PointId, Side};

/// Descriptive record of one point. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PointRecord {
    pub name_ja: Option<String>,
    pub name_en: Option<String>,
    pub meridian: Option<String>,
    pub region: Option<String>,
    pub location: Option<String>,
    pub location_simple: Option<String>,
    pub effects: Vec<String>,
}

/// A symptom and the points indicated for it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Symptom {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub point_ids: Vec<PointId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CoordsDocument {
    front: HashMap<String, RawCoordinate>,
    back: HashMap<String, RawCoordinate>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct RawCoordinate {
    x: f64,
    y: f64,
}

/// In-memory view of the data provider's three documents.
#[derive(Debug, Default)]
pub struct PointCatalog {
    points: BTreeMap<PointId, PointRecord>,
    symptoms: Vec<Symptom>,
    front: HashMap<PointId, RawCoordinate>,
    back: HashMap<PointId, RawCoordinate>,
}

impl PointCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `points.json`, `symptoms.json` and `coords.json`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` naming the first malformed document.
    pub fn from_json(points: &str, symptoms: &str, coords: &str) -> Result<Self, CatalogError> {
        let raw_points: BTreeMap<String, PointRecord> =
            serde_json::from_str(points).map_err(|source| CatalogError::Parse {
                document: "points",
                source,
            })?;
        let symptoms: Vec<Symptom> =
            serde_json::from_str(symptoms).map_err(|source| CatalogError::Parse {
                document: "symptoms",
                source,
            })?;
        let coords: CoordsDocument =
            serde_json::from_str(coords).map_err(|source| CatalogError::Parse {
                document: "coords",
                source,
            })?;

        let mut points = BTreeMap::new();
        for (key, record) in raw_points {
            points.entry(PointId::new(&key)).or_insert(record);
        }

        let catalog = Self {
            points,
            symptoms,
            front: normalize_keys(coords.front),
            back: normalize_keys(coords.back),
        };
        tracing::info!(
            points = catalog.points.len(),
            symptoms = catalog.symptoms.len(),
            front = catalog.front.len(),
            back = catalog.back.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn point(&self, id: &PointId) -> Option<&PointRecord> {
        self.points.get(id)
    }

    /// All point ids, in sorted order.
    pub fn point_ids(&self) -> impl Iterator<Item = &PointId> {
        self.points.keys()
    }

    #[must_use]
    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    #[must_use]
    pub fn symptom(&self, id: &str) -> Option<&Symptom> {
        self.symptoms.iter().find(|s| s.id == id)
    }

    /// Distinct, non-empty meridian names in sorted order.
    #[must_use]
    pub fn meridians(&self) -> Vec<&str> {
        self.points
            .values()
            .filter_map(|p| p.meridian.as_deref())
            .filter(|m| !m.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The point's coordinate on one side.
    #[must_use]
    pub fn coordinate_on(&self, id: &PointId, side: Side) -> Option<Coordinate> {
        let map = match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        };
        map.get(id).map(|c| Coordinate::new(c.x, c.y, side))
    }

    /// A highlight request for `id`, carrying its preferred coordinate.
    #[must_use]
    pub fn highlight_request(&self, id: &PointId) -> HighlightRequest {
        HighlightRequest::new(id.clone()).with_coordinate(self.coordinate(id))
    }
}

impl CoordinateSource for PointCatalog {
    /// Front coordinate if present, otherwise the back one.
    fn coordinate(&self, id: &PointId) -> Option<Coordinate> {
        self.coordinate_on(id, Side::Front)
            .or_else(|| self.coordinate_on(id, Side::Back))
    }
}

/// Re-keys by [`PointId`]. Keys already written in uppercase take
/// precedence over differently-cased duplicates.
fn normalize_keys(raw: HashMap<String, RawCoordinate>) -> HashMap<PointId, RawCoordinate> {
    let (exact, other): (Vec<_>, Vec<_>) = raw
        .into_iter()
        .partition(|(k, _)| k.trim() == k.trim().to_uppercase());
    let mut out = HashMap::with_capacity(exact.len() + other.len());
    for (key, coord) in exact.into_iter().chain(other) {
        out.entry(PointId::new(&key)).or_insert(coord);
    }
    out
}
