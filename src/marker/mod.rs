mod highlight;
mod host;
mod timer;

pub use highlight::{Highlight, HighlightState};
pub use host::{MarkerKind, RenderHost};
pub use timer::{TimerSlot, TimerToken};

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use slotmap::SlotMap;

use crate::config::{BlinkParams, LocatorConfig, MarkerStyles, ProjectionParams};
use crate::error::ResolveError;
use crate::math::Point3;
use crate::model::LoadedModel;
use crate::point::{AliasTable, Coordinate, CoordinateSource, PointId};
use crate::resolve::{Fallback, Resolution, ResolvePosition, Source};
use crate::status::{Status, StatusSink};

slotmap::new_key_type! {
    /// Identifier of a persistent marker owned by a [`MarkerManager`].
    pub struct MarkerId;
}

/// A marker that follows one point's membership in the active set.
#[derive(Debug, Clone)]
pub struct PersistentMarker<M> {
    pub point: PointId,
    pub handle: M,
    pub position: Point3,
    pub visible: bool,
}

/// A request to highlight one point.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRequest {
    pub id: PointId,
    pub coordinate: Option<Coordinate>,
}

impl HighlightRequest {
    #[must_use]
    pub fn new(id: PointId) -> Self {
        Self {
            id,
            coordinate: None,
        }
    }

    #[must_use]
    pub fn with_coordinate(mut self, coordinate: Option<Coordinate>) -> Self {
        self.coordinate = coordinate;
        self
    }
}

/// Outcome of one [`MarkerManager::set_active`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSummary {
    /// Markers visible after the call.
    pub shown: usize,
    /// Markers created by this call.
    pub created: usize,
    /// Points that could not be placed.
    pub unresolved: Vec<PointId>,
}

/// Lazily created resources shared by every marker of a kind.
#[derive(Debug)]
struct SharedResources<R> {
    persistent: Option<R>,
    highlight: Option<R>,
}

impl<R> Default for SharedResources<R> {
    fn default() -> Self {
        Self {
            persistent: None,
            highlight: None,
        }
    }
}

/// Owns the persistent markers and the transient highlight.
///
/// Persistent markers are created the first time their point becomes
/// active and afterwards only moved and toggled. The highlight is a single
/// marker driven by a blink timer and an auto-clear timer.
pub struct MarkerManager<H: RenderHost> {
    aliases: AliasTable,
    projection: ProjectionParams,
    blink: BlinkParams,
    styles: MarkerStyles,
    resources: SharedResources<H::Resources>,
    markers: SlotMap<MarkerId, PersistentMarker<H::Marker>>,
    by_point: HashMap<PointId, MarkerId>,
    highlight: Highlight<H::Marker>,
}

impl<H: RenderHost> MarkerManager<H> {
    /// Creates a manager using the given configuration.
    #[must_use]
    pub fn new(config: &LocatorConfig) -> Self {
        Self {
            aliases: config.alias_table(),
            projection: config.projection,
            blink: config.blink,
            styles: config.markers,
            resources: SharedResources::default(),
            markers: SlotMap::with_key(),
            by_point: HashMap::new(),
            highlight: Highlight::new(),
        }
    }

    /// Shows a marker for every id in `ids` and hides every other tracked
    /// marker.
    ///
    /// Positions come from a matching node, or else from the point's
    /// coordinate in `coordinates`. Points with neither are reported through
    /// `status` and left without a visible marker.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::ModelNotReady` if no model is loaded; nothing
    /// changes in that case.
    pub fn set_active<C, S>(
        &mut self,
        ids: &[PointId],
        coordinates: &C,
        loaded: Option<&LoadedModel>,
        host: &mut H,
        status: &mut S,
    ) -> Result<ActiveSummary, ResolveError>
    where
        C: CoordinateSource + ?Sized,
        S: StatusSink + ?Sized,
    {
        let Some(loaded) = loaded else {
            tracing::debug!(count = ids.len(), "active set deferred until model is ready");
            return Err(ResolveError::ModelNotReady);
        };

        let mut summary = ActiveSummary::default();
        let mut active: HashSet<&PointId> = HashSet::with_capacity(ids.len());

        for id in ids {
            if !active.insert(id) {
                continue;
            }
            let resolved = ResolvePosition::new(id)
                .with_coordinate(coordinates.coordinate(id))
                .with_fallback(Fallback::Permitted)
                .with_aliases(&self.aliases)
                .with_projection(self.projection)
                .execute(Some(loaded), &*host);

            match resolved {
                Ok(Resolution { position, .. }) => {
                    let created = self.show_persistent(id, position, loaded, host);
                    summary.created += usize::from(created);
                    summary.shown += 1;
                }
                Err(err) => {
                    tracing::warn!(%id, %err, "active point not placed");
                    let tracked = self.by_point.get(id).and_then(|&m| self.markers.get_mut(m));
                    if let Some(marker) = tracked {
                        if marker.visible {
                            host.set_marker_visible(marker.handle, false);
                            marker.visible = false;
                        }
                    }
                    status.report(Status::from(&err));
                    summary.unresolved.push(id.clone());
                }
            }
        }

        for marker in self.markers.values_mut() {
            if marker.visible && !active.contains(&marker.point) {
                host.set_marker_visible(marker.handle, false);
                marker.visible = false;
            }
        }

        tracing::debug!(
            shown = summary.shown,
            created = summary.created,
            unresolved = summary.unresolved.len(),
            "active set applied"
        );
        Ok(summary)
    }

    /// Starts blinking the highlight marker on `request`'s point.
    ///
    /// Only a node match is accepted; a supplied coordinate is never
    /// projected on this path. On failure the previous highlight keeps
    /// running and a status is reported.
    ///
    /// # Errors
    ///
    /// Returns the resolution failure, already reported through `status`.
    pub fn highlight<S>(
        &mut self,
        request: &HighlightRequest,
        loaded: Option<&LoadedModel>,
        host: &mut H,
        status: &mut S,
        now: Instant,
    ) -> Result<Resolution, ResolveError>
    where
        S: StatusSink + ?Sized,
    {
        let resolved = ResolvePosition::new(&request.id)
            .with_coordinate(request.coordinate)
            .with_fallback(Fallback::Blocked)
            .with_aliases(&self.aliases)
            .with_projection(self.projection)
            .execute(loaded, &*host);

        let resolution = match resolved {
            Ok(resolution) => resolution,
            Err(err) => {
                status.report(Status::from(&err));
                return Err(err);
            }
        };

        // `loaded` is present, or resolution would have failed above.
        if let Some(loaded) = loaded {
            self.ensure_highlight_marker(loaded, host);
        }
        self.highlight
            .start(host, request.id.clone(), resolution.position, self.blink, now);

        if let Source::Node { alias } = &resolution.source {
            tracing::info!(id = %request.id, node = %alias, "highlight");
            status.report(Status::Highlighted { node: alias.clone() });
        }
        Ok(resolution)
    }

    /// Stops the highlight and hides its marker.
    pub fn clear(&mut self, host: &mut H) {
        self.highlight.stop(host);
    }

    /// Advances the highlight timers. Call from the host's frame hook.
    pub fn tick(&mut self, host: &mut H, now: Instant) {
        self.highlight.tick(host, now);
    }

    #[must_use]
    pub fn highlight_state(&self) -> &Highlight<H::Marker> {
        &self.highlight
    }

    /// The persistent marker tracking `id`, if one was ever created.
    #[must_use]
    pub fn marker_for(&self, id: &PointId) -> Option<(MarkerId, &PersistentMarker<H::Marker>)> {
        let key = *self.by_point.get(id)?;
        self.markers.get(key).map(|m| (key, m))
    }

    /// Iterates all persistent markers, visible or not.
    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &PersistentMarker<H::Marker>)> {
        self.markers.iter()
    }

    /// Ids of the currently visible persistent markers.
    pub fn visible_points(&self) -> impl Iterator<Item = &PointId> {
        self.markers.values().filter(|m| m.visible).map(|m| &m.point)
    }

    /// Moves (creating if needed) and shows the marker for `id`. Returns
    /// whether a marker was created.
    fn show_persistent(
        &mut self,
        id: &PointId,
        position: Point3,
        loaded: &LoadedModel,
        host: &mut H,
    ) -> bool {
        let tracked = self.by_point.get(id).and_then(|&m| self.markers.get_mut(m));
        if let Some(marker) = tracked {
            host.place_marker(marker.handle, position);
            marker.position = position;
            if !marker.visible {
                host.set_marker_visible(marker.handle, true);
                marker.visible = true;
            }
            return false;
        }

        let style = self.styles.persistent;
        let resources = self.resources.persistent.get_or_insert_with(|| {
            let radius = style.radius_for(loaded.bounds());
            host.create_resources(MarkerKind::Persistent, &style, radius)
        });
        let handle = host.add_marker(MarkerKind::Persistent, resources);
        host.place_marker(handle, position);
        host.set_marker_visible(handle, true);

        let key = self.markers.insert(PersistentMarker {
            point: id.clone(),
            handle,
            position,
            visible: true,
        });
        self.by_point.insert(id.clone(), key);
        true
    }

    fn ensure_highlight_marker(&mut self, loaded: &LoadedModel, host: &mut H) {
        if self.highlight.marker().is_some() {
            return;
        }
        let style = self.styles.highlight;
        let resources = self.resources.highlight.get_or_insert_with(|| {
            let radius = style.radius_for(loaded.bounds());
            host.create_resources(MarkerKind::Highlight, &style, radius)
        });
        let handle = host.add_marker(MarkerKind::Highlight, resources);
        host.set_marker_visible(handle, false);
        self.highlight.attach(handle);
    }
}
