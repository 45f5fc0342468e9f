use std::time::Instant;

use crate::catalog::{PointCatalog, PointFilter};
use crate::config::LocatorConfig;
use crate::error::{LoadError, ResolveError, Result};
use crate::marker::{ActiveSummary, HighlightRequest, MarkerManager, RenderHost};
use crate::math::Aabb;
use crate::model::{LoadedModel, Model};
use crate::point::PointId;
use crate::resolve::Resolution;
use crate::status::{Status, StatusSink};

/// Progress of the model load.
///
/// Only `Ready` carries a model; every other state resolves nothing.
#[derive(Debug)]
pub enum LoadState {
    Unready,
    Loading,
    Parsing,
    Ready(LoadedModel),
    /// The load attempt failed; stays here until a new attempt starts.
    Failed(String),
}

impl LoadState {
    #[must_use]
    pub fn loaded(&self) -> Option<&LoadedModel> {
        match self {
            Self::Ready(loaded) => Some(loaded),
            _ => None,
        }
    }
}

/// Entry point for the UI layer.
///
/// Owns the render host, the status sink, the data provider's catalog and
/// the marker manager, and sequences them through the model load.
pub struct PointLocator<H: RenderHost, S: StatusSink> {
    host: H,
    status: S,
    catalog: PointCatalog,
    markers: MarkerManager<H>,
    state: LoadState,
    requested: Vec<PointId>,
}

impl<H: RenderHost, S: StatusSink> PointLocator<H, S> {
    #[must_use]
    pub fn new(host: H, status: S, catalog: PointCatalog, config: &LocatorConfig) -> Self {
        Self {
            host,
            status,
            catalog,
            markers: MarkerManager::new(config),
            state: LoadState::Unready,
            requested: Vec::new(),
        }
    }

    // --- Load lifecycle ---

    /// Starts a load attempt.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InProgress` while a load is running and
    /// `LoadError::AlreadyFinished` once a model is loaded.
    pub fn begin_load(&mut self) -> Result<()> {
        match self.state {
            LoadState::Unready | LoadState::Failed(_) => {
                self.state = LoadState::Loading;
                self.report(Status::Loading);
                Ok(())
            }
            LoadState::Loading | LoadState::Parsing => Err(LoadError::InProgress.into()),
            LoadState::Ready(_) => Err(LoadError::AlreadyFinished.into()),
        }
    }

    /// The host started fetching the asset.
    pub fn downloading(&mut self) {
        if matches!(self.state, LoadState::Loading) {
            self.report(Status::Downloading);
        }
    }

    /// The host started parsing the fetched asset.
    pub fn parsing(&mut self) {
        if matches!(self.state, LoadState::Loading) {
            self.state = LoadState::Parsing;
            self.report(Status::Parsing);
        }
    }

    /// The host finished loading: indexes the model and re-applies the last
    /// requested active set.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::AlreadyFinished` if a model is already loaded and
    /// `LoadError::NotLoading` if no attempt is running.
    pub fn model_loaded(&mut self, model: Model, bounds: Aabb, animations: usize) -> Result<()> {
        self.ensure_loading()?;
        let loaded = LoadedModel::new(model, bounds);
        tracing::info!(
            nodes = loaded.model().len(),
            keys = loaded.index().len(),
            animations,
            "model ready"
        );
        self.state = LoadState::Ready(loaded);
        self.report(Status::Loaded { animations });
        self.apply_requested();
        Ok(())
    }

    /// The host failed to load the model. No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::AlreadyFinished` if a model is already loaded and
    /// `LoadError::NotLoading` if no attempt is running. The state is left
    /// unchanged in both cases.
    pub fn load_failed(&mut self, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        if let Err(err) = self.ensure_loading() {
            tracing::warn!(%message, %err, "load failure ignored");
            return Err(err.into());
        }
        tracing::error!(%message, "model load failed");
        self.report(Status::LoadFailed(message.clone()));
        self.state = LoadState::Failed(message);
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Why the last load attempt failed, if it did.
    #[must_use]
    pub fn load_error(&self) -> Option<LoadError> {
        match &self.state {
            LoadState::Failed(message) => Some(LoadError::Failed(message.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.loaded().is_some()
    }

    // --- UI entry points ---

    /// Makes `ids` the active set. Before the model is ready the set is only
    /// remembered, reported as still loading, and applied once loading
    /// completes.
    pub fn set_active_points(&mut self, ids: &[PointId]) -> Option<ActiveSummary> {
        self.requested = ids.to_vec();
        self.apply_requested()
    }

    /// Filters the catalog, activates the result and returns it for display.
    pub fn apply_filter(&mut self, filter: &PointFilter) -> Vec<PointId> {
        let ids = self.catalog.filter(filter);
        self.set_active_points(&ids);
        ids
    }

    /// Highlights a point, blinking until it times out or is cleared.
    ///
    /// # Errors
    ///
    /// Returns why the point could not be highlighted; the status sink has
    /// already been told.
    pub fn highlight_point(
        &mut self,
        request: &HighlightRequest,
        now: Instant,
    ) -> std::result::Result<Resolution, ResolveError> {
        if matches!(self.state, LoadState::Failed(_)) {
            self.report(Status::ModelUnavailable);
            return Err(ResolveError::ModelNotReady);
        }
        self.markers.highlight(
            request,
            self.state.loaded(),
            &mut self.host,
            &mut self.status,
            now,
        )
    }

    /// Highlights a catalog point, using its stored coordinate.
    ///
    /// # Errors
    ///
    /// See [`highlight_point`](Self::highlight_point).
    pub fn highlight_id(
        &mut self,
        id: &PointId,
        now: Instant,
    ) -> std::result::Result<Resolution, ResolveError> {
        let request = self.catalog.highlight_request(id);
        self.highlight_point(&request, now)
    }

    pub fn clear_highlight(&mut self) {
        self.markers.clear(&mut self.host);
    }

    /// Frame hook: advances the highlight timers.
    pub fn tick(&mut self, now: Instant) {
        self.markers.tick(&mut self.host, now);
    }

    // --- Accessors ---

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn status(&self) -> &S {
        &self.status
    }

    #[must_use]
    pub fn catalog(&self) -> &PointCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn markers(&self) -> &MarkerManager<H> {
        &self.markers
    }

    /// The active set as last requested by the UI.
    #[must_use]
    pub fn requested(&self) -> &[PointId] {
        &self.requested
    }

    fn ensure_loading(&self) -> std::result::Result<(), LoadError> {
        match self.state {
            LoadState::Loading | LoadState::Parsing => Ok(()),
            LoadState::Ready(_) => Err(LoadError::AlreadyFinished),
            LoadState::Unready | LoadState::Failed(_) => Err(LoadError::NotLoading),
        }
    }

    /// Applies the remembered active set. Without a model the set stays
    /// deferred and the user is told why nothing is shown yet.
    fn apply_requested(&mut self) -> Option<ActiveSummary> {
        if self.state.loaded().is_none() {
            let status = match self.state {
                LoadState::Failed(_) => Status::ModelUnavailable,
                _ => Status::StillLoading,
            };
            tracing::debug!(count = self.requested.len(), "active set deferred");
            self.report(status);
            return None;
        }
        self.markers
            .set_active(
                &self.requested,
                &self.catalog,
                self.state.loaded(),
                &mut self.host,
                &mut self.status,
            )
            .ok()
    }

    fn report(&mut self, status: Status) {
        tracing::debug!(%status, "status");
        self.status.report(status);
    }
}
