//! Human-readable state messages for a UI status label.

use std::fmt;

use crate::error::ResolveError;
use crate::point::PointId;

/// A state transition worth surfacing to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    Downloading,
    Parsing,
    /// Model ready; carries the number of animation clips started by the host.
    Loaded { animations: usize },
    LoadFailed(String),
    /// A request arrived before the model finished loading.
    StillLoading,
    /// A request arrived after the model failed to load.
    ModelUnavailable,
    /// The highlight was placed on the named node.
    Highlighted { node: String },
    /// No node matched and the coordinate fallback was not used.
    FallbackBlocked { id: PointId },
    /// Neither a node nor a coordinate exists for the point.
    Unresolved { id: PointId },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("loading..."),
            Self::Downloading => f.write_str("downloading..."),
            Self::Parsing => f.write_str("parsing..."),
            Self::Loaded { animations: 0 } => f.write_str("loaded"),
            Self::Loaded { animations } => write!(f, "loaded: {animations} animation(s)"),
            Self::LoadFailed(msg) => write!(f, "failed to load model: {msg}"),
            Self::StillLoading => f.write_str("3D model still loading, try again shortly"),
            Self::ModelUnavailable => f.write_str("3D model unavailable"),
            Self::Highlighted { node } => write!(f, "highlight: {node}"),
            Self::FallbackBlocked { id } => {
                write!(f, "node not found (2D fallback disabled): {id}")
            }
            Self::Unresolved { id } => write!(f, "no node or coordinate: {id}"),
        }
    }
}

impl From<&ResolveError> for Status {
    fn from(err: &ResolveError) -> Self {
        match err {
            ResolveError::ModelNotReady => Self::StillLoading,
            ResolveError::NodeUnresolved { id, .. } => Self::FallbackBlocked { id: id.clone() },
            ResolveError::NoPositionData { id } => Self::Unresolved { id: id.clone() },
        }
    }
}

/// One-directional sink for [`Status`] messages.
pub trait StatusSink {
    fn report(&mut self, status: Status);
}

impl<F: FnMut(Status)> StatusSink for F {
    fn report(&mut self, status: Status) {
        self(status);
    }
}

/// Sink that keeps every message, newest last.
#[derive(Debug, Default, Clone)]
pub struct StatusLog {
    entries: Vec<Status>,
}

impl StatusLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[Status] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&Status> {
        self.entries.last()
    }
}

impl StatusSink for StatusLog {
    fn report(&mut self, status: Status) {
        self.entries.push(status);
    }
}
