use crate::config::MarkerStyle;
use crate::math::Point3;
use crate::resolve::LocalFrame;

/// The two kinds of marker the manager places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Tracks membership of one point in the active set.
    Persistent,
    /// The single blinking marker for the selected point.
    Highlight,
}

/// Scene operations the marker manager needs from the render host.
///
/// The host owns the scene graph, geometry and materials; the manager only
/// asks for resources once per kind and then adds, moves and toggles
/// markers that reference them.
pub trait RenderHost: LocalFrame {
    /// Shared geometry and material for one marker kind.
    type Resources;
    /// Handle to a marker object in the scene.
    type Marker: Copy;

    /// Allocates the shared resources for `kind`. Called at most once per kind
    /// per [`MarkerManager`](super::MarkerManager).
    fn create_resources(
        &mut self,
        kind: MarkerKind,
        style: &MarkerStyle,
        radius: f64,
    ) -> Self::Resources;

    /// Adds a hidden marker using `resources` to the model's group.
    fn add_marker(&mut self, kind: MarkerKind, resources: &Self::Resources) -> Self::Marker;

    /// Moves a marker, in the model group's local space.
    fn place_marker(&mut self, marker: Self::Marker, position: Point3);

    fn set_marker_visible(&mut self, marker: Self::Marker, visible: bool);
}
