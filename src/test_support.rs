//! Test doubles shared by unit tests.
#![allow(clippy::unwrap_used)]

use crate::config::MarkerStyle;
use crate::marker::{MarkerKind, RenderHost};
use crate::math::{Aabb, Matrix4, Point3, Vector3};
use crate::model::{LoadedModel, Model};
use crate::resolve::LocalFrame;

/// A marker as the recording host sees it.
#[derive(Debug, Clone)]
pub(crate) struct HostMarker {
    pub kind: MarkerKind,
    pub resources: usize,
    pub position: Option<Point3>,
    pub visible: bool,
}

/// Render host that records every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    /// World position of the marker group's origin.
    pub group_origin: Vector3,
    pub resources: Vec<(MarkerKind, f64)>,
    pub markers: Vec<HostMarker>,
}

impl RecordingHost {
    pub fn visible_count(&self, kind: MarkerKind) -> usize {
        self.markers.iter().filter(|m| m.kind == kind && m.visible).count()
    }

    pub fn count(&self, kind: MarkerKind) -> usize {
        self.markers.iter().filter(|m| m.kind == kind).count()
    }
}

impl LocalFrame for RecordingHost {
    fn world_to_local(&self, world: Point3) -> Point3 {
        world - self.group_origin
    }
}

impl RenderHost for RecordingHost {
    type Resources = usize;
    type Marker = usize;

    fn create_resources(
        &mut self,
        kind: MarkerKind,
        _style: &MarkerStyle,
        radius: f64,
    ) -> usize {
        self.resources.push((kind, radius));
        self.resources.len() - 1
    }

    fn add_marker(&mut self, kind: MarkerKind, resources: &usize) -> usize {
        self.markers.push(HostMarker {
            kind,
            resources: *resources,
            position: None,
            visible: false,
        });
        self.markers.len() - 1
    }

    fn place_marker(&mut self, marker: usize, position: Point3) {
        self.markers[marker].position = Some(position);
    }

    fn set_marker_visible(&mut self, marker: usize, visible: bool) {
        self.markers[marker].visible = visible;
    }
}

pub(crate) fn translation(x: f64, y: f64, z: f64) -> Matrix4 {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Unit-box body with a handful of point nodes.
pub(crate) fn body() -> LoadedModel {
    LoadedModel::new(body_model(), unit_box())
}

/// The nodes of [`body`], not yet indexed.
pub(crate) fn body_model() -> Model {
    let mut model = Model::new();
    let root = model.add_root("Body", Matrix4::identity());
    for (name, [x, y, z]) in [
        ("PT_LI4", [0.6, 0.0, 0.1]),
        ("PT_LV3", [0.2, -0.95, 0.3]),
        ("PT_ST36", [0.15, -0.5, 0.2]),
        ("GB20_Fengchi", [0.1, 0.9, -0.2]),
    ] {
        model.add_child(root, name, translation(x, y, z)).unwrap();
    }
    model
}

pub(crate) fn unit_box() -> Aabb {
    Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
}
