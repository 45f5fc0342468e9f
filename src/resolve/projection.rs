use crate::config::ProjectionParams;
use crate::math::{lerp, Aabb, Point3};
use crate::point::{Coordinate, Side};

/// Projects a reference-image coordinate onto the model's bounding box.
///
/// `x` maps `min.x → max.x`. `y` maps `max.y → min.y`, since image-space
/// `y = 0` is the top of the figure. The point is pushed just outside the
/// front (`+z`) or back (`-z`) face so it is not hidden inside the mesh.
pub struct ProjectCoordinate {
    coordinate: Coordinate,
    params: ProjectionParams,
}

impl ProjectCoordinate {
    /// Creates a new `ProjectCoordinate` operation with default parameters.
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            params: ProjectionParams::default(),
        }
    }

    /// Sets custom projection parameters.
    #[must_use]
    pub fn with_params(mut self, params: ProjectionParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the projection against `bounds`.
    #[must_use]
    pub fn execute(&self, bounds: &Aabb) -> Point3 {
        let c = &self.coordinate;
        let x_norm = c.x / self.params.reference_width;
        let y_norm = c.y / self.params.reference_height;

        let x = lerp(bounds.min.x, bounds.max.x, x_norm);
        let y = lerp(bounds.max.y, bounds.min.y, y_norm);

        let depth = bounds.max.z - bounds.min.z;
        let pad = (depth * self.params.depth_pad_ratio).max(self.params.min_depth_pad);
        let z = match c.side {
            Side::Front => bounds.max.z + pad,
            Side::Back => bounds.min.z - pad,
        };

        Point3::new(x, y, z)
    }
}
