use super::{Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a bounding box from two corners, in any order.
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Largest of the three extents.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.size().max()
    }
}
