mod aabb;

pub use aabb::Aabb;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Linear interpolation from `a` to `b` by `t` (unclamped).
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert!((lerp(-1.0, 1.0, 0.0) + 1.0).abs() < TOLERANCE);
        assert!((lerp(-1.0, 1.0, 1.0) - 1.0).abs() < TOLERANCE);
        assert!(lerp(-1.0, 1.0, 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn lerp_reversed_range() {
        // High-to-low interpolation, as used for image-space Y.
        assert!((lerp(1.0, -1.0, 0.25) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn lerp_extrapolates() {
        assert!((lerp(0.0, 2.0, 1.5) - 3.0).abs() < TOLERANCE);
    }
}
