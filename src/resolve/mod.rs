mod projection;

pub use projection::ProjectCoordinate;

use crate::config::ProjectionParams;
use crate::error::ResolveError;
use crate::math::Point3;
use crate::model::LoadedModel;
use crate::point::{AliasTable, Coordinate, GenerateAliases, PointId, Side};

/// Conversion from world space into the space markers are placed in.
///
/// Implemented by the render host; markers live under the model's group,
/// which may itself be transformed.
pub trait LocalFrame {
    fn world_to_local(&self, world: Point3) -> Point3;
}

/// Frame whose local space is world space.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorldFrame;

impl LocalFrame for WorldFrame {
    fn world_to_local(&self, world: Point3) -> Point3 {
        world
    }
}

/// Whether a coordinate may stand in for a missing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Project the coordinate when no node matches.
    Permitted,
    /// Never substitute a projection; report the missing node instead.
    Blocked,
}

/// Where a resolved position came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Matched a model node under this alias.
    Node { alias: String },
    /// Projected from a reference-image coordinate.
    Projected { side: Side },
}

/// A resolved marker position, in the local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub position: Point3,
    pub source: Source,
}

/// Resolves a point id to a marker position.
///
/// A node matched through [`GenerateAliases`] always wins; a supplied
/// coordinate is only projected when no alias matches and the fallback is
/// [`Fallback::Permitted`].
pub struct ResolvePosition<'a> {
    id: &'a PointId,
    coordinate: Option<Coordinate>,
    fallback: Fallback,
    aliases: &'a AliasTable,
    projection: ProjectionParams,
}

impl<'a> ResolvePosition<'a> {
    /// Creates a new `ResolvePosition` operation with no coordinate, the
    /// built-in alias table and the fallback permitted.
    #[must_use]
    pub fn new(id: &'a PointId) -> Self {
        Self {
            id,
            coordinate: None,
            fallback: Fallback::Permitted,
            aliases: AliasTable::builtin(),
            projection: ProjectionParams::default(),
        }
    }

    #[must_use]
    pub fn with_coordinate(mut self, coordinate: Option<Coordinate>) -> Self {
        self.coordinate = coordinate;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: &'a AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionParams) -> Self {
        self.projection = projection;
        self
    }

    /// Executes the resolution against a loaded model.
    ///
    /// # Errors
    ///
    /// - `ResolveError::ModelNotReady` if `loaded` is `None`.
    /// - `ResolveError::NodeUnresolved` if no alias matched, a coordinate was
    ///   supplied and the fallback is blocked.
    /// - `ResolveError::NoPositionData` if no alias matched and no coordinate
    ///   could be used.
    pub fn execute<F>(
        &self,
        loaded: Option<&LoadedModel>,
        frame: &F,
    ) -> Result<Resolution, ResolveError>
    where
        F: LocalFrame + ?Sized,
    {
        let Some(loaded) = loaded else {
            return Err(ResolveError::ModelNotReady);
        };

        let aliases = GenerateAliases::new(self.id).with_table(self.aliases).execute();

        let matched = aliases.iter().find_map(|alias| {
            let node = loaded.index().lookup(alias)?;
            match loaded.model().world_position(node) {
                Ok(world) => Some((alias, world)),
                Err(err) => {
                    tracing::warn!(id = %self.id, %alias, %err, "indexed node has no position");
                    None
                }
            }
        });

        if let Some((alias, world)) = matched {
            tracing::debug!(id = %self.id, %alias, "resolved via node");
            return Ok(Resolution {
                position: frame.world_to_local(world),
                source: Source::Node {
                    alias: alias.clone(),
                },
            });
        }

        match (self.coordinate, self.fallback) {
            (Some(coordinate), Fallback::Permitted) => {
                let position = ProjectCoordinate::new(coordinate)
                    .with_params(self.projection)
                    .execute(loaded.bounds());
                tracing::debug!(id = %self.id, side = %coordinate.side, "resolved via coordinate");
                Ok(Resolution {
                    position,
                    source: Source::Projected {
                        side: coordinate.side,
                    },
                })
            }
            (Some(coordinate), Fallback::Blocked) => {
                tracing::warn!(
                    id = %self.id,
                    x = coordinate.x,
                    y = coordinate.y,
                    ?aliases,
                    "node not found, coordinate fallback blocked"
                );
                Err(ResolveError::NodeUnresolved {
                    id: self.id.clone(),
                    aliases,
                })
            }
            (None, _) => {
                tracing::debug!(id = %self.id, ?aliases, "no node or coordinate");
                Err(ResolveError::NoPositionData {
                    id: self.id.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Aabb, Matrix4, Vector3};
    use crate::model::Model;
    use approx::assert_relative_eq;

    fn translation(x: f64, y: f64, z: f64) -> Matrix4 {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    fn body(nodes: &[(&str, [f64; 3])]) -> LoadedModel {
        let mut model = Model::new();
        let root = model.add_root("Body", translation(0.0, 0.1, 0.0));
        for (name, [x, y, z]) in nodes {
            model.add_child(root, *name, translation(*x, *y, *z)).unwrap();
        }
        let bounds = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        LoadedModel::new(model, bounds)
    }

    /// Local frame offset from world by a fixed translation.
    struct Shifted(Vector3);

    impl LocalFrame for Shifted {
        fn world_to_local(&self, world: Point3) -> Point3 {
            world - self.0
        }
    }

    #[test]
    fn node_match_wins_over_coordinate() {
        let loaded = body(&[("PT_LI4", [0.3, 0.2, 0.1])]);
        let id = PointId::new("li4");
        let r = ResolvePosition::new(&id)
            .with_coordinate(Some(Coordinate::front(50.0, 0.0)))
            .execute(Some(&loaded), &WorldFrame)
            .unwrap();
        assert_eq!(r.source, Source::Node { alias: "PT_LI4".into() });
        assert_relative_eq!(r.position, Point3::new(0.3, 0.3, 0.1), epsilon = 1e-12);
    }

    #[test]
    fn node_position_is_converted_to_local_frame() {
        let loaded = body(&[("PT_ST36", [0.0, -0.5, 0.0])]);
        let id = PointId::new("ST36");
        let r = ResolvePosition::new(&id)
            .execute(Some(&loaded), &Shifted(Vector3::new(0.0, 0.1, 0.0)))
            .unwrap();
        assert_relative_eq!(r.position, Point3::new(0.0, -0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn synonyms_resolve_to_the_same_node() {
        let loaded = body(&[("PT_LV3", [0.1, -0.9, 0.2])]);
        let lv = PointId::new("LV3");
        let lr = PointId::new("LR3");
        let a = ResolvePosition::new(&lv).execute(Some(&loaded), &WorldFrame).unwrap();
        let b = ResolvePosition::new(&lr).execute(Some(&loaded), &WorldFrame).unwrap();
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn descriptive_node_name_is_found() {
        let loaded = body(&[("LI4_Hegu", [0.4, 0.0, 0.0])]);
        let id = PointId::new("LI4");
        let r = ResolvePosition::new(&id).execute(Some(&loaded), &WorldFrame).unwrap();
        // The padded prefixed form registered for `LI4_HEGU` outranks the bare id.
        assert_eq!(r.source, Source::Node { alias: "PT_LI04".into() });
    }

    #[test]
    fn coordinate_fallback_when_permitted() {
        let loaded = body(&[]);
        let id = PointId::new("KI1");
        let r = ResolvePosition::new(&id)
            .with_coordinate(Some(Coordinate::back(50.0, 230.0)))
            .execute(Some(&loaded), &WorldFrame)
            .unwrap();
        assert_eq!(r.source, Source::Projected { side: Side::Back });
        assert_relative_eq!(r.position.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.position.y, -1.0, epsilon = 1e-12);
        assert!(r.position.z < -1.0);
    }

    #[test]
    fn coordinate_fallback_blocked() {
        let loaded = body(&[]);
        let id = PointId::new("KI1");
        let err = ResolvePosition::new(&id)
            .with_coordinate(Some(Coordinate::front(10.0, 10.0)))
            .with_fallback(Fallback::Blocked)
            .execute(Some(&loaded), &WorldFrame)
            .unwrap_err();
        let ResolveError::NodeUnresolved { id, aliases } = err else {
            panic!("expected NodeUnresolved");
        };
        assert_eq!(id.as_str(), "KI1");
        assert!(aliases.contains(&"PT_KI01".to_owned()));
    }

    #[test]
    fn unknown_point_without_coordinate() {
        let loaded = body(&[("PT_LI4", [0.0, 0.0, 0.0])]);
        let id = PointId::new("XX9");
        let err = ResolvePosition::new(&id).execute(Some(&loaded), &WorldFrame).unwrap_err();
        assert_eq!(err, ResolveError::NoPositionData { id: PointId::new("XX9") });
        assert!(err.to_string().contains("XX9"));
    }

    #[test]
    fn not_ready_without_model() {
        let id = PointId::new("LI4");
        let err = ResolvePosition::new(&id)
            .with_coordinate(Some(Coordinate::front(50.0, 0.0)))
            .execute(None, &WorldFrame)
            .unwrap_err();
        assert_eq!(err, ResolveError::ModelNotReady);
    }
}
