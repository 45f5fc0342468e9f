//! Anatomical point identifiers and their 2D reference coordinates.

pub mod alias;

pub use alias::{AliasTable, GenerateAliases};

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Case-insensitive identifier of an anatomical point, e.g. `LI4`.
///
/// Stored uppercased so that `li4`, `Li4` and `LI4` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PointId(String);

impl PointId {
    /// Creates a point id, normalizing to uppercase.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// The normalized (uppercase) identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a `<letters><digits>` identifier into its meridian prefix and
    /// number. Returns `None` for any other shape.
    #[must_use]
    pub fn meridian_number(&self) -> Option<(&str, &str)> {
        split_prefix_number(&self.0)
            .filter(|(_, _, rest)| rest.is_empty())
            .map(|(p, n, _)| (p, n))
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PointId {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for PointId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<PointId> for String {
    fn from(id: PointId) -> Self {
        id.0
    }
}

/// Which reference image a coordinate was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => f.write_str("front"),
            Self::Back => f.write_str("back"),
        }
    }
}

/// A position on the front- or back-view schematic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub side: Side,
}

impl Coordinate {
    #[must_use]
    pub fn new(x: f64, y: f64, side: Side) -> Self {
        Self { x, y, side }
    }

    #[must_use]
    pub fn front(x: f64, y: f64) -> Self {
        Self::new(x, y, Side::Front)
    }

    #[must_use]
    pub fn back(x: f64, y: f64) -> Self {
        Self::new(x, y, Side::Back)
    }
}

/// Supplies the reference coordinate of a point, if it has one.
pub trait CoordinateSource {
    fn coordinate(&self, id: &PointId) -> Option<Coordinate>;
}

impl<S: BuildHasher> CoordinateSource for HashMap<PointId, Coordinate, S> {
    fn coordinate(&self, id: &PointId) -> Option<Coordinate> {
        self.get(id).copied()
    }
}

/// Source for callers that only place points by node.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCoordinates;

impl CoordinateSource for NoCoordinates {
    fn coordinate(&self, _id: &PointId) -> Option<Coordinate> {
        None
    }
}

/// Splits `s` into a leading ASCII-letter run, the digit run that follows it
/// and whatever remains. Both runs must be non-empty.
pub(crate) fn split_prefix_number(s: &str) -> Option<(&str, &str, &str)> {
    let letters = s.bytes().take_while(u8::is_ascii_uppercase).count();
    if letters == 0 {
        return None;
    }
    let digits = s[letters..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let (prefix, rest) = s.split_at(letters);
    let (num, tail) = rest.split_at(digits);
    Some((prefix, num, tail))
}

/// Left-pads a digit string with zeros to two characters.
///
/// Longer numbers are returned unchanged.
pub(crate) fn pad2(num: &str) -> String {
    format!("{num:0>2}")
}

/// Drops leading zeros, keeping a single `0` for an all-zero number.
pub(crate) fn trim_zeros(num: &str) -> &str {
    let trimmed = num.trim_start_matches('0');
    if trimmed.is_empty() && !num.is_empty() {
        &num[num.len() - 1..]
    } else {
        trimmed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn point_id_is_case_insensitive() {
        assert_eq!(PointId::new("li4"), PointId::new("LI4"));
        assert_eq!(PointId::new(" Lv3 ").as_str(), "LV3");
    }

    #[test]
    fn meridian_number_split() {
        let id = PointId::new("gb20");
        assert_eq!(id.meridian_number(), Some(("GB", "20")));
        assert_eq!(PointId::new("yintang").meridian_number(), None);
        assert_eq!(PointId::new("LI4_x").meridian_number(), None);
        assert_eq!(PointId::new("20").meridian_number(), None);
    }

    #[test]
    fn split_keeps_tail() {
        assert_eq!(split_prefix_number("LI4_HEGU"), Some(("LI", "4", "_HEGU")));
        assert_eq!(split_prefix_number("PT_LI4"), None);
    }

    #[test]
    fn padding_policy() {
        assert_eq!(pad2("4"), "04");
        assert_eq!(pad2("04"), "04");
        assert_eq!(pad2("123"), "123");
    }

    #[test]
    fn zero_trimming() {
        assert_eq!(trim_zeros("04"), "4");
        assert_eq!(trim_zeros("10"), "10");
        assert_eq!(trim_zeros("000"), "0");
    }

    #[test]
    fn map_with_custom_hasher_is_a_source() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::BuildHasherDefault;

        let mut coords: HashMap<PointId, Coordinate, BuildHasherDefault<DefaultHasher>> =
            HashMap::default();
        coords.insert(PointId::new("KI1"), Coordinate::back(45.0, 229.0));
        assert_eq!(
            coords.coordinate(&PointId::new("ki1")),
            Some(Coordinate::back(45.0, 229.0))
        );
        assert_eq!(coords.coordinate(&PointId::new("LI4")), None);
    }

    #[test]
    fn point_id_deserializes_uppercased() {
        let id: PointId = serde_json::from_str("\"st36\"").unwrap();
        assert_eq!(id.as_str(), "ST36");
    }
}
