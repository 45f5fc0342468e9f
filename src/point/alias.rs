use std::collections::HashMap;
use std::sync::OnceLock;

use super::{pad2, trim_zeros, PointId};

/// Prefix reserved for point nodes in authored body models.
pub const NODE_PREFIX: &str = "PT_";

/// Meridian ranges whose nodes are authored without zero padding.
const UNPADDED_RANGES: &[(&str, u32)] = &[("LI", 20), ("ST", 36)];

/// Individually pinned points, authored as `PT_<id>`.
const PINNED: &[&str] = &[
    "PC6", "HT7", "SP6", "GB20", "GB21", "BL40", "KI3", "CV12",
];

/// Points known under several historical or regional names.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &["LV3", "LR3"],
    &["GV20", "DU20"],
    &["TE5", "TB5", "SJ5"],
    &["GV16", "DU16"],
];

/// Explicit point id → node name overrides.
///
/// Built from synonym groups, so lookups are symmetric: if `A` lists `B`,
/// resolving `B` also probes `A`'s node.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, Vec<String>>,
}

impl AliasTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the crate.
    pub fn builtin() -> &'static Self {
        static TABLE: OnceLock<AliasTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = Self::new();
            for &(prefix, last) in UNPADDED_RANGES {
                for n in 1..=last {
                    table.pin(&format!("{prefix}{n}"));
                }
            }
            for id in PINNED {
                table.pin(id);
            }
            for group in SYNONYM_GROUPS {
                table.add_group(group.iter().copied());
            }
            table
        })
    }

    /// Registers `PT_<id>` as the preferred node name for `id`.
    pub fn pin(&mut self, id: &str) {
        let key = PointId::new(id);
        let node = format!("{NODE_PREFIX}{key}");
        self.push(key.as_str(), node);
    }

    /// Registers a synonym group. Each member probes its own node first,
    /// then the other members' nodes in group order.
    pub fn add_group<'a, I>(&mut self, members: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let members: Vec<PointId> = members.into_iter().map(PointId::new).collect();
        for (i, member) in members.iter().enumerate() {
            let own = std::iter::once(member);
            let others = members
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, m)| m);
            for synonym in own.chain(others) {
                self.push(member.as_str(), format!("{NODE_PREFIX}{synonym}"));
            }
        }
    }

    /// Node names registered for `id`, in priority order.
    #[must_use]
    pub fn lookup(&self, id: &PointId) -> &[String] {
        self.entries.get(id.as_str()).map_or(&[], Vec::as_slice)
    }

    /// Number of point ids with explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, key: &str, node: String) {
        let list = self.entries.entry(key.to_owned()).or_default();
        if !list.contains(&node) {
            list.push(node);
        }
    }
}

/// Produces the ordered list of node names a point may be authored under.
///
/// The first candidate present in a [`NodeIndex`](crate::model::NodeIndex)
/// wins, so order is match priority:
///
/// 1. explicit [`AliasTable`] entries,
/// 2. `PT_` forms: padded, as written, padded, zero-trimmed,
/// 3. the raw id,
/// 4. the same forms without `PT_`.
///
/// Numbers are always padded to two digits.
pub struct GenerateAliases<'a> {
    id: &'a PointId,
    table: &'a AliasTable,
}

impl<'a> GenerateAliases<'a> {
    /// Creates a new `GenerateAliases` operation against the built-in table.
    #[must_use]
    pub fn new(id: &'a PointId) -> Self {
        Self {
            id,
            table: AliasTable::builtin(),
        }
    }

    /// Uses a custom alias table.
    #[must_use]
    pub fn with_table(mut self, table: &'a AliasTable) -> Self {
        self.table = table;
        self
    }

    /// Executes the generation, returning deduplicated candidates.
    #[must_use]
    pub fn execute(&self) -> Vec<String> {
        let raw = self.id.as_str();
        let mut out: Vec<String> = self.table.lookup(self.id).to_vec();

        if let Some((prefix, num)) = self.id.meridian_number() {
            let padded = pad2(num);
            let trimmed = trim_zeros(num);
            let bare = [
                format!("{prefix}{padded}"),
                format!("{prefix}{num}"),
                format!("{prefix}{padded}"),
                format!("{prefix}{trimmed}"),
            ];
            out.extend(bare.iter().map(|b| format!("{NODE_PREFIX}{b}")));
            out.push(raw.to_owned());
            out.extend(bare);
        } else {
            out.push(raw.to_owned());
        }

        dedup_in_order(out)
    }
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items.into_iter().filter(|s| seen.insert(s.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases(id: &str) -> Vec<String> {
        GenerateAliases::new(&PointId::new(id)).execute()
    }

    #[test]
    fn unmapped_point_prefers_padded_node() {
        assert_eq!(
            aliases("lu1"),
            ["PT_LU01", "PT_LU1", "LU1", "LU01"].map(String::from)
        );
    }

    #[test]
    fn pinned_point_prefers_table_entry() {
        let list = aliases("LI4");
        assert_eq!(list[0], "PT_LI4");
        assert_eq!(list[1], "PT_LI04");
        assert!(list.contains(&"LI4".to_owned()));
    }

    #[test]
    fn padded_input_also_probes_trimmed_forms() {
        assert_eq!(
            aliases("KI03"),
            ["PT_KI03", "PT_KI3", "KI03", "KI3"].map(String::from)
        );
    }

    #[test]
    fn three_digit_number_is_not_padded_further() {
        assert_eq!(aliases("BL100")[0], "PT_BL100");
    }

    #[test]
    fn synonym_group_is_symmetric() {
        let lv = aliases("LV3");
        let lr = aliases("LR3");
        assert_eq!(&lv[..2], ["PT_LV3", "PT_LR3"]);
        assert_eq!(&lr[..2], ["PT_LR3", "PT_LV3"]);
    }

    #[test]
    fn three_way_group_keeps_group_order() {
        assert_eq!(&aliases("SJ5")[..3], ["PT_SJ5", "PT_TE5", "PT_TB5"]);
        assert_eq!(&aliases("TB5")[..3], ["PT_TB5", "PT_TE5", "PT_SJ5"]);
    }

    #[test]
    fn non_pattern_id_falls_back_to_raw() {
        assert_eq!(aliases("yintang"), ["YINTANG"]);
    }

    #[test]
    fn custom_table_entries_take_priority() {
        let mut table = AliasTable::new();
        table.add_group(["EX1", "YINTANG"]);
        let id = PointId::new("yintang");
        let list = GenerateAliases::new(&id).with_table(&table).execute();
        assert_eq!(list, ["PT_YINTANG", "PT_EX1", "YINTANG"]);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(aliases("GV20"), aliases("gv20"));
        assert_eq!(aliases("TE5"), aliases("TE5"));
    }

    #[test]
    fn no_duplicates() {
        let list = aliases("ST36");
        let mut sorted = list.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), list.len());
    }

    #[test]
    fn builtin_table_contents() {
        let table = AliasTable::builtin();
        assert_eq!(table.lookup(&PointId::new("ST36")), ["PT_ST36"]);
        assert_eq!(table.lookup(&PointId::new("DU20")), ["PT_DU20", "PT_GV20"]);
        assert!(table.lookup(&PointId::new("LU1")).is_empty());
    }
}
