use crate::error::ConfigError;
use crate::{RegionName, TeamEntry, TeamSlot};
use serde::Serialize;
use std::fmt;

/// Seeds in first-round bracket order: 1v16, 8v9, 5v12, 4v13, 6v11, 3v14, 7v10, 2v15.
///
/// Adjacent pairs are the first-round games, and slot `i` of each later round
/// is the winner of slots `2i` and `2i + 1` of the round before it.
pub const FIRST_ROUND_SEEDS: [u8; 16] = [1, 16, 8, 9, 5, 12, 4, 13, 6, 11, 3, 14, 7, 10, 2, 15];

pub const REGION_SIZE: usize = FIRST_ROUND_SEEDS.len();

/// The 16 seeded teams of one region, held in first-round bracket order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedTable {
    region: RegionName,
    entries: Vec<TeamEntry>,
}

impl SeedTable {
    /// Build a table from entries in any order. The seeds must be exactly
    /// 1..=16, each once.
    pub fn new(region: RegionName, entries: Vec<TeamEntry>) -> Result<Self, ConfigError> {
        if entries.len() != REGION_SIZE {
            return Err(ConfigError::WrongSlotCount { region, count: entries.len() });
        }

        let mut by_seed: [Option<TeamEntry>; REGION_SIZE] = Default::default();
        for entry in entries {
            if !(1..=REGION_SIZE as u8).contains(&entry.seed) {
                return Err(ConfigError::SeedOutOfRange { region, seed: entry.seed });
            }
            let cell = &mut by_seed[usize::from(entry.seed) - 1];
            if cell.is_some() {
                return Err(ConfigError::DuplicateSeed { region, seed: entry.seed });
            }
            *cell = Some(entry);
        }

        // 16 entries, 16 distinct in-range seeds: every cell is filled.
        let entries = FIRST_ROUND_SEEDS
            .iter()
            .filter_map(|&seed| by_seed[usize::from(seed) - 1].take())
            .collect();

        Ok(Self { region, entries })
    }

    /// A table with every seed present and every name blank.
    pub fn empty(region: RegionName) -> Self {
        Self {
            region,
            entries: FIRST_ROUND_SEEDS.iter().map(|&seed| TeamEntry::new(seed, "")).collect(),
        }
    }

    pub fn region(&self) -> RegionName {
        self.region
    }

    /// Entries in first-round bracket order.
    pub fn entries(&self) -> &[TeamEntry] {
        &self.entries
    }

    /// Entries as seeded bracket slots, in first-round bracket order.
    pub fn slots(&self) -> Vec<TeamSlot> {
        self.entries
            .iter()
            .map(|e| TeamSlot { seed: Some(e.seed), name: e.name.clone(), advanced: false })
            .collect()
    }

    pub fn seed_of(&self, name: &str) -> Option<u8> {
        if name.is_empty() {
            return None;
        }
        self.entries.iter().find(|e| e.name == name).map(|e| e.seed)
    }

    pub fn name_at(&self, seed: u8) -> Option<&str> {
        self.entries.iter().find(|e| e.seed == seed).map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seed_of(name).is_some()
    }

    /// Copy of this table with the team at `seed` replaced.
    pub fn with_occupant(&self, seed: u8, name: &str) -> Self {
        let mut table = self.clone();
        if let Some(entry) = table.entries.iter_mut().find(|e| e.seed == seed) {
            entry.name = name.to_string();
        }
        table
    }
}

// ---------------------------------------------------------------------------
// Seed tiers
// ---------------------------------------------------------------------------

/// Fixed, non-overlapping seed bands used to break a pool down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SeedTier {
    Top,      // 1-5
    Mid,      // 6-9
    LowerMid, // 10-12
    Bottom,   // 13-16
}

impl SeedTier {
    pub const ALL: [SeedTier; 4] = [SeedTier::Top, SeedTier::Mid, SeedTier::LowerMid, SeedTier::Bottom];

    pub fn from_seed(seed: u8) -> Self {
        match seed {
            0..=5 => SeedTier::Top,
            6..=9 => SeedTier::Mid,
            10..=12 => SeedTier::LowerMid,
            _ => SeedTier::Bottom,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeedTier::Top => "Top 5 seeds",
            SeedTier::Mid => "Seeds 6-9",
            SeedTier::LowerMid => "Seeds 10-12",
            SeedTier::Bottom => "Seeds 13-16",
        }
    }
}

impl fmt::Display for SeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A region listed 1..=16 ascending, named "<Region> <seed>".
    pub(crate) fn ascending_entries(region: RegionName) -> Vec<TeamEntry> {
        (1..=16).map(|seed| TeamEntry::new(seed, format!("{region} {seed}"))).collect()
    }

    #[test]
    fn table_is_stored_in_bracket_order() {
        let table = SeedTable::new(RegionName::East, ascending_entries(RegionName::East)).unwrap();
        let seeds: Vec<u8> = table.entries().iter().map(|e| e.seed).collect();
        assert_eq!(seeds, FIRST_ROUND_SEEDS.to_vec());
        assert_eq!(table.entries()[1].name, "East 16");
    }

    #[test]
    fn seeds_form_a_permutation_of_one_to_sixteen() {
        let table = SeedTable::new(RegionName::West, ascending_entries(RegionName::West)).unwrap();
        let mut seeds: Vec<u8> = table.entries().iter().map(|e| e.seed).collect();
        seeds.sort_unstable();
        assert_eq!(seeds, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn duplicate_seed_is_rejected() {
        let mut entries = ascending_entries(RegionName::South);
        entries[15].seed = 1;
        assert_eq!(
            SeedTable::new(RegionName::South, entries),
            Err(ConfigError::DuplicateSeed { region: RegionName::South, seed: 1 })
        );
    }

    #[test]
    fn out_of_range_seed_is_rejected() {
        let mut entries = ascending_entries(RegionName::South);
        entries[0].seed = 17;
        assert_eq!(
            SeedTable::new(RegionName::South, entries),
            Err(ConfigError::SeedOutOfRange { region: RegionName::South, seed: 17 })
        );
    }

    #[test]
    fn short_table_is_rejected() {
        let mut entries = ascending_entries(RegionName::Midwest);
        entries.pop();
        assert_eq!(
            SeedTable::new(RegionName::Midwest, entries),
            Err(ConfigError::WrongSlotCount { region: RegionName::Midwest, count: 15 })
        );
    }

    #[test]
    fn blank_names_never_resolve_a_seed() {
        let table = SeedTable::empty(RegionName::East);
        assert_eq!(table.seed_of(""), None);
        assert_eq!(table.name_at(16), Some(""));
    }

    #[test]
    fn with_occupant_leaves_original_untouched() {
        let table = SeedTable::new(RegionName::East, ascending_entries(RegionName::East)).unwrap();
        let replaced = table.with_occupant(16, "Play-in Winner");
        assert_eq!(replaced.name_at(16), Some("Play-in Winner"));
        assert_eq!(table.name_at(16), Some("East 16"));
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(SeedTier::from_seed(1), SeedTier::Top);
        assert_eq!(SeedTier::from_seed(5), SeedTier::Top);
        assert_eq!(SeedTier::from_seed(6), SeedTier::Mid);
        assert_eq!(SeedTier::from_seed(9), SeedTier::Mid);
        assert_eq!(SeedTier::from_seed(10), SeedTier::LowerMid);
        assert_eq!(SeedTier::from_seed(12), SeedTier::LowerMid);
        assert_eq!(SeedTier::from_seed(13), SeedTier::Bottom);
        assert_eq!(SeedTier::from_seed(16), SeedTier::Bottom);
    }
}
