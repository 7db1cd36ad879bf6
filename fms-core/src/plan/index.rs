use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical slot of the flight plan store.
///
/// `Active` and `Temporary` are fixed; secondary slots are numbered from zero
/// and bounded by the configured [`SlotLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanIndex {
    Active,
    Temporary,
    Secondary(u8),
}

impl PlanIndex {
    const FIRST_SECONDARY: usize = 2;

    pub fn raw(&self) -> usize {
        match self {
            PlanIndex::Active => 0,
            PlanIndex::Temporary => 1,
            PlanIndex::Secondary(n) => Self::FIRST_SECONDARY + usize::from(*n),
        }
    }

    /// Returns `None` for raw values past the largest representable secondary.
    pub fn from_raw(raw: usize) -> Option<Self> {
        match raw {
            0 => Some(PlanIndex::Active),
            1 => Some(PlanIndex::Temporary),
            n => u8::try_from(n - Self::FIRST_SECONDARY)
                .ok()
                .map(PlanIndex::Secondary),
        }
    }
}

impl fmt::Display for PlanIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanIndex::Active => f.write_str("active"),
            PlanIndex::Temporary => f.write_str("temporary"),
            PlanIndex::Secondary(n) => write!(f, "secondary-{n}"),
        }
    }
}

impl FromStr for PlanIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "active" => return Ok(PlanIndex::Active),
            "temporary" => return Ok(PlanIndex::Temporary),
            _ => {}
        }
        if let Some(n) = value.strip_prefix("secondary-") {
            return n
                .parse::<u8>()
                .map(PlanIndex::Secondary)
                .map_err(|_| format!("invalid secondary slot: {s}"));
        }
        value
            .parse::<usize>()
            .ok()
            .and_then(PlanIndex::from_raw)
            .ok_or_else(|| format!("unknown plan index: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    secondary_count: u8,
}

impl SlotLayout {
    pub const DEFAULT_SECONDARY_COUNT: u8 = 1;

    pub fn new(secondary_count: u8) -> Self {
        Self { secondary_count }
    }

    pub fn secondary_count(&self) -> u8 {
        self.secondary_count
    }

    pub fn contains(&self, index: PlanIndex) -> bool {
        match index {
            PlanIndex::Active | PlanIndex::Temporary => true,
            PlanIndex::Secondary(n) => n < self.secondary_count,
        }
    }

    pub fn indices(&self) -> impl Iterator<Item = PlanIndex> {
        [PlanIndex::Active, PlanIndex::Temporary]
            .into_iter()
            .chain((0..self.secondary_count).map(PlanIndex::Secondary))
    }
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SECONDARY_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_mapping_is_stable() {
        assert_eq!(PlanIndex::Active.raw(), 0);
        assert_eq!(PlanIndex::Temporary.raw(), 1);
        assert_eq!(PlanIndex::Secondary(0).raw(), 2);
        assert_eq!(PlanIndex::from_raw(4), Some(PlanIndex::Secondary(2)));
        assert_eq!(PlanIndex::from_raw(1), Some(PlanIndex::Temporary));
        assert_eq!(PlanIndex::from_raw(2 + 256), None);
    }

    #[test]
    fn parses_names_and_raw_values() {
        assert_eq!("active".parse::<PlanIndex>().unwrap(), PlanIndex::Active);
        assert_eq!(
            "Temporary".parse::<PlanIndex>().unwrap(),
            PlanIndex::Temporary
        );
        assert_eq!(
            "secondary-3".parse::<PlanIndex>().unwrap(),
            PlanIndex::Secondary(3)
        );
        assert_eq!("2".parse::<PlanIndex>().unwrap(), PlanIndex::Secondary(0));
        assert!("secondary-x".parse::<PlanIndex>().is_err());
        assert!("primary".parse::<PlanIndex>().is_err());
        assert_eq!(PlanIndex::Secondary(1).to_string(), "secondary-1");
    }

    #[test]
    fn layout_bounds_secondaries() {
        let layout = SlotLayout::new(2);
        assert!(layout.contains(PlanIndex::Active));
        assert!(layout.contains(PlanIndex::Secondary(1)));
        assert!(!layout.contains(PlanIndex::Secondary(2)));
        let indices: Vec<_> = layout.indices().collect();
        assert_eq!(
            indices,
            vec![
                PlanIndex::Active,
                PlanIndex::Temporary,
                PlanIndex::Secondary(0),
                PlanIndex::Secondary(1)
            ]
        );
    }
}
