//! Versioned categorical → ordinal mapping tables.

use serde::{Deserialize, Serialize};

/// One label of an [`OrdinalScale`] and the number it stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalLevel {
    /// Category label as it appears in the data (without surrounding quotes).
    pub label: String,
    /// Ordinal value used in numeric analyses.
    pub value: f64,
}

/// A named, versioned table mapping an ordered categorical column to numbers.
///
/// Lookup ignores surrounding whitespace and single quotes, since the public
/// dataset stores labels such as `'5-6 hours'`. Labels not in the table map
/// to `None` and are treated as missing by numeric analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalScale {
    /// The column this scale applies to.
    pub column: String,
    /// Table version; bump when any level or value changes.
    pub version: u32,
    /// Levels in ascending order.
    pub levels: Vec<OrdinalLevel>,
}

impl OrdinalScale {
    /// Column name of the built-in sleep scale.
    pub const SLEEP_DURATION_COLUMN: &'static str = "Sleep Duration";

    /// The built-in sleep-duration scale (version 1).
    ///
    /// | Label | Value |
    /// |---|---|
    /// | `Less than 5 hours` | 4.0 |
    /// | `5-6 hours` | 5.5 |
    /// | `7-8 hours` | 7.5 |
    /// | `More than 8 hours` | 9.0 |
    #[must_use]
    pub fn sleep_duration() -> Self {
        let levels = [
            ("Less than 5 hours", 4.0),
            ("5-6 hours", 5.5),
            ("7-8 hours", 7.5),
            ("More than 8 hours", 9.0),
        ]
        .into_iter()
        .map(|(label, value)| OrdinalLevel {
            label: label.to_string(),
            value,
        })
        .collect();

        Self {
            column: Self::SLEEP_DURATION_COLUMN.to_string(),
            version: 1,
            levels,
        }
    }

    /// Map a raw label to its ordinal value.
    #[must_use]
    pub fn lookup(&self, raw: &str) -> Option<f64> {
        let label = normalize(raw);
        self.levels
            .iter()
            .find(|level| level.label == label)
            .map(|level| level.value)
    }
}

fn normalize(raw: &str) -> &str {
    raw.trim().trim_matches('\'').trim()
}

#[cfg(test)]
mod tests {
    use super::OrdinalScale;

    #[test]
    fn sleep_scale_maps_plain_labels() {
        let scale = OrdinalScale::sleep_duration();
        assert_eq!(scale.lookup("5-6 hours"), Some(5.5));
        assert_eq!(scale.lookup("More than 8 hours"), Some(9.0));
    }

    #[test]
    fn sleep_scale_ignores_quotes() {
        let scale = OrdinalScale::sleep_duration();
        assert_eq!(scale.lookup("'Less than 5 hours'"), Some(4.0));
        assert_eq!(scale.lookup(" '7-8 hours' "), Some(7.5));
    }

    #[test]
    fn unknown_label_is_unmapped() {
        assert_eq!(OrdinalScale::sleep_duration().lookup("Others"), None);
    }

    #[test]
    fn sleep_scale_is_ascending() {
        let scale = OrdinalScale::sleep_duration();
        assert!(scale.levels.windows(2).all(|w| w[0].value < w[1].value));
        assert_eq!(scale.version, 1);
    }
}
