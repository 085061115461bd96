//! Fuzzy term matching by bounded Levenshtein distance.

use std::cmp::min;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How many edits a query term may be away from an indexed term.
///
/// Parsed from and rendered as `auto`, `off`, or an edit count (`0`, `1`, `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Fuzziness {
    /// Exact matches only.
    Off,
    /// Edits scale with term length: 0 for 1-2 chars, 1 for 3-5, 2 beyond.
    #[default]
    Auto,
    /// A fixed maximum number of edits.
    Fixed(u8),
}

impl Fuzziness {
    /// Maximum edits allowed for a term of `term_len` characters.
    pub fn max_edits(&self, term_len: usize) -> usize {
        match self {
            Fuzziness::Off => 0,
            Fuzziness::Auto => match term_len {
                0..=2 => 0,
                3..=5 => 1,
                _ => 2,
            },
            Fuzziness::Fixed(edits) => *edits as usize,
        }
    }
}

impl FromStr for Fuzziness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Fuzziness::Auto),
            "off" | "none" => Ok(Fuzziness::Off),
            other => other
                .parse::<u8>()
                .map(Fuzziness::Fixed)
                .map_err(|_| format!("invalid fuzziness '{s}', expected auto, off or an edit count")),
        }
    }
}

impl TryFrom<String> for Fuzziness {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fuzziness> for String {
    fn from(value: Fuzziness) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Fuzziness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fuzziness::Off => f.write_str("off"),
            Fuzziness::Auto => f.write_str("auto"),
            Fuzziness::Fixed(edits) => write!(f, "{edits}"),
        }
    }
}

/// Calculate Levenshtein distance with a maximum threshold for early termination.
/// Returns None if the distance exceeds the threshold.
#[allow(clippy::needless_range_loop)]
pub fn levenshtein_distance_threshold(s1: &str, s2: &str, threshold: usize) -> Option<usize> {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    // Early termination if length difference exceeds threshold
    if len1.abs_diff(len2) > threshold {
        return None;
    }

    if len1 == 0 || len2 == 0 {
        let distance = len1.max(len2);
        return (distance <= threshold).then_some(distance);
    }

    // Use only two rows for space optimization
    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for i in 1..=len1 {
        curr_row[0] = i;
        let mut min_in_row = i;

        for j in 1..=len2 {
            let cost = usize::from(s1_chars[i - 1] != s2_chars[j - 1]);

            curr_row[j] = min(
                min(
                    prev_row[j] + 1,     // deletion
                    curr_row[j - 1] + 1, // insertion
                ),
                prev_row[j - 1] + cost, // substitution
            );

            min_in_row = min(min_in_row, curr_row[j]);
        }

        if min_in_row > threshold {
            return None;
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    let distance = prev_row[len2];
    (distance <= threshold).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_edits_by_length() {
        assert_eq!(Fuzziness::Auto.max_edits(2), 0);
        assert_eq!(Fuzziness::Auto.max_edits(3), 1);
        assert_eq!(Fuzziness::Auto.max_edits(5), 1);
        assert_eq!(Fuzziness::Auto.max_edits(6), 2);
        assert_eq!(Fuzziness::Off.max_edits(10), 0);
        assert_eq!(Fuzziness::Fixed(1).max_edits(10), 1);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("AUTO".parse::<Fuzziness>().unwrap(), Fuzziness::Auto);
        assert_eq!("off".parse::<Fuzziness>().unwrap(), Fuzziness::Off);
        assert_eq!("2".parse::<Fuzziness>().unwrap(), Fuzziness::Fixed(2));
        assert!("sometimes".parse::<Fuzziness>().is_err());
        assert_eq!(Fuzziness::Fixed(1).to_string(), "1");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Fuzziness::Auto).unwrap();
        assert_eq!(json, "\"auto\"");
        let parsed: Fuzziness = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(parsed, Fuzziness::Fixed(1));
    }

    #[test]
    fn test_levenshtein_threshold() {
        assert_eq!(levenshtein_distance_threshold("kitten", "sitting", 3), Some(3));
        assert_eq!(levenshtein_distance_threshold("kitten", "sitting", 2), None);
        assert_eq!(levenshtein_distance_threshold("france", "frnace", 2), Some(2));
        assert_eq!(levenshtein_distance_threshold("rust", "rust", 0), Some(0));
        assert_eq!(levenshtein_distance_threshold("", "ab", 2), Some(2));
        assert_eq!(levenshtein_distance_threshold("a", "abcd", 2), None);
    }
}
