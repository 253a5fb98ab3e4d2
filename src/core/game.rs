use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Subjective complexity class of a game (nothing to do with physical weight)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Weight {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl Weight {
    /// Ordinal position for proximity math (light=0, medium=1, heavy=2)
    pub fn ordinal(self) -> u8 {
        match self {
            Weight::Light => 0,
            Weight::Medium => 1,
            Weight::Heavy => 2,
        }
    }

    /// Classify a BGG-style average weight into a class.
    ///
    /// Thresholds are the ones used informally in the community:
    /// < 2.25 light, < 3.5 medium, otherwise heavy. Absent averages
    /// default to medium.
    pub fn from_average(avg: Option<f64>) -> Self {
        match avg {
            None => Weight::Medium,
            Some(w) if w < 2.25 => Weight::Light,
            Some(w) if w < 3.5 => Weight::Medium,
            Some(_) => Weight::Heavy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weight::Light => "light",
            Weight::Medium => "medium",
            Weight::Heavy => "heavy",
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Weight::Light),
            "medium" => Ok(Weight::Medium),
            "heavy" => Ok(Weight::Heavy),
            other => Err(format!("unknown weight class: {}", other)),
        }
    }
}

/// Inclusive integer range, used for both player counts and play time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "RawInterval")]
pub struct Interval {
    pub min: u32,
    pub max: u32,
}

/// Wire shape for an interval; one-sided payloads mirror the present bound
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct RawInterval {
    #[serde(default)]
    min: Option<u32>,
    #[serde(default)]
    max: Option<u32>,
}

impl From<RawInterval> for Interval {
    fn from(raw: RawInterval) -> Self {
        let min = raw.min.or(raw.max).unwrap_or(0);
        let max = raw.max.unwrap_or(min).max(min);
        Interval { min, max }
    }
}

impl Interval {
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.max >= other.min && self.min <= other.max
    }

    pub fn contained_in(&self, other: &Interval) -> bool {
        self.min >= other.min && self.max <= other.max
    }

    /// Integer gap to the nearest boundary; 0 when the value is inside
    pub fn distance_to(&self, value: u32) -> u32 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0
        }
    }
}

/// Popularity statistics attached to a game record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStats {
    pub rank: Option<u32>,
    pub users_rated: Option<u32>,
    pub bayes_average: Option<f64>,
}

/// Deserialize year from string or int (upstream feeds disagree).
/// Unparseable strings degrade to None rather than failing the record.
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearValue {
        Int(i32),
        String(String),
        Null,
    }

    match Option::<YearValue>::deserialize(deserializer)? {
        Some(YearValue::Int(i)) => Ok(Some(i)),
        Some(YearValue::String(s)) => Ok(s.trim().parse::<i32>().ok()),
        _ => Ok(None),
    }
}

/// Drop duplicate tags while keeping first-seen order
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut seen = HashSet::new();
    Ok(raw.into_iter().filter(|t| seen.insert(t.clone())).collect())
}

/// A board game record as supplied by a catalog source.
///
/// Consumed read-only by the ranking and similarity engines. Every field
/// is defaulted on deserialization so a sparse or malformed payload
/// degrades instead of erroring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Game {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub image: String,

    /// Publication year
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_year")]
    pub year: Option<i32>,

    /// Average rating (0.0-10.0)
    #[serde(default)]
    pub rating: Option<f64>,

    /// Supported player counts
    #[serde(default)]
    pub players: Interval,

    /// Play time range in minutes
    #[serde(default)]
    pub time: Interval,

    /// Complexity class
    #[serde(default)]
    pub weight: Weight,

    /// Mechanic/theme labels, deduplicated
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub description: String,

    /// Popularity stats when the source has them
    #[serde(default)]
    pub stats: Option<GameStats>,

    /// Details page URL
    #[serde(default)]
    pub url: String,
}

impl Game {
    /// Create a new Game with required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Popularity rank, when known (lower = more popular)
    pub fn rank(&self) -> Option<u32> {
        self.stats.as_ref().and_then(|s| s.rank)
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        if let Some(year) = self.year {
            format!("{} ({})", self.name, year)
        } else {
            self.name.clone()
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
