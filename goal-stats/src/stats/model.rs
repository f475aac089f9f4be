// Data model for parsed goal statistics.
//
// Team rows and league-average rows share the six "over N.5 goals" lines.
// Every numeric field is an already-coerced f64: parsing never leaves a
// NaN, infinity, or missing value behind.

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Goal lines
// ---------------------------------------------------------------------------

/// The goal lines tracked by every source file, in column order.
pub const GOAL_LINES: [f64; 6] = [0.5, 1.5, 2.5, 3.5, 4.5, 5.5];

/// Column labels matching `GOAL_LINES`, as they appear in the CSV headers.
pub const GOAL_LINE_LABELS: [&str; 6] = ["0.5+", "1.5+", "2.5+", "3.5+", "4.5+", "5.5+"];

/// Percentage of matches that finished over each goal line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GoalLines([f64; 6]);

impl GoalLines {
    pub fn new(values: [f64; 6]) -> Self {
        GoalLines(values)
    }

    /// Percentage for a goal line such as `2.5`. Returns `None` for lines
    /// that are not tracked.
    pub fn get(&self, line: f64) -> Option<f64> {
        line_index(line).map(|i| self.0[i])
    }

    /// Percentage for a column label such as `"2.5+"`.
    pub fn get_label(&self, label: &str) -> Option<f64> {
        GOAL_LINE_LABELS
            .iter()
            .position(|l| *l == label)
            .map(|i| self.0[i])
    }

    pub fn set_index(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value;
        }
    }

    pub fn values(&self) -> [f64; 6] {
        self.0
    }

    /// `(label, percentage)` pairs in ascending line order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        GOAL_LINE_LABELS.iter().copied().zip(self.0.iter().copied())
    }
}

/// Index of `line` in `GOAL_LINES`, tolerant of float noise.
pub fn line_index(line: f64) -> Option<usize> {
    GOAL_LINES.iter().position(|l| (l - line).abs() < 1e-9)
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Anything that exposes named numeric fields for averaging.
pub trait Metrics {
    fn metrics(&self) -> BTreeMap<String, f64>;
}

// ---------------------------------------------------------------------------
// Parsed rows
// ---------------------------------------------------------------------------

/// One data row as produced by the CSV parser, before it is typed.
///
/// `label` holds the identifier column (team or league name); every other
/// column lands in `values` keyed by its cleaned header.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRecord {
    pub label: String,
    pub league: Option<String>,
    pub values: BTreeMap<String, f64>,
}

impl StatRecord {
    /// Value of a column, or zero if the column is absent.
    pub fn value(&self, column: &str) -> f64 {
        self.values.get(column).copied().unwrap_or(0.0)
    }
}

impl Metrics for StatRecord {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.values.clone()
    }
}

/// Goal statistics for a single team in one source file (home, away, or
/// overall). Names are unique within a file but not linked across files.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamStats {
    pub team: String,
    pub league: Option<String>,
    /// Games played.
    pub gp: u32,
    /// Average total goals per game.
    pub avg: f64,
    pub over: GoalLines,
    /// Numeric columns not recognised as one of the fields above.
    pub extra: BTreeMap<String, f64>,
}

impl TeamStats {
    pub fn new(team: impl Into<String>) -> Self {
        TeamStats {
            team: team.into(),
            league: None,
            gp: 0,
            avg: 0.0,
            over: GoalLines::default(),
            extra: BTreeMap::new(),
        }
    }
}

impl Metrics for TeamStats {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut map = self.extra.clone();
        map.insert("GP".to_string(), f64::from(self.gp));
        map.insert("Avg".to_string(), self.avg);
        for (label, value) in self.over.iter() {
            map.insert(label.to_string(), value);
        }
        map
    }
}

/// Aggregate goal statistics for a whole league.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueAverageData {
    pub league: String,
    pub over: GoalLines,
    /// Percentage of matches in which both teams scored.
    pub btts: f64,
    /// Percentage of matches with at least one clean sheet.
    pub clean_sheets: f64,
    pub extra: BTreeMap<String, f64>,
}

impl LeagueAverageData {
    pub fn new(league: impl Into<String>) -> Self {
        LeagueAverageData {
            league: league.into(),
            over: GoalLines::default(),
            btts: 0.0,
            clean_sheets: 0.0,
            extra: BTreeMap::new(),
        }
    }
}

impl Metrics for LeagueAverageData {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut map = self.extra.clone();
        for (label, value) in self.over.iter() {
            map.insert(label.to_string(), value);
        }
        map.insert("BTTS".to_string(), self.btts);
        map.insert("CS".to_string(), self.clean_sheets);
        map
    }
}

// ---------------------------------------------------------------------------
// Session bundle
// ---------------------------------------------------------------------------

/// Everything fetched in one load. Rebuilt from scratch on every reload.
#[derive(Debug, Clone, Default)]
pub struct GoalStatsData {
    pub home: Vec<TeamStats>,
    pub away: Vec<TeamStats>,
    pub overall: Vec<TeamStats>,
    pub league_averages: Vec<LeagueAverageData>,
    /// "League average" pseudo-rows found inside the home and away files.
    pub embedded_averages: Vec<TeamStats>,
}

impl GoalStatsData {
    pub fn home_team(&self, name: &str) -> Option<&TeamStats> {
        self.home.iter().find(|t| t.team == name)
    }

    pub fn away_team(&self, name: &str) -> Option<&TeamStats> {
        self.away.iter().find(|t| t.team == name)
    }

    /// Sorted, de-duplicated home team names for the picker.
    pub fn home_team_names(&self) -> Vec<String> {
        sorted_names(&self.home)
    }

    /// Sorted, de-duplicated away team names for the picker.
    pub fn away_team_names(&self) -> Vec<String> {
        sorted_names(&self.away)
    }
}

fn sorted_names(teams: &[TeamStats]) -> Vec<String> {
    let mut names: Vec<String> = teams.iter().map(|t| t.team.clone()).collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_lines_lookup_by_line_and_label() {
        let lines = GoalLines::new([95.0, 80.0, 55.0, 30.0, 12.0, 4.0]);
        assert_eq!(lines.get(2.5), Some(55.0));
        assert_eq!(lines.get(6.5), None);
        assert_eq!(lines.get_label("4.5+"), Some(12.0));
        assert_eq!(lines.get_label("7.5+"), None);
    }

    #[test]
    fn team_metrics_include_typed_and_extra_fields() {
        let mut team = TeamStats::new("Arsenal");
        team.gp = 10;
        team.avg = 2.5;
        team.over.set_index(1, 80.0);
        team.extra.insert("xG".to_string(), 1.7);

        let m = team.metrics();
        assert_eq!(m["GP"], 10.0);
        assert_eq!(m["Avg"], 2.5);
        assert_eq!(m["1.5+"], 80.0);
        assert_eq!(m["xG"], 1.7);
        assert_eq!(m.len(), 9);
    }

    #[test]
    fn team_names_sorted_and_deduplicated() {
        let data = GoalStatsData {
            home: vec![
                TeamStats::new("Wolves"),
                TeamStats::new("Arsenal"),
                TeamStats::new("Wolves"),
            ],
            ..Default::default()
        };
        assert_eq!(data.home_team_names(), vec!["Arsenal", "Wolves"]);
        assert!(data.away_team_names().is_empty());
    }
}
