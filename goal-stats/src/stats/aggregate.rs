// Averaging over selected teams or leagues.
//
// All results are rounded to two decimals, half away from zero.

use std::collections::BTreeMap;

use super::model::{GoalLines, Metrics, TeamStats, GOAL_LINE_LABELS};

/// Round to two decimal places, half away from zero.
/// Values too large to scale are returned unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Mean of every metric shared by all `records`, rounded to two decimals.
///
/// Metrics missing from any record are left out. An empty slice yields an
/// empty map.
pub fn mean_of_shared<M: Metrics + ?Sized>(records: &[&M]) -> BTreeMap<String, f64> {
    let Some((first, rest)) = records.split_first() else {
        return BTreeMap::new();
    };
    let rest: Vec<BTreeMap<String, f64>> = rest.iter().map(|r| r.metrics()).collect();
    let count = records.len() as f64;

    first
        .metrics()
        .into_iter()
        .filter_map(|(key, value)| {
            // Per-term division keeps the sum finite.
            let mut mean = value / count;
            for other in &rest {
                mean += other.get(&key)? / count;
            }
            Some((key, round2(mean)))
        })
        .collect()
}

/// Per-line mean across a whole team table. Zeroes for an empty table.
pub fn average_goal_lines(teams: &[TeamStats]) -> GoalLines {
    if teams.is_empty() {
        return GoalLines::default();
    }
    let count = teams.len() as f64;
    let mut totals = [0.0; 6];
    for team in teams {
        for (total, value) in totals.iter_mut().zip(team.over.values()) {
            *total += value / count;
        }
    }
    GoalLines::new(totals.map(round2))
}

/// Combined view of the selected home and away teams.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchProjection {
    /// Number of teams that went into the means (1 or 2).
    pub teams: usize,
    pub avg: f64,
    pub over: GoalLines,
}

/// Means of average goals and each goal line over whichever of the two
/// teams are selected. `None` when neither is.
pub fn match_projection(
    home: Option<&TeamStats>,
    away: Option<&TeamStats>,
) -> Option<MatchProjection> {
    let selected: Vec<&TeamStats> = home.into_iter().chain(away).collect();
    if selected.is_empty() {
        return None;
    }
    let means = mean_of_shared(&selected);
    let mut over = GoalLines::default();
    for (i, label) in GOAL_LINE_LABELS.iter().enumerate() {
        over.set_index(i, means.get(*label).copied().unwrap_or(0.0));
    }
    Some(MatchProjection {
        teams: selected.len(),
        avg: means.get("Avg").copied().unwrap_or(0.0),
        over,
    })
}
