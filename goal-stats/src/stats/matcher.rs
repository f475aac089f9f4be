// League matching: associate a selected team with its league-average row.
//
// Matching is exact (case-insensitive) first, then bidirectional substring
// containment. When several rows contain the query, the first one in file
// order wins.

use tracing::debug;

use super::model::{LeagueAverageData, TeamStats};
use super::parser::is_league_average;

/// Separator between country/league and name in combined labels.
const LEAGUE_SEPARATOR: &str = " - ";

/// Find the first item whose name matches `query`: exact case-insensitive
/// match first, then either name containing the other.
fn best_match<'a, T, F>(query: &str, items: &'a [T], name_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> String,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let names: Vec<String> = items
        .iter()
        .map(|item| name_of(item).trim().to_lowercase())
        .collect();

    if let Some(i) = names.iter().position(|name| *name == needle) {
        return items.get(i);
    }

    names
        .iter()
        .position(|name| {
            !name.is_empty() && (name.contains(needle.as_str()) || needle.contains(name.as_str()))
        })
        .and_then(|i| items.get(i))
}

/// Match a league name (or any team-derived league key) against the league
/// averages table.
pub fn match_league<'a>(
    query: &str,
    leagues: &'a [LeagueAverageData],
) -> Option<&'a LeagueAverageData> {
    let found = best_match(query, leagues, |l| l.league.clone());
    debug!(query, matched = ?found.map(|l| l.league.as_str()), "league lookup");
    found
}

/// The league a team belongs to: its explicit league field when present,
/// otherwise the part of its name before the first " - ".
pub fn league_key(team: &TeamStats) -> Option<String> {
    if let Some(league) = team.league.as_deref().map(str::trim) {
        if !league.is_empty() {
            return Some(league.to_string());
        }
    }
    team.team
        .split_once(LEAGUE_SEPARATOR)
        .map(|(league, _)| league.trim())
        .filter(|league| !league.is_empty())
        .map(str::to_string)
}

/// League averages for one team, if its league can be determined and found.
pub fn league_for_team<'a>(
    team: &TeamStats,
    leagues: &'a [LeagueAverageData],
) -> Option<&'a LeagueAverageData> {
    league_key(team).and_then(|key| match_league(&key, leagues))
}

/// League averages for the current selection: the home team's league is
/// tried first, then the away team's.
pub fn find_for_selection<'a>(
    home: Option<&TeamStats>,
    away: Option<&TeamStats>,
    leagues: &'a [LeagueAverageData],
) -> Option<&'a LeagueAverageData> {
    home.and_then(|t| league_for_team(t, leagues))
        .or_else(|| away.and_then(|t| league_for_team(t, leagues)))
}

/// The "League average" pseudo-row from a team file that belongs to the
/// team's league. Pseudo-rows are compared with the marker phrase removed.
/// The bare "League average" row names no league and is never returned.
pub fn embedded_average_for<'a>(
    team: &TeamStats,
    embedded: &'a [TeamStats],
) -> Option<&'a TeamStats> {
    let key = league_key(team)?;
    let named: Vec<&TeamStats> = embedded
        .iter()
        .filter(|row| {
            let league = league_name_of_average(&row.team);
            !league.is_empty() && !league.eq_ignore_ascii_case("league")
        })
        .collect();
    best_match(&key, &named, |row| league_name_of_average(&row.team)).copied()
}

/// Strip the "league average" marker from a pseudo-row label, leaving the
/// league name ("Premier League average" -> "Premier League").
pub fn league_name_of_average(label: &str) -> String {
    if !is_league_average(label) {
        return label.trim().to_string();
    }
    let lower = label.to_ascii_lowercase();
    match lower.find("league average") {
        Some(start) => {
            // Keep the word "League" itself: only " average" is dropped.
            let end = start + "league average".len();
            let mut name = String::new();
            name.push_str(&label[..start + "league".len()]);
            name.push_str(&label[end..]);
            name.trim().trim_matches('-').trim().to_string()
        }
        None => label.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leagues(names: &[&str]) -> Vec<LeagueAverageData> {
        names.iter().map(|n| LeagueAverageData::new(*n)).collect()
    }

    fn team(name: &str, league: Option<&str>) -> TeamStats {
        let mut t = TeamStats::new(name);
        t.league = league.map(str::to_string);
        t
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let table = leagues(&["Premier League", "La Liga"]);
        let found = match_league("la liga", &table).unwrap();
        assert_eq!(found.league, "La Liga");
    }

    #[test]
    fn exact_name_always_returns_that_record() {
        let table = leagues(&["Premier League 2", "Premier League", "League One"]);
        for row in &table {
            let found = match_league(&row.league, &table).unwrap();
            assert_eq!(found.league, row.league);
        }
    }

    #[test]
    fn exact_match_preferred_over_earlier_substring() {
        let table = leagues(&["England - Premier League", "Premier League"]);
        let found = match_league("Premier League", &table).unwrap();
        assert_eq!(found.league, "Premier League");
    }

    #[test]
    fn substring_match_in_both_directions() {
        let table = leagues(&["England - Premier League"]);
        assert!(match_league("premier league", &table).is_some());

        let table = leagues(&["Serie A"]);
        assert!(match_league("Italy Serie A 2024/25", &table).is_some());
    }

    #[test]
    fn substring_ties_go_to_first_row() {
        let table = leagues(&["Brazil Serie A", "Italy Serie A"]);
        let found = match_league("Serie A", &table).unwrap();
        assert_eq!(found.league, "Brazil Serie A");
    }

    #[test]
    fn blank_query_matches_nothing() {
        let table = leagues(&["Premier League"]);
        assert!(match_league("", &table).is_none());
        assert!(match_league("   ", &table).is_none());
    }

    #[test]
    fn blank_league_rows_never_match_by_substring() {
        let table = leagues(&["", "Eredivisie"]);
        let found = match_league("Eredivisie", &table).unwrap();
        assert_eq!(found.league, "Eredivisie");
        assert!(match_league("Bundesliga", &table).is_none());
    }

    #[test]
    fn no_match_returns_none() {
        let table = leagues(&["Premier League"]);
        assert!(match_league("Bundesliga", &table).is_none());
        assert!(match_league("Bundesliga", &[]).is_none());
    }

    #[test]
    fn league_key_prefers_explicit_field() {
        let t = team("Japan - Tokyo Verdy", Some("J2 League"));
        assert_eq!(league_key(&t).as_deref(), Some("J2 League"));
    }

    #[test]
    fn league_key_falls_back_to_name_prefix() {
        let t = team("Japan - Tokyo Verdy", None);
        assert_eq!(league_key(&t).as_deref(), Some("Japan"));

        let t = team("Arsenal", Some("  "));
        assert!(league_key(&t).is_none());
    }

    #[test]
    fn selection_tries_home_then_away() {
        let table = leagues(&["J2 League", "Premier League"]);
        let home = team("Arsenal", None);
        let away = team("Machida", Some("J2 League"));

        let found = find_for_selection(Some(&home), Some(&away), &table).unwrap();
        assert_eq!(found.league, "J2 League");

        let home = team("Arsenal", Some("Premier League"));
        let found = find_for_selection(Some(&home), Some(&away), &table).unwrap();
        assert_eq!(found.league, "Premier League");

        assert!(find_for_selection(None, None, &table).is_none());
    }

    #[test]
    fn league_name_of_average_strips_marker() {
        assert_eq!(league_name_of_average("Premier League average"), "Premier League");
        assert_eq!(league_name_of_average("J2 League Average"), "J2 League");
        assert_eq!(league_name_of_average("League average"), "League");
        assert_eq!(league_name_of_average("Arsenal"), "Arsenal");
    }

    #[test]
    fn embedded_average_found_for_team_league() {
        let embedded = vec![
            TeamStats::new("League average"),
            TeamStats::new("J2 League average"),
            TeamStats::new("Premier League average"),
        ];
        let t = team("Arsenal", Some("Premier League"));
        let found = embedded_average_for(&t, &embedded).unwrap();
        assert_eq!(found.team, "Premier League average");

        let t = team("Arsenal", None);
        assert!(embedded_average_for(&t, &embedded).is_none());
    }

    #[test]
    fn bare_league_average_row_is_skipped() {
        let embedded = vec![
            TeamStats::new("League average"),
            TeamStats::new("Japan - J1 League average"),
        ];
        let t = team("Kashima", Some("J1 League"));
        let found = embedded_average_for(&t, &embedded).unwrap();
        assert_eq!(found.team, "Japan - J1 League average");

        let only_bare = vec![TeamStats::new("League average")];
        let t = team("Arsenal", Some("Premier League"));
        assert!(embedded_average_for(&t, &only_bare).is_none());
    }
}
