// CSV parsing for the goal statistics files.
//
// The source files are plain comma-separated text with a header line. There
// is no quoting: fields are split on commas and any `"` characters are
// stripped. The identifier column (team or league name) is kept as text and
// every other column is coerced to f64, with anything unparseable becoming
// zero.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::model::{line_index, LeagueAverageData, StatRecord, TeamStats};

/// Which kind of file is being parsed. Decides how the identifier column is
/// chosen and which row filters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Per-team file (home, away, overall).
    Team,
    /// League averages file.
    League,
}

/// Case-insensitive phrase marking a league-average pseudo-row in a team file.
const LEAGUE_AVERAGE_MARKER: &str = "league average";

/// Separator used in league header rows such as "England - Premier League".
const LEAGUE_SEPARATOR: &str = " - ";

// ---------------------------------------------------------------------------
// Column recognition
// ---------------------------------------------------------------------------

/// Meaning of a numeric column, derived from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    GamesPlayed,
    AverageGoals,
    Over(usize),
    Btts,
    CleanSheets,
    Other,
}

fn classify(header: &str) -> Column {
    let h = header.trim().trim_end_matches('%').trim().to_lowercase();
    match h.as_str() {
        "gp" | "mp" | "games" | "games played" | "played" => return Column::GamesPlayed,
        "avg" | "average" | "avg goals" | "average goals" => return Column::AverageGoals,
        "btts" | "bts" | "both teams scored" | "both teams to score" => return Column::Btts,
        "cs" | "clean sheet" | "clean sheets" => return Column::CleanSheets,
        _ => {}
    }
    match goal_line_index(&h) {
        Some(i) => Column::Over(i),
        None => Column::Other,
    }
}

/// Accepts "2.5+", "over 2.5", "o2.5" and "o 2.5".
fn goal_line_index(header: &str) -> Option<usize> {
    let s = header
        .strip_prefix("over")
        .or_else(|| header.strip_prefix('o'))
        .unwrap_or(header)
        .trim();
    let s = s.strip_suffix('+').unwrap_or(s).trim();
    let line: f64 = s.parse().ok()?;
    line_index(line)
}

/// Positions of the text columns within a header row.
struct Layout {
    id: usize,
    league: Option<usize>,
}

impl Layout {
    fn detect(headers: &[String], kind: RecordKind) -> Layout {
        let lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
        let find = |needle: &str| lower.iter().position(|h| h.contains(needle));

        let id = match kind {
            RecordKind::Team => lower
                .iter()
                .position(|h| h == "team")
                .or_else(|| find("team")),
            RecordKind::League => find("league")
                .or_else(|| find("team"))
                .or_else(|| find("name")),
        }
        .unwrap_or(0);

        let league = match kind {
            RecordKind::Team => lower
                .iter()
                .enumerate()
                .position(|(i, h)| i != id && h.contains("league")),
            RecordKind::League => None,
        };

        Layout { id, league }
    }
}

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

fn clean_cell(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

/// Silent coercion: empty, unparseable, or non-finite text becomes zero.
/// A trailing percent sign is tolerated.
fn coerce(cell: &str) -> f64 {
    let cell = cell.trim().trim_end_matches('%').trim();
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// True for the "League average" pseudo-rows embedded in team files.
pub fn is_league_average(name: &str) -> bool {
    name.to_lowercase().contains(LEAGUE_AVERAGE_MARKER)
}

fn games_played(values: &BTreeMap<String, f64>) -> f64 {
    values
        .iter()
        .find(|(header, _)| classify(header) == Column::GamesPlayed)
        .map(|(_, v)| *v)
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Record parsing
// ---------------------------------------------------------------------------

/// Parse raw CSV text into untyped records.
///
/// Rows are dropped when the identifier is blank, when the identifier repeats
/// the header (a duplicated header line), or, for team files, when the row is
/// a league header: a name containing " - " with zero games played. A header
/// followed by N data lines yields at most N records.
pub fn parse_records(text: &str, kind: RecordKind) -> Vec<StatRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(clean_cell).collect(),
        Err(e) => {
            warn!("failed to read CSV header: {}", e);
            return Vec::new();
        }
    };
    if headers.iter().all(|h| h.is_empty()) {
        return Vec::new();
    }

    let layout = Layout::detect(&headers, kind);
    let id_header = &headers[layout.id];
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (row_idx, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping malformed CSV row {}: {}", row_idx + 2, e);
                dropped += 1;
                continue;
            }
        };
        let cell = |i: usize| row.get(i).map(clean_cell).unwrap_or_default();

        let label = cell(layout.id);
        if label.is_empty() || label.eq_ignore_ascii_case(id_header) {
            dropped += 1;
            continue;
        }

        let league = layout
            .league
            .map(|i| cell(i))
            .filter(|l| !l.is_empty());

        let mut values = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            if i == layout.id || Some(i) == layout.league || header.is_empty() {
                continue;
            }
            values.insert(header.clone(), coerce(&cell(i)));
        }

        if kind == RecordKind::Team
            && label.contains(LEAGUE_SEPARATOR)
            && games_played(&values) == 0.0
        {
            dropped += 1;
            continue;
        }

        records.push(StatRecord {
            label,
            league,
            values,
        });
    }

    debug!(
        kept = records.len(),
        dropped,
        ?kind,
        "parsed CSV records"
    );
    records
}

// ---------------------------------------------------------------------------
// Typed views
// ---------------------------------------------------------------------------

fn team_from_record(record: StatRecord) -> TeamStats {
    let mut team = TeamStats::new(record.label);
    team.league = record.league;
    for (header, value) in record.values {
        match classify(&header) {
            Column::GamesPlayed => team.gp = value.max(0.0).round() as u32,
            Column::AverageGoals => team.avg = value,
            Column::Over(i) => team.over.set_index(i, value),
            Column::Btts | Column::CleanSheets | Column::Other => {
                team.extra.insert(header, value);
            }
        }
    }
    team
}

fn league_from_record(record: StatRecord) -> LeagueAverageData {
    let mut league = LeagueAverageData::new(record.label);
    for (header, value) in record.values {
        match classify(&header) {
            Column::Over(i) => league.over.set_index(i, value),
            Column::Btts => league.btts = value,
            Column::CleanSheets => league.clean_sheets = value,
            Column::GamesPlayed | Column::AverageGoals | Column::Other => {
                league.extra.insert(header, value);
            }
        }
    }
    league
}

/// Team list for a home/away/overall file, without league-average pseudo-rows.
pub fn parse_team_stats(text: &str) -> Vec<TeamStats> {
    parse_records(text, RecordKind::Team)
        .into_iter()
        .filter(|r| !is_league_average(&r.label))
        .map(team_from_record)
        .collect()
}

/// Only the league-average pseudo-rows of a team file.
pub fn parse_embedded_averages(text: &str) -> Vec<TeamStats> {
    parse_records(text, RecordKind::Team)
        .into_iter()
        .filter(|r| is_league_average(&r.label))
        .map(team_from_record)
        .collect()
}

/// Rows of the league averages file.
pub fn parse_league_averages(text: &str) -> Vec<LeagueAverageData> {
    parse_records(text, RecordKind::League)
        .into_iter()
        .map(league_from_record)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_team_row() {
        let records = parse_records("Team,GP,Avg,1.5+\nArsenal,10,2.5,80\n", RecordKind::Team);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.label, "Arsenal");
        assert_eq!(r.value("GP"), 10.0);
        assert_eq!(r.value("Avg"), 2.5);
        assert_eq!(r.value("1.5+"), 80.0);
        assert_eq!(r.values.len(), 3);
        assert!(r.league.is_none());
    }

    #[test]
    fn typed_team_row() {
        let teams = parse_team_stats("Team,GP,Avg,1.5+\nArsenal,10,2.5,80\n");
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team, "Arsenal");
        assert_eq!(teams[0].gp, 10);
        assert!((teams[0].avg - 2.5).abs() < f64::EPSILON);
        assert_eq!(teams[0].over.get(1.5), Some(80.0));
        assert_eq!(teams[0].over.get(2.5), Some(0.0));
    }

    #[test]
    fn blank_team_names_dropped() {
        let csv_data = "\
Team,GP,Avg
Arsenal,10,2.5
,10,2.1
   ,8,1.9
Chelsea,9,2.2";
        let teams = parse_team_stats(csv_data);
        let names: Vec<&str> = teams.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(names, vec!["Arsenal", "Chelsea"]);
    }

    #[test]
    fn league_average_rows_excluded_from_team_view() {
        let csv_data = "\
Team,GP,Avg,2.5+
Arsenal,10,2.5,60
Premier League average,380,2.8,55
LEAGUE AVERAGE,380,2.8,55";
        let teams = parse_team_stats(csv_data);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team, "Arsenal");

        let embedded = parse_embedded_averages(csv_data);
        assert_eq!(embedded.len(), 2);
        assert_eq!(embedded[0].team, "Premier League average");
        assert_eq!(embedded[0].over.get(2.5), Some(55.0));
    }

    #[test]
    fn league_header_rows_dropped() {
        let csv_data = "\
Team,GP,Avg
England - Premier League,0,0
Arsenal,10,2.5
Japan - J2 League,,
Real - Sociedad B,12,2.0";
        let teams = parse_team_stats(csv_data);
        let names: Vec<&str> = teams.iter().map(|t| t.team.as_str()).collect();
        // A separator alone is not enough: games played must be zero too.
        assert_eq!(names, vec!["Arsenal", "Real - Sociedad B"]);
    }

    #[test]
    fn repeated_header_rows_dropped() {
        let csv_data = "\
Team,GP,Avg
Arsenal,10,2.5
Team,GP,Avg
Chelsea,9,2.2";
        let teams = parse_team_stats(csv_data);
        assert_eq!(teams.len(), 2);
    }

    #[test]
    fn quotes_stripped_from_headers_and_cells() {
        let csv_data = "\
\"Team\",\"GP\",\"Avg\",\"2.5+\"
\"Arsenal\",\"10\",\"2.5\",\"60\"";
        let teams = parse_team_stats(csv_data);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team, "Arsenal");
        assert_eq!(teams[0].gp, 10);
        assert_eq!(teams[0].over.get(2.5), Some(60.0));
    }

    #[test]
    fn unparseable_values_coerced_to_zero() {
        let csv_data = "\
Team,GP,Avg,2.5+,3.5+
Arsenal,ten,NaN,inf,abc";
        let records = parse_records(csv_data, RecordKind::Team);
        assert_eq!(records.len(), 1);
        for value in records[0].values.values() {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    fn percent_suffix_tolerated() {
        let teams = parse_team_stats("Team,GP,2.5+\nArsenal,10,62.5%");
        assert_eq!(teams[0].over.get(2.5), Some(62.5));
    }

    #[test]
    fn short_rows_padded_with_zero() {
        let records = parse_records("Team,GP,Avg,1.5+\nArsenal,10", RecordKind::Team);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value("GP"), 10.0);
        assert_eq!(records[0].value("Avg"), 0.0);
        assert_eq!(records[0].value("1.5+"), 0.0);
    }

    #[test]
    fn crlf_and_surrounding_whitespace() {
        let teams = parse_team_stats("Team , GP , Avg\r\n  Arsenal , 10 , 2.5 \r\n");
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team, "Arsenal");
        assert_eq!(teams[0].gp, 10);
    }

    #[test]
    fn team_column_found_by_substring() {
        let teams = parse_team_stats("Rank,Team Name,GP\n1,Arsenal,10");
        assert_eq!(teams[0].team, "Arsenal");
        assert_eq!(teams[0].extra.get("Rank"), Some(&1.0));
    }

    #[test]
    fn league_column_kept_as_text() {
        let teams = parse_team_stats("Team,League,GP\nArsenal,England - Premier League,10");
        assert_eq!(teams[0].league.as_deref(), Some("England - Premier League"));
        assert!(!teams[0].extra.contains_key("League"));
    }

    #[test]
    fn goal_line_header_variants() {
        let teams = parse_team_stats("Team,Over 0.5,O1.5,o 2.5,3.5+,4.5+ %\nArsenal,99,88,77,66,55");
        assert_eq!(teams[0].over.values(), [99.0, 88.0, 77.0, 66.0, 55.0, 0.0]);
        assert!(teams[0].extra.is_empty());
    }

    #[test]
    fn unknown_columns_kept_as_extra() {
        let teams = parse_team_stats("Team,GP,xG,6.5+\nArsenal,10,1.8,2");
        assert_eq!(teams[0].extra.get("xG"), Some(&1.8));
        assert_eq!(teams[0].extra.get("6.5+"), Some(&2.0));
    }

    #[test]
    fn yields_at_most_one_record_per_data_line() {
        let inputs = [
            "Team,GP\nA,1\nB,2\nC,3",
            "Team,GP\nA,1\n,2\nLeague average,3\n",
            "Team,GP\n\n\nA,1\n",
            "Team,GP\nX - Y,0\nTeam,GP",
            "Team",
            "",
        ];
        for input in inputs {
            let data_lines = input.lines().skip(1).count();
            let records = parse_records(input, RecordKind::Team);
            assert!(records.len() <= data_lines, "input {input:?}");
            assert!(records.iter().all(|r| !r.label.trim().is_empty()));
        }
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_records("", RecordKind::Team).is_empty());
        assert!(parse_team_stats("Team,GP,Avg").is_empty());
        assert!(parse_league_averages("").is_empty());
    }

    #[test]
    fn league_averages_file() {
        let csv_data = "\
League_Name,0.5+,1.5+,2.5+,3.5+,4.5+,5.5+,BTTS,CS
England - Premier League,93.4,78.2,55.1,31.0,14.2,5.3,52.6,41.8
Japan - J2 League,90.1,70.3,44.7,22.9,9.8,3.1,47.2,48.5";
        let leagues = parse_league_averages(csv_data);
        assert_eq!(leagues.len(), 2);
        assert_eq!(leagues[0].league, "England - Premier League");
        assert_eq!(leagues[0].over.get(2.5), Some(55.1));
        assert_eq!(leagues[0].over.get(5.5), Some(5.3));
        assert!((leagues[0].btts - 52.6).abs() < f64::EPSILON);
        assert!((leagues[0].clean_sheets - 41.8).abs() < f64::EPSILON);
        assert_eq!(leagues[1].league, "Japan - J2 League");
    }

    #[test]
    fn league_rows_with_separator_are_kept() {
        let leagues = parse_league_averages("League,2.5+\nEngland - Premier League,55");
        assert_eq!(leagues.len(), 1);
    }

    #[test]
    fn league_file_alias_columns() {
        let leagues = parse_league_averages("League,BTS %,Clean Sheets,GP\nSerie A,49,44,380");
        assert!((leagues[0].btts - 49.0).abs() < f64::EPSILON);
        assert!((leagues[0].clean_sheets - 44.0).abs() < f64::EPSILON);
        assert_eq!(leagues[0].extra.get("GP"), Some(&380.0));
    }
}
