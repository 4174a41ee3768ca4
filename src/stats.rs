//! Pure aggregation over the match collection. Every function here is a
//! total, stateless transformation of its inputs, safe to call on every
//! redraw. Malformed records degrade to defaults instead of erroring;
//! `audit` reports which records were defaulted so the UI can say so.

use chrono::{Datelike, NaiveDate};
use footy_api::{Match, TeamId, TeamIndex};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Score parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn total(self) -> u32 {
        self.home + self.away
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedScore(pub String);

impl fmt::Display for MalformedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed score string: {:?}", self.0)
    }
}

impl std::error::Error for MalformedScore {}

/// Strict parse of a `"H-A"` / `"H - A"` score string.
pub fn try_parse_score(raw: &str) -> Result<Score, MalformedScore> {
    let (home, away) = raw
        .split_once('-')
        .ok_or_else(|| MalformedScore(raw.to_owned()))?;
    let home = home.trim().parse::<u32>();
    let away = away.trim().parse::<u32>();
    match (home, away) {
        (Ok(home), Ok(away)) => Ok(Score { home, away }),
        _ => Err(MalformedScore(raw.to_owned())),
    }
}

/// Total parse: absent input and unparseable sides default to 0, so goal
/// aggregation never fails mid-render. `audit` distinguishes defaulted
/// records from genuine 0-0 results.
pub fn parse_score(raw: Option<&str>) -> Score {
    let Some(raw) = raw else {
        return Score::default();
    };
    match raw.split_once('-') {
        Some((home, away)) => Score {
            home: home.trim().parse().unwrap_or(0),
            away: away.trim().parse().unwrap_or(0),
        },
        None => Score::default(),
    }
}

fn score_of(m: &Match) -> Score {
    parse_score(m.final_score.as_deref())
}

// ---------------------------------------------------------------------------
// Filtering and ordering
// ---------------------------------------------------------------------------

/// The dashboard's filter set. Every field is optional; the zero value
/// accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    /// Exact league name. `None`, empty, or the literal `"All"` disables
    /// league filtering.
    pub league: Option<String>,
    /// Keep matches where this team appears on either side.
    pub team: Option<TeamId>,
    /// Inclusive date bounds. An absent bound is unbounded on that side;
    /// undated matches never satisfy a bounded filter.
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring over either participant's resolved name.
    pub search: Option<String>,
}

impl MatchFilter {
    fn active_league(&self) -> Option<&str> {
        self.league
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty() && *l != "All")
    }

    fn active_search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn accepts(&self, m: &Match, teams: &TeamIndex) -> bool {
        if let Some(league) = self.active_league()
            && m.league != league
        {
            return false;
        }
        if let Some(team) = self.team
            && !m.involves(team)
        {
            return false;
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = m.date else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }
        if let Some(needle) = self.active_search() {
            let needle = needle.to_lowercase();
            let hit = [m.home_team, m.away_team].into_iter().any(|id| {
                teams
                    .name_of(id)
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            });
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Apply a filter, preserving input order. Pure: inputs are never mutated.
pub fn filter_matches(matches: &[Match], teams: &TeamIndex, filter: &MatchFilter) -> Vec<Match> {
    matches
        .iter()
        .filter(|m| filter.accepts(m, teams))
        .cloned()
        .collect()
}

/// Chronological ordering: ascending by date, undated matches after dated
/// ones, ties keeping input order (stable sort).
pub fn sort_by_date(matches: &[Match]) -> Vec<Match> {
    let mut out = matches.to_vec();
    out.sort_by_key(|m| (m.date.is_none(), m.date));
    out
}

// ---------------------------------------------------------------------------
// Per-team record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamRecord {
    pub fn goal_diff(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    fn absorb(&mut self, own: u32, opponent: u32) {
        self.played += 1;
        self.goals_for += own;
        self.goals_against += opponent;
        if own > opponent {
            self.wins += 1;
        } else if own == opponent {
            self.draws += 1;
        } else {
            self.losses += 1;
        }
    }
}

/// Win/draw/loss tally and goal sums for one team. Matches not involving
/// the team are skipped here rather than trusting the caller to pre-filter.
pub fn team_record(matches: &[Match], team: TeamId) -> TeamRecord {
    let mut record = TeamRecord::default();
    for m in matches {
        if !m.involves(team) {
            continue;
        }
        let score = score_of(m);
        if m.is_home(team) {
            record.absorb(score.home, score.away);
        } else {
            record.absorb(score.away, score.home);
        }
    }
    record
}

// ---------------------------------------------------------------------------
// Chart-ready aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueCount {
    pub league: String,
    pub matches: u32,
}

/// Match count per observed league, most active league first, ties by name.
pub fn league_breakdown(matches: &[Match]) -> Vec<LeagueCount> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for m in matches {
        *counts.entry(m.league.as_str()).or_default() += 1;
    }
    let mut out: Vec<LeagueCount> = counts
        .into_iter()
        .map(|(league, matches)| LeagueCount { league: league.to_owned(), matches })
        .collect();
    out.sort_by(|a, b| b.matches.cmp(&a.matches).then_with(|| a.league.cmp(&b.league)));
    out
}

/// Distinct league names in first-seen order, the filter dropdown universe.
pub fn leagues(matches: &[Match]) -> Vec<String> {
    let mut seen = Vec::new();
    for m in matches {
        if !seen.contains(&m.league) {
            seen.push(m.league.clone());
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerEntry {
    pub team: TeamId,
    pub name: String,
    pub goals: u32,
}

/// Teams ranked by goals scored across the given matches, descending.
/// Ties break by ascending team id, an explicit rule rather than map
/// iteration order. Truncated to `n`.
pub fn top_scorers(matches: &[Match], teams: &TeamIndex, n: usize) -> Vec<ScorerEntry> {
    let mut goals: BTreeMap<TeamId, u32> = BTreeMap::new();
    for m in matches {
        let score = score_of(m);
        *goals.entry(m.home_team).or_default() += score.home;
        *goals.entry(m.away_team).or_default() += score.away;
    }
    let mut out: Vec<ScorerEntry> = goals
        .into_iter()
        .map(|(team, goals)| ScorerEntry { team, name: teams.display_name(team), goals })
        .collect();
    out.sort_by(|a, b| b.goals.cmp(&a.goals).then_with(|| a.team.cmp(&b.team)));
    out.truncate(n);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyGoals {
    pub year: i32,
    pub month: u32,
    pub goals: u32,
}

impl MonthlyGoals {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Goals scored by one team, bucketed by calendar month of the match date
/// and returned chronologically. Keyed on the (year, month) index, never a
/// localized month name, so December 2023 sorts before January 2024.
/// Undated matches are omitted (and visible via `audit`).
pub fn monthly_goal_trend(matches: &[Match], team: TeamId) -> Vec<MonthlyGoals> {
    let mut buckets: BTreeMap<(i32, u32), u32> = BTreeMap::new();
    for m in matches {
        if !m.involves(team) {
            continue;
        }
        let Some(date) = m.date else {
            continue;
        };
        let score = score_of(m);
        let own = if m.is_home(team) { score.home } else { score.away };
        *buckets.entry((date.year(), date.month())).or_default() += own;
    }
    buckets
        .into_iter()
        .map(|((year, month), goals)| MonthlyGoals { year, month, goals })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub team: TeamId,
    pub name: String,
    pub record: TeamRecord,
}

/// Full league table: one row per team in the directory, including teams
/// with no matches yet. Ordered by goals scored descending, ties by
/// ascending team id.
pub fn league_table(matches: &[Match], teams: &TeamIndex) -> Vec<Standing> {
    let mut records: BTreeMap<TeamId, TeamRecord> = BTreeMap::new();
    for m in matches {
        let score = score_of(m);
        records.entry(m.home_team).or_default().absorb(score.home, score.away);
        records.entry(m.away_team).or_default().absorb(score.away, score.home);
    }
    let mut out: Vec<Standing> = records
        .into_iter()
        .map(|(team, record)| Standing { team, name: teams.display_name(team), record })
        .collect();
    for team in teams.ids() {
        if !out.iter().any(|s| s.team == team) {
            out.push(Standing { team, name: teams.display_name(team), record: TeamRecord::default() });
        }
    }
    out.sort_by(|a, b| {
        b.record
            .goals_for
            .cmp(&a.record.goals_for)
            .then_with(|| a.team.cmp(&b.team))
    });
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamAverage {
    pub team: TeamId,
    pub name: String,
    pub played: u32,
    pub goals: u32,
    pub average: f64,
}

/// Average goals per match per team; 0.0 for teams with no matches, never
/// a division by zero. Ordered by average descending, ties by ascending
/// team id.
pub fn avg_goals_per_team(matches: &[Match], teams: &TeamIndex) -> Vec<TeamAverage> {
    let mut out: Vec<TeamAverage> = league_table(matches, teams)
        .into_iter()
        .map(|s| {
            let average = if s.record.played > 0 {
                f64::from(s.record.goals_for) / f64::from(s.record.played)
            } else {
                0.0
            };
            TeamAverage {
                team: s.team,
                name: s.name,
                played: s.record.played,
                goals: s.record.goals_for,
                average,
            }
        })
        .collect();
    out.sort_by(|a, b| b.average.total_cmp(&a.average).then_with(|| a.team.cmp(&b.team)));
    out
}

/// The `n` highest-scoring matches by combined goals, descending, ties by
/// ascending match id.
pub fn top_matches_by_goals(matches: &[Match], n: usize) -> Vec<Match> {
    let mut out = matches.to_vec();
    out.sort_by(|a, b| {
        score_of(b)
            .total()
            .cmp(&score_of(a).total())
            .then_with(|| a.id.cmp(&b.id))
    });
    out.truncate(n);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCount {
    pub date: NaiveDate,
    pub matches: u32,
}

/// Matches per calendar date, ascending. Undated matches are omitted.
pub fn match_count_by_date(matches: &[Match]) -> Vec<DateCount> {
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for m in matches {
        if let Some(date) = m.date {
            *counts.entry(date).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(date, matches)| DateCount { date, matches })
        .collect()
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Which records the aggregates had to default: matches whose score was
/// absent or unparseable (counted as 0-0) and matches with no usable date
/// (dropped from date-keyed views). Keeps defaulted data distinguishable
/// from genuine 0-0 results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataAudit {
    pub defaulted_scores: Vec<i64>,
    pub undated: Vec<i64>,
}

impl DataAudit {
    pub fn is_clean(&self) -> bool {
        self.defaulted_scores.is_empty() && self.undated.is_empty()
    }
}

pub fn audit(matches: &[Match]) -> DataAudit {
    let mut report = DataAudit::default();
    for m in matches {
        let defaulted = match m.final_score.as_deref() {
            None => true,
            Some(raw) => try_parse_score(raw).is_err(),
        };
        if defaulted {
            report.defaulted_scores.push(m.id);
        }
        if m.date.is_none() {
            report.undated.push(m.id);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use footy_api::Team;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn m(id: i64, home: TeamId, away: TeamId, score: Option<&str>, day: Option<&str>, league: &str) -> Match {
        Match {
            id,
            home_team: home,
            away_team: away,
            final_score: score.map(str::to_owned),
            halftime_score: None,
            date: day.map(date),
            league: league.to_owned(),
            country: None,
        }
    }

    fn index() -> TeamIndex {
        TeamIndex::new(&[
            Team { id: 1, name: "Galatasaray".into() },
            Team { id: 2, name: "Fenerbahce".into() },
            Team { id: 3, name: "Besiktas".into() },
        ])
    }

    fn fixture() -> Vec<Match> {
        vec![
            m(1, 1, 2, Some("3-1"), Some("2023-12-10"), "Super Lig"),
            m(2, 2, 1, Some("0-0"), Some("2024-01-14"), "Super Lig"),
            m(3, 3, 1, Some("2-2"), Some("2024-01-21"), "Super Lig"),
            m(4, 2, 3, Some("1-0"), Some("2024-02-04"), "Cup"),
            m(5, 1, 3, None, None, "Cup"),
        ]
    }

    // -----------------------------------------------------------------------
    // Score parsing
    // -----------------------------------------------------------------------

    #[test]
    fn parse_score_exact_for_wellformed_strings() {
        assert_eq!(parse_score(Some("3-1")), Score { home: 3, away: 1 });
        assert_eq!(parse_score(Some("3 - 1")), Score { home: 3, away: 1 });
        assert_eq!(parse_score(Some("10-0")), Score { home: 10, away: 0 });
    }

    #[test]
    fn parse_score_defaults_absent_input_to_nil_nil() {
        assert_eq!(parse_score(None), Score::default());
        assert_eq!(parse_score(Some("")), Score::default());
    }

    #[test]
    fn parse_score_defaults_unparseable_side_to_zero() {
        assert_eq!(parse_score(Some("x-2")), Score { home: 0, away: 2 });
        assert_eq!(parse_score(Some("2-x")), Score { home: 2, away: 0 });
        assert_eq!(parse_score(Some("abandoned")), Score::default());
    }

    #[test]
    fn try_parse_score_rejects_what_parse_score_defaults() {
        assert_eq!(try_parse_score("3-1"), Ok(Score { home: 3, away: 1 }));
        assert!(try_parse_score("x-2").is_err());
        assert!(try_parse_score("abandoned").is_err());
    }

    // -----------------------------------------------------------------------
    // Filtering
    // -----------------------------------------------------------------------

    #[test]
    fn league_all_returns_input_unchanged() {
        let matches = fixture();
        let filter = MatchFilter { league: Some("All".into()), ..Default::default() };
        assert_eq!(filter_matches(&matches, &index(), &filter), matches);
    }

    #[test]
    fn filtering_is_idempotent() {
        let matches = fixture();
        let filter = MatchFilter {
            league: Some("Super Lig".into()),
            team: Some(1),
            ..Default::default()
        };
        let once = filter_matches(&matches, &index(), &filter);
        let twice = filter_matches(&once, &index(), &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn date_bounds_are_inclusive_and_exclude_undated() {
        let matches = fixture();
        let filter = MatchFilter {
            date_from: Some(date("2024-01-14")),
            date_to: Some(date("2024-02-04")),
            ..Default::default()
        };
        let kept: Vec<i64> = filter_matches(&matches, &index(), &filter)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(kept, vec![2, 3, 4], "bounds inclusive, undated match 5 excluded");
    }

    #[test]
    fn search_matches_either_participant_case_insensitively() {
        let matches = fixture();
        let filter = MatchFilter { search: Some("fener".into()), ..Default::default() };
        let kept: Vec<i64> = filter_matches(&matches, &index(), &filter)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(kept, vec![1, 2, 4]);
    }

    #[test]
    fn sort_by_date_is_stable_with_undated_last() {
        let matches = vec![
            m(1, 1, 2, None, Some("2024-02-01"), "L"),
            m(2, 1, 2, None, None, "L"),
            m(3, 1, 2, None, Some("2024-01-01"), "L"),
            m(4, 1, 2, None, Some("2024-01-01"), "L"),
        ];
        let ids: Vec<i64> = sort_by_date(&matches).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    // -----------------------------------------------------------------------
    // Team record
    // -----------------------------------------------------------------------

    #[test]
    fn record_matches_hand_computed_scenario() {
        let matches = vec![
            m(1, 1, 2, Some("3-1"), None, "L"),
            m(2, 2, 1, Some("0-0"), None, "L"),
        ];
        let record = team_record(&matches, 1);
        assert_eq!(record.wins, 1);
        assert_eq!(record.draws, 1);
        assert_eq!(record.losses, 0);
        assert_eq!(record.goals_for, 3);
        assert_eq!(record.goals_against, 1);
    }

    #[test]
    fn outcome_counts_sum_to_participation_count() {
        let matches = fixture();
        for team in 1..=3 {
            let record = team_record(&matches, team);
            let participating = matches.iter().filter(|m| m.involves(team)).count() as u32;
            assert_eq!(record.wins + record.draws + record.losses, participating);
            assert_eq!(record.played, participating);
        }
    }

    #[test]
    fn record_ignores_matches_without_the_team() {
        let matches = fixture();
        let record = team_record(&matches, 2);
        assert_eq!(record.played, 3, "match 3 and 5 do not involve team 2");
    }

    #[test]
    fn null_score_counts_as_nil_nil_draw() {
        let matches = vec![m(1, 1, 3, None, None, "L")];
        let record = team_record(&matches, 1);
        assert_eq!(record.draws, 1);
        assert_eq!(record.goals_for, 0);
        assert_eq!(record.goals_against, 0);
    }

    // -----------------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------------

    #[test]
    fn league_counts_sum_to_match_count() {
        let matches = fixture();
        let breakdown = league_breakdown(&matches);
        let total: u32 = breakdown.iter().map(|b| b.matches).sum();
        assert_eq!(total as usize, matches.len());
        assert_eq!(breakdown[0].league, "Super Lig");
        assert_eq!(breakdown[0].matches, 3);
    }

    #[test]
    fn leagues_keeps_first_seen_order() {
        assert_eq!(leagues(&fixture()), vec!["Super Lig".to_owned(), "Cup".to_owned()]);
    }

    #[test]
    fn top_scorers_bounded_and_non_increasing() {
        let matches = fixture();
        let top = top_scorers(&matches, &index(), 5);
        assert!(top.len() <= 5);
        assert!(top.windows(2).all(|w| w[0].goals >= w[1].goals));
        // team 1: 3 + 0 + 2 + 0 = 5 goals, the clear leader
        assert_eq!(top[0].team, 1);
        assert_eq!(top[0].goals, 5);
    }

    #[test]
    fn top_scorer_ties_break_by_ascending_id() {
        let matches = vec![
            m(1, 1, 2, Some("1-1"), None, "L"),
            m(2, 3, 1, Some("1-1"), None, "L"),
        ];
        let top = top_scorers(&matches, &index(), 3);
        let ids: Vec<TeamId> = top.iter().map(|e| e.team).collect();
        assert_eq!(ids, vec![1, 2, 3], "team 1 leads with 2, then the 1-goal tie in id order");
    }

    #[test]
    fn truncation_respects_n() {
        let matches = fixture();
        assert_eq!(top_scorers(&matches, &index(), 1).len(), 1);
    }

    #[test]
    fn monthly_trend_is_chronological_across_year_boundary() {
        let matches = fixture();
        let trend = monthly_goal_trend(&matches, 1);
        let labels: Vec<String> = trend.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01"], "December precedes January");
        assert_eq!(trend[0].goals, 3);
        assert_eq!(trend[1].goals, 2, "0 away + 2 away across the two January matches");
    }

    #[test]
    fn monthly_trend_omits_empty_months_and_undated_matches() {
        let trend = monthly_goal_trend(&fixture(), 3);
        // team 3 has one dated match in Jan and one in Feb; the undated
        // match 5 contributes nothing.
        assert_eq!(trend.len(), 2);
    }

    #[test]
    fn league_table_includes_matchless_teams_with_zero_row() {
        let matches = vec![m(1, 1, 2, Some("2-0"), None, "L")];
        let table = league_table(&matches, &index());
        assert_eq!(table.len(), 3);
        let besiktas = table.iter().find(|s| s.team == 3).unwrap();
        assert_eq!(besiktas.record, TeamRecord::default());
        assert_eq!(table[0].team, 1, "ordered by goals scored");
    }

    #[test]
    fn averages_are_zero_safe_for_matchless_teams() {
        let matches = vec![m(1, 1, 2, Some("3-0"), None, "L")];
        let averages = avg_goals_per_team(&matches, &index());
        let besiktas = averages.iter().find(|a| a.team == 3).unwrap();
        assert_eq!(besiktas.average, 0.0);
        assert_eq!(averages[0].team, 1);
        assert_eq!(averages[0].average, 3.0);
    }

    #[test]
    fn top_matches_rank_by_total_goals_with_id_tiebreak() {
        let matches = vec![
            m(1, 1, 2, Some("1-1"), None, "L"),
            m(2, 2, 3, Some("3-2"), None, "L"),
            m(3, 3, 1, Some("2-0"), None, "L"),
        ];
        let ids: Vec<i64> = top_matches_by_goals(&matches, 2).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1], "5 goals, then the 2-goal tie won by lower id");
    }

    #[test]
    fn date_counts_ascend_and_skip_undated() {
        let counts = match_count_by_date(&fixture());
        assert_eq!(counts.len(), 4);
        assert!(counts.windows(2).all(|w| w[0].date < w[1].date));
        let total: u32 = counts.iter().map(|c| c.matches).sum();
        assert_eq!(total, 4, "undated match 5 is not counted");
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    #[test]
    fn audit_reports_defaulted_and_undated_records() {
        let matches = vec![
            m(1, 1, 2, Some("3-1"), Some("2024-01-01"), "L"),
            m(2, 1, 2, None, Some("2024-01-02"), "L"),
            m(3, 1, 2, Some("x-1"), None, "L"),
        ];
        let report = audit(&matches);
        assert_eq!(report.defaulted_scores, vec![2, 3]);
        assert_eq!(report.undated, vec![3]);
        assert!(!report.is_clean());
        assert!(audit(&matches[..1]).is_clean());
    }
}
