use crate::app::MenuItem;
use crate::stats::{
    self, DataAudit, DateCount, LeagueCount, MatchFilter, MonthlyGoals, ScorerEntry, Standing,
    TeamAverage, TeamRecord,
};
use chrono::{Datelike, Local, Months, NaiveDate};
use footy_api::{Match, Team, TeamId, TeamIndex};

/// How many rows the "top" tables on the dashboard show.
pub const TOP_N: usize = 5;

// ---------------------------------------------------------------------------
// Loaded data
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DataState {
    pub teams: Vec<Team>,
    pub index: TeamIndex,
    pub matches: Vec<Match>,
    /// League universe in first-seen order, for the league filter cycle.
    pub leagues: Vec<String>,
    pub loaded: bool,
}

impl DataState {
    /// Store a freshly fetched pair of collections. Both arrive together;
    /// a failed fetch never gets this far.
    pub fn load(&mut self, teams: Vec<Team>, matches: Vec<Match>) {
        self.index = TeamIndex::new(&teams);
        self.leagues = stats::leagues(&matches);
        self.teams = teams;
        self.matches = matches;
        self.loaded = true;
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Relative date windows offered by the UI, anchored to today at
/// recompute time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    All,
    ThisMonth,
    LastThreeMonths,
    LastTwelveMonths,
}

impl DateWindow {
    pub fn next(self) -> Self {
        match self {
            DateWindow::All => DateWindow::ThisMonth,
            DateWindow::ThisMonth => DateWindow::LastThreeMonths,
            DateWindow::LastThreeMonths => DateWindow::LastTwelveMonths,
            DateWindow::LastTwelveMonths => DateWindow::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateWindow::All => "all time",
            DateWindow::ThisMonth => "this month",
            DateWindow::LastThreeMonths => "last 3 months",
            DateWindow::LastTwelveMonths => "last 12 months",
        }
    }

    pub fn bounds(self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self {
            DateWindow::All => (None, None),
            DateWindow::ThisMonth => (today.with_day0(0), Some(today)),
            DateWindow::LastThreeMonths => {
                (today.checked_sub_months(Months::new(3)), Some(today))
            }
            DateWindow::LastTwelveMonths => {
                (today.checked_sub_months(Months::new(12)), Some(today))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterState {
    /// Exact league name; `None` means all leagues.
    pub league: Option<String>,
    pub window: DateWindow,
    /// Free-text participant search applied to the match table.
    pub search: String,
    /// Team whose record and trend the dashboard shows.
    pub selected_team: Option<TeamId>,
}

impl FilterState {
    /// Cycle None → each league in order → back to None.
    pub fn cycle_league(&mut self, leagues: &[String]) {
        self.league = match self.league.as_deref() {
            None => leagues.first().cloned(),
            Some(current) => leagues
                .iter()
                .position(|l| l == current)
                .and_then(|i| leagues.get(i + 1))
                .cloned(),
        };
    }

    pub fn league_label(&self) -> &str {
        self.league.as_deref().unwrap_or("All")
    }

    pub fn clear(&mut self) {
        self.league = None;
        self.window = DateWindow::All;
        self.search.clear();
    }

    /// Filter for the match table: league, window, and search, but not the
    /// selected team, whose views are computed separately so picking a team
    /// never narrows the table.
    fn table_filter(&self, today: NaiveDate) -> MatchFilter {
        let (date_from, date_to) = self.window.bounds(today);
        MatchFilter {
            league: self.league.clone(),
            team: None,
            date_from,
            date_to,
            search: Some(self.search.clone()).filter(|s| !s.trim().is_empty()),
        }
    }

    fn team_filter(&self, team: TeamId, today: NaiveDate) -> MatchFilter {
        let (date_from, date_to) = self.window.bounds(today);
        MatchFilter { team: Some(team), date_from, date_to, ..Default::default() }
    }
}

// ---------------------------------------------------------------------------
// Team search (Teams tab)
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    pub results: Vec<Team>,
    pub selected: usize,
}

impl SearchState {
    /// Case-insensitive substring match over team names; empty input means
    /// no result list.
    pub fn refresh(&mut self, teams: &[Team]) {
        let needle = self.input.trim().to_lowercase();
        self.results = if needle.is_empty() {
            Vec::new()
        } else {
            teams
                .iter()
                .filter(|t| t.name.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
        self.selected = self.selected.min(self.results.len().saturating_sub(1));
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.results.get(self.selected)
    }

    pub fn move_down(&mut self) {
        let max = self.results.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.results.clear();
        self.selected = 0;
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Everything the renderer draws, recomputed fresh from the raw collections
/// on every data or filter change. Nothing in here survives a recompute.
#[derive(Debug, Default)]
pub struct DerivedViews {
    /// Filtered match table rows, chronological, undated last.
    pub filtered: Vec<Match>,
    pub record: Option<TeamRecord>,
    pub trend: Vec<MonthlyGoals>,
    pub league_counts: Vec<LeagueCount>,
    pub top_scorers: Vec<ScorerEntry>,
    pub top_matches: Vec<Match>,
    pub standings: Vec<Standing>,
    pub averages: Vec<TeamAverage>,
    /// Matches per day across the filtered view, for the activity sparkline.
    pub date_counts: Vec<DateCount>,
    pub audit: DataAudit,
}

/// Text entry routing: keystrokes go to a search box instead of the key map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the match-table participant search (Matches tab).
    MatchSearch,
    /// Editing the team picker search (Teams tab).
    TeamSearch,
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub input_mode: InputMode,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub data: DataState,
    pub filters: FilterState,
    pub search: SearchState,
    pub derived: DerivedViews,
    pub matches_scroll: u16,
    pub standings_scroll: u16,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recompute(&mut self) {
        self.recompute_at(Local::now().date_naive());
    }

    /// Derive every view from scratch. `today` anchors the relative date
    /// windows and is injected so tests are not wall-clock dependent.
    pub fn recompute_at(&mut self, today: NaiveDate) {
        if !self.data.loaded {
            self.derived = DerivedViews::default();
            return;
        }

        let table_filter = self.filters.table_filter(today);
        let filtered =
            stats::filter_matches(&self.data.matches, &self.data.index, &table_filter);
        let filtered = stats::sort_by_date(&filtered);

        let (record, trend) = match self.filters.selected_team {
            Some(team) => {
                let team_matches = stats::filter_matches(
                    &self.data.matches,
                    &self.data.index,
                    &self.filters.team_filter(team, today),
                );
                (
                    Some(stats::team_record(&team_matches, team)),
                    stats::monthly_goal_trend(&team_matches, team),
                )
            }
            None => (None, Vec::new()),
        };

        self.derived = DerivedViews {
            record,
            trend,
            league_counts: stats::league_breakdown(&filtered),
            top_scorers: stats::top_scorers(&filtered, &self.data.index, TOP_N),
            top_matches: stats::top_matches_by_goals(&filtered, TOP_N),
            standings: stats::league_table(&filtered, &self.data.index),
            averages: stats::avg_goals_per_team(&filtered, &self.data.index),
            date_counts: stats::match_count_by_date(&filtered),
            audit: stats::audit(&self.data.matches),
            filtered,
        };
        self.matches_scroll = 0;
        self.standings_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: TeamId, name: &str) -> Team {
        Team { id, name: name.into() }
    }

    fn m(id: i64, home: TeamId, away: TeamId, score: &str, day: &str, league: &str) -> Match {
        Match {
            id,
            home_team: home,
            away_team: away,
            final_score: Some(score.into()),
            date: NaiveDate::parse_from_str(day, "%Y-%m-%d").ok(),
            league: league.into(),
            ..Default::default()
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new();
        state.data.load(
            vec![team(1, "Galatasaray"), team(2, "Fenerbahce")],
            vec![
                m(1, 1, 2, "3-1", "2024-03-01", "Super Lig"),
                m(2, 2, 1, "1-1", "2024-03-08", "Super Lig"),
                m(3, 1, 2, "0-2", "2024-02-01", "Cup"),
            ],
        );
        state
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn recompute_without_data_yields_empty_views() {
        let mut state = AppState::new();
        state.recompute_at(today());
        assert!(state.derived.filtered.is_empty());
        assert!(state.derived.record.is_none());
    }

    #[test]
    fn recompute_orders_table_chronologically() {
        let mut state = loaded_state();
        state.recompute_at(today());
        let ids: Vec<i64> = state.derived.filtered.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn league_filter_narrows_table_but_not_selected_team_views() {
        let mut state = loaded_state();
        state.filters.league = Some("Super Lig".into());
        state.filters.selected_team = Some(1);
        state.recompute_at(today());

        assert_eq!(state.derived.filtered.len(), 2);
        // Record spans all three matches: one win, one draw, one loss.
        let record = state.derived.record.unwrap();
        assert_eq!((record.wins, record.draws, record.losses), (1, 1, 1));
    }

    #[test]
    fn date_window_bounds_apply() {
        let mut state = loaded_state();
        state.filters.window = DateWindow::ThisMonth;
        state.recompute_at(today());
        let ids: Vec<i64> = state.derived.filtered.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2], "the February cup match falls outside the window");
    }

    #[test]
    fn empty_filter_result_is_not_an_error() {
        let mut state = loaded_state();
        state.filters.league = Some("Bundesliga".into());
        state.recompute_at(today());
        assert!(state.derived.filtered.is_empty());
        assert!(state.derived.league_counts.is_empty());
        assert!(state.derived.top_scorers.is_empty());
    }

    #[test]
    fn league_cycle_wraps_back_to_all() {
        let mut filters = FilterState::default();
        let leagues = vec!["Super Lig".to_owned(), "Cup".to_owned()];
        filters.cycle_league(&leagues);
        assert_eq!(filters.league.as_deref(), Some("Super Lig"));
        filters.cycle_league(&leagues);
        assert_eq!(filters.league.as_deref(), Some("Cup"));
        filters.cycle_league(&leagues);
        assert_eq!(filters.league, None);
        assert_eq!(filters.league_label(), "All");
    }

    #[test]
    fn search_refresh_matches_substrings_case_insensitively() {
        let mut search = SearchState::default();
        let teams = vec![team(1, "Galatasaray"), team(2, "Fenerbahce")];
        search.input = "FENER".into();
        search.refresh(&teams);
        assert_eq!(search.results.len(), 1);
        assert_eq!(search.selected_team().map(|t| t.id), Some(2));

        search.input.clear();
        search.refresh(&teams);
        assert!(search.results.is_empty());
    }

    #[test]
    fn this_month_window_starts_on_the_first() {
        let (from, to) = DateWindow::ThisMonth.bounds(today());
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(to, Some(today()));
    }
}
