use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, InputMode};
use footy_api::{Match, Team, TeamId};
use log::warn;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Dashboard,
    Matches,
    Teams,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_data_loaded(&mut self, teams: Vec<Team>, matches: Vec<Match>) {
        self.state.last_error = None;
        self.state.data.load(teams, matches);
        self.state.recompute();
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        self.state.input_mode = InputMode::Normal;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
        self.persist_settings();
    }

    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggle();
        self.persist_settings();
    }

    fn persist_settings(&self) {
        if let Err(e) = self.settings.save() {
            warn!("could not persist settings: {e}");
        }
    }

    // -----------------------------------------------------------------------
    // Filters — every mutation rebuilds the derived views from scratch
    // -----------------------------------------------------------------------

    pub fn cycle_league(&mut self) {
        let leagues = self.state.data.leagues.clone();
        self.state.filters.cycle_league(&leagues);
        self.state.recompute();
    }

    pub fn cycle_date_window(&mut self) {
        self.state.filters.window = self.state.filters.window.next();
        self.state.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.state.recompute();
    }

    pub fn select_team(&mut self, team: TeamId) {
        self.state.filters.selected_team = Some(team);
        self.state.recompute();
        self.update_tab(MenuItem::Dashboard);
    }

    pub fn selected_team_name(&self) -> Option<String> {
        self.state
            .filters
            .selected_team
            .map(|id| self.state.data.index.display_name(id))
    }

    // -----------------------------------------------------------------------
    // Text entry — match-table search and the team picker
    // -----------------------------------------------------------------------

    pub fn begin_input(&mut self, mode: InputMode) {
        self.state.input_mode = mode;
    }

    pub fn input_push(&mut self, c: char) {
        match self.state.input_mode {
            InputMode::MatchSearch => {
                self.state.filters.search.push(c);
                self.state.recompute();
            }
            InputMode::TeamSearch => {
                self.state.search.input.push(c);
                let teams = self.state.data.teams.clone();
                self.state.search.refresh(&teams);
            }
            InputMode::Normal => {}
        }
    }

    pub fn input_backspace(&mut self) {
        match self.state.input_mode {
            InputMode::MatchSearch => {
                self.state.filters.search.pop();
                self.state.recompute();
            }
            InputMode::TeamSearch => {
                self.state.search.input.pop();
                let teams = self.state.data.teams.clone();
                self.state.search.refresh(&teams);
            }
            InputMode::Normal => {}
        }
    }

    pub fn input_cancel(&mut self) {
        match self.state.input_mode {
            InputMode::MatchSearch => {
                self.state.filters.search.clear();
                self.state.recompute();
            }
            InputMode::TeamSearch => self.state.search.clear(),
            InputMode::Normal => {}
        }
        self.state.input_mode = InputMode::Normal;
    }

    /// Enter while typing: the match search keeps its text, the team picker
    /// commits the highlighted team to the dashboard.
    pub fn input_commit(&mut self) {
        match self.state.input_mode {
            InputMode::MatchSearch => {
                self.state.input_mode = InputMode::Normal;
            }
            InputMode::TeamSearch => {
                self.state.input_mode = InputMode::Normal;
                if let Some(team) = self.state.search.selected_team().map(|t| t.id) {
                    self.state.search.clear();
                    self.select_team(team);
                }
            }
            InputMode::Normal => {}
        }
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    pub fn matches_scroll_down(&mut self) {
        let max = self.state.derived.filtered.len().saturating_sub(1) as u16;
        self.state.matches_scroll = (self.state.matches_scroll + 1).min(max);
    }

    pub fn matches_scroll_up(&mut self) {
        self.state.matches_scroll = self.state.matches_scroll.saturating_sub(1);
    }

    pub fn standings_scroll_down(&mut self) {
        let max = self.state.derived.standings.len().saturating_sub(1) as u16;
        self.state.standings_scroll = (self.state.standings_scroll + 1).min(max);
    }

    pub fn standings_scroll_up(&mut self) {
        self.state.standings_scroll = self.state.standings_scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footy_api::Team;

    fn app_with_data() -> App {
        let mut app = App {
            settings: AppSettings::default(),
            state: AppState::new(),
        };
        app.state.data.load(
            vec![
                Team { id: 1, name: "Galatasaray".into() },
                Team { id: 2, name: "Fenerbahce".into() },
            ],
            vec![Match {
                id: 1,
                home_team: 1,
                away_team: 2,
                final_score: Some("2-0".into()),
                league: "Super Lig".into(),
                ..Default::default()
            }],
        );
        app.state.recompute();
        app
    }

    #[test]
    fn committing_team_search_selects_and_switches_tab() {
        let mut app = app_with_data();
        app.update_tab(MenuItem::Teams);
        app.begin_input(InputMode::TeamSearch);
        for c in "fener".chars() {
            app.input_push(c);
        }
        app.input_commit();

        assert_eq!(app.state.filters.selected_team, Some(2));
        assert_eq!(app.state.active_tab, MenuItem::Dashboard);
        assert!(app.state.derived.record.is_some());
    }

    #[test]
    fn cancelling_match_search_clears_the_filter() {
        let mut app = app_with_data();
        app.begin_input(InputMode::MatchSearch);
        app.input_push('x');
        assert!(app.state.derived.filtered.is_empty(), "no participant matches 'x'");
        app.input_cancel();
        assert_eq!(app.state.derived.filtered.len(), 1);
        assert_eq!(app.state.input_mode, InputMode::Normal);
    }

    #[test]
    fn switching_tabs_leaves_input_mode() {
        let mut app = app_with_data();
        app.begin_input(InputMode::MatchSearch);
        app.update_tab(MenuItem::Teams);
        assert_eq!(app.state.input_mode, InputMode::Normal);
    }
}
