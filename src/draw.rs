use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{BarChart, Block, BorderType, Borders, Paragraph, Row, Sparkline, Table, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::record_bar::RecordBar;
use crate::state::app_state::InputMode;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::stats;
use crate::ui::layout::{DashboardAreas, LayoutAreas};
use crate::ui::theme::{Palette, palette};
use footy_api::Match;

static TABS: &[&str; 3] = &["Dashboard", "Matches", "Teams"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let pal = palette(app.settings.theme);

    terminal
        .draw(|f| {
            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app, pal);
            }

            let mut main = layout.main;
            if app.state.show_logs && main.height > 12 {
                let [rest, logs] =
                    Layout::vertical([Constraint::Fill(1), Constraint::Length(8)]).areas(main);
                main = rest;
                draw_logs(f, logs, pal);
            }

            match app.state.active_tab {
                MenuItem::Dashboard => draw_dashboard(f, main, app, pal),
                MenuItem::Matches => draw_matches(f, main, app, pal),
                MenuItem::Teams => draw_teams(f, main, app, pal),
                MenuItem::Help => draw_help(f, main, pal),
            }

            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: tui::style::Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App, pal: Palette) {
    let style = Style::default().fg(pal.text);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Dashboard => 0,
        MenuItem::Matches => 1,
        MenuItem::Teams => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Loading / fetch-failure placeholder. Either collection failing means no
/// data at all was stored, so every tab shows this one uniform state and
/// never a partially rendered page.
fn draw_unloaded(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let msg = if let Some(err) = app.state.last_error.as_deref() {
        format!("Data load failed:\n{err}\n\nPress r to retry")
    } else {
        "Loading match data...".to_string()
    };
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(pal.dim))
            .alignment(Alignment::Center),
        area,
    );
}

fn filter_summary(app: &App) -> String {
    let filters = &app.state.filters;
    let mut parts = vec![
        format!("league: {}", filters.league_label()),
        format!("period: {}", filters.window.label()),
    ];
    if !filters.search.trim().is_empty() {
        parts.push(format!("search: {}", filters.search.trim()));
    }
    parts.join("  |  ")
}

// ---------------------------------------------------------------------------
// Dashboard tab
// ---------------------------------------------------------------------------

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let block = default_border(pal.border).title(" Dashboard ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !app.state.data.loaded {
        draw_unloaded(f, inner, app, pal);
        return;
    }

    let areas = DashboardAreas::split(inner);
    draw_summary(f, areas.summary, app, pal);
    draw_trend_chart(f, areas.trend, app, pal);
    draw_league_chart(f, areas.leagues, app, pal);
    draw_top_scorers(f, areas.scorers, app, pal);
    draw_top_matches(f, areas.top_matches, app, pal);
}

fn draw_summary(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let block = default_border(pal.dim).title(" Team Record ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 {
        return;
    }

    let [head, bar, tallies, filters] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let Some(record) = app.state.derived.record else {
        f.render_widget(
            Paragraph::new("No team selected. Open Teams (3) and press / to search.")
                .style(Style::default().fg(pal.dim)),
            head,
        );
        f.render_widget(
            Paragraph::new(filter_summary(app)).style(Style::default().fg(pal.dim)),
            filters,
        );
        return;
    };

    let name = app.selected_team_name().unwrap_or_default();
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(name, Style::default().fg(pal.accent).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {} matches, {:+} goal difference", record.played, record.goal_diff()),
                Style::default().fg(pal.text),
            ),
        ])),
        head,
    );

    f.render_widget(RecordBar { record: &record, palette: pal }, bar);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} W", record.wins), Style::default().fg(pal.win)),
            Span::raw("  "),
            Span::styled(format!("{} D", record.draws), Style::default().fg(pal.draw)),
            Span::raw("  "),
            Span::styled(format!("{} L", record.losses), Style::default().fg(pal.loss)),
            Span::raw("   "),
            Span::styled(format!("{} scored", record.goals_for), Style::default().fg(pal.goals_for)),
            Span::raw("  "),
            Span::styled(
                format!("{} conceded", record.goals_against),
                Style::default().fg(pal.goals_against),
            ),
        ])),
        tallies,
    );

    f.render_widget(
        Paragraph::new(filter_summary(app)).style(Style::default().fg(pal.dim)),
        filters,
    );
}

fn draw_trend_chart(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let title = match app.selected_team_name() {
        Some(name) => format!(" Goals by Month: {name} "),
        None => " Goals by Month ".to_string(),
    };
    let block = default_border(pal.dim).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let trend = &app.state.derived.trend;
    if trend.is_empty() {
        f.render_widget(
            Paragraph::new("No dated matches for this selection")
                .style(Style::default().fg(pal.dim))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let labels: Vec<String> = trend.iter().map(|t| t.label()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(trend)
        .map(|(label, t)| (label.as_str(), u64::from(t.goals)))
        .collect();
    let chart = BarChart::default()
        .bar_width(7)
        .bar_gap(1)
        .bar_style(Style::default().fg(pal.goals_for))
        .value_style(Style::default().fg(pal.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(pal.dim))
        .data(data.as_slice());
    f.render_widget(chart, inner);
}

fn draw_league_chart(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let block = default_border(pal.dim).title(" Matches by League ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let counts = &app.state.derived.league_counts;
    if counts.is_empty() {
        f.render_widget(
            Paragraph::new("No matches for the current filters")
                .style(Style::default().fg(pal.dim))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let data: Vec<(&str, u64)> = counts
        .iter()
        .map(|c| (c.league.as_str(), u64::from(c.matches)))
        .collect();
    let chart = BarChart::default()
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(pal.accent))
        .value_style(Style::default().fg(pal.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(pal.dim))
        .data(data.as_slice());
    f.render_widget(chart, inner);
}

fn draw_top_scorers(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let block = default_border(pal.dim).title(" Top Scoring Teams ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let averages = &app.state.derived.averages;
    let rows: Vec<Row> = app
        .state
        .derived
        .top_scorers
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let avg = averages
                .iter()
                .find(|a| a.team == entry.team)
                .map(|a| format!("{:.2}", a.average))
                .unwrap_or_else(|| "0.00".into());
            Row::new(vec![
                format!("{}", i + 1),
                entry.name.clone(),
                entry.goals.to_string(),
                avg,
            ])
            .style(Style::default().fg(pal.text))
        })
        .collect();

    if rows.is_empty() {
        f.render_widget(
            Paragraph::new("No matches for the current filters")
                .style(Style::default().fg(pal.dim))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new(vec!["#", "Team", "Goals", "Avg"]).style(Style::default().fg(pal.accent)),
    )
    .column_spacing(1);
    f.render_widget(table, inner);
}

fn draw_top_matches(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let block = default_border(pal.dim).title(" Highest Scoring Matches ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let index = &app.state.data.index;
    let rows: Vec<Row> = app
        .state
        .derived
        .top_matches
        .iter()
        .map(|m| {
            Row::new(vec![
                index.display_name(m.home_team),
                m.final_score.clone().unwrap_or_else(|| "--".into()),
                index.display_name(m.away_team),
                stats::parse_score(m.final_score.as_deref()).total().to_string(),
            ])
            .style(Style::default().fg(pal.text))
        })
        .collect();

    if rows.is_empty() {
        f.render_widget(
            Paragraph::new("No matches for the current filters")
                .style(Style::default().fg(pal.dim))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Length(7),
            Constraint::Fill(2),
            Constraint::Length(5),
        ],
    )
    .header(
        Row::new(vec!["Home", "Score", "Away", "Total"]).style(Style::default().fg(pal.accent)),
    )
    .column_spacing(1);
    f.render_widget(table, inner);
}

// ---------------------------------------------------------------------------
// Matches tab
// ---------------------------------------------------------------------------

fn draw_matches(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let title = format!(" Matches ({}) ", app.state.filters.league_label());
    let block = default_border(pal.border).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !app.state.data.loaded {
        draw_unloaded(f, inner, app, pal);
        return;
    }

    let [filter_line, search_line, activity, table_area, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(format!(
            "{}   Keys: l=league d=period /=search c=clear j/k=scroll",
            filter_summary(app)
        ))
        .style(Style::default().fg(pal.dim)),
        filter_line,
    );

    let composing = app.state.input_mode == InputMode::MatchSearch;
    let search_text = if composing {
        format!("search> {}_", app.state.filters.search)
    } else if app.state.filters.search.trim().is_empty() {
        String::new()
    } else {
        format!("search> {}", app.state.filters.search)
    };
    f.render_widget(
        Paragraph::new(search_text).style(Style::default().fg(if composing {
            pal.accent
        } else {
            pal.dim
        })),
        search_line,
    );

    // One cell per active day.
    let counts: Vec<u64> = app
        .state
        .derived
        .date_counts
        .iter()
        .map(|c| u64::from(c.matches))
        .collect();
    if !counts.is_empty() {
        f.render_widget(
            Sparkline::default()
                .data(counts)
                .style(Style::default().fg(pal.accent)),
            activity,
        );
    }

    let matches = &app.state.derived.filtered;
    if matches.is_empty() {
        f.render_widget(
            Paragraph::new("No matches for the current filters")
                .style(Style::default().fg(pal.dim))
                .alignment(Alignment::Center),
            table_area,
        );
    } else {
        draw_match_table(f, table_area, app, matches, pal);
    }

    let audit = &app.state.derived.audit;
    let mut footer_text = format!("{} of {} matches", matches.len(), app.state.data.matches.len());
    if !audit.is_clean() {
        footer_text.push_str(&format!(
            "   {} scores defaulted to 0-0, {} undated",
            audit.defaulted_scores.len(),
            audit.undated.len()
        ));
    }
    f.render_widget(
        Paragraph::new(footer_text).style(Style::default().fg(pal.dim)),
        footer,
    );
}

fn draw_match_table(f: &mut Frame, area: Rect, app: &App, matches: &[Match], pal: Palette) {
    let index = &app.state.data.index;
    let offset = app.state.matches_scroll as usize;

    let rows: Vec<Row> = matches
        .iter()
        .skip(offset)
        .take(area.height.saturating_sub(1) as usize)
        .map(|m| {
            let date = m
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "--".into());
            Row::new(vec![
                date,
                index.display_name(m.home_team),
                m.final_score.clone().unwrap_or_else(|| "--".into()),
                m.halftime_score.clone().unwrap_or_else(|| "--".into()),
                index.display_name(m.away_team),
                m.league.clone(),
            ])
            .style(Style::default().fg(pal.text))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Fill(2),
            Constraint::Fill(1),
        ],
    )
    .header(
        Row::new(vec!["Date", "Home", "FT", "HT", "Away", "League"])
            .style(Style::default().fg(pal.accent)),
    )
    .column_spacing(1);
    f.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Teams tab
// ---------------------------------------------------------------------------

fn draw_teams(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let block = default_border(pal.border).title(" Teams ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !app.state.data.loaded {
        draw_unloaded(f, inner, app, pal);
        return;
    }

    let [search_area, body] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(inner);

    let composing = app.state.input_mode == InputMode::TeamSearch;
    let mode = if composing { "typing" } else { "idle" };
    let input = if composing {
        format!("> {}_", app.state.search.input)
    } else {
        "Press / to search teams. Enter selects for the dashboard.".to_string()
    };
    let input_style = if composing {
        Style::default().fg(pal.accent)
    } else {
        Style::default().fg(pal.dim)
    };
    let input_block = default_border(pal.dim).title(format!(" {} ", mode));
    let input_inner = input_block.inner(search_area);
    f.render_widget(input_block, search_area);
    f.render_widget(Paragraph::new(input).style(input_style), input_inner);

    if !app.state.search.results.is_empty() {
        draw_search_results(f, body, app, pal);
    } else if composing && !app.state.search.input.trim().is_empty() {
        f.render_widget(
            Paragraph::new("No team found")
                .style(Style::default().fg(pal.dim))
                .alignment(Alignment::Center),
            body,
        );
    } else {
        draw_standings(f, body, app, pal);
    }
}

fn draw_search_results(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let mut lines = Vec::new();
    for (idx, team) in app.state.search.results.iter().enumerate() {
        let marker = if idx == app.state.search.selected { '>' } else { ' ' };
        let style = if idx == app.state.search.selected {
            Style::default().fg(pal.accent)
        } else {
            Style::default().fg(pal.text)
        };
        lines.push(Line::from(Span::styled(format!("{marker} {}", team.name), style)));
    }
    let visible = area.height as usize;
    lines.truncate(visible.max(1));
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_standings(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let offset = app.state.standings_scroll as usize;
    let rows: Vec<Row> = app
        .state
        .derived
        .standings
        .iter()
        .skip(offset)
        .take(area.height.saturating_sub(1) as usize)
        .map(|s| {
            let r = s.record;
            Row::new(vec![
                s.name.clone(),
                r.played.to_string(),
                r.wins.to_string(),
                r.draws.to_string(),
                r.losses.to_string(),
                r.goals_for.to_string(),
                r.goals_against.to_string(),
                format!("{:+}", r.goal_diff()),
            ])
            .style(Style::default().fg(pal.text))
        })
        .collect();

    if rows.is_empty() {
        f.render_widget(
            Paragraph::new("No matches for the current filters")
                .style(Style::default().fg(pal.dim))
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(5),
        ],
    )
    .header(
        Row::new(vec!["Team", "P", "W", "D", "L", "GF", "GA", "+/-"])
            .style(Style::default().fg(pal.accent)),
    )
    .column_spacing(1);
    f.render_widget(table, area);
}

// ---------------------------------------------------------------------------
// Help, logs, spinner
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect, pal: Palette) {
    let block = default_border(pal.dim);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(
            "Help: q=quit  1=Dashboard  2=Matches  3=Teams  r=refresh\n\
             l=cycle league  d=cycle period  c=clear filters  /=search\n\
             t=theme  f=fullscreen  \"=logs  j/k=scroll  Enter=select  Esc=back",
        )
        .style(Style::default().fg(pal.dim))
        .alignment(Alignment::Center),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect, pal: Palette) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(pal.dim).title(" Logs "))
        .style_error(Style::default().fg(pal.loss))
        .style_warn(Style::default().fg(pal.draw))
        .style_info(Style::default().fg(pal.text))
        .style_debug(Style::default().fg(pal.dim));
    f.render_widget(widget, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(tui::style::Color::Red),
        _ => Style::default().fg(tui::style::Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
