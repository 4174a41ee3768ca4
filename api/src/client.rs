use crate::wire::{RawMatch, RawTeam, Snapshot};
use crate::{Match, Team};
use chrono::NaiveDate;
use log::warn;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_API_BASE: &str = "https://football-dashboard.onrender.com";

/// Football dashboard API client backed by the deployed REST endpoints.
#[derive(Debug, Clone)]
pub struct FootballApi {
    client: Client,
    base: String,
    timeout: Duration,
}

impl Default for FootballApi {
    fn default() -> Self {
        let base = std::env::var("MATCHDAY_API_BASE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
        Self {
            client: Client::builder()
                .user_agent("matchday/0.1 (terminal football dashboard)")
                .build()
                .unwrap_or_default(),
            base,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl FootballApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client pinned to a specific base URL, used by tests and by anyone
    /// pointing the dashboard at a self-hosted backend.
    pub fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into(), ..Self::default() }
    }

    /// Fetch the team directory from `GET /teams/`.
    ///
    /// `MATCHDAY_SNAPSHOT_JSON` short-circuits to a local snapshot file so
    /// the dashboard works offline against captured data.
    pub async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
        if let Some(snapshot) = load_snapshot()? {
            return Ok(map_teams(snapshot.teams.unwrap_or_default()));
        }
        let url = format!("{}/teams/", self.base);
        let raw: Vec<RawTeam> = self.get(&url).await?;
        Ok(map_teams(raw))
    }

    /// Fetch the full match collection from `GET /matches/`.
    pub async fn fetch_matches(&self) -> ApiResult<Vec<Match>> {
        if let Some(snapshot) = load_snapshot()? {
            return Ok(map_matches(snapshot.matches.unwrap_or_default()));
        }
        let url = format!("{}/matches/", self.base);
        let raw: Vec<RawMatch> = self.get(&url).await?;
        Ok(map_matches(raw))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

fn load_snapshot() -> ApiResult<Option<Snapshot>> {
    let Ok(path) = std::env::var("MATCHDAY_SNAPSHOT_JSON") else {
        return Ok(None);
    };
    if path.trim().is_empty() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| ApiError::NotFound(format!("could not read {path}: {e}")))?;
    let snapshot = serde_json::from_str(&content)
        .map_err(|e| ApiError::NotFound(format!("invalid snapshot json at {path}: {e}")))?;
    Ok(Some(snapshot))
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
//
// This is the normalization boundary from the variant-riddled wire format:
// both date spellings, both score delimiter forms, and pre-split integer
// scores all end here. Records missing an id or a team reference are
// dropped with a warning; records with a bad date are kept without one.
// ---------------------------------------------------------------------------

fn map_teams(raw: Vec<RawTeam>) -> Vec<Team> {
    raw.into_iter()
        .filter_map(|t| {
            let Some(id) = t.id else {
                warn!("skipping team record without an id: {t:?}");
                return None;
            };
            Some(Team { id, name: t.name.unwrap_or_default() })
        })
        .collect()
}

fn map_matches(raw: Vec<RawMatch>) -> Vec<Match> {
    raw.into_iter().filter_map(map_match).collect()
}

fn map_match(raw: RawMatch) -> Option<Match> {
    let (Some(id), Some(home_team), Some(away_team)) =
        (raw.id, raw.home_team_id, raw.away_team_id)
    else {
        warn!("skipping match record without id/team references: {raw:?}");
        return None;
    };

    let date = raw.match_date.as_deref().and_then(|s| {
        let parsed = parse_wire_date(s);
        if parsed.is_none() {
            warn!("match {id}: unparseable date {s:?}");
        }
        parsed
    });

    let final_score = normalize_score_text(raw.final_score)
        .or_else(|| raw.home_score.zip(raw.away_score).map(|(h, a)| format!("{h}-{a}")));

    Some(Match {
        id,
        home_team,
        away_team,
        final_score,
        halftime_score: normalize_score_text(raw.first_half_score),
        date,
        league: raw.league.unwrap_or_default(),
        country: raw.country.filter(|c| !c.trim().is_empty()),
    })
}

/// Collapse `"H - A"` into the canonical `"H-A"` form. Empty and
/// whitespace-only strings become `None`; strings without a delimiter are
/// kept trimmed for the stats layer to default and report.
fn normalize_score_text(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once('-') {
        Some((home, away)) => Some(format!("{}-{}", home.trim(), away.trim())),
        None => Some(trimmed.to_owned()),
    }
}

/// Dates arrive as SQL-style `YYYY-MM-DD`, occasionally with a time suffix.
fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_match(json: &str) -> RawMatch {
        serde_json::from_str(json).expect("valid raw match json")
    }

    #[test]
    fn wire_accepts_both_date_field_spellings() {
        let a = raw_match(r#"{"id":1,"home_team_id":1,"away_team_id":2,"match_date":"2024-03-09"}"#);
        let b = raw_match(r#"{"id":2,"home_team_id":1,"away_team_id":2,"date":"2024-03-10"}"#);
        assert_eq!(a.match_date.as_deref(), Some("2024-03-09"));
        assert_eq!(b.match_date.as_deref(), Some("2024-03-10"));
    }

    #[test]
    fn spaced_delimiter_normalizes_to_compact_form() {
        assert_eq!(normalize_score_text(Some("3 - 1".into())).as_deref(), Some("3-1"));
        assert_eq!(normalize_score_text(Some("3-1".into())).as_deref(), Some("3-1"));
    }

    #[test]
    fn blank_score_becomes_none() {
        assert_eq!(normalize_score_text(Some("".into())), None);
        assert_eq!(normalize_score_text(Some("   ".into())), None);
        assert_eq!(normalize_score_text(None), None);
    }

    #[test]
    fn delimiterless_score_is_kept_for_downstream_reporting() {
        assert_eq!(normalize_score_text(Some(" abandoned ".into())).as_deref(), Some("abandoned"));
    }

    #[test]
    fn wire_date_tolerates_time_suffix() {
        assert_eq!(
            parse_wire_date("2024-03-09T18:30:00"),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
        assert_eq!(parse_wire_date("not a date"), None);
    }

    #[test]
    fn match_without_id_is_dropped() {
        let raw = raw_match(r#"{"home_team_id":1,"away_team_id":2,"final_score":"1-0"}"#);
        assert!(map_match(raw).is_none());
    }

    #[test]
    fn match_with_bad_date_is_kept_undated() {
        let raw = raw_match(
            r#"{"id":5,"home_team_id":1,"away_team_id":2,"final_score":"1-0","match_date":"??"}"#,
        );
        let m = map_match(raw).expect("record should survive a bad date");
        assert_eq!(m.date, None);
        assert_eq!(m.final_score.as_deref(), Some("1-0"));
    }

    #[test]
    fn presplit_integer_scores_synthesize_final_score() {
        let raw = raw_match(
            r#"{"id":6,"home_team_id":1,"away_team_id":2,"home_score":2,"away_score":0,"date":"2024-01-02"}"#,
        );
        let m = map_match(raw).unwrap();
        assert_eq!(m.final_score.as_deref(), Some("2-0"));
    }

    #[test]
    fn null_final_score_maps_to_none() {
        let raw = raw_match(
            r#"{"id":7,"home_team_id":1,"away_team_id":2,"final_score":null,"date":"2024-01-02"}"#,
        );
        let m = map_match(raw).unwrap();
        assert_eq!(m.final_score, None);
    }

    // -----------------------------------------------------------------------
    // Endpoint tests against a local mock server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fetch_teams_maps_wire_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/teams/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"name":"Fenerbahce"},{"id":2,"name":"Besiktas"},{"name":"orphan"}]"#)
            .create_async()
            .await;

        let api = FootballApi::with_base(server.url());
        let teams = api.fetch_teams().await.expect("fetch should succeed");

        mock.assert_async().await;
        assert_eq!(teams.len(), 2, "record without an id must be dropped");
        assert_eq!(teams[0], Team { id: 1, name: "Fenerbahce".into() });
    }

    #[tokio::test]
    async fn fetch_matches_normalizes_scores_and_dates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/matches/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id":1,"home_team_id":1,"away_team_id":2,"final_score":"3 - 1","match_date":"2024-03-09","league":"Super Lig"},
                    {"id":2,"home_team_id":2,"away_team_id":1,"final_score":null,"date":"2024-03-16","league":"Super Lig"}
                ]"#,
            )
            .create_async()
            .await;

        let api = FootballApi::with_base(server.url());
        let matches = api.fetch_matches().await.expect("fetch should succeed");

        mock.assert_async().await;
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].final_score.as_deref(), Some("3-1"));
        assert_eq!(matches[0].date, NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(matches[1].final_score, None);
        assert_eq!(matches[1].league, "Super Lig");
    }

    #[tokio::test]
    async fn server_error_is_surfaced_not_defaulted() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/matches/")
            .with_status(500)
            .create_async()
            .await;

        let api = FootballApi::with_base(server.url());
        let err = api.fetch_matches().await.expect_err("5xx must be an error");
        assert!(matches!(err, ApiError::Api(..)), "got: {err}");
    }
}
