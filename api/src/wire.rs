/// Dashboard API raw wire types — serde shapes for deserializing `/teams/`
/// and `/matches/` responses. These map to the clean domain types via the
/// normalization functions in client.rs.
///
/// The deployed API variants disagree on two points, both absorbed here:
/// the match date is spelled either `match_date` or `date`, and score
/// strings come as `"H-A"` or `"H - A"`.
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawTeam {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawMatch {
    pub id: Option<i64>,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub final_score: Option<String>,
    pub first_half_score: Option<String>,
    #[serde(alias = "date")]
    pub match_date: Option<String>,
    pub league: Option<String>,
    pub country: Option<String>,
    /// Some backend variants pre-split the score server-side.
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

/// Local snapshot file layout for `MATCHDAY_SNAPSHOT_JSON`: both
/// collections in one document.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Snapshot {
    pub teams: Option<Vec<RawTeam>>,
    pub matches: Option<Vec<RawMatch>>,
}
