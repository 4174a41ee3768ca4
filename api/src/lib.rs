pub mod client;
pub mod wire;

use chrono::NaiveDate;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the dashboard API wire format
// ---------------------------------------------------------------------------

pub type TeamId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// A single match, normalized at the ingestion boundary: score strings use
/// the `"H-A"` delimiter form, and the date carries whichever of the API's
/// two field spellings was present, parsed to a calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Match {
    pub id: i64,
    pub home_team: TeamId,
    pub away_team: TeamId,
    /// `None` when the API sent null/empty; aggregates treat it as 0-0.
    pub final_score: Option<String>,
    pub halftime_score: Option<String>,
    /// `None` when the date was absent or unparseable. Such matches are
    /// excluded from date-bounded views and sorted after dated ones.
    pub date: Option<NaiveDate>,
    pub league: String,
    pub country: Option<String>,
}

impl Match {
    pub fn involves(&self, team: TeamId) -> bool {
        self.home_team == team || self.away_team == team
    }

    pub fn is_home(&self, team: TeamId) -> bool {
        self.home_team == team
    }

    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if self.home_team == team {
            Some(self.away_team)
        } else if self.away_team == team {
            Some(self.home_team)
        } else {
            None
        }
    }
}

/// Id → team lookup built once per load from the `/teams/` collection.
#[derive(Debug, Clone, Default)]
pub struct TeamIndex {
    by_id: HashMap<TeamId, Team>,
}

impl TeamIndex {
    pub fn new(teams: &[Team]) -> Self {
        Self {
            by_id: teams.iter().map(|t| (t.id, t.clone())).collect(),
        }
    }

    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.by_id.get(&id)
    }

    pub fn name_of(&self, id: TeamId) -> Option<&str> {
        self.by_id.get(&id).map(|t| t.name.as_str())
    }

    /// Display name with a `#id` fallback for teams missing from the
    /// directory, so tables never render a blank cell.
    pub fn display_name(&self, id: TeamId) -> String {
        self.name_of(id)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("#{id}"))
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.by_id.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
