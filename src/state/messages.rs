use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use footy_api::{Match, Team};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadData,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// Both collections together: the UI never renders one without the other.
    DataLoaded { teams: Vec<Team>, matches: Vec<Match> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
