//! Event types for the TUI event loop.

use crate::api_client::ApiClientError;
use crate::export::{ExportDelivery, ExportError};
use crate::fetcher::FetchError;
use crate::requests::InFlight;
use achv_core::{Identity, ProgressTree, Realm, Region};
use crossterm::event::KeyEvent;

/// What the user asked to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub identity: Identity,
    pub achievement_id: Option<u64>,
}

/// A finished lookup. The guard keeps the request counted as in flight
/// until the outcome has been applied or discarded.
#[derive(Debug)]
pub struct LookupOutcome {
    pub request: LookupRequest,
    pub result: Result<ProgressTree, FetchError>,
    pub guard: InFlight,
}

#[derive(Debug)]
pub struct RealmsOutcome {
    pub region: Region,
    pub result: Result<Vec<Realm>, ApiClientError>,
    pub guard: InFlight,
}

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    LookupFinished(Box<LookupOutcome>),
    RealmsLoaded(RealmsOutcome),
    ExportFinished(Result<ExportDelivery, ExportError>),
}
