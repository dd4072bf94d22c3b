// src/exporter.rs
//! Poll-driven state for the status endpoint: the latest server info and the
//! last time anyone was seen playing.

use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use crate::a2s::ServerQuery;
use crate::error::QueryError;
use crate::models::server::ServerInfo;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExporterState {
    pub last_result: Option<ServerInfo>,
    /// Latched: set on the first poll with players, never cleared or moved back.
    pub last_player_seen: Option<DateTime<Utc>>,
}

/// What a single successful poll hands back for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    #[serde(rename = "ServerInfo")]
    pub server_info: ServerInfo,
    #[serde(rename = "LastPlayerSeen", skip_serializing_if = "Option::is_none")]
    pub last_player_seen: Option<DateTime<Utc>>,
}

pub struct Exporter {
    client: Arc<dyn ServerQuery>,
    clock: Arc<dyn Clock>,
    state: Mutex<ExporterState>,
}

impl Exporter {
    pub fn new(client: Arc<dyn ServerQuery>) -> Self {
        Self::with_clock(client, Arc::new(SystemClock))
    }

    pub fn with_clock(client: Arc<dyn ServerQuery>, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            clock,
            state: Mutex::new(ExporterState::default()),
        }
    }

    /// Queries the server once and publishes the result.
    ///
    /// The query itself runs without holding the lock so a slow upstream does
    /// not stall other requests. Updating the state and taking the snapshot
    /// happen under one lock, so a snapshot always pairs a result with the
    /// latch value computed alongside it. A failed query leaves state alone.
    pub async fn poll(&self) -> Result<Snapshot, QueryError> {
        let info = self.client.query_info().await?;

        let mut state = self.state.lock();
        if info.has_players() {
            let now = self.clock.now();
            let seen = match state.last_player_seen {
                Some(previous) if previous > now => previous,
                _ => now,
            };
            state.last_player_seen = Some(seen);
        }
        debug!(
            "Polled {} ({}/{} players), last player seen: {:?}",
            info.name, info.players, info.max_players, state.last_player_seen
        );
        state.last_result = Some(info.clone());

        Ok(Snapshot {
            server_info: info,
            last_player_seen: state.last_player_seen,
        })
    }

    pub fn state(&self) -> ExporterState {
        self.state.lock().clone()
    }
}
