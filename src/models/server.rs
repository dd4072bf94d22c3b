// src/models/server.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerType {
    Dedicated,
    NonDedicated,
    Proxy,
    Unknown,
}

impl From<u8> for ServerType {
    fn from(b: u8) -> Self {
        match b {
            b'd' | b'D' => Self::Dedicated,
            b'l' | b'L' => Self::NonDedicated,
            b'p' | b'P' => Self::Proxy,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerOs {
    Linux,
    Windows,
    Mac,
    Unknown,
}

impl From<u8> for ServerOs {
    fn from(b: u8) -> Self {
        match b {
            b'l' | b'L' => Self::Linux,
            b'w' | b'W' => Self::Windows,
            b'm' | b'M' | b'o' | b'O' => Self::Mac,
            _ => Self::Unknown,
        }
    }
}

/// Extra block only sent by The Ship (app id 2400).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TheShipInfo {
    pub mode: u8,
    pub witnesses: u8,
    pub duration: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtendedServerInfo {
    pub port: u16,
    #[serde(rename = "SteamID")]
    pub steam_id: u64,
    pub keywords: String,
    #[serde(rename = "GameID")]
    pub game_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceTvInfo {
    pub port: u16,
    pub name: String,
}

/// Decoded A2S_INFO reply. Passed through to the JSON output as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerInfo {
    pub protocol: u8,
    pub name: String,
    pub map: String,
    pub folder: String,
    pub game: String,
    #[serde(rename = "ID")]
    pub id: u16,
    pub players: u8,
    pub max_players: u8,
    pub bots: u8,
    pub server_type: ServerType,
    #[serde(rename = "ServerOS")]
    pub server_os: ServerOs,
    pub visibility: bool,
    #[serde(rename = "VAC")]
    pub vac: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub the_ship: Option<TheShipInfo>,
    pub version: String,
    #[serde(rename = "EDF")]
    pub edf: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_server_info: Option<ExtendedServerInfo>,
    #[serde(rename = "SourceTV", skip_serializing_if = "Option::is_none")]
    pub source_tv: Option<SourceTvInfo>,
}

impl ServerInfo {
    pub fn has_players(&self) -> bool {
        self.players > 0
    }
}
