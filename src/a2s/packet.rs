// src/a2s/packet.rs
//! A2S_INFO request encoding and reply decoding. All integers are little-endian.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use crate::error::QueryError;
use crate::models::server::{
    ExtendedServerInfo, ServerInfo, ServerOs, ServerType, SourceTvInfo, TheShipInfo,
};

pub const SINGLE_PACKET: i32 = -1;
pub const SPLIT_PACKET: i32 = -2;

pub const A2S_INFO_REQUEST: u8 = 0x54;
pub const S2C_CHALLENGE: u8 = 0x41;
pub const S2A_INFO_SOURCE: u8 = 0x49;
pub const S2A_INFO_GOLDSRC: u8 = 0x6D;

const INFO_PAYLOAD: &[u8] = b"Source Engine Query\0";
const THE_SHIP_APP_ID: u16 = 2400;

const EDF_GAME_ID: u8 = 0x01;
const EDF_STEAM_ID: u8 = 0x10;
const EDF_KEYWORDS: u8 = 0x20;
const EDF_SOURCE_TV: u8 = 0x40;
const EDF_PORT: u8 = 0x80;

/// Set in a split packet's id when the joined payload is bzip2 compressed.
const SPLIT_COMPRESSED: u32 = 0x8000_0000;

/// Largest single UDP payload a Source server sends.
pub const MAX_PACKET_SIZE: usize = 1400;

#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Challenge([u8; 4]),
    Info(ServerInfo),
}

pub fn info_request(challenge: Option<[u8; 4]>) -> Vec<u8> {
    let mut packet = Vec::with_capacity(5 + INFO_PAYLOAD.len() + 4);
    packet.extend_from_slice(&SINGLE_PACKET.to_le_bytes());
    packet.push(A2S_INFO_REQUEST);
    packet.extend_from_slice(INFO_PAYLOAD);
    if let Some(challenge) = challenge {
        packet.extend_from_slice(&challenge);
    }
    packet
}

/// One datagram of a reply the server split across several packets.
#[derive(Debug, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub id: u32,
    pub total: u8,
    pub number: u8,
    pub payload: &'a [u8],
}

/// Reads a Source split packet header. Anything else yields `None` and is
/// left for `parse_reply`.
pub fn parse_fragment(buf: &[u8]) -> Result<Option<Fragment<'_>>, QueryError> {
    let mut reader = PacketReader::new(buf);
    if reader.i32("header")? != SPLIT_PACKET {
        return Ok(None);
    }

    let id = reader.u32("split id")?;
    let total = reader.u8("split total")?;
    let number = reader.u8("split number")?;
    // Maximum packet size the server used; the datagram length is what counts.
    reader.u16("split size")?;

    if id & SPLIT_COMPRESSED != 0 {
        return Err(QueryError::Compressed);
    }
    if total == 0 || number >= total {
        return Err(QueryError::Malformed(format!("split packet {} of {}", number, total)));
    }

    Ok(Some(Fragment {
        id,
        total,
        number,
        payload: reader.rest(),
    }))
}

/// Collects the fragments of one split reply, in whatever order they arrive.
#[derive(Debug)]
pub struct SplitReply {
    id: u32,
    parts: Vec<Option<Vec<u8>>>,
}

impl SplitReply {
    pub fn new(id: u32, total: u8) -> Self {
        Self {
            id,
            parts: vec![None; usize::from(total)],
        }
    }

    /// Stores a fragment and returns the joined payload once every part is in.
    pub fn add(&mut self, fragment: Fragment<'_>) -> Result<Option<Vec<u8>>, QueryError> {
        if fragment.id != self.id || usize::from(fragment.total) != self.parts.len() {
            return Err(QueryError::Malformed(format!(
                "split packet {:#X} does not belong to reply {:#X}",
                fragment.id, self.id
            )));
        }

        self.parts[usize::from(fragment.number)] = Some(fragment.payload.to_vec());
        if self.parts.iter().any(Option::is_none) {
            return Ok(None);
        }

        Ok(Some(self.parts.iter().flatten().flatten().copied().collect()))
    }
}

pub fn parse_reply(buf: &[u8]) -> Result<Reply, QueryError> {
    let mut reader = PacketReader::new(buf);

    match reader.i32("header")? {
        SINGLE_PACKET => {}
        SPLIT_PACKET => return Err(QueryError::SplitPacket),
        other => return Err(QueryError::UnexpectedHeader(other)),
    }

    match reader.u8("response type")? {
        S2C_CHALLENGE => {
            let mut challenge = [0u8; 4];
            for byte in challenge.iter_mut() {
                *byte = reader.u8("challenge")?;
            }
            Ok(Reply::Challenge(challenge))
        }
        S2A_INFO_SOURCE => parse_info(&mut reader).map(Reply::Info),
        kind => Err(QueryError::UnsupportedResponse(kind)),
    }
}

fn parse_info(reader: &mut PacketReader<'_>) -> Result<ServerInfo, QueryError> {
    let protocol = reader.u8("protocol")?;
    let name = reader.cstring("name")?;
    let map = reader.cstring("map")?;
    let folder = reader.cstring("folder")?;
    let game = reader.cstring("game")?;
    let id = reader.u16("app id")?;
    let players = reader.u8("players")?;
    let max_players = reader.u8("max players")?;
    let bots = reader.u8("bots")?;
    let server_type = ServerType::from(reader.u8("server type")?);
    let server_os = ServerOs::from(reader.u8("environment")?);
    let visibility = reader.u8("visibility")? == 1;
    let vac = reader.u8("vac")? == 1;

    let the_ship = if id == THE_SHIP_APP_ID {
        Some(TheShipInfo {
            mode: reader.u8("ship mode")?,
            witnesses: reader.u8("ship witnesses")?,
            duration: reader.u8("ship duration")?,
        })
    } else {
        None
    };

    let version = reader.cstring("version")?;

    // Older servers stop after the version string.
    let edf = if reader.is_empty() { 0 } else { reader.u8("edf")? };

    let mut extended = ExtendedServerInfo::default();
    let mut source_tv = None;

    if edf & EDF_PORT != 0 {
        extended.port = reader.u16("port")?;
    }
    if edf & EDF_STEAM_ID != 0 {
        extended.steam_id = reader.u64("steam id")?;
    }
    if edf & EDF_SOURCE_TV != 0 {
        source_tv = Some(SourceTvInfo {
            port: reader.u16("sourcetv port")?,
            name: reader.cstring("sourcetv name")?,
        });
    }
    if edf & EDF_KEYWORDS != 0 {
        extended.keywords = reader.cstring("keywords")?;
    }
    if edf & EDF_GAME_ID != 0 {
        extended.game_id = reader.u64("game id")?;
    }

    let has_extended = edf & (EDF_PORT | EDF_STEAM_ID | EDF_KEYWORDS | EDF_GAME_ID) != 0;

    Ok(ServerInfo {
        protocol,
        name,
        map,
        folder,
        game,
        id,
        players,
        max_players,
        bots,
        server_type,
        server_os,
        visibility,
        vac,
        the_ship,
        version,
        edf,
        extended_server_info: has_extended.then_some(extended),
        source_tv,
    })
}

struct PacketReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> PacketReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(buf) }
    }

    fn is_empty(&self) -> bool {
        self.cursor.position() as usize >= self.cursor.get_ref().len()
    }

    fn u8(&mut self, field: &str) -> Result<u8, QueryError> {
        self.cursor.read_u8().map_err(|_| truncated(field))
    }

    fn u16(&mut self, field: &str) -> Result<u16, QueryError> {
        self.cursor.read_u16::<LittleEndian>().map_err(|_| truncated(field))
    }

    fn i32(&mut self, field: &str) -> Result<i32, QueryError> {
        self.cursor.read_i32::<LittleEndian>().map_err(|_| truncated(field))
    }

    fn u32(&mut self, field: &str) -> Result<u32, QueryError> {
        self.cursor.read_u32::<LittleEndian>().map_err(|_| truncated(field))
    }

    fn u64(&mut self, field: &str) -> Result<u64, QueryError> {
        self.cursor.read_u64::<LittleEndian>().map_err(|_| truncated(field))
    }

    fn rest(&self) -> &'a [u8] {
        let buf: &'a [u8] = *self.cursor.get_ref();
        buf.get(self.cursor.position() as usize..).unwrap_or(&[])
    }

    fn cstring(&mut self, field: &str) -> Result<String, QueryError> {
        let buf: &'a [u8] = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        let rest = buf.get(start..).ok_or_else(|| truncated(field))?;
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| QueryError::Malformed(format!("unterminated string in {}", field)))?;
        self.cursor.set_position((start + end + 1) as u64);
        Ok(String::from_utf8_lossy(&rest[..end]).into_owned())
    }
}

fn truncated(field: &str) -> QueryError {
    QueryError::Malformed(format!("packet truncated at {}", field))
}
