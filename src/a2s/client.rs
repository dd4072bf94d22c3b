// src/a2s/client.rs
use async_trait::async_trait;
use log::debug;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use tokio::net::UdpSocket;
use crate::a2s::packet::{self, Reply, SplitReply, MAX_PACKET_SIZE};
use crate::error::{ConstructionError, QueryError};
use crate::models::server::ServerInfo;

/// Number of challenge replies tolerated before giving up on a query.
const MAX_CHALLENGES: usize = 3;

/// Anything that can fetch live server info. Implementations must be safe to
/// call concurrently; every call is one upstream round-trip with no retry.
#[async_trait]
pub trait ServerQuery: Send + Sync {
    async fn query_info(&self) -> Result<ServerInfo, QueryError>;
}

/// A2S_INFO client over UDP. Each query uses its own ephemeral socket so
/// concurrent requests never read each other's replies.
#[derive(Debug, Clone)]
pub struct A2sClient {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl A2sClient {
    pub fn new(address: &str, timeout: Duration) -> Result<Self, ConstructionError> {
        let server_addr = address
            .to_socket_addrs()
            .map_err(|source| ConstructionError::Resolve {
                address: address.to_string(),
                source,
            })?
            .next()
            .ok_or_else(|| ConstructionError::NoAddress(address.to_string()))?;

        Ok(Self { server_addr, timeout })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    async fn round_trip(&self, socket: &UdpSocket, request: &[u8]) -> Result<Reply, QueryError> {
        socket.send(request).await?;

        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let mut split: Option<SplitReply> = None;
        loop {
            let len = tokio::time::timeout(self.timeout, socket.recv(&mut buffer))
                .await
                .map_err(|_| QueryError::Timeout(self.timeout))??;
            debug!("Received {} bytes from {}", len, self.server_addr);

            let datagram = &buffer[..len];
            let fragment = match packet::parse_fragment(datagram)? {
                Some(fragment) => fragment,
                None => return packet::parse_reply(datagram),
            };

            debug!(
                "Split reply {:#X} from {}: part {} of {}",
                fragment.id,
                self.server_addr,
                fragment.number + 1,
                fragment.total
            );
            let assembly = split.get_or_insert_with(|| SplitReply::new(fragment.id, fragment.total));
            if let Some(payload) = assembly.add(fragment)? {
                return packet::parse_reply(&payload);
            }
        }
    }
}

#[async_trait]
impl ServerQuery for A2sClient {
    async fn query_info(&self) -> Result<ServerInfo, QueryError> {
        let local: SocketAddr = if self.server_addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(self.server_addr).await?;

        let mut request = packet::info_request(None);
        for _ in 0..=MAX_CHALLENGES {
            match self.round_trip(&socket, &request).await? {
                Reply::Info(info) => return Ok(info),
                Reply::Challenge(challenge) => {
                    debug!("Server {} answered with challenge {:02X?}", self.server_addr, challenge);
                    request = packet::info_request(Some(challenge));
                }
            }
        }

        Err(QueryError::ChallengeLoop)
    }
}
