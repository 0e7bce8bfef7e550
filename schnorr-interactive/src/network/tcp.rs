use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::Packet;
use crate::error::ProtocolError;
use crate::network::{Network, PartyId};

/// Upper bound on a single frame. A Schnorr message is one curve point or one
/// scalar, so anything near this size is a desynchronized or hostile peer.
const MAX_FRAME_LEN: u32 = 1 << 20;

const DIAL_ATTEMPTS: u32 = 50;
const DIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Addresses of all parties, indexed by `PartyId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub parties: Vec<String>,
}

impl NetworkConfig {
    pub fn load(path: &Path) -> Result<Self, ProtocolError> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|err| ProtocolError::Config(err.to_string()))
    }
}

/// TCP-backed [`Network`] with one stream per peer.
///
/// Frames are a `u32` little-endian length followed by the payload. A clean
/// EOF before a frame starts means the peer closed; a truncated frame is
/// malformed data.
pub struct TcpNetwork {
    peers: BTreeMap<PartyId, TcpStream>,
}

impl TcpNetwork {
    /// Establishes a full mesh with every other configured party. Lower ids
    /// listen and higher ids dial, so exactly one stream exists per pair; the
    /// dialer announces its id as the first frame.
    pub fn connect(config: &NetworkConfig, my_id: PartyId) -> Result<Self, ProtocolError> {
        if my_id >= config.parties.len() {
            return Err(ProtocolError::Config(format!(
                "party id {} out of range for a {}-party configuration",
                my_id,
                config.parties.len()
            )));
        }

        let mut peers = BTreeMap::new();

        let higher_peers = config.parties.len() - my_id - 1;
        if higher_peers > 0 {
            let listener = TcpListener::bind(&config.parties[my_id])?;
            for _ in 0..higher_peers {
                let (mut stream, addr) = listener.accept()?;
                let peer = match read_frame(&mut stream)? {
                    Some(bytes) if bytes.len() == 4 => {
                        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as PartyId
                    }
                    _ => {
                        return Err(ProtocolError::Malformed(
                            "connecting peer did not announce a party id".into(),
                        ))
                    }
                };
                if peer <= my_id || peer >= config.parties.len() {
                    return Err(ProtocolError::Config(format!(
                        "unexpected party id {} announced by {}",
                        peer, addr
                    )));
                }
                stream.set_nodelay(true)?;
                debug!(peer, %addr, "accepted connection");
                if peers.insert(peer, stream).is_some() {
                    return Err(ProtocolError::Config(format!(
                        "party {} connected twice",
                        peer
                    )));
                }
            }
        }

        for peer in 0..my_id {
            let mut stream = dial(&config.parties[peer])?;
            stream.set_nodelay(true)?;
            write_frame(&mut stream, &(my_id as u32).to_le_bytes())?;
            debug!(peer, addr = %config.parties[peer], "dialed peer");
            peers.insert(peer, stream);
        }

        Ok(Self { peers })
    }

    fn stream(&mut self, peer: PartyId) -> Result<&mut TcpStream, ProtocolError> {
        self.peers
            .get_mut(&peer)
            .ok_or_else(|| ProtocolError::Config(format!("no connection to party {}", peer)))
    }
}

impl Network for TcpNetwork {
    fn send(&mut self, to: PartyId, packet: Packet) -> Result<(), ProtocolError> {
        write_frame(self.stream(to)?, &packet.into_bytes())
    }

    fn recv(&mut self, from: PartyId) -> Result<Option<Packet>, ProtocolError> {
        Ok(read_frame(self.stream(from)?)?.map(Packet::from_bytes))
    }
}

/// The peer may not be listening yet when both processes start together, so
/// dialing retries with a short backoff. This is the only retry anywhere; the
/// protocol itself never retries.
fn dial(addr: &str) -> Result<TcpStream, ProtocolError> {
    let mut last_err = None;
    for _ in 0..DIAL_ATTEMPTS {
        match TcpStream::connect(addr) {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                last_err = Some(err);
                thread::sleep(DIAL_BACKOFF);
            }
        }
    }
    Err(ProtocolError::IoError(format!(
        "could not reach {}: {}",
        addr,
        last_err.expect("at least one dial attempt")
    )))
}

fn write_frame(stream: &mut TcpStream, bytes: &[u8]) -> Result<(), ProtocolError> {
    let len = u32::try_from(bytes.len())
        .ok()
        .filter(|len| *len <= MAX_FRAME_LEN)
        .ok_or_else(|| ProtocolError::IoError(format!("frame of {} bytes too large", bytes.len())))?;
    stream.write_all(&len.to_le_bytes())?;
    stream.write_all(bytes)?;
    Ok(())
}

fn read_frame(stream: &mut TcpStream) -> Result<Option<Vec<u8>>, ProtocolError> {
    let mut header = [0u8; 4];
    match stream.read_exact(&mut header) {
        Ok(()) => {}
        // EOF on a frame boundary: the peer hung up cleanly.
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    }
    let len = u32::from_le_bytes(header);
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::Malformed(format!(
            "frame length {} exceeds limit",
            len
        )));
    }
    let mut bytes = vec![0u8; len as usize];
    match stream.read_exact(&mut bytes) {
        Ok(()) => Ok(Some(bytes)),
        // EOF inside a frame is a truncated message, not a clean close.
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => Err(ProtocolError::Malformed(
            "peer closed mid-frame".into(),
        )),
        Err(err) => Err(err.into()),
    }
}
