pub mod local;
pub mod tcp;

use crate::codec::Packet;
use crate::error::ProtocolError;

/// Index addressing a party on the channel. The prover is party 0 and the
/// verifier party 1.
pub type PartyId = usize;

/// Point-to-point reliable ordered channel between named parties.
///
/// `send` is fire-and-forget from the sender's perspective. `recv` blocks
/// until a message arrives and yields `None` once the peer has closed the
/// connection; the protocol layer applies no timeout of its own.
pub trait Network {
    fn send(&mut self, to: PartyId, packet: Packet) -> Result<(), ProtocolError>;

    fn recv(&mut self, from: PartyId) -> Result<Option<Packet>, ProtocolError>;
}
