use std::sync::mpsc::{channel, Receiver, Sender};

use crate::codec::Packet;
use crate::error::ProtocolError;
use crate::network::{Network, PartyId};

/// One side of an in-memory two-party channel. Loss-free and ordered, so a
/// protocol run over a pair of these exercises exactly the message sequence
/// the wire would carry.
pub struct LocalEndpoint {
    peer: PartyId,
    outgoing: Sender<Vec<u8>>,
    incoming: Receiver<Vec<u8>>,
}

/// Creates connected endpoints for party 0 and party 1.
pub fn pair() -> (LocalEndpoint, LocalEndpoint) {
    let (tx_to_one, rx_from_zero) = channel();
    let (tx_to_zero, rx_from_one) = channel();

    let zero = LocalEndpoint {
        peer: 1,
        outgoing: tx_to_one,
        incoming: rx_from_one,
    };
    let one = LocalEndpoint {
        peer: 0,
        outgoing: tx_to_zero,
        incoming: rx_from_zero,
    };
    (zero, one)
}

impl Network for LocalEndpoint {
    fn send(&mut self, to: PartyId, packet: Packet) -> Result<(), ProtocolError> {
        if to != self.peer {
            return Err(ProtocolError::Config(format!(
                "no route to party {} from this endpoint",
                to
            )));
        }
        // A closed receiver means the peer is gone; the local send surfaces
        // it immediately instead of on the next recv.
        self.outgoing
            .send(packet.into_bytes())
            .map_err(|_| ProtocolError::Abort(to))
    }

    fn recv(&mut self, from: PartyId) -> Result<Option<Packet>, ProtocolError> {
        if from != self.peer {
            return Err(ProtocolError::Config(format!(
                "no route from party {} to this endpoint",
                from
            )));
        }
        match self.incoming.recv() {
            Ok(bytes) => Ok(Some(Packet::from_bytes(bytes))),
            Err(_) => Ok(None),
        }
    }
}
