use ark_ec::{AffineCurve, ProjectiveCurve};
use ark_ff::PrimeField;
use ark_std::rand::Rng;
use ark_std::UniformRand;
use tracing::debug;

use super::{KeyPair, Parameters, VERIFIER};
use crate::codec::Packet;
use crate::error::ProtocolError;
use crate::network::Network;
use crate::protocol::{Party, Step};

enum Stage<C: ProjectiveCurve> {
    SendKey,
    Commit,
    Respond { nonce: C::ScalarField },
    Finished,
}

/// The proving role. Holds the secret scalar for the whole session; the
/// per-session nonce lives only inside the stage that needs it.
///
/// Three moves: send the public key, send a commitment $A = rG$ to a fresh
/// nonce, then answer the verifier's challenge with $z = r + ex$.
pub struct Prover<C: ProjectiveCurve> {
    parameters: Parameters<C>,
    keypair: KeyPair<C>,
    stage: Stage<C>,
}

impl<C: ProjectiveCurve> Prover<C> {
    pub fn new(parameters: Parameters<C>, keypair: KeyPair<C>) -> Self {
        Self {
            parameters,
            keypair,
            stage: Stage::SendKey,
        }
    }
}

impl<C: ProjectiveCurve> Party for Prover<C> {
    type Output = ();

    fn advance<R: Rng, N: Network>(
        &mut self,
        rng: &mut R,
        network: &mut N,
    ) -> Result<Step<()>, ProtocolError> {
        // A fault mid-move leaves the stage terminal; the session is never
        // resumed from a partial move.
        match std::mem::replace(&mut self.stage, Stage::Finished) {
            Stage::SendKey => {
                let mut packet = Packet::new();
                packet.write(&self.keypair.public)?;
                network.send(VERIFIER, packet)?;
                debug!("prover sent public key");
                self.stage = Stage::Commit;
                Ok(Step::Continue)
            }
            Stage::Commit => {
                let nonce = C::ScalarField::rand(rng);
                let commitment = self
                    .parameters
                    .generator
                    .mul(nonce.into_repr())
                    .into_affine();
                let mut packet = Packet::new();
                packet.write(&commitment)?;
                network.send(VERIFIER, packet)?;
                debug!("prover sent commitment");
                self.stage = Stage::Respond { nonce };
                Ok(Step::Continue)
            }
            Stage::Respond { nonce } => {
                let mut packet = network
                    .recv(VERIFIER)?
                    .ok_or(ProtocolError::Abort(VERIFIER))?;
                let challenge: C::ScalarField = packet.read()?;
                debug!("prover received challenge");
                let response = nonce + challenge * self.keypair.secret;
                let mut reply = Packet::new();
                reply.write(&response)?;
                network.send(VERIFIER, reply)?;
                debug!("prover sent response");
                Ok(Step::Done(()))
            }
            Stage::Finished => Ok(Step::Done(())),
        }
    }
}
