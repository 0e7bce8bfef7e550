use ark_ec::ProjectiveCurve;
use ark_std::rand::Rng;
use ark_std::UniformRand;
use tracing::debug;

use super::{check_transcript, Parameters, PROVER};
use crate::codec::Packet;
use crate::error::ProtocolError;
use crate::network::Network;
use crate::protocol::{Party, Step};

enum Stage<C: ProjectiveCurve> {
    ReceiveKey,
    Challenge {
        public: C::Affine,
    },
    Verify {
        public: C::Affine,
        commitment: C::Affine,
        challenge: C::ScalarField,
    },
    Finished {
        accept: bool,
    },
}

/// The verifying role. Holds no secret.
///
/// Three moves: receive the public key, receive the commitment and answer
/// with a uniformly random challenge, then check the response against the
/// transcript. The outcome is a plain boolean; a rejected proof is a normal
/// result, not a fault.
pub struct Verifier<C: ProjectiveCurve> {
    parameters: Parameters<C>,
    stage: Stage<C>,
}

impl<C: ProjectiveCurve> Verifier<C> {
    pub fn new(parameters: Parameters<C>) -> Self {
        Self {
            parameters,
            stage: Stage::ReceiveKey,
        }
    }
}

impl<C: ProjectiveCurve> Party for Verifier<C> {
    type Output = bool;

    fn advance<R: Rng, N: Network>(
        &mut self,
        rng: &mut R,
        network: &mut N,
    ) -> Result<Step<bool>, ProtocolError> {
        match std::mem::replace(&mut self.stage, Stage::Finished { accept: false }) {
            Stage::ReceiveKey => {
                let mut packet = network.recv(PROVER)?.ok_or(ProtocolError::Abort(PROVER))?;
                let public: C::Affine = packet.read()?;
                debug!("verifier received public key");
                self.stage = Stage::Challenge { public };
                Ok(Step::Continue)
            }
            Stage::Challenge { public } => {
                let mut packet = network.recv(PROVER)?.ok_or(ProtocolError::Abort(PROVER))?;
                let commitment: C::Affine = packet.read()?;
                debug!("verifier received commitment");

                let challenge = C::ScalarField::rand(rng);
                let mut reply = Packet::new();
                reply.write(&challenge)?;
                network.send(PROVER, reply)?;
                debug!("verifier sent challenge");

                self.stage = Stage::Verify {
                    public,
                    commitment,
                    challenge,
                };
                Ok(Step::Continue)
            }
            Stage::Verify {
                public,
                commitment,
                challenge,
            } => {
                let mut packet = network.recv(PROVER)?.ok_or(ProtocolError::Abort(PROVER))?;
                let response: C::ScalarField = packet.read()?;
                debug!("verifier received response");

                let accept = check_transcript(
                    &self.parameters,
                    &public,
                    &commitment,
                    &challenge,
                    &response,
                );
                self.stage = Stage::Finished { accept };
                Ok(Step::Done(accept))
            }
            Stage::Finished { accept } => Ok(Step::Done(accept)),
        }
    }
}
