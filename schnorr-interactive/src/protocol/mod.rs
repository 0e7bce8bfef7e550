use ark_std::rand::Rng;
use tracing::trace;

use crate::error::ProtocolError;
use crate::network::Network;

/// Outcome of one advance of a role's state machine.
pub enum Step<T> {
    Continue,
    Done(T),
}

/// One role of an interactive protocol, modelled as an explicit state machine.
///
/// Each `advance` performs the channel operations of exactly one move and
/// either continues or terminates with the role's output. A role never
/// revisits an earlier state and never retries a failed move.
pub trait Party {
    type Output;

    fn advance<R: Rng, N: Network>(
        &mut self,
        rng: &mut R,
        network: &mut N,
    ) -> Result<Step<Self::Output>, ProtocolError>;
}

/// Drives a role from its initial state to termination, returning its output.
///
/// The driver knows nothing about the protocol itself: it sequences advances
/// and propagates the first fault without taking another step.
pub fn run_protocol<P, R, N>(
    party: &mut P,
    rng: &mut R,
    network: &mut N,
) -> Result<P::Output, ProtocolError>
where
    P: Party,
    R: Rng,
    N: Network,
{
    let mut moves = 0usize;
    loop {
        match party.advance(rng, network)? {
            Step::Continue => {
                moves += 1;
                trace!(moves, "round complete");
            }
            Step::Done(output) => return Ok(output),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{run_protocol, Party, Step};
    use crate::error::ProtocolError;
    use crate::network::local::pair;
    use crate::network::Network;
    use ark_std::rand::Rng;
    use rand::thread_rng;

    /// Counts down a fixed number of moves, optionally failing partway.
    struct Countdown {
        remaining: usize,
        fail_at: Option<usize>,
        advances: usize,
    }

    impl Party for Countdown {
        type Output = usize;

        fn advance<R: Rng, N: Network>(
            &mut self,
            _rng: &mut R,
            _network: &mut N,
        ) -> Result<Step<usize>, ProtocolError> {
            self.advances += 1;
            if self.fail_at == Some(self.advances) {
                return Err(ProtocolError::Abort(0));
            }
            if self.advances >= self.remaining {
                Ok(Step::Done(self.advances))
            } else {
                Ok(Step::Continue)
            }
        }
    }

    #[test]
    fn drives_to_completion() {
        let (mut network, _other) = pair();
        let mut party = Countdown {
            remaining: 3,
            fail_at: None,
            advances: 0,
        };
        let output = run_protocol(&mut party, &mut thread_rng(), &mut network).unwrap();
        assert_eq!(output, 3);
        assert_eq!(party.advances, 3);
    }

    #[test]
    fn stops_at_first_fault() {
        let (mut network, _other) = pair();
        let mut party = Countdown {
            remaining: 3,
            fail_at: Some(2),
            advances: 0,
        };
        let result = run_protocol(&mut party, &mut thread_rng(), &mut network);
        assert_eq!(result, Err(ProtocolError::Abort(0)));
        assert_eq!(party.advances, 2, "driver must not advance past a fault");
    }
}
