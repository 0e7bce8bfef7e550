pub mod prover;
pub mod verifier;

use ark_ec::{AffineCurve, ProjectiveCurve};
use ark_ff::{PrimeField, Zero};
use ark_std::rand::Rng;
use ark_std::UniformRand;

use crate::network::PartyId;

/// Channel addresses of the two roles.
pub const PROVER: PartyId = 0;
pub const VERIFIER: PartyId = 1;

/// Public parameters of the identification scheme: the group generator $G$.
#[derive(Copy, Clone)]
pub struct Parameters<C: ProjectiveCurve> {
    pub generator: C::Affine,
}

impl<C: ProjectiveCurve> Parameters<C> {
    pub fn new() -> Self {
        Self {
            generator: C::prime_subgroup_generator().into_affine(),
        }
    }
}

impl<C: ProjectiveCurve> Default for Parameters<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// The prover's long-term key: a secret scalar $x$ and the public point
/// $Y = xG$. Only $Y$ is ever disclosed.
#[derive(Copy, Clone)]
pub struct KeyPair<C: ProjectiveCurve> {
    pub secret: C::ScalarField,
    pub public: C::Affine,
}

impl<C: ProjectiveCurve> KeyPair<C> {
    pub fn from_secret(parameters: &Parameters<C>, secret: C::ScalarField) -> Self {
        Self {
            secret,
            public: parameters.generator.mul(secret.into_repr()).into_affine(),
        }
    }

    pub fn generate<R: Rng>(parameters: &Parameters<C>, rng: &mut R) -> Self {
        Self::from_secret(parameters, C::ScalarField::rand(rng))
    }
}

/// The verification predicate over a full transcript $(Y, A, e, z)$:
/// accept iff $A + eY - zG$ is the point at infinity, i.e. $A + eY = zG$.
pub fn check_transcript<C: ProjectiveCurve>(
    parameters: &Parameters<C>,
    public: &C::Affine,
    commitment: &C::Affine,
    challenge: &C::ScalarField,
    response: &C::ScalarField,
) -> bool {
    let lhs = commitment.into_projective() + public.mul(challenge.into_repr());
    (lhs - parameters.generator.mul(response.into_repr())).is_zero()
}
