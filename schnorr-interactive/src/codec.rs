use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::ProtocolError;

/// A single message on the wire: a sequence of fixed-width values in send
/// order. There is no embedded type tag; the reader must know the expected
/// type at each position, which the protocol's move order guarantees.
///
/// Values use the uncompressed arkworks encoding, so every value of a given
/// type occupies exactly `uncompressed_size()` bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    buf: Vec<u8>,
    cursor: usize,
}

impl Packet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps bytes received from a channel for reading.
    pub fn from_bytes(buf: Vec<u8>) -> Self {
        Self { buf, cursor: 0 }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Appends one value to the packet.
    pub fn write<T: CanonicalSerialize>(&mut self, value: &T) -> Result<(), ProtocolError> {
        value.serialize_uncompressed(&mut self.buf)?;
        Ok(())
    }

    /// Decodes the next value, advancing the cursor by exactly the bytes
    /// consumed. Trailing garbage or a truncated value is a fatal
    /// [`ProtocolError::Malformed`].
    pub fn read<T: CanonicalDeserialize>(&mut self) -> Result<T, ProtocolError> {
        let mut reader = &self.buf[self.cursor..];
        let remaining = reader.len();
        let value = T::deserialize_uncompressed(&mut reader)?;
        self.cursor += remaining - reader.len();
        Ok(value)
    }
}

#[cfg(test)]
mod test {
    use super::Packet;
    use crate::error::ProtocolError;
    use ark_bls12_381::{Fr, G1Affine, G1Projective};
    use ark_ec::ProjectiveCurve;
    use ark_serialize::CanonicalSerialize;
    use ark_std::UniformRand;
    use rand::thread_rng;

    #[test]
    fn round_trips_scalars_and_points() {
        let mut rng = thread_rng();
        let scalar = Fr::rand(&mut rng);
        let point = G1Projective::rand(&mut rng).into_affine();

        let mut packet = Packet::new();
        packet.write(&point).unwrap();
        packet.write(&scalar).unwrap();

        let mut received = Packet::from_bytes(packet.into_bytes());
        assert_eq!(received.read::<G1Affine>().unwrap(), point);
        assert_eq!(received.read::<Fr>().unwrap(), scalar);
    }

    #[test]
    fn encoding_is_fixed_width() {
        let mut rng = thread_rng();
        for _ in 0..8 {
            let scalar = Fr::rand(&mut rng);
            let point = G1Projective::rand(&mut rng).into_affine();

            let mut packet = Packet::new();
            packet.write(&scalar).unwrap();
            assert_eq!(packet.len(), scalar.uncompressed_size());

            let mut packet = Packet::new();
            packet.write(&point).unwrap();
            assert_eq!(packet.len(), point.uncompressed_size());
        }
    }

    #[test]
    fn truncated_value_is_malformed() {
        let mut rng = thread_rng();
        let point = G1Projective::rand(&mut rng).into_affine();

        let mut packet = Packet::new();
        packet.write(&point).unwrap();
        let mut bytes = packet.into_bytes();
        bytes.truncate(bytes.len() / 2);

        let mut received = Packet::from_bytes(bytes);
        assert!(matches!(
            received.read::<G1Affine>(),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn reading_an_empty_packet_is_malformed() {
        let mut packet = Packet::new();
        assert!(matches!(
            packet.read::<Fr>(),
            Err(ProtocolError::Malformed(_))
        ));
    }
}
