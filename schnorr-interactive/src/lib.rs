pub mod codec;
pub mod error;
pub mod network;
pub mod protocol;
pub mod schnorr;
