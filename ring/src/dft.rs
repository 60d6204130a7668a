//! Number theoretic transforms over a single prime.
pub mod ntt;
