//! Entropy sources and ring-independent discrete distributions.
//!
//! [`source::Source`] is a seeded ChaCha8 stream: two sources built from the
//! same seed emit the same words, which is what deterministic public
//! randomness relies on. [`knuth_yao::KnuthYao`] samples a truncated discrete
//! Gaussian from any [`rand_core::TryRngCore`], so failures of fallible
//! sources (e.g. the OS RNG) reach the caller instead of being masked.

pub mod knuth_yao;
pub mod source;
