pub mod automorphism;
pub mod context;
pub mod conversion;
pub mod multiplication;
pub mod rescaling_rns;
pub mod ring;
pub mod sampling;
