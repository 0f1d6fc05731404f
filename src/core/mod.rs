//! Finite-field arithmetic.
//!
//! # Components
//! - `field`: `PrimeField`, modular add/sub/mul/inverse and fixed-width encoding.
//! - `element`: `FieldElement`, a zeroizing canonical residue.
//! - `prime`: Miller-Rabin check for caller-supplied moduli.

pub mod element;
pub mod field;
pub mod prime;

pub use element::FieldElement;
pub use field::{FieldError, PrimeField};
