//! Threshold secret sharing over prime fields.
//!
//! A secret is split into n shares so that any t of them reconstruct it and
//! any t - 1 reveal nothing. With the `std` feature, [`vault::Vault`] uses
//! this to seal files under a key that no single holder can recover.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod core;
pub mod entropy;
pub mod mpc;

#[cfg(feature = "std")]
pub mod cipher;
#[cfg(feature = "std")]
pub mod storage;
#[cfg(feature = "std")]
pub mod vault;
