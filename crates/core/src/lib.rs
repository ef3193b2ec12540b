#![deny(unsafe_code)]
//! Core types for the particle-field animation.
//!
//! Provides [`ParticleField`] (point population, per-frame physics, fading
//! connection lines, pointer interaction), its [`FieldConfig`], the
//! [`Surface`] drawing seam with the [`scale`] helper and a [`Recorder`],
//! host/subscription types, the `Xorshift64` PRNG, and a cancellable
//! [`FrameLoop`].

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod frame_loop;
pub mod host;
pub mod params;
pub mod point;
pub mod prng;
pub mod surface;

pub use color::Srgb;
pub use config::FieldConfig;
pub use error::FieldError;
pub use field::{FrameStats, ParticleField, Pointer};
pub use frame_loop::{CancellationToken, FrameLoop, LoopExit, LoopSummary};
pub use host::{FixedHost, HostElement, Subscription};
pub use point::Point;
pub use prng::Xorshift64;
pub use surface::{scale, DrawCommand, Recorder, Surface};
