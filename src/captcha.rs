//! Slider puzzle captcha.
//!
//! Background provisioning, piece geometry, cutting, and similarity-based
//! verification.

pub mod background;
pub mod cutter;
pub mod generator;
pub mod geometry;
pub mod pool;
pub mod result;
pub mod similarity;

pub use background::BuiltinBackground;
pub use generator::{SliderCaptchaGenerator, cut_challenge};
pub use geometry::{PieceShape, Placement};
pub use pool::ChallengePool;
pub use result::{SliderChallenge, SmartReport, VerifyReport};
pub use similarity::BestMatch;

/// Contract shared by every captcha kind: a canonical answer and a check of
/// user input against it.
pub trait Captcha {
    /// Canonical answer as text.
    fn answer(&self) -> String;

    /// Checks raw user input.
    fn verify(&self, input: &str) -> bool;
}
