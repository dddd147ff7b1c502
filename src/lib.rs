//! Library definitions.
//!
//! Exports the slider captcha engine, its configuration, and image encoding
//! helpers.

pub mod captcha;
pub mod config;
pub mod encoding;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
pub use captcha::{
    BestMatch, BuiltinBackground, Captcha, ChallengePool, Placement, SliderCaptchaGenerator,
    SliderChallenge, VerifyReport, cut_challenge,
};
pub use config::{CaptchaError, Config, Result};
pub use encoding::{png_bytes, png_data_uri};
