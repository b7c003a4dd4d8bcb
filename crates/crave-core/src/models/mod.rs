//! Data models for CRAVE

mod craving;

pub use craving::{normalize_emotions, Craving, CravingId, EMOTION_PRESETS};
