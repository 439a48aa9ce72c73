// src/lib.rs

pub mod core;
pub mod persistence;

pub use crate::core::dict::{BuiltDict, CorpusFormat, Dict, DictError};
pub use crate::core::engine::{TokenError, Translation, Translator};
pub use crate::core::types::{fingerprint, BuildStats, Fingerprint, SessionStats};
