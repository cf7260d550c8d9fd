//! Tone Control Core
//!
//! Platform-agnostic types, traits, and error handling shared by the
//! processing engine (`tone-dsp`), the I/O boundary (`tone-io`) and the
//! command-line application.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Audio Types**: `SampleRate`, `AudioFormat`, `AudioBuffer`
//! - **Boundary Trait**: `AudioSink`, implemented by the file writer and the device player
//! - **Error Handling**: Unified `ToneError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tone_core::{AudioBuffer, AudioFormat, SampleRate};
//!
//! let format = AudioFormat::new(SampleRate::CD_QUALITY, 2, 16);
//! let buffer = AudioBuffer::new(vec![0.0; 44_100 * 2], format);
//!
//! assert_eq!(buffer.frames(), 44_100);
//! assert!((buffer.duration_secs() - 1.0).abs() < 1e-9);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Result, ToneError};
pub use traits::AudioSink;
pub use types::{AudioBuffer, AudioFormat, SampleRate};
