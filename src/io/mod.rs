/// Command-line interface and end-to-end orchestration
pub mod cli;
/// Tunable constants and runtime configuration
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// Image decoding, encoding and directory loading
pub mod image;
/// Progress bars for library building and compositing
pub mod progress;
