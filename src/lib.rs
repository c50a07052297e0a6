//! # OAR Reading Order
//!
//! A Rust library that turns the spatially unordered output of a text
//! recognizer into human reading order. Fragments are grouped into lines by
//! vertical proximity, lines are read top to bottom, fragments within a line
//! left to right, and the result is assembled into multi-line text plus a
//! structured record per fragment.
//!
//! ## Features
//!
//! - Accepts the aggregate (`rec_texts`/`rec_scores`/`rec_boxes`) and legacy
//!   pair-list recognizer payloads
//! - Nested quads, flat 8-number and flat 4-number boxes
//! - Malformed detections are skipped, or reported when configured
//! - Never fails outward: errors come back as `success: false` responses
//! - Batch reconstruction across rayon workers
//! - TOML and JSON configuration
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration validation and constants
//! * [`domain`] - Detections, fragments, lines and recognizer payload decoders
//! * [`pipeline`] - The reconstruction stages and the pipeline boundary
//! * [`processors`] - Geometric primitives
//!
//! ## Quick Start
//!
//! ```rust
//! use oar_reading_order::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = ReadingOrderPipeline::new(ReadingOrderConfig::new().with_y_threshold(10.0))?;
//!
//! let response = pipeline.reconstruct(vec![
//!     RawDetection::new("Second", Some(0.95), json!([[0, 30], [50, 30], [50, 45], [0, 45]])),
//!     RawDetection::new("World", Some(0.8), json!([50, 2, 90, 2, 90, 17, 50, 17])),
//!     RawDetection::new("Hello", Some(0.9), json!([0, 0, 40, 15])),
//! ]);
//!
//! assert!(response.success);
//! assert_eq!(response.text(), "Hello World\nSecond");
//! // Structured records keep recognition order.
//! assert_eq!(&*response.data()[0].text, "Second");
//! # Ok(())
//! # }
//! ```
//!
//! ### Recognizer JSON
//!
//! ```rust
//! use oar_reading_order::prelude::*;
//!
//! let pipeline = ReadingOrderPipeline::default();
//! let response = pipeline.reconstruct_json(
//!     r#"[[ [[[0,0],[40,0],[40,15],[0,15]], ["Hello", 0.9]] ]]"#,
//! );
//! assert_eq!(response.text(), "Hello");
//! println!("{}", response.to_json(true));
//! ```

// Core modules
pub mod core;
pub mod domain;

pub mod pipeline;
pub mod processors;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use oar_reading_order::prelude::*;
/// ```
///
/// Included items focus on the most common tasks:
/// - The pipeline and its configuration (`ReadingOrderPipeline`, `ReadingOrderConfig`, `MalformedPolicy`)
/// - Inputs (`RawDetection`, `RecognizerOutput`) and results (`ReconstructionResponse`, `Document`, `Fragment`)
/// - Essential error and result types (`ReadingOrderError`, `ReadingOrderResult`)
///
/// For the individual stages or geometry, import directly from
/// `oar_reading_order::pipeline::stages` or `oar_reading_order::processors`.
pub mod prelude {
    pub use crate::pipeline::{
        ConfigLoader, MalformedPolicy, ReadingOrderConfig, ReadingOrderPipeline,
        ReconstructionResponse,
    };

    pub use crate::domain::{Document, Fragment, RawDetection, RecognizerOutput};

    pub use crate::core::{ReadingOrderError, ReadingOrderResult};
}
