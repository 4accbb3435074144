//! # qrgen
//!
//! A Rust library for generating byte-mode QR codes with Reed-Solomon error
//! correction and automatic mask selection based on penalty scoring.
//!
//! ## Features
//!
//! - **QR Code Generation**: Versions 1 through 5 at error correction level L
//! - **Reed-Solomon Error Correction**: Codewords computed over GF(256)
//! - **Mask Selection**: All eight mask patterns scored with the four-rule
//!   penalty evaluator, lowest pattern winning ties
//! - **Rendering**: Grayscale image or terminal-friendly text output
//!
//! ## Quick Start
//!
//! ```rust
//! use qrgen::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - the smallest fitting version and best mask are chosen
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//!
//! println!("{}", qr.to_str(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## Full Configuration
//!
//! ```rust
//! use qrgen::{MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = "Hello, World!";
//! let qr = QRBuilder::new(data.as_bytes())
//!     .version(Version::new(2)?)     // QR version (size) - if not provided, finds smallest version to fit data
//!     .mask(MaskPattern::new(3))     // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Saving an Image
//!
//! ```rust,no_run
//! use qrgen::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"https://example.com").build()?;
//!
//! let img = qr.render(4); // 4x scale factor
//! img.save("qr.png")?;
//! # Ok(())
//! # }
//! ```

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::text_to_bytes;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, Version};
