//! Tjänster för gedkonv
//!
//! Innehåller konverteringspipelinen och konsistenskontrollerna.

pub mod consistency;
pub mod convert;

pub use convert::{ConvertOptions, ConvertReport, ConvertService};
