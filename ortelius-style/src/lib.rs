//! Style document types for the Ortelius map engine.
//!
//! A map style describes which data a map renders and how. This crate contains
//! the data-selection half of that description: [`StyleLayer`] declares what
//! kind of tile data a layer consumes, and its optional [`Filter`] decides,
//! per feature, whether the layer applies. Filters are parsed once from a JSON
//! style document and evaluated many times, so they are immutable and safe to
//! share between threads.
//!
//! Feature data reaches the evaluator through the [`FeatureProperties`] view:
//! typed property lookup by key plus a geometry type tag. Property values use
//! the [`PropertyValue`] union, which preserves the numeric encoding of the
//! source data while comparing by mathematical value, so a filter literal `0`
//! matches an integer, unsigned or floating property holding zero.

mod error;
mod feature;
mod filter;
mod layer;
mod value;

pub use error::FilterParseError;
pub use feature::{Feature, FeatureProperties, GeometryType};
pub use filter::{Filter, FilterKey};
pub use layer::{LayerType, StyleLayer};
pub use value::PropertyValue;
