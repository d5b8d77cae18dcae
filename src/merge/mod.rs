//! Ancestry queries between commits
//!
//! Exposes the merge-base computation the cross-repository resolver uses to
//! anchor a comparison between two tips.

pub mod base;

pub use base::merge_base;
