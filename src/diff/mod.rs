//! Differential comparison between commit snapshots
//!
//! Two layers: `tree_diff` walks a pair of tree snapshots and reports which
//! blob paths changed, `line_diff` compares the content of a changed blob
//! pair line by line. The stats stage composes both to count added and
//! deleted lines per commit.

pub mod line_diff;
pub mod tree_diff;
