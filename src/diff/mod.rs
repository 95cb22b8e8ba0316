//! Line-level diff engine with size-gated rendering.
//!
//! The alignment is positional rather than minimal-edit: simple, O(n), and
//! deterministic, at the cost of over-reporting when lines shift. See
//! DESIGN.md for why this behavior is preserved.

mod engine;
mod gate;
mod patch;
mod rows;

pub use engine::{LineOp, LineOpKind, compute_diff, split_lines};
pub use gate::{DiffGate, REJECT_OPERATIONS, SizeTier, WARN_OPERATIONS, classify_size};
pub use patch::build_patch;
pub use rows::{DiffRow, DiffTotals, project_rows, summarize};
