//! Reconstructs closed electrode polygons from unordered CAD curve
//! primitives, and assigns labels to them through an injected strategy.

pub mod label;
pub mod primitives;
pub mod tracer;

pub use label::{label_polygons, LabelStrategy, SequentialLabels};
pub use primitives::{Arc, Line, Primitive};
pub use tracer::{trace_polygons, TraceError, TraceOptions};

use dmfgen_geometry::Polygon;

/// Trace closed polygons out of `primitives` and label them.
///
/// Unlabeled polygons are dropped with a warning; tracing failures are
/// hard errors.
pub fn trace_peripheral(
    primitives: &[Primitive],
    options: &TraceOptions,
    strategy: &mut dyn LabelStrategy,
) -> Result<Vec<(String, Polygon)>, TraceError> {
    let polygons = trace_polygons(primitives, options)?;
    Ok(label_polygons(polygons, strategy))
}
