use dmfgen_geometry::Polygon;
use tracing::warn;

/// Assigns labels to traced polygons.
///
/// The interactive flow hands the ordered polygons to a human; tests and
/// batch imports supply a scripted strategy instead. Returning `None` for
/// a polygon drops it (with a warning) rather than failing the import.
pub trait LabelStrategy {
    fn assign(&mut self, polygons: &[Polygon]) -> Vec<Option<String>>;
}

impl<F> LabelStrategy for F
where
    F: FnMut(&[Polygon]) -> Vec<Option<String>>,
{
    fn assign(&mut self, polygons: &[Polygon]) -> Vec<Option<String>> {
        self(polygons)
    }
}

/// Labels polygons "A", "B", … "Z", "AA", "AB", … in trace order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialLabels;

impl LabelStrategy for SequentialLabels {
    fn assign(&mut self, polygons: &[Polygon]) -> Vec<Option<String>> {
        (0..polygons.len()).map(spreadsheet_label).collect()
    }
}

/// 0 → "A" … 25 → "Z", 26 → "AA" … 701 → "ZZ"; `None` beyond that.
#[must_use]
pub fn spreadsheet_label(n: usize) -> Option<String> {
    const ALPHABET: u32 = 26;
    let n = n as u32;
    if n < ALPHABET {
        char::from_u32('A' as u32 + n).map(String::from)
    } else if n < ALPHABET * ALPHABET + ALPHABET {
        let first = char::from_u32('A' as u32 + n / ALPHABET - 1)?;
        let second = char::from_u32('A' as u32 + n % ALPHABET)?;
        Some(format!("{first}{second}"))
    } else {
        None
    }
}

/// Pair traced polygons with labels from `strategy`, dropping (with a
/// warning) any polygon the strategy leaves unlabeled.
pub fn label_polygons(
    polygons: Vec<Polygon>,
    strategy: &mut dyn LabelStrategy,
) -> Vec<(String, Polygon)> {
    let mut labels = strategy.assign(&polygons);
    labels.resize(polygons.len(), None);

    let mut out = Vec::with_capacity(polygons.len());
    for (i, (label, polygon)) in labels.into_iter().zip(polygons).enumerate() {
        match label {
            Some(label) => out.push((label, polygon)),
            None => warn!(polygon = i, "traced polygon left unlabeled; dropping it"),
        }
    }
    out
}
