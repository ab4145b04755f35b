//! Built-in map catalogue and the provider seam used to look layouts up.

use lane_defence_core::{CellCoord, MapId, MapLayout, Path};

/// Source of map layouts keyed by identifier.
pub trait MapProvider {
    /// Returns the layout registered under `map`, if any.
    fn layout(&self, map: MapId) -> Option<MapLayout>;
}

/// The three stock 20x20 maps, identified as 1, 2 and 3.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardMaps;

const STANDARD_COLUMNS: u32 = 20;
const STANDARD_ROWS: u32 = 20;

type Segment = ((u32, u32), (u32, u32));

const SWITCHBACK: &[Segment] = &[
    ((19, 10), (16, 10)),
    ((15, 10), (15, 6)),
    ((14, 6), (13, 6)),
    ((13, 7), (13, 14)),
    ((12, 14), (12, 14)),
    ((11, 14), (11, 6)),
    ((10, 6), (5, 6)),
    ((5, 7), (5, 7)),
    ((5, 8), (9, 8)),
    ((9, 9), (9, 9)),
    ((9, 10), (5, 10)),
    ((5, 11), (5, 11)),
    ((5, 12), (9, 12)),
    ((9, 13), (9, 13)),
    ((9, 14), (0, 14)),
];

const SERPENTINE: &[Segment] = &[
    ((19, 4), (2, 4)),
    ((2, 5), (2, 5)),
    ((2, 6), (2, 6)),
    ((2, 7), (17, 7)),
    ((17, 8), (17, 8)),
    ((17, 9), (17, 9)),
    ((17, 10), (2, 10)),
    ((2, 11), (2, 11)),
    ((2, 12), (2, 12)),
    ((2, 13), (17, 13)),
    ((17, 14), (17, 14)),
    ((17, 15), (17, 15)),
    ((17, 16), (0, 16)),
];

const ELBOW: &[Segment] = &[((19, 4), (9, 4)), ((9, 5), (9, 15)), ((9, 16), (0, 16))];

impl StandardMaps {
    /// Identifiers of every stock map in ascending order.
    pub const IDS: [MapId; 3] = [MapId::new(1), MapId::new(2), MapId::new(3)];

    fn segments(map: MapId) -> Option<&'static [Segment]> {
        match map.get() {
            1 => Some(SWITCHBACK),
            2 => Some(SERPENTINE),
            3 => Some(ELBOW),
            _ => None,
        }
    }
}

impl MapProvider for StandardMaps {
    fn layout(&self, map: MapId) -> Option<MapLayout> {
        let segments = Self::segments(map)?;
        let built = Path::new(expand_segments(segments))
            .and_then(|path| MapLayout::new(STANDARD_COLUMNS, STANDARD_ROWS, path));
        match built {
            Ok(layout) => Some(layout),
            Err(error) => {
                tracing::error!(map = map.get(), %error, "stock map failed validation");
                None
            }
        }
    }
}

/// Expands inclusive straight segments into a contiguous cell sequence.
fn expand_segments(segments: &[Segment]) -> Vec<CellCoord> {
    let mut cells = Vec::new();
    for &((start_column, start_row), (end_column, end_row)) in segments {
        let end = CellCoord::new(end_column, end_row);
        let mut cursor = CellCoord::new(start_column, start_row);
        cells.push(cursor);
        while cursor != end {
            cursor = cursor.step_toward(end);
            cells.push(cursor);
        }
    }
    cells
}
