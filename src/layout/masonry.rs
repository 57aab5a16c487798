use crate::models::MediaItem;

/// Mapping from item index to column index, recomputed whenever the loaded
/// media or the available width changes. Purely derived, never stored.
pub type ColumnAssignment = Vec<usize>;

/// Default number of equal-width columns.
pub const COLUMNS: usize = 3;

/// Default gap between columns in pixels.
pub const COLUMN_GAP: f32 = 8.0;

/// Configuration for the masonry column-balancing layout.
///
/// Items of varying aspect ratio are packed into a fixed number of
/// equal-width columns so estimated rendered heights stay balanced. This is
/// a greedy online heuristic, not optimal packing: each item goes to the
/// currently shortest column, in arrival order.
#[derive(Debug, Clone)]
pub struct MasonryLayout {
    /// Number of columns (at least 1).
    pub columns: usize,
    /// Rendered column width in pixels, when known. `None` falls back to a
    /// width-independent aspect estimate, which yields the same relative
    /// balance before the first measure arrives.
    pub column_width: Option<f32>,
}

impl Default for MasonryLayout {
    fn default() -> Self {
        Self {
            columns: COLUMNS,
            column_width: None,
        }
    }
}

impl MasonryLayout {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            column_width: None,
        }
    }

    pub fn with_column_width(mut self, column_width: f32) -> Self {
        self.column_width = Some(column_width);
        self
    }

    /// Column width for a container, accounting for inter-column gaps.
    pub fn column_width_for(&self, container_width: f32, gap: f32) -> f32 {
        let columns = self.columns.max(1) as f32;
        ((container_width - gap * (columns - 1.0)) / columns).max(1.0)
    }

    fn scaled_height(&self, width: u32, height: u32) -> f32 {
        // Junk dimensions keep a 1:1 tile so one bad item cannot distort the
        // running totals.
        let (w, h) = if width == 0 || height == 0 {
            (1.0, 1.0)
        } else {
            (width as f32, height as f32)
        };

        match self.column_width {
            Some(column_width) => h * (column_width / w),
            None => (h / w) * (100.0 / self.columns.max(1) as f32),
        }
    }

    /// Assigns each `(width, height)` item, in arrival order, to the column
    /// with the smallest running estimated height. The first such column
    /// wins ties, so the result is deterministic for identical inputs.
    ///
    /// Assignments are recomputed from scratch on every call; an item may
    /// move columns when earlier items change.
    pub fn assign<I>(&self, sizes: I) -> ColumnAssignment
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let columns = self.columns.max(1);
        let mut heights = vec![0.0f32; columns];
        let mut assignment = ColumnAssignment::new();

        for (width, height) in sizes {
            let column = shortest_column(&heights);
            heights[column] += self.scaled_height(width, height);
            assignment.push(column);
        }

        assignment
    }

    /// Convenience wrapper over [`MasonryLayout::assign`] for loaded media.
    pub fn assign_items(&self, items: &[MediaItem]) -> ColumnAssignment {
        self.assign(items.iter().map(MediaItem::dimensions))
    }

    /// Groups item indices per column, preserving arrival order within each
    /// column. The outer vector always has `columns` entries.
    pub fn into_columns(&self, assignment: &ColumnAssignment) -> Vec<Vec<usize>> {
        let columns = self.columns.max(1);
        let mut grouped: Vec<Vec<usize>> = vec![Vec::new(); columns];
        for (index, &column) in assignment.iter().enumerate() {
            if let Some(slot) = grouped.get_mut(column) {
                slot.push(index);
            }
        }
        grouped
    }
}

/// Index of the column with the smallest running height; the first such
/// column wins ties.
fn shortest_column(heights: &[f32]) -> usize {
    let mut best = 0;
    for (index, &height) in heights.iter().enumerate().skip(1) {
        if height < heights[best] {
            best = index;
        }
    }
    best
}
