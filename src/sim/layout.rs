//! Train layout on the 1D strip
//!
//! Wagons are equal-length blocks separated by gaps, centered on the strip.
//! Everything that is not a wagon is track.

use serde::{Deserialize, Serialize};

/// Per-cell classification of the strip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainLayout {
    pub wagon_mask: Vec<bool>,
    /// First cell of each wagon
    pub left_edge: Vec<bool>,
    /// Last cell of each wagon
    pub right_edge: Vec<bool>,
}

impl TrainLayout {
    /// Number of cells on the strip
    #[inline]
    pub fn len(&self) -> usize {
        self.wagon_mask.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.wagon_mask.is_empty()
    }

    /// Out-of-range cells are never wagons
    #[inline]
    pub fn is_wagon(&self, cell: usize) -> bool {
        self.wagon_mask.get(cell).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_left_edge(&self, cell: usize) -> bool {
        self.left_edge.get(cell).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_right_edge(&self, cell: usize) -> bool {
        self.right_edge.get(cell).copied().unwrap_or(false)
    }

    /// Wagon cells in ascending order
    pub fn wagon_cells(&self) -> Vec<usize> {
        self.wagon_mask
            .iter()
            .enumerate()
            .filter_map(|(i, &w)| w.then_some(i))
            .collect()
    }

    pub fn wagon_count(&self) -> usize {
        self.wagon_mask.iter().filter(|&&w| w).count()
    }
}

/// Lay out `num_wagons` wagons centered on a strip of `display_size` cells.
///
/// Wagon cells that fall outside the strip are dropped.
pub fn compute_layout(
    display_size: usize,
    wagon_length: usize,
    gap_length: usize,
    num_wagons: usize,
) -> TrainLayout {
    let mut layout = TrainLayout {
        wagon_mask: vec![false; display_size],
        left_edge: vec![false; display_size],
        right_edge: vec![false; display_size],
    };

    if num_wagons == 0 || wagon_length == 0 {
        return layout;
    }

    let train_length = num_wagons
        .saturating_mul(wagon_length)
        .saturating_add((num_wagons - 1).saturating_mul(gap_length));
    // Rounds up, not down: an odd spare cell goes to the left padding, so
    // 30/7/2/3 puts wagons at 3-9, 12-18, 21-27. Flooring would shift them left.
    let left_padding = display_size.saturating_sub(train_length).div_ceil(2);
    let stride = wagon_length.saturating_add(gap_length);

    for w in 0..num_wagons {
        let start = left_padding.saturating_add(w.saturating_mul(stride));
        if start >= display_size {
            break;
        }
        let end = start.saturating_add(wagon_length - 1);

        layout.left_edge[start] = true;
        if end < display_size {
            layout.right_edge[end] = true;
        }
        for i in start..=end.min(display_size - 1) {
            layout.wagon_mask[i] = true;
        }
    }

    layout
}
