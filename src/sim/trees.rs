//! Trees along the line
//!
//! Trees scroll past continuously in canvas pixels. Most are scenery; the ones
//! standing in the corridor on the foreground layer block the strip, and
//! [`tree_cell`] maps their scrolled position onto a cell.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{CORRIDOR_TREES, SCATTERED_TREES};

/// Depth layer (background layers scroll slower)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeLayer {
    Far,
    Mid,
    Close,
    Foreground,
}

/// Vertical band relative to the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeBand {
    Top,
    /// Standing in the corridor, across the strip
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Position in canvas pixels, within `[0, 2 * screen_width)`
    pub world_x: f32,
    /// Sprite variant (0..3)
    pub kind: u8,
    pub scale: f32,
    pub layer: TreeLayer,
    pub band: TreeBand,
}

impl Tree {
    /// Only foreground trees in the corridor can hit a player
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.band == TreeBand::Middle && self.layer == TreeLayer::Foreground
    }
}

/// Cell covered by a tree at `world_x` once the scenery has scrolled by
/// `offset` pixels, or `None` while it is in the off-screen half of its loop.
pub fn tree_cell(world_x: f32, offset: f32, screen_width: f32, display_size: usize) -> Option<usize> {
    if display_size == 0 || screen_width <= 0.0 {
        return None;
    }
    let loop_width = screen_width * 2.0;
    let x = (world_x - offset).rem_euclid(loop_width);
    let cell_width = screen_width / display_size as f32;
    let cell = (x / cell_width).floor() as usize;
    (cell < display_size).then_some(cell)
}

/// All trees plus the scroll offset they share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    pub trees: Vec<Tree>,
    /// Scroll in canvas pixels, kept within one `2 * screen_width` loop
    pub offset: f32,
}

impl Forest {
    /// Plant the corridor trees first, then a few scattered over random bands and layers
    pub fn plant<R: Rng>(rng: &mut R, screen_width: f32) -> Self {
        let loop_width = (screen_width * 2.0).max(f32::MIN_POSITIVE);
        let mut trees = Vec::with_capacity(CORRIDOR_TREES + SCATTERED_TREES);

        for _ in 0..CORRIDOR_TREES {
            trees.push(Tree {
                world_x: rng.random_range(0.0..loop_width),
                kind: rng.random_range(0..3),
                scale: rng.random_range(2.0..3.0),
                layer: TreeLayer::Foreground,
                band: TreeBand::Middle,
            });
        }

        for _ in 0..SCATTERED_TREES {
            let band_roll: f32 = rng.random();
            let mut band = if band_roll < 0.3 {
                TreeBand::Top
            } else if band_roll < 0.6 {
                TreeBand::Middle
            } else {
                TreeBand::Bottom
            };

            let layer_roll: f32 = rng.random();
            let (layer, scale_range) = if layer_roll < 0.25 {
                (TreeLayer::Far, 0.5..0.9)
            } else if layer_roll < 0.5 {
                (TreeLayer::Mid, 0.9..1.4)
            } else if layer_roll < 0.75 {
                (TreeLayer::Close, 1.4..2.0)
            } else {
                (TreeLayer::Foreground, 2.0..3.0)
            };

            // Background trees never stand in the corridor
            if layer != TreeLayer::Foreground && band == TreeBand::Middle {
                band = if rng.random_bool(0.5) {
                    TreeBand::Top
                } else {
                    TreeBand::Bottom
                };
            }

            trees.push(Tree {
                world_x: rng.random_range(0.0..loop_width),
                kind: rng.random_range(0..3),
                scale: rng.random_range(scale_range),
                layer,
                band,
            });
        }

        Self { trees, offset: 0.0 }
    }

    /// A forest with no trees (trees disabled)
    pub fn empty() -> Self {
        Self {
            trees: Vec::new(),
            offset: 0.0,
        }
    }

    /// Advance the scenery by `speed` pixels, wrapping at the loop width
    pub fn scroll(&mut self, speed: f32, screen_width: f32) {
        let loop_width = screen_width * 2.0;
        self.offset += speed;
        if loop_width > 0.0 {
            self.offset = self.offset.rem_euclid(loop_width);
        }
    }

    /// Cells currently blocked by collidable trees
    pub fn blocked_cells(&self, screen_width: f32, display_size: usize) -> Vec<usize> {
        self.trees
            .iter()
            .filter(|t| t.is_collidable())
            .filter_map(|t| tree_cell(t.world_x, self.offset, screen_width, display_size))
            .collect()
    }

    pub fn covers(&self, cell: usize, screen_width: f32, display_size: usize) -> bool {
        self.trees
            .iter()
            .filter(|t| t.is_collidable())
            .any(|t| tree_cell(t.world_x, self.offset, screen_width, display_size) == Some(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const W: f32 = 750.0;

    fn corridor_tree(world_x: f32) -> Tree {
        Tree {
            world_x,
            kind: 0,
            scale: 2.5,
            layer: TreeLayer::Foreground,
            band: TreeBand::Middle,
        }
    }

    #[test]
    fn test_tree_cell_mapping() {
        // 25 px per cell on a 750 px screen
        assert_eq!(tree_cell(0.0, 0.0, W, 30), Some(0));
        assert_eq!(tree_cell(24.9, 0.0, W, 30), Some(0));
        assert_eq!(tree_cell(25.0, 0.0, W, 30), Some(1));
        assert_eq!(tree_cell(749.0, 0.0, W, 30), Some(29));
        // Second half of the loop is off screen
        assert_eq!(tree_cell(750.0, 0.0, W, 30), None);
        assert_eq!(tree_cell(1499.0, 0.0, W, 30), None);
    }

    #[test]
    fn test_tree_cell_wraps_with_scroll() {
        // 100 - 150 = -50 wraps to 1450 (off screen)
        assert_eq!(tree_cell(100.0, 150.0, W, 30), None);
        // 100 - 1500 wraps back to 100
        assert_eq!(tree_cell(100.0, 1500.0, W, 30), Some(4));
        // 1000 - 500 = 500
        assert_eq!(tree_cell(1000.0, 500.0, W, 30), Some(20));
    }

    #[test]
    fn test_tree_cell_degenerate_inputs() {
        assert_eq!(tree_cell(10.0, 0.0, W, 0), None);
        assert_eq!(tree_cell(10.0, 0.0, 0.0, 30), None);
    }

    #[test]
    fn test_only_corridor_foreground_trees_block() {
        let mut scenery = corridor_tree(100.0);
        scenery.layer = TreeLayer::Close;
        let mut high = corridor_tree(200.0);
        high.band = TreeBand::Top;

        let forest = Forest {
            trees: vec![corridor_tree(300.0), scenery, high],
            offset: 0.0,
        };
        assert_eq!(forest.blocked_cells(W, 30), vec![12]);
        assert!(forest.covers(12, W, 30));
        assert!(!forest.covers(4, W, 30));
        assert!(!forest.covers(8, W, 30));
    }

    #[test]
    fn test_scroll_moves_trees_left() {
        let mut forest = Forest {
            trees: vec![corridor_tree(300.0)],
            offset: 0.0,
        };
        forest.scroll(25.0, W);
        assert_eq!(forest.blocked_cells(W, 30), vec![11]);
    }

    #[test]
    fn test_scroll_wraps_without_changing_cells() {
        let mut forest = Forest {
            trees: vec![corridor_tree(300.0)],
            offset: 1490.0,
        };
        forest.scroll(25.0, W);
        assert_eq!(forest.offset, 15.0);
        // 300 - 1515 and 300 - 15 land on the same spot of the loop
        assert_eq!(forest.blocked_cells(W, 30), vec![11]);
    }

    #[test]
    fn test_long_runs_keep_scrolling() {
        let mut forest = Forest {
            trees: vec![corridor_tree(300.0)],
            offset: 0.0,
        };
        // Well past the point where an unwrapped f32 stops moving
        for _ in 0..100_000 {
            forest.scroll(1.5, W);
            assert!(forest.offset >= 0.0 && forest.offset < 2.0 * W);
        }
        let before = forest.offset;
        forest.scroll(1.5, W);
        assert!((forest.offset - (before + 1.5).rem_euclid(2.0 * W)).abs() < 1e-3);
    }

    #[test]
    fn test_plant_is_deterministic_and_well_formed() {
        let a = Forest::plant(&mut Pcg32::seed_from_u64(7), W);
        let b = Forest::plant(&mut Pcg32::seed_from_u64(7), W);
        assert_eq!(a, b);
        assert_eq!(a.trees.len(), CORRIDOR_TREES + SCATTERED_TREES);

        for tree in &a.trees[..CORRIDOR_TREES] {
            assert!(tree.is_collidable());
        }
        for tree in &a.trees {
            assert!(tree.world_x >= 0.0 && tree.world_x < 2.0 * W);
            assert!(tree.kind < 3);
            if tree.band == TreeBand::Middle {
                assert_eq!(tree.layer, TreeLayer::Foreground);
            }
        }
    }
}
