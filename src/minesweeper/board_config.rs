use std::fmt;

use log::warn;

pub const DEFAULT_WIDTH: usize = 8;
pub const DEFAULT_HEIGHT: usize = 8;
pub const DEFAULT_MINES: usize = 10;

/// A lenient correction applied while building a [`BoardConfig`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Adjustment {
    /// A requested dimension was not positive or above the size limit
    InvalidDimensions {
        requested: (i64, i64),
        applied: (usize, usize),
    },
    /// Mine count did not leave a single safe cell, or was negative
    MineCountTooLarge { requested: i64, applied: usize },
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::InvalidDimensions {
                requested: (width, height),
                applied: (applied_width, applied_height),
            } => write!(
                f,
                "board size {}x{} is not allowed, using {}x{}",
                width, height, applied_width, applied_height
            ),
            Adjustment::MineCountTooLarge { requested, applied } => write!(
                f,
                "{} mines is not allowed on this board, using {}",
                requested, applied
            ),
        }
    }
}

/// Validated dimensions and mine count of a new game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    /// Corrections applied to the requested values, in application order
    pub adjustments: Vec<Adjustment>,
}

impl BoardConfig {
    /// Builds a configuration from optional user input.
    ///
    /// Missing values use the 8x8 / 10 mines defaults. When the size differs
    /// from the default and no mine count was given, the mine count keeps the
    /// default density: `round(width * height * 10 / 64)`. Dimensions are
    /// clamped to `1..=max_side` and mines below the board area.
    pub fn new(
        width: Option<i64>,
        height: Option<i64>,
        mines: Option<i64>,
        max_side: usize,
    ) -> Self {
        let mut adjustments = Vec::new();
        let max_side = max_side.max(1);

        let requested_width = width.unwrap_or(DEFAULT_WIDTH as i64);
        let requested_height = height.unwrap_or(DEFAULT_HEIGHT as i64);
        let clamp_side = |side: i64| side.clamp(1, max_side as i64) as usize;
        let (width, height) = (clamp_side(requested_width), clamp_side(requested_height));

        if (width as i64, height as i64) != (requested_width, requested_height) {
            warn!(
                "clamped board dimensions {}x{} to {}x{}",
                requested_width, requested_height, width, height
            );
            adjustments.push(Adjustment::InvalidDimensions {
                requested: (requested_width, requested_height),
                applied: (width, height),
            });
        }

        let area = width * height;
        let requested_mines = match mines {
            Some(mines) => mines,
            None if (width, height) != (DEFAULT_WIDTH, DEFAULT_HEIGHT) => {
                scaled_mine_count(width, height) as i64
            }
            None => DEFAULT_MINES as i64,
        };
        let mines = requested_mines.clamp(0, area as i64 - 1) as usize;

        if mines as i64 != requested_mines {
            warn!(
                "clamped mine count {} to {} for a {}x{} board",
                requested_mines, mines, width, height
            );
            adjustments.push(Adjustment::MineCountTooLarge {
                requested: requested_mines,
                applied: mines,
            });
        }

        BoardConfig {
            width,
            height,
            mines,
            adjustments,
        }
    }
}

/// Mine count keeping the density of the default board, rounded half up.
fn scaled_mine_count(width: usize, height: usize) -> usize {
    let weighted = width * height * DEFAULT_MINES;
    let default_area = DEFAULT_WIDTH * DEFAULT_HEIGHT;
    (weighted + default_area / 2) / default_area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::new(None, None, None, 30);
        assert_eq!((config.width, config.height, config.mines), (8, 8, 10));
        assert!(config.adjustments.is_empty());
    }

    #[test]
    fn test_scaling_when_size_changes_and_mines_left_default() {
        let config = BoardConfig::new(Some(16), Some(16), None, 30);
        assert_eq!(config.mines, 40);

        // 10 * 10 * 10 / 64 = 15.625
        let config = BoardConfig::new(Some(10), Some(10), None, 30);
        assert_eq!(config.mines, 16);

        // Only one dimension changed
        let config = BoardConfig::new(Some(4), None, None, 30);
        assert_eq!((config.width, config.height, config.mines), (4, 8, 5));
        assert!(config.adjustments.is_empty());
    }

    #[test]
    fn test_no_scaling_with_explicit_mines() {
        let config = BoardConfig::new(Some(16), Some(16), Some(10), 30);
        assert_eq!(config.mines, 10);
    }

    #[test]
    fn test_non_positive_dimensions_are_clamped() {
        let config = BoardConfig::new(Some(0), Some(-4), Some(0), 30);
        assert_eq!((config.width, config.height), (1, 1));
        assert_eq!(
            config.adjustments,
            vec![Adjustment::InvalidDimensions {
                requested: (0, -4),
                applied: (1, 1),
            }]
        );
    }

    #[test]
    fn test_dimensions_above_limit_are_clamped() {
        let config = BoardConfig::new(Some(500), Some(12), None, 30);
        assert_eq!((config.width, config.height), (30, 12));
        assert_eq!(config.mines, 56);
    }

    #[test]
    fn test_mine_count_clamped_below_area() {
        let config = BoardConfig::new(Some(3), Some(3), Some(20), 30);
        assert_eq!(config.mines, 8);
        assert_eq!(
            config.adjustments,
            vec![Adjustment::MineCountTooLarge {
                requested: 20,
                applied: 8,
            }]
        );
    }

    #[test]
    fn test_scaled_mines_clamped_on_tiny_board() {
        let config = BoardConfig::new(Some(1), Some(1), None, 30);
        assert_eq!(config.mines, 0);
    }

    #[test]
    fn test_negative_mines_clamped_to_zero() {
        let config = BoardConfig::new(None, None, Some(-3), 30);
        assert_eq!(config.mines, 0);
        assert_eq!(config.adjustments.len(), 1);
    }

    #[test]
    fn test_adjustment_display() {
        let adjustment = Adjustment::MineCountTooLarge {
            requested: 20,
            applied: 8,
        };
        assert_eq!(
            adjustment.to_string(),
            "20 mines is not allowed on this board, using 8"
        );
    }
}
