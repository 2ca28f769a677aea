//! Scoring module - line clear points, drop points and the speed curve
//!
//! Scores are flat: there is no level multiplier, combo or back-to-back bonus.
//! A T-Spin is scored from the T-Spin table instead of the line table.

use crate::types::{
    BASE_GRAVITY_MS, GRAVITY_FLOOR_MS, GRAVITY_STEP_MS, HARD_DROP_POINTS, LINES_PER_SPEEDUP,
    LINE_SCORES, SOFT_DROP_POINTS, TSPIN_SCORES,
};

/// Points for a lock that cleared `lines` rows
///
/// lines: number of lines cleared (0-4). A T-Spin clearing three or more
/// lines falls back to the no-line T-Spin score.
pub fn line_clear_score(lines: usize, tspin: bool) -> u32 {
    if tspin {
        return TSPIN_SCORES.get(lines).copied().unwrap_or(TSPIN_SCORES[0]);
    }
    LINE_SCORES.get(lines).copied().unwrap_or(0)
}

/// Calculate drop score
///
/// Soft drop: 1 point per cell
/// Hard drop: 2 points per cell
pub fn drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells * HARD_DROP_POINTS
    } else {
        cells * SOFT_DROP_POINTS
    }
}

/// Gravity interval in milliseconds after `total_lines` cleared lines
pub fn gravity_interval_ms(total_lines: u32) -> u32 {
    let speedups = total_lines / LINES_PER_SPEEDUP;
    BASE_GRAVITY_MS
        .saturating_sub(GRAVITY_STEP_MS.saturating_mul(speedups))
        .max(GRAVITY_FLOOR_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_score() {
        assert_eq!(line_clear_score(0, false), 0);
        assert_eq!(line_clear_score(1, false), 100);
        assert_eq!(line_clear_score(2, false), 300);
        assert_eq!(line_clear_score(3, false), 500);
        assert_eq!(line_clear_score(4, false), 800);
        assert_eq!(line_clear_score(5, false), 0);
    }

    #[test]
    fn test_tspin_score() {
        assert_eq!(line_clear_score(0, true), 400);
        assert_eq!(line_clear_score(1, true), 800);
        assert_eq!(line_clear_score(2, true), 1200);
        assert_eq!(line_clear_score(3, true), 400);
        assert_eq!(line_clear_score(4, true), 400);
    }

    #[test]
    fn test_drop_score() {
        assert_eq!(drop_score(10, false), 10);
        assert_eq!(drop_score(10, true), 20);
        assert_eq!(drop_score(0, true), 0);
    }

    #[test]
    fn test_gravity_curve() {
        assert_eq!(gravity_interval_ms(0), 500);
        assert_eq!(gravity_interval_ms(9), 500);
        assert_eq!(gravity_interval_ms(10), 450);
        assert_eq!(gravity_interval_ms(25), 400);
        assert_eq!(gravity_interval_ms(80), 100);
        assert_eq!(gravity_interval_ms(100), 100);
        assert_eq!(gravity_interval_ms(u32::MAX), 100);
    }
}
