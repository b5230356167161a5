//! Fixed layouts for Levels mode
//!
//! Each layout is a character grid read far row first: `.` is empty and
//! `1`..`6` is a brick with that many hit points.

use glam::Vec3;

use super::state::{Brick, LEVEL_COUNT, LevelsState};
use crate::tuning::GameConfig;

/// Widest row a layout may use
pub const MAX_LAYOUT_COLS: usize = 12;

const LEVELS: [&[&str]; LEVEL_COUNT] = [
    // 1
    &["111111111111", "111111111111", "111111111111"],
    // 2
    &["222222222222", "111111111111", "111111111111", "111111111111"],
    // 3
    &["..11111111..", ".1222222221.", "122222222221", ".1111111111."],
    // 4
    &["1.1.1.1.1.1.", ".2.2.2.2.2.2", "1.1.1.1.1.1.", ".2.2.2.2.2.2", "1.1.1.1.1.1."],
    // 5
    &["333333333333", "2..........2", "2.11111111.2", "2..........2", "222222222222"],
    // 6
    &["....3333....", "...322223...", "..32111123..", "...322223...", "....3333...."],
    // 7
    &["11..22..11..", "11..22..11..", "..33..33..33", "..33..33..33", "11..22..11.."],
    // 8
    &["444444444444", "3.3.3.3.3.3.", "222222222222", ".1.1.1.1.1.1", "111111111111"],
    // 9
    &["2..........2", "32........23", "432......234", "5432....2345", "444433334444"],
    // 10
    &["555555555555", "4..........4", "4.33333333.4", "4.3......3.4", "4.33333333.4", "444444444444"],
    // 11
    &["12341234123", "23412341234", "34123412341", "41234123412"],
    // 12
    &["..22222222..", "2.3.3.3.3.32", "2.4.4.4.4.42", "222222222222"],
    // 13
    &["6..........6", ".5........5.", "..4......4..", "...3....3...", "....2..2....", ".....11....."],
    // 14
    &["333333333333", "444444444444", "111111111111", "555555555555", "222222222222"],
    // 15
    &["1.2.3.4.5.6.", ".1.2.3.4.5.6", "6.5.4.3.2.1.", ".6.5.4.3.2.1"],
    // 16
    &["55..55..55..", "55..55..55..", "..44..44..44", "..44..44..44", "33..33..33..", "33..33..33.."],
    // 17
    &["666666666666", "5..........5", "5.44444444.5", "5.4......4.5", "5.4.3333.4.5", "5.4......4.5", "555555555555"],
    // 18
    &["123456654321", "234565565432", "345654456543", "456543345654", "565432234565"],
    // 19
    &["6.6.6.6.6.6.", "555555555555", ".4.4.4.4.4.4", "333333333333", "2.2.2.2.2.2.", "111111111111"],
    // 20
    &["666666666666", "655555555556", "654444444456", "654333333456", "654322223456", "654321123456"],
];

/// Raw grid for a 1-based level number, clamped into range
pub fn layout(level: u32) -> &'static [&'static str] {
    let idx = (level.max(1) as usize - 1).min(LEVEL_COUNT - 1);
    LEVELS[idx]
}

/// Build the bricks for a level. Rows wider than the arena are cut.
pub fn level_bricks(level: u32, cfg: &GameConfig) -> Vec<Brick> {
    let grid = layout(level);
    let mut bricks = Vec::new();
    for (row, line) in grid.iter().enumerate() {
        let cells: Vec<char> = line.chars().take(MAX_LAYOUT_COLS).collect();
        // Center each row on x = 0
        let half_span = (cells.len() as f32 - 1.0) / 2.0;
        for (col, cell) in cells.iter().enumerate() {
            let Some(hp) = cell.to_digit(10) else {
                continue;
            };
            if hp == 0 {
                continue;
            }
            let x = (col as f32 - half_span) * cfg.brick_col_step;
            let pos = Vec3::new(x, 0.0, cfg.brick_row_z(row));
            bricks.push(Brick::new(pos, cfg.brick_size, hp as i32));
        }
    }
    bricks
}

/// Stars for a cleared level, by lives left
pub fn stars_for_lives(lives: i32) -> u8 {
    match lives {
        3.. => 3,
        2 => 2,
        _ => 1,
    }
}

/// Award stars for the current level and unlock the next one
pub fn record_level_clear(levels: &mut LevelsState, lives: i32) {
    let idx = (levels.current_level.max(1) as usize - 1).min(LEVEL_COUNT - 1);
    let stars = stars_for_lives(lives);
    levels.stars[idx] = levels.stars[idx].max(stars);
    let next = (levels.current_level + 1).min(LEVEL_COUNT as u32);
    levels.best_level_reached = levels.best_level_reached.max(next);
    log::info!("Level {} cleared with {} star(s)", levels.current_level, stars);
}
