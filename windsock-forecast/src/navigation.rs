use crate::{
    day_bucket::CellPosition,
    grid::ClimbGrid,
    slug::CURRENT_SLUG,
};
use serde::Serialize;

/// Links from a page to its neighbors. An empty string means no neighbor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl Navigation {
    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty() && self.left.is_empty() && self.right.is_empty()
    }
}

/// Previous visible climb's slug, empty for the first.
pub fn climb_up(slugs: &[String], k: usize) -> String {
    match k.checked_sub(1) {
        Some(prev) => slugs.get(prev).cloned().unwrap_or_default(),
        None => String::new(),
    }
}

/// Next visible climb's slug, empty for the last visible climb.
pub fn climb_down(slugs: &[String], k: usize, hidden: usize) -> String {
    if k + 1 >= hidden {
        return String::new();
    }
    slugs.get(k + 1).cloned().unwrap_or_default()
}

/// Sequence links between climb pages. Climbs at or past `hidden` get none.
pub fn climb_navigation(slugs: &[String], k: usize, hidden: usize) -> Navigation {
    if k >= hidden {
        return Navigation::default();
    }
    let up = climb_up(slugs, k);
    let down = climb_down(slugs, k, hidden);
    Navigation {
        left: up.clone(),
        right: down.clone(),
        up,
        down,
    }
}

/// Links from the cell at `position` to its grid neighbors.
///
/// Up and down walk the hours of a day and wrap into the neighboring day;
/// left and right move between days at the same hour.
pub fn day_time_navigation(grid: &ClimbGrid, position: CellPosition) -> Navigation {
    let CellPosition { day, hour } = position;
    Navigation {
        up: day_time_up(grid, day, hour),
        down: day_time_down(grid, day, hour),
        left: day_time_left(grid, day, hour),
        right: day_time_right(grid, day, hour),
    }
}

fn day_time_up(grid: &ClimbGrid, day: usize, hour: usize) -> String {
    match hour.checked_sub(1) {
        Some(prev) => slot_slug(grid, day, prev),
        None => day_time_left(grid, day, grid.hours().saturating_sub(1)),
    }
}

fn day_time_down(grid: &ClimbGrid, day: usize, hour: usize) -> String {
    if hour + 1 >= grid.hours() {
        return day_time_right(grid, day, 0);
    }
    slot_slug(grid, day, hour + 1)
}

fn day_time_left(grid: &ClimbGrid, day: usize, hour: usize) -> String {
    match day.checked_sub(1) {
        Some(prev) => slot_slug(grid, prev, hour),
        None => String::new(),
    }
}

fn day_time_right(grid: &ClimbGrid, day: usize, hour: usize) -> String {
    if day + 1 >= grid.days.len() {
        return String::new();
    }
    slot_slug(grid, day + 1, hour)
}

fn slot_slug(grid: &ClimbGrid, day: usize, hour: usize) -> String {
    cell_slug(grid, CellPosition { day, hour })
}

/// Page slug for the cell at `position`.
///
/// Empty when the cell is absent and `current` for the current snapshot. A
/// weekday seen earlier in the grid gets the day of month in its slug so the
/// two days never share a page.
pub fn cell_slug(grid: &ClimbGrid, position: CellPosition) -> String {
    match grid.cell(position) {
        None => String::new(),
        Some(c) if grid.is_current(c) => CURRENT_SLUG.to_string(),
        Some(c) if grid.repeats_weekday(position.day) => c.disambiguated_day_time_slug(),
        Some(c) => c.day_time_slug(),
    }
}
