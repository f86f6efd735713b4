//! Static wall grid parsed from a string map.

use mood_arcade_core::{GridCoord, GridView, WorldPoint};

/// Dense row-major wall/floor grid, immutable for the session.
///
/// Parsed once from the catalog's string map; `#` marks a wall, every other
/// character is floor. Rows shorter than the widest row are padded with
/// walls so the grid stays rectangular.
#[derive(Clone, Debug)]
pub(crate) struct WallGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    walls: Vec<bool>,
}

impl WallGrid {
    pub(crate) fn parse(map: &[String], tile_length: f32) -> Self {
        let rows = u32::try_from(map.len()).unwrap_or(0);
        let columns = map
            .iter()
            .map(|row| row.chars().count())
            .max()
            .and_then(|width| u32::try_from(width).ok())
            .unwrap_or(0);

        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut walls = Vec::with_capacity(capacity);
        for row in map {
            let mut width = 0u32;
            for tile in row.chars() {
                walls.push(tile == '#');
                width += 1;
            }
            while width < columns {
                walls.push(true);
                width += 1;
            }
        }

        Self {
            columns,
            rows,
            tile_length,
            walls,
        }
    }

    pub(crate) fn view(&self) -> GridView<'_> {
        GridView::new(&self.walls, self.columns, self.rows)
    }

    pub(crate) const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Continuous center of the provided tile.
    pub(crate) fn center_of(&self, cell: GridCoord) -> WorldPoint {
        WorldPoint::new(
            (cell.column() as f32 + 0.5) * self.tile_length,
            (cell.row() as f32 + 0.5) * self.tile_length,
        )
    }

    /// Tile containing the provided position, if it lies within the grid.
    pub(crate) fn tile_at(&self, position: WorldPoint) -> Option<GridCoord> {
        if position.x() < 0.0 || position.y() < 0.0 || self.tile_length <= f32::EPSILON {
            return None;
        }
        let column = (position.x() / self.tile_length) as u32;
        let row = (position.y() / self.tile_length) as u32;
        let cell = GridCoord::new(column, row);
        self.view().in_bounds(cell).then_some(cell)
    }

    /// Reports whether the position lies on a wall tile. Positions outside
    /// the grid count as walls so movement never escapes the map.
    pub(crate) fn blocks(&self, position: WorldPoint) -> bool {
        match self.tile_at(position) {
            Some(cell) => self.view().is_wall(cell),
            None => true,
        }
    }

    /// Enumerates every floor tile in row-major order.
    pub(crate) fn floor_cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let columns = self.columns;
        self.walls
            .iter()
            .enumerate()
            .filter(|(_, wall)| !**wall)
            .map(move |(index, _)| {
                let index = index as u32;
                GridCoord::new(index % columns, index / columns)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> WallGrid {
        let map = vec![
            "####".to_owned(),
            "#..#".to_owned(),
            "#.##".to_owned(),
            "####".to_owned(),
        ];
        WallGrid::parse(&map, 10.0)
    }

    #[test]
    fn parse_marks_hash_tiles_as_walls() {
        let grid = grid();
        assert_eq!(grid.view().dimensions(), (4, 4));
        assert!(grid.view().is_wall(GridCoord::new(0, 0)));
        assert!(grid.view().is_floor(GridCoord::new(1, 1)));
        assert!(grid.view().is_wall(GridCoord::new(2, 2)));
    }

    #[test]
    fn parse_pads_short_rows_with_walls() {
        let map = vec!["##".to_owned(), "#".to_owned()];
        let grid = WallGrid::parse(&map, 8.0);
        assert_eq!(grid.view().dimensions(), (2, 2));
        assert!(grid.view().is_wall(GridCoord::new(1, 1)));
    }

    #[test]
    fn tile_lookup_round_trips_through_centers() {
        let grid = grid();
        let cell = GridCoord::new(2, 1);
        assert_eq!(grid.tile_at(grid.center_of(cell)), Some(cell));
    }

    #[test]
    fn positions_outside_the_grid_block_movement() {
        let grid = grid();
        assert!(grid.blocks(WorldPoint::new(-1.0, 5.0)));
        assert!(grid.blocks(WorldPoint::new(5.0, 400.0)));
        assert!(!grid.blocks(grid.center_of(GridCoord::new(1, 1))));
    }

    #[test]
    fn floor_cells_enumerates_in_row_major_order() {
        let grid = grid();
        let floors: Vec<GridCoord> = grid.floor_cells().collect();
        assert_eq!(
            floors,
            vec![
                GridCoord::new(1, 1),
                GridCoord::new(2, 1),
                GridCoord::new(1, 2),
            ]
        );
    }
}
