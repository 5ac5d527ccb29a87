//! Row-major grid cursor shared by compositing workers
//!
//! Workers never compute cell positions themselves; they ask the cursor for the next
//! unclaimed cell. The read-then-advance step runs under one lock, so every cell is handed
//! out exactly once however many workers are claiming.

use parking_lot::Mutex;

/// Rectangle of the canvas handed to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Top row of the cell
    pub y: u32,
    /// Left column of the cell
    pub x: u32,
    /// Width in pixels, smaller than the tile width on the right edge
    pub width: u32,
    /// Height in pixels, smaller than the tile height on the bottom edge
    pub height: u32,
}

impl Cell {
    /// Number of pixels covered by the cell
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Grid indices (row, col) of the cell for the given tile size
    pub const fn grid_index(&self, tile_width: u32, tile_height: u32) -> (usize, usize) {
        (
            (self.y / tile_height) as usize,
            (self.x / tile_width) as usize,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct CursorState {
    next_x: u32,
    next_y: u32,
}

/// Hands out canvas cells in row-major order
#[derive(Debug)]
pub struct GridCursor {
    state: Mutex<CursorState>,
    canvas_width: u32,
    canvas_height: u32,
    tile_width: u32,
    tile_height: u32,
}

impl GridCursor {
    /// Create a cursor at (0, 0) over a canvas
    ///
    /// Tile dimensions of zero are raised to one so the cursor always advances.
    pub fn new(canvas_dimensions: (u32, u32), tile_width: u32, tile_height: u32) -> Self {
        Self {
            state: Mutex::new(CursorState::default()),
            canvas_width: canvas_dimensions.0,
            canvas_height: canvas_dimensions.1,
            tile_width: tile_width.max(1),
            tile_height: tile_height.max(1),
        }
    }

    /// Claim the next unclaimed cell and advance the cursor
    ///
    /// Returns `None` once the cursor has moved past the last row, or when the cell it
    /// points at would be empty.
    pub fn claim(&self) -> Option<Cell> {
        let (x, y) = {
            let mut state = self.state.lock();
            let claimed = (state.next_x, state.next_y);
            if claimed.1 >= self.canvas_height {
                return None;
            }
            if claimed.0.saturating_add(self.tile_width) >= self.canvas_width {
                state.next_x = 0;
                state.next_y = claimed.1.saturating_add(self.tile_height);
            } else {
                state.next_x = claimed.0 + self.tile_width;
            }
            claimed
        };

        let width = self.tile_width.min(self.canvas_width.saturating_sub(x));
        let height = self.tile_height.min(self.canvas_height.saturating_sub(y));
        if width == 0 || height == 0 {
            return None;
        }

        Some(Cell {
            y,
            x,
            width,
            height,
        })
    }

    /// Move the cursor back to (0, 0)
    pub fn reset(&self) {
        *self.state.lock() = CursorState::default();
    }

    /// Grid dimensions (rows, cols) covered by this cursor
    pub const fn grid_dimensions(&self) -> (usize, usize) {
        (
            self.canvas_height.div_ceil(self.tile_height) as usize,
            self.canvas_width.div_ceil(self.tile_width) as usize,
        )
    }

    /// Total number of cells the cursor will hand out
    pub const fn cell_count(&self) -> usize {
        let (rows, cols) = self.grid_dimensions();
        rows * cols
    }
}
