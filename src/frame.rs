// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::error::InitError;

/// The next frame to paint. Rebuilt from blank every tick; nothing carries
/// over between frames.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Result<Self, InitError> {
        let alloc_err = || InitError::BufferAllocation { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(alloc_err)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| alloc_err())?;
        cells.resize(len, Cell::BLANK);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    #[allow(dead_code)]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Writes one trail cell. Rows outside `0..height` and columns outside
    /// `0..width` are dropped silently.
    pub fn paint_trail_segment(&mut self, col: u16, row: i32, cell: Cell) {
        let Ok(row) = u16::try_from(row) else {
            return;
        };
        if let Some(i) = self.index(col, row) {
            self.cells[i] = cell;
        }
    }
}
