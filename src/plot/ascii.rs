//! ASCII plotting of lap times for terminal output.
//!
//! Fixed-size grid, deterministic output (golden tests below).
//!
//! Plot elements:
//! - each lap: its compound glyph (`S`, `M`, `H`)
//! - consecutive laps of the same stint: joined with `.`

use crate::domain::{LapRecord, RaceResult};

/// Render the lap-time series of a race result.
pub fn render_lap_chart(result: &RaceResult, width: usize, height: usize) -> String {
    let Some(laps) = lap_range(&result.laps) else {
        return "Plot: no laps simulated\n".to_string();
    };
    let times = time_range(&result.laps);
    let mut canvas = Canvas::new(width.max(10), height.max(5), laps, times);

    // Stint traces first so lap glyphs overlay them.
    for pair in result.laps.windows(2) {
        if pair[0].stint == pair[1].stint {
            canvas.trace(canvas.cell(&pair[0]), canvas.cell(&pair[1]));
        }
    }
    for r in &result.laps {
        let (col, row) = canvas.cell(r);
        canvas.cells[row][col] = r.compound.glyph();
    }

    let mut out = format!(
        "Plot: lap=[{:.0}, {:.0}] | lap_time=[{:.2}, {:.2}]s | S=soft M=medium H=hard\n",
        laps.0, laps.1, times.0, times.1
    );
    for row in canvas.cells {
        out.extend(row);
        out.push('\n');
    }
    out
}

/// Lap axis bounds; a single lap gets one lap of margin on each side.
fn lap_range(laps: &[LapRecord]) -> Option<(f64, f64)> {
    let first = laps.iter().map(|r| r.lap).min()? as f64;
    let last = laps.iter().map(|r| r.lap).max()? as f64;
    if last > first { Some((first, last)) } else { Some((first - 1.0, last + 1.0)) }
}

/// Lap-time axis bounds with 5% headroom above and below.
fn time_range(laps: &[LapRecord]) -> (f64, f64) {
    let fastest = laps.iter().map(|r| r.lap_time).fold(f64::INFINITY, f64::min);
    let slowest = laps.iter().map(|r| r.lap_time).fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if !fastest.is_finite() || !slowest.is_finite() {
        (0.0, 1.0)
    } else if slowest > fastest {
        (fastest, slowest)
    } else {
        (fastest - 0.5, fastest + 0.5)
    };
    let pad = ((hi - lo) * 0.05).max(1e-12);
    (lo - pad, hi + pad)
}

/// Character grid with lap number on x and lap time on y (slowest at the top).
struct Canvas {
    cells: Vec<Vec<char>>,
    laps: (f64, f64),
    times: (f64, f64),
}

impl Canvas {
    fn new(width: usize, height: usize, laps: (f64, f64), times: (f64, f64)) -> Self {
        Self {
            cells: vec![vec![' '; width]; height],
            laps,
            times,
        }
    }

    fn width(&self) -> usize {
        self.cells[0].len()
    }

    fn height(&self) -> usize {
        self.cells.len()
    }

    /// `(column, row)` of a lap record.
    fn cell(&self, r: &LapRecord) -> (usize, usize) {
        let along = |v: f64, (lo, hi): (f64, f64), cells: usize| ((v - lo) / (hi - lo)).clamp(0.0, 1.0) * (cells - 1) as f64;
        let col = along(r.lap as f64, self.laps, self.width()).round();
        let top = (self.height() - 1) as f64;
        let row = (top - along(r.lap_time, self.times, self.height())).round();
        (col as usize, row as usize)
    }

    /// Join two cells with `.`, leaving occupied cells alone.
    fn trace(&mut self, from: (usize, usize), to: (usize, usize)) {
        let (mut x, mut y) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let step_x = if x < x1 { 1 } else { -1 };
        let step_y = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            let cell = &mut self.cells[y as usize][x as usize];
            if *cell == ' ' {
                *cell = '.';
            }
            if (x, y) == (x1, y1) {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += step_x;
            }
            if e2 <= dx {
                err += dx;
                y += step_y;
            }
        }
    }
}
