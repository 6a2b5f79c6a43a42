//! Ratatui-based terminal UI.
//!
//! The TUI is an interactive strategy editor: a circuit selector, editable
//! stint rows, and a lap-time chart that is re-simulated on every change.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::{RunOutput, run_strategy};
use crate::domain::StrategyCatalog;
use crate::editor::{RowField, StintRow, StrategyDraft};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{LapTimeChart, StintSeries};

/// Laps moved by PageUp/PageDown.
const BIG_STEP: i64 = 5;

/// Start the TUI on `circuit` (or the first catalog circuit).
pub fn run(catalog: StrategyCatalog, circuit: Option<String>) -> Result<(), AppError> {
    // Resolve the circuit before touching the terminal so errors print normally.
    let mut app = App::new(catalog, circuit)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    catalog: StrategyCatalog,
    circuit_ids: Vec<String>,
    circuit_idx: usize,
    draft: StrategyDraft,
    selected_row: usize,
    field: RowField,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(catalog: StrategyCatalog, circuit: Option<String>) -> Result<Self, AppError> {
        let circuit_ids: Vec<String> = catalog.circuit_ids().into_iter().map(str::to_string).collect();
        let circuit_id = match circuit {
            Some(id) => id,
            None => circuit_ids
                .first()
                .cloned()
                .ok_or_else(|| AppError::new(2, "Catalog has no circuits."))?,
        };

        let draft = StrategyDraft::new(circuit_id.clone(), catalog.circuit(&circuit_id)?);
        let circuit_idx = circuit_ids.iter().position(|id| *id == circuit_id).unwrap_or(0);

        let mut app = Self {
            catalog,
            circuit_ids,
            circuit_idx,
            draft,
            selected_row: 0,
            field: RowField::Start,
            status: String::new(),
            run: None,
        };
        app.recompute();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100)).map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_row = self.selected_row.saturating_sub(1);
                return false;
            }
            KeyCode::Down => {
                if self.selected_row + 1 < self.draft.rows().len() {
                    self.selected_row += 1;
                }
                return false;
            }
            KeyCode::Tab => {
                self.field = self.field.next();
                return false;
            }
            KeyCode::Left => self.draft.nudge(self.selected_row, self.field, -1),
            KeyCode::Right => self.draft.nudge(self.selected_row, self.field, 1),
            KeyCode::PageDown => self.draft.nudge(self.selected_row, self.field, -BIG_STEP),
            KeyCode::PageUp => self.draft.nudge(self.selected_row, self.field, BIG_STEP),
            KeyCode::Char('a') => {
                self.selected_row = self.draft.add_row();
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                self.draft.remove_row(self.selected_row);
                self.selected_row = self.selected_row.min(self.draft.rows().len().saturating_sub(1));
            }
            KeyCode::Char('c') => self.cycle_circuit(true),
            KeyCode::Char('C') => self.cycle_circuit(false),
            _ => return false,
        }

        self.recompute();
        false
    }

    fn cycle_circuit(&mut self, forward: bool) {
        let n = self.circuit_ids.len();
        if n == 0 {
            return;
        }
        self.circuit_idx = if forward {
            (self.circuit_idx + 1) % n
        } else {
            (self.circuit_idx + n - 1) % n
        };

        let id = self.circuit_ids[self.circuit_idx].clone();
        match self.catalog.circuit(&id) {
            Ok(profile) => self.draft.select_circuit(id, profile),
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        }
        self.selected_row = 0;
        self.field = RowField::Start;
    }

    fn recompute(&mut self) {
        let stints = self.draft.to_stints();
        match run_strategy(&self.catalog, self.draft.circuit_id(), &stints) {
            Ok(run) => {
                self.status = match run.warnings.as_slice() {
                    [] => format!("Strategy covers laps 1-{}.", run.circuit.total_laps),
                    [only] => only.to_string(),
                    [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
                };
                self.run = Some(run);
            }
            Err(err) => {
                tracing::warn!("{err}");
                self.status = err.to_string();
                self.run = None;
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("strat", Style::default().fg(Color::Cyan)),
            Span::raw(" - race strategy editor"),
        ]));

        match self.catalog.circuit(self.draft.circuit_id()) {
            Ok(c) => lines.push(Line::from(Span::styled(
                format!(
                    "circuit: {} ({}) | laps: {} | base: {:.3}s",
                    c.name,
                    self.draft.circuit_id(),
                    c.total_laps,
                    c.base_lap_time
                ),
                Style::default().fg(Color::Gray),
            ))),
            Err(err) => lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red)))),
        }

        if let Some(run) = &self.run {
            let fastest = run
                .result
                .fastest_lap()
                .map(|l| format!("lap {} {:.3}s", l.lap, l.lap_time))
                .unwrap_or_else(|| "-".to_string());
            lines.push(Line::from(vec![
                Span::styled("total: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    crate::report::format_duration(run.result.total_time).to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        " ({:.3}s) | laps run: {} | fastest: {fastest}",
                        run.result.total_time,
                        run.result.lap_count()
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows_height = (self.draft.rows().len() as u16 + 2).clamp(4, 10);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(rows_height)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_rows(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Lap times").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((series, x_bounds, y_bounds)) = self.run.as_ref().and_then(chart_series) else {
            let msg = Paragraph::new("No laps to plot.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (plot, labelled) = plot_area(inner);
        let widget = LapTimeChart {
            series: &series,
            x_bounds,
            y_bounds,
            x_label: "lap",
            y_label: "lap time (s)",
            fmt_x: fmt_axis_lap,
            fmt_y: fmt_axis_seconds,
        };

        frame.render_widget(widget, plot);
        if labelled {
            draw_axis_labels(frame, inner, plot, x_bounds, y_bounds);
        }
    }

    fn draw_rows(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .draft
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let field = (i == self.selected_row).then_some(self.field);
                ListItem::new(row_line(i, row, field))
            })
            .collect();

        let title = format!("Stints ({} laps)", self.draft.total_laps());
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.draft.rows().is_empty() {
            state.select(Some(self.selected_row));
        }
        frame.render_stateful_widget(list, area, &mut state);

        if self.draft.rows().is_empty() {
            let hint = Paragraph::new("No stints. Press 'a' to add one.").style(Style::default().fg(Color::Yellow));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + 1,
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ row  Tab field  ←/→ adjust  PgUp/PgDn ±5  a add  x delete  c circuit  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// One stint row, with the field under edit (if any) shown reversed.
fn row_line(idx: usize, row: &StintRow, editing: Option<RowField>) -> Line<'static> {
    let (r, g, b) = row.compound.rgb();
    let cell = |text: String, field: RowField, base: Style| {
        let style = if editing == Some(field) {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        };
        Span::styled(text, style)
    };

    Line::from(vec![
        Span::raw(format!("#{:<3}", idx + 1)),
        Span::styled("start ", Style::default().fg(Color::Gray)),
        cell(format!("{:>3}", row.start_lap), RowField::Start, Style::default()),
        Span::styled("  end ", Style::default().fg(Color::Gray)),
        cell(format!("{:>3}", row.end_lap), RowField::End, Style::default()),
        Span::raw("  "),
        cell(
            format!("{:<6}", row.compound.display_name()),
            RowField::Compound,
            Style::default().fg(Color::Rgb(r, g, b)),
        ),
    ])
}

/// Build per-stint chart series and axis bounds.
///
/// Returns `None` when the run produced no laps.
fn chart_series(run: &RunOutput) -> Option<(Vec<StintSeries>, [f64; 2], [f64; 2])> {
    let laps = &run.result.laps;
    if laps.is_empty() {
        return None;
    }

    let mut series: Vec<StintSeries> = Vec::new();
    let mut current: Option<usize> = None;
    for rec in laps {
        if current != Some(rec.stint) {
            series.push(StintSeries {
                compound: rec.compound,
                points: Vec::new(),
            });
            current = Some(rec.stint);
        }
        if let Some(s) = series.last_mut() {
            s.points.push((rec.lap as f64, rec.lap_time));
        }
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for rec in laps {
        x_min = x_min.min(rec.lap as f64);
        x_max = x_max.max(rec.lap as f64);
        y_min = y_min.min(rec.lap_time);
        y_max = y_max.max(rec.lap_time);
    }

    if x_max <= x_min {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return None;
    }
    if y_max <= y_min {
        y_min -= 0.5;
        y_max += 0.5;
    }

    let pad = (y_max - y_min) * 0.05;
    Some((series, [x_min, x_max], [y_min - pad, y_max + pad]))
}

fn fmt_axis_lap(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_seconds(v: f64) -> String {
    format!("{v:.1}")
}

/// Gutter columns left of the plot for second labels.
const Y_GUTTER: u16 = 7;
/// Gutter rows below the plot for lap labels and the axis caption.
const X_GUTTER: u16 = 2;

/// Carve the plot area out of the chart block.
///
/// The flag is false when the block is too small to carry axis labels, in
/// which case the plot takes the whole block.
fn plot_area(inner: Rect) -> (Rect, bool) {
    if inner.width <= Y_GUTTER + 12 || inner.height <= X_GUTTER + 6 {
        return (inner, false);
    }
    let plot = Rect {
        x: inner.x + Y_GUTTER,
        y: inner.y + 1,
        width: inner.width - Y_GUTTER - 1,
        height: inner.height - X_GUTTER - 1,
    };
    (plot, true)
}

/// Up to `n` distinct whole laps spread across `bounds`, ascending.
fn lap_ticks(bounds: [f64; 2], n: usize) -> Vec<u32> {
    let lo = bounds[0].ceil().max(0.0);
    let hi = bounds[1].floor().max(lo);
    let mut ticks: Vec<u32> = (0..n)
        .map(|i| {
            let u = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            (lo + u * (hi - lo)).round() as u32
        })
        .collect();
    ticks.dedup();
    ticks
}

fn draw_axis_labels(frame: &mut ratatui::Frame<'_>, inner: Rect, plot: Rect, x_bounds: [f64; 2], y_bounds: [f64; 2]) {
    let gray = Style::default().fg(Color::Gray);
    let label_row = plot.y + plot.height;

    let x_span = x_bounds[1] - x_bounds[0];
    for lap in lap_ticks(x_bounds, 6) {
        let u = ((lap as f64 - x_bounds[0]) / x_span).clamp(0.0, 1.0);
        let col = plot.x + ((plot.width - 1) as f64 * u).round() as u16;
        let text = lap.to_string();
        let rect = Rect {
            x: col.saturating_sub(text.len() as u16 / 2),
            y: label_row,
            width: text.len() as u16,
            height: 1,
        }
        .intersection(inner);
        frame.render_widget(Paragraph::new(text).style(gray), rect);
    }

    // Seconds at the top, middle and bottom rows of the plot.
    let last = plot.height - 1;
    for row in [0, last / 2, last] {
        let secs = y_bounds[1] - (row as f64 / last as f64) * (y_bounds[1] - y_bounds[0]);
        let rect = Rect {
            x: inner.x,
            y: plot.y + row,
            width: Y_GUTTER - 1,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(fmt_axis_seconds(secs)).alignment(Alignment::Right).style(gray),
            rect,
        );
    }

    let caption = Rect {
        x: plot.x,
        y: label_row + 1,
        width: plot.width,
        height: 1,
    };
    frame.render_widget(Paragraph::new("lap").alignment(Alignment::Center).style(gray), caption);
    frame.render_widget(
        Paragraph::new("sec").style(gray.add_modifier(Modifier::BOLD)),
        Rect {
            x: inner.x,
            y: inner.y,
            width: Y_GUTTER - 1,
            height: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Compound;

    fn app(circuit: &str) -> App {
        App::new(StrategyCatalog::builtin(), Some(circuit.to_string())).unwrap()
    }

    #[test]
    fn starts_with_one_soft_stint_over_the_full_race() {
        let app = app("silverstone");
        let run = app.run.as_ref().unwrap();
        assert_eq!(run.result.lap_count(), 52);
        assert!(run.result.laps.iter().all(|l| l.compound == Compound::Soft));
        assert_eq!(app.status, "Strategy covers laps 1-52.");
    }

    #[test]
    fn unknown_start_circuit_is_a_strategy_error() {
        let err = App::new(StrategyCatalog::builtin(), Some("spa".to_string())).err().unwrap();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn defaults_to_first_catalog_circuit() {
        let app = App::new(StrategyCatalog::builtin(), None).unwrap();
        assert_eq!(app.draft.circuit_id(), "monaco");
    }

    #[test]
    fn editing_end_lap_resimulates_and_reports_gap() {
        let mut app = app("silverstone");
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.draft.rows()[0].end_lap, 51);
        let run = app.run.as_ref().unwrap();
        assert_eq!(run.result.lap_count(), 51);
        assert!(app.status.contains("52"));
    }

    #[test]
    fn add_and_delete_rows_track_selection() {
        let mut app = app("silverstone");
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.draft.rows().len(), 2);
        assert_eq!(app.selected_row, 1);

        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.draft.rows().len(), 1);
        assert_eq!(app.selected_row, 0);

        app.handle_key(KeyCode::Char('x'));
        assert!(app.draft.rows().is_empty());
        let run = app.run.as_ref().unwrap();
        assert_eq!(run.result.total_time, 0.0);
    }

    #[test]
    fn cycling_circuit_resets_the_form() {
        let mut app = app("monaco");
        app.handle_key(KeyCode::Char('a'));
        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.draft.circuit_id(), "silverstone");
        assert_eq!(app.draft.rows().len(), 1);
        assert_eq!(app.selected_row, 0);
        assert_eq!(app.run.as_ref().unwrap().result.lap_count(), 52);

        app.handle_key(KeyCode::Char('C'));
        assert_eq!(app.draft.circuit_id(), "monaco");
    }

    #[test]
    fn quit_keys() {
        let mut app = app("monaco");
        assert!(!app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn chart_series_splits_on_stints() {
        let mut app = app("silverstone");
        app.handle_key(KeyCode::Tab);
        for _ in 0..32 {
            app.handle_key(KeyCode::Left);
        }
        app.handle_key(KeyCode::Char('a'));
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Right);

        let run = app.run.as_ref().unwrap();
        let (series, x_bounds, y_bounds) = chart_series(run).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].compound, Compound::Soft);
        assert_eq!(series[0].points.len(), 20);
        assert_eq!(series[1].compound, Compound::Medium);
        assert_eq!(series[1].points.first().map(|p| p.0), Some(21.0));
        assert_eq!(x_bounds, [1.0, 52.0]);
        assert!(y_bounds[0] < 90.2 && y_bounds[1] > 96.0);
    }

    #[test]
    fn lap_ticks_are_whole_distinct_laps() {
        assert_eq!(lap_ticks([1.0, 52.0], 5), vec![1, 14, 27, 39, 52]);
        assert_eq!(lap_ticks([0.0, 2.0], 5), vec![0, 1, 2]);
        assert_eq!(lap_ticks([6.0, 8.0], 1), vec![6]);
    }

    #[test]
    fn plot_area_leaves_gutters_only_when_there_is_room() {
        let big = Rect::new(0, 0, 80, 20);
        let (plot, labelled) = plot_area(big);
        assert!(labelled);
        assert_eq!(plot, Rect::new(Y_GUTTER, 1, 80 - Y_GUTTER - 1, 20 - X_GUTTER - 1));

        let small = Rect::new(0, 0, 15, 6);
        assert_eq!(plot_area(small), (small, false));
    }
}
