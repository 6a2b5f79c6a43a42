//! Editable strategy state for interactive front-ends.
//!
//! A `StrategyDraft` holds the rows a user is editing and applies the input
//! clamping rules of the strategy form:
//!
//! - selecting a circuit resets the form to one full-distance row
//! - start laps stay within `[1, total_laps]`
//! - end laps stay within `[start_lap, total_laps]`
//!
//! It only produces `Stint` values; simulation stays in `sim`.

use crate::domain::{CircuitProfile, Compound, Stint};

/// One editable stint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StintRow {
    pub start_lap: u32,
    pub end_lap: u32,
    pub compound: Compound,
}

/// Which column of a row is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Start,
    End,
    Compound,
}

impl RowField {
    pub fn next(self) -> RowField {
        match self {
            RowField::Start => RowField::End,
            RowField::End => RowField::Compound,
            RowField::Compound => RowField::Start,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StrategyDraft {
    circuit_id: String,
    total_laps: u32,
    rows: Vec<StintRow>,
}

impl StrategyDraft {
    pub fn new(circuit_id: impl Into<String>, circuit: &CircuitProfile) -> Self {
        let mut draft = Self {
            circuit_id: String::new(),
            total_laps: 0,
            rows: Vec::new(),
        };
        draft.select_circuit(circuit_id, circuit);
        draft
    }

    pub fn circuit_id(&self) -> &str {
        &self.circuit_id
    }

    pub fn total_laps(&self) -> u32 {
        self.total_laps
    }

    pub fn rows(&self) -> &[StintRow] {
        &self.rows
    }

    /// Switch circuit and reset to a single soft row covering the race.
    pub fn select_circuit(&mut self, circuit_id: impl Into<String>, circuit: &CircuitProfile) {
        self.circuit_id = circuit_id.into();
        self.total_laps = circuit.total_laps;
        self.rows = vec![StintRow {
            start_lap: 1,
            end_lap: circuit.total_laps,
            compound: Compound::Soft,
        }];
    }

    /// Append a soft row starting after the last row and running to the flag.
    ///
    /// Returns the index of the new row.
    pub fn add_row(&mut self) -> usize {
        let start = self
            .rows
            .last()
            .map(|r| r.end_lap.saturating_add(1))
            .unwrap_or(1)
            .clamp(1, self.total_laps.max(1));
        self.rows.push(StintRow {
            start_lap: start,
            end_lap: self.total_laps.max(start),
            compound: Compound::Soft,
        });
        self.rows.len() - 1
    }

    /// Remove a row; out-of-range indices are ignored.
    pub fn remove_row(&mut self, idx: usize) -> Option<StintRow> {
        if idx < self.rows.len() { Some(self.rows.remove(idx)) } else { None }
    }

    pub fn set_start(&mut self, idx: usize, start_lap: u32) {
        let total = self.total_laps.max(1);
        if let Some(row) = self.rows.get_mut(idx) {
            row.start_lap = start_lap.clamp(1, total);
            if row.end_lap < row.start_lap {
                row.end_lap = row.start_lap;
            }
        }
    }

    pub fn set_end(&mut self, idx: usize, end_lap: u32) {
        let total = self.total_laps;
        if let Some(row) = self.rows.get_mut(idx) {
            row.end_lap = end_lap.min(total).max(row.start_lap);
        }
    }

    /// Step a numeric field by `delta` laps, applying the clamping rules.
    pub fn nudge(&mut self, idx: usize, field: RowField, delta: i64) {
        let Some(row) = self.rows.get(idx).copied() else {
            return;
        };
        let step = |v: u32| (v as i64 + delta).max(0) as u32;
        match field {
            RowField::Start => self.set_start(idx, step(row.start_lap)),
            RowField::End => self.set_end(idx, step(row.end_lap)),
            RowField::Compound => self.cycle_compound(idx, delta >= 0),
        }
    }

    pub fn cycle_compound(&mut self, idx: usize, forward: bool) {
        if let Some(row) = self.rows.get_mut(idx) {
            row.compound = if forward { row.compound.next() } else { row.compound.prev() };
        }
    }

    /// Rows as simulator input, in row order.
    pub fn to_stints(&self) -> Vec<Stint> {
        self.rows
            .iter()
            .map(|r| Stint::new(r.start_lap, r.end_lap, r.compound))
            .collect()
    }
}
