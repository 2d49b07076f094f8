// set-pill-lib/src/ledger.rs
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::history::CompletedSet;

pub const DEFAULT_SET_COUNT: usize = 3;
/// Maximum number of characters a weight or reps field may hold.
pub const MAX_FIELD_LEN: usize = 3;

/// The two editable inputs of a set row, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Field {
    Weight,
    Reps,
}

/// A focused input: which set row and which of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSelection {
    pub set_number: usize, // 1-based, like SetRecord::set_number
    pub field: Field,
}

impl FieldSelection {
    pub const fn new(set_number: usize, field: Field) -> Self {
        Self { set_number, field }
    }
}

/// Character filter for weight/reps input.
///
/// Any ASCII digit or a decimal point is accepted. Several points in one
/// field are let through on purpose; tighten this function (and only this
/// function) if stricter numeric input is ever wanted.
pub const fn accepts_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.'
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRecord {
    set_number: usize,
    weight: String,
    reps: String,
    is_completed: bool,
    completion_time: String, // Empty until the set is completed
}

impl SetRecord {
    fn new(set_number: usize) -> Self {
        Self {
            set_number,
            weight: String::new(),
            reps: String::new(),
            is_completed: false,
            completion_time: String::new(),
        }
    }

    pub const fn set_number(&self) -> usize {
        self.set_number
    }

    pub fn weight(&self) -> &str {
        &self.weight
    }

    pub fn reps(&self) -> &str {
        &self.reps
    }

    pub const fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn completion_time(&self) -> &str {
        &self.completion_time
    }

    /// Both weight and reps have been entered.
    pub fn has_data(&self) -> bool {
        !self.weight.is_empty() && !self.reps.is_empty()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Weight => &self.weight,
            Field::Reps => &self.reps,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Weight => &mut self.weight,
            Field::Reps => &mut self.reps,
        }
    }

    fn complete(&mut self, completion_time: String) {
        self.is_completed = true;
        self.completion_time = completion_time;
    }

    fn to_completed_set(&self) -> CompletedSet {
        CompletedSet {
            set_number: self.set_number,
            weight: self.weight.clone(),
            reps: self.reps.clone(),
            elapsed_time: self.completion_time.clone(),
        }
    }
}

/// Fixed-length list of set records plus the cursor of the active set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLedger {
    sets: Vec<SetRecord>,
    current_set_index: usize, // == sets.len() once every set is consumed
}

impl SetLedger {
    /// Creates `set_count` empty records numbered from 1. A count of zero is
    /// raised to one so the ledger always has a row to start.
    pub fn new(set_count: usize) -> Self {
        let sets = (1..=set_count.max(1)).map(SetRecord::new).collect();
        Self {
            sets,
            current_set_index: 0,
        }
    }

    pub fn sets(&self) -> &[SetRecord] {
        &self.sets
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    pub const fn current_set_index(&self) -> usize {
        self.current_set_index
    }

    pub fn record(&self, set_number: usize) -> Option<&SetRecord> {
        self.sets.get(set_number.checked_sub(1)?)
    }

    fn record_mut(&mut self, set_number: usize) -> Option<&mut SetRecord> {
        self.sets.get_mut(set_number.checked_sub(1)?)
    }

    /// Current text of a field, or `""` when the set number does not exist.
    pub fn value_for(&self, set_number: usize, field: Field) -> &str {
        self.record(set_number).map_or("", |r| r.value(field))
    }

    /// Appends `ch` to the field if the character is accepted and the field
    /// still has room. Completed and unknown sets are left untouched.
    /// Returns whether the field changed.
    pub fn update(&mut self, set_number: usize, field: Field, ch: char) -> bool {
        if !accepts_char(ch) {
            return false;
        }
        match self.record_mut(set_number) {
            Some(record) if !record.is_completed => {
                let value = record.value_mut(field);
                if value.chars().count() >= MAX_FIELD_LEN {
                    return false;
                }
                value.push(ch);
                true
            }
            _ => false,
        }
    }

    /// Removes the last character of the field. Returns whether anything was removed.
    pub fn delete_last(&mut self, set_number: usize, field: Field) -> bool {
        match self.record_mut(set_number) {
            Some(record) if !record.is_completed => record.value_mut(field).pop().is_some(),
            _ => false,
        }
    }

    /// The record at `index` exists, has both fields filled and is not completed.
    pub fn can_start(&self, index: usize) -> bool {
        self.sets
            .get(index)
            .is_some_and(|r| r.has_data() && !r.is_completed)
    }

    /// The record after `index` exists, has data and is not completed.
    pub fn has_next_incomplete(&self, index: usize) -> bool {
        self.sets
            .get(index + 1)
            .is_some_and(|r| r.has_data() && !r.is_completed)
    }

    /// Finishing the set at `index` should end the workout: it is the final
    /// row, or the following row has nothing entered.
    pub fn is_last_actionable_set(&self, index: usize) -> bool {
        index + 1 >= self.sets.len() || !self.sets[index + 1].has_data()
    }

    /// Marks the record at `index` completed. Returns false if it does not
    /// exist or was already completed.
    pub(crate) fn complete(&mut self, index: usize, completion_time: String) -> bool {
        match self.sets.get_mut(index) {
            Some(record) if !record.is_completed => {
                record.complete(completion_time);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.current_set_index = (self.current_set_index + 1).min(self.sets.len());
    }

    /// Completed records in set order, shaped for history.
    pub fn completed_sets(&self) -> Vec<CompletedSet> {
        self.sets
            .iter()
            .filter(|r| r.is_completed)
            .map(SetRecord::to_completed_set)
            .collect()
    }

    /// A field can be focused when its set exists and is not completed.
    pub fn is_editable(&self, selection: FieldSelection) -> bool {
        self.record(selection.set_number)
            .is_some_and(|r| !r.is_completed)
    }

    // --- Flat field navigation: (1.weight, 1.reps, 2.weight, ..., N.reps) ---

    pub fn field_count(&self) -> usize {
        self.sets.len() * Field::iter().len()
    }

    pub fn flat_index(&self, selection: FieldSelection) -> Option<usize> {
        let row = selection.set_number.checked_sub(1)?;
        if row >= self.sets.len() {
            return None;
        }
        let column = Field::iter().position(|f| f == selection.field)?;
        Some(row * Field::iter().len() + column)
    }

    pub fn field_at(&self, flat_index: usize) -> FieldSelection {
        let per_set = Field::iter().len();
        let index = flat_index % self.field_count();
        let field = Field::iter().nth(index % per_set).unwrap_or(Field::Weight);
        FieldSelection::new(index / per_set + 1, field)
    }

    /// Field after `current`, wrapping after the last one. With nothing
    /// selected (or a stale selection) the first field is returned.
    pub fn next_field(&self, current: Option<FieldSelection>) -> FieldSelection {
        match current.and_then(|sel| self.flat_index(sel)) {
            Some(index) => self.field_at(index + 1),
            None => self.field_at(0),
        }
    }
}

impl Default for SetLedger {
    fn default() -> Self {
        Self::new(DEFAULT_SET_COUNT)
    }
}
