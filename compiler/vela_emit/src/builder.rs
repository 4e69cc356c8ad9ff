//! Routine construction and label resolution.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::Op;

/// A jump target inside one routine.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Label(u32);

impl Label {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Well-known labels shared between independently rendered commands.
///
/// A command that needs to jump to the resume point of a step does not
/// hold a [`Label`]; it asks the builder for the label keyed by the step,
/// and whichever command places that key's label wins the jump.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LabelKey {
    /// Resume point of a dispatch step.
    Step(u32),
    /// The common exit of the update routine.
    Exit,
}

/// Label resolution failure. Always a compiler bug.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmitError {
    Unplaced(Label),
    PlacedTwice(Label),
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::Unplaced(label) => write!(f, "label {label} is never placed"),
            EmitError::PlacedTwice(label) => write!(f, "label {label} is placed twice"),
        }
    }
}

impl std::error::Error for EmitError {}

/// Appends instructions to one routine.
#[derive(Default)]
pub struct RoutineBuilder {
    ops: Vec<Op>,
    /// Instruction index of each label, once placed.
    positions: Vec<Option<usize>>,
    keyed: FxHashMap<LabelKey, Label>,
    first_error: Option<EmitError>,
}

impl RoutineBuilder {
    pub fn new() -> Self {
        RoutineBuilder::default()
    }

    pub fn emit(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn new_label(&mut self) -> Label {
        let label = Label(u32::try_from(self.positions.len()).unwrap_or(u32::MAX));
        self.positions.push(None);
        label
    }

    /// The label registered under `key`, created on first request.
    pub fn keyed_label(&mut self, key: LabelKey) -> Label {
        if let Some(&label) = self.keyed.get(&key) {
            return label;
        }
        let label = self.new_label();
        self.keyed.insert(key, label);
        label
    }

    /// Bind `label` to the next instruction.
    pub fn place(&mut self, label: Label) {
        let here = self.ops.len();
        match self.positions.get_mut(label.index()) {
            Some(slot @ None) => *slot = Some(here),
            Some(Some(_)) | None => {
                self.first_error.get_or_insert(EmitError::PlacedTwice(label));
            }
        }
    }

    pub fn place_key(&mut self, key: LabelKey) {
        let label = self.keyed_label(key);
        self.place(label);
    }

    /// Number of instructions emitted so far.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Resolve every label and seal the routine.
    pub fn finish(self) -> Result<Routine, EmitError> {
        if let Some(error) = self.first_error {
            return Err(error);
        }
        let mut positions = Vec::with_capacity(self.positions.len());
        for (index, position) in self.positions.iter().enumerate() {
            match position {
                Some(pc) => positions.push(*pc),
                None => {
                    let label = Label(u32::try_from(index).unwrap_or(u32::MAX));
                    return Err(EmitError::Unplaced(label));
                }
            }
        }
        Ok(Routine {
            ops: self.ops,
            positions,
        })
    }
}

/// A finished, label-resolved instruction sequence.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Routine {
    ops: Vec<Op>,
    positions: Vec<usize>,
}

impl Routine {
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Instruction index a label resolves to.
    ///
    /// A label placed after the last instruction resolves to `len()`,
    /// which the interpreter treats as falling off the end.
    #[inline]
    pub fn target(&self, label: Label) -> usize {
        self.positions.get(label.index()).copied().unwrap_or(self.ops.len())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// One instruction per line, with label markers.
    pub fn disassemble(&self) -> String {
        use std::fmt::Write;

        let mut marks: Vec<Vec<usize>> = vec![Vec::new(); self.ops.len() + 1];
        for (label, &pc) in self.positions.iter().enumerate() {
            marks[pc].push(label);
        }
        let mut out = String::new();
        for (pc, op) in self.ops.iter().enumerate() {
            for label in &marks[pc] {
                let _ = writeln!(out, "L{label}:");
            }
            let _ = writeln!(out, "  {pc:>3}  {op}");
        }
        for label in &marks[self.ops.len()] {
            let _ = writeln!(out, "L{label}:");
        }
        out
    }
}

#[cfg(test)]
mod tests;
