//! Composite gates: reusable sub-circuits that act as single instructions.

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::instruction::Instruction;
use crate::register::RegisterTable;

/// A named sub-circuit that is both a [`Container`] and an instruction.
///
/// A composite gate is built stand-alone against its own declared register
/// shapes, then appended to an enclosing container (or reapplied into one),
/// where every leaf reference is re-validated against the enclosing
/// registers. Composites nest, forming the one tree-shaped part of an
/// otherwise flat instruction sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeGate {
    /// Name of the composite gate.
    name: String,
    /// Register shapes the contained instructions are built against.
    registers: RegisterTable,
    /// The ordered instruction sequence.
    sequence: Vec<Instruction>,
}

impl CompositeGate {
    /// Create a new empty composite gate.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registers: RegisterTable::new(),
            sequence: Vec::new(),
        }
    }

    /// Get the composite gate's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The inverse composite: the sequence reversed with every member
    /// inverted.
    ///
    /// # Panics
    ///
    /// Panics when any member has no unitary inverse.
    #[must_use]
    pub fn inverse(&self) -> CompositeGate {
        CompositeGate {
            name: self.name.clone(),
            registers: self.registers.clone(),
            sequence: self.sequence.iter().rev().map(Instruction::inverse).collect(),
        }
    }
}

impl Container for CompositeGate {
    fn registers(&self) -> &RegisterTable {
        &self.registers
    }

    fn registers_mut(&mut self) -> &mut RegisterTable {
        &mut self.registers
    }

    fn sequence(&self) -> &[Instruction] {
        &self.sequence
    }

    fn sequence_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.sequence
    }
}
