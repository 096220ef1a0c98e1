//! Circuit instructions binding operations to register references.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::composite::CompositeGate;
use crate::container::Container;
use crate::error::{IrError, IrResult};
use crate::gate::{Condition, StandardGate};
use crate::register::{Reference, RegisterTable};

/// Position of an instruction within its owning container's sequence.
///
/// Containers are the sole owners of their instructions; an `InstrId` is
/// the non-owning handle used to revisit one after it has been appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrId(pub u32);

impl InstrId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of instruction in a container's sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(StandardGate),
    /// Measurement of a qubit into a classical bit.
    Measure,
    /// Reset a qubit to |0⟩.
    Reset,
    /// Barrier over one or more qubits.
    Barrier,
    /// A nested composite gate (itself a container).
    Composite(Box<CompositeGate>),
}

/// A complete instruction: an operation bound to register references,
/// optionally predicated on a classical register value.
///
/// The argument shape is fixed per kind and enforced once by the container
/// builders: gates take exactly `num_qubits()` distinct quantum references,
/// `Measure` one quantum then one classical reference, `Reset` one quantum
/// reference, `Barrier` one or more distinct quantum references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Ordered argument references.
    pub args: Vec<Reference>,
    /// Optional classical condition.
    pub condition: Option<Condition>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = Reference>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            args: qubits.into_iter().collect(),
            condition: None,
        }
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: Reference, bit: Reference) -> Self {
        Self {
            kind: InstructionKind::Measure,
            args: vec![qubit, bit],
            condition: None,
        }
    }

    /// Create a reset instruction.
    pub fn reset(qubit: Reference) -> Self {
        Self {
            kind: InstructionKind::Reset,
            args: vec![qubit],
            condition: None,
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = Reference>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            args: qubits.into_iter().collect(),
            condition: None,
        }
    }

    /// Wrap a composite gate as a nested instruction.
    pub fn composite(gate: CompositeGate) -> Self {
        Self {
            kind: InstructionKind::Composite(Box::new(gate)),
            args: vec![],
            condition: None,
        }
    }

    /// Attach a classical condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Set or clear the classical condition.
    pub fn set_condition(&mut self, condition: Option<Condition>) {
        self.condition = condition;
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(gate) => gate.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
            InstructionKind::Composite(gate) => gate.name(),
        }
    }

    /// Get the numeric parameters of the instruction, in order.
    pub fn params(&self) -> Vec<f64> {
        match &self.kind {
            InstructionKind::Gate(gate) => gate.params(),
            _ => vec![],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a nested composite gate.
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, InstructionKind::Composite(_))
    }

    /// The inverse instruction.
    ///
    /// Self-inverse gates return an identical instruction; a composite
    /// reverses its sequence and inverts each member. The classical
    /// condition is preserved.
    ///
    /// # Panics
    ///
    /// Panics when called on a kind with no unitary inverse (`Measure`,
    /// `Reset`, `Barrier`). Construction code is expected to know
    /// statically which instructions are invertible.
    #[must_use]
    pub fn inverse(&self) -> Instruction {
        let kind = match &self.kind {
            InstructionKind::Gate(gate) => InstructionKind::Gate(gate.inverse()),
            InstructionKind::Composite(gate) => InstructionKind::Composite(Box::new(gate.inverse())),
            InstructionKind::Measure | InstructionKind::Reset | InstructionKind::Barrier => {
                panic!("no inverse defined for '{}'", self.name())
            }
        };
        Instruction {
            kind,
            args: self.args.clone(),
            condition: self.condition.clone(),
        }
    }

    /// Re-execute the equivalent builder call against `target`.
    ///
    /// All references (every leaf, for a composite) are validated against
    /// the target's registers before anything is appended, so a failure
    /// surfaces as [`IrError::ReapplyMismatch`] and leaves the target
    /// untouched. A composite reapplies each contained instruction in
    /// original append order; the classical condition travels with every
    /// reapplied instruction.
    pub fn reapply<C: Container + ?Sized>(&self, target: &mut C) -> IrResult<()> {
        self.check_against(target.registers())?;
        self.append_flattened(target, None);
        Ok(())
    }

    /// Validate every leaf reference (and condition register) against a
    /// register table, reporting failures as [`IrError::ReapplyMismatch`].
    fn check_against(&self, registers: &RegisterTable) -> IrResult<()> {
        if let InstructionKind::Composite(gate) = &self.kind {
            for instruction in gate.sequence() {
                instruction.check_against(registers)?;
            }
        } else {
            for reference in &self.args {
                if registers.check(reference).is_err() {
                    return Err(IrError::ReapplyMismatch {
                        register: reference.register.clone(),
                    });
                }
            }
        }
        if let Some(condition) = &self.condition {
            match registers.get(&condition.register) {
                Some(register) if register.kind == crate::register::RegisterKind::Classical => {}
                _ => {
                    return Err(IrError::ReapplyMismatch {
                        register: condition.register.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Append this instruction to `target`, expanding composites into their
    /// leaves. A condition on a composite is inherited by every leaf that
    /// does not carry its own.
    fn append_flattened<C: Container + ?Sized>(&self, target: &mut C, inherited: Option<&Condition>) {
        let condition = self.condition.as_ref().or(inherited);
        if let InstructionKind::Composite(gate) = &self.kind {
            for instruction in gate.sequence() {
                instruction.append_flattened(target, condition);
            }
        } else {
            let mut instruction = self.clone();
            instruction.condition = condition.cloned();
            target.sequence_mut().push(instruction);
        }
    }

    /// Collect the rendered lines of this instruction, wrapping each with
    /// the classical condition where one applies.
    ///
    /// Condition precedence matches [`Instruction::reapply`]: a condition
    /// on a composite is inherited by every member that does not carry its
    /// own, so one `if(...)` prefix appears per line at most.
    pub(crate) fn render_lines(&self, lines: &mut Vec<String>, inherited: Option<&Condition>) {
        let condition = self.condition.as_ref().or(inherited);
        match &self.kind {
            InstructionKind::Composite(gate) => {
                for instruction in gate.sequence() {
                    instruction.render_lines(lines, condition);
                }
            }
            InstructionKind::Measure => {
                lines.push(wrap_condition(
                    condition,
                    format!("measure {} -> {}", self.args[0], self.args[1]),
                ));
            }
            InstructionKind::Gate(gate) => {
                let params = gate.params();
                let base = if params.is_empty() {
                    format!("{} {}", gate.name(), self.join_args())
                } else {
                    let params: Vec<_> = params.iter().map(|&p| fmt_param(p)).collect();
                    format!("{}({}) {}", gate.name(), params.join(","), self.join_args())
                };
                lines.push(wrap_condition(condition, base));
            }
            InstructionKind::Reset => {
                lines.push(wrap_condition(condition, format!("reset {}", self.args[0])));
            }
            InstructionKind::Barrier => {
                lines.push(wrap_condition(
                    condition,
                    format!("barrier {}", self.join_args()),
                ));
            }
        }
    }

    fn join_args(&self) -> String {
        self.args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        self.render_lines(&mut lines, None);
        f.write_str(&lines.join("\n"))
    }
}

fn wrap_condition(condition: Option<&Condition>, base: String) -> String {
    match condition {
        Some(condition) => format!("if({}=={}) {}", condition.register, condition.value, base),
        None => base,
    }
}

/// Format a gate parameter, preferring exact fractions of pi.
fn fmt_param(value: f64) -> String {
    let pi = std::f64::consts::PI;
    if (value - pi).abs() < 1e-10 {
        "pi".into()
    } else if (value - pi / 2.0).abs() < 1e-10 {
        "pi/2".into()
    } else if (value - pi / 4.0).abs() < 1e-10 {
        "pi/4".into()
    } else if (value + pi).abs() < 1e-10 {
        "-pi".into()
    } else if (value + pi / 2.0).abs() < 1e-10 {
        "-pi/2".into()
    } else if (value + pi / 4.0).abs() < 1e-10 {
        "-pi/4".into()
    } else {
        format!("{value:.6}")
    }
}
