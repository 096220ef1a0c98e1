//! The container capability shared by circuits and composite gates.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::composite::CompositeGate;
use crate::error::{IrError, IrResult};
use crate::gate::{Condition, StandardGate};
use crate::instruction::{InstrId, Instruction, InstructionKind};
use crate::register::{Reference, Register, RegisterKind, RegisterTable};

/// An ordered owner of instructions bound to declared registers.
///
/// Both [`Circuit`](crate::Circuit) and [`CompositeGate`] implement this
/// trait. Every builder method validates its references before anything is
/// appended, so a failed call leaves the sequence untouched; whole-register
/// forms validate the entire batch up front and append in ascending index
/// order (batch-or-nothing, stable order).
pub trait Container {
    /// Registers declared in this container.
    fn registers(&self) -> &RegisterTable;

    /// Mutable access to the declared registers.
    fn registers_mut(&mut self) -> &mut RegisterTable;

    /// The ordered instruction sequence.
    fn sequence(&self) -> &[Instruction];

    /// Mutable access to the instruction sequence.
    ///
    /// Direct pushes bypass validation; prefer [`Container::append`] and
    /// the builder methods.
    fn sequence_mut(&mut self) -> &mut Vec<Instruction>;

    // =========================================================================
    // Registers
    // =========================================================================

    /// Declare a register with this container.
    fn add_register(&mut self, register: Register) -> IrResult<()> {
        self.registers_mut().add(register)
    }

    /// Validate a single reference against the declared registers.
    fn check_reference(&self, reference: &Reference) -> IrResult<()> {
        self.registers().check(reference)
    }

    /// Validate a classical condition against the declared registers.
    fn check_condition(&self, condition: &Condition) -> IrResult<()> {
        let Some(register) = self.registers().get(&condition.register) else {
            return Err(IrError::RegisterNotFound {
                name: condition.register.clone(),
            });
        };
        if register.kind != RegisterKind::Classical {
            return Err(IrError::KindMismatch {
                register: condition.register.clone(),
                expected: RegisterKind::Classical,
                found: register.kind,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Generic append
    // =========================================================================

    /// Validate an instruction's full argument shape against this
    /// container: arity, reference kinds, qubit distinctness, declared
    /// registers, condition register, and (recursively) every member of a
    /// composite.
    fn check_instruction(&self, instruction: &Instruction) -> IrResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits();
                let got = u32::try_from(instruction.args.len()).unwrap_or(u32::MAX);
                if expected != got {
                    return Err(IrError::ArityMismatch {
                        gate: gate.name().into(),
                        expected,
                        got,
                    });
                }
                self.check_distinct_qubits(gate.name(), &instruction.args)?;
            }
            InstructionKind::Measure => {
                if instruction.args.len() != 2 {
                    return Err(IrError::ArityMismatch {
                        gate: "measure".into(),
                        expected: 2,
                        got: u32::try_from(instruction.args.len()).unwrap_or(u32::MAX),
                    });
                }
                require_kind(&instruction.args[0], RegisterKind::Quantum)?;
                require_kind(&instruction.args[1], RegisterKind::Classical)?;
                self.check_reference(&instruction.args[0])?;
                self.check_reference(&instruction.args[1])?;
            }
            InstructionKind::Reset => {
                if instruction.args.len() != 1 {
                    return Err(IrError::ArityMismatch {
                        gate: "reset".into(),
                        expected: 1,
                        got: u32::try_from(instruction.args.len()).unwrap_or(u32::MAX),
                    });
                }
                require_kind(&instruction.args[0], RegisterKind::Quantum)?;
                self.check_reference(&instruction.args[0])?;
            }
            InstructionKind::Barrier => {
                if instruction.args.is_empty() {
                    return Err(IrError::ArityMismatch {
                        gate: "barrier".into(),
                        expected: 1,
                        got: 0,
                    });
                }
                self.check_distinct_qubits("barrier", &instruction.args)?;
            }
            InstructionKind::Composite(gate) => {
                for member in gate.sequence() {
                    self.check_instruction(member)?;
                }
            }
        }
        if let Some(condition) = &instruction.condition {
            self.check_condition(condition)?;
        }
        Ok(())
    }

    /// Validate and append an instruction, returning its handle.
    ///
    /// This is also the copy primitive: appending a clone of an instruction
    /// owned by another container re-binds it, preserving name, parameters,
    /// arguments, and condition.
    fn append(&mut self, instruction: Instruction) -> IrResult<InstrId> {
        self.check_instruction(&instruction)?;
        let id = InstrId(u32::try_from(self.sequence().len()).unwrap_or(u32::MAX));
        self.sequence_mut().push(instruction);
        Ok(id)
    }

    /// Append a composite gate as a single nested instruction.
    ///
    /// Every leaf reference inside the composite is validated against this
    /// container's registers before the node is appended.
    fn append_composite(&mut self, gate: CompositeGate) -> IrResult<InstrId> {
        self.append(Instruction::composite(gate))
    }

    // =========================================================================
    // Gate builders
    // =========================================================================

    /// Apply a gate to explicit qubit references.
    fn apply_gate(&mut self, gate: StandardGate, qubits: &[Reference]) -> IrResult<InstrId> {
        self.append(Instruction::gate(gate, qubits.iter().cloned()))
    }

    /// Apply a single-qubit gate to every bit of a quantum register, in
    /// ascending index order.
    ///
    /// The whole batch is validated before the first instruction is
    /// appended, so an invalid register leaves the sequence unchanged.
    fn apply_gate_to_register(
        &mut self,
        gate: StandardGate,
        register: &str,
    ) -> IrResult<InstructionSet> {
        if gate.num_qubits() != 1 {
            return Err(IrError::ArityMismatch {
                gate: gate.name().into(),
                expected: 1,
                got: gate.num_qubits(),
            });
        }
        let found = self
            .registers()
            .get(register)
            .ok_or_else(|| IrError::RegisterNotFound {
                name: register.into(),
            })?
            .clone();
        if found.kind != RegisterKind::Quantum {
            return Err(IrError::KindMismatch {
                register: register.into(),
                expected: RegisterKind::Quantum,
                found: found.kind,
            });
        }
        let references: Vec<Reference> = (0..found.size).map(|i| found.bit(i)).collect();
        for reference in &references {
            self.check_reference(reference)?;
        }
        let mut set = InstructionSet::new();
        for reference in references {
            set.push(self.append(Instruction::gate(gate.clone(), [reference]))?);
        }
        Ok(set)
    }

    /// Apply a Hadamard gate.
    fn h(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::H, std::slice::from_ref(qubit))
    }

    /// Apply a Hadamard gate to every qubit of a register.
    fn h_all(&mut self, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::H, register)
    }

    /// Apply an identity gate.
    fn id(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::I, std::slice::from_ref(qubit))
    }

    /// Apply a Pauli-X gate.
    fn x(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::X, std::slice::from_ref(qubit))
    }

    /// Apply a Pauli-X gate to every qubit of a register.
    fn x_all(&mut self, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::X, register)
    }

    /// Apply a Pauli-Y gate.
    fn y(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::Y, std::slice::from_ref(qubit))
    }

    /// Apply a Pauli-Y gate to every qubit of a register.
    fn y_all(&mut self, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::Y, register)
    }

    /// Apply a Pauli-Z gate.
    fn z(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::Z, std::slice::from_ref(qubit))
    }

    /// Apply a Pauli-Z gate to every qubit of a register.
    fn z_all(&mut self, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::Z, register)
    }

    /// Apply an S gate.
    fn s(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::S, std::slice::from_ref(qubit))
    }

    /// Apply an S gate to every qubit of a register.
    fn s_all(&mut self, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::S, register)
    }

    /// Apply an S-dagger gate.
    fn sdg(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::Sdg, std::slice::from_ref(qubit))
    }

    /// Apply an S-dagger gate to every qubit of a register.
    fn sdg_all(&mut self, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::Sdg, register)
    }

    /// Apply a T gate.
    fn t(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::T, std::slice::from_ref(qubit))
    }

    /// Apply a T gate to every qubit of a register.
    fn t_all(&mut self, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::T, register)
    }

    /// Apply a T-dagger gate.
    fn tdg(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::Tdg, std::slice::from_ref(qubit))
    }

    /// Apply a T-dagger gate to every qubit of a register.
    fn tdg_all(&mut self, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::Tdg, register)
    }

    /// Apply an Rx rotation gate.
    fn rx(&mut self, theta: f64, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::Rx(theta), std::slice::from_ref(qubit))
    }

    /// Apply an Rx rotation to every qubit of a register.
    fn rx_all(&mut self, theta: f64, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::Rx(theta), register)
    }

    /// Apply an Ry rotation gate.
    fn ry(&mut self, theta: f64, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::Ry(theta), std::slice::from_ref(qubit))
    }

    /// Apply an Ry rotation to every qubit of a register.
    fn ry_all(&mut self, theta: f64, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::Ry(theta), register)
    }

    /// Apply an Rz rotation gate.
    fn rz(&mut self, theta: f64, qubit: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::Rz(theta), std::slice::from_ref(qubit))
    }

    /// Apply an Rz rotation to every qubit of a register.
    fn rz_all(&mut self, theta: f64, register: &str) -> IrResult<InstructionSet> {
        self.apply_gate_to_register(StandardGate::Rz(theta), register)
    }

    /// Apply a CNOT (CX) gate.
    fn cx(&mut self, control: &Reference, target: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::CX, &[control.clone(), target.clone()])
    }

    /// Apply a CY gate.
    fn cy(&mut self, control: &Reference, target: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::CY, &[control.clone(), target.clone()])
    }

    /// Apply a CZ gate.
    fn cz(&mut self, control: &Reference, target: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::CZ, &[control.clone(), target.clone()])
    }

    /// Apply a SWAP gate.
    fn swap(&mut self, q1: &Reference, q2: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::Swap, &[q1.clone(), q2.clone()])
    }

    /// Apply a Toffoli (CCX) gate.
    fn ccx(&mut self, c1: &Reference, c2: &Reference, target: &Reference) -> IrResult<InstrId> {
        self.apply_gate(StandardGate::CCX, &[c1.clone(), c2.clone(), target.clone()])
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Reset a qubit to |0⟩.
    fn reset(&mut self, qubit: &Reference) -> IrResult<InstrId> {
        self.append(Instruction::reset(qubit.clone()))
    }

    /// Apply a barrier over explicit qubit references.
    fn barrier(&mut self, qubits: &[Reference]) -> IrResult<InstrId> {
        self.append(Instruction::barrier(qubits.iter().cloned()))
    }

    /// Measure a qubit into a classical bit.
    fn measure(&mut self, qubit: &Reference, bit: &Reference) -> IrResult<InstrId> {
        self.append(Instruction::measure(qubit.clone(), bit.clone()))
    }

    /// Measure every qubit of a quantum register into the classical
    /// register bit of the same index, in ascending index order.
    ///
    /// The registers must have equal sizes; the batch is validated before
    /// the first measurement is appended.
    fn measure_all(&mut self, quantum: &str, classical: &str) -> IrResult<InstructionSet> {
        let qreg = self
            .registers()
            .get(quantum)
            .ok_or_else(|| IrError::RegisterNotFound {
                name: quantum.into(),
            })?
            .clone();
        if qreg.kind != RegisterKind::Quantum {
            return Err(IrError::KindMismatch {
                register: quantum.into(),
                expected: RegisterKind::Quantum,
                found: qreg.kind,
            });
        }
        let creg = self
            .registers()
            .get(classical)
            .ok_or_else(|| IrError::RegisterNotFound {
                name: classical.into(),
            })?
            .clone();
        if creg.kind != RegisterKind::Classical {
            return Err(IrError::KindMismatch {
                register: classical.into(),
                expected: RegisterKind::Classical,
                found: creg.kind,
            });
        }
        if qreg.size != creg.size {
            return Err(IrError::SizeMismatch {
                quantum: qreg.size,
                classical: creg.size,
            });
        }
        for i in 0..qreg.size {
            self.check_reference(&qreg.bit(i))?;
            self.check_reference(&creg.bit(i))?;
        }
        let mut set = InstructionSet::new();
        for i in 0..qreg.size {
            set.push(self.append(Instruction::measure(qreg.bit(i), creg.bit(i)))?);
        }
        Ok(set)
    }

    // =========================================================================
    // Post-hoc modifiers
    // =========================================================================

    /// Attach a classical condition to an appended instruction.
    fn c_if(&mut self, id: InstrId, register: &str, value: u64) -> IrResult<()> {
        let condition = Condition::new(register, value);
        self.check_condition(&condition)?;
        let instruction = self
            .sequence_mut()
            .get_mut(id.index())
            .ok_or(IrError::InstructionNotFound { id })?;
        instruction.set_condition(Some(condition));
        Ok(())
    }

    /// Replace an appended instruction with its inverse, in place.
    ///
    /// # Panics
    ///
    /// Panics when the instruction has no unitary inverse.
    fn invert(&mut self, id: InstrId) -> IrResult<()> {
        let instruction = self
            .sequence_mut()
            .get_mut(id.index())
            .ok_or(IrError::InstructionNotFound { id })?;
        *instruction = instruction.inverse();
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Look up an appended instruction by handle.
    fn instruction(&self, id: InstrId) -> Option<&Instruction> {
        self.sequence().get(id.index())
    }

    /// Number of instructions in the sequence.
    fn len(&self) -> usize {
        self.sequence().len()
    }

    /// Check whether the sequence is empty.
    fn is_empty(&self) -> bool {
        self.sequence().is_empty()
    }

    /// Render the instruction sequence: one line per leaf instruction,
    /// newline-terminated, nested composites expanded in append order.
    fn render(&self) -> String {
        let mut lines = Vec::new();
        for instruction in self.sequence() {
            instruction.render_lines(&mut lines, None);
        }
        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Check that every qubit reference is quantum, declared, and distinct.
    #[doc(hidden)]
    fn check_distinct_qubits(&self, gate: &str, qubits: &[Reference]) -> IrResult<()> {
        let mut seen = FxHashSet::default();
        for reference in qubits {
            require_kind(reference, RegisterKind::Quantum)?;
            self.check_reference(reference)?;
            if !seen.insert(reference.clone()) {
                return Err(IrError::DuplicateQubit {
                    gate: gate.into(),
                    reference: reference.clone(),
                });
            }
        }
        Ok(())
    }
}

fn require_kind(reference: &Reference, expected: RegisterKind) -> IrResult<()> {
    if reference.kind != expected {
        return Err(IrError::KindMismatch {
            register: reference.register.clone(),
            expected,
            found: reference.kind,
        });
    }
    Ok(())
}

/// Handles to a batch of freshly appended instructions.
///
/// Returned by the whole-register builder forms. The set does not own the
/// instructions (the container does); it exists to apply one uniform
/// post-hoc modifier across the batch without re-iterating manually. Order
/// matches append order, ascending by register index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionSet {
    ids: Vec<InstrId>,
}

impl InstructionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, id: InstrId) {
        self.ids.push(id);
    }

    /// The instruction handles, in append order.
    pub fn ids(&self) -> &[InstrId] {
        &self.ids
    }

    /// Iterate the handles in append order.
    pub fn iter(&self) -> impl Iterator<Item = InstrId> + '_ {
        self.ids.iter().copied()
    }

    /// Number of instructions in the set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Invoke a modifier on every instruction in the set, in stored order.
    pub fn apply_modifier<C, F>(&self, container: &mut C, mut f: F) -> IrResult<()>
    where
        C: Container + ?Sized,
        F: FnMut(&mut Instruction),
    {
        for &id in &self.ids {
            let instruction = container
                .sequence_mut()
                .get_mut(id.index())
                .ok_or(IrError::InstructionNotFound { id })?;
            f(instruction);
        }
        Ok(())
    }

    /// Condition every instruction in the set on `register == value`.
    pub fn c_if<C: Container + ?Sized>(
        &self,
        container: &mut C,
        register: &str,
        value: u64,
    ) -> IrResult<()> {
        let condition = Condition::new(register, value);
        container.check_condition(&condition)?;
        self.apply_modifier(container, |instruction| {
            instruction.set_condition(Some(condition.clone()));
        })
    }

    /// Replace every instruction in the set with its inverse, in place.
    ///
    /// # Panics
    ///
    /// Panics when any member has no unitary inverse.
    pub fn inverse<C: Container + ?Sized>(&self, container: &mut C) -> IrResult<()> {
        self.apply_modifier(container, |instruction| {
            *instruction = instruction.inverse();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;

    fn two_by_two() -> Circuit {
        let mut circuit = Circuit::new("test");
        circuit.add_register(Register::quantum("q", 2)).unwrap();
        circuit.add_register(Register::classical("c", 2)).unwrap();
        circuit
    }

    #[test]
    fn test_single_reference_builder() {
        let mut circuit = two_by_two();
        let q = Register::quantum("q", 2);

        let id = circuit.h(&q.bit(0)).unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.instruction(id).unwrap().to_string(), "h q0");
    }

    #[test]
    fn test_invalid_reference_leaves_sequence_unchanged() {
        let mut circuit = two_by_two();
        let q = Register::quantum("q", 2);

        let err = circuit.h(&q.bit(5)).unwrap_err();
        assert!(matches!(err, IrError::IndexOutOfRange { .. }));
        assert!(circuit.is_empty());

        let err = circuit.h(&Register::quantum("nope", 1).bit(0)).unwrap_err();
        assert!(matches!(err, IrError::RegisterNotFound { .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_whole_register_order_and_count() {
        let mut circuit = two_by_two();

        let set = circuit.h_all("q").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(circuit.render(), "h q0\nh q1\n");
    }

    #[test]
    fn test_whole_register_unknown_is_atomic() {
        let mut circuit = two_by_two();
        circuit.h_all("q").unwrap();
        let before = circuit.len();

        assert!(matches!(
            circuit.h_all("r").unwrap_err(),
            IrError::RegisterNotFound { .. }
        ));
        assert!(matches!(
            circuit.h_all("c").unwrap_err(),
            IrError::KindMismatch { .. }
        ));
        assert_eq!(circuit.len(), before);
    }

    #[test]
    fn test_whole_register_rejects_multi_qubit_gate() {
        let mut circuit = two_by_two();
        let err = circuit
            .apply_gate_to_register(StandardGate::CX, "q")
            .unwrap_err();
        assert!(matches!(err, IrError::ArityMismatch { .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut circuit = two_by_two();
        let q = Register::quantum("q", 2);

        let err = circuit.cx(&q.bit(0), &q.bit(0)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_measure_kind_pattern() {
        let mut circuit = two_by_two();
        let q = Register::quantum("q", 2);
        let c = Register::classical("c", 2);

        circuit.measure(&q.bit(0), &c.bit(0)).unwrap();
        assert_eq!(circuit.render(), "measure q0 -> c0\n");

        // Arguments swapped: kind pattern is one quantum then one classical.
        let err = circuit.measure(&c.bit(0), &q.bit(0)).unwrap_err();
        assert!(matches!(err, IrError::KindMismatch { .. }));
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn test_measure_all_broadcast() {
        let mut circuit = two_by_two();
        let set = circuit.measure_all("q", "c").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(circuit.render(), "measure q0 -> c0\nmeasure q1 -> c1\n");
    }

    #[test]
    fn test_measure_all_size_mismatch_is_atomic() {
        let mut circuit = Circuit::new("test");
        circuit.add_register(Register::quantum("q", 3)).unwrap();
        circuit.add_register(Register::classical("c", 2)).unwrap();

        let err = circuit.measure_all("q", "c").unwrap_err();
        assert!(matches!(
            err,
            IrError::SizeMismatch {
                quantum: 3,
                classical: 2
            }
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_reset_builder() {
        let mut circuit = two_by_two();
        let q = Register::quantum("q", 2);

        circuit.reset(&q.bit(1)).unwrap();
        assert_eq!(circuit.render(), "reset q1\n");

        let err = circuit.reset(&q.bit(5)).unwrap_err();
        assert!(matches!(err, IrError::IndexOutOfRange { .. }));
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn test_barrier_builder() {
        let mut circuit = two_by_two();
        let q = Register::quantum("q", 2);

        circuit.barrier(&[q.bit(0), q.bit(1)]).unwrap();
        assert_eq!(circuit.render(), "barrier q0,q1\n");
    }

    #[test]
    fn test_empty_barrier_rejected() {
        let mut circuit = two_by_two();
        let err = circuit.barrier(&[]).unwrap_err();
        assert!(matches!(
            err,
            IrError::ArityMismatch {
                expected: 1,
                got: 0,
                ..
            }
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_barrier_rejects_duplicates_and_classical_bits() {
        let mut circuit = two_by_two();
        let q = Register::quantum("q", 2);
        let c = Register::classical("c", 2);

        let err = circuit.barrier(&[q.bit(0), q.bit(0)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));

        let err = circuit.barrier(&[q.bit(0), c.bit(0)]).unwrap_err();
        assert!(matches!(err, IrError::KindMismatch { .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_c_if_single_instruction() {
        let mut circuit = two_by_two();
        let q = Register::quantum("q", 2);

        let id = circuit.x(&q.bit(0)).unwrap();
        circuit.c_if(id, "c", 1).unwrap();
        assert_eq!(circuit.render(), "if(c==1) x q0\n");

        // Conditioning on a quantum register is rejected.
        let id = circuit.x(&q.bit(1)).unwrap();
        assert!(matches!(
            circuit.c_if(id, "q", 1).unwrap_err(),
            IrError::KindMismatch { .. }
        ));
    }

    #[test]
    fn test_instruction_set_c_if() {
        let mut circuit = two_by_two();
        let set = circuit.h_all("q").unwrap();
        set.c_if(&mut circuit, "c", 3).unwrap();
        assert_eq!(circuit.render(), "if(c==3) h q0\nif(c==3) h q1\n");
    }

    #[test]
    fn test_instruction_set_inverse() {
        let mut circuit = two_by_two();
        let set = circuit.s_all("q").unwrap();
        set.inverse(&mut circuit).unwrap();
        assert_eq!(circuit.render(), "sdg q0\nsdg q1\n");
    }

    #[test]
    fn test_instruction_set_apply_modifier_order() {
        let mut circuit = two_by_two();
        let set = circuit.h_all("q").unwrap();

        let mut visited = Vec::new();
        set.apply_modifier(&mut circuit, |instruction| {
            visited.push(instruction.args[0].index);
        })
        .unwrap();
        assert_eq!(visited, [0, 1]);
    }

    #[test]
    fn test_append_rebinds_between_containers() {
        let mut original = two_by_two();
        let q = Register::quantum("q", 2);
        let id = original.h(&q.bit(1)).unwrap();
        original.c_if(id, "c", 2).unwrap();

        let copied = original.instruction(id).unwrap().clone();
        let mut other = two_by_two();
        let new_id = other.append(copied).unwrap();

        assert_eq!(
            other.instruction(new_id).unwrap().to_string(),
            original.instruction(id).unwrap().to_string(),
        );
    }

    #[test]
    fn test_reapply_into_matching_container() {
        let mut original = two_by_two();
        let q = Register::quantum("q", 2);
        let c = Register::classical("c", 2);
        original.h(&q.bit(0)).unwrap();
        original.cx(&q.bit(0), &q.bit(1)).unwrap();
        original.measure(&q.bit(0), &c.bit(0)).unwrap();

        let mut fresh = two_by_two();
        for instruction in original.sequence().to_vec() {
            instruction.reapply(&mut fresh).unwrap();
        }
        assert_eq!(fresh.render(), original.render());
    }

    #[test]
    fn test_reapply_mismatch_is_recoverable() {
        let mut original = two_by_two();
        let q = Register::quantum("q", 2);
        original.h(&q.bit(1)).unwrap();

        // Target's register of the same name is too small.
        let mut target = Circuit::new("small");
        target.add_register(Register::quantum("q", 1)).unwrap();

        let instruction = original.sequence()[0].clone();
        let err = instruction.reapply(&mut target).unwrap_err();
        assert!(matches!(err, IrError::ReapplyMismatch { .. }));
        assert!(target.is_empty());
    }

    #[test]
    fn test_conditioned_instruction_survives_reapply() {
        let mut original = two_by_two();
        let q = Register::quantum("q", 2);
        let id = original.x(&q.bit(0)).unwrap();
        original.c_if(id, "c", 1).unwrap();

        let mut fresh = two_by_two();
        original.sequence()[0].reapply(&mut fresh).unwrap();
        assert_eq!(fresh.render(), "if(c==1) x q0\n");
    }

    #[test]
    fn test_stale_handle() {
        let mut circuit = two_by_two();
        let err = circuit.c_if(InstrId(7), "c", 0).unwrap_err();
        assert!(matches!(err, IrError::InstructionNotFound { .. }));
    }
}
