//! High-level circuit container.

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::error::IrResult;
use crate::instruction::Instruction;
use crate::register::{Register, RegisterTable};

/// A quantum circuit.
///
/// A circuit owns its declared registers and an ordered instruction
/// sequence, mutated only through the validated [`Container`] builders.
/// Instructions are appended, never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Registers declared with this circuit.
    registers: RegisterTable,
    /// The ordered instruction sequence.
    sequence: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registers: RegisterTable::new(),
            sequence: Vec::new(),
        }
    }

    /// Create a circuit with a quantum register `q` and a classical
    /// register `c` of the given sizes (either may be zero to omit it).
    pub fn with_registers(name: impl Into<String>, qubits: u32, clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        if qubits > 0 {
            // Fixed distinct names cannot collide in an empty circuit.
            let _ = circuit.add_register(Register::quantum("q", qubits));
        }
        if clbits > 0 {
            let _ = circuit.add_register(Register::classical("c", clbits));
        }
        circuit
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_registers("bell", 2, 2);
        let q = Register::quantum("q", 2);
        let c = Register::classical("c", 2);

        circuit.h(&q.bit(0))?;
        circuit.cx(&q.bit(0), &q.bit(1))?;
        circuit.measure(&q.bit(0), &c.bit(0))?;
        circuit.measure(&q.bit(1), &c.bit(1))?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit over `n` qubits.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }

        let mut circuit = Self::with_registers("ghz", n, n);
        let q = Register::quantum("q", n);

        circuit.h(&q.bit(0))?;
        for i in 0..n - 1 {
            circuit.cx(&q.bit(i), &q.bit(i + 1))?;
        }
        circuit.measure_all("q", "c")?;

        Ok(circuit)
    }
}

impl Container for Circuit {
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
