//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with fixed arity and parameter shape.
///
/// Every variant is unitary, so [`StandardGate::inverse`] is total. The
/// variant set is open for extension; arity and parameters are enforced
/// once by the container builders, so no argument inspection is needed
/// downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around the X axis.
    Rx(f64),
    /// Rotation around the Y axis.
    Ry(f64),
    /// Rotation around the Z axis.
    Rz(f64),
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// Toffoli gate (CCX).
    CCX,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CCX => "ccx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_) => 1,

            StandardGate::CX | StandardGate::CY | StandardGate::CZ | StandardGate::Swap => 2,

            StandardGate::CCX => 3,
        }
    }

    /// Get the numeric parameters of this gate, in order.
    pub fn params(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(theta) | StandardGate::Ry(theta) | StandardGate::Rz(theta) => {
                vec![*theta]
            }
            _ => vec![],
        }
    }

    /// The exact unitary inverse of this gate.
    ///
    /// Self-inverse gates return themselves; rotations negate their angle.
    #[must_use]
    pub fn inverse(&self) -> StandardGate {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::Rx(theta) => StandardGate::Rx(-theta),
            StandardGate::Ry(theta) => StandardGate::Ry(-theta),
            StandardGate::Rz(theta) => StandardGate::Rz(-theta),
            other => other.clone(),
        }
    }
}

/// Classical condition attached to an instruction.
///
/// The textual contract is fixed: `if(<register>==<value>) <instruction>`,
/// with the value rendered in decimal and the register name verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// The name of the classical register.
    pub register: String,
    /// The value to compare against.
    pub value: u64,
}

impl Condition {
    /// Create a new classical condition.
    pub fn new(register: impl Into<String>, value: u64) -> Self {
        Self {
            register: register.into(),
            value,
        }
    }
}
