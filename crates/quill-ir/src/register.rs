//! Registers and single-bit references.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{IrError, IrResult};

/// Whether a register holds qubits or classical bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterKind {
    /// A register of qubits.
    Quantum,
    /// A register of classical bits.
    Classical,
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterKind::Quantum => write!(f, "quantum"),
            RegisterKind::Classical => write!(f, "classical"),
        }
    }
}

/// A named, sized register of quantum or classical bits.
///
/// Registers are supplied by the caller; the IR consumes only their name,
/// kind, and size and never allocates physical qubits itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// The register name.
    pub name: String,
    /// Quantum or classical.
    pub kind: RegisterKind,
    /// Number of bits in the register.
    pub size: u32,
}

impl Register {
    /// Create a quantum register.
    pub fn quantum(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            kind: RegisterKind::Quantum,
            size,
        }
    }

    /// Create a classical register.
    pub fn classical(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            kind: RegisterKind::Classical,
            size,
        }
    }

    /// Derive a reference to one bit of this register.
    ///
    /// The index is not checked here; containers validate every reference
    /// against their declared registers before constructing an instruction.
    pub fn bit(&self, index: u32) -> Reference {
        Reference {
            register: self.name.clone(),
            kind: self.kind,
            index,
            size: self.size,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}

/// A reference to a single bit within a named register.
///
/// Two references are equal iff they agree on kind, register name, and
/// index; the recorded size is advisory and excluded from equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// Name of the register this reference points into.
    pub register: String,
    /// Kind of the referenced register.
    pub kind: RegisterKind,
    /// Index of the bit within the register.
    pub index: u32,
    /// Size of the register at the time the reference was derived.
    pub size: u32,
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.register == other.register && self.index == other.index
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.register.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.register, self.index)
    }
}

/// Declaration-ordered register table with name lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Register>", into = "Vec<Register>")]
pub struct RegisterTable {
    order: Vec<Register>,
    index: FxHashMap<String, usize>,
}

impl RegisterTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a register, rejecting duplicate names.
    pub fn add(&mut self, register: Register) -> IrResult<()> {
        if self.index.contains_key(&register.name) {
            return Err(IrError::DuplicateRegister {
                name: register.name,
            });
        }
        self.index.insert(register.name.clone(), self.order.len());
        self.order.push(register);
        Ok(())
    }

    /// Look up a register by name.
    pub fn get(&self, name: &str) -> Option<&Register> {
        self.index.get(name).map(|&i| &self.order[i])
    }

    /// Check that a register with this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Validate a reference against the declared registers.
    ///
    /// Fails when the register was never declared, when the declared kind
    /// differs from the reference's, or when the index falls outside the
    /// declared size. The declared size wins over the size recorded in the
    /// reference, so a stale reference derived from a differently-sized
    /// register is caught here.
    pub fn check(&self, reference: &Reference) -> IrResult<()> {
        let Some(register) = self.get(&reference.register) else {
            return Err(IrError::RegisterNotFound {
                name: reference.register.clone(),
            });
        };
        if register.kind != reference.kind {
            return Err(IrError::KindMismatch {
                register: reference.register.clone(),
                expected: reference.kind,
                found: register.kind,
            });
        }
        if reference.index >= register.size {
            return Err(IrError::IndexOutOfRange {
                register: reference.register.clone(),
                index: reference.index,
                size: register.size,
            });
        }
        Ok(())
    }

    /// Iterate registers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.order.iter()
    }

    /// Number of declared registers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether no registers are declared.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl PartialEq for RegisterTable {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl From<Vec<Register>> for RegisterTable {
    fn from(registers: Vec<Register>) -> Self {
        let mut table = RegisterTable::new();
        for register in registers {
            // Serialized tables cannot contain duplicates.
            let _ = table.add(register);
        }
        table
    }
}

impl From<RegisterTable> for Vec<Register> {
    fn from(table: RegisterTable) -> Self {
        table.order
    }
}
