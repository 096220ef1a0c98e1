//! Error types for the IR crate.

use crate::instruction::InstrId;
use crate::register::{Reference, RegisterKind};
use thiserror::Error;

/// Errors that can occur while building or reapplying circuits.
///
/// Every variant is recoverable: a failed builder call returns the error to
/// the caller and leaves the container's sequence untouched. Inverting a
/// non-invertible instruction is a programmer error and panics instead of
/// producing a variant here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Register referenced by name was never declared in this container.
    #[error("register '{name}' is not declared in this container")]
    RegisterNotFound {
        /// The undeclared register name.
        name: String,
    },

    /// Reference kind does not match the required or declared kind.
    #[error("register '{register}' used as {expected}, but it is {found}")]
    KindMismatch {
        /// The register name.
        register: String,
        /// The kind the operation requires.
        expected: RegisterKind,
        /// The kind actually found.
        found: RegisterKind,
    },

    /// Reference index is outside the declared register size.
    #[error("index {index} is out of range for register '{register}' of size {size}")]
    IndexOutOfRange {
        /// The register name.
        register: String,
        /// The offending index.
        index: u32,
        /// The declared size.
        size: u32,
    },

    /// A register with this name is already declared.
    #[error("a register named '{name}' is already declared")]
    DuplicateRegister {
        /// The colliding register name.
        name: String,
    },

    /// The same qubit appears more than once in a multi-qubit operation.
    #[error("duplicate qubit {reference} in '{gate}'")]
    DuplicateQubit {
        /// Name of the offending gate.
        gate: String,
        /// The duplicated reference.
        reference: Reference,
    },

    /// Operation requires a different number of qubit arguments.
    #[error("'{gate}' requires {expected} qubit(s), got {got}")]
    ArityMismatch {
        /// Name of the offending operation.
        gate: String,
        /// Expected number of qubits.
        expected: u32,
        /// Number of qubits provided.
        got: u32,
    },

    /// Broadcast measurement over registers of different sizes.
    #[error(
        "cannot broadcast measurement: quantum register has {quantum} bit(s), \
         classical register has {classical}"
    )]
    SizeMismatch {
        /// Size of the quantum register.
        quantum: u32,
        /// Size of the classical register.
        classical: u32,
    },

    /// Reapply target's registers do not contain a matching reference.
    #[error("target container's registers do not match a reference into '{register}'")]
    ReapplyMismatch {
        /// The register name the reference points into.
        register: String,
    },

    /// Stale instruction handle.
    #[error("instruction {id:?} is not present in this container")]
    InstructionNotFound {
        /// The handle that failed to resolve.
        id: InstrId,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
