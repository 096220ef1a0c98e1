//! Quill Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits in Quill: typed register references, gate and measurement
//! instructions, and the containers that own them.
//!
//! # Overview
//!
//! A [`Circuit`] owns declared registers and an ordered instruction
//! sequence. Every builder call validates its register references before
//! an instruction is constructed, so the sequence only ever holds
//! well-formed instructions; a failed call returns an error and leaves the
//! container untouched. Whole-register builder forms append one instruction
//! per bit in ascending index order and return an [`InstructionSet`] for
//! batch conditioning or inversion.
//!
//! # Core Components
//!
//! - **Registers**: [`Register`], [`Reference`] for addressing quantum and
//!   classical bits by name and index
//! - **Gates**: [`StandardGate`] for built-in gates (H, X, CX, etc.)
//! - **Instructions**: [`Instruction`] binding an operation to references,
//!   with copy, inverse, reapply, and rendering behavior
//! - **Containers**: the [`Container`] trait, implemented by [`Circuit`]
//!   and [`CompositeGate`]
//! - **Batches**: [`InstructionSet`] handles returned by whole-register
//!   builder calls
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use quill_ir::{Circuit, Container, Register};
//!
//! let mut circuit = Circuit::new("bell");
//! let q = Register::quantum("q", 2);
//! let c = Register::classical("c", 2);
//! circuit.add_register(q.clone()).unwrap();
//! circuit.add_register(c.clone()).unwrap();
//!
//! circuit.h(&q.bit(0)).unwrap();
//! circuit.cx(&q.bit(0), &q.bit(1)).unwrap();
//! circuit.measure(&q.bit(0), &c.bit(0)).unwrap();
//!
//! assert_eq!(circuit.render(), "h q0\ncx q0,q1\nmeasure q0 -> c0\n");
//! ```
//!
//! # Example: Whole-Register Application
//!
//! ```rust
//! use quill_ir::{Circuit, Container};
//!
//! let mut circuit = Circuit::with_registers("fanout", 2, 2);
//!
//! // One H per qubit, in ascending index order.
//! let set = circuit.h_all("q").unwrap();
//! assert_eq!(set.len(), 2);
//!
//! // Condition the whole batch after the fact.
//! set.c_if(&mut circuit, "c", 1).unwrap();
//! assert_eq!(circuit.render(), "if(c==1) h q0\nif(c==1) h q1\n");
//! ```

pub mod circuit;
pub mod composite;
pub mod container;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod register;

pub use circuit::Circuit;
pub use composite::CompositeGate;
pub use container::{Container, InstructionSet};
pub use error::{IrError, IrResult};
pub use gate::{Condition, StandardGate};
pub use instruction::{InstrId, Instruction, InstructionKind};
pub use register::{Reference, Register, RegisterKind, RegisterTable};
