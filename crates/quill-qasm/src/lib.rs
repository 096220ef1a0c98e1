//! Textual Program Emitter for Quill
//!
//! This crate serializes Quill circuits to a QASM-like textual program:
//! register declarations followed by one line per instruction, with nested
//! composite gates expanded recursively in their original append order.
//! The emitted text is the externally consumed artifact of the IR; parsing
//! it back is out of scope.
//!
//! # Line Format
//!
//! | Instruction | Example |
//! |-------------|---------|
//! | Declaration | `qreg q[2]`, `creg c[2]` |
//! | Gate | `h q0`, `cx q0,q1` |
//! | Parameterized gate | `rx(pi/2) q0` |
//! | Measurement | `measure q0 -> c0` |
//! | Conditioned | `if(c==1) x q0` |
//!
//! # Example
//!
//! ```rust
//! use quill_ir::Circuit;
//! use quill_qasm::emit;
//!
//! let circuit = Circuit::bell().unwrap();
//! let program = emit(&circuit);
//! assert!(program.starts_with("qreg q[2]\n"));
//! assert!(program.contains("measure q0 -> c0\n"));
//! ```

pub mod emitter;

pub use emitter::emit;
