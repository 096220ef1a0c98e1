//! Emitter for serializing circuits to program text.

use quill_ir::{Circuit, Container, RegisterKind};

/// Emit a circuit as a textual program.
///
/// The output is register declarations in declaration order, then one line
/// per instruction in container order, with nested composite gates
/// expanded recursively.
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit)
}

/// Program text emitter.
struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> String {
        for register in circuit.registers().iter() {
            let keyword = match register.kind {
                RegisterKind::Quantum => "qreg",
                RegisterKind::Classical => "creg",
            };
            self.writeln(&format!("{keyword} {register}"));
        }

        self.output.push_str(&circuit.render());
        std::mem::take(&mut self.output)
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ir::{CompositeGate, Register};

    #[test]
    fn test_emit_bell_state() {
        let circuit = Circuit::bell().unwrap();
        let program = emit(&circuit);

        assert_eq!(
            program,
            "qreg q[2]\ncreg c[2]\n\
             h q0\ncx q0,q1\nmeasure q0 -> c0\nmeasure q1 -> c1\n"
        );
    }

    #[test]
    fn test_emit_empty_circuit() {
        let circuit = Circuit::new("empty");
        assert_eq!(emit(&circuit), "");
    }

    #[test]
    fn test_emit_declaration_order() {
        let mut circuit = Circuit::new("test");
        circuit.add_register(Register::classical("flag", 1)).unwrap();
        circuit.add_register(Register::quantum("q", 1)).unwrap();

        let program = emit(&circuit);
        assert_eq!(program, "creg flag[1]\nqreg q[1]\n");
    }

    #[test]
    fn test_emit_parameterized_gate() {
        let mut circuit = Circuit::with_registers("test", 1, 0);
        let q = Register::quantum("q", 1);
        circuit.rx(std::f64::consts::PI / 2.0, &q.bit(0)).unwrap();

        assert_eq!(emit(&circuit), "qreg q[1]\nrx(pi/2) q0\n");
    }

    #[test]
    fn test_emit_conditioned_instruction() {
        let mut circuit = Circuit::with_registers("test", 1, 1);
        let q = Register::quantum("q", 1);
        let id = circuit.x(&q.bit(0)).unwrap();
        circuit.c_if(id, "c", 1).unwrap();

        assert_eq!(emit(&circuit), "qreg q[1]\ncreg c[1]\nif(c==1) x q0\n");
    }

    #[test]
    fn test_emit_expands_composites() {
        let q = Register::quantum("q", 2);
        let mut gate = CompositeGate::new("entangle");
        gate.add_register(q.clone()).unwrap();
        gate.h(&q.bit(0)).unwrap();
        gate.cx(&q.bit(0), &q.bit(1)).unwrap();

        let mut circuit = Circuit::with_registers("test", 2, 0);
        circuit.append_composite(gate).unwrap();

        assert_eq!(emit(&circuit), "qreg q[2]\nh q0\ncx q0,q1\n");
    }
}
