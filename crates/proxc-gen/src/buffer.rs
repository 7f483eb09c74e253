//! Instruction and code buffer.

use crate::opcode::Opcode;

/// One VM instruction. Instructions are addressed by their 0-based index
/// in the code buffer; the optional label names the instruction's address
/// in listings.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: i32,
    pub label: Option<String>,
    pub comment: Option<String>,
}

/// Growable instruction sequence plus a monotonic label counter.
pub struct CodeBuffer {
    instructions: Vec<Instruction>,
    label_counter: i32,
}

const INITIAL_CODE_CAPACITY: usize = 1024;

impl CodeBuffer {
    pub fn new() -> Self {
        Self {
            instructions: Vec::with_capacity(INITIAL_CODE_CAPACITY),
            label_counter: 0,
        }
    }

    /// Append an instruction, returning its index.
    pub fn emit(&mut self, opcode: Opcode, operand: i32) -> usize {
        let index = self.instructions.len();
        self.instructions.push(Instruction {
            opcode,
            operand,
            label: None,
            comment: None,
        });
        index
    }

    /// Emit a `NOP` carrying `label`.
    pub fn emit_label(&mut self, label: impl Into<String>) -> usize {
        let index = self.emit(Opcode::Nop, 0);
        self.instructions[index].label = Some(label.into());
        index
    }

    /// Return and advance the label counter. The ids are names only;
    /// branch operands are instruction indices.
    pub fn new_label(&mut self) -> i32 {
        let label = self.label_counter;
        self.label_counter += 1;
        label
    }

    /// Set the operand of the instruction at `index` to `target`.
    /// Out-of-range indices are ignored.
    pub fn patch_jump(&mut self, index: usize, target: i32) {
        if let Some(inst) = self.instructions.get_mut(index) {
            inst.operand = target;
        }
    }

    pub fn count(&self) -> usize {
        self.instructions.len()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Listing with addresses, as shown by the code dump:
    /// `NNNN: MNEMONIC operand`, label lines in front of their
    /// instruction.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for (index, inst) in self.instructions.iter().enumerate() {
            if let Some(label) = &inst.label {
                out.push_str(&format!("{}:\n", label));
            }
            out.push_str(&format!(
                "  {:04}: {:<10} {}",
                index,
                inst.opcode.mnemonic(),
                inst.operand
            ));
            if let Some(comment) = &inst.comment {
                out.push_str(&format!("  ; {}", comment));
            }
            out.push('\n');
        }
        out
    }

    /// Listing without addresses, as written to the output artifact.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for inst in &self.instructions {
            if let Some(label) = &inst.label {
                out.push_str(&format!("{}:\n", label));
            }
            out.push_str(&format!(
                "  {:<10} {}\n",
                inst.opcode.mnemonic(),
                inst.operand
            ));
        }
        out
    }
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
