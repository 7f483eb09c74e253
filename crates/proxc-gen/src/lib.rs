//! proxc-gen - AST-to-bytecode lowering for the ProxC stack VM.
//!
//! The generator makes a single traversal of the AST, appending
//! instructions to a growable code buffer. Forward branches are emitted
//! with operand zero and back-patched once the target address is known;
//! branch targets are instruction indices, not label ids.

pub mod buffer;
pub mod error;
mod generator;
pub mod opcode;

pub use buffer::{CodeBuffer, Instruction};
pub use error::CodeGenError;
pub use generator::CodeGen;
pub use opcode::Opcode;
