//! Script tokenizer: walks a raw script one instruction at a time.

use crate::opcodes::{OP_PUSHBYTES_75, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};
use crate::ScriptError;

/// One parsed instruction. `data` is empty for non-push opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub opcode: u8,
    pub data: &'a [u8],
    /// Byte offset of the opcode within the script.
    pub offset: usize,
}

/// Iterator over the instructions of a script.
///
/// Yields an error once (and then stops) if a push runs past the end of the
/// script.
pub struct Tokenizer<'a> {
    script: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(script: &'a [u8]) -> Self {
        Self {
            script,
            pos: 0,
            failed: false,
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ScriptError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.script.len())
            .ok_or_else(|| {
                ScriptError::MalformedScript(format!(
                    "push of {n} bytes at offset {} exceeds script length {}",
                    self.pos,
                    self.script.len()
                ))
            })?;
        let slice = &self.script[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_len(&mut self, width: usize) -> Result<usize, ScriptError> {
        let bytes = self.take(width)?;
        let mut buf = [0u8; 4];
        buf[..width].copy_from_slice(bytes);
        Ok(u32::from_le_bytes(buf) as usize)
    }

    fn next_instruction(&mut self) -> Result<Instruction<'a>, ScriptError> {
        let offset = self.pos;
        let opcode = self.script[self.pos];
        self.pos += 1;

        let len = match opcode {
            1..=OP_PUSHBYTES_75 => opcode as usize,
            OP_PUSHDATA1 => self.read_len(1)?,
            OP_PUSHDATA2 => self.read_len(2)?,
            OP_PUSHDATA4 => self.read_len(4)?,
            _ => 0,
        };
        let data = self.take(len)?;

        Ok(Instruction {
            opcode,
            data,
            offset,
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Instruction<'a>, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.script.len() {
            return None;
        }
        let result = self.next_instruction();
        self.failed = result.is_err();
        Some(result)
    }
}
