//! CLTV time-lock script construction and validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::opcodes::*;
use crate::tokenizer::{Instruction, Tokenizer};
use crate::ScriptError;
use forge_types::BlockHeight;

/// Length of a HASH160 recipient.
pub const RECIPIENT_HASH_LEN: usize = 20;

/// Shortest script that can hold a lock height and the CLTV opcode.
const MIN_SCRIPT_LEN: usize = 8;

/// Maximum data bytes for a lock height push.
const MAX_HEIGHT_BYTES: usize = 4;

/// A built time-lock script. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLockScript {
    lock_height: u32,
    recipient_hash: [u8; RECIPIENT_HASH_LEN],
    script: Vec<u8>,
}

impl TimeLockScript {
    pub fn lock_height(&self) -> u32 {
        self.lock_height
    }

    pub fn recipient_hash(&self) -> &[u8; RECIPIENT_HASH_LEN] {
        &self.recipient_hash
    }

    /// Serialized script bytes.
    pub fn script(&self) -> &[u8] {
        &self.script
    }

    /// Whether the output can be spent at `current_height`.
    pub fn is_spendable(&self, current_height: BlockHeight) -> bool {
        current_height.get() >= self.lock_height
    }

    /// Human-readable summary, e.g. `CLTV(height=4320, recipient=00ff…)`.
    pub fn display_address(&self) -> String {
        format!(
            "CLTV(height={}, recipient={})",
            self.lock_height,
            hex::encode(self.recipient_hash)
        )
    }

    /// Parse a script, requiring the full CLTV + P2PKH template.
    pub fn parse(script: &[u8]) -> Result<Self, ScriptError> {
        let lock_height = validate_script(script)?;
        if lock_height == 0 {
            return Err(ScriptError::InvalidLockHeight);
        }

        let mut tokens = Tokenizer::new(script).skip(2);
        expect_opcode(&mut tokens, OP_DROP)?;
        expect_opcode(&mut tokens, OP_DUP)?;
        expect_opcode(&mut tokens, OP_HASH160)?;
        let hash = expect_opcode(&mut tokens, RECIPIENT_HASH_LEN as u8)?;
        let recipient_hash: [u8; RECIPIENT_HASH_LEN] = hash
            .try_into()
            .map_err(|_| ScriptError::MalformedScript("bad recipient hash".into()))?;
        expect_opcode(&mut tokens, OP_EQUALVERIFY)?;
        expect_opcode(&mut tokens, OP_CHECKSIG)?;

        if tokens.next().is_some() {
            return Err(ScriptError::MalformedScript(
                "trailing bytes after OP_CHECKSIG".into(),
            ));
        }

        Ok(Self {
            lock_height,
            recipient_hash,
            script: script.to_vec(),
        })
    }
}

impl fmt::Display for TimeLockScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_address())
    }
}

/// Build a CLTV script locking funds to `recipient_hash` until `lock_height`.
pub fn build_script(lock_height: u32, recipient_hash: &[u8]) -> Result<TimeLockScript, ScriptError> {
    let recipient_hash: [u8; RECIPIENT_HASH_LEN] =
        recipient_hash
            .try_into()
            .map_err(|_| ScriptError::InvalidHashLength {
                expected: RECIPIENT_HASH_LEN,
                actual: recipient_hash.len(),
            })?;
    if lock_height == 0 {
        return Err(ScriptError::InvalidLockHeight);
    }

    let mut script = Vec::with_capacity(MIN_SCRIPT_LEN + RECIPIENT_HASH_LEN + 4);
    push_data(&mut script, &height_bytes(lock_height));
    script.extend_from_slice(&[OP_CHECKLOCKTIMEVERIFY, OP_DROP, OP_DUP, OP_HASH160]);
    push_data(&mut script, &recipient_hash);
    script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);

    Ok(TimeLockScript {
        lock_height,
        recipient_hash,
        script,
    })
}

/// Extract the lock height from a CLTV script.
///
/// Only the prefix is checked: a 1–4 byte height (or small-int opcode)
/// followed by `OP_CHECKLOCKTIMEVERIFY`.
pub fn validate_script(script: &[u8]) -> Result<u32, ScriptError> {
    if script.len() < MIN_SCRIPT_LEN {
        return Err(ScriptError::MalformedScript(format!(
            "script is {} bytes, need at least {MIN_SCRIPT_LEN}",
            script.len()
        )));
    }

    let mut tokens = Tokenizer::new(script);

    let first = tokens
        .next()
        .ok_or_else(|| ScriptError::MalformedScript("missing lock height".into()))??;
    let lock_height = match small_int_value(first.opcode) {
        Some(n) => u32::from(n),
        None => {
            if first.data.is_empty() || first.data.len() > MAX_HEIGHT_BYTES {
                return Err(ScriptError::MalformedScript(format!(
                    "lock height push is {} bytes",
                    first.data.len()
                )));
            }
            let mut buf = [0u8; 4];
            buf[..first.data.len()].copy_from_slice(first.data);
            u32::from_le_bytes(buf)
        }
    };

    let second = tokens
        .next()
        .ok_or_else(|| ScriptError::MalformedScript("expected OP_CHECKLOCKTIMEVERIFY".into()))??;
    if second.opcode != OP_CHECKLOCKTIMEVERIFY {
        return Err(ScriptError::MalformedScript(format!(
            "expected OP_CHECKLOCKTIMEVERIFY, got 0x{:02x}",
            second.opcode
        )));
    }

    Ok(lock_height)
}

fn expect_opcode<'a, I>(tokens: &mut I, want: u8) -> Result<&'a [u8], ScriptError>
where
    I: Iterator<Item = Result<Instruction<'a>, ScriptError>>,
{
    let instruction = tokens
        .next()
        .ok_or_else(|| ScriptError::MalformedScript("script ends early".into()))??;
    if instruction.opcode != want {
        return Err(ScriptError::MalformedScript(format!(
            "expected {} at offset {}, found 0x{:02x}",
            name(want).unwrap_or("push"),
            instruction.offset,
            instruction.opcode
        )));
    }
    Ok(instruction.data)
}

/// Little-endian height with trailing zero bytes removed.
fn height_bytes(height: u32) -> Vec<u8> {
    let bytes = height.to_le_bytes();
    let len = bytes.iter().rposition(|b| *b != 0).map_or(1, |i| i + 1);
    bytes[..len].to_vec()
}

/// Minimal push: `OP_0` for zero, `OP_1..OP_16` for small values, otherwise
/// a direct-length or PUSHDATA push.
fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    match data {
        [] | [0] => script.push(OP_0),
        [n @ 1..=16] => script.push(OP_1 + n - 1),
        _ => {
            let len = data.len();
            if len <= OP_PUSHBYTES_75 as usize {
                script.push(len as u8);
            } else if len <= u8::MAX as usize {
                script.extend_from_slice(&[OP_PUSHDATA1, len as u8]);
            } else if len <= u16::MAX as usize {
                script.push(OP_PUSHDATA2);
                script.extend_from_slice(&(len as u16).to_le_bytes());
            } else {
                script.push(OP_PUSHDATA4);
                script.extend_from_slice(&(len as u32).to_le_bytes());
            }
            script.extend_from_slice(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: [u8; 20] = [0xAB; 20];

    #[test]
    fn test_layout_4320() {
        let s = build_script(4320, &HASH).unwrap();
        let mut expected = vec![0x02, 0xE0, 0x10, 0xb1, 0x75, 0x76, 0xa9, 0x14];
        expected.extend_from_slice(&HASH);
        expected.extend_from_slice(&[0x88, 0xac]);
        assert_eq!(s.script(), expected.as_slice());
    }

    #[test]
    fn test_roundtrip_heights() {
        for height in [1u32, 4320, 8640, 0xFFFF_FFFF] {
            let s = build_script(height, &HASH).unwrap();
            assert_eq!(validate_script(s.script()).unwrap(), height);
        }
    }

    #[test]
    fn test_small_int_heights_use_opcodes() {
        let s = build_script(1, &HASH).unwrap();
        assert_eq!(s.script()[0], OP_1);
        let s = build_script(16, &HASH).unwrap();
        assert_eq!(s.script()[0], OP_16);
        assert_eq!(validate_script(s.script()).unwrap(), 16);
        let s = build_script(17, &HASH).unwrap();
        assert_eq!(&s.script()[..2], &[0x01, 17]);
    }

    #[test]
    fn test_high_bit_height_is_direct_push() {
        let s = build_script(0x81, &HASH).unwrap();
        assert_eq!(&s.script()[..2], &[0x01, 0x81]);
        assert_eq!(validate_script(s.script()).unwrap(), 0x81);
    }

    #[test]
    fn test_height_bytes_trimmed() {
        assert_eq!(height_bytes(256), vec![0x00, 0x01]);
        assert_eq!(height_bytes(0x0001_0000), vec![0x00, 0x00, 0x01]);
        assert_eq!(height_bytes(u32::MAX), vec![0xFF; 4]);
    }

    #[test]
    fn test_bad_hash_length() {
        let err = build_script(10, &[0u8; 19]).unwrap_err();
        assert_eq!(
            err,
            ScriptError::InvalidHashLength {
                expected: 20,
                actual: 19
            }
        );
        assert!(build_script(10, &[0u8; 32]).is_err());
    }

    #[test]
    fn test_zero_height_rejected() {
        assert_eq!(
            build_script(0, &HASH).unwrap_err(),
            ScriptError::InvalidLockHeight
        );
    }

    #[test]
    fn test_validate_short_script() {
        assert!(matches!(
            validate_script(&[0x02, 0xE0, 0x10, 0xb1]),
            Err(ScriptError::MalformedScript(_))
        ));
    }

    #[test]
    fn test_validate_missing_cltv() {
        let mut script = build_script(4320, &HASH).unwrap().script().to_vec();
        script[3] = OP_DROP;
        assert!(matches!(
            validate_script(&script),
            Err(ScriptError::MalformedScript(_))
        ));
    }

    #[test]
    fn test_validate_oversized_height() {
        let mut script = vec![0x05, 1, 2, 3, 4, 5, OP_CHECKLOCKTIMEVERIFY];
        script.extend_from_slice(&[OP_DROP; 4]);
        assert!(validate_script(&script).is_err());
    }

    #[test]
    fn test_validate_op0_height() {
        let script = [OP_0, OP_CHECKLOCKTIMEVERIFY, OP_DROP, OP_DUP, OP_DUP, OP_DUP, OP_DUP, OP_DUP];
        assert!(validate_script(&script).is_err());
    }

    #[test]
    fn test_parse_full_template() {
        let built = build_script(8640, &HASH).unwrap();
        let parsed = TimeLockScript::parse(built.script()).unwrap();
        assert_eq!(parsed, built);
    }

    #[test]
    fn test_parse_rejects_trailing_bytes() {
        let mut script = build_script(8640, &HASH).unwrap().script().to_vec();
        script.push(OP_DUP);
        assert!(TimeLockScript::parse(&script).is_err());
    }

    #[test]
    fn test_is_spendable() {
        let s = build_script(4320, &HASH).unwrap();
        assert!(!s.is_spendable(BlockHeight::new(4319)));
        assert!(s.is_spendable(BlockHeight::new(4320)));
        assert!(s.is_spendable(BlockHeight::new(10_000)));
    }

    #[test]
    fn test_display_address() {
        let s = build_script(4320, &[0u8; 20]).unwrap();
        assert_eq!(
            s.display_address(),
            format!("CLTV(height=4320, recipient={})", "00".repeat(20))
        );
        assert_eq!(s.to_string(), s.display_address());
    }
}
