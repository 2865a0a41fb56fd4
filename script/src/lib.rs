//! Bitcoin script support for treasury time-locks.
//!
//! Each treasury mini-output is guarded by a CLTV-wrapped P2PKH script:
//!
//! ```text
//! <lock_height> OP_CHECKLOCKTIMEVERIFY OP_DROP
//! OP_DUP OP_HASH160 <recipient_hash> OP_EQUALVERIFY OP_CHECKSIG
//! ```

pub mod cltv;
pub mod error;
pub mod opcodes;
pub mod tokenizer;

pub use cltv::{build_script, validate_script, TimeLockScript, RECIPIENT_HASH_LEN};
pub use error::ScriptError;
pub use tokenizer::{Instruction, Tokenizer};
