#![no_main]

use libfuzzer_sys::fuzz_target;

use forge_treasury::{Treasury, TreasuryConfig, TreasurySnapshot};

// Untrusted snapshot bytes must be rejected cleanly, never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(snapshot) = TreasurySnapshot::from_bytes(data) {
        if let Ok(treasury) = Treasury::restore(TreasuryConfig::default(), &snapshot) {
            let _ = treasury.stats();
            let _ = treasury.spendable_balance();
        }
    }
});
