#![no_main]

use libfuzzer_sys::fuzz_target;

use forge_script::{build_script, validate_script, TimeLockScript};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic the validator or the full parser.
    let prefix = validate_script(data);
    if let Ok(parsed) = TimeLockScript::parse(data) {
        // A full parse implies the prefix check passed with the same height.
        assert_eq!(prefix.ok(), Some(parsed.lock_height()));

        // Rebuilding from the parsed fields gives a script that validates to
        // the same height (the encoding may differ if the input was non-minimal).
        let rebuilt = build_script(parsed.lock_height(), parsed.recipient_hash())
            .expect("parsed height is non-zero and hash is 20 bytes");
        assert_eq!(validate_script(rebuilt.script()).ok(), Some(parsed.lock_height()));
    }
});
