#![no_main]

use libfuzzer_sys::fuzz_target;

use forge_crypto::{decode_taproot_address, encode_taproot_address, validate_taproot_address};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Never panics; anything that decodes must re-encode to the lowercase input.
    if let Ok((network, key)) = decode_taproot_address(s) {
        let encoded = encode_taproot_address(&key, network).expect("decoded key re-encodes");
        assert_eq!(encoded, s.to_ascii_lowercase());
    }
    let _ = validate_taproot_address(s);
    let _ = forge_treasury::validate_recipient(s);
});
