#![no_main]

use html_sanitizer::tokenize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    // The lexer is lossless: concatenating token sources rebuilds the input.
    let tokens = tokenize(input);
    let rebuilt: String = tokens.iter().map(|t| t.source()).collect();
    assert_eq!(rebuilt, input, "token sources do not reconstruct the input");
});
