#![no_main]

use html_sanitizer::Sanitizer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut sanitizer = Sanitizer::new();
    sanitizer
        .allow_elements(&["a", "b", "i", "p", "div", "ul", "li", "table", "tr", "td", "br", "img"])
        .unwrap();
    sanitizer.allow_attributes(&["a"], &["href"], None).unwrap();
    sanitizer
        .allow_attributes(&["img"], &["src", "alt"], None)
        .unwrap();

    let once = sanitizer.sanitize(input);
    // Sanitized output must be a fixed point of the sanitizer.
    let twice = sanitizer.sanitize(&once);
    assert_eq!(twice, once, "sanitize is not idempotent for {input:?}");
});
