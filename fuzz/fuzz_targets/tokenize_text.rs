#![no_main]

use libfuzzer_sys::fuzz_target;
use recap_cluster::tokenizer::MIN_TOKEN_CHARS;
use recap_cluster::Tokenizer;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    for tokenizer in [Tokenizer::thematic(), Tokenizer::feature()] {
        for token in tokenizer.tokenize(&raw) {
            assert!(token.chars().count() >= MIN_TOKEN_CHARS);
            assert!(!token.chars().any(char::is_whitespace));
            assert!(!tokenizer.is_stopword(&token));
        }
    }
});
