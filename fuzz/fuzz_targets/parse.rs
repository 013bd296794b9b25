#![no_main]

use cxxparse_syntax::sink::SinkEvent;
use cxxparse_syntax::{Language, ParseMode, ParserConfig, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    // The first byte picks the dialect and mode so both get coverage.
    let selector = data.first().copied().unwrap_or(0);
    let language = if selector & 1 == 0 { Language::Cpp } else { Language::C };
    let mode = if selector & 2 == 0 { ParseMode::Complete } else { ParseMode::Quick };
    let config = ParserConfig::new().with_language(language).with_mode(mode);

    let mut events: Vec<SinkEvent> = Vec::new();
    let _ = parse(source, config, &mut events);

    // Scopes must balance even when the input is garbage.
    let mut depth: usize = 0;
    for event in &events {
        match event {
            SinkEvent::Enter(_) => depth += 1,
            SinkEvent::Exit(_) => depth = depth.checked_sub(1).expect("exit without enter"),
            SinkEvent::Accept(_) => {}
        }
    }
    assert_eq!(depth, 0, "unbalanced scopes");
});
