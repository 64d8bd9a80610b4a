#![no_main]
use libfuzzer_sys::fuzz_target;

// First byte picks the front end: command line or chunk script.
fuzz_target!(|data: &[u8]| {
    let Some((&mode, rest)) = data.split_first() else {
        return;
    };
    let text = String::from_utf8_lossy(rest);
    if mode & 1 == 0 {
        let args: Vec<String> = text
            .split(|c: char| c.is_whitespace() || c == '\0')
            .filter(|t| !t.is_empty())
            .take(32)
            .map(str::to_owned)
            .collect();
        oxidfu::cli::fuzz_try_parse_args(&args);
    } else {
        oxidfu::cli::fuzz_try_parse_script(&text);
    }
});
