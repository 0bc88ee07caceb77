#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(tree) = moltke::parse_file(text, "fuzz.txt") {
        let canonical = moltke::serialize(&tree);
        let reparsed = moltke::parse_file(&canonical, "fuzz.txt").unwrap();
        assert_eq!(tree, reparsed);
        assert_eq!(moltke::serialize(&reparsed), canonical);
    }
});
