use std::collections::HashMap;

use dmp_core::matching::{match_alphabet, match_bitap};
use dmp_core::{match_main, MatchError, Settings};

#[test]
fn upstream_port_match_alphabet_matrix() {
    let mut bitmask: HashMap<char, u64> = HashMap::new();
    bitmask.insert('a', 4);
    bitmask.insert('b', 2);
    bitmask.insert('c', 1);
    assert_eq!(match_alphabet("abc"), bitmask);

    let mut bitmask: HashMap<char, u64> = HashMap::new();
    bitmask.insert('a', 37);
    bitmask.insert('b', 18);
    bitmask.insert('c', 8);
    assert_eq!(match_alphabet("abcaba"), bitmask);
}

#[test]
fn upstream_port_match_bitap_matrix() {
    let mut settings = Settings {
        match_distance: 100,
        match_threshold: 0.5,
        ..Settings::default()
    };

    assert_eq!(match_bitap(&settings, "abcdefghijk", "fgh", 5), Some(5));
    assert_eq!(match_bitap(&settings, "abcdefghijk", "fgh", 0), Some(5));
    assert_eq!(match_bitap(&settings, "abcdefghijk", "efxhi", 0), Some(4));
    assert_eq!(match_bitap(&settings, "abcdefghijk", "cdefxyhijk", 5), Some(2));
    assert_eq!(match_bitap(&settings, "abcdefghijk", "bxy", 1), None);

    assert_eq!(match_bitap(&settings, "123456789xx0", "3456789x0", 2), Some(2));

    assert_eq!(match_bitap(&settings, "abcdef", "xxabc", 4), Some(0));
    assert_eq!(match_bitap(&settings, "abcdef", "defyy", 4), Some(3));
    assert_eq!(match_bitap(&settings, "abcdef", "xabcdefy", 0), Some(0));

    settings.match_threshold = 0.4;
    assert_eq!(match_bitap(&settings, "abcdefghijk", "efxyhi", 1), Some(4));

    settings.match_threshold = 0.3;
    assert_eq!(match_bitap(&settings, "abcdefghijk", "efxyhi", 1), None);

    settings.match_threshold = 0.0;
    assert_eq!(match_bitap(&settings, "abcdefghijk", "bcdef", 1), Some(1));
    settings.match_threshold = 0.5;

    assert_eq!(match_bitap(&settings, "abcdexyzabcde", "abccde", 3), Some(0));
    assert_eq!(match_bitap(&settings, "abcdexyzabcde", "abccde", 5), Some(8));

    // Strict location.
    settings.match_distance = 10;
    assert_eq!(
        match_bitap(&settings, "abcdefghijklmnopqrstuvwxyz", "abcdefg", 24),
        None
    );
    assert_eq!(
        match_bitap(&settings, "abcdefghijklmnopqrstuvwxyz", "abcdxxefg", 1),
        Some(0)
    );

    // Loose location.
    settings.match_distance = 1000;
    assert_eq!(
        match_bitap(&settings, "abcdefghijklmnopqrstuvwxyz", "abcdefg", 24),
        Some(0)
    );
}

#[test]
fn upstream_port_match_main_matrix() {
    let settings = Settings::default();

    assert_eq!(match_main(&settings, "abcdef", "abcdef", 1000), Ok(Some(0)));
    assert_eq!(match_main(&settings, "", "abcdef", 1), Ok(None));
    assert_eq!(match_main(&settings, "abcdef", "", 3), Ok(Some(3)));
    assert_eq!(match_main(&settings, "abcdef", "de", 3), Ok(Some(3)));
    assert_eq!(match_main(&settings, "abcdef", "defy", 4), Ok(Some(3)));
    assert_eq!(match_main(&settings, "abcdef", "abcdefy", 0), Ok(Some(0)));

    let loose = Settings {
        match_threshold: 0.7,
        ..Settings::default()
    };
    assert_eq!(
        match_main(
            &loose,
            "I am the very model of a modern major general.",
            " that berry ",
            5
        ),
        Ok(Some(4))
    );
}

#[test]
fn match_main_nearby_fuzzy_locations() {
    let settings = Settings::default();
    assert_eq!(match_main(&settings, "abcdefghijk", "fgh", 5), Ok(Some(5)));
    assert_eq!(match_main(&settings, "abcdefghijk", "efxhi", 0), Ok(Some(4)));
    assert_eq!(match_main(&settings, "abcdefghijk", "bxy", 1), Ok(None));
}

#[test]
fn match_main_rejects_oversized_patterns() {
    let settings = Settings::default();
    let pattern = "a".repeat(33);
    assert_eq!(
        match_main(&settings, "text", &pattern, 0),
        Err(MatchError::PatternTooLong { len: 33, max: 32 })
    );
}
