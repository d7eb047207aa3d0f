//! 名称语法随机测试
//!
//! 对随机生成的字符串（大小写、Unicode、空串、纯连字符等）比较
//! `is_valid_name` 与逐字符判定的结果。

use bico_registrar::domain::is_valid_name;
use rand::{rngs::StdRng, Rng, SeedableRng};

const ALPHABET: &[char] = &[
    'a', 'm', 'z', 'A', 'Z', '0', '5', '9', '-', '_', '.', ' ', '!', '\n', 'é', 'ß', '中', '🦀',
    '\u{0}', 'ａ',
];

fn reference(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[test]
fn test_random_strings_match_reference() {
    let mut rng = StdRng::seed_from_u64(0x6269636f);

    for _ in 0..20_000 {
        let len = rng.gen_range(0..12);
        let s: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
            .collect();
        assert_eq!(is_valid_name(&s), reference(&s), "mismatch for {:?}", s);
    }
}

#[test]
fn test_random_valid_names_accepted() {
    let mut rng = StdRng::seed_from_u64(42);
    let valid: Vec<char> = ('a'..='z').chain('0'..='9').chain(['-']).collect();

    for _ in 0..5_000 {
        let len = rng.gen_range(1..40);
        let s: String = (0..len)
            .map(|_| valid[rng.gen_range(0..valid.len())])
            .collect();
        assert!(is_valid_name(&s), "rejected {:?}", s);
    }
}

#[test]
fn test_edge_cases() {
    assert!(!is_valid_name(""));
    assert!(is_valid_name("---"));
    assert!(!is_valid_name("ENS"));
    assert!(!is_valid_name("ens\u{0}"));
    assert!(!is_valid_name("ｅｎｓ"));
}
