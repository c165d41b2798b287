use dropnkeep_core::{resolve, EncodingResolver, SourceEncoding, TextResolver};

#[test]
fn valid_utf8_wins_without_fallback() {
    let decoded = resolve("héllo".as_bytes());
    assert_eq!(decoded, "héllo");
    assert_eq!(decoded.encoding(), SourceEncoding::Utf8);
}

#[test]
fn multibyte_utf8_that_is_also_valid_shift_jis_stays_utf8() {
    // "日本" in UTF-8; these bytes also form Shift-JIS sequences.
    let decoded = resolve("日本".as_bytes());
    assert_eq!(decoded, "日本");
    assert_eq!(decoded.encoding(), SourceEncoding::Utf8);
}

#[test]
fn shift_jis_file_decodes_at_second_step() {
    // "日本語" in Shift-JIS.
    let bytes = [0x93, 0xFA, 0x96, 0x7B, 0x8C, 0xEA];
    let decoded = resolve(&bytes);
    assert_eq!(decoded, "日本語");
    assert_eq!(decoded.encoding(), SourceEncoding::ShiftJis);
}

#[test]
fn latin1_text_falls_back_to_windows_1252() {
    let cases: [(&[u8], &str); 3] = [
        (b"caf\xE9", "caf\u{e9}"),
        (b"caf\xE9 au lait", "caf\u{e9} au lait"),
        (b"na\xEFve\n", "na\u{ef}ve\n"),
    ];
    for (bytes, expected) in cases {
        let decoded = resolve(bytes);
        assert_eq!(decoded, expected);
        assert_eq!(decoded.encoding(), SourceEncoding::Windows1252);
        assert_ne!(decoded.as_str(), String::from_utf8_lossy(bytes));
        assert!(!decoded.as_str().contains('\u{FFFD}'));
    }
}

#[test]
fn latin1_bytes_forming_valid_shift_jis_pairs_stay_shift_jis() {
    // 0xE9 0x6C is a mapped Shift-JIS pair; without metadata this is ambiguous.
    let decoded = resolve(b"h\xE9llo");
    assert_eq!(decoded.encoding(), SourceEncoding::ShiftJis);
    assert!(!decoded.as_str().contains('\u{FFFD}'));

    let single_byte =
        EncodingResolver::with_candidates(&[SourceEncoding::Utf8]).decode(b"h\xE9llo");
    assert_eq!(single_byte, "h\u{e9}llo");
    assert_eq!(single_byte.encoding(), SourceEncoding::Windows1252);
}

#[test]
fn every_byte_value_decodes_without_panicking() {
    let all_bytes = (0..=255u8).collect::<Vec<_>>();
    let resolver = EncodingResolver::default();
    for chunk in [&all_bytes[..], &all_bytes[128..], &all_bytes[..1], &[0xFF, 0xFE, 0x00][..]] {
        let decoded = resolver.resolve(chunk);
        assert!(decoded.as_str().chars().count() <= chunk.len());
    }

    let single_byte = EncodingResolver::with_candidates(&[]).decode(&all_bytes);
    assert_eq!(single_byte.as_str().chars().count(), 256);
}

#[test]
fn resolving_twice_is_identical() {
    let inputs: [&[u8]; 4] = [b"", b"plain ascii", b"h\xE9llo", &[0x93, 0xFA, 0x82]];
    let resolver = EncodingResolver::default();
    for input in inputs {
        assert_eq!(resolver.resolve(input), resolver.resolve(input));
    }
}
