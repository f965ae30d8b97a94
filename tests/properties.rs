use std::thread;

use fast_sbcs::*;
use pretty_assertions::assert_eq;

fn sample_bytes() -> Vec<u8> {
    let mut bytes: Vec<u8> = b"Hello, world! 0123 (x-y). ".to_vec();
    bytes.extend(0x80..=0xFFu8);
    bytes.extend(b" end");
    bytes
}

#[test]
fn test_every_assigned_byte_round_trips() {
    for encoding in Encoding::all() {
        for byte in 0..=0xFFu8 {
            let cp = encoding.decode_unit(byte);
            if cp == BAD_INPUT {
                assert_eq!(encoding.encode_unit(cp), None);
                continue;
            }
            let back = encoding
                .encode_unit(cp)
                .unwrap_or_else(|| panic!("{}: U+{cp:04X} has no byte", encoding.name()));
            // ArmSCII-8 sends some ASCII punctuation to its Armenian-range copies.
            if encoding.id() == EncodingId::ArmScii8 && (0x28..=0x2F).contains(&cp) {
                assert_eq!(encoding.decode_unit(back), cp);
            } else {
                assert_eq!(back, byte, "{} byte 0x{byte:02X}", encoding.name());
            }
        }
    }
}

#[test]
fn test_assigned_counts_match_forward_mapping() {
    for encoding in Encoding::all() {
        let counted = (0..=0xFFu8)
            .filter(|&byte| encoding.decode_unit(byte) != BAD_INPUT)
            .count();
        assert_eq!(encoding.mapping().assigned(), counted, "{}", encoding.name());
    }
    assert_eq!(ASCII.mapping().assigned(), 128);
    assert_eq!(ISO_8859_1.mapping().assigned(), 256);
    assert_eq!(WINDOWS_1252.mapping().assigned(), 251);
}

#[test]
fn test_unassigned_and_marker_inputs() {
    assert_eq!(ASCII.decode_unit(0x80), BAD_INPUT);
    assert_eq!(ISO_8859_3.decode_unit(0xA5), BAD_INPUT);
    assert_eq!(ARMSCII_8.decode_unit(0xFF), BAD_INPUT);
    for encoding in Encoding::all() {
        assert_eq!(encoding.encode_unit(BAD_INPUT), None);
        assert_eq!(encoding.encode_unit(0x11_0000), None);
        assert_eq!(encoding.encode_unit(0x1F600), None);
    }
}

#[test]
fn test_chunked_decoding_matches_one_shot() {
    let input = sample_bytes();
    for encoding in Encoding::all() {
        let mut whole = vec![0u32; input.len()];
        encoding
            .new_decoder()
            .decode_to_units(&input, &mut whole, true);

        for split in 0..=input.len() {
            let mut decoder = encoding.new_decoder();
            let mut out = vec![0u32; input.len()];
            let (first, read, written) =
                decoder.decode_to_units(&input[..split], &mut out, false);
            assert_eq!(first, CoderResult::InputEmpty);
            assert_eq!((read, written), (split, split));
            let (last, _, _) = decoder.decode_to_units(&input[split..], &mut out[split..], true);
            assert_eq!(last, CoderResult::InputEmpty);
            assert_eq!(out, whole, "{} split at {split}", encoding.name());
            assert!(decoder.is_finished());
        }
    }
}

#[test]
fn test_chunked_text_decoding_matches_one_shot() {
    let input = sample_bytes();
    for encoding in [&WINDOWS_1252, &KOI8_U, &ISO_8859_8] {
        let mut whole = String::new();
        encoding
            .new_decoder()
            .decode_to_string(&input, &mut whole, true)
            .unwrap();
        for split in [0, 1, 26, 100, input.len()] {
            let mut decoder = encoding.new_decoder();
            let mut out = String::new();
            decoder
                .decode_to_string(&input[..split], &mut out, false)
                .unwrap();
            decoder
                .decode_to_string(&input[split..], &mut out, true)
                .unwrap();
            assert_eq!(out, whole);
        }
    }
}

#[test]
fn test_bounded_output_encoding_matches_growable() {
    let text: Vec<u32> = "Grüße, мир (ok) € 中"
        .chars()
        .map(u32::from)
        .collect();
    for encoding in [&ISO_8859_1, &WINDOWS_1251, &ARMSCII_8, &ISO_8859_15] {
        for mode in [ErrorMode::Replace('?'), ErrorMode::Long, ErrorMode::Entity, ErrorMode::Skip] {
            let mut expected = Vec::new();
            Encoder::with_errors(encoding, mode)
                .encode_from_units(&text, &mut expected, true)
                .unwrap();

            for capacity in 1..=12 {
                let mut encoder = Encoder::with_errors(encoding, mode);
                let mut dst = vec![0u8; capacity];
                let mut out = Vec::new();
                let mut offset = 0;
                loop {
                    let (result, read, written) =
                        encoder.encode_into(&text[offset..], &mut dst, true).unwrap();
                    assert!(written <= capacity);
                    out.extend_from_slice(&dst[..written]);
                    offset += read;
                    if result == CoderResult::InputEmpty {
                        break;
                    }
                }
                assert_eq!(out, expected, "{} {mode:?} capacity {capacity}", encoding.name());
                assert!(encoder.is_finished());
            }
        }
    }
}

#[test]
fn test_output_full_at_exact_capacity() {
    let mut decoder = CP850.new_decoder();
    let mut dst = [0u32; 4];
    let (result, read, written) = decoder.decode_to_units(&[0x80, 0x81, 0x82, 0x83], &mut dst, true);
    assert_eq!((result, read, written), (CoderResult::InputEmpty, 4, 4));
    assert_eq!(dst, [0x00C7, 0x00FC, 0x00E9, 0x00E2]);

    let mut decoder = CP850.new_decoder();
    let mut empty: [u32; 0] = [];
    let (result, read, written) = decoder.decode_to_units(&[0x41], &mut empty, true);
    assert_eq!((result, read, written), (CoderResult::OutputFull, 0, 0));
    assert!(!decoder.is_finished());
}

#[test]
fn test_transcode_between_cyrillic_code_pages() {
    let koi8 = [0xF0, 0xD2, 0xC9, 0xD7, 0xC5, 0xD4];
    let mut units = [0u32; 6];
    KOI8_R.new_decoder().decode_to_units(&koi8, &mut units, true);
    let mut cp1251 = Vec::new();
    WINDOWS_1251
        .new_encoder()
        .encode_from_units(&units, &mut cp1251, true)
        .unwrap();
    assert_eq!(cp1251, [0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]);

    let mut cp866 = Vec::new();
    CP866
        .new_encoder()
        .encode_from_units(&units, &mut cp866, true)
        .unwrap();
    let mut text = String::new();
    CP866
        .new_decoder()
        .decode_to_string(&cp866, &mut text, true)
        .unwrap();
    assert_eq!(text, "Привет");
}

#[test]
fn test_bad_input_marker_flows_to_encoder_policy() {
    let mut units = [0u32; 3];
    WINDOWS_1252
        .new_decoder()
        .decode_to_units(&[0x41, 0x81, 0x42], &mut units, true);
    let mut out = Vec::new();
    let err = Encoder::with_errors(&ISO_8859_1, ErrorMode::Strict)
        .encode_from_units(&units, &mut out, true)
        .unwrap_err();
    assert_eq!(
        err,
        Error::Unmappable {
            unit: BAD_INPUT,
            position: 1,
            written: 1,
            direction: Direction::Encode,
        }
    );
}

#[test]
fn test_closure_error_policy() {
    let mut seen = Vec::new();
    let mut encoder = Encoder::with_errors(&ASCII, |unit: u32, direction: Direction| {
        seen.push((unit, direction));
        Recovery::Escape(format!("[{unit:X}]"))
    });
    let mut out = Vec::new();
    encoder.encode_str("né", &mut out, true).unwrap();
    drop(encoder);
    assert_eq!(out, b"n[E9]".to_vec());
    assert_eq!(seen, vec![(0xE9, Direction::Encode)]);
}

#[test]
fn test_catalogue_used_from_many_threads() {
    let input = sample_bytes();
    let reference: Vec<Vec<u32>> = Encoding::all()
        .iter()
        .map(|encoding| {
            let mut out = vec![0u32; input.len()];
            encoding.new_decoder().decode_to_units(&input, &mut out, true);
            out
        })
        .collect();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for (encoding, expected) in Encoding::all().iter().zip(&reference) {
                    let mut out = vec![0u32; input.len()];
                    encoding.new_decoder().decode_to_units(&input, &mut out, true);
                    assert_eq!(&out, expected);

                    let mut bytes = Vec::new();
                    Encoder::with_errors(*encoding, ErrorMode::Skip)
                        .encode_from_units(&out, &mut bytes, true)
                        .unwrap();
                    assert!(bytes.len() <= input.len());
                }
            });
        }
    });
}
