// Golden tests for the gradient synthesizer and PNG encoder
// Run normally: cargo test --test golden_tests
// Generate expected outputs: cargo test --test golden_tests --features generate-golden
//
// NOTE: Only platform-independent bytes are compared against files: the
// synthesized pixels, the IHDR chunk, and the decompressed scanline stream.
// The compressed IDAT payload depends on the deflate backend and is checked by
// decoding instead.

use hap_test_assets::pixel::synthesize;
use hap_test_assets::raster::{encode, scanlines, PNG_SIGNATURE};

#[cfg(feature = "generate-golden")]
use std::path::Path;

mod decoders;

/// Compare or generate golden output
fn golden_check(path: &str, data: &[u8]) {
    #[cfg(feature = "generate-golden")]
    {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, data).unwrap();
        println!("Generated: {} ({} bytes)", path, data.len());
    }

    #[cfg(not(feature = "generate-golden"))]
    {
        let expected = std::fs::read(path).unwrap_or_else(|e| {
            panic!(
                "Failed to read {}: {}. Run with --features generate-golden to create it.",
                path, e
            )
        });
        assert_eq!(data, &expected[..], "Mismatch in {}", path);
    }
}

fn load_fixture(name: &str) -> Vec<u8> {
    std::fs::read(format!("tests/fixtures/{name}"))
        .expect("Run 'cargo run --bin generate_fixture' first")
}

// ============================================================================
// SYNTHESIZER - pixels must match the checked-in fixtures exactly
// ============================================================================

#[test]
fn golden_gradient_16x16_pixels() {
    let buffer = synthesize(16, 16).unwrap();
    assert_eq!(buffer.as_bytes(), &load_fixture("gradient_16x16.rgba")[..]);
}

#[test]
fn golden_gradient_7x3_pixels() {
    let buffer = synthesize(7, 3).unwrap();
    assert_eq!(buffer.as_bytes(), &load_fixture("gradient_7x3.rgba")[..]);
}

// ============================================================================
// ENCODER - header chunk bytes are fully deterministic
// ============================================================================

fn ihdr_chunk_bytes(encoded: &[u8]) -> &[u8] {
    // signature (8) + length (4) + "IHDR" (4) + payload (13) + crc (4)
    &encoded[8..33]
}

#[test]
fn golden_ihdr_16x16() {
    let encoded = encode(&synthesize(16, 16).unwrap()).unwrap();
    assert_eq!(&encoded.as_bytes()[..8], &PNG_SIGNATURE);
    golden_check(
        "tests/expected/gradient_16x16.ihdr",
        ihdr_chunk_bytes(encoded.as_bytes()),
    );
}

#[test]
fn golden_ihdr_7x3() {
    let encoded = encode(&synthesize(7, 3).unwrap()).unwrap();
    golden_check(
        "tests/expected/gradient_7x3.ihdr",
        ihdr_chunk_bytes(encoded.as_bytes()),
    );
}

#[test]
fn golden_iend_trailer() {
    let encoded = encode(&synthesize(16, 16).unwrap()).unwrap();
    let bytes = encoded.as_bytes();
    assert_eq!(
        &bytes[bytes.len() - 12..],
        &[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
    );
}

// ============================================================================
// ROUND-TRIP - decompressed stream reproduces the fixture byte-for-byte
// ============================================================================

#[test]
fn roundtrip_gradient_16x16_matches_fixture() {
    let fixture = load_fixture("gradient_16x16.rgba");
    let encoded = encode(&synthesize(16, 16).unwrap()).unwrap();

    let (header, pixels) = decoders::decode_png(encoded.as_bytes()).unwrap();
    assert_eq!(header, (16, 16, 8, 6, 0, 0, 0));
    assert_eq!(pixels, fixture);
}

#[test]
fn roundtrip_scanline_stream_7x3() {
    let buffer = synthesize(7, 3).unwrap();
    let encoded = encode(&buffer).unwrap();

    let chunks = decoders::parse_chunks(encoded.as_bytes()).unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(&chunks[1].tag, b"IDAT");

    let raw = decoders::inflate(&chunks[1].payload).unwrap();
    assert_eq!(raw, scanlines(&buffer));
    assert_eq!(raw.len(), (7 * 4 + 1) * 3);
    assert!(raw.chunks_exact(7 * 4 + 1).all(|row| row[0] == 0));
}
