//! Test Fixture Generator
//!
//! Regenerates the raw RGBA gradients used as inputs by the golden tests.
//! The gradient is pure floating-point arithmetic with round-half-up
//! quantization, so these files are identical on every platform.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_fixture
//! ```
//!
//! # Generated Files
//!
//! - `tests/fixtures/gradient_16x16.rgba` (1,024 bytes)
//!   - hue sweep left to right, alpha ramp top to bottom
//!
//! - `tests/fixtures/gradient_7x3.rgba` (84 bytes)
//!   - seven columns land exactly on the six HSV sector boundaries, three rows
//!     give alpha 0, 128 and 255

use hap_test_assets::synthesize;

const FIXTURES: [(u32, u32); 2] = [(16, 16), (7, 3)];

fn main() {
    env_logger::init();

    for (width, height) in FIXTURES {
        let path = format!("tests/fixtures/gradient_{width}x{height}.rgba");
        let pixels = match synthesize(width, height) {
            Ok(buffer) => buffer.into_vec(),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(e.exit_code());
            }
        };
        if let Err(e) = std::fs::write(&path, &pixels) {
            eprintln!("error: failed to write {path}: {e}");
            std::process::exit(1);
        }
        println!("Generated {path} ({} bytes)", pixels.len());
    }
}
