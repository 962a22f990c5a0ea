//! HAP Alpha Asset Generator
//!
//! Writes `Assets/StreamingAssets/HapAlpha/HapAlpha.mov`, a single-frame HAP
//! Alpha movie of a 256x256 hue/alpha gradient, plus `000001.png`, that frame
//! decoded back by ffmpeg as the reference for alpha round-trip tests.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --bin make_hap_alpha
//! ```
//!
//! Set `HAP_FFMPEG` to use an ffmpeg other than the one on `PATH`.

use hap_test_assets::jobs::{generate_hap_alpha, HapAlphaOptions};
use hap_test_assets::Ffmpeg;

fn main() {
    env_logger::init();

    let opts = HapAlphaOptions::default();
    match generate_hap_alpha(&opts, &Ffmpeg::from_env()) {
        Ok(_) => println!("Done. Files written to {}", opts.out_dir.display()),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
