//! RGB Cycle Movie Generator
//!
//! Writes one HAP movie per standard frame rate to
//! `Assets/StreamingAssets/RGBCycle/`. Every movie is 3 seconds of 256x256
//! frames cycling solid red, green and blue, so a player test can check that
//! frame `i` shows color `i mod 3` at each rate.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --bin make_rgb_cycle
//! ```
//!
//! Set `HAP_FFMPEG` to use an ffmpeg other than the one on `PATH`.

use hap_test_assets::jobs::{generate_rgb_cycle, RgbCycleOptions};
use hap_test_assets::Ffmpeg;

fn main() {
    env_logger::init();

    let opts = RgbCycleOptions::default();
    match generate_rgb_cycle(&opts, &Ffmpeg::from_env()) {
        Ok(_) => println!("Done. Videos written to {}", opts.out_dir.display()),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
