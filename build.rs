//! Build script for the spotfetch CLI.
//!
//! Copies the `.env.example` template into the local data directory so a
//! ready-to-edit configuration sits next to where the binary looks for `.env`:
//! - Linux: `~/.local/share/spotfetch/.env.example`
//! - macOS: `~/Library/Application Support/spotfetch/.env.example`
//! - Windows: `%LOCALAPPDATA%/spotfetch/.env.example`

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotfetch");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}
