//! Decode framed payloads without a schema and print them as a tree.
//!
//! Usage:
//!   binkv_dump [OPTIONS] [FILE ...]
//!   binkv_dump < payload.bin
//!
//! Options:
//!   --hex, -x    Always show byte strings as hex
//!
//! If no files are given, reads one frame from stdin. Exit code 1 if any input fails to decode.

use binkv::dump::{dump_section, BytesStyle};
use binkv::Codec;
use std::io::{self, Read};
use std::path::Path;

fn dump_bytes(codec: &Codec, label: &str, bytes: &[u8], style: BytesStyle) -> bool {
    let mut r = bytes;
    match codec.read_frame(&mut r) {
        Ok(section) => {
            println!("{}: {} bytes, {} fields", label, bytes.len() - r.len(), section.len());
            print!("{}", dump_section(&section, style));
            if !r.is_empty() {
                eprintln!("{}: {} trailing bytes ignored", label, r.len());
            }
            true
        }
        Err(e) => {
            eprintln!("{}: {}", label, e);
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let style = if let Some(pos) = args.iter().position(|a| a == "--hex" || a == "-x") {
        args.remove(pos);
        BytesStyle::Hex
    } else {
        BytesStyle::Auto
    };

    let codec = Codec::default();
    let mut ok = true;

    if args.is_empty() {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes)?;
        ok &= dump_bytes(&codec, "<stdin>", &bytes, style);
    } else {
        for path in &args {
            let path = Path::new(path);
            let bytes = match std::fs::read(path) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    ok = false;
                    continue;
                }
            };
            ok &= dump_bytes(&codec, &path.display().to_string(), &bytes, style);
        }
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
