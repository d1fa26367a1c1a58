//! Decode fuzz target: feed arbitrary bytes to the frame decoders.
//! Decoding must not panic; it returns Ok or a CodecError.
//! Build with: cargo fuzz run decode_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let codec = binkv::Codec::default();
    let _ = codec.read_frame(&mut &data[..]);
    let _ = codec.decode::<binkv::messages::GetBlocksFastResponse>(data);
    // The body alone, as if the header had already been checked.
    let _ = codec.read_section(&mut &data[..]);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run decode_fuzz");
}
