use std::fs;
use std::io::Read;
use std::time::Instant;

use bytes::BytesMut;
use teletab_frame::{decode_frame, normalize, NormalizeConfig};
use teletab_store::{IndicatorStore, StalenessScale};
use tracing::info;

use crate::cmd::DecodeArgs;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_snapshot, OutputFormat};

/// Run a captured byte stream through the same decode/normalize path the
/// live loop uses and print the resulting indicator table.
pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = resolve_input(&args)?;
    let normalize_config = NormalizeConfig {
        unscaled_symbols: args.unscaled.clone(),
        substitution_trigger: args.substitution_trigger,
    };

    let mut buf = BytesMut::from(bytes.as_slice());
    let mut store = IndicatorStore::new();
    let now = Instant::now();
    let mut decoded = 0usize;

    while let Some(frame) = decode_frame(&mut buf) {
        decoded += 1;
        if let Some(reading) = normalize(&frame, &normalize_config, now) {
            store.update(reading);
        }
    }

    info!(
        bytes = bytes.len(),
        frames = decoded,
        indicators = store.len(),
        "decoded capture"
    );

    print_snapshot(&store.snapshot(now), &StalenessScale::default(), format);
    Ok(SUCCESS)
}

fn resolve_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    if let Some(path) = &args.file {
        return fs::read(path).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        });
    }
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .map_err(|err| crate::exit::io_error("failed reading stdin", err))?;
    Ok(bytes)
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(CliError::new(USAGE, "--hex must not be empty"));
    }
    if compact.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            "--hex must contain an even number of hex digits",
        ));
    }
    // Chunk over bytes, not char indices: non-ASCII input must produce
    // an error, never a slice panic.
    compact
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| {
                    CliError::new(
                        USAGE,
                        format!("invalid hex byte: {}", String::from_utf8_lossy(pair)),
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_spaced_and_compact_forms() {
        assert_eq!(
            parse_hex("FC 53 01").unwrap(),
            vec![0xFC, 0x53, 0x01]
        );
        assert_eq!(parse_hex("fc5301").unwrap(), vec![0xFC, 0x53, 0x01]);
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert!(parse_hex("").is_err());
        assert!(parse_hex("F").is_err());
        assert!(parse_hex("ZZ").is_err());
    }

    #[test]
    fn parse_hex_rejects_multibyte_input_without_panicking() {
        // Even byte length, but the middle char is two UTF-8 bytes.
        assert!(parse_hex("A\u{03A9}A").is_err());
        assert!(parse_hex("\u{00FC}\u{00FC}").is_err());
    }
}
