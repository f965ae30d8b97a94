//! # fast-sbcs CLI - Single-Byte Encoding Converter
//!
//! Command-line interface for streaming conversions between legacy
//! single-byte encodings and UTF-8.

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use serde::Serialize;
#[cfg(feature = "cli")]
use tracing::{debug, info};
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
use fast_sbcs::{
    BAD_INPUT, ConvertOptions, Decoder, Direction, Encoder, Encoding, Error as ConvertError,
    ErrorMode, Mapping, UnitCodec,
};

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features disabled. Enable with --features cli");
    std::process::exit(1);
}

/// fast-sbcs: single-byte character encoding converter
#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "fast-sbcs")]
#[command(version, about, long_about = None)]
#[command(author = "FastEncode Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert files between character encodings
    Convert(ConvertArgs),

    /// List all supported encodings
    List(ListArgs),

    /// Validate that a file is properly encoded
    Validate(ValidateArgs),

    /// Display detailed information about an encoding
    Info(InfoArgs),
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ConvertArgs {
    /// Source encoding
    #[arg(short = 'f', long = "from")]
    from: EncodingArg,

    /// Target encoding
    #[arg(short = 't', long = "to")]
    to: EncodingArg,

    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do with characters the target cannot represent
    #[arg(long)]
    on_error: Option<OnError>,

    /// Replacement character for --on-error replace (default: ?)
    #[arg(long)]
    replacement: Option<char>,

    /// Buffer size for large files (KB)
    #[arg(long)]
    buffer_size: Option<usize>,

    /// JSON file with conversion options; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ListArgs {
    /// Show encoding details
    #[arg(long)]
    details: bool,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct ValidateArgs {
    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Expected encoding
    #[arg(short, long)]
    encoding: EncodingArg,

    /// Show position of first error
    #[arg(long)]
    show_errors: bool,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct InfoArgs {
    /// Encoding to describe
    encoding: EncodingArg,

    /// Show character mapping samples
    #[arg(long)]
    samples: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnError {
    Strict,
    Replace,
    Skip,
    Long,
    Entity,
}

/// Either a catalogue encoding or UTF-8 at the host-string boundary.
#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug)]
enum EncodingArg {
    Utf8,
    Single(&'static Encoding),
}

#[cfg(feature = "cli")]
impl EncodingArg {
    fn name(self) -> &'static str {
        match self {
            EncodingArg::Utf8 => "UTF-8",
            EncodingArg::Single(encoding) => encoding.name(),
        }
    }
}

#[cfg(feature = "cli")]
impl std::str::FromStr for EncodingArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("UTF-8") || s.eq_ignore_ascii_case("UTF8") {
            return Ok(EncodingArg::Utf8);
        }
        Ok(EncodingArg::Single(Encoding::require(s)?))
    }
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ConversionResult {
    success: bool,
    bytes_processed: usize,
    bytes_written: usize,
    illegal_units: usize,
    processing_time_ms: u64,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert(ref args) => convert_command(args, &cli)?,
        Commands::List(ref args) => list_command(args, &cli)?,
        Commands::Validate(ref args) => validate_command(args, &cli)?,
        Commands::Info(ref args) => info_command(args, &cli)?,
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn load_options(args: &ConvertArgs) -> Result<ConvertOptions> {
    let mut options = match args.config {
        Some(ref path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => ConvertOptions::default(),
    };

    let replacement = args.replacement.unwrap_or(match options.errors {
        ErrorMode::Replace(c) => c,
        _ => '?',
    });
    if let Some(on_error) = args.on_error {
        options.errors = match on_error {
            OnError::Strict => ErrorMode::Strict,
            OnError::Replace => ErrorMode::Replace(replacement),
            OnError::Skip => ErrorMode::Skip,
            OnError::Long => ErrorMode::Long,
            OnError::Entity => ErrorMode::Entity,
        };
    } else if let ErrorMode::Replace(_) = options.errors {
        options.errors = ErrorMode::Replace(replacement);
    }
    if let Some(kb) = args.buffer_size {
        options.buffer_size = kb
            .checked_mul(1024)
            .with_context(|| format!("Buffer size of {kb} KB is too large"))?;
    }
    anyhow::ensure!(options.buffer_size > 0, "Buffer size must be positive");
    Ok(options)
}

#[cfg(feature = "cli")]
fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    Ok(match path {
        Some(path) => {
            info!("Reading from: {}", path.display());
            Box::new(
                fs::File::open(path)
                    .with_context(|| format!("Failed to open input file: {}", path.display()))?,
            )
        }
        None => {
            info!("Reading from stdin");
            Box::new(io::stdin().lock())
        }
    })
}

#[cfg(feature = "cli")]
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            info!("Writing to: {}", path.display());
            Box::new(io::BufWriter::new(fs::File::create(path).with_context(
                || format!("Failed to create output file: {}", path.display()),
            )?))
        }
        None => Box::new(io::BufWriter::new(io::stdout().lock())),
    })
}

/// Bytes in, bytes out and error-policy hits of one conversion.
#[cfg(feature = "cli")]
#[derive(Debug, Default)]
struct Totals {
    read: usize,
    written: usize,
    illegal: usize,
}

#[cfg(feature = "cli")]
fn convert_command(args: &ConvertArgs, cli: &Cli) -> Result<()> {
    let start_time = std::time::Instant::now();
    let options = load_options(args)?;

    info!(
        "Converting from {} to {} ({:?}, {} byte chunks)",
        args.from.name(),
        args.to.name(),
        options.errors,
        options.buffer_size
    );

    let mut reader = open_input(args.input.as_deref())?;
    let mut writer = open_output(args.output.as_deref())?;

    let totals = match (args.from, args.to) {
        (EncodingArg::Single(from), EncodingArg::Single(to)) => {
            transcode_stream(from, to, &options, &mut reader, &mut writer)?
        }
        (EncodingArg::Single(from), EncodingArg::Utf8) => {
            decode_stream(from, &options, &mut reader, &mut writer)?
        }
        (EncodingArg::Utf8, EncodingArg::Single(to)) => {
            encode_text(to, &options, &mut reader, &mut writer)?
        }
        (EncodingArg::Utf8, EncodingArg::Utf8) => copy_text(&options, &mut reader, &mut writer)?,
    };
    writer.flush().context("Failed to flush output")?;

    let processing_time = start_time.elapsed();
    info!(
        "Processed {} bytes -> {} bytes in {:?} ({} replaced)",
        totals.read, totals.written, processing_time, totals.illegal
    );

    match cli.format {
        OutputFormat::Json => {
            let result = ConversionResult {
                success: true,
                bytes_processed: totals.read,
                bytes_written: totals.written,
                illegal_units: totals.illegal,
                processing_time_ms: processing_time.as_millis() as u64,
            };
            eprintln!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            if cli.verbose || args.output.is_some() {
                eprintln!("✓ Conversion completed successfully");
            }
        }
    }

    Ok(())
}

/// Read into `buf`, retrying on interruption. Returns 0 at end of input.
#[cfg(feature = "cli")]
fn read_chunk(reader: &mut dyn Read, buf: &mut [u8]) -> Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }
}

#[cfg(feature = "cli")]
fn transcode_stream(
    from: &'static Encoding,
    to: &'static Encoding,
    options: &ConvertOptions,
    reader: &mut dyn Read,
    writer: &mut dyn Write,
) -> Result<Totals> {
    let mut decoder = Decoder::new(from);
    let mut encoder = Encoder::with_errors(to, options.errors);
    let mut chunk = vec![0u8; options.buffer_size];
    let mut units = vec![0u32; options.buffer_size];
    let mut out = Vec::with_capacity(options.buffer_size);
    let mut totals = Totals::default();

    loop {
        let n = read_chunk(reader, &mut chunk)?;
        let last = n == 0;
        let (_, read, written) = decoder.decode_to_units(&chunk[..n], &mut units, last);
        debug_assert_eq!(read, n);
        out.clear();
        encoder
            .encode_from_units(&units[..written], &mut out, last)
            .map_err(|e| locate(e, totals.read, &chunk[..n]))?;
        writer.write_all(&out).context("Failed to write output")?;
        totals.read += n;
        totals.written += out.len();
        if last {
            break;
        }
    }
    totals.illegal = encoder.illegal_count();
    Ok(totals)
}

#[cfg(feature = "cli")]
fn decode_stream(
    from: &'static Encoding,
    options: &ConvertOptions,
    reader: &mut dyn Read,
    writer: &mut dyn Write,
) -> Result<Totals> {
    let mut decoder = Decoder::with_errors(from, options.errors);
    let mut chunk = vec![0u8; options.buffer_size];
    let mut text = String::with_capacity(options.buffer_size);
    let mut totals = Totals::default();

    loop {
        let n = read_chunk(reader, &mut chunk)?;
        let last = n == 0;
        text.clear();
        decoder
            .decode_to_string(&chunk[..n], &mut text, last)
            .map_err(|e| locate(e, totals.read, &chunk[..n]))?;
        writer
            .write_all(text.as_bytes())
            .context("Failed to write output")?;
        totals.read += n;
        totals.written += text.len();
        if last {
            break;
        }
    }
    totals.illegal = decoder.illegal_count();
    Ok(totals)
}

/// Split off the longest valid UTF-8 prefix of `pending`, keeping an
/// incomplete trailing sequence for the next chunk. `offset` is the stream
/// position of `pending[0]`.
#[cfg(feature = "cli")]
fn take_utf8(pending: &mut Vec<u8>, offset: usize, last: bool) -> Result<String> {
    let valid = match std::str::from_utf8(pending) {
        Ok(_) => pending.len(),
        Err(e) if e.error_len().is_none() && !last => e.valid_up_to(),
        Err(e) => anyhow::bail!(
            "Input is not valid UTF-8 at offset {}",
            offset + e.valid_up_to()
        ),
    };
    let rest = pending.split_off(valid);
    String::from_utf8(std::mem::replace(pending, rest)).context("Input is not valid UTF-8")
}

#[cfg(feature = "cli")]
fn encode_text(
    to: &'static Encoding,
    options: &ConvertOptions,
    reader: &mut dyn Read,
    writer: &mut dyn Write,
) -> Result<Totals> {
    let mut encoder = Encoder::with_errors(to, options.errors);
    let mut chunk = vec![0u8; options.buffer_size];
    let mut pending = Vec::with_capacity(options.buffer_size + 3);
    let mut out = Vec::with_capacity(options.buffer_size);
    let mut decoded = 0;
    let mut totals = Totals::default();

    loop {
        let n = read_chunk(reader, &mut chunk)?;
        let last = n == 0;
        pending.extend_from_slice(&chunk[..n]);
        let text = take_utf8(&mut pending, decoded, last)?;
        out.clear();
        encoder
            .encode_str(&text, &mut out, last)
            .map_err(|e| locate(in_bytes(e, &text), decoded, text.as_bytes()))?;
        writer.write_all(&out).context("Failed to write output")?;
        decoded += text.len();
        totals.read += n;
        totals.written += out.len();
        if last {
            break;
        }
    }
    totals.illegal = encoder.illegal_count();
    Ok(totals)
}

#[cfg(feature = "cli")]
fn copy_text(
    options: &ConvertOptions,
    reader: &mut dyn Read,
    writer: &mut dyn Write,
) -> Result<Totals> {
    let mut chunk = vec![0u8; options.buffer_size];
    let mut pending = Vec::with_capacity(options.buffer_size + 3);
    let mut totals = Totals::default();

    loop {
        let n = read_chunk(reader, &mut chunk)?;
        let last = n == 0;
        pending.extend_from_slice(&chunk[..n]);
        let text = take_utf8(&mut pending, totals.written, last)?;
        writer
            .write_all(text.as_bytes())
            .context("Failed to write output")?;
        totals.read += n;
        totals.written += text.len();
        if last {
            break;
        }
    }
    Ok(totals)
}

/// Rewrite a character position in `text` as a byte position.
#[cfg(feature = "cli")]
fn in_bytes(err: ConvertError, text: &str) -> ConvertError {
    match err {
        ConvertError::Unmappable {
            unit,
            position,
            written,
            direction,
        } => ConvertError::Unmappable {
            unit,
            position: text
                .char_indices()
                .nth(position)
                .map_or(text.len(), |(index, _)| index),
            written,
            direction,
        },
        other => other,
    }
}

/// Turn a chunk-relative failure into one that names the stream offset.
///
/// `source` is the input of the failing call. An encoder that trips over
/// [`BAD_INPUT`] is reported as the source byte that produced it.
#[cfg(feature = "cli")]
fn locate(err: ConvertError, offset: usize, source: &[u8]) -> anyhow::Error {
    match err {
        ConvertError::Unmappable {
            unit: BAD_INPUT,
            position,
            ..
        } if position < source.len() => anyhow::anyhow!(
            "Cannot decode byte 0x{:02X} at offset {}",
            source[position],
            offset + position
        ),
        ConvertError::Unmappable {
            unit,
            position,
            direction: Direction::Decode,
            ..
        } => anyhow::anyhow!(
            "Cannot decode byte 0x{:02X} at offset {}",
            unit,
            offset + position
        ),
        ConvertError::Unmappable { unit, position, .. } => anyhow::anyhow!(
            "Cannot encode U+{:04X} at offset {}",
            unit,
            offset + position
        ),
        other => anyhow::Error::new(other),
    }
}

#[cfg(feature = "cli")]
fn mapping_kind(encoding: &Encoding) -> &'static str {
    match encoding.mapping() {
        Mapping::Identity { .. } => "identity",
        Mapping::Table(_) => "table",
        Mapping::Window { .. } => "window",
        Mapping::Override { .. } => "table with overrides",
    }
}

#[cfg(feature = "cli")]
fn threshold(encoding: &Encoding) -> Option<u8> {
    let mapping = encoding.mapping();
    match *mapping {
        Mapping::Window { start, .. } => Some(start),
        _ => mapping.code_table().map(|table| table.threshold()),
    }
}

#[cfg(feature = "cli")]
fn list_command(args: &ListArgs, cli: &Cli) -> Result<()> {
    let encodings = Encoding::all();

    match cli.format {
        OutputFormat::Json => {
            let encodings_info: Vec<_> = encodings
                .iter()
                .map(|encoding| {
                    serde_json::json!({
                        "name": encoding.name(),
                        "mime_name": encoding.mime_name(),
                        "aliases": encoding.aliases(),
                        "class": encoding.class(),
                        "assigned": encoding.mapping().assigned(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&encodings_info)?);
        }
        OutputFormat::Text => {
            println!("Supported Encodings ({} total):", encodings.len());
            println!();

            for encoding in encodings {
                println!(
                    "{:15} {:15} {}",
                    encoding.name(),
                    encoding.mime_name(),
                    encoding.aliases().join(", ")
                );

                if args.details {
                    println!("                Mapping: {}", mapping_kind(encoding));
                    println!(
                        "                Assigned bytes: {}/256",
                        encoding.mapping().assigned()
                    );
                    println!();
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn validate_command(args: &ValidateArgs, _cli: &Cli) -> Result<()> {
    let mut input_data = Vec::new();
    open_input(args.input.as_deref())?
        .read_to_end(&mut input_data)
        .context("Failed to read input")?;

    let failure = match args.encoding {
        EncodingArg::Utf8 => std::str::from_utf8(&input_data)
            .err()
            .map(|e| (e.valid_up_to(), input_data[e.valid_up_to()])),
        EncodingArg::Single(encoding) => {
            let mut decoder = Decoder::with_errors(encoding, ErrorMode::Strict);
            let mut sink = String::new();
            match decoder.decode_to_string(&input_data, &mut sink, true) {
                Ok(_) => None,
                Err(ConvertError::Unmappable { unit, position, .. }) => {
                    Some((position, unit as u8))
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    match failure {
        None => {
            println!("✓ File is valid {}", args.encoding.name());
            std::process::exit(0);
        }
        Some((position, byte)) => {
            println!("✗ File is not valid {}", args.encoding.name());
            if args.show_errors {
                println!(
                    "  Error at position {}: unassigned byte 0x{:02X}",
                    position, byte
                );
            }
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "cli")]
fn info_command(args: &InfoArgs, cli: &Cli) -> Result<()> {
    let EncodingArg::Single(encoding) = args.encoding else {
        anyhow::bail!("UTF-8 is not a single-byte encoding");
    };
    debug!(?encoding, "describing encoding");
    let assigned = encoding.mapping().assigned();

    match cli.format {
        OutputFormat::Json => {
            let info = serde_json::json!({
                "name": encoding.name(),
                "mime_name": encoding.mime_name(),
                "aliases": encoding.aliases(),
                "id": encoding.id(),
                "class": encoding.class(),
                "mapping": mapping_kind(encoding),
                "threshold": threshold(encoding),
                "assigned": assigned,
                "unassigned": 256 - assigned,
                "ascii_compatible": encoding.is_ascii_compatible(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Text => {
            println!("Encoding Information: {}", encoding.name());
            println!("MIME name: {}", encoding.mime_name());
            println!("Aliases: {}", encoding.aliases().join(", "));
            println!("Mapping: {}", mapping_kind(encoding));
            if let Some(threshold) = threshold(encoding) {
                println!("First non-identity byte: 0x{:02X}", threshold);
            }
            println!("Assigned bytes: {}", assigned);
            println!("Unassigned bytes: {}", 256 - assigned);

            if args.samples {
                println!("\nCharacter Samples:");
                print_character_samples(encoding);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_character_samples(encoding: &Encoding) {
    let first = threshold(encoding).unwrap_or(0x41);
    let samples = (first..=0xFF)
        .filter_map(|byte| {
            char::from_u32(encoding.decode_unit(byte))
                .filter(|c| !c.is_control())
                .map(|c| (byte, c))
        })
        .take(8);

    for (byte, c) in samples {
        println!("  0x{:02X} -> U+{:04X} {}", byte, c as u32, c);
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use fast_sbcs::{ASCII, ISO_8859_1, ISO_8859_7, KOI8_R, WINDOWS_1252};

    fn options(errors: ErrorMode, buffer_size: usize) -> ConvertOptions {
        ConvertOptions {
            errors,
            buffer_size,
        }
    }

    #[test]
    fn test_strict_transcode_names_source_byte() {
        let mut input: &[u8] = b"abcdef\x81g";
        let mut output = Vec::new();
        let err = transcode_stream(
            &WINDOWS_1252,
            &ISO_8859_1,
            &options(ErrorMode::Strict, 4),
            &mut input,
            &mut output,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Cannot decode byte 0x81 at offset 6");
        assert_eq!(output, b"abcd".to_vec());
    }

    #[test]
    fn test_strict_encode_names_code_point() {
        let err = locate(
            ConvertError::Unmappable {
                unit: 0x20AC,
                position: 2,
                written: 2,
                direction: Direction::Encode,
            },
            100,
            b"ab",
        );
        assert_eq!(err.to_string(), "Cannot encode U+20AC at offset 102");
    }

    #[test]
    fn test_encode_text_carries_split_sequences() {
        let mut input: &[u8] = "мир €".as_bytes();
        let mut output = Vec::new();
        let totals = encode_text(
            &KOI8_R,
            &options(ErrorMode::default(), 1),
            &mut input,
            &mut output,
        )
        .unwrap();
        assert_eq!(output, vec![0xCD, 0xC9, 0xD2, 0x20, b'?']);
        assert_eq!(totals.read, "мир €".len());
        assert_eq!(totals.illegal, 1);
    }

    #[test]
    fn test_encode_text_reports_byte_offset() {
        let mut input: &[u8] = "αβ中".as_bytes();
        let err = encode_text(
            &ISO_8859_7,
            &options(ErrorMode::Strict, 2),
            &mut input,
            &mut Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Cannot encode U+4E2D at offset 4");
    }

    #[test]
    fn test_invalid_and_truncated_utf8() {
        let mut input: &[u8] = b"ab\xFFcd";
        let err = copy_text(&options(ErrorMode::Strict, 3), &mut input, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Input is not valid UTF-8 at offset 2");

        let mut input: &[u8] = b"ab\xD0";
        let err = encode_text(
            &ASCII,
            &options(ErrorMode::Skip, 64),
            &mut input,
            &mut Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Input is not valid UTF-8 at offset 2");
    }

    #[test]
    fn test_copy_text_in_small_chunks() {
        let mut input: &[u8] = "ÆØÅ ok".as_bytes();
        let mut output = Vec::new();
        copy_text(&options(ErrorMode::Strict, 1), &mut input, &mut output).unwrap();
        assert_eq!(output, "ÆØÅ ok".as_bytes());
    }

    #[test]
    fn test_oversized_buffer_is_rejected() {
        let cli = Cli::try_parse_from([
            "fast-sbcs",
            "convert",
            "-f",
            "latin1",
            "-t",
            "utf-8",
            "--buffer-size",
            usize::MAX.to_string().as_str(),
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        let err = load_options(&args).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_threshold_of_each_mapping_kind() {
        assert_eq!(threshold(&ASCII), None);
        assert_eq!(threshold(&WINDOWS_1252), Some(0x80));
        assert_eq!(threshold(&ISO_8859_7), Some(0xA0));
        assert_eq!(threshold(&KOI8_R), Some(0x80));
    }
}
