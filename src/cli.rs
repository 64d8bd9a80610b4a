// Command-line front end for Oxidfu.
//
// Subcommands build chunk streams from a small text script, inspect
// existing streams, and print a reference demo stream.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::buffer::{ChunkBuffer, InlineBuffer, View};
use crate::chunk::{self, Chunk, MAX_COUNT, MAX_OFFSET, MAX_REPS, MIN_OFFSET};
use crate::dump::{self, Style};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default capacity of the output buffer for `encode`.
const DEFAULT_CAPACITY: usize = 1 << 20; // 1 MiB
/// Upper bound for `encode --capacity`.
const MAX_CAPACITY: usize = 1 << 30; // 1 GiB
const DEMO_CAPACITY: usize = 99;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Chunked delta wire format tool.
#[derive(Parser, Debug)]
#[command(
    name = "oxidfu",
    version,
    about = "Encode and inspect chunked delta streams",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output results as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode a chunk script into a binary stream.
    Encode(EncodeArgs),
    /// Print a hex dump and chunk listing of a stream.
    Dump(DumpArgs),
    /// List the chunks of a stream with their byte positions.
    Chunks(PrintArgs),
    /// Encode the reference demo stream.
    Demo(DemoArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Chunk script: one `raw`, `rep`, `arr` or `off` line per chunk.
    #[arg(value_hint = ValueHint::FilePath)]
    script: PathBuf,

    /// Output stream file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Output buffer capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Encoded stream file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Color chunk annotations with ANSI escapes.
    #[arg(long)]
    color: bool,
}

#[derive(Args, Debug)]
struct PrintArgs {
    /// Encoded stream file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Write the stream bytes here instead of dumping them.
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Color chunk annotations with ANSI escapes.
    #[arg(long)]
    color: bool,
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Dump,
    Chunks,
    Demo,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    color: bool,
    capacity: usize,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

fn resolve_options(cli: Cli) -> Options {
    let mut opts = Options {
        command: Command::Config,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(3),
        json_output: cli.json_output,
        color: false,
        capacity: DEFAULT_CAPACITY,
        input_file: None,
        output_file: None,
    };
    match cli.command {
        Cmd::Encode(args) => {
            opts.command = Command::Encode;
            opts.input_file = Some(args.script);
            opts.output_file = Some(args.output);
            opts.capacity = args.capacity;
        }
        Cmd::Dump(args) => {
            opts.command = Command::Dump;
            opts.input_file = Some(args.input);
            opts.color = args.color;
        }
        Cmd::Chunks(args) => {
            opts.command = Command::Chunks;
            opts.input_file = Some(args.input);
        }
        Cmd::Demo(args) => {
            opts.command = Command::Demo;
            opts.output_file = args.output;
            opts.color = args.color;
        }
        Cmd::Config => {}
    }
    opts
}

fn log_filter(opts: &Options) -> &'static str {
    if opts.quiet {
        return "error";
    }
    match opts.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[doc(hidden)]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("oxidfu".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let opts = resolve_options(cli);
        let _ = log_filter(&opts);
    }
}

/// Parse a chunk script and encode it into a small inline buffer.
pub fn fuzz_try_parse_script(text: &str) {
    let Ok(ops) = parse_script(text) else {
        return;
    };
    let mut buf = InlineBuffer::<256>::new();
    for op in &ops {
        let size = buf.size();
        if apply(&mut buf, op).is_err() {
            assert_eq!(buf.size(), size, "failed encode moved the size");
        }
    }
    assert!(buf.chunks().count() <= ops.len());
}

// ---------------------------------------------------------------------------
// Chunk script
// ---------------------------------------------------------------------------

/// One line of a chunk script.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Raw(Vec<u8>),
    Rep { byte: u8, count: usize },
    Arr { pattern: Vec<u8>, reps: usize },
    Off { offset: i32, len: usize },
}

fn parse_hex_byte(token: &str) -> Result<u8, String> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid byte '{token}': {e}"))
}

fn parse_number<T: std::str::FromStr>(token: Option<&str>, what: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let token = token.ok_or_else(|| format!("missing {what}"))?;
    token
        .parse()
        .map_err(|e| format!("invalid {what} '{token}': {e}"))
}

fn parse_bytes<'t>(tokens: impl Iterator<Item = &'t str>) -> Result<Vec<u8>, String> {
    tokens.map(parse_hex_byte).collect()
}

/// Parse a chunk script.
///
/// ```text
/// # comment
/// raw 55 66 77        literal bytes (hex)
/// rep 42 100          byte (hex), count
/// arr 3 01 02 03      reps, pattern bytes (hex)
/// off -8191 1024      offset, referenced length
/// ```
fn parse_script(text: &str) -> Result<Vec<Op>, String> {
    let mut ops = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let op = parse_line(line).map_err(|e| format!("line {}: {e}", line_no + 1))?;
        ops.push(op);
    }
    Ok(ops)
}

fn parse_line(line: &str) -> Result<Op, String> {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("raw") => Ok(Op::Raw(parse_bytes(tokens)?)),
        Some("rep") => {
            let byte = parse_hex_byte(tokens.next().ok_or("missing byte")?)?;
            let count = parse_number(tokens.next(), "count")?;
            Ok(Op::Rep { byte, count })
        }
        Some("arr") => {
            let reps = parse_number(tokens.next(), "reps")?;
            Ok(Op::Arr {
                pattern: parse_bytes(tokens)?,
                reps,
            })
        }
        Some("off") => {
            let offset = parse_number(tokens.next(), "offset")?;
            let len = parse_number(tokens.next(), "length")?;
            Ok(Op::Off { offset, len })
        }
        Some(other) => Err(format!("unknown chunk '{other}'")),
        None => Err("empty line".into()),
    }
}

fn apply(buf: &mut dyn ChunkBuffer, op: &Op) -> chunk::Result<()> {
    match op {
        Op::Raw(bytes) => buf.encode_raw(bytes),
        Op::Rep { byte, count } => buf.encode_rep(*byte, *count),
        Op::Arr { pattern, reps } => buf.encode_arr(pattern, *reps),
        Op::Off { offset, len } => buf.encode_off(*offset, *len),
    }
}

/// Demo stream: one of each chunk kind, including an array with all 256 reps.
fn demo_stream() -> chunk::Result<InlineBuffer<DEMO_CAPACITY>> {
    let mut pattern = [0u8; 17];
    pattern[..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    let mut buf = InlineBuffer::new();
    buf.encode_raw(&[0x55, 0x66, 0x77])?;
    buf.encode_rep(0x42, 100)?;
    buf.encode_rep(0x66, 1)?;
    buf.encode_arr(&[0x01, 0x02, 0x03], 1)?;
    buf.encode_arr(&pattern, 256)?;
    buf.encode_off(-8191, 1024)?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_output(path: &Path, bytes: &[u8], force: bool) -> io::Result<()> {
    if !force && path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "file exists (use --force to overwrite)",
        ));
    }
    fs::write(path, bytes)
}

fn read_input(opts: &Options) -> Option<(PathBuf, Vec<u8>)> {
    let path = opts.input_file.clone()?;
    match fs::read(&path) {
        Ok(bytes) => Some((path, bytes)),
        Err(e) => {
            eprintln!("oxidfu: {}: {e}", path.display());
            None
        }
    }
}

fn style(opts: &Options) -> Style {
    if opts.color { Style::Ansi } else { Style::Plain }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn chunk_json(pos: usize, chunk: &Chunk<'_>) -> serde_json::Value {
    let kind = chunk.kind().label().to_ascii_lowercase();
    match *chunk {
        Chunk::Raw(bytes) => serde_json::json!({
            "pos": pos,
            "kind": kind,
            "size": bytes.len(),
            "bytes": hex_string(bytes),
        }),
        Chunk::RepeatedByte { byte, count } => serde_json::json!({
            "pos": pos,
            "kind": kind,
            "size": count,
            "byte": byte,
        }),
        Chunk::RepeatedArray { pattern, reps } => serde_json::json!({
            "pos": pos,
            "kind": kind,
            "size": pattern.len(),
            "reps": reps,
            "bytes": hex_string(pattern),
        }),
        Chunk::OldOffset { offset, len } => serde_json::json!({
            "pos": pos,
            "kind": kind,
            "size": len,
            "offset": offset,
        }),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Zeroed output buffer, or `None` past `MAX_CAPACITY` or on allocation failure.
fn alloc_storage(capacity: usize) -> Option<Vec<u8>> {
    if capacity > MAX_CAPACITY {
        return None;
    }
    let mut storage = Vec::new();
    storage.try_reserve_exact(capacity).ok()?;
    storage.resize(capacity, 0);
    Some(storage)
}

fn cmd_encode(opts: &Options) -> i32 {
    let Some((script_path, script)) = read_input(opts) else {
        return 1;
    };
    let Some(output) = opts.output_file.as_deref() else {
        eprintln!("oxidfu: encode requires an output file");
        return 1;
    };
    let text = String::from_utf8_lossy(&script);
    let ops = match parse_script(&text) {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("oxidfu: {}: {e}", script_path.display());
            return 1;
        }
    };

    let Some(mut storage) = alloc_storage(opts.capacity) else {
        eprintln!(
            "oxidfu: cannot allocate a {}-byte output buffer (max {MAX_CAPACITY})",
            opts.capacity
        );
        return 1;
    };
    let mut view = View::new(&mut storage);
    for (i, op) in ops.iter().enumerate() {
        if let Err(e) = apply(&mut view, op) {
            eprintln!("oxidfu: chunk {}: {e}", i + 1);
            return 1;
        }
    }
    log::info!("encoded {} chunks into {} bytes", ops.len(), view.size());

    if let Err(e) = write_output(output, view.as_bytes(), opts.force) {
        eprintln!("oxidfu: {}: {e}", output.display());
        return 1;
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "encode",
            "chunks": ops.len(),
            "output_size": view.size(),
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    }
    0
}

fn cmd_dump(opts: &Options) -> i32 {
    let Some((_, bytes)) = read_input(opts) else {
        return 1;
    };
    print!("{}", dump::render(&bytes, style(opts)));
    0
}

fn cmd_chunks(opts: &Options) -> i32 {
    let Some((path, bytes)) = read_input(opts) else {
        return 1;
    };

    // Drive the decoder directly so a truncated tail is reported.
    let mut pos = 0;
    let mut listed = Vec::new();
    let mut failure = None;
    while pos < bytes.len() {
        match chunk::decode(&bytes, pos) {
            Ok((c, next)) => {
                listed.push((pos, c));
                pos = next;
            }
            Err(e) => {
                failure = Some((pos, e));
                break;
            }
        }
    }

    if opts.json_output {
        let chunks: Vec<_> = listed.iter().map(|(p, c)| chunk_json(*p, c)).collect();
        let status = match &failure {
            None => serde_json::json!("ok"),
            Some((start, e)) => serde_json::json!({
                "error": e.to_string(),
                "chunk_pos": start,
                "at": e.position(),
            }),
        };
        let json = serde_json::json!({
            "command": "chunks",
            "input_size": bytes.len(),
            "chunks": chunks,
            "status": status,
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    } else {
        let mut out = String::new();
        for (p, c) in &listed {
            out.push_str(&format!("{p:>8}  "));
            let _ = dump::chunk(&mut out, c, Style::Plain);
        }
        print!("{out}");
    }

    match failure {
        None => 0,
        Some((start, e)) => {
            if !opts.quiet {
                eprintln!("oxidfu: {}: chunk at {start}: {e}", path.display());
            }
            2
        }
    }
}

fn cmd_demo(opts: &Options) -> i32 {
    let buf = match demo_stream() {
        Ok(buf) => buf,
        Err(e) => {
            eprintln!("oxidfu: demo: {e}");
            return 1;
        }
    };
    match &opts.output_file {
        Some(path) => {
            if let Err(e) = write_output(path, buf.as_bytes(), opts.force) {
                eprintln!("oxidfu: {}: {e}", path.display());
                return 1;
            }
            log::info!("wrote {} bytes to {}", buf.size(), path.display());
        }
        None => print!("{}", dump::render(buf.as_bytes(), style(opts))),
    }
    0
}

fn cmd_config(opts: &Options) -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    if opts.json_output {
        let json = serde_json::json!({
            "version": version,
            "max_count": MAX_COUNT,
            "max_reps": MAX_REPS,
            "min_offset": MIN_OFFSET,
            "max_offset": MAX_OFFSET,
            "fuzzing": cfg!(feature = "fuzzing"),
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return 0;
    }
    let ptr_size = std::mem::size_of::<*const ()>();
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "oxidfu version {version} (Rust)");
    let _ = writeln!(out, "FUZZING={}", cfg!(feature = "fuzzing") as u8);
    let _ = writeln!(out, "MAX_COUNT={MAX_COUNT}");
    let _ = writeln!(out, "MAX_REPS={MAX_REPS}");
    let _ = writeln!(out, "MIN_OFFSET={MIN_OFFSET}");
    let _ = writeln!(out, "MAX_OFFSET={MAX_OFFSET}");
    let _ = writeln!(out, "sizeof(usize)={ptr_size}");
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&opts)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Dump => cmd_dump(&opts),
        Command::Chunks => cmd_chunks(&opts),
        Command::Demo => cmd_demo(&opts),
        Command::Config => cmd_config(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
