//! fbisect - search sorted files from the command line
//!
//! Thin front end over the filebisect library: prints boundary offsets,
//! equal-key spans, or the raw records of a key range.

use anyhow::{Context, Result};
use bstr::BString;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use filebisect::config::Config;
use filebisect::{
    bisect_seek_fixed_left, bisect_seek_fixed_right, bisect_seek_left, bisect_seek_right,
    extents, extents_fixed, iter_exclusive, iter_fixed_exclusive, iter_fixed_inclusive,
    iter_inclusive, ByteSource, Field, FixedLayout, Identity, IntegerField, RecordKey,
    SearchOptions, SourceFactory,
};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging; RUST_LOG controls verbosity
    env_logger::init();

    let matches = cli().get_matches();
    let defaults = load_defaults()?;

    let (name, sub) = matches
        .subcommand()
        .context("a subcommand is required")?;
    let query = Query::from_matches(name, sub)?;
    let settings = Settings::from_matches(sub, &defaults)?;

    let source = SourceFactory::open(&settings.path)
        .with_context(|| format!("Failed to open {}", settings.path.display()))?;

    match settings.key {
        KeyChoice::Integer(key) => run(&source, &key, &settings, &query, parse_integer),
        KeyChoice::Field(key) => run(&source, &key, &settings, &query, parse_bytes),
        KeyChoice::Identity => run(&source, &Identity, &settings, &query, parse_bytes),
    }
}

fn cli() -> Command {
    Command::new("fbisect")
        .version(filebisect::VERSION)
        .about("Binary search over sorted, append-only files")
        .long_about(
            "fbisect finds offsets and key ranges in sorted files (time-ordered logs, \
             fixed-size record files) in O(log n) reads, without building an index.",
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("seek")
                .about("Print the offset of the first record >= KEY (or > KEY with --right)")
                .arg(file_arg())
                .arg(Arg::new("key").help("Key to search for").required(true).index(2))
                .arg(
                    Arg::new("right")
                        .long("right")
                        .help("Upper bound: first record strictly greater than KEY")
                        .action(ArgAction::SetTrue),
                )
                .args(common_args()),
        )
        .subcommand(
            Command::new("extents")
                .about("Print the byte span `START END` of all records equal to KEY")
                .arg(file_arg())
                .arg(Arg::new("key").help("Key to search for").required(true).index(2))
                .args(common_args()),
        )
        .subcommand(
            Command::new("range")
                .about("Print every record with FROM <= key < TO (<= TO with --inclusive)")
                .arg(file_arg())
                .arg(Arg::new("from").help("Lower key bound").required(true).index(2))
                .arg(Arg::new("to").help("Upper key bound").required(true).index(3))
                .arg(
                    Arg::new("inclusive")
                        .long("inclusive")
                        .help("Include records equal to TO")
                        .action(ArgAction::SetTrue),
                )
                .args(common_args()),
        )
}

fn file_arg() -> Arg {
    Arg::new("file")
        .help("Path to the sorted file")
        .required(true)
        .index(1)
        .value_parser(value_parser!(PathBuf))
}

fn common_args() -> Vec<Arg> {
    vec![
        Arg::new("field")
            .short('f')
            .long("field")
            .help("Compare on this zero-based field instead of the whole record")
            .value_parser(value_parser!(usize)),
        Arg::new("separator")
            .short('s')
            .long("separator")
            .help("Field separator (default: space)")
            .value_parser(parse_byte),
        Arg::new("numeric")
            .short('n')
            .long("numeric")
            .help("Parse the key field as a signed integer")
            .action(ArgAction::SetTrue),
        Arg::new("delimiter")
            .short('d')
            .long("delimiter")
            .help("Line delimiter (default: \\n)")
            .value_parser(parse_byte),
        Arg::new("fixed")
            .long("fixed")
            .value_name("RECSIZE")
            .help("Treat the file as fixed-size records of RECSIZE bytes")
            .value_parser(value_parser!(u64)),
        Arg::new("base")
            .long("base")
            .help("Header length before the first fixed record")
            .value_parser(value_parser!(u64)),
        Arg::new("lo")
            .long("lo")
            .help("Lowest byte offset to search from")
            .value_parser(value_parser!(u64)),
        Arg::new("hi")
            .long("hi")
            .help("Pin the upper byte bound instead of using the current file size")
            .value_parser(value_parser!(u64)),
    ]
}

/// Parse a single-byte argument, accepting `\n`, `\t` and `\0` escapes
fn parse_byte(value: &str) -> std::result::Result<u8, String> {
    match value {
        "\\n" => Ok(b'\n'),
        "\\t" => Ok(b'\t'),
        "\\0" => Ok(0),
        _ if value.len() == 1 && value.is_ascii() => Ok(value.as_bytes()[0]),
        _ => Err(format!("expected a single ASCII character, got {value:?}")),
    }
}

fn parse_integer(value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("Key is not an integer: {value:?}"))
}

fn parse_bytes(value: &str) -> Result<BString> {
    Ok(BString::from(value))
}

#[cfg(feature = "config")]
fn load_defaults() -> Result<Config> {
    Config::load().context("Failed to load configuration")
}

#[cfg(not(feature = "config"))]
fn load_defaults() -> Result<Config> {
    Ok(Config::default())
}

#[derive(Debug)]
enum Query {
    Seek { key: String, right: bool },
    Extents { key: String },
    Range { from: String, to: String, inclusive: bool },
}

impl Query {
    fn from_matches(name: &str, sub: &ArgMatches) -> Result<Self> {
        let query = match name {
            "seek" => Query::Seek {
                key: required(sub, "key")?,
                right: sub.get_flag("right"),
            },
            "extents" => Query::Extents {
                key: required(sub, "key")?,
            },
            "range" => Query::Range {
                from: required(sub, "from")?,
                to: required(sub, "to")?,
                inclusive: sub.get_flag("inclusive"),
            },
            other => anyhow::bail!("Unknown command: {other}"),
        };
        Ok(query)
    }
}

fn required(sub: &ArgMatches, name: &str) -> Result<String> {
    sub.get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing argument: {name}"))
}

#[derive(Debug)]
enum KeyChoice {
    Identity,
    Field(Field),
    Integer(IntegerField),
}

#[derive(Debug)]
struct Settings {
    path: PathBuf,
    options: SearchOptions,
    layout: Option<FixedLayout>,
    key: KeyChoice,
}

impl Settings {
    fn from_matches(sub: &ArgMatches, defaults: &Config) -> Result<Self> {
        let path = sub
            .get_one::<PathBuf>("file")
            .cloned()
            .context("missing argument: file")?;

        let mut options = defaults.search_options()?;
        if let Some(&delimiter) = sub.get_one::<u8>("delimiter") {
            options = options.with_delimiter(delimiter);
        }
        if let Some(&lo) = sub.get_one::<u64>("lo") {
            options = options.with_lo(lo);
        }
        if let Some(&hi) = sub.get_one::<u64>("hi") {
            options = options.with_hi(hi);
        }

        let layout = sub.get_one::<u64>("fixed").map(|&recsize| {
            FixedLayout::new(recsize).with_base(sub.get_one::<u64>("base").copied().unwrap_or(0))
        });

        let separator = match sub.get_one::<u8>("separator") {
            Some(&separator) => separator,
            None => defaults.separator_byte()?,
        };
        let field = sub.get_one::<usize>("field").copied();
        let key = if sub.get_flag("numeric") {
            KeyChoice::Integer(IntegerField::new(field.unwrap_or(0), separator))
        } else if let Some(index) = field {
            KeyChoice::Field(Field::new(index, separator))
        } else {
            KeyChoice::Identity
        };

        Ok(Self {
            path,
            options,
            layout,
            key,
        })
    }
}

fn run<S, K, R>(
    source: &S,
    key: &R,
    settings: &Settings,
    query: &Query,
    parse: fn(&str) -> Result<K>,
) -> Result<()>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K>,
{
    let opts = &settings.options;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match query {
        Query::Seek { key: x, right } => {
            let x = parse(x)?;
            let offset = match (settings.layout, *right) {
                (Some(layout), false) => bisect_seek_fixed_left(source, &x, &layout, key, opts)?,
                (Some(layout), true) => bisect_seek_fixed_right(source, &x, &layout, key, opts)?,
                (None, false) => bisect_seek_left(source, &x, key, opts)?,
                (None, true) => bisect_seek_right(source, &x, key, opts)?,
            };
            writeln!(out, "{offset}")?;
        }
        Query::Extents { key: x } => {
            let x = parse(x)?;
            let span = match settings.layout {
                Some(layout) => extents_fixed(source, &x, &layout, key, opts)?,
                None => extents(source, &x, key, opts)?,
            };
            writeln!(out, "{} {}", span.start, span.end)?;
        }
        Query::Range {
            from,
            to,
            inclusive,
        } => {
            let x = parse(from)?;
            let y = parse(to)?;
            let records = match (settings.layout, *inclusive) {
                (Some(layout), false) => iter_fixed_exclusive(source, &x, &y, &layout, key, opts)?,
                (Some(layout), true) => iter_fixed_inclusive(source, &x, &y, &layout, key, opts)?,
                (None, false) => iter_exclusive(source, &x, &y, key, opts)?,
                (None, true) => iter_inclusive(source, &x, &y, key, opts)?,
            };
            for record in records {
                out.write_all(&record?)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
