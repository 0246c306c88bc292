//! apoc-obj - Apocalypse object archive converter
//!
//! Converts flats and polygon meshes from Apocalypse game archives to
//! Wavefront OBJ, or lists the objects an archive contains.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use apoc_export::{
    ConvertOptions, ExportConfig, OutputOptions, PolygonSplit, RunOptions, Selection,
    process_batch, process_file,
};
use apoc_format::{MAX_MESHES, ObjectKind};

#[derive(Parser)]
#[command(name = "apoc-obj")]
#[command(about = "Apocalypse object archive to Wavefront OBJ converter")]
#[command(version)]
struct Cli {
    /// Input archive and output OBJ file (default: standard input and output),
    /// or the archives to convert with --batch
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Convert each input file to a file of the same name with .obj appended
    #[arg(long)]
    batch: bool,

    /// Convert flats instead of meshes
    #[arg(long)]
    flats: bool,

    /// List objects instead of converting them
    #[arg(long)]
    list: bool,

    /// Only process object N
    #[arg(long, value_name = "N", value_parser = object_number, conflicts_with_all = ["first", "last"])]
    index: Option<usize>,

    /// First object to process
    #[arg(long, value_name = "N", value_parser = object_number)]
    first: Option<usize>,

    /// Last object to process
    #[arg(long, value_name = "N", value_parser = object_number)]
    last: Option<usize>,

    /// Only process the object with this name
    #[arg(long)]
    name: Option<String>,

    /// File offset of the object address table (decimal or 0x hex)
    #[arg(long, value_name = "N", value_parser = file_offset)]
    offset: Option<u64>,

    /// Output OBJ file
    #[arg(short = 'o', long, value_name = "PATH")]
    outfile: Option<PathBuf>,

    /// Report the time taken for each file
    #[arg(long)]
    time: bool,

    /// Log details of the decoding and keep partial output on failure
    #[arg(short, long, visible_alias = "debug")]
    verbose: bool,

    /// Material library to name in the OBJ header [default: sf3k.mtl]
    #[arg(long, value_name = "NAME")]
    mtllib: Option<String>,

    /// Name materials after their colour rather than their palette number
    #[arg(long)]
    human: bool,

    /// Give every primitive a different colour
    #[arg(long = "false-colour")]
    false_colour: bool,

    /// Keep vertices that no primitive uses
    #[arg(long)]
    unused: bool,

    /// Keep vertices with the same coordinates as an earlier vertex
    #[arg(long)]
    duplicate: bool,

    /// Refer to vertices by negative (relative) index
    #[arg(long)]
    negative: bool,

    /// Cut overlapping coplanar polygons apart
    #[arg(long)]
    clip: bool,

    /// Turn flats to face upwards
    #[arg(long)]
    flip: bool,

    /// Split polygons into triangle fans
    #[arg(long, conflicts_with = "strips")]
    fans: bool,

    /// Split polygons into triangle strips
    #[arg(long)]
    strips: bool,

    /// Configuration file [default: apoc.toml if present]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn object_number(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{}", e))?;
    if n >= MAX_MESHES {
        return Err(format!("must be between 0 and {}", MAX_MESHES - 1));
    }
    Ok(n)
}

fn file_offset(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    let offset = parsed.map_err(|e| format!("{}", e))?;
    if offset > i64::MAX as u64 {
        return Err(format!("must be between 0 and {}", i64::MAX));
    }
    Ok(offset)
}

impl Cli {
    /// Check switch combinations, returning the input and output files
    fn files(&self) -> Result<(Option<&Path>, Option<&Path>)> {
        if let (Some(first), Some(last)) = (self.first, self.last) {
            if first > last {
                bail!(
                    "First object number ({}) is greater than last object number ({})",
                    first,
                    last
                );
            }
        }

        if self.batch {
            if self.outfile.is_some() {
                bail!("Cannot specify an output file in batch mode");
            }
            if self.files.is_empty() {
                bail!("No input files for batch mode");
            }
            return Ok((None, None));
        }

        let (input, positional_output) = match self.files.as_slice() {
            [] => (None, None),
            [input] => (Some(input.as_path()), None),
            [input, output] => (Some(input.as_path()), Some(output.as_path())),
            _ => bail!("Too many arguments (use --batch to convert several files)"),
        };

        let output = match (positional_output, self.outfile.as_deref()) {
            (Some(_), Some(_)) => bail!("More than one output file specified"),
            (positional, outfile) => positional.or(outfile),
        };

        if self.list {
            if output.is_some() {
                bail!("Cannot specify an output file in list mode");
            }
        } else if output.is_none() && (self.verbose || self.time) {
            bail!("Cannot use --verbose or --time when writing OBJ to standard output");
        }

        Ok((input, output))
    }

    fn convert_options(&self, config: &ExportConfig) -> ConvertOptions {
        let kind = if self.flats {
            ObjectKind::Flat
        } else {
            ObjectKind::Mesh
        };

        let mut output = OutputOptions::from(&config.output);
        if let Some(mtllib) = &self.mtllib {
            output.mtllib = mtllib.clone();
        }
        output.human_readable |= self.human;
        output.false_colour |= self.false_colour;
        output.keep_unused |= self.unused;
        output.keep_duplicates |= self.duplicate;
        output.negative_indices |= self.negative;
        output.clip |= self.clip;
        output.flip_backfacing |= self.flip;
        if self.fans {
            output.split = PolygonSplit::Fans;
        } else if self.strips {
            output.split = PolygonSplit::Strips;
        }

        let (first, last) = match self.index {
            Some(index) => (Some(index), Some(index)),
            None => (self.first, self.last),
        };

        ConvertOptions {
            kind,
            selection: Selection {
                first,
                last,
                name: self.name.clone(),
            },
            index_offset: self.offset,
            output,
        }
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            list: self.list,
            keep_partial: self.verbose,
            time: self.time,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so OBJ text can be written to stdout
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let (input, output) = cli.files()?;
    let config = ExportConfig::discover(cli.config.as_deref())?;
    let options = cli.convert_options(&config);

    if cli.batch {
        process_batch(&cli.files, cli.run_options(), &options)?;
    } else {
        let summary = process_file(input, output, cli.run_options(), &options)?;
        tracing::debug!(
            "{} objects, {} vertices",
            summary.objects.len(),
            summary.vertex_total
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("apoc-obj").chain(args.iter().copied())).unwrap()
    }

    fn usage_error(args: &[&str]) -> String {
        parse(args).files().unwrap_err().to_string()
    }

    #[test]
    fn test_positional_files() {
        let cli = parse(&["Apocalypse", "out.obj"]);
        let (input, output) = cli.files().unwrap();
        assert_eq!(input, Some(Path::new("Apocalypse")));
        assert_eq!(output, Some(Path::new("out.obj")));

        let cli = parse(&["Apocalypse", "-o", "out.obj"]);
        assert_eq!(cli.files().unwrap().1, Some(Path::new("out.obj")));

        let cli = parse(&[]);
        assert_eq!(cli.files().unwrap(), (None, None));
    }

    #[test]
    fn test_usage_errors() {
        assert!(usage_error(&["--first", "9", "--last", "3"]).contains("greater than"));
        assert!(usage_error(&["--batch", "-o", "x.obj", "a"]).contains("batch mode"));
        assert!(usage_error(&["--batch"]).contains("No input files"));
        assert!(usage_error(&["a", "b", "-o", "c"]).contains("More than one output"));
        assert!(usage_error(&["--list", "a", "b"]).contains("list mode"));
        assert!(usage_error(&["--verbose", "a"]).contains("standard output"));
        assert!(usage_error(&["--time", "a"]).contains("standard output"));
        assert!(usage_error(&["a", "b", "c"]).contains("Too many arguments"));
    }

    #[test]
    fn test_clap_conflicts() {
        let parse_err = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("apoc-obj").chain(args.iter().copied())).is_err()
        };
        assert!(parse_err(&["--fans", "--strips"]));
        assert!(parse_err(&["--index", "3", "--first", "1"]));
        assert!(parse_err(&["--last", "200"]));
        assert!(!parse_err(&["--last", "199"]));
        assert!(parse_err(&["--offset", "18446744073709551614"]));
    }

    #[test]
    fn test_verbose_allowed_with_output_or_list() {
        assert!(parse(&["--verbose", "a", "b"]).files().is_ok());
        assert!(parse(&["--verbose", "--list", "a"]).files().is_ok());
        assert!(parse(&["--time", "--batch", "a"]).files().is_ok());
    }

    #[test]
    fn test_file_offset_parse() {
        assert_eq!(file_offset("4096"), Ok(4096));
        assert_eq!(file_offset("0x10c6c"), Ok(0x10c6c));
        assert!(file_offset("zz").is_err());
        assert_eq!(file_offset("0x7fffffffffffffff"), Ok(i64::MAX as u64));
        assert!(file_offset("0x8000000000000000").is_err());
        assert!(file_offset("18446744073709551614").is_err());
    }

    #[test]
    fn test_switches_override_config() {
        let config = ExportConfig::parse(
            r#"
[output]
mtllib = "apoc.mtl"
clip = true
split = "fans"
"#,
        )
        .unwrap();

        let options = parse(&["--strips", "--negative", "--flats"]).convert_options(&config);
        assert_eq!(options.kind, ObjectKind::Flat);
        assert_eq!(options.output.mtllib, "apoc.mtl");
        assert!(options.output.clip);
        assert!(options.output.negative_indices);
        assert_eq!(options.output.split, PolygonSplit::Strips);

        let options = parse(&["--mtllib", "other.mtl"]).convert_options(&config);
        assert_eq!(options.output.mtllib, "other.mtl");
        assert_eq!(options.output.split, PolygonSplit::Fans);
    }

    #[test]
    fn test_offset_overrides_table_position() {
        let options = parse(&["--offset", "0x2000"]).convert_options(&ExportConfig::default());
        assert_eq!(options.index_offset, Some(0x2000));
        assert_eq!(
            parse(&[]).convert_options(&ExportConfig::default()).index_offset,
            None
        );
    }

    #[test]
    fn test_index_selects_single_object() {
        let options = parse(&["--index", "22"]).convert_options(&ExportConfig::default());
        assert_eq!(options.selection.first, Some(22));
        assert_eq!(options.selection.last, Some(22));
    }
}
