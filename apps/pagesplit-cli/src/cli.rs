use clap::{Args, Parser, Subcommand, ValueEnum};
use pagesplit_core::{RangeSpec, SplitMode, SplitOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pagesplit")]
#[command(version, about = "Split, reorder and merge PDF pages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a PDF into one or more documents
    Split(SplitArgs),

    /// Write the pages of a PDF in a new order
    Reorder(ReorderArgs),

    /// Combine multiple PDFs into one
    Merge {
        /// PDF files to merge, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Rewrite a PDF with a fresh page tree and compressed streams
    Rebuild {
        /// PDF file to rebuild
        path: PathBuf,

        /// Output file (default: `<name>-rebuilt.pdf` next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display document and page information
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Write a placeholder preview image for every page
    Preview {
        /// PDF file to preview
        path: PathBuf,

        /// Directory for the PNG files
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Run a JSON command file and print the JSON result
    Run {
        /// Command file (e.g. {"type":"Split", ...})
        command_file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// PDF file to split
    pub path: PathBuf,

    /// Read split options from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["mode", "ranges", "every", "pages", "merge"])]
    pub options: Option<PathBuf>,

    /// Split mode
    #[arg(short, long, value_enum, default_value = "extract-all")]
    pub mode: ModeArg,

    /// Page range for custom-range mode, e.g. "4-6" (repeatable)
    #[arg(short = 'r', long = "range", value_parser = parse_range_spec)]
    pub ranges: Vec<RangeSpec>,

    /// Pages per document for fixed-range mode
    #[arg(short, long, default_value = "1")]
    pub every: i64,

    /// Page selection for extract-select mode, e.g. "1, 5-8"
    #[arg(short, long, default_value = "")]
    pub pages: String,

    /// Collapse all groups into a single document
    #[arg(long)]
    pub merge: bool,

    /// Output file when the split produces a single document
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output directory when the split produces several documents
    #[arg(short = 'd', long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl SplitArgs {
    /// Split options described by the flags
    pub fn flag_options(&self) -> SplitOptions {
        SplitOptions {
            mode: self.mode.into(),
            ranges: self.ranges.clone(),
            fixed_count: self.every,
            extract_pages: self.pages.clone(),
            merge: self.merge,
        }
    }
}

#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// PDF file to reorder
    pub path: PathBuf,

    /// Final page order, e.g. "3, 1-2" (pages may be left out or repeated)
    #[arg(long, conflicts_with_all = ["moves", "removes"])]
    pub order: Option<String>,

    /// Move a page to a position, both 1-based: "PAGE:POSITION" (repeatable)
    #[arg(long = "move", value_parser = parse_move)]
    pub moves: Vec<(usize, usize)>,

    /// Drop a page by its original number (repeatable)
    #[arg(long = "remove")]
    pub removes: Vec<usize>,

    /// Output file (default: `<name>-reordered.pdf` next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    CustomRange,
    FixedRange,
    ExtractAll,
    ExtractSelect,
}

impl From<ModeArg> for SplitMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::CustomRange => SplitMode::CustomRange,
            ModeArg::FixedRange => SplitMode::FixedRange,
            ModeArg::ExtractAll => SplitMode::ExtractAll,
            ModeArg::ExtractSelect => SplitMode::ExtractSelect,
        }
    }
}

/// "4-6" or "4"
fn parse_range_spec(s: &str) -> Result<RangeSpec, String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<i64>()
            .map_err(|_| format!("Invalid page number: {}", part.trim()))
    };

    match s.split_once('-') {
        Some((from, to)) => Ok(RangeSpec::new(parse(from)?, parse(to)?)),
        None => {
            let page = parse(s)?;
            Ok(RangeSpec::new(page, page))
        }
    }
}

/// "PAGE:POSITION"
fn parse_move(s: &str) -> Result<(usize, usize), String> {
    let (page, position) = s
        .split_once(':')
        .ok_or_else(|| format!("Expected PAGE:POSITION, got {}", s))?;
    let page = page
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid page: {}", page.trim()))?;
    let position = position
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid position: {}", position.trim()))?;
    if page == 0 || position == 0 {
        return Err("Pages and positions start at 1".to_string());
    }
    Ok((page, position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_flags_build_options() {
        let cli = Cli::try_parse_from([
            "pagesplit", "split", "in.pdf", "-m", "custom-range", "-r", "1-2", "-r", "6-4",
            "--merge",
        ])
        .unwrap();

        let Commands::Split(args) = cli.command else {
            panic!("expected split");
        };
        assert_eq!(
            args.flag_options(),
            SplitOptions::custom_ranges(vec![RangeSpec::new(1, 2), RangeSpec::new(6, 4)], true)
        );
    }

    #[test]
    fn test_split_defaults_to_extract_all() {
        let cli = Cli::try_parse_from(["pagesplit", "split", "in.pdf"]).unwrap();
        let Commands::Split(args) = cli.command else {
            panic!("expected split");
        };
        assert_eq!(args.flag_options(), SplitOptions::extract_all());
    }

    #[test]
    fn test_options_file_conflicts_with_flags() {
        let result = Cli::try_parse_from([
            "pagesplit", "split", "in.pdf", "--options", "o.json", "--merge",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_reorder_moves_and_removes() {
        let cli = Cli::try_parse_from([
            "pagesplit", "reorder", "in.pdf", "--move", "5:1", "--remove", "2", "--remove", "3",
        ])
        .unwrap();
        let Commands::Reorder(args) = cli.command else {
            panic!("expected reorder");
        };
        assert_eq!(args.moves, vec![(5, 1)]);
        assert_eq!(args.removes, vec![2, 3]);
    }

    #[test]
    fn test_parse_range_spec() {
        assert_eq!(parse_range_spec("4-6"), Ok(RangeSpec::new(4, 6)));
        assert_eq!(parse_range_spec(" 7 "), Ok(RangeSpec::new(7, 7)));
        assert!(parse_range_spec("a-3").is_err());
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("3:1"), Ok((3, 1)));
        assert!(parse_move("3").is_err());
        assert!(parse_move("0:1").is_err());
    }
}
