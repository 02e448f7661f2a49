// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - grid: load, transform and show an array as an interactive grid
// - fib-tree: draw the naive Fibonacci call tree
// - config: show, reset, edit or update the configuration file

use crate::array::{ElementwiseOp, NdArray};
use crate::config::{Config, VERSION};
use crate::demo::{demo_array, DemoKind};
use crate::highlight::{caption_for, compute_stats, HighlightSet};
use crate::logging::LogBuffer;
use crate::tree::{draw_fib_tree, TreeFormat, MAX_TREE_N};
use crate::wrapped::WrappedArray;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// gridscope - clickable array grids and call trees in the terminal
#[derive(Parser)]
#[command(name = "gridscope")]
#[command(version = VERSION)]
#[command(about = "Clickable array grids and Fibonacci call trees", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show an array as a clickable grid with selection statistics
    Grid(GridArgs),

    /// Draw the call tree of naive recursive Fibonacci
    FibTree {
        /// Argument of the root call
        #[arg(value_parser = clap::value_parser!(u32).range(..=MAX_TREE_N as i64))]
        n: u32,

        /// Output format (defaults to [tree].default_format)
        #[arg(long, short)]
        format: Option<TreeFormat>,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
pub struct GridArgs {
    /// JSON file holding a number or nested lists of numbers
    #[arg(long, conflicts_with_all = ["values", "demo"])]
    pub file: Option<PathBuf>,

    /// Inline JSON array, e.g. '[[1, 2], [3, 4]]'
    #[arg(long, conflicts_with = "demo")]
    pub values: Option<String>,

    /// Built-in sample array
    #[arg(long, value_enum)]
    pub demo: Option<DemoKind>,

    /// Column labels (element labels for a vector)
    #[arg(long, value_delimiter = ',')]
    pub x_labels: Option<Vec<String>>,

    /// Row labels
    #[arg(long, value_delimiter = ',')]
    pub y_labels: Option<Vec<String>>,

    /// Elementwise operation applied before display, e.g. "mul 2" or "> 3".
    /// Repeatable; applied in order.
    #[arg(long = "apply", value_name = "OP VALUE")]
    pub apply: Vec<String>,

    /// Reduce along this axis before display
    #[arg(long, conflicts_with = "sum_all")]
    pub sum_axis: Option<usize>,

    /// Reduce everything to a single value
    #[arg(long)]
    pub sum_all: bool,

    /// Show the statistics line before anything is selected. With --plain,
    /// print statistics over every cell.
    #[arg(long)]
    pub stats: bool,

    /// Print a plain table instead of opening the grid
    #[arg(long)]
    pub plain: bool,

    /// Draw below the current output instead of clearing the screen
    #[arg(long)]
    pub no_clear: bool,
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Show effective configuration
    #[arg(long)]
    pub show: bool,

    /// Reset config file to defaults
    #[arg(long)]
    pub reset: bool,

    /// Open config file in $EDITOR
    #[arg(long)]
    pub edit: bool,

    /// Rewrite the config file from the current template, keeping its values
    #[arg(long)]
    pub update: bool,

    /// Show config file path
    #[arg(long)]
    pub path: bool,
}

impl GridArgs {
    /// Whether this run takes over the terminal
    pub fn is_interactive(&self) -> bool {
        !self.plain
    }
}

/// Draw the call tree to stdout or the requested file
pub fn handle_fib_tree(
    n: u32,
    format: Option<TreeFormat>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let opts = config.tree.draw_options(format, output);
    let written = draw_fib_tree(n, &opts, &mut std::io::stdout().lock())?;
    if let Some(path) = written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Grid
// ─────────────────────────────────────────────────────────────────────────────

pub async fn handle_grid(args: GridArgs, config: &Config, log_buffer: LogBuffer) -> Result<()> {
    let array = build_array(&args)?;

    if args.plain {
        println!("{}", array);
        if args.stats {
            println!("{}", whole_array_caption(&array)?);
        }
        return Ok(());
    }

    let mut config = config.clone();
    if args.stats {
        config.grid.show_stats = true;
    }
    let clear = config.grid.clear_on_display && !args.no_clear;
    array.display(&config, log_buffer, clear).await
}

/// Load the input, then apply operations, reductions and labels in that order
pub fn build_array(args: &GridArgs) -> Result<WrappedArray> {
    let mut array = if let Some(path) = &args.file {
        WrappedArray::new(NdArray::from_json_file(path)?)
    } else if let Some(values) = &args.values {
        WrappedArray::new(NdArray::from_json_str(values).context("Invalid --values")?)
    } else if let Some(kind) = args.demo {
        demo_array(kind)?
    } else {
        bail!("Nothing to show: pass --file, --values or --demo");
    };

    for expr in &args.apply {
        let (op, operand) = parse_apply(expr)?;
        array = array
            .apply(op, operand)
            .with_context(|| format!("Failed to apply '{}'", expr))?;
        tracing::debug!(op = %expr, shape = ?array.shape(), "Applied operation");
    }

    if args.sum_all {
        array = array.sum(None)?;
    } else if let Some(axis) = args.sum_axis {
        array = array.sum(Some(axis))?;
    }

    // Operations return unlabelled arrays, so labels describe the final shape
    if args.x_labels.is_some() || args.y_labels.is_some() {
        array = WrappedArray::with_labels(
            array.into_inner(),
            args.x_labels.clone(),
            args.y_labels.clone(),
        )
        .context("Invalid labels")?;
    }

    Ok(array)
}

/// Parse `"OP VALUE"` where VALUE is any JSON array or scalar
pub fn parse_apply(expr: &str) -> Result<(ElementwiseOp, NdArray)> {
    let Some((op, value)) = expr.trim().split_once(char::is_whitespace) else {
        bail!("Expected \"OP VALUE\", got '{}'", expr);
    };
    let op: ElementwiseOp = op.parse().map_err(anyhow::Error::msg)?;
    let value = NdArray::from_json_str(value.trim())
        .with_context(|| format!("Invalid operand in '{}'", expr))?;
    Ok((op, value))
}

/// Statistics caption with every cell selected
fn whole_array_caption(array: &WrappedArray) -> Result<String> {
    if !array.is_displayable() {
        bail!("Statistics need a 1-D or 2-D array");
    }
    let mut all = HighlightSet::for_shape(array.shape());
    let (rows, cols) = all.dims();
    for row in 0..rows {
        for col in 0..cols {
            all.toggle((row, col))?;
        }
    }
    let stats = compute_stats(&all, array.array())?;
    Ok(caption_for(stats.as_ref()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

/// Handle the config subcommand; with no flag, print usage
pub fn handle_config(args: &ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", config_file()?.display());
    } else if args.show {
        print!("{}", effective_config_report());
    } else if args.reset {
        reset_config()?;
    } else if args.edit {
        edit_config()?;
    } else if args.update {
        update_config()?;
    } else {
        println!("Usage: gridscope config [--show|--reset|--edit|--update|--path]");
        println!();
        println!("  --show    Print the effective configuration");
        println!("  --reset   Overwrite the config file with defaults");
        println!("  --edit    Open the config file in $EDITOR");
        println!("  --update  Rewrite the config file from the current template");
        println!("  --path    Print the config file path");
    }
    Ok(())
}

fn config_file() -> Result<PathBuf> {
    Config::config_path().context("Could not determine config path (no home directory)")
}

/// Effective settings after env overrides, in config file syntax
fn effective_config_report() -> String {
    let config = Config::from_env();
    let source = match Config::config_path() {
        Some(path) if path.exists() => path.display().to_string(),
        _ => "defaults (no config file)".to_string(),
    };
    format!(
        "# Effective configuration (env > file > defaults)\n# Source: {}\n\n{}",
        source,
        config.to_toml()
    )
}

fn reset_config() -> Result<()> {
    let path = config_file()?;
    if path.exists() {
        eprint!("Overwrite {} with defaults? [y/N] ", path.display());
        std::io::stderr().flush().context("Failed to flush prompt")?;
        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .context("Failed to read answer")?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    Config::default()
        .save()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn edit_config() -> Result<()> {
    let path = config_file()?;
    if !path.exists() {
        Config::ensure_config_exists();
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| if cfg!(windows) { "notepad" } else { "nano" }.to_string());

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}' (set $EDITOR)", editor))?;
    if !status.success() {
        bail!("Editor '{}' exited with {}", editor, status);
    }
    Ok(())
}

/// Rewrite the file through the template so new keys appear. Values come
/// from the file alone; environment overrides are not written back.
fn update_config() -> Result<()> {
    let path = config_file()?;
    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created {}", path.display());
        return Ok(());
    }

    let backup = path.with_extension("toml.bak");
    std::fs::copy(&path, &backup)
        .with_context(|| format!("Failed to back up {}", path.display()))?;

    Config::from_file()
        .save()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Updated {} (previous version in {})", path.display(), backup.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{BinaryOp, CompareOp, Scalar};
    use crate::wrapped::Element;

    fn values(json: &str) -> GridArgs {
        GridArgs {
            values: Some(json.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn parse_apply_accepts_symbols_and_names() {
        let (op, value) = parse_apply("mul 2").unwrap();
        assert_eq!(op, ElementwiseOp::Binary(BinaryOp::Mul));
        assert_eq!(value.shape(), &[] as &[usize]);

        let (op, value) = parse_apply(">=  [1, 2]").unwrap();
        assert_eq!(op, ElementwiseOp::Compare(CompareOp::Ge));
        assert_eq!(value.shape(), &[2]);

        assert!(parse_apply("mul").is_err());
        assert!(parse_apply("mod 2").is_err());
        assert!(parse_apply("add [1, [2]]").is_err());
    }

    #[test]
    fn operations_apply_in_order() {
        let mut args = values("[[1, 2], [3, 4]]");
        args.apply = vec!["add 1".to_string(), "mul 10".to_string()];
        let array = build_array(&args).unwrap();
        assert_eq!(array.get(&[1, 1]).unwrap(), Element::Scalar(Scalar::Int(50)));
    }

    #[test]
    fn sum_axis_reduces_after_operations() {
        let mut args = values("[[1, 2], [3, 4]]");
        args.sum_axis = Some(0);
        let array = build_array(&args).unwrap();
        assert_eq!(array.shape(), &[2]);
        assert_eq!(array.get(&[1]).unwrap(), Element::Scalar(Scalar::Int(6)));

        let mut args = values("[1, 2, 3]");
        args.sum_all = true;
        assert_eq!(build_array(&args).unwrap().ndim(), 0);
    }

    #[test]
    fn labels_must_match_axes() {
        let mut args = values("[[1, 2, 3]]");
        args.x_labels = Some(vec!["a".into(), "b".into(), "c".into()]);
        args.y_labels = Some(vec!["row".into()]);
        let array = build_array(&args).unwrap();
        assert_eq!(array.x_labels(), &["a", "b", "c"]);

        args.y_labels = Some(vec!["r0".into(), "r1".into()]);
        assert!(build_array(&args).is_err());
    }

    #[test]
    fn labels_survive_operations() {
        let mut args = values("[1, 2]");
        args.x_labels = Some(vec!["a".into(), "b".into()]);
        args.apply = vec!["mul 2".to_string()];
        let array = build_array(&args).unwrap();
        assert_eq!(array.x_labels(), &["a", "b"]);
        assert_eq!(array.get(&[1]).unwrap(), Element::Scalar(Scalar::Int(4)));
    }

    #[test]
    fn labels_describe_the_reduced_shape() {
        let mut args = values("[[1, 2, 3], [4, 5, 6]]");
        args.sum_axis = Some(0);
        args.x_labels = Some(vec!["a".into(), "b".into(), "c".into()]);
        let array = build_array(&args).unwrap();
        assert_eq!(array.shape(), &[3]);
        assert_eq!(array.x_labels(), &["a", "b", "c"]);

        args.x_labels = Some(vec!["a".into(), "b".into()]);
        let err = build_array(&args).unwrap_err();
        assert!(err.to_string().contains("Invalid labels"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = build_array(&GridArgs::default()).unwrap_err();
        assert!(err.to_string().contains("Nothing to show"));
    }

    #[test]
    fn whole_array_statistics() {
        let array = build_array(&values("[1, 2, 3, 4]")).unwrap();
        assert_eq!(
            whole_array_caption(&array).unwrap(),
            "Min: 1, Max: 4, Median: 2.5, Mean: 2.50, Std: 1.12, Sum: 10.00"
        );
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["gridscope", "fib-tree", "4", "--format", "text"]).unwrap();
        match cli.command {
            Commands::FibTree { n, format, output } => {
                assert_eq!(n, 4);
                assert_eq!(format, Some(TreeFormat::Text));
                assert!(output.is_none());
            }
            _ => panic!("expected fib-tree"),
        }

        let cli = Cli::try_parse_from([
            "gridscope",
            "grid",
            "--demo",
            "table",
            "--apply",
            "> 10",
            "--x-labels",
            "a,b",
            "--plain",
        ])
        .unwrap();
        match cli.command {
            Commands::Grid(args) => {
                assert_eq!(args.demo, Some(DemoKind::Table));
                assert_eq!(args.apply, vec!["> 10".to_string()]);
                assert_eq!(args.x_labels, Some(vec!["a".to_string(), "b".to_string()]));
                assert!(!args.is_interactive());
            }
            _ => panic!("expected grid"),
        }

        assert!(Cli::try_parse_from(["gridscope", "grid", "--file", "a.json", "--demo", "cube"]).is_err());

        let cli = Cli::try_parse_from(["gridscope", "config", "--path"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigArgs { path: true, .. })));
    }

    #[test]
    fn fib_tree_argument_is_bounded() {
        let limit = MAX_TREE_N.to_string();
        assert!(Cli::try_parse_from(["gridscope", "fib-tree", limit.as_str()]).is_ok());

        let over = (MAX_TREE_N + 1).to_string();
        let err = Cli::try_parse_from(["gridscope", "fib-tree", over.as_str()]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(Cli::try_parse_from(["gridscope", "fib-tree", "60"]).is_err());
    }
}
