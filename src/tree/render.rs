//! Drawing a call tree to a terminal or file
//!
//! Text formats are produced in-process. Images are rendered by piping the
//! DOT source into the Graphviz `dot` executable.

use super::{build_fib_tree, call_count, to_dot, to_json, to_text, TreeFormat, MAX_TREE_N};
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// How and where to draw a tree
#[derive(Debug, Clone)]
pub struct DrawOptions {
    pub format: TreeFormat,
    /// Destination file; text formats go to the writer when unset
    pub output: Option<PathBuf>,
    /// Graphviz executable used for image formats
    pub dot_command: String,
    pub rankdir: String,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            format: TreeFormat::Dot,
            output: None,
            dot_command: "dot".to_string(),
            rankdir: "TB".to_string(),
        }
    }
}

/// Build the call tree for `n` and emit it in the requested format.
///
/// Returns the path written to, if any. Arguments above [`MAX_TREE_N`] are
/// rejected before anything is built.
pub fn draw_fib_tree(n: u32, opts: &DrawOptions, out: &mut impl Write) -> Result<Option<PathBuf>> {
    if n > MAX_TREE_N {
        bail!(
            "fib({}) makes {} calls; call trees are limited to n <= {}",
            n,
            call_count(n),
            MAX_TREE_N
        );
    }

    let tree = build_fib_tree(n);
    tracing::info!(
        n,
        nodes = tree.node_count(),
        edges = tree.edge_count(),
        depth = tree.max_depth(),
        format = %opts.format,
        "Drawing Fibonacci call tree"
    );

    let dot = to_dot(&tree, &opts.rankdir);
    if opts.format.is_image() {
        let path = opts
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("fib_tree_{}.{}", n, opts.format.extension())));
        render_image(&opts.dot_command, &dot, opts.format, &path)?;
        return Ok(Some(path));
    }

    let content = match opts.format {
        TreeFormat::Text => to_text(&tree),
        TreeFormat::Json => to_json(&tree).context("Failed to serialize call tree")?,
        _ => dot,
    };

    match &opts.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", content))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(Some(path.clone()))
        }
        None => {
            writeln!(out, "{}", content).context("Failed to write call tree")?;
            Ok(None)
        }
    }
}

/// Run `dot -T<format> -o <path>` with the DOT source on stdin
fn render_image(dot_command: &str, dot: &str, format: TreeFormat, path: &Path) -> Result<()> {
    let mut child = Command::new(dot_command)
        .arg(format!("-T{}", format.extension()))
        .arg("-o")
        .arg(path)
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| {
            format!(
                "Failed to launch Graphviz '{}' (install graphviz or set GRIDSCOPE_DOT)",
                dot_command
            )
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(dot.as_bytes())
            .context("Failed to send graph to Graphviz")?;
    }

    let output = child
        .wait_with_output()
        .context("Failed to wait for Graphviz")?;
    if !output.status.success() {
        bail!(
            "Graphviz exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    tracing::info!(path = %path.display(), "Rendered call tree image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_goes_to_writer_by_default() {
        let mut out: Vec<u8> = Vec::new();
        let written = draw_fib_tree(2, &DrawOptions::default(), &mut out).unwrap();
        assert!(written.is_none());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("digraph FibonacciTree"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn text_format_to_file() {
        let path = std::env::temp_dir().join(format!("gridscope-tree-{}.txt", std::process::id()));
        let opts = DrawOptions {
            format: TreeFormat::Text,
            output: Some(path.clone()),
            ..Default::default()
        };
        let mut out: Vec<u8> = Vec::new();
        let written = draw_fib_tree(1, &opts, &mut out).unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));
        assert!(out.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fib(1)\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn oversized_trees_are_rejected() {
        let mut out: Vec<u8> = Vec::new();
        let err = draw_fib_tree(MAX_TREE_N + 1, &DrawOptions::default(), &mut out).unwrap_err();
        assert!(err.to_string().contains("limited to n <= 25"), "{}", err);
        assert!(out.is_empty());
    }

    #[test]
    fn missing_graphviz_is_an_error() {
        let opts = DrawOptions {
            format: TreeFormat::Png,
            output: Some(std::env::temp_dir().join("gridscope-never-written.png")),
            dot_command: "gridscope-no-such-dot-binary".to_string(),
            ..Default::default()
        };
        let err = draw_fib_tree(3, &opts, &mut Vec::<u8>::new()).unwrap_err();
        assert!(err.to_string().contains("Failed to launch Graphviz"));
    }
}
