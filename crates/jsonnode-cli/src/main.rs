//! `jnode` CLI — read and edit JSON documents by dotted path.
//!
//! ## Usage
//!
//! ```sh
//! # Read a nested value (stdin → stdout)
//! echo '{"server":{"port":"8080"}}' | jnode get server.port --as int
//!
//! # Array positions are numeric segments
//! jnode get -i data.json items.0.name --as string
//!
//! # Write a value, creating missing objects on the way
//! echo '{}' | jnode set server.tls.enabled true
//!
//! # Store text verbatim instead of parsing it as JSON
//! jnode set -i in.json -o out.json owner.name --string 'Ada Lovelace'
//!
//! # Append to an array (created if missing)
//! jnode append -i in.json tags '"new"' --pretty
//!
//! # Remove an object member
//! jnode del -i in.json server.debug
//! ```

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use jsonnode::{Kind, Node};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "jnode",
    version,
    about = "Read and edit JSON documents by dotted path"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at PATH
    Get {
        /// Dotted path; `.` addresses the whole document
        path: String,
        /// How to render the value
        #[arg(long = "as", value_enum, default_value_t = View::Json)]
        view: View,
        /// Interpret zone-less timestamps as UTC instead of local time
        #[arg(long)]
        utc: bool,
        /// Indent JSON output with two spaces
        #[arg(long)]
        pretty: bool,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Store VALUE at PATH, creating missing objects
    Set {
        path: String,
        /// JSON text, or plain text with --string
        value: String,
        /// Store VALUE as a string without parsing it
        #[arg(long)]
        string: bool,
        #[command(flatten)]
        io: DocumentIo,
    },
    /// Append VALUE to the array at PATH, creating the array if needed
    Append {
        path: String,
        /// JSON text, or plain text with --string
        value: String,
        /// Store VALUE as a string without parsing it
        #[arg(long)]
        string: bool,
        #[command(flatten)]
        io: DocumentIo,
    },
    /// Remove the object member at PATH
    Del {
        path: String,
        #[command(flatten)]
        io: DocumentIo,
    },
}

/// Input/output options shared by the editing subcommands.
#[derive(Args)]
struct DocumentIo {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Indent JSON output with two spaces
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Json,
    String,
    Int,
    Uint,
    Float,
    Bool,
    Time,
    Kind,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            path,
            view,
            utc,
            pretty,
            input,
        } => {
            let root = load_document(input.as_deref())?;
            let node = locate(&root, &path);
            let rendered = render(&node, view, utc, pretty)
                .with_context(|| format!("Failed to read '{}'", path))?;
            println!("{}", rendered);
        }
        Commands::Set {
            path,
            value,
            string,
            io,
        } => {
            let root = load_document(io.input.as_deref())?;
            let target = locate_for_write(&root, &path)?;
            store(&target, &value, string)?;
            save_document(&root, &io)?;
        }
        Commands::Append {
            path,
            value,
            string,
            io,
        } => {
            let root = load_document(io.input.as_deref())?;
            let element = locate_for_write(&root, &path)?.add_index();
            store(&element, &value, string)?;
            save_document(&root, &io)?;
        }
        Commands::Del { path, io } => {
            let root = load_document(io.input.as_deref())?;
            let (parent, key) = split_last(&path);
            let Some(key) = key else {
                bail!("Refusing to delete the whole document");
            };
            let container = locate(&root, parent);
            if container.kind() == Kind::Array {
                bail!("'{}' is an array; del only removes object members", parent);
            }
            container.del(key);
            save_document(&root, &io)?;
        }
    }

    Ok(())
}

/// Render a node according to `--as`. Scalar views are lenient; only JSON
/// output of a missing value and unparsable timestamps fail.
fn render(node: &Node, view: View, utc: bool, pretty: bool) -> Result<String> {
    let text = match view {
        View::Json => {
            if node.is_null() {
                bail!("No value at path");
            }
            if pretty {
                node.encode_pretty()?
            } else {
                node.encode()?
            }
        }
        View::String => node.as_string(),
        View::Int => node.as_i64().to_string(),
        View::Uint => node.as_u64().to_string(),
        View::Float => node.as_f64().to_string(),
        View::Bool => node.as_bool().to_string(),
        View::Time => {
            let ts = if utc {
                node.as_time_in(&Utc)?
            } else {
                node.as_time()?
            };
            ts.to_rfc3339()
        }
        View::Kind => node.kind().to_string(),
    };
    Ok(text)
}

/// Split a dotted path into segments. `.` and the empty string address the
/// root.
fn segments(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('.').unwrap_or(path);
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}

/// Split off the last segment: `a.b.c` → (`a.b`, Some(`c`)).
fn split_last(path: &str) -> (&str, Option<&str>) {
    let path = path.strip_prefix('.').unwrap_or(path);
    match path.rsplit_once('.') {
        Some((parent, last)) => (parent, Some(last)),
        None if path.is_empty() => ("", None),
        None => ("", Some(path)),
    }
}

/// Walk `path` without modifying the document. A numeric segment indexes an
/// array; on anything else it is an object key.
fn locate(root: &Node, path: &str) -> Node {
    let mut node = root.clone();
    for segment in segments(path) {
        node = match (node.kind(), segment.parse::<usize>()) {
            (Kind::Array, Ok(index)) => node.get_index(index),
            _ => node.get(segment),
        };
    }
    node
}

/// Walk `path`, creating objects for missing or non-container segments.
/// Array positions are never created.
fn locate_for_write(root: &Node, path: &str) -> Result<Node> {
    let mut node = root.clone();
    for segment in segments(path) {
        node = match (node.kind(), segment.parse::<usize>()) {
            (Kind::Array, Ok(index)) => {
                let len = node.array_len();
                if index >= len {
                    bail!(
                        "Index {} out of range in '{}' (array has {} elements)",
                        index,
                        path,
                        len
                    );
                }
                node.get_index(index)
            }
            _ => node.set(segment),
        };
    }
    Ok(node)
}

fn store(target: &Node, value: &str, as_string: bool) -> Result<()> {
    if as_string {
        target.assign(value);
    } else {
        target
            .load_str(value)
            .context("VALUE is not valid JSON (use --string to store it as text)")?;
    }
    Ok(())
}

/// Read and decode the input document. Blank input starts an empty document.
fn load_document(path: Option<&str>) -> Result<Node> {
    let text = read_input(path)?;
    let root = Node::new();
    if !text.trim().is_empty() {
        root.load_str(&text).context("Failed to decode input JSON")?;
    }
    Ok(root)
}

fn save_document(root: &Node, io: &DocumentIo) -> Result<()> {
    let mut text = if io.pretty {
        root.encode_pretty()?
    } else {
        root.encode()?
    };
    text.push('\n');
    write_output(io.output.as_deref(), &text)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
