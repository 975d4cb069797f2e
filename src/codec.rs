//! Flat text snapshots.
//!
//! Two layouts exist, both newline terminated with no header or record count:
//!
//! - [`Layout::Block`]: five lines per record (name, population, budget,
//!   income, spending).
//! - [`Layout::Line`]: one line per record, fields separated by whitespace.
//!
//! Records are written in ascending key order, so the output depends only on
//! the tree's contents and not on the order they were inserted in. Decoding
//! parses the whole input before returning; any malformed record fails the
//! entire decode with the offending line number.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, ParseErrorKind, Result};
use crate::record::{check_name, validate_name, Profile};
use crate::tree::AvlTree;

/// Number of fields in one record.
const FIELDS: usize = 5;

/// On-disk arrangement of a record's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One field per line.
    Block,
    /// All fields on one whitespace-separated line.
    Line,
}

impl Layout {
    /// Whether names may contain inner whitespace under this layout.
    #[inline]
    pub fn allows_whitespace_in_names(self) -> bool {
        matches!(self, Layout::Block)
    }
}

fn push_number(out: &mut String, x: f64, decimals: Option<usize>) {
    match decimals {
        Some(d) => out.push_str(&format!("{:.*}", d, x)),
        // Display for f64 prints the shortest string that parses back exactly.
        None => out.push_str(&format!("{}", x)),
    }
}

/// Serialize `tree` in ascending key order.
///
/// `decimals` fixes the number of fractional digits for the money fields;
/// `None` writes each value exactly. Fails if a stored name cannot be
/// represented in `layout`.
pub fn encode(tree: &AvlTree<Profile>, layout: Layout, decimals: Option<usize>) -> Result<String> {
    let mut out = String::new();
    for (name, profile) in tree.iter() {
        validate_name(name, layout.allows_whitespace_in_names())?;
        let sep = match layout {
            Layout::Block => '\n',
            Layout::Line => ' ',
        };
        out.push_str(name);
        out.push(sep);
        out.push_str(&profile.population.to_string());
        for x in [
            profile.economy.budget,
            profile.economy.income,
            profile.economy.spending,
        ] {
            out.push(sep);
            push_number(&mut out, x, decimals);
        }
        out.push('\n');
    }
    Ok(out)
}

fn parse_error(line: usize, kind: ParseErrorKind) -> Error {
    Error::Parse { line, kind }
}

/// Parse one record from its five fields. `lines[i]` is the line number of `fields[i]`.
fn parse_record(
    fields: &[&str],
    lines: [usize; FIELDS],
    layout: Layout,
) -> Result<(String, Profile)> {
    let name = fields[0];
    check_name(name, layout.allows_whitespace_in_names())
        .map_err(|reason| parse_error(lines[0], ParseErrorKind::Name(reason)))?;

    let population = fields[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| parse_error(lines[1], ParseErrorKind::Integer(fields[1].to_string())))?;

    let mut money = [0.0f64; 3];
    for (i, slot) in money.iter_mut().enumerate() {
        let raw = fields[2 + i];
        *slot = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or_else(|| parse_error(lines[2 + i], ParseErrorKind::Float(raw.to_string())))?;
    }

    Ok((
        name.to_string(),
        Profile::new(population, money[0], money[1], money[2]),
    ))
}

/// Parse a snapshot into `(name, profile)` pairs in file order.
///
/// Nothing is returned unless every record parsed, so callers never observe a
/// partially decoded snapshot.
pub fn decode(text: &str, layout: Layout) -> Result<Vec<(String, Profile)>> {
    let mut records = Vec::new();
    match layout {
        Layout::Block => {
            let lines: Vec<&str> = text.lines().collect();
            for (chunk_idx, chunk) in lines.chunks(FIELDS).enumerate() {
                let first = chunk_idx * FIELDS + 1;
                if chunk.len() < FIELDS {
                    return Err(parse_error(lines.len() + 1, ParseErrorKind::Truncated));
                }
                let numbers = [first, first + 1, first + 2, first + 3, first + 4];
                records.push(parse_record(chunk, numbers, layout)?);
            }
        }
        Layout::Line => {
            for (idx, line) in text.lines().enumerate() {
                let number = idx + 1;
                let fields: Vec<&str> = line.split_whitespace().collect();
                if fields.len() != FIELDS {
                    return Err(parse_error(number, ParseErrorKind::FieldCount(fields.len())));
                }
                records.push(parse_record(&fields, [number; FIELDS], layout)?);
            }
        }
    }
    debug!(records = records.len(), ?layout, "decoded snapshot");
    Ok(records)
}

/// Write `tree` to `path`, replacing any existing file. Returns the record count.
///
/// The tree is encoded before the file is opened, so an unencodable tree
/// leaves the file untouched.
pub fn write_snapshot(
    path: &Path,
    tree: &AvlTree<Profile>,
    layout: Layout,
    decimals: Option<usize>,
) -> Result<usize> {
    let text = encode(tree, layout, decimals)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    info!(path = %path.display(), records = tree.len(), "wrote snapshot");
    Ok(tree.len())
}

/// Read and decode the snapshot at `path`.
pub fn read_snapshot(path: &Path, layout: Layout) -> Result<Vec<(String, Profile)>> {
    let mut text = String::new();
    File::open(path)?.read_to_string(&mut text)?;
    let records = decode(&text, layout)?;
    info!(path = %path.display(), records = records.len(), "read snapshot");
    Ok(records)
}
