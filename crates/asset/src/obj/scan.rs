//! Line-level pass over OBJ text: reads `v` records, checks attribute
//! records, face shape and index ranges, and spots free-form geometry.
//! Topology is left to `tobj`.

use std::borrow::Cow;

use corelib::{MeshError, MeshResult, Vec3};

/// Free-form curve/surface directives. `tobj` skips them silently, which
/// would hand back a mesh missing that geometry.
const FREE_FORM_DIRECTIVES: &[&str] = &[
    "vp", "cstype", "deg", "bmat", "step", "curv", "curv2", "surf", "parm", "trim", "hole",
    "scrv", "sp", "end", "con",
];

/// Result of a scan. Lines are 1-based.
#[derive(Debug, Default)]
pub(crate) struct Scan {
    pub positions: Vec<Vec3>,
    pub unsupported: Option<(usize, String)>,
}

/// Attribute streams a face vertex can reference.
#[derive(Clone, Copy, Debug)]
enum Stream {
    Position,
    Texcoord,
    Normal,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Self::Position => "vertex",
            Self::Texcoord => "texcoord",
            Self::Normal => "normal",
        }
    }
}

/// Running record counts plus the largest positive index seen per stream.
/// Positive indices may point forward, so they are checked once the whole
/// file is read; negative ones resolve against the records seen so far.
#[derive(Debug, Default)]
struct IndexCheck {
    counts: [usize; 3],
    max_forward: [Option<(usize, usize)>; 3],
}

impl IndexCheck {
    fn record(&mut self, stream: Stream) {
        self.counts[stream as usize] += 1;
    }

    fn check(&mut self, stream: Stream, raw: i64, line_no: usize) -> MeshResult<()> {
        let slot = stream as usize;
        if raw < 0 {
            if raw.unsigned_abs() as usize > self.counts[slot] {
                return Err(MeshError::parse_at(
                    line_no,
                    format!(
                        "face {} index {raw} reaches before the first record",
                        stream.name()
                    ),
                ));
            }
        } else {
            let idx = raw as usize;
            match self.max_forward[slot] {
                Some((max, _)) if max >= idx => {}
                _ => self.max_forward[slot] = Some((idx, line_no)),
            }
        }
        Ok(())
    }

    fn finish(&self) -> MeshResult<()> {
        for stream in [Stream::Position, Stream::Texcoord, Stream::Normal] {
            let slot = stream as usize;
            if let Some((idx, line_no)) = self.max_forward[slot] {
                if idx > self.counts[slot] {
                    return Err(MeshError::parse_at(
                        line_no,
                        format!(
                            "face {} index {idx} out of bounds ({} records)",
                            stream.name(),
                            self.counts[slot]
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn scan(source: &str, collect_positions: bool) -> MeshResult<Scan> {
    let mut out = Scan::default();
    let mut indices = IndexCheck::default();

    for (line_no, line) in logical_lines(source) {
        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => {
                let x = parse_coord(parts.next(), line_no, "x")?;
                let y = parse_coord(parts.next(), line_no, "y")?;
                let z = parse_coord(parts.next(), line_no, "z")?;
                if collect_positions {
                    out.positions.push(Vec3::new(x, y, z));
                }
                indices.record(Stream::Position);
            }
            "vn" => {
                for axis in ["nx", "ny", "nz"] {
                    parse_coord(parts.next(), line_no, axis)?;
                }
                indices.record(Stream::Normal);
            }
            "vt" => {
                for axis in ["u", "v"] {
                    parse_coord(parts.next(), line_no, axis)?;
                }
                indices.record(Stream::Texcoord);
            }
            "f" => check_face(parts, line_no, &mut indices)?,
            _ if FREE_FORM_DIRECTIVES.contains(&tag) => {
                if out.unsupported.is_none() {
                    out.unsupported = Some((line_no, tag.to_string()));
                }
            }
            _ => {}
        }
    }

    indices.finish()?;
    Ok(out)
}

/// Source with `\` continuations joined, so `tobj` reads the same records
/// as [`scan`]. Borrowed when nothing is continued.
pub(crate) fn joined_source(source: &str) -> Cow<'_, str> {
    let continued = source
        .lines()
        .any(|l| strip_comment(l).trim_end().ends_with('\\'));
    if !continued {
        return Cow::Borrowed(source);
    }

    let mut joined = String::with_capacity(source.len());
    for (_, line) in logical_lines(source) {
        joined.push_str(&line);
        joined.push('\n');
    }
    Cow::Owned(joined)
}

fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or_default()
}

/// Yields comment-stripped lines with `\` continuations joined, tagged with
/// the line number they start on.
fn logical_lines(source: &str) -> impl Iterator<Item = (usize, String)> + '_ {
    let mut lines = source.lines().enumerate();
    std::iter::from_fn(move || {
        let (idx, first) = lines.next()?;
        let mut joined = String::new();
        let mut current = first;
        loop {
            let content = strip_comment(current);
            match content.trim_end().strip_suffix('\\') {
                Some(head) => {
                    joined.push_str(head);
                    joined.push(' ');
                    match lines.next() {
                        Some((_, next)) => current = next,
                        None => break,
                    }
                }
                None => {
                    joined.push_str(content);
                    break;
                }
            }
        }
        Some((idx + 1, joined))
    })
}

fn parse_coord(token: Option<&str>, line_no: usize, axis: &str) -> MeshResult<f32> {
    let token =
        token.ok_or_else(|| MeshError::parse_at(line_no, format!("missing {axis} coordinate")))?;
    token.parse::<f32>().map_err(|e| {
        MeshError::parse_at(line_no, format!("invalid {axis} coordinate '{token}': {e}"))
    })
}

fn check_face<'a>(
    refs: impl Iterator<Item = &'a str>,
    line_no: usize,
    indices: &mut IndexCheck,
) -> MeshResult<()> {
    let mut count = 0;
    for token in refs {
        check_vertex_ref(token, line_no, indices)?;
        count += 1;
    }
    if count < 3 {
        return Err(MeshError::parse_at(
            line_no,
            format!("face has {count} vertices, need at least 3"),
        ));
    }
    Ok(())
}

/// Accepts `v`, `v/vt`, `v//vn` and `v/vt/vn`.
fn check_vertex_ref(token: &str, line_no: usize, indices: &mut IndexCheck) -> MeshResult<()> {
    let malformed = || MeshError::parse_at(line_no, format!("malformed face vertex '{token}'"));
    let fields: Vec<&str> = token.split('/').collect();
    let (v, vt, vn) = match fields.as_slice() {
        [v] => (*v, None, None),
        [v, vt] => (*v, Some(*vt), None),
        [v, vt, vn] if vt.is_empty() => (*v, None, Some(*vn)),
        [v, vt, vn] => (*v, Some(*vt), Some(*vn)),
        _ => return Err(malformed()),
    };

    for (stream, field) in [
        (Stream::Position, Some(v)),
        (Stream::Texcoord, vt),
        (Stream::Normal, vn),
    ] {
        if let Some(field) = field {
            let raw = parse_index(field).ok_or_else(malformed)?;
            indices.check(stream, raw, line_no)?;
        }
    }
    Ok(())
}

/// OBJ indices are 1-based; negative values are relative to the end.
fn parse_index(field: &str) -> Option<i64> {
    field.parse::<i64>().ok().filter(|&i| i != 0)
}
