//! Dotted path syntax.
//!
//! A path is a `.`-separated list of segments, e.g.
//! `contacts[c:1].fields[uid:2].phone`. A segment is either a plain field
//! name or `name[subscript]`. The subscript is opaque and may itself
//! contain brackets: the name ends at the first `[` and the subscript runs
//! to the final `]` of the segment.

use std::fmt;


/// Separator between path segments.
pub const SEPARATOR: char = '.';


/// One segment of a dotted path, borrowed from the path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain field, e.g. `name`.
    Field(&'a str),
    /// Subscripted element of a list, e.g. `fields[uid:2]`.
    Indexed { name: &'a str, subscript: &'a str },
}

impl<'a> Segment<'a> {
    /// Parse a single segment. Never fails: anything that is not
    /// `name[subscript]` is a plain field.
    pub fn parse(raw: &'a str) -> Self {
        if let Some(open) = raw.find('[') {
            if raw.ends_with(']') {
                return Segment::Indexed {
                    name: &raw[..open],
                    subscript: &raw[open + 1..raw.len() - 1],
                };
            }
        }
        Segment::Field(raw)
    }

    /// The field or list name this segment addresses.
    pub fn name(&self) -> &'a str {
        match *self {
            Segment::Field(name) => name,
            Segment::Indexed { name, .. } => name,
        }
    }

    /// The bracketed subscript, if any.
    pub fn subscript(&self) -> Option<&'a str> {
        match *self {
            Segment::Field(_) => None,
            Segment::Indexed { subscript, .. } => Some(subscript),
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, Segment::Indexed { .. })
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => f.write_str(name),
            Segment::Indexed { name, subscript } => write!(f, "{}[{}]", name, subscript),
        }
    }
}


/// Split a path into its parent path and its last segment.
///
/// Top-level paths have the empty string as parent.
pub fn split_last(path: &str) -> (&str, &str) {
    match path.rsplit_once(SEPARATOR) {
        Some((parent, last)) => (parent, last),
        None => ("", path),
    }
}

/// The parent path, `""` for top-level paths.
pub fn parent(path: &str) -> &str {
    split_last(path).0
}

/// The last raw segment of a path.
pub fn last_segment(path: &str) -> &str {
    split_last(path).1
}

/// Iterate the parsed segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = Segment<'_>> {
    path.split(SEPARATOR).map(Segment::parse)
}

/// Append a segment to a parent path.
pub fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        let mut out = String::with_capacity(parent.len() + 1 + segment.len());
        out.push_str(parent);
        out.push(SEPARATOR);
        out.push_str(segment);
        out
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_field() {
        assert_eq!(Segment::parse("fullname"), Segment::Field("fullname"));
        assert!(!Segment::parse("fullname").is_indexed());
    }

    #[test]
    fn parse_indexed() {
        let seg = Segment::parse("contacts[c:1]");
        assert_eq!(
            seg,
            Segment::Indexed { name: "contacts", subscript: "c:1" }
        );
        assert_eq!(seg.name(), "contacts");
        assert_eq!(seg.subscript(), Some("c:1"));
    }

    #[test]
    fn parse_nested_brackets_anchor_first_open_last_close() {
        let seg = Segment::parse("a[b[1]][2]");
        assert_eq!(seg.name(), "a");
        assert_eq!(seg.subscript(), Some("b[1]][2"));
    }

    #[test]
    fn parse_empty_subscript_and_name() {
        assert_eq!(
            Segment::parse("list[]"),
            Segment::Indexed { name: "list", subscript: "" }
        );
        assert_eq!(
            Segment::parse("[x]"),
            Segment::Indexed { name: "", subscript: "x" }
        );
    }

    #[test]
    fn unterminated_bracket_is_a_field() {
        assert_eq!(Segment::parse("a[1"), Segment::Field("a[1"));
        assert_eq!(Segment::parse("a[1]x"), Segment::Field("a[1]x"));
        assert_eq!(Segment::parse("a]"), Segment::Field("a]"));
    }

    #[test]
    fn display_round_trips() {
        for raw in ["plain", "list[7]", "a[b[1]]"] {
            assert_eq!(Segment::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn split_last_nested() {
        assert_eq!(
            split_last("contacts[c:1].fields[uid:1].email"),
            ("contacts[c:1].fields[uid:1]", "email")
        );
    }

    #[test]
    fn split_last_top_level() {
        assert_eq!(split_last("id"), ("", "id"));
        assert_eq!(parent("id"), "");
        assert_eq!(last_segment("id"), "id");
    }

    #[test]
    fn segments_iterates_in_order() {
        let segs: Vec<Segment> = segments("a[1].b.c[x]").collect();
        assert_eq!(
            segs,
            vec![
                Segment::Indexed { name: "a", subscript: "1" },
                Segment::Field("b"),
                Segment::Indexed { name: "c", subscript: "x" },
            ]
        );
    }

    #[test]
    fn join_handles_root() {
        assert_eq!(join("", "a"), "a");
        assert_eq!(join("a[1]", "b"), "a[1].b");
    }
}
