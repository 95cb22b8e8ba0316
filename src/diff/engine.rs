/// Kind of a single line produced by the positional alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineOpKind {
    Unchanged,
    Added,
    Removed,
}

/// One row of a computed diff.
///
/// `line_number` is the 1-based position in the alignment walk. A replaced
/// line emits a Removed and an Added row sharing the same number, so the
/// number alone is not a unique key (see `rows::project_rows`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOp {
    pub kind: LineOpKind,
    pub line_number: usize,
    pub text: String,
}

impl LineOp {
    fn new(kind: LineOpKind, line_number: usize, text: &str) -> Self {
        Self {
            kind,
            line_number,
            text: text.to_string(),
        }
    }
}

/// Split a text blob into lines on `'\n'`.
///
/// No trimming and no carriage-return normalization; a missing blob is
/// treated as empty. Empty input yields a single empty line, which keeps
/// the split/join round trip exact.
pub fn split_lines(text: Option<&str>) -> Vec<String> {
    text.unwrap_or_default()
        .split('\n')
        .map(str::to_owned)
        .collect()
}

/// Walk two line arrays position by position up to the longer length.
///
/// Both `compute_diff` and `patch::build_patch` consume this walk, so the
/// two surfaces cannot drift apart.
pub(crate) fn align<'a>(
    original: &'a [String],
    current: &'a [String],
) -> impl Iterator<Item = (usize, Option<&'a str>, Option<&'a str>)> {
    let max_lines = original.len().max(current.len());
    (0..max_lines).map(move |i| {
        (
            i,
            original.get(i).map(String::as_str),
            current.get(i).map(String::as_str),
        )
    })
}

/// Compute a positional line diff between two text blobs.
///
/// This is deliberately not a minimal-edit diff: lines are compared index
/// by index, so an insertion in the middle reports every following line as
/// a Removed/Added pair. In exchange the walk is O(n), allocation-light,
/// and stable for append/replace edits, which is what agent sessions
/// mostly produce.
pub fn compute_diff(original: Option<&str>, current: Option<&str>) -> Vec<LineOp> {
    let original_lines = split_lines(original);
    let current_lines = split_lines(current);

    let mut ops = Vec::with_capacity(original_lines.len().max(current_lines.len()));
    for (i, old_line, new_line) in align(&original_lines, &current_lines) {
        let line_number = i + 1;
        match (old_line, new_line) {
            (None, Some(new_line)) => {
                ops.push(LineOp::new(LineOpKind::Added, line_number, new_line));
            }
            (Some(old_line), None) => {
                ops.push(LineOp::new(LineOpKind::Removed, line_number, old_line));
            }
            (Some(old_line), Some(new_line)) if old_line != new_line => {
                // Both rows share one line number for side-by-side display.
                ops.push(LineOp::new(LineOpKind::Removed, line_number, old_line));
                ops.push(LineOp::new(LineOpKind::Added, line_number, new_line));
            }
            (_, Some(new_line)) => {
                ops.push(LineOp::new(LineOpKind::Unchanged, line_number, new_line));
            }
            (None, None) => {}
        }
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join_side(ops: &[LineOp], keep: LineOpKind) -> String {
        ops.iter()
            .filter(|op| op.kind == LineOpKind::Unchanged || op.kind == keep)
            .map(|op| op.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn split_treats_missing_as_empty() {
        assert_eq!(split_lines(None), vec![String::new()]);
        assert_eq!(split_lines(Some("")), vec![String::new()]);
        assert_eq!(split_lines(Some("a\nb")), vec!["a", "b"]);
        // Trailing newline yields a trailing empty line, by design.
        assert_eq!(split_lines(Some("a\n")), vec!["a", ""]);
    }

    #[test]
    fn identity_diff_is_all_unchanged() {
        let text = "fn main() {\n    println!(\"hi\");\n}";
        let ops = compute_diff(Some(text), Some(text));
        assert!(ops.iter().all(|op| op.kind == LineOpKind::Unchanged));
        assert_eq!(ops.len(), 3);
    }

    #[test]
    fn replaced_line_emits_removed_then_added_with_shared_number() {
        let ops = compute_diff(Some("a\nb\nc"), Some("a\nx\nc"));
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[1].kind, LineOpKind::Removed);
        assert_eq!(ops[1].text, "b");
        assert_eq!(ops[1].line_number, 2);
        assert_eq!(ops[2].kind, LineOpKind::Added);
        assert_eq!(ops[2].text, "x");
        assert_eq!(ops[2].line_number, 2);
    }

    #[test]
    fn appended_lines_are_added() {
        let ops = compute_diff(Some("a"), Some("a\nb\nc"));
        assert_eq!(ops[0].kind, LineOpKind::Unchanged);
        assert_eq!(ops[1].kind, LineOpKind::Added);
        assert_eq!(ops[2].kind, LineOpKind::Added);
        assert_eq!(ops[2].line_number, 3);
    }

    #[test]
    fn truncated_lines_are_removed() {
        let ops = compute_diff(Some("a\nb\nc"), Some("a"));
        assert_eq!(ops[1].kind, LineOpKind::Removed);
        assert_eq!(ops[2].kind, LineOpKind::Removed);
        assert_eq!(ops[2].text, "c");
    }

    #[test]
    fn round_trips_reconstruct_both_sides() {
        let cases = [
            ("a\nb\nc", "a\nx\nc"),
            ("", "hello"),
            ("one\ntwo", "one\ntwo\nthree\nfour"),
            ("x\ny\nz", ""),
            ("same", "same"),
        ];
        for (original, current) in cases {
            let ops = compute_diff(Some(original), Some(current));
            assert_eq!(join_side(&ops, LineOpKind::Removed), original);
            assert_eq!(join_side(&ops, LineOpKind::Added), current);
        }
    }

    #[test]
    fn both_missing_yields_single_empty_unchanged() {
        let ops = compute_diff(None, None);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, LineOpKind::Unchanged);
        assert_eq!(ops[0].text, "");
        assert_eq!(ops[0].line_number, 1);
    }

    #[test]
    fn mid_file_insertion_over_reports_by_design() {
        // Positional alignment shifts every later line into a replace pair.
        let ops = compute_diff(Some("a\nb"), Some("new\na\nb"));
        let removed = ops.iter().filter(|o| o.kind == LineOpKind::Removed).count();
        let added = ops.iter().filter(|o| o.kind == LineOpKind::Added).count();
        assert_eq!(removed, 2);
        assert_eq!(added, 3);
    }
}
