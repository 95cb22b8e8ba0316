use super::engine::{align, split_lines};

/// Serialize a full-file comparison as a simplified unified-diff-style patch.
///
/// Header lines name the file as `a/{name}` and `b/{name}`; the body walks
/// the same positional alignment as `compute_diff`, re-split from the raw
/// strings. There are no `@@` hunk headers and no context windowing, so the
/// output is not guaranteed to apply with `patch` or `git apply`.
pub fn build_patch(file_name: &str, original: &str, current: &str) -> String {
    let original_lines = split_lines(Some(original));
    let current_lines = split_lines(Some(current));

    let mut patch = format!("--- a/{file_name}\n+++ b/{file_name}\n");
    for (_, old_line, new_line) in align(&original_lines, &current_lines) {
        if old_line == new_line {
            if let Some(line) = new_line {
                patch.push(' ');
                patch.push_str(line);
                patch.push('\n');
            }
        } else {
            if let Some(line) = old_line {
                patch.push('-');
                patch.push_str(line);
                patch.push('\n');
            }
            if let Some(line) = new_line {
                patch.push('+');
                patch.push_str(line);
                patch.push('\n');
            }
        }
    }

    patch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_body_order_are_exact() {
        let patch = build_patch("foo.ts", "a\nb", "a\nc");
        assert_eq!(patch, "--- a/foo.ts\n+++ b/foo.ts\n a\n-b\n+c\n");
    }

    #[test]
    fn identical_inputs_emit_context_only() {
        let patch = build_patch("same.rs", "x\ny", "x\ny");
        assert_eq!(patch, "--- a/same.rs\n+++ b/same.rs\n x\n y\n");
    }

    #[test]
    fn added_tail_has_no_minus_lines() {
        let patch = build_patch("new.txt", "a", "a\nb\nc");
        assert_eq!(patch, "--- a/new.txt\n+++ b/new.txt\n a\n+b\n+c\n");
    }

    #[test]
    fn removed_tail_has_no_plus_lines() {
        let patch = build_patch("gone.txt", "a\nb", "a");
        assert_eq!(patch, "--- a/gone.txt\n+++ b/gone.txt\n a\n-b\n");
    }

    #[test]
    fn empty_original_diffs_against_empty_line() {
        // Empty text splits to one empty line, so the first row is a replace.
        let patch = build_patch("f", "", "hi");
        assert_eq!(patch, "--- a/f\n+++ b/f\n-\n+hi\n");
    }
}
