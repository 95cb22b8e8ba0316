use super::engine::{LineOp, LineOpKind};

/// One display row of the diff table.
///
/// `key` is `(line_number, kind, positional index)`: replace pairs share a
/// line number, so the number alone cannot key a list widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub key: (usize, LineOpKind, usize),
    pub kind: LineOpKind,
    pub line_number: usize,
    pub text: String,
}

/// Added/removed counters for the footer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffTotals {
    pub additions: usize,
    pub deletions: usize,
}

/// Map the operation list onto table rows with stable keys.
pub fn project_rows(ops: &[LineOp]) -> Vec<DiffRow> {
    ops.iter()
        .enumerate()
        .map(|(index, op)| DiffRow {
            key: (op.line_number, op.kind, index),
            kind: op.kind,
            line_number: op.line_number,
            text: op.text.clone(),
        })
        .collect()
}

pub fn summarize(ops: &[LineOp]) -> DiffTotals {
    let mut totals = DiffTotals::default();
    for op in ops {
        match op.kind {
            LineOpKind::Added => totals.additions += 1,
            LineOpKind::Removed => totals.deletions += 1,
            LineOpKind::Unchanged => {}
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::engine::compute_diff;
    use std::collections::HashSet;

    #[test]
    fn keys_stay_unique_across_replace_pairs() {
        let ops = compute_diff(Some("a\nb\nc"), Some("a\nx\nc"));
        let rows = project_rows(&ops);
        let keys: HashSet<_> = rows.iter().map(|r| r.key).collect();
        assert_eq!(keys.len(), rows.len());
        // The replace pair shares line number 2 but differs in kind.
        assert_eq!(rows[1].line_number, 2);
        assert_eq!(rows[2].line_number, 2);
        assert_ne!(rows[1].key, rows[2].key);
    }

    #[test]
    fn counters_match_single_replace() {
        let ops = compute_diff(Some("a\nb\nc"), Some("a\nx\nc"));
        assert_eq!(
            summarize(&ops),
            DiffTotals {
                additions: 1,
                deletions: 1
            }
        );
    }

    #[test]
    fn identity_has_zero_counters() {
        let ops = compute_diff(Some("no\nchange"), Some("no\nchange"));
        assert_eq!(summarize(&ops), DiffTotals::default());
    }

    #[test]
    fn rows_carry_operation_fields_through() {
        let ops = compute_diff(Some("old"), Some("old\nnew"));
        let rows = project_rows(&ops);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].kind, LineOpKind::Added);
        assert_eq!(rows[1].text, "new");
        assert_eq!(rows[1].line_number, 2);
    }
}
