use crate::length::{Length, Range};
use crate::node::Node;
use crate::tree::Tree;

pub(crate) fn changed_ranges(old: &Tree, new: &Tree) -> Vec<Range> {
    let mut ranges = Vec::new();
    diff(old.root_node(), new.root_node(), &mut ranges);

    if old.included_ranges() != new.included_ranges() {
        let only_in = |a: &[Range], b: &[Range]| -> Vec<Range> {
            a.iter().filter(|range| !b.contains(range)).copied().collect()
        };
        ranges.extend(only_in(old.included_ranges(), new.included_ranges()));
        ranges.extend(only_in(new.included_ranges(), old.included_ranges()));
    }

    merge(ranges)
}

fn same_shape(old: &Node<'_>, new: &Node<'_>) -> bool {
    old.symbol() == new.symbol()
        && old.start() == new.start()
        && old.end() == new.end()
        && old.is_missing() == new.is_missing()
        && old.is_extra() == new.is_extra()
}

fn diff(old: Node<'_>, new: Node<'_>, out: &mut Vec<Range>) {
    if old.green().ptr_eq(new.green()) && old.start() == new.start() {
        return;
    }

    if old.symbol() != new.symbol()
        || old.is_missing() != new.is_missing()
        || old.is_extra() != new.is_extra()
    {
        out.push(cover(old.start(), old.end(), new.start(), new.end()));
        return;
    }

    let old_children: Vec<_> = old.children().collect();
    let new_children: Vec<_> = new.children().collect();
    if old_children.is_empty() && new_children.is_empty() {
        if !same_shape(&old, &new) {
            out.push(cover(old.start(), old.end(), new.start(), new.end()));
        }
        return;
    }

    let prefix = old_children
        .iter()
        .zip(&new_children)
        .take_while(|(old, new)| same_shape(old, new))
        .count();
    let shortest = old_children.len().min(new_children.len());
    let suffix = old_children[prefix..]
        .iter()
        .rev()
        .zip(new_children[prefix..].iter().rev())
        .take(shortest - prefix)
        .take_while(|(old, new)| same_shape(old, new))
        .count();

    for (old, new) in old_children.iter().zip(&new_children).take(prefix) {
        diff(*old, *new, out);
    }

    let old_middle = middle(&old, &old_children, prefix, suffix);
    let new_middle = middle(&new, &new_children, prefix, suffix);
    if old_middle.0 != old_middle.1 || new_middle.0 != new_middle.1 {
        out.push(cover(old_middle.0, old_middle.1, new_middle.0, new_middle.1));
    } else if prefix + suffix < old_children.len().max(new_children.len()) {
        // Zero-width children differ, e.g. a token that became MISSING.
        let old_around = around(&old, &old_children, prefix, suffix);
        let new_around = around(&new, &new_children, prefix, suffix);
        out.push(cover(old_around.0, old_around.1, new_around.0, new_around.1));
    }

    let old_tail = &old_children[old_children.len() - suffix..];
    let new_tail = &new_children[new_children.len() - suffix..];
    for (old, new) in old_tail.iter().zip(new_tail) {
        diff(*old, *new, out);
    }
}

/// Span of the children between the matching prefix and suffix.
fn middle(
    parent: &Node<'_>,
    children: &[Node<'_>],
    prefix: usize,
    suffix: usize,
) -> (Length, Length) {
    let end = children.len() - suffix;
    if prefix < end {
        (children[prefix].start(), children[end - 1].end())
    } else {
        let at = if prefix > 0 { children[prefix - 1].end() } else { parent.start() };
        (at, at)
    }
}

/// Span from the last matching child before the middle to the first one
/// after it, falling back to the parent's bounds.
fn around(
    parent: &Node<'_>,
    children: &[Node<'_>],
    prefix: usize,
    suffix: usize,
) -> (Length, Length) {
    let end = children.len() - suffix;
    let start = if prefix > 0 { children[prefix - 1].start() } else { parent.start() };
    let end = if end < children.len() { children[end].end() } else { parent.end() };
    (start, end)
}

fn cover(a_start: Length, a_end: Length, b_start: Length, b_end: Length) -> Range {
    let start = if b_start.bytes < a_start.bytes { b_start } else { a_start };
    let end = if b_end.bytes > a_end.bytes { b_end } else { a_end };
    Range::from_lengths(start, end)
}

fn merge(mut ranges: Vec<Range>) -> Vec<Range> {
    ranges.sort_by_key(|range| (range.start_byte, range.end_byte));

    let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start_byte <= last.end_byte => {
                if range.end_byte > last.end_byte {
                    last.end_byte = range.end_byte;
                    last.end_point = range.end_point;
                }
            }
            _ => merged.push(range),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use crate::length::{InputEdit, Range};
    use crate::tests::{parse_calls, sample_tree};

    #[test]
    fn identical_trees_have_no_changes() {
        let tree = sample_tree();
        assert_eq!(tree.changed_ranges(&tree.clone()), Vec::<Range>::new());
    }

    #[test]
    fn replaced_call_is_reported() {
        let old_text = "foo(x); bar(y);";
        let new_text = "foo(x); bar;";
        let mut old = sample_tree();
        old.edit(&InputEdit::for_replacement(old_text, 11..14, ""));

        let new = parse_calls(new_text);
        let ranges = old.changed_ranges(&new);

        assert_eq!(ranges, vec![Range::of_bytes(new_text, 8..11)]);
    }
}
