/// Moves `index` by `delta` within `0..len`, stopping at the edges.
pub const fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    let moved = index.saturating_add_signed(delta);
    if moved >= len {
        len - 1
    } else {
        moved
    }
}

/// First visible column so that `selected` stays inside a window of `visible` columns.
pub const fn keep_in_view(offset: usize, visible: usize, selected: usize, total: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }

    let max_offset = total - visible;
    let offset = if selected < offset {
        selected
    } else if selected >= offset + visible {
        selected + 1 - visible
    } else {
        offset
    };

    if offset > max_offset {
        max_offset
    } else {
        offset
    }
}
