use crate::display::{DisplayNode, Icon};

/// Number of entries that can carry a numeric key equivalent (digits 0-9).
pub const MAX_KEY_EQUIVALENTS: usize = 10;

/// Cycle length used wherever a list is not bucketed (search results).
pub const UNBUCKETED_CYCLE: usize = 10;

/// Bucketing parameters, already clamped to valid values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub inline_capacity: usize,
    pub folder_capacity: usize,
    pub first_index: usize,
    pub max_total: usize,
    pub folder_icon: Option<Icon>,
}

/// Where an entry lands: its zero-based position in the whole sequence and
/// the number shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub position: usize,
    pub list_number: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListNumbering {
    current: usize,
    cycle: usize,
    start: usize,
}

impl ListNumbering {
    pub fn new(start: usize, cycle: usize) -> Self {
        Self {
            current: start,
            cycle,
            start,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Returns the current number and moves to the next one.
    pub fn advance(&mut self) -> usize {
        let number = self.current;
        self.current = next_list_number(number, self.cycle, self.start);
        number
    }

    pub fn restart(&mut self, cycle: usize) {
        self.current = self.start;
        self.cycle = cycle;
    }
}

/// `1..9` is followed by `0` when counting ten items from one; everything
/// else counts up plainly.
pub fn next_list_number(current: usize, cycle: usize, start: usize) -> usize {
    let next = current + 1;
    if next == 10 && cycle == 10 && start == 1 {
        0
    } else {
        next
    }
}

/// Range label of the folder whose first entry sits at `position`,
/// e.g. `"11 - 20"`. The last folder is capped by `total`.
pub fn folder_range_label(
    position: usize,
    folder_capacity: usize,
    total: usize,
    first_index: usize,
) -> String {
    let end = (position + folder_capacity).min(total);
    let first = position + first_index;
    let last = (end + first_index).saturating_sub(1);
    format!("{first} - {last}")
}

/// Digit bound to the entry at `position`, for the first ten entries only.
pub fn key_equivalent(position: usize, first_index: usize) -> Option<char> {
    if position >= MAX_KEY_EQUIVALENTS {
        return None;
    }
    let digit = (position + first_index) % 10;
    char::from_digit(digit as u32, 10)
}

pub fn folder_count(entries: usize, inline_capacity: usize, folder_capacity: usize) -> usize {
    entries
        .saturating_sub(inline_capacity)
        .div_ceil(folder_capacity.max(1))
}

/// Lays `entries` out as inline leaves followed by range folders.
pub fn paginate<T, F>(entries: &[T], layout: PageLayout, mut make_leaf: F) -> Vec<DisplayNode>
where
    F: FnMut(&T, Slot) -> DisplayNode,
{
    let folder_capacity = layout.folder_capacity.max(1);
    let visible = &entries[..entries.len().min(layout.max_total)];
    let total = visible.len();
    let inline_count = layout.inline_capacity.min(total);

    let mut nodes = Vec::with_capacity(
        inline_count + folder_count(total, layout.inline_capacity, folder_capacity),
    );

    let mut numbering = ListNumbering::new(layout.first_index, layout.inline_capacity);
    for (position, entry) in visible[..inline_count].iter().enumerate() {
        let list_number = numbering.advance();
        nodes.push(make_leaf(
            entry,
            Slot {
                position,
                list_number,
            },
        ));
    }

    for (chunk_index, chunk) in visible[inline_count..].chunks(folder_capacity).enumerate() {
        let first_position = inline_count + chunk_index * folder_capacity;
        numbering.restart(folder_capacity);
        let children = chunk
            .iter()
            .enumerate()
            .map(|(offset, entry)| {
                let list_number = numbering.advance();
                make_leaf(
                    entry,
                    Slot {
                        position: first_position + offset,
                        list_number,
                    },
                )
            })
            .collect();
        nodes.push(DisplayNode::folder(
            folder_range_label(first_position, folder_capacity, total, layout.first_index),
            layout.folder_icon,
            children,
        ));
    }

    nodes
}

/// Slots for a flat list that is never split into folders.
pub fn unbucketed_slots(len: usize, first_index: usize) -> impl Iterator<Item = Slot> {
    let mut numbering = ListNumbering::new(first_index, UNBUCKETED_CYCLE);
    (0..len).map(move |position| Slot {
        position,
        list_number: numbering.advance(),
    })
}
