use clipmenu_core::display::{DisplayNode, LeafKind, LeafNode};
use clipmenu_core::pagination::{folder_count, paginate, PageLayout, Slot};
use proptest::prelude::*;

fn layout(inline: usize, folder: usize, first_index: usize) -> PageLayout {
    PageLayout {
        inline_capacity: inline,
        folder_capacity: folder,
        first_index,
        max_total: usize::MAX,
        folder_icon: None,
    }
}

fn leaf(entry: &usize, slot: Slot) -> DisplayNode {
    DisplayNode::Leaf(LeafNode {
        label: format!("entry {entry}"),
        list_number: slot.list_number,
        payload_id: entry.to_string(),
        kind: LeafKind::Snippet,
        tooltip: None,
        key_equivalent: None,
        icon: None,
        thumbnail: None,
        image: None,
    })
}

fn list_numbers(nodes: &[DisplayNode]) -> Vec<usize> {
    nodes
        .iter()
        .filter_map(DisplayNode::as_leaf)
        .map(|leaf| leaf.list_number)
        .collect()
}

#[test]
fn twenty_five_entries_inline_five_folders_of_ten() {
    let entries: Vec<usize> = (0..25).collect();
    let nodes = paginate(&entries, layout(5, 10, 1), leaf);

    assert_eq!(nodes.len(), 7);
    assert_eq!(list_numbers(&nodes[..5]), vec![1, 2, 3, 4, 5]);

    assert_eq!(nodes[5].label(), Some("6 - 15"));
    assert_eq!(
        list_numbers(nodes[5].children()),
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0]
    );

    assert_eq!(nodes[6].label(), Some("16 - 25"));
    assert_eq!(nodes[6].children().len(), 10);
    assert_eq!(
        nodes[6].children()[0].as_leaf().map(|leaf| leaf.payload_id.as_str()),
        Some("15")
    );
}

#[test]
fn zero_based_numbering_counts_to_nine() {
    let entries: Vec<usize> = (0..12).collect();
    let nodes = paginate(&entries, layout(0, 10, 0), leaf);
    assert_eq!(nodes[0].label(), Some("0 - 9"));
    assert_eq!(
        list_numbers(nodes[0].children()),
        vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]
    );
    assert_eq!(nodes[1].label(), Some("10 - 11"));
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn folder_count_and_sizes_hold(
        n in 0usize..200,
        inline in 0usize..30,
        folder in 1usize..25,
        first_index in 0usize..=1,
    ) {
        let entries: Vec<usize> = (0..n).collect();
        let nodes = paginate(&entries, layout(inline, folder, first_index), leaf);

        let folders: Vec<&DisplayNode> = nodes
            .iter()
            .filter(|node| matches!(node, DisplayNode::Folder { .. }))
            .collect();
        let expected = n.saturating_sub(inline).div_ceil(folder);
        prop_assert_eq!(folders.len(), expected);
        prop_assert_eq!(folder_count(n, inline, folder), expected);

        for (index, node) in folders.iter().enumerate() {
            let size = node.children().len();
            prop_assert!(size <= folder);
            if index + 1 < folders.len() {
                prop_assert_eq!(size, folder);
            }
        }

        let placed: usize = nodes.iter().map(|node| node.leaves().len()).sum();
        prop_assert_eq!(placed, n);
    }

    #[test]
    fn ten_per_folder_from_one_never_shows_ten(n in 0usize..120, inline in 0usize..11) {
        let entries: Vec<usize> = (0..n).collect();
        let nodes = paginate(&entries, layout(inline.min(10), 10, 1), leaf);

        for node in &nodes {
            for leaf in node.leaves() {
                prop_assert!(leaf.list_number < 10);
            }
        }
    }

    #[test]
    fn max_total_drops_the_tail(n in 0usize..100, cap in 1usize..100) {
        let entries: Vec<usize> = (0..n).collect();
        let mut capped = layout(3, 7, 1);
        capped.max_total = cap;
        let nodes = paginate(&entries, capped, leaf);

        let placed: usize = nodes.iter().map(|node| node.leaves().len()).sum();
        prop_assert_eq!(placed, n.min(cap));
    }
}
