use proptest::prelude::*;
use serde_json::json;

use super::*;
use crate::models::content::{HeadingContent, TextContent};

fn ids(list: &PageSectionList) -> Vec<BlockId> {
    list.iter().map(|b| b.id().clone()).collect()
}

fn styles(value: serde_json::Value) -> StyleMap {
    match value {
        serde_json::Value::Object(map) => StyleMap::from(map),
        _ => StyleMap::new(),
    }
}

#[test]
fn test_add_edit_reorder_delete_scenario() {
    let mut list = PageSectionList::new();
    let hero = list.insert(BlockType::Hero, None);
    let text = list.insert(BlockType::Text, None);
    let cta = list.insert(BlockType::Cta, Some(1));
    assert_eq!(ids(&list), vec![hero.clone(), cta.clone(), text.clone()]);

    let edited = BlockContent::Text(TextContent {
        text: "Mănăstirea Voroneț".to_string(),
        ..TextContent::default()
    });
    assert!(list.update_content(&text, edited.clone()));
    assert_eq!(list.get(&text).unwrap().content(), &edited);

    assert!(list.move_up(&text));
    assert_eq!(ids(&list), vec![hero.clone(), text.clone(), cta.clone()]);

    assert!(list.delete(&hero).is_some());
    assert_eq!(ids(&list), vec![text, cta]);
}

#[test]
fn test_new_block_starts_with_registry_defaults() {
    let mut list = PageSectionList::new();
    let id = list.insert(BlockType::Heading, None);
    let block = list.get(&id).unwrap();

    assert_eq!(
        block.content().to_value(),
        json!({"text": "Titlu Nou", "size": 32, "color": "#000000", "alignment": "left"})
    );
    assert!(block.styles().is_empty());
}

#[test]
fn test_insert_position_past_end_appends() {
    let mut list = PageSectionList::new();
    let first = list.insert(BlockType::Text, None);
    let second = list.insert(BlockType::Image, Some(42));
    assert_eq!(ids(&list), vec![first, second]);
}

#[test]
fn test_boundary_moves_do_nothing() {
    let mut list = PageSectionList::new();
    let a = list.insert(BlockType::Heading, None);
    let b = list.insert(BlockType::Text, None);
    let before = list.clone();

    assert!(!list.move_up(&a));
    assert!(!list.move_down(&b));
    assert_eq!(list, before);
}

#[test]
fn test_stale_ids_are_noops() {
    let mut list = PageSectionList::new();
    list.insert(BlockType::Heading, None);
    let before = list.clone();
    let stale = BlockId::from("deleted-long-ago");

    assert!(list.delete(&stale).is_none());
    assert!(!list.move_up(&stale));
    assert!(!list.move_down(&stale));
    assert!(!list.reorder(&stale, 0));
    assert!(list.duplicate(&stale).is_none());
    assert!(!list.update_styles(&stale, &styles(json!({"padding": 4}))));
    assert!(!list.update_content(&stale, crate::registry::default_content(BlockType::Heading)));
    assert_eq!(list, before);
}

#[test]
fn test_duplicate_is_independent() {
    let mut list = PageSectionList::new();
    let source = list.insert(BlockType::Heading, None);
    list.insert(BlockType::Text, None);
    list.update_styles(&source, &styles(json!({"marginTop": 10})));

    let copy = list.duplicate(&source).unwrap();
    assert_ne!(copy, source);
    assert_eq!(list.index_of(&copy), Some(1));
    assert_eq!(list.get(&copy).unwrap().content(), list.get(&source).unwrap().content());
    assert_eq!(list.get(&copy).unwrap().styles(), list.get(&source).unwrap().styles());

    let changed = BlockContent::Heading(HeadingContent {
        text: "Doar copia".to_string(),
        ..HeadingContent::default()
    });
    list.update_content(&copy, changed);
    list.update_styles(&copy, &styles(json!({"marginTop": 99})));

    let original = list.get(&source).unwrap();
    assert_eq!(original.content().to_value()["text"], json!("Titlu Nou"));
    assert_eq!(original.styles().get("marginTop"), Some(&json!(10)));
}

#[test]
fn test_update_content_replaces_wholesale() {
    let mut list = PageSectionList::new();
    let id = list.insert(BlockType::Heading, None);
    let replacement = BlockContent::Heading(HeadingContent {
        text: "Athos".to_string(),
        size: 40,
        color: "#112233".to_string(),
        alignment: crate::models::content::Alignment::Center,
        extra: serde_json::Map::new(),
    });

    assert!(list.update_content(&id, replacement.clone()));
    assert_eq!(list.get(&id).unwrap().content(), &replacement);
}

#[test]
fn test_update_content_keeps_type() {
    let mut list = PageSectionList::new();
    let id = list.insert(BlockType::Heading, None);
    let before = list.clone();

    assert!(!list.update_content(&id, BlockContent::Text(TextContent::default())));
    assert_eq!(list, before);
    assert_eq!(list.get(&id).unwrap().block_type(), Some(BlockType::Heading));
}

#[test]
fn test_update_styles_merges_shallowly() {
    let mut list = PageSectionList::new();
    let id = list.insert(BlockType::Cta, None);
    list.update_styles(&id, &styles(json!({"padding": 10, "color": "red"})));
    list.update_styles(&id, &styles(json!({"padding": 24, "borderRadius": "8px"})));
    list.update_styles(&id, &styles(json!({"color": null})));

    let block_styles = list.get(&id).unwrap().styles();
    assert_eq!(block_styles.get("padding"), Some(&json!(24)));
    assert_eq!(block_styles.get("borderRadius"), Some(&json!("8px")));
    assert_eq!(block_styles.get("color"), None);
    // Styles never leak into content.
    assert!(list.get(&id).unwrap().content().to_value().get("padding").is_none());
}

#[test]
fn test_reorder_shifts_blocks_between() {
    let mut list = PageSectionList::new();
    let a = list.insert(BlockType::Heading, None);
    let b = list.insert(BlockType::Text, None);
    let c = list.insert(BlockType::Image, None);

    assert!(list.reorder(&c, 0));
    assert_eq!(ids(&list), vec![c.clone(), a.clone(), b.clone()]);
    assert!(!list.reorder(&b, 17), "already last after clamping");
}

#[test]
fn test_serde_round_trip_keeps_unknown_blocks() {
    let stored = json!([
        {"id": "a", "type": "heading", "content": {"text": "Sus"}, "styles": {"padding": 8}},
        {"id": "b", "type": "carousel3d", "content": {"speed": 3}},
        {"id": "c", "type": "hero", "content": {"height": "very tall"}}
    ]);
    let list: PageSectionList = serde_json::from_value(stored.clone()).unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list.blocks()[1].type_name(), "carousel3d");
    assert_eq!(list.blocks()[1].block_type(), None);
    // Malformed content for a known type is kept verbatim as well.
    assert_eq!(list.blocks()[2].block_type(), None);

    let saved = serde_json::to_value(&list).unwrap();
    assert_eq!(saved[1], json!({"id": "b", "type": "carousel3d", "content": {"speed": 3}, "styles": {}}));
    assert_eq!(saved[2]["content"], json!({"height": "very tall"}));
    assert_eq!(saved[0]["content"]["size"], json!(24));
}

#[test]
fn test_duplicate_ids_are_repaired_on_load() {
    let stored = json!([
        {"id": "x", "type": "text", "content": {}},
        {"id": "x", "type": "text", "content": {}}
    ]);
    let list: PageSectionList = serde_json::from_value(stored).unwrap();
    let loaded = ids(&list);
    assert_eq!(loaded[0], BlockId::from("x"));
    assert_ne!(loaded[1], loaded[0]);
}

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, Option<usize>),
    Delete(usize),
    Up(usize),
    Down(usize),
    Reorder(usize, usize),
    Duplicate(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..BlockType::ALL.len(), proptest::option::of(0usize..12))
            .prop_map(|(t, p)| Op::Insert(t, p)),
        (0usize..12).prop_map(Op::Delete),
        (0usize..12).prop_map(Op::Up),
        (0usize..12).prop_map(Op::Down),
        (0usize..12, 0usize..12).prop_map(|(i, t)| Op::Reorder(i, t)),
        (0usize..12).prop_map(Op::Duplicate),
    ]
}

fn pick(list: &PageSectionList, index: usize) -> BlockId {
    list.blocks()
        .get(index)
        .map(|b| b.id().clone())
        .unwrap_or_else(|| BlockId::from("missing"))
}

proptest! {
    #[test]
    fn prop_ids_stay_unique_and_counts_add_up(ops in proptest::collection::vec(op(), 0..40)) {
        let mut list = PageSectionList::new();
        for op in ops {
            let before = list.len();
            match op {
                Op::Insert(t, position) => {
                    list.insert(BlockType::ALL[t], position);
                    prop_assert_eq!(list.len(), before + 1);
                }
                Op::Delete(i) => {
                    let removed = list.delete(&pick(&list, i)).is_some();
                    prop_assert_eq!(list.len(), before - usize::from(removed));
                }
                Op::Up(i) => {
                    list.move_up(&pick(&list, i));
                    prop_assert_eq!(list.len(), before);
                }
                Op::Down(i) => {
                    list.move_down(&pick(&list, i));
                    prop_assert_eq!(list.len(), before);
                }
                Op::Reorder(i, target) => {
                    let id = pick(&list, i);
                    let mut expected = ids(&list);
                    list.reorder(&id, target);
                    let mut after = ids(&list);
                    expected.sort();
                    after.sort();
                    prop_assert_eq!(after, expected);
                }
                Op::Duplicate(i) => {
                    let added = list.duplicate(&pick(&list, i)).is_some();
                    prop_assert_eq!(list.len(), before + usize::from(added));
                }
            }
            let mut unique = ids(&list);
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), list.len());
        }
    }

    #[test]
    fn prop_move_up_then_down_restores_order(len in 2usize..8, index in 1usize..8) {
        let mut list = PageSectionList::new();
        for _ in 0..len {
            list.insert(BlockType::Text, None);
        }
        let index = index.min(len - 1);
        let id = pick(&list, index);
        let before = ids(&list);

        prop_assert!(list.move_up(&id));
        prop_assert!(list.move_down(&id));
        prop_assert_eq!(ids(&list), before);
    }
}
