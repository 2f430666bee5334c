use std::{collections::HashMap, sync::Mutex};

use serde_json::json;

use super::*;
use crate::{
    gateway::LoadedSections,
    models::{content::HeadingContent, Role},
};

/// In-memory gateway with the same version semantics as the SQLite store.
#[derive(Default)]
struct MemoryGateway {
    pages: Mutex<HashMap<u64, (PageSectionList, u64)>>,
    fail_saves: bool,
}

impl MemoryGateway {
    fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    fn stored(&self, page_id: u64) -> Option<(PageSectionList, u64)> {
        self.pages.lock().unwrap().get(&page_id).cloned()
    }
}

impl PersistenceGateway for MemoryGateway {
    async fn load(&self, page_id: u64) -> Result<LoadedSections> {
        let (sections, version) = self.stored(page_id).unwrap_or_default();
        Ok(LoadedSections { sections, version })
    }

    async fn save(&self, page_id: u64, sections: &PageSectionList, mode: SaveMode) -> Result<u64> {
        if self.fail_saves {
            return Err(SiteError::Configuration {
                message: "store offline".to_string(),
            });
        }
        let mut pages = self.pages.lock().unwrap();
        let current = pages.get(&page_id).map_or(0, |(_, v)| *v);
        if let SaveMode::Expect(expected) = mode {
            if expected != current {
                return Err(SiteError::VersionConflict {
                    id: page_id,
                    expected,
                    actual: current,
                });
            }
        }
        pages.insert(page_id, (sections.clone(), current + 1));
        Ok(current + 1)
    }
}

fn admin() -> CurrentUser {
    CurrentUser::new("ana", Role::Admin)
}

fn editing(list: PageSectionList) -> SectionEditor {
    let mut editor = SectionEditor::new(1, list, 0);
    assert!(editor.enter_edit_mode(&admin()));
    editor
}

fn three_blocks() -> (PageSectionList, [BlockId; 3]) {
    let mut list = PageSectionList::new();
    let a = list.insert(BlockType::Heading, None);
    let b = list.insert(BlockType::Text, None);
    let c = list.insert(BlockType::Image, None);
    (list, [a, b, c])
}

fn order(editor: &SectionEditor) -> Vec<BlockId> {
    editor.sections().iter().map(|b| b.id().clone()).collect()
}

#[test]
fn test_only_editing_roles_enter_edit_mode() {
    let mut editor = SectionEditor::new(1, PageSectionList::new(), 0);
    assert!(!editor.enter_edit_mode(&CurrentUser::new("vizitator", Role::User)));
    assert_eq!(editor.mode(), EditorMode::View);

    assert!(editor.enter_edit_mode(&CurrentUser::new("op", Role::Operator)));
    assert_eq!(editor.toggle_mode(&admin()), EditorMode::View);
    assert_eq!(editor.toggle_mode(&admin()), EditorMode::Edit);
}

#[test]
fn test_view_mode_ignores_mutations() {
    let (list, [a, ..]) = three_blocks();
    let mut editor = SectionEditor::new(1, list.clone(), 0);

    assert_eq!(editor.add(BlockType::Cta, None), None);
    assert!(!editor.move_down(&a));
    assert!(!editor.delete(&a));
    assert!(!editor.open(&a));
    assert!(editor.controls(&a).is_none());
    assert_eq!(editor.sections(), &list);
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn test_controls_hide_moves_at_boundaries() {
    let (list, [a, b, c]) = three_blocks();
    let editor = editing(list);

    let first = editor.controls(&a).unwrap().available();
    assert!(!first.contains(&Control::MoveUp));
    assert!(first.contains(&Control::MoveDown));

    let middle = editor.controls(&b).unwrap().available();
    assert!(middle.contains(&Control::MoveUp) && middle.contains(&Control::MoveDown));

    let last = editor.controls(&c).unwrap().available();
    assert!(last.contains(&Control::MoveUp));
    assert!(!last.contains(&Control::MoveDown));

    assert_eq!(editor.all_controls().len(), 3);
}

#[test]
fn test_controls_swap_edit_for_save_cancel() {
    let (list, [a, ..]) = three_blocks();
    let mut editor = editing(list);
    assert!(editor.open(&a));

    let controls = editor.controls(&a).unwrap().available();
    assert!(controls.contains(&Control::Save));
    assert!(controls.contains(&Control::Cancel));
    assert!(!controls.contains(&Control::Edit));
}

#[test]
fn test_add_before_and_after_anchor() {
    let (list, [a, b, _]) = three_blocks();
    let mut editor = editing(list);

    let before = editor.add_before(&b, BlockType::Cta).unwrap();
    let after = editor.add_after(&a, BlockType::Hero).unwrap();

    let ids = order(&editor);
    assert_eq!(ids[0], a);
    assert_eq!(ids[1], after);
    assert_eq!(ids[2], before);
    assert_eq!(ids[3], b);
    assert!(editor.has_unsaved_changes());
}

#[test]
fn test_boundary_moves_are_noops() {
    let (list, [a, _, c]) = three_blocks();
    let mut editor = editing(list);
    let before = order(&editor);

    assert!(!editor.move_up(&a));
    assert!(!editor.move_down(&c));
    assert_eq!(order(&editor), before);
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn test_save_commits_draft() {
    let (list, [a, ..]) = three_blocks();
    let mut editor = editing(list);

    editor.open(&a);
    editor.set_field(&a, "text", "Pelerinaj la Putna").unwrap();
    editor.set_field(&a, "size", "huge").unwrap();
    assert!(editor.draft(&a).unwrap().is_modified());

    assert!(editor.save(&a));
    assert!(!editor.is_editing(&a));

    let content = editor.sections().get(&a).unwrap().content().to_value();
    assert_eq!(content["text"], json!("Pelerinaj la Putna"));
    // Unparseable size falls back to the heading form default.
    assert_eq!(content["size"], json!(24));
}

#[test]
fn test_cancel_discards_draft() {
    let (list, [a, ..]) = three_blocks();
    let mut editor = editing(list.clone());

    editor.open(&a);
    editor.set_field(&a, "text", "draft only").unwrap();
    assert!(editor.cancel(&a));

    assert_eq!(editor.sections(), &list);
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn test_open_drafts_stay_separate() {
    let (list, [a, b, c]) = three_blocks();
    let mut editor = editing(list.clone());

    assert!(editor.open(&a));
    assert!(editor.open(&b));
    editor.set_field(&a, "text", "Muntele Athos").unwrap();
    editor.set_field(&b, "text", "Doar în ciornă").unwrap();
    editor.set_field(&b, "size", "20").unwrap();

    assert_eq!(editor.draft(&a).unwrap().draft().to_value()["size"], json!(32));
    assert_eq!(
        editor.draft(&b).unwrap().committed(),
        list.get(&b).unwrap().content()
    );

    assert!(editor.save(&a));
    assert!(editor.is_editing(&b));
    assert!(editor.cancel(&b));

    let saved = editor.sections().get(&a).unwrap().content().to_value();
    let mut expected = list.get(&a).unwrap().content().to_value();
    expected["text"] = json!("Muntele Athos");
    assert_eq!(saved, expected);

    assert_eq!(editor.sections().get(&b), list.get(&b));
    assert_eq!(editor.sections().get(&c), list.get(&c));
    assert!(!editor.is_editing(&a) && !editor.is_editing(&b));
}

#[test]
fn test_set_draft_refuses_other_type() {
    let (list, [a, b, _]) = three_blocks();
    let mut editor = editing(list);
    editor.open(&b);

    let heading = BlockContent::Heading(HeadingContent::default());
    assert!(editor.set_draft(&b, heading.clone()).is_err());
    assert!(editor.set_draft(&a, heading).is_err(), "block a is not open");
}

#[test]
fn test_unknown_field_is_rejected() {
    let (list, [a, ..]) = three_blocks();
    let mut editor = editing(list);
    editor.open(&a);

    let err = editor.set_field(&a, "subtitle", "x").unwrap_err();
    assert!(matches!(err, SiteError::InvalidInput { .. }));
}

#[test]
fn test_delete_drops_open_draft() {
    let (list, [a, b, _]) = three_blocks();
    let mut editor = editing(list);
    editor.open(&a);

    assert!(editor.delete(&a));
    assert!(!editor.is_editing(&a));
    assert!(!editor.save(&a));
    assert_eq!(order(&editor)[0], b);
}

#[test]
fn test_exit_edit_mode_discards_drafts() {
    let (list, [a, ..]) = three_blocks();
    let mut editor = editing(list.clone());
    editor.open(&a);
    editor.set_field(&a, "text", "lost").unwrap();

    editor.exit_edit_mode();
    assert!(!editor.is_editing(&a));
    assert_eq!(editor.sections(), &list);
}

#[test]
fn test_style_updates_apply_immediately() {
    let (list, [_, b, _]) = three_blocks();
    let mut editor = editing(list);

    let partial = StyleMap::from(json!({"padding": 20}).as_object().unwrap().clone());
    assert!(editor.update_styles(&b, &partial));
    assert_eq!(editor.sections().get(&b).unwrap().styles().get("padding"), Some(&json!(20)));
}

#[test]
fn test_drag_moves_one_step_after_midpoint() {
    let (list, [a, b, c]) = three_blocks();
    let mut editor = editing(list);
    let rect = HoverRect::new(100.0, 40.0);

    assert!(editor.begin_drag(&a));
    // Upper half of the block below: nothing yet.
    assert_eq!(editor.drag_over(&c, 110.0, rect), None);

    let step = editor.drag_over(&c, 130.0, rect).unwrap();
    assert_eq!((step.from, step.to), (0, 1));
    assert_eq!(order(&editor), vec![b.clone(), a.clone(), c.clone()]);

    let step = editor.drag_over(&c, 130.0, rect).unwrap();
    assert_eq!((step.from, step.to), (1, 2));
    assert_eq!(order(&editor), vec![b, c, a.clone()]);

    assert_eq!(editor.end_drag(), Some(a));
    assert!(editor.end_drag().is_none());
}

#[test]
fn test_drag_over_without_gesture() {
    let (list, [a, b, _]) = three_blocks();
    let mut editor = editing(list);
    assert!(editor.drag_over(&b, 500.0, HoverRect::new(0.0, 10.0)).is_none());
    assert!(!editor.begin_drag(&BlockId::from("gone")));
    assert_eq!(order(&editor)[0], a);
}

#[tokio::test]
async fn test_persist_then_reload_round_trips() {
    let gateway = MemoryGateway::default();
    let mut editor = SectionEditor::load(&gateway, 7).await.unwrap();
    assert!(editor.sections().is_empty());
    assert!(editor.enter_edit_mode(&admin()));

    editor.add(BlockType::Heading, None);
    editor.add(BlockType::Pilgrimages, None);
    assert_eq!(editor.persist(&gateway).await.unwrap(), 1);
    assert!(!editor.has_unsaved_changes());

    let reloaded = SectionEditor::load(&gateway, 7).await.unwrap();
    assert_eq!(reloaded.sections(), editor.sections());
    assert_eq!(reloaded.version(), 1);
}

#[tokio::test]
async fn test_stale_editor_gets_conflict() {
    let gateway = MemoryGateway::default();
    let mut first = SectionEditor::load(&gateway, 3).await.unwrap();
    let mut second = SectionEditor::load(&gateway, 3).await.unwrap();
    first.enter_edit_mode(&admin());
    second.enter_edit_mode(&admin());

    first.add(BlockType::Text, None);
    first.persist(&gateway).await.unwrap();

    second.add(BlockType::Cta, None);
    let err = second.persist(&gateway).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(second.sections().len(), 1, "local edits survive the conflict");

    // Explicit overwrite wins.
    assert_eq!(second.persist_with(&gateway, SaveMode::Overwrite).await.unwrap(), 2);
    let (stored, _) = gateway.stored(3).unwrap();
    assert_eq!(stored.blocks()[0].type_name(), "cta");
}

#[tokio::test]
async fn test_failed_persist_keeps_list() {
    let gateway = MemoryGateway::failing();
    let (list, _) = three_blocks();
    let mut editor = editing(list);
    editor.add(BlockType::Banners, Some(0));
    let before = editor.sections().clone();

    assert!(editor.persist(&gateway).await.is_err());
    assert_eq!(editor.sections(), &before);
    assert_eq!(editor.version(), 0);
    assert!(editor.has_unsaved_changes());
}
