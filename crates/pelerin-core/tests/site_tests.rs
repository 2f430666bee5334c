mod common;

use pelerin_core::{
    params::{AddSection, CreatePage, FieldValue, Id, SetCms, UpdateSectionContent},
    BlockType, CurrentUser, EditorMode, PageSectionList, PersistenceGateway, Role, SaveMode,
    SectionEditor, SiteError,
};
use serde_json::json;

use common::create_test_site;

#[tokio::test]
async fn test_editor_session_against_site() {
    let (_temp_dir, site) = create_test_site().await;
    let page = site
        .create_page(&CreatePage {
            title: "Pelerinaje".to_string(),
            slug: None,
        })
        .await
        .expect("Failed to create page");

    let mut editor = SectionEditor::load(&site, page.id)
        .await
        .expect("Failed to load editor");
    assert_eq!(editor.mode(), EditorMode::View);
    assert!(editor.sections().is_empty());

    let operator = CurrentUser::new("ana", Role::Operator);
    assert!(editor.enter_edit_mode(&operator));

    let hero = editor.add(BlockType::Hero, None).expect("edit mode");
    let listing = editor.add(BlockType::Pilgrimages, None).expect("edit mode");
    let heading = editor
        .add_before(&listing, BlockType::Heading)
        .expect("edit mode");
    editor.move_up(&heading);
    assert_eq!(editor.sections().index_of(&heading), Some(0));
    assert_eq!(editor.sections().index_of(&hero), Some(1));

    editor.open(&heading);
    editor
        .set_field(&heading, "text", "Pelerinaje 2025")
        .expect("Failed to set field");
    editor.save(&heading);
    assert!(editor.has_unsaved_changes());

    let version = editor.persist(&site).await.expect("Failed to persist");
    assert_eq!(version, 1);
    assert!(!editor.has_unsaved_changes());

    // What was persisted is exactly what the editor holds.
    let loaded = site.load(page.id).await.unwrap();
    assert_eq!(&loaded.sections, editor.sections());

    let html = site.render_page(&Id { id: page.id }).await.unwrap();
    assert!(html.contains("Pelerinaje 2025"));
    assert!(html.contains("Nu există pelerinaje disponibile."));
}

#[tokio::test]
async fn test_concurrent_editors_conflict() {
    let (_temp_dir, site) = create_test_site().await;
    let page = site
        .create_page(&CreatePage {
            title: "Contact".to_string(),
            slug: None,
        })
        .await
        .unwrap();

    let admin = CurrentUser::new("admin", Role::Admin);
    let mut first = SectionEditor::load(&site, page.id).await.unwrap();
    let mut second = SectionEditor::load(&site, page.id).await.unwrap();
    first.enter_edit_mode(&admin);
    second.enter_edit_mode(&admin);

    first.add(BlockType::Text, None);
    second.add(BlockType::Cta, None);

    first.persist(&site).await.expect("first save wins");
    let err = second.persist(&site).await.unwrap_err();
    assert!(matches!(err, SiteError::VersionConflict { .. }));

    // The rejected save left the first editor's list in place.
    let stored = site.load(page.id).await.unwrap();
    assert_eq!(&stored.sections, first.sections());

    // Explicit last-write-wins is still available.
    second
        .persist_with(&site, SaveMode::Overwrite)
        .await
        .expect("overwrite");
    let stored = site.load(page.id).await.unwrap();
    assert_eq!(stored.sections.blocks()[0].block_type(), Some(BlockType::Cta));
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn test_editing_one_section_keeps_others_as_stored() {
    let (_temp_dir, site) = create_test_site().await;
    let page = site
        .create_page(&CreatePage {
            title: "Acasă".to_string(),
            slug: None,
        })
        .await
        .unwrap();

    let heading = json!({
        "id": "h",
        "type": "heading",
        "content": {"text": "Bun venit", "size": 30, "color": "#111", "alignment": "center", "fontWeight": "bold"},
        "styles": {}
    });
    let legacy = json!({
        "id": "l",
        "type": "heading",
        "content": {"text": "Vechi", "size": "32"},
        "styles": {}
    });
    let text = json!({"id": "t", "type": "text", "content": {"text": "Despre noi"}, "styles": {}});
    let list: PageSectionList =
        serde_json::from_value(json!([heading.clone(), legacy.clone(), text])).unwrap();
    site.save(page.id, &list, SaveMode::Expect(0)).await.unwrap();

    let edited = site
        .update_section_content(&UpdateSectionContent {
            page_id: page.id,
            section_id: "t".to_string(),
            fields: vec![FieldValue {
                name: "text".to_string(),
                value: "Cine suntem".to_string(),
            }],
            ..Default::default()
        })
        .await
        .expect("Failed to update text section");
    assert_eq!(edited.version, 2);

    let stored = serde_json::to_value(&site.load(page.id).await.unwrap().sections).unwrap();
    assert_eq!(stored[0], heading);
    assert_eq!(stored[1], legacy);
    assert_eq!(stored[2]["content"]["text"], "Cine suntem");

    // The legacy heading is still a heading and can be edited.
    let edited = site
        .update_section_content(&UpdateSectionContent {
            page_id: page.id,
            section_id: "l".to_string(),
            fields: vec![FieldValue {
                name: "size".to_string(),
                value: "40".to_string(),
            }],
            ..Default::default()
        })
        .await
        .expect("Failed to update legacy heading");
    assert_eq!(edited.value.block_type(), Some(BlockType::Heading));
    assert_eq!(edited.value.content().to_value()["size"], 40);
}

#[tokio::test]
async fn test_service_and_editor_share_versions() {
    let (_temp_dir, site) = create_test_site().await;
    let page = site
        .create_page(&CreatePage {
            title: "Despre".to_string(),
            slug: None,
        })
        .await
        .unwrap();

    let mut editor = SectionEditor::load(&site, page.id).await.unwrap();
    editor.enter_edit_mode(&CurrentUser::new("admin", Role::Admin));

    site.add_section(&AddSection {
        page_id: page.id,
        block_type: "text".to_string(),
        position: None,
        expected_version: Some(0),
    })
    .await
    .unwrap();

    editor.add(BlockType::Image, None);
    assert!(editor.persist(&site).await.unwrap_err().is_conflict());

    let mut fresh = SectionEditor::load(&site, page.id).await.unwrap();
    assert_eq!(fresh.version(), 1);
    assert_eq!(fresh.sections().len(), 1);
    fresh.enter_edit_mode(&CurrentUser::new("admin", Role::Admin));
    fresh.add(BlockType::Image, None);
    assert_eq!(fresh.persist(&site).await.unwrap(), 2);
}

#[tokio::test]
async fn test_plain_user_cannot_edit() {
    let (_temp_dir, site) = create_test_site().await;
    let page = site
        .create_page(&CreatePage {
            title: "Acasă".to_string(),
            slug: None,
        })
        .await
        .unwrap();

    let mut editor = SectionEditor::load(&site, page.id).await.unwrap();
    assert!(!editor.enter_edit_mode(&CurrentUser::new("vizitator", Role::User)));
    assert!(editor.add(BlockType::Heading, None).is_none());
    assert!(editor.all_controls().is_empty());
}

#[tokio::test]
async fn test_footer_text_from_cms() {
    let (_temp_dir, site) = create_test_site().await;
    assert_eq!(
        site.cms_text("footer_contact_email", "contact@pelerin.ro")
            .await
            .unwrap(),
        "contact@pelerin.ro"
    );

    site.cms_set(&SetCms {
        key: "footer_contact_email".to_string(),
        value: "office@pelerin.ro".to_string(),
        content_type: Some("text".to_string()),
        description: None,
    })
    .await
    .unwrap();

    assert_eq!(
        site.cms_text("footer_contact_email", "contact@pelerin.ro")
            .await
            .unwrap(),
        "office@pelerin.ro"
    );
}
