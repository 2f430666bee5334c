//! Tests for the site service layer.

use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::{
    gateway::ImageUploader,
    models::{BlockContent, BlockType},
    params::{
        AddBuilderSection, AddComponent, AddPilgrimage, AddSection, CmsKey, CreateBuilderPage,
        CreatePage, FieldValue, Id, ListCms, ListPilgrimages, MoveDirection, RenamePage,
        ReorderSection, SectionRef, SetCms, StepSection, UpdateSectionContent,
        UpdateSectionStyles, UploadImage,
    },
};

async fn create_test_site() -> (TempDir, Site) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let site = SiteBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .await
        .expect("Failed to create site");
    (temp_dir, site)
}

async fn page_with(site: &Site, types: &[&str]) -> (u64, Vec<String>) {
    let page = site
        .create_page(&CreatePage {
            title: "Acasă".to_string(),
            slug: None,
        })
        .await
        .unwrap();
    let mut ids = Vec::new();
    for kind in types {
        let added = site
            .add_section(&AddSection {
                page_id: page.id,
                block_type: kind.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        ids.push(added.value.id().as_str().to_string());
    }
    (page.id, ids)
}

fn section(page_id: u64, id: &str) -> SectionRef {
    SectionRef {
        page_id,
        section_id: id.to_string(),
        expected_version: None,
    }
}

#[tokio::test]
async fn test_builder_uses_upload_dir_beside_database() {
    let (temp_dir, site) = create_test_site().await;
    assert_eq!(site.upload_dir(), temp_dir.path().join("uploads"));
    assert_eq!(site.database_path(), temp_dir.path().join("test.db"));
}

#[tokio::test]
async fn test_new_page_loads_empty_list() {
    let (_temp_dir, site) = create_test_site().await;
    let (page_id, _) = page_with(&site, &[]).await;

    let loaded = site.load(page_id).await.unwrap();
    assert!(loaded.sections.is_empty());
    assert_eq!(loaded.version, 0);

    let missing = site.load(999).await.unwrap_err();
    assert!(matches!(missing, SiteError::PageNotFound { id: 999 }));
}

#[tokio::test]
async fn test_section_commands_bump_version() {
    let (_temp_dir, site) = create_test_site().await;
    let (page_id, ids) = page_with(&site, &["heading", "text", "image"]).await;

    let loaded = site.load(page_id).await.unwrap();
    assert_eq!(loaded.version, 3);
    let order: Vec<&str> = loaded.sections.iter().map(|b| b.id().as_str()).collect();
    assert_eq!(order, ids.iter().map(String::as_str).collect::<Vec<_>>());

    let moved = site
        .move_section(&StepSection {
            page_id,
            section_id: ids[2].clone(),
            direction: MoveDirection::Up,
            expected_version: Some(3),
        })
        .await
        .unwrap();
    assert!(moved.value);
    assert_eq!(moved.version, 4);

    let loaded = site.load(page_id).await.unwrap();
    assert_eq!(loaded.sections.blocks()[1].id().as_str(), ids[2]);
}

#[tokio::test]
async fn test_boundary_move_skips_save() {
    let (_temp_dir, site) = create_test_site().await;
    let (page_id, ids) = page_with(&site, &["heading", "text"]).await;

    let moved = site
        .move_section(&StepSection {
            page_id,
            section_id: ids[0].clone(),
            direction: MoveDirection::Up,
            expected_version: None,
        })
        .await
        .unwrap();
    assert!(!moved.value);
    assert!(!moved.saved);
    assert_eq!(moved.version, 2);
}

#[tokio::test]
async fn test_unknown_section_is_reported() {
    let (_temp_dir, site) = create_test_site().await;
    let (page_id, _) = page_with(&site, &["heading"]).await;

    let err = site.remove_section(&section(page_id, "gone")).await.unwrap_err();
    assert!(matches!(err, SiteError::SectionNotFound { ref id } if id == "gone"));
    assert_eq!(site.load(page_id).await.unwrap().version, 1);

    let err = site
        .add_section(&AddSection {
            page_id,
            block_type: "video".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SiteError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_stale_expected_version_conflicts() {
    let (_temp_dir, site) = create_test_site().await;
    let (page_id, ids) = page_with(&site, &["heading", "text"]).await;

    let err = site
        .duplicate_section(&SectionRef {
            page_id,
            section_id: ids[0].clone(),
            expected_version: Some(1),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SiteError::VersionConflict {
            expected: 1,
            actual: 2,
            ..
        }
    ));
    assert_eq!(site.load(page_id).await.unwrap().sections.len(), 2);
}

#[tokio::test]
async fn test_duplicate_and_reorder() {
    let (_temp_dir, site) = create_test_site().await;
    let (page_id, ids) = page_with(&site, &["heading", "text", "cta"]).await;

    let copy = site.duplicate_section(&section(page_id, &ids[0])).await.unwrap();
    assert_ne!(copy.value.id().as_str(), ids[0]);
    assert_eq!(copy.value.block_type(), Some(BlockType::Heading));

    let index = site
        .reorder_section(&ReorderSection {
            page_id,
            section_id: ids[0].clone(),
            target_index: 10,
            expected_version: None,
        })
        .await
        .unwrap();
    assert_eq!(index.value, 3);

    let loaded = site.load(page_id).await.unwrap();
    assert_eq!(loaded.sections.blocks()[0].id(), copy.value.id());
    assert_eq!(loaded.sections.blocks()[3].id().as_str(), ids[0]);
}

#[tokio::test]
async fn test_update_content_keeps_type() {
    let (_temp_dir, site) = create_test_site().await;
    let (page_id, ids) = page_with(&site, &["heading"]).await;

    let updated = site
        .update_section_content(&UpdateSectionContent {
            page_id,
            section_id: ids[0].clone(),
            content: Some(json!({"text": "Mănăstirile din Bucovina", "size": 32})),
            fields: vec!["alignment=center".parse::<FieldValue>().unwrap()],
            expected_version: None,
        })
        .await
        .unwrap();
    match updated.value.content() {
        BlockContent::Heading(heading) => {
            assert_eq!(heading.text, "Mănăstirile din Bucovina");
            assert_eq!(heading.size, 32);
            assert_eq!(heading.alignment.as_str(), "center");
        }
        other => panic!("expected heading content, got {other:?}"),
    }

    let err = site
        .update_section_content(&UpdateSectionContent {
            page_id,
            section_id: ids[0].clone(),
            content: Some(json!({"size": "huge"})),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SiteError::InvalidInput { .. }));

    let err = site
        .update_section_content(&UpdateSectionContent {
            page_id,
            section_id: ids[0].clone(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SiteError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_update_styles_merges() {
    let (_temp_dir, site) = create_test_site().await;
    let (page_id, ids) = page_with(&site, &["text"]).await;

    let styles = |value: serde_json::Value| UpdateSectionStyles {
        page_id,
        section_id: ids[0].clone(),
        styles: value.as_object().cloned().unwrap_or_default(),
        expected_version: None,
    };
    site.update_section_styles(&styles(json!({"padding": "20px", "color": "#333"})))
        .await
        .unwrap();
    let updated = site
        .update_section_styles(&styles(json!({"color": null, "margin": "0"})))
        .await
        .unwrap();

    let css = updated.value.styles();
    assert_eq!(css.get("padding"), Some(&json!("20px")));
    assert_eq!(css.get("margin"), Some(&json!("0")));
    assert_eq!(css.get("color"), None);
}

#[tokio::test]
async fn test_page_slugs() {
    let (_temp_dir, site) = create_test_site().await;
    let page = site
        .create_page(&CreatePage {
            title: "Despre Noi".to_string(),
            slug: None,
        })
        .await
        .unwrap();
    assert_eq!(page.slug, "despre-noi");

    let err = site
        .create_page(&CreatePage {
            title: "Despre noi".to_string(),
            slug: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SiteError::SlugTaken { .. }));

    let (renamed, changes) = site
        .rename_page(&RenamePage {
            id: page.id,
            title: Some("Cine suntem".to_string()),
            slug: Some("cine-suntem".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(renamed.slug, "cine-suntem");
    assert_eq!(changes.len(), 2);
    assert!(site.get_page_by_slug("/cine-suntem/").await.unwrap().is_some());

    let deleted = site.delete_page(&Id { id: page.id }).await.unwrap();
    assert_eq!(deleted.title, "Cine suntem");
    assert!(site.list_pages().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cms_cache_follows_writes() {
    let (_temp_dir, site) = create_test_site().await;
    let key = CmsKey {
        key: "footer_contact_email".to_string(),
    };
    assert!(site.cms_get(&key).await.unwrap().is_none());
    assert_eq!(
        site.cms_text("footer_contact_email", "contact@pelerin.ro")
            .await
            .unwrap(),
        "contact@pelerin.ro"
    );
    assert!(site
        .cms_list(&ListCms {
            prefix: Some("footer_".to_string())
        })
        .await
        .unwrap()
        .is_empty());

    let (entry, previous) = site
        .cms_set(&SetCms {
            key: key.key.clone(),
            value: "office@pelerin.ro".to_string(),
            content_type: None,
            description: Some("Footer e-mail".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(entry.value, "office@pelerin.ro");
    assert_eq!(previous, None);

    // Both the cached miss and the cached empty listing were dropped.
    assert_eq!(
        site.cms_get(&key).await.unwrap().map(|e| e.value),
        Some("office@pelerin.ro".to_string())
    );
    let listed = site
        .cms_list(&ListCms {
            prefix: Some("footer_".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    assert_eq!(
        site.substitute("Scrie-ne: {{footer_contact_email}} {{nope}}")
            .await
            .unwrap(),
        "Scrie-ne: office@pelerin.ro {{nope}}"
    );

    site.cms_delete(&key).await.unwrap();
    assert!(site.cms_get(&key).await.unwrap().is_none());
    assert!(matches!(
        site.cms_delete(&key).await.unwrap_err(),
        SiteError::CmsKeyNotFound { .. }
    ));
}

#[tokio::test]
async fn test_cms_read_racing_a_write_is_not_cached() {
    let (_temp_dir, site) = create_test_site().await;
    let set = |value: &str| SetCms {
        key: "footer_phone".to_string(),
        value: value.to_string(),
        content_type: None,
        description: None,
    };
    site.cms_set(&set("0722 000 000")).await.unwrap();

    // A reader misses the cache and reads the old row...
    let seen = site.cms_cache.generation().await;
    let old = site
        .with_db(|db| db.get_cms("footer_phone"))
        .await
        .unwrap();

    // ...while another request saves a new value.
    site.cms_set(&set("0744 111 111")).await.unwrap();

    assert!(!site.cms_cache.store_entry("footer_phone", old, seen).await);
    assert_eq!(
        site.cms_text("footer_phone", "").await.unwrap(),
        "0744 111 111"
    );
}

#[tokio::test]
async fn test_cms_rejects_bad_input() {
    let (_temp_dir, site) = create_test_site().await;
    let bad_key = site
        .cms_set(&SetCms {
            key: "footer email".to_string(),
            value: "x".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(bad_key, Err(SiteError::InvalidInput { .. })));

    let bad_type = site
        .cms_set(&SetCms {
            key: "footer_email".to_string(),
            value: "x".to_string(),
            content_type: Some("video".to_string()),
            description: None,
        })
        .await;
    assert!(matches!(bad_type, Err(SiteError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_pilgrimage_feed_and_render() {
    let (_temp_dir, site) = create_test_site().await;
    for (title, location, start, featured) in [
        ("Putna", "Suceava", "2025-08-10", true),
        ("Athos", "Grecia", "2025-06-02", false),
    ] {
        site.add_pilgrimage(&AddPilgrimage {
            title: title.to_string(),
            location: location.to_string(),
            start_date: start.to_string(),
            end_date: start.to_string(),
            price: 900,
            capacity: 30,
            featured,
            ..Default::default()
        })
        .await
        .unwrap();
    }

    let all = site
        .list_pilgrimages(&ListPilgrimages::default())
        .await
        .unwrap();
    let titles: Vec<&str> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Athos", "Putna"]);

    let featured = site
        .list_pilgrimages(&ListPilgrimages {
            featured_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].currency, "RON");

    let (page_id, _) = page_with(&site, &["pilgrimages"]).await;
    let html = site.render_page(&Id { id: page_id }).await.unwrap();
    assert!(html.contains("Putna"));

    assert!(matches!(
        site.get_pilgrimage(&Id { id: 42 }).await.unwrap_err(),
        SiteError::PilgrimageNotFound { id: 42 }
    ));
}

#[tokio::test]
async fn test_render_substitutes_cms_placeholders() {
    let (_temp_dir, site) = create_test_site().await;
    site.cms_set(&SetCms {
        key: "site_name".to_string(),
        value: "Pelerin & Co".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();
    let (page_id, ids) = page_with(&site, &["heading"]).await;
    site.update_section_content(&UpdateSectionContent {
        page_id,
        section_id: ids[0].clone(),
        fields: vec!["text=Bun venit la {{site_name}}".parse().unwrap()],
        ..Default::default()
    })
    .await
    .unwrap();

    let html = site.render_page(&Id { id: page_id }).await.unwrap();
    assert!(html.contains("Bun venit la Pelerin &amp; Co"));
    assert!(site.render_slug("acasa").await.unwrap().is_some());
    assert!(site.render_slug("lipsa").await.unwrap().is_none());
}

struct FixedUploader;

impl ImageUploader for FixedUploader {
    async fn upload(&self, _file_name: &str, _bytes: &[u8]) -> Result<String> {
        Ok("/uploads/fixed.png".to_string())
    }

    async fn discard(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_upload_sets_image_url() {
    let (temp_dir, site) = create_test_site().await;
    let (page_id, ids) = page_with(&site, &["image", "text"]).await;

    let stored = site
        .upload_image(
            &UploadImage {
                page_id,
                section_id: ids[0].clone(),
                file_name: "putna.png".to_string(),
                expected_version: None,
            },
            b"\x89PNG",
        )
        .await
        .unwrap();
    let BlockContent::Image(image) = stored.value.content() else {
        panic!("expected image content");
    };
    assert!(image.url.starts_with("/uploads/"));
    assert_eq!(
        std::fs::read_dir(temp_dir.path().join("uploads")).unwrap().count(),
        1
    );

    let fixed = site
        .upload_image_with(
            &FixedUploader,
            &UploadImage {
                page_id,
                section_id: ids[0].clone(),
                file_name: "any.png".to_string(),
                expected_version: None,
            },
            b"x",
        )
        .await
        .unwrap();
    assert!(matches!(
        fixed.value.content(),
        BlockContent::Image(image) if image.url == "/uploads/fixed.png"
    ));

    let err = site
        .upload_image_with(
            &FixedUploader,
            &UploadImage {
                page_id,
                section_id: ids[1].clone(),
                file_name: "any.png".to_string(),
                expected_version: None,
            },
            b"x",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SiteError::Upload { .. }));
}

#[tokio::test]
async fn test_failed_upload_save_leaves_no_file() {
    let (temp_dir, site) = create_test_site().await;
    let (page_id, ids) = page_with(&site, &["image", "hero"]).await;

    let err = site
        .upload_image(
            &UploadImage {
                page_id,
                section_id: ids[1].clone(),
                file_name: "voronet.jpg".to_string(),
                expected_version: Some(0),
            },
            b"\xff\xd8\xff",
        )
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    let uploads = temp_dir.path().join("uploads");
    assert_eq!(std::fs::read_dir(uploads).unwrap().count(), 0);

    let loaded = site.load(page_id).await.unwrap();
    assert!(matches!(
        loaded.sections.blocks()[1].content(),
        BlockContent::Hero(hero) if hero.background_image.is_empty()
    ));
}

#[tokio::test]
async fn test_builder_pages() {
    let (_temp_dir, site) = create_test_site().await;
    site.cms_set(&SetCms {
        key: "hero_title".to_string(),
        value: "Drumuri sfinte".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();

    let page = site
        .create_builder_page(&CreateBuilderPage {
            title: "Landing".to_string(),
            slug: None,
        })
        .await
        .unwrap();
    let section_id = site
        .add_builder_section(&AddBuilderSection {
            page_id: page.id,
            name: "Intro".to_string(),
            position: None,
        })
        .await
        .unwrap();
    assert_eq!(section_id.version, 1);

    site.add_component(&AddComponent {
        page_id: page.id,
        section_id: section_id.value.as_str().to_string(),
        component_type: "cms".to_string(),
        position: None,
        content: Some(json!({"key": "hero_title"})),
    })
    .await
    .unwrap();

    let html = site.render_builder_page(&Id { id: page.id }).await.unwrap();
    assert!(html.contains("Drumuri sfinte"));

    let err = site
        .add_component(&AddComponent {
            page_id: page.id,
            section_id: "nope".to_string(),
            component_type: "text".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SiteError::SectionNotFound { .. }));

    let stored = site.require_builder_page(&Id { id: page.id }).await.unwrap();
    assert_eq!(stored.version, 2);
    let err = site
        .save_builder_page(&stored, SaveMode::Expect(1))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    assert_eq!(site.list_builder_pages().await.unwrap().len(), 1);
    site.delete_builder_page(&Id { id: page.id }).await.unwrap();
    assert!(site.get_builder_page(&Id { id: page.id }).await.unwrap().is_none());
}
