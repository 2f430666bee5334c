use jiff::Timestamp;
use serde_json::json;

use super::*;

fn empty_page() -> BuilderPage {
    BuilderPage {
        id: 1,
        title: "Acasă".to_string(),
        slug: "acasa".to_string(),
        sections: Vec::new(),
        version: 0,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

#[test]
fn test_component_type_parsing() {
    assert_eq!("cms".parse::<ComponentType>(), Ok(ComponentType::CmsContent));
    assert_eq!("cmsContent".parse::<ComponentType>(), Ok(ComponentType::CmsContent));
    assert_eq!("Spacer".parse::<ComponentType>(), Ok(ComponentType::Spacer));
    assert!("video".parse::<ComponentType>().is_err());
}

#[test]
fn test_sections_and_components_keep_order() {
    let mut page = empty_page();
    let top = page.add_section("Antet", None);
    let bottom = page.add_section("Subsol", None);
    let middle = page.add_section("Conținut", Some(1));
    let order: Vec<_> = page.sections.iter().map(|s| s.id.clone()).collect();
    assert_eq!(order, vec![top.clone(), middle, bottom.clone()]);

    assert!(!page.move_section(&top, Direction::Up));
    assert!(page.move_section(&bottom, Direction::Up));
    assert_eq!(page.sections[1].id, bottom);

    let section = page.section_mut(&top).unwrap();
    let title = section.add_component(ComponentType::Heading, None);
    let spacer = section.add_component(ComponentType::Spacer, Some(0));
    assert_eq!(section.components[0].id(), &spacer);
    assert!(section.move_component(&spacer, Direction::Down));
    assert_eq!(section.components[0].id(), &title);
}

#[test]
fn test_component_defaults() {
    let mut section = BuilderSection::new("Test");
    let id = section.add_component(ComponentType::Spacer, None);
    assert_eq!(
        section.component(&id).unwrap().content(),
        &ComponentContent::Spacer { height: 40 }
    );
}

#[test]
fn test_update_component_keeps_type() {
    let mut section = BuilderSection::new("Test");
    let id = section.add_component(ComponentType::Text, None);

    assert!(!section.update_component(&id, ComponentContent::Spacer { height: 10 }));
    assert!(section.update_component(
        &id,
        ComponentContent::Text {
            text: "Program".to_string()
        }
    ));
    assert_eq!(section.component(&id).unwrap().content().to_value(), json!({"text": "Program"}));
}

#[test]
fn test_component_styles_merge() {
    let mut section = BuilderSection::new("Test");
    let id = section.add_component(ComponentType::Button, None);
    let mut first = StyleMap::new();
    first.set("padding", 8);
    first.set("color", "white");
    let mut second = StyleMap::new();
    second.set("padding", 12);

    assert!(section.update_component_styles(&id, &first));
    assert!(section.update_component_styles(&id, &second));
    let styles = section.component(&id).unwrap().styles();
    assert_eq!(styles.get("padding"), Some(&json!(12)));
    assert_eq!(styles.get("color"), Some(&json!("white")));
}

#[test]
fn test_duplicate_section_is_deep() {
    let mut page = empty_page();
    let source = page.add_section("Oferte", None);
    let component = page
        .section_mut(&source)
        .unwrap()
        .add_component(ComponentType::Heading, None);

    let copy = page.duplicate_section(&source).unwrap();
    assert_eq!(page.sections[1].id, copy);
    assert_eq!(page.sections[1].name, "Oferte");

    let copied_component = page.sections[1].components[0].id().clone();
    assert_ne!(copied_component, component);

    page.section_mut(&copy).unwrap().update_component(
        &copied_component,
        ComponentContent::Heading {
            text: "Copie".to_string(),
            level: 3,
        },
    );
    let (_, original) = page.find_component(&component).unwrap();
    assert_eq!(original.content().to_value()["text"], json!("Titlu Nou"));
}

#[test]
fn test_rename_and_remove_section() {
    let mut page = empty_page();
    let id = page.add_section("Vechi", None);
    assert!(page.rename_section(&id, "Nou"));
    assert_eq!(page.section(&id).unwrap().name, "Nou");
    assert!(!page.rename_section(&BlockId::from("x"), "Nimic"));

    assert!(page.remove_section(&id).is_some());
    assert!(page.remove_section(&id).is_none());
}

#[test]
fn test_cms_keys_in_page_order() {
    let mut page = empty_page();
    let first = page.add_section("A", None);
    let second = page.add_section("B", None);
    for (section, key) in [(&second, "footer_email"), (&first, "hero_title")] {
        let section = page.section_mut(section).unwrap();
        let id = section.add_component(ComponentType::CmsContent, None);
        section.update_component(&id, ComponentContent::CmsContent { key: key.to_string() });
    }
    page.section_mut(&first)
        .unwrap()
        .add_component(ComponentType::CmsContent, None);

    assert_eq!(page.cms_keys(), vec!["hero_title", "footer_email"]);
}

#[test]
fn test_stored_shape_round_trips_unknown_components() {
    let stored = json!({
        "id": "s1",
        "name": "Galerie",
        "components": [
            {"id": "c1", "type": "heading", "content": {"text": "Sus"}},
            {"id": "c2", "type": "video", "content": {"src": "a.mp4"}, "styles": {}}
        ]
    });
    let section: BuilderSection = serde_json::from_value(stored).unwrap();
    assert_eq!(
        section.components[0].content(),
        &ComponentContent::Heading {
            text: "Sus".to_string(),
            level: 2
        }
    );
    assert_eq!(section.components[1].content().type_name(), "video");

    let saved = serde_json::to_value(&section).unwrap();
    assert_eq!(
        saved["components"][1],
        json!({"id": "c2", "type": "video", "content": {"src": "a.mp4"}, "styles": {}})
    );
}

#[test]
fn test_hydration_repairs_duplicate_ids() {
    let section: BuilderSection = serde_json::from_value(json!({
        "id": "s1",
        "name": "Antet",
        "components": [
            {"id": "c1", "type": "heading", "content": {"text": "Sus"}},
            {"id": "c1", "type": "spacer", "content": {}}
        ]
    }))
    .unwrap();
    assert_eq!(section.components[0].id().as_str(), "c1");
    assert_ne!(section.components[1].id().as_str(), "c1");
    assert_eq!(section.components[1].content().type_name(), "spacer");

    let page: BuilderPage = serde_json::from_value(json!({
        "id": 1,
        "title": "Acasă",
        "slug": "acasa",
        "sections": [
            {"id": "s1", "name": "A", "components": [{"id": "c1", "type": "spacer", "content": {}}]},
            {"id": "s1", "name": "B", "components": [{"id": "c1", "type": "spacer", "content": {}}]}
        ],
        "version": 3,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(page.sections[0].id.as_str(), "s1");
    assert_ne!(page.sections[1].id.as_str(), "s1");
    assert_eq!(page.sections[1].name, "B");

    let first = page.sections[0].components[0].id().clone();
    let second = page.sections[1].components[0].id().clone();
    assert_eq!(first.as_str(), "c1");
    assert_ne!(first, second);
    assert_eq!(page.find_component(&second).unwrap().0.name, "B");
}
