//! HTML for view mode.
//!
//! Every block renders into a `<section>` container carrying the block id,
//! its type as a class and the block's style overrides as the inline `style`
//! attribute. All text coming from content or collaborators is escaped; only
//! CMS entries of type `html` are inserted raw.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use super::RenderContext;
use crate::{
    builder::{BuilderComponent, BuilderPage, ComponentContent},
    models::{
        content::{
            BannersContent, Card, CardsContent, CtaContent, FeaturesContent, HeadingContent,
            HeroContent, ImageContent, PilgrimagesContent, TextContent,
        },
        BlockContent, BlockType, CmsContentType, ContentBlock, Pilgrimage, PilgrimageFilter,
        StyleMap,
    },
    sections::PageSectionList,
};

/// Renders a page's blocks in order.
pub fn render_sections(sections: &PageSectionList, ctx: &RenderContext) -> String {
    sections
        .iter()
        .map(|block| render_block(block, ctx))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders one block. Blocks of unknown type, or whose stored content does
/// not fit their type, render a placeholder instead of failing.
pub fn render_block(block: &ContentBlock, ctx: &RenderContext) -> String {
    let inner = match block.content() {
        BlockContent::Heading(c) => heading(c, ctx),
        BlockContent::Text(c) => paragraph(c, ctx),
        BlockContent::Image(c) => image(c),
        BlockContent::Hero(c) => hero(c, ctx),
        BlockContent::Cards(c) => cards(c, ctx),
        BlockContent::Features(c) => features(c),
        BlockContent::Banners(c) => banners(c),
        BlockContent::Cta(c) => cta(c, ctx),
        BlockContent::Pilgrimages(c) => pilgrimages(c, ctx),
        BlockContent::Unrecognized { kind, .. } => return unknown(kind),
    };
    container(
        "section",
        &format!("section section-{}", block.type_name()),
        block.id().as_str(),
        block.styles(),
        &inner,
    )
}

fn unknown(kind: &str) -> String {
    if kind.parse::<BlockType>().is_ok() {
        format!(
            r#"<div class="section-unknown">invalid content for section type: {}</div>"#,
            text(kind)
        )
    } else {
        format!(
            r#"<div class="section-unknown">unknown section type: {}</div>"#,
            text(kind)
        )
    }
}

fn container(tag: &str, class: &str, id: &str, styles: &StyleMap, inner: &str) -> String {
    let mut html = format!(r#"<{tag} class="{class}" data-id="{}""#, attr(id));
    if !styles.is_empty() {
        let _ = write!(html, r#" style="{}""#, attr(&styles.to_css()));
    }
    let _ = write!(html, ">{inner}</{tag}>");
    html
}

fn heading(c: &HeadingContent, ctx: &RenderContext) -> String {
    format!(
        r#"<h2 style="font-size: {}px; color: {}; text-align: {}">{}</h2>"#,
        c.size,
        attr(&c.color),
        c.alignment.as_str(),
        text(&ctx.substitute(&c.text))
    )
}

fn paragraph(c: &TextContent, ctx: &RenderContext) -> String {
    let body = text(&ctx.substitute(&c.text)).replace('\n', "<br>");
    format!(
        r#"<p style="font-size: {}px; color: {}; text-align: {}">{body}</p>"#,
        c.size,
        attr(&c.color),
        c.alignment.as_str(),
    )
}

fn image(c: &ImageContent) -> String {
    if c.url.is_empty() {
        return format!(r#"<div class="image-placeholder">{}</div>"#, text(&c.alt));
    }
    let radius = if c.rounded { "; border-radius: 12px" } else { "" };
    let mut html = format!(
        r#"<figure><img src="{}" alt="{}" style="width: {}{radius}">"#,
        attr(&c.url),
        attr(&c.alt),
        attr(&c.width),
    );
    if let Some(caption) = c.caption.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(html, "<figcaption>{}</figcaption>", text(caption));
    }
    html.push_str("</figure>");
    html
}

fn hero(c: &HeroContent, ctx: &RenderContext) -> String {
    let mut style = format!("min-height: {}px", c.height);
    if !c.background_image.is_empty() {
        let _ = write!(style, "; background-image: url('{}')", c.background_image);
    }
    let mut html = format!(
        r#"<div class="hero" style="{}"><div class="hero-overlay" style="opacity: {}"></div><div class="hero-body"><h1>{}</h1>"#,
        attr(&style),
        c.overlay_opacity,
        text(&ctx.substitute(&c.title)),
    );
    if !c.subtitle.is_empty() {
        let _ = write!(html, "<p>{}</p>", text(&ctx.substitute(&c.subtitle)));
    }
    if !c.button_text.is_empty() {
        let _ = write!(
            html,
            r#"<a class="btn" href="{}">{}</a>"#,
            attr(&c.button_link),
            text(&c.button_text)
        );
    }
    html.push_str("</div></div>");
    html
}

fn card(card: &Card) -> String {
    let mut html = String::from(r#"<article class="card">"#);
    if !card.image.is_empty() {
        let _ = write!(html, r#"<img src="{}" alt="{}">"#, attr(&card.image), attr(&card.title));
    }
    let _ = write!(html, "<h3>{}</h3>", text(&card.title));
    if !card.description.is_empty() {
        let _ = write!(html, "<p>{}</p>", text(&card.description));
    }
    if !card.link.is_empty() {
        let _ = write!(html, r#"<a href="{}">Detalii</a>"#, attr(&card.link));
    }
    html.push_str("</article>");
    html
}

fn feed_card(pilgrimage: &Pilgrimage) -> Card {
    Card {
        title: pilgrimage.title.clone(),
        description: format!("{} · {}", pilgrimage.location, pilgrimage.start_date),
        image: pilgrimage.images.first().cloned().unwrap_or_default(),
        link: format!("/pelerinaje/{}", pilgrimage.id),
        ..Card::default()
    }
}

fn cards(c: &CardsContent, ctx: &RenderContext) -> String {
    let columns = c.columns.max(1);
    let items: Vec<Card> = if c.from_feed {
        ctx.pilgrimages()
            .iter()
            .take(columns as usize)
            .map(feed_card)
            .collect()
    } else {
        c.cards.clone()
    };
    let mut html = String::new();
    if !c.title.is_empty() {
        let _ = write!(html, "<h2>{}</h2>", text(&c.title));
    }
    let _ = write!(
        html,
        r#"<div class="cards" style="grid-template-columns: repeat({columns}, 1fr)">"#
    );
    for item in &items {
        html.push_str(&card(item));
    }
    html.push_str("</div>");
    html
}

fn features(c: &FeaturesContent) -> String {
    let mut html = String::new();
    if !c.title.is_empty() {
        let _ = write!(html, "<h2>{}</h2>", text(&c.title));
    }
    html.push_str(r#"<ul class="features">"#);
    for feature in &c.features {
        let _ = write!(
            html,
            r#"<li><span class="icon icon-{}"></span><h3>{}</h3><p>{}</p></li>"#,
            attr(&feature.icon),
            text(&feature.title),
            text(&feature.description)
        );
    }
    html.push_str("</ul>");
    html
}

fn banners(c: &BannersContent) -> String {
    let mut html = format!(r#"<div class="banners" data-autoplay="{}">"#, c.autoplay);
    for banner in &c.banners {
        html.push_str(r#"<div class="banner""#);
        if !banner.image.is_empty() {
            let _ = write!(
                html,
                r#" style="{}""#,
                attr(&format!("background-image: url('{}')", banner.image))
            );
        }
        let _ = write!(html, "><h2>{}</h2>", text(&banner.title));
        if !banner.subtitle.is_empty() {
            let _ = write!(html, "<p>{}</p>", text(&banner.subtitle));
        }
        if !banner.link.is_empty() {
            let _ = write!(html, r#"<a href="{}">Vezi</a>"#, attr(&banner.link));
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

fn cta(c: &CtaContent, ctx: &RenderContext) -> String {
    let style = format!("background-color: {}; color: {}", c.background_color, c.text_color);
    let mut html = format!(
        r#"<div class="cta" style="{}"><h2>{}</h2>"#,
        attr(&style),
        text(&ctx.substitute(&c.title))
    );
    if !c.description.is_empty() {
        let _ = write!(html, "<p>{}</p>", text(&ctx.substitute(&c.description)));
    }
    if !c.button_text.is_empty() {
        let _ = write!(
            html,
            r#"<a class="btn" href="{}">{}</a>"#,
            attr(&c.button_link),
            text(&c.button_text)
        );
    }
    html.push_str("</div>");
    html
}

fn pilgrimages(c: &PilgrimagesContent, ctx: &RenderContext) -> String {
    let filter = PilgrimageFilter {
        location: c.location.clone(),
        featured_only: c.featured_only,
        ..PilgrimageFilter::default()
    };
    let mut html = String::new();
    if !c.title.is_empty() {
        let _ = write!(html, "<h2>{}</h2>", text(&c.title));
    }
    let listed: Vec<&Pilgrimage> = ctx
        .pilgrimages()
        .iter()
        .filter(|p| filter.matches(p))
        .take(c.limit as usize)
        .collect();
    if listed.is_empty() {
        html.push_str(r#"<p class="empty">Nu există pelerinaje disponibile.</p>"#);
        return html;
    }
    html.push_str(r#"<div class="pilgrimages">"#);
    for p in listed {
        let _ = write!(
            html,
            r#"<article class="pilgrimage" data-id="{}"><h3>{}</h3><p class="location">{}</p><p class="dates">{} – {}</p><p class="price">{} {}</p>"#,
            p.id,
            text(&p.title),
            text(&p.location),
            p.start_date,
            p.end_date,
            p.price,
            text(&p.currency)
        );
        if p.is_full() {
            html.push_str(r#"<p class="seats full">Complet</p>"#);
        } else {
            let _ = write!(html, r#"<p class="seats">{} locuri libere</p>"#, p.seats_left());
        }
        html.push_str("</article>");
    }
    html.push_str("</div>");
    html
}

/// Renders a builder page: one container per named section, components in
/// order inside it.
pub fn render_builder_page(page: &BuilderPage, ctx: &RenderContext) -> String {
    let mut html = String::from(r#"<main class="builder-page">"#);
    for section in &page.sections {
        let inner: String = section
            .components
            .iter()
            .map(|c| component(c, ctx))
            .collect();
        html.push_str(&container(
            "section",
            "builder-section",
            section.id.as_str(),
            &section.styles,
            &inner,
        ));
    }
    html.push_str("</main>");
    html
}

fn component(component: &BuilderComponent, ctx: &RenderContext) -> String {
    let inner = match component.content() {
        ComponentContent::Heading { text: t, level } => {
            let level = (*level).clamp(1, 6);
            format!("<h{level}>{}</h{level}>", text(t))
        }
        ComponentContent::Text { text: t } => format!("<p>{}</p>", text(t)),
        ComponentContent::Image { url, alt } => {
            format!(r#"<img src="{}" alt="{}">"#, attr(url), attr(alt))
        }
        ComponentContent::Spacer { height } => {
            format!(r#"<div class="spacer" style="height: {height}px"></div>"#)
        }
        ComponentContent::Button {
            label,
            href,
            variant,
        } => format!(
            r#"<a class="btn btn-{}" href="{}">{}</a>"#,
            attr(variant),
            attr(href),
            text(label)
        ),
        ComponentContent::CmsContent { key } => cms_value(key, ctx),
        ComponentContent::Unrecognized { kind, .. } => {
            return format!(
                r#"<div class="component-unknown">unknown component type: {}</div>"#,
                text(kind)
            );
        }
    };
    container(
        "div",
        &format!("component component-{}", component.content().type_name()),
        component.id().as_str(),
        component.styles(),
        &inner,
    )
}

fn cms_value(key: &str, ctx: &RenderContext) -> String {
    match ctx.cms_entry(key) {
        Some(entry) => match entry.content_type {
            CmsContentType::Text => format!(r#"<span class="cms">{}</span>"#, text(&entry.value)),
            CmsContentType::Html => format!(r#"<div class="cms">{}</div>"#, entry.value),
            CmsContentType::Image => format!(
                r#"<img class="cms" src="{}" alt="{}">"#,
                attr(&entry.value),
                attr(entry.description.as_deref().unwrap_or(key))
            ),
        },
        None => format!(r#"<span class="cms-missing">{}</span>"#, text(key)),
    }
}
