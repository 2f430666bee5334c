//! Command handlers: run one parsed command against the [`Site`] and print
//! its markdown output through the [`TerminalRenderer`].

use std::fmt::Display;

use anyhow::{bail, Context, Result};
use log::debug;
use pelerin_core::{
    params::{Id, ListPilgrimages, MoveDirection},
    CmsEntries, ContentBlock, CreateResult, CurrentUser, DeleteResult, Edited, OperationStatus,
    PageSummaries, Pilgrimages, Site, UpdateResult,
};

use crate::{
    cli::{
        BuilderCommands, CmsCommands, PageCommands, PilgrimageCommands, RenderPageArgs,
        SectionCommands, SectionRefArgs, UploadArgs,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    site: Site,
    renderer: TerminalRenderer,
    user: CurrentUser,
}

impl Cli {
    pub fn new(site: Site, renderer: TerminalRenderer, user: CurrentUser) -> Self {
        Self {
            site,
            renderer,
            user,
        }
    }

    fn print(&self, output: impl Display) -> Result<()> {
        self.renderer.render(&output.to_string())
    }

    fn require_page_editor(&self) -> Result<()> {
        if !self.user.role.can_edit_pages() {
            bail!("The '{}' role cannot edit pages", self.user.role);
        }
        Ok(())
    }

    fn require_cms_editor(&self) -> Result<()> {
        if !self.user.role.can_edit_cms() {
            bail!("The '{}' role cannot edit CMS content", self.user.role);
        }
        Ok(())
    }

    /// Prints a section command's message, the resulting block and the
    /// page version it left behind.
    fn print_section(&self, message: String, edited: &Edited<ContentBlock>) -> Result<()> {
        let status = if edited.saved {
            OperationStatus::success(message)
        } else {
            OperationStatus::unchanged(message)
        };
        self.print(format!(
            "{status}\n{}\n\nPage version: {}\n",
            edited.value, edited.version
        ))
    }

    pub async fn list_pages(&self) -> Result<()> {
        let pages = self.site.list_pages().await.context("Failed to list pages")?;
        self.print(PageSummaries(pages))
    }

    pub async fn handle_page_command(&self, command: PageCommands) -> Result<()> {
        match command {
            PageCommands::Create(args) => {
                self.require_page_editor()?;
                let page = self
                    .site
                    .create_page(&args.into())
                    .await
                    .context("Failed to create page")?;
                self.print(CreateResult::new(page))
            }
            PageCommands::List => self.list_pages().await,
            PageCommands::Show(args) => {
                let page = self
                    .site
                    .require_page(&args.into())
                    .await
                    .context("Failed to show page")?;
                self.print(page)
            }
            PageCommands::Render(args) => self.render_page(args).await,
            PageCommands::Rename(args) => {
                self.require_page_editor()?;
                let (page, changes) = self
                    .site
                    .rename_page(&args.into())
                    .await
                    .context("Failed to rename page")?;
                self.print(UpdateResult::with_changes(page, changes))
            }
            PageCommands::Delete(args) => {
                self.require_page_editor()?;
                let page = self
                    .site
                    .delete_page(&args.into())
                    .await
                    .context("Failed to delete page")?;
                self.print(DeleteResult::new(page))
            }
        }
    }

    /// HTML goes to stdout as is, never through the markdown renderer.
    async fn render_page(&self, args: RenderPageArgs) -> Result<()> {
        let html = match args.page.parse::<u64>() {
            Ok(id) => self
                .site
                .render_page(&Id { id })
                .await
                .context("Failed to render page")?,
            Err(_) => match self
                .site
                .render_slug(&args.page)
                .await
                .context("Failed to render page")?
            {
                Some(html) => html,
                None => bail!("No page with slug '{}'", args.page),
            },
        };
        println!("{html}");
        Ok(())
    }

    pub async fn handle_section_command(&self, command: SectionCommands) -> Result<()> {
        self.require_page_editor()?;
        debug!("Section command as {}", self.user.name);

        match command {
            SectionCommands::Add(args) => {
                let edited = self
                    .site
                    .add_section(&args.into())
                    .await
                    .context("Failed to add section")?;
                self.print_section(
                    format!("Added section `{}`", edited.value.id().as_str()),
                    &edited,
                )
            }
            SectionCommands::Remove(args) => {
                let edited = self
                    .site
                    .remove_section(&args.into())
                    .await
                    .context("Failed to remove section")?;
                self.print(format!(
                    "{}\nPage version: {}\n",
                    DeleteResult::new(edited.value),
                    edited.version
                ))
            }
            SectionCommands::Up(args) => self.step_section(args, MoveDirection::Up).await,
            SectionCommands::Down(args) => self.step_section(args, MoveDirection::Down).await,
            SectionCommands::Move(args) => {
                let section_id = args.section_id.clone();
                let edited = self
                    .site
                    .reorder_section(&args.into())
                    .await
                    .context("Failed to move section")?;
                let message = format!("Section `{section_id}` is at position {}", edited.value);
                let status = if edited.saved {
                    OperationStatus::success(message)
                } else {
                    OperationStatus::unchanged(message)
                };
                self.print(format!("{status}\nPage version: {}\n", edited.version))
            }
            SectionCommands::Duplicate(args) => {
                let source = args.section_id.clone();
                let edited = self
                    .site
                    .duplicate_section(&args.into())
                    .await
                    .context("Failed to duplicate section")?;
                self.print_section(
                    format!(
                        "Duplicated `{source}` as `{}`",
                        edited.value.id().as_str()
                    ),
                    &edited,
                )
            }
            SectionCommands::SetContent(args) => {
                let edited = self
                    .site
                    .update_section_content(&args.into())
                    .await
                    .context("Failed to update section content")?;
                self.print_section(
                    format!("Updated content of `{}`", edited.value.id().as_str()),
                    &edited,
                )
            }
            SectionCommands::SetStyle(args) => {
                let edited = self
                    .site
                    .update_section_styles(&args.into())
                    .await
                    .context("Failed to update section styles")?;
                self.print_section(
                    format!("Updated styles of `{}`", edited.value.id().as_str()),
                    &edited,
                )
            }
        }
    }

    async fn step_section(&self, args: SectionRefArgs, direction: MoveDirection) -> Result<()> {
        let section_id = args.section_id.clone();
        let edited = self
            .site
            .move_section(&args.into_step(direction))
            .await
            .context("Failed to move section")?;
        let word = match direction {
            MoveDirection::Up => "up",
            MoveDirection::Down => "down",
        };
        let status = if edited.value {
            OperationStatus::success(format!("Moved section `{section_id}` {word}"))
        } else {
            OperationStatus::unchanged(format!("Section `{section_id}` cannot move {word}"))
        };
        self.print(format!("{status}\nPage version: {}\n", edited.version))
    }

    pub async fn handle_upload(&self, args: UploadArgs) -> Result<()> {
        self.require_page_editor()?;
        let bytes = std::fs::read(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        let edited = self
            .site
            .upload_image(&args.to_params(), &bytes)
            .await
            .context("Failed to upload image")?;
        self.print_section(
            format!("Uploaded {} into `{}`", args.file.display(), args.section_id),
            &edited,
        )
    }

    pub async fn handle_cms_command(&self, command: CmsCommands) -> Result<()> {
        match command {
            CmsCommands::Set(args) => {
                self.require_cms_editor()?;
                let (entry, previous) = self
                    .site
                    .cms_set(&args.into())
                    .await
                    .context("Failed to save CMS entry")?;
                let changes = match previous {
                    Some(old) if old != entry.value => {
                        vec![format!("value: '{old}' → '{}'", entry.value)]
                    }
                    _ => Vec::new(),
                };
                self.print(UpdateResult::with_changes(entry, changes))
            }
            CmsCommands::Get(args) => {
                let entry = self
                    .site
                    .cms_require(&args.into())
                    .await
                    .context("Failed to get CMS entry")?;
                self.print(entry)
            }
            CmsCommands::List(args) => {
                let entries = self
                    .site
                    .cms_list(&args.into())
                    .await
                    .context("Failed to list CMS entries")?;
                self.print(CmsEntries(entries))
            }
            CmsCommands::Delete(args) => {
                self.require_cms_editor()?;
                let entry = self
                    .site
                    .cms_delete(&args.into())
                    .await
                    .context("Failed to delete CMS entry")?;
                self.print(DeleteResult::new(entry))
            }
        }
    }

    pub async fn handle_pilgrimage_command(&self, command: PilgrimageCommands) -> Result<()> {
        match command {
            PilgrimageCommands::Add(args) => {
                self.require_page_editor()?;
                let pilgrimage = self
                    .site
                    .add_pilgrimage(&args.into())
                    .await
                    .context("Failed to add pilgrimage")?;
                self.print(CreateResult::new(pilgrimage))
            }
            PilgrimageCommands::List(args) => {
                let params: ListPilgrimages = args.into();
                let pilgrimages = self
                    .site
                    .list_pilgrimages(&params)
                    .await
                    .context("Failed to list pilgrimages")?;
                self.print(Pilgrimages(pilgrimages))
            }
        }
    }

    pub async fn handle_builder_command(&self, command: BuilderCommands) -> Result<()> {
        match command {
            BuilderCommands::Create(args) => {
                self.require_page_editor()?;
                let page = self
                    .site
                    .create_builder_page(&args.into())
                    .await
                    .context("Failed to create builder page")?;
                self.print(CreateResult::new(page))
            }
            BuilderCommands::List => {
                let pages = self
                    .site
                    .list_builder_pages()
                    .await
                    .context("Failed to list builder pages")?;
                self.print(PageSummaries(pages))
            }
            BuilderCommands::Show(args) => {
                let page = self
                    .site
                    .require_builder_page(&args.into())
                    .await
                    .context("Failed to show builder page")?;
                self.print(page)
            }
            BuilderCommands::AddSection(args) => {
                self.require_page_editor()?;
                let page_id = args.page_id;
                let edited = self
                    .site
                    .add_builder_section(&args.into())
                    .await
                    .context("Failed to add builder section")?;
                self.print_builder_edit(
                    page_id,
                    format!("Added section `{}`", edited.value.as_str()),
                )
                .await
            }
            BuilderCommands::AddComponent(args) => {
                self.require_page_editor()?;
                let page_id = args.page_id;
                let edited = self
                    .site
                    .add_component(&args.into())
                    .await
                    .context("Failed to add component")?;
                self.print_builder_edit(
                    page_id,
                    format!("Added component `{}`", edited.value.as_str()),
                )
                .await
            }
            BuilderCommands::Render(args) => {
                let html = self
                    .site
                    .render_builder_page(&args.into())
                    .await
                    .context("Failed to render builder page")?;
                println!("{html}");
                Ok(())
            }
            BuilderCommands::Delete(args) => {
                self.require_page_editor()?;
                let page = self
                    .site
                    .delete_builder_page(&args.into())
                    .await
                    .context("Failed to delete builder page")?;
                self.print(DeleteResult::new(page))
            }
        }
    }

    async fn print_builder_edit(&self, page_id: u64, message: String) -> Result<()> {
        let page = self
            .site
            .require_builder_page(&Id { id: page_id })
            .await
            .context("Failed to reload builder page")?;
        self.print(format!("{}\n{page}", OperationStatus::success(message)))
    }
}
