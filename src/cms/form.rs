//! Interactive post entry.
//!
//! A [`PostForm`] collects the same four raw strings the non-interactive
//! create path takes. Declining the final confirmation is a cancellation,
//! not an error.

use crate::error::{CmsError, Result};
use crate::model::PostInput;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Submitted(PostInput),
    Cancelled,
}

pub trait PostForm {
    /// Prompts for post fields, pre-filled from `initial`. When
    /// `content_from_editor` is set the content prompt is skipped.
    fn collect(&self, initial: &PostInput, content_from_editor: bool) -> Result<FormOutcome>;
}

/// Terminal prompts via `dialoguer`.
#[derive(Default)]
pub struct DialoguerForm {
    theme: ColorfulTheme,
}

impl DialoguerForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn prompt(&self, label: &str, initial: &str, required: bool) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(!required);
        if !initial.is_empty() {
            input = input.with_initial_text(initial);
        }
        if required {
            input = input.validate_with(|s: &String| -> std::result::Result<(), &str> {
                if s.trim().is_empty() {
                    Err("title is required")
                } else {
                    Ok(())
                }
            });
        }
        input.interact_text().map_err(form_error)
    }
}

impl PostForm for DialoguerForm {
    fn collect(&self, initial: &PostInput, content_from_editor: bool) -> Result<FormOutcome> {
        let title = self.prompt("Post title", &initial.title, true)?;
        let content = if content_from_editor {
            initial.content.clone()
        } else {
            self.prompt("Post content", &initial.content, false)?
        };
        let author = self.prompt("Author", &initial.author, false)?;
        let slug = self.prompt("URL slug (optional)", &initial.slug, false)?;

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Create this blog post?")
            .default(true)
            .interact()
            .map_err(form_error)?;

        if !confirmed {
            return Ok(FormOutcome::Cancelled);
        }

        Ok(FormOutcome::Submitted(PostInput {
            title,
            content,
            author,
            slug,
        }))
    }
}

fn form_error(err: dialoguer::Error) -> CmsError {
    CmsError::Api(format!("form input failed: {}", err))
}
