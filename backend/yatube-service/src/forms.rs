//! Form input, cleaning and form descriptions.
//!
//! Submissions arrive as `application/x-www-form-urlencoded`. Cleaning
//! trims the input, runs the `validator` rules and resolves the group
//! choice; on failure the caller gets per-field messages and re-renders the
//! form with the submitted values.

use crate::models::{Group, ImageChange, PostEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";
pub const IMAGE_TOO_LONG: &str = "Ensure this value has at most 255 characters.";
pub const IMAGE_CONTRADICTION: &str =
    "Please either submit a file or check the clear checkbox, not both.";

pub const MAX_IMAGE_LEN: usize = 255;

/// Field name -> messages, in field order of the form.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Raw post form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, rename = "image-clear")]
    pub image_clear: Option<String>,
}

/// Trimmed values the `validator` rules run against.
#[derive(Debug, Validate)]
struct PostInput {
    #[validate(length(min = 1, message = "This field is required."))]
    text: String,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: ImageChange,
}

impl CleanedPost {
    /// Image key for a brand new post; clearing means nothing to store.
    pub fn new_image(&self) -> Option<String> {
        match &self.image {
            ImageChange::Replace(key) => Some(key.clone()),
            ImageChange::Keep | ImageChange::Clear => None,
        }
    }
}

impl PostFormData {
    /// Initial values for editing `post`. The image input starts empty; the
    /// stored key is shown separately as the current image.
    pub fn from_post(post: &PostEntry) -> Self {
        Self {
            text: post.text.clone(),
            group: post
                .group
                .as_ref()
                .map(|g| g.id.to_string())
                .unwrap_or_default(),
            image: String::new(),
            image_clear: None,
        }
    }

    fn clear_requested(&self) -> bool {
        self.image_clear
            .as_deref()
            .is_some_and(|v| matches!(v, "on" | "true" | "1"))
    }

    /// Validate against the currently existing `groups`.
    pub fn clean(&self, groups: &[Group]) -> Result<CleanedPost, FieldErrors> {
        let input = PostInput {
            text: self.text.trim().to_string(),
            image: self.image.trim().to_string(),
        };

        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            for (field, field_errors) in e.field_errors() {
                let messages = field_errors
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string())
                    })
                    .collect::<Vec<_>>();
                errors
                    .entry(field.to_string())
                    .or_default()
                    .extend(messages);
            }
        }

        let group_id = match self.group.trim() {
            "" => None,
            raw => match raw.parse::<i64>() {
                Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    errors
                        .entry("group".to_string())
                        .or_default()
                        .push(INVALID_CHOICE.to_string());
                    None
                }
            },
        };

        let image = match (input.image.is_empty(), self.clear_requested()) {
            (false, true) => {
                errors
                    .entry("image".to_string())
                    .or_default()
                    .push(IMAGE_CONTRADICTION.to_string());
                ImageChange::Keep
            }
            (false, false) => ImageChange::Replace(input.image.clone()),
            (true, true) => ImageChange::Clear,
            (true, false) => ImageChange::Keep,
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CleanedPost {
            text: input.text,
            group_id,
            image,
        })
    }
}

/// Raw comment form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentFormData {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
}

impl CommentFormData {
    pub fn clean(&self) -> Result<String, FieldErrors> {
        let trimmed = CommentFormData {
            text: self.text.trim().to_string(),
        };

        match trimmed.validate() {
            Ok(()) => Ok(trimmed.text),
            Err(_) => Err(FieldErrors::from([(
                "text".to_string(),
                vec![REQUIRED.to_string()],
            )])),
        }
    }
}

// =====================================================================
// Form descriptions
// =====================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Char,
    Choice,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub widget: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub required: bool,
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    pub errors: Vec<String>,
}

impl FormField {
    fn new(name: &'static str, kind: FieldKind, widget: &'static str) -> Self {
        Self {
            name,
            kind,
            widget,
            label: "",
            help_text: "",
            required: false,
            value: String::new(),
            choices: Vec::new(),
            current: None,
            errors: Vec::new(),
        }
    }
}

/// What a renderer needs to draw a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub fields: Vec<FormField>,
    pub is_bound: bool,
    pub is_valid: bool,
}

impl FormView {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn bind_errors(mut self, errors: Option<&FieldErrors>) -> Self {
        if let Some(errors) = errors {
            self.is_bound = true;
            self.is_valid = errors.is_empty();
            for field in &mut self.fields {
                if let Some(messages) = errors.get(field.name) {
                    field.errors = messages.clone();
                }
            }
        }
        self
    }
}

/// Post form: `text`, `group` and `image`.
///
/// `errors` is `None` for an unbound form. `current_image` is the key
/// already stored on the post being edited.
pub fn post_form(
    groups: &[Group],
    data: &PostFormData,
    current_image: Option<&str>,
    errors: Option<&FieldErrors>,
) -> FormView {
    let mut text = FormField::new("text", FieldKind::Char, "textarea");
    text.label = "Текст поста";
    text.help_text = "Введите текст поста";
    text.required = true;
    text.value = data.text.clone();

    let mut group = FormField::new("group", FieldKind::Choice, "select");
    group.label = "Группа";
    group.help_text = "Группа, к которой будет относиться пост";
    group.value = data.group.clone();
    group.choices = std::iter::once(Choice {
        value: String::new(),
        label: "---------".to_string(),
    })
    .chain(groups.iter().map(|g| Choice {
        value: g.id.to_string(),
        label: g.title.clone(),
    }))
    .collect();

    let mut image = FormField::new("image", FieldKind::Image, "clearable_file");
    image.label = "Картинка";
    image.help_text = "Загрузите картинку";
    image.value = data.image.clone();
    image.current = current_image.map(str::to_string);

    FormView {
        fields: vec![text, group, image],
        is_bound: false,
        is_valid: false,
    }
    .bind_errors(errors)
}

/// Comment form: a single required `text` field.
pub fn comment_form(data: &CommentFormData, errors: Option<&FieldErrors>) -> FormView {
    let mut text = FormField::new("text", FieldKind::Char, "textarea");
    text.label = "Текст комментария";
    text.help_text = "Введите комментарий";
    text.required = true;
    text.value = data.text.clone();

    FormView {
        fields: vec![text],
        is_bound: false,
        is_valid: false,
    }
    .bind_errors(errors)
}
