use chrono::NaiveDateTime;
use reqwest::multipart::{Form, Part};
use std::io;
use std::path::Path;
use validator::Validate;

use super::{datetime, Event};

/// Картинка, прикладываемая к событию.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self {
            mime: mime_for(path).to_string(),
            file_name,
            bytes,
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Форма создания/редактирования события.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct EventDraft {
    #[validate(length(min = 1, message = "is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    pub date: NaiveDateTime,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub total_seats: i32,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    pub image: Option<ImageUpload>,
    /// Уже загруженная картинка (только при редактировании).
    pub current_image_url: Option<String>,
}

impl EventDraft {
    /// Заполняет форму редактирования данными события с сервера.
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date: event.date,
            total_seats: event.total_seats,
            price: event.price,
            image: None,
            current_image_url: event.image_url.clone(),
        }
    }

    // Пары поле-значение в том порядке, в каком они уходят в multipart
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.trim().to_string()),
            ("description", self.description.trim().to_string()),
            ("location", self.location.trim().to_string()),
            ("date", self.date.format(datetime::FORM_FORMAT).to_string()),
            ("totalSeats", self.total_seats.to_string()),
            ("price", self.price.to_string()),
        ]
    }

    /// Content-Type с boundary выставит reqwest, руками его не задаём.
    pub fn to_multipart(&self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (name, value) in self.text_fields() {
            form = form.text(name, value);
        }
        if let Some(image) = &self.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime)?;
            form = form.part("imageFile", part);
        }
        Ok(form)
    }
}
