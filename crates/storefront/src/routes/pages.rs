//! Static page route handlers, plus the 404 page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use bbs_core::Email;

use crate::error::AppError;
use crate::middleware::PageContext;
use crate::models::Flash;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub ctx: PageContext,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub ctx: PageContext,
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub ctx: PageContext,
}

/// Display the About page.
pub async fn about(ctx: PageContext) -> impl IntoResponse {
    AboutTemplate { ctx }
}

/// Display the Contact page.
pub async fn contact(ctx: PageContext) -> impl IntoResponse {
    ContactTemplate { ctx }
}

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// The toast to show when the form is incomplete or malformed.
    fn problem(&self) -> Option<&'static str> {
        if self.first_name.trim().is_empty() || self.message.trim().is_empty() {
            Some("Name and message are required.")
        } else if Email::parse(&self.email).is_err() {
            Some("Please enter a valid email address.")
        } else {
            None
        }
    }
}

/// Accept a contact message.
///
/// Messages are only logged; there is no mailbox behind the form.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(session, form))]
pub async fn send_message(
    session: Session,
    Form(form): Form<ContactForm>,
) -> Result<Redirect, AppError> {
    if let Some(problem) = form.problem() {
        Flash::error("Message Not Sent", problem).push(&session).await?;
        return Ok(Redirect::to("/contact"));
    }

    tracing::info!(
        email = %form.email.trim(),
        name = %format!("{} {}", form.first_name.trim(), form.last_name.trim()),
        length = form.message.trim().len(),
        "Contact message received"
    );
    Flash::success(
        "Message Sent",
        "Thanks for reaching out. We'll get back to you soon.",
    )
    .push(&session)
    .await?;

    Ok(Redirect::to("/contact"))
}

/// Fallback for unknown paths.
pub async fn not_found(ctx: PageContext) -> Response {
    not_found_page(ctx)
}

/// Render the 404 page with a 404 status.
#[must_use]
pub fn not_found_page(ctx: PageContext) -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate { ctx }).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(first_name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_contact_form_requires_name_and_message() {
        assert!(form("", "john@example.com", "Hi").problem().is_some());
        assert!(form("John", "john@example.com", "  ").problem().is_some());
    }

    #[test]
    fn test_contact_form_requires_valid_email() {
        assert_eq!(
            form("John", "not-an-email", "Hi").problem(),
            Some("Please enter a valid email address.")
        );
        assert_eq!(form("John", "john@example.com", "Hi").problem(), None);
    }
}
