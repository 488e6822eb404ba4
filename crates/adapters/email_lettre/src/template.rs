//! Payload → email rendering.
//!
//! Each payload variant maps to a fixed subject/body shape; the only
//! interpolated values are escaped. Bodies are small inline-styled HTML
//! fragments wrapped in a shared layout.

use coachhub_domain::payload::NotificationPayload;

/// A fully rendered email plus the fields stored in the portal feed.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    /// Plain-text gist, shown in the portal notification list.
    pub summary: String,
    pub link: Option<String>,
    pub link_text: Option<String>,
    /// Stable type tag for the feed record.
    pub kind_tag: &'static str,
}

const DEFAULT_LOGIN_MESSAGE: &str = "Just a gentle reminder that your career toolkit is ready \
and waiting. All your tools, homework, and resources are there whenever you need them.";

const DEFAULT_HOMEWORK_MESSAGE: &str =
    "You have new homework waiting for you in your toolkit.";

/// Render one payload into subject, HTML body, and feed fields.
#[must_use]
pub fn render(payload: &NotificationPayload) -> RenderedEmail {
    match payload {
        NotificationPayload::LoginReminder {
            client_name,
            days_inactive,
            message,
            portal_url,
        } => {
            let summary = message.clone().unwrap_or_else(|| DEFAULT_LOGIN_MESSAGE.to_string());
            let body = format!(
                "<h2 style=\"color: #2a9d8f; margin-bottom: 20px;\">Still here for you</h2>\
                 <p>Hi {name},</p>\
                 <p>{message}</p>\
                 {button}\
                 <p style=\"color: #666; font-size: 14px;\">No rush &mdash; everything will be \
                 there when you are ready. It has been {days} days since your last visit.</p>",
                name = escape(client_name),
                message = escape(&summary),
                days = days_inactive,
                button = button(portal_url, "Access your toolkit"),
            );
            RenderedEmail {
                subject: "Your career toolkit is waiting".to_string(),
                html: layout(&body),
                summary,
                link: Some(portal_url.clone()),
                link_text: Some("Access your toolkit".to_string()),
                kind_tag: "login_reminder",
            }
        }
        NotificationPayload::HomeworkReady {
            client_name,
            message,
            portal_url,
        } => {
            let summary = message
                .clone()
                .unwrap_or_else(|| DEFAULT_HOMEWORK_MESSAGE.to_string());
            let body = format!(
                "<h2 style=\"color: #2a9d8f; margin-bottom: 20px;\">New content ready</h2>\
                 <p>Hi {name},</p>\
                 <p>{message}</p>\
                 {button}\
                 <p style=\"color: #666; font-size: 14px;\">Looking forward to seeing your \
                 insights!</p>",
                name = escape(client_name),
                message = escape(&summary),
                button = button(portal_url, "View homework"),
            );
            RenderedEmail {
                subject: "New homework ready".to_string(),
                html: layout(&body),
                summary,
                link: Some(portal_url.clone()),
                link_text: Some("View homework".to_string()),
                kind_tag: "homework_ready",
            }
        }
        NotificationPayload::Custom {
            client_name,
            subject,
            message,
            link,
            link_text,
        } => {
            let button_html = link.as_ref().map_or_else(String::new, |url| {
                button(url, link_text.as_deref().unwrap_or("View"))
            });
            let body = format!(
                "<p>Hi {name},</p><p>{message}</p>{button}",
                name = escape(client_name),
                message = escape(message),
                button = button_html,
            );
            RenderedEmail {
                subject: subject.clone(),
                html: layout(&body),
                summary: message.clone(),
                link: link.clone(),
                link_text: link_text.clone(),
                kind_tag: "custom",
            }
        }
    }
}

fn button(url: &str, label: &str) -> String {
    format!(
        "<div style=\"text-align: center; margin: 30px 0;\">\
         <a href=\"{url}\" style=\"background: #2a9d8f; color: white; padding: 15px 30px; \
         border-radius: 8px; text-decoration: none; font-weight: 600; display: inline-block;\">\
         {label}</a></div>",
        url = escape(url),
        label = escape(label),
    )
}

fn layout(content: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html><head><meta charset=\"UTF-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\"></head>\
         <body style=\"margin: 0; padding: 0; font-family: 'Segoe UI', Arial, sans-serif; \
         background-color: #f5f5f5;\">\
         <div style=\"max-width: 600px; margin: 0 auto; background: white;\">\
         <div style=\"background: #1a1a2e; padding: 30px; text-align: center;\">\
         <h1 style=\"color: white; margin: 0; font-size: 24px;\">CoachHub</h1></div>\
         <div style=\"padding: 40px 30px;\">{content}</div>\
         <div style=\"background: #f8f9fa; padding: 20px 30px; text-align: center; \
         border-top: 1px solid #eee;\">\
         <p style=\"margin: 0; color: #888; font-size: 12px;\">\
         This is an automated message from your coaching programme.</p>\
         </div></div></body></html>"
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
