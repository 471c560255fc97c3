use tera::{Context, Tera};

use crate::domain::models::booking::BookingDetails;
use crate::domain::models::job::{EmailJob, JobKind};
use crate::domain::ports::EmailMessage;
use crate::error::AppError;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const TEMPLATES: [(&str, &str); 9] = [
    ("booking_reminder.html", include_str!("../../templates/booking_reminder.html")),
    ("booking_reminder.txt", include_str!("../../templates/booking_reminder.txt")),
    ("booking_reminder_subject", "Reminder: your {{ boat_name }} rental starts {{ start_date }}"),
    ("document_followup.html", include_str!("../../templates/document_followup.html")),
    ("document_followup.txt", include_str!("../../templates/document_followup.txt")),
    ("document_followup_subject", "Action needed: your BoatMe documents"),
    ("review_reminder.html", include_str!("../../templates/review_reminder.html")),
    ("review_reminder.txt", include_str!("../../templates/review_reminder.txt")),
    ("review_reminder_subject", "How was your trip on {{ boat_name }}?"),
];

/// Turns a job into the subject and bodies handed to the email service.
pub struct EmailRenderer {
    tera: Tera,
    frontend_url: String,
}

impl EmailRenderer {
    pub fn new(frontend_url: &str) -> Result<Self, AppError> {
        let mut tera = Tera::default();
        for (name, body) in TEMPLATES {
            tera.add_raw_template(name, body)
                .map_err(|e| AppError::Template(format!("Failed to load {}: {:?}", name, e)))?;
        }

        Ok(Self {
            tera,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn render(&self, job: &EmailJob) -> Result<EmailMessage, AppError> {
        let template = job.kind.name();
        let context = match &job.kind {
            JobKind::BookingReminder(booking) => {
                let mut context = self.booking_context(booking);
                context.insert("booking_link", &format!("{}/bookings/{}", self.frontend_url, booking.booking_id));
                context
            }
            JobKind::ReviewReminder(booking) => {
                let mut context = self.booking_context(booking);
                context.insert("review_link", &format!("{}/bookings/{}/review", self.frontend_url, booking.booking_id));
                context
            }
            JobKind::DocumentFollowup(followup) => {
                let mut context = Context::new();
                context.insert("recipient_name", &followup.recipient_name);
                context.insert("documents_link", &format!("{}/dashboard/documents", self.frontend_url));
                context
            }
        };

        Ok(EmailMessage {
            recipient: job.recipient.clone(),
            subject: self.render_one(&format!("{}_subject", template), &context)?,
            html_body: self.render_one(&format!("{}.html", template), &context)?,
            text_body: self.render_one(&format!("{}.txt", template), &context)?,
            tag: template.to_string(),
        })
    }

    fn booking_context(&self, booking: &BookingDetails) -> Context {
        let mut context = Context::new();
        context.insert("customer_name", &booking.customer_name);
        context.insert("boat_name", &booking.boat_name);
        context.insert("start_date", &booking.start_date.format(DATE_FORMAT).to_string());
        context.insert("end_date", &booking.end_date.format(DATE_FORMAT).to_string());
        context.insert("location", &booking.location);
        context.insert("total_price", &booking.total_price);
        context
    }

    fn render_one(&self, name: &str, context: &Context) -> Result<String, AppError> {
        self.tera.render(name, context)
            .map_err(|e| AppError::Template(format!("Failed to render {}: {:?}", name, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn booking() -> BookingDetails {
        BookingDetails {
            booking_id: "bk-42".into(),
            boat_name: "Sea <Breeze>".into(),
            customer_name: "Jo".into(),
            customer_email: "jo@example.com".into(),
            start_date: Utc.with_ymd_and_hms(2024, 5, 28, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            location: Some("Split Marina".into()),
            total_price: Some(850),
        }
    }

    #[test]
    fn renders_review_reminder_with_link() {
        let renderer = EmailRenderer::new("https://boatme.test/").unwrap();
        let job = EmailJob::new(
            JobKind::ReviewReminder(booking()),
            "jo@example.com".into(),
            Utc.with_ymd_and_hms(2024, 6, 2, 10, 0, 0).unwrap(),
            Utc::now(),
        );

        let message = renderer.render(&job).unwrap();

        assert_eq!(message.recipient, "jo@example.com");
        assert_eq!(message.tag, "review_reminder");
        assert_eq!(message.subject, "How was your trip on Sea <Breeze>?");
        assert!(message.html_body.contains("https://boatme.test/bookings/bk-42/review"));
        assert!(message.html_body.contains("Sea &lt;Breeze&gt;"));
        assert!(message.text_body.contains("2024-06-01 10:00"));
    }

    #[test]
    fn renders_booking_reminder_optional_fields() {
        let renderer = EmailRenderer::new("https://boatme.test").unwrap();
        let mut details = booking();
        details.location = None;
        let job = EmailJob::new(JobKind::BookingReminder(details), "jo@example.com".into(), Utc::now(), Utc::now());

        let message = renderer.render(&job).unwrap();

        assert!(message.subject.starts_with("Reminder: your Sea <Breeze> rental"));
        assert!(!message.text_body.contains("Pick-up location"));
        assert!(message.text_body.contains("Total price: 850 EUR"));
    }

    #[test]
    fn renders_zero_price_and_hides_missing_price() {
        let renderer = EmailRenderer::new("https://boatme.test").unwrap();
        let mut details = booking();
        details.total_price = Some(0);
        let job = EmailJob::new(JobKind::BookingReminder(details.clone()), "jo@example.com".into(), Utc::now(), Utc::now());

        let message = renderer.render(&job).unwrap();
        assert!(message.text_body.contains("Total price: 0 EUR"));
        assert!(message.html_body.contains("<p>Total price: 0 EUR</p>"));

        details.total_price = None;
        let job = EmailJob::new(JobKind::BookingReminder(details), "jo@example.com".into(), Utc::now(), Utc::now());

        let message = renderer.render(&job).unwrap();
        assert!(!message.text_body.contains("Total price"));
        assert!(!message.html_body.contains("Total price"));
    }
}
