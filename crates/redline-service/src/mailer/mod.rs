//! Email delivery integration.
//!
//! Delivery is a best-effort bonus channel, not the fulfillment record of
//! truth: the rewrite is always returned synchronously to the caller, and
//! a delivery failure is logged but never rolls back a claim or alters a
//! pipeline outcome.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use redline_core::{Assessment, RewriteResult};

/// Error type for mail operations.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Mail API rejected the request.
    #[error("mail API error: HTTP {status}")]
    Api {
        /// HTTP status code.
        status: u16,
    },
}

/// Behavioral contract of the external email-delivery collaborator.
#[async_trait]
pub trait MailDelivery: Send + Sync {
    /// Send the paid rewrite to the customer.
    async fn send_rewrite(&self, to: &str, result: &RewriteResult) -> Result<(), MailError>;

    /// Send free-assessment results to a captured address.
    async fn send_assessment(&self, to: &str, assessment: &Assessment) -> Result<(), MailError>;

    /// Notify the operator that a payment came in.
    async fn notify_admin_payment(
        &self,
        customer: &str,
        amount_display: &str,
    ) -> Result<(), MailError>;
}

/// MailerSend API client.
#[derive(Debug, Clone)]
pub struct MailerSendClient {
    client: Client,
    api_key: String,
    from_email: String,
    admin_email: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    from: Party<'a>,
    to: Vec<Party<'a>>,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Party<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl MailerSendClient {
    /// MailerSend email endpoint.
    const EMAIL_URL: &'static str = "https://api.mailersend.com/v1/email";

    /// Request timeout for mail calls.
    const TIMEOUT_SECONDS: u64 = 10;

    /// Sender display name.
    const FROM_NAME: &'static str = "Redline";

    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        from_email: impl Into<String>,
        admin_email: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            from_email: from_email.into(),
            admin_email,
        }
    }

    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), MailError> {
        let request = EmailRequest {
            from: Party {
                email: &self.from_email,
                name: Some(Self::FROM_NAME),
            },
            to: vec![Party {
                email: to,
                name: None,
            }],
            subject,
            text,
        };

        let response = self
            .client
            .post(Self::EMAIL_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(MailError::Api {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl MailDelivery for MailerSendClient {
    async fn send_rewrite(&self, to: &str, result: &RewriteResult) -> Result<(), MailError> {
        let subject = "Your professionally rewritten document";
        let body = render_rewrite(result);
        self.send(to, subject, &body).await
    }

    async fn send_assessment(&self, to: &str, assessment: &Assessment) -> Result<(), MailError> {
        let subject = format!("Your document score: {}/100", assessment.score);
        let body = render_assessment(assessment);
        self.send(to, &subject, &body).await
    }

    async fn notify_admin_payment(
        &self,
        customer: &str,
        amount_display: &str,
    ) -> Result<(), MailError> {
        let Some(admin) = self.admin_email.as_deref() else {
            return Ok(());
        };
        let subject = format!("New payment from {customer}");
        let body = format!("Customer: {customer}\nAmount: {amount_display}\n");
        self.send(admin, &subject, &body).await
    }
}

/// Render the rewrite as a plain-text body.
///
/// Rich formatting is a presentation concern outside the core; plain text
/// is enough to hand the structured result over.
fn render_rewrite(result: &RewriteResult) -> String {
    let doc = &result.document;
    let mut body = String::new();

    body.push_str(&format!("{}\n{}\n", doc.name, doc.title));
    if !doc.location.is_empty() || !doc.phone.is_empty() || !doc.email.is_empty() {
        body.push_str(&format!("{} | {} | {}\n", doc.location, doc.phone, doc.email));
    }
    body.push_str(&format!(
        "\nScore: {}/100 -> {}/100\n",
        result.score_before, result.score_after
    ));

    body.push_str(&format!("\nPROFESSIONAL SUMMARY\n{}\n", doc.summary));
    body.push_str(&format!("\nKEY SKILLS\n{}\n", doc.key_skills.join(", ")));

    body.push_str("\nEXPERIENCE\n");
    for entry in &doc.experience {
        body.push_str(&format!(
            "\n{}\n{} | {}\n",
            entry.title, entry.company, entry.dates
        ));
        for bullet in &entry.bullets {
            body.push_str(&format!("  - {bullet}\n"));
        }
    }

    if !doc.certifications.is_empty() {
        body.push_str("\nCERTIFICATIONS\n");
        for cert in &doc.certifications {
            body.push_str(&format!("  - {cert}\n"));
        }
    }

    if !doc.references.is_empty() {
        body.push_str(&format!("\nREFERENCES\n{}\n", doc.references));
    }

    body
}

/// Render the free assessment as a plain-text body.
fn render_assessment(assessment: &Assessment) -> String {
    let mut body = format!(
        "Your document scored {}/100.\n\n\"{}\"\n\n",
        assessment.score, assessment.summary
    );
    for (i, critique) in assessment.critiques.iter().enumerate() {
        body.push_str(&format!("{}. {critique}\n", i + 1));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::{ExperienceEntry, RewrittenDocument};

    #[test]
    fn rewrite_rendering_includes_all_sections() {
        let result = RewriteResult {
            document: RewrittenDocument {
                name: "A. Person".into(),
                title: "Operations Lead".into(),
                summary: "Seasoned operations professional.".into(),
                key_skills: vec!["Scheduling".into()],
                certifications: vec!["First Aid".into()],
                references: "Available on request".into(),
                experience: vec![ExperienceEntry {
                    title: "Lead".into(),
                    company: "Acme".into(),
                    dates: "2019 - 2024".into(),
                    bullets: vec!["Cut turnaround by 30%".into()],
                }],
                ..RewrittenDocument::default()
            },
            score_before: 34,
            score_after: 78,
            changes_made: vec![],
            tips: vec![],
        };

        let body = render_rewrite(&result);
        assert!(body.contains("A. Person"));
        assert!(body.contains("34/100 -> 78/100"));
        assert!(body.contains("Cut turnaround by 30%"));
        assert!(body.contains("First Aid"));
    }

    #[test]
    fn assessment_rendering_numbers_critiques() {
        let assessment = Assessment {
            score: 55,
            critiques: vec!["vague".into(), "no metrics".into()],
            summary: "fixable".into(),
        };
        let body = render_assessment(&assessment);
        assert!(body.contains("55/100"));
        assert!(body.contains("1. vague"));
        assert!(body.contains("2. no metrics"));
    }
}
