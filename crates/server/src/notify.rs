//! Composition of the two contact-form emails.

use paintd_outbound::EmailMessage;

/// Addresses and branding the contact handlers send with.
#[derive(Clone, Debug)]
pub struct EmailRoutes {
    pub source_address: String,
    pub operator_address: String,
    pub company_name: String,
}

/// Fields collected from either contact surface (multipart or JSON).
#[derive(Clone, Debug, Default)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub image_url: Option<String>,
}

pub fn operator_notification(routes: &EmailRoutes, details: &ContactDetails) -> EmailMessage {
    let mut text = format!(
        "New contact form submission\n\nName: {}\nEmail: {}\nPhone: {}\n\nMessage:\n{}\n",
        details.name,
        details.email,
        details.phone.as_deref().unwrap_or("not provided"),
        details.message,
    );
    if let Some(url) = &details.image_url {
        text.push_str(&format!("\nAttached image: {url}\n"));
    }

    EmailMessage {
        from: routes.source_address.clone(),
        to: vec![routes.operator_address.clone()],
        subject: format!("New contact form submission from {}", details.name),
        text,
    }
}

pub fn customer_auto_reply(routes: &EmailRoutes, details: &ContactDetails) -> EmailMessage {
    EmailMessage {
        from: routes.source_address.clone(),
        to: vec![details.email.clone()],
        subject: format!("Thank you for contacting {}", routes.company_name),
        text: format!(
            "Hi {},\n\nThank you for reaching out to {}. We have received your \
message and will get back to you within one business day.\n\nBest regards,\nThe {} Team\n",
            details.name, routes.company_name, routes.company_name,
        ),
    }
}
