//! Askama templates for channel responses.

use askama::Template;

/// TwiML answer to an incoming SMS.
#[derive(Template)]
#[template(path = "sms.xml")]
pub struct SmsTemplate {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_message_inside_response() {
        let xml = SmsTemplate {
            message: "Stop 1066: 5TH & G".into(),
        }
        .render()
        .unwrap();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<Response>"));
        assert!(xml.contains("<Message>Stop 1066: 5TH &amp; G</Message>"));
    }
}
