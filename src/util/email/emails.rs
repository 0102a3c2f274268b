use chrono::{DateTime, Utc};
use chrono_tz::Asia::Shanghai;

pub const VERIFICATION_APPROVED_EMAIL: &str = include_str!("./verification_approved.html");
pub const VERIFICATION_REJECTED_EMAIL: &str = include_str!("./verification_rejected.html");

/// Decision notification for a manual verification request. Timestamps
/// render in campus local time.
pub struct VerificationDecisionEmail {
    body: String,
    subject: &'static str,
}

impl VerificationDecisionEmail {
    pub fn approved() -> Self {
        VerificationDecisionEmail {
            body: VERIFICATION_APPROVED_EMAIL.to_string(),
            subject: "Campus Wall: account verified",
        }
    }

    pub fn rejected() -> Self {
        VerificationDecisionEmail {
            body: VERIFICATION_REJECTED_EMAIL.to_string(),
            subject: "Campus Wall: verification request rejected",
        }
    }

    pub fn set_decided_at(mut self, decided_at: DateTime<Utc>) -> Self {
        let local = decided_at
            .with_timezone(&Shanghai)
            .format("%Y-%m-%d %H:%M (%Z)")
            .to_string();
        self.body = self.body.replace("$1", &local);
        self
    }

    pub fn to_message(
        self,
        from_address: &str,
        user_email: &str,
    ) -> anyhow::Result<lettre::Message> {
        Ok(lettre::Message::builder()
            .from(format!("Campus Wall <{from_address}>").parse()?)
            .to(user_email.parse()?)
            .subject(self.subject)
            .header(lettre::message::header::ContentType::TEXT_HTML)
            .body(self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decided_at_is_substituted_in_campus_time() {
        let decided_at = Utc.with_ymd_and_hms(2025, 9, 1, 4, 30, 0).unwrap();
        let email = VerificationDecisionEmail::approved().set_decided_at(decided_at);

        // 04:30 UTC is 12:30 in Shanghai (+08:00, no DST).
        assert!(email.body.contains("2025-09-01 12:30"));
        assert!(!email.body.contains("$1"));
    }

    #[test]
    fn builds_a_well_formed_message() {
        let message = VerificationDecisionEmail::rejected()
            .set_decided_at(Utc::now())
            .to_message("noreply@wall.example", "li.hua@hsefz.cn");

        assert!(message.is_ok());
    }

    #[test]
    fn rejects_an_invalid_recipient() {
        let message = VerificationDecisionEmail::approved()
            .set_decided_at(Utc::now())
            .to_message("noreply@wall.example", "not an address");

        assert!(message.is_err());
    }
}
