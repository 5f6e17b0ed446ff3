use crate::config::NotificationConfig;
use crate::logging::{Status, status_line};
use lettre::message::Message;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start,
    IpSuccess,
    Complete,
}

impl Event {
    fn tag(self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::IpSuccess => "ip_success",
            Event::Complete => "complete",
        }
    }
}

pub struct Notifier {
    config: NotificationConfig,
}

impl Notifier {
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }

    /// 按 `notification.enabled` 与 `notify_on` 掩码判断是否投递；三种事件一视同仁地受掩码约束
    /// （不像原实现对 ip_success 无条件发送）。发送失败仅记录告警，从不向上传播。
    pub fn notify(&self, event: Event, message: &str) {
        if !self.config.enabled || !self.config.notify_on.iter().any(|e| e == event.tag()) {
            return;
        }
        let Some(email) = &self.config.email else {
            return;
        };
        if let Err(e) = send_email(email, event, message) {
            status_line(Status::Warning, None, &format!("notification failed: {}", e));
        }
    }
}

fn send_email(
    email: &crate::config::EmailConfig,
    event: Event,
    message: &str,
) -> anyhow::Result<()> {
    let mut builder = Message::builder()
        .from(email.from_addr.parse()?)
        .subject(format!("[bmt-deploy] {}", event.tag()));
    for to in &email.to_addrs {
        builder = builder.to(to.parse()?);
    }
    let msg = builder.body(message.to_string())?;

    let creds = Credentials::new(email.username.clone(), email.password.clone());
    let mailer = SmtpTransport::relay(&email.smtp_host)?.port(email.smtp_port).credentials(creds).build();
    mailer.send(&msg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;

    #[test]
    fn disabled_notifier_never_sends() {
        let notifier = Notifier::new(NotificationConfig { enabled: false, ..Default::default() });
        // No email configured and disabled: notify() must return without panicking.
        notifier.notify(Event::Start, "hello");
    }

    #[test]
    fn masked_event_is_skipped() {
        let cfg = NotificationConfig {
            enabled: true,
            notify_on: vec!["complete".to_string()],
            email: None,
        };
        let notifier = Notifier::new(cfg);
        // ip_success is not in notify_on, and email is None anyway: must not panic.
        notifier.notify(Event::IpSuccess, "hello");
    }
}
