pub mod categories;
pub mod images;
pub mod upload;

use console::style;

use client::session::{Notification, NotificationKind};

pub fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        match n.kind {
            NotificationKind::Success => println!("{} {}", style("✓").green(), n.message),
            NotificationKind::Error => eprintln!("{} {}", style("✗").red(), n.message),
        }
    }
}
