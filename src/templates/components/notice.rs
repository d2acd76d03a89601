use maud::{html, Markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

pub fn notice(kind: NoticeKind, message: &str) -> Markup {
    let class = match kind {
        NoticeKind::Success => "notice notice-success",
        NoticeKind::Error => "notice notice-error",
    };
    html! {
        div class=(class) role="status" { (message) }
    }
}
