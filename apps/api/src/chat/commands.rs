//! UI command plan: what the front-end should do for each extracted directive.
//!
//! The server never touches the page; it translates `[[ACTION:..]]` and
//! `[[NAV:..]]` payloads into structured commands the widget executes in order.

use serde::Serialize;
use tracing::debug;

/// Section holding the contact form.
pub const CONTACT_SECTION: &str = "contact";
/// Scroll-settle delay before focusing the first contact field.
pub const FOCUS_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiCommand {
    /// Signal the résumé viewer to open.
    OpenResumeViewer,
    ScrollIntoView { anchor: String, smooth: bool },
    /// Focus the first input or textarea inside `section` once `delay_ms` has passed.
    FocusFirstField { section: String, delay_ms: u64 },
}

/// Commands for an `[[ACTION:..]]` payload. Unknown actions produce none.
pub fn execute_action(action: &str) -> Vec<UiCommand> {
    match action {
        "openResume" => vec![UiCommand::OpenResumeViewer],
        "openContactForm" => vec![
            UiCommand::ScrollIntoView {
                anchor: CONTACT_SECTION.to_string(),
                smooth: true,
            },
            UiCommand::FocusFirstField {
                section: CONTACT_SECTION.to_string(),
                delay_ms: FOCUS_DELAY_MS,
            },
        ],
        other => {
            debug!("Ignoring unknown chat action '{other}'");
            Vec::new()
        }
    }
}

/// Command for a `[[NAV:..]]` payload. Only in-page anchors (`#id` or `/#id`)
/// scroll; anything else is a no-op.
pub fn execute_nav(target: &str) -> Option<UiCommand> {
    let anchor = target
        .strip_prefix("/#")
        .or_else(|| target.strip_prefix('#'))?;

    let valid = !anchor.is_empty()
        && anchor
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        debug!("Ignoring non-anchor navigation target '{target}'");
        return None;
    }

    Some(UiCommand::ScrollIntoView {
        anchor: anchor.to_string(),
        smooth: true,
    })
}

/// Full command plan: actions first, then navigation, each in order of appearance.
pub fn plan_commands(actions: &[String], nav_actions: &[String]) -> Vec<UiCommand> {
    actions
        .iter()
        .flat_map(|a| execute_action(a))
        .chain(nav_actions.iter().filter_map(|n| execute_nav(n)))
        .collect()
}
