//! System prompt assembly for generation providers.

use serde_json::json;

use crate::llm_client::prompts::{
    ASSISTANT_NAME, DIRECTIVE_INSTRUCTION, GROUNDING_INSTRUCTION, STYLE_INSTRUCTION,
};
use crate::models::portfolio::PortfolioProfile;

/// Builds the system prompt: persona, the portfolio data as JSON, then the
/// response guidelines and the key facts repeated for quick reference.
pub fn build_system_prompt(profile: &PortfolioProfile) -> String {
    let data = json!({
        "personal": {
            "name": profile.name,
            "title": profile.title,
            "location": profile.location,
            "email": profile.email,
            "availability": profile.availability,
            "summary": profile.summary,
        },
        "experience": profile.experience,
        "skills": profile.skills,
        "projects": profile.projects,
        "certifications": profile.certifications,
        "education": profile.education,
    });
    let data = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());

    let current_role = profile
        .experience
        .first()
        .map(|p| format!("{} at {}", p.role, p.company))
        .unwrap_or_else(|| profile.title.clone());

    format!(
        "You are \"{ASSISTANT_NAME}\", {name}'s professional portfolio assistant.\n\n\
         **PORTFOLIO DATA:**\n{data}\n\n\
         **RESPONSE GUIDELINES:**\n\
         1. {GROUNDING_INSTRUCTION}\n\
         2. {STYLE_INSTRUCTION}\n\
         3. {DIRECTIVE_INSTRUCTION}\n\n\
         **KEY FACTS:**\n\
         - Name: {name}\n\
         - Current role: {current_role}\n\
         - Location: {location}\n\
         - Email: {email}\n\
         - Availability: {availability}",
        name = profile.name,
        location = profile.location,
        email = profile.email,
        availability = profile.availability,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_profile_and_directives() {
        let profile = PortfolioProfile::builtin();
        let prompt = build_system_prompt(&profile);

        assert!(prompt.contains(&profile.name));
        assert!(prompt.contains("Consultant at Deloitte USI"));
        assert!(prompt.contains("\"certifications\""));
        assert!(prompt.contains("[[ACTION:openResume]]"));
        assert!(prompt.contains("[[NAV:#skills]]"));
    }

    #[test]
    fn test_prompt_without_experience_uses_title() {
        let profile = PortfolioProfile {
            name: "Ada".to_string(),
            title: "Engineer".to_string(),
            ..Default::default()
        };
        let prompt = build_system_prompt(&profile);
        assert!(prompt.contains("- Current role: Engineer"));
    }
}
