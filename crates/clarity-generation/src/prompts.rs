//! Per-artifact prompts and sampling parameters

use crate::generator::GenerationRequest;
use clarity_model::{ArtifactKind, PublicIdea};

/// Sampling parameters for one artifact kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Completion length bound
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationParams {
    /// Parameters used for `kind`
    #[must_use]
    pub fn for_kind(kind: ArtifactKind) -> Self {
        let (max_tokens, temperature) = match kind {
            ArtifactKind::Tweet => (100, 0.8),
            ArtifactKind::Competitors => (800, 0.7),
            ArtifactKind::LandingPage => (1000, 0.8),
            ArtifactKind::Survey => (1000, 0.7),
        };
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// Default hero headline for an idea's landing page
pub(crate) fn hero_title(idea: &PublicIdea) -> String {
    format!("{} - Coming Soon", idea.title)
}

/// Default call to action for landing pages
pub(crate) const CTA_TEXT: &str = "Join Waitlist";

/// Build the completion request for `kind` about `idea`
#[must_use]
pub fn build_request(kind: ArtifactKind, idea: &PublicIdea) -> GenerationRequest {
    let params = GenerationParams::for_kind(kind);
    let request = match kind {
        ArtifactKind::Tweet => GenerationRequest::new(tweet_prompt(idea)),
        ArtifactKind::Competitors => GenerationRequest::new(competitors_prompt(idea))
            .with_system("You are a market research analyst. Always respond with valid JSON only."),
        ArtifactKind::LandingPage => GenerationRequest::new(landing_page_prompt(idea)),
        ArtifactKind::Survey => GenerationRequest::new(survey_prompt(idea)).with_system(
            "You are a product manager expert in market validation surveys. \
             Always respond with valid JSON only.",
        ),
    };
    request
        .with_max_tokens(params.max_tokens)
        .with_temperature(params.temperature)
}

fn tweet_prompt(idea: &PublicIdea) -> String {
    format!(
        "Generate an engaging Twitter post for this startup idea:\n\n\
         Title: {title}\n\
         Problem: {problem}\n\
         Description: {description}\n\n\
         Requirements:\n\
         - Keep it under 280 characters\n\
         - Make it engaging and ask for feedback\n\
         - Include relevant hashtags like #startup #buildinpublic\n\
         - Sound authentic and personal\n\
         - Ask the community what they think\n\n\
         Generate only the tweet text, nothing else.",
        title = idea.title,
        problem = idea.problem_summary.as_deref().unwrap_or_default(),
        description = idea.description.as_deref().unwrap_or_default(),
    )
}

fn competitors_prompt(idea: &PublicIdea) -> String {
    format!(
        "List 2-3 SaaS competitors similar to the following idea:\n\n\
         Idea Name: {title}\n\
         Problem Solved: {problem}\n\
         Target Audience: developers and tech professionals\n\n\
         For each competitor, return:\n\
         - Name\n\
         - Monthly price or pricing model\n\
         - Main strengths (bullet points)\n\
         - Weaknesses or limitations (bullet points)\n\
         - Website link (if known)\n\n\
         Respond in clean JSON format like this:\n\
         [\n  {{\n    \"name\": \"CompetitorName\",\n    \"price\": \"$19/mo\",\n    \
         \"strengths\": [\"Feature 1\", \"Feature 2\"],\n    \
         \"weaknesses\": [\"Limitation 1\", \"Limitation 2\"],\n    \
         \"link\": \"https://example.com\"\n  }}\n]",
        title = idea.title,
        problem = idea.problem_statement(),
    )
}

fn landing_page_prompt(idea: &PublicIdea) -> String {
    format!(
        "Create a detailed landing page prompt for AI tools like v0.dev, Lovable, or Bolt \
         for this SaaS idea:\n\n\
         Title: {title}\n\
         Problem: {problem}\n\
         Hero Title: {hero}\n\
         Subtitle: {problem}\n\
         CTA: {cta}\n\n\
         Generate a comprehensive prompt that includes:\n\
         - Hero section details\n\
         - Problem/solution explanation\n\
         - 3 key features with descriptions\n\
         - Social proof suggestions\n\
         - Design requirements (modern, clean, developer-friendly)\n\
         - Color scheme and styling preferences\n\n\
         Make it detailed and actionable for AI code generation tools.",
        title = idea.title,
        problem = idea.problem_statement(),
        hero = hero_title(idea),
        cta = CTA_TEXT,
    )
}

fn survey_prompt(idea: &PublicIdea) -> String {
    format!(
        "Create a market validation survey for '{title}': {problem}.\n\
         Return JSON with: title, description, and questions array. Each question should have: \
         question, type (multiple_choice, text, rating), and options (if applicable).\n\
         Include 5-8 questions covering problem validation, solution fit, pricing sensitivity, \
         and demographics.",
        title = idea.title,
        problem = idea.problem_statement(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clarity_model::IdeaId;

    fn idea() -> PublicIdea {
        PublicIdea::new(IdeaId::new_v4(), "DevLog")
            .with_problem("Developers forget what they shipped")
    }

    #[test]
    fn params_per_kind() {
        assert_eq!(GenerationParams::for_kind(ArtifactKind::Tweet).max_tokens, 100);
        assert_eq!(GenerationParams::for_kind(ArtifactKind::Competitors).max_tokens, 800);
        assert_eq!(GenerationParams::for_kind(ArtifactKind::LandingPage).max_tokens, 1000);
        assert_eq!(GenerationParams::for_kind(ArtifactKind::Survey).max_tokens, 1000);
    }

    #[test]
    fn request_carries_idea_and_params() {
        let req = build_request(ArtifactKind::Tweet, &idea());
        assert!(req.prompt.contains("Title: DevLog"));
        assert!(req.prompt.contains("Developers forget what they shipped"));
        assert_eq!(req.max_tokens, 100);
        assert!(req.system.is_none());
    }

    #[test]
    fn structured_kinds_ask_for_json() {
        for kind in [ArtifactKind::Competitors, ArtifactKind::Survey] {
            let req = build_request(kind, &idea());
            assert!(req.system.as_deref().is_some_and(|s| s.contains("valid JSON")));
        }
    }

    #[test]
    fn landing_page_uses_default_hero() {
        let req = build_request(ArtifactKind::LandingPage, &idea());
        assert!(req.prompt.contains("Hero Title: DevLog - Coming Soon"));
        assert!(req.prompt.contains("CTA: Join Waitlist"));
    }

    #[test]
    fn missing_problem_falls_back_to_title() {
        let bare = PublicIdea::new(IdeaId::new_v4(), "Nimbus");
        let req = build_request(ArtifactKind::Competitors, &bare);
        assert!(req.prompt.contains("Problem Solved: Innovative solution for Nimbus"));
    }
}
