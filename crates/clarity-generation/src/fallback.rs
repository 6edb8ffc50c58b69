//! Canned content served when the backend is out of quota

use crate::prompts::{hero_title, CTA_TEXT};
use clarity_model::{ArtifactContent, ArtifactKind, PublicIdea};
use serde_json::json;

/// Substitute content for `kind` about `idea`
#[must_use]
pub fn content_for(kind: ArtifactKind, idea: &PublicIdea) -> ArtifactContent {
    match kind {
        ArtifactKind::Tweet => ArtifactContent::Text(format!(
            "I'm working on {} - an innovative solution for modern productivity challenges. \
             What do you think? Would this solve a problem for you? #startup #buildinpublic #AI",
            idea.title
        )),
        ArtifactKind::Competitors => ArtifactContent::Json(json!([
            {
                "name": "Asana",
                "price": "$10.99/mo",
                "strengths": [
                    "Great team collaboration",
                    "Visual project boards",
                    "Extensive integrations"
                ],
                "weaknesses": ["Can be overwhelming for simple tasks", "Limited AI features"],
                "link": "https://asana.com"
            },
            {
                "name": "Todoist",
                "price": "$4/mo",
                "strengths": [
                    "Clean interface",
                    "Natural language processing",
                    "Cross-platform sync"
                ],
                "weaknesses": ["Limited team features", "No built-in time tracking"],
                "link": "https://todoist.com"
            },
            {
                "name": "ClickUp",
                "price": "$7/mo",
                "strengths": ["All-in-one workspace", "Customizable views", "Time tracking"],
                "weaknesses": ["Steep learning curve", "Can be slow with large datasets"],
                "link": "https://clickup.com"
            }
        ])),
        ArtifactKind::LandingPage => ArtifactContent::Text(landing_page(idea)),
        ArtifactKind::Survey => ArtifactContent::Json(json!({
            "title": format!("{} validation survey", idea.title),
            "description": idea.problem_statement(),
            "questions": [
                {
                    "question": "How often do you run into this problem?",
                    "type": "multiple_choice",
                    "options": ["Daily", "Weekly", "Monthly", "Rarely"]
                },
                {
                    "question": "How do you solve it today?",
                    "type": "text"
                },
                {
                    "question": "How painful is the problem, from 1 to 5?",
                    "type": "rating",
                    "options": ["1", "2", "3", "4", "5"]
                },
                {
                    "question": "What would you pay per month for a solution?",
                    "type": "multiple_choice",
                    "options": ["Nothing", "$1-10", "$10-30", "More than $30"]
                },
                {
                    "question": "What is your role?",
                    "type": "text"
                }
            ]
        })),
    }
}

/// Human-readable explanation attached to substitute content
#[must_use]
pub fn quota_message(kind: ArtifactKind) -> String {
    let noun = match kind {
        ArtifactKind::Tweet => "tweet",
        ArtifactKind::Competitors => "competitors",
        ArtifactKind::LandingPage => "landing page prompt",
        ArtifactKind::Survey => "survey",
    };
    format!("Generation quota exceeded. Showing sample {noun} for testing.")
}

fn landing_page(idea: &PublicIdea) -> String {
    format!(
        "Design a modern SaaS landing page for a product called \"{title}\".\n\n\
         Hero Section:\n\
         - Main headline: \"{hero}\"\n\
         - Subheadline: \"{subtitle}\"\n\
         - Primary CTA button: \"{cta}\"\n\n\
         This tool solves important problems for developers and tech professionals.\n\n\
         Page Structure:\n\
         - Strong hero section with the above headline and CTA\n\
         - Problem/solution section explaining the pain solved\n\
         - 3 key feature blocks with icons:\n\
         \x20 * Smart automation features\n\
         \x20 * Intuitive user interface\n\
         \x20 * Seamless integrations\n\
         - Social proof section (testimonials or user count)\n\
         - Footer with Terms, Privacy, and Contact links\n\n\
         Design Requirements:\n\
         - Developer-friendly design with dark theme option\n\
         - Minimal and clean UI with modern gradients\n\
         - Subtle animations and micro-interactions\n\
         - Responsive layout for mobile and desktop\n\
         - Professional typography and readable layout\n\
         - Use blue/teal accent colors for CTAs and highlights\n\
         - Clean code structure optimized for performance",
        title = idea.title,
        hero = hero_title(idea),
        subtitle = idea.problem_statement(),
        cta = CTA_TEXT,
    )
}
