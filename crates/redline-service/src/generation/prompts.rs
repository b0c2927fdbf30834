//! Prompt construction for the generation collaborator.
//!
//! The JSON shapes requested here are internal contracts matched by the
//! parsers in `redline_core::review`, not public formats.

/// Build the quick-assessment prompt for the free tier.
#[must_use]
pub fn score_prompt(text: &str) -> String {
    format!(
        r#"You are a brutally honest, genuinely helpful professional-document reviewer.

Analyze this document and return EXACTLY this JSON structure, nothing else:
{{
  "score": <number 0-100>,
  "critiques": [
    "<point 1>",
    "<point 2>",
    "<point 3>",
    "<point 4>",
    "<point 5>"
  ],
  "summary": "<a single direct but motivating summary sentence>"
}}

Rules:
- Score honestly (most documents land between 30 and 60)
- Each critique must be 1-2 sentences, specific to THIS document
- Be direct but not cruel; the goal is to help
- Point out real issues: vague statements, missing metrics, formatting clues, buzzword abuse
- The summary should make the reader want to fix their document
- Return ONLY valid JSON. No text before or after.

Document:
{text}"#
    )
}

/// Build the full-rewrite prompt for the paid tier.
#[must_use]
pub fn rewrite_prompt(text: &str) -> String {
    format!(
        r#"You are an expert professional-document writer. COMPLETELY REWRITE this document into a polished, screening-software-friendly version.

Return ONLY a JSON object (no markdown, no code fences, no explanation) with this exact structure:

{{
  "document": {{
    "name": "Full name from the document",
    "title": "A professional title line summarizing the person",
    "location": "City, Region",
    "phone": "Phone from the document, if present",
    "email": "Their email if present, otherwise an empty string",
    "summary": "A powerful 3-4 sentence professional summary packed with industry keywords",
    "key_skills": ["industry-standard skill 1", "skill 2", "...up to 10"],
    "certifications": ["certification they hold", "relevant certification [Recommended]"],
    "references": "Available on request",
    "experience": [
      {{
        "title": "Role title",
        "company": "Organization, Location",
        "dates": "Start - End",
        "bullets": [
          "Achievement-focused bullet with estimated metrics",
          "Second bullet with quantified impact"
        ]
      }}
    ]
  }},
  "score_before": <number 0-100>,
  "score_after": <number 0-100>,
  "changes_made": [
    "Brief description of improvement 1",
    "Brief description of improvement 2",
    "Brief description of improvement 3"
  ],
  "tips": [
    {{
      "tip": "Short actionable tip",
      "why": "Why this matters and why only the owner can do it"
    }}
  ]
}}

CRITICAL RULES:
- Rewrite EVERY entry's bullets with achievement language and realistic estimated metrics
- Convert vague or conversational language to specific, scannable professional terms
- Keep the same roles, organizations, and timeline; NEVER invent experience
- key_skills must be industry-standard terms, not conversational phrases
- certifications: include ones mentioned, plus up to 3 relevant ones marked [Recommended]
- Each role gets 2-4 strong bullets; be specific with numbers without over-inflating
- tips: 4-6 specific actions the owner can take to close the remaining gap, each with why it matters
- Return ONLY valid JSON. No text before or after.

Document to rewrite:
{text}"#
    )
}
