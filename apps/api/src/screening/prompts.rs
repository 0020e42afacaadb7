// Prompt constants for the scoring step.

/// Verdict prompt. Replace `{description}` and `{candidate_text}` before sending.
/// Both are inserted verbatim.
pub const SCORING_PROMPT_TEMPLATE: &str = "Compare the following resume with the job opening below.

Job opening:
{description}

Resume:
{candidate_text}

Respond with:
1. A compatibility score from 0 to 100.
2. A summary of why the profile does or does not match the job opening.
";
