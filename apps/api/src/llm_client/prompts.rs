// Shared prompt fragments used by every match prompt, whatever the reply format.

/// Grounding rules appended to all match prompts.
pub const GROUNDING_RULES: &str = "\
Important:
- Base the analysis ONLY on what is actually written in the candidate profile
- Do NOT assume the candidate has skills or experience the profile does not mention
- If you are uncertain, lower the score rather than guess high
- Be specific and concrete
- Match semantically, not by exact keyword (e.g. \"React\" matches \"frontend development\")";

/// Instruction that enforces a bare JSON reply.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Return ONLY the JSON object. Do NOT include any text outside the JSON object. \
Do NOT use markdown code fences. Do NOT include explanations or apologies.";
