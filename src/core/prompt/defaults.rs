use std::collections::BTreeMap;

use super::PromptTemplate;

pub const CODE_REVIEW: &str = "code_review";
pub const FEATURE_PLAN_REVIEW: &str = "feature_plan_review";
pub const BUG_ANALYSIS: &str = "bug_analysis";
pub const CODE_EXPLANATION: &str = "code_explanation";

const CODE_REVIEW_SYSTEM: &str = "You are an expert code reviewer. Analyze the provided code for:
1. Code quality and style issues
2. Potential bugs and security vulnerabilities
3. Performance optimizations
4. Best practices and maintainability

Provide specific, actionable feedback with line numbers when possible. Format your response as structured JSON with sections for issues, suggestions, and overall assessment.";

const CODE_REVIEW_USER: &str = "Please review the following {language} code:

```{language}
{code}
```

{focus_instruction}";

const FEATURE_PLAN_SYSTEM: &str = "You are a senior software architect and product manager. Review the provided feature plan for:
1. Clarity and completeness of requirements
2. Technical feasibility and implementation approach
3. Missing considerations (security, performance, testing)
4. User experience and edge cases
5. Dependencies and integration points

Provide constructive feedback to improve the plan.";

const FEATURE_PLAN_USER: &str = "Please review this feature plan:

{feature_plan}

Context: {context}

Focus areas: {focus_areas}";

const BUG_ANALYSIS_SYSTEM: &str = "You are a debugging expert. Analyze the provided bug report and code to:
1. Identify the root cause of the issue
2. Explain why the bug occurs
3. Suggest specific fixes with code examples
4. Recommend preventive measures
5. Consider edge cases and testing strategies

Be thorough but concise in your analysis.";

const BUG_ANALYSIS_USER: &str = "Bug Description: {bug_description}

Error Logs:
{error_logs}

Relevant Code:
```{language}
{code_context}
```

Environment: {environment}

Steps to reproduce: {reproduction_steps}";

const CODE_EXPLANATION_SYSTEM: &str = "You are a technical educator. Explain the provided code in a clear, comprehensive way that helps others understand:
1. What the code does (high-level purpose)
2. How it works (step-by-step breakdown)
3. Key concepts and patterns used
4. Important implementation details
5. Potential improvements or alternatives

Adjust your explanation level based on the requested detail level.";

const CODE_EXPLANATION_USER: &str = "Please explain this {language} code:

```{language}
{code}
```

Detail level: {detail_level}
Specific questions: {questions}";

fn build(
    name: &str,
    description: &str,
    system_prompt: &str,
    user_template: &str,
    variables: &[(&str, &str)],
) -> PromptTemplate {
    PromptTemplate {
        name: name.to_string(),
        description: description.to_string(),
        system_prompt: system_prompt.to_string(),
        user_template: user_template.to_string(),
        variables: variables
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

#[must_use]
pub fn builtin_templates() -> Vec<PromptTemplate> {
    vec![
        build(
            CODE_REVIEW,
            "Template for code review and analysis",
            CODE_REVIEW_SYSTEM,
            CODE_REVIEW_USER,
            &[
                ("language", "Programming language"),
                ("code", "Code to review"),
                ("focus_instruction", "Specific focus areas or instructions"),
            ],
        ),
        build(
            FEATURE_PLAN_REVIEW,
            "Template for reviewing feature plans and specifications",
            FEATURE_PLAN_SYSTEM,
            FEATURE_PLAN_USER,
            &[
                ("feature_plan", "Feature plan document"),
                ("context", "Project context and constraints"),
                ("focus_areas", "Specific areas to focus on"),
            ],
        ),
        build(
            BUG_ANALYSIS,
            "Template for analyzing bugs and suggesting fixes",
            BUG_ANALYSIS_SYSTEM,
            BUG_ANALYSIS_USER,
            &[
                ("bug_description", "Description of the bug"),
                ("error_logs", "Error messages and logs"),
                ("code_context", "Relevant code snippets"),
                ("language", "Programming language"),
                ("environment", "Environment details"),
                ("reproduction_steps", "Steps to reproduce the issue"),
            ],
        ),
        build(
            CODE_EXPLANATION,
            "Template for explaining code functionality",
            CODE_EXPLANATION_SYSTEM,
            CODE_EXPLANATION_USER,
            &[
                ("language", "Programming language"),
                ("code", "Code to explain"),
                ("detail_level", "Level of detail (basic, intermediate, advanced)"),
                ("questions", "Specific questions about the code"),
            ],
        ),
    ]
}
