//! Prompt templates for each analysis task.

pub fn repo_summary(structure_sample: &str, readme: &str) -> String {
    format!(
        "Analyze the following information about a code repository and write a concise \
summary (under 250 words).

Repository structure (sample of files):
{structure_sample}

README content (partial):
{readme}

Based on this, summarize:
1. The main purpose of the repository.
2. The primary programming languages or technologies used, if apparent.
3. Key directories or files that look important.
4. Likely use cases or target audience.
"
    )
}

pub fn repo_question(context: &str, question: &str) -> String {
    format!(
        "You are an assistant that analyzes and explains code repositories.
You are given context from a Git repository (file contents and structure) followed by a \
user's question.

{context}

User question:
{question}

Answer using only the repository context above.
- If the context answers the question, explain it clearly and reference specific files.
- If the context is related but not conclusive, say what you found and what is missing.
- If the context has nothing relevant, say so plainly. Do not invent information.
- Use Markdown for code snippets and file paths.
"
    )
}

pub fn file_summary(path: &str, content: &str, truncated: bool) -> String {
    let label = if truncated { "File content (truncated):" } else { "File content:" };
    let tail = if truncated { "\n... (content truncated)" } else { "" };
    format!(
        "You are an assistant that analyzes and explains code.
Write a detailed summary of the following file from a Git repository.

File path: {path}
{label}
```
{content}
```{tail}

Cover:
1. The purpose or role of this file within the project.
2. Key functions, classes, components, or settings it defines and what they do.
3. How it likely interacts with the rest of the codebase.
4. Notable patterns, algorithms, libraries, or tricky logic.

Keep it well structured and use Markdown.
"
    )
}

pub fn dependency_explanation(context: &str) -> String {
    format!(
        "Analyze the following dependency information extracted from a code repository.

{context}

Based on the detected dependencies and file contents:
1. Identify the primary languages and ecosystems used.
2. For the most significant dependencies, briefly explain their purpose \
(e.g. 'React: frontend UI library').
3. Mention notable development-only dependencies.
4. If several ecosystems appear (e.g. a Python backend and a Node.js frontend), point that out.

Give a concise overview of the tech stack rather than repeating the list. Where detection \
was only existence-based, note that the analysis may be incomplete.
"
    )
}
