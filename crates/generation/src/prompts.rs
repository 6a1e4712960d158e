//! Prompts for generating and modifying small static web applications

use handler_core::Attachment;

pub const CREATE_SYSTEM_PROMPT: &str = "You are an expert web developer. Generate complete, functional web applications based on requirements. Always return valid JSON with file contents.";

pub const MODIFY_SYSTEM_PROMPT: &str = "You are an expert web developer. Modify existing code based on requirements. Always return valid JSON with updated file contents.";

/// Attachment URLs are usually data URIs; only this much of each is quoted.
const ATTACHMENT_URL_PREVIEW: usize = 100;

pub fn create_prompt(brief: &str, attachments: &[Attachment], checks: &[String]) -> String {
    let mut prompt = format!(
        r#"Create a complete web application based on this brief: {brief}

Requirements:
1. Create a minimal, functional web application
2. Include HTML, CSS, and JavaScript as needed
3. Make it responsive and user-friendly
4. Include proper error handling
5. Add comments explaining the code

If there are attachments, analyze them and incorporate relevant functionality.

Return the code as a JSON object with file names as keys and file contents as values.
Include at least: index.html, style.css, script.js, and any necessary backend files."#
    );

    if !attachments.is_empty() {
        prompt.push_str("\n\nAttachments to analyze:\n");
        for attachment in attachments {
            let preview: String = attachment.url.chars().take(ATTACHMENT_URL_PREVIEW).collect();
            prompt.push_str(&format!("- {}: {}...\n", attachment.name, preview));
        }
    }

    push_checks(&mut prompt, checks);
    prompt
}

pub fn modify_prompt(instruction: &str, repo_name: &str, checks: &[String]) -> String {
    let mut prompt = format!(
        r#"Modify the existing code in repository '{repo_name}' based on this request: {instruction}

Return the updated code as a JSON object with file names as keys and file contents as values."#
    );

    push_checks(&mut prompt, checks);
    prompt
}

fn push_checks(prompt: &mut String, checks: &[String]) {
    if checks.is_empty() {
        return;
    }

    prompt.push_str("\n\nThe result will be evaluated against these checks:\n");
    for check in checks {
        prompt.push_str(&format!("- {}\n", check));
    }
}
