//! Prompt layout shared by every chat provider.

use crate::types::CommandRecord;

/// Instruction sent as the system message of every chat call.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant for command-line \
commands and code snippets. Answer with the commands the user needs. Put every \
command or code sample in a fenced code block tagged with its language (for example \
```bash or ```powershell). Keep explanations short and practical.";

const CONTEXT_HEADER: &str = "Here are some relevant commands from the database:\n\n";

/// Render records as a numbered list of description / command pairs.
///
/// Returns an empty string when there is nothing to show.
pub fn render_context(records: &[CommandRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut block = String::from(CONTEXT_HEADER);
    for (i, record) in records.iter().enumerate() {
        block.push_str(&format!(
            "{}. Description: {}\n   Command: {}\n\n",
            i + 1,
            record.data,
            record.key
        ));
    }
    block
}

/// The user message: context block followed by the question.
pub fn user_prompt(question: &str, context: &[CommandRecord]) -> String {
    format!("{}\nUser question: {}", render_context(context), question)
}
