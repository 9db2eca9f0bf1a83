//! ChatML framing of a conversation for a single-string generator.

use carelens_core::models::conversation::{ChatRole, ConversationContext, push_block};
use carelens_core::models::request::RenderedPrompt;

use crate::error::PromptError;
use crate::templates::SYSTEM_PROMPT;

/// Frame the context's latest turn as the current user message, preceded by
/// the system prompt and the history of complete earlier turns, and leave an
/// open assistant turn for the model to fill.
pub fn frame_conversation(context: &ConversationContext) -> Result<RenderedPrompt, PromptError> {
    frame_with_system(SYSTEM_PROMPT, context)
}

pub fn frame_with_system(
    system_prompt: &str,
    context: &ConversationContext,
) -> Result<RenderedPrompt, PromptError> {
    let current = context.last().ok_or(PromptError::EmptyConversation)?;

    let mut out = String::new();
    push_block(&mut out, ChatRole::System, system_prompt);
    out.push_str(&context.render_history(true));
    push_block(&mut out, ChatRole::User, &current.user_message);
    out.push_str("<|im_start|>assistant\n");

    Ok(RenderedPrompt::new(out))
}
