//! Cleanup of raw model replies into a bare commit message.
//!
//! Models are told to return plain text, but occasionally wrap it in a code
//! fence or quotes anyway. Those wrappers would end up in the commit.

/// Strip surrounding whitespace, one wrapping code fence and one pair of
/// wrapping quotes. Returns `None` when nothing is left.
pub fn clean_reply(reply: &str) -> Option<String> {
    let mut text = reply.trim();

    if let Some(inner) = strip_code_fence(text) {
        text = inner.trim();
    }

    for quote in ['"', '\'', '`'] {
        if text.len() >= 2
            && text.starts_with(quote)
            && text.ends_with(quote)
            && !text[1..text.len() - 1].contains(quote)
        {
            text = text[1..text.len() - 1].trim();
            break;
        }
    }

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Return the body of a reply that is entirely one fenced block.
fn strip_code_fence(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("```")?;
    let rest = rest.strip_suffix("```")?;
    // Drop an info string such as ```text
    match rest.split_once('\n') {
        Some((info, body)) if !info.contains(' ') => Some(body),
        _ => Some(rest),
    }
}
