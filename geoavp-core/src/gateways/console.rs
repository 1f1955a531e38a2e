use std::collections::VecDeque;

/// Token that ends an ID collection phase.
pub const TERMINATOR: &str = "t";

/// Blocking console interface towards the human operator.
///
/// All prompts are Spanish; recoverable input errors are handled by the
/// caller with a re-prompt and never propagate.
pub trait OperatorConsole {
    /// Yes/no question; only `si`/`no` are accepted.
    fn confirm(&mut self, prompt: &str) -> bool;
    /// Lettered menu; returns the index of the chosen option.
    fn choose(&mut self, prompt: &str, options: &[&str]) -> usize;
    /// Free-text prompt, e.g. for record ids.
    fn prompt_line(&mut self, prompt: &str) -> String;
    /// Guidance text shown to the operator.
    fn info(&mut self, text: &str);
}

/// Non-interactive console fed from a pre-supplied list of answers,
/// for automated tests and unattended runs.
///
/// An exhausted script answers every question affirmatively, picks the
/// last menu option and replies to free-text prompts with the
/// terminator token, so a verification session always reaches its
/// confirmed state.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: lines.into_iter().map(Into::into).collect(),
        }
    }

    fn next_input(&mut self) -> Option<String> {
        self.inputs.pop_front()
    }
}

impl OperatorConsole for ScriptedConsole {
    fn confirm(&mut self, _prompt: &str) -> bool {
        loop {
            let Some(line) = self.next_input() else {
                return true;
            };
            match line.trim() {
                "si" => return true,
                "no" => return false,
                _ => continue,
            }
        }
    }

    fn choose(&mut self, _prompt: &str, options: &[&str]) -> usize {
        loop {
            let Some(line) = self.next_input() else {
                return options.len().saturating_sub(1);
            };
            if let [letter] = line.trim().as_bytes() {
                let idx = letter.wrapping_sub(b'a') as usize;
                if idx < options.len() {
                    return idx;
                }
            }
        }
    }

    fn prompt_line(&mut self, _prompt: &str) -> String {
        self.next_input()
            .unwrap_or_else(|| TERMINATOR.to_string())
    }

    fn info(&mut self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_console_answers_in_order() {
        let mut console = ScriptedConsole::new(["no", "b", "si"]);
        assert!(!console.confirm("?"));
        assert_eq!(console.choose("?", &["add", "remove", "confirm"]), 1);
        assert!(console.confirm("?"));
    }

    #[test]
    fn exhausted_script_converges() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        assert!(console.confirm("?"));
        assert_eq!(console.choose("?", &["add", "remove", "confirm"]), 2);
        assert_eq!(console.prompt_line("?"), TERMINATOR);
    }

    #[test]
    fn malformed_answers_are_skipped() {
        let mut console = ScriptedConsole::new(["yes", "si"]);
        assert!(console.confirm("?"));
        let mut console = ScriptedConsole::new(["z", "a"]);
        assert_eq!(console.choose("?", &["add", "remove"]), 0);
    }
}
