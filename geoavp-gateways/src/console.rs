use std::io::{self, BufRead, Write};

use geoavp_core::gateways::console::{OperatorConsole, TERMINATOR};

/// Blocking stdin/stdout console. All prompts follow the Spanish
/// operator protocol (`si`/`no`, lettered menus, `'t'` terminator).
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    // Returns `None` on EOF or a read error, which the prompt loops
    // translate into their converging default answers.
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_owned()),
            Err(err) => {
                log::warn!("Could not read operator input: {err}");
                None
            }
        }
    }

    fn print(&self, text: &str) {
        println!("{text}");
        let _ = io::stdout().flush();
    }
}

impl OperatorConsole for StdConsole {
    fn confirm(&mut self, prompt: &str) -> bool {
        loop {
            self.print(prompt);
            let Some(line) = self.read_line() else {
                return true;
            };
            match line.as_str() {
                "si" => return true,
                "no" => return false,
                _ => self.print("Ingrese 'si' o 'no'."),
            }
        }
    }

    fn choose(&mut self, prompt: &str, options: &[&str]) -> usize {
        loop {
            self.print(prompt);
            for (i, option) in options.iter().enumerate() {
                self.print(&format!("{}) {}", (b'a' + i as u8) as char, option));
            }
            let Some(line) = self.read_line() else {
                return options.len().saturating_sub(1);
            };
            if let [letter] = line.as_bytes() {
                let idx = letter.wrapping_sub(b'a') as usize;
                if idx < options.len() {
                    return idx;
                }
            }
            self.print("Opción inválida. Intente nuevamente.");
        }
    }

    fn prompt_line(&mut self, prompt: &str) -> String {
        self.print(prompt);
        self.read_line()
            .unwrap_or_else(|| TERMINATOR.to_owned())
    }

    fn info(&mut self, text: &str) {
        self.print(text);
    }
}
