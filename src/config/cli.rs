use crate::core::Storage;
use crate::utils::error::{DrawError, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    /// Truncates any existing file.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn rename_file(&self, from: &str, to: &str) -> Result<()> {
        let from_path = Path::new(&self.base_path).join(from);
        let to_path = Path::new(&self.base_path).join(to);
        fs::rename(from_path, to_path)?;
        Ok(())
    }
}

/// Asks on stdout and reads one trimmed line from `input`.
pub fn prompt_line<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<String> {
    writeln!(output, "{}", question)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Err(DrawError::MissingConfigError {
            field: question.to_string(),
        });
    }
    Ok(answer.trim().to_string())
}

pub fn prompt_stdin(question: &str) -> Result<String> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    prompt_line(question, &mut input, &mut std::io::stdout())
}
