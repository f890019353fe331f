use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{self, Config, CONFIG_FILE_NAME};
use crate::error::{FbError, Result};
use crate::prompt::read_line;

pub fn run() -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_in(&config::state_dir()?, &mut stdin.lock(), &mut stdout)?;
    Ok(())
}

/// Writes `config.yaml` in `dir` from answers read on `input`. Returns the
/// path written, or `None` when the user declined to overwrite.
pub fn run_in<R: BufRead, W: Write>(dir: &Path, input: &mut R, output: &mut W) -> Result<Option<PathBuf>> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        write!(
            output,
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        )?;
        output.flush()?;

        let answer = read_line(input)?.unwrap_or_default();
        if !answer.eq_ignore_ascii_case("y") {
            writeln!(output, "Aborted.")?;
            return Ok(None);
        }
    }

    writeln!(output, "Flow Boards CLI Configuration")?;
    writeln!(output, "=============================\n")?;

    let config = Config {
        auth_key: ask(input, output, "Enter your Flow Boards auth key", "auth_key")?,
        org_id: ask(input, output, "Enter your organization ID", "org_id")?,
        user_email: ask(input, output, "Enter your email address", "user_email")?,
    };

    let path = config.save_to(dir)?;
    writeln!(output, "\nConfig saved to {}", path.display())?;
    writeln!(output, "You can now use 'fb' commands!")?;

    Ok(Some(path))
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    field: &'static str,
) -> Result<String> {
    write!(output, "{question}: ")?;
    output.flush()?;

    match read_line(input)? {
        Some(answer) if !answer.is_empty() => Ok(answer),
        _ => Err(FbError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut output = Vec::new();

        let path = run_in(
            dir.path(),
            &mut Cursor::new("key-123\nacme\ndev@acme.test\n"),
            &mut output,
        )
        .unwrap();

        assert_eq!(path, Some(dir.path().join(CONFIG_FILE_NAME)));
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.org_id, "acme");
        assert_eq!(config.user_email, "dev@acme.test");
    }

    #[test]
    fn test_init_keeps_existing_config_unless_confirmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "auth_key: old\norg_id: old\nuser_email: old@acme.test\n").unwrap();

        let result = run_in(dir.path(), &mut Cursor::new("n\n"), &mut Vec::new()).unwrap();

        assert_eq!(result, None);
        assert!(std::fs::read_to_string(&path).unwrap().contains("old@acme.test"));
    }

    #[test]
    fn test_init_requires_every_answer() {
        let dir = tempfile::tempdir().unwrap();

        let err = run_in(dir.path(), &mut Cursor::new("key-123\n\n"), &mut Vec::new()).unwrap_err();

        assert!(matches!(err, FbError::MissingField("org_id")));
        assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
    }
}
