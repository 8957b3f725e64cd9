//! Line-oriented session scripts.
//!
//! One command per line, whitespace separated:
//!
//! ```text
//! mkdir <parent> <name>
//! touch <parent> <name> <size>
//! rm <name>
//! size <name>
//! stat <name>
//! biggest
//! show
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result, bail};
use std::fmt;

/// The demonstration session.
pub const DEMO_SCRIPT: &str = "\
# Build the tree
mkdir root Documents
mkdir root Pictures
mkdir Documents Work

touch Documents resume.docx 500
touch Documents budget.xlsx 1200
touch Pictures vacation.jpg 3000
touch Pictures profile_pic.jpg 3000
touch Work project.docx 800

show
# vacation.jpg and profile_pic.jpg tie; the newer one wins
biggest

rm vacation.jpg
show

# Expected failures
rm non_existent_file.txt
touch Documents resume.docx 300
touch NonExistentDir newfile.txt 100

rm Work
show
";

/// A parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mkdir { parent: String, name: String },
    Touch { parent: String, name: String, size: i64 },
    Rm { name: String },
    Size { name: String },
    Stat { name: String },
    Biggest,
    Show,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Mkdir { parent, name } => write!(f, "mkdir {} {}", parent, name),
            Command::Touch { parent, name, size } => {
                write!(f, "touch {} {} {}", parent, name, size)
            }
            Command::Rm { name } => write!(f, "rm {}", name),
            Command::Size { name } => write!(f, "size {}", name),
            Command::Stat { name } => write!(f, "stat {}", name),
            Command::Biggest => write!(f, "biggest"),
            Command::Show => write!(f, "show"),
        }
    }
}

/// Parse one script line. Returns `None` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["mkdir", parent, name] => Command::Mkdir {
            parent: parent.to_string(),
            name: name.to_string(),
        },
        ["touch", parent, name, size] => Command::Touch {
            parent: parent.to_string(),
            name: name.to_string(),
            size: size
                .parse()
                .with_context(|| format!("Invalid size: {}", size))?,
        },
        ["rm", name] => Command::Rm {
            name: name.to_string(),
        },
        ["size", name] => Command::Size {
            name: name.to_string(),
        },
        ["stat", name] => Command::Stat {
            name: name.to_string(),
        },
        ["biggest"] => Command::Biggest,
        ["show"] => Command::Show,
        [verb @ ("mkdir" | "touch" | "rm" | "size" | "stat" | "biggest" | "show"), ..] => {
            bail!("Wrong number of arguments for {}: {}", verb, line)
        }
        [verb, ..] => bail!("Unknown command: {}", verb),
        [] => return Ok(None),
    };

    Ok(Some(command))
}
