//! Executes scripts against a fresh file system.

use crate::output::{StatInfo, StepError, StepOutput, StepResult};
use crate::script::{self, Command};
use memfs_core::FileSystem;
use tracing::{info, warn};

/// Outcome of running a whole script.
pub struct Run {
    pub fs: FileSystem,
    pub steps: Vec<StepOutput>,
}

impl Run {
    pub fn failed(&self) -> usize {
        self.steps.iter().filter(|step| !step.success).count()
    }
}

/// Run `source` line by line.
///
/// Every executed line produces a step, passed to `on_step` as soon as it
/// completes. A failing line does not stop the run unless `strict` is set.
pub fn run_script(source: &str, strict: bool, mut on_step: impl FnMut(&StepOutput)) -> Run {
    let mut fs = FileSystem::new();
    let mut steps = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let step = match script::parse_line(raw) {
            Ok(None) => continue,
            Ok(Some(command)) => match execute(&mut fs, &command) {
                Ok(result) => StepOutput {
                    line,
                    command: command.to_string(),
                    success: true,
                    result: Some(result),
                    error: None,
                },
                Err(err) => {
                    warn!(line, command = %command, kind = err.kind(), "command failed");
                    StepOutput {
                        line,
                        command: command.to_string(),
                        success: false,
                        result: None,
                        error: Some(StepError::from(&err)),
                    }
                }
            },
            Err(err) => {
                warn!(line, "unparseable script line");
                StepOutput {
                    line,
                    command: raw.trim().to_string(),
                    success: false,
                    result: None,
                    error: Some(StepError {
                        kind: "parse_error".to_string(),
                        message: format!("{:#}", err),
                    }),
                }
            }
        };

        on_step(&step);
        let stop = strict && !step.success;
        steps.push(step);
        if stop {
            break;
        }
    }

    info!(steps = steps.len(), nodes = fs.len(), "script finished");
    Run { fs, steps }
}

/// Apply one command.
pub fn execute(fs: &mut FileSystem, command: &Command) -> memfs_core::Result<StepResult> {
    let result = match command {
        Command::Mkdir { parent, name } => {
            fs.add_directory(parent, name)?;
            StepResult::DirectoryAdded {
                parent: parent.clone(),
                name: name.clone(),
            }
        }
        Command::Touch { parent, name, size } => {
            fs.add_file(parent, name, *size)?;
            StepResult::FileAdded {
                parent: parent.clone(),
                name: name.clone(),
                size: fs.get_file_size(name)?,
            }
        }
        Command::Rm { name } => {
            fs.delete(name)?;
            StepResult::Deleted { name: name.clone() }
        }
        Command::Size { name } => StepResult::FileSize {
            name: name.clone(),
            size: fs.get_file_size(name)?,
        },
        Command::Biggest => StepResult::BiggestFile {
            name: fs.get_biggest_file()?.to_string(),
        },
        Command::Show => StepResult::Tree {
            lines: fs.show_filesystem().collect(),
            entries: fs.entries().collect(),
        },
        Command::Stat { name } => {
            let node = fs.lookup(name)?;
            let mut children: Vec<String> = node
                .children()
                .filter_map(|id| fs.node(id))
                .map(|child| child.name().to_string())
                .collect();
            children.sort();

            StepResult::Stat(StatInfo {
                name: node.name().to_string(),
                node_type: node.node_type(),
                size: node.size(),
                created: node.created(),
                path: fs.path_of(name)?,
                children,
            })
        }
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_script() {
        let run = run_script(script::DEMO_SCRIPT, false, |_| {});

        // Exactly the three expected failures
        let failures: Vec<&str> = run
            .steps
            .iter()
            .filter_map(|s| s.error.as_ref().map(|e| e.kind.as_str()))
            .collect();
        assert_eq!(
            failures,
            vec!["node_not_found", "name_already_exists", "directory_not_found"]
        );
        assert_eq!(run.failed(), 3);

        // Tie between two 3000-byte files goes to the newer one
        let biggest = run
            .steps
            .iter()
            .find_map(|s| match &s.result {
                Some(StepResult::BiggestFile { name }) => Some(name.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(biggest, "profile_pic.jpg");

        assert!(!run.fs.contains("Work"));
        assert!(!run.fs.contains("project.docx"));
        assert!(!run.fs.contains("vacation.jpg"));
        assert_eq!(run.fs.file_count(), 3);
    }

    #[test]
    fn test_strict_stops_at_first_failure() {
        let source = "mkdir root a\nrm missing\nmkdir root b\n";

        let run = run_script(source, true, |_| {});
        assert_eq!(run.steps.len(), 2);
        assert!(!run.fs.contains("b"));

        let run = run_script(source, false, |_| {});
        assert_eq!(run.steps.len(), 3);
        assert!(run.fs.contains("b"));
    }

    #[test]
    fn test_parse_errors_become_steps() {
        let run = run_script("\n# comment\nfrobnicate\nbiggest\n", false, |_| {});

        assert_eq!(run.steps.len(), 2);
        assert_eq!(run.steps[0].line, 3);
        assert_eq!(run.steps[0].error.as_ref().unwrap().kind, "parse_error");
        assert_eq!(
            run.steps[1].error.as_ref().unwrap().kind,
            "empty_file_system"
        );
    }

    #[test]
    fn test_on_step_sees_every_step() {
        let mut seen = Vec::new();
        let run = run_script("mkdir root a\ntouch a f 10\nsize f\n", false, |step| {
            seen.push(step.line)
        });

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(run.failed(), 0);
    }

    #[test]
    fn test_stat() {
        let mut fs = FileSystem::new();
        fs.add_directory("root", "Documents").unwrap();
        fs.add_directory("Documents", "Work").unwrap();
        fs.add_file("Documents", "resume.docx", 500).unwrap();

        let result = execute(
            &mut fs,
            &Command::Stat {
                name: "Documents".to_string(),
            },
        )
        .unwrap();

        let StepResult::Stat(info) = result else {
            panic!("expected stat result");
        };
        assert_eq!(info.path, vec!["root", "Documents"]);
        assert_eq!(info.children, vec!["Work", "resume.docx"]);
        assert_eq!(info.size, None);
    }
}
