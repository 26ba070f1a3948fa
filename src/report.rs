//! Trace report rendering.
//!
//! Renders a [`Trace`] as a fixed-width pipe-delimited table, one row per
//! tick. The report can be rendered to a string, written to a file (creating
//! parent directories as needed), or printed to standard output; the three
//! are independently usable.

use std::path::Path;

use crate::error::Result;
use crate::trace::Trace;

const TIME_HEADER: &str = "Time";
const TASKS_HEADER: &str = "Tasks being executed";
const GROUP_HEADER: &str = "Executing Group Name";

/// Renders a trace report.
pub struct Reporter<'a> {
    trace: &'a Trace,
}

impl<'a> Reporter<'a> {
    /// Creates a reporter over a finished trace.
    pub fn new(trace: &'a Trace) -> Self {
        Self { trace }
    }

    /// Renders the full table as a string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "| {TIME_HEADER} | {TASKS_HEADER} | {GROUP_HEADER} \n"
        ));
        out.push_str(&format!(
            "| {} | {} | {} \n",
            "-".repeat(TIME_HEADER.len()),
            "-".repeat(TASKS_HEADER.len()),
            "-".repeat(GROUP_HEADER.len()),
        ));
        for (i, record) in self.trace.iter().enumerate() {
            out.push_str(&format!(
                "| {:<tw$} | {:<ew$} | {:<gw$} \n",
                i,
                record.running.join(","),
                record.group,
                tw = TIME_HEADER.len(),
                ew = TASKS_HEADER.len(),
                gw = GROUP_HEADER.len(),
            ));
        }
        out
    }

    /// Writes the rendered report to a file, creating parent directories.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render())?;
        Ok(())
    }

    /// Prints the rendered report to standard output.
    pub fn print(&self) {
        print!("{}", self.render());
    }
}

/// Derives the report file name from the pipeline file and core count.
pub fn report_file_name(pipeline: &Path, cores: usize) -> String {
    let stem = pipeline
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pipeline");
    format!("{stem}_{cores}cores_REPORT.txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceRecord;
    use std::path::PathBuf;

    fn sample_trace() -> Trace {
        let mut trace = Trace::new();
        trace.push(TraceRecord {
            tick: 1,
            running: vec!["a".to_string(), "b".to_string()],
            group: "g1".to_string(),
        });
        trace.push(TraceRecord {
            tick: 2,
            running: vec!["c".to_string()],
            group: "g2".to_string(),
        });
        trace
    }

    #[test]
    fn test_render_layout() {
        let trace = sample_trace();
        let rendered = Reporter::new(&trace).render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Time | Tasks being executed | Executing Group Name ");
        assert_eq!(lines[1], "| ---- | -------------------- | -------------------- ");
        assert!(lines[2].starts_with("| 0    | a,b "));
        assert!(lines[3].starts_with("| 1    | c "));
        assert!(lines[2].contains("| g1 "));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let trace = sample_trace();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("report.txt");

        Reporter::new(&trace).write_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, Reporter::new(&trace).render());
    }

    #[test]
    fn test_report_file_name() {
        let name = report_file_name(&PathBuf::from("/tmp/ml_steps.txt"), 4);
        assert_eq!(name, "ml_steps_4cores_REPORT.txt");
    }
}
