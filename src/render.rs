//! Text rendering of check progress and results

use crate::model::{CheckReport, SiteReport};
use crate::output::CheckEvent;
use crate::probe::strip_wildcard;
use crate::status::StatusCategory;
use console::Style;

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    colors: bool,
}

impl Renderer {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.colors {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.paint(text, Style::new().green().bold())
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(text, Style::new().yellow().bold())
    }

    fn red(&self, text: &str) -> String {
        self.paint(text, Style::new().red().bold())
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(text, Style::new().cyan())
    }

    pub fn render_event(&self, event: &CheckEvent) -> String {
        match event {
            CheckEvent::ServiceStarted { name } => format!("Service: {}\n", name),
            CheckEvent::SiteChecked(report) => self.render_site(report),
            CheckEvent::ServiceFinished { available, .. } => {
                if *available {
                    format!("\t {}\n", self.green("Available"))
                } else {
                    format!("\t {}\n", self.red("Unavailable"))
                }
            }
        }
    }

    pub fn render_site(&self, report: &SiteReport) -> String {
        let classification = &report.classification;

        let status = match classification.category {
            StatusCategory::Success => self.green(&classification.text),
            StatusCategory::Redirect => self.yellow(&classification.text),
            StatusCategory::ClientOrServerError => self.red(&classification.text),
            StatusCategory::TransportFailure => {
                format!("{} {}", self.red("FAILED:"), classification.text)
            }
        };

        let mut line = format!("\t URL: {} {}", self.cyan(&report.site), status);

        if report.has_wildcard() {
            line.push_str(&format!(
                "\n\t      {} Wildcards unsupported, reporting for {}",
                self.yellow("WARNING:"),
                self.yellow(&strip_wildcard(&report.site))
            ));
        }

        line.push('\n');
        line
    }

    /// Final listing of services grouped by verdict.
    pub fn render_summary(&self, report: &CheckReport) -> String {
        let mut summary = format!("\n{}\n", self.green("Available Services"));
        for name in report.available() {
            summary.push_str(name);
            summary.push('\n');
        }

        summary.push_str(&format!("\n{}\n", self.red("Unavailable Services")));
        for name in report.unavailable() {
            summary.push_str(name);
            summary.push('\n');
        }

        summary
    }
}
