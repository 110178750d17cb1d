//! Terminal rendering for check runs
//!
//! Progress bar driven by analysis events, and the colored problem report.

use crate::events::AnalysisEvent;
use crate::registry::ProblemRegistry;
use crate::scheduler::JobOutcome;
use crate::speed::Severity;
use chrono::{DateTime, Local};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar and report printer for one CLI run
pub struct ReportDisplay {
    bar: Option<ProgressBar>,
    show_progress: bool,
    show_events: bool,
    tick_interval: Duration,
}

impl ReportDisplay {
    pub fn new(show_progress: bool, show_events: bool) -> Self {
        ReportDisplay {
            bar: None,
            show_progress,
            show_events,
            tick_interval: Duration::from_millis(100),
        }
    }

    /// Update the terminal from one analysis event
    pub fn handle_event(&mut self, event: &AnalysisEvent) {
        match event {
            AnalysisEvent::Started {
                total_units,
                single_bone,
                ..
            } => {
                let label = match single_bone {
                    Some(key) => format!("Rechecking {}", key),
                    None => "Checking all bones".to_string(),
                };
                self.start_bar(*total_units, &label);
            }
            AnalysisEvent::Progress {
                completed_units, ..
            } => {
                if let Some(bar) = &self.bar {
                    bar.set_position(*completed_units as u64);
                }
            }
            AnalysisEvent::UnitSkipped {
                bone,
                frame,
                reason,
                ..
            } => {
                if self.show_events {
                    let line = format!("{} skipped {} at frame {}: {}", "!".yellow(), bone, frame, reason);
                    match &self.bar {
                        Some(bar) => bar.println(line),
                        None => eprintln!("{}", line),
                    }
                }
            }
            AnalysisEvent::Completed { .. }
            | AnalysisEvent::Cancelled { .. }
            | AnalysisEvent::Failed { .. } => self.finish_bar(),
        }
    }

    fn start_bar(&mut self, total_units: usize, label: &str) {
        self.finish_bar();
        if !self.show_progress {
            return;
        }
        let pb = ProgressBar::new(total_units as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} Checking... [{bar:40.cyan/blue}] {pos}/{len} | {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb.set_message(label.to_string());
        pb.enable_steady_tick(self.tick_interval);
        self.bar = Some(pb);
    }

    /// Clear the progress bar if one is shown
    pub fn finish_bar(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print the outcome line followed by every recorded problem
    pub fn show_report(&self, outcome: &JobOutcome, problems: &ProblemRegistry) {
        let finished: DateTime<Local> = Local::now();
        let status = if outcome.cancelled {
            outcome.status.yellow().bold()
        } else if outcome.state.is_terminal() && outcome.problems_found == 0 {
            outcome.status.green().bold()
        } else {
            outcome.status.bold()
        };

        println!();
        println!("{} {}", status, format!("[{}]", finished.format("%Y-%m-%d %H:%M:%S")).dimmed());
        println!(
            "{}",
            format!(
                "  {}/{} frame pairs checked",
                outcome.completed_units, outcome.total_units
            )
            .dimmed()
        );

        if problems.is_empty() {
            println!("\n{} {}", "✓".green(), "No problems recorded".green());
            return;
        }

        for armature in problems.armatures() {
            println!("\n{}", armature.armature.as_str().cyan().bold());
            for (bone, group) in &armature.bones {
                let severity = group.severity().unwrap_or(Severity::Low);
                println!(
                    "  {} {} ({} frames)",
                    severity_tag(severity),
                    bone.as_str().bold(),
                    group.len()
                );
                for entry in group.entries() {
                    let detail = if entry.invalid_position {
                        "invalid position".red().to_string()
                    } else {
                        format!("speed {:.3} (+{:.3})", entry.speed, entry.excess)
                    };
                    println!("      frame {:>5}  {}", entry.frame, detail);
                }
            }
        }
        println!();
    }
}

fn severity_tag(severity: Severity) -> ColoredString {
    let tag = format!("[{}]", severity.label());
    match severity {
        Severity::High => tag.red().bold(),
        Severity::Medium => tag.yellow(),
        Severity::Low => tag.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoneKey;
    use uuid::Uuid;

    #[test]
    fn test_events_without_progress_bar() {
        let mut display = ReportDisplay::new(false, false);
        let job_id = Uuid::new_v4();
        display.handle_event(&AnalysisEvent::Started {
            job_id,
            total_units: 10,
            single_bone: Some(BoneKey::new("Rig", "Head")),
        });
        assert!(display.bar.is_none());
        display.handle_event(&AnalysisEvent::Progress {
            job_id,
            completed_units: 5,
            total_units: 10,
        });
        display.handle_event(&AnalysisEvent::Cancelled {
            job_id,
            completed_units: 5,
        });
        assert!(display.bar.is_none());
    }

    #[test]
    fn test_bar_tracks_progress() {
        let mut display = ReportDisplay::new(true, false);
        let job_id = Uuid::new_v4();
        display.handle_event(&AnalysisEvent::Started {
            job_id,
            total_units: 8,
            single_bone: None,
        });
        display.handle_event(&AnalysisEvent::Progress {
            job_id,
            completed_units: 3,
            total_units: 8,
        });
        let bar = display.bar.clone().unwrap();
        assert_eq!(bar.position(), 3);
        assert_eq!(bar.length(), Some(8));

        display.handle_event(&AnalysisEvent::Completed {
            job_id,
            problems_found: 0,
            status: "Check complete: 0 problems found".to_string(),
        });
        assert!(display.bar.is_none());
    }

    #[test]
    fn test_severity_tag_label() {
        assert!(severity_tag(Severity::High).to_string().contains("high"));
    }
}
