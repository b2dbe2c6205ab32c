//! Serialized, deferred export of graphics surfaces to files.
//!
//! Each export is a fixed three-step sequence: force a draw pass onto the
//! target surface, wait a quiescence delay so the host's rendering pipeline
//! can flush, persist under a timestamped filename, then wait the same delay
//! again. The queue advances strictly one job at a time as the cooperative
//! draw loop pumps it (deferred scheduling against the host clock, not
//! threads), so two surfaces' draw/persist sequences can never interleave.
//!
//! Exports are fire-and-forget: enqueueing returns immediately and
//! completion is observed through logging. The [`ExportTicket`] returned by
//! the save entry points additionally delivers per-surface reports for
//! callers that want to await deterministically; dropping it is fine.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

use easel_core::handler::GraphicsContextHandler;
use easel_core::host::{Host, Timestamp};

use crate::screen::Sketch;

/// Quiescence delay between export stages, in host milliseconds.
pub const EXPORT_DELAY_MS: f64 = 1000.0;

/// Builds the export filename `"{timestamp}_{screen}_{surface}.png"`.
pub fn export_filename(timestamp: &Timestamp, screen: &str, surface: &str) -> String {
    format!("{timestamp}_{screen}_{surface}.png")
}

/// Outcome of one surface's export, delivered through an [`ExportTicket`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub surface: String,
    pub path: PathBuf,
    pub error: Option<String>,
}

impl ExportReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Completion handle for enqueued exports.
#[derive(Debug)]
pub struct ExportTicket {
    reports: Receiver<ExportReport>,
    expected: usize,
}

impl ExportTicket {
    pub(crate) fn new(reports: Receiver<ExportReport>, expected: usize) -> Self {
        Self { reports, expected }
    }

    /// How many reports this ticket will deliver in total.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// The next report, if one has arrived.
    pub fn try_report(&self) -> Option<ExportReport> {
        self.reports.try_recv().ok()
    }

    /// All reports delivered so far.
    pub fn drain(&self) -> Vec<ExportReport> {
        self.reports.try_iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Draw,
    Quiesce { until: f64 },
    Persist,
    Settle { until: f64 },
}

#[derive(Debug)]
struct ExportJob {
    surface: String,
    path: PathBuf,
    stage: Stage,
    error: Option<String>,
    reports: Sender<ExportReport>,
}

/// FIFO of deferred export jobs, pumped once per frame.
#[derive(Debug, Default)]
pub struct ExportQueue {
    jobs: VecDeque<ExportJob>,
}

impl ExportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Enqueues one surface's export; the job reports through `reports`
    /// when it completes.
    pub(crate) fn enqueue(&mut self, surface: String, path: PathBuf, reports: Sender<ExportReport>) {
        self.jobs.push_back(ExportJob {
            surface,
            path,
            stage: Stage::Draw,
            error: None,
            reports,
        });
    }

    /// Advances the front job by at most one stage transition.
    ///
    /// Only the front job ever moves: a later job's draw pass cannot run
    /// until the earlier job has fully persisted and settled, which keeps
    /// the shared drawing pipeline uncorrupted.
    pub(crate) fn pump(
        &mut self,
        host: &mut dyn Host,
        graphics: &mut GraphicsContextHandler,
        sketch: &mut dyn Sketch,
    ) {
        let now = host.millis();
        let mut finished = false;

        if let Some(job) = self.jobs.front_mut() {
            match job.stage {
                Stage::Draw => match graphics.get_mut(&job.surface) {
                    Some(gfx) => {
                        sketch.draw(gfx);
                        job.stage = Stage::Quiesce {
                            until: now + EXPORT_DELAY_MS,
                        };
                    }
                    None => {
                        // registries never shrink, so this means the job was
                        // enqueued against a foreign handler
                        log::error!(
                            "export target '{}' is not registered; dropping the job",
                            job.surface
                        );
                        job.error = Some(format!("surface '{}' not registered", job.surface));
                        finished = true;
                    }
                },
                Stage::Quiesce { until } => {
                    if now >= until {
                        job.stage = Stage::Persist;
                    }
                }
                Stage::Persist => {
                    match graphics.get(&job.surface) {
                        Some(gfx) => match host.save_surface(gfx.surface(), &job.path) {
                            Ok(()) => {
                                log::debug!(
                                    "exported '{}' to {}",
                                    job.surface,
                                    job.path.display()
                                );
                            }
                            Err(e) => {
                                log::error!("export of '{}' failed: {e}", job.surface);
                                job.error = Some(e.to_string());
                            }
                        },
                        None => {
                            job.error = Some(format!("surface '{}' not registered", job.surface));
                        }
                    }
                    job.stage = Stage::Settle {
                        until: now + EXPORT_DELAY_MS,
                    };
                }
                Stage::Settle { until } => {
                    if now >= until {
                        finished = true;
                    }
                }
            }
        }

        if finished {
            if let Some(job) = self.jobs.pop_front() {
                let report = ExportReport {
                    surface: job.surface,
                    path: job.path,
                    error: job.error,
                };
                if report.succeeded() {
                    log::info!("export finished: {}", report.path.display());
                } else {
                    log::warn!("export finished with error: {}", report.path.display());
                }
                // receiver may already be dropped; fire-and-forget
                let _ = job.reports.send(report);
            }
        }
    }
}

/// Builds a ticket plus the sender its jobs report through.
pub(crate) fn ticket_pair(expected: usize) -> (Sender<ExportReport>, ExportTicket) {
    let (tx, rx) = channel();
    (tx, ExportTicket::new(rx, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::context::{GraphicsConfig, GraphicsContext};
    use easel_core::host::HeadlessHost;

    struct CountingSketch {
        draws: usize,
    }

    impl Sketch for CountingSketch {
        fn draw(&mut self, _gfx: &mut GraphicsContext) {
            self.draws += 1;
        }
    }

    fn setup() -> (HeadlessHost, GraphicsContextHandler, CountingSketch) {
        let mut host = HeadlessHost::new(1280.0, 720.0);
        let handler = GraphicsContextHandler::new(
            GraphicsContext::new(&mut host, GraphicsConfig::named("main")).unwrap(),
        );
        (host, handler, CountingSketch { draws: 0 })
    }

    fn ts() -> Timestamp {
        Timestamp {
            year: 2024,
            month: 6,
            day: 1,
            hour: 12,
            minute: 30,
            second: 45,
        }
    }

    #[test]
    fn filename_combines_timestamp_screen_and_surface() {
        assert_eq!(
            export_filename(&ts(), "intro", "main"),
            "2024-06-01_12-30-45_intro_main.png"
        );
    }

    #[test]
    fn job_draws_immediately_but_persists_only_after_delay() {
        let (mut host, mut graphics, mut sketch) = setup();
        let mut queue = ExportQueue::new();
        let (tx, ticket) = ticket_pair(1);
        queue.enqueue("main".into(), PathBuf::from("a.png"), tx);

        queue.pump(&mut host, &mut graphics, &mut sketch);
        assert_eq!(sketch.draws, 1);
        assert!(host.saves().is_empty());

        // just short of the quiescence delay: still waiting
        host.advance(EXPORT_DELAY_MS - 1.0);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        assert!(host.saves().is_empty());

        host.advance(1.0);
        queue.pump(&mut host, &mut graphics, &mut sketch); // quiesce -> persist
        queue.pump(&mut host, &mut graphics, &mut sketch); // persist
        assert_eq!(host.saves().len(), 1);
        assert_eq!(host.saves()[0].0, PathBuf::from("a.png"));

        // job settles for another delay before reporting
        assert!(ticket.try_report().is_none());
        host.advance(EXPORT_DELAY_MS);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        let report = ticket.try_report().unwrap();
        assert!(report.succeeded());
        assert!(queue.is_empty());
    }

    #[test]
    fn jobs_never_interleave() {
        let (mut host, mut graphics, mut sketch) = setup();
        graphics
            .add_context(GraphicsContext::new(&mut host, GraphicsConfig::named("aux")).unwrap());
        let mut queue = ExportQueue::new();
        let (tx, _ticket) = ticket_pair(2);
        queue.enqueue("main".into(), PathBuf::from("main.png"), tx.clone());
        queue.enqueue("aux".into(), PathBuf::from("aux.png"), tx);

        // run well past one job's total span; the second job must not have
        // drawn until the first fully settled
        queue.pump(&mut host, &mut graphics, &mut sketch);
        assert_eq!(sketch.draws, 1);
        host.advance(EXPORT_DELAY_MS);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        assert_eq!(host.saves().len(), 1);
        assert_eq!(sketch.draws, 1, "second job drew before the first settled");

        host.advance(EXPORT_DELAY_MS);
        queue.pump(&mut host, &mut graphics, &mut sketch); // first settles
        queue.pump(&mut host, &mut graphics, &mut sketch); // second draws
        assert_eq!(sketch.draws, 2);
        host.advance(EXPORT_DELAY_MS);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        assert_eq!(host.saves().len(), 2);
        assert_eq!(host.saves()[1].0, PathBuf::from("aux.png"));
    }

    #[test]
    fn persist_failure_is_reported_not_propagated() {
        let (mut host, mut graphics, mut sketch) = setup();
        host.fail_saves_containing("main");
        let mut queue = ExportQueue::new();
        let (tx, ticket) = ticket_pair(1);
        queue.enqueue("main".into(), PathBuf::from("main.png"), tx);

        queue.pump(&mut host, &mut graphics, &mut sketch);
        host.advance(EXPORT_DELAY_MS);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        host.advance(EXPORT_DELAY_MS);
        queue.pump(&mut host, &mut graphics, &mut sketch);

        let report = ticket.try_report().unwrap();
        assert!(!report.succeeded());
        assert!(host.saves().is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn dropping_the_ticket_does_not_stall_the_queue() {
        let (mut host, mut graphics, mut sketch) = setup();
        let mut queue = ExportQueue::new();
        let (tx, ticket) = ticket_pair(1);
        drop(ticket);
        queue.enqueue("main".into(), PathBuf::from("a.png"), tx);

        queue.pump(&mut host, &mut graphics, &mut sketch);
        host.advance(EXPORT_DELAY_MS);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        host.advance(EXPORT_DELAY_MS);
        queue.pump(&mut host, &mut graphics, &mut sketch);
        assert!(queue.is_empty());
        assert_eq!(host.saves().len(), 1);
    }

    #[test]
    fn unregistered_surface_completes_with_error() {
        let (mut host, mut graphics, mut sketch) = setup();
        let mut queue = ExportQueue::new();
        let (tx, ticket) = ticket_pair(1);
        queue.enqueue("ghost".into(), PathBuf::from("ghost.png"), tx);

        queue.pump(&mut host, &mut graphics, &mut sketch);
        let report = ticket.try_report().unwrap();
        assert!(!report.succeeded());
        assert_eq!(sketch.draws, 0);
        assert!(queue.is_empty());
    }
}
