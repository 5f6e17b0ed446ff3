use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::bounded;

use crate::config::Config;
use crate::ledger::Ledger;
use crate::logging::{Status, status_line};
use crate::manifest::{HostEntry, ManifestEntry};
use crate::notify::{Event, Notifier};
use crate::stats::Stats;
use crate::worker::HostWorker;

pub struct Orchestrator {
    pub hosts: Vec<HostEntry>,
    pub manifest: Vec<ManifestEntry>,
    pub local_dir: PathBuf,
    pub config: Config,
    pub move_mode: bool,
    pub ledger: Ledger,
    pub notifier: Notifier,
}

impl Orchestrator {
    /// 轮次循环（§4.G）：每轮为所有尚未成功的主机各起一个 worker 线程，
    /// 收集本轮成功者，写入 ledger；仍未完成则按 `retry.round_interval` 休眠后进入下一轮。
    /// SIGINT 在轮次边界处被协作式地观察到，不会在阻塞 I/O 中途截断。
    pub fn run(&self) -> i32 {
        let cancel = Arc::new(AtomicBool::new(false));
        install_sigint_handler(cancel.clone());

        self.notifier.notify(Event::Start, &format!("deployment started for {} hosts", self.hosts.len()));
        status_line(Status::Info, None, &format!("starting deployment to {} hosts", self.hosts.len()));

        let _ = self.ledger.clear();
        let stats = Stats::new(self.hosts.len() as u64);
        let mut success: HashSet<String> = HashSet::new();
        let mut round: u64 = 1;

        while success.len() < self.hosts.len() {
            if cancel.load(Ordering::SeqCst) {
                status_line(Status::Warning, None, "interrupted by user, shutting down cooperatively");
                return 0;
            }

            let remaining: Vec<&HostEntry> =
                self.hosts.iter().filter(|h| !success.contains(&h.0)).collect();
            status_line(
                Status::Info,
                None,
                &format!("round {}: {} hosts remaining", round, remaining.len()),
            );

            let (tx, rx) = bounded::<(String, bool, f64)>(remaining.len().max(1));
            std::thread::scope(|scope| {
                for host in &remaining {
                    let host = (*host).clone();
                    let manifest = &self.manifest;
                    let local_dir = self.local_dir.as_path();
                    let config = &self.config;
                    let move_mode = self.move_mode;
                    let cancel = &cancel;
                    let tx = tx.clone();
                    scope.spawn(move || {
                        let worker = HostWorker {
                            host: host.clone(),
                            manifest,
                            local_dir,
                            config,
                            move_mode,
                            cancel,
                        };
                        let (ok, elapsed) = worker.run();
                        if ok {
                            status_line(
                                Status::Success,
                                Some(&host.0),
                                &format!("completed in {:.1}s", elapsed),
                            );
                            self.notifier.notify(
                                Event::IpSuccess,
                                &format!("{} completed deployment", host.0),
                            );
                        }
                        let _ = tx.send((host.0.clone(), ok, elapsed));
                    });
                }
                drop(tx);
                for (host, ok, elapsed) in rx.iter() {
                    if ok {
                        success.insert(host.clone());
                        stats.record_success(&host, elapsed);
                        let _ = self.ledger.append(&host);
                    }
                }
            });

            stats.maybe_report(round);

            if cancel.load(Ordering::SeqCst) {
                status_line(Status::Warning, None, "interrupted by user, shutting down cooperatively");
                return 0;
            }
            if success.len() < self.hosts.len() {
                std::thread::sleep(Duration::from_secs(self.config.retry.round_interval));
            }
            round += 1;
        }

        status_line(Status::Success, None, "all hosts deployed successfully");
        self.notifier.notify(Event::Complete, &format!("deployment complete for {} hosts", self.hosts.len()));
        0
    }
}

fn install_sigint_handler(cancel: Arc<AtomicBool>) {
    let _ = ctrlc::set_handler(move || {
        cancel.store(true, Ordering::SeqCst);
    });
}
