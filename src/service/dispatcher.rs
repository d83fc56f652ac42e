use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};
use rayon::ThreadPool;

use crate::config::config::DispatchPolicy;
use crate::error::{ConvertError, Result};
use crate::models::task::{ConversionOutcome, ConversionTask, TaskReport};
use crate::service::converter::convert;
use crate::service::traits::i_service::ImageCodec;

const WORKER_PANICKED: &str = "worker panicked";

/// 將工作分派給 Worker，並以到達順序回收每個結果恰好一次
pub struct Dispatcher {
    policy: DispatchPolicy,
    jobs: usize,
}

impl Dispatcher {
    pub fn new(policy: DispatchPolicy, jobs: usize) -> Self {
        Dispatcher {
            policy,
            jobs: jobs.max(1),
        }
    }

    pub fn worker_count(&self, total: usize) -> usize {
        match self.policy {
            DispatchPolicy::Bounded => self.jobs.min(total.max(1)),
            DispatchPolicy::Unbounded => total,
        }
    }

    /// 送出所有工作，回傳結果串流；串流恰好產生 tasks.len() 個結果
    pub fn dispatch(
        &self,
        tasks: Vec<ConversionTask>,
        codec: Arc<dyn ImageCodec>,
    ) -> Result<OutcomeStream> {
        let total = tasks.len();
        let (tx, rx) = mpsc::channel();
        let outstanding = tasks.iter().map(|t| t.source_path.clone()).collect();

        let mut stream = OutcomeStream {
            rx,
            remaining: total,
            outstanding,
            handles: Vec::new(),
            _pool: None,
        };

        match self.policy {
            DispatchPolicy::Bounded => {
                let threads = self.worker_count(total);
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("heic-worker-{}", i))
                    .build()
                    .map_err(|e| ConvertError::ThreadPool(e.to_string()))?;
                info!("以 {} 個執行緒的執行緒池處理 {} 個檔案", threads, total);
                for task in tasks {
                    let tx = tx.clone();
                    let codec = Arc::clone(&codec);
                    pool.spawn(move || run_task(task, &*codec, &tx));
                }
                stream._pool = Some(pool);
            }
            DispatchPolicy::Unbounded => {
                // 每個檔案一個執行緒，檔案數量很大時可能耗盡系統資源
                warn!("無上限模式：將建立 {} 個執行緒", total);
                for (i, task) in tasks.into_iter().enumerate() {
                    let worker_tx = tx.clone();
                    let codec = Arc::clone(&codec);
                    let source_path = task.source_path.clone();
                    let spawned = thread::Builder::new()
                        .name(format!("heic-worker-{}", i))
                        .spawn(move || run_task(task, &*codec, &worker_tx));
                    match spawned {
                        Ok(handle) => stream.handles.push(handle),
                        Err(e) => {
                            error!("無法建立執行緒處理 {}: {}", source_path.display(), e);
                            let _ = tx.send(TaskReport {
                                source_path,
                                outcome: ConversionOutcome::Failure(format!(
                                    "無法建立執行緒: {}",
                                    e
                                )),
                            });
                        }
                    }
                }
            }
        }
        Ok(stream)
    }
}

fn run_task(task: ConversionTask, codec: &dyn ImageCodec, tx: &Sender<TaskReport>) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| convert(&task, codec)))
        .unwrap_or_else(|_| {
            error!("轉換 {} 時 Worker 發生 panic", task.source_name());
            ConversionOutcome::Failure(format!("{}: {}", task.source_name(), WORKER_PANICKED))
        });
    // 接收端已關閉代表呼叫者不再需要結果
    let _ = tx.send(TaskReport {
        source_path: task.source_path,
        outcome,
    });
}

/// 依完成順序產生結果的迭代器
pub struct OutcomeStream {
    rx: Receiver<TaskReport>,
    remaining: usize,
    outstanding: HashSet<PathBuf>,
    handles: Vec<JoinHandle<()>>,
    _pool: Option<ThreadPool>,
}

impl OutcomeStream {
    fn join_workers(&mut self) {
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("Worker 執行緒異常結束");
            }
        }
    }
}

impl Iterator for OutcomeStream {
    type Item = TaskReport;

    fn next(&mut self) -> Option<TaskReport> {
        if self.remaining == 0 {
            self.join_workers();
            return None;
        }
        let report = match self.rx.recv() {
            Ok(report) => report,
            Err(_) => {
                // 所有發送端都已結束卻仍缺結果，為遺失的工作補上失敗
                let source_path = self.outstanding.iter().next().cloned()?;
                error!("未收到 {} 的轉換結果", source_path.display());
                TaskReport {
                    source_path,
                    outcome: ConversionOutcome::Failure("未收到轉換結果".to_string()),
                }
            }
        };
        self.outstanding.remove(&report.source_path);
        self.remaining -= 1;
        debug!("收到結果：{}，剩餘 {}", report.source_path.display(), self.remaining);
        // 最後一個結果送達後即等待所有 Worker 結束，呼叫端不必再呼叫 next()
        if self.remaining == 0 {
            self.join_workers();
        }
        Some(report)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl Drop for OutcomeStream {
    fn drop(&mut self) {
        self.join_workers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// 名稱含 "bad" 的檔案解碼失敗，含 "boom" 的檔案直接 panic
    struct ScriptedCodec {
        calls: AtomicUsize,
    }

    impl ImageCodec for ScriptedCodec {
        fn decode(&self, path: &Path) -> Result<DynamicImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if name.contains("boom") {
                panic!("codec exploded");
            }
            if name.contains("bad") {
                return Err(ConvertError::decode(name, "corrupt"));
            }
            Ok(DynamicImage::new_rgb8(2, 2))
        }
    }

    fn tasks(names: &[&str], dest: &Path) -> Vec<ConversionTask> {
        names
            .iter()
            .map(|n| {
                ConversionTask::new(
                    PathBuf::from(format!("/src/{}.heic", n)),
                    dest.to_path_buf(),
                    format!("{}.jpg", n),
                )
            })
            .collect()
    }

    fn run(policy: DispatchPolicy, names: &[&str]) -> (Vec<TaskReport>, usize) {
        let dest = tempdir().unwrap();
        let codec = Arc::new(ScriptedCodec {
            calls: AtomicUsize::new(0),
        });
        let stream = Dispatcher::new(policy, 2)
            .dispatch(tasks(names, dest.path()), codec.clone())
            .unwrap();
        let reports: Vec<_> = stream.collect();
        (reports, codec.calls.load(Ordering::SeqCst))
    }

    #[test]
    fn test_bounded_yields_every_outcome_once() {
        let names = ["a", "bad1", "c", "d", "bad2", "f", "g"];
        let (reports, calls) = run(DispatchPolicy::Bounded, &names);
        assert_eq!(reports.len(), names.len());
        assert_eq!(calls, names.len());
        let unique: HashSet<_> = reports.iter().map(|r| r.source_path.clone()).collect();
        assert_eq!(unique.len(), names.len());
        let failed = reports.iter().filter(|r| !r.outcome.is_success()).count();
        assert_eq!(failed, 2);
    }

    #[test]
    fn test_unbounded_yields_every_outcome_once() {
        let names = ["a", "b", "bad", "d"];
        let (reports, _) = run(DispatchPolicy::Unbounded, &names);
        assert_eq!(reports.len(), 4);
        assert_eq!(reports.iter().filter(|r| r.outcome.is_success()).count(), 3);
    }

    #[test]
    fn test_panicking_worker_still_reports() {
        for policy in [DispatchPolicy::Bounded, DispatchPolicy::Unbounded] {
            let (reports, _) = run(policy, &["ok", "boom", "ok2"]);
            assert_eq!(reports.len(), 3);
            let panicked = reports
                .iter()
                .find(|r| r.source_path.ends_with("boom.heic"))
                .unwrap();
            match &panicked.outcome {
                ConversionOutcome::Failure(reason) => assert!(reason.contains(WORKER_PANICKED)),
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
    }

    #[test]
    fn test_workers_joined_once_reporter_reaches_total() {
        use crate::service::reporter::observe;
        use crate::utils::utils::create_progress_bar;

        let dest = tempdir().unwrap();
        let codec = Arc::new(ScriptedCodec {
            calls: AtomicUsize::new(0),
        });
        let mut stream = Dispatcher::new(DispatchPolicy::Unbounded, 2)
            .dispatch(tasks(&["a", "bad", "c"], dest.path()), codec)
            .unwrap();
        assert_eq!(stream.handles.len(), 3);

        let pm = create_progress_bar(3, true);
        let summary = observe(&mut stream, 3, &pm);

        assert_eq!(summary.completed(), 3);
        assert!(stream.handles.is_empty());
    }

    #[test]
    fn test_empty_dispatch() {
        let (reports, calls) = run(DispatchPolicy::Bounded, &[]);
        assert!(reports.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(Dispatcher::new(DispatchPolicy::Bounded, 8).worker_count(3), 3);
        assert_eq!(Dispatcher::new(DispatchPolicy::Bounded, 2).worker_count(10), 2);
        assert_eq!(Dispatcher::new(DispatchPolicy::Unbounded, 2).worker_count(10), 10);
        assert_eq!(Dispatcher::new(DispatchPolicy::Bounded, 0).worker_count(5), 1);
    }
}
