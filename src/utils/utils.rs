use std::io::Write;
use std::sync::Once;
use std::time::Instant;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};

static LOGGER_INIT: Once = Once::new();

pub fn parse_log_level(log_level: &str) -> log::LevelFilter {
    match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    }
}

/// 初始化 env_logger，重複呼叫時只有第一次生效
pub fn setup_logging(log_level: &str) {
    let log_level_filter = parse_log_level(log_level);
    LOGGER_INIT.call_once(|| {
        let result = env_logger::Builder::new()
            .filter_level(log_level_filter)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{} {:<5}] {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.args()
                )
            })
            .try_init();
        if let Err(e) = result {
            eprintln!("日誌初始化失敗：{}", e);
        }
    });
}

pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-");
            pb.set_style(style);
            pb.set_message("轉換 HEIC 檔案");
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
        }
    }

    /// 成功轉換一個檔案時推進進度條
    pub fn advance(&self, file_name: &str) {
        self.pb.inc(1);
        if !self.no_progress {
            self.pb.set_message(format!("已轉換 {}", file_name));
        }
    }

    pub fn position(&self) -> u64 {
        self.pb.position()
    }

    pub fn finish(&self, succeeded: usize, failed: usize) {
        if self.no_progress {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        let speed = if elapsed > 0.0 {
            (succeeded + failed) as f64 / elapsed
        } else {
            0.0
        };
        self.pb.finish_with_message(format!(
            "完成，成功 {} 個，失敗 {} 個，速度：{:.1} 檔案/秒",
            succeeded, failed, speed
        ));
    }
}

pub fn create_progress_bar(total: u64, no_progress: bool) -> ProgressManager {
    ProgressManager::new(total, no_progress)
}
