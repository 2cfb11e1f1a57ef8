use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::time::Duration;

/// Progress indicator manager
pub struct ProgressManager {
    multi: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    /// Progress is only drawn on a terminal and outside quiet mode
    pub fn new(quiet: bool) -> Self {
        Self::with_enabled(!quiet && io::stdout().is_terminal())
    }

    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Spinner for phases with no known length (discovery, rebuild)
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style.tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Some(pb)
    }

    /// Bar over the content phase; length is set once the index is known
    pub fn ingest_bar(&self) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new(0));
        if let Ok(style) =
            ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} ({percent}%) {wide_msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }

        Some(pb)
    }
}

/// Finish and clear an optional bar
pub fn finish(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

/// Progress messages
pub mod messages {
    pub const DISCOVERING: &str = "법령 목록 조회 중...";
    pub const CHECKING: &str = "신규 법령 확인 중...";
    pub const BUILDING: &str = "데이터베이스 구축 중...";
}
