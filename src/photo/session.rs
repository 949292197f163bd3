//! ブラウザセッション
//!
//! 著者1人ごとにブラウザを起動し、処理が成功しても失敗しても必ず終了する

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::error::SyncError;

pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    user_data_dir: PathBuf,
    /// 終了待ちの上限。超えたらプロセスを kill する
    close_timeout: Duration,
    closed: bool,
}

impl BrowserSession {
    /// ブラウザを起動
    pub async fn launch(config: &SyncConfig) -> Result<Self, SyncError> {
        // ユニークなユーザーデータディレクトリを生成
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = config.browser_data_dir.join(format!("author-photo-{}", unique_id));

        let mut builder = BrowserConfig::builder().user_data_dir(&user_data_dir);

        // Chrome パス（未設定なら chromiumoxide の自動検出）
        if let Ok(chrome_path) =
            std::env::var("CHROME_PATH").or_else(|_| std::env::var("CHROMIUM_PATH"))
        {
            builder = builder.chrome_executable(chrome_path);
        }

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .no_sandbox()
            .request_timeout(config.page_load_timeout)
            .arg(format!("--user-agent={}", config.user_agent))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .build()
            .map_err(SyncError::BrowserInit)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| SyncError::BrowserInit(e.to_string()))?;

        // ハンドラータスクを起動
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        debug!("Browser session started ({:?})", user_data_dir);

        Ok(Self {
            browser,
            handler_task,
            user_data_dir,
            close_timeout: config.page_load_timeout,
            closed: false,
        })
    }

    pub async fn new_page(&self) -> Result<Page, SyncError> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| SyncError::BrowserInit(e.to_string()))
    }

    /// ブラウザを終了し、プロセスとユーザーデータを片付ける
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }

        let exited = match self.browser.close().await {
            Ok(_) => wait_for_exit(self.browser.wait(), self.close_timeout).await,
            Err(e) => {
                debug!("Failed to close browser: {}", e);
                false
            }
        };

        if !exited {
            if let Some(Err(e)) = self.browser.kill().await {
                warn!("Failed to kill browser process: {}", e);
            }
        }
        self.cleanup();

        debug!("Browser session closed");
    }

    fn cleanup(&mut self) {
        self.handler_task.abort();
        if let Err(e) = std::fs::remove_dir_all(&self.user_data_dir) {
            debug!("Failed to remove {:?}: {}", self.user_data_dir, e);
        }
        self.closed = true;
    }

    /// セッションを起動してページを渡し、結果に関わらず終了する
    pub async fn scoped<F, Fut, T>(config: &SyncConfig, f: F) -> Result<T, SyncError>
    where
        F: FnOnce(Page) -> Fut,
        Fut: Future<Output = Result<T, SyncError>>,
    {
        let mut session = Self::launch(config).await?;

        let result = match session.new_page().await {
            Ok(page) => f(page).await,
            Err(e) => Err(e),
        };

        session.close().await;
        result
    }
}

/// プロセス終了を上限付きで待つ。終了を確認できなければ false
async fn wait_for_exit<F, T>(wait: F, timeout: Duration) -> bool
where
    F: Future<Output = std::io::Result<T>>,
{
    match tokio::time::timeout(timeout, wait).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            debug!("Failed to wait for browser process: {}", e);
            false
        }
        Err(_) => {
            warn!("Browser did not exit within {:?}, killing it", timeout);
            false
        }
    }
}

impl Drop for BrowserSession {
    // close() を経ずに破棄された場合（panic など）。ブラウザプロセス自体は Browser の Drop で終了する
    fn drop(&mut self) {
        if !self.closed {
            self.cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_exit_gives_up_on_hung_process() {
        let start = tokio::time::Instant::now();

        let exited = wait_for_exit(
            std::future::pending::<std::io::Result<()>>(),
            Duration::from_secs(30),
        )
        .await;

        assert!(!exited);
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert!(start.elapsed() < Duration::from_secs(31));
    }

    #[tokio::test]
    async fn test_wait_for_exit_results() {
        assert!(wait_for_exit(async { Ok::<_, std::io::Error>(()) }, Duration::from_secs(1)).await);

        let failed = async {
            Err::<(), _>(std::io::Error::new(std::io::ErrorKind::Other, "no child"))
        };
        assert!(!wait_for_exit(failed, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    #[ignore] // 実環境テスト用: cargo test test_scoped_closes_session_on_error -- --ignored --nocapture
    async fn test_scoped_closes_session_on_error() {
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let base_dir = std::env::temp_dir().join(format!("browser-session-{}", unique_id));
        std::fs::create_dir_all(&base_dir).unwrap();

        let config = SyncConfig::new().with_browser_data_dir(&base_dir);

        let result: Result<(), SyncError> = BrowserSession::scoped(&config, |_page| async {
            Err(SyncError::Navigation("unreachable page".into()))
        })
        .await;

        assert!(matches!(result, Err(SyncError::Navigation(_))));

        // ユーザーデータディレクトリが削除されている
        let leftovers: Vec<_> = std::fs::read_dir(&base_dir).unwrap().collect();
        assert!(leftovers.is_empty(), "leftover session data: {:?}", leftovers);

        std::fs::remove_dir_all(base_dir).ok();
    }
}
