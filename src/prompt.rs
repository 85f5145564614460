//! 制限時間つきの対話入力
//!
//! 入力待ちは別スレッドで行い、制限時間を過ぎたら既定値を返す。
//! 入力スレッドは切り離したまま残る（標準入力の読み込みは中断できない）。
//! どの場合もエラーは呼び出し側に返さない。

use dialoguer::Input;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// 入力結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// 入力された値
    Entered(String),
    /// 空入力・読み込み失敗のため既定値
    Defaulted(String),
    /// 時間切れのため既定値
    TimedOut(String),
}

impl PromptOutcome {
    pub fn value(&self) -> &str {
        match self {
            PromptOutcome::Entered(v) | PromptOutcome::Defaulted(v) | PromptOutcome::TimedOut(v) => v,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            PromptOutcome::Entered(v) | PromptOutcome::Defaulted(v) | PromptOutcome::TimedOut(v) => v,
        }
    }
}

/// 入力を最大 `timeout` まで待つ
pub fn timed_input(message: &str, default: &str, timeout: Duration) -> PromptOutcome {
    let (tx, rx) = mpsc::channel();
    let prompt = format!("{}（{}秒以内、既定: {}）", message, timeout.as_secs(), default);

    thread::spawn(move || {
        let result = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| e.to_string());
        // 受信側が時間切れで先に終わっていれば送れないが問題ない
        let _ = tx.send(result);
    });

    await_input(&rx, default, timeout)
}

/// 入力スレッドからの結果を待つ
pub fn await_input(
    rx: &Receiver<Result<String, String>>,
    default: &str,
    timeout: Duration,
) -> PromptOutcome {
    match rx.recv_timeout(timeout) {
        Ok(Ok(text)) if !text.trim().is_empty() => PromptOutcome::Entered(text.trim().to_string()),
        Ok(Ok(_)) => PromptOutcome::Defaulted(default.to_string()),
        Ok(Err(reason)) => {
            tracing::warn!(%reason, "入力の読み込みに失敗。既定値を使用");
            PromptOutcome::Defaulted(default.to_string())
        }
        Err(RecvTimeoutError::Timeout) => {
            tracing::info!(default, "入力待ちが時間切れ。既定値を使用");
            PromptOutcome::TimedOut(default.to_string())
        }
        Err(RecvTimeoutError::Disconnected) => {
            tracing::warn!("入力スレッドが終了しました。既定値を使用");
            PromptOutcome::Defaulted(default.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(50);

    #[test]
    fn test_entered_value_trimmed() {
        let (tx, rx) = mpsc::channel();
        tx.send(Ok("  巡检报告  ".to_string())).unwrap();
        assert_eq!(
            await_input(&rx, "res", WAIT),
            PromptOutcome::Entered("巡检报告".into())
        );
    }

    #[test]
    fn test_empty_input_uses_default() {
        let (tx, rx) = mpsc::channel();
        tx.send(Ok("   ".to_string())).unwrap();
        assert_eq!(await_input(&rx, "res", WAIT).value(), "res");
    }

    #[test]
    fn test_timeout_uses_default() {
        let (_tx, rx) = mpsc::channel::<Result<String, String>>();
        let outcome = await_input(&rx, "res", WAIT);
        assert_eq!(outcome, PromptOutcome::TimedOut("res".into()));
        assert_eq!(outcome.into_value(), "res");
    }

    #[test]
    fn test_read_error_and_disconnect_use_default() {
        let (tx, rx) = mpsc::channel();
        tx.send(Err("not a terminal".to_string())).unwrap();
        assert_eq!(await_input(&rx, "res", WAIT), PromptOutcome::Defaulted("res".into()));

        let (tx, rx) = mpsc::channel::<Result<String, String>>();
        drop(tx);
        assert_eq!(await_input(&rx, "res", WAIT), PromptOutcome::Defaulted("res".into()));
    }
}
