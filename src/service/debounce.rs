//! 防抖器
//!
//! 输入值每次变化都会重置计时器，只有在静默窗口内没有新值时才发布。
//! 防抖器被销毁（Drop / shutdown）时取消后台计时任务，未发布的值直接丢弃。

use std::time::Duration;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{sleep_until, Instant},
};

pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: watch::Receiver<Option<T>>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// 创建防抖器（需要在 tokio 运行时内调用）
    pub fn new(quiescence: Duration) -> Self {
        let (input, mut rx) = mpsc::unbounded_channel::<T>();
        let (tx, output) = watch::channel::<Option<T>>(None);

        let task = tokio::spawn(async move {
            let mut pending: Option<(T, Instant)> = None;

            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some((value, Instant::now() + quiescence)),
                        None => break,
                    },
                    Some((value, deadline)) => {
                        tokio::select! {
                            next = rx.recv() => match next {
                                // 值未变化时保留原计时
                                Some(next) if next == value => pending = Some((value, deadline)),
                                Some(next) => pending = Some((next, Instant::now() + quiescence)),
                                None => break,
                            },
                            _ = sleep_until(deadline) => {
                                tx.send_if_modified(|current| {
                                    if current.as_ref() == Some(&value) {
                                        false
                                    } else {
                                        *current = Some(value);
                                        true
                                    }
                                });
                            }
                        }
                    }
                }
            }
        });

        Self {
            input,
            output,
            task,
        }
    }

    /// 推送新的输入值
    pub fn push(&self, value: T) {
        // 后台任务只会在 shutdown 后结束，此时丢弃输入即可
        let _ = self.input.send(value);
    }

    /// 最近一次发布的防抖值
    pub fn latest(&self) -> Option<T> {
        self.output.borrow().clone()
    }

    /// 订阅防抖值变化
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.output.clone()
    }

    /// 取消未到期的计时，之后不会再发布任何值
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
