//! テスト用: 決まった断片列を返す ChatCompletion 実装

#[cfg(test)]
mod stub {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use common::error::Error;
    use common::llm::{ChatRequest, DeltaStream};

    use crate::adapter::CancelFlag;
    use crate::ports::outbound::ChatCompletion;

    /// 送信されたリクエスト（接続先・キー・本文）
    #[derive(Debug, Clone)]
    pub struct SentRequest {
        pub endpoint_url: String,
        pub api_key: String,
        pub request: ChatRequest,
    }

    /// テスト用: 固定の断片列を返す Stub
    pub struct StubCompletion {
        script: Vec<Result<String, Error>>,
        open_error: Option<Error>,
        cancel_after: Option<(usize, CancelFlag)>,
        sent: Mutex<Vec<SentRequest>>,
        stopped: Arc<AtomicBool>,
    }

    impl StubCompletion {
        pub fn new(script: Vec<Result<String, Error>>) -> Self {
            Self {
                script,
                open_error: None,
                cancel_after: None,
                sent: Mutex::new(Vec::new()),
                stopped: Arc::new(AtomicBool::new(false)),
            }
        }

        pub fn fragments(fragments: &[&str]) -> Self {
            Self::new(fragments.iter().map(|f| Ok(f.to_string())).collect())
        }

        /// 接続自体が失敗する
        pub fn failing_open(err: Error) -> Self {
            let mut s = Self::new(Vec::new());
            s.open_error = Some(err);
            s
        }

        /// n 個の断片を返した直後に flag を立てる（Ctrl+C の代わり）
        pub fn cancel_after(mut self, n: usize, flag: CancelFlag) -> Self {
            self.cancel_after = Some((n, flag));
            self
        }

        pub fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().unwrap().clone()
        }

        /// ストリームの stop() が呼ばれたか
        pub fn was_stopped(&self) -> bool {
            self.stopped.load(Ordering::SeqCst)
        }
    }

    impl ChatCompletion for StubCompletion {
        fn open_stream(
            &self,
            endpoint_url: &str,
            api_key: &str,
            request: &ChatRequest,
        ) -> Result<Box<dyn DeltaStream>, Error> {
            self.sent.lock().unwrap().push(SentRequest {
                endpoint_url: endpoint_url.to_string(),
                api_key: api_key.to_string(),
                request: request.clone(),
            });
            if let Some(e) = &self.open_error {
                return Err(e.clone());
            }
            Ok(Box::new(StubStream {
                items: self.script.iter().cloned().collect(),
                yielded: 0,
                cancel_after: self.cancel_after.clone(),
                stopped: Arc::clone(&self.stopped),
            }))
        }
    }

    struct StubStream {
        items: VecDeque<Result<String, Error>>,
        yielded: usize,
        cancel_after: Option<(usize, CancelFlag)>,
        stopped: Arc<AtomicBool>,
    }

    impl DeltaStream for StubStream {
        fn next_delta(&mut self) -> Option<Result<String, Error>> {
            if self.stopped.load(Ordering::SeqCst) {
                return None;
            }
            let item = self.items.pop_front()?;
            self.yielded += 1;
            if let Some((n, flag)) = &self.cancel_after {
                if self.yielded == *n {
                    flag.cancel();
                }
            }
            Some(item)
        }

        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
            self.items.clear();
        }
    }
}

#[cfg(test)]
pub use stub::StubCompletion;
